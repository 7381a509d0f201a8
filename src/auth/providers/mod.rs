pub mod opaque;
mod registry;

pub use opaque::OpaqueTokenProvider;
pub use registry::{IdentityProvider, IdentityProviderId, IdentityProviders};
