pub mod bootstrap;
pub mod identity;
pub mod providers;

pub use identity::{
    AuthenticatedUser, INVALID_CREDENTIALS, IdentityToken, MISSING_CREDENTIALS, TokenFormatError,
};
