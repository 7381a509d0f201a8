pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{AppConfig, DatabaseConfig, GeneralConfig, IdentityConfig, LoggingConfig};
pub use envconfig::EnvConfig;
