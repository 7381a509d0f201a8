pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod todo_dao;
pub mod user_dao;

pub use base::{DaoBase, newest_first, now_timestamp, stamp_new, timestamp_after};
pub use base_traits::{HasCreatedAtColumn, TimestampedActiveModel};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use todo_dao::TodoDao;
pub use user_dao::UserDao;
