//! Typed HTTP client for the todo API and a local list model that follows
//! the same update rules a UI would.

mod api;
mod list;

pub use api::{ClientError, TodoClient};
pub use list::TodoList;

pub use crate::routes::todos::TodoResponse as TodoItem;
