use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthenticatedUser,
    db::dao::{DaoLayerError, TodoDao},
    db::entities::todo,
    error::AppError,
};

pub const TODO_NOT_FOUND: &str = "Todo not found";

/// What a caller learns when it names an item owned by someone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipPolicy {
    /// Answer `Forbidden`; the item's existence is revealed.
    #[default]
    Disclose,
    /// Answer `NotFound`, exactly as for a missing id.
    Conceal,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Update,
    Delete,
}

impl Action {
    fn forbidden_message(self) -> &'static str {
        match self {
            Action::Update => "Not authorized to update this todo",
            Action::Delete => "Not authorized to delete this todo",
        }
    }
}

/// Per-caller todo operations. Every method takes the identity resolved by
/// the gate and never touches items the caller does not own.
#[derive(Clone)]
pub struct TodoService {
    todo_dao: TodoDao,
    ownership: OwnershipPolicy,
}

impl TodoService {
    pub fn new(todo_dao: TodoDao, ownership: OwnershipPolicy) -> Self {
        Self {
            todo_dao,
            ownership,
        }
    }

    #[tracing::instrument(skip(self, caller), fields(caller_id = %caller.id))]
    pub async fn list(&self, caller: &AuthenticatedUser) -> Result<Vec<todo::Model>, AppError> {
        Ok(self.todo_dao.find_by_owner(&caller.id).await?)
    }

    #[tracing::instrument(skip(self, caller, text), fields(caller_id = %caller.id))]
    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        text: &str,
    ) -> Result<todo::Model, AppError> {
        let text = normalize_text(text)?;
        let item = self.todo_dao.insert(&caller.id, text).await?;
        tracing::debug!(item_id = item.id, "todo created");
        Ok(item)
    }

    #[tracing::instrument(skip(self, caller), fields(caller_id = %caller.id))]
    pub async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: i32,
        completed: bool,
    ) -> Result<todo::Model, AppError> {
        let item = self.require_owned(caller, id, Action::Update).await?;
        self.todo_dao
            .set_completed(item, completed)
            .await
            .map_err(missing_as_not_found)
    }

    #[tracing::instrument(skip(self, caller), fields(caller_id = %caller.id))]
    pub async fn delete(&self, caller: &AuthenticatedUser, id: i32) -> Result<(), AppError> {
        self.require_owned(caller, id, Action::Delete).await?;
        self.todo_dao
            .delete_owned(id, &caller.id)
            .await
            .map_err(missing_as_not_found)?;
        tracing::debug!(item_id = id, "todo deleted");
        Ok(())
    }

    async fn require_owned(
        &self,
        caller: &AuthenticatedUser,
        id: i32,
        action: Action,
    ) -> Result<todo::Model, AppError> {
        let item = self
            .todo_dao
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(TODO_NOT_FOUND))?;

        if item.owner_id != caller.id {
            tracing::debug!(item_id = id, ?action, "caller does not own todo");
            return Err(match self.ownership {
                OwnershipPolicy::Disclose => AppError::forbidden(action.forbidden_message()),
                OwnershipPolicy::Conceal => AppError::not_found(TODO_NOT_FOUND),
            });
        }

        Ok(item)
    }
}

/// Trims surrounding whitespace; blank text is rejected.
pub fn normalize_text(text: &str) -> Result<&str, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("Text required"));
    }
    Ok(trimmed)
}

fn missing_as_not_found(err: DaoLayerError) -> AppError {
    match err {
        DaoLayerError::NotFound { .. } => AppError::not_found(TODO_NOT_FOUND),
        other => other.into(),
    }
}
