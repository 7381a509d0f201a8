use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    routing::{get, put},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthenticatedUser,
    db::entities::todo,
    error::AppError,
    response::{ApiResult, JsonApiResponse},
    services::{ServiceContext, todo_service::TODO_NOT_FOUND},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: i32,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub owner_id: String,
}

impl From<todo::Model> for TodoResponse {
    fn from(model: todo::Model) -> Self {
        Self {
            id: model.id,
            text: model.text,
            completed: model.completed,
            created_at: model.created_at,
            updated_at: model.updated_at,
            owner_id: model.owner_id,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .with_state(state)
}

async fn list_todos(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> ApiResult<Vec<TodoResponse>> {
    let service = ServiceContext::from_state(state.as_ref()).todo();
    let items = service.list(&user).await?;
    JsonApiResponse::ok(items.into_iter().map(TodoResponse::from).collect())
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<TodoResponse> {
    let Json(body) = body.map_err(json_rejection)?;
    let service = ServiceContext::from_state(state.as_ref()).todo();
    let item = service.create(&user, &body.text).await?;
    JsonApiResponse::ok(item.into())
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<TodoResponse> {
    let id = todo_id(id)?;
    let Json(body) = body.map_err(json_rejection)?;
    let service = ServiceContext::from_state(state.as_ref()).todo();
    let item = service.update(&user, id, body.completed).await?;
    JsonApiResponse::ok(item.into())
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<serde_json::Value> {
    let id = todo_id(id)?;
    let service = ServiceContext::from_state(state.as_ref()).todo();
    service.delete(&user, id).await?;
    JsonApiResponse::with_message("Todo deleted", serde_json::Value::Null)
}

/// Non-numeric ids are malformed; numeric ids beyond the key range simply
/// name no item.
fn todo_id(id: Result<Path<i64>, PathRejection>) -> Result<i32, AppError> {
    let Path(id) = id.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "rejected todo id");
        AppError::invalid_input("Invalid todo id")
    })?;
    i32::try_from(id).map_err(|_| AppError::not_found(TODO_NOT_FOUND))
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::invalid_input(rejection.body_text())
}
