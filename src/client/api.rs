use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use super::TodoItem;
use crate::{auth::AuthenticatedUser, routes::API_PREFIX, services::todo_service::normalize_text};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("unexpected response ({status}): {body}")]
    Decode { status: u16, body: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthenticated(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ if status.is_client_error() => ClientError::InvalidInput(message),
            _ => ClientError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    message: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct CreateBody<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateBody {
    completed: bool,
}

/// Client bound to one caller: every request carries `Bearer <token>`.
#[derive(Debug, Clone)]
pub struct TodoClient {
    http: Client,
    base_url: String,
    token: String,
}

impl TodoClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self::with_http(http, base_url, token))
    }

    pub fn with_http(http: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub async fn list(&self) -> Result<Vec<TodoItem>, ClientError> {
        self.send(self.http.get(self.url("/todos"))).await
    }

    /// Trims `text` and refuses blank input locally, without a request.
    pub async fn create(&self, text: &str) -> Result<TodoItem, ClientError> {
        let text =
            normalize_text(text).map_err(|err| ClientError::InvalidInput(err.message().into()))?;
        self.send(self.http.post(self.url("/todos")).json(&CreateBody { text }))
            .await
    }

    pub async fn set_completed(&self, id: i32, completed: bool) -> Result<TodoItem, ClientError> {
        self.send(
            self.http
                .put(self.url(&format!("/todos/{id}")))
                .json(&UpdateBody { completed }),
        )
        .await
    }

    pub async fn toggle(&self, item: &TodoItem) -> Result<TodoItem, ClientError> {
        self.set_completed(item.id, !item.completed).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), ClientError> {
        self.send(self.http.delete(self.url(&format!("/todos/{id}"))))
            .await
    }

    pub async fn me(&self) -> Result<AuthenticatedUser, ClientError> {
        self.send(self.http.get(self.url("/me"))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let Ok(envelope) = serde_json::from_str::<Envelope>(&body) else {
            return Err(ClientError::Decode {
                status: status.as_u16(),
                body,
            });
        };
        if !status.is_success() {
            return Err(ClientError::from_status(status, envelope.message));
        }

        serde_json::from_value(envelope.data).map_err(|_| ClientError::Decode {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::{ClientError, TodoClient};

    #[test]
    fn status_codes_map_to_error_variants() {
        assert!(matches!(
            ClientError::from_status(StatusCode::UNAUTHORIZED, "x".into()),
            ClientError::Unauthenticated(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::FORBIDDEN, "x".into()),
            ClientError::Forbidden(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::NOT_FOUND, "x".into()),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::BAD_REQUEST, "x".into()),
            ClientError::InvalidInput(_)
        ));
        assert!(matches!(
            ClientError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "x".into()),
            ClientError::Server { status: 500, .. }
        ));
    }

    #[test]
    fn urls_are_nested_under_api_prefix() {
        let client = TodoClient::with_http(reqwest::Client::new(), "http://localhost:3001/", "u1");
        assert_eq!(client.url("/todos/4"), "http://localhost:3001/api/todos/4");
    }

    #[tokio::test]
    async fn blank_text_is_refused_without_a_request() {
        // Nothing listens on this port; reaching the network would be a transport error.
        let client = TodoClient::with_http(reqwest::Client::new(), "http://127.0.0.1:9", "u1");
        let err = client.create("   ").await.expect_err("blank text");
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }
}
