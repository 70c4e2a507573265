use std::sync::Arc;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::catalog::domain::CatalogService;
use crate::core::command::CommandError;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogService>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogService>) -> AppState {
        AppState {
            catalog,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

pub(crate) type ServerError = (StatusCode, Json<MessageBody>);

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST, Json(MessageBody::new(format!("{}", err).as_str())))
}

// Request payloads must be a JSON object; the fields are then decoded into the command request
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ServerError> {
    let value: Value = serde_json::from_slice(body).map_err(json_to_server_error)?;
    if !value.is_object() {
        return Err((StatusCode::BAD_REQUEST, Json(MessageBody::new("request body must be a JSON object"))));
    }
    serde_json::from_value(value).map_err(json_to_server_error)
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        let status = match err {
            CommandError::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            CommandError::Runtime { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CommandError::Serialization { .. } => {
                StatusCode::BAD_REQUEST
            }
            CommandError::Unavailable { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CommandError::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
        };
        (status, Json(MessageBody::new(err.message())))
    }
}
