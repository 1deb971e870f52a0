use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("URL cannot be used as a base: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// Builds the error for a non-success response. Validation lists win
    /// over a single `error` message, which wins over the bare status.
    pub fn from_response_body(status: u16, body: &Value) -> Self {
        let errors: Vec<String> = body
            .get("errors")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if !errors.is_empty() {
            return ClientError::Validation(errors);
        }

        let message = body
            .get("error")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        match (status, message) {
            (404, Some(message)) => ClientError::NotFound(message),
            (404, None) => ClientError::NotFound("Not found".to_string()),
            (status, Some(message)) => ClientError::Status { status, message },
            (status, None) => ClientError::Status {
                status,
                message: format!("Status {}", status),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
