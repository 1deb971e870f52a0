use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde_json::Value;

use crate::error::{AppError, Result};

pub mod health_handlers;
pub mod invitation_handlers;
pub mod rsvp_handlers;

/// Unwraps a JSON body. A request without a JSON content type is treated as
/// an empty object so it fails validation like any other incomplete body;
/// a body that is not valid JSON is an internal error.
pub(crate) fn json_body(payload: std::result::Result<Json<Value>, JsonRejection>) -> Result<Value> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Object(Default::default())),
        Err(rejection) => Err(AppError::internal(format!(
            "Failed to parse request body: {}",
            rejection.body_text()
        ))),
    }
}
