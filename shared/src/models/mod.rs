use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

mod event_type;
mod invitation;
mod rsvp;

pub use event_type::EventType;
pub use invitation::{Invitation, NewInvitation};
pub use rsvp::{NewRsvp, Rsvp, RsvpStatus};

/// Current UTC time as an ISO-8601 string with millisecond precision,
/// e.g. `2025-06-01T18:00:00.000Z`.
pub fn now_str() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Body returned for single-message errors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body returned when a payload fails validation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ValidationErrorResponse {
    pub errors: Vec<String>,
}
