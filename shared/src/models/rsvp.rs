use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::validation::{non_blank_str, validate_rsvp};

/// A guest's attendance answer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    #[default]
    Yes,
    No,
    Maybe,
}

impl RsvpStatus {
    pub const ALL: [RsvpStatus; 3] = [RsvpStatus::Yes, RsvpStatus::No, RsvpStatus::Maybe];

    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Yes => "yes",
            RsvpStatus::No => "no",
            RsvpStatus::Maybe => "maybe",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored RSVP. RSVPs are append-only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Rsvp {
    pub id: String,
    pub invitation_id: String,
    pub name: String,
    pub email: Option<String>,
    pub status: RsvpStatus,
    pub message: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRsvp {
    pub name: String,
    pub email: Option<String>,
    pub status: RsvpStatus,
    pub message: Option<String>,
}

impl NewRsvp {
    pub fn from_payload(payload: &Value) -> Result<Self, Vec<String>> {
        let errors = validate_rsvp(payload);
        let status = payload
            .get("status")
            .and_then(Value::as_str)
            .and_then(RsvpStatus::parse);

        match (errors.is_empty(), status) {
            (true, Some(status)) => Ok(Self {
                name: non_blank_str(payload, "name").unwrap_or_default(),
                email: non_blank_str(payload, "email"),
                status,
                message: non_blank_str(payload, "message"),
            }),
            _ => Err(errors),
        }
    }

    pub fn into_rsvp(self, id: String, invitation_id: String, now: String) -> Rsvp {
        Rsvp {
            id,
            invitation_id,
            name: self.name,
            email: self.email,
            status: self.status,
            message: self.message,
            created_at: now,
        }
    }
}
