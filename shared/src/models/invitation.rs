use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::EventType;
use crate::backgrounds::default_background_for;
use crate::validation::{non_blank_str, validate_invitation};

/// A stored invitation, serialized with its column names.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Invitation {
    pub id: String,
    pub title: String,
    pub host: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_datetime: String,
    pub event_type: EventType,
    pub background_image_url: String,
    pub creator_email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated and normalized invitation fields, before the server assigns
/// an id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvitation {
    pub title: String,
    pub host: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_datetime: String,
    pub event_type: EventType,
    pub background_image_url: String,
    pub creator_email: Option<String>,
}

impl NewInvitation {
    /// Validates a raw request body and applies the field defaults:
    /// strings are trimmed (blank optionals become `None`), a missing
    /// event type becomes `other` and a missing background is derived
    /// from the event type.
    pub fn from_payload(payload: &Value) -> Result<Self, Vec<String>> {
        let errors = validate_invitation(payload);
        if !errors.is_empty() {
            return Err(errors);
        }

        let event_type = payload
            .get("eventType")
            .and_then(Value::as_str)
            .map(EventType::from_loose)
            .unwrap_or_default();

        let background_image_url = non_blank_str(payload, "backgroundImageUrl")
            .unwrap_or_else(|| default_background_for(event_type).to_string());

        Ok(Self {
            title: non_blank_str(payload, "title").unwrap_or_default(),
            host: non_blank_str(payload, "host").unwrap_or_default(),
            description: non_blank_str(payload, "description"),
            location: non_blank_str(payload, "location"),
            start_datetime: non_blank_str(payload, "startDateTime").unwrap_or_default(),
            event_type,
            background_image_url,
            creator_email: non_blank_str(payload, "creatorEmail"),
        })
    }

    pub fn into_invitation(self, id: String, now: String) -> Invitation {
        Invitation {
            id,
            title: self.title,
            host: self.host,
            description: self.description,
            location: self.location,
            start_datetime: self.start_datetime,
            event_type: self.event_type,
            background_image_url: self.background_image_url,
            creator_email: self.creator_email,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_payload_trims_and_defaults() {
        let payload = json!({
            "title": "  Ann's Party ",
            "host": "Ann",
            "startDateTime": "2025-06-01T18:00:00Z",
            "location": "   ",
            "description": " Cake! "
        });

        let new_inv = NewInvitation::from_payload(&payload).unwrap();
        assert_eq!(new_inv.title, "Ann's Party");
        assert_eq!(new_inv.location, None);
        assert_eq!(new_inv.description.as_deref(), Some("Cake!"));
        assert_eq!(new_inv.event_type, EventType::Other);
        assert_eq!(
            new_inv.background_image_url,
            default_background_for(EventType::Other)
        );
        assert_eq!(new_inv.creator_email, None);
    }

    #[test]
    fn test_from_payload_derives_background_from_event_type() {
        let payload = json!({
            "title": "Grad",
            "host": "Kim",
            "startDateTime": "2025-06-01",
            "eventType": "graduation"
        });

        let new_inv = NewInvitation::from_payload(&payload).unwrap();
        assert_eq!(new_inv.event_type, EventType::Graduation);
        assert_eq!(
            new_inv.background_image_url,
            "linear-gradient(135deg,#93c5fd,#1d4ed8)"
        );
    }

    #[test]
    fn test_from_payload_keeps_explicit_background() {
        let payload = json!({
            "title": "Wed",
            "host": "Jo",
            "startDateTime": "2025-06-01",
            "eventType": "wedding",
            "backgroundImageUrl": "https://img.example/bg.png"
        });

        let new_inv = NewInvitation::from_payload(&payload).unwrap();
        assert_eq!(new_inv.background_image_url, "https://img.example/bg.png");
    }

    #[test]
    fn test_from_payload_rejects_invalid() {
        let errors = NewInvitation::from_payload(&json!({ "host": "Ann" })).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "title required".to_string(),
                "startDateTime required (ISO string)".to_string()
            ]
        );
    }

    #[test]
    fn test_into_invitation_sets_both_timestamps() {
        let payload = json!({ "title": "T", "host": "H", "startDateTime": "S" });
        let inv = NewInvitation::from_payload(&payload)
            .unwrap()
            .into_invitation("id-1".into(), "2025-01-01T00:00:00.000Z".into());
        assert_eq!(inv.id, "id-1");
        assert_eq!(inv.created_at, inv.updated_at);
    }
}
