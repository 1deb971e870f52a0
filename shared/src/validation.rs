//! Request body checks run before anything is persisted.
//!
//! Both validators work on the raw JSON body so that wrong types are
//! reported as field errors instead of deserialization failures.

use serde_json::Value;

use crate::models::{EventType, RsvpStatus};

/// Returns the trimmed string at `key`, or `None` if it is missing,
/// not a string, or blank.
pub fn non_blank_str(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Loose truthiness of a JSON value: `null`, `false`, `0` and `""` are falsy.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

pub fn validate_invitation(payload: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    if non_blank_str(payload, "title").is_none() {
        errors.push("title required".to_string());
    }
    if non_blank_str(payload, "host").is_none() {
        errors.push("host required".to_string());
    }
    if non_blank_str(payload, "startDateTime").is_none() {
        errors.push("startDateTime required (ISO string)".to_string());
    }

    let event_type = payload.get("eventType");
    if is_truthy(event_type)
        && event_type
            .and_then(Value::as_str)
            .and_then(EventType::parse)
            .is_none()
    {
        errors.push("eventType invalid".to_string());
    }

    let creator_email = payload.get("creatorEmail");
    if is_truthy(creator_email) && !creator_email.is_some_and(Value::is_string) {
        errors.push("creatorEmail must be string".to_string());
    }

    errors
}

pub fn validate_rsvp(payload: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    if non_blank_str(payload, "name").is_none() {
        errors.push("name required".to_string());
    }

    let status_ok = payload
        .get("status")
        .and_then(Value::as_str)
        .and_then(RsvpStatus::parse)
        .is_some();
    if !status_ok {
        errors.push("status must be yes|no|maybe".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_invitation_has_no_errors() {
        let payload = json!({
            "title": "Ann's Party",
            "host": "Ann",
            "startDateTime": "2025-06-01T18:00:00Z",
            "eventType": "birthday",
            "creatorEmail": "ann@example.com"
        });
        assert!(validate_invitation(&payload).is_empty());
    }

    #[test]
    fn test_missing_required_fields_are_all_reported() {
        let errors = validate_invitation(&json!({}));
        assert_eq!(
            errors,
            vec![
                "title required",
                "host required",
                "startDateTime required (ISO string)"
            ]
        );
    }

    #[test]
    fn test_non_object_payload_fails_required_fields() {
        assert_eq!(validate_invitation(&json!("title")).len(), 3);
        assert_eq!(validate_invitation(&Value::Null).len(), 3);
    }

    #[test]
    fn test_wrong_types_and_blank_strings_are_rejected() {
        let payload = json!({ "title": 42, "host": "   ", "startDateTime": ["2025"] });
        assert_eq!(validate_invitation(&payload).len(), 3);
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let payload = json!({ "title": "T", "host": "H", "startDateTime": "S", "eventType": "rave" });
        assert_eq!(validate_invitation(&payload), vec!["eventType invalid"]);

        let payload = json!({ "title": "T", "host": "H", "startDateTime": "S", "eventType": 7 });
        assert_eq!(validate_invitation(&payload), vec!["eventType invalid"]);
    }

    #[test]
    fn test_falsy_event_type_is_treated_as_absent() {
        for event_type in [json!(""), json!(null), json!(false), json!(0)] {
            let payload = json!({ "title": "T", "host": "H", "startDateTime": "S", "eventType": event_type });
            assert!(validate_invitation(&payload).is_empty());
        }
    }

    #[test]
    fn test_creator_email_must_be_string() {
        let payload = json!({ "title": "T", "host": "H", "startDateTime": "S", "creatorEmail": 12 });
        assert_eq!(validate_invitation(&payload), vec!["creatorEmail must be string"]);

        // Format is not checked
        let payload = json!({ "title": "T", "host": "H", "startDateTime": "S", "creatorEmail": "not-an-email" });
        assert!(validate_invitation(&payload).is_empty());
    }

    #[test]
    fn test_rsvp_validation() {
        assert!(validate_rsvp(&json!({ "name": "Bob", "status": "maybe" })).is_empty());
        assert_eq!(
            validate_rsvp(&json!({ "status": "no" })),
            vec!["name required"]
        );
        assert_eq!(
            validate_rsvp(&json!({ "name": "Bob" })),
            vec!["status must be yes|no|maybe"]
        );
        assert_eq!(validate_rsvp(&json!({ "name": "", "status": "nope" })).len(), 2);
    }
}
