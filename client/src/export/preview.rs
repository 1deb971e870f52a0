use chrono::{DateTime, NaiveDateTime};
use invitely_shared::backgrounds::default_background_for;
use invitely_shared::models::{EventType, Invitation};

use crate::state::InvitationDraft;

pub const PLACEHOLDER_TITLE: &str = "Your Event Title";

const START_FORMAT: &str = "%a, %b %-d, %Y %-I:%M %p";

/// What the invitation card shows, whether it comes from the form or
/// from a stored invitation.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewCard {
    pub title: String,
    pub host: Option<String>,
    pub start: Option<String>,
    pub location: Option<String>,
    pub event_type: EventType,
    pub background: String,
}

impl PreviewCard {
    pub fn from_draft(draft: &InvitationDraft) -> Self {
        Self {
            title: draft.title.trim().to_string(),
            host: non_blank(&draft.host),
            start: non_blank(&draft.start_date_time),
            location: non_blank(&draft.location),
            event_type: draft.event_type,
            background: non_blank(&draft.background_image_url)
                .unwrap_or_else(|| default_background_for(draft.event_type).to_string()),
        }
    }

    pub fn from_invitation(invitation: &Invitation) -> Self {
        Self {
            title: invitation.title.clone(),
            host: non_blank(&invitation.host),
            start: non_blank(&invitation.start_datetime),
            location: invitation.location.as_deref().and_then(non_blank),
            event_type: invitation.event_type,
            background: non_blank(&invitation.background_image_url)
                .unwrap_or_else(|| default_background_for(invitation.event_type).to_string()),
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            PLACEHOLDER_TITLE
        } else {
            &self.title
        }
    }

    /// Host, start and location lines, in card order.
    pub fn detail_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(host) = &self.host {
            lines.push(format!("Hosted by {}", host));
        }
        if let Some(start) = &self.start {
            lines.push(format_start(start));
        }
        if let Some(location) = &self.location {
            lines.push(location.clone());
        }
        lines
    }

    pub fn badge_label(&self) -> String {
        self.event_type.label()
    }
}

/// Human readable start time. Values that do not parse are shown as typed.
pub fn format_start(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(START_FORMAT).to_string();
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.format(START_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
