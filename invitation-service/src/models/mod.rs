use serde::Serialize;
use url::form_urlencoded;

// Query DTOs
#[derive(Debug, Default, PartialEq)]
pub struct ListInvitationsQuery {
    pub creator_email: Option<String>,
}

impl ListInvitationsQuery {
    /// Reads `creatorEmail` from a raw query string. When the parameter is
    /// repeated the first value is used.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let creator_email = raw.and_then(|raw| {
            form_urlencoded::parse(raw.as_bytes())
                .find(|(key, _)| key == "creatorEmail")
                .map(|(_, value)| value.into_owned())
        });
        Self { creator_email }
    }

    /// The creator filter, if one was given. An empty value means no filter.
    pub fn creator_filter(&self) -> Option<&str> {
        self.creator_email.as_deref().filter(|email| !email.is_empty())
    }
}

// Response DTOs
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
}
