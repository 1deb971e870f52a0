use url::Url;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000";
pub const DEFAULT_APP_URL: &str = "http://localhost:5173";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Where the invitation service is reachable.
    pub api_base_url: String,
    /// Base of the share links handed out to guests.
    pub app_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            app_url: DEFAULT_APP_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_base_url: non_empty("API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            app_url: non_empty("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
        }
    }
}

/// Endpoint URLs of the invitation service.
#[derive(Debug, Clone)]
pub struct ApiRoutes {
    base: Url,
}

impl ApiRoutes {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { base })
    }

    pub fn health(&self) -> Url {
        self.endpoint(&["health"])
    }

    pub fn invitations(&self) -> Url {
        self.endpoint(&["api", "invitations"])
    }

    pub fn invitation_by_id(&self, id: &str) -> Url {
        self.endpoint(&["api", "invitations", id])
    }

    pub fn rsvps_for_invitation(&self, id: &str) -> Url {
        self.endpoint(&["api", "invitations", id, "rsvps"])
    }

    pub fn create_rsvp(&self, id: &str) -> Url {
        self.endpoint(&["api", "invitations", id, "rsvp"])
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
