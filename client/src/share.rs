use url::Url;

use crate::error::Result;

const INVITE_PARAM: &str = "invite";

/// Builds share links of the form `{app_url}?invite=<id>`.
#[derive(Debug, Clone)]
pub struct ShareLinks {
    app_url: Url,
}

impl ShareLinks {
    pub fn new(app_url: &str) -> Result<Self> {
        Ok(Self {
            app_url: Url::parse(app_url)?,
        })
    }

    pub fn link_for(&self, invitation_id: &str) -> String {
        let mut url = self.app_url.clone();
        url.set_fragment(None);
        url.query_pairs_mut()
            .clear()
            .append_pair(INVITE_PARAM, invitation_id);
        url.to_string()
    }
}

/// Reads the `invite` query parameter from a full URL or a bare query
/// string such as `?invite=abc`.
pub fn invite_id_from_location(location: &str) -> Option<String> {
    let location = location.trim();
    let query = match Url::parse(location) {
        Ok(url) => url.query()?.to_string(),
        Err(_) => location.split_once('?')?.1.to_string(),
    };

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == INVITE_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|id| !id.is_empty())
}

/// Accepts either a share link or a bare invitation id.
pub fn parse_invite_reference(input: &str) -> Option<String> {
    if let Some(id) = invite_id_from_location(input) {
        return Some(id);
    }

    let bare = input.trim();
    let looks_like_id = !bare.is_empty()
        && !bare.contains(['?', '/', '=', '&'])
        && !bare.chars().any(char::is_whitespace);
    looks_like_id.then(|| bare.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_for() {
        let links = ShareLinks::new("http://localhost:5173").unwrap();
        assert_eq!(
            links.link_for("abc-123"),
            "http://localhost:5173/?invite=abc-123"
        );
    }

    #[test]
    fn test_link_replaces_existing_query() {
        let links = ShareLinks::new("https://invite.example.com/app?tab=mine#top").unwrap();
        assert_eq!(
            links.link_for("a b"),
            "https://invite.example.com/app?invite=a+b"
        );
    }

    #[test]
    fn test_link_round_trip() {
        let links = ShareLinks::new("http://localhost:5173").unwrap();
        let link = links.link_for("8f14e45f-ceea-467f-a8f3-3c6d1e8b9a2b");
        assert_eq!(
            invite_id_from_location(&link).as_deref(),
            Some("8f14e45f-ceea-467f-a8f3-3c6d1e8b9a2b")
        );
    }

    #[test]
    fn test_invite_id_from_location() {
        assert_eq!(
            invite_id_from_location("?tab=view&invite=xyz").as_deref(),
            Some("xyz")
        );
        assert_eq!(invite_id_from_location("http://localhost:5173/"), None);
        assert_eq!(invite_id_from_location("http://localhost:5173/?invite="), None);
        assert_eq!(invite_id_from_location("xyz"), None);
    }

    #[test]
    fn test_parse_invite_reference() {
        assert_eq!(parse_invite_reference(" abc-123 ").as_deref(), Some("abc-123"));
        assert_eq!(
            parse_invite_reference("http://localhost:5173/?invite=abc-123").as_deref(),
            Some("abc-123")
        );
        assert_eq!(parse_invite_reference("http://localhost:5173/"), None);
        assert_eq!(parse_invite_reference("two words"), None);
        assert_eq!(parse_invite_reference(""), None);
    }
}
