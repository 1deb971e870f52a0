use invitely_shared::models::{Invitation, Rsvp};
use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::ApiRoutes;
use crate::error::{ClientError, Result};
use crate::state::{InvitationDraft, RsvpDraft};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
}

/// Typed wrapper around the invitation service endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    routes: ApiRoutes,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            routes: ApiRoutes::new(base_url)?,
        })
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.send(self.http.get(self.routes.health())).await
    }

    pub async fn create_invitation(&self, draft: &InvitationDraft) -> Result<Invitation> {
        self.send(self.http.post(self.routes.invitations()).json(draft))
            .await
    }

    /// Lists the most recent invitations, optionally only those created
    /// with `creator_email`.
    pub async fn list_invitations(&self, creator_email: Option<&str>) -> Result<Vec<Invitation>> {
        let mut url = self.routes.invitations();
        if let Some(email) = creator_email.map(str::trim).filter(|e| !e.is_empty()) {
            url.query_pairs_mut().append_pair("creatorEmail", email);
        }
        self.send(self.http.get(url)).await
    }

    pub async fn get_invitation(&self, id: &str) -> Result<Invitation> {
        self.send(self.http.get(self.routes.invitation_by_id(id)))
            .await
    }

    pub async fn list_rsvps(&self, invitation_id: &str) -> Result<Vec<Rsvp>> {
        self.send(self.http.get(self.routes.rsvps_for_invitation(invitation_id)))
            .await
    }

    pub async fn create_rsvp(&self, invitation_id: &str, draft: &RsvpDraft) -> Result<Rsvp> {
        self.send(
            self.http
                .post(self.routes.create_rsvp(invitation_id))
                .json(draft),
        )
        .await
    }

    /// Downloads a remote background image for the PDF export.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(url)?;
        let response = self.http.get(url).send().await?;
        let response = error_for_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        debug!("{} {}", response.status(), response.url());
        let response = error_for_status(response).await?;
        Ok(response.json::<T>().await?)
    }
}

async fn error_for_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    // Error bodies are best effort; a non-JSON body still yields "Status N"
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    Err(ClientError::from_response_body(status.as_u16(), &body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server;
    use invitely_shared::models::{EventType, RsvpStatus};

    fn party_draft() -> InvitationDraft {
        InvitationDraft {
            title: "Ann's Party".to_string(),
            host: "Ann".to_string(),
            start_date_time: "2025-06-01T18:00:00Z".to_string(),
            creator_email: "ann@example.com".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_health() {
        let (base, _store) = test_server::spawn().await;
        let client = ApiClient::new(&base).unwrap();

        let health = client.health().await.unwrap();
        assert_eq!(health.status, "ok");
    }

    #[tokio::test]
    async fn test_create_and_get_invitation() {
        let (base, _store) = test_server::spawn().await;
        let client = ApiClient::new(&base).unwrap();

        let created = client.create_invitation(&party_draft()).await.unwrap();
        assert_eq!(created.title, "Ann's Party");
        assert_eq!(created.event_type, EventType::Other);

        let fetched = client.get_invitation(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_validation_error_is_typed() {
        let (base, store) = test_server::spawn().await;
        let client = ApiClient::new(&base).unwrap();

        let err = client
            .create_invitation(&InvitationDraft::default())
            .await
            .unwrap_err();
        match err {
            ClientError::Validation(errors) => assert_eq!(
                errors,
                vec![
                    "title required",
                    "host required",
                    "startDateTime required (ISO string)"
                ]
            ),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.invitation_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_invitation_is_not_found() {
        let (base, _store) = test_server::spawn().await;
        let client = ApiClient::new(&base).unwrap();

        let err = client.get_invitation("nope").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
        assert_eq!(err.to_string(), "Invitation not found");
    }

    #[tokio::test]
    async fn test_list_with_creator_filter() {
        let (base, _store) = test_server::spawn().await;
        let client = ApiClient::new(&base).unwrap();

        client.create_invitation(&party_draft()).await.unwrap();
        let other = InvitationDraft {
            creator_email: "bob@example.com".to_string(),
            ..party_draft()
        };
        client.create_invitation(&other).await.unwrap();

        let mine = client
            .list_invitations(Some("ann@example.com"))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].creator_email.as_deref(), Some("ann@example.com"));

        // A blank filter lists everything
        let all = client.list_invitations(Some("  ")).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_rsvp_round_trip() {
        let (base, _store) = test_server::spawn().await;
        let client = ApiClient::new(&base).unwrap();
        let invitation = client.create_invitation(&party_draft()).await.unwrap();

        let draft = RsvpDraft {
            name: "Bob".to_string(),
            ..Default::default()
        };
        let rsvp = client.create_rsvp(&invitation.id, &draft).await.unwrap();
        assert_eq!(rsvp.invitation_id, invitation.id);
        assert_eq!(rsvp.status, RsvpStatus::Yes);

        let rsvps = client.list_rsvps(&invitation.id).await.unwrap();
        assert_eq!(rsvps, vec![rsvp]);
    }

    #[tokio::test]
    async fn test_fetch_bytes() {
        let (base, _store) = test_server::spawn().await;
        let client = ApiClient::new(&base).unwrap();

        let bytes = client
            .fetch_bytes(&format!("{}/assets/bg.png", base))
            .await
            .unwrap();
        assert_eq!(bytes, test_server::background_png());

        let err = client
            .fetch_bytes(&format!("{}/broken", base))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 502, .. }));
        assert_eq!(err.to_string(), "Status 502");
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        assert!(matches!(
            client.health().await,
            Err(ClientError::Http(_))
        ));
    }
}
