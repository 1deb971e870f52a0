use async_trait::async_trait;
use log::debug;
use tokio::sync::Mutex;

use crate::models::{Invitation, Rsvp};
use crate::store::{InvitationStore, Result, StoreError};

/// In-memory store with the same ordering and cascade rules as the
/// SQLite store.
#[derive(Default)]
pub struct MockInvitationStore {
    invitations: Mutex<Vec<Invitation>>,
    rsvps: Mutex<Vec<Rsvp>>,
}

impl MockInvitationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn invitation_count(&self) -> usize {
        self.invitations.lock().await.len()
    }

    /// Newest first; later inserts win ties on `created_at`.
    fn newest_first<'a>(
        invitations: impl DoubleEndedIterator<Item = &'a Invitation>,
        limit: u32,
    ) -> Vec<Invitation> {
        let mut sorted: Vec<Invitation> = invitations.rev().cloned().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted.truncate(limit as usize);
        sorted
    }
}

#[async_trait]
impl InvitationStore for MockInvitationStore {
    async fn create_invitation(&self, invitation: Invitation) -> Result<Invitation> {
        let mut invitations = self.invitations.lock().await;
        if invitations.iter().any(|i| i.id == invitation.id) {
            return Err(StoreError::Internal(format!(
                "Duplicate invitation id {}",
                invitation.id
            )));
        }
        debug!("Mock store: inserting invitation id={}", invitation.id);
        invitations.push(invitation.clone());
        Ok(invitation)
    }

    async fn get_invitation(&self, id: &str) -> Result<Invitation> {
        self.invitations
            .lock()
            .await
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("Invitation not found".to_string()))
    }

    async fn get_recent_invitations(&self, limit: u32) -> Result<Vec<Invitation>> {
        let invitations = self.invitations.lock().await;
        Ok(Self::newest_first(invitations.iter(), limit))
    }

    async fn get_invitations_by_creator_email(
        &self,
        creator_email: &str,
        limit: u32,
    ) -> Result<Vec<Invitation>> {
        let invitations = self.invitations.lock().await;
        let matching: Vec<&Invitation> = invitations
            .iter()
            .filter(|i| i.creator_email.as_deref() == Some(creator_email))
            .collect();
        Ok(Self::newest_first(matching.into_iter(), limit))
    }

    async fn delete_invitation(&self, id: &str) -> Result<()> {
        let mut invitations = self.invitations.lock().await;
        let before = invitations.len();
        invitations.retain(|i| i.id != id);
        if invitations.len() == before {
            return Err(StoreError::NotFound("Invitation not found".to_string()));
        }
        self.rsvps.lock().await.retain(|r| r.invitation_id != id);
        Ok(())
    }

    async fn create_rsvp(&self, rsvp: Rsvp) -> Result<Rsvp> {
        let invitations = self.invitations.lock().await;
        if !invitations.iter().any(|i| i.id == rsvp.invitation_id) {
            return Err(StoreError::NotFound("Invitation not found".to_string()));
        }
        self.rsvps.lock().await.push(rsvp.clone());
        Ok(rsvp)
    }

    async fn get_rsvps_for_invitation(&self, invitation_id: &str) -> Result<Vec<Rsvp>> {
        let mut rsvps: Vec<Rsvp> = self
            .rsvps
            .lock()
            .await
            .iter()
            .filter(|r| r.invitation_id == invitation_id)
            .cloned()
            .collect();
        rsvps.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rsvps)
    }
}
