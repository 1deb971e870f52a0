use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Invitation, Rsvp};

pub mod sqlite;

/// Maximum number of invitations returned by a list query.
pub const INVITATION_LIST_LIMIT: u32 = 50;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Internal store error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence for invitations and their RSVPs.
///
/// Each method is a single read or a single write.
#[async_trait]
pub trait InvitationStore: Send + Sync {
    async fn create_invitation(&self, invitation: Invitation) -> Result<Invitation>;

    /// Fails with [`StoreError::NotFound`] if no invitation has this id.
    async fn get_invitation(&self, id: &str) -> Result<Invitation>;

    /// Newest first, at most `limit` rows.
    async fn get_recent_invitations(&self, limit: u32) -> Result<Vec<Invitation>>;

    /// Exact, case-sensitive match on `creator_email`. Newest first.
    async fn get_invitations_by_creator_email(
        &self,
        creator_email: &str,
        limit: u32,
    ) -> Result<Vec<Invitation>>;

    /// Removes the invitation and, through the foreign key, its RSVPs.
    /// Not reachable over HTTP.
    async fn delete_invitation(&self, id: &str) -> Result<()>;

    /// Fails with [`StoreError::NotFound`] if the invitation does not exist.
    async fn create_rsvp(&self, rsvp: Rsvp) -> Result<Rsvp>;

    /// Oldest first.
    async fn get_rsvps_for_invitation(&self, invitation_id: &str) -> Result<Vec<Rsvp>>;
}
