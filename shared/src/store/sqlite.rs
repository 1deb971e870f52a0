use async_trait::async_trait;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use super::{InvitationStore, Result, StoreError};
use crate::models::{EventType, Invitation, Rsvp, RsvpStatus};

const INVITATION_COLUMNS: &str = "id, title, host, description, location, start_datetime, \
     event_type, background_image_url, creator_email, created_at, updated_at";

const RSVP_COLUMNS: &str = "id, invitation_id, name, email, status, message, created_at";

#[derive(sqlx::FromRow)]
struct InvitationRow {
    id: String,
    title: String,
    host: String,
    description: Option<String>,
    location: Option<String>,
    start_datetime: String,
    event_type: String,
    background_image_url: String,
    creator_email: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<InvitationRow> for Invitation {
    fn from(row: InvitationRow) -> Self {
        Invitation {
            id: row.id,
            title: row.title,
            host: row.host,
            description: row.description,
            location: row.location,
            start_datetime: row.start_datetime,
            event_type: EventType::from_loose(&row.event_type),
            background_image_url: row.background_image_url,
            creator_email: row.creator_email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RsvpRow {
    id: String,
    invitation_id: String,
    name: String,
    email: Option<String>,
    status: String,
    message: Option<String>,
    created_at: String,
}

impl TryFrom<RsvpRow> for Rsvp {
    type Error = StoreError;

    fn try_from(row: RsvpRow) -> Result<Self> {
        let status = RsvpStatus::parse(&row.status).ok_or_else(|| {
            StoreError::Internal(format!("RSVP {} has invalid status '{}'", row.id, row.status))
        })?;

        Ok(Rsvp {
            id: row.id,
            invitation_id: row.invitation_id,
            name: row.name,
            email: row.email,
            status,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

/// SQLite-backed store. The schema is created by the versioned
/// migrations in `shared/migrations`.
#[derive(Clone)]
pub struct SqliteInvitationStore {
    pool: SqlitePool,
}

impl SqliteInvitationStore {
    /// Opens (creating if needed) the database at `database_url` and runs
    /// pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to SQLite database at {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// A private in-memory database. The pool holds exactly one connection
    /// that never expires, since the data lives only as long as it does.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<()> {
        debug!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl InvitationStore for SqliteInvitationStore {
    async fn create_invitation(&self, invitation: Invitation) -> Result<Invitation> {
        let sql = format!(
            "INSERT INTO invitations ({INVITATION_COLUMNS}) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );

        sqlx::query(&sql)
            .bind(&invitation.id)
            .bind(&invitation.title)
            .bind(&invitation.host)
            .bind(invitation.description.as_deref())
            .bind(invitation.location.as_deref())
            .bind(&invitation.start_datetime)
            .bind(invitation.event_type.as_str())
            .bind(&invitation.background_image_url)
            .bind(invitation.creator_email.as_deref())
            .bind(&invitation.created_at)
            .bind(&invitation.updated_at)
            .execute(&self.pool)
            .await?;

        debug!("Inserted invitation id={}", invitation.id);
        Ok(invitation)
    }

    async fn get_invitation(&self, id: &str) -> Result<Invitation> {
        let sql = format!("SELECT {INVITATION_COLUMNS} FROM invitations WHERE id = ?");

        sqlx::query_as::<_, InvitationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Invitation::from)
            .ok_or_else(|| StoreError::NotFound("Invitation not found".to_string()))
    }

    async fn get_recent_invitations(&self, limit: u32) -> Result<Vec<Invitation>> {
        let sql = format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations \
             ORDER BY created_at DESC, rowid DESC LIMIT ?"
        );

        let rows = sqlx::query_as::<_, InvitationRow>(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Invitation::from).collect())
    }

    async fn get_invitations_by_creator_email(
        &self,
        creator_email: &str,
        limit: u32,
    ) -> Result<Vec<Invitation>> {
        let sql = format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE creator_email = ? \
             ORDER BY created_at DESC, rowid DESC LIMIT ?"
        );

        let rows = sqlx::query_as::<_, InvitationRow>(&sql)
            .bind(creator_email)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Invitation::from).collect())
    }

    async fn delete_invitation(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Invitation not found".to_string()));
        }
        Ok(())
    }

    async fn create_rsvp(&self, rsvp: Rsvp) -> Result<Rsvp> {
        let sql = format!("INSERT INTO rsvps ({RSVP_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)");

        let result = sqlx::query(&sql)
            .bind(&rsvp.id)
            .bind(&rsvp.invitation_id)
            .bind(&rsvp.name)
            .bind(rsvp.email.as_deref())
            .bind(rsvp.status.as_str())
            .bind(rsvp.message.as_deref())
            .bind(&rsvp.created_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                debug!(
                    "Inserted rsvp id={} for invitation_id={}",
                    rsvp.id, rsvp.invitation_id
                );
                Ok(rsvp)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Err(StoreError::NotFound("Invitation not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_rsvps_for_invitation(&self, invitation_id: &str) -> Result<Vec<Rsvp>> {
        let sql = format!(
            "SELECT {RSVP_COLUMNS} FROM rsvps WHERE invitation_id = ? \
             ORDER BY created_at ASC, rowid ASC"
        );

        let rows = sqlx::query_as::<_, RsvpRow>(&sql)
            .bind(invitation_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Rsvp::try_from).collect()
    }
}
