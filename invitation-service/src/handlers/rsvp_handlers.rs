use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use invitely_shared::models::{now_str, NewRsvp, Rsvp};
use invitely_shared::store::InvitationStore;
use log::info;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::json_body;
use crate::error::{AppError, Result};

// POST /api/invitations/:id/rsvp
pub async fn create_rsvp<S>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Rsvp>)>
where
    S: InvitationStore,
{
    // The invitation must exist before the body is even looked at
    let invitation = store.get_invitation(&id).await?;

    let payload = json_body(payload)?;
    let new_rsvp = NewRsvp::from_payload(&payload).map_err(AppError::validation)?;

    let rsvp = new_rsvp.into_rsvp(Uuid::new_v4().to_string(), invitation.id, now_str());
    let created = store.create_rsvp(rsvp).await?;

    info!(
        "Recorded rsvp id={} status={} for invitation_id={}",
        created.id, created.status, created.invitation_id
    );

    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/invitations/:id/rsvps
pub async fn get_rsvps<S>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Rsvp>>>
where
    S: InvitationStore,
{
    let invitation = store.get_invitation(&id).await?;
    let rsvps = store.get_rsvps_for_invitation(&invitation.id).await?;
    Ok(Json(rsvps))
}
