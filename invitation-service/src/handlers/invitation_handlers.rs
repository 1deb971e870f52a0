use axum::{
    extract::{rejection::JsonRejection, Path, RawQuery, State},
    http::StatusCode,
    Json,
};
use invitely_shared::models::{now_str, Invitation, NewInvitation};
use invitely_shared::store::{InvitationStore, INVITATION_LIST_LIMIT};
use log::{debug, info};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::json_body;
use crate::error::{AppError, Result};
use crate::models::ListInvitationsQuery;

// POST /api/invitations
pub async fn create_invitation<S>(
    State(store): State<Arc<S>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Invitation>)>
where
    S: InvitationStore,
{
    let payload = json_body(payload)?;

    let new_invitation = NewInvitation::from_payload(&payload).map_err(|errors| {
        debug!("Rejected invitation payload: {:?}", errors);
        AppError::validation(errors)
    })?;

    let invitation = new_invitation.into_invitation(Uuid::new_v4().to_string(), now_str());
    let created = store.create_invitation(invitation).await?;

    info!(
        "Created invitation id={}, event_type={}",
        created.id, created.event_type
    );

    Ok((StatusCode::CREATED, Json(created)))
}

// GET /api/invitations?creatorEmail=
pub async fn list_invitations<S>(
    State(store): State<Arc<S>>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<Invitation>>>
where
    S: InvitationStore,
{
    let query = ListInvitationsQuery::from_raw(raw_query.as_deref());
    let invitations = match query.creator_filter() {
        Some(creator_email) => {
            store
                .get_invitations_by_creator_email(creator_email, INVITATION_LIST_LIMIT)
                .await?
        }
        None => store.get_recent_invitations(INVITATION_LIST_LIMIT).await?,
    };

    debug!("Listing {} invitations", invitations.len());
    Ok(Json(invitations))
}

// GET /api/invitations/:id
pub async fn get_invitation<S>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<Invitation>>
where
    S: InvitationStore,
{
    let invitation = store.get_invitation(&id).await?;
    Ok(Json(invitation))
}
