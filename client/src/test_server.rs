//! In-process stand-in for the invitation service, backed by the mock store.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use invitely_shared::models::{now_str, NewInvitation, NewRsvp};
use invitely_shared::store::{InvitationStore, StoreError, INVITATION_LIST_LIMIT};
use invitely_shared::test_utils::mock_invitation_store::MockInvitationStore;
use invitely_shared::test_utils::test_logging::init_test_logging;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

type Reply = (StatusCode, Json<Value>);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id(prefix: &str) -> String {
    format!("{}-{}", prefix, NEXT_ID.fetch_add(1, Ordering::SeqCst))
}

fn store_error(err: StoreError) -> Reply {
    match err {
        StoreError::NotFound(message) => (StatusCode::NOT_FOUND, Json(json!({ "error": message }))),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        ),
    }
}

fn created<T: serde::Serialize>(value: T) -> Reply {
    (StatusCode::CREATED, Json(json!(value)))
}

fn ok<T: serde::Serialize>(value: T) -> Reply {
    (StatusCode::OK, Json(json!(value)))
}

async fn create_invitation(
    State(store): State<Arc<MockInvitationStore>>,
    Json(payload): Json<Value>,
) -> Reply {
    let new_invitation = match NewInvitation::from_payload(&payload) {
        Ok(new_invitation) => new_invitation,
        Err(errors) => return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))),
    };
    match store
        .create_invitation(new_invitation.into_invitation(next_id("inv"), now_str()))
        .await
    {
        Ok(invitation) => created(invitation),
        Err(err) => store_error(err),
    }
}

async fn list_invitations(
    State(store): State<Arc<MockInvitationStore>>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let result = match query.get("creatorEmail").filter(|e| !e.is_empty()) {
        Some(email) => {
            store
                .get_invitations_by_creator_email(email, INVITATION_LIST_LIMIT)
                .await
        }
        None => store.get_recent_invitations(INVITATION_LIST_LIMIT).await,
    };
    result.map(ok).unwrap_or_else(store_error)
}

async fn get_invitation(
    State(store): State<Arc<MockInvitationStore>>,
    Path(id): Path<String>,
) -> Reply {
    store
        .get_invitation(&id)
        .await
        .map(ok)
        .unwrap_or_else(store_error)
}

async fn create_rsvp(
    State(store): State<Arc<MockInvitationStore>>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Reply {
    if let Err(err) = store.get_invitation(&id).await {
        return store_error(err);
    }
    let new_rsvp = match NewRsvp::from_payload(&payload) {
        Ok(new_rsvp) => new_rsvp,
        Err(errors) => return (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))),
    };
    store
        .create_rsvp(new_rsvp.into_rsvp(next_id("rsvp"), id, now_str()))
        .await
        .map(created)
        .unwrap_or_else(store_error)
}

async fn get_rsvps(
    State(store): State<Arc<MockInvitationStore>>,
    Path(id): Path<String>,
) -> Reply {
    if let Err(err) = store.get_invitation(&id).await {
        return store_error(err);
    }
    store
        .get_rsvps_for_invitation(&id)
        .await
        .map(ok)
        .unwrap_or_else(store_error)
}

/// Solid teal PNG, served as a remote background.
pub(crate) fn background_png() -> Vec<u8> {
    let mut png = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 12, Rgb([0, 128, 128])))
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();
    png
}

/// Starts the stand-in on an ephemeral port and returns its base URL.
pub(crate) async fn spawn() -> (String, Arc<MockInvitationStore>) {
    init_test_logging();
    let store = Arc::new(MockInvitationStore::new());

    let app = Router::new()
        .route(
            "/health",
            get(|| async {
                Json(json!({ "status": "ok", "uptimeSeconds": 0, "timestamp": now_str() }))
            }),
        )
        .route(
            "/api/invitations",
            get(list_invitations).post(create_invitation),
        )
        .route("/api/invitations/:id", get(get_invitation))
        .route("/api/invitations/:id/rsvp", post(create_rsvp))
        .route("/api/invitations/:id/rsvps", get(get_rsvps))
        .route(
            "/assets/bg.png",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], background_png()) }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down").into_response() }),
        )
        .with_state(store.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), store)
}
