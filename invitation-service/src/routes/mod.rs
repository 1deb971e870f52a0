use axum::{
    extract::Request,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use invitely_shared::models::ErrorResponse;
use invitely_shared::store::{sqlite::SqliteInvitationStore, InvitationStore, StoreError};
use log::{info, warn};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};

use crate::config::Config;
use crate::error::AppError;
use crate::handlers::{
    health_handlers::health,
    invitation_handlers::{create_invitation, get_invitation, list_invitations},
    rsvp_handlers::{create_rsvp, get_rsvps},
};

/// Creates a router backed by the SQLite database named in `config`
pub async fn create_router(config: &Config) -> Result<Router, StoreError> {
    info!("Creating router with SQLite store");

    let store = Arc::new(SqliteInvitationStore::connect(&config.database_url).await?);

    Ok(create_router_with_store(store))
}

/// Creates a router with a given store implementation
pub fn create_router_with_store<S>(store: Arc<S>) -> Router
where
    S: InvitationStore + 'static,
{
    info!("Setting up API routes under /api");

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    // Logging middleware to trace all requests
    async fn logging_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> impl axum::response::IntoResponse {
        info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        next.run(req).await
    }

    // Unsupported methods on a known path are reported like unknown paths
    let api_routes = Router::new()
        .route(
            "/invitations",
            get(list_invitations::<S>)
                .post(create_invitation::<S>)
                .fallback(route_not_found),
        )
        .route(
            "/invitations/:id",
            get(get_invitation::<S>).fallback(route_not_found),
        )
        .route(
            "/invitations/:id/rsvp",
            post(create_rsvp::<S>).fallback(route_not_found),
        )
        .route(
            "/invitations/:id/rsvps",
            get(get_rsvps::<S>).fallback(route_not_found),
        )
        .with_state(store);

    Router::new()
        .route("/health", get(health).fallback(route_not_found))
        .nest("/api", api_routes)
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}

async fn route_not_found(req: Request) -> Response {
    warn!("No route matched for: {} {}", req.method(), req.uri());
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Route not found".to_string(),
        }),
    )
        .into_response()
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::internal(format!("Handler panicked: {}", detail)).into_response()
}
