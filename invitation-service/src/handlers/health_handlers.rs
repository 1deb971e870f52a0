use axum::Json;
use invitely_shared::models::now_str;
use once_cell::sync::Lazy;
use std::time::Instant;

use crate::models::HealthResponse;

/// Process start, forced in `main` before the listener binds.
pub static STARTED_AT: Lazy<Instant> = Lazy::new(Instant::now);

// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: STARTED_AT.elapsed().as_secs_f64().round() as u64,
        timestamp: now_str(),
    })
}
