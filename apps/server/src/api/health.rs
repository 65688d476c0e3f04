use axum::{routing::get, Json, Router};

use crate::models::HealthStatus;

#[utoipa::path(get, path = "/", responses((status = 200, description = "Service banner", body = String)))]
pub async fn banner() -> &'static str {
    concat!("Driftfolio API v", env!("CARGO_PKG_VERSION"))
}

#[utoipa::path(get, path = "/health", responses((status = 200, body = HealthStatus)))]
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
}
