use axum::{Router, routing::get};
use utoipa::OpenApi;

use super::handlers::{__path_health, health};
use crate::application::http::server::app_state::AppState;

#[derive(OpenApi)]
#[openapi(paths(health))]
pub struct HealthApiDoc;

pub fn health_routes(root_path: &str) -> Router<AppState> {
    Router::new().route(&format!("{}/api/health", root_path), get(health))
}
