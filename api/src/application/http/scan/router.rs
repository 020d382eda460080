use axum::{Router, extract::DefaultBodyLimit, routing::post};
use utoipa::OpenApi;

use super::handlers::{
    analyze_scan::{__path_analyze_scan, analyze_scan},
    upload_scan::{__path_upload_scan, upload_scan},
};
use crate::application::http::server::app_state::AppState;

/// A 10 MiB image grows by a third as base64, plus the allergen list.
const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(paths(analyze_scan, upload_scan))]
pub struct ScanApiDoc;

pub fn scan_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/api/analyze", state.args.server.root_path),
            post(analyze_scan),
        )
        .route(
            &format!("{}/api/analyze/upload", state.args.server.root_path),
            post(upload_scan),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
}
