use axum::extract::State;
use labelcheck_core::domain::scan::{
    entities::ScanResponse,
    ports::ScanService,
    value_objects::{AnalyzeScanInput, ScanImage},
};

use crate::application::http::{
    scan::validators::AnalyzeScanRequest,
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/analyze",
    tag = "scan",
    summary = "Analyze a food label",
    description = "Checks a photographed ingredients list against the user's allergens. An unreadable photo yields `isSafe: null` with retake guidance.",
    request_body = AnalyzeScanRequest,
    responses(
        (status = 200, body = ScanResponse),
        (status = 400, body = ApiErrorResponse),
        (status = 502, body = ApiErrorResponse)
    ),
)]
pub async fn analyze_scan(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<AnalyzeScanRequest>,
) -> Result<Response<ScanResponse>, ApiError> {
    let image = ScanImage::from_base64(&payload.base64_image)?;

    let result = state
        .service
        .analyze_scan(AnalyzeScanInput {
            image,
            allergens: payload.allergens,
        })
        .await?;

    Ok(Response::OK(result))
}
