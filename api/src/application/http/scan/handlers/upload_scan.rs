use axum::extract::{Multipart, State};
use labelcheck_core::domain::{
    allergen::Allergen,
    scan::{
        entities::ScanResponse,
        ports::ScanService,
        value_objects::{AnalyzeScanInput, ScanImage},
    },
};

use crate::application::http::{
    scan::validators::UploadScanForm,
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/analyze/upload",
    tag = "scan",
    summary = "Analyze an uploaded food label",
    description = "Same as `/analyze`, with the photo sent as a multipart file",
    request_body(content = UploadScanForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = ScanResponse),
        (status = 400, body = ApiErrorResponse),
        (status = 502, body = ApiErrorResponse)
    ),
)]
pub async fn upload_scan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response<ScanResponse>, ApiError> {
    let mut image: Option<ScanImage> = None;
    let mut allergens: Vec<Allergen> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "image" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;

                image = Some(ScanImage::from_bytes(data.to_vec())?);
            }
            "allergens" => {
                let value = field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read allergens: {}", e))
                })?;

                if !value.trim().is_empty() {
                    allergens = serde_json::from_str(&value).map_err(|e| {
                        ApiError::BadRequest(format!("Invalid allergens: {}", e))
                    })?;
                }
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| ApiError::BadRequest("Missing image field".to_string()))?;

    let result = state
        .service
        .analyze_scan(AnalyzeScanInput { image, allergens })
        .await?;

    Ok(Response::OK(result))
}
