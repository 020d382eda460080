use labelcheck_core::domain::allergen::Allergen;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeScanRequest {
    /// Raw base64 or a `data:image/...;base64,` URL.
    #[validate(length(min = 1, message = "base64Image is required"))]
    pub base64_image: String,
    #[serde(default)]
    pub allergens: Vec<Allergen>,
}

/// Multipart layout of the upload endpoint, for the OpenAPI document only.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadScanForm {
    #[schema(format = Binary)]
    pub image: String,
    /// JSON array of allergens.
    pub allergens: Option<String>,
}
