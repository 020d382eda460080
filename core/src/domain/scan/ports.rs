use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    scan::{
        entities::ScanResponse,
        value_objects::{AnalyzeScanInput, ScanImage},
    },
};

/// LLM Client trait for calling multimodal AI models
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    /// Sends one prompt plus image and returns the model's raw text reply.
    fn generate_with_image(
        &self,
        prompt: String,
        image: ScanImage,
        response_schema: serde_json::Value,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Service trait for label scanning
#[cfg_attr(test, mockall::automock)]
pub trait ScanService: Send + Sync {
    fn analyze_scan(
        &self,
        input: AnalyzeScanInput,
    ) -> impl Future<Output = Result<ScanResponse, CoreError>> + Send;
}
