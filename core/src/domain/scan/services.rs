use tracing::{error, info, instrument};

use crate::domain::{
    allergen::{Allergen, selected_allergens},
    common::{entities::app_errors::CoreError, services::Service},
    scan::{
        entities::{ScanAnalysis, ScanResponse},
        ports::{LLMClient, ScanService},
        prompt::build_scan_prompt,
        refiner::refine,
        reply::parse_scan_reply,
        schema::get_scan_analysis_schema,
        value_objects::{AnalyzeScanInput, ScanImage},
    },
};

impl<LLM> Service<LLM>
where
    LLM: LLMClient,
{
    /// Asks the vision model about one label. Makes exactly one call; a
    /// timeout or transport failure is a `ServiceError`.
    pub async fn request_analysis(
        &self,
        allergens: &[Allergen],
        image: ScanImage,
    ) -> Result<ScanAnalysis, CoreError> {
        let prompt = build_scan_prompt(allergens);

        let raw_response = tokio::time::timeout(
            self.llm_timeout,
            self.llm_client
                .generate_with_image(prompt, image, get_scan_analysis_schema()),
        )
        .await
        .map_err(|_| {
            error!("LLM call timed out after {:?}", self.llm_timeout);
            CoreError::ServiceError(format!(
                "LLM call timed out after {} seconds",
                self.llm_timeout.as_secs()
            ))
        })??;

        parse_scan_reply(&raw_response)
    }
}

impl<LLM> ScanService for Service<LLM>
where
    LLM: LLMClient,
{
    #[instrument(
        skip(self, input),
        fields(
            image_digest = %input.image.digest(),
            image_bytes = input.image.len(),
            allergens = input.allergens.len()
        )
    )]
    async fn analyze_scan(&self, input: AnalyzeScanInput) -> Result<ScanResponse, CoreError> {
        let allergens = selected_allergens(&input.allergens);

        info!(
            "Processing scan with {} selected allergens: {}",
            allergens.len(),
            allergens
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let analysis = self.request_analysis(&allergens, input.image).await?;
        let response = refine(analysis, &allergens);

        info!(
            verdict = ?response.verdict(),
            findings = response.detected_allergens.len(),
            "scan analyzed"
        );

        Ok(response)
    }
}
