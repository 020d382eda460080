use crate::{
    domain::common::{LabelCheckConfig, entities::app_errors::CoreError, services::Service},
    infrastructure::llm::OpenAiLLMClient,
};

pub type LabelCheckService = Service<OpenAiLLMClient>;

pub fn create_service(config: LabelCheckConfig) -> Result<LabelCheckService, CoreError> {
    if config.llm.api_key.trim().is_empty() {
        return Err(CoreError::ValidationError(
            "LLM API key is required".to_string(),
        ));
    }

    let llm_client = OpenAiLLMClient::new(&config.llm);

    Ok(Service::new(llm_client, config.llm.timeout))
}
