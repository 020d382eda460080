use crate::domain::scan::ports::LLMClient;

#[derive(Clone)]
pub struct Service<LLM>
where
    LLM: LLMClient,
{
    pub(crate) llm_client: LLM,
    pub(crate) llm_timeout: std::time::Duration,
}

impl<LLM> Service<LLM>
where
    LLM: LLMClient,
{
    pub fn new(llm_client: LLM, llm_timeout: std::time::Duration) -> Self {
        Self {
            llm_client,
            llm_timeout,
        }
    }
}
