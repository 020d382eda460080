use std::sync::Arc;

use labelcheck_core::application::LabelCheckService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: LabelCheckService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: LabelCheckService) -> Self {
        Self { args, service }
    }
}
