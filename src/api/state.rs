use std::sync::Arc;

use crate::application::RetrievalService;
use crate::infrastructure::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub retrieval: Arc<RetrievalService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(retrieval: Arc<RetrievalService>, config: AppConfig) -> Self {
        Self {
            retrieval,
            config: Arc::new(config),
        }
    }
}
