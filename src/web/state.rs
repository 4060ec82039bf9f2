use std::sync::Arc;

use crate::service::SentimentService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SentimentService>,
}

impl AppState {
    pub fn new(service: Arc<SentimentService>) -> Self {
        Self { service }
    }
}
