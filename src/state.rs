use std::sync::Arc;

use crate::{config::AppConfig, store::DocumentStore};

#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub config: Arc<AppConfig>,
}
