use crate::config::AppConfig;
use crate::document::InvoiceRenderer;
use crate::invoice::SessionStore;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub renderer: InvoiceRenderer,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            sessions: SessionStore::new(config.session_idle, config.session_capacity),
            renderer: InvoiceRenderer::new(config.issuer.clone()),
        }
    }
}
