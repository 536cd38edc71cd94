//! Shared request context for the HTTP layer.

use std::sync::Arc;

use crate::chat::ChatTurnHandler;
use crate::config::Config;
use crate::contact::{FormDelivery, FormDeliveryClient};
use crate::core_state::CoreState;
use crate::pipeline::analysis::{HostedModelClient, ImageAnalyzer};
use crate::places::{OverpassClient, PlacesService};
use crate::session::{IdentityClient, SessionVerifier};

/// Everything a handler needs, cloneable for axum state.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
    pub analyzer: Arc<ImageAnalyzer>,
    pub chat: Arc<ChatTurnHandler>,
    pub places: Arc<PlacesService>,
    pub contact: Arc<dyn FormDelivery>,
    pub sessions: Arc<dyn SessionVerifier>,
}

impl ApiContext {
    /// Wire up production clients from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            core: Arc::new(CoreState::new()),
            analyzer: Arc::new(ImageAnalyzer::new(HostedModelClient::from_config(config))),
            chat: Arc::new(ChatTurnHandler::new(HostedModelClient::from_config(config))),
            places: Arc::new(PlacesService::new(OverpassClient::from_config(config))),
            contact: Arc::new(FormDeliveryClient::from_config(config)),
            sessions: Arc::new(IdentityClient::from_config(config)),
        }
    }
}

/// The verified session injected by the auth middleware.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub display_name: String,
}
