//! Service container for dependency injection
//!
//! Wires up the control-plane client factory from the loaded settings.

use std::sync::Arc;

use crate::config::Settings;
use crate::infrastructure::traits::{ClientFactory, HttpClientFactory};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Control-plane client factory
    pub clients: Arc<dyn ClientFactory>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let clients = Arc::new(HttpClientFactory::new(Arc::new(settings)));

        Self { clients }
    }
}
