//! Shared application state

use std::sync::Arc;

use crate::auth::{AuthState, Authenticator};
use crate::config::Config;
use crate::search::SearchBackend;

/// Everything handlers need, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub authenticator: Arc<Authenticator>,
    pub search: Arc<dyn SearchBackend>,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<Authenticator>,
        search: Arc<dyn SearchBackend>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            authenticator,
            search,
        }
    }

    /// State for the authorization middleware
    pub fn auth_state(&self) -> AuthState {
        AuthState::new(self.authenticator.clone(), self.config.required_role.as_str())
    }
}
