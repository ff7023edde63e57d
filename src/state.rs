use std::sync::Arc;

use crate::access::{IdentityProvider, StaticIdentityProvider};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            sessions: SessionStore::new(),
            identity,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(StaticIdentityProvider::new()))
    }
}
