use std::sync::Arc;

use crate::auth::AuthSettings;
use crate::repository::Store;

/// Shared application state, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth: AuthSettings,
}

impl AppState {
    pub fn new<S: Store + 'static>(store: S, auth: AuthSettings) -> Self {
        Self {
            store: Arc::new(store),
            auth,
        }
    }
}
