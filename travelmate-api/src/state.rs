use std::sync::Arc;

use travelmate_store::UserStore;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub auth: AuthConfig,
    pub client_origin: String,
}
