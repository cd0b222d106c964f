use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use travelmate_api::{
    app,
    state::{AppState, AuthConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "travelmate_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = travelmate_store::Config::load().expect("Failed to load config");
    tracing::info!("Starting Travel Mate API on port {}", config.server.port);

    let users_path = Path::new(&config.storage.data_dir).join("users.json");
    let users = travelmate_store::FileUserStore::open(users_path)
        .await
        .expect("Failed to open user store");

    let app_state = AppState {
        users: Arc::new(users),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
        client_origin: config.client.origin.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
