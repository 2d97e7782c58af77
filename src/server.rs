use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::trace::TraceLayer;

use crate::{
    api,
    config::Config,
    error::Result,
    management::TokenCache,
    spotify::{SpotifyApi, WebApi, auth::AuthSession, auth::OAuthSession},
    types::PendingAuth,
};

/// State shared by all request handlers.
pub struct AppState {
    pub config: Config,
    pub api: Arc<dyn SpotifyApi>,
    pub auth: Arc<dyn AuthSession>,
    pub cache: TokenCache,
    pub pending_auth: Mutex<Option<PendingAuth>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let api = Arc::new(WebApi::new(config.api_url.clone()));
        let auth = Arc::new(OAuthSession::from_config(&config));
        Self::with_clients(config, api, auth)
    }

    pub fn with_clients(
        config: Config,
        api: Arc<dyn SpotifyApi>,
        auth: Arc<dyn AuthSession>,
    ) -> Self {
        Self {
            config,
            api,
            auth,
            cache: TokenCache::new(),
            pending_auth: Mutex::new(None),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::home))
        .route(
            "/createPlaylists",
            get(api::create_playlist_form).post(api::create_playlist),
        )
        .route("/playlists", get(api::update_playlist))
        .route("/callback", get(api::callback))
        .route(api::AUTHORIZE_ROUTE, get(api::redirect))
        .route("/health", get(api::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_api_server(state: Arc<AppState>) -> Result<()> {
    let addr = state.config.server_address;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "http server listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
