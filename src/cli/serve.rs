use std::{net::SocketAddr, sync::Arc};

use crate::{
    config::Config,
    error, info,
    server::{AppState, start_api_server},
    warning,
};

/// Runs the web server until it fails or the process is stopped.
///
/// `address` overrides `SERVER_ADDRESS`. With `open` the home page is opened
/// in the default browser once the server is about to accept connections,
/// which immediately starts the Spotify login.
pub async fn serve(address: Option<SocketAddr>, open: bool) {
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    if let Some(address) = address {
        config.server_address = address;
    }

    let base_url = config.base_url();
    info!("Serving on {}", base_url);
    info!(
        "Spotify must redirect to {}, register it in your app settings",
        config.redirect_uri
    );

    if open && webbrowser::open(&base_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            base_url
        )
    }

    let state = Arc::new(AppState::new(config));
    if let Err(e) = start_api_server(state).await {
        error!("Server stopped. Err: {}", e);
    }
}
