//! # API Module
//!
//! HTTP handlers of the sportop web server.
//!
//! ## Endpoints
//!
//! - [`home`] - profile of the logged in user
//! - [`create_playlist_form`] / [`create_playlist`] - build a playlist from
//!   top tracks with a user chosen name, size and time range
//! - [`update_playlist`] - find or create the marker playlist
//! - [`redirect`] - start the authorization code flow
//! - [`callback`] - finish the flow and cache the access token
//! - [`health`] - status and version for monitoring
//!
//! Pages that need Spotify data redirect to [`AUTHORIZE_ROUTE`] while no
//! access token is cached. Unhandled errors become a 500 response through
//! the `IntoResponse` impl of [`crate::Error`].

mod callback;
mod health;
mod home;
mod playlist;
mod redirect;

pub use callback::callback;
pub use health::health;
pub use home::home;
pub use playlist::create_playlist;
pub use playlist::create_playlist_form;
pub use playlist::update_playlist;
pub use redirect::redirect;

use axum::response::{IntoResponse, Redirect, Response};

use crate::server::AppState;

/// Entry point of the authorization flow.
pub const AUTHORIZE_ROUTE: &str = "/redirect";

/// The cached access token, or the redirect that sends the user to log in.
pub(crate) async fn access_token(state: &AppState) -> Result<String, Response> {
    match state.cache.access_token().await {
        Some(token) => Ok(token),
        None => {
            tracing::debug!("no access token cached, redirecting to authorization");
            Err(Redirect::to(AUTHORIZE_ROUTE).into_response())
        }
    }
}
