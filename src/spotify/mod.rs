//! # Spotify Integration Module
//!
//! HTTP integration with the Spotify Web API and the accounts service. The
//! rest of the application only sees two traits:
//!
//! - [`SpotifyApi`] - the handful of Web API endpoints used to build the top
//!   tracks playlist
//! - [`auth::AuthSession`] - authorize URL construction and the authorization
//!   code exchange
//!
//! [`WebApi`] and [`auth::OAuthSession`] are the `reqwest` implementations.
//! Each endpoint group lives in its own submodule:
//!
//! ```text
//! user      GET  /me
//! tracks    GET  /me/top/tracks
//! playlist  GET  /me/playlists
//!           POST /users/{user_id}/playlists
//!           PUT  /playlists/{playlist_id}/tracks
//!           GET  /playlists/{playlist_id}
//! auth      POST /api/token
//! ```
//!
//! Failures are never retried. A non-2xx response becomes
//! [`Error::Api`] carrying the status and the message from the API's error
//! envelope.

pub mod auth;
pub mod playlist;
pub mod tracks;
pub mod user;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::{
    error::{Error, Result},
    types::{ApiErrorResponse, CreatePlaylistRequest, Page, Playlist, TimeRange, Track, User},
};

/// Web API calls needed to find, create and fill playlists.
///
/// Every call takes the bearer token explicitly, nothing is stored between
/// calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    async fn current_user(&self, token: &str) -> Result<User>;

    /// One page of the current user's playlists.
    async fn current_user_playlists(
        &self,
        token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Playlist>>;

    async fn top_tracks(&self, token: &str, limit: u32, range: TimeRange) -> Result<Vec<Track>>;

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist>;

    /// Replaces all items of a playlist and returns the new snapshot id.
    async fn replace_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String>;

    async fn playlist(&self, token: &str, playlist_id: &str) -> Result<Playlist>;
}

/// [`SpotifyApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct WebApi {
    client: Client,
    base_url: String,
}

impl WebApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SpotifyApi for WebApi {
    async fn current_user(&self, token: &str) -> Result<User> {
        user::current_user(&self.client, &self.base_url, token).await
    }

    async fn current_user_playlists(
        &self,
        token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Playlist>> {
        playlist::current_user_playlists(&self.client, &self.base_url, token, limit, offset).await
    }

    async fn top_tracks(&self, token: &str, limit: u32, range: TimeRange) -> Result<Vec<Track>> {
        tracks::top_tracks(&self.client, &self.base_url, token, limit, range).await
    }

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist> {
        playlist::create(&self.client, &self.base_url, token, user_id, request).await
    }

    async fn replace_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String> {
        playlist::replace_tracks(&self.client, &self.base_url, token, playlist_id, uris).await
    }

    async fn playlist(&self, token: &str, playlist_id: &str) -> Result<Playlist> {
        playlist::get(&self.client, &self.base_url, token, playlist_id).await
    }
}

/// Decodes a successful response, or turns an error response into
/// [`Error::Api`].
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => body,
    };

    tracing::debug!(status = status.as_u16(), %message, "spotify api error");

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}
