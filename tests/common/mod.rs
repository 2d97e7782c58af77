use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::Duration;
use serde_json::json;
use url::Url;

use sportop::{
    Error, Result,
    config::Config,
    server::{AppState, router},
    spotify::{SpotifyApi, auth::AuthSession},
    types::{CreatePlaylistRequest, Page, Playlist, PlaylistItem, TimeRange, Token, Track, User},
};

pub const VALID_TOKEN: &str = "valid-token";
pub const GOOD_CODE: &str = "good-code";
pub const USER_ID: &str = "user-1";

pub fn playlist(id: &str, name: &str, owner: &str) -> Playlist {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "owner": { "id": owner, "display_name": null },
        "tracks": { "total": 0 }
    }))
    .unwrap()
}

pub fn track(id: &str) -> Track {
    serde_json::from_value(json!({
        "id": id,
        "name": format!("Song {}", id),
        "uri": format!("spotify:track:{}", id),
        "artists": [{ "id": "a1", "name": "Some Artist" }],
        "duration_ms": 200000
    }))
    .unwrap()
}

#[derive(Debug, Default)]
pub struct FakeData {
    pub playlists: Vec<Playlist>,
    pub top_tracks: Vec<Track>,
    pub created: Vec<String>,
    pub replaced: Vec<(String, Vec<String>)>,
}

/// In-memory Spotify account of a single user.
#[derive(Debug, Default)]
pub struct FakeSpotify {
    pub data: Mutex<FakeData>,
}

impl FakeSpotify {
    pub fn new(playlists: Vec<Playlist>, top_tracks: Vec<Track>) -> Self {
        Self {
            data: Mutex::new(FakeData {
                playlists,
                top_tracks,
                ..Default::default()
            }),
        }
    }

    pub fn created(&self) -> Vec<String> {
        self.data.lock().unwrap().created.clone()
    }

    pub fn replaced(&self) -> Vec<(String, Vec<String>)> {
        self.data.lock().unwrap().replaced.clone()
    }

    fn check(token: &str) -> Result<()> {
        if token == VALID_TOKEN {
            Ok(())
        } else {
            Err(Error::Api {
                status: 401,
                message: "The access token expired".to_string(),
            })
        }
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    async fn current_user(&self, token: &str) -> Result<User> {
        Self::check(token)?;
        Ok(serde_json::from_value(json!({
            "id": USER_ID,
            "display_name": "Test User",
            "email": "test@example.com"
        }))?)
    }

    async fn current_user_playlists(
        &self,
        token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<Playlist>> {
        Self::check(token)?;
        let data = self.data.lock().unwrap();
        let total = data.playlists.len();
        let start = (offset as usize).min(total);
        let end = (start + limit as usize).min(total);

        Ok(Page {
            items: data.playlists[start..end].to_vec(),
            next: (end < total).then(|| format!("/me/playlists?offset={}", end)),
            total: total as u32,
            limit,
            offset,
        })
    }

    async fn top_tracks(&self, token: &str, limit: u32, _range: TimeRange) -> Result<Vec<Track>> {
        Self::check(token)?;
        let data = self.data.lock().unwrap();
        Ok(data.top_tracks.iter().take(limit as usize).cloned().collect())
    }

    async fn create_playlist(
        &self,
        token: &str,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<Playlist> {
        Self::check(token)?;
        let mut data = self.data.lock().unwrap();
        let id = format!("created-{}", data.created.len() + 1);
        let created = playlist(&id, &request.name, user_id);

        // new playlists land at the end, nothing may rely on their position
        data.playlists.push(created.clone());
        data.created.push(id);
        Ok(created)
    }

    async fn replace_playlist_tracks(
        &self,
        token: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String> {
        Self::check(token)?;
        let mut data = self.data.lock().unwrap();

        let items: Vec<PlaylistItem> = uris
            .iter()
            .filter_map(|uri| data.top_tracks.iter().find(|t| &t.uri == uri).cloned())
            .map(|track| PlaylistItem {
                added_at: None,
                track: Some(track),
            })
            .collect();

        let Some(target) = data.playlists.iter_mut().find(|p| p.id == playlist_id) else {
            return Err(Error::Api {
                status: 404,
                message: "Not found.".to_string(),
            });
        };
        target.tracks.total = items.len() as u32;
        target.tracks.items = items;

        data.replaced.push((playlist_id.to_string(), uris.to_vec()));
        Ok("snapshot".to_string())
    }

    async fn playlist(&self, token: &str, playlist_id: &str) -> Result<Playlist> {
        Self::check(token)?;
        let data = self.data.lock().unwrap();
        data.playlists
            .iter()
            .find(|p| p.id == playlist_id)
            .cloned()
            .ok_or_else(|| Error::Api {
                status: 404,
                message: "Not found.".to_string(),
            })
    }
}

/// Accepts only [`GOOD_CODE`].
pub struct FakeAuth;

#[async_trait]
impl AuthSession for FakeAuth {
    fn authorize_url(&self, state: &str, code_challenge: &str) -> Result<Url> {
        Url::parse_with_params(
            "https://accounts.example.com/authorize",
            &[("state", state), ("code_challenge", code_challenge)],
        )
        .map_err(|e| Error::Config(e.to_string()))
    }

    async fn request_access_token(&self, code: &str, _code_verifier: &str) -> Result<Token> {
        if code != GOOD_CODE {
            return Err(Error::Auth("Invalid authorization code".to_string()));
        }

        Ok(Token {
            access_token: VALID_TOKEN.to_string(),
            token_type: "Bearer".to_string(),
            scope: "user-top-read".to_string(),
            expires_in: 3600,
            refresh_token: Some("refresh".to_string()),
        })
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "SPOTIFY_API_AUTH_CLIENT_ID" => Some("test-client".to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn test_app(api: Arc<FakeSpotify>) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::with_clients(test_config(), api, Arc::new(FakeAuth)));
    (router(Arc::clone(&state)), state)
}

pub async fn login(state: &AppState) {
    state
        .cache
        .store_access_token(VALID_TOKEN.to_string(), Duration::seconds(3600))
        .await;
}
