//! Configuration management for sportop.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//!
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, net::SocketAddr, path::PathBuf};

use chrono::Duration;

use crate::{
    error::{Error, Result},
    types::{MAX_TOP_TRACKS, TimeRange},
};

pub const DEFAULT_SCOPES: [&str; 6] = [
    "user-read-email",
    "user-read-private",
    "playlist-read-private",
    "playlist-modify-private",
    "playlist-modify-public",
    "user-top-read",
];

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";
const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8000/callback";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;
const DEFAULT_PLAYLIST_MARKER: &str = "TOP30";
const DEFAULT_PLAYLIST_LIMIT: u32 = 30;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The directory is created if it is missing. A missing `.env` file is not an
/// error, every value then comes from the process environment or defaults.
///
/// The file is looked up in:
/// - Linux: `~/.local/share/sportop/.env`
/// - macOS: `~/Library/Application Support/sportop/.env`
/// - Windows: `%LOCALAPPDATA%/sportop/.env`
pub async fn load_env() -> Result<()> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| Error::Config(e.to_string()))?;
    }
    Ok(())
}

pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sportop/.env");
    path
}

/// Settings of the top tracks playlist kept in sync by `/playlists`.
#[derive(Debug, Clone)]
pub struct PlaylistSettings {
    /// Substring identifying the managed playlist.
    pub marker: String,
    /// Name used when the playlist has to be created.
    pub name: String,
    pub limit: u32,
    pub time_range: TimeRange,
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            marker: DEFAULT_PLAYLIST_MARKER.to_string(),
            name: DEFAULT_PLAYLIST_MARKER.to_string(),
            limit: DEFAULT_PLAYLIST_LIMIT,
            time_range: TimeRange::Short,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: SocketAddr,
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    /// Lifetime of the cached access token.
    pub token_ttl: Duration,
    pub playlist: PlaylistSettings,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_address = get("SERVER_ADDRESS")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("SERVER_ADDRESS: {}", e)))?;

        let client_id = get("SPOTIFY_API_AUTH_CLIENT_ID").ok_or_else(|| {
            Error::Config("SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string())
        })?;

        let scopes = match get("SPOTIFY_API_AUTH_SCOPE") {
            Some(scope) => parse_scopes(&scope),
            None => DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        };

        let token_ttl = match get("TOKEN_TTL_SECONDS") {
            Some(ttl) => ttl
                .parse::<i64>()
                .ok()
                .filter(|ttl| *ttl > 0)
                .ok_or_else(|| {
                    Error::Config(format!("TOKEN_TTL_SECONDS: invalid value {}", ttl))
                })?,
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };

        let marker = get("PLAYLIST_MARKER").unwrap_or_else(|| DEFAULT_PLAYLIST_MARKER.to_string());
        let name = get("PLAYLIST_NAME").unwrap_or_else(|| marker.clone());
        if !name.contains(&marker) {
            return Err(Error::Config(format!(
                "PLAYLIST_NAME '{}' must contain the marker '{}'",
                name, marker
            )));
        }

        let limit = match get("PLAYLIST_LIMIT") {
            Some(limit) => limit
                .parse::<u32>()
                .ok()
                .filter(|l| (1..=MAX_TOP_TRACKS).contains(l))
                .ok_or_else(|| Error::Config(format!("PLAYLIST_LIMIT: invalid value {}", limit)))?,
            None => DEFAULT_PLAYLIST_LIMIT,
        };

        let time_range = match get("PLAYLIST_TIME_RANGE") {
            Some(range) => range
                .parse::<TimeRange>()
                .map_err(|e| Error::Config(format!("PLAYLIST_TIME_RANGE: {}", e)))?,
            None => TimeRange::Short,
        };

        Ok(Self {
            server_address,
            client_id,
            client_secret: get("SPOTIFY_API_AUTH_CLIENT_SECRET"),
            redirect_uri: get("SPOTIFY_API_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            scopes,
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token_ttl: Duration::seconds(token_ttl),
            playlist: PlaylistSettings {
                marker,
                name,
                limit,
                time_range,
            },
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.server_address)
    }
}

/// Splits a scope list separated by spaces or commas.
pub fn parse_scopes(scope: &str) -> Vec<String> {
    scope
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
