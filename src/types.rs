use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// Token endpoint response for the authorization code grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

fn default_expires_in() -> u64 {
    3600
}

/// Authorization started by `/redirect` and awaiting its callback.
#[derive(Debug, Clone)]
pub struct PendingAuth {
    pub code_verifier: String,
    pub state: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleAlbum {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    // local files carry a null id
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    #[serde(default)]
    pub album: Option<SimpleAlbum>,
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub added_at: Option<String>,
    pub track: Option<Track>,
}

/// Listing endpoints only send `total`, a full playlist fetch adds `items`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistTracks {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
    #[serde(default)]
    pub owner: Option<PlaylistOwner>,
    #[serde(default)]
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub tracks: PlaylistTracks,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Spotify occasionally lists `null` entries, those are dropped.
    #[serde(deserialize_with = "skip_nulls")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn skip_nulls<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Vec::<Option<T>>::deserialize(deserializer)?;
    Ok(items.into_iter().flatten().collect())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacePlaylistTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

/// Error envelope of the Web API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub status: u16,
    pub message: String,
}

/// Error envelope of the accounts service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

/// Ranking window for top tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Short,
    Medium,
    Long,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Short, TimeRange::Medium, TimeRange::Long];

    /// Value of the `time_range` query parameter.
    pub fn as_api_param(&self) -> &'static str {
        match self {
            TimeRange::Short => "short_term",
            TimeRange::Medium => "medium_term",
            TimeRange::Long => "long_term",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Short => "last 4 weeks",
            TimeRange::Medium => "last 6 months",
            TimeRange::Long => "all time",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeRange::Short => "short",
            TimeRange::Medium => "medium",
            TimeRange::Long => "long",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().trim_end_matches("_term") {
            "short" => Ok(TimeRange::Short),
            "medium" => Ok(TimeRange::Medium),
            "long" => Ok(TimeRange::Long),
            other => Err(format!(
                "Invalid time range: {}. Expected short, medium or long",
                other
            )),
        }
    }
}

pub const MAX_TOP_TRACKS: u32 = 50;

/// A validated request to build a playlist from top tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRequest {
    pub name: String,
    pub limit: u32,
    pub range: TimeRange,
}

/// Raw form submission. Everything is kept as text so that bad input can be
/// shown back to the user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub limit: String,
    #[serde(default)]
    pub range: String,
}

impl PlaylistForm {
    pub fn validate(&self) -> Result<PlaylistRequest, Vec<String>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("Name must not be empty.".to_string());
        }

        let limit = match self.limit.trim().parse::<u32>() {
            Ok(limit) if (1..=MAX_TOP_TRACKS).contains(&limit) => Some(limit),
            _ => {
                errors.push(format!(
                    "Limit must be a number between 1 and {}.",
                    MAX_TOP_TRACKS
                ));
                None
            }
        };

        let range = match self.range.parse::<TimeRange>() {
            Ok(range) => Some(range),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        match (limit, range) {
            (Some(limit), Some(range)) if errors.is_empty() => Ok(PlaylistRequest {
                name: name.to_string(),
                limit,
                range,
            }),
            _ => Err(errors),
        }
    }
}
