use reqwest::Client;

use crate::{
    error::Result,
    spotify::read_json,
    types::{MAX_TOP_TRACKS, Page, TimeRange, Track},
};

/// Retrieves the user's most played tracks for a ranking window.
///
/// The order of the returned tracks is the ranking order reported by the API,
/// most played first. `limit` is clamped to the API maximum of 50.
///
/// # Example
///
/// ```
/// let tracks = top_tracks(&client, "https://api.spotify.com/v1", token, 30, TimeRange::Short).await?;
/// ```
pub async fn top_tracks(
    client: &Client,
    base_url: &str,
    token: &str,
    limit: u32,
    range: TimeRange,
) -> Result<Vec<Track>> {
    let api_url = format!(
        "{uri}/me/top/tracks?limit={limit}&time_range={time_range}",
        uri = base_url,
        limit = limit.clamp(1, MAX_TOP_TRACKS),
        time_range = range.as_api_param()
    );

    let response = client.get(&api_url).bearer_auth(token).send().await?;
    let page = read_json::<Page<Track>>(response).await?;

    Ok(page.items)
}
