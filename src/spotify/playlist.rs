use reqwest::Client;

use crate::{
    error::Result,
    spotify::read_json,
    types::{
        CreatePlaylistRequest, Page, Playlist, ReplacePlaylistTracksRequest, SnapshotResponse,
    },
};

/// The replace endpoint accepts at most 100 items per request.
pub const MAX_REPLACE_ITEMS: usize = 100;

/// Retrieves one page of the current user's playlists.
///
/// The listing includes playlists the user follows but does not own, callers
/// interested in owned playlists filter on `owner`.
pub async fn current_user_playlists(
    client: &Client,
    base_url: &str,
    token: &str,
    limit: u32,
    offset: u32,
) -> Result<Page<Playlist>> {
    let api_url = format!(
        "{uri}/me/playlists?limit={limit}&offset={offset}",
        uri = base_url,
        limit = limit,
        offset = offset
    );

    let response = client.get(&api_url).bearer_auth(token).send().await?;
    read_json::<Page<Playlist>>(response).await
}

/// Creates a playlist for `user_id`. The returned playlist carries the id
/// assigned by Spotify.
pub async fn create(
    client: &Client,
    base_url: &str,
    token: &str,
    user_id: &str,
    request: &CreatePlaylistRequest,
) -> Result<Playlist> {
    let api_url = format!(
        "{uri}/users/{user_id}/playlists",
        uri = base_url,
        user_id = user_id
    );

    let response = client
        .post(&api_url)
        .bearer_auth(token)
        .json(request)
        .send()
        .await?;

    read_json::<Playlist>(response).await
}

/// Replaces all items of a playlist with `uris`, keeping their order.
///
/// Lists longer than [`MAX_REPLACE_ITEMS`] are written as one replace
/// followed by appends. An empty list clears the playlist.
pub async fn replace_tracks(
    client: &Client,
    base_url: &str,
    token: &str,
    playlist_id: &str,
    uris: &[String],
) -> Result<String> {
    let api_url = format!(
        "{uri}/playlists/{playlist_id}/tracks",
        uri = base_url,
        playlist_id = playlist_id
    );

    let mut chunks = uris.chunks(MAX_REPLACE_ITEMS);
    let first = chunks.next().unwrap_or(&[]);

    let response = client
        .put(&api_url)
        .bearer_auth(token)
        .json(&ReplacePlaylistTracksRequest {
            uris: first.to_vec(),
        })
        .send()
        .await?;
    let mut snapshot = read_json::<SnapshotResponse>(response).await?;

    for chunk in chunks {
        let response = client
            .post(&api_url)
            .bearer_auth(token)
            .json(&ReplacePlaylistTracksRequest {
                uris: chunk.to_vec(),
            })
            .send()
            .await?;
        snapshot = read_json::<SnapshotResponse>(response).await?;
    }

    Ok(snapshot.snapshot_id)
}

/// Fetches a playlist including its first page of items.
pub async fn get(client: &Client, base_url: &str, token: &str, playlist_id: &str) -> Result<Playlist> {
    let api_url = format!(
        "{uri}/playlists/{playlist_id}",
        uri = base_url,
        playlist_id = playlist_id
    );

    let response = client.get(&api_url).bearer_auth(token).send().await?;
    read_json::<Playlist>(response).await
}
