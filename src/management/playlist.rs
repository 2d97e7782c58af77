use crate::{
    config::PlaylistSettings,
    error::Result,
    spotify::SpotifyApi,
    types::{CreatePlaylistRequest, Playlist, PlaylistRequest, TimeRange},
};

const PLAYLISTS_PAGE_SIZE: u32 = 50;

/// Keeps the user's top tracks playlist in place.
///
/// The managed playlist is recognised by a marker substring in its name. It
/// is created and filled from the user's top tracks when missing, and left
/// untouched when it already exists.
pub struct PlaylistSync<'a> {
    api: &'a dyn SpotifyApi,
    settings: &'a PlaylistSettings,
}

impl<'a> PlaylistSync<'a> {
    pub fn new(api: &'a dyn SpotifyApi, settings: &'a PlaylistSettings) -> Self {
        Self { api, settings }
    }

    /// Finds the marker playlist of `user_id`, creating it when absent, and
    /// returns it freshly fetched.
    ///
    /// Lookup and creation are not atomic: concurrent calls for a user without
    /// a marker playlist may each create one.
    pub async fn reconcile(&self, token: &str, user_id: &str) -> Result<Playlist> {
        let playlist_id = match self.find_marker_playlist(token, user_id).await? {
            Some(playlist) => {
                tracing::info!(
                    playlist_id = %playlist.id,
                    name = %playlist.name,
                    "marker playlist already exists"
                );
                playlist.id
            }
            None => {
                tracing::info!(marker = %self.settings.marker, "no marker playlist, creating one");
                self.create_from_top_tracks(
                    token,
                    user_id,
                    &self.settings.name,
                    self.settings.limit,
                    self.settings.time_range,
                )
                .await?
            }
        };

        self.api.playlist(token, &playlist_id).await
    }

    /// Creates a new playlist from the user's top tracks as described by
    /// `request`, regardless of existing playlists.
    pub async fn generate(
        &self,
        token: &str,
        user_id: &str,
        request: &PlaylistRequest,
    ) -> Result<Playlist> {
        let playlist_id = self
            .create_from_top_tracks(token, user_id, &request.name, request.limit, request.range)
            .await?;

        self.api.playlist(token, &playlist_id).await
    }

    /// First playlist owned by `user_id` whose name contains the marker.
    /// Duplicates are not merged, listing order decides.
    pub async fn find_marker_playlist(
        &self,
        token: &str,
        user_id: &str,
    ) -> Result<Option<Playlist>> {
        let playlists = self.owned_playlists(token, user_id).await?;

        Ok(playlists
            .into_iter()
            .find(|p| p.name.contains(&self.settings.marker)))
    }

    async fn owned_playlists(&self, token: &str, user_id: &str) -> Result<Vec<Playlist>> {
        let mut playlists = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .api
                .current_user_playlists(token, PLAYLISTS_PAGE_SIZE, offset)
                .await?;

            let fetched = page.items.len() as u32;
            playlists.extend(page.items.into_iter().filter(|p| {
                p.owner
                    .as_ref()
                    .is_none_or(|owner| owner.id == user_id)
            }));

            if page.next.is_none() || fetched == 0 {
                break;
            }
            offset += fetched;
        }

        Ok(playlists)
    }

    /// Creates the playlist and writes the top tracks into it. Returns the id
    /// assigned by the create call.
    async fn create_from_top_tracks(
        &self,
        token: &str,
        user_id: &str,
        name: &str,
        limit: u32,
        range: TimeRange,
    ) -> Result<String> {
        let tracks = self.api.top_tracks(token, limit, range).await?;

        let request = CreatePlaylistRequest {
            name: name.to_string(),
            description: format!("Top {} tracks, {}", limit, range.label()),
            public: false,
        };
        let created = self.api.create_playlist(token, user_id, &request).await?;

        let uris: Vec<String> = tracks.iter().map(|t| t.uri.clone()).collect();
        self.api
            .replace_playlist_tracks(token, &created.id, &uris)
            .await?;

        tracing::info!(
            playlist_id = %created.id,
            name = %created.name,
            tracks = uris.len(),
            "playlist created"
        );

        Ok(created.id)
    }
}
