mod cache;
mod playlist;

pub use cache::ACCESS_TOKEN_KEY;
pub use cache::TokenCache;
pub use playlist::PlaylistSync;
