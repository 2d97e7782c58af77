use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

/// Cache key of the bearer token obtained from the callback.
pub const ACCESS_TOKEN_KEY: &str = "spotify_access_token";

#[derive(Debug, Clone)]
struct CacheItem {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CacheItem {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory key/value store whose entries expire after a time to live.
///
/// Only one key is used by the application, the access token, so the whole
/// process shares a single login.
#[derive(Debug, Default)]
pub struct TokenCache {
    items: Mutex<HashMap<String, CacheItem>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn has(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }

    /// Returns the value stored under `key` unless it has expired. Expired
    /// entries are evicted.
    pub async fn get(&self, key: &str) -> Option<String> {
        let mut items = self.items.lock().await;
        let now = Utc::now();

        if items.get(key).is_some_and(|item| item.is_expired(now)) {
            items.remove(key);
            return None;
        }

        items.get(key).map(|item| item.value.clone())
    }

    pub async fn set(&self, key: &str, value: String, ttl: Duration) {
        let item = CacheItem {
            value,
            expires_at: Utc::now() + ttl,
        };
        self.items.lock().await.insert(key.to_string(), item);
    }

    pub async fn remove(&self, key: &str) -> bool {
        self.items.lock().await.remove(key).is_some()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY).await
    }

    pub async fn store_access_token(&self, token: String, ttl: Duration) {
        self.set(ACCESS_TOKEN_KEY, token, ttl).await;
    }
}
