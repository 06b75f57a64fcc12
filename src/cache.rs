use async_trait::async_trait;
use url::Url;
use worker::{console_log, Cache};

use crate::response::ProxyResponse;

/// Address of a cached response: the normalized request URL, method fixed to GET.
///
/// Only the URL contributes, so requests differing in `Origin` or any other
/// header share one slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_url(url: &Url) -> Self {
        let mut normalized = url.clone();
        normalized.set_fragment(None);

        let path = normalized.path().to_string();
        if path.len() > 1 && path.ends_with('/') {
            normalized.set_path(path.trim_end_matches('/'));
        }

        Self(normalized.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shared key-addressed response store with its own TTL enforcement.
#[async_trait(?Send)]
pub trait CacheStore {
    async fn get(&self, key: &CacheKey) -> worker::Result<Option<ProxyResponse>>;
    async fn put(&self, key: &CacheKey, response: ProxyResponse) -> worker::Result<()>;
}

/// The Workers Cache API (`caches.default`). Expiry follows the stored
/// response's `Cache-Control: s-maxage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeCache;

#[async_trait(?Send)]
impl CacheStore for EdgeCache {
    async fn get(&self, key: &CacheKey) -> worker::Result<Option<ProxyResponse>> {
        let lookup = match Cache::default().get(key.as_str(), false).await {
            Ok(Some(hit)) => ProxyResponse::from_worker(hit).await.map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };
        if let Err(e) = &lookup {
            console_log!("[cache] lookup failed for {}: {:?}", key.as_str(), e);
        }
        lookup
    }

    async fn put(&self, key: &CacheKey, response: ProxyResponse) -> worker::Result<()> {
        let result = Cache::default()
            .put(key.as_str(), response.to_worker()?)
            .await;
        if let Err(e) = &result {
            console_log!("[cache] store failed for {}: {:?}", key.as_str(), e);
        }
        result
    }
}
