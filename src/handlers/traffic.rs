use std::fmt;
use std::rc::Rc;

use chrono::Utc;
use url::Url;

use crate::cache::{CacheKey, CacheStore};
use crate::config::Settings;
use crate::deferred::Deferred;
use crate::dgt::codec::decode_payload;
use crate::dgt::payload::UpstreamRequest;
use crate::dgt::Upstream;
use crate::error::TrafficError;
use crate::handlers::health::{health_body, is_health_path};
use crate::response::ProxyResponse;
use crate::utils::cors::{cors_headers, with_cors};

/// The parts of an incoming request the pipeline looks at.
#[derive(Debug, Clone)]
pub struct Inbound {
    pub url: Url,
    pub origin: Option<String>,
}

impl Inbound {
    fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }
}

/// Which path produced a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Preflight,
    Health,
    Hit,
    Miss,
    Failed(TrafficError),
    MethodNotAllowed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Preflight => f.write_str("preflight"),
            Outcome::Health => f.write_str("health"),
            Outcome::Hit => f.write_str("cache hit"),
            Outcome::Miss => f.write_str("cache miss"),
            Outcome::Failed(e) => write!(f, "failed: {e}"),
            Outcome::MethodNotAllowed => f.write_str("method not allowed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Served {
    pub response: ProxyResponse,
    pub outcome: Outcome,
}

/// Orchestrator: cache -> upstream POST -> decode -> deferred cache store.
///
/// Cached responses are shared across origins; only
/// `Access-Control-Allow-Origin` is rewritten per caller. Concurrent misses
/// for the same key may both reach upstream and both store (last write wins).
pub struct TrafficHandler<C, U, D> {
    cache: Rc<C>,
    upstream: U,
    deferred: D,
    settings: Settings,
}

impl<C, U, D> TrafficHandler<C, U, D>
where
    C: CacheStore + 'static,
    U: Upstream,
    D: Deferred,
{
    pub fn new(cache: C, upstream: U, deferred: D, settings: Settings) -> Self {
        Self {
            cache: Rc::new(cache),
            upstream,
            deferred,
            settings,
        }
    }

    /// CORS preflight: empty 200, no side effects.
    pub fn preflight(&self, req: &Inbound) -> Served {
        Served {
            response: ProxyResponse::empty(200, cors_headers(req.origin())),
            outcome: Outcome::Preflight,
        }
    }

    /// Anything other than GET or OPTIONS.
    pub fn reject(&self, req: &Inbound) -> Served {
        let mut headers = cors_headers(req.origin());
        headers.push(("Allow".to_string(), "GET, OPTIONS".to_string()));
        Served {
            response: ProxyResponse::json(&serde_json::json!({ "error": "Method not allowed" }), 405, headers),
            outcome: Outcome::MethodNotAllowed,
        }
    }

    pub async fn get(&self, req: &Inbound) -> Served {
        if is_health_path(req.url.path()) {
            return Served {
                response: ProxyResponse::json(&health_body(Utc::now()), 200, cors_headers(req.origin())),
                outcome: Outcome::Health,
            };
        }

        let key = CacheKey::for_url(&req.url);

        // A failed lookup is treated as a miss.
        if let Ok(Some(cached)) = self.cache.get(&key).await {
            return Served {
                response: with_cors(&cached, req.origin()),
                outcome: Outcome::Hit,
            };
        }

        match self.fetch_fresh(req.origin()).await {
            Ok(response) => {
                self.store_later(key, response.clone());
                Served {
                    response,
                    outcome: Outcome::Miss,
                }
            }
            Err(e) => Served {
                response: ProxyResponse::json(&e.to_json(), e.status_code(), cors_headers(req.origin())),
                outcome: Outcome::Failed(e),
            },
        }
    }

    async fn fetch_fresh(&self, origin: Option<&str>) -> Result<ProxyResponse, TrafficError> {
        let request = UpstreamRequest::filtered_data(&self.settings.endpoint)
            .map_err(|e| TrafficError::Transport(e.to_string()))?;
        let reply = self.upstream.send(&request).await?;
        if !reply.is_success() {
            return Err(TrafficError::Upstream {
                status: reply.status,
            });
        }

        let payload = decode_payload(&reply.body)?;

        let mut headers = cors_headers(origin);
        headers.push(("Cache-Control".to_string(), self.settings.cache_control()));
        Ok(ProxyResponse::json(&payload, 200, headers))
    }

    /// Hands the store to the deferred channel; its result never reaches the caller.
    fn store_later(&self, key: CacheKey, response: ProxyResponse) {
        let cache = Rc::clone(&self.cache);
        self.deferred.defer(Box::pin(async move {
            let _ = cache.put(&key, response).await;
        }));
    }
}
