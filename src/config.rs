use worker::Env;

pub const DEFAULT_ENDPOINT: &str = "https://etraffic.dgt.es/etrafficWEB/api/cache/getFilteredData";
pub const DEFAULT_TTL_SECONDS: u64 = 30;

/// Runtime settings read from Worker vars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `DGT_ENDPOINT`
    pub endpoint: String,
    /// `CACHE_TTL_SECONDS`, used as `s-maxage` on cached responses.
    pub ttl_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

impl Settings {
    pub fn from_env(env: &Env) -> Self {
        Self::from_lookup(|name| env.var(name).ok().map(|v| v.to_string()))
    }

    /// Missing, blank or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = lookup("DGT_ENDPOINT")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let ttl_seconds = lookup("CACHE_TTL_SECONDS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&ttl| ttl > 0)
            .unwrap_or(DEFAULT_TTL_SECONDS);

        Self {
            endpoint,
            ttl_seconds,
        }
    }

    pub fn cache_control(&self) -> String {
        format!("public, max-age=0, s-maxage={}", self.ttl_seconds)
    }
}
