use thiserror::Error;

/// Terminal failures of the fetch-decode pipeline. None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrafficError {
    #[error("upstream returned status {status}")]
    Upstream { status: u16 },

    #[error("upstream fetch failed: {0}")]
    Transport(String),

    #[error("base64 decode failed: {0}")]
    Decode(String),

    #[error("JSON parse failed: {0}")]
    Parse(String),
}

impl TrafficError {
    /// HTTP status reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self {
            TrafficError::Upstream { .. } | TrafficError::Transport(_) => 502,
            TrafficError::Decode(_) | TrafficError::Parse(_) => 500,
        }
    }

    /// JSON body reported to the caller.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            TrafficError::Upstream { status } => serde_json::json!({
                "error": "Failed to fetch from DGT",
                "status": status,
            }),
            TrafficError::Transport(details) => serde_json::json!({
                "error": "Failed to fetch from DGT",
                "details": details,
            }),
            TrafficError::Decode(details) => serde_json::json!({
                "error": "Decode failed",
                "details": details,
            }),
            TrafficError::Parse(details) => serde_json::json!({
                "error": "JSON parse failed",
                "details": details,
            }),
        }
    }
}
