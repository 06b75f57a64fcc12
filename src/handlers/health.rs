use chrono::{DateTime, SecondsFormat, Utc};

/// Returns `true` for the liveness probe path.
pub fn is_health_path(path: &str) -> bool {
    path.ends_with("/health")
}

/// `{"status":"healthy","time":"2026-01-01T00:00:00.000Z"}`
pub fn health_body(now: DateTime<Utc>) -> serde_json::Value {
    serde_json::json!({
        "status": "healthy",
        "time": now.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
