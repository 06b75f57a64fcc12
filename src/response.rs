use worker::{Headers, Response};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A complete HTTP response held as a plain value.
///
/// This is both what the pipeline returns and what the edge cache stores.
/// It is never mutated in place: header rewrites produce a new copy, so a
/// cached entry and the per-request copy handed to a caller cannot alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl ProxyResponse {
    /// JSON body with `Content-Type` set, followed by `headers`.
    pub fn json(value: &serde_json::Value, status: u16, headers: Vec<(String, String)>) -> Self {
        let mut all = vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())];
        all.extend(headers);
        Self {
            status,
            headers: all,
            body: value.to_string(),
        }
    }

    pub fn empty(status: u16, headers: Vec<(String, String)>) -> Self {
        Self {
            status,
            headers,
            body: String::new(),
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a copy with `name` set to `value`, replacing any existing value.
    pub fn with_header(&self, name: &str, value: &str) -> Self {
        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case(name))
            .cloned()
            .collect();
        headers.push((name.to_string(), value.to_string()));
        Self {
            status: self.status,
            headers,
            body: self.body.clone(),
        }
    }

    /// Builds the `worker::Response` handed back to the runtime.
    pub fn to_worker(&self) -> worker::Result<Response> {
        let headers = Headers::new();
        for (name, value) in &self.headers {
            headers.set(name, value)?;
        }
        let response = if self.body.is_empty() {
            Response::empty()?
        } else {
            Response::ok(self.body.clone())?
        };
        Ok(response.with_status(self.status).with_headers(headers))
    }

    /// Reads a `worker::Response` (e.g. a cache match) into a plain value.
    pub async fn from_worker(mut response: Response) -> worker::Result<Self> {
        let status = response.status_code();
        let headers = response.headers().entries().collect();
        let body = response.text().await?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }
}
