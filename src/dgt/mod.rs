pub mod codec;
pub mod payload;

use async_trait::async_trait;
use worker::{console_log, Fetch, Headers, Method, Request, RequestInit};

use crate::error::TrafficError;

use self::payload::UpstreamRequest;

/// Status and raw text body of an upstream reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues the upstream POST. Only transport failures are errors here;
/// status handling is left to the caller.
#[async_trait(?Send)]
pub trait Upstream {
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamReply, TrafficError>;
}

/// Direct `fetch` to the eTraffic API from the Worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct DgtClient;

impl DgtClient {
    async fn fetch(request: &UpstreamRequest) -> worker::Result<UpstreamReply> {
        let headers = Headers::new();
        for (name, value) in &request.headers {
            headers.set(name, value)?;
        }

        let mut init = RequestInit::new();
        init.with_method(Method::Post)
            .with_headers(headers)
            .with_body(Some(request.body.clone().into()));

        let outbound = Request::new_with_init(&request.url, &init)?;
        let mut resp = Fetch::Request(outbound).send().await?;

        let status = resp.status_code();
        let body = resp.text().await?;
        console_log!("[dgt] status={} len={}", status, body.len());

        Ok(UpstreamReply { status, body })
    }
}

#[async_trait(?Send)]
impl Upstream for DgtClient {
    async fn send(&self, request: &UpstreamRequest) -> Result<UpstreamReply, TrafficError> {
        Self::fetch(request).await.map_err(|e| {
            console_log!("[dgt] fetch error: {:?}", e);
            TrafficError::Transport(e.to_string())
        })
    }
}
