use worker::*;

mod cache;
mod config;
mod deferred;
mod dgt;
mod error;
mod handlers;
mod response;
mod utils;

#[cfg(test)]
mod testing;

use crate::cache::EdgeCache;
use crate::config::Settings;
use crate::dgt::DgtClient;
use crate::handlers::traffic::{Inbound, TrafficHandler};

#[event(fetch)]
async fn fetch(req: Request, env: Env, ctx: Context) -> Result<Response> {
    console_error_panic_hook::set_once();

    let url = req.url()?;
    let inbound = Inbound {
        url: url.clone(),
        origin: req.headers().get("Origin")?,
    };

    // The context is the deferred channel: cache stores run under `wait_until`.
    let handler = TrafficHandler::new(EdgeCache, DgtClient, ctx, Settings::from_env(&env));

    // Dispatched by hand: `Router::run` does not hand over the `Context`.
    let method = req.method();
    let served = match method {
        Method::Options => handler.preflight(&inbound),
        Method::Get => handler.get(&inbound).await,
        _ => handler.reject(&inbound),
    };

    console_log!(
        "[traffic] {:?} {} -> {} ({})",
        method,
        url.path(),
        served.response.status,
        served.outcome
    );
    served.response.to_worker()
}
