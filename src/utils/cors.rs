use crate::response::ProxyResponse;

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
const ALLOW_METHODS: &str = "GET,OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type,Accept,Cache-Control,Pragma,Accept-Language";
const MAX_AGE: &str = "86400";

/// Origin echoed back to the caller: the request's `Origin`, or `*` when absent.
pub fn allowed_origin(origin: Option<&str>) -> &str {
    match origin {
        Some(o) if !o.is_empty() => o,
        _ => "*",
    }
}

/// The CORS header set attached to every response.
pub fn cors_headers(origin: Option<&str>) -> Vec<(String, String)> {
    vec![
        (ALLOW_ORIGIN.to_string(), allowed_origin(origin).to_string()),
        ("Access-Control-Allow-Methods".to_string(), ALLOW_METHODS.to_string()),
        ("Access-Control-Allow-Headers".to_string(), ALLOW_HEADERS.to_string()),
        ("Access-Control-Max-Age".to_string(), MAX_AGE.to_string()),
    ]
}

/// Copy of a shared (cached) response with the origin rewritten for this caller.
pub fn with_cors(response: &ProxyResponse, origin: Option<&str>) -> ProxyResponse {
    response.with_header(ALLOW_ORIGIN, allowed_origin(origin))
}
