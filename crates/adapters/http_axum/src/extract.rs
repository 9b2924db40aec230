//! Request extractors whose rejections answer with the error envelope.

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::HeaderMap;

use crate::error::ApiError;

/// JSON body extractor.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

/// Query string extractor.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

/// Best-effort client address from the proxy headers.
#[must_use]
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next());
    let real = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok());

    forwarded
        .or(real)
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn should_take_first_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));

        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn should_return_none_without_proxy_headers() {
        assert!(client_ip(&HeaderMap::new()).is_none());
    }
}
