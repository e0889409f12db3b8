use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use tracing::debug;

use crate::response::error_body;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Shared-secret check for submission endpoints.
#[derive(Clone, Default)]
pub struct ApiKeyGate {
    key: Option<Arc<str>>,
}

impl ApiKeyGate {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    /// Lets every request through.
    pub fn open() -> Self {
        Self { key: None }
    }

    pub fn is_open(&self) -> bool {
        self.key.is_none()
    }

    pub fn check(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = self.key.as_deref() else {
            return true;
        };

        if let Some(auth) = headers.get(header::AUTHORIZATION) {
            if let Ok(auth_str) = auth.to_str() {
                if let Some(token) = auth_str.strip_prefix("Bearer ") {
                    return constant_time_compare(token.trim(), expected);
                }
            }
        }

        if let Some(api_key) = headers.get(API_KEY_HEADER) {
            if let Ok(key_str) = api_key.to_str() {
                return constant_time_compare(key_str.trim(), expected);
            }
        }

        false
    }
}

/// Safe methods are not gated; the info endpoints stay public.
pub async fn require_api_key(
    State(gate): State<ApiKeyGate>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method();
    let exempt = method == Method::GET || method == Method::HEAD || method == Method::OPTIONS;
    if exempt || gate.check(request.headers()) {
        return next.run(request).await;
    }
    debug!(path = %request.uri().path(), "rejected request without a valid api key");
    error_body(StatusCode::UNAUTHORIZED, "Unauthorized")
}

/// Compares in time independent of where the inputs differ.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    let max_len = std::cmp::max(a.len(), b.len());
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);
    (lengths_equal & contents_equal).into()
}
