//! Outgoing HTTP request description.
//!
//! Requests are plain data. The plugin shim hands them to the host's
//! `web_request` facility; tests inspect them directly.

use std::collections::BTreeMap;
use std::fmt;

/// Context key carrying the request id through `web_request`.
pub const REQUEST_ID_KEY: &str = "request_id";

/// Context key carrying the active trace id, when tracing is on.
pub const TRACE_ID_KEY: &str = "trace_id";

/// HTTP verbs used by the gallery backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        })
    }
}

/// A fully built request, ready to be issued by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Correlation id echoed back in the response context.
    pub request_id: u64,
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Whether the request carries a bearer token.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.headers.contains_key("Authorization")
    }

    /// Context map for `web_request`, echoed back with the response.
    #[must_use]
    pub fn context(&self, trace_id: Option<String>) -> BTreeMap<String, String> {
        let mut context = BTreeMap::new();
        context.insert(REQUEST_ID_KEY.to_string(), self.request_id.to_string());
        if let Some(trace_id) = trace_id {
            context.insert(TRACE_ID_KEY.to_string(), trace_id);
        }
        context
    }
}

/// Recovers the request id from a response context map.
#[must_use]
pub fn request_id_from_context(context: &BTreeMap<String, String>) -> Option<u64> {
    context.get(REQUEST_ID_KEY)?.parse().ok()
}
