//! REST boundary of the gallery backend.
//!
//! - [`endpoints`]: Endpoint catalogue and request construction
//! - [`request`]: Outgoing request description and correlation context
//! - [`response`]: Typed decoding of response bodies and status mapping

pub mod endpoints;
pub mod request;
pub mod response;

pub use endpoints::{ApiClient, Endpoint, SearchFilter};
pub use request::{HttpMethod, HttpRequest};
pub use response::ArtworkPage;
