//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event; the
//! plugin shim executes them in order. Keeping effects as data lets the whole
//! application layer run under `cargo test` without a Zellij host.

use crate::api::request::HttpRequest;

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    ///
    /// Sent when the user explicitly requests to exit the plugin (e.g., pressing 'q').
    CloseFocus,

    /// Issues an HTTP request through the host.
    ///
    /// The response comes back as [`Event::HttpResponse`](crate::app::Event::HttpResponse)
    /// carrying the same request id.
    Http(HttpRequest),
}

impl Action {
    /// The request carried by an [`Action::Http`].
    #[must_use]
    pub const fn request(&self) -> Option<&HttpRequest> {
        match self {
            Self::Http(request) => Some(request),
            Self::CloseFocus => None,
        }
    }
}
