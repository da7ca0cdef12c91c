//! Galleria: A Zellij plugin for browsing a museum artwork collection.
//!
//! Galleria is a terminal client for an artwork gallery backend that provides:
//! - Paginated browsing of the whole collection, a department, or search results
//! - Accounts: registration, sign-in, password change/reset, account deletion
//! - Favorites and four-criterion ratings kept in sync with the backend
//! - A persisted session that survives plugin restarts
//! - Span export to a rotating JSON-lines file for debugging

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, response interpretation          │
//! │  - Feed pagination, forms                           │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Auth Layer    │   │ API Layer     │
//! │ (ui/)         │   │ (auth/)       │   │ (api/)        │
//! │ - Rendering   │   │ - Session     │   │ - Endpoints   │
//! │ - Theming     │   │ - Validation  │   │ - Requests    │
//! │ - Components  │   │               │   │ - Decoding    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                             │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage, Infrastructure & Domain Layers            │
//! │  - Key/value session persistence (storage/)         │
//! │  - Sandbox paths (infrastructure/)                  │
//! │  - Artworks, ratings, users, errors (domain/)       │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing to a JSON-lines file       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The library never talks to the host directly. Every side effect is an
//! [`Action`] returned by [`handle_event`]; `main.rs` performs it with
//! `web_request` and feeds the answer back as [`Event::HttpResponse`].
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/galleria.wasm" {
//!         api_url "https://gallery.example.org"
//!         page_size "20"
//!         theme "gallery-night"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use galleria::{handle_event, initialize, Action, Config, Event};
//! use std::collections::BTreeMap;
//!
//! let dir = std::env::temp_dir().join("galleria-doc");
//! let mut options = BTreeMap::new();
//! options.insert("data_dir".to_string(), dir.display().to_string());
//!
//! let mut state = initialize(&Config::from_zellij(&options))?;
//! let (_render, actions) = handle_event(&mut state, &Event::Start)?;
//! assert!(matches!(actions.first(), Some(Action::Http(_))));
//! # Ok::<(), galleria::GalleryError>(())
//! ```

pub mod api;
pub mod app;
pub mod auth;
pub mod domain;
pub mod infrastructure;
pub mod storage;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, Screen, SearchFocus, ViewMode};
pub use domain::{GalleryError, Result};
pub use ui::Theme;

use crate::api::ApiClient;
use crate::auth::{AuthService, SessionStore};
use crate::domain::DEFAULT_PAGE_SIZE;
use crate::storage::{AuthStorage, JsonStore, KeyValueStore, MemoryStore};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Backend used when `api_url` is missing or invalid.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Largest accepted `page_size`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Plugin configuration parsed from Zellij's configuration system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL. Default: `http://localhost:3000`
    pub api_url: String,

    /// Artworks per page, 1 to 100. Default: 20
    pub page_size: u32,

    /// Directory for the session file and span export. Default: `/data`
    pub data_dir: PathBuf,

    /// Built-in theme name. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file; `~` maps to the host directory.
    pub theme_file: Option<String>,

    /// Tracing filter, e.g. `debug` or `galleria=trace`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            data_dir: PathBuf::from(infrastructure::DEFAULT_DATA_DIR),
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Unusable values fall back to their defaults:
    ///
    /// - `api_url`: must parse as an absolute URL
    /// - `page_size`: integer in `1..=100`
    /// - `data_dir`, `theme`, `theme_file`, `trace_level`: taken as given when non-empty
    ///
    /// ```rust
    /// use galleria::Config;
    /// use std::collections::BTreeMap;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_url".to_string(), "https://gallery.example.org".to_string());
    /// map.insert("page_size".to_string(), "500".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.api_url, "https://gallery.example.org");
    /// assert_eq!(config.page_size, 20);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let value = |key: &str| config.get(key).map(|s| s.trim()).filter(|s| !s.is_empty());

        let api_url = match value("api_url") {
            Some(url) if ApiClient::new(url).is_ok() => url.to_string(),
            Some(url) => {
                tracing::warn!(api_url = url, "invalid api_url, using {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            }
            None => DEFAULT_API_URL.to_string(),
        };

        let page_size = value("page_size")
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|n| (1..=MAX_PAGE_SIZE).contains(n))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            api_url,
            page_size,
            data_dir: value("data_dir").map_or_else(
                || PathBuf::from(infrastructure::DEFAULT_DATA_DIR),
                infrastructure::resolve_path,
            ),
            theme_name: value("theme").map(String::from),
            theme_file: value("theme_file").map(String::from),
            trace_level: value("trace_level").map(String::from),
        }
    }
}

/// Builds the application state from configuration.
///
/// Opens the session file in `data_dir` and restores a persisted session.
/// When the file cannot be opened the plugin still runs, with a session that
/// lives only as long as the pane.
///
/// # Errors
///
/// Returns [`GalleryError::Config`] if `api_url` is not a usable base URL.
/// [`Config::from_zellij`] never produces such a value.
pub fn initialize(config: &Config) -> Result<AppState> {
    let _span = tracing::debug_span!("initialize", api_url = %config.api_url, page_size = config.page_size).entered();

    let client = ApiClient::new(&config.api_url)?;
    tracing::debug!(base_url = client.base_url(), "api client ready");

    let theme = Theme::resolve(
        config.theme_name.as_deref(),
        config
            .theme_file
            .as_deref()
            .map(|f| infrastructure::resolve_path(f).display().to_string())
            .as_deref(),
    );

    let session_path = infrastructure::session_file(&config.data_dir);
    let store: Box<dyn KeyValueStore> = match JsonStore::open(session_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "session file unavailable, keeping session in memory");
            Box::new(MemoryStore::new())
        }
    };
    let session = SessionStore::load(AuthStorage::new(store));

    Ok(AppState::new(AuthService::new(client), session, config.page_size, theme))
}
