//! Input, screen and view mode state types for the application.
//!
//! These enums drive which keybindings are active, which panel is drawn, and
//! which collection of artworks the feed fetches.
//!
//! # State Machine
//!
//! The browse screen runs in one of two input modes:
//! - **Normal**: Navigation and command keys
//! - **Search**: Query editing or result navigation
//!
//! On top of the browse screen the user can open the department picker, an
//! artwork detail panel with rating sliders, or an account form. Exactly one
//! [`ViewMode`] is active at any time.

use crate::api::endpoints::{Endpoint, SearchFilter};

/// Focus state within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// User is typing in the search input field.
    ///
    /// Accepts character input, backspace, and enter (submits the query).
    Typing,

    /// User is navigating through search results.
    Navigating,
}

/// Current input handling mode of the browse screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Default navigation and command mode.
    Normal,

    /// Active search mode with focus state.
    Search(SearchFocus),
}

/// Which panel currently owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Browse,
    Departments,
    Detail,
    Form,
}

/// Which collection of artworks is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// The whole collection.
    #[default]
    All,
    /// The signed-in user's favorites.
    Favorites,
    /// Artworks the signed-in user has rated.
    Rated,
    /// Artworks of one museum department.
    Department(String),
    /// Full-text search results.
    Search {
        query: String,
        filter: SearchFilter,
    },
}

impl ViewMode {
    /// Search mode for `query`, or [`ViewMode::All`] when the query is blank.
    #[must_use]
    pub fn search(query: &str, filter: SearchFilter) -> Self {
        let query = query.trim();
        if query.is_empty() {
            Self::All
        } else {
            Self::Search {
                query: query.to_string(),
                filter,
            }
        }
    }

    /// Whether the mode only makes sense for a signed-in user.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        matches!(self, Self::Favorites | Self::Rated)
    }

    /// Header title for the mode.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::All => "Collection".to_string(),
            Self::Favorites => "Favorites".to_string(),
            Self::Rated => "Rated".to_string(),
            Self::Department(name) => name.clone(),
            Self::Search { query, filter: SearchFilter::All } => format!("Search \"{query}\""),
            Self::Search { query, filter } => format!("Search {} \"{query}\"", filter.label()),
        }
    }

    /// The list endpoint serving `page` of this mode.
    #[must_use]
    pub fn endpoint(&self, page: u32, limit: u32) -> Endpoint {
        match self {
            Self::All => Endpoint::ListArtworks { page, limit },
            Self::Favorites => Endpoint::Favorites { page, limit },
            Self::Rated => Endpoint::RatedArtworks { page, limit },
            Self::Department(name) => Endpoint::ByDepartment {
                name: name.clone(),
                page,
                limit,
            },
            Self::Search { query, filter } => Endpoint::Search {
                query: query.clone(),
                filter: *filter,
                page,
                limit,
            },
        }
    }
}
