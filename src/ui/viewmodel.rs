//! View model types representing renderable UI state.
//!
//! View models are computed from application state by
//! `AppState::compute_viewmodel()` and consumed by the renderer. They contain
//! no business logic, only display-ready data: truncated strings, star glyphs,
//! highlight ranges and selection flags.
//!
//! # Example
//!
//! ```rust
//! use galleria::ui::viewmodel::{Body, EmptyState, FooterInfo, HeaderInfo, UIViewModel};
//!
//! let vm = UIViewModel {
//!     header: HeaderInfo { title: " Collection ".to_string(), status: String::new() },
//!     search_bar: None,
//!     banner: None,
//!     body: Body::Empty(EmptyState {
//!         message: "No artworks".to_string(),
//!         subtitle: "Press r to reload".to_string(),
//!     }),
//!     footer: FooterInfo { keybindings: "q: quit".to_string() },
//! };
//! assert!(vm.search_bar.is_none());
//! ```

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Present while search input is active.
    pub search_bar: Option<SearchBarInfo>,

    /// One-line status or error message under the header.
    pub banner: Option<BannerInfo>,

    /// The main panel.
    pub body: Body,

    pub footer: FooterInfo,
}

/// What fills the space between header and footer.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// The artwork list of the active view mode.
    List(ListView),
    /// Nothing to list (loading, no results, or signed out of a user mode).
    Empty(EmptyState),
    /// Department picker.
    Departments(DepartmentList),
    /// Artwork detail with the rating sliders.
    Detail(DetailView),
    /// An account form.
    Form(FormView),
}

/// Visible window of the artwork list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub rows: Vec<DisplayItem>,
    /// Pagination summary shown under the rows, e.g. `"40 of 96 · page 2/5"`.
    pub status: String,
}

/// One artwork row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub title: String,
    pub artist: String,
    /// Overall rating as star glyphs, empty when unrated.
    pub stars: String,
    pub is_selected: bool,
    pub is_favorite: bool,

    /// Character ranges of `title` to highlight (for search matches).
    ///
    /// Each tuple is `(start_index, end_index)` in character indices.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentList {
    pub items: Vec<DepartmentItem>,
    /// Shown instead of the list while departments load.
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentItem {
    pub name: String,
    pub count: Option<u64>,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title: String,
    /// `(label, value)` lines of descriptive metadata.
    pub lines: Vec<(String, String)>,
    pub is_favorite: bool,
    pub criteria: Vec<CriterionRow>,
    /// The draft differs from what was last saved.
    pub dirty: bool,
    /// Rating controls are only active when signed in.
    pub can_rate: bool,
}

/// One rating slider.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionRow {
    pub label: &'static str,
    pub score: f32,
    pub stars: String,
    pub is_focused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: String,
    pub fields: Vec<FieldRow>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub label: String,
    /// Field value, masked for secrets.
    pub display: String,
    pub is_focused: bool,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Title text, centered.
    pub title: String,
    /// Signed-in user and collection counters, right-aligned on the line below.
    pub status: String,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text (e.g., "q: quit  /: search  f: favorite").
    pub keybindings: String,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// Search bar display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    /// Active search filter label ("All", "Title", "Artist").
    pub filter: &'static str,
    /// The cursor is in the input rather than the results.
    pub typing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerInfo {
    pub text: String,
    pub is_error: bool,
}
