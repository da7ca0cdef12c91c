//! Paginated fetch/merge controller.
//!
//! A [`Feed`] owns the artwork list of the active [`ViewMode`] and its
//! pagination cursor. Fetches are described by [`PageTicket`]s; the caller
//! issues the HTTP request and hands the result back through [`Feed::apply`]
//! or [`Feed::fail`].
//!
//! # Protocol
//!
//! ```text
//! switch_mode / refresh ──► generation += 1, list cleared, ticket(page 1)
//! load_more (has_next, idle) ──► ticket(page + 1)
//! apply(ticket) ──► page 1 replaces, page n appends, pagination installed
//! ```
//!
//! A ticket whose generation is not current, or whose page is not the one in
//! flight, is stale and changes nothing.

use crate::api::response::ArtworkPage;
use crate::app::modes::ViewMode;
use crate::domain::artwork::{Artwork, ArtworkId};
use crate::domain::error::GalleryError;
use crate::domain::pagination::PaginationState;

/// Identifies one outstanding list fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    pub generation: u64,
    pub page: u32,
    pub mode: ViewMode,
}

/// Outcome of applying a fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedUpdate {
    /// First page installed; the list was replaced.
    Replaced { count: usize },
    /// Next page appended in received order.
    Appended { count: usize },
    /// The ticket no longer matches; nothing changed.
    Stale,
}

/// List state of the active view mode.
#[derive(Debug, Clone)]
pub struct Feed {
    mode: ViewMode,
    items: Vec<Artwork>,
    pagination: PaginationState,
    limit: u32,
    generation: u64,
    in_flight: Option<u32>,
    loaded: bool,
}

impl Feed {
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            mode: ViewMode::All,
            items: Vec::new(),
            pagination: PaginationState::first(limit),
            limit,
            generation: 0,
            in_flight: None,
            loaded: false,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> &ViewMode {
        &self.mode
    }

    #[must_use]
    pub fn items(&self) -> &[Artwork] {
        &self.items
    }

    #[must_use]
    pub const fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the first page of the current mode is still being fetched.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.in_flight, Some(1))
    }

    /// Whether a follow-up page is being fetched.
    #[must_use]
    pub const fn is_loading_more(&self) -> bool {
        matches!(self.in_flight, Some(page) if page > 1)
    }

    /// Whether at least one page of the current mode has been installed.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Switches to `mode` and returns the ticket for its first page.
    ///
    /// Any fetch still in flight for the previous mode becomes stale.
    pub fn switch_mode(&mut self, mode: ViewMode) -> PageTicket {
        self.generation += 1;
        self.mode = mode;
        self.items.clear();
        self.pagination = PaginationState::first(self.limit);
        self.in_flight = Some(1);
        self.loaded = false;

        tracing::debug!(mode = ?self.mode, generation = self.generation, "feed switched mode");
        self.ticket(1)
    }

    /// Reloads the current mode from page 1.
    pub fn refresh(&mut self) -> PageTicket {
        let mode = self.mode.clone();
        self.switch_mode(mode)
    }

    /// Returns the ticket for the next page, if there is one and nothing is in flight.
    pub fn load_more(&mut self) -> Option<PageTicket> {
        if self.in_flight.is_some() {
            tracing::debug!("load more ignored, fetch in flight");
            return None;
        }
        if !self.pagination.has_next {
            tracing::debug!(page = self.pagination.page, "load more ignored, no next page");
            return None;
        }

        let page = self.pagination.page + 1;
        self.in_flight = Some(page);
        Some(self.ticket(page))
    }

    /// Installs a fetched page.
    pub fn apply(&mut self, ticket: &PageTicket, page: ArtworkPage) -> FeedUpdate {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                page = ticket.page,
                "discarding stale page"
            );
            return FeedUpdate::Stale;
        }

        self.in_flight = None;
        self.loaded = true;
        self.pagination = page.pagination;
        let count = page.artworks.len();

        if ticket.page == 1 {
            self.items = page.artworks;
            FeedUpdate::Replaced { count }
        } else {
            self.items.extend(page.artworks);
            FeedUpdate::Appended { count }
        }
    }

    /// Records a failed fetch. Returns `false` if the ticket was stale.
    ///
    /// A failed first page leaves an empty list; a failed follow-up page keeps
    /// what was already loaded.
    pub fn fail(&mut self, ticket: &PageTicket, error: &GalleryError) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        tracing::warn!(page = ticket.page, mode = ?ticket.mode, error = %error, "page fetch failed");
        self.in_flight = None;
        if ticket.page == 1 {
            self.items.clear();
            self.pagination = PaginationState::first(self.limit);
            self.loaded = true;
        }
        true
    }

    /// Forgets a fetch whose response will never be processed.
    pub fn abandon(&mut self, ticket: &PageTicket) {
        if self.is_current(ticket) {
            self.in_flight = None;
        }
    }

    /// Removes one artwork from the list. Returns whether it was present.
    pub fn remove(&mut self, id: &ArtworkId) -> bool {
        let before = self.items.len();
        self.items.retain(|a| &a.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.pagination.total = self.pagination.total.saturating_sub(1);
        }
        removed
    }

    fn is_current(&self, ticket: &PageTicket) -> bool {
        ticket.generation == self.generation && self.in_flight == Some(ticket.page)
    }

    fn ticket(&self, page: u32) -> PageTicket {
        PageTicket {
            generation: self.generation,
            page,
            mode: self.mode.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: std::ops::Range<u32>, page: u32, total_pages: u32) -> ArtworkPage {
        ArtworkPage {
            artworks: ids.map(|i| Artwork::new(i.to_string(), format!("Work {i}"))).collect(),
            pagination: PaginationState::new(page, 20, u64::from(total_pages) * 20, total_pages),
            ratings: Vec::new(),
        }
    }

    #[test]
    fn switch_mode_replaces_with_first_page() {
        let mut feed = Feed::new(20);
        let ticket = feed.switch_mode(ViewMode::Favorites);
        assert_eq!(ticket.page, 1);
        assert!(feed.is_loading());

        assert_eq!(feed.apply(&ticket, page(0..20, 1, 2)), FeedUpdate::Replaced { count: 20 });
        assert_eq!(feed.items().len(), 20);
        assert!(feed.pagination().has_next);
        assert!(!feed.is_loading());
    }

    #[test]
    fn load_more_appends_in_order() {
        let mut feed = Feed::new(20);
        let first = feed.switch_mode(ViewMode::All);
        feed.apply(&first, page(0..20, 1, 3));

        let second = feed.load_more().unwrap();
        assert_eq!(second.page, 2);
        assert!(feed.is_loading_more());
        assert!(feed.load_more().is_none(), "only one fetch in flight");

        assert_eq!(feed.apply(&second, page(20..40, 2, 3)), FeedUpdate::Appended { count: 20 });
        let ids: Vec<&str> = feed.items().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"0"));
        assert_eq!(ids.last(), Some(&"39"));
        assert_eq!(feed.pagination().page, 2);
    }

    #[test]
    fn load_more_on_last_page_changes_nothing() {
        let mut feed = Feed::new(20);
        let first = feed.switch_mode(ViewMode::All);
        feed.apply(&first, page(0..5, 1, 1));
        let generation = feed.generation();

        assert!(feed.load_more().is_none());
        assert_eq!(feed.items().len(), 5);
        assert_eq!(feed.generation(), generation);
        assert!(!feed.is_loading_more());
    }

    #[test]
    fn responses_from_previous_mode_are_stale() {
        let mut feed = Feed::new(20);
        let old = feed.switch_mode(ViewMode::All);
        let new = feed.switch_mode(ViewMode::Rated);

        assert_eq!(feed.apply(&old, page(0..20, 1, 1)), FeedUpdate::Stale);
        assert!(feed.items().is_empty());
        assert!(!feed.fail(&old, &GalleryError::Network("down".into())));

        assert_eq!(feed.apply(&new, page(0..3, 1, 1)), FeedUpdate::Replaced { count: 3 });
    }

    #[test]
    fn failed_load_more_keeps_list() {
        let mut feed = Feed::new(20);
        let first = feed.switch_mode(ViewMode::All);
        feed.apply(&first, page(0..20, 1, 2));
        let more = feed.load_more().unwrap();

        assert!(feed.fail(&more, &GalleryError::Network("down".into())));
        assert_eq!(feed.items().len(), 20);
        assert!(feed.load_more().is_some(), "retry allowed after failure");
    }

    #[test]
    fn failed_first_page_degrades_to_empty() {
        let mut feed = Feed::new(20);
        let ticket = feed.switch_mode(ViewMode::All);
        assert!(feed.fail(&ticket, &GalleryError::Network("down".into())));
        assert!(feed.items().is_empty());
        assert!(feed.is_loaded());
        assert!(!feed.is_loading());
    }

    #[test]
    fn remove_drops_item_and_total() {
        let mut feed = Feed::new(20);
        let ticket = feed.switch_mode(ViewMode::Favorites);
        feed.apply(&ticket, page(0..3, 1, 1));
        assert!(feed.remove(&ArtworkId::new("1")));
        assert!(!feed.remove(&ArtworkId::new("1")));
        assert_eq!(feed.items().len(), 2);
    }
}
