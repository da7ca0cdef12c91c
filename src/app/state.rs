//! Application state management.
//!
//! [`AppState`] is the single source of truth for all transient UI state: the
//! feed of the active view mode, selection, favorites and ratings, the detail
//! panel, forms and banners. It also owns the session store and the table of
//! outstanding HTTP requests.
//!
//! # Requests
//!
//! Every outgoing request gets a fresh id and an entry in the pending table
//! describing what its response means. Responses whose id is no longer in the
//! table (dropped on sign-out, or never issued) are ignored.

use crate::api::endpoints::{Endpoint, SearchFilter};
use crate::api::request::HttpRequest;
use crate::app::actions::Action;
use crate::app::feed::{Feed, PageTicket};
use crate::app::forms::{FormKind, FormState};
use crate::app::modes::{InputMode, Screen, ViewMode};
use crate::auth::{AuthService, SessionChange, SessionStore};
use crate::domain::artwork::{Artwork, ArtworkId, CollectionStats, Department};
use crate::domain::error::GalleryError;
use crate::domain::rating::{Criterion, Rating};
use crate::ui::theme::Theme;
use std::collections::{BTreeMap, BTreeSet};

/// Page size used when syncing favorite membership.
pub(crate) const FAVORITE_SYNC_LIMIT: u32 = 100;

/// What a response to an outstanding request means.
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    /// A page of the feed.
    Page(PageTicket),
    /// A page of the favorites membership sync.
    FavoriteSync { page: u32 },
    /// Adding (`add`) or removing a favorite.
    Favorite { id: ArtworkId, add: bool },
    LoadRating(ArtworkId),
    /// An optimistic rating save; `previous` is restored if it fails.
    SaveRating {
        id: ArtworkId,
        previous: Option<Rating>,
        submitted: Rating,
    },
    Departments,
    Stats,
    Form(FormKind),
}

/// An outstanding request.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub kind: Pending,
    /// Sent with a bearer token; dropped when the session ends.
    pub authorized: bool,
}

/// The artwork detail panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailState {
    pub artwork: Artwork,
    /// Slider values, saved with [`AppState::submit_rating`].
    pub draft: Rating,
    pub criterion: Criterion,
    /// The draft was edited since it was last loaded or saved.
    pub dirty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Error,
}

/// One-line status message shown under the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub kind: BannerKind,
}

impl Banner {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: BannerKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: BannerKind::Error,
        }
    }
}

/// Central application state container.
#[derive(Debug)]
pub struct AppState {
    /// Request construction for auth and authorized calls.
    pub auth: AuthService,

    /// The current session. Injected at construction, never global.
    pub session: SessionStore,

    /// List and pagination of the active view mode.
    pub feed: Feed,

    /// Artworks the signed-in user has favorited.
    pub favorites: BTreeSet<ArtworkId>,

    /// The signed-in user's ratings, keyed by artwork.
    pub ratings: BTreeMap<ArtworkId, Rating>,

    pub departments: Vec<Department>,
    pub department_index: usize,
    pub show_departments: bool,

    /// Collection counters shown in the header.
    pub stats: Option<CollectionStats>,

    /// Zero-based index into the feed items.
    pub selected_index: usize,

    pub input_mode: InputMode,
    pub search_query: String,
    pub search_filter: SearchFilter,

    pub detail: Option<DetailState>,
    pub form: Option<FormState>,
    pub banner: Option<Banner>,

    pub theme: Theme,

    /// Mode the user asked for while signed out, entered after sign-in.
    resume_mode: Option<ViewMode>,

    pending: BTreeMap<u64, PendingRequest>,
    next_request_id: u64,
}

impl AppState {
    /// Creates the application state around an already loaded session store.
    #[must_use]
    pub fn new(auth: AuthService, session: SessionStore, page_size: u32, theme: Theme) -> Self {
        Self {
            auth,
            session,
            feed: Feed::new(page_size),
            favorites: BTreeSet::new(),
            ratings: BTreeMap::new(),
            departments: Vec::new(),
            department_index: 0,
            show_departments: false,
            stats: None,
            selected_index: 0,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            search_filter: SearchFilter::All,
            detail: None,
            form: None,
            banner: None,
            theme,
            resume_mode: None,
            pending: BTreeMap::new(),
            next_request_id: 1,
        }
    }

    /// Which panel owns the keyboard.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        if self.form.is_some() {
            Screen::Form
        } else if self.detail.is_some() {
            Screen::Detail
        } else if self.show_departments {
            Screen::Departments
        } else {
            Screen::Browse
        }
    }

    /// Initial requests: the first page of the collection, stats, and the
    /// favorites sync when a session was restored.
    pub fn start(&mut self) -> Vec<Action> {
        let _span = tracing::debug_span!("start", authenticated = self.session.is_authenticated()).entered();

        let mut actions = self.switch_mode(ViewMode::All);
        actions.push(self.issue(&Endpoint::Stats, Pending::Stats));
        if self.session.is_authenticated() {
            actions.push(self.sync_favorites(1));
        }
        actions
    }

    // ---- requests -------------------------------------------------------

    /// Iterates over outstanding requests.
    pub fn pending(&self) -> impl Iterator<Item = (&u64, &PendingRequest)> {
        self.pending.iter()
    }

    /// Removes and returns the pending entry for `request_id`.
    pub fn take_pending(&mut self, request_id: u64) -> Option<PendingRequest> {
        self.pending.remove(&request_id)
    }

    /// Whether a rating save for `id` is outstanding.
    #[must_use]
    pub fn is_saving_rating(&self, id: &ArtworkId) -> bool {
        self.pending
            .values()
            .any(|p| matches!(&p.kind, Pending::SaveRating { id: pending, .. } if pending == id))
    }

    fn is_toggling_favorite(&self, id: &ArtworkId) -> bool {
        self.pending
            .values()
            .any(|p| matches!(&p.kind, Pending::Favorite { id: pending, .. } if pending == id))
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Records an already built request and wraps it as an action.
    pub(crate) fn track(&mut self, request: HttpRequest, kind: Pending) -> Action {
        tracing::debug!(
            request_id = request.request_id,
            method = %request.method,
            url = %request.url,
            "issuing request"
        );
        self.pending.insert(
            request.request_id,
            PendingRequest {
                kind,
                authorized: request.is_authorized(),
            },
        );
        Action::Http(request)
    }

    /// Builds and records a request for `endpoint`.
    ///
    /// Endpoints that need a session go through the auth service wrapper;
    /// public ones are sent without credentials.
    pub(crate) fn issue(&mut self, endpoint: &Endpoint, kind: Pending) -> Action {
        let _span = tracing::debug_span!("issue", endpoint = endpoint.name()).entered();
        let request_id = self.next_id();
        let request = if endpoint.requires_auth() {
            self.auth.authorized(request_id, endpoint, self.session.session())
        } else {
            self.auth.api().build(request_id, endpoint, None)
        };
        self.track(request, kind)
    }

    pub(crate) fn fetch_page(&mut self, ticket: PageTicket) -> Action {
        let endpoint = ticket.mode.endpoint(ticket.page, self.feed.limit());
        self.issue(&endpoint, Pending::Page(ticket))
    }

    pub(crate) fn sync_favorites(&mut self, page: u32) -> Action {
        self.issue(
            &Endpoint::Favorites {
                page,
                limit: FAVORITE_SYNC_LIMIT,
            },
            Pending::FavoriteSync { page },
        )
    }

    // ---- feed -----------------------------------------------------------

    /// Switches the feed to `mode`.
    ///
    /// User-only modes open the login form instead when signed out, and are
    /// entered once the user signs in.
    pub fn switch_mode(&mut self, mode: ViewMode) -> Vec<Action> {
        if mode.requires_auth() && !self.session.is_authenticated() {
            tracing::debug!(?mode, "mode requires sign-in");
            self.require_login("Sign in to see your collection");
            self.resume_mode = Some(mode);
            return vec![];
        }

        self.selected_index = 0;
        let ticket = self.feed.switch_mode(mode);
        vec![self.fetch_page(ticket)]
    }

    pub fn refresh(&mut self) -> Vec<Action> {
        self.switch_mode(self.feed.mode().clone())
    }

    /// Requests the next page when there is one and nothing is in flight.
    pub fn load_more(&mut self) -> Vec<Action> {
        self.feed
            .load_more()
            .map(|ticket| self.fetch_page(ticket))
            .into_iter()
            .collect()
    }

    // ---- selection ------------------------------------------------------

    /// Moves the cursor down, wrapping to the top. At the end of a list with
    /// more pages the next page is requested instead.
    pub fn move_selection_down(&mut self) -> Vec<Action> {
        if self.show_departments {
            if !self.departments.is_empty() {
                self.department_index = (self.department_index + 1) % self.departments.len();
            }
            return vec![];
        }

        let len = self.feed.items().len();
        if len == 0 {
            return vec![];
        }
        if self.selected_index + 1 < len {
            self.selected_index += 1;
            return vec![];
        }
        if self.feed.pagination().has_next {
            return self.load_more();
        }
        self.selected_index = 0;
        vec![]
    }

    /// Moves the cursor up, wrapping to the bottom.
    pub fn move_selection_up(&mut self) {
        let (index, len) = if self.show_departments {
            (&mut self.department_index, self.departments.len())
        } else {
            (&mut self.selected_index, self.feed.items().len())
        };
        if len == 0 {
            return;
        }
        *index = index.checked_sub(1).unwrap_or(len - 1);
    }

    #[must_use]
    pub fn selected_artwork(&self) -> Option<&Artwork> {
        self.feed.items().get(self.selected_index)
    }

    pub fn clamp_selection(&mut self) {
        let len = self.feed.items().len();
        self.selected_index = if len == 0 { 0 } else { self.selected_index.min(len - 1) };
    }

    /// The stored rating for `id`, zero when unrated.
    #[must_use]
    pub fn rating_for(&self, id: &ArtworkId) -> Rating {
        self.ratings.get(id).copied().unwrap_or_default()
    }

    // ---- departments ----------------------------------------------------

    pub fn open_departments(&mut self) -> Vec<Action> {
        self.show_departments = true;
        self.department_index = 0;
        let already_fetching = self.pending.values().any(|p| p.kind == Pending::Departments);
        if self.departments.is_empty() && !already_fetching {
            vec![self.issue(&Endpoint::Departments, Pending::Departments)]
        } else {
            vec![]
        }
    }

    pub fn select_department(&mut self) -> Vec<Action> {
        let Some(department) = self.departments.get(self.department_index) else {
            return vec![];
        };
        let mode = ViewMode::Department(department.name.clone());
        self.show_departments = false;
        self.switch_mode(mode)
    }

    // ---- favorites ------------------------------------------------------

    /// Adds or removes the focused artwork from favorites.
    ///
    /// Membership only changes when the backend confirms.
    pub fn toggle_favorite(&mut self) -> Vec<Action> {
        let target = self
            .detail
            .as_ref()
            .map(|d| d.artwork.id.clone())
            .or_else(|| self.selected_artwork().map(|a| a.id.clone()));
        let Some(id) = target else {
            return vec![];
        };

        if !self.session.is_authenticated() {
            self.require_login("Sign in to keep favorites");
            return vec![];
        }
        if self.is_toggling_favorite(&id) {
            tracing::debug!(artwork_id = %id, "favorite toggle already in flight");
            return vec![];
        }

        let add = !self.favorites.contains(&id);
        let endpoint = if add {
            Endpoint::AddFavorite(id.clone())
        } else {
            Endpoint::RemoveFavorite(id.clone())
        };
        vec![self.issue(&endpoint, Pending::Favorite { id, add })]
    }

    // ---- detail and ratings --------------------------------------------

    /// Opens the detail panel for the selected artwork and loads its rating.
    pub fn open_detail(&mut self) -> Vec<Action> {
        let Some(artwork) = self.selected_artwork().cloned() else {
            return vec![];
        };
        let id = artwork.id.clone();
        self.detail = Some(DetailState {
            draft: self.rating_for(&id),
            artwork,
            criterion: Criterion::Overall,
            dirty: false,
        });

        if self.session.is_authenticated() && !self.is_saving_rating(&id) {
            vec![self.issue(&Endpoint::GetRating(id.clone()), Pending::LoadRating(id))]
        } else {
            vec![]
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn nudge_score(&mut self, steps: i8) {
        if let Some(detail) = self.detail.as_mut() {
            detail.draft.nudge(detail.criterion, steps);
            detail.dirty = true;
        }
    }

    pub fn cycle_criterion(&mut self, forward: bool) {
        if let Some(detail) = self.detail.as_mut() {
            detail.criterion = if forward {
                detail.criterion.next()
            } else {
                detail.criterion.previous()
            };
        }
    }

    /// Saves the detail panel's draft rating.
    ///
    /// The rating map is updated before the request is sent; a failed save
    /// restores the previous value.
    pub fn submit_rating(&mut self) -> Vec<Action> {
        if self.detail.is_none() {
            return vec![];
        }
        if !self.session.is_authenticated() {
            self.require_login("Sign in to rate artworks");
            return vec![];
        }
        let Some(detail) = self.detail.as_mut() else {
            return vec![];
        };
        let id = detail.artwork.id.clone();
        let submitted = detail.draft;
        detail.dirty = false;
        let previous = self.ratings.insert(id.clone(), submitted);
        tracing::debug!(artwork_id = %id, overall = submitted.overall, "submitting rating");
        vec![self.issue(
            &Endpoint::SetRating(id.clone(), submitted),
            Pending::SaveRating {
                id,
                previous,
                submitted,
            },
        )]
    }

    /// Restores a rating after its save failed, unless it was overwritten since.
    pub(crate) fn revert_rating(&mut self, id: &ArtworkId, previous: Option<Rating>, submitted: Rating) {
        if self.ratings.get(id) != Some(&submitted) {
            tracing::debug!(artwork_id = %id, "rating changed since failed save, keeping it");
            return;
        }
        match previous {
            Some(rating) => self.ratings.insert(id.clone(), rating),
            None => self.ratings.remove(id),
        };
        let restored = self.rating_for(id);
        if let Some(detail) = self.detail.as_mut().filter(|d| &d.artwork.id == id) {
            detail.draft = restored;
            detail.dirty = false;
        }
    }

    /// Installs a fetched rating unless a save for the same artwork is pending.
    pub(crate) fn install_rating(&mut self, id: ArtworkId, rating: Rating) {
        if self.is_saving_rating(&id) {
            tracing::debug!(artwork_id = %id, "ignoring fetched rating, save pending");
            return;
        }
        if let Some(detail) = self.detail.as_mut().filter(|d| d.artwork.id == id && !d.dirty) {
            detail.draft = rating;
        }
        self.ratings.insert(id, rating);
    }

    // ---- forms and session ---------------------------------------------

    pub fn open_form(&mut self, kind: FormKind) {
        if kind.requires_auth() && !self.session.is_authenticated() {
            self.require_login("Sign in first");
            return;
        }
        if matches!(kind, FormKind::Login | FormKind::Register) && self.session.is_authenticated() {
            self.banner = Some(Banner::info("Already signed in, press o to sign out first"));
            return;
        }
        self.form = Some(FormState::new(kind));
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.resume_mode = None;
    }

    fn require_login(&mut self, reason: &str) {
        self.form = Some(FormState::new(FormKind::Login));
        self.banner = Some(Banner::info(reason));
    }

    /// Validates and submits the open form.
    ///
    /// Validation failures are shown inline; nothing is sent.
    pub fn submit_form(&mut self) -> Vec<Action> {
        let Some(form) = self.form.clone() else {
            return vec![];
        };
        if form.submitting {
            return vec![];
        }
        let kind = form.kind;
        let values: Vec<String> = form.fields.iter().map(|f| f.value.clone()).collect();
        let value = |i: usize| values.get(i).map_or("", String::as_str);

        let request_id = self.next_id();
        let request = match kind {
            FormKind::Login => self.auth.login(request_id, value(0), value(1)),
            FormKind::Register => self.auth.register(request_id, value(0), value(1), value(2), value(3)),
            FormKind::ChangePassword | FormKind::DeleteAccount => {
                if !self.session.is_authenticated() {
                    Err(GalleryError::SessionExpired)
                } else {
                    form.validate_account_form().map(|()| {
                        let endpoint = if kind == FormKind::ChangePassword {
                            Endpoint::ChangePassword {
                                current_password: value(0).to_string(),
                                new_password: value(1).to_string(),
                            }
                        } else {
                            Endpoint::DeleteAccount {
                                password: value(0).to_string(),
                            }
                        };
                        self.auth.authorized(request_id, &endpoint, self.session.session())
                    })
                }
            }
            FormKind::ForgotPassword => form.validate_account_form().map(|()| {
                self.auth.api().build(
                    request_id,
                    &Endpoint::ForgotPassword {
                        email: value(0).trim().to_string(),
                    },
                    None,
                )
            }),
            FormKind::ResetPassword => form.validate_account_form().map(|()| {
                self.auth.api().build(
                    request_id,
                    &Endpoint::ResetPassword {
                        token: value(0).trim().to_string(),
                        new_password: value(1).to_string(),
                    },
                    None,
                )
            }),
        };

        match request {
            Ok(request) => {
                if let Some(form) = self.form.as_mut() {
                    form.begin_submit();
                }
                vec![self.track(request, Pending::Form(kind))]
            }
            Err(e) => {
                tracing::debug!(form = ?kind, error = %e, "form rejected locally");
                if let Some(form) = self.form.as_mut() {
                    form.finish_with_error(&e);
                }
                vec![]
            }
        }
    }

    /// Signs out locally. No request is sent.
    pub fn logout(&mut self) -> Vec<Action> {
        if !self.session.is_authenticated() {
            return vec![];
        }
        let change = self.session.logout();
        self.apply_session_change(change)
    }

    /// Ends the session after an authorized call was refused.
    pub(crate) fn expire_session(&mut self) -> Vec<Action> {
        if !self.session.is_authenticated() {
            return vec![];
        }
        let change = self.session.expire();
        self.apply_session_change(change)
    }

    /// Brings dependent state in line with a session transition.
    pub fn apply_session_change(&mut self, change: SessionChange) -> Vec<Action> {
        let _span = tracing::debug_span!("apply_session_change", ?change, revision = self.session.revision()).entered();

        // Whatever was loaded belongs to the previous session, if any.
        self.drop_authorized_requests();
        self.favorites.clear();
        self.ratings.clear();
        if let Some(detail) = self.detail.as_mut() {
            detail.draft = Rating::default();
            detail.dirty = false;
        }

        if !change.is_sign_out() {
            let username = self.session.user().map(|u| u.username.clone()).unwrap_or_default();
            self.form = None;
            self.banner = Some(Banner::info(format!("Signed in as {username}")));

            let mode = self.resume_mode.take().unwrap_or_else(|| self.feed.mode().clone());
            let mut actions = vec![self.sync_favorites(1)];
            if let Some(id) = self.detail.as_ref().map(|d| d.artwork.id.clone()) {
                actions.push(self.issue(&Endpoint::GetRating(id.clone()), Pending::LoadRating(id)));
            }
            actions.extend(self.switch_mode(mode));
            return actions;
        }

        self.resume_mode = None;

        match change {
            SessionChange::Expired => {
                self.form = Some(FormState::new(FormKind::Login));
                self.banner = Some(Banner::error(GalleryError::SessionExpired.to_string()));
            }
            SessionChange::AccountDeleted => {
                self.form = None;
                self.banner = Some(Banner::info("Account deleted"));
            }
            _ => {
                self.form = None;
                self.banner = Some(Banner::info("Signed out"));
            }
        }

        if self.feed.mode().requires_auth() {
            self.detail = None;
            self.switch_mode(ViewMode::All)
        } else {
            vec![]
        }
    }

    fn drop_authorized_requests(&mut self) {
        let dropped: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, p)| p.authorized)
            .map(|(id, _)| *id)
            .collect();
        for id in &dropped {
            if let Some(PendingRequest { kind: Pending::Page(ticket), .. }) = self.pending.remove(id) {
                self.feed.abandon(&ticket);
            }
        }
        if !dropped.is_empty() {
            tracing::debug!(count = dropped.len(), "dropped authorized requests");
        }
    }
}
