//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input and
//! HTTP responses, translating them into state changes and action sequences.
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`, `LoadMore`, `Refresh`
//! - **Search**: `SearchMode`, `Char`, `Backspace`, `Submit`, `CycleSearchFilter`
//! - **View modes**: `ShowAll`, `ShowFavorites`, `ShowRated`, `ShowDepartments`
//! - **Artwork**: `ToggleFavorite`, rating slider events
//! - **Account**: `OpenForm`, `NextField`, `Logout`
//! - **System**: `Start`, `HttpResponse`
//!
//! `Char`, `Backspace`, `Escape` and `Submit` are routed by the current
//! [`Screen`]: the same key edits a form field, the search query, or nothing.

use crate::app::forms::FormKind;
use crate::app::modes::{InputMode, Screen, SearchFocus, ViewMode};
use crate::app::responses::handle_response;
use crate::app::{Action, AppState};
use crate::domain::error::Result;

/// Events triggered by user input or by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Issues the initial requests.
    Start,

    /// Moves the cursor down (requests the next page at the end of the list).
    KeyDown,
    /// Moves the cursor up (wraps to bottom).
    KeyUp,
    /// Hides the plugin pane.
    CloseFocus,

    /// Enters search mode with typing focus.
    SearchMode,
    /// Focuses the search input field (from navigating mode).
    FocusSearchBar,
    /// Appends a character to the search query or the focused form field.
    Char(char),
    /// Removes the last character of the search query or the focused form field.
    Backspace,
    /// Closes the innermost panel: form, detail, departments, then search.
    Escape,
    /// Confirms the current screen: search, department choice, detail, or form.
    Submit,
    /// Cycles the search filter between all fields, title and artist.
    CycleSearchFilter,

    ShowAll,
    ShowFavorites,
    ShowRated,
    ShowDepartments,
    /// Reloads the current mode from page 1.
    Refresh,
    /// Requests the next page of the current mode.
    LoadMore,

    /// Adds or removes the focused artwork from favorites.
    ToggleFavorite,
    /// Focuses the next rating criterion in the detail panel.
    NextCriterion,
    /// Focuses the previous rating criterion in the detail panel.
    PreviousCriterion,
    /// Raises the focused criterion by half a point.
    IncreaseScore,
    /// Lowers the focused criterion by half a point.
    DecreaseScore,
    /// Saves the detail panel's rating.
    SubmitRating,

    /// Opens an account form.
    OpenForm(FormKind),
    /// Moves focus to the next form field.
    NextField,
    /// Moves focus to the previous form field.
    PreviousField,
    /// Signs out locally.
    Logout,

    /// A response to a request issued through [`Action::Http`].
    HttpResponse {
        request_id: u64,
        /// HTTP status; `0` when the host got no response at all.
        status: u16,
        body: Vec<u8>,
    },
}

impl Event {
    /// Whether the event comes from the keyboard. Banners are cleared on input.
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        !matches!(self, Self::Start | Self::HttpResponse { .. })
    }
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Returns whether the UI should re-render and the actions to execute in order.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the signature stable for the
/// plugin shim, which logs errors instead of crashing the pane.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?EventName(event)).entered();

    if event.is_user_input() {
        state.banner = None;
    }

    let screen = state.screen();
    let outcome = match event {
        Event::Start => (true, state.start()),
        Event::HttpResponse { request_id, status, body } => handle_response(state, *request_id, *status, body),

        Event::KeyDown => match screen {
            Screen::Form => {
                with_form(state, |f| f.focus_next());
                (true, vec![])
            }
            Screen::Detail => {
                state.cycle_criterion(true);
                (true, vec![])
            }
            Screen::Browse | Screen::Departments => (true, state.move_selection_down()),
        },
        Event::KeyUp => {
            match screen {
                Screen::Form => with_form(state, |f| f.focus_previous()),
                Screen::Detail => state.cycle_criterion(false),
                Screen::Browse | Screen::Departments => state.move_selection_up(),
            }
            (true, vec![])
        }
        Event::CloseFocus => (false, vec![Action::CloseFocus]),

        Event::SearchMode => {
            if screen != Screen::Browse {
                return Ok((false, vec![]));
            }
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            state.search_query = match state.feed.mode() {
                ViewMode::Search { query, .. } => query.clone(),
                _ => String::new(),
            };
            (true, vec![])
        }
        Event::FocusSearchBar => {
            if matches!(state.input_mode, InputMode::Search(_)) {
                state.input_mode = InputMode::Search(SearchFocus::Typing);
            }
            (true, vec![])
        }
        Event::Char(c) => match screen {
            Screen::Form => {
                with_form(state, |f| f.push_char(*c));
                (true, vec![])
            }
            Screen::Browse if state.input_mode == InputMode::Search(SearchFocus::Typing) => {
                state.search_query.push(*c);
                tracing::trace!(query = %state.search_query, "search query updated");
                (true, vec![])
            }
            _ => (false, vec![]),
        },
        Event::Backspace => match screen {
            Screen::Form => {
                with_form(state, |f| f.pop_char());
                (true, vec![])
            }
            Screen::Browse if state.input_mode == InputMode::Search(SearchFocus::Typing) => {
                state.search_query.pop();
                (true, vec![])
            }
            _ => (false, vec![]),
        },
        Event::Escape => match screen {
            Screen::Form => {
                state.close_form();
                (true, vec![])
            }
            Screen::Detail => {
                state.close_detail();
                (true, vec![])
            }
            Screen::Departments => {
                state.show_departments = false;
                (true, vec![])
            }
            Screen::Browse => {
                let was_searching = matches!(state.input_mode, InputMode::Search(_));
                state.input_mode = InputMode::Normal;
                state.search_query.clear();
                if was_searching && matches!(state.feed.mode(), ViewMode::Search { .. }) {
                    (true, state.switch_mode(ViewMode::All))
                } else {
                    (was_searching, vec![])
                }
            }
        },
        Event::Submit => match screen {
            Screen::Form => (true, state.submit_form()),
            Screen::Detail => (true, state.submit_rating()),
            Screen::Departments => (true, state.select_department()),
            Screen::Browse => match state.input_mode {
                InputMode::Search(SearchFocus::Typing) => {
                    let mode = ViewMode::search(&state.search_query, state.search_filter);
                    state.input_mode = if mode == ViewMode::All {
                        InputMode::Normal
                    } else {
                        InputMode::Search(SearchFocus::Navigating)
                    };
                    tracing::debug!(?mode, "search submitted");
                    (true, state.switch_mode(mode))
                }
                _ => (true, state.open_detail()),
            },
        },
        Event::CycleSearchFilter => {
            state.search_filter = state.search_filter.next();
            tracing::debug!(filter = ?state.search_filter, "search filter changed");
            (true, vec![])
        }

        Event::ShowAll => (true, leave_search(state, ViewMode::All)),
        Event::ShowFavorites => (true, leave_search(state, ViewMode::Favorites)),
        Event::ShowRated => (true, leave_search(state, ViewMode::Rated)),
        Event::ShowDepartments => {
            if screen != Screen::Browse {
                return Ok((false, vec![]));
            }
            (true, state.open_departments())
        }
        Event::Refresh => (true, state.refresh()),
        Event::LoadMore => {
            let actions = state.load_more();
            (!actions.is_empty(), actions)
        }

        Event::ToggleFavorite => (true, state.toggle_favorite()),
        Event::NextCriterion => {
            state.cycle_criterion(true);
            (true, vec![])
        }
        Event::PreviousCriterion => {
            state.cycle_criterion(false);
            (true, vec![])
        }
        Event::IncreaseScore => {
            state.nudge_score(1);
            (true, vec![])
        }
        Event::DecreaseScore => {
            state.nudge_score(-1);
            (true, vec![])
        }
        Event::SubmitRating => (true, state.submit_rating()),

        Event::OpenForm(kind) => {
            state.open_form(*kind);
            (true, vec![])
        }
        Event::NextField => {
            with_form(state, |f| f.focus_next());
            (true, vec![])
        }
        Event::PreviousField => {
            with_form(state, |f| f.focus_previous());
            (true, vec![])
        }
        Event::Logout => (true, state.logout()),
    };

    Ok(outcome)
}

fn with_form(state: &mut AppState, f: impl FnOnce(&mut crate::app::forms::FormState)) {
    if let Some(form) = state.form.as_mut() {
        f(form);
    }
}

/// Switches to a non-search mode, leaving search input first.
fn leave_search(state: &mut AppState, mode: ViewMode) -> Vec<Action> {
    state.input_mode = InputMode::Normal;
    state.search_query.clear();
    state.show_departments = false;
    state.detail = None;
    state.switch_mode(mode)
}

/// Span label that keeps response bodies and typed characters out of traces.
struct EventName<'a>(&'a Event);

impl std::fmt::Debug for EventName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Event::Char(_) => f.write_str("Char"),
            Event::HttpResponse { request_id, status, body } => {
                write!(f, "HttpResponse(id={request_id}, status={status}, bytes={})", body.len())
            }
            other => write!(f, "{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, HttpMethod, HttpRequest};
    use crate::auth::{AuthService, SessionStore};
    use crate::domain::artwork::ArtworkId;
    use crate::domain::rating::Rating;
    use crate::domain::user::{Session, UserProfile};
    use crate::storage::{AuthStorage, MemoryStore};
    use crate::ui::theme::Theme;
    use serde_json::{json, Value};

    fn state() -> AppState {
        let auth = AuthService::new(ApiClient::new("http://gallery.test").unwrap());
        let session = SessionStore::load(AuthStorage::new(Box::new(MemoryStore::new())));
        AppState::new(auth, session, 20, Theme::default())
    }

    fn signed_in() -> AppState {
        let mut state = state();
        let user = UserProfile {
            id: "1".to_string(),
            username: "ada".to_string(),
            email: "ada@example.org".to_string(),
            created_at: None,
        };
        state.session.login_succeeded(Session::new("tok-ada".to_string(), user));
        state
    }

    fn send(state: &mut AppState, event: Event) -> (bool, Vec<Action>) {
        handle_event(state, &event).unwrap()
    }

    fn respond(state: &mut AppState, request: &HttpRequest, status: u16, body: &Value) -> (bool, Vec<Action>) {
        send(
            state,
            Event::HttpResponse {
                request_id: request.request_id,
                status,
                body: body.to_string().into_bytes(),
            },
        )
    }

    fn find<'a>(actions: &'a [Action], url_part: &str) -> &'a HttpRequest {
        actions
            .iter()
            .filter_map(Action::request)
            .find(|r| r.url.contains(url_part))
            .unwrap_or_else(|| panic!("no request for {url_part} in {actions:?}"))
    }

    fn only(actions: &[Action]) -> HttpRequest {
        assert_eq!(actions.len(), 1, "expected one action, got {actions:?}");
        actions[0].request().unwrap().clone()
    }

    fn artworks(ids: std::ops::Range<u32>) -> Vec<Value> {
        ids.map(|i| json!({"id": i, "title": format!("Water Lilies {i}"), "artist": "Claude Monet"}))
            .collect()
    }

    fn page(ids: std::ops::Range<u32>, page: u32, pages: u32, total: u32) -> Value {
        json!({
            "artworks": artworks(ids),
            "pagination": {"page": page, "limit": 20, "total": total, "pages": pages}
        })
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            send(state, Event::Char(c));
        }
    }

    fn fill_form(state: &mut AppState, values: &[&str]) {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                send(state, Event::NextField);
            }
            type_text(state, value);
        }
    }

    /// Starts the app and answers the first collection page with three artworks.
    fn loaded(state: &mut AppState) -> Vec<Action> {
        let (_, actions) = send(state, Event::Start);
        let first = find(&actions, "/api/artworks?").clone();
        respond(state, &first, 200, &json!({"artworks": artworks(1..4)}));
        actions
    }

    fn ids(state: &AppState) -> Vec<String> {
        state.feed.items().iter().map(|a| a.id.to_string()).collect()
    }

    #[test]
    fn start_signed_out_fetches_collection_and_stats() {
        let mut state = state();
        let (render, actions) = send(&mut state, Event::Start);

        assert!(render);
        assert_eq!(actions.len(), 2);
        let list = find(&actions, "/api/artworks?page=1&limit=20");
        assert!(!list.is_authorized());
        find(&actions, "/api/stats");
        assert!(state.feed.is_loading());
    }

    #[test]
    fn start_signed_in_also_syncs_favorites() {
        let mut state = signed_in();
        let (_, actions) = send(&mut state, Event::Start);

        assert_eq!(actions.len(), 3);
        let sync = find(&actions, "/api/favorites?page=1&limit=100");
        assert_eq!(sync.headers.get("Authorization").map(String::as_str), Some("Bearer tok-ada"));
        assert!(!find(&actions, "/api/artworks?").is_authorized());
    }

    #[test]
    fn search_loads_more_until_last_page() {
        let mut state = state();
        send(&mut state, Event::Start);
        send(&mut state, Event::SearchMode);
        type_text(&mut state, "monet");
        let (_, actions) = send(&mut state, Event::Submit);

        let first = only(&actions);
        assert!(first.url.contains("/api/search?q=monet&page=1&limit=20"));
        assert_eq!(state.input_mode, InputMode::Search(SearchFocus::Navigating));

        respond(&mut state, &first, 200, &page(0..20, 1, 2, 40));
        assert_eq!(state.feed.items().len(), 20);
        assert!(state.feed.pagination().has_next);

        state.selected_index = 19;
        let (_, actions) = send(&mut state, Event::KeyDown);
        let second = only(&actions);
        assert!(second.url.contains("page=2"));
        assert!(state.feed.is_loading_more());

        // A second request for the same page is not issued while one is in flight.
        let (render, actions) = send(&mut state, Event::LoadMore);
        assert!(!render);
        assert!(actions.is_empty());

        respond(&mut state, &second, 200, &page(20..40, 2, 2, 40));
        assert_eq!(state.feed.items().len(), 40);
        assert_eq!(ids(&state)[20], "20");
        assert!(!state.feed.pagination().has_next);

        let (render, actions) = send(&mut state, Event::LoadMore);
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn monet_search_grows_to_forty_with_pages_left() {
        let mut state = state();
        send(&mut state, Event::Start);
        send(&mut state, Event::SearchMode);
        type_text(&mut state, "monet");
        let (_, actions) = send(&mut state, Event::Submit);
        let first = only(&actions);

        let page_one = json!({
            "artworks": artworks(0..20),
            "pagination": {"page": 1, "limit": 20, "total": 60, "totalPages": 3, "hasNext": true}
        });
        respond(&mut state, &first, 200, &page_one);
        assert_eq!(state.feed.items().len(), 20);
        assert!(state.feed.pagination().has_next);

        let (_, actions) = send(&mut state, Event::LoadMore);
        let second = only(&actions);
        assert!(second.url.contains("page=2"));

        let page_two = json!({
            "artworks": artworks(20..40),
            "pagination": {"page": 2, "limit": 20, "total": 60, "totalPages": 3, "hasNext": true}
        });
        respond(&mut state, &second, 200, &page_two);

        let expected: Vec<String> = (0..40).map(|i| i.to_string()).collect();
        assert_eq!(ids(&state), expected);
        assert!(state.feed.pagination().has_next);
    }

    #[test]
    fn page_for_previous_mode_is_discarded() {
        let mut state = state();
        let (_, actions) = send(&mut state, Event::Start);
        let collection = find(&actions, "/api/artworks?").clone();

        send(&mut state, Event::SearchMode);
        type_text(&mut state, "haystacks");
        let (_, actions) = send(&mut state, Event::Submit);
        let search = only(&actions);

        let (render, _) = respond(&mut state, &collection, 200, &page(0..20, 1, 5, 100));
        assert!(!render);
        assert!(state.feed.items().is_empty());
        assert!(state.feed.is_loading());

        respond(&mut state, &search, 200, &json!({"artworks": artworks(7..9)}));
        assert_eq!(ids(&state), vec!["7", "8"]);
        assert!(!state.feed.pagination().has_next);
    }

    #[test]
    fn failed_first_page_shows_error_and_empty_list() {
        let mut state = state();
        let (_, actions) = send(&mut state, Event::Start);
        let list = find(&actions, "/api/artworks?").clone();

        respond(&mut state, &list, 500, &json!({"error": "database unavailable"}));

        assert!(state.feed.items().is_empty());
        assert!(state.feed.is_loaded());
        let banner = state.banner.clone().unwrap();
        assert_eq!(banner.kind, crate::app::BannerKind::Error);
        assert!(banner.text.contains("database unavailable"));
    }

    #[test]
    fn escape_from_search_returns_to_collection() {
        let mut state = state();
        send(&mut state, Event::Start);
        send(&mut state, Event::SearchMode);
        type_text(&mut state, "wave");
        send(&mut state, Event::Submit);

        let (_, actions) = send(&mut state, Event::Escape);
        assert!(only(&actions).url.contains("/api/artworks?page=1"));
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.feed.mode(), &ViewMode::All);
    }

    #[test]
    fn department_picker_switches_feed() {
        let mut state = state();
        send(&mut state, Event::Start);

        let (_, actions) = send(&mut state, Event::ShowDepartments);
        let departments = only(&actions);
        assert!(departments.url.ends_with("/api/departments"));
        assert_eq!(state.screen(), Screen::Departments);

        respond(&mut state, &departments, 200, &json!(["Paintings", "Drawings and Prints"]));
        send(&mut state, Event::KeyDown);
        let (_, actions) = send(&mut state, Event::Submit);

        let request = only(&actions);
        assert!(request.url.contains("/api/artworks/by-department/Drawings%20and%20Prints?page=1"));
        assert_eq!(state.screen(), Screen::Browse);
        assert_eq!(state.feed.mode(), &ViewMode::Department("Drawings and Prints".to_string()));
    }

    #[test]
    fn register_signs_in_and_refetches() {
        let mut state = state();
        loaded(&mut state);

        send(&mut state, Event::OpenForm(FormKind::Register));
        fill_form(&mut state, &["ada", "ada@example.org", "secret1", "secret1"]);
        let (_, actions) = send(&mut state, Event::Submit);

        let register = only(&actions);
        assert_eq!(register.method, HttpMethod::Post);
        assert!(register.url.ends_with("/api/auth/register"));
        assert!(!register.is_authorized());
        assert!(state.form.as_ref().unwrap().submitting);

        let body = json!({
            "token": "tok-new",
            "user": {"id": 9, "username": "ada", "email": "ada@example.org", "created_at": "2024-03-01T10:00:00Z"}
        });
        let (_, actions) = respond(&mut state, &register, 201, &body);

        assert!(state.session.is_authenticated());
        assert_eq!(state.session.token(), Some("tok-new"));
        assert_eq!(state.session.user().map(|u| u.email.as_str()), Some("ada@example.org"));
        assert!(state.form.is_none());
        assert!(find(&actions, "/api/favorites?").is_authorized());
        find(&actions, "/api/artworks?page=1");
    }

    #[test]
    fn register_with_mismatched_passwords_sends_nothing() {
        let mut state = state();
        send(&mut state, Event::OpenForm(FormKind::Register));
        fill_form(&mut state, &["ada", "ada@example.org", "secret1", "secret2"]);

        let (_, actions) = send(&mut state, Event::Submit);

        assert!(actions.is_empty());
        let form = state.form.as_ref().unwrap();
        assert!(!form.submitting);
        assert!(form.error.as_deref().unwrap().contains("do not match"));
    }

    #[test]
    fn rejected_login_keeps_form_with_backend_message() {
        let mut state = state();
        send(&mut state, Event::OpenForm(FormKind::Login));
        fill_form(&mut state, &["ada@example.org", "wrong"]);
        let (_, actions) = send(&mut state, Event::Submit);

        respond(&mut state, &only(&actions), 401, &json!({"error": "Invalid credentials"}));

        assert!(!state.session.is_authenticated());
        let form = state.form.as_ref().unwrap();
        assert!(form.error.as_deref().unwrap().contains("Invalid credentials"));
    }

    #[test]
    fn favorites_mode_requires_sign_in_and_resumes_after() {
        let mut state = state();
        loaded(&mut state);

        let (_, actions) = send(&mut state, Event::ShowFavorites);
        assert!(actions.is_empty());
        assert_eq!(state.form.as_ref().map(|f| f.kind), Some(FormKind::Login));

        fill_form(&mut state, &["ada@example.org", "secret1"]);
        let (_, actions) = send(&mut state, Event::Submit);
        let body = json!({"token": "tok-ada", "user": {"id": 1, "username": "ada", "email": "ada@example.org"}});
        let (_, actions) = respond(&mut state, &only(&actions), 200, &body);

        assert_eq!(state.feed.mode(), &ViewMode::Favorites);
        find(&actions, "/api/favorites?page=1&limit=20");
        find(&actions, "/api/favorites?page=1&limit=100");
    }

    #[test]
    fn favorite_toggles_only_on_confirmation() {
        let mut state = signed_in();
        loaded(&mut state);
        let id = ArtworkId::new("1");

        let (_, actions) = send(&mut state, Event::ToggleFavorite);
        let add = only(&actions);
        assert_eq!(add.method, HttpMethod::Post);
        assert!(add.url.ends_with("/api/favorites/1"));
        assert!(!state.favorites.contains(&id));

        let (_, repeated) = send(&mut state, Event::ToggleFavorite);
        assert!(repeated.is_empty());

        respond(&mut state, &add, 201, &json!({"message": "added"}));
        assert!(state.favorites.contains(&id));

        let (_, actions) = send(&mut state, Event::ToggleFavorite);
        let remove = only(&actions);
        assert_eq!(remove.method, HttpMethod::Delete);
        respond(&mut state, &remove, 200, &json!({}));
        assert!(!state.favorites.contains(&id));
    }

    #[test]
    fn favorite_while_signed_out_opens_login() {
        let mut state = state();
        loaded(&mut state);

        let (_, actions) = send(&mut state, Event::ToggleFavorite);

        assert!(actions.is_empty());
        assert_eq!(state.screen(), Screen::Form);
    }

    #[test]
    fn favorites_sync_follows_pages() {
        let mut state = signed_in();
        let (_, actions) = send(&mut state, Event::Start);
        let sync = find(&actions, "/api/favorites?page=1").clone();

        let (_, actions) = respond(&mut state, &sync, 200, &page(0..100, 1, 2, 130));
        let next = only(&actions);
        assert!(next.url.contains("/api/favorites?page=2&limit=100"));

        respond(&mut state, &next, 200, &page(100..130, 2, 2, 130));
        assert_eq!(state.favorites.len(), 130);
    }

    #[test]
    fn rating_loads_then_reverts_on_failed_save() {
        let mut state = signed_in();
        loaded(&mut state);
        let id = ArtworkId::new("1");

        let (_, actions) = send(&mut state, Event::Submit);
        assert_eq!(state.screen(), Screen::Detail);
        let load = only(&actions);
        assert!(load.url.ends_with("/api/ratings/1"));

        respond(&mut state, &load, 200, &json!({"overall_rating": "4", "technique_rating": 3.5}));
        assert!((state.detail.as_ref().unwrap().draft.overall - 4.0).abs() < f32::EPSILON);

        send(&mut state, Event::IncreaseScore);
        let (_, actions) = send(&mut state, Event::SubmitRating);
        let save = only(&actions);
        assert_eq!(save.method, HttpMethod::Post);
        assert!((state.rating_for(&id).overall - 4.5).abs() < f32::EPSILON);
        assert!(state.is_saving_rating(&id));

        respond(&mut state, &save, 500, &json!({"error": "write failed"}));
        assert!((state.rating_for(&id).overall - 4.0).abs() < f32::EPSILON);
        assert!((state.detail.as_ref().unwrap().draft.overall - 4.0).abs() < f32::EPSILON);
        assert!(state.banner.as_ref().unwrap().text.contains("write failed"));
    }

    fn score(state: &mut AppState, half_steps: usize) {
        for _ in 0..half_steps {
            send(state, Event::IncreaseScore);
        }
    }

    #[test]
    fn saved_rating_reopens_with_all_four_values() {
        let mut state = signed_in();
        loaded(&mut state);
        let expected = Rating::new(4.5, 3.0, 5.0, 2.0);

        let (_, actions) = send(&mut state, Event::Submit);
        respond(&mut state, &only(&actions), 200, &Value::Null);
        score(&mut state, 9);
        send(&mut state, Event::NextCriterion);
        score(&mut state, 6);
        send(&mut state, Event::NextCriterion);
        score(&mut state, 10);
        send(&mut state, Event::NextCriterion);
        score(&mut state, 4);

        let (_, actions) = send(&mut state, Event::SubmitRating);
        let save = only(&actions);
        let body: Value = serde_json::from_slice(&save.body).unwrap();
        assert_eq!(body, json!({"overall": 4.5, "technique": 3.0, "originality": 5.0, "emotion": 2.0}));
        respond(&mut state, &save, 200, &json!({"message": "saved"}));
        send(&mut state, Event::Escape);

        let (_, actions) = send(&mut state, Event::Submit);
        assert_eq!(state.detail.as_ref().unwrap().draft, expected);
        assert!(!state.detail.as_ref().unwrap().dirty);

        let stored = json!({
            "overall_rating": 4.5, "technique_rating": "3", "originality_rating": 5, "emotion_rating": 2
        });
        respond(&mut state, &only(&actions), 200, &stored);
        assert_eq!(state.detail.as_ref().unwrap().draft, expected);
        assert_eq!(state.rating_for(&ArtworkId::new("1")), expected);
    }

    #[test]
    fn refused_token_ends_session() {
        let mut state = signed_in();
        loaded(&mut state);
        state.favorites.insert(ArtworkId::new("2"));

        let (_, actions) = send(&mut state, Event::ToggleFavorite);
        let (render, _) = respond(&mut state, &only(&actions), 401, &json!({"error": "jwt expired"}));

        assert!(render);
        assert!(!state.session.is_authenticated());
        assert!(state.favorites.is_empty());
        assert_eq!(state.form.as_ref().map(|f| f.kind), Some(FormKind::Login));
        assert_eq!(state.banner.as_ref().map(|b| b.kind), Some(crate::app::BannerKind::Error));
        assert!(state.pending().all(|(_, p)| !p.authorized));
    }

    #[test]
    fn responses_after_logout_are_ignored() {
        let mut state = signed_in();
        loaded(&mut state);

        let (_, actions) = send(&mut state, Event::ToggleFavorite);
        let add = only(&actions);
        send(&mut state, Event::Logout);

        let (render, actions) = respond(&mut state, &add, 201, &json!({}));
        assert!(!render);
        assert!(actions.is_empty());
        assert!(state.favorites.is_empty());
    }

    #[test]
    fn logout_from_rated_returns_to_collection() {
        let mut state = signed_in();
        loaded(&mut state);
        send(&mut state, Event::ShowRated);

        let (_, actions) = send(&mut state, Event::Logout);

        assert_eq!(state.feed.mode(), &ViewMode::All);
        assert!(!only(&actions).is_authorized());
        assert_eq!(state.banner.as_ref().map(|b| b.text.as_str()), Some("Signed out"));
    }

    #[test]
    fn user_input_clears_banner() {
        let mut state = signed_in();
        loaded(&mut state);
        send(&mut state, Event::Logout);
        assert!(state.banner.is_some());

        send(&mut state, Event::KeyDown);
        assert!(state.banner.is_none());
    }

    #[test]
    fn login_form_refused_while_signed_in() {
        let mut state = signed_in();
        loaded(&mut state);

        send(&mut state, Event::OpenForm(FormKind::Login));
        assert!(state.form.is_none());
        send(&mut state, Event::OpenForm(FormKind::Register));
        assert!(state.form.is_none());
        assert!(state.banner.as_ref().unwrap().text.contains("Already signed in"));
    }

    #[test]
    fn new_sign_in_discards_previous_users_data() {
        let mut state = signed_in();
        loaded(&mut state);
        state.ratings.insert(ArtworkId::new("5"), Rating::new(4.5, 3.0, 5.0, 2.0));
        state.favorites.insert(ArtworkId::new("5"));
        let (_, actions) = send(&mut state, Event::ToggleFavorite);
        let stale_toggle = only(&actions);

        let bob = UserProfile {
            id: "2".to_string(),
            username: "bob".to_string(),
            email: "bob@example.org".to_string(),
            created_at: None,
        };
        let change = state.session.login_succeeded(Session::new("tok-bob".to_string(), bob));
        let actions = state.apply_session_change(change);

        assert!(state.ratings.is_empty());
        assert!(state.favorites.is_empty());
        let sync = find(&actions, "/api/favorites?page=1&limit=100");
        assert_eq!(sync.headers.get("Authorization").map(String::as_str), Some("Bearer tok-bob"));

        let (render, _) = respond(&mut state, &stale_toggle, 201, &json!({}));
        assert!(!render);
        assert!(!state.favorites.contains(&ArtworkId::new("1")));
    }

    #[test]
    fn signing_in_from_detail_loads_its_rating() {
        let mut state = state();
        loaded(&mut state);

        let (_, actions) = send(&mut state, Event::Submit);
        assert!(actions.is_empty());
        send(&mut state, Event::SubmitRating);
        assert_eq!(state.form.as_ref().map(|f| f.kind), Some(FormKind::Login));

        fill_form(&mut state, &["ada@example.org", "secret1"]);
        let (_, actions) = send(&mut state, Event::Submit);
        let body = json!({"token": "tok-ada", "user": {"id": 1, "username": "ada", "email": "ada@example.org"}});
        let (_, actions) = respond(&mut state, &only(&actions), 200, &body);

        assert_eq!(state.screen(), Screen::Detail);
        let load = find(&actions, "/api/ratings/1").clone();
        respond(&mut state, &load, 200, &json!({"overall_rating": 3, "emotion_rating": 4.5}));
        let draft = state.detail.as_ref().unwrap().draft;
        assert_eq!(draft, Rating::new(3.0, 0.0, 0.0, 4.5));
    }
}
