//! Zellij plugin wrapper and entry point.
//!
//! This module is the thin integration layer between the Galleria library and
//! the Zellij plugin system. It implements `ZellijPlugin`, translates host
//! events into library events, and performs the actions the library returns.
//!
//! # Plugin Lifecycle
//!
//! 1. **Load**: Parse config, initialize tracing, create `AppState`
//! 2. **Subscribe**: Register for `Key`, `WebRequestResult`, `PermissionRequestResult`
//! 3. **Start**: Once `WebAccess` is granted, dispatch `Event::Start`
//! 4. **Update**: Handle events, delegate to library layer, issue requests
//! 5. **Render**: Call library render function
//!
//! # Request Correlation
//!
//! Each outgoing `web_request` carries a context map with the library's
//! request id (and the current trace id). Zellij echoes the map back in
//! `WebRequestResult`, which becomes `Event::HttpResponse`.
//!
//! # Keybindings
//!
//! Global (all screens):
//! - `Ctrl+n`: Move down
//! - `Ctrl+p`: Move up
//!
//! Browse, normal mode:
//! - `j`/`k`/arrows: Move selection
//! - `Enter`: Open artwork detail
//! - `/`: Search
//! - `a`/`v`/`t`: All artworks, favorites, rated
//! - `d`: Department picker
//! - `r`: Refresh, `n`: Load more
//! - `f`: Toggle favorite
//! - `L`/`R`: Sign in, register
//! - `F`/`P`: Forgot password, reset password with code
//! - `p`/`x`: Change password, delete account
//! - `o`: Sign out
//! - `q`: Close plugin
//!
//! Search typing:
//! - Characters: Edit query
//! - `Tab`: Cycle filter
//! - `Enter`: Run search
//! - `Esc`: Leave search
//!
//! Detail:
//! - `j`/`k`: Focus criterion
//! - `h`/`l`/arrows: Adjust score
//! - `s`: Save rating, `f`: Toggle favorite
//! - `Esc`: Close
//!
//! Forms:
//! - `Tab`/`Shift+Tab`/arrows: Move between fields
//! - `Enter`: Submit, `Esc`: Cancel

#![allow(clippy::multiple_crate_versions)]
#![cfg_attr(not(target_family = "wasm"), allow(dead_code, unused_imports))]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;

use galleria::api::request::request_id_from_context;
use galleria::api::HttpMethod;
use galleria::app::FormKind;
use galleria::{handle_event, Action, AppState, Config, Event, InputMode, Screen, SearchFocus};

#[cfg(target_family = "wasm")]
register_plugin!(State);

/// Plugin state wrapper.
///
/// Holds the library's `AppState` once configuration has been loaded.
#[derive(Default)]
struct State {
    app: Option<AppState>,
}

impl ZellijPlugin for State {
    /// Initializes the plugin on load.
    ///
    /// # Permissions
    ///
    /// Requests `WebAccess` for talking to the gallery backend.
    ///
    /// # Subscriptions
    ///
    /// - `Key`: Keyboard input
    /// - `WebRequestResult`: Backend responses
    /// - `PermissionRequestResult`: Starts the first fetches
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        galleria::observability::init_tracing(&config);

        let _guard = tracing::debug_span!("plugin_load").entered();

        tracing::debug!(api_url = %config.api_url, page_size = config.page_size, "parsed configuration");
        match galleria::initialize(&config) {
            Ok(app) => self.app = Some(app),
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize");
                return;
            }
        }

        request_permission(&[PermissionType::WebAccess]);
        subscribe(&[
            EventType::Key,
            EventType::WebRequestResult,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    /// Handles incoming Zellij events.
    ///
    /// Returns `true` if the plugin UI should re-render.
    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", event_type = %event_name);
        let _guard = span.entered();

        let Some(app) = self.app.as_ref() else {
            return false;
        };

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match Self::map_key_event(app, key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                match request_id_from_context(&context) {
                    Some(request_id) => Event::HttpResponse { request_id, status, body },
                    None => {
                        tracing::debug!(status, "response without request id");
                        return false;
                    }
                }
            }
            zellij_tile::prelude::Event::PermissionRequestResult(PermissionStatus::Granted) => {
                tracing::debug!("permissions granted - starting");
                Event::Start
            }
            zellij_tile::prelude::Event::PermissionRequestResult(PermissionStatus::Denied) => {
                tracing::warn!("web access denied - backend unreachable");
                return false;
            }
            _ => return false,
        };

        self.dispatch(&our_event)
    }

    fn render(&mut self, rows: usize, cols: usize) {
        if let Some(app) = self.app.as_ref() {
            galleria::ui::render(app, rows, cols);
        }
    }
}

impl State {
    fn dispatch(&mut self, event: &Event) -> bool {
        let Some(app) = self.app.as_mut() else {
            return false;
        };

        match handle_event(app, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                for action in &actions {
                    Self::execute_action(action);
                }
                should_render
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
                false
            }
        }
    }

    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => format!("WebRequestResult({status})"),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => "PermissionRequestResult".to_string(),
            _ => "Other".to_string(),
        }
    }

    /// Maps keyboard events to application events for the active screen.
    fn map_key_event(app: &AppState, key: &KeyWithModifier) -> Option<Event> {
        if key.has_modifiers(&[KeyModifier::Ctrl]) {
            return match key.bare_key {
                BareKey::Char('n') => Some(Event::KeyDown),
                BareKey::Char('p') => Some(Event::KeyUp),
                _ => None,
            };
        }

        match app.screen() {
            Screen::Form => Self::map_form_key(key),
            Screen::Detail => Self::map_detail_key(key),
            Screen::Departments => Self::map_departments_key(key),
            Screen::Browse => match app.input_mode {
                InputMode::Search(SearchFocus::Typing) => Self::map_search_key(key),
                InputMode::Search(SearchFocus::Navigating) => match key.bare_key {
                    BareKey::Char('/') => Some(Event::FocusSearchBar),
                    _ => Self::map_browse_key(key),
                },
                InputMode::Normal => Self::map_browse_key(key),
            },
        }
    }

    fn map_browse_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Down | BareKey::Char('j') => Event::KeyDown,
            BareKey::Up | BareKey::Char('k') => Event::KeyUp,
            BareKey::Enter => Event::Submit,
            BareKey::Esc => Event::Escape,
            BareKey::Char('/') => Event::SearchMode,
            BareKey::Char('a') => Event::ShowAll,
            BareKey::Char('v') => Event::ShowFavorites,
            BareKey::Char('t') => Event::ShowRated,
            BareKey::Char('d') => Event::ShowDepartments,
            BareKey::Char('r') => Event::Refresh,
            BareKey::Char('n') => Event::LoadMore,
            BareKey::Char('f') => Event::ToggleFavorite,
            BareKey::Char('L') => Event::OpenForm(FormKind::Login),
            BareKey::Char('R') => Event::OpenForm(FormKind::Register),
            BareKey::Char('F') => Event::OpenForm(FormKind::ForgotPassword),
            BareKey::Char('P') => Event::OpenForm(FormKind::ResetPassword),
            BareKey::Char('p') => Event::OpenForm(FormKind::ChangePassword),
            BareKey::Char('x') => Event::OpenForm(FormKind::DeleteAccount),
            BareKey::Char('o') => Event::Logout,
            BareKey::Char('q') => Event::CloseFocus,
            _ => return None,
        })
    }

    fn map_search_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Down => Event::KeyDown,
            BareKey::Up => Event::KeyUp,
            BareKey::Enter => Event::Submit,
            BareKey::Esc => Event::Escape,
            BareKey::Tab => Event::CycleSearchFilter,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) => Event::Char(c),
            _ => return None,
        })
    }

    fn map_departments_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Down | BareKey::Char('j') => Event::KeyDown,
            BareKey::Up | BareKey::Char('k') => Event::KeyUp,
            BareKey::Enter => Event::Submit,
            BareKey::Esc | BareKey::Char('d') => Event::Escape,
            BareKey::Char('q') => Event::CloseFocus,
            _ => return None,
        })
    }

    fn map_detail_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Down | BareKey::Char('j') => Event::NextCriterion,
            BareKey::Up | BareKey::Char('k') => Event::PreviousCriterion,
            BareKey::Right | BareKey::Char('l') => Event::IncreaseScore,
            BareKey::Left | BareKey::Char('h') => Event::DecreaseScore,
            BareKey::Char('s') | BareKey::Enter => Event::SubmitRating,
            BareKey::Char('f') => Event::ToggleFavorite,
            BareKey::Esc => Event::Escape,
            _ => return None,
        })
    }

    fn map_form_key(key: &KeyWithModifier) -> Option<Event> {
        if key.bare_key == BareKey::Tab && key.has_modifiers(&[KeyModifier::Shift]) {
            return Some(Event::PreviousField);
        }
        Some(match key.bare_key {
            BareKey::Tab | BareKey::Down => Event::NextField,
            BareKey::Up => Event::PreviousField,
            BareKey::Enter => Event::Submit,
            BareKey::Esc => Event::Escape,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) => Event::Char(c),
            _ => return None,
        })
    }

    /// Executes an action returned from event handling.
    #[tracing::instrument(level = "debug")]
    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => {
                tracing::debug!("closing plugin focus");
                hide_self();
            }
            Action::Http(request) => {
                let verb = match request.method {
                    HttpMethod::Get => HttpVerb::Get,
                    HttpMethod::Post => HttpVerb::Post,
                    HttpMethod::Delete => HttpVerb::Delete,
                };
                tracing::debug!(request_id = request.request_id, method = %request.method, url = %request.url, "issuing request");
                web_request(
                    &request.url,
                    verb,
                    request.headers.clone(),
                    request.body.clone(),
                    request.context(galleria::observability::current_trace_id()),
                );
            }
        }
    }
}

#[cfg(not(target_family = "wasm"))]
fn main() {}
