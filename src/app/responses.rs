//! Interpretation of HTTP responses against the pending-request table.
//!
//! Each response is matched to the [`Pending`] entry recorded when its request
//! was issued. Authorized calls answered with 401/403 end the session before
//! anything else happens.

use crate::api::response::{self, is_success};
use crate::app::actions::Action;
use crate::app::feed::FeedUpdate;
use crate::app::forms::FormKind;
use crate::app::modes::ViewMode;
use crate::app::state::{AppState, Banner, Pending, PendingRequest, FAVORITE_SYNC_LIMIT};
use crate::auth::AuthService;
use crate::domain::error::{GalleryError, Result};

/// Processes one HTTP response. Returns whether to re-render and follow-up actions.
pub fn handle_response(state: &mut AppState, request_id: u64, status: u16, body: &[u8]) -> (bool, Vec<Action>) {
    let Some(PendingRequest { kind, authorized }) = state.take_pending(request_id) else {
        tracing::debug!(request_id, status, "response for unknown or dropped request");
        return (false, vec![]);
    };

    let _span = tracing::debug_span!("handle_response", request_id, status, kind = ?kind).entered();

    if authorized {
        if let Err(e) = AuthService::check_authorized(status) {
            tracing::warn!(error = %e, "ending session");
            if let Pending::Page(ticket) = &kind {
                state.feed.abandon(ticket);
            }
            return (true, state.expire_session());
        }
    }

    match kind {
        Pending::Page(ticket) => {
            let result = checked(status, body)
                .and_then(|()| response::decode_artwork_page(body, ticket.page, state.feed.limit()));
            match result {
                Ok(page) => {
                    let ratings = page.ratings.clone();
                    let ids: Vec<_> = page.artworks.iter().map(|a| a.id.clone()).collect();
                    let update = state.feed.apply(&ticket, page);
                    if update == FeedUpdate::Stale {
                        return (false, vec![]);
                    }
                    for (id, rating) in ratings {
                        state.install_rating(id, rating);
                    }
                    if ticket.mode == ViewMode::Favorites {
                        state.favorites.extend(ids);
                    }
                    state.clamp_selection();
                    tracing::debug!(?update, total = state.feed.items().len(), "feed updated");
                    (true, vec![])
                }
                Err(e) => {
                    if !state.feed.fail(&ticket, &e) {
                        return (false, vec![]);
                    }
                    state.clamp_selection();
                    state.banner = Some(Banner::error(format!("Could not load artworks: {e}")));
                    (true, vec![])
                }
            }
        }
        Pending::FavoriteSync { page } => {
            match checked(status, body).and_then(|()| response::decode_artwork_page(body, page, FAVORITE_SYNC_LIMIT)) {
                Ok(fetched) => {
                    if page == 1 {
                        state.favorites.clear();
                    }
                    state.favorites.extend(fetched.artworks.into_iter().map(|a| a.id));
                    tracing::debug!(page, count = state.favorites.len(), "favorites synced");
                    let actions = if fetched.pagination.has_next {
                        vec![state.sync_favorites(page + 1)]
                    } else {
                        vec![]
                    };
                    (true, actions)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "favorites sync failed");
                    (false, vec![])
                }
            }
        }
        Pending::Favorite { id, add } => {
            if let Err(e) = checked(status, body) {
                tracing::warn!(artwork_id = %id, add, error = %e, "favorite update failed");
                return (false, vec![]);
            }
            if add {
                state.favorites.insert(id);
            } else {
                state.favorites.remove(&id);
                if state.feed.mode() == &ViewMode::Favorites && state.feed.remove(&id) {
                    state.clamp_selection();
                }
            }
            (true, vec![])
        }
        Pending::LoadRating(id) => match checked(status, body).and_then(|()| response::decode_rating(body)) {
            Ok(rating) => {
                state.install_rating(id, rating);
                (true, vec![])
            }
            Err(e) => {
                tracing::warn!(artwork_id = %id, error = %e, "rating fetch failed");
                (false, vec![])
            }
        },
        Pending::SaveRating { id, previous, submitted } => {
            if let Err(e) = checked(status, body) {
                tracing::warn!(artwork_id = %id, error = %e, "rating save failed, reverting");
                state.revert_rating(&id, previous, submitted);
                state.banner = Some(Banner::error(format!("Could not save rating: {e}")));
                return (true, vec![]);
            }
            state.banner = Some(Banner::info("Rating saved"));
            let actions = if state.feed.mode() == &ViewMode::Rated {
                state.refresh()
            } else {
                vec![]
            };
            (true, actions)
        }
        Pending::Departments => {
            match checked(status, body).and_then(|()| response::decode_departments(body)) {
                Ok(departments) => {
                    tracing::debug!(count = departments.len(), "departments loaded");
                    state.departments = departments;
                    state.department_index = 0;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "departments fetch failed");
                    state.banner = Some(Banner::error(format!("Could not load departments: {e}")));
                }
            }
            (true, vec![])
        }
        Pending::Stats => match checked(status, body).and_then(|()| response::decode_stats(body)) {
            Ok(stats) => {
                state.stats = Some(stats);
                (true, vec![])
            }
            Err(e) => {
                tracing::warn!(error = %e, "stats fetch failed");
                (false, vec![])
            }
        },
        Pending::Form(kind) => handle_form_response(state, kind, status, body),
    }
}

fn handle_form_response(state: &mut AppState, kind: FormKind, status: u16, body: &[u8]) -> (bool, Vec<Action>) {
    let outcome: Result<Option<String>> = match kind {
        FormKind::Login => match AuthService::complete_login(status, body) {
            Ok(session) => {
                let change = state.session.login_succeeded(session);
                return (true, state.apply_session_change(change));
            }
            Err(e) => Err(e),
        },
        FormKind::Register => match AuthService::complete_register(status, body) {
            Ok(session) => {
                let change = state.session.register_succeeded(session);
                return (true, state.apply_session_change(change));
            }
            Err(e) => Err(e),
        },
        FormKind::DeleteAccount => match form_checked(status, body) {
            Ok(()) => {
                let change = state.session.account_deleted();
                return (true, state.apply_session_change(change));
            }
            Err(e) => Err(e),
        },
        FormKind::ChangePassword => form_checked(status, body).map(|()| Some("Password changed".to_string())),
        FormKind::ForgotPassword => form_checked(status, body).map(|()| {
            Some(response::decode_message(body).unwrap_or_else(|| "Check your inbox for a reset link".to_string()))
        }),
        FormKind::ResetPassword => form_checked(status, body).map(|()| {
            Some(response::decode_message(body).unwrap_or_else(|| "Password reset, you can sign in now".to_string()))
        }),
    };

    let Some(form) = state.form.as_mut().filter(|f| f.kind == kind) else {
        tracing::debug!(form = ?kind, "form closed before response arrived");
        return (false, vec![]);
    };
    match outcome {
        Ok(notice) => {
            if kind == FormKind::ChangePassword {
                form.clear_values();
            }
            form.finish_with_notice(notice.unwrap_or_default());
        }
        Err(e) => {
            tracing::debug!(form = ?kind, error = %e, "form submission failed");
            form.finish_with_error(&e);
        }
    }
    (true, vec![])
}

/// Maps a non-success status to its error.
fn checked(status: u16, body: &[u8]) -> Result<()> {
    if is_success(status) {
        Ok(())
    } else {
        Err(response::status_error(status, body))
    }
}

/// Like [`checked`], but client errors carry only the backend's message so
/// forms can show it as is.
fn form_checked(status: u16, body: &[u8]) -> Result<()> {
    match status {
        400..=499 => Err(GalleryError::Validation(
            response::error_message(body).unwrap_or_else(|| format!("Request refused ({status})")),
        )),
        _ => checked(status, body),
    }
}
