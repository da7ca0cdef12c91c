//! View model computation.
//!
//! Transforms an [`AppState`] snapshot into a [`UIViewModel`]: windowing the
//! artwork list around the cursor, fuzzy match highlighting of search results,
//! star glyphs for ratings, masked form fields and context-sensitive footer
//! keybindings.

use crate::api::endpoints::SearchFilter;
use crate::app::modes::{InputMode, Screen, SearchFocus, ViewMode};
use crate::app::state::{AppState, BannerKind};
use crate::domain::artwork::Artwork;
use crate::domain::rating::{stars, Criterion};
use crate::ui::viewmodel::{
    BannerInfo, Body, CriterionRow, DepartmentItem, DepartmentList, DetailView, DisplayItem, EmptyState, FieldRow,
    FooterInfo, FormView, HeaderInfo, ListView, SearchBarInfo, UIViewModel,
};
use fuzzy_matcher::skim::SkimMatcherV2;

const TITLE_COLUMN_WIDTH: usize = 44;
const MASK: char = '•';

impl AppState {
    /// Computes the view model for a terminal of `rows` x `cols`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # fn demo(state: &galleria::app::AppState) {
    /// let vm = state.compute_viewmodel(24, 80);
    /// println!("{}", vm.header.title);
    /// # }
    /// ```
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let body = match self.screen() {
            Screen::Form => self.compute_form(),
            Screen::Detail => self.compute_detail(),
            Screen::Departments => self.compute_departments(rows),
            Screen::Browse => self.compute_list(rows, cols),
        };

        UIViewModel {
            header: self.compute_header(),
            search_bar: self.compute_search_bar(),
            banner: self.banner.as_ref().map(|b| BannerInfo {
                text: b.text.clone(),
                is_error: b.kind == BannerKind::Error,
            }),
            body,
            footer: self.compute_footer(),
        }
    }

    fn compute_list(&self, rows: usize, cols: usize) -> Body {
        let items = self.feed.items();
        if items.is_empty() {
            return Body::Empty(self.compute_empty_state());
        }

        let available_rows = self.calculate_available_rows(rows);
        let mut visible_start = self.selected_index.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(items.len());
        if visible_end - visible_start < available_rows && items.len() >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let matcher = self.highlight_query().map(|q| (SkimMatcherV2::default(), q));
        let rows = items[visible_start..visible_end]
            .iter()
            .enumerate()
            .map(|(relative_idx, artwork)| {
                let highlight = matcher.as_ref().map(|(m, q)| (m, q.as_str()));
                self.compute_display_item(artwork, visible_start + relative_idx, cols, highlight)
            })
            .collect();

        Body::List(ListView {
            rows,
            status: self.compute_list_status(),
        })
    }

    fn compute_display_item(
        &self,
        artwork: &Artwork,
        absolute_idx: usize,
        cols: usize,
        highlight: Option<(&SkimMatcherV2, &str)>,
    ) -> DisplayItem {
        let artist_width = cols.saturating_sub(TITLE_COLUMN_WIDTH + 16);
        DisplayItem {
            title: truncate(&artwork.title, TITLE_COLUMN_WIDTH - 4),
            artist: truncate(artwork.artist_or_unknown(), artist_width),
            stars: stars(self.rating_for(&artwork.id).overall),
            is_selected: absolute_idx == self.selected_index,
            is_favorite: self.favorites.contains(&artwork.id),
            highlight_ranges: highlight.map_or_else(Vec::new, |(m, q)| compute_highlight_ranges(&artwork.title, m, q)),
        }
    }

    /// Query to highlight in titles: the submitted search, unless it targets artists.
    fn highlight_query(&self) -> Option<String> {
        match self.feed.mode() {
            ViewMode::Search { query, filter } if *filter != SearchFilter::Artist => Some(query.clone()),
            _ => None,
        }
    }

    fn compute_list_status(&self) -> String {
        let pagination = self.feed.pagination();
        let mut status = format!(
            "{} of {}  page {}/{}",
            self.feed.items().len(),
            pagination.total,
            pagination.page,
            pagination.total_pages.max(1)
        );
        if self.feed.is_loading_more() {
            status.push_str("  loading more...");
        } else if pagination.has_next {
            status.push_str("  n: load more");
        }
        status
    }

    fn compute_empty_state(&self) -> EmptyState {
        let mode = self.feed.mode();
        if self.feed.is_loading() {
            return EmptyState {
                message: format!("Loading {}...", mode.title()),
                subtitle: String::new(),
            };
        }
        let (message, subtitle) = match mode {
            ViewMode::Favorites => ("No favorites yet", "Press f on an artwork to keep it here"),
            ViewMode::Rated => ("No rated artworks", "Open an artwork with Enter to rate it"),
            ViewMode::Search { .. } => ("No matching artworks", "Try another query or press Tab to change the filter"),
            ViewMode::Department(_) => ("This department is empty", "Press d to pick another department"),
            ViewMode::All => ("No artworks", "Press r to reload"),
        };
        EmptyState {
            message: message.to_string(),
            subtitle: subtitle.to_string(),
        }
    }

    fn compute_departments(&self, rows: usize) -> Body {
        if self.departments.is_empty() {
            return Body::Departments(DepartmentList {
                items: vec![],
                placeholder: Some("Loading departments...".to_string()),
            });
        }

        let available_rows = rows.saturating_sub(6).max(1);
        let start = self
            .department_index
            .saturating_sub(available_rows / 2)
            .min(self.departments.len().saturating_sub(available_rows));
        let items = self
            .departments
            .iter()
            .enumerate()
            .skip(start)
            .take(available_rows)
            .map(|(i, d)| DepartmentItem {
                name: d.name.clone(),
                count: d.count,
                is_selected: i == self.department_index,
            })
            .collect();
        Body::Departments(DepartmentList {
            items,
            placeholder: None,
        })
    }

    fn compute_detail(&self) -> Body {
        let Some(detail) = self.detail.as_ref() else {
            return Body::Empty(self.compute_empty_state());
        };
        let artwork = &detail.artwork;

        let criteria = Criterion::ALL
            .iter()
            .map(|&criterion| {
                let score = detail.draft.get(criterion);
                CriterionRow {
                    label: criterion.label(),
                    score,
                    stars: stars(score),
                    is_focused: criterion == detail.criterion,
                }
            })
            .collect();

        Body::Detail(DetailView {
            title: artwork.title.clone(),
            lines: artwork
                .details()
                .into_iter()
                .map(|(label, value)| (label.to_string(), value.to_string()))
                .collect(),
            is_favorite: self.favorites.contains(&artwork.id),
            criteria,
            dirty: detail.dirty,
            can_rate: self.session.is_authenticated(),
        })
    }

    fn compute_form(&self) -> Body {
        let Some(form) = self.form.as_ref() else {
            return Body::Empty(self.compute_empty_state());
        };
        let fields = form
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| FieldRow {
                label: field.label.to_string(),
                display: if field.secret {
                    MASK.to_string().repeat(field.value.chars().count())
                } else {
                    field.value.clone()
                },
                is_focused: i == form.focus,
            })
            .collect();
        Body::Form(FormView {
            title: form.kind.title().to_string(),
            fields,
            error: form.error.clone(),
            notice: form.notice.clone(),
            submitting: form.submitting,
        })
    }

    fn compute_header(&self) -> HeaderInfo {
        let mode = self.feed.mode();
        let title = if self.feed.is_loaded() {
            format!(" Galleria · {} ({}) ", mode.title(), self.feed.pagination().total)
        } else {
            format!(" Galleria · {} ", mode.title())
        };

        let mut status = match self.session.user() {
            Some(user) => match user.member_since() {
                Some(since) => format!("{} (since {since})", user.username),
                None => user.username.clone(),
            },
            None => "signed out".to_string(),
        };
        if let Some(stats) = &self.stats {
            for (key, value) in stats.counters.iter().take(3) {
                status.push_str(&format!("  {key}: {value}"));
            }
        }

        HeaderInfo { title, status }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.screen(), self.input_mode) {
            (Screen::Form, _) => "Tab/↑↓: field  Enter: submit  Esc: cancel",
            (Screen::Detail, _) => "↑↓: criterion  ←→/h l: score  s: save  f: favorite  Esc: back",
            (Screen::Departments, _) => "j/k: navigate  Enter: open  Esc: back",
            (Screen::Browse, InputMode::Search(SearchFocus::Typing)) => {
                "Type to search  Tab: filter  Enter: search  Esc: exit search"
            }
            (Screen::Browse, InputMode::Search(SearchFocus::Navigating)) => {
                "j/k: navigate  Enter: open  /: edit query  f: favorite  Esc: exit search"
            }
            (Screen::Browse, InputMode::Normal) if self.session.is_authenticated() => {
                "j/k: navigate  Enter: open  /: search  a/v/t/d: all/favs/rated/depts  f: fav  p/x: account  o: logout  q: quit"
            }
            (Screen::Browse, InputMode::Normal) => {
                "j/k: navigate  Enter: open  /: search  d: departments  L: login  R: register  q: quit"
            }
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        if self.screen() != Screen::Browse {
            return None;
        }
        match self.input_mode {
            InputMode::Search(focus) => Some(SearchBarInfo {
                query: self.search_query.clone(),
                filter: self.search_filter.label(),
                typing: focus == SearchFocus::Typing,
            }),
            InputMode::Normal => None,
        }
    }

    /// Rows left for list entries after header (2), banner, borders (2),
    /// column headers, status line and footer, plus the search box when shown.
    const fn calculate_available_rows(&self, total_rows: usize) -> usize {
        let chrome = match self.input_mode {
            InputMode::Normal => 8,
            InputMode::Search(_) => 11,
        };
        let available = total_rows.saturating_sub(chrome);
        if available == 0 {
            1
        } else {
            available
        }
    }
}

/// Coalesces fuzzy match indices into `(start, end)` character ranges.
fn compute_highlight_ranges(text: &str, matcher: &SkimMatcherV2, query: &str) -> Vec<(usize, usize)> {
    use fuzzy_matcher::FuzzyMatcher;

    let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
        return vec![];
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

/// Truncates to `max` characters, ending with `...` when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
