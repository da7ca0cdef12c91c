//! Artwork table renderer.
//!
//! Columns: favorite marker, TITLE (fixed width), RATING (five star glyphs)
//! and ARTIST (remaining width). Supports selection and search highlighting.

use crate::ui::helpers::{self, clip, position_cursor, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{DisplayItem, ListView};

/// Width of the marker column, title included.
const TITLE_COLUMN: usize = 44;
const RATING_COLUMN: usize = 7;
const FAVORITE_MARKER: &str = "♥ ";

/// Renders the column headers at `row`.
pub fn render_table_headers(row: usize, theme: &Theme) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!("  {:<title$}{:<rating$}{}", "TITLE", "RATING", "ARTIST", title = TITLE_COLUMN - 2, rating = RATING_COLUMN);
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the visible rows followed by the pagination status line.
/// Returns the row after the status line.
pub fn render_list(row: usize, list: &ListView, theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in &list.rows {
        current_row = render_table_row(current_row, item, theme, cols);
    }

    position_cursor(current_row, 1);
    print!("{}", Theme::dim());
    print!("{}", Theme::fg(&theme.colors.text_dim));
    helpers::print_padded(&format!("  {}", list.status), cols);
    print!("{}", Theme::reset());
    current_row + 1
}

/// Renders one artwork row.
///
/// Styling precedence: selection background, then search highlights, then
/// the normal text color. The row is padded to full width so the selection
/// background spans the line.
fn render_table_row(row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let base = || {
        if item.is_selected {
            format!("{}{}", Theme::fg(&theme.colors.selection_fg), Theme::bg(&theme.colors.selection_bg))
        } else {
            Theme::fg(&theme.colors.text_normal)
        }
    };
    print!("{}", base());

    if item.is_favorite {
        if !item.is_selected {
            print!("{}", Theme::fg(&theme.colors.favorite_fg));
        }
        print!("{FAVORITE_MARKER}");
        print!("{}", base());
    } else {
        print!("  ");
    }

    helpers::render_highlighted_text(&item.title, &item.highlight_ranges, theme, item.is_selected);
    print!("{}", " ".repeat((TITLE_COLUMN - 2).saturating_sub(width(&item.title))));

    if !item.is_selected {
        print!("{}", Theme::fg(&theme.colors.rating_fg));
    }
    print!("{:<width$}", item.stars, width = RATING_COLUMN);

    if !item.is_selected {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    let used = TITLE_COLUMN + RATING_COLUMN;
    let artist = clip(&item.artist, cols.saturating_sub(used));
    print!("{artist}");
    print!("{}", " ".repeat(cols.saturating_sub(used + width(&artist))));

    print!("{}", Theme::reset());
    row + 1
}
