//! Artwork detail panel renderer.
//!
//! ```text
//!   ♥ Water Lilies
//!   Artist       Claude Monet
//!   Date         1906
//!
//!   RATING
//! > Overall      ★★★★½  4.5
//!   Technique    ★★★☆☆  3.0
//! ```

use crate::ui::helpers::{clip, position_cursor, print_padded, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DetailView;

const LABEL_WIDTH: usize = 13;

/// Renders the detail panel from `row` without passing `last_row`.
pub fn render_detail(row: usize, last_row: usize, detail: &DetailView, theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;

    position_cursor(current_row, 1);
    print!("{}", Theme::bold());
    if detail.is_favorite {
        print!("{}  ♥ ", Theme::fg(&theme.colors.favorite_fg));
    } else {
        print!("    ");
    }
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print_padded(&detail.title, cols.saturating_sub(4));
    print!("{}", Theme::reset());
    current_row += 1;

    // Keep room for the rating block: heading, criteria, hint.
    let rating_rows = detail.criteria.len() + 3;
    let detail_budget = last_row.saturating_sub(current_row + rating_rows);
    for (label, value) in detail.lines.iter().take(detail_budget) {
        position_cursor(current_row, 1);
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("    {label:<LABEL_WIDTH$}");
        print!("{}", Theme::fg(&theme.colors.text_normal));
        print_padded(value, cols.saturating_sub(LABEL_WIDTH + 4));
        print!("{}", Theme::reset());
        current_row += 1;
    }

    current_row += 1;
    position_cursor(current_row, 1);
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    let heading = if detail.dirty { "    RATING (unsaved)" } else { "    RATING" };
    print_padded(heading, cols);
    print!("{}", Theme::reset());
    current_row += 1;

    for criterion in &detail.criteria {
        position_cursor(current_row, 1);
        if criterion.is_focused && detail.can_rate {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
            print!("  > ");
        } else {
            print!("{}", Theme::fg(&theme.colors.text_normal));
            print!("    ");
        }
        print!("{:<LABEL_WIDTH$}", criterion.label);
        if !criterion.is_focused || !detail.can_rate {
            print!("{}", Theme::fg(&theme.colors.rating_fg));
        }
        let stars = if criterion.stars.is_empty() { "·····" } else { criterion.stars.as_str() };
        let line = format!("{stars:<5}  {:.1}", criterion.score);
        print!("{line}");
        print!("{}", " ".repeat(cols.saturating_sub(4 + LABEL_WIDTH + width(&line))));
        print!("{}", Theme::reset());
        current_row += 1;
    }

    if !detail.can_rate {
        position_cursor(current_row, 1);
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print_padded(&clip("    Sign in (L) to rate this artwork", cols), cols);
        print!("{}", Theme::reset());
        current_row += 1;
    }

    current_row
}
