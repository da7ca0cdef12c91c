//! Header component renderer.
//!
//! Two lines: the centered title, then the session and collection status
//! right-aligned in dim text.

use crate::ui::helpers::{clip, position_cursor, print_centered, width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the header at `row` and returns the next free row.
///
/// ```text
/// [left padding] Galleria · Collection (470000) [right padding]
///                           alice (since March 2024)  objects: 470000
/// ```
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }
    print_centered(&header.title, cols);
    print!("{}", Theme::reset());

    let status = clip(&header.status, cols.saturating_sub(1));
    position_cursor(row + 1, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", " ".repeat(cols.saturating_sub(width(&status) + 1)));
    print!("{status} ");
    print!("{}", Theme::reset());

    row + 2
}
