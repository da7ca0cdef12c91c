//! Shared rendering utilities.
//!
//! Cursor positioning, width-aware padding and fuzzy match highlighting used
//! across the components. Widths are counted in characters, not bytes, so
//! accented titles and star glyphs line up.

use crate::ui::theme::Theme;

/// Moves the cursor to `row`, `col` (both 1-indexed).
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Display width of `text` in terminal cells, one per character.
#[must_use]
pub fn width(text: &str) -> usize {
    text.chars().count()
}

/// Cuts `text` to at most `max` characters.
#[must_use]
pub fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Prints `text` clipped to `cols` and pads the rest of the line with spaces.
pub fn print_padded(text: &str, cols: usize) {
    let clipped = clip(text, cols);
    let used = width(&clipped);
    print!("{clipped}{}", " ".repeat(cols.saturating_sub(used)));
}

/// Prints `text` centered on a line of `cols` cells.
pub fn print_centered(text: &str, cols: usize) {
    let clipped = clip(text, cols);
    let used = width(&clipped);
    let padding = cols.saturating_sub(used) / 2;
    print!("{}{clipped}{}", " ".repeat(padding), " ".repeat(cols.saturating_sub(padding + used)));
}

/// Blanks rows `from..=to` so stale content from a taller frame disappears.
pub fn clear_rows(from: usize, to: usize, cols: usize) {
    for row in from..=to {
        position_cursor(row, 1);
        print!("{}", " ".repeat(cols));
    }
}

/// Renders text with highlighted character ranges for fuzzy matches.
///
/// Ranges are `(start, end)` character indices with exclusive end. On a
/// selected row the selection colors are restored after each highlight.
pub fn render_highlighted_text(text: &str, ranges: &[(usize, usize)], theme: &Theme, is_selected: bool) {
    if ranges.is_empty() {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }
        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            print!("{normal_section}");
        }

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());

        if is_selected {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_normal));
        }

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_counts_glyphs() {
        assert_eq!(width("★★½☆☆"), 5);
        assert_eq!(width("Café"), 4);
    }

    #[test]
    fn clip_keeps_prefix() {
        assert_eq!(clip("Sunflowers", 3), "Sun");
        assert_eq!(clip("Iris", 10), "Iris");
    }
}
