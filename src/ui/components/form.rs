//! Account form renderer.

use crate::ui::helpers::{position_cursor, print_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FormView;

const LABEL_WIDTH: usize = 22;

/// Renders the form title, its fields, and the status line below them.
pub fn render_form(row: usize, form: &FormView, theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;

    position_cursor(current_row, 1);
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    print_padded(&format!("    {}", form.title), cols);
    print!("{}", Theme::reset());
    current_row += 2;

    for field in &form.fields {
        position_cursor(current_row, 1);
        let marker = if field.is_focused { "  > " } else { "    " };
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("{marker}{:<LABEL_WIDTH$}", field.label);
        if field.is_focused {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_normal));
        }
        let cursor = if field.is_focused { "_" } else { " " };
        print!(" {}{cursor} ", field.display);
        print!("{}", Theme::reset());
        print_padded("", cols.saturating_sub(4 + LABEL_WIDTH + field.display.chars().count() + 3));
        current_row += 1;
    }

    current_row += 1;
    position_cursor(current_row, 1);
    if form.submitting {
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print_padded("    Working...", cols);
    } else if let Some(error) = &form.error {
        print!("{}", Theme::fg(&theme.colors.error_fg));
        print_padded(&format!("    {error}"), cols);
    } else if let Some(notice) = &form.notice {
        print!("{}", Theme::fg(&theme.colors.info_fg));
        print_padded(&format!("    {notice}"), cols);
    } else {
        print_padded("", cols);
    }
    print!("{}", Theme::reset());
    current_row + 1
}
