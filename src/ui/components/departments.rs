//! Department picker renderer.

use crate::ui::helpers::{position_cursor, print_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DepartmentList;

pub fn render_departments(row: usize, list: &DepartmentList, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}{}", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    print_padded("  DEPARTMENT", cols);
    print!("{}", Theme::reset());

    if let Some(placeholder) = &list.placeholder {
        position_cursor(row + 1, 1);
        print!("{}", Theme::fg(&theme.colors.empty_state_fg));
        print_padded(&format!("  {placeholder}"), cols);
        print!("{}", Theme::reset());
        return row + 2;
    }

    let mut current_row = row + 1;
    for item in &list.items {
        position_cursor(current_row, 1);
        if item.is_selected {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_normal));
        }
        let line = match item.count {
            Some(count) => format!("  {} ({count})", item.name),
            None => format!("  {}", item.name),
        };
        print_padded(&line, cols);
        print!("{}", Theme::reset());
        current_row += 1;
    }
    current_row
}
