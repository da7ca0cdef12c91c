//! Composable UI component renderers.
//!
//! Each component renders one part of the interface at a given row and
//! returns the next free row.
//!
//! # Components
//!
//! - [`header`]: Title and session status
//! - [`banner`]: One-line info or error message
//! - [`search`]: Search input box
//! - [`table`]: Artwork list with favorite marker, stars and artist
//! - [`departments`]: Department picker
//! - [`detail`]: Artwork metadata and rating sliders
//! - [`form`]: Account forms
//! - [`empty`]: Empty state message
//! - [`footer`]: Keybinding hints
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header - 2 lines]
//! [Banner]
//! [Border]
//! [Search Bar - 3 lines, search mode only]
//! [Body]
//! [Blank padding to fill screen]
//! [Border]
//! [Footer]
//! ```

mod banner;
mod departments;
mod detail;
mod empty;
mod footer;
mod form;
mod header;
mod search;
mod table;

use crate::ui::helpers::{clear_rows, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Body, UIViewModel};

use banner::render_banner;
use departments::render_departments;
use detail::render_detail;
use empty::render_empty_state;
use footer::render_footer;
use form::render_form;
use header::render_header;
use search::render_search_bar;
use table::{render_list, render_table_headers};

/// Renders a horizontal border line at `row` and returns the next row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the full frame.
pub fn render_frame(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let footer_row = rows.max(6);
    let bottom_border = footer_row - 1;

    let mut current_row = 2; // Row 1 stays blank.
    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_banner(current_row, vm.banner.as_ref(), theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);

    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }

    let body_end = match &vm.body {
        Body::List(list) => {
            let row = render_table_headers(current_row, theme);
            render_list(row, list, theme, cols)
        }
        Body::Empty(empty) => render_empty_state(current_row + 2, empty, theme, cols),
        Body::Departments(list) => render_departments(current_row, list, theme, cols),
        Body::Detail(detail) => render_detail(current_row, bottom_border, detail, theme, cols),
        Body::Form(form) => render_form(current_row + 1, form, theme, cols),
    };

    if body_end < bottom_border {
        clear_rows(body_end, bottom_border - 1, cols);
    }
    render_border(bottom_border, &theme.colors.border, cols);
    render_footer(footer_row, &vm.footer, theme, cols);
}
