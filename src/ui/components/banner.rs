//! Status banner renderer.

use crate::ui::helpers::{position_cursor, print_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::BannerInfo;

/// Renders the banner line at `row`, or a blank line when there is none.
pub fn render_banner(row: usize, banner: Option<&BannerInfo>, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    match banner {
        Some(banner) => {
            let color = if banner.is_error {
                &theme.colors.error_fg
            } else {
                &theme.colors.info_fg
            };
            print!("{}", Theme::fg(color));
            print_padded(&format!("  {}", banner.text), cols);
            print!("{}", Theme::reset());
        }
        None => print_padded("", cols),
    }
    row + 1
}
