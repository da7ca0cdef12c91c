//! Theme management and ANSI escape sequence generation.
//!
//! Built-in themes are embedded TOML files; custom themes are loaded from a
//! TOML file named by the `theme_file` plugin option.
//!
//! # Built-in Themes
//!
//! - `gallery-night`: Dark theme with gilt accents (default)
//! - `gallery-day`: Light theme on warm paper
//! - `gallery-sepia`: Low-contrast brown tones
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#e8dcc2"
//! selection_fg = "#1b1a17"
//! selection_bg = "#c9a24a"
//! text_normal = "#e8dcc2"
//! text_dim = "#7d7566"
//! border = "#3d3a33"
//! search_bar_border = "#c9a24a"
//! match_highlight_fg = "#1b1a17"
//! match_highlight_bg = "#e0c36b"
//! empty_state_fg = "#8fb3c9"
//! favorite_fg = "#d9675f"
//! rating_fg = "#e0c36b"
//! info_fg = "#8fb3c9"
//! error_fg = "#e06c5f"
//! ```

use crate::domain::error::{GalleryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "gallery-night";

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings (e.g. `"#e8dcc2"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Footer, secondary info, artist column.
    pub text_dim: String,

    pub border: String,

    pub search_bar_border: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,

    /// Favorite marker.
    pub favorite_fg: String,
    /// Star glyphs.
    pub rating_fg: String,
    /// Info banners and form notices.
    pub info_fg: String,
    /// Error banners and form errors.
    pub error_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name. Returns `None` for unknown names.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "gallery-night" => include_str!("../../themes/gallery-night.toml"),
            "gallery-day" => include_str!("../../themes/gallery-day.toml"),
            "gallery-sepia" => include_str!("../../themes/gallery-sepia.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| GalleryError::Config(format!("failed to read theme file {}: {e}", path.display())))?;

        toml::from_str(&contents).map_err(|e| GalleryError::Config(format!("failed to parse theme TOML: {e}")))
    }

    /// Resolves the configured theme: a custom file wins over a built-in
    /// name, and anything unusable falls back to the default.
    #[must_use]
    pub fn resolve(name: Option<&str>, file: Option<&str>) -> Self {
        if let Some(file) = file {
            match Self::from_file(file) {
                Ok(theme) => return theme,
                Err(e) => tracing::warn!(file, error = %e, "custom theme unusable, falling back"),
            }
        }
        if let Some(name) = name {
            if let Some(theme) = Self::from_name(name) {
                return theme;
            }
            tracing::warn!(name, "unknown theme, falling back to {DEFAULT_THEME}");
        }
        Self::default()
    }

    /// Converts a hex color to RGB. Malformed input yields white.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground escape sequence for a hex color.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background escape sequence for a hex color.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Clears all styling (colors, bold, dim).
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }

    fn fallback() -> Self {
        let color = |hex: &str| hex.to_string();
        Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors {
                header_fg: color("#e8dcc2"),
                header_bg: None,
                selection_fg: color("#1b1a17"),
                selection_bg: color("#c9a24a"),
                text_normal: color("#e8dcc2"),
                text_dim: color("#7d7566"),
                border: color("#3d3a33"),
                search_bar_border: color("#c9a24a"),
                match_highlight_fg: color("#1b1a17"),
                match_highlight_bg: color("#e0c36b"),
                empty_state_fg: color("#8fb3c9"),
                favorite_fg: color("#d9675f"),
                rating_fg: color("#e0c36b"),
                info_fg: color("#8fb3c9"),
                error_fg: color("#e06c5f"),
            },
        }
    }
}

impl Default for Theme {
    /// The `gallery-night` theme.
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(Self::fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_themes_parse() {
        for name in ["gallery-night", "gallery-day", "gallery-sepia"] {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("neon-arcade").is_none());
    }

    #[test]
    fn default_matches_embedded_night_theme() {
        assert_eq!(Theme::default(), Theme::fallback());
    }

    #[test]
    fn escape_sequences() {
        assert_eq!(Theme::fg("#ff0000"), "\u{1b}[38;2;255;0;0m");
        assert_eq!(Theme::bg("00ff00"), "\u{1b}[48;2;0;255;0m");
        assert_eq!(Theme::fg("nonsense"), "\u{1b}[38;2;255;255;255m");
    }

    #[test]
    fn custom_file_overrides_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.toml");
        let mut custom = Theme::default();
        custom.name = "mine".into();
        std::fs::write(&path, toml::to_string(&custom).unwrap()).unwrap();

        let theme = Theme::resolve(Some("gallery-day"), path.to_str());
        assert_eq!(theme.name, "mine");
    }

    #[test]
    fn unusable_settings_fall_back_to_default() {
        let theme = Theme::resolve(Some("no-such-theme"), Some("/nonexistent/theme.toml"));
        assert_eq!(theme.name, DEFAULT_THEME);
    }
}
