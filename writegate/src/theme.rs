//! Diff color themes.
//!
//! A theme maps onto the renderer's [`Palette`]. Three are built in:
//!
//! - `dark`: bright ANSI colors, the default.
//! - `light`: darker shades that stay readable on a white background.
//! - `mono`: no colors at all.
//!
//! Only the 16 ANSI colors are used so every theme works over SSH and in
//! terminals without truecolor support.

use crossterm::style::Color;
use writegate_core::render::Palette;

/// Named color theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Palette for diff output, or `None` for uncolored output.
    pub palette: Option<Palette>,
}

impl Theme {
    /// Bright colors for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            palette: Some(Palette::default()),
        }
    }

    /// Darker colors for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            palette: Some(Palette {
                added: Color::DarkGreen,
                removed: Color::DarkRed,
                stats: Color::DarkBlue,
                rule: Color::Grey,
            }),
        }
    }

    /// No colors.
    pub fn mono() -> Self {
        Self { palette: None }
    }

    /// Looks up a theme by name, case-insensitively.
    ///
    /// Returns `None` for unknown names; the caller decides the fallback.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            "mono" | "none" => Some(Self::mono()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        assert_eq!(Theme::from_name("dark"), Some(Theme::dark()));
        assert_eq!(Theme::from_name("LIGHT"), Some(Theme::light()));
        assert_eq!(Theme::from_name("mono").unwrap().palette, None);
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(Theme::from_name("catppuccin"), None);
    }
}
