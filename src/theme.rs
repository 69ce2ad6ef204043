//! Theme configuration and colors.
//!
//! The app has a light and a dark mode; each mode maps to a palette from the
//! `ratatui-themes` crate, chosen in the config.

use ratatui::style::{Color, Modifier, Style};
use ratatui_themes::{ThemeName, ThemePalette};
use serde::{Deserialize, Serialize};

use crate::models::PlatformId;

/// Light/dark appearance flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
}

impl ThemeMode {
    /// The other mode
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Display name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }

    /// Icon shown next to the toggle
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Light => "☀",
            Self::Dark => "☾",
        }
    }
}

/// Theme wrapper around `ThemeName` from ratatui-themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme(pub ThemeName);

impl Theme {
    /// First palette with a light background, for light mode
    #[must_use]
    pub fn default_light() -> Self {
        ThemeName::all()
            .iter()
            .copied()
            .find(|name| is_light(name.palette().bg))
            .map_or_else(Self::default, Self)
    }

    /// Default palette for dark mode
    #[must_use]
    pub const fn default_dark() -> Self {
        Self(ThemeName::Dracula)
    }

    /// Whether this palette has a light background
    #[must_use]
    pub fn is_light(&self) -> bool {
        is_light(self.0.palette().bg)
    }

    /// Get the display name for the theme.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0.display_name()
    }

    /// Get the color palette for this theme
    #[must_use]
    pub fn colors(&self) -> ThemeColors {
        ThemeColors::from_palette(self.0.palette())
    }
}

/// Perceived brightness above the midpoint
fn is_light(color: Color) -> bool {
    match color {
        Color::Rgb(r, g, b) => {
            let luma = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
            luma > 128_000
        }
        Color::White | Color::Gray => true,
        _ => false,
    }
}

/// Extended color palette for UI elements.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Base colors (from palette)
    /// Primary background color
    pub bg: Color,
    /// Secondary background for panels/cards
    pub bg_secondary: Color,
    /// Primary foreground/text color
    pub fg: Color,
    /// Dimmed text color
    pub fg_dim: Color,
    /// Muted text color (lowest contrast)
    pub fg_muted: Color,

    // Accent colors
    /// Primary accent color
    pub primary: Color,
    /// Secondary accent color
    pub secondary: Color,
    /// Tertiary accent color
    pub accent: Color,

    // Semantic colors
    /// Success state color (green)
    pub success: Color,
    /// Warning state color (yellow/orange)
    pub warning: Color,
    /// Error state color (red)
    pub error: Color,
    /// Info state color (blue)
    pub info: Color,

    // UI elements
    /// Border color (unfocused)
    pub border: Color,
    /// Border color (focused)
    pub border_focus: Color,
    /// Selection/highlight background
    pub selection: Color,

    // Platform accents
    /// X (Twitter) accent
    pub twitter: Color,
    /// LinkedIn accent
    pub linkedin: Color,
    /// Facebook accent
    pub facebook: Color,
    /// Instagram accent
    pub instagram: Color,

    // Logo colors
    /// Logo primary color
    pub logo_primary: Color,
    /// Logo secondary color
    pub logo_secondary: Color,
}

impl ThemeColors {
    /// Create `ThemeColors` from a `ThemePalette`
    #[must_use]
    pub fn from_palette(p: ThemePalette) -> Self {
        let bg_secondary = Self::adjust_brightness(p.bg, 10);

        Self {
            bg: p.bg,
            bg_secondary,
            fg: p.fg,
            fg_dim: p.muted,
            fg_muted: p.muted,

            primary: p.accent,
            secondary: p.secondary,
            accent: p.secondary,

            success: p.success,
            warning: p.warning,
            error: p.error,
            info: p.info,

            border: p.muted,
            border_focus: p.accent,
            selection: p.selection,

            // X is black on white; use the foreground so it reads in both modes
            twitter: p.fg,
            linkedin: Color::Rgb(37, 99, 235),  // #2563EB
            facebook: Color::Rgb(29, 78, 216),  // #1D4ED8
            instagram: Color::Rgb(219, 39, 119), // #DB2777

            // Logo colors
            logo_primary: p.accent,
            logo_secondary: p.secondary,
        }
    }

    /// Adjust color brightness
    fn adjust_brightness(color: Color, amount: i16) -> Color {
        if let Color::Rgb(r, g, b) = color {
            let adjust = |c: u8| -> u8 {
                if amount > 0 {
                    c.saturating_add(amount as u8)
                } else {
                    c.saturating_sub((-amount) as u8)
                }
            };
            Color::Rgb(adjust(r), adjust(g), adjust(b))
        } else {
            color
        }
    }

    // Style helpers

    /// Default text style
    #[must_use]
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Dimmed text style
    #[must_use]
    pub fn text_dim(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    /// Muted text style
    #[must_use]
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.fg_muted)
    }

    /// Primary accent style
    #[must_use]
    pub fn text_primary(&self) -> Style {
        Style::default().fg(self.primary)
    }

    /// Secondary accent style
    #[must_use]
    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    /// Success style
    #[must_use]
    pub fn text_success(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Warning style
    #[must_use]
    pub fn text_warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Error style
    #[must_use]
    pub fn text_error(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Info style
    #[must_use]
    pub fn text_info(&self) -> Style {
        Style::default().fg(self.info)
    }

    /// Block border style
    #[must_use]
    pub fn block(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Focused block border style
    #[must_use]
    pub fn block_focus(&self) -> Style {
        Style::default().fg(self.border_focus)
    }

    /// Selected item style
    #[must_use]
    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Tab style
    #[must_use]
    pub fn tab(&self) -> Style {
        Style::default().fg(self.fg_muted)
    }

    /// Active tab style
    #[must_use]
    pub fn tab_active(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for shortcuts)
    #[must_use]
    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Accent color of a platform
    #[must_use]
    pub const fn platform_color(&self, platform: PlatformId) -> Color {
        match platform {
            PlatformId::Twitter => self.twitter,
            PlatformId::LinkedIn => self.linkedin,
            PlatformId::Facebook => self.facebook,
            PlatformId::Instagram => self.instagram,
        }
    }

    /// Platform accent style
    #[must_use]
    pub fn platform(&self, platform: PlatformId) -> Style {
        Style::default().fg(self.platform_color(platform))
    }

    /// Selected platform badge style
    #[must_use]
    pub fn platform_badge(&self, platform: PlatformId) -> Style {
        Style::default()
            .bg(self.platform_color(platform))
            .fg(self.bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Logo primary style
    #[must_use]
    pub fn logo_style_primary(&self) -> Style {
        Style::default()
            .fg(self.logo_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Logo secondary style
    #[must_use]
    pub fn logo_style_secondary(&self) -> Style {
        Style::default()
            .fg(self.logo_secondary)
            .add_modifier(Modifier::BOLD)
    }
}
