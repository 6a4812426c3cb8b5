// Theme presets and their palettes
//
// The host persists the selected preset as part of the app configuration;
// the client maps it onto concrete colors for rendering. The palette fields
// mirror the visual design tokens (primary/secondary/accent/...), with the
// rgba() tokens pre-blended against each theme's backdrop since terminals
// have no alpha channel.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Closed set of shipped themes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreset {
    #[default]
    Default,
    PurpleGradient,
    DeepPurple,
    MidnightBlue,
}

impl ThemePreset {
    /// All presets in settings-list order
    pub const ALL: [ThemePreset; 4] = [
        ThemePreset::Default,
        ThemePreset::PurpleGradient,
        ThemePreset::DeepPurple,
        ThemePreset::MidnightBlue,
    ];

    /// Wire/config identifier
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreset::Default => "default",
            ThemePreset::PurpleGradient => "purple-gradient",
            ThemePreset::DeepPurple => "deep-purple",
            ThemePreset::MidnightBlue => "midnight-blue",
        }
    }

    /// Human-readable name for the settings list
    pub fn display_name(self) -> &'static str {
        match self {
            ThemePreset::Default => "Default",
            ThemePreset::PurpleGradient => "Purple Gradient",
            ThemePreset::DeepPurple => "Deep Purple",
            ThemePreset::MidnightBlue => "Midnight Blue",
        }
    }

    /// Light/dark classification is structural: the default theme is the
    /// only light one, everything else renders on a dark backdrop.
    pub fn is_dark(self) -> bool {
        !matches!(self, ThemePreset::Default)
    }

    /// Next preset in list order, wrapping around
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Previous preset in list order, wrapping around
    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn colors(self) -> &'static ThemeColors {
        match self {
            ThemePreset::Default => &DEFAULT_COLORS,
            ThemePreset::PurpleGradient => &PURPLE_GRADIENT_COLORS,
            ThemePreset::DeepPurple => &DEEP_PURPLE_COLORS,
            ThemePreset::MidnightBlue => &MIDNIGHT_BLUE_COLORS,
        }
    }
}

/// Fixed color palette of a preset
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub text: Color,
    pub text_secondary: Color,
    /// Below 1.0 the terminal's own background shows through instead of
    /// the theme's background color
    pub background_alpha: f32,
    pub border: Color,
    pub accent: Color,
    pub success: Color,
    pub danger: Color,
}

static DEFAULT_COLORS: ThemeColors = ThemeColors {
    primary: Color::Rgb(0xff, 0xff, 0xff),
    secondary: Color::Rgb(0xf8, 0xf9, 0xfa),
    background: Color::Rgb(0xff, 0xff, 0xff),
    text: Color::Rgb(0x2c, 0x3e, 0x50),
    text_secondary: Color::Rgb(107, 120, 132), // rgba(44,62,80,0.7) on white
    background_alpha: 0.95,
    border: Color::Rgb(223, 226, 229), // rgba(44,62,80,0.15) on white
    accent: Color::Rgb(0x64, 0xb5, 0xf6),
    success: Color::Rgb(0x28, 0xa7, 0x45),
    danger: Color::Rgb(0xdc, 0x35, 0x45),
};

static PURPLE_GRADIENT_COLORS: ThemeColors = ThemeColors {
    primary: Color::Rgb(0x66, 0x7e, 0xea),
    secondary: Color::Rgb(0x76, 0x4b, 0xa2),
    background: Color::Rgb(0xf5, 0xf5, 0xf7),
    text: Color::Rgb(0xff, 0xff, 0xff),
    text_secondary: Color::Rgb(209, 216, 248), // rgba(255,255,255,0.7) on primary
    background_alpha: 0.1,
    border: Color::Rgb(117, 139, 236), // rgba(255,255,255,0.1) on primary
    accent: Color::Rgb(0xff, 0xd7, 0x00),
    success: Color::Rgb(0x2e, 0xd5, 0x73),
    danger: Color::Rgb(0xff, 0x47, 0x57),
};

static DEEP_PURPLE_COLORS: ThemeColors = ThemeColors {
    primary: Color::Rgb(0x0f, 0x0f, 0x23),
    secondary: Color::Rgb(0x1a, 0x1a, 0x2e),
    background: Color::Rgb(0x0a, 0x0a, 0x0a),
    text: Color::Rgb(0xff, 0xff, 0xff),
    text_secondary: Color::Rgb(181, 181, 181), // rgba(255,255,255,0.7) on background
    background_alpha: 0.3,
    border: Color::Rgb(34, 34, 34), // rgba(255,255,255,0.1) on background
    accent: Color::Rgb(0xbb, 0x86, 0xfc),
    success: Color::Rgb(0x4c, 0xaf, 0x50),
    danger: Color::Rgb(0xf4, 0x43, 0x36),
};

static MIDNIGHT_BLUE_COLORS: ThemeColors = ThemeColors {
    primary: Color::Rgb(0x0c, 0x14, 0x27),
    secondary: Color::Rgb(0x1e, 0x3a, 0x5f),
    background: Color::Rgb(0x0a, 0x0a, 0x0a),
    text: Color::Rgb(0xff, 0xff, 0xff),
    text_secondary: Color::Rgb(181, 181, 181), // rgba(255,255,255,0.7) on background
    background_alpha: 0.3,
    border: Color::Rgb(34, 34, 34), // rgba(255,255,255,0.1) on background
    accent: Color::Rgb(0x64, 0xb5, 0xf6),
    success: Color::Rgb(0x4c, 0xaf, 0x50),
    danger: Color::Rgb(0xf4, 0x43, 0x36),
};

impl ThemeColors {
    /// Whether widgets should keep the terminal's own background
    pub fn uses_terminal_background(&self) -> bool {
        self.background_alpha < 1.0
    }

    /// Base style for the whole screen
    pub fn base(&self) -> Style {
        let style = Style::default().fg(self.text);
        if self.uses_terminal_background() {
            style
        } else {
            style.bg(self.background)
        }
    }

    /// Style for the highlighted list row
    pub fn selection(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.secondary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn danger_style(&self) -> Style {
        Style::default().fg(self.danger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_default_is_light() {
        for preset in ThemePreset::ALL {
            assert_eq!(preset.is_dark(), preset != ThemePreset::Default);
        }
    }

    #[test]
    fn test_wire_names_are_kebab_case() {
        let json = serde_json::to_string(&ThemePreset::PurpleGradient).unwrap();
        assert_eq!(json, "\"purple-gradient\"");
        let back: ThemePreset = serde_json::from_str("\"midnight-blue\"").unwrap();
        assert_eq!(back, ThemePreset::MidnightBlue);
    }

    #[test]
    fn test_every_preset_has_a_palette() {
        for preset in ThemePreset::ALL {
            let colors = preset.colors();
            assert!(colors.background_alpha > 0.0);
            assert!(!preset.as_str().is_empty());
        }
    }

    #[test]
    fn test_cycle_covers_all_presets() {
        let mut seen = vec![ThemePreset::Default];
        let mut cur = ThemePreset::Default;
        for _ in 0..3 {
            cur = cur.next();
            seen.push(cur);
        }
        assert_eq!(cur.next(), ThemePreset::Default);
        for preset in ThemePreset::ALL {
            assert!(seen.contains(&preset));
        }
        assert_eq!(ThemePreset::Default.prev(), ThemePreset::MidnightBlue);
    }
}
