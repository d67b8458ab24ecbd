//! Color palette and ANSI escape sequence generation.
//!
//! One built-in dark palette. Sentiment tones map onto the palette through
//! [`Theme::tone_fg`], keyed by the tone's semantic color name.

use crate::domain::SentimentTone;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex colors (`#rrggbb`) for each UI element.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub header_fg: String,
    pub text_normal: String,
    pub text_dim: String,
    pub price_fg: String,
    pub discount_fg: String,
    pub error_fg: String,
    pub match_highlight_fg: String,
    pub empty_state_fg: String,
    pub green: String,
    pub gray: String,
    pub red: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "mocha".to_string(),
            colors: ThemeColors {
                header_fg: "#cdd6f4".to_string(),
                text_normal: "#cdd6f4".to_string(),
                text_dim: "#6c7086".to_string(),
                price_fg: "#fab387".to_string(),
                discount_fg: "#f38ba8".to_string(),
                error_fg: "#f38ba8".to_string(),
                match_highlight_fg: "#f9e2af".to_string(),
                empty_state_fg: "#89b4fa".to_string(),
                green: "#a6e3a1".to_string(),
                gray: "#9399b2".to_string(),
                red: "#f38ba8".to_string(),
            },
        }
    }
}

impl Theme {
    /// Foreground sequence for a sentiment tone.
    #[must_use]
    pub fn tone_fg(&self, tone: SentimentTone) -> String {
        let hex = match tone.color() {
            "green" => &self.colors.green,
            "red" => &self.colors.red,
            _ => &self.colors.gray,
        };
        Self::fg(hex)
    }

    /// Parses `#rrggbb`; malformed input renders as white.
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

    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn strike() -> &'static str {
        "\u{001b}[9m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}
