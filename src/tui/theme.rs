use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub green: Color,
    pub primary: Color,
    pub selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            primary: Color::Rgb(0xFF, 0xD7, 0x00),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

impl Theme {
    /// Defaults with `[ui.colors]` overrides applied. Unknown slots and
    /// malformed colors are skipped.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "green" => theme.green = color,
                "primary" => theme.primary = color,
                "selection_bg" => theme.selection_bg = color,
                _ => {}
            }
        }
        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#FF4444"), Some(Color::Rgb(0xFF, 0x44, 0x44)));
        assert_eq!(parse_hex_color("FF4444"), None);
        assert_eq!(parse_hex_color("#FF44"), None);
        assert_eq!(parse_hex_color("#ZZZZZZ"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn overrides_apply_by_slot() {
        let mut ui = UiConfig::default();
        ui.colors.insert("primary".into(), "#010203".into());
        ui.colors.insert("nonsense".into(), "#FFFFFF".into());
        ui.colors.insert("red".into(), "not a color".into());
        let theme = Theme::from_config(&ui);
        assert_eq!(theme.primary, Color::Rgb(1, 2, 3));
        assert_eq!(theme.red, Theme::default().red);
    }
}
