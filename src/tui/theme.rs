use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::{Stage, UiConfig};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub header: Color,
    pub dim: Color,
    pub border: Color,
    pub border_focus: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Colors per lead classification tag
    pub lead_type_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut lead_type_colors = HashMap::new();
        lead_type_colors.insert("buyer".into(), Color::Rgb(0x93, 0xC5, 0xFD));
        lead_type_colors.insert("seller".into(), Color::Rgb(0x86, 0xEF, 0xAC));
        lead_type_colors.insert("investor".into(), Color::Rgb(0xFD, 0xE0, 0x47));
        lead_type_colors.insert("renter".into(), Color::Rgb(0xC4, 0xB5, 0xFD));

        Theme {
            background: Color::Rgb(0x0F, 0x17, 0x2A),
            text: Color::Rgb(0xD1, 0xD5, 0xDB),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            header: Color::Rgb(0x93, 0xC5, 0xFD),
            dim: Color::Rgb(0x9C, 0xA3, 0xAF),
            border: Color::Rgb(0x33, 0x41, 0x55),
            border_focus: Color::Rgb(0x93, 0xC5, 0xFD),
            red: Color::Rgb(0xF8, 0x71, 0x71),
            yellow: Color::Rgb(0xFD, 0xE0, 0x47),
            green: Color::Rgb(0x86, 0xEF, 0xAC),
            selection_bg: Color::Rgb(0x1E, 0x29, 0x3B),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0F, 0x17, 0x2A),
            lead_type_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from `[ui]` config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(slot = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "header" | "highlight" => theme.header = color,
                "dim" => theme.dim = color,
                "border" => theme.border = color,
                "border_focus" => theme.border_focus = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "selection_bg" => theme.selection_bg = color,
                "search_match_bg" => theme.search_match_bg = color,
                "search_match_fg" => theme.search_match_fg = color,
                _ => {}
            }
        }

        for (tag, value) in &ui.lead_type_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.lead_type_colors.insert(tag.to_lowercase(), color);
            }
        }

        theme
    }

    /// Color for a lead classification tag, falling back to text color
    pub fn lead_type_color(&self, lead_type: &str) -> Color {
        self.lead_type_colors
            .get(lead_type)
            .copied()
            .unwrap_or(self.text)
    }

    /// Title color for a stage column: its own tint if it has a valid one
    pub fn stage_color(&self, stage: &Stage) -> Color {
        stage
            .color
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or(self.header)
    }
}
