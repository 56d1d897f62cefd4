// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

use crate::model::ComponentType;

pub(crate) const PALETTE_ENV: &str = "EVOMAP_TUI_PALETTE";
pub(crate) const PALETTE_ENV_FALLBACK: &str = "EVOMAP_PALETTE";

/// Styles for every drawn element. Without a palette override the terminal's own ANSI colors
/// are used.
#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    palette: Option<TuiPalette>,
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        Self::from_lookup(|name| env::var(name))
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Result<String, env::VarError>,
    ) -> Result<Self, ThemeError> {
        let palette = palette_override(lookup)?;
        Ok(Self { palette })
    }

    pub(crate) fn base_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(palette.fg).bg(palette.bg),
            None => Style::default(),
        }
    }

    fn ansi_color(&self, color: Ansi16) -> Color {
        match &self.palette {
            Some(palette) => palette.ansi_color(color.idx()),
            None => color.into(),
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(self.ansi_color(Ansi16::BrightGreen))
        } else {
            self.base_style()
        }
    }

    pub(crate) fn title_style(&self) -> Style {
        self.base_style()
            .fg(self.ansi_color(Ansi16::BrightWhite))
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn dim_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::BrightBlack))
    }

    pub(crate) fn accent_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::Cyan))
    }

    pub(crate) fn key_style(&self) -> Style {
        self.base_style()
            .fg(self.ansi_color(Ansi16::Cyan))
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn selection_style(&self) -> Style {
        self.base_style()
            .add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(self.ansi_color(Ansi16::Red))
    }

    pub(crate) fn component_style(&self, component_type: ComponentType) -> Style {
        let color = match component_type {
            ComponentType::Software => Ansi16::BrightCyan,
            ComponentType::Hardware => Ansi16::BrightYellow,
            ComponentType::Service => Ansi16::BrightMagenta,
        };
        self.base_style().fg(self.ansi_color(color))
    }

    /// The dependency source picked while drawing.
    pub(crate) fn source_style(&self) -> Style {
        self.base_style()
            .fg(self.ansi_color(Ansi16::Black))
            .bg(self.ansi_color(Ansi16::Green))
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn edge_style(&self, highlighted: bool) -> Style {
        if highlighted {
            self.base_style().fg(self.ansi_color(Ansi16::BrightRed))
        } else {
            self.base_style().fg(self.ansi_color(Ansi16::White))
        }
    }

    pub(crate) fn divider_style(&self) -> Style {
        self.dim_style()
    }

    pub(crate) fn hint_style(&self) -> Style {
        self.base_style()
            .fg(self.ansi_color(Ansi16::Black))
            .bg(self.ansi_color(Ansi16::Yellow))
            .add_modifier(Modifier::BOLD)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TuiPalette {
    fg: Color,
    bg: Color,
    ansi: [Color; 16],
}

impl TuiPalette {
    const CSV_LEN: usize = 18;

    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        if parts.len() != Self::CSV_LEN {
            return Err(format!(
                "expected {} comma-separated colors (fg,bg,black,red,green,yellow,blue,magenta,cyan,white,bright_black,bright_red,bright_green,bright_yellow,bright_blue,bright_magenta,bright_cyan,bright_white), got {}",
                Self::CSV_LEN,
                parts.len()
            ));
        }

        let fg = parse_palette_color(parts[0])?;
        let bg = parse_palette_color(parts[1])?;

        let mut ansi = [Color::Reset; 16];
        for (slot, part) in ansi.iter_mut().zip(&parts[2..]) {
            *slot = parse_palette_color(part)?;
        }

        Ok(Self { fg, bg, ansi })
    }

    fn ansi_color(&self, idx: usize) -> Color {
        self.ansi[idx]
    }
}

fn palette_override(
    lookup: impl Fn(&str) -> Result<String, env::VarError>,
) -> Result<Option<TuiPalette>, ThemeError> {
    let mut found = None;
    for name in [PALETTE_ENV, PALETTE_ENV_FALLBACK] {
        match lookup(name) {
            Ok(value) => {
                found = Some((name, value));
                break;
            }
            Err(env::VarError::NotPresent) => {}
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ThemeError::InvalidEnv {
                    name: name.to_owned(),
                    value: "<non-unicode>".to_owned(),
                });
            }
        }
    }
    let Some((name, value)) = found else {
        return Ok(None);
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed = TuiPalette::parse_csv(trimmed).map_err(|error| ThemeError::InvalidEnv {
        name: name.to_owned(),
        value: format!("{trimmed} ({error})"),
    })?;

    Ok(Some(parsed))
}

fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_owned());
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("rgb:") {
        let channels = rest
            .split('/')
            .map(parse_hex_channel)
            .collect::<Result<Vec<_>, _>>()?;
        let [r, g, b] = channels.as_slice() else {
            return Err(format!("invalid rgb: value: {trimmed}"));
        };
        return Ok(Color::Rgb(*r, *g, *b));
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    let [_, r, g, b] = rgb.to_be_bytes();
    Ok(Color::Rgb(r, g, b))
}

fn parse_hex_channel(value: &str) -> Result<u8, String> {
    let value = value.trim();
    match value.len() {
        2 => u8::from_str_radix(value, 16).map_err(|_| format!("invalid rgb: component {value}")),
        4 => u16::from_str_radix(value, 16)
            .map(|wide| (wide >> 8) as u8)
            .map_err(|_| format!("invalid rgb: component {value}")),
        _ => Err(format!(
            "invalid rgb: component {value} (expected 2 or 4 hex digits)"
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
enum Ansi16 {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Ansi16 {
    const fn idx(self) -> usize {
        self as usize
    }
}

impl From<Ansi16> for Color {
    fn from(value: Ansi16) -> Self {
        match value {
            Ansi16::Black => Color::Black,
            Ansi16::Red => Color::Red,
            Ansi16::Green => Color::Green,
            Ansi16::Yellow => Color::Yellow,
            Ansi16::Blue => Color::Blue,
            Ansi16::Magenta => Color::Magenta,
            Ansi16::Cyan => Color::Cyan,
            Ansi16::White => Color::Gray,
            Ansi16::BrightBlack => Color::DarkGray,
            Ansi16::BrightRed => Color::LightRed,
            Ansi16::BrightGreen => Color::LightGreen,
            Ansi16::BrightYellow => Color::LightYellow,
            Ansi16::BrightBlue => Color::LightBlue,
            Ansi16::BrightMagenta => Color::LightMagenta,
            Ansi16::BrightCyan => Color::LightCyan,
            Ansi16::BrightWhite => Color::White,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}
