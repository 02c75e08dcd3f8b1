//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Piece colours, indexed by cell value - 1.
type PieceColors = [Color; 7];

/// Default blue palette, indexed by piece value: I, L, J, O, Z, S, T.
const DEFAULT_PIECES: PieceColors = [
    Color::Rgb(0x01, 0x3C, 0x61),
    Color::Rgb(0x47, 0xA9, 0xE6),
    Color::Rgb(0x03, 0x8C, 0xE0),
    Color::Rgb(0x1E, 0x47, 0x61),
    Color::Rgb(0x02, 0x6C, 0xAD),
    Color::Rgb(0x7E, 0xA2, 0xE6),
    Color::Rgb(0xA3, 0xAD, 0xBF),
];

const HIGH_CONTRAST_PIECES: PieceColors = [
    Color::Rgb(0x00, 0xFF, 0xFF),
    Color::Rgb(0xFF, 0x88, 0x00),
    Color::Rgb(0x00, 0x88, 0xFF),
    Color::Rgb(0xFF, 0xFF, 0x00),
    Color::Rgb(0xFF, 0x00, 0x00),
    Color::Rgb(0x00, 0xFF, 0x00),
    Color::Rgb(0xFF, 0x00, 0xFF),
];

// Okabe-Ito plus grey; avoids relying on red/green alone.
const COLORBLIND_PIECES: PieceColors = [
    Color::Rgb(0x56, 0xB4, 0xE9),
    Color::Rgb(0xE6, 0x9F, 0x00),
    Color::Rgb(0x00, 0x72, 0xB2),
    Color::Rgb(0xF0, 0xE4, 0x42),
    Color::Rgb(0xD5, 0x5E, 0x00),
    Color::Rgb(0x00, 0x9E, 0x73),
    Color::Rgb(0xCC, 0x79, 0xA7),
];

/// Colour table for cells plus the few UI colours.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Piece colours for cell values 1..=7.
    pub pieces: PieceColors,
    /// Playfield background (empty cells).
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, counters).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text (key help).
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            pieces: DEFAULT_PIECES,
            bg: Color::Rgb(0, 0, 0),
            div_line: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0x47, 0xA9, 0xE6),
            inactive_fg: Color::Rgb(0x5C, 0x63, 0x70),
        }
    }
}

impl Theme {
    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// No path means the built-in colours. `palette` then overrides the piece colours.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) => Self::from_map(&parse_theme_file(&std::fs::read_to_string(p)?))?,
            None => Self::default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override piece colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => self.pieces = HIGH_CONTRAST_PIECES,
            crate::Palette::Colorblind => self.pieces = COLORBLIND_PIECES,
        }
    }

    /// Keys `piece1`..`piece7`, `bg`, `div_line`, `main_fg`, `title`, `inactive_fg`.
    /// Missing keys keep the default; present but malformed ones are an error.
    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let mut theme = Self::default();
        let get = |key: &str, slot: &mut Color| -> Result<(), ThemeError> {
            if let Some(v) = map.get(key) {
                *slot = parse_hex(v)?;
            }
            Ok(())
        };
        for (i, slot) in theme.pieces.iter_mut().enumerate() {
            get(&format!("piece{}", i + 1), slot)?;
        }
        get("bg", &mut theme.bg)?;
        get("div_line", &mut theme.div_line)?;
        get("main_fg", &mut theme.main_fg)?;
        get("title", &mut theme.title)?;
        get("inactive_fg", &mut theme.inactive_fg)?;
        Ok(theme)
    }

    /// Colour for a cell value; 0 (and anything out of range) is the background.
    #[inline]
    pub fn cell_color(&self, value: u8) -> Color {
        match value {
            1..=7 => self.pieces[usize::from(value) - 1],
            _ => self.bg,
        }
    }
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let hex = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    match hex.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(invalid()),
    }
}
