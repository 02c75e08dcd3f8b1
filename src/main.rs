//! Blockfall: falling-block puzzle game in the terminal.

mod app;
mod arena;
mod clock;
mod game;
mod input;
mod matrix;
mod piece;
mod player;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Options derived from CLI that affect the simulation (board size, seed, drop speed).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub seed: u64,
    pub drop_interval_ms: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        log::warn!("theme not loaded ({e}); using built-in colours");
        let mut t = theme::Theme::default();
        t.apply_palette(args.palette);
        t
    });
    let config = GameConfig {
        width: args.width,
        height: args.height,
        seed: args.seed.unwrap_or_else(rand::random),
        drop_interval_ms: args.drop_interval_ms,
    };
    log::debug!("{config:?}");

    let mut app = App::new(config, theme, args.frame_rate);
    app.run()?;
    Ok(())
}

/// Send `log` output to `path`; without a path logging stays off (the terminal is ours).
/// `RUST_LOG` sets the filter, `info` by default.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Falling-block puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blockfall",
    version,
    about = "Falling-block puzzle in the terminal. Fill a row edge to edge to clear it.",
    long_about = "Blockfall is a small falling-block puzzle game.\n\n\
        Pieces fall one row per drop interval. Complete rows vanish; clearing several rows \
        with one piece doubles the reward for each extra row (10, 20, 40, ...). If a new \
        piece has no room to appear, the board and score are wiped and play carries on.\n\n\
        CONTROLS:\n  Left/Right h/l  Move     Down j       Drop\n  \
        q z            Rotate counter-clockwise\n  w x Up k       Rotate clockwise\n  \
        p              Pause    Esc / Ctrl-C  Quit"
)]
pub struct Args {
    /// Playfield width in columns (grid cells). Shrunk to fit the terminal.
    #[arg(long, default_value = "20", value_name = "COLS", value_parser = clap::value_parser!(u16).range(4..=64))]
    pub width: u16,

    /// Playfield height in rows (grid cells). Shrunk to fit the terminal.
    #[arg(long, default_value = "25", value_name = "ROWS", value_parser = clap::value_parser!(u16).range(4..=64))]
    pub height: u16,

    /// Time between automatic drops, in milliseconds.
    #[arg(short, long, default_value = "1000", value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub drop_interval_ms: u64,

    /// Seed for the piece sequence (random if not set).
    #[arg(short, long, value_name = "N")]
    pub seed: Option<u64>,

    /// Target render frames per second (1 to 1000).
    #[arg(long, default_value = "60.0", value_name = "RATE", value_parser = parse_frame_rate)]
    pub frame_rate: f64,

    /// Path to theme file (btop-style theme[key]="value"; keys piece1..piece7, bg, div_line, main_fg, title, inactive_fg).
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette for pieces: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write logs to this file (filter with RUST_LOG).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

fn parse_frame_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (1.0..=1000.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("must be between 1 and 1000, got {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["blockfall"]).unwrap();
        assert_eq!((args.width, args.height), (20, 25));
        assert_eq!(args.drop_interval_ms, 1000);
        assert_eq!(args.palette, Palette::Normal);
        assert!(args.seed.is_none());
    }

    #[test]
    fn test_rejects_tiny_board() {
        assert!(Args::try_parse_from(["blockfall", "--width", "3"]).is_err());
        assert!(Args::try_parse_from(["blockfall", "--drop-interval-ms", "0"]).is_err());
    }

    #[test]
    fn test_frame_rate_bounds() {
        for bad in ["0", "1e-20", "-5", "NaN", "inf", "1001", "fast"] {
            assert!(
                Args::try_parse_from(["blockfall", "--frame-rate", bad]).is_err(),
                "{bad}"
            );
        }
        let args = Args::try_parse_from(["blockfall", "--frame-rate", "1"]).unwrap();
        assert!((args.frame_rate - 1.0).abs() < f64::EPSILON);
        let args = Args::try_parse_from(["blockfall", "--frame-rate", "144.5"]).unwrap();
        assert!((args.frame_rate - 144.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_palette_alias() {
        let args = Args::try_parse_from(["blockfall", "--palette", "colourblind", "-s", "5"]).unwrap();
        assert_eq!(args.palette, Palette::Colorblind);
        assert_eq!(args.seed, Some(5));
    }
}
