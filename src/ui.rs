//! Layout and drawing: playfield, active piece, score sidebar, pause overlay, reset flash.

use crate::game::GameState;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Terminal columns per playfield cell; two keeps cells roughly square.
const CELL_WIDTH: u16 = 2;
const CELL_HEIGHT: u16 = 1;
const SIDEBAR_WIDTH: u16 = 24;

/// Duration of the flash played over the board after an overflow reset.
const OVERFLOW_FADE_MS: u32 = 600;

/// Outer size (with border) of a playfield `width` x `height` cells.
fn playfield_pixel_size(width: u16, height: u16) -> (u16, u16) {
    (width * CELL_WIDTH + 2, height * CELL_HEIGHT + 2)
}

/// Largest playfield (cells) whose board, border and sidebar fit the terminal.
pub fn max_playfield_cells_for_terminal(term_cols: u16, term_rows: u16) -> (u16, u16) {
    let max_w = term_cols.saturating_sub(2).saturating_sub(SIDEBAR_WIDTH) / CELL_WIDTH;
    let max_h = term_rows.saturating_sub(2) / CELL_HEIGHT;
    (max_w, max_h)
}

/// Effect played over the board when the playfield was wiped by an overflow.
pub fn overflow_effect(theme: &Theme) -> Effect {
    fx::fade_from(
        theme.title,
        theme.title,
        (OVERFLOW_FADE_MS, Interpolation::QuadOut),
    )
}

/// Everything the frame needs besides the game itself.
pub struct Overlay<'a> {
    pub paused: bool,
    /// (rows, points) of a recent clear, shown under the score.
    pub clear_popup: Option<(u32, u32)>,
    pub overflow_effect: &'a mut Option<Effect>,
    pub effect_process_time: &'a mut Option<Instant>,
    pub now: Instant,
}

pub fn draw(frame: &mut Frame, state: &GameState, theme: &Theme, overlay: Overlay<'_>) {
    let area = frame.area();
    let (pw, ph) = playfield_pixel_size(state.arena.width() as u16, state.arena.height() as u16);
    let total_w = pw + SIDEBAR_WIDTH;

    // Center horizontally
    let horiz_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);

    // Center vertically
    let vert_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz_chunks[1]);

    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert_chunks[1]);
    let (playfield_area, sidebar_area) = (inner[0], inner[1]);

    let board_rect = draw_playfield(frame, state, theme, playfield_area);
    draw_sidebar(frame, state, theme, sidebar_area, overlay.clear_popup);

    if overlay.paused {
        draw_pause_overlay(frame, theme, area);
    }
    apply_overflow_effect(
        frame,
        board_rect,
        overlay.overflow_effect,
        overlay.effect_process_time,
        overlay.now,
    );
}

/// Draw the settled cells and the active piece; returns the board rect (inside the border).
fn draw_playfield(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Blockfall ", Style::default().fg(theme.title)));
    let board = block.inner(area);
    block.render(area, frame.buffer_mut());

    for (y, row) in state.arena.rows().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            put_cell(frame, theme, board, x as i32, y as i32, value);
        }
    }
    for (x, y, value) in state.player.cells() {
        put_cell(frame, theme, board, x, y, value);
    }
    board
}

fn put_cell(frame: &mut Frame, theme: &Theme, board: Rect, x: i32, y: i32, value: u8) {
    let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
        return;
    };
    let rx = board.x + x * CELL_WIDTH;
    let ry = board.y + y * CELL_HEIGHT;
    if rx + CELL_WIDTH > board.right() || ry >= board.bottom() {
        return;
    }
    let (symbol, style) = if value == 0 {
        ("  ", Style::default().bg(theme.bg))
    } else {
        ("██", Style::default().fg(theme.cell_color(value)).bg(theme.bg))
    };
    frame.buffer_mut().set_string(rx, ry, symbol, style);
}

fn draw_sidebar(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    clear_popup: Option<(u32, u32)>,
) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let help_style = Style::default().fg(theme.inactive_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Stats
            Constraint::Length(1), // gap
            Constraint::Length(9), // Controls
            Constraint::Fill(1),
        ])
        .split(area);

    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let stats_inner = stats_block.inner(chunks[0]);
    stats_block.render(chunks[0], frame.buffer_mut());
    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value, fg_style),
        ])
    };
    let popup = clear_popup.map_or_else(Line::default, |(rows, points)| {
        let label = if rows > 1 {
            format!("+{points} ({rows} rows)")
        } else {
            format!("+{points}")
        };
        Line::from(Span::styled(
            label,
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        ))
    });
    let stats_lines = vec![
        stat("Score: ", state.score.to_string()),
        popup,
        stat("Lines: ", state.lines_cleared.to_string()),
        stat("Resets: ", state.resets.to_string()),
        stat("Seed: ", state.seed().to_string()),
    ];
    Paragraph::new(Text::from(stats_lines)).render(stats_inner, frame.buffer_mut());

    let help_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Keys ", title_style));
    let help_inner = help_block.inner(chunks[2]);
    help_block.render(chunks[2], frame.buffer_mut());
    let help = [
        "←/→ h/l  Move",
        "↓ j      Drop",
        "q z      Rotate ⟲",
        "w x ↑ k  Rotate ⟳",
        "p        Pause",
        "Esc      Quit",
    ];
    let help_lines: Vec<Line> = help
        .iter()
        .map(|l| Line::from(Span::styled(*l, help_style)))
        .collect();
    Paragraph::new(Text::from(help_lines)).render(help_inner, frame.buffer_mut());
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup_w = 28u16;
    let popup_h = 5u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default()
                .fg(Color::Black)
                .bg(theme.title)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P Resume    Esc Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

/// Advance and render the overflow flash, if one is running.
fn apply_overflow_effect(
    frame: &mut Frame,
    board: Rect,
    effect: &mut Option<Effect>,
    process_time: &mut Option<Instant>,
    now: Instant,
) {
    let Some(effect) = effect else {
        *process_time = None;
        return;
    };
    let delta = process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u128::from(u32::MAX)) as u32;
    *process_time = Some(now);
    frame.render_effect(effect, board, TfxDuration::from_millis(delta_ms));
}
