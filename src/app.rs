//! App: terminal init, main loop, tick and key handling.

use crate::GameConfig;
use crate::clock::DropClock;
use crate::game::{GameEvent, GameState};
use crate::input::{Action, key_to_action};
use crate::matrix::Rotation;
use crate::theme::Theme;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::DefaultTerminal;
use ratatui::backend::CrosstermBackend;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// Smallest playfield that still fits the 4-wide I piece.
const MIN_PLAYFIELD_CELLS: u16 = 4;
/// How long the "+points" note stays in the sidebar after a clear.
const CLEAR_POPUP_MS: u64 = 1500;

/// Raw mode and the alternate screen, left again on drop whatever path `run` takes.
struct TerminalGuard {
    restore: fn() -> std::io::Result<()>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self {
            restore: restore_terminal,
        };
        execute!(std::io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = (self.restore)() {
            log::warn!("terminal not fully restored: {e}");
        }
    }
}

/// Leave the alternate screen and raw mode; both steps run even if the first fails.
fn restore_terminal() -> std::io::Result<()> {
    let leave = execute!(std::io::stdout(), LeaveAlternateScreen);
    let raw = terminal::disable_raw_mode();
    leave.and(raw)
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    state: GameState,
    clock: DropClock,
    paused: bool,
    frame_duration: Duration,
    last_tick: Instant,
    /// Flash over the board after an overflow reset (created when the reset happens).
    overflow_effect: Option<Effect>,
    /// Last time we processed the overflow effect (for delta).
    effect_process_time: Option<Instant>,
    /// Most recent clear (rows, points) and when it happened.
    last_clear: Option<(u32, u32, Instant)>,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme, frame_rate: f64) -> Self {
        let state = GameState::new(&config);
        let clock = DropClock::new(Duration::from_millis(config.drop_interval_ms));
        Self {
            config,
            theme,
            state,
            clock,
            paused: false,
            frame_duration: Duration::from_secs_f64(1.0 / frame_rate),
            last_tick: Instant::now(),
            overflow_effect: None,
            effect_process_time: None,
            last_clear: None,
        }
    }

    /// Shrink the playfield to what the terminal can show; rebuilds the game if it changed.
    /// Called at startup and on every resize. A board that still fits is kept as is.
    fn fit_to_terminal(&mut self, term_cols: u16, term_rows: u16) {
        let (fit_w, fit_h) = crate::ui::max_playfield_cells_for_terminal(term_cols, term_rows);
        let width = self.config.width.min(fit_w).max(MIN_PLAYFIELD_CELLS);
        let height = self.config.height.min(fit_h).max(MIN_PLAYFIELD_CELLS);
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }
        log::info!(
            "terminal {}x{} too small for {}x{} playfield; using {}x{}",
            term_cols,
            term_rows,
            self.config.width,
            self.config.height,
            width,
            height
        );
        self.config.width = width;
        self.config.height = height;
        self.state = GameState::new(&self.config);
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::MoveLeft => {
                self.state.move_piece(-1);
            }
            Action::MoveRight => {
                self.state.move_piece(1);
            }
            Action::RotateCw => {
                self.state.rotate(Rotation::Clockwise);
            }
            Action::RotateCcw => {
                self.state.rotate(Rotation::CounterClockwise);
            }
            Action::SoftDrop => {
                self.state.soft_drop();
                self.clock.reset();
            }
            Action::Pause | Action::Quit | Action::None => {}
        }
    }

    /// React to what the last input or drop did to the game.
    fn handle_game_events(&mut self) {
        for ev in self.state.drain_events() {
            match ev {
                GameEvent::OverflowReset => {
                    self.overflow_effect = Some(crate::ui::overflow_effect(&self.theme));
                    self.effect_process_time = None;
                }
                GameEvent::Locked(kind) => log::debug!("locked {}", kind.name()),
                GameEvent::RowsCleared { rows, points } => {
                    log::info!("cleared {rows} row(s) for {points} points");
                    self.last_clear = Some((rows, points, Instant::now()));
                }
                GameEvent::ScoreChanged(score) => log::debug!("score now {score}"),
            }
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let guard = TerminalGuard::enter()?;
        let mut terminal = DefaultTerminal::new(CrosstermBackend::new(std::io::stdout()))?;

        let (term_cols, term_rows) = crossterm::terminal::size()?;
        self.fit_to_terminal(term_cols, term_rows);
        log::info!(
            "starting {}x{} playfield, seed {}, drop every {:?}",
            self.config.width,
            self.config.height,
            self.state.seed(),
            self.clock.interval()
        );

        let result = self.run_loop(&mut terminal);
        drop(guard);

        log::info!(
            "session over: score {}, lines {}, resets {}",
            self.state.score,
            self.state.lines_cleared,
            self.state.resets
        );
        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.last_tick = Instant::now();
        loop {
            let now = Instant::now();
            if self
                .last_clear
                .is_some_and(|(_, _, at)| now.duration_since(at) > Duration::from_millis(CLEAR_POPUP_MS))
            {
                self.last_clear = None;
            }
            let clear_popup = self.last_clear.map(|(rows, points, _)| (rows, points));
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    &self.state,
                    &self.theme,
                    crate::ui::Overlay {
                        paused: self.paused,
                        clear_popup,
                        overflow_effect: &mut self.overflow_effect,
                        effect_process_time: &mut self.effect_process_time,
                        now,
                    },
                );
            })?;
            if self.overflow_effect.as_ref().is_some_and(Effect::done) {
                self.overflow_effect = None;
                self.effect_process_time = None;
            }

            let timeout = self.frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let key = match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => key,
                        Event::Resize(cols, rows) => {
                            self.fit_to_terminal(cols, rows);
                            continue;
                        }
                        _ => continue,
                    };
                    match key_to_action(key) {
                        Action::Quit => return Ok(()),
                        Action::Pause => {
                            self.paused = !self.paused;
                            log::debug!("paused: {}", self.paused);
                        }
                        action if !self.paused => self.apply_action(action),
                        _ => {}
                    }
                    self.handle_game_events();
                }
            }

            let tick_now = Instant::now();
            let elapsed = tick_now.saturating_duration_since(self.last_tick);
            self.last_tick = tick_now;
            if !self.paused {
                self.clock.tick(&mut self.state, elapsed);
                self.handle_game_events();
            }
        }
    }
}
