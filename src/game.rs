//! Game state: playfield, active piece, score; move, rotate, drop, lock and respawn.

use crate::arena::Arena;
use crate::matrix::Rotation;
use crate::piece::PieceKind;
use crate::player::Player;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Something consumers (UI, logs, tests) may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The active piece settled into the playfield.
    Locked(PieceKind),
    /// One sweep removed `rows` complete rows worth `points`.
    RowsCleared { rows: u32, points: u32 },
    /// New score after a scoring event or reset.
    ScoreChanged(u32),
    /// A fresh piece collided on spawn; playfield and score were cleared.
    OverflowReset,
}

/// Game state: playfield, current piece, score and the piece RNG.
#[derive(Debug)]
pub struct GameState {
    pub arena: Arena,
    pub player: Player,
    pub score: u32,
    pub lines_cleared: u32,
    /// Overflow resets so far this session.
    pub resets: u32,
    seed: u64,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(config: &crate::GameConfig) -> Self {
        let width = usize::from(config.width);
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let player = Player::spawn(PieceKind::random(&mut rng), width);
        let mut state = Self {
            arena: Arena::new(width, usize::from(config.height)),
            player,
            score: 0,
            lines_cleared: 0,
            resets: 0,
            seed: config.seed,
            rng,
            events: Vec::new(),
        };
        state.reset_if_overflow();
        state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Take every event recorded since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Replace the active piece with a random kind at the spawn point.
    pub fn respawn(&mut self) {
        let kind = PieceKind::random(&mut self.rng);
        self.spawn(kind);
    }

    /// Replace the active piece with `kind` at the spawn point.
    ///
    /// If it collides straight away the board is reset, but the colliding
    /// piece stays current.
    pub fn spawn(&mut self, kind: PieceKind) {
        self.player = Player::spawn(kind, self.arena.width());
        self.reset_if_overflow();
    }

    fn reset_if_overflow(&mut self) {
        if !self.arena.collides(&self.player) {
            return;
        }
        log::warn!(
            "{} piece collided on spawn; clearing playfield (score was {})",
            self.player.kind.name(),
            self.score
        );
        self.arena.clear();
        self.score = 0;
        self.resets += 1;
        self.events.push(GameEvent::OverflowReset);
        self.events.push(GameEvent::ScoreChanged(0));
    }

    /// Shift the piece horizontally; undone if it would collide. Returns whether it moved.
    pub fn move_piece(&mut self, dx: i32) -> bool {
        self.player.pos.x += dx;
        if self.arena.collides(&self.player) {
            self.player.pos.x -= dx;
            return false;
        }
        true
    }

    /// Rotate the piece, kicking it sideways if the turned shape collides.
    ///
    /// Kick offsets grow by one and alternate sign (+1, -2, +3, ...) so the
    /// piece tries x+1, x-1, x+2, ... Once the next offset is wider than the
    /// matrix the rotation and position are restored. Returns whether it rotated.
    pub fn rotate(&mut self, direction: Rotation) -> bool {
        let start_x = self.player.pos.x;
        let mut offset: i32 = 1;
        self.player.rotate(direction);
        while self.arena.collides(&self.player) {
            self.player.pos.x += offset;
            offset = -(offset + offset.signum());
            if offset > self.player.width() as i32 {
                self.player.rotate(direction.reversed());
                self.player.pos.x = start_x;
                return false;
            }
        }
        true
    }

    /// Move the piece down one row. If it cannot move it locks: merge, sweep,
    /// score, respawn. Returns whether it locked.
    pub fn soft_drop(&mut self) -> bool {
        self.player.pos.y += 1;
        if !self.arena.collides(&self.player) {
            return false;
        }
        self.player.pos.y -= 1;
        self.lock();
        true
    }

    fn lock(&mut self) {
        self.arena.merge(&self.player);
        self.events.push(GameEvent::Locked(self.player.kind));

        let (rows, points) = self.arena.sweep();
        if rows > 0 {
            self.score = self.score.saturating_add(points);
            self.lines_cleared += rows;
            self.events.push(GameEvent::RowsCleared { rows, points });
            self.events.push(GameEvent::ScoreChanged(self.score));
        }
        self.respawn();
    }
}
