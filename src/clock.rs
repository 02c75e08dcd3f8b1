//! Drop timer: accumulates frame time and forces a drop once per interval.

use crate::game::GameState;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DropClock {
    interval: Duration,
    counter: Duration,
}

impl DropClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            counter: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time accumulated towards the next drop.
    #[cfg(test)]
    pub fn elapsed(&self) -> Duration {
        self.counter
    }

    /// Restart the interval; called after any drop, including player-triggered ones.
    pub fn reset(&mut self) {
        self.counter = Duration::ZERO;
    }

    /// Add `elapsed` and, once the total exceeds the interval, drop the piece.
    /// Returns whether the piece locked.
    pub fn tick(&mut self, state: &mut GameState, elapsed: Duration) -> bool {
        self.counter += elapsed;
        if self.counter <= self.interval {
            return false;
        }
        self.reset();
        state.soft_drop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;

    fn state() -> GameState {
        GameState::new(&crate::GameConfig {
            width: 20,
            height: 25,
            seed: 1,
            drop_interval_ms: 1000,
        })
    }

    #[test]
    fn test_drops_only_after_interval_exceeded() {
        let mut g = state();
        let mut clock = DropClock::new(Duration::from_millis(1000));
        for _ in 0..62 {
            clock.tick(&mut g, Duration::from_millis(16));
        }
        assert_eq!(g.player.pos.y, 0);
        // 63 * 16 = 1008 > 1000
        clock.tick(&mut g, Duration::from_millis(16));
        assert_eq!(g.player.pos.y, 1);
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_exactly_interval_does_not_drop() {
        let mut g = state();
        let mut clock = DropClock::new(Duration::from_millis(100));
        clock.tick(&mut g, Duration::from_millis(100));
        assert_eq!(g.player.pos.y, 0);
        clock.tick(&mut g, Duration::from_millis(1));
        assert_eq!(g.player.pos.y, 1);
    }

    #[test]
    fn test_long_frame_drops_once() {
        let mut g = state();
        let mut clock = DropClock::new(Duration::from_millis(100));
        clock.tick(&mut g, Duration::from_millis(950));
        assert_eq!(g.player.pos.y, 1);
    }

    #[test]
    fn test_tick_reports_lock() {
        let mut g = state();
        g.spawn(PieceKind::O);
        let mut clock = DropClock::new(Duration::from_millis(10));
        let mut locks = 0;
        for _ in 0..24 {
            if clock.tick(&mut g, Duration::from_millis(11)) {
                locks += 1;
            }
        }
        assert_eq!(locks, 1);
        assert_eq!(g.arena.get(9, 24), Some(4));
    }

    #[test]
    fn test_reset() {
        let mut g = state();
        let mut clock = DropClock::new(Duration::from_millis(100));
        clock.tick(&mut g, Duration::from_millis(90));
        clock.reset();
        clock.tick(&mut g, Duration::from_millis(90));
        assert_eq!(g.player.pos.y, 0);
        assert_eq!(clock.interval(), Duration::from_millis(100));
    }
}
