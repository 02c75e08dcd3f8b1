//! Playfield of settled cells: collision, merge and row sweep.

use crate::player::Player;
use std::collections::VecDeque;

/// Points for the first row cleared in one sweep; each further row doubles it.
const ROW_BASE_POINTS: u32 = 10;

/// Playfield: grid of cell values. y=0 is top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena {
    width: usize,
    /// rows[y][x] = cell. rows[0] is top.
    rows: VecDeque<Vec<u8>>,
}

impl Arena {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: crate::matrix::create_grid(width, height).into(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Cell at signed coordinates; `None` outside the playfield.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: u8) {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = value;
        }
    }

    /// True if any filled cell of the piece is off the playfield or over a settled cell.
    pub fn collides(&self, player: &Player) -> bool {
        player
            .cells()
            .any(|(x, y, _)| self.get(x, y).is_none_or(|cell| cell != 0))
    }

    /// Write the piece's filled cells into the playfield.
    pub fn merge(&mut self, player: &Player) {
        for (x, y, value) in player.cells() {
            self.set(x, y, value);
        }
    }

    /// Remove every complete row, dropping the rows above it. Returns (rows cleared, points).
    ///
    /// Scans bottom to top. A removed row comes back empty at the top, so the
    /// height never changes. The first row in one sweep is worth 10 and every
    /// following row twice the previous one.
    pub fn sweep(&mut self) -> (u32, u32) {
        let mut multiplier = 1u32;
        let mut points = 0u32;
        let mut cleared = 0u32;
        let mut y = self.rows.len();
        while y > 0 {
            let idx = y - 1;
            if self.rows[idx].contains(&0) {
                y -= 1;
                continue;
            }
            if let Some(mut row) = self.rows.remove(idx) {
                row.fill(0);
                self.rows.push_front(row);
            }
            // Same index again: the row above has shifted into it.
            points = points.saturating_add(ROW_BASE_POINTS.saturating_mul(multiplier));
            multiplier = multiplier.saturating_mul(2);
            cleared += 1;
        }
        (cleared, points)
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(0);
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|&c| c == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;
    use crate::player::Position;

    fn fill_row(arena: &mut Arena, y: i32, value: u8) {
        for x in 0..arena.width() as i32 {
            arena.set(x, y, value);
        }
    }

    #[test]
    fn test_new_is_empty() {
        let a = Arena::new(20, 25);
        assert_eq!((a.width(), a.height()), (20, 25));
        assert!(a.is_empty());
    }

    #[test]
    fn test_collides_with_settled_cell() {
        let mut a = Arena::new(10, 10);
        let mut p = Player::spawn(PieceKind::O, 10);
        p.pos = Position { x: 2, y: 2 };
        assert!(!a.collides(&p));
        a.set(3, 3, 1);
        assert!(a.collides(&p));
    }

    #[test]
    fn test_collides_with_every_edge() {
        let a = Arena::new(10, 10);
        let mut p = Player::spawn(PieceKind::O, 10);
        for pos in [(-1, 0), (9, 0), (0, -1), (0, 9)] {
            p.pos = Position { x: pos.0, y: pos.1 };
            assert!(a.collides(&p), "{pos:?}");
        }
        p.pos = Position { x: 8, y: 8 };
        assert!(!a.collides(&p));
    }

    #[test]
    fn test_empty_matrix_cells_may_hang_outside() {
        let a = Arena::new(10, 10);
        let mut p = Player::spawn(PieceKind::I, 10);
        // Column 0 of the I matrix is empty.
        p.pos = Position { x: -1, y: 0 };
        assert!(!a.collides(&p));
    }

    #[test]
    fn test_merge_writes_piece_value() {
        let mut a = Arena::new(6, 6);
        let mut p = Player::spawn(PieceKind::T, 6);
        p.pos = Position { x: 0, y: 4 };
        a.merge(&p);
        assert_eq!(a.get(1, 4), Some(7));
        assert_eq!(a.get(0, 5), Some(7));
        assert_eq!(a.get(2, 5), Some(7));
        assert_eq!(a.get(0, 4), Some(0));
    }

    #[test]
    fn test_sweep_single_row_shifts_down() {
        let mut a = Arena::new(4, 5);
        a.set(1, 2, 3);
        fill_row(&mut a, 4, 1);
        a.set(0, 3, 2);
        assert_eq!(a.sweep(), (1, 10));
        assert_eq!(a.height(), 5);
        let rows: Vec<Vec<u8>> = a.rows().map(<[u8]>::to_vec).collect();
        assert_eq!(
            rows,
            vec![
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
                vec![0, 0, 0, 0],
                vec![0, 3, 0, 0],
                vec![2, 0, 0, 0],
            ]
        );
    }

    #[test]
    fn test_sweep_multiplier_doubles() {
        for (n, expected) in [(1, 10), (2, 30), (3, 70), (4, 150)] {
            let mut a = Arena::new(5, 8);
            for y in 0..n {
                fill_row(&mut a, 7 - y, 1);
            }
            assert_eq!(a.sweep(), (n as u32, expected), "{n} rows");
            assert!(a.is_empty());
        }
    }

    #[test]
    fn test_sweep_non_adjacent_rows() {
        let mut a = Arena::new(3, 6);
        fill_row(&mut a, 5, 1);
        a.set(0, 4, 2);
        fill_row(&mut a, 3, 1);
        assert_eq!(a.sweep(), (2, 30));
        assert_eq!(a.get(0, 5), Some(2));
        assert_eq!(a.rows().filter(|r| r.iter().any(|&c| c != 0)).count(), 1);
    }

    #[test]
    fn test_fill_last_gap_clears_row() {
        let mut a = Arena::new(6, 6);
        for x in 0..6 {
            if x != 2 {
                a.set(x, 5, 5);
            }
        }
        assert_eq!(a.sweep(), (0, 0));
        let mut p = Player::spawn(PieceKind::I, 6);
        // The I matrix's filled column is x=1.
        p.pos = Position { x: 1, y: 2 };
        assert!(!a.collides(&p));
        a.merge(&p);
        assert_eq!(a.sweep(), (1, 10));
        assert_eq!(a.get(2, 5), Some(1));
        assert_eq!(a.get(0, 5), Some(0));
    }

    #[test]
    fn test_clear() {
        let mut a = Arena::new(4, 4);
        fill_row(&mut a, 0, 3);
        a.clear();
        assert!(a.is_empty());
        assert_eq!(a.height(), 4);
    }
}
