//! Piece kinds and their shape templates.

use crate::matrix::Grid;
use rand::Rng;

/// Tetromino kinds (I, J, L, O, S, T, Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [Self::I, Self::J, Self::L, Self::O, Self::S, Self::T, Self::Z];

    /// Cell value written into the grid for this kind; doubles as the colour index.
    pub fn value(self) -> u8 {
        match self {
            Self::I => 1,
            Self::L => 2,
            Self::J => 3,
            Self::O => 4,
            Self::Z => 5,
            Self::S => 6,
            Self::T => 7,
        }
    }

    /// Uniformly random kind.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn name(self) -> char {
        match self {
            Self::I => 'I',
            Self::J => 'J',
            Self::L => 'L',
            Self::O => 'O',
            Self::S => 'S',
            Self::T => 'T',
            Self::Z => 'Z',
        }
    }
}

/// Fresh shape matrix for `kind`, filled with its value or 0.
pub fn create_piece(kind: PieceKind) -> Grid {
    let v = kind.value();
    match kind {
        PieceKind::I => vec![
            vec![0, v, 0, 0],
            vec![0, v, 0, 0],
            vec![0, v, 0, 0],
            vec![0, v, 0, 0],
        ],
        PieceKind::L => vec![vec![0, v, 0], vec![0, v, 0], vec![0, v, v]],
        PieceKind::J => vec![vec![0, v, 0], vec![0, v, 0], vec![v, v, 0]],
        PieceKind::O => vec![vec![v, v], vec![v, v]],
        PieceKind::Z => vec![vec![v, v, 0], vec![0, v, v], vec![0, 0, 0]],
        PieceKind::S => vec![vec![0, v, v], vec![v, v, 0], vec![0, 0, 0]],
        PieceKind::T => vec![vec![0, v, 0], vec![v, v, v], vec![0, 0, 0]],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    #[test]
    fn test_every_piece_is_square_with_four_cells() {
        for kind in PieceKind::ALL {
            let m = create_piece(kind);
            assert!(m.iter().all(|row| row.len() == m.len()), "{kind:?} not square");
            let filled: Vec<u8> = m.iter().flatten().copied().filter(|&c| c != 0).collect();
            assert_eq!(filled.len(), 4, "{kind:?}");
            assert!(filled.iter().all(|&c| c == kind.value()));
        }
    }

    #[test]
    fn test_values_are_distinct_and_in_range() {
        let values: HashSet<u8> = PieceKind::ALL.iter().map(|k| k.value()).collect();
        assert_eq!(values.len(), 7);
        assert!(values.iter().all(|v| (1..=7).contains(v)));
    }

    #[test]
    fn test_o_piece() {
        assert_eq!(create_piece(PieceKind::O), vec![vec![4, 4], vec![4, 4]]);
    }

    #[test]
    fn test_random_covers_all_kinds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let seen: HashSet<PieceKind> = (0..500).map(|_| PieceKind::random(&mut rng)).collect();
        assert_eq!(seen.len(), 7);
    }
}
