//! Grid helpers: blank grids and in-place rotation of square piece matrices.

/// Rows of cell values; `0` is empty, `1..=7` a piece kind.
pub type Grid = Vec<Vec<u8>>;

/// Rotation direction for [`rotate_in_place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// The direction that undoes this one.
    pub fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

/// `height` rows of `width` zeros.
pub fn create_grid(width: usize, height: usize) -> Grid {
    (0..height).map(|_| vec![0; width]).collect()
}

/// Rotate a square matrix by a quarter turn: transpose, then mirror.
///
/// The matrix must be square. Piece matrices always are; nothing else is
/// rotated, so this is not checked.
pub fn rotate_in_place(matrix: &mut Grid, direction: Rotation) {
    let n = matrix.len();
    for y in 0..n {
        for x in 0..y {
            let tmp = matrix[y][x];
            matrix[y][x] = matrix[x][y];
            matrix[x][y] = tmp;
        }
    }
    match direction {
        Rotation::Clockwise => matrix.iter_mut().for_each(|row| row.reverse()),
        Rotation::CounterClockwise => matrix.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_create_grid_dims() {
        let g = create_grid(20, 25);
        assert_eq!(g.len(), 25);
        assert!(g.iter().all(|row| row.len() == 20 && row.iter().all(|&c| c == 0)));
    }

    #[test]
    fn test_rotate_clockwise() {
        let mut m = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]];
        rotate_in_place(&mut m, Rotation::Clockwise);
        assert_eq!(m, vec![vec![7, 4, 1], vec![8, 5, 2], vec![9, 6, 3]]);
    }

    #[test]
    fn test_rotate_counter_clockwise() {
        let mut m = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]];
        rotate_in_place(&mut m, Rotation::CounterClockwise);
        assert_eq!(m, vec![vec![3, 6, 9], vec![2, 5, 8], vec![1, 4, 7]]);
    }

    #[test]
    fn test_rotate_then_reverse_is_identity() {
        let original = vec![vec![0, 2, 0], vec![0, 2, 0], vec![0, 2, 2]];
        let mut m = original.clone();
        rotate_in_place(&mut m, Rotation::Clockwise);
        rotate_in_place(&mut m, Rotation::Clockwise.reversed());
        assert_eq!(m, original);
    }

    fn square_matrix() -> impl Strategy<Value = Grid> {
        (1usize..=5).prop_flat_map(|n| {
            prop::collection::vec(prop::collection::vec(0u8..=7, n), n)
        })
    }

    proptest! {
        #[test]
        fn test_four_quarter_turns_restore(m in square_matrix(), cw in any::<bool>()) {
            let dir = if cw { Rotation::Clockwise } else { Rotation::CounterClockwise };
            let mut rotated = m.clone();
            for _ in 0..4 {
                rotate_in_place(&mut rotated, dir);
            }
            prop_assert_eq!(rotated, m);
        }
    }
}
