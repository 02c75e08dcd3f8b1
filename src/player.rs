//! The falling piece: its kind, shape matrix and playfield offset.

use crate::matrix::{self, Grid, Rotation};
use crate::piece::{self, PieceKind};

/// Top-left offset of a piece matrix in playfield coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Current piece with position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub kind: PieceKind,
    pub matrix: Grid,
    pub pos: Position,
}

impl Player {
    /// New piece of `kind`, horizontally centred on a playfield `arena_width` wide, at the top.
    pub fn spawn(kind: PieceKind, arena_width: usize) -> Self {
        let matrix = piece::create_piece(kind);
        let x = (arena_width / 2) as i32 - (matrix[0].len() / 2) as i32;
        Self {
            kind,
            matrix,
            pos: Position { x, y: 0 },
        }
    }

    /// Column count of the shape matrix.
    pub fn width(&self) -> usize {
        self.matrix.first().map_or(0, Vec::len)
    }

    /// Absolute playfield coordinates and value of every filled cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.matrix.iter().enumerate().flat_map(move |(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| **v != 0)
                .map(move |(x, &v)| (self.pos.x + x as i32, self.pos.y + y as i32, v))
        })
    }

    pub fn rotate(&mut self, direction: Rotation) {
        matrix::rotate_in_place(&mut self.matrix, direction);
    }
}
