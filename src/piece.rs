//! Defines the `Piece` record stored in each board slot.

use crate::basetypes::{Color, PieceKind, Square};

/// A single piece slot.
///
/// The host supplies up to 64 of these at root; the search clones and
/// mutates them freely afterwards. A slot with `alive == false` is a
/// tombstone: its `kind`/`color`/`square` are stale and must not be
/// consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
    /// Set permanently to `true` after the first move involving this
    /// piece. Used for initial double-pawn pushes and castling
    /// eligibility. Monotonic: once `true`, never reset.
    pub moved: bool,
    pub alive: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, square: Square, moved: bool) -> Piece {
        Piece {
            kind,
            color,
            square,
            moved,
            alive: true,
        }
    }

    /// A dead filler slot, used to pad the fixed-size piece array
    /// beyond the host-supplied piece count.
    pub const fn dead() -> Piece {
        Piece {
            kind: PieceKind::Pawn,
            color: Color::White,
            square: Square { col: 0, row: 0 },
            moved: false,
            alive: false,
        }
    }
}
