//! Implements the board-state representation and its validating
//! constructor.
//!
//! `BoardState` holds a position as a piece list plus an 8x8
//! occupancy index, the en-passant window, and the halfmove clock. It
//! does not know anything about move generation or evaluation -- see
//! `movegen`, `apply`, and `eval` for that.

use std::convert::TryFrom;

use crate::basetypes::{Color, PieceKind, Square};
use crate::piece::Piece;

/// The maximum number of piece slots the host may supply.
pub const MAX_PIECES: usize = 64;

/// The pair of squares that becomes valid for one ply after a double
/// pawn push: `target` is the square a capturing pawn would move to,
/// `capture` is the square of the pawn that may be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnPassant {
    pub target: Square,
    pub capture: Square,
}

/// Represents an invalid set of host-supplied inputs.
///
/// Mirrors the framework crate's `IllegalBoard`: a bare marker with no
/// payload, returned whenever `BoardState::from_parts` cannot build a
/// consistent position from what the host handed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError;

/// A chess position: a piece list with a parallel occupancy index.
///
/// All fields are `Copy`, so cloning a `BoardState` -- which the
/// search does before every recursive descent -- is a plain memcpy of
/// a fixed-size value, with no heap allocation and no aliasing
/// between parent and child after the copy.
#[derive(Debug, Clone, Copy)]
pub struct BoardState {
    pieces: [Piece; MAX_PIECES],
    piece_count: usize,
    occupancy: [[Option<u8>; 8]; 8],
    pub en_passant: Option<EnPassant>,
    pub halfmove_clock: u32,
}

impl BoardState {
    /// Builds a position from parallel host-supplied arrays.
    ///
    /// Validates: piece count in `0..=64`, every coordinate in-board,
    /// every kind in `0..=5`, every color in `0..=1`, and that the
    /// arrays describe no two alive pieces on the same square. `moved`
    /// defaults to `false` for every piece when `piece_moved` is
    /// `None`. Any violation rejects the whole call: `BoardState` is
    /// never built in a partially-valid state.
    pub fn from_parts(
        piece_kinds: &[i32],
        piece_colors: &[i32],
        piece_cols: &[i32],
        piece_rows: &[i32],
        piece_moved: Option<&[bool]>,
        en_passant: Option<EnPassant>,
        halfmove_clock: u32,
    ) -> Result<BoardState, ValidationError> {
        let piece_count = piece_kinds.len();
        if piece_count > MAX_PIECES
            || piece_colors.len() != piece_count
            || piece_cols.len() != piece_count
            || piece_rows.len() != piece_count
            || piece_moved.map_or(false, |m| m.len() != piece_count)
        {
            return Err(ValidationError);
        }

        let mut pieces = [Piece::dead(); MAX_PIECES];
        let mut occupancy = [[None; 8]; 8];

        for i in 0..piece_count {
            let kind = PieceKind::try_from(piece_kinds[i]).map_err(|_| ValidationError)?;
            let color = Color::try_from(piece_colors[i]).map_err(|_| ValidationError)?;
            let square = Square::new(piece_cols[i], piece_rows[i]).ok_or(ValidationError)?;
            let moved = piece_moved.map_or(false, |m| m[i]);

            let slot = &mut occupancy[square.row as usize][square.col as usize];
            if slot.is_some() {
                return Err(ValidationError);
            }
            *slot = Some(i as u8);
            pieces[i] = Piece::new(kind, color, square, moved);
        }

        Ok(BoardState {
            pieces,
            piece_count,
            occupancy,
            en_passant,
            halfmove_clock,
        })
    }

    /// Returns the piece occupying `square`, if any and if alive.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.occupancy[square.row as usize][square.col as usize]
            .map(|i| &self.pieces[i as usize])
            .filter(|p| p.alive)
    }

    /// Returns the slot index occupying `square`, if any and if alive.
    #[inline]
    pub(crate) fn slot_at(&self, square: Square) -> Option<usize> {
        self.occupancy[square.row as usize][square.col as usize]
            .map(|i| i as usize)
            .filter(|&i| self.pieces[i].alive)
    }

    /// Iterates over all alive pieces, along with their slot index.
    pub fn alive_pieces(&self) -> impl Iterator<Item = (usize, &Piece)> {
        self.pieces[..self.piece_count]
            .iter()
            .enumerate()
            .filter(|(_, p)| p.alive)
    }

    /// Returns `true` if the given color still has a king on the
    /// board.
    pub fn has_king(&self, color: Color) -> bool {
        self.alive_pieces()
            .any(|(_, p)| p.kind == PieceKind::King && p.color == color)
    }

    pub(crate) fn piece(&self, slot: usize) -> &Piece {
        &self.pieces[slot]
    }

    pub(crate) fn piece_mut(&mut self, slot: usize) -> &mut Piece {
        &mut self.pieces[slot]
    }

    pub(crate) fn occupancy_set(&mut self, square: Square, slot: Option<usize>) {
        self.occupancy[square.row as usize][square.col as usize] = slot.map(|i| i as u8);
    }

    pub(crate) fn kill(&mut self, slot: usize) {
        let square = self.pieces[slot].square;
        self.pieces[slot].alive = false;
        self.occupancy_set(square, None);
    }
}
