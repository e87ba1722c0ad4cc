//! Deterministic position hashing for the transposition cache.
//!
//! Not a Zobrist scheme -- there are no random tables to keep in sync
//! across incremental updates. Every hash is recomputed from scratch
//! by folding the whole position through an FNV-style mixing step, so
//! two equal positions always hash equally regardless of how each was
//! reached.

use crate::basetypes::Color;
use crate::board::BoardState;

const FNV_OFFSET_BASIS: u64 = 1469598103934665603;
const MIX_CONSTANT: u64 = 0x9e3779b97f4a7c15;

#[inline]
fn mix(h: u64, v: u64) -> u64 {
    h ^ v.wrapping_add(MIX_CONSTANT).wrapping_add(h << 6).wrapping_add(h >> 2)
}

/// Hashes `board` together with the color to move and the number of
/// plies left to search, so that the same position at a different
/// search depth or with a different side to move never collides.
///
/// Every field that distinguishes two otherwise-identical positions
/// must be folded in here, including each piece's `moved` bit: a rook
/// or king that has shuffled back to its home square has lost
/// castling rights even though its square, kind, and color match a
/// piece that never moved, so the two must not hash (and therefore
/// cache-bucket) the same.
pub fn hash_state(board: &BoardState, active_color: Color, remaining_plies: u32) -> u64 {
    let mut h = FNV_OFFSET_BASIS;

    for row in 0..8u64 {
        for col in 0..8u64 {
            let square = crate::basetypes::Square::new(col as i32, row as i32).unwrap();
            let cell_value = match board.piece_at(square) {
                Some(piece) => {
                    let piece_bits = piece.kind as u64
                        | ((piece.color as u64) << 3)
                        | ((piece.moved as u64) << 4)
                        | (col << 8)
                        | (row << 16);
                    piece_bits + 1
                }
                None => 0,
            };
            h = mix(h, cell_value);
        }
    }

    let en_passant_bits = match board.en_passant {
        Some(ep) => {
            (ep.target.col as u64 + 1)
                | ((ep.target.row as u64 + 1) << 4)
                | ((ep.capture.col as u64 + 1) << 8)
                | ((ep.capture.row as u64 + 1) << 12)
        }
        None => 0,
    };
    h = mix(h, en_passant_bits);

    h = mix(h, board.halfmove_clock as u64);
    h = mix(h, active_color as u64);
    h = mix(h, remaining_plies as u64);

    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;

    #[test]
    fn identical_positions_hash_identically() {
        let a = BoardState::from_parts(&[5, 5], &[0, 1], &[4, 4], &[0, 7], None, None, 3).unwrap();
        let b = BoardState::from_parts(&[5, 5], &[0, 1], &[4, 4], &[0, 7], None, None, 3).unwrap();
        assert_eq!(
            hash_state(&a, Color::White, 4),
            hash_state(&b, Color::White, 4)
        );
    }

    #[test]
    fn side_to_move_changes_the_hash() {
        let board = BoardState::from_parts(&[5, 5], &[0, 1], &[4, 4], &[0, 7], None, None, 0).unwrap();
        assert_ne!(
            hash_state(&board, Color::White, 4),
            hash_state(&board, Color::Black, 4)
        );
    }

    #[test]
    fn remaining_plies_changes_the_hash() {
        let board = BoardState::from_parts(&[5, 5], &[0, 1], &[4, 4], &[0, 7], None, None, 0).unwrap();
        assert_ne!(
            hash_state(&board, Color::White, 4),
            hash_state(&board, Color::White, 5)
        );
    }

    #[test]
    fn en_passant_window_changes_the_hash() {
        use crate::board::EnPassant;
        use crate::basetypes::Square;

        let plain = BoardState::from_parts(&[5, 5], &[0, 1], &[4, 4], &[0, 7], None, None, 0).unwrap();
        let with_ep = BoardState::from_parts(
            &[5, 5],
            &[0, 1],
            &[4, 4],
            &[0, 7],
            None,
            Some(EnPassant {
                target: Square::new(3, 2).unwrap(),
                capture: Square::new(3, 3).unwrap(),
            }),
            0,
        )
        .unwrap();
        assert_ne!(
            hash_state(&plain, Color::White, 4),
            hash_state(&with_ep, Color::White, 4)
        );
    }

    #[test]
    fn moved_flag_changes_the_hash() {
        let never_moved = BoardState::from_parts(
            &[5, 5, 3],
            &[0, 1, 0],
            &[4, 4, 0],
            &[0, 7, 0],
            Some(&[false, false, false]),
            None,
            0,
        )
        .unwrap();
        let rook_moved = BoardState::from_parts(
            &[5, 5, 3],
            &[0, 1, 0],
            &[4, 4, 0],
            &[0, 7, 0],
            Some(&[false, false, true]),
            None,
            0,
        )
        .unwrap();
        assert_ne!(
            hash_state(&never_moved, Color::White, 4),
            hash_state(&rook_moved, Color::White, 4)
        );
    }
}
