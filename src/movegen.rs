//! Generates pseudo-legal moves for a single piece or for every piece
//! of a color.
//!
//! **Important note:** this generator does not filter out moves that
//! leave the moving side's own king in check -- it is unaware of
//! check entirely. Consequently it cannot distinguish checkmate from
//! stalemate, it permits castling through an attacked square, and it
//! will happily offer a king move into check. That is a deliberate
//! simplification carried over from this core's origin: it keeps move
//! generation a pure combinatorial producer, with the cost of an
//! "is this square attacked" query paid nowhere at all. Positions
//! where a king captures are handled one ply deeper, in `search`.

use crate::basetypes::{Color, PieceKind, Square};
use crate::board::BoardState;
use crate::moves::{Move, MoveList};
use crate::piece::Piece;

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const BISHOP_DIRS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ROOK_DIRS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

fn promotion_for(row: Coord) -> Option<PieceKind> {
    if row == 0 || row == 7 {
        Some(PieceKind::Queen)
    } else {
        None
    }
}

type Coord = u8;

/// Appends every pseudo-legal move for the piece in `slot` to `list`.
/// A no-op if the slot is dead.
pub fn generate_moves_for_piece(board: &BoardState, slot: usize, list: &mut MoveList) {
    let piece = *board.piece(slot);
    if !piece.alive {
        return;
    }

    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, &piece, list),
        PieceKind::Knight => generate_knight_moves(board, &piece, list),
        PieceKind::Bishop => generate_sliding_moves(board, &piece, &BISHOP_DIRS, list),
        PieceKind::Rook => generate_sliding_moves(board, &piece, &ROOK_DIRS, list),
        PieceKind::Queen => {
            generate_sliding_moves(board, &piece, &BISHOP_DIRS, list);
            generate_sliding_moves(board, &piece, &ROOK_DIRS, list);
        }
        PieceKind::King => generate_king_moves(board, &piece, list),
    }
}

/// Appends every pseudo-legal move for every alive piece of `color`.
pub fn generate_moves(board: &BoardState, color: Color) -> MoveList {
    let mut list = MoveList::new();
    for (slot, piece) in board.alive_pieces() {
        if piece.color == color {
            generate_moves_for_piece(board, slot, &mut list);
        }
    }
    list
}

fn is_enemy(board: &BoardState, square: Square, us: Color) -> bool {
    board.piece_at(square).map_or(false, |p| p.color != us)
}

fn is_empty(board: &BoardState, square: Square) -> bool {
    board.piece_at(square).is_none()
}

fn generate_pawn_moves(board: &BoardState, piece: &Piece, list: &mut MoveList) {
    let direction: i32 = if piece.color == Color::White { 1 } else { -1 };
    let col = piece.square.col as i32;
    let row = piece.square.row as i32;

    if let Some(one_forward) = Square::new(col, row + direction) {
        if is_empty(board, one_forward) {
            list.push(Move::new(piece.square, one_forward, promotion_for(one_forward.row)));

            if !piece.moved {
                if let Some(two_forward) = Square::new(col, row + 2 * direction) {
                    if is_empty(board, two_forward) {
                        list.push(Move::new(piece.square, two_forward, None));
                    }
                }
            }
        }
    }

    for delta_col in [-1, 1] {
        let capture_square = match Square::new(col + delta_col, row + direction) {
            Some(s) => s,
            None => continue,
        };

        if is_enemy(board, capture_square, piece.color) {
            list.push(Move::new(
                piece.square,
                capture_square,
                promotion_for(capture_square.row),
            ));
            continue;
        }

        if let Some(ep) = board.en_passant {
            if ep.target == capture_square && is_empty(board, capture_square) {
                if let Some(captured) = board.piece_at(ep.capture) {
                    if captured.kind == PieceKind::Pawn
                        && captured.color != piece.color
                        && ep.capture.row == piece.square.row
                    {
                        list.push(Move::new(piece.square, capture_square, None));
                    }
                }
            }
        }
    }
}

fn generate_knight_moves(board: &BoardState, piece: &Piece, list: &mut MoveList) {
    let col = piece.square.col as i32;
    let row = piece.square.row as i32;
    for (d_col, d_row) in KNIGHT_OFFSETS {
        if let Some(to) = Square::new(col + d_col, row + d_row) {
            if !is_enemy_or_empty(board, to, piece.color) {
                continue;
            }
            list.push(Move::new(piece.square, to, None));
        }
    }
}

fn is_enemy_or_empty(board: &BoardState, square: Square, us: Color) -> bool {
    is_empty(board, square) || is_enemy(board, square, us)
}

fn generate_sliding_moves(board: &BoardState, piece: &Piece, dirs: &[(i32, i32); 4], list: &mut MoveList) {
    let col = piece.square.col as i32;
    let row = piece.square.row as i32;
    for (d_col, d_row) in dirs {
        let mut cur_col = col + d_col;
        let mut cur_row = row + d_row;
        while let Some(to) = Square::new(cur_col, cur_row) {
            match board.piece_at(to) {
                None => list.push(Move::new(piece.square, to, None)),
                Some(target) => {
                    if target.color != piece.color {
                        list.push(Move::new(piece.square, to, None));
                    }
                    break;
                }
            }
            cur_col += d_col;
            cur_row += d_row;
        }
    }
}

fn generate_king_moves(board: &BoardState, piece: &Piece, list: &mut MoveList) {
    let col = piece.square.col as i32;
    let row = piece.square.row as i32;
    for d_col in -1..=1 {
        for d_row in -1..=1 {
            if d_col == 0 && d_row == 0 {
                continue;
            }
            if let Some(to) = Square::new(col + d_col, row + d_row) {
                if is_enemy_or_empty(board, to, piece.color) {
                    list.push(Move::new(piece.square, to, None));
                }
            }
        }
    }

    if piece.moved {
        return;
    }
    let home_row = if piece.color == Color::White { 0 } else { 7 };
    if piece.square.col != 4 || piece.square.row != home_row {
        return;
    }

    try_castle(board, piece, home_row, 7, &[5, 6], 6, list);
    try_castle(board, piece, home_row, 0, &[1, 2, 3], 2, list);
}

#[allow(clippy::too_many_arguments)]
fn try_castle(
    board: &BoardState,
    piece: &Piece,
    home_row: u8,
    rook_col: u8,
    must_be_empty: &[i32],
    king_dest_col: i32,
    list: &mut MoveList,
) {
    let rook_square = Square {
        col: rook_col,
        row: home_row,
    };
    match board.piece_at(rook_square) {
        Some(r) if r.kind == PieceKind::Rook && r.color == piece.color && !r.moved => {}
        _ => return,
    }

    for &c in must_be_empty {
        let sq = Square::new(c, home_row as i32).unwrap();
        if !is_empty(board, sq) {
            return;
        }
    }

    let dest = Square::new(king_dest_col, home_row as i32).unwrap();
    list.push(Move::new(piece.square, dest, None));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardState;

    #[test]
    fn generates_both_castling_moves() {
        let board =
            BoardState::from_parts(&[5, 3, 3], &[0, 0, 0], &[4, 0, 7], &[0, 0, 0], None, None, 0)
                .unwrap();
        let moves = generate_moves(&board, Color::White);
        let dests: Vec<_> = moves.iter().map(|m| m.to.col).collect();
        assert!(dests.contains(&2));
        assert!(dests.contains(&6));
    }

    #[test]
    fn pawn_generates_single_and_double_push() {
        let board = BoardState::from_parts(&[0], &[0], &[4], &[1], None, None, 0).unwrap();
        let moves = generate_moves(&board, Color::White);
        assert_eq!(moves.len(), 2);
        let dests: Vec<_> = moves.iter().map(|m| (m.to.col, m.to.row)).collect();
        assert!(dests.contains(&(4, 2)));
        assert!(dests.contains(&(4, 3)));
    }

    #[test]
    fn pawn_en_passant_capture_is_generated() {
        use crate::board::EnPassant;
        let board = BoardState::from_parts(
            &[0, 0],
            &[0, 1],
            &[4, 5],
            &[4, 4],
            None,
            Some(EnPassant {
                target: Square::new(5, 5).unwrap(),
                capture: Square::new(5, 4).unwrap(),
            }),
            0,
        )
        .unwrap();
        let moves = generate_moves(&board, Color::White);
        let found = moves
            .iter()
            .any(|m| m.to == Square::new(5, 5).unwrap() && m.from == Square::new(4, 4).unwrap());
        assert!(found);
    }

    #[test]
    fn castling_blocked_when_square_occupied() {
        let board = BoardState::from_parts(
            &[5, 3, 1],
            &[0, 0, 0],
            &[4, 7, 5],
            &[0, 0, 0],
            None,
            None,
            0,
        )
        .unwrap();
        let moves = generate_moves(&board, Color::White);
        assert!(!moves.iter().any(|m| m.to.col == 6 && m.from.col == 4));
    }
}
