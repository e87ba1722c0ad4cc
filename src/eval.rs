//! Static positional evaluation.
//!
//! Computes a two-component `Score` for a position from the point of
//! view of a designated color. Material and heuristic are kept
//! strictly separate -- see `Score`'s doc comment -- so that no
//! positional term, however extreme, can ever outweigh a material
//! difference.

use lazy_static::lazy_static;
use std::cmp::Ordering;

use crate::basetypes::{Color, PieceKind};
use crate::board::BoardState;
use crate::movegen::generate_moves_for_piece;
use crate::moves::MoveList;

/// A position's score, from some perspective color.
///
/// Ordering is **strict lexicographic**: `material` is compared
/// first, and `heuristic` only breaks ties. The two components are
/// never collapsed into a single weighted scalar -- doing so would
/// let an extreme heuristic value overturn a material-winning branch,
/// which this core must never do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub material: f64,
    pub heuristic: f64,
}

impl Score {
    pub const fn new(material: f64, heuristic: f64) -> Score {
        Score { material, heuristic }
    }

    pub const ZERO: Score = Score::new(0.0, 0.0);

    /// The most negative sentinel used to seed a minimizing search.
    pub const NEG_SENTINEL: Score = Score::new(-1e300, -1e300);
    /// The most positive sentinel used to seed a maximizing search.
    pub const POS_SENTINEL: Score = Score::new(1e300, 1e300);

    pub fn winner(winner_is_perspective: bool) -> Score {
        Score::new(if winner_is_perspective { 100_000.0 } else { -100_000.0 }, 0.0)
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Score) -> Option<Ordering> {
        Some(
            self.material
                .partial_cmp(&other.material)
                .unwrap_or(Ordering::Equal)
                .then(
                    self.heuristic
                        .partial_cmp(&other.heuristic)
                        .unwrap_or(Ordering::Equal),
                ),
        )
    }
}

/// Which piece-kind/destination-square combinations receive a
/// non-default weight multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SquareClass {
    Center,
    CenterCross,
    CenterDiagonal,
    Corner,
    CornerTouch,
    Other,
}

fn classify_square(col: i32, row: i32) -> SquareClass {
    let is_corner = (col == 0 || col == 7) && (row == 0 || row == 7);
    let is_corner_touch = ((col == 1 || col == 6) && (row == 0 || row == 7))
        || ((row == 1 || row == 6) && (col == 0 || col == 7));
    let is_center = (col == 3 || col == 4) && (row == 3 || row == 4);
    let is_center_cross = (col == 2 && (row == 3 || row == 4))
        || (col == 3 && (row == 2 || row == 5))
        || (col == 4 && (row == 2 || row == 5))
        || (col == 5 && (row == 3 || row == 4));
    let is_center_diagonal = (col == 2 || col == 5) && (row == 2 || row == 5);

    if is_corner {
        SquareClass::Corner
    } else if is_corner_touch {
        SquareClass::CornerTouch
    } else if is_center {
        SquareClass::Center
    } else if is_center_cross {
        SquareClass::CenterCross
    } else if is_center_diagonal {
        SquareClass::CenterDiagonal
    } else {
        SquareClass::Other
    }
}

lazy_static! {
    /// The square class of every board square, built once on first
    /// use. Mirrors the framework crate's lazily-built geometry
    /// singletons (`BoardGeometry::get()`), here for a table cheap
    /// enough that recomputing it per lookup would be silly but
    /// tiresome to spell out as 64 `const` arms.
    static ref SQUARE_CLASSES: [[SquareClass; 8]; 8] = {
        let mut table = [[SquareClass::Other; 8]; 8];
        for row in 0..8 {
            for col in 0..8 {
                table[row as usize][col as usize] = classify_square(col, row);
            }
        }
        table
    };
}

/// Tunable evaluation weights, gathered from the host.
///
/// Every optional weight carries its presence as an `Option`, per the
/// design note that options must not be reproduced as sentinel values
/// plus a flag once inside the safe core -- only the `ffi` boundary
/// translates the host's `has_X` flags into these.
#[derive(Debug, Clone, Copy)]
pub struct EvalParams {
    pub piece_values: [f64; 6],
    /// Index 0 is unused; indices 1..=8 are the rank-advancement bonus
    /// for a pawn on that rank (1 = own back rank, 8 = promotion
    /// rank).
    pub pawn_rank_values: Option<[f64; 9]>,
    pub backward_pawn_value: Option<f64>,
    /// `[center, center_cross, center_diagonal, corner, corner_rook,
    /// corner_touch, corner_touch_rook]`.
    pub position_multipliers: Option<[f64; 7]>,
    pub control_weight: f64,
    pub opposite_bishop_draw_factor: Option<f64>,
}

impl EvalParams {
    /// Parameters for a plain static evaluation call: no control term,
    /// no opposite-bishop damping. Matches the host-facing "static
    /// evaluation" call shape of the external interface, which has no
    /// `control_weight` or opposite-bishop input at all.
    pub fn static_only(
        piece_values: [f64; 6],
        pawn_rank_values: Option<[f64; 9]>,
        backward_pawn_value: Option<f64>,
        position_multipliers: Option<[f64; 7]>,
    ) -> EvalParams {
        EvalParams {
            piece_values,
            pawn_rank_values,
            backward_pawn_value,
            position_multipliers,
            control_weight: 0.0,
            opposite_bishop_draw_factor: None,
        }
    }
}

fn square_weight(kind: PieceKind, col: u8, row: u8, multipliers: Option<&[f64; 7]>) -> f64 {
    let multipliers = match multipliers {
        Some(m) => m,
        None => return 1.0,
    };
    match SQUARE_CLASSES[row as usize][col as usize] {
        SquareClass::Center => multipliers[0],
        SquareClass::CenterCross => multipliers[1],
        SquareClass::CenterDiagonal => multipliers[2],
        SquareClass::Corner => {
            if kind == PieceKind::Rook {
                multipliers[4]
            } else {
                multipliers[3]
            }
        }
        SquareClass::CornerTouch => {
            if kind == PieceKind::Rook {
                multipliers[6]
            } else {
                multipliers[5]
            }
        }
        SquareClass::Other => 1.0,
    }
}

/// A pawn is backward iff its advance square is on the board, no
/// friendly pawn on an adjacent file stands level with or behind it,
/// and some enemy pawn attacks its advance square.
fn is_backward_pawn(board: &BoardState, slot: usize) -> bool {
    let pawn = *board.piece(slot);
    if !pawn.alive || pawn.kind != PieceKind::Pawn {
        return false;
    }
    let direction: i32 = if pawn.color == Color::White { 1 } else { -1 };
    let forward_row = pawn.square.row as i32 + direction;
    if !(0..8).contains(&forward_row) {
        return false;
    }

    for delta in [-1, 1] {
        let adjacent_col = pawn.square.col as i32 + delta;
        if !(0..8).contains(&adjacent_col) {
            continue;
        }
        for (_, other) in board.alive_pieces() {
            if other.kind != PieceKind::Pawn
                || other.color != pawn.color
                || other.square.col as i32 != adjacent_col
            {
                continue;
            }
            let behind = if pawn.color == Color::White {
                other.square.row as i32 >= pawn.square.row as i32
            } else {
                other.square.row as i32 <= pawn.square.row as i32
            };
            if behind {
                return false;
            }
        }
    }

    for (_, enemy) in board.alive_pieces() {
        if enemy.kind != PieceKind::Pawn || enemy.color == pawn.color {
            continue;
        }
        let enemy_direction: i32 = if enemy.color == Color::White { 1 } else { -1 };
        let attack_row = enemy.square.row as i32 + enemy_direction;
        if attack_row != forward_row {
            continue;
        }
        if (enemy.square.col as i32 - pawn.square.col as i32).abs() == 1 {
            return true;
        }
    }

    false
}

fn has_opposite_color_bishops(board: &BoardState) -> bool {
    let mut white = None;
    let mut white_count = 0;
    let mut black = None;
    let mut black_count = 0;

    for (_, piece) in board.alive_pieces() {
        if piece.kind != PieceKind::Bishop {
            continue;
        }
        if piece.color == Color::White {
            white_count += 1;
            white = Some(piece.square);
        } else {
            black_count += 1;
            black = Some(piece.square);
        }
    }

    if white_count != 1 || black_count != 1 {
        return false;
    }
    let white = white.unwrap();
    let black = black.unwrap();
    (white.col as i32 + white.row as i32) % 2 != (black.col as i32 + black.row as i32) % 2
}

fn control_score(board: &BoardState, perspective: Color, params: &EvalParams) -> f64 {
    let mut total = 0.0;
    for (slot, piece) in board.alive_pieces() {
        let mut moves = MoveList::new();
        generate_moves_for_piece(board, slot, &mut moves);

        let controlled: f64 = moves
            .iter()
            .map(|m| square_weight(piece.kind, m.to.col, m.to.row, params.position_multipliers.as_ref()))
            .sum();

        if piece.color == perspective {
            total += controlled;
        } else {
            total -= controlled;
        }
    }
    total
}

/// Computes `(material, heuristic)` for `board` from `perspective`'s
/// point of view.
pub fn evaluate(board: &BoardState, perspective: Color, params: &EvalParams) -> Score {
    let mut material = 0.0;
    let mut heuristic = 0.0;

    for (slot, piece) in board.alive_pieces() {
        let material_score = params.piece_values[piece.kind as usize];
        let mut piece_score = material_score;

        if piece.kind == PieceKind::Pawn {
            if let Some(pawn_rank_values) = params.pawn_rank_values {
                let pawn_rank = if piece.color == Color::White {
                    piece.square.row as usize + 1
                } else {
                    8 - piece.square.row as usize
                };
                let rank_score = pawn_rank_values[pawn_rank];
                if rank_score > piece_score {
                    piece_score = rank_score;
                }
            }
            if let Some(backward_pawn_value) = params.backward_pawn_value {
                if backward_pawn_value < piece_score && is_backward_pawn(board, slot) {
                    piece_score = backward_pawn_value;
                }
            }
        }

        piece_score *= square_weight(
            piece.kind,
            piece.square.col,
            piece.square.row,
            params.position_multipliers.as_ref(),
        );
        let heuristic_score = piece_score - material_score;

        if piece.color == perspective {
            material += material_score;
            heuristic += heuristic_score;
        } else {
            material -= material_score;
            heuristic -= heuristic_score;
        }
    }

    if params.control_weight != 0.0 {
        heuristic += params.control_weight * control_score(board, perspective, params);
    }

    if let Some(factor) = params.opposite_bishop_draw_factor {
        if has_opposite_color_bishops(board) {
            heuristic *= factor;
        }
    }

    Score::new(material, heuristic)
}
