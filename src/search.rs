//! Depth-bounded minimax search: scoring a position some number of
//! plies deep, and choosing the best root move.
//!
//! There is no alpha-beta pruning here -- every reachable leaf within
//! the ply budget is visited, the transposition cache is the only
//! thing saving repeated work. Scores are always expressed from a
//! single fixed `perspective` color that does not change as the
//! recursion alternates the side to move.

use crate::apply::apply_move;
use crate::board::BoardState;
use crate::basetypes::Color;
use crate::cache::TranspositionCache;
use crate::eval::{evaluate, EvalParams, Score};
use crate::hashing::hash_state;
use crate::movegen::generate_moves;
use crate::moves::Move;

/// The result of a top-level best-move search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    Chosen { mv: Move, score: Score },
    /// The side to move has no pseudo-legal moves at all. This core
    /// cannot tell a checkmate from a stalemate -- see `movegen` -- so
    /// the host is left to interpret this however its rules demand.
    NoLegalMoves,
}

/// The outcome `get_game_status` establishes for a node, before any
/// ply budget is consulted: a missing king always decides the game,
/// and the 50-move clock or an empty move list always draws it, no
/// matter how many plies are left to search.
enum GameStatus {
    InProgress,
    Draw,
    Win { white_won: bool },
}

const HALFMOVE_DRAW_LIMIT: u32 = 100;

fn game_status(board: &BoardState, active_color: Color) -> GameStatus {
    let white_alive = board.has_king(Color::White);
    let black_alive = board.has_king(Color::Black);
    if !white_alive && !black_alive {
        return GameStatus::Draw;
    }
    if !white_alive {
        return GameStatus::Win { white_won: false };
    }
    if !black_alive {
        return GameStatus::Win { white_won: true };
    }
    if board.halfmove_clock >= HALFMOVE_DRAW_LIMIT {
        return GameStatus::Draw;
    }
    if generate_moves(board, active_color).is_empty() {
        return GameStatus::Draw;
    }
    GameStatus::InProgress
}

fn reborrow<'a>(cache: &'a mut Option<&mut TranspositionCache>) -> Option<&'a mut TranspositionCache> {
    cache.as_mut().map(|c| &mut **c)
}

/// Scores `board`, with `active_color` to move, `remaining_plies` deep,
/// from `perspective`'s point of view.
pub fn minimax_score(
    board: &BoardState,
    active_color: Color,
    perspective: Color,
    remaining_plies: u32,
    params: &EvalParams,
    mut cache: Option<&mut TranspositionCache>,
) -> Score {
    let hash = hash_state(board, active_color, remaining_plies);
    if let Some(cache) = cache.as_deref() {
        if let Some(score) = cache.lookup(hash, active_color, remaining_plies) {
            return score;
        }
    }

    let score = match game_status(board, active_color) {
        GameStatus::Win { white_won } => Score::winner(white_won == (perspective == Color::White)),
        GameStatus::Draw => Score::ZERO,
        GameStatus::InProgress if remaining_plies == 0 => evaluate(board, perspective, params),
        GameStatus::InProgress => {
            let moves = generate_moves(board, active_color);
            let maximizing = active_color == perspective;
            let mut best = if maximizing { Score::NEG_SENTINEL } else { Score::POS_SENTINEL };

            for mv in moves.iter() {
                let child = match apply_move(*board, *mv) {
                    Ok(child) => child,
                    Err(_) => continue,
                };
                let child_score = minimax_score(
                    &child,
                    active_color.opponent(),
                    perspective,
                    remaining_plies - 1,
                    params,
                    reborrow(&mut cache),
                );
                if maximizing && child_score > best {
                    best = child_score;
                } else if !maximizing && child_score < best {
                    best = child_score;
                }
            }
            best
        }
    };

    if let Some(cache) = cache.as_deref_mut() {
        cache.store(hash, active_color, remaining_plies, score);
    }

    score
}

/// Chooses the best move for `active_color` to play, searching
/// `remaining_plies` deep beyond the root. Ties are broken in favor of
/// whichever move was generated first.
pub fn choose_best_move(
    board: &BoardState,
    active_color: Color,
    remaining_plies: u32,
    params: &EvalParams,
    mut cache: Option<&mut TranspositionCache>,
) -> SearchOutcome {
    let moves = generate_moves(board, active_color);
    if moves.is_empty() {
        return SearchOutcome::NoLegalMoves;
    }

    let mut best: Option<(Move, Score)> = None;
    for mv in moves.iter() {
        let child = match apply_move(*board, *mv) {
            Ok(child) => child,
            Err(_) => continue,
        };
        let score = minimax_score(
            &child,
            active_color.opponent(),
            active_color,
            remaining_plies.saturating_sub(1),
            params,
            reborrow(&mut cache),
        );
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((*mv, score)),
        }
    }

    match best {
        Some((mv, score)) => SearchOutcome::Chosen { mv, score },
        None => SearchOutcome::NoLegalMoves,
    }
}
