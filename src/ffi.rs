//! The `extern "C"` boundary a host program links against.
//!
//! Every function here does the same three things: marshal raw,
//! possibly-null host arrays into the safe core's owned types, call
//! into the safe core, and marshal the result back out through output
//! pointers. No chess logic lives in this module.

use libc::{c_double, c_int, c_void};

use crate::basetypes::{Color, Square};
use crate::board::{BoardState, EnPassant};
use crate::cache::TranspositionCache;
use crate::eval::{evaluate, EvalParams};
use crate::search::{choose_best_move, SearchOutcome};

unsafe fn slice_from_raw<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if len == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(ptr, len)
    }
}

unsafe fn optional_piece_values(
    values: *const c_double,
    has_values: c_int,
    count: usize,
) -> Option<Vec<f64>> {
    if has_values == 0 || values.is_null() {
        None
    } else {
        Some(slice_from_raw(values, count).to_vec())
    }
}

fn to_fixed<const N: usize>(values: Option<Vec<f64>>) -> Option<[f64; N]> {
    values.and_then(|v| <[f64; N]>::try_from(v).ok())
}

unsafe fn build_board(
    piece_types: *const c_int,
    piece_colors: *const c_int,
    piece_cols: *const c_int,
    piece_rows: *const c_int,
    piece_moved: *const c_int,
    piece_count: c_int,
    en_passant_target_col: c_int,
    en_passant_target_row: c_int,
    en_passant_capture_col: c_int,
    en_passant_capture_row: c_int,
    halfmove_clock: c_int,
) -> Option<BoardState> {
    if piece_count < 0 {
        return None;
    }
    let count = piece_count as usize;
    let kinds = slice_from_raw(piece_types, count);
    let colors = slice_from_raw(piece_colors, count);
    let cols = slice_from_raw(piece_cols, count);
    let rows = slice_from_raw(piece_rows, count);
    let moved_flags: Vec<bool>;
    let moved = if piece_moved.is_null() {
        None
    } else {
        moved_flags = slice_from_raw(piece_moved, count).iter().map(|&v| v != 0).collect();
        Some(moved_flags.as_slice())
    };

    let en_passant = if en_passant_target_col >= 0
        && en_passant_target_row >= 0
        && en_passant_capture_col >= 0
        && en_passant_capture_row >= 0
    {
        match (
            Square::new(en_passant_target_col, en_passant_target_row),
            Square::new(en_passant_capture_col, en_passant_capture_row),
        ) {
            (Some(target), Some(capture)) => Some(EnPassant { target, capture }),
            _ => return None,
        }
    } else {
        None
    };

    BoardState::from_parts(kinds, colors, cols, rows, moved, en_passant, halfmove_clock.max(0) as u32)
        .ok()
}

/// Computes a static evaluation of a position and writes it into
/// `out_material`/`out_heuristic`. Returns `1` on success, `0` if any
/// required pointer is null or the position is invalid.
#[no_mangle]
pub unsafe extern "C" fn evaluate_piece_components_c(
    piece_types: *const c_int,
    piece_colors: *const c_int,
    piece_cols: *const c_int,
    piece_rows: *const c_int,
    piece_count: c_int,
    perspective_color: c_int,
    piece_values: *const c_double,
    pawn_rank_values: *const c_double,
    has_pawn_rank_values: c_int,
    backward_pawn_value: c_double,
    has_backward_pawn_value: c_int,
    position_multipliers: *const c_double,
    has_position_multipliers: c_int,
    out_material: *mut c_double,
    out_heuristic: *mut c_double,
) -> c_int {
    if piece_types.is_null()
        || piece_colors.is_null()
        || piece_cols.is_null()
        || piece_rows.is_null()
        || piece_values.is_null()
        || out_material.is_null()
        || out_heuristic.is_null()
    {
        return 0;
    }

    let perspective = match Color::try_from(perspective_color) {
        Ok(c) => c,
        Err(_) => return 0,
    };

    let board = match build_board(
        piece_types, piece_colors, piece_cols, piece_rows,
        std::ptr::null(), piece_count, -1, -1, -1, -1, 0,
    ) {
        Some(b) => b,
        None => return 0,
    };

    let piece_values = match to_fixed::<6>(optional_piece_values(piece_values, 1, 6)) {
        Some(v) => v,
        None => return 0,
    };
    let pawn_rank_values = to_fixed::<9>(optional_piece_values(pawn_rank_values, has_pawn_rank_values, 9));
    let backward_pawn_value = if has_backward_pawn_value != 0 {
        Some(backward_pawn_value)
    } else {
        None
    };
    let position_multipliers =
        to_fixed::<7>(optional_piece_values(position_multipliers, has_position_multipliers, 7));

    let params = EvalParams::static_only(piece_values, pawn_rank_values, backward_pawn_value, position_multipliers);
    let score = evaluate(&board, perspective, &params);

    *out_material = score.material;
    *out_heuristic = score.heuristic;
    1
}

/// Searches `plies` deep and writes the chosen move's endpoints into
/// the four `out_*` pointers. Returns `1` on a chosen move, `2` if the
/// side to move has no pseudo-legal moves, `0` on invalid input.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn choose_best_move_c(
    piece_types: *const c_int,
    piece_colors: *const c_int,
    piece_cols: *const c_int,
    piece_rows: *const c_int,
    piece_moved: *const c_int,
    piece_count: c_int,
    active_color: c_int,
    plies: c_int,
    piece_values: *const c_double,
    pawn_rank_values: *const c_double,
    has_pawn_rank_values: c_int,
    backward_pawn_value: c_double,
    has_backward_pawn_value: c_int,
    position_multipliers: *const c_double,
    has_position_multipliers: c_int,
    control_weight: c_double,
    opposite_bishop_draw_factor: c_double,
    has_opposite_bishop_draw_factor: c_int,
    en_passant_target_col: c_int,
    en_passant_target_row: c_int,
    en_passant_capture_col: c_int,
    en_passant_capture_row: c_int,
    halfmove_clock: c_int,
    out_from_col: *mut c_int,
    out_from_row: *mut c_int,
    out_to_col: *mut c_int,
    out_to_row: *mut c_int,
    cache_ptr: *mut c_void,
) -> c_int {
    if piece_types.is_null()
        || piece_colors.is_null()
        || piece_cols.is_null()
        || piece_rows.is_null()
        || piece_moved.is_null()
        || piece_values.is_null()
        || out_from_col.is_null()
        || out_from_row.is_null()
        || out_to_col.is_null()
        || out_to_row.is_null()
    {
        return 0;
    }

    let active_color = match Color::try_from(active_color) {
        Ok(c) => c,
        Err(_) => return 0,
    };

    let board = match build_board(
        piece_types, piece_colors, piece_cols, piece_rows, piece_moved, piece_count,
        en_passant_target_col, en_passant_target_row, en_passant_capture_col, en_passant_capture_row,
        halfmove_clock,
    ) {
        Some(b) => b,
        None => return 0,
    };

    let piece_values = match to_fixed::<6>(optional_piece_values(piece_values, 1, 6)) {
        Some(v) => v,
        None => return 0,
    };
    let pawn_rank_values = to_fixed::<9>(optional_piece_values(pawn_rank_values, has_pawn_rank_values, 9));
    let backward_pawn_value = if has_backward_pawn_value != 0 {
        Some(backward_pawn_value)
    } else {
        None
    };
    let position_multipliers =
        to_fixed::<7>(optional_piece_values(position_multipliers, has_position_multipliers, 7));
    let opposite_bishop_draw_factor = if has_opposite_bishop_draw_factor != 0 {
        Some(opposite_bishop_draw_factor)
    } else {
        None
    };

    let params = EvalParams {
        piece_values,
        pawn_rank_values,
        backward_pawn_value,
        position_multipliers,
        control_weight,
        opposite_bishop_draw_factor,
    };

    let remaining_plies = plies.max(0) as u32;
    let cache = (cache_ptr as *mut TranspositionCache).as_mut();

    match choose_best_move(&board, active_color, remaining_plies, &params, cache) {
        SearchOutcome::Chosen { mv, .. } => {
            *out_from_col = mv.from.col as c_int;
            *out_from_row = mv.from.row as c_int;
            *out_to_col = mv.to.col as c_int;
            *out_to_row = mv.to.row as c_int;
            1
        }
        SearchOutcome::NoLegalMoves => 2,
    }
}

/// Allocates a transposition cache sized to fit within `max_bytes`,
/// returning an opaque handle the host must eventually pass to
/// `destroy_search_cache_c`, or null if no allocation fit the budget.
#[no_mangle]
pub extern "C" fn create_search_cache_c(max_bytes: libc::size_t) -> *mut c_void {
    match TranspositionCache::new(max_bytes) {
        Some(cache) => Box::into_raw(Box::new(cache)) as *mut c_void,
        None => std::ptr::null_mut(),
    }
}

/// Frees a cache handle created by `create_search_cache_c`. A null
/// pointer is accepted and ignored.
#[no_mangle]
pub unsafe extern "C" fn destroy_search_cache_c(cache_ptr: *mut c_void) {
    if !cache_ptr.is_null() {
        drop(Box::from_raw(cache_ptr as *mut TranspositionCache));
    }
}
