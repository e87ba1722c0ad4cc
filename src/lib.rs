//! A pure computational core for chess position evaluation and
//! depth-bounded minimax search.
//!
//! This crate has no knowledge of a board's history, no I/O, and no
//! notion of legality beyond the pseudo-legal move generator in
//! `movegen` -- it is meant to be driven entirely by a host program
//! through the `extern "C"` functions in `ffi`, or directly as a Rust
//! library via the safe modules below.

#[macro_use]
extern crate lazy_static;

pub mod apply;
pub mod basetypes;
pub mod board;
pub mod cache;
pub mod eval;
pub mod ffi;
pub mod hashing;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod search;
