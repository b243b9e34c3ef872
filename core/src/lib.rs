//! Bitboard chess position representation, magic-bitboard move generation, and
//! a tapered, feature-weighted static evaluator with a pawn-structure cache.
//!
//! This crate is split into two halves that mirror each other: a board
//! representation & associated move generation (this crate), and a searcher
//! built on top of these foundations, `chessel-engine`.
//!
//! # Safety
//!
//! While generally a safe library, this crate was built with a focus of speed in mind. Usage of
//! methods must be followed carefully, as there are many possible ways to `panic` unexpectedly.
//! Methods with the ability to panic will be documented as such.
//!
//! # Examples
//!
//! You can create a [`Board`] with the starting position like so:
//!
//! ```ignore
//! use chessel_core::Board;
//! let board = Board::start_pos();
//! ```
//!
//! Generating a list of moves (contained inside a [`MoveList`]) can be done with:
//!
//! ```ignore
//! let list = board.generate_moves();
//! ```
//!
//! Applying and undoing moves is simple:
//!
//! ```ignore
//! let mut board = Board::start_pos();
//! let list = board.generate_moves();
//!
//! for mov in list.iter() {
//!     board.apply_move(*mov);
//!     println!("{}",board.get_fen());
//!     board.undo_move();
//! }
//! ```
//!
//! Using fen strings is also supported:
//!
//! ```ignore
//! let start_position = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
//! let board = Board::from_fen(start_position).unwrap();
//! ```
//!
//! [`MoveList`]: core/move_list/struct.MoveList.html
//! [`Board`]: board/struct.Board.html

#![cfg_attr(test, allow(dead_code))]
#![allow(dead_code)]

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate failure_derive;
extern crate failure;
extern crate log;
extern crate rand;

pub mod core;
pub mod board;
pub mod helper;
pub mod tools;

pub use board::Board;
pub use core::piece_move::{BitMove,ScoringMove};
pub use core::move_list::{MoveList,ScoringMoveList};
pub use core::sq::SQ;
pub use core::bitboard::BitBoard;
pub use helper::Helper;
pub use core::{Player, Piece, PieceType, Rank, File};
