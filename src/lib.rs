//! A bitboard chess position with incremental make/unmake and legal move
//! generation, meant as the core of an engine.
//!
//! # Examples
//!
//! Generate legal moves in the starting position:
//!
//! ```
//! use bitchess::Position;
//!
//! let pos = Position::startpos();
//! assert_eq!(pos.legal_moves().len(), 20);
//! ```
//!
//! Make and take back moves in place:
//!
//! ```
//! use bitchess::{Move, Position, Square, Color};
//!
//! let mut pos = Position::startpos();
//! let undo = pos.make_move(Move::double_push(Color::White, Square::E2, Square::E4));
//! assert_eq!(pos.ep_square(), Some(Square::E3));
//! pos.unmake_move(undo);
//! assert_eq!(pos, Position::startpos());
//! ```
//!
//! Count move paths:
//!
//! ```
//! use bitchess::{perft::perft, Position};
//!
//! let mut pos = Position::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1")?;
//! assert_eq!(perft(&mut pos, 3), 2812);
//! # Ok::<_, bitchess::ParseFenError>(())
//! ```
//!
//! Also supports [FEN](fen) and [UCI](uci) formats for positions and moves.
//!
//! # Startup
//!
//! Sliding attacks are looked up in magic bitboard tables that are searched
//! for on first use. Call [`magics::init()`] early to pay that cost up front.
//!
//! # Feature flags
//!
//! * `nohash-hasher`: Implements
//!   [`nohash_hasher::IsEnabled`](https://docs.rs/nohash-hasher/0.2/nohash_hasher/trait.IsEnabled.html)
//!   for sensible types.

#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_cfg))]

mod castling;
mod color;
mod m;
mod position;
mod role;
mod square;
mod types;
mod util;

pub mod attacks;
pub mod bitboard;
pub mod fen;
pub mod magics;
pub mod movegen;
pub mod order;
pub mod perft;
pub mod perft_table;
pub mod uci;
pub mod zobrist;

pub use bitboard::Bitboard;
pub use castling::{CastlingRights, CastlingSide};
pub use color::{ByColor, Color};
pub use fen::ParseFenError;
pub use m::{Move, MoveKind, MoveList};
pub use movegen::GenMode;
pub use perft::perft;
pub use perft_table::{PerftTable, PerftTableConfig};
pub use position::{AttackMaps, Position, Undo};
pub use role::Role;
pub use square::{File, ParseSquareError, Rank, Square};
pub use types::Piece;
pub use uci::{UciError, UciMove};
pub use zobrist::Zobrist64;

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for File {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Rank {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Square {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Role {}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Color {}
