//! Zobrist hashing for positions.
//!
//! The keys are generated at compile time from a fixed seed, so hashes are
//! stable across runs and builds.
//!
//! # Examples
//!
//! ```
//! use bitchess::{zobrist, Position};
//!
//! let pos = Position::startpos();
//! assert_eq!(pos.zobrist(), zobrist::rebuild(&pos));
//! ```

use core::{
    fmt,
    hash::{Hash, Hasher},
    ops::{BitXor, BitXorAssign},
};

use crate::{
    castling::CastlingRights,
    color::Color,
    position::Position,
    role::Role,
    square::{File, Square},
    types::Piece,
    util::XorShift64Star,
};

/// A 64 bit Zobrist hash.
#[derive(Default, Copy, Clone, Eq, PartialEq)]
pub struct Zobrist64(pub u64);

impl From<u64> for Zobrist64 {
    #[inline]
    fn from(value: u64) -> Zobrist64 {
        Zobrist64(value)
    }
}

impl From<Zobrist64> for u64 {
    #[inline]
    fn from(value: Zobrist64) -> u64 {
        value.0
    }
}

impl BitXor for Zobrist64 {
    type Output = Zobrist64;

    #[inline]
    fn bitxor(self, other: Zobrist64) -> Zobrist64 {
        Zobrist64(self.0 ^ other.0)
    }
}

impl BitXorAssign for Zobrist64 {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Zobrist64) {
        self.0 ^= rhs.0;
    }
}

impl fmt::Debug for Zobrist64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zobrist64({:#x})", self.0)
    }
}

impl fmt::LowerHex for Zobrist64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl Hash for Zobrist64 {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        state.write_u64(self.0);
    }
}

#[cfg(feature = "nohash-hasher")]
impl nohash_hasher::IsEnabled for Zobrist64 {}

/// Seed of the process-wide [`KEYS`].
pub const SEED: u64 = 0x4d4c_80da_cef1_4603;

/// Random keys for every hashed feature of a position.
#[derive(Clone, Debug)]
pub struct ZobristKeys {
    pieces: [[u64; 64]; 12],
    castling: [u64; 16],
    en_passant: [u64; 8],
    black_to_move: u64,
}

impl ZobristKeys {
    /// Draws a full set of keys from a generator seeded with `seed`.
    pub const fn new(seed: u64) -> ZobristKeys {
        let mut rng = XorShift64Star::new(seed);

        let black_to_move = rng.next_u64();

        let mut pieces = [[0; 64]; 12];
        let mut p = 0;
        while p < 12 {
            let mut sq = 0;
            while sq < 64 {
                pieces[p][sq] = rng.next_u64();
                sq += 1;
            }
            p += 1;
        }

        let mut castling = [0; 16];
        let mut i = 0;
        while i < 16 {
            castling[i] = rng.next_u64();
            i += 1;
        }

        let mut en_passant = [0; 8];
        let mut i = 0;
        while i < 8 {
            en_passant[i] = rng.next_u64();
            i += 1;
        }

        ZobristKeys {
            pieces,
            castling,
            en_passant,
            black_to_move,
        }
    }

    #[inline]
    pub fn piece(&self, piece: Piece, sq: Square) -> Zobrist64 {
        Zobrist64(self.pieces[piece.index() - 2][sq.index()])
    }

    /// Key for a complete set of castling rights.
    #[inline]
    pub fn castling(&self, rights: CastlingRights) -> Zobrist64 {
        Zobrist64(self.castling[rights.index()])
    }

    #[inline]
    pub fn en_passant(&self, file: File) -> Zobrist64 {
        Zobrist64(self.en_passant[file as usize])
    }

    #[inline]
    pub fn black_to_move(&self) -> Zobrist64 {
        Zobrist64(self.black_to_move)
    }
}

/// The keys all positions are hashed with.
pub static KEYS: ZobristKeys = ZobristKeys::new(SEED);

/// Computes the hash of `pos` from scratch: every piece on its square, the
/// castling rights, the en passant file and the side to move.
pub fn rebuild(pos: &Position) -> Zobrist64 {
    let mut hash = Zobrist64::default();

    for color in Color::ALL {
        for role in Role::ALL {
            let piece = role.of(color);
            for sq in pos.by_piece(piece) {
                hash ^= KEYS.piece(piece, sq);
            }
        }
    }

    hash ^= KEYS.castling(pos.castling_rights());

    if let Some(ep_square) = pos.ep_square() {
        hash ^= KEYS.en_passant(ep_square.file());
    }

    if pos.turn().is_black() {
        hash ^= KEYS.black_to_move();
    }

    hash
}
