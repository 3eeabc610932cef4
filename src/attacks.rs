//! Attack and ray tables.
//!
//! Stepping attacks (pawn, knight, king) and rays are generated at compile
//! time. Sliding attacks are looked up in the [magic tables](crate::magics)
//! built on first use.
//!
//! # Example
//!
//! ```
//! use bitchess::{attacks, Bitboard, Square};
//!
//! // A rook on d4 with blockers on d6 and f4.
//! let occupied = Bitboard::from(Square::D6) | Square::F4;
//! let attacks = attacks::rook_attacks(Square::D4, occupied);
//! assert!(attacks.contains(Square::D6));
//! assert!(!attacks.contains(Square::D7));
//! assert!(attacks.contains(Square::A4));
//! assert_eq!(attacks.count(), 10);
//! ```

use crate::{
    bitboard::Bitboard,
    color::{ByColor, Color},
    magics,
    role::Role,
    square::Square,
    types::Piece,
};

const NOT_FILE_A: u64 = 0xfefe_fefe_fefe_fefe;
const NOT_FILE_H: u64 = 0x7f7f_7f7f_7f7f_7f7f;
const NOT_FILES_AB: u64 = 0xfcfc_fcfc_fcfc_fcfc;
const NOT_FILES_GH: u64 = 0x3f3f_3f3f_3f3f_3f3f;

/// Directions as `(file, rank)` steps.
const ROOK_DIRS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

const fn knight_spread(bb: u64) -> u64 {
    ((bb << 17) & NOT_FILE_A)
        | ((bb << 15) & NOT_FILE_H)
        | ((bb << 10) & NOT_FILES_AB)
        | ((bb << 6) & NOT_FILES_GH)
        | ((bb >> 17) & NOT_FILE_H)
        | ((bb >> 15) & NOT_FILE_A)
        | ((bb >> 10) & NOT_FILES_GH)
        | ((bb >> 6) & NOT_FILES_AB)
}

const fn king_spread(bb: u64) -> u64 {
    let sideways = ((bb << 1) & NOT_FILE_A) | ((bb >> 1) & NOT_FILE_H);
    let row = bb | sideways;
    sideways | (row << 8) | (row >> 8)
}

/// Walks from `sq` in each direction until leaving the board or hitting an
/// occupied square, which is included.
const fn walk(sq: usize, occupied: u64, dirs: &[(i32, i32)]) -> u64 {
    let mut attacks = 0;
    let mut i = 0;
    while i < dirs.len() {
        let (df, dr) = dirs[i];
        let mut file = (sq & 7) as i32 + df;
        let mut rank = (sq >> 3) as i32 + dr;
        while 0 <= file && file < 8 && 0 <= rank && rank < 8 {
            let bit = 1u64 << (rank * 8 + file);
            attacks |= bit;
            if occupied & bit != 0 {
                break;
            }
            file += df;
            rank += dr;
        }
        i += 1;
    }
    attacks
}

const fn stepping_table(role: Role, color: Color) -> [u64; 64] {
    let mut table = [0; 64];
    let mut sq = 0;
    while sq < 64 {
        let bb = 1u64 << sq;
        table[sq] = match role {
            Role::Knight => knight_spread(bb),
            Role::King => king_spread(bb),
            _ => Bitboard(bb).pawn_attacks(color).0,
        };
        sq += 1;
    }
    table
}

static KNIGHT_ATTACKS: [u64; 64] = stepping_table(Role::Knight, Color::White);
static KING_ATTACKS: [u64; 64] = stepping_table(Role::King, Color::White);
static PAWN_ATTACKS: ByColor<[u64; 64]> = ByColor {
    white: stepping_table(Role::Pawn, Color::White),
    black: stepping_table(Role::Pawn, Color::Black),
};

/// Squares a pawn of `color` on `sq` captures on.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    Bitboard(PAWN_ATTACKS.get(color)[sq.index()])
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard(KNIGHT_ATTACKS[sq.index()])
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    Bitboard(KING_ATTACKS[sq.index()])
}

/// Rook attacks from `sq`. Each ray stops at the first occupied square,
/// which is included.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    magics::init().rook_attacks(sq, occupied)
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    magics::init().bishop_attacks(sq, occupied)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let tables = magics::init();
    tables.rook_attacks(sq, occupied) | tables.bishop_attacks(sq, occupied)
}

/// Attacks of `piece` from `sq`. `occupied` only matters for sliders.
pub fn attacks(sq: Square, piece: Piece, occupied: Bitboard) -> Bitboard {
    match piece.role {
        Role::Pawn => pawn_attacks(piece.color, sq),
        Role::Knight => knight_attacks(sq),
        Role::Bishop => bishop_attacks(sq, occupied),
        Role::Rook => rook_attacks(sq, occupied),
        Role::Queen => queen_attacks(sq, occupied),
        Role::King => king_attacks(sq),
    }
}

/// Rook attacks computed by walking the rays. Used to build and verify the
/// magic tables.
pub fn rook_attacks_slow(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard(walk(sq.index(), occupied.0, &ROOK_DIRS))
}

/// Bishop attacks computed by walking the rays. Used to build and verify
/// the magic tables.
pub fn bishop_attacks_slow(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard(walk(sq.index(), occupied.0, &BISHOP_DIRS))
}

/// For every pair of aligned squares, the full line through both.
const fn line_table() -> [[u64; 64]; 64] {
    let mut table = [[0; 64]; 64];
    let mut a = 0;
    while a < 64 {
        let mut i = 0;
        while i < 4 {
            let (forward, backward) = if i < 2 {
                (ROOK_DIRS[i], ROOK_DIRS[i + 2])
            } else {
                (BISHOP_DIRS[i - 2], BISHOP_DIRS[5 - i])
            };
            let line = walk(a, 0, &[forward]) | walk(a, 0, &[backward]) | (1 << a);
            let mut b = 0;
            while b < 64 {
                if b != a && line & (1 << b) != 0 {
                    table[a][b] = line;
                }
                b += 1;
            }
            i += 1;
        }
        a += 1;
    }
    table
}

static RAYS: [[u64; 64]; 64] = line_table();

/// The whole line through both squares, edge to edge. Empty if they are not
/// aligned.
///
/// # Example
///
/// ```
/// use bitchess::{attacks, Square};
///
/// let diagonal = attacks::ray(Square::C3, Square::F6);
/// assert!(diagonal.contains(Square::A1));
/// assert!(diagonal.contains(Square::H8));
/// assert_eq!(diagonal.count(), 8);
/// ```
#[inline]
pub fn ray(a: Square, b: Square) -> Bitboard {
    Bitboard(RAYS[a.index()][b.index()])
}

/// The squares between the two squares (bounds not included), or an empty
/// [`Bitboard`] if they are not on the same rank, file or diagonal.
///
/// # Example
///
/// ```
/// use bitchess::{attacks, Bitboard, Square};
///
/// let between = attacks::between(Square::F6, Square::C3);
/// assert_eq!(between, Bitboard::from(Square::D4) | Square::E5);
/// ```
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    let bb = RAYS[a.index()][b.index()] & ((!0u64 << a.index()) ^ (!0u64 << b.index()));
    Bitboard(bb & bb.wrapping_sub(1))
}

/// Whether `c` is on the line through `a` and `b`.
#[inline]
pub fn aligned(a: Square, b: Square, c: Square) -> bool {
    ray(a, b).contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rook_attacks() {
        assert_eq!(
            rook_attacks(Square::D6, Bitboard(0x3f7f_2880_2826_f5b9)),
            Bitboard(0x0008_3708_0800_0000)
        );
    }

    #[test]
    fn test_magic_lookup_matches_ray_walk() {
        let occupied = Bitboard(0x0042_1800_2410_8100);
        for sq in Bitboard::FULL {
            assert_eq!(rook_attacks(sq, occupied), rook_attacks_slow(sq, occupied));
            assert_eq!(bishop_attacks(sq, occupied), bishop_attacks_slow(sq, occupied));
        }
    }

    #[test]
    fn test_stepping_attacks() {
        assert_eq!(knight_attacks(Square::A1), Bitboard::from(Square::B3) | Square::C2);
        assert_eq!(king_attacks(Square::E1).count(), 5);
        assert_eq!(
            pawn_attacks(Color::Black, Square::E5),
            Bitboard::from(Square::D4) | Square::F4
        );
        assert_eq!(pawn_attacks(Color::White, Square::H8), Bitboard::EMPTY);
    }

    #[test]
    fn test_between() {
        assert_eq!(between(Square::A1, Square::A1), Bitboard::EMPTY);
        assert_eq!(between(Square::A1, Square::B2), Bitboard::EMPTY);
        assert_eq!(between(Square::A1, Square::C2), Bitboard::EMPTY);
        assert_eq!(between(Square::H8, Square::E5), Bitboard::from(Square::G7) | Square::F6);
        assert_eq!(between(Square::E1, Square::H1), Bitboard::from(Square::F1) | Square::G1);
        assert!(aligned(Square::A1, Square::B2, Square::C3));
        assert!(!aligned(Square::A1, Square::B2, Square::C2));
    }
}
