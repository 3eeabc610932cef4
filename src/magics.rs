//! Magic bitboard tables for sliding pieces.
//!
//! For each square, the occupancy of the squares a rook (or bishop) could be
//! blocked on is multiplied by a magic factor and shifted, giving a dense
//! index into a table of precomputed attacks. The factors are found at
//! startup by a seeded random search. Every candidate is checked against the
//! ray-walk attacks of all relevant occupancy subsets before it is accepted,
//! so a successfully constructed [`MagicTables`] is exhaustively verified.
//!
//! [`init()`] builds the process-wide tables once. The lookups in
//! [`crate::attacks`] read them.

use std::{error::Error, fmt, sync::OnceLock};

use tracing::{debug, trace};

use crate::{
    attacks::{bishop_attacks_slow, rook_attacks_slow},
    bitboard::Bitboard,
    role::Role,
    square::{File, Rank, Square},
    util::XorShift64Star,
};

/// Seed used by [`MagicTables::new()`].
pub const DEFAULT_SEED: u64 = 0x4d4c_80da_cef1_4603;

/// Candidate factors tried per square before giving up.
pub const MAX_ATTEMPTS: u32 = 10_000_000;

/// Error when no magic factor could be found for a square.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MagicError {
    pub role: Role,
    pub square: Square,
}

impl fmt::Display for MagicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no magic factor for {:?} on {} within {} attempts",
            self.role, self.square, MAX_ATTEMPTS
        )
    }
}

impl Error for MagicError {}

#[derive(Clone, Debug)]
struct Magic {
    mask: u64,
    factor: u64,
    shift: u32,
    offset: usize,
}

impl Magic {
    #[inline]
    fn index(&self, occupied: Bitboard) -> usize {
        self.offset + ((occupied.0 & self.mask).wrapping_mul(self.factor) >> self.shift) as usize
    }
}

/// Attack lookup tables for rooks and bishops.
#[derive(Clone)]
pub struct MagicTables {
    rook: Vec<Magic>,
    bishop: Vec<Magic>,
    attacks: Vec<Bitboard>,
}

impl MagicTables {
    /// Searches magic factors with [`DEFAULT_SEED`].
    pub fn new() -> Result<MagicTables, MagicError> {
        MagicTables::with_seed(DEFAULT_SEED)
    }

    /// Searches magic factors with a generator seeded by `seed`. The result
    /// is reproducible for a given seed.
    pub fn with_seed(seed: u64) -> Result<MagicTables, MagicError> {
        let mut rng = XorShift64Star::new(seed);
        let mut attacks = Vec::new();

        let mut rook = Vec::with_capacity(64);
        let mut bishop = Vec::with_capacity(64);
        for index in 0..64 {
            let sq = Square::new(index);
            rook.push(find_magic(Role::Rook, sq, &mut rng, &mut attacks)?);
            bishop.push(find_magic(Role::Bishop, sq, &mut rng, &mut attacks)?);
        }

        attacks.shrink_to_fit();
        Ok(MagicTables {
            rook,
            bishop,
            attacks,
        })
    }

    /// Looks up attacks for a rook on `sq` with `occupied` squares.
    #[inline]
    pub fn rook_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.attacks[self.rook[sq.index()].index(occupied)]
    }

    /// Looks up attacks for a bishop on `sq` with `occupied` squares.
    #[inline]
    pub fn bishop_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.attacks[self.bishop[sq.index()].index(occupied)]
    }

    /// Total number of attack entries for both piece types.
    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }

    /// Compares every entry of the tables with ray-walk attacks, for all
    /// squares and all relevant occupancy subsets.
    pub fn verify(&self) -> bool {
        (0..64).map(Square::new).all(|sq| {
            let rook_mask = relevant_mask(Role::Rook, sq);
            let bishop_mask = relevant_mask(Role::Bishop, sq);
            rook_mask
                .carry_rippler()
                .all(|occ| self.rook_attacks(sq, occ) == rook_attacks_slow(sq, occ))
                && bishop_mask
                    .carry_rippler()
                    .all(|occ| self.bishop_attacks(sq, occ) == bishop_attacks_slow(sq, occ))
        })
    }
}

impl fmt::Debug for MagicTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MagicTables")
            .field("entries", &self.attacks.len())
            .finish_non_exhaustive()
    }
}

/// Squares whose occupancy can change the attacks of a slider on `sq`.
/// Edge squares are excluded, since a ray ends there anyway.
fn relevant_mask(role: Role, sq: Square) -> Bitboard {
    let edges = ((Bitboard::from_rank(Rank::First) | Bitboard::from_rank(Rank::Eighth))
        - Bitboard::from_rank(sq.rank()))
        | ((Bitboard::from_file(File::A) | Bitboard::from_file(File::H))
            - Bitboard::from_file(sq.file()));
    slow_attacks(role, sq, Bitboard::EMPTY) - edges
}

fn slow_attacks(role: Role, sq: Square, occupied: Bitboard) -> Bitboard {
    match role {
        Role::Bishop => bishop_attacks_slow(sq, occupied),
        _ => rook_attacks_slow(sq, occupied),
    }
}

fn find_magic(
    role: Role,
    sq: Square,
    rng: &mut XorShift64Star,
    attacks: &mut Vec<Bitboard>,
) -> Result<Magic, MagicError> {
    let mask = relevant_mask(role, sq);
    let bits = mask.count() as u32;
    let size = 1usize << bits;

    let occupancies: Vec<Bitboard> = mask.carry_rippler().collect();
    let reference: Vec<Bitboard> = occupancies
        .iter()
        .map(|&occ| slow_attacks(role, sq, occ))
        .collect();

    let mut slots = vec![Bitboard::EMPTY; size];
    let mut epochs = vec![0u32; size];

    for attempt in 1..=MAX_ATTEMPTS {
        let factor = rng.next_sparse_u64();
        if (mask.0.wrapping_mul(factor) >> 56).count_ones() < 6 {
            continue;
        }

        let magic = Magic {
            mask: mask.0,
            factor,
            shift: 64 - bits,
            offset: 0,
        };

        let collision = occupancies.iter().zip(&reference).any(|(&occ, &attack)| {
            let idx = magic.index(occ);
            if epochs[idx] != attempt {
                epochs[idx] = attempt;
                slots[idx] = attack;
                false
            } else {
                slots[idx] != attack
            }
        });

        if !collision {
            trace!(?role, %sq, attempt, bits, "found magic factor");
            let offset = attacks.len();
            attacks.extend(
                slots
                    .iter()
                    .zip(&epochs)
                    .map(|(&slot, &epoch)| if epoch == attempt { slot } else { Bitboard::EMPTY }),
            );
            return Ok(Magic { offset, ..magic });
        }
    }

    Err(MagicError { role, square: sq })
}

static TABLES: OnceLock<MagicTables> = OnceLock::new();

/// Builds the process-wide tables if that has not happened yet and returns
/// them.
///
/// # Panics
///
/// Panics if the search fails for some square. Move generation is impossible
/// without the tables, so this is fatal.
pub fn init() -> &'static MagicTables {
    TABLES.get_or_init(|| match MagicTables::new() {
        Ok(tables) => {
            debug!(entries = tables.len(), "built magic attack tables");
            tables
        }
        Err(err) => panic!("{err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevant_mask() {
        assert_eq!(relevant_mask(Role::Rook, Square::A1), Bitboard(0x0001_0101_0101_017e));
        assert_eq!(relevant_mask(Role::Rook, Square::E4).count(), 10);
        assert_eq!(relevant_mask(Role::Bishop, Square::E4).count(), 9);
        assert_eq!(relevant_mask(Role::Bishop, Square::A1).count(), 6);
    }

    #[test]
    fn test_global_tables_are_exhaustive() {
        assert!(init().verify());
    }

    #[test]
    fn test_seeded_search_is_reproducible() {
        let a = MagicTables::with_seed(7).expect("magics");
        let b = MagicTables::with_seed(7).expect("magics");
        assert!(a.verify());
        assert_eq!(a.len(), b.len());
        assert!(a
            .rook
            .iter()
            .zip(&b.rook)
            .all(|(x, y)| x.factor == y.factor && x.offset == y.offset));
    }
}
