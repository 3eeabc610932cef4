//! Sets of squares.
//!
//! A [`Bitboard`] stores one bit per square, bit `i` standing for the square
//! with index `i`. All scanning (`first`, `last`, iteration) and counting is
//! done with the processor's bit-scan and pop-count instructions.

use core::{
    fmt::{self, Write as _},
    iter::FusedIterator,
    ops,
};

use crate::{
    color::Color,
    square::{File, Rank, Square},
};

/// A set of [squares](Square) represented by a 64 bit integer mask.
///
/// # Examples
///
/// ```
/// use bitchess::{Bitboard, Square};
///
/// let mask = Bitboard::from(Square::E4) | Bitboard::from(Square::D5);
/// assert_eq!(mask.count(), 2);
/// assert_eq!(mask.first(), Some(Square::E4));
/// assert!(mask.contains(Square::D5));
/// ```
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(!0);

    pub const LIGHT_SQUARES: Bitboard = Bitboard(0x55aa_55aa_55aa_55aa);
    pub const DARK_SQUARES: Bitboard = Bitboard(0xaa55_aa55_aa55_aa55);

    const NOT_FILE_A: u64 = !0x0101_0101_0101_0101;
    const NOT_FILE_H: u64 = !0x8080_8080_8080_8080;

    #[inline]
    pub const fn from_square(sq: Square) -> Bitboard {
        Bitboard(1 << sq.index())
    }

    #[inline]
    pub const fn from_rank(rank: Rank) -> Bitboard {
        Bitboard(0xff << (8 * rank as u32))
    }

    #[inline]
    pub const fn from_file(file: File) -> Bitboard {
        Bitboard(0x0101_0101_0101_0101 << file as u32)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn any(self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & (1 << sq.index()) != 0
    }

    #[inline]
    pub const fn intersects(self, other: Bitboard) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn is_disjoint(self, other: Bitboard) -> bool {
        self.0 & other.0 == 0
    }

    #[inline]
    pub const fn is_subset(self, other: Bitboard) -> bool {
        self.0 & !other.0 == 0
    }

    #[inline]
    pub fn add(&mut self, sq: Square) {
        self.0 |= 1 << sq.index();
    }

    #[inline]
    pub fn toggle(&mut self, squares: Bitboard) {
        self.0 ^= squares.0;
    }

    #[inline]
    pub fn discard(&mut self, sq: Square) {
        self.0 &= !(1 << sq.index());
    }

    #[inline]
    #[must_use]
    pub const fn with(self, sq: Square) -> Bitboard {
        Bitboard(self.0 | 1 << sq.index())
    }

    #[inline]
    #[must_use]
    pub const fn without(self, sq: Square) -> Bitboard {
        Bitboard(self.0 & !(1 << sq.index()))
    }

    /// Number of squares in the set.
    #[inline]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Lowest square of the set.
    #[inline]
    pub const fn first(self) -> Option<Square> {
        if self.is_empty() {
            None
        } else {
            Some(Square::new(self.0.trailing_zeros()))
        }
    }

    /// Highest square of the set.
    #[inline]
    pub const fn last(self) -> Option<Square> {
        if self.is_empty() {
            None
        } else {
            Some(Square::new(63 - self.0.leading_zeros()))
        }
    }

    /// Removes and returns the lowest square of the set.
    #[inline]
    pub fn pop_front(&mut self) -> Option<Square> {
        let sq = self.first();
        self.0 &= self.0.wrapping_sub(1);
        sq
    }

    #[inline]
    pub const fn more_than_one(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    /// The only square of the set, or `None` if the set is empty or has more
    /// than one square.
    #[inline]
    pub const fn single_square(self) -> Option<Square> {
        if self.more_than_one() {
            None
        } else {
            self.first()
        }
    }

    #[inline]
    #[must_use]
    pub const fn north(self) -> Bitboard {
        Bitboard(self.0 << 8)
    }

    #[inline]
    #[must_use]
    pub const fn south(self) -> Bitboard {
        Bitboard(self.0 >> 8)
    }

    #[inline]
    #[must_use]
    pub const fn north_east(self) -> Bitboard {
        Bitboard((self.0 << 9) & Bitboard::NOT_FILE_A)
    }

    #[inline]
    #[must_use]
    pub const fn north_west(self) -> Bitboard {
        Bitboard((self.0 << 7) & Bitboard::NOT_FILE_H)
    }

    #[inline]
    #[must_use]
    pub const fn south_east(self) -> Bitboard {
        Bitboard((self.0 >> 7) & Bitboard::NOT_FILE_A)
    }

    #[inline]
    #[must_use]
    pub const fn south_west(self) -> Bitboard {
        Bitboard((self.0 >> 9) & Bitboard::NOT_FILE_H)
    }

    /// Shifts one rank towards the opponent of `color`.
    #[inline]
    #[must_use]
    pub const fn forward(self, color: Color) -> Bitboard {
        match color {
            Color::White => self.north(),
            Color::Black => self.south(),
        }
    }

    /// Shifts one rank back towards `color`.
    #[inline]
    #[must_use]
    pub const fn backward(self, color: Color) -> Bitboard {
        self.forward(match color {
            Color::White => Color::Black,
            Color::Black => Color::White,
        })
    }

    /// All squares attacked by pawns of `color` standing on this set.
    #[inline]
    #[must_use]
    pub const fn pawn_attacks(self, color: Color) -> Bitboard {
        match color {
            Color::White => Bitboard(self.north_east().0 | self.north_west().0),
            Color::Black => Bitboard(self.south_east().0 | self.south_west().0),
        }
    }

    /// An iterator over the subsets of this bitboard, starting with the
    /// empty set.
    #[inline]
    pub const fn carry_rippler(self) -> CarryRippler {
        CarryRippler {
            bb: self.0,
            subset: 0,
            first: true,
        }
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            for file in File::ALL {
                let sq = Square::from_coords(file, rank);
                f.write_char(if self.contains(sq) { '1' } else { '.' })?;
                f.write_char(if file < File::H { ' ' } else { '\n' })?;
            }
        }

        Ok(())
    }
}

impl From<Square> for Bitboard {
    #[inline]
    fn from(sq: Square) -> Bitboard {
        Bitboard::from_square(sq)
    }
}

impl From<Rank> for Bitboard {
    #[inline]
    fn from(rank: Rank) -> Bitboard {
        Bitboard::from_rank(rank)
    }
}

impl From<File> for Bitboard {
    #[inline]
    fn from(file: File) -> Bitboard {
        Bitboard::from_file(file)
    }
}

impl From<u64> for Bitboard {
    #[inline]
    fn from(bb: u64) -> Bitboard {
        Bitboard(bb)
    }
}

impl From<Bitboard> for u64 {
    #[inline]
    fn from(bb: Bitboard) -> u64 {
        bb.0
    }
}

macro_rules! bitboard_op_impl {
    ($op:ident, $fn:ident, $op_assign:ident, $fn_assign:ident, $tok:tt) => {
        impl<T> ops::$op<T> for Bitboard
        where
            T: Into<Bitboard>,
        {
            type Output = Bitboard;

            #[inline]
            fn $fn(self, rhs: T) -> Bitboard {
                Bitboard(self.0 $tok rhs.into().0)
            }
        }

        impl<T> ops::$op_assign<T> for Bitboard
        where
            T: Into<Bitboard>,
        {
            #[inline]
            fn $fn_assign(&mut self, rhs: T) {
                self.0 = self.0 $tok rhs.into().0;
            }
        }
    };
}

bitboard_op_impl!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
bitboard_op_impl!(BitOr, bitor, BitOrAssign, bitor_assign, |);
bitboard_op_impl!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

impl<T> ops::Sub<T> for Bitboard
where
    T: Into<Bitboard>,
{
    type Output = Bitboard;

    #[inline]
    fn sub(self, rhs: T) -> Bitboard {
        Bitboard(self.0 & !rhs.into().0)
    }
}

impl ops::Not for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<T>(iter: T) -> Bitboard
    where
        T: IntoIterator<Item = Square>,
    {
        let mut result = Bitboard::EMPTY;
        for sq in iter {
            result.add(sq);
        }
        result
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = IntoIter;

    #[inline]
    fn into_iter(self) -> IntoIter {
        IntoIter(self)
    }
}

/// Iterator over the squares of a [`Bitboard`], lowest first.
#[derive(Debug, Clone)]
pub struct IntoIter(Bitboard);

impl Iterator for IntoIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        self.0.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count();
        (len, Some(len))
    }
}

impl ExactSizeIterator for IntoIter {}

impl FusedIterator for IntoIter {}

/// Iterator over the subsets of a [`Bitboard`].
///
/// See [`Bitboard::carry_rippler()`].
#[derive(Debug, Clone)]
pub struct CarryRippler {
    bb: u64,
    subset: u64,
    first: bool,
}

impl Iterator for CarryRippler {
    type Item = Bitboard;

    #[inline]
    fn next(&mut self) -> Option<Bitboard> {
        let subset = self.subset;
        if subset != 0 || self.first {
            self.first = false;
            self.subset = self.subset.wrapping_sub(self.bb) & self.bb;
            Some(Bitboard(subset))
        } else {
            None
        }
    }
}

impl FusedIterator for CarryRippler {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first() {
        assert_eq!(Bitboard::from(Square::A1).first(), Some(Square::A1));
        assert_eq!(Bitboard::from(Square::D2).first(), Some(Square::D2));
        assert_eq!(Bitboard::EMPTY.first(), None);
    }

    #[test]
    fn test_last() {
        assert_eq!(Bitboard::from(Square::A1).last(), Some(Square::A1));
        assert_eq!(
            Bitboard::EMPTY.with(Square::A1).with(Square::H1).last(),
            Some(Square::H1)
        );
        assert_eq!(Bitboard::EMPTY.last(), None);
    }

    #[test]
    fn test_rank() {
        assert_eq!(Bitboard::from_rank(Rank::Fourth), Bitboard(0xff00_0000));
    }

    #[test]
    fn test_more_than_one() {
        assert!(!Bitboard::EMPTY.more_than_one());
        assert!(!Bitboard::from(Square::E4).more_than_one());
        assert!(Bitboard(0b11).more_than_one());
        assert_eq!(Bitboard(0b11).single_square(), None);
        assert_eq!(Bitboard::from(Square::H8).single_square(), Some(Square::H8));
    }

    #[test]
    fn test_shifts_do_not_wrap() {
        let h_file = Bitboard::from_file(File::H);
        assert_eq!(h_file.north_east(), Bitboard::EMPTY);
        assert_eq!(Bitboard::from_file(File::A).south_west(), Bitboard::EMPTY);
        assert_eq!(
            Bitboard::from(Square::E4).pawn_attacks(Color::White),
            Bitboard::from(Square::D5) | Square::F5
        );
        assert_eq!(
            Bitboard::from(Square::A5).pawn_attacks(Color::Black),
            Bitboard::from(Square::B4)
        );
    }

    #[test]
    fn test_carry_rippler() {
        let mask = Bitboard::from(Square::A1) | Square::C3 | Square::H8;
        let subsets: Vec<Bitboard> = mask.carry_rippler().collect();
        assert_eq!(subsets.len(), 8);
        assert_eq!(subsets[0], Bitboard::EMPTY);
        assert!(subsets.iter().all(|s| s.is_subset(mask)));
    }

    #[test]
    fn test_iter() {
        let squares: Vec<Square> = Bitboard(0x8000_0000_0000_0011).into_iter().collect();
        assert_eq!(squares, [Square::A1, Square::E1, Square::H8]);
    }
}
