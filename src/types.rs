use core::fmt;

use crate::{color::Color, role::Role};

/// Number of bitboard slots in a position: one aggregate per color followed
/// by one slot per colored piece kind.
pub const SLOTS: usize = 14;

/// A piece with [`Color`] and [`Role`].
#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Piece {
    pub color: Color,
    pub role: Role,
}

impl Piece {
    /// Index of the piece's bitboard slot.
    ///
    /// Slots `0` and `1` hold the white and black aggregates, so real pieces
    /// occupy `2..14` and the parity of the slot is the color.
    ///
    /// ```
    /// use bitchess::{Color, Role};
    ///
    /// assert_eq!(Color::White.pawn().index(), 2);
    /// assert_eq!(Color::Black.king().index(), 13);
    /// ```
    #[inline]
    pub const fn index(self) -> usize {
        2 * self.role as usize + self.color as usize
    }

    pub const fn char(self) -> char {
        match self.color {
            Color::White => self.role.upper_char(),
            Color::Black => self.role.char(),
        }
    }

    pub const fn from_char(ch: char) -> Option<Piece> {
        let Some(role) = Role::from_char(ch) else {
            return None;
        };
        Some(role.of(Color::from_white(32 & ch as u8 == 0)))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_slots_are_distinct() {
        let mut seen = [false; SLOTS];
        seen[Color::White.index()] = true;
        seen[Color::Black.index()] = true;
        for color in Color::ALL {
            for role in Role::ALL {
                let index = role.of(color).index();
                assert!(!seen[index]);
                seen[index] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_piece_chars() {
        assert_eq!(Piece::from_char('Q'), Some(Color::White.queen()));
        assert_eq!(Piece::from_char('n'), Some(Color::Black.knight()));
        assert_eq!(Piece::from_char('x'), None);
        assert_eq!(Color::Black.rook().to_string(), "r");
    }
}
