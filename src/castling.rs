use std::fmt;

use bitflags::bitflags;

use crate::{
    bitboard::Bitboard,
    color::Color,
    square::{File, Square},
};

/// `KingSide` (O-O) or `QueenSide` (O-O-O).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

impl CastlingSide {
    #[inline]
    pub const fn is_queen_side(self) -> bool {
        matches!(self, CastlingSide::QueenSide)
    }

    #[inline]
    pub const fn is_king_side(self) -> bool {
        matches!(self, CastlingSide::KingSide)
    }

    pub const fn king_to_file(self) -> File {
        match self {
            CastlingSide::KingSide => File::G,
            CastlingSide::QueenSide => File::C,
        }
    }

    pub const fn rook_from_file(self) -> File {
        match self {
            CastlingSide::KingSide => File::H,
            CastlingSide::QueenSide => File::A,
        }
    }

    pub const fn rook_to_file(self) -> File {
        match self {
            CastlingSide::KingSide => File::F,
            CastlingSide::QueenSide => File::D,
        }
    }

    pub const fn king_from(color: Color) -> Square {
        Square::from_coords(File::E, color.backrank())
    }

    pub const fn king_to(self, color: Color) -> Square {
        Square::from_coords(self.king_to_file(), color.backrank())
    }

    pub const fn rook_from(self, color: Color) -> Square {
        Square::from_coords(self.rook_from_file(), color.backrank())
    }

    pub const fn rook_to(self, color: Color) -> Square {
        Square::from_coords(self.rook_to_file(), color.backrank())
    }

    /// Squares between king and rook that must be empty.
    pub const fn path(self, color: Color) -> Bitboard {
        let mask = match self {
            CastlingSide::KingSide => 0x60,
            CastlingSide::QueenSide => 0x0e,
        };
        Bitboard(mask << (8 * color.backrank() as u32))
    }

    /// Squares the king stands on, crosses or lands on, none of which may be
    /// attacked.
    pub const fn king_path(self, color: Color) -> Bitboard {
        let mask = match self {
            CastlingSide::KingSide => 0x70,
            CastlingSide::QueenSide => 0x1c,
        };
        Bitboard(mask << (8 * color.backrank() as u32))
    }

    /// `KingSide` and `QueenSide`, in this order.
    pub const ALL: [CastlingSide; 2] = [CastlingSide::KingSide, CastlingSide::QueenSide];
}

bitflags! {
    /// The four independent castling rights.
    ///
    /// The bits of the set form a number in `0..16`, which indexes the
    /// Zobrist keys for castling rights.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct CastlingRights: u8 {
        const WHITE_KING_SIDE = 1;
        const WHITE_QUEEN_SIDE = 2;
        const BLACK_KING_SIDE = 4;
        const BLACK_QUEEN_SIDE = 8;
    }
}

impl CastlingRights {
    pub const fn of(color: Color, side: CastlingSide) -> CastlingRights {
        match (color, side) {
            (Color::White, CastlingSide::KingSide) => CastlingRights::WHITE_KING_SIDE,
            (Color::White, CastlingSide::QueenSide) => CastlingRights::WHITE_QUEEN_SIDE,
            (Color::Black, CastlingSide::KingSide) => CastlingRights::BLACK_KING_SIDE,
            (Color::Black, CastlingSide::QueenSide) => CastlingRights::BLACK_QUEEN_SIDE,
        }
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastlingSide) -> bool {
        self.contains(CastlingRights::of(color, side))
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.bits() as usize
    }

    /// Rights that are lost when a move vacates or lands on any of
    /// `squares`, comparing against the king and rook start squares.
    pub fn touched(squares: Bitboard) -> CastlingRights {
        let mut lost = CastlingRights::empty();
        for color in Color::ALL {
            let king = Bitboard::from(CastlingSide::king_from(color));
            for side in CastlingSide::ALL {
                if squares.intersects(king | side.rook_from(color)) {
                    lost |= CastlingRights::of(color, side);
                }
            }
        }
        lost
    }

    /// Removes the rights lost by a move touching `squares`.
    #[inline]
    pub fn discard_touched(&mut self, squares: Bitboard) {
        if squares.intersects(Bitboard(0x9100_0000_0000_0091)) {
            self.remove(CastlingRights::touched(squares));
        }
    }

    /// Parses the castling field of FEN (`KQkq`, any subset in that order,
    /// or `-`).
    pub fn from_ascii(s: &[u8]) -> Option<CastlingRights> {
        if s == b"-" {
            return Some(CastlingRights::empty());
        }
        if s.is_empty() {
            return None;
        }
        let mut rights = CastlingRights::empty();
        let mut last = 0;
        for &ch in s {
            let right = match ch {
                b'K' => CastlingRights::WHITE_KING_SIDE,
                b'Q' => CastlingRights::WHITE_QUEEN_SIDE,
                b'k' => CastlingRights::BLACK_KING_SIDE,
                b'q' => CastlingRights::BLACK_QUEEN_SIDE,
                _ => return None,
            };
            if right.bits() <= last {
                return None;
            }
            last = right.bits();
            rights |= right;
        }
        Some(rights)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (right, ch) in [
            (CastlingRights::WHITE_KING_SIDE, 'K'),
            (CastlingRights::WHITE_QUEEN_SIDE, 'Q'),
            (CastlingRights::BLACK_KING_SIDE, 'k'),
            (CastlingRights::BLACK_QUEEN_SIDE, 'q'),
        ] {
            if self.contains(right) {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}
