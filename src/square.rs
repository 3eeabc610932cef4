use std::{error::Error, fmt, str::FromStr};

macro_rules! coord_enum {
    ($(#[$meta:meta])* $name:ident, $first_char:literal, [$($variant:ident),+]) => {
        $(#[$meta])*
        #[allow(missing_docs)]
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: [$name; 8] = [$($name::$variant),+];

            /// Gets the coordinate for the lowest three bits of `index`.
            #[inline]
            pub const fn new(index: u32) -> $name {
                $name::ALL[(index & 7) as usize]
            }

            #[inline]
            pub const fn index(self) -> u32 {
                self as u32
            }

            pub const fn from_char(ch: char) -> Option<$name> {
                let offset = (ch as u32).wrapping_sub($first_char as u32);
                if offset < 8 {
                    Some($name::new(offset))
                } else {
                    None
                }
            }

            pub const fn char(self) -> char {
                (($first_char as u8) + self as u8) as char
            }
        }
    };
}

coord_enum!(
    /// A file of the board, `a` to `h`.
    File, 'a', [A, B, C, D, E, F, G, H]
);

coord_enum!(
    /// A rank of the board, `1` to `8`.
    Rank, '1', [First, Second, Third, Fourth, Fifth, Sixth, Seventh, Eighth]
);

/// A square of the board, numbered `file + 8 * rank` from `A1 = 0` to
/// `H8 = 63`.
///
/// The absent square (no en passant target) is `None` of
/// `Option<Square>`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Square(u8);

impl Square {
    /// Gets the square with the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is not in the range `0..64`.
    #[inline]
    pub const fn new(index: u32) -> Square {
        assert!(index < 64, "square index out of range");
        Square(index as u8)
    }

    #[inline]
    pub const fn from_coords(file: File, rank: Rank) -> Square {
        Square(file as u8 | ((rank as u8) << 3))
    }

    #[inline]
    pub const fn file(self) -> File {
        File::new(self.0 as u32)
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::new((self.0 >> 3) as u32)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Moves the square by `delta` board indices, or `None` if the result
    /// leaves the board index range. Wrapping across files is not detected.
    pub const fn offset(self, delta: i32) -> Option<Square> {
        let index = self.0 as i32 + delta;
        if 0 <= index && index < 64 {
            Some(Square(index as u8))
        } else {
            None
        }
    }

    /// Chebyshev distance.
    pub fn distance(self, other: Square) -> u32 {
        let files = (self.file() as i32 - other.file() as i32).unsigned_abs();
        let ranks = (self.rank() as i32 - other.rank() as i32).unsigned_abs();
        files.max(ranks)
    }

    /// Parses a square name like `e4`.
    pub fn from_ascii(s: &[u8]) -> Result<Square, ParseSquareError> {
        match *s {
            [file, rank] => match (File::from_char(file as char), Rank::from_char(rank as char)) {
                (Some(file), Some(rank)) => Ok(Square::from_coords(file, rank)),
                _ => Err(ParseSquareError),
            },
            _ => Err(ParseSquareError),
        }
    }
}

macro_rules! square_consts {
    ($($name:ident = $index:literal),+ $(,)?) => {
        #[allow(missing_docs)]
        impl Square {
            $(pub const $name: Square = Square($index);)+
        }
    };
}

square_consts! {
    A1 = 0, B1 = 1, C1 = 2, D1 = 3, E1 = 4, F1 = 5, G1 = 6, H1 = 7,
    A2 = 8, B2 = 9, C2 = 10, D2 = 11, E2 = 12, F2 = 13, G2 = 14, H2 = 15,
    A3 = 16, B3 = 17, C3 = 18, D3 = 19, E3 = 20, F3 = 21, G3 = 22, H3 = 23,
    A4 = 24, B4 = 25, C4 = 26, D4 = 27, E4 = 28, F4 = 29, G4 = 30, H4 = 31,
    A5 = 32, B5 = 33, C5 = 34, D5 = 35, E5 = 36, F5 = 37, G5 = 38, H5 = 39,
    A6 = 40, B6 = 41, C6 = 42, D6 = 43, E6 = 44, F6 = 45, G6 = 46, H6 = 47,
    A7 = 48, B7 = 49, C7 = 50, D7 = 51, E7 = 52, F7 = 53, G7 = 54, H7 = 55,
    A8 = 56, B8 = 57, C8 = 58, D8 = 59, E8 = 60, F8 = 61, G8 = 62, H8 = 63,
}

impl From<Square> for u32 {
    #[inline]
    fn from(sq: Square) -> u32 {
        u32::from(sq.0)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file().char(), self.rank().char())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.file().char().to_ascii_uppercase(),
            self.rank().char()
        )
    }
}

/// Error when parsing an invalid square name.
#[derive(Clone, Debug)]
pub struct ParseSquareError;

impl fmt::Display for ParseSquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid square name")
    }
}

impl Error for ParseSquareError {}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Square, ParseSquareError> {
        Square::from_ascii(s.as_bytes())
    }
}
