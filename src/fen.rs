//! Parse and write Forsyth-Edwards Notation.
//!
//! # Examples
//!
//! ```
//! use bitchess::{Position, Square};
//!
//! let pos = Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")?;
//! assert_eq!(pos.ep_square(), Some(Square::E3));
//! assert_eq!(pos.fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
//! # Ok::<_, bitchess::ParseFenError>(())
//! ```

use std::{error::Error, fmt, str::FromStr};

use crate::{
    castling::CastlingRights,
    color::Color,
    position::Position,
    role::Role,
    square::{File, Rank, Square},
    types::Piece,
};

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors that can occur when parsing a FEN.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParseFenError {
    InvalidFen,
    InvalidBoard,
    InvalidTurn,
    InvalidCastling,
    InvalidEpSquare,
    InvalidHalfmoveClock,
    InvalidFullmoves,
    /// Each side needs exactly one king.
    InvalidKings,
    /// More pieces than a game can produce.
    TooMuchMaterial,
    /// The side not to move is in check.
    OppositeCheck,
}

impl fmt::Display for ParseFenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseFenError::InvalidFen => "invalid fen",
            ParseFenError::InvalidBoard => "invalid board part in fen",
            ParseFenError::InvalidTurn => "invalid turn part in fen",
            ParseFenError::InvalidCastling => "invalid castling part in fen",
            ParseFenError::InvalidEpSquare => "invalid en passant part in fen",
            ParseFenError::InvalidHalfmoveClock => "invalid halfmove clock in fen",
            ParseFenError::InvalidFullmoves => "invalid fullmove part in fen",
            ParseFenError::InvalidKings => "fen needs exactly one king per side",
            ParseFenError::TooMuchMaterial => "too much material in fen",
            ParseFenError::OppositeCheck => "side not to move is in check",
        })
    }
}

impl Error for ParseFenError {}

fn parse_board(s: &[u8]) -> Result<[Option<Piece>; 64], ParseFenError> {
    let mut board = [None; 64];
    let mut rank = 7;
    let mut file = 0;

    for &ch in s {
        match ch {
            b'/' if file == 8 && rank > 0 => {
                file = 0;
                rank -= 1;
            }
            b'1'..=b'8' => {
                file += u32::from(ch - b'0');
                if file > 8 {
                    return Err(ParseFenError::InvalidBoard);
                }
            }
            _ => {
                let piece = Piece::from_char(char::from(ch)).ok_or(ParseFenError::InvalidBoard)?;
                if file >= 8 {
                    return Err(ParseFenError::InvalidBoard);
                }
                let sq = Square::from_coords(File::new(file), Rank::new(rank));
                if piece.role == Role::Pawn
                    && matches!(sq.rank(), Rank::First | Rank::Eighth)
                {
                    return Err(ParseFenError::InvalidBoard);
                }
                board[sq.index()] = Some(piece);
                file += 1;
            }
        }
    }

    if rank != 0 || file != 8 {
        return Err(ParseFenError::InvalidBoard);
    }

    Ok(board)
}

/// Each side has at most 16 pieces and 8 pawns, and no more promoted
/// pieces than missing pawns.
fn has_valid_material(board: &[Option<Piece>; 64], color: Color) -> bool {
    let count = |role: Role| board.iter().filter(|&&p| p == Some(role.of(color))).count();
    let pawns = count(Role::Pawn);
    let pieces = board.iter().flatten().filter(|p| p.color == color).count();
    let promoted = count(Role::Queen).saturating_sub(1)
        + count(Role::Rook).saturating_sub(2)
        + count(Role::Bishop).saturating_sub(2)
        + count(Role::Knight).saturating_sub(2);
    pieces <= 16 && pawns <= 8 && promoted <= 8 - pawns
}

fn parse_ep_square(
    s: &str,
    turn: Color,
    board: &[Option<Piece>; 64],
) -> Result<Option<Square>, ParseFenError> {
    if s == "-" {
        return Ok(None);
    }
    let sq = Square::from_ascii(s.as_bytes()).map_err(|_| ParseFenError::InvalidEpSquare)?;

    // The target lies behind a pawn of the side that just moved.
    let mover = !turn;
    let pawn_square = Square::from_coords(sq.file(), mover.double_push_rank());
    if sq.rank() != mover.fold(Rank::Third, Rank::Sixth)
        || board[sq.index()].is_some()
        || board[pawn_square.index()] != Some(mover.pawn())
    {
        return Err(ParseFenError::InvalidEpSquare);
    }
    Ok(Some(sq))
}

impl Position {
    /// Parses a FEN. The literal `startpos` is accepted as an alias for the
    /// starting position.
    ///
    /// Turn, castling and en passant fields default to `w`, `-` and `-`.
    /// The clocks default to `0` and `1`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFenError`] if a field is malformed or the position
    /// could not arise in a game: wrong number of kings, too much material,
    /// or the side not to move in check.
    pub fn from_fen(fen: &str) -> Result<Position, ParseFenError> {
        let fen = fen.trim();
        if fen == "startpos" {
            return Ok(Position::startpos());
        }

        let mut parts = fen.split_ascii_whitespace();
        let board_part = parts.next().ok_or(ParseFenError::InvalidFen)?;
        let board = parse_board(board_part.as_bytes())?;

        for color in Color::ALL {
            if board.iter().filter(|&&p| p == Some(color.king())).count() != 1 {
                return Err(ParseFenError::InvalidKings);
            }
            if !has_valid_material(&board, color) {
                return Err(ParseFenError::TooMuchMaterial);
            }
        }

        let turn = match parts.next() {
            Some("w") | None => Color::White,
            Some("b") => Color::Black,
            Some(_) => return Err(ParseFenError::InvalidTurn),
        };

        let castling = match parts.next() {
            Some(part) => {
                CastlingRights::from_ascii(part.as_bytes()).ok_or(ParseFenError::InvalidCastling)?
            }
            None => CastlingRights::empty(),
        };

        let ep_square = match parts.next() {
            Some(part) => parse_ep_square(part, turn, &board)?,
            None => None,
        };

        let halfmoves = match parts.next() {
            Some(part) => btoi::btou(part.as_bytes())
                .map_err(|_| ParseFenError::InvalidHalfmoveClock)?,
            None => 0,
        };

        let fullmoves = match parts.next() {
            Some(part) => match btoi::btou(part.as_bytes()) {
                Ok(0) | Err(_) => return Err(ParseFenError::InvalidFullmoves),
                Ok(n) => n,
            },
            None => 1,
        };

        if parts.next().is_some() {
            return Err(ParseFenError::InvalidFen);
        }

        let pos = Position::from_setup(board, turn, castling, ep_square, halfmoves, fullmoves);
        if pos.by_piece((!turn).king()).intersects(pos.attacks(turn)) {
            return Err(ParseFenError::OppositeCheck);
        }
        Ok(pos)
    }

    /// Writes the position as a FEN with all six fields.
    pub fn fen(&self) -> String {
        self.to_string()
    }

    /// Writes only the piece placement field.
    pub fn board_fen(&self) -> String {
        let mut fen = String::with_capacity(71);
        for rank in Rank::ALL.into_iter().rev() {
            let mut empty = 0u8;
            for file in File::ALL {
                match self.piece_at(Square::from_coords(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece.char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if rank > Rank::First {
                fen.push('/');
            }
        }
        fen
    }
}

impl FromStr for Position {
    type Err = ParseFenError;

    fn from_str(fen: &str) -> Result<Position, ParseFenError> {
        Position::from_fen(fen)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ",
            self.board_fen(),
            self.turn().char(),
            self.castling_rights()
        )?;
        match self.ep_square() {
            Some(sq) => write!(f, "{sq}")?,
            None => f.write_str("-")?,
        }
        write!(f, " {} {}", self.halfmoves(), self.fullmoves())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos() {
        assert_eq!(Position::startpos().fen(), STARTING_FEN);
        assert_eq!(Position::from_fen("startpos"), Ok(Position::startpos()));
        assert_eq!(Position::from_fen(STARTING_FEN), Ok(Position::startpos()));
    }

    #[test]
    fn test_round_trip() {
        for fen in [
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPP2PPP/RNBQKB1R w - - 1 3",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ] {
            let pos = Position::from_fen(fen).expect("valid fen");
            assert_eq!(pos.fen(), fen);
            assert!(pos.is_valid());
        }
    }

    #[test]
    fn test_optional_fields() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b").expect("valid fen");
        assert_eq!(pos.fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3").expect("valid fen");
        assert_eq!(pos.turn(), Color::White);
    }

    #[test]
    fn test_errors() {
        assert_eq!(Position::from_fen(""), Err(ParseFenError::InvalidFen));
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K4 w - - 0 1"),
            Err(ParseFenError::InvalidBoard)
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8 w - - 0 1"),
            Err(ParseFenError::InvalidBoard)
        );
        assert_eq!(
            Position::from_fen("4k2P/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(ParseFenError::InvalidBoard)
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/8 w - - 0 1"),
            Err(ParseFenError::InvalidKings)
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/3KK3 w - - 0 1"),
            Err(ParseFenError::InvalidKings)
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1"),
            Err(ParseFenError::InvalidTurn)
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w KX - 0 1"),
            Err(ParseFenError::InvalidCastling)
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - e9 0 1"),
            Err(ParseFenError::InvalidEpSquare)
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - e3 0 1"),
            Err(ParseFenError::InvalidEpSquare)
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - x 1"),
            Err(ParseFenError::InvalidHalfmoveClock)
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 0"),
            Err(ParseFenError::InvalidFullmoves)
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra"),
            Err(ParseFenError::InvalidFen)
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/QQQQQQQQ/QQQQKQQQ w - - 0 1"),
            Err(ParseFenError::TooMuchMaterial)
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").map(|pos| pos.in_check()),
            Ok(false)
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1"),
            Err(ParseFenError::OppositeCheck)
        );
    }
}
