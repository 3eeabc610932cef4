//! Parse and write moves in UCI coordinate notation.
//!
//! # Examples
//!
//! ```
//! use bitchess::{uci::UciMove, Position, Square};
//!
//! let mut pos = Position::startpos();
//! let uci: UciMove = "g1f3".parse()?;
//! let m = uci.to_move(&pos)?;
//! assert_eq!(m.to(), Square::F3);
//!
//! pos.play_uci_moves(["e2e4", "e7e5"])?;
//! assert_eq!(pos.fullmoves(), 2);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

use std::{error::Error, fmt, str::FromStr};

use tracing::trace;

use crate::{
    m::Move,
    position::{Position, Undo},
    role::Role,
    square::Square,
};

/// Error when parsing an invalid UCI move.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseUciMoveError;

impl fmt::Display for ParseUciMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid uci move")
    }
}

impl Error for ParseUciMoveError {}

/// Error when a UCI move does not name a legal move.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IllegalUciMoveError;

impl fmt::Display for IllegalUciMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("illegal uci move")
    }
}

impl Error for IllegalUciMoveError {}

/// Error when playing a move given in UCI notation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UciError {
    Parse(ParseUciMoveError),
    Illegal(IllegalUciMoveError),
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::Parse(err) => err.fmt(f),
            UciError::Illegal(err) => err.fmt(f),
        }
    }
}

impl Error for UciError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            UciError::Parse(err) => Some(err),
            UciError::Illegal(err) => Some(err),
        }
    }
}

impl From<ParseUciMoveError> for UciError {
    fn from(err: ParseUciMoveError) -> UciError {
        UciError::Parse(err)
    }
}

impl From<IllegalUciMoveError> for UciError {
    fn from(err: IllegalUciMoveError) -> UciError {
        UciError::Illegal(err)
    }
}

/// A move as written by UCI engines: origin, destination and an optional
/// lowercase promotion letter. Castling is written as the king's move.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl UciMove {
    /// Parses a move like `e2e4` or `e7e8q`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseUciMoveError`] if `s` is not syntactically valid.
    pub fn from_ascii(s: &[u8]) -> Result<UciMove, ParseUciMoveError> {
        if s.len() != 4 && s.len() != 5 {
            return Err(ParseUciMoveError);
        }

        let from = Square::from_ascii(&s[0..2]).map_err(|_| ParseUciMoveError)?;
        let to = Square::from_ascii(&s[2..4]).map_err(|_| ParseUciMoveError)?;
        let promotion = match s.get(4) {
            None => None,
            Some(b'n') => Some(Role::Knight),
            Some(b'b') => Some(Role::Bishop),
            Some(b'r') => Some(Role::Rook),
            Some(b'q') => Some(Role::Queen),
            Some(_) => return Err(ParseUciMoveError),
        };

        if from == to {
            return Err(ParseUciMoveError);
        }

        Ok(UciMove {
            from,
            to,
            promotion,
        })
    }

    pub fn from_move(m: Move) -> UciMove {
        UciMove {
            from: m.from(),
            to: m.to(),
            promotion: m.promotion().map(|piece| piece.role),
        }
    }

    /// Finds the legal move in `pos` with the same origin, destination and
    /// promotion.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalUciMoveError`] if there is no such move.
    pub fn to_move(&self, pos: &Position) -> Result<Move, IllegalUciMoveError> {
        pos.legal_moves()
            .into_iter()
            .find(|&m| UciMove::from_move(m) == *self)
            .ok_or(IllegalUciMoveError)
    }
}

impl FromStr for UciMove {
    type Err = ParseUciMoveError;

    fn from_str(s: &str) -> Result<UciMove, ParseUciMoveError> {
        UciMove::from_ascii(s.as_bytes())
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", role.char())?;
        }
        Ok(())
    }
}

impl From<Move> for UciMove {
    fn from(m: Move) -> UciMove {
        UciMove::from_move(m)
    }
}

impl Position {
    /// Parses and plays one move in UCI notation.
    ///
    /// # Errors
    ///
    /// Returns [`UciError`] if the move is malformed or illegal. The
    /// position is unchanged in that case.
    pub fn play_uci(&mut self, uci: &str) -> Result<Undo, UciError> {
        let m = uci.parse::<UciMove>()?.to_move(self)?;
        trace!(%m, "play");
        Ok(self.make_move(m))
    }

    /// Plays a sequence of UCI moves, as found in a `position ... moves`
    /// command.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed or illegal move. Moves before it stay
    /// played.
    pub fn play_uci_moves<'a, I>(&mut self, moves: I) -> Result<(), UciError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for uci in moves {
            let _ = self.play_uci(uci)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            "e7e8q".parse::<UciMove>(),
            Ok(UciMove {
                from: Square::E7,
                to: Square::E8,
                promotion: Some(Role::Queen),
            })
        );
        assert_eq!("e2e4".parse::<UciMove>().map(|m| m.to_string()), Ok("e2e4".to_owned()));
        for invalid in ["", "e2", "e2e4qq", "e2e9", "e7e8k", "e7e8Q", "e2e2", "0000"] {
            assert_eq!(invalid.parse::<UciMove>(), Err(ParseUciMoveError), "{invalid}");
        }
    }

    #[test]
    fn test_to_move() {
        let pos = Position::startpos();
        let m = "e2e4"
            .parse::<UciMove>()
            .expect("valid uci")
            .to_move(&pos)
            .expect("legal move");
        assert!(m.is_double_push());
        assert_eq!(
            "e2e5".parse::<UciMove>().map(|uci| uci.to_move(&pos)),
            Ok(Err(IllegalUciMoveError))
        );
    }

    #[test]
    fn test_play_uci() {
        let mut pos = Position::startpos();
        assert_eq!(
            pos.play_uci("e2e5").map(|_| ()),
            Err(UciError::Illegal(IllegalUciMoveError))
        );
        assert_eq!(pos, Position::startpos());
        assert_eq!(
            pos.play_uci_moves(["e2e4", "xyz"]),
            Err(UciError::Parse(ParseUciMoveError))
        );
        assert_eq!(
            pos.fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }
}
