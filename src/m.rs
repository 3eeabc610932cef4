use core::fmt::{self, Display, Write as _};

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::{
    castling::CastlingSide,
    color::Color,
    role::Role,
    square::Square,
    types::Piece,
};

bitflags! {
    /// What a move does besides relocating a piece.
    ///
    /// A quiet move has no flags. The valid combinations are a single flag,
    /// or `PROMOTION | CAPTURE`. En passant is not tagged `CAPTURE`, but
    /// [`Move::is_capture()`] covers it. Castles never capture.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct MoveKind: u8 {
        const CAPTURE = 1;
        const DOUBLE_PUSH = 1 << 1;
        const EN_PASSANT = 1 << 2;
        const KING_CASTLE = 1 << 3;
        const QUEEN_CASTLE = 1 << 4;
        const PROMOTION = 1 << 5;

        const CASTLE = Self::KING_CASTLE.bits() | Self::QUEEN_CASTLE.bits();
    }
}

/// Information about a move.
///
/// Moves are created by the move generator and carry everything needed to
/// apply and revert them without looking at the board: the moving piece, the
/// captured piece and the promoted-to piece.
///
/// The check flag is advisory. It is set when the moved piece itself attacks
/// the enemy king from its destination. Discovered checks are not flagged.
///
/// # Display
///
/// `Move` implements [`Display`] using UCI coordinate notation, e.g.,
/// `e2e4` or `e7e8q`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    capture: Option<Piece>,
    promotion: Option<Piece>,
    kind: MoveKind,
    gives_check: bool,
}

impl Move {
    pub const fn quiet(piece: Piece, from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            piece,
            capture: None,
            promotion: None,
            kind: MoveKind::empty(),
            gives_check: false,
        }
    }

    pub const fn capturing(piece: Piece, from: Square, to: Square, captured: Piece) -> Move {
        Move {
            capture: Some(captured),
            kind: MoveKind::CAPTURE,
            ..Move::quiet(piece, from, to)
        }
    }

    /// A pawn advancing two ranks from its start square.
    pub const fn double_push(color: Color, from: Square, to: Square) -> Move {
        Move {
            kind: MoveKind::DOUBLE_PUSH,
            ..Move::quiet(color.pawn(), from, to)
        }
    }

    /// A pawn capturing en passant. `to` is the en passant target square,
    /// not the square of the captured pawn.
    pub const fn en_passant(color: Color, from: Square, to: Square) -> Move {
        let them = match color {
            Color::White => Color::Black,
            Color::Black => Color::White,
        };
        Move {
            capture: Some(them.pawn()),
            kind: MoveKind::EN_PASSANT,
            ..Move::quiet(color.pawn(), from, to)
        }
    }

    /// A castling move, given by the king's movement.
    pub const fn castle(color: Color, side: CastlingSide) -> Move {
        Move {
            kind: match side {
                CastlingSide::KingSide => MoveKind::KING_CASTLE,
                CastlingSide::QueenSide => MoveKind::QUEEN_CASTLE,
            },
            ..Move::quiet(color.king(), CastlingSide::king_from(color), side.king_to(color))
        }
    }

    /// A pawn promoting to `role`, optionally capturing.
    pub const fn promoting(
        color: Color,
        from: Square,
        to: Square,
        captured: Option<Piece>,
        role: Role,
    ) -> Move {
        Move {
            capture: captured,
            promotion: Some(role.of(color)),
            kind: if captured.is_some() {
                MoveKind::PROMOTION.union(MoveKind::CAPTURE)
            } else {
                MoveKind::PROMOTION
            },
            ..Move::quiet(color.pawn(), from, to)
        }
    }

    /// Sets the advisory check flag.
    #[must_use]
    #[inline]
    pub const fn with_check(self, gives_check: bool) -> Move {
        Move {
            gives_check,
            ..self
        }
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// The moving piece.
    #[inline]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    #[inline]
    pub const fn role(self) -> Role {
        self.piece.role
    }

    #[inline]
    pub const fn color(self) -> Color {
        self.piece.color
    }

    /// The captured piece. For en passant this is the passed pawn.
    #[inline]
    pub const fn capture(self) -> Option<Piece> {
        self.capture
    }

    /// The piece the pawn turns into.
    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        self.promotion
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub const fn gives_check(self) -> bool {
        self.gives_check
    }

    /// Checks if the move is a capture, including en passant.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.capture.is_some()
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.kind.contains(MoveKind::EN_PASSANT)
    }

    #[inline]
    pub const fn is_double_push(self) -> bool {
        self.kind.contains(MoveKind::DOUBLE_PUSH)
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.kind.contains(MoveKind::PROMOTION)
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.kind.intersects(MoveKind::CASTLE)
    }

    pub const fn castling_side(self) -> Option<CastlingSide> {
        if self.kind.contains(MoveKind::KING_CASTLE) {
            Some(CastlingSide::KingSide)
        } else if self.kind.contains(MoveKind::QUEEN_CASTLE) {
            Some(CastlingSide::QueenSide)
        } else {
            None
        }
    }

    /// Checks if the move resets the halfmove clock.
    #[inline]
    pub const fn is_zeroing(self) -> bool {
        matches!(self.piece.role, Role::Pawn) || self.capture.is_some()
    }

    /// Square of the captured piece, which differs from the destination for
    /// en passant.
    pub const fn capture_square(self) -> Square {
        if self.is_en_passant() {
            Square::from_coords(self.to.file(), self.from.rank())
        } else {
            self.to
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            f.write_char(promotion.role.char())?;
        }
        Ok(())
    }
}

/// A container for moves that can be stored inline on the stack.
///
/// The capacity is limited, but there is enough space to hold the
/// pseudo-legal moves of any chess position.
pub type MoveList = ArrayVec<Move, 256>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let m = Move::en_passant(Color::White, Square::E5, Square::D6);
        assert!(m.is_capture());
        assert!(m.is_zeroing());
        assert_eq!(m.capture(), Some(Color::Black.pawn()));
        assert_eq!(m.capture_square(), Square::D5);
        assert!(!m.kind().contains(MoveKind::CAPTURE));

        let m = Move::castle(Color::Black, CastlingSide::QueenSide);
        assert_eq!((m.from(), m.to()), (Square::E8, Square::C8));
        assert!(m.is_castle());
        assert!(!m.is_capture());
        assert_eq!(m.castling_side(), Some(CastlingSide::QueenSide));

        let m = Move::promoting(
            Color::White,
            Square::B7,
            Square::A8,
            Some(Color::Black.rook()),
            Role::Knight,
        );
        assert_eq!(m.kind(), MoveKind::PROMOTION | MoveKind::CAPTURE);
        assert_eq!(m.to_string(), "b7a8n");
    }

    #[test]
    fn test_check_flag_is_separate_from_kind() {
        let m = Move::quiet(Color::White.rook(), Square::A1, Square::A8);
        let checking = m.with_check(true);
        assert_eq!(m.kind(), checking.kind());
        assert!(checking.gives_check());
        assert_ne!(m, checking);
    }
}
