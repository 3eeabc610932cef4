//! Move generation.
//!
//! Legal generation works from two precomputed facts about the side to move:
//! a [`CheckState`] restricting where non-king moves may land, and a
//! [`PinMap`] restricting which lines pinned pieces may move along. King
//! moves are filtered against the cached attack map of the opponent, which
//! already looks through the king.

use arrayvec::ArrayVec;

use crate::{
    attacks,
    bitboard::Bitboard,
    castling::{CastlingRights, CastlingSide},
    color::Color,
    m::{Move, MoveList},
    position::Position,
    role::Role,
    square::Square,
    types::Piece,
};

/// Which moves to generate.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum GenMode {
    /// All legal moves.
    Legal,
    /// Moves that obey piece movement but may leave the own king attacked.
    /// King steps and castling are still checked against attacked squares.
    PseudoLegal,
    /// Captures, promotions and checking moves. All legal moves when in
    /// check.
    Quiescence,
}

/// Pieces giving check to the side to move, and the squares a non-king
/// move must capture on or block at.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CheckState {
    pub checkers: Bitboard,
    pub capture_mask: Bitboard,
    pub push_mask: Bitboard,
}

impl CheckState {
    pub const fn unrestricted() -> CheckState {
        CheckState {
            checkers: Bitboard::EMPTY,
            capture_mask: Bitboard::FULL,
            push_mask: Bitboard::FULL,
        }
    }

    pub fn of(pos: &Position) -> CheckState {
        let us = pos.turn();
        let them = !us;
        let Some(king) = pos.king_of(us) else {
            return CheckState::unrestricted();
        };

        let occupied = pos.occupied();
        let checkers = (attacks::pawn_attacks(us, king) & pos.by_piece(them.pawn()))
            | (attacks::knight_attacks(king) & pos.by_piece(them.knight()))
            | (attacks::rook_attacks(king, occupied) & pos.rook_sliders(them))
            | (attacks::bishop_attacks(king, occupied) & pos.bishop_sliders(them));

        match checkers.single_square() {
            None if checkers.is_empty() => CheckState::unrestricted(),
            None => CheckState {
                checkers,
                capture_mask: Bitboard::EMPTY,
                push_mask: Bitboard::EMPTY,
            },
            Some(checker) => CheckState {
                checkers,
                capture_mask: checkers,
                push_mask: if pos.sliders(them).contains(checker) {
                    attacks::between(king, checker)
                } else {
                    Bitboard::EMPTY
                },
            },
        }
    }

    #[inline]
    pub const fn is_check(&self) -> bool {
        self.checkers.any()
    }

    #[inline]
    pub const fn is_double_check(&self) -> bool {
        self.checkers.more_than_one()
    }

    /// Squares a non-king move may land on.
    #[inline]
    pub fn targets(&self) -> Bitboard {
        self.capture_mask | self.push_mask
    }
}

/// Own pieces pinned to the king, each with the line it may still move
/// along.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PinMap {
    pinned: Bitboard,
    rays: ArrayVec<(Square, Bitboard), 8>,
}

impl PinMap {
    pub fn none() -> PinMap {
        PinMap::default()
    }

    pub fn of(pos: &Position) -> PinMap {
        let us = pos.turn();
        let them = !us;
        let mut pins = PinMap::none();
        let Some(king) = pos.king_of(us) else {
            return pins;
        };

        let theirs = pos.by_color(them);
        let occupied = pos.occupied();
        let snipers = (attacks::rook_attacks(king, theirs) & pos.rook_sliders(them))
            | (attacks::bishop_attacks(king, theirs) & pos.bishop_sliders(them));

        for sniper in snipers {
            let between = attacks::between(king, sniper);
            if let Some(pinned) = (between & occupied).single_square() {
                pins.pinned.add(pinned);
                pins.rays.push((pinned, between.with(sniper)));
            }
        }

        pins
    }

    #[inline]
    pub fn pinned(&self) -> Bitboard {
        self.pinned
    }

    /// Squares the piece on `sq` may move to without exposing the king.
    #[inline]
    pub fn ray(&self, sq: Square) -> Bitboard {
        if !self.pinned.contains(sq) {
            return Bitboard::FULL;
        }
        self.rays
            .iter()
            .find(|(pinned, _)| *pinned == sq)
            .map_or(Bitboard::FULL, |&(_, ray)| ray)
    }
}

/// Squares from which each piece kind of the side to move would attack the
/// enemy king.
#[derive(Copy, Clone, Debug, Default)]
struct CheckSquares {
    king: Option<Square>,
    pawn: Bitboard,
    knight: Bitboard,
    bishop: Bitboard,
    rook: Bitboard,
}

impl CheckSquares {
    fn new(pos: &Position) -> CheckSquares {
        let us = pos.turn();
        let Some(king) = pos.king_of(!us) else {
            return CheckSquares::default();
        };
        let occupied = pos.occupied();
        CheckSquares {
            king: Some(king),
            pawn: attacks::pawn_attacks(!us, king),
            knight: attacks::knight_attacks(king),
            bishop: attacks::bishop_attacks(king, occupied),
            rook: attacks::rook_attacks(king, occupied),
        }
    }

    fn for_role(&self, role: Role) -> Bitboard {
        match role {
            Role::Pawn => self.pawn,
            Role::Knight => self.knight,
            Role::Bishop => self.bishop,
            Role::Rook => self.rook,
            Role::Queen => self.bishop | self.rook,
            Role::King => Bitboard::EMPTY,
        }
    }

    /// Whether a pawn promoting on `from`-`to` checks as the new piece.
    /// Vacating `from` may open the line to the king.
    fn promotion(&self, from: Square, to: Square, promoted: Piece, occupied: Bitboard) -> bool {
        self.king.is_some_and(|king| {
            attacks::attacks(to, promoted, occupied.without(from)).contains(king)
        })
    }
}

struct Generator<'a> {
    pos: &'a Position,
    mode: GenMode,
    us: Color,
    ours: Bitboard,
    theirs: Bitboard,
    occupied: Bitboard,
    check: CheckState,
    pins: PinMap,
    check_squares: CheckSquares,
    noisy_only: bool,
    moves: MoveList,
}

impl Generator<'_> {
    fn push(&mut self, piece: Piece, from: Square, to: Square) {
        let m = match self.pos.piece_at(to) {
            Some(captured) => Move::capturing(piece, from, to, captured),
            None => Move::quiet(piece, from, to),
        };
        let check = self.check_squares.for_role(piece.role).contains(to);
        self.moves.push(m.with_check(check));
    }

    fn push_promotions(&mut self, from: Square, to: Square, roles: &[Role]) {
        let captured = self.pos.piece_at(to);
        for &role in roles {
            let promoted = role.of(self.us);
            let check = self
                .check_squares
                .promotion(from, to, promoted, self.occupied);
            self.moves
                .push(Move::promoting(self.us, from, to, captured, role).with_check(check));
        }
    }

    fn king_moves(&mut self) {
        let Some(king) = self.pos.king_of(self.us) else {
            return;
        };
        let mut targets =
            attacks::king_attacks(king) & !self.ours & !self.pos.attacks(!self.us);
        if self.noisy_only {
            targets &= self.theirs;
        }
        for to in targets {
            self.push(self.us.king(), king, to);
        }
    }

    fn castling_moves(&mut self) {
        if self.pos.in_check() {
            return;
        }
        let them_attacks = self.pos.attacks(!self.us);
        for side in CastlingSide::ALL {
            if self
                .pos
                .castling_rights()
                .contains(CastlingRights::of(self.us, side))
                && !side.path(self.us).intersects(self.occupied)
                && !side.king_path(self.us).intersects(them_attacks)
            {
                self.moves.push(Move::castle(self.us, side));
            }
        }
    }

    fn pawn_moves(&mut self) {
        let us = self.us;
        let empty = !self.occupied;
        let seventh = Bitboard::from(us.seventh_rank());
        let double_push_rank = Bitboard::from(us.double_push_rank());

        for from in self.pos.by_piece(us.pawn()) {
            let allowed = self.pins.ray(from);
            let promoting = seventh.contains(from);

            let captures =
                attacks::pawn_attacks(us, from) & self.theirs & self.check.capture_mask & allowed;
            for to in captures {
                if promoting {
                    self.push_promotions(from, to, &Role::PROMOTIONS);
                } else {
                    self.push(us.pawn(), from, to);
                }
            }

            let single = Bitboard::from(from).forward(us) & empty;
            let double = single.forward(us) & empty & double_push_rank;

            for to in single & self.check.push_mask & allowed {
                if promoting {
                    let roles: &[Role] = if self.noisy_only {
                        &[Role::Queen, Role::Knight]
                    } else {
                        &Role::PROMOTIONS
                    };
                    self.push_promotions(from, to, roles);
                } else {
                    let check = self.check_squares.pawn.contains(to);
                    if !self.noisy_only || check {
                        self.moves
                            .push(Move::quiet(us.pawn(), from, to).with_check(check));
                    }
                }
            }

            for to in double & self.check.push_mask & allowed {
                let check = self.check_squares.pawn.contains(to);
                if !self.noisy_only || check {
                    self.moves
                        .push(Move::double_push(us, from, to).with_check(check));
                }
            }
        }

        self.en_passant_moves();
    }

    fn en_passant_moves(&mut self) {
        let us = self.us;
        let Some(ep_square) = self.pos.ep_square() else {
            return;
        };

        for from in attacks::pawn_attacks(!us, ep_square) & self.pos.by_piece(us.pawn()) {
            let Some(capture_square) = ep_square.offset(us.fold(-8, 8)) else {
                continue;
            };
            if !(self.check.capture_mask.contains(capture_square)
                || self.check.push_mask.contains(ep_square))
            {
                continue;
            }
            if !self.pins.ray(from).contains(ep_square) {
                continue;
            }
            if self.mode != GenMode::PseudoLegal
                && !self.en_passant_is_safe(from, capture_square, ep_square)
            {
                continue;
            }
            let check = self.check_squares.pawn.contains(ep_square);
            self.moves
                .push(Move::en_passant(us, from, ep_square).with_check(check));
        }
    }

    /// Removing both pawns from their rank at once can expose the king to a
    /// slider that the pin scan could not see.
    fn en_passant_is_safe(&self, from: Square, capture_square: Square, to: Square) -> bool {
        let Some(king) = self.pos.king_of(self.us) else {
            return true;
        };
        let them = !self.us;
        let occupied = (self.occupied ^ from ^ capture_square) | to;
        (attacks::rook_attacks(king, occupied) & self.pos.rook_sliders(them)).is_empty()
            && (attacks::bishop_attacks(king, occupied) & self.pos.bishop_sliders(them)).is_empty()
    }

    fn piece_moves(&mut self) {
        let us = self.us;
        let mut targets = !self.ours & self.check.targets();
        if self.noisy_only {
            targets &= self.theirs;
        }

        for role in [Role::Knight, Role::Bishop, Role::Rook, Role::Queen] {
            let piece = role.of(us);
            let check_squares = self.check_squares.for_role(role);
            for from in self.pos.by_piece(piece) {
                let reach = attacks::attacks(from, piece, self.occupied) & self.pins.ray(from);
                let mut to_squares = reach & targets;
                if self.noisy_only {
                    to_squares |= reach & !self.occupied & check_squares & self.check.targets();
                }
                for to in to_squares {
                    self.push(piece, from, to);
                }
            }
        }
    }
}

/// Generates moves of the side to move according to `mode`.
pub fn generate(pos: &Position, mode: GenMode) -> MoveList {
    let us = pos.turn();
    let check = match mode {
        GenMode::PseudoLegal => CheckState::unrestricted(),
        GenMode::Legal | GenMode::Quiescence => CheckState::of(pos),
    };
    let pins = match mode {
        GenMode::PseudoLegal => PinMap::none(),
        GenMode::Legal | GenMode::Quiescence => PinMap::of(pos),
    };

    let mut gen = Generator {
        pos,
        mode,
        us,
        ours: pos.by_color(us),
        theirs: pos.by_color(!us),
        occupied: pos.occupied(),
        noisy_only: mode == GenMode::Quiescence && !check.is_check(),
        check,
        pins,
        check_squares: CheckSquares::new(pos),
        moves: MoveList::new(),
    };

    gen.king_moves();
    if gen.check.is_double_check() {
        return gen.moves;
    }
    if !gen.noisy_only {
        gen.castling_moves();
    }
    gen.pawn_moves();
    gen.piece_moves();
    gen.moves
}

pub fn legal_moves(pos: &Position) -> MoveList {
    generate(pos, GenMode::Legal)
}

pub fn pseudo_legal_moves(pos: &Position) -> MoveList {
    generate(pos, GenMode::PseudoLegal)
}

pub fn quiescence_moves(pos: &Position) -> MoveList {
    generate(pos, GenMode::Quiescence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).expect("valid fen")
    }

    fn uci(moves: &MoveList) -> Vec<String> {
        let mut uci: Vec<String> = moves.iter().map(ToString::to_string).collect();
        uci.sort();
        uci
    }

    #[test]
    fn test_startpos() {
        assert_eq!(legal_moves(&Position::startpos()).len(), 20);
        assert_eq!(pseudo_legal_moves(&Position::startpos()).len(), 20);
        assert!(quiescence_moves(&Position::startpos()).is_empty());
    }

    #[test]
    fn test_double_check_allows_only_king_moves() {
        let pos = pos("4k3/8/8/8/8/5n2/8/r3K3 w - - 0 1");
        let check = CheckState::of(&pos);
        assert!(check.is_double_check());
        let moves = legal_moves(&pos);
        assert!(moves.iter().all(|m| m.role() == Role::King));
        assert_eq!(uci(&moves), ["e1e2", "e1f2"]);
    }

    #[test]
    fn test_single_check_masks() {
        let pos = pos("4k3/8/8/8/8/8/8/r3K2R w K - 0 1");
        let check = CheckState::of(&pos);
        assert_eq!(check.checkers, Bitboard::from(Square::A1));
        assert_eq!(check.capture_mask, Bitboard::from(Square::A1));
        assert_eq!(
            check.push_mask,
            Bitboard::from(Square::B1) | Square::C1 | Square::D1
        );
        let moves = legal_moves(&pos);
        assert!(moves.iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn test_pins() {
        let pos = pos("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
        let pins = PinMap::of(&pos);
        assert_eq!(pins.pinned(), Bitboard::from(Square::E2));
        assert!(legal_moves(&pos).iter().all(|m| m.from() != Square::E2));

        let pos = self::pos("4k3/4r3/8/8/8/8/4R3/4K3 w - - 0 1");
        let moves = legal_moves(&pos);
        assert_eq!(moves.iter().filter(|m| m.from() == Square::E2).count(), 5);
    }

    #[test]
    fn test_en_passant_discovered_check() {
        let pos = pos("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1");
        assert!(legal_moves(&pos).iter().all(|m| !m.is_en_passant()));
        assert!(pseudo_legal_moves(&pos).iter().any(|m| m.is_en_passant()));

        let pos = self::pos("8/8/8/K2pP3/8/8/8/7k w - d6 0 1");
        assert!(legal_moves(&pos).iter().any(|m| m.is_en_passant()));
    }

    #[test]
    fn test_en_passant_captures_checker() {
        let pos = pos("8/8/8/2k5/3Pp3/8/8/4K3 b - d3 0 1");
        assert!(pos.in_check());
        assert!(legal_moves(&pos)
            .iter()
            .any(|m| m.is_en_passant() && m.to() == Square::D3));
    }

    #[test]
    fn test_castling() {
        let pos = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castles = legal_moves(&pos).into_iter().filter(|m| m.is_castle()).count();
        assert_eq!(castles, 2);

        // f1 is attacked, so only the queen side remains.
        let pos = self::pos("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1");
        let castles: Vec<_> = legal_moves(&pos).into_iter().filter(|m| m.is_castle()).collect();
        assert_eq!(castles, [Move::castle(Color::White, CastlingSide::QueenSide)]);

        // b1 may be attacked, it only needs to be empty.
        let pos = self::pos("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(legal_moves(&pos).iter().any(|m| m.is_castle()));
    }

    #[test]
    fn test_promotions() {
        let pos = pos("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let moves = uci(&legal_moves(&pos));
        for m in ["a7a8q", "a7a8r", "a7a8b", "a7a8n", "a7b8q", "a7b8r", "a7b8b", "a7b8n"] {
            assert!(moves.contains(&m.to_owned()), "missing {m}");
        }
        let quiet: Vec<_> = uci(&quiescence_moves(&pos))
            .into_iter()
            .filter(|m| m.starts_with("a7a8"))
            .collect();
        assert_eq!(quiet, ["a7a8n", "a7a8q"]);
    }

    #[test]
    fn test_check_flags() {
        let pos = pos("4k3/8/8/8/8/8/8/R3K1N1 w - - 0 1");
        let moves = legal_moves(&pos);
        let checks: Vec<_> = uci(&moves.into_iter().filter(|m| m.gives_check()).collect());
        assert_eq!(checks, ["a1a8"]);

        let pos = self::pos("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let moves = legal_moves(&pos);
        let a8q = moves.iter().find(|m| m.to_string() == "a7a8q").expect("promotion");
        assert!(a8q.gives_check());
        let a8n = moves.iter().find(|m| m.to_string() == "a7a8n").expect("promotion");
        assert!(!a8n.gives_check());
    }

    #[test]
    fn test_quiescence() {
        let pos = pos("4k3/8/8/3p4/4P3/8/8/R3K1N1 w - - 0 1");
        let moves = uci(&quiescence_moves(&pos));
        assert_eq!(moves, ["a1a8", "e4d5"]);

        // In check the quiescence generator falls back to all legal moves.
        let pos = self::pos("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
        assert_eq!(uci(&quiescence_moves(&pos)), uci(&legal_moves(&pos)));
    }
}
