//! The position model: bitboards, mailbox, cached attack maps, rights and
//! hash, mutated in place by [`Position::make_move()`] and restored by
//! [`Position::unmake_move()`].

use crate::{
    attacks,
    bitboard::Bitboard,
    castling::{CastlingRights, CastlingSide},
    color::{ByColor, Color},
    m::{Move, MoveList},
    magics,
    movegen::{self, GenMode},
    role::Role,
    square::{File, Rank, Square},
    types::{Piece, SLOTS},
    zobrist::{self, Zobrist64, KEYS},
};

/// Squares attacked by each side, split into attacks of stepping pieces
/// (pawns, knights, king) and of sliding pieces (bishops, rooks, queens).
///
/// Sliding attacks treat the opposing king as transparent, so a ray that
/// gives check continues behind the king.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct AttackMaps {
    statics: ByColor<Bitboard>,
    sliders: ByColor<Bitboard>,
}

impl AttackMaps {
    #[inline]
    pub fn statics(&self, color: Color) -> Bitboard {
        *self.statics.get(color)
    }

    #[inline]
    pub fn sliders(&self, color: Color) -> Bitboard {
        *self.sliders.get(color)
    }

    /// All squares attacked by `color`.
    #[inline]
    pub fn total(&self, color: Color) -> Bitboard {
        self.statics(color) | self.sliders(color)
    }
}

/// Everything needed to revert a move with [`Position::unmake_move()`].
///
/// An `Undo` is handed out by [`Position::make_move()`] and consumed by
/// [`Position::unmake_move()`]. It is only valid for the position it came
/// from.
#[derive(Debug)]
#[must_use = "the undo record is needed to take the move back"]
pub struct Undo {
    m: Move,
    castling: CastlingRights,
    ep_square: Option<Square>,
    halfmoves: u32,
    attacks: AttackMaps,
    hash: Zobrist64,
    was_legal: bool,
}

impl Undo {
    /// The move that was made.
    #[inline]
    pub fn played(&self) -> Move {
        self.m
    }

    /// Whether the mover's king was not left attacked. Always `true` for
    /// moves from the legal generator; pseudo-legal moves need this check.
    #[inline]
    pub fn was_legal(&self) -> bool {
        self.was_legal
    }
}

/// A chess position.
///
/// The position is a plain value. Searches that need to keep a parent
/// position while exploring a child either use make/unmake or take an
/// explicit copy with [`Clone`].
///
/// # Examples
///
/// ```
/// use bitchess::Position;
///
/// let mut pos = Position::startpos();
/// let moves = pos.legal_moves();
/// assert_eq!(moves.len(), 20);
///
/// let undo = pos.make_move(moves[0]);
/// pos.unmake_move(undo);
/// assert_eq!(pos, Position::startpos());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    boards: [Bitboard; SLOTS],
    mailbox: [Option<Piece>; 64],
    attacks: AttackMaps,
    turn: Color,
    castling: CastlingRights,
    ep_square: Option<Square>,
    halfmoves: u32,
    fullmoves: u32,
    hash: Zobrist64,
    in_check: bool,
}

impl Position {
    /// The standard starting position.
    pub fn startpos() -> Position {
        const BACKRANK: [Role; 8] = [
            Role::Rook,
            Role::Knight,
            Role::Bishop,
            Role::Queen,
            Role::King,
            Role::Bishop,
            Role::Knight,
            Role::Rook,
        ];

        let mut board = [None; 64];
        for color in Color::ALL {
            let pawn_rank = color.fold(Rank::Second, Rank::Seventh);
            for file in File::ALL {
                board[Square::from_coords(file, color.backrank()).index()] =
                    Some(BACKRANK[file as usize].of(color));
                board[Square::from_coords(file, pawn_rank).index()] = Some(color.pawn());
            }
        }

        Position::from_setup(board, Color::White, CastlingRights::all(), None, 0, 1)
    }

    /// Builds a position and derives attack maps, check flag and hash.
    ///
    /// Castling rights without the king and rook on their start squares are
    /// dropped.
    pub(crate) fn from_setup(
        board: [Option<Piece>; 64],
        turn: Color,
        castling: CastlingRights,
        ep_square: Option<Square>,
        halfmoves: u32,
        fullmoves: u32,
    ) -> Position {
        magics::init();

        let mut pos = Position {
            boards: [Bitboard::EMPTY; SLOTS],
            mailbox: [None; 64],
            attacks: AttackMaps::default(),
            turn,
            castling,
            ep_square,
            halfmoves,
            fullmoves,
            hash: Zobrist64::default(),
            in_check: false,
        };

        for (index, piece) in board.into_iter().enumerate() {
            if let Some(piece) = piece {
                let sq = Square::new(index as u32);
                pos.toggle(piece, Bitboard::from(sq));
                pos.mailbox[index] = Some(piece);
            }
        }

        for color in Color::ALL {
            for side in CastlingSide::ALL {
                let king_home = pos.piece_at(CastlingSide::king_from(color)) == Some(color.king());
                let rook_home = pos.piece_at(side.rook_from(color)) == Some(color.rook());
                if !(king_home && rook_home) {
                    pos.castling.remove(CastlingRights::of(color, side));
                }
            }
        }

        for color in Color::ALL {
            *pos.attacks.statics.get_mut(color) = pos.static_attacks(color);
            *pos.attacks.sliders.get_mut(color) = pos.slider_attacks(color);
        }
        pos.in_check = pos
            .by_piece(turn.king())
            .intersects(pos.attacks.total(!turn));
        pos.hash = zobrist::rebuild(&pos);
        pos
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// The square a pawn passed over with a double push on the last move.
    /// Set after every double push, whether or not a capture is possible.
    #[inline]
    pub fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// Plies since the last capture or pawn move.
    #[inline]
    pub fn halfmoves(&self) -> u32 {
        self.halfmoves
    }

    #[inline]
    pub fn fullmoves(&self) -> u32 {
        self.fullmoves
    }

    #[inline]
    pub fn zobrist(&self) -> Zobrist64 {
        self.hash
    }

    /// Whether the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    #[inline]
    pub fn attack_maps(&self) -> &AttackMaps {
        &self.attacks
    }

    /// All squares attacked by `color`.
    #[inline]
    pub fn attacks(&self, color: Color) -> Bitboard {
        self.attacks.total(color)
    }

    #[inline]
    pub fn by_piece(&self, piece: Piece) -> Bitboard {
        self.boards[piece.index()]
    }

    #[inline]
    pub fn by_color(&self, color: Color) -> Bitboard {
        self.boards[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.boards[0] | self.boards[1]
    }

    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied()
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq.index()]
    }

    #[inline]
    pub fn king_of(&self, color: Color) -> Option<Square> {
        self.by_piece(color.king()).single_square()
    }

    /// Rooks and queens of `color`.
    #[inline]
    pub fn rook_sliders(&self, color: Color) -> Bitboard {
        self.by_piece(color.rook()) | self.by_piece(color.queen())
    }

    /// Bishops and queens of `color`.
    #[inline]
    pub fn bishop_sliders(&self, color: Color) -> Bitboard {
        self.by_piece(color.bishop()) | self.by_piece(color.queen())
    }

    /// Bishops, rooks and queens of `color`.
    #[inline]
    pub fn sliders(&self, color: Color) -> Bitboard {
        self.rook_sliders(color) | self.by_piece(color.bishop())
    }

    pub fn legal_moves(&self) -> MoveList {
        movegen::generate(self, GenMode::Legal)
    }

    pub fn pseudo_legal_moves(&self) -> MoveList {
        movegen::generate(self, GenMode::PseudoLegal)
    }

    pub fn quiescence_moves(&self) -> MoveList {
        movegen::generate(self, GenMode::Quiescence)
    }

    /// Toggles `squares` on the board of `piece` and its color aggregate.
    #[inline]
    fn toggle(&mut self, piece: Piece, squares: Bitboard) {
        self.boards[piece.index()] ^= squares;
        self.boards[piece.color.index()] ^= squares;
    }

    fn static_attacks(&self, color: Color) -> Bitboard {
        let mut attacks = self.by_piece(color.pawn()).pawn_attacks(color);
        for sq in self.by_piece(color.knight()) {
            attacks |= attacks::knight_attacks(sq);
        }
        for sq in self.by_piece(color.king()) {
            attacks |= attacks::king_attacks(sq);
        }
        attacks
    }

    fn slider_attacks(&self, color: Color) -> Bitboard {
        let occupied = self.occupied() ^ self.by_piece((!color).king());
        let mut attacks = Bitboard::EMPTY;
        for sq in self.rook_sliders(color) {
            attacks |= attacks::rook_attacks(sq, occupied);
        }
        for sq in self.bishop_sliders(color) {
            attacks |= attacks::bishop_attacks(sq, occupied);
        }
        attacks
    }

    /// Plays a move that the generator produced for this position and
    /// returns the record to take it back.
    ///
    /// Passing a move from a different position leaves the position in an
    /// unspecified state. Use [`Position::is_valid()`] in tests to detect
    /// that.
    pub fn make_move(&mut self, m: Move) -> Undo {
        let mut undo = Undo {
            m,
            castling: self.castling,
            ep_square: self.ep_square,
            halfmoves: self.halfmoves,
            attacks: self.attacks,
            hash: self.hash,
            was_legal: true,
        };

        let us = m.color();
        let them = !us;
        let piece = m.piece();
        let from = m.from();
        let to = m.to();
        let from_to = Bitboard::from(from) | to;
        let mut touched = from_to;

        if let Some(ep_square) = self.ep_square.take() {
            self.hash ^= KEYS.en_passant(ep_square.file());
        }
        self.hash ^= KEYS.castling(self.castling);

        self.toggle(piece, from_to);
        self.mailbox[from.index()] = None;
        self.mailbox[to.index()] = Some(piece);
        self.hash ^= KEYS.piece(piece, from) ^ KEYS.piece(piece, to);

        if let Some(captured) = m.capture() {
            let capture_square = m.capture_square();
            self.toggle(captured, Bitboard::from(capture_square));
            if capture_square != to {
                self.mailbox[capture_square.index()] = None;
            }
            self.hash ^= KEYS.piece(captured, capture_square);
            touched.add(capture_square);
        }

        if let Some(promoted) = m.promotion() {
            self.boards[piece.index()] ^= Bitboard::from(to);
            self.boards[promoted.index()] ^= Bitboard::from(to);
            self.mailbox[to.index()] = Some(promoted);
            self.hash ^= KEYS.piece(piece, to) ^ KEYS.piece(promoted, to);
        }

        if let Some(side) = m.castling_side() {
            let rook = us.rook();
            let rook_from = side.rook_from(us);
            let rook_to = side.rook_to(us);
            self.toggle(rook, Bitboard::from(rook_from) | rook_to);
            self.mailbox[rook_from.index()] = None;
            self.mailbox[rook_to.index()] = Some(rook);
            self.hash ^= KEYS.piece(rook, rook_from) ^ KEYS.piece(rook, rook_to);
            touched.add(rook_from);
            touched.add(rook_to);
        }

        self.halfmoves = if m.is_zeroing() { 0 } else { self.halfmoves.saturating_add(1) };

        if m.is_double_push() {
            let passed = Square::new((from.index() + to.index()) as u32 / 2);
            self.ep_square = Some(passed);
            self.hash ^= KEYS.en_passant(passed.file());
        }

        self.castling.discard_touched(from_to);
        self.hash ^= KEYS.castling(self.castling);

        let special = m.is_castle() || m.is_promotion() || m.is_en_passant();
        if !piece.role.is_slider() {
            *self.attacks.statics.get_mut(us) = self.static_attacks(us);
        }
        if piece.role.is_slider() || special || touched.intersects(undo.attacks.sliders(us)) {
            *self.attacks.sliders.get_mut(us) = self.slider_attacks(us);
        }
        let captured_role = m.capture().map(|captured| captured.role);
        if captured_role.is_some_and(|role| !role.is_slider()) {
            *self.attacks.statics.get_mut(them) = self.static_attacks(them);
        }
        if m.is_en_passant()
            || captured_role.is_some_and(Role::is_slider)
            || touched.intersects(undo.attacks.sliders(them))
        {
            *self.attacks.sliders.get_mut(them) = self.slider_attacks(them);
        }

        if us.is_black() {
            self.fullmoves = self.fullmoves.wrapping_add(1);
        }
        self.turn = them;
        self.hash ^= KEYS.black_to_move();

        self.in_check = self.by_piece(them.king()).intersects(self.attacks.total(us));
        undo.was_legal = !self.by_piece(us.king()).intersects(self.attacks.total(them));
        undo
    }

    /// Takes back the move recorded in `undo`.
    pub fn unmake_move(&mut self, undo: Undo) {
        let m = undo.m;
        let us = m.color();
        let piece = m.piece();
        let from = m.from();
        let to = m.to();

        self.turn = us;
        if us.is_black() {
            self.fullmoves = self.fullmoves.wrapping_sub(1);
        }
        self.castling = undo.castling;
        self.ep_square = undo.ep_square;
        self.halfmoves = undo.halfmoves;
        self.attacks = undo.attacks;
        self.hash = undo.hash;

        self.mailbox[to.index()] = None;

        if let Some(side) = m.castling_side() {
            let rook = us.rook();
            let rook_from = side.rook_from(us);
            let rook_to = side.rook_to(us);
            self.toggle(rook, Bitboard::from(rook_from) | rook_to);
            self.mailbox[rook_to.index()] = None;
            self.mailbox[rook_from.index()] = Some(rook);
        }

        if let Some(promoted) = m.promotion() {
            self.boards[promoted.index()] ^= Bitboard::from(to);
            self.boards[piece.index()] ^= Bitboard::from(to);
        }

        if let Some(captured) = m.capture() {
            let capture_square = m.capture_square();
            self.toggle(captured, Bitboard::from(capture_square));
            self.mailbox[capture_square.index()] = Some(captured);
        }

        self.toggle(piece, Bitboard::from(from) | to);
        self.mailbox[from.index()] = Some(piece);

        self.in_check = self.by_piece(us.king()).intersects(self.attacks.total(!us));
    }

    /// Runs the full invariant check: disjoint piece boards, color
    /// aggregates, mailbox agreement, one king per side, cached attack maps,
    /// check flag and hash. Meant for tests and debugging.
    pub fn is_valid(&self) -> bool {
        if self.by_color(Color::White).intersects(self.by_color(Color::Black)) {
            return false;
        }

        let mut seen = Bitboard::EMPTY;
        for color in Color::ALL {
            let mut union = Bitboard::EMPTY;
            for role in Role::ALL {
                let board = self.by_piece(role.of(color));
                if board.intersects(seen) {
                    return false;
                }
                seen |= board;
                union |= board;
            }
            if union != self.by_color(color) {
                return false;
            }
            if self.king_of(color).is_none() {
                return false;
            }
        }

        for sq in Bitboard::FULL {
            let on_board = Color::ALL.into_iter().find_map(|color| {
                Role::ALL
                    .into_iter()
                    .map(|role| role.of(color))
                    .find(|&piece| self.by_piece(piece).contains(sq))
            });
            if on_board != self.piece_at(sq) {
                return false;
            }
        }

        for color in Color::ALL {
            if self.attacks.statics(color) != self.static_attacks(color)
                || self.attacks.sliders(color) != self.slider_attacks(color)
            {
                return false;
            }
        }

        self.in_check
            == self
                .by_piece(self.turn.king())
                .intersects(self.attacks.total(!self.turn))
            && self.hash == zobrist::rebuild(self)
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::startpos()
    }
}
