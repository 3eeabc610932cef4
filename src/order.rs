//! Heuristic move ordering for alpha-beta style searches.
//!
//! Every move is ranked by the value of its victim (zero for quiet moves)
//! minus the value of the moving piece, so cheap pieces move first.
//! Promotions add the value of the new piece, and checking moves and
//! castles get a flat bonus.

use crate::m::Move;

/// Bonus for a move flagged as giving check.
pub const CHECK_BONUS: i32 = 1000;

/// Bonus for castling, which takes the place of the check bonus.
pub const CASTLE_BONUS: i32 = 700;

/// Scores a move. Higher scores are searched first.
///
/// # Examples
///
/// ```
/// use bitchess::{order, Color, Move, Square};
///
/// let pxq = Move::capturing(Color::White.pawn(), Square::E4, Square::D5, Color::Black.queen());
/// let qxp = Move::capturing(Color::White.queen(), Square::D1, Square::D5, Color::Black.pawn());
/// assert!(order::score(pxq) > order::score(qxp));
/// ```
pub fn score(m: Move) -> i32 {
    let mut score = -m.role().value();
    if let Some(captured) = m.capture() {
        score += captured.role.value();
    }
    if let Some(promoted) = m.promotion() {
        score += promoted.role.value();
    }
    if m.is_castle() {
        score += CASTLE_BONUS;
    } else if m.gives_check() {
        score += CHECK_BONUS;
    }
    score
}

/// Moves the best scored move of `moves[*index..]` to `moves[*index]`,
/// advances `index` and returns that move. Returns `None` when all moves
/// have been selected.
///
/// Each call is a single selection pass, so a search that cuts off early
/// never pays for sorting the rest.
pub fn select_next(moves: &mut [Move], index: &mut usize) -> Option<Move> {
    let start = *index;
    if start >= moves.len() {
        return None;
    }

    let mut best = start;
    let mut best_score = score(moves[start]);
    for (i, &m) in moves.iter().enumerate().skip(start + 1) {
        let s = score(m);
        if s > best_score {
            best = i;
            best_score = s;
        }
    }

    moves.swap(start, best);
    *index += 1;
    Some(moves[start])
}

/// Sorts `moves` by descending score.
pub fn sort_moves(moves: &mut [Move]) {
    let mut index = 0;
    while select_next(moves, &mut index).is_some() {}
}
