//! Count move paths, for testing and benchmarking move generation.
//!
//! # Examples
//!
//! ```
//! use bitchess::{perft::perft, Position};
//!
//! let mut pos = Position::startpos();
//! assert_eq!(perft(&mut pos, 1), 20);
//! assert_eq!(perft(&mut pos, 2), 400);
//! assert_eq!(perft(&mut pos, 3), 8902);
//! ```

use std::fmt;

use tracing::{debug, info};

use crate::{m::Move, perft_table::PerftTable, position::Position};

/// Counts legal move paths of length `depth`.
///
/// Paths ending early in mate or stalemate are not counted. The position is
/// walked with make/unmake and left as it was.
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = pos.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for m in moves {
        let undo = pos.make_move(m);
        nodes += perft(pos, depth - 1);
        pos.unmake_move(undo);
    }
    nodes
}

/// Like [`perft()`], but generates pseudo-legal moves and discards those
/// that leave the own king attacked after making them.
pub fn perft_pseudo_legal(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for m in pos.pseudo_legal_moves() {
        let undo = pos.make_move(m);
        if undo.was_legal() {
            nodes += perft_pseudo_legal(pos, depth - 1);
        }
        pos.unmake_move(undo);
    }
    nodes
}

/// Like [`perft()`], but looks up and stores subtree counts in `table`.
pub fn perft_cached(pos: &mut Position, depth: u32, table: &mut PerftTable) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = pos.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let hash = pos.zobrist();
    if let Some(nodes) = table.try_load(hash, depth) {
        return nodes;
    }

    let mut nodes = 0;
    for m in moves {
        let undo = pos.make_move(m);
        nodes += perft_cached(pos, depth - 1, table);
        pos.unmake_move(undo);
    }

    table.save(hash, depth, nodes);
    nodes
}

/// Node counts per root move, as produced by [`divide()`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Divide {
    pub moves: Vec<(Move, u64)>,
}

impl Divide {
    pub fn total(&self) -> u64 {
        self.moves.iter().map(|&(_, nodes)| nodes).sum()
    }
}

impl fmt::Display for Divide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (m, nodes) in &self.moves {
            writeln!(f, "{m}: {nodes}")?;
        }
        writeln!(f)?;
        write!(f, "Nodes searched: {}", self.total())
    }
}

/// Splits a cached perft by root move, for comparing against other move
/// generators.
pub fn divide(pos: &mut Position, depth: u32, table: &mut PerftTable) -> Divide {
    let mut divide = Divide::default();
    if depth == 0 {
        return divide;
    }

    for m in pos.legal_moves() {
        let undo = pos.make_move(m);
        let nodes = perft_cached(pos, depth - 1, table);
        pos.unmake_move(undo);
        debug!(%m, nodes, "divide");
        divide.moves.push((m, nodes));
    }

    info!(depth, nodes = divide.total(), "perft");
    divide
}
