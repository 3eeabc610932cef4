use bitchess::{uci::UciMove, Position, UciError};

const GAME: [(&str, &str); 20] = [
    ("e2e4", "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"),
    ("e7e5", "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"),
    ("f1c4", "rnbqkbnr/pppp1ppp/8/4p3/2B1P3/8/PPPP1PPP/RNBQK1NR b KQkq - 1 2"),
    ("d8g5", "rnb1kbnr/pppp1ppp/8/4p1q1/2B1P3/8/PPPP1PPP/RNBQK1NR w KQkq - 2 3"),
    ("g1h3", "rnb1kbnr/pppp1ppp/8/4p1q1/2B1P3/7N/PPPP1PPP/RNBQK2R b KQkq - 3 3"),
    ("b7b5", "rnb1kbnr/p1pp1ppp/8/1p2p1q1/2B1P3/7N/PPPP1PPP/RNBQK2R w KQkq b6 0 4"),
    ("e1g1", "rnb1kbnr/p1pp1ppp/8/1p2p1q1/2B1P3/7N/PPPP1PPP/RNBQ1RK1 b kq - 1 4"),
    ("b8c6", "r1b1kbnr/p1pp1ppp/2n5/1p2p1q1/2B1P3/7N/PPPP1PPP/RNBQ1RK1 w kq - 2 5"),
    ("d2d4", "r1b1kbnr/p1pp1ppp/2n5/1p2p1q1/2BPP3/7N/PPP2PPP/RNBQ1RK1 b kq d3 0 5"),
    ("c8a6", "r3kbnr/p1pp1ppp/b1n5/1p2p1q1/2BPP3/7N/PPP2PPP/RNBQ1RK1 w kq - 1 6"),
    ("h3g5", "r3kbnr/p1pp1ppp/b1n5/1p2p1N1/2BPP3/8/PPP2PPP/RNBQ1RK1 b kq - 0 6"),
    ("e8c8", "2kr1bnr/p1pp1ppp/b1n5/1p2p1N1/2BPP3/8/PPP2PPP/RNBQ1RK1 w - - 1 7"),
    ("f2f4", "2kr1bnr/p1pp1ppp/b1n5/1p2p1N1/2BPPP2/8/PPP3PP/RNBQ1RK1 b - f3 0 7"),
    ("b5c4", "2kr1bnr/p1pp1ppp/b1n5/4p1N1/2pPPP2/8/PPP3PP/RNBQ1RK1 w - - 0 8"),
    ("b2b4", "2kr1bnr/p1pp1ppp/b1n5/4p1N1/1PpPPP2/8/P1P3PP/RNBQ1RK1 b - b3 0 8"),
    ("c4b3", "2kr1bnr/p1pp1ppp/b1n5/4p1N1/3PPP2/1p6/P1P3PP/RNBQ1RK1 w - - 0 9"),
    ("b1c3", "2kr1bnr/p1pp1ppp/b1n5/4p1N1/3PPP2/1pN5/P1P3PP/R1BQ1RK1 b - - 1 9"),
    ("b3b2", "2kr1bnr/p1pp1ppp/b1n5/4p1N1/3PPP2/2N5/PpP3PP/R1BQ1RK1 w - - 0 10"),
    ("h2h4", "2kr1bnr/p1pp1ppp/b1n5/4p1N1/3PPP1P/2N5/PpP3P1/R1BQ1RK1 b - h3 0 10"),
    ("b2b1q", "2kr1bnr/p1pp1ppp/b1n5/4p1N1/3PPP1P/2N5/P1P3P1/RqBQ1RK1 w - - 0 11"),
];

#[test]
fn test_game() {
    let mut pos = Position::startpos();
    let mut undos = Vec::new();

    for (uci, fen) in GAME {
        undos.push(pos.play_uci(uci).expect("legal move"));
        assert_eq!(pos.fen(), fen, "after {uci}");
        assert!(pos.is_valid());
    }

    for (i, undo) in undos.into_iter().enumerate().rev() {
        pos.unmake_move(undo);
        let expected = if i == 0 {
            Position::startpos().fen()
        } else {
            GAME[i - 1].1.to_owned()
        };
        assert_eq!(pos.fen(), expected);
        assert!(pos.is_valid());
    }
    assert_eq!(pos, Position::startpos());
}

#[test]
fn test_game_from_fens() {
    // Every intermediate position parses to the same state the game reached.
    let mut pos = Position::startpos();
    for (uci, fen) in GAME {
        let _ = pos.play_uci(uci).expect("legal move");
        assert_eq!(Position::from_fen(fen).expect("valid fen"), pos);
    }
}

#[test]
fn test_move_kinds_in_game() {
    let mut pos = Position::startpos();
    for (uci, _) in GAME {
        let m = uci
            .parse::<UciMove>()
            .expect("valid uci")
            .to_move(&pos)
            .expect("legal move");
        match uci {
            "e1g1" | "e8c8" => assert!(m.is_castle()),
            "c4b3" => {
                assert!(m.is_en_passant());
                assert!(m.is_capture());
            }
            "b2b1q" => assert!(m.is_promotion()),
            "h3g5" | "b5c4" => assert!(m.is_capture()),
            _ => assert!(!m.is_capture()),
        }
        let _ = pos.make_move(m);
    }
}

#[test]
fn test_play_uci_moves() {
    let mut pos = Position::startpos();
    pos.play_uci_moves(GAME.iter().map(|&(uci, _)| uci))
        .expect("legal moves");
    assert_eq!(pos.fen(), GAME[19].1);

    let mut pos = Position::startpos();
    assert!(matches!(
        pos.play_uci_moves(["e2e4", "e2e4"]),
        Err(UciError::Illegal(_))
    ));
}
