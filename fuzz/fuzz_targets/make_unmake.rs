#![no_main]

use arbitrary::Arbitrary;
use bitchess::Position;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Data {
    fen: String,
    move_indexes: Vec<u8>,
}

fuzz_target!(|data: Data| {
    let Ok(mut pos) = Position::from_fen(&data.fen) else {
        return;
    };

    let mut history = vec![pos.clone()];
    let mut undos = Vec::new();

    for index in &data.move_indexes {
        let legals = pos.legal_moves();
        let Some(idx) = usize::from(*index).checked_rem(legals.len()) else {
            break;
        };
        undos.push(pos.make_move(legals[idx]));
        assert!(pos.is_valid());
        history.push(pos.clone());
    }

    while let Some(undo) = undos.pop() {
        history.pop();
        pos.unmake_move(undo);
        assert_eq!(Some(&pos), history.last());
    }
});
