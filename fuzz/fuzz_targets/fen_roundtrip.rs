#![no_main]

use bitchess::Position;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(fen) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(pos) = Position::from_fen(fen) {
        assert!(pos.is_valid());
        let roundtripped = Position::from_fen(&pos.fen()).expect("roundtrip");
        assert_eq!(pos, roundtripped);
    }
});
