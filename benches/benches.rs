use std::hint::black_box;

use bitchess::{
    magics::MagicTables,
    order,
    perft::{perft, perft_cached},
    PerftTable, PerftTableConfig, Position,
};
use criterion::{criterion_group, criterion_main, Criterion};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POS5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.sample_size(10);

    group.bench_function("startpos 4", |b| {
        let mut pos = Position::startpos();
        b.iter(|| assert_eq!(perft(black_box(&mut pos), 4), 197_281));
    });

    group.bench_function("kiwipete 3", |b| {
        let mut pos = Position::from_fen(KIWIPETE).expect("valid fen");
        b.iter(|| assert_eq!(perft(black_box(&mut pos), 3), 97_862));
    });

    group.bench_function("startpos 5 cached", |b| {
        let mut pos = Position::startpos();
        b.iter(|| {
            let mut table = PerftTable::new(PerftTableConfig::default());
            assert_eq!(perft_cached(black_box(&mut pos), 5, &mut table), 4_865_609);
        });
    });

    group.finish();
}

fn bench_generate_moves(c: &mut Criterion) {
    let pos = Position::from_fen(POS5).expect("valid fen");
    c.bench_function("legal moves", |b| {
        b.iter(|| assert_eq!(black_box(&pos).legal_moves().len(), 44));
    });
    c.bench_function("quiescence moves", |b| {
        b.iter(|| black_box(&pos).quiescence_moves().len());
    });
}

fn bench_make_unmake(c: &mut Criterion) {
    let mut pos = Position::from_fen(POS5).expect("valid fen");
    let moves = pos.legal_moves();
    c.bench_function("make unmake", |b| {
        b.iter(|| {
            for &m in &moves {
                let undo = pos.make_move(black_box(m));
                pos.unmake_move(undo);
            }
        });
    });
}

fn bench_sort_moves(c: &mut Criterion) {
    let pos = Position::from_fen(KIWIPETE).expect("valid fen");
    let moves = pos.legal_moves();
    c.bench_function("sort moves", |b| {
        b.iter(|| {
            let mut moves = moves.clone();
            order::sort_moves(black_box(&mut moves));
        });
    });
}

fn bench_magic_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("magics");
    group.sample_size(10);
    group.bench_function("search", |b| {
        b.iter(|| MagicTables::new().expect("magic search succeeds"));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_perft,
    bench_generate_moves,
    bench_make_unmake,
    bench_sort_moves,
    bench_magic_search
);
criterion_main!(benches);
