use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hex_duel::board::Board;
use hex_duel::core::Move;
use hex_duel::rules::{ChessGame, MoveCache};

fn refresh(c: &mut Criterion) {
    let board = Board::initial();
    c.bench_function("move_cache_initial", |b| {
        b.iter(|| MoveCache::compute(black_box(&board)))
    });

    let mut game = ChessGame::start().expect("start position");
    for (from, to) in [("f5", "f6"), ("e7", "e6"), ("e4", "e5"), ("g7", "g6")] {
        let mv = Move::parse(from, to).expect("notation");
        game.make_move(mv).expect("legal opening move");
    }
    let midgame = game.board().clone();
    c.bench_function("move_cache_after_opening", |b| {
        b.iter(|| MoveCache::compute(black_box(&midgame)))
    });

    c.bench_function("make_move_and_refresh", |b| {
        let start = ChessGame::start().expect("start position");
        let mv = Move::parse("f5", "f6").expect("notation");
        b.iter(|| {
            let mut game = start.clone();
            game.make_move(mv).expect("legal");
            game.init_piece_moves().expect("refresh");
            game
        })
    });
}

criterion_group!(benches, refresh);
criterion_main!(benches);
