use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tabula_chess::session::game_session::GameSession;

const ITALIAN_OPENING: &[&str] = &[
    "e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5", "c2c3", "g8f6", "d2d3", "d7d6",
];

fn started_session(moves: &[&str]) -> GameSession {
    let mut session = GameSession::new();
    session.reset_game();
    for mv in moves {
        session.apply_move(mv, false).expect("bench moves are legal");
    }
    session
}

fn bench_legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("legal_moves");

    let mut start = started_session(&[]);
    group.bench_function("startpos", |b| {
        b.iter(|| black_box(start.legal_moves().len()))
    });

    let mut middlegame = started_session(ITALIAN_OPENING);
    group.bench_function("italian_middlegame", |b| {
        b.iter(|| black_box(middlegame.legal_moves().len()))
    });

    group.finish();
}

fn bench_apply_and_undo(c: &mut Criterion) {
    c.bench_function("apply_undo_opening", |b| {
        b.iter(|| {
            let mut session = started_session(ITALIAN_OPENING);
            while !session.history().is_empty() {
                session.undo_last_move();
            }
            black_box(session.history().len())
        })
    });
}

criterion_group!(benches, bench_legal_moves, bench_apply_and_undo);
criterion_main!(benches);
