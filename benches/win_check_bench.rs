use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mahjong_engine::tile::{Honor, Tile, WinChecker, WinRules};

fn bench_win_check_standard(c: &mut Criterion) {
    // 基本胡牌型（需要回溯换将）
    let hand = vec![
        Tile::Wan(1), Tile::Wan(1), Tile::Wan(1), Tile::Wan(2), Tile::Wan(3),
        Tile::Wan(4), Tile::Wan(5), Tile::Wan(6), Tile::Wan(7), Tile::Wan(8),
        Tile::Wan(9), Tile::Wan(9), Tile::Wan(9), Tile::Wan(5),
    ];

    c.bench_function("win_check_standard", |b| {
        let mut checker = WinChecker::with_cache_size(WinRules::default(), 0);
        b.iter(|| {
            black_box(checker.check_win(black_box(&hand), &[]));
        });
    });

    c.bench_function("win_check_standard_cached", |b| {
        let mut checker = WinChecker::new();
        b.iter(|| {
            black_box(checker.check_win(black_box(&hand), &[]));
        });
    });
}

fn bench_win_check_seven_pairs(c: &mut Criterion) {
    // 七对
    let mut hand = Vec::with_capacity(14);
    for rank in [1, 2, 3, 4, 5, 6, 7] {
        hand.push(Tile::Tong(rank));
        hand.push(Tile::Tong(rank));
    }

    c.bench_function("win_check_seven_pairs", |b| {
        let mut checker = WinChecker::with_cache_size(WinRules::default(), 0);
        b.iter(|| {
            black_box(checker.check_win(black_box(&hand), &[]));
        });
    });
}

fn bench_win_check_thirteen_orphans(c: &mut Criterion) {
    let mut hand = Tile::THIRTEEN_ORPHANS.to_vec();
    hand.push(Tile::Honor(Honor::Red));

    c.bench_function("win_check_thirteen_orphans", |b| {
        let mut checker = WinChecker::with_cache_size(WinRules::default(), 0);
        b.iter(|| {
            black_box(checker.check_win(black_box(&hand), &[]));
        });
    });
}

criterion_group!(
    benches,
    bench_win_check_standard,
    bench_win_check_seven_pairs,
    bench_win_check_thirteen_orphans
);
criterion_main!(benches);
