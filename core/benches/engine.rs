use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use minegrid_core::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::hint::black_box;

fn generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, config) in [
        ("beginner", GameConfig::beginner()),
        ("intermediate", GameConfig::intermediate()),
        ("expert", GameConfig::expert()),
    ] {
        group.bench_function(name, |b| {
            let mut rng = SmallRng::seed_from_u64(0);
            b.iter(|| init_board(black_box(config), &mut rng).unwrap())
        });
    }
    group.finish();
}

fn flood_fill(c: &mut Criterion) {
    // single mine in a corner, first click in the opposite corner opens the whole board
    let layout = MineLayout::from_mine_indices(30, 16, &[0]).unwrap();
    let clock = FixedClock(0);

    c.bench_function("flood_fill_expert_size", |b| {
        let mut rng = SmallRng::seed_from_u64(0);
        b.iter_batched(
            || BoardState::new(layout.clone()),
            |mut state| state.primary_action(black_box(479), &mut rng, &clock).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

fn first_click(c: &mut Criterion) {
    let config = GameConfig::expert();

    c.bench_function("first_click_expert", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter_batched(
            || RandomMinefieldGenerator::from_seed(7).generate(config).unwrap(),
            |layout| {
                let mut state = BoardState::new(layout);
                state.primary_action(black_box(240), &mut rng, &FixedClock(0)).unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, generate, flood_fill, first_click);
criterion_main!(benches);
