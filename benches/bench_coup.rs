use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use coup_engine::{Coup, GameConfig};

fn complete_game(seed: u64) {
    let mut rng = Pcg64::seed_from_u64(seed);
    let mut coup = black_box(Coup::new(&GameConfig::default(), &mut rng).unwrap());
    for _ in 0..1000 {
        let actions = coup.actions();

        let random_action = actions[rng.gen_range(0..actions.len())];

        coup = coup.apply_action(random_action, &mut rng).unwrap();

        if coup.winner().is_some() {
            break;
        }
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("complete_game");
    for seed in [1u64, 7, 42] {
        group.bench_with_input(BenchmarkId::from_parameter(seed), &seed, |b, &seed| {
            b.iter(|| complete_game(seed))
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
