//! Compare sequential vs parallel trial batches.
//!
//! Run with: `cargo bench --bench trial_runner`
//! Or quick comparison: `cargo run --release --bin benchmark_parallel_speedup`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use critsim::data::{parse_config, SimulationConfig};
use critsim::parallel::TrialRunner;

const MONK: &str = r#"
attacker:
  base_attack_bonus: 15
  str_mod: 2
  dex_mod: 6
  attacks_per_round: 4
  base_attack_bonus_step: -3
main_hand_weapon:
  crit_range: 2
  crit_multiplier: 2
  base_damage: 1d10
  damage_bonus: 1d6+2
  ranged: false
  finessable: true
  keen: true
feats:
  improved_critical: true
  ki_critical: true
  rapid_shot: true
target:
  armor_class: 25
"#;

fn config() -> SimulationConfig {
    parse_config(MONK).expect("bench config is valid")
}

fn bench_trials_sequential_vs_parallel(c: &mut Criterion) {
    let config = config();
    let trials = 10_000;
    let seed = 42u64;

    let mut group = c.benchmark_group("trial_runner");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("sequential", |b| {
        let runner = TrialRunner::new(&config).sequential();
        b.iter(|| black_box(runner.run(25, trials, seed)));
    });

    group.bench_function("parallel", |b| {
        let runner = TrialRunner::new(&config);
        b.iter(|| black_box(runner.run(25, trials, seed)));
    });

    group.finish();
}

criterion_group!(benches, bench_trials_sequential_vs_parallel);
criterion_main!(benches);
