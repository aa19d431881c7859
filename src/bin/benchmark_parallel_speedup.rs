//! Run one trial batch sequentially and once in parallel, then print timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup [config.yaml] [trials]
//!
//! Without a config path a built-in two-handed fighter is used.

use std::env;
use std::process;
use std::time::Instant;

use critsim::combat::summarize;
use critsim::data::{load_config, parse_config, SimulationConfig};
use critsim::parallel::TrialRunner;

const FIGHTER: &str = r#"
name: Built-in fighter
attacker:
  base_attack_bonus: 20
  str_mod: 6
  attacks_per_round: 4
main_hand_weapon:
  crit_range: 2
  base_damage: 2d6
  damage_bonus: 1d6+3
  ranged: false
  apply_two_hand_bonus: true
feats:
  improved_critical: true
  increased_multiplier: true
target:
  armor_class: 30
"#;

fn main() {
    let args: Vec<String> = env::args().collect();
    let loaded = match args.get(1) {
        Some(path) => load_config(path),
        None => parse_config(FIGHTER),
    };
    let config: SimulationConfig = match loaded {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };
    let trials = args
        .get(2)
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(200_000);
    let seed = 12345u64;
    let armor_class = config.target.armor_class;

    println!("Trials: {} ({}) at AC {}", trials, config.name, armor_class);
    println!();

    let t0 = Instant::now();
    let sequential = TrialRunner::new(&config).sequential().run(armor_class, trials, seed);
    let elapsed_seq = t0.elapsed();
    let seq_ms = elapsed_seq.as_secs_f64() * 1000.0;
    println!("Sequential:  {:.2} ms  ({:.1} rounds/s)", seq_ms, trials as f64 / elapsed_seq.as_secs_f64());

    let t0 = Instant::now();
    let parallel = TrialRunner::new(&config).run(armor_class, trials, seed);
    let elapsed_par = t0.elapsed();
    let par_ms = elapsed_par.as_secs_f64() * 1000.0;
    println!("Parallel:    {:.2} ms  ({:.1} rounds/s)", par_ms, trials as f64 / elapsed_par.as_secs_f64());

    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", seq_ms / par_ms);

    match (summarize(&sequential), summarize(&parallel)) {
        (Ok(a), Ok(b)) if a == b => println!("(Results match sequential vs parallel: {:.3} dpr)", a.damage_per_round),
        (Ok(_), Ok(_)) => {
            eprintln!("sequential and parallel summaries differ");
            process::exit(1);
        }
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
