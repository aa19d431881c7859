//! Fan a batch of independent rounds out across workers and join before returning.

use rayon::prelude::*;

use crate::combat::engine::{simulate_round, RoundResult};
use crate::combat::rng::Rng;
use crate::data::profile::SimulationConfig;
use crate::parallel::pool::WorkerPool;

/// Runs batches of rounds for one configuration. Reusable across every step of a sweep;
/// a dedicated pool is built once and shared by every batch.
#[derive(Debug, Clone)]
pub struct TrialRunner<'a> {
    config: &'a SimulationConfig,
    pool: WorkerPool,
    parallel: bool,
}

impl<'a> TrialRunner<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self {
            config,
            pool: WorkerPool::default(),
            parallel: true,
        }
    }

    pub fn with_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = pool;
        self
    }

    /// Run every trial on the calling thread. Results are identical to the parallel path.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn config(&self) -> &'a SimulationConfig {
        self.config
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// `result[i]` is trial `i`, simulated with `Rng::new(batch_seed + i)`.
    pub fn run(&self, armor_class: i32, trials: usize, batch_seed: u64) -> Vec<RoundResult> {
        tracing::debug!(
            trials,
            armor_class,
            parallel = self.parallel,
            workers = self.pool.workers(),
            "running batch"
        );
        let config = self.config;
        let run_one = |trial: usize| {
            let mut rng = Rng::new(batch_seed.wrapping_add(trial as u64));
            simulate_round(config, armor_class, &mut rng)
        };

        let rounds: Vec<RoundResult> = if self.parallel {
            self.pool
                .install(|| (0..trials).into_par_iter().map(run_one).collect())
        } else {
            (0..trials).map(run_one).collect()
        };
        tracing::debug!(trials = rounds.len(), "batch complete");
        rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::dice::DiceExpr;
    use crate::data::profile::{AttackerProfile, Feat, Feats, WeaponProfile};

    fn archer() -> SimulationConfig {
        SimulationConfig {
            attacker: AttackerProfile {
                base_attack_bonus: 12,
                dex_mod: 5,
                attacks_per_round: 3,
                ..AttackerProfile::default()
            },
            main_hand_weapon: WeaponProfile {
                crit_range: 1,
                crit_multiplier: 3,
                base_damage: DiceExpr::dice(1, 8),
                ..WeaponProfile::default()
            },
            feats: Feats::default().with(Feat::RapidShot),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn returns_one_result_per_trial_in_trial_order() {
        let config = archer();
        let runner = TrialRunner::new(&config);
        let rounds = runner.run(20, 64, 9);
        assert_eq!(rounds.len(), 64);
        for (trial, round) in rounds.iter().enumerate() {
            assert_eq!(round.attacks.len(), 4);
            let mut rng = Rng::new(9 + trial as u64);
            assert_eq!(*round, simulate_round(&config, 20, &mut rng));
        }
    }

    #[test]
    fn parallel_and_sequential_batches_match() {
        let config = archer();
        let parallel = TrialRunner::new(&config)
            .with_pool(WorkerPool::with_workers(4))
            .run(24, 500, 1234);
        let sequential = TrialRunner::new(&config).sequential().run(24, 500, 1234);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn dedicated_pool_is_reused_across_batches() {
        let config = archer();
        let runner = TrialRunner::new(&config).with_pool(WorkerPool::with_workers(2));
        let first = runner.run(20, 100, 7);
        let second = runner.run(21, 100, 8);
        assert!(runner.pool().is_dedicated());
        assert_eq!(runner.pool().workers(), 2);
        assert_eq!(first, TrialRunner::new(&config).sequential().run(20, 100, 7));
        assert_eq!(second, TrialRunner::new(&config).sequential().run(21, 100, 8));
    }

    #[test]
    fn zero_trials_yield_empty_batch() {
        let config = archer();
        assert!(TrialRunner::new(&config).run(20, 0, 1).is_empty());
    }
}
