//! Reduce a batch of rounds into summary statistics.

use serde::Serialize;
use thiserror::Error;

use crate::combat::engine::RoundResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("cannot summarize an empty batch")]
    EmptyBatch,
    #[error("batch of {trials} round(s) made no attacks")]
    NoAttacks { trials: usize },
}

/// Percentages are fractions in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub trials: usize,
    pub total_attacks: u64,
    /// Share of rounds whose first attack hit.
    pub first_hit_percentage: f64,
    pub hit_percentage: f64,
    /// Confirmed criticals per attack.
    pub crit_percentage: f64,
    pub total_damage: i64,
    pub damage_per_round: f64,
}

pub fn summarize(rounds: &[RoundResult]) -> Result<SummaryStatistics, StatsError> {
    if rounds.is_empty() {
        return Err(StatsError::EmptyBatch);
    }

    let mut total_attacks = 0u64;
    let mut first_hits = 0u64;
    let mut hits = 0u64;
    let mut crits = 0u64;
    let mut total_damage = 0i64;
    for round in rounds {
        total_attacks += round.attacks.len() as u64;
        if round.first_attack_hit() {
            first_hits += 1;
        }
        hits += u64::from(round.hits);
        crits += u64::from(round.crits);
        total_damage += round.damage;
    }

    if total_attacks == 0 {
        return Err(StatsError::NoAttacks {
            trials: rounds.len(),
        });
    }

    let trials = rounds.len() as f64;
    let attacks = total_attacks as f64;
    Ok(SummaryStatistics {
        trials: rounds.len(),
        total_attacks,
        first_hit_percentage: first_hits as f64 / trials,
        hit_percentage: hits as f64 / attacks,
        crit_percentage: crits as f64 / attacks,
        total_damage,
        damage_per_round: total_damage as f64 / trials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::engine::AttackOutcome;

    fn round(outcomes: &[(bool, bool, i32)]) -> RoundResult {
        let attacks: Vec<_> = outcomes
            .iter()
            .enumerate()
            .map(|(i, &(hit, crit, damage))| AttackOutcome {
                attack: i as u32 + 1,
                hit,
                critical_threat: crit,
                critical_confirmed: crit,
                damage_multiplier: 1,
                final_damage: damage,
                ..AttackOutcome::default()
            })
            .collect();
        RoundResult {
            hits: attacks.iter().filter(|a| a.hit).count() as u32,
            crits: attacks.iter().filter(|a| a.critical_confirmed).count() as u32,
            damage: attacks.iter().map(|a| i64::from(a.final_damage)).sum(),
            attacks,
        }
    }

    #[test]
    fn one_hit_one_miss() {
        let stats = summarize(&[round(&[(true, false, 10)]), round(&[(false, false, 0)])]).unwrap();
        assert_eq!(stats.trials, 2);
        assert_eq!(stats.total_attacks, 2);
        assert_eq!(stats.hit_percentage, 0.5);
        assert_eq!(stats.first_hit_percentage, 0.5);
        assert_eq!(stats.crit_percentage, 0.0);
        assert_eq!(stats.total_damage, 10);
        assert_eq!(stats.damage_per_round, 5.0);
    }

    #[test]
    fn first_hit_only_looks_at_the_first_attack() {
        let stats = summarize(&[
            round(&[(false, false, 0), (true, true, 20)]),
            round(&[(true, false, 8), (false, false, 0)]),
        ])
        .unwrap();
        assert_eq!(stats.total_attacks, 4);
        assert_eq!(stats.first_hit_percentage, 0.5);
        assert_eq!(stats.hit_percentage, 0.5);
        assert_eq!(stats.crit_percentage, 0.25);
        assert_eq!(stats.total_damage, 28);
        assert_eq!(stats.damage_per_round, 14.0);
    }

    #[test]
    fn degenerate_batches_are_errors() {
        assert_eq!(summarize(&[]), Err(StatsError::EmptyBatch));
        assert_eq!(
            summarize(&[RoundResult::default(), RoundResult::default()]),
            Err(StatsError::NoAttacks { trials: 2 })
        );
    }
}
