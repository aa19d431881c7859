//! One combat round (one trial): every scheduled attack resolved in order against a fixed armor class.

use serde::Serialize;

use crate::combat::attacker::{AttackRoll, Attacker};
use crate::combat::rng::DieRoller;
use crate::combat::weapon::{DamageRoll, Weapon};
use crate::data::profile::SimulationConfig;

/// Everything that happened on one attack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttackOutcome {
    /// 1-based position of the attack within the round.
    pub attack: u32,
    pub roll: AttackRoll,
    pub hit: bool,
    /// Threshold in force for this attack; only set on hits.
    pub critical_threat_range: Option<i32>,
    pub critical_threat: bool,
    /// Total of the confirmation roll, when one was made.
    pub critical_confirmation_roll: Option<i32>,
    pub critical_confirmed: bool,
    pub damage: DamageRoll,
    pub damage_multiplier: i32,
    pub final_damage: i32,
}

impl AttackOutcome {
    pub fn natural_roll(&self) -> i32 {
        self.roll.roll
    }

    pub fn attack_total(&self) -> i32 {
        self.roll.total()
    }
}

/// All attacks of one round, in attack order, with running totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoundResult {
    pub attacks: Vec<AttackOutcome>,
    pub hits: u32,
    pub crits: u32,
    pub damage: i64,
}

impl RoundResult {
    fn with_capacity(attacks: usize) -> Self {
        Self {
            attacks: Vec::with_capacity(attacks),
            ..Self::default()
        }
    }

    fn record(&mut self, outcome: AttackOutcome) {
        self.damage += i64::from(outcome.final_damage);
        if outcome.hit {
            self.hits += 1;
        }
        if outcome.critical_confirmed {
            self.crits += 1;
        }
        self.attacks.push(outcome);
    }

    pub fn first_attack_hit(&self) -> bool {
        self.attacks.first().is_some_and(|attack| attack.hit)
    }
}

/// Resolve a single attack: to-hit, then threat and confirmation, then one damage roll on a hit.
pub fn resolve_attack<R: DieRoller + ?Sized>(
    attack: u32,
    penalty: i32,
    armor_class: i32,
    attacker: &Attacker<'_>,
    weapon: &Weapon<'_>,
    rng: &mut R,
) -> AttackOutcome {
    let roll = attacker.roll_attack(penalty, rng);
    let mut outcome = AttackOutcome {
        attack,
        roll,
        damage_multiplier: 1,
        ..AttackOutcome::default()
    };

    if !attacker.hits(&roll, armor_class) {
        return outcome;
    }
    outcome.hit = true;

    let threat_range = weapon.modified_critical_threat();
    outcome.critical_threat_range = Some(threat_range);
    outcome.critical_threat = attacker.is_critical_threat(&roll, threat_range);

    if outcome.critical_threat {
        let confirmation = attacker.roll_attack(0, rng);
        outcome.critical_confirmation_roll = Some(confirmation.total());
        if attacker.crit_confirmed(&confirmation, armor_class) {
            outcome.critical_confirmed = true;
            outcome.damage_multiplier = weapon.modified_crit_multiplier();
        }
    }

    outcome.damage = weapon.roll_damage(rng);
    outcome.final_damage = outcome.damage.multiplied(outcome.damage_multiplier);
    outcome
}

/// Run one full round. The penalty schedule is computed once and consumed in attack order.
pub fn simulate_round<R: DieRoller + ?Sized>(
    config: &SimulationConfig,
    armor_class: i32,
    rng: &mut R,
) -> RoundResult {
    let attacker = Attacker::new(config);
    let weapon = Weapon::new(config);
    let schedule = attacker.attack_penalty_schedule();
    tracing::trace!(?schedule, armor_class, "attack penalty schedule");

    let mut round = RoundResult::with_capacity(schedule.len());
    for (index, penalty) in schedule.into_iter().enumerate() {
        let outcome = resolve_attack(index as u32 + 1, penalty, armor_class, &attacker, &weapon, rng);
        tracing::trace!(?outcome, "attack resolved");
        round.record(outcome);
    }
    round
}
