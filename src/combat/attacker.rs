//! To-hit side of an attack: how many attacks a round has, their penalties, and the d20 roll.

use serde::Serialize;

use crate::combat::rng::DieRoller;
use crate::data::profile::{Feat, SimulationConfig};

/// Penalty rapid shot applies to every attack of the round, including its own extra attack.
pub const RAPID_SHOT_PENALTY: i32 = -2;

/// Bonus to hit for a non-finesse melee weapon wielded in two hands.
pub const TWO_HAND_ATTACK_BONUS: i32 = 2;

/// Read-only view of the attacker half of a [SimulationConfig].
#[derive(Debug, Clone, Copy)]
pub struct Attacker<'a> {
    config: &'a SimulationConfig,
}

/// Every term of one attack roll, kept apart so traces show where the total came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttackRoll {
    pub base_attack_bonus: i32,
    /// The unmodified d20.
    pub roll: i32,
    pub penalty: i32,
    /// Dex for ranged and one-handed finesse weapons, otherwise str.
    pub attribute_mod: i32,
    pub weapon_attack_bonus: i32,
    pub two_hand_attack_bonus: i32,
}

impl AttackRoll {
    pub fn total(&self) -> i32 {
        self.base_attack_bonus
            + self.roll
            + self.penalty
            + self.attribute_mod
            + self.weapon_attack_bonus
            + self.two_hand_attack_bonus
    }
}

impl<'a> Attacker<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { config }
    }

    /// Attacks per round before feats are counted.
    pub fn attacks_per_round(&self) -> u32 {
        self.config.attacker.attacks_per_round
    }

    /// Attacks granted on top of [Attacker::attacks_per_round] by feats.
    pub fn extra_attacks(&self) -> u32 {
        let mut extra = 0;
        if self.config.feats.has(Feat::RapidShot) {
            extra += 1;
        }
        extra
    }

    pub fn total_attacks(&self) -> u32 {
        self.attacks_per_round() + self.extra_attacks()
    }

    fn global_penalty(&self) -> i32 {
        if self.config.feats.has(Feat::RapidShot) {
            RAPID_SHOT_PENALTY
        } else {
            0
        }
    }

    /// One penalty per base attack: `i * base_attack_bonus_step` plus any round-wide penalty.
    pub fn base_attack_penalty_schedule(&self) -> Vec<i32> {
        let step = self.config.attacker.base_attack_bonus_step;
        let global = self.global_penalty();
        (0..self.attacks_per_round())
            .map(|i| (i as i32) * step + global)
            .collect()
    }

    /// One penalty per feat-granted attack, in the order the attacks are made.
    pub fn extra_attack_penalty_schedule(&self) -> Vec<i32> {
        let mut schedule = Vec::with_capacity(self.extra_attacks() as usize);
        if self.config.feats.has(Feat::RapidShot) {
            schedule.push(RAPID_SHOT_PENALTY);
        }
        schedule
    }

    /// Base schedule followed by the extra-attack schedule; one entry per attack this round.
    pub fn attack_penalty_schedule(&self) -> Vec<i32> {
        let mut schedule = self.base_attack_penalty_schedule();
        schedule.extend(self.extra_attack_penalty_schedule());
        schedule
    }

    pub fn roll_attack<R: DieRoller + ?Sized>(&self, penalty: i32, rng: &mut R) -> AttackRoll {
        let attacker = &self.config.attacker;
        let weapon = &self.config.main_hand_weapon;

        let attribute_mod = if weapon.uses_dexterity() {
            attacker.dex_mod
        } else {
            attacker.str_mod
        };
        let two_hand_attack_bonus = if !weapon.ranged && weapon.two_handed_power() {
            TWO_HAND_ATTACK_BONUS
        } else {
            0
        };

        AttackRoll {
            base_attack_bonus: attacker.base_attack_bonus,
            roll: rng.roll_die(20) as i32,
            penalty,
            attribute_mod,
            weapon_attack_bonus: weapon.attack_bonus,
            two_hand_attack_bonus,
        }
    }

    /// Natural 1 always misses and natural 20 always hits; otherwise the total must meet the armor class.
    pub fn hits(&self, roll: &AttackRoll, armor_class: i32) -> bool {
        match roll.roll {
            1 => false,
            20 => true,
            _ => roll.total() >= armor_class,
        }
    }

    /// Confirmation has no automatic miss or hit: only the total counts.
    pub fn crit_confirmed(&self, roll: &AttackRoll, armor_class: i32) -> bool {
        roll.total() >= armor_class
    }

    pub fn is_critical_threat(&self, roll: &AttackRoll, threat_threshold: i32) -> bool {
        roll.roll >= threat_threshold
    }
}
