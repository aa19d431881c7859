//! Damage side of an attack: threat threshold, critical multiplier and the damage roll.

use serde::Serialize;

use crate::combat::rng::DieRoller;
use crate::data::profile::{Feat, SimulationConfig, WeaponProfile};

/// Flat threat widening from ki critical.
pub const KI_CRITICAL_WIDTH: i32 = 2;

#[derive(Debug, Clone, Copy)]
pub struct Weapon<'a> {
    config: &'a SimulationConfig,
}

/// Damage components of one hit, before any critical multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DamageRoll {
    pub base: i32,
    pub strength: i32,
    pub enhancement: i32,
}

impl DamageRoll {
    pub fn total(&self) -> i32 {
        self.base + self.strength + self.enhancement
    }

    pub fn multiplied(&self, multiplier: i32) -> i32 {
        self.total() * multiplier
    }
}

impl<'a> Weapon<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { config }
    }

    pub fn profile(&self) -> &'a WeaponProfile {
        &self.config.main_hand_weapon
    }

    /// Lowest natural roll that threatens a critical. Every widening stacks.
    pub fn modified_critical_threat(&self) -> i32 {
        let weapon = self.profile();
        let feats = &self.config.feats;

        // A width of 1 leaves 20 as the only threat.
        let mut threat = 21 - weapon.crit_range;
        if feats.has(Feat::ImprovedCritical) {
            threat -= weapon.crit_range;
        }
        if feats.has(Feat::KiCritical) {
            threat -= KI_CRITICAL_WIDTH;
        }
        if weapon.keen {
            threat -= weapon.crit_range;
        }
        threat
    }

    pub fn modified_crit_multiplier(&self) -> i32 {
        let mut multiplier = self.profile().crit_multiplier;
        if self.config.feats.has(Feat::IncreasedMultiplier) {
            multiplier += 1;
        }
        multiplier
    }

    /// Strength bonus to damage: none for ranged weapons, 1.5x (truncated) two-handed.
    pub fn strength_damage(&self) -> i32 {
        let weapon = self.profile();
        let str_mod = if weapon.ranged {
            0
        } else {
            self.config.attacker.str_mod
        };
        if weapon.two_handed_power() {
            str_mod * 3 / 2
        } else {
            str_mod
        }
    }

    pub fn roll_damage<R: DieRoller + ?Sized>(&self, rng: &mut R) -> DamageRoll {
        let weapon = self.profile();
        let base = weapon.base_damage.roll(rng);
        let enhancement = weapon
            .bonus_damage()
            .into_iter()
            .map(|expr| expr.roll(rng))
            .sum();
        DamageRoll {
            base,
            strength: self.strength_damage(),
            enhancement,
        }
    }
}
