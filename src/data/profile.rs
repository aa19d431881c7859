//! Simulation inputs: attacker, main-hand weapon, feats and target.
//! All of it is loaded once and shared read-only by every trial of a batch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::dice::DiceExpr;

pub const DEFAULT_NAME: &str = "No name given";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub name: String,
    pub attacker: AttackerProfile,
    pub main_hand_weapon: WeaponProfile,
    pub feats: Feats,
    pub target: TargetProfile,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            attacker: AttackerProfile::default(),
            main_hand_weapon: WeaponProfile::default(),
            feats: Feats::default(),
            target: TargetProfile::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackerProfile {
    pub base_attack_bonus: i32,
    pub str_mod: i32,
    pub dex_mod: i32,
    /// Attacks before feats such as rapid shot are counted.
    pub attacks_per_round: u32,
    /// Added once per preceding attack, so usually negative.
    pub base_attack_bonus_step: i32,
}

impl Default for AttackerProfile {
    fn default() -> Self {
        Self {
            base_attack_bonus: 0,
            str_mod: 0,
            dex_mod: 0,
            attacks_per_round: 0,
            base_attack_bonus_step: -5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponProfile {
    /// Width of the threat range: 1 threatens on 20 only, 3 on 18-20.
    pub crit_range: i32,
    pub crit_multiplier: i32,
    pub attack_bonus: i32,
    pub base_damage: DiceExpr,
    pub damage_bonus: DiceExpr,
    pub perm_essence_damage: DiceExpr,
    pub temp_essence_damage: DiceExpr,
    pub additional_damage_1: DiceExpr,
    pub additional_damage_2: DiceExpr,
    pub ranged: bool,
    pub finessable: bool,
    pub apply_two_hand_bonus: bool,
    pub keen: bool,
}

impl WeaponProfile {
    /// Dex drives the attack roll for ranged weapons and one-handed finesse weapons.
    pub fn uses_dexterity(&self) -> bool {
        self.ranged || (self.finessable && !self.apply_two_hand_bonus)
    }

    /// Wielded two-handed without finesse: +2 to hit (melee only) and 1.5x strength damage.
    pub fn two_handed_power(&self) -> bool {
        !self.finessable && self.apply_two_hand_bonus
    }

    /// Every bonus damage slot added on top of the base damage, in roll order.
    pub fn bonus_damage(&self) -> [&DiceExpr; 5] {
        [
            &self.damage_bonus,
            &self.perm_essence_damage,
            &self.temp_essence_damage,
            &self.additional_damage_1,
            &self.additional_damage_2,
        ]
    }
}

impl Default for WeaponProfile {
    fn default() -> Self {
        Self {
            crit_range: 1,
            crit_multiplier: 2,
            attack_bonus: 0,
            base_damage: DiceExpr::dice(1, 8),
            damage_bonus: DiceExpr::ZERO,
            perm_essence_damage: DiceExpr::ZERO,
            temp_essence_damage: DiceExpr::ZERO,
            additional_damage_1: DiceExpr::ZERO,
            additional_damage_2: DiceExpr::ZERO,
            ranged: true,
            finessable: false,
            apply_two_hand_bonus: false,
            keen: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProfile {
    pub armor_class: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feat {
    /// Widens the threat range by the weapon's own width.
    ImprovedCritical,
    /// Widens the threat range by a flat 2.
    KiCritical,
    /// +1 critical multiplier.
    IncreasedMultiplier,
    /// One extra attack at full bonus, -2 to every attack that round.
    RapidShot,
}

impl Feat {
    pub const ALL: [Feat; 4] = [
        Feat::ImprovedCritical,
        Feat::KiCritical,
        Feat::IncreasedMultiplier,
        Feat::RapidShot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImprovedCritical => "improved_critical",
            Self::KiCritical => "ki_critical",
            Self::IncreasedMultiplier => "increased_multiplier",
            Self::RapidShot => "rapid_shot",
        }
    }
}

impl fmt::Display for Feat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed set of feats; unknown names fail deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Feats {
    pub improved_critical: bool,
    pub ki_critical: bool,
    pub increased_multiplier: bool,
    pub rapid_shot: bool,
}

impl Feats {
    pub fn has(&self, feat: Feat) -> bool {
        match feat {
            Feat::ImprovedCritical => self.improved_critical,
            Feat::KiCritical => self.ki_critical,
            Feat::IncreasedMultiplier => self.increased_multiplier,
            Feat::RapidShot => self.rapid_shot,
        }
    }

    pub fn with(mut self, feat: Feat) -> Self {
        match feat {
            Feat::ImprovedCritical => self.improved_critical = true,
            Feat::KiCritical => self.ki_critical = true,
            Feat::IncreasedMultiplier => self.increased_multiplier = true,
            Feat::RapidShot => self.rapid_shot = true,
        }
        self
    }

    pub fn active(&self) -> impl Iterator<Item = Feat> + '_ {
        Feat::ALL.into_iter().filter(move |feat| self.has(*feat))
    }
}
