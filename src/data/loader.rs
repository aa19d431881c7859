//! Load a [SimulationConfig] from YAML and reject configurations the engine cannot run.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::combat::Attacker;
use crate::combat::dice::DiceExpr;
use crate::data::profile::SimulationConfig;

pub const MAX_CRIT_MULTIPLIER: i32 = 20;
pub const MAX_ATTACKS_PER_ROUND: u32 = 100;
/// Magnitude cap for bonuses, modifiers, armor class and each damage expression.
/// Keeps every attack total and critical damage within `i32`.
pub const MAX_MAGNITUDE: i64 = 1_000_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("attacker makes no attacks per round")]
    NoAttacks,
    #[error("crit_range {0} is outside 1..=20")]
    InvalidCritRange(i32),
    #[error("crit_multiplier {0} is outside 1..={max}", max = MAX_CRIT_MULTIPLIER)]
    InvalidCritMultiplier(i32),
    #[error("attacks_per_round {0} exceeds {max}", max = MAX_ATTACKS_PER_ROUND)]
    TooManyAttacks(u32),
    #[error("{field} {value} is outside -{max}..={max}", max = MAX_MAGNITUDE)]
    OutOfRange { field: &'static str, value: i64 },
    #[error("{field} '{expr}' can roll outside -{max}..={max}", max = MAX_MAGNITUDE)]
    DamageOutOfRange { field: &'static str, expr: DiceExpr },
}

pub fn load_config(path: impl AsRef<Path>) -> Result<SimulationConfig, ConfigError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading config");
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&raw)?;
    tracing::debug!(name = %config.name, "config parsed");
    Ok(config)
}

pub fn parse_config(raw: &str) -> Result<SimulationConfig, ConfigError> {
    // An empty document is a config made entirely of defaults.
    let config: SimulationConfig = if raw.trim().is_empty() {
        SimulationConfig::default()
    } else {
        serde_yaml::from_str(raw)?
    };
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &SimulationConfig) -> Result<(), ConfigError> {
    let weapon = &config.main_hand_weapon;
    if !(1..=20).contains(&weapon.crit_range) {
        return Err(ConfigError::InvalidCritRange(weapon.crit_range));
    }
    if !(1..=MAX_CRIT_MULTIPLIER).contains(&weapon.crit_multiplier) {
        return Err(ConfigError::InvalidCritMultiplier(weapon.crit_multiplier));
    }
    if config.attacker.attacks_per_round > MAX_ATTACKS_PER_ROUND {
        return Err(ConfigError::TooManyAttacks(config.attacker.attacks_per_round));
    }

    let attacker = &config.attacker;
    let numbers = [
        ("base_attack_bonus", attacker.base_attack_bonus),
        ("str_mod", attacker.str_mod),
        ("dex_mod", attacker.dex_mod),
        ("base_attack_bonus_step", attacker.base_attack_bonus_step),
        ("attack_bonus", weapon.attack_bonus),
        ("armor_class", config.target.armor_class),
    ];
    for (field, value) in numbers {
        let value = i64::from(value);
        if value.abs() > MAX_MAGNITUDE {
            return Err(ConfigError::OutOfRange { field, value });
        }
    }

    let damage = [
        ("base_damage", &weapon.base_damage),
        ("damage_bonus", &weapon.damage_bonus),
        ("perm_essence_damage", &weapon.perm_essence_damage),
        ("temp_essence_damage", &weapon.temp_essence_damage),
        ("additional_damage_1", &weapon.additional_damage_1),
        ("additional_damage_2", &weapon.additional_damage_2),
    ];
    for (field, expr) in damage {
        let (low, high) = expr.bounds();
        if low < -MAX_MAGNITUDE || high > MAX_MAGNITUDE {
            return Err(ConfigError::DamageOutOfRange { field, expr: *expr });
        }
    }

    if Attacker::new(config).total_attacks() == 0 {
        return Err(ConfigError::NoAttacks);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::engine::simulate_round;
    use crate::combat::rng::Rng;
    use crate::data::profile::{Feat, DEFAULT_NAME};

    const FIGHTER: &str = r#"
name: Greatsword fighter
attacker:
  base_attack_bonus: 16
  str_mod: 4
  attacks_per_round: 4
main_hand_weapon:
  crit_range: 2
  base_damage: 2d6
  damage_bonus: 3
  additional_damage_1: 1d6
  ranged: false
  apply_two_hand_bonus: true
feats:
  improved_critical: true
target:
  armor_class: 25
"#;

    #[test]
    fn parses_full_document_with_defaults_for_missing_keys() {
        let config = parse_config(FIGHTER).unwrap();
        assert_eq!(config.name, "Greatsword fighter");
        assert_eq!(config.attacker.base_attack_bonus, 16);
        assert_eq!(config.attacker.dex_mod, 0);
        assert_eq!(config.attacker.base_attack_bonus_step, -5);
        assert_eq!(config.main_hand_weapon.base_damage, DiceExpr::dice(2, 6));
        assert_eq!(config.main_hand_weapon.damage_bonus, DiceExpr::Constant(3));
        assert_eq!(config.main_hand_weapon.perm_essence_damage, DiceExpr::ZERO);
        assert_eq!(config.main_hand_weapon.crit_multiplier, 2);
        assert!(!config.main_hand_weapon.ranged);
        assert!(config.feats.has(Feat::ImprovedCritical));
        assert!(!config.feats.has(Feat::RapidShot));
        assert_eq!(config.target.armor_class, 25);
    }

    #[test]
    fn omitted_sections_fall_back_to_defaults() {
        let config = parse_config("attacker:\n  attacks_per_round: 1\n").unwrap();
        assert_eq!(config.name, DEFAULT_NAME);
        assert!(config.main_hand_weapon.ranged);
        assert_eq!(config.main_hand_weapon.base_damage, DiceExpr::dice(1, 8));
        assert_eq!(config.main_hand_weapon.crit_range, 1);
        assert_eq!(config.target.armor_class, 0);
    }

    #[test]
    fn malformed_damage_expression_is_a_parse_error() {
        let raw = "attacker:\n  attacks_per_round: 1\nmain_hand_weapon:\n  base_damage: 2x6\n";
        let err = parse_config(raw).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
        assert!(err.to_string().contains("2x6"), "{err}");
    }

    #[test]
    fn unknown_feat_is_rejected_at_load() {
        let raw = "attacker:\n  attacks_per_round: 1\nfeats:\n  cleave: true\n";
        assert!(matches!(parse_config(raw), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn zero_attacks_rejected_unless_rapid_shot_adds_one() {
        assert!(matches!(parse_config(""), Err(ConfigError::NoAttacks)));
        let config = parse_config("feats:\n  rapid_shot: true\n").unwrap();
        assert_eq!(Attacker::new(&config).total_attacks(), 1);
    }

    #[test]
    fn crit_range_and_multiplier_are_bounded() {
        let wide = "attacker:\n  attacks_per_round: 1\nmain_hand_weapon:\n  crit_range: 21\n";
        assert!(matches!(parse_config(wide), Err(ConfigError::InvalidCritRange(21))));
        let zero = "attacker:\n  attacks_per_round: 1\nmain_hand_weapon:\n  crit_multiplier: 0\n";
        assert!(matches!(parse_config(zero), Err(ConfigError::InvalidCritMultiplier(0))));
    }

    #[test]
    fn oversized_crit_multiplier_is_rejected() {
        let raw = "attacker:\n  base_attack_bonus: 100\n  attacks_per_round: 1\nmain_hand_weapon:\n  crit_range: 20\n  crit_multiplier: 1000000000\n";
        assert!(matches!(
            parse_config(raw),
            Err(ConfigError::InvalidCritMultiplier(1_000_000_000))
        ));
    }

    #[test]
    fn largest_accepted_values_resolve_without_overflow() {
        let raw = r#"
attacker:
  base_attack_bonus: 1000000
  str_mod: 1000000
  dex_mod: 1000000
  attacks_per_round: 100
  base_attack_bonus_step: -1000000
main_hand_weapon:
  crit_range: 20
  crit_multiplier: 20
  attack_bonus: 1000000
  base_damage: 1000000
  damage_bonus: 1000000
  perm_essence_damage: 1000000
  temp_essence_damage: 1000000
  additional_damage_1: 1000000
  additional_damage_2: 1000000
  ranged: false
  apply_two_hand_bonus: true
feats:
  increased_multiplier: true
  rapid_shot: true
target:
  armor_class: -1000000
"#;
        let config = parse_config(raw).unwrap();
        let mut rng = Rng::new(3);
        for _ in 0..20 {
            let round = simulate_round(&config, config.target.armor_class, &mut rng);
            assert_eq!(round.attacks.len(), 101);
            assert!(round.damage > 0);
        }
    }

    #[test]
    fn out_of_range_numbers_name_the_field() {
        let raw = "attacker:\n  attacks_per_round: 1\ntarget:\n  armor_class: 2147483647\n";
        let err = parse_config(raw).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "armor_class",
                value: 2_147_483_647
            }
        ));
        let raw = "attacker:\n  attacks_per_round: 1\nmain_hand_weapon:\n  damage_bonus: 2000d1000\n";
        let err = parse_config(raw).unwrap_err();
        assert!(err.to_string().contains("damage_bonus"), "{err}");
        let raw = "attacker:\n  attacks_per_round: 101\n";
        assert!(matches!(parse_config(raw), Err(ConfigError::TooManyAttacks(101))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}
