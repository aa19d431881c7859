pub mod analysis;
pub mod attacker;
pub mod dice;
pub mod engine;
pub mod rng;
pub mod weapon;

pub use analysis::{summarize, StatsError, SummaryStatistics};
pub use attacker::{AttackRoll, Attacker, RAPID_SHOT_PENALTY, TWO_HAND_ATTACK_BONUS};
pub use dice::{evaluate, DiceError, DiceExpr};
pub use engine::{resolve_attack, simulate_round, AttackOutcome, RoundResult};
pub use rng::{derive_seed, DieRoller, Rng};
pub use weapon::{DamageRoll, Weapon, KI_CRITICAL_WIDTH};
