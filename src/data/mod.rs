pub mod loader;
pub mod profile;

pub use loader::{load_config, parse_config, validate_config, ConfigError};
pub use profile::{AttackerProfile, Feat, Feats, SimulationConfig, TargetProfile, WeaponProfile};
