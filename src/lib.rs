//! Monte Carlo estimate of hit rate, critical rate and damage per round for one attacker
//! against a range of armor classes.

pub mod cli;
pub mod combat;
pub mod data;
pub mod error;
pub mod export_csv;
pub mod logging;
pub mod parallel;
pub mod sweep;

pub use error::SimError;
