use thiserror::Error;

use crate::data::loader::ConfigError;
use crate::export_csv::ReportError;
use crate::sweep::SweepError;

/// Any failure that aborts a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sweep(#[from] SweepError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
