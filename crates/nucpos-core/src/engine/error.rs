use thiserror::Error;

use super::config::ConfigError;
use super::sequence::SequenceError;
use crate::core::energy::EnergyError;
use crate::core::io::genome::GenomeError;
use crate::core::io::insertion::InsertionError;
use crate::core::io::records::RecordError;
use crate::core::io::report::ReportError;
use crate::core::mechanics::backend::LandscapeError;
use crate::core::mechanics::tensor::TensorLoadError;
use crate::core::models::key::InvalidOrder;

#[derive(Debug, Error)]
pub enum NucposError {
    #[error("Backend construction failed: {0}")]
    Backend(#[from] TensorLoadError),

    #[error("Landscape computation failed: {0}")]
    Landscape(#[from] LandscapeError),

    #[error("Energy transform failed: {0}")]
    Energy(#[from] EnergyError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Insertion(#[from] InsertionError),

    #[error("Genome access failed: {0}")]
    Genome(#[from] GenomeError),

    #[error(transparent)]
    Order(#[from] InvalidOrder),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Records(#[from] RecordError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
