use crate::core::energy::{self, DEFAULT_KT};
use crate::core::io::report::ReportWriter;
use crate::core::mechanics::factory::BackendFactory;
use crate::core::models::key::ModelKey;
use crate::engine::cache::ModelCache;
use crate::engine::error::NucposError;
use crate::engine::sequence::Sequence;
use ndarray::Array1;
use rayon::prelude::*;
use std::io::Write;
use std::sync::Arc;
use tracing::{info, instrument};

/// A sequence tagged with the name it is reported under.
#[derive(Debug)]
pub struct NamedSequence {
    pub name: String,
    pub sequence: Sequence,
}

impl NamedSequence {
    pub fn new(name: impl Into<String>, sequence: Sequence) -> Self {
        Self {
            name: name.into(),
            sequence,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LandscapeResult {
    pub name: String,
    pub key: ModelKey,
    pub probabilities: Arc<Array1<f64>>,
    pub energies: Arc<Array1<f64>>,
}

/// Computes probability and energy landscapes for every sequence under `key`.
///
/// Sequences are processed in parallel and share one backend from `cache`.
/// Energies at the default kT come from each sequence's memo; any other kT is
/// transformed directly from the probabilities.
#[instrument(skip_all, name = "landscape_workflow", fields(key = %key, sequences = sequences.len()))]
pub fn run<F: BackendFactory>(
    sequences: &[NamedSequence],
    cache: &ModelCache<F>,
    key: &ModelKey,
    kt: f64,
) -> Result<Vec<LandscapeResult>, NucposError> {
    info!("Computing landscapes for {} sequence(s).", sequences.len());
    cache.get_or_create(key)?;

    let results = sequences
        .par_iter()
        .map(|named| {
            let probabilities = named.sequence.probability(cache, key)?;
            let energies = if kt == DEFAULT_KT {
                named.sequence.energy(cache, key)?
            } else {
                Arc::new(energy::energy_landscape(probabilities.view(), kt)?)
            };
            Ok(LandscapeResult {
                name: named.name.clone(),
                key: key.clone(),
                probabilities,
                energies,
            })
        })
        .collect::<Result<Vec<_>, NucposError>>()?;

    info!("Landscape workflow complete.");
    Ok(results)
}

/// Writes `results` as one tab-separated report.
pub fn write_report<W: Write>(results: &[LandscapeResult], writer: W) -> Result<W, NucposError> {
    let mut report = ReportWriter::new(writer);
    for result in results {
        report.write_landscape(
            &result.name,
            &result.key,
            result.probabilities.view(),
            result.energies.view(),
        )?;
    }
    Ok(report.finish()?)
}
