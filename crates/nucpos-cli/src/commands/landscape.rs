use super::{emit_report, model_key};
use crate::cli::LandscapeArgs;
use crate::config;
use crate::error::Result;
use nucpos::core::io::records::read_fasta_records;
use nucpos::core::mechanics::factory::TensorBackendFactory;
use nucpos::engine::cache::ModelCache;
use nucpos::engine::error::NucposError;
use nucpos::engine::sequence::Sequence;
use nucpos::workflows::landscape::{self, NamedSequence};
use std::path::Path;
use tracing::{debug, info};

const LITERAL_NAME: &str = "input";

pub fn run(args: LandscapeArgs, config_path: Option<&Path>) -> Result<()> {
    let config = config::resolve_for_landscape(config_path, &args.model)?;
    let key = model_key(&args.model)?;
    let sequences = collect_sequences(&args)?;
    debug!("Collected {} sequence(s) for {}", sequences.len(), key);

    let cache = ModelCache::new(TensorBackendFactory::new(config.layout()));
    let results = landscape::run(&sequences, &cache, &key, config.kt)?;
    info!("Computed {} landscape(s).", results.len());

    emit_report(&results, args.model.output.as_deref())
}

fn collect_sequences(args: &LandscapeArgs) -> Result<Vec<NamedSequence>> {
    if let Some(seq) = &args.input.sequence {
        let sequence = Sequence::new(seq.as_str()).map_err(NucposError::from)?;
        return Ok(vec![NamedSequence::new(LITERAL_NAME, sequence)]);
    }

    let mut sequences = Vec::new();
    if let Some(path) = &args.input.fasta {
        for (id, bases) in read_fasta_records(path).map_err(NucposError::from)? {
            let sequence = Sequence::try_from(bases).map_err(NucposError::from)?;
            sequences.push(NamedSequence::new(id, sequence));
        }
    }
    Ok(sequences)
}
