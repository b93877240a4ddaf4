use super::{emit_report, model_key};
use crate::cli::InsertArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::parser;
use nucpos::core::io::genome::{Genome, InMemoryGenome, IndexedFastaGenome};
use nucpos::core::io::insertion::load_insertion;
use nucpos::core::mechanics::factory::TensorBackendFactory;
use nucpos::engine::cache::ModelCache;
use nucpos::engine::error::NucposError;
use nucpos::engine::inserted::InsertedSequence;
use nucpos::workflows::landscape::{self, NamedSequence};
use std::path::Path;
use tracing::{debug, info};

pub fn run(args: InsertArgs, config_path: Option<&Path>) -> Result<()> {
    let config = config::resolve_for_insert(config_path, &args)?;
    let key = model_key(&args.model)?;
    let site = parser::parse_site(&args.site)?;

    let genome_path = config.genome_path.as_deref().ok_or_else(|| {
        CliError::Config("No genome configured. Pass --genome or set 'genome'.".to_string())
    })?;
    let genome = open_genome(genome_path)?;

    let payload = load_insertion(&config.layout(), &args.insertion, &args.barcode)
        .map_err(NucposError::from)?;
    let inserted = InsertedSequence::new(
        &payload,
        &*genome,
        &site.chromosome,
        site.cut_site,
        config.flanks,
    )?;
    info!(
        "Inserted '{}' at {}:{} ({} bp).",
        args.insertion,
        site.chromosome,
        site.cut_site,
        inserted.sequence().len()
    );

    let name = format!("{}@{}:{}", args.insertion, site.chromosome, site.cut_site);
    let sequences = vec![NamedSequence::new(name, inserted.into_sequence())];
    let cache = ModelCache::new(TensorBackendFactory::new(config.layout()));
    let results = landscape::run(&sequences, &cache, &key, config.kt)?;

    emit_report(&results, args.model.output.as_deref())
}

/// Uses the `.fai` index next to `path` when present, else loads the whole file.
fn open_genome(path: &Path) -> Result<Box<dyn Genome>> {
    let mut index = path.as_os_str().to_owned();
    index.push(".fai");
    let genome: Box<dyn Genome> = if Path::new(&index).exists() {
        debug!("Using FASTA index for {:?}", path);
        Box::new(IndexedFastaGenome::open(path).map_err(NucposError::from)?)
    } else {
        debug!("No FASTA index for {:?}, loading into memory", path);
        Box::new(InMemoryGenome::from_fasta(path).map_err(NucposError::from)?)
    };
    Ok(genome)
}
