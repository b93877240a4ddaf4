use bio::io::fasta;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::File;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum GenomeError {
    #[error("Chromosome '{0}' not found in genome")]
    ChromosomeNotFound(String),

    #[error("Region {start}..{end} lies outside chromosome '{chromosome}' of length {length}")]
    RegionOutOfBounds {
        chromosome: String,
        start: u64,
        end: u64,
        length: u64,
    },

    #[error("Genome I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to open FASTA index for '{path}': {message}", path = path.display())]
    Index { path: PathBuf, message: String },
}

/// An indexed nucleotide-sequence provider addressed by chromosome name.
pub trait Genome {
    /// Length of `chromosome` in base pairs.
    fn chromosome_len(&self, chromosome: &str) -> Result<u64, GenomeError>;

    /// Returns the bases of `chromosome` in the half-open `range`.
    fn fetch(&self, chromosome: &str, range: Range<u64>) -> Result<Vec<u8>, GenomeError>;
}

fn check_region(chromosome: &str, range: &Range<u64>, length: u64) -> Result<(), GenomeError> {
    if range.start > range.end || range.end > length {
        return Err(GenomeError::RegionOutOfBounds {
            chromosome: chromosome.to_string(),
            start: range.start,
            end: range.end,
            length,
        });
    }
    Ok(())
}

/// Genome held entirely in memory, keyed by record id.
#[derive(Debug, Default, Clone)]
pub struct InMemoryGenome {
    chromosomes: HashMap<String, Vec<u8>>,
}

impl InMemoryGenome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chromosome: impl Into<String>, sequence: impl Into<Vec<u8>>) {
        self.chromosomes.insert(chromosome.into(), sequence.into());
    }

    /// Reads every record of a FASTA file into memory.
    pub fn from_fasta(path: &Path) -> Result<Self, GenomeError> {
        let io_error = |e| GenomeError::Io {
            path: path.to_path_buf(),
            source: e,
        };
        let reader = fasta::Reader::new(File::open(path).map_err(io_error)?);

        let mut genome = Self::new();
        for record in reader.records() {
            let record = record.map_err(io_error)?;
            genome.insert(record.id(), record.seq());
        }
        info!(
            "Loaded {} chromosome(s) from {:?}",
            genome.chromosomes.len(),
            path
        );
        Ok(genome)
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    fn chromosome(&self, chromosome: &str) -> Result<&[u8], GenomeError> {
        self.chromosomes
            .get(chromosome)
            .map(Vec::as_slice)
            .ok_or_else(|| GenomeError::ChromosomeNotFound(chromosome.to_string()))
    }
}

impl Genome for InMemoryGenome {
    fn chromosome_len(&self, chromosome: &str) -> Result<u64, GenomeError> {
        Ok(self.chromosome(chromosome)?.len() as u64)
    }

    fn fetch(&self, chromosome: &str, range: Range<u64>) -> Result<Vec<u8>, GenomeError> {
        let bases = self.chromosome(chromosome)?;
        check_region(chromosome, &range, bases.len() as u64)?;
        Ok(bases[range.start as usize..range.end as usize].to_vec())
    }
}

/// Genome backed by a FASTA file and its `.fai` index.
///
/// Only the requested regions are read from disk.
pub struct IndexedFastaGenome {
    path: PathBuf,
    lengths: HashMap<String, u64>,
    reader: Mutex<fasta::IndexedReader<File>>,
}

impl IndexedFastaGenome {
    /// Opens `path`, expecting the index at `{path}.fai`.
    pub fn open(path: &Path) -> Result<Self, GenomeError> {
        let path = path.to_path_buf();
        let reader = fasta::IndexedReader::from_file(&path).map_err(|e| GenomeError::Index {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let lengths: HashMap<String, u64> = reader
            .index
            .sequences()
            .into_iter()
            .map(|sequence| (sequence.name, sequence.len))
            .collect();
        debug!("Opened indexed genome {:?} with {} sequences", path, lengths.len());

        Ok(Self {
            path,
            lengths,
            reader: Mutex::new(reader),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Genome for IndexedFastaGenome {
    fn chromosome_len(&self, chromosome: &str) -> Result<u64, GenomeError> {
        self.lengths
            .get(chromosome)
            .copied()
            .ok_or_else(|| GenomeError::ChromosomeNotFound(chromosome.to_string()))
    }

    fn fetch(&self, chromosome: &str, range: Range<u64>) -> Result<Vec<u8>, GenomeError> {
        let length = self.chromosome_len(chromosome)?;
        check_region(chromosome, &range, length)?;
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let io_error = |e| GenomeError::Io {
            path: self.path.clone(),
            source: e,
        };
        let mut reader = self.reader.lock();
        reader
            .fetch(chromosome, range.start, range.end)
            .map_err(io_error)?;
        let mut bases = Vec::with_capacity((range.end - range.start) as usize);
        reader.read(&mut bases).map_err(io_error)?;
        Ok(bases)
    }
}
