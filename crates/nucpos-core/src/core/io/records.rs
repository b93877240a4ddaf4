use bio::io::fasta;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to read FASTA records from '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Reads `(id, sequence)` pairs from every record of a FASTA file, in order.
pub fn read_fasta_records(path: &Path) -> Result<Vec<(String, Vec<u8>)>, RecordError> {
    let io_error = |e| RecordError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let reader = fasta::Reader::new(File::open(path).map_err(io_error)?);
    reader
        .records()
        .map(|record| {
            let record = record.map_err(io_error)?;
            Ok((record.id().to_string(), record.seq().to_vec()))
        })
        .collect()
}
