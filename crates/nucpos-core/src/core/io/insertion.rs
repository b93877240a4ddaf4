use super::layout::DataLayout;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Number of `N` placeholders marking the barcode slot of an insertion.
pub const BARCODE_LENGTH: usize = 20;
const PLACEHOLDER: u8 = b'N';

#[derive(Debug, Error)]
pub enum InsertionError {
    #[error("Insertion '{name}' not found at '{path}': {source}", path = path.display())]
    InsertionNotFound {
        name: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "Insertion '{name}' has no run of {expected} '{placeholder}' placeholders for a barcode of length {barcode_len}",
        expected = BARCODE_LENGTH,
        placeholder = PLACEHOLDER as char
    )]
    PlaceholderNotFound { name: String, barcode_len: usize },

    #[error(
        "Flanks {left}/{right} around cut site {cut_site} exceed chromosome '{chromosome}' of length {length}"
    )]
    OutOfRange {
        chromosome: String,
        cut_site: u64,
        left: u64,
        right: u64,
        length: u64,
    },
}

/// Loads `{sequences_root}/{name}.seq` and writes `barcode` into its
/// placeholder run.
///
/// Whitespace in the file is dropped. Every non-overlapping run of
/// [`BARCODE_LENGTH`] `N`s is replaced, scanning left to right.
pub fn load_insertion(
    layout: &DataLayout,
    name: &str,
    barcode: &str,
) -> Result<String, InsertionError> {
    let path = layout.insertion_path(name);
    debug!("Loading insertion '{}' from {:?}", name, path);
    let content = std::fs::read_to_string(&path).map_err(|e| InsertionError::InsertionNotFound {
        name: name.to_string(),
        path: path.clone(),
        source: e,
    })?;
    substitute_barcode(name, &content, barcode)
}

/// Replaces the placeholder run(s) in `template` with `barcode`.
pub fn substitute_barcode(
    name: &str,
    template: &str,
    barcode: &str,
) -> Result<String, InsertionError> {
    let placeholder_missing = || InsertionError::PlaceholderNotFound {
        name: name.to_string(),
        barcode_len: barcode.len(),
    };
    if barcode.len() != BARCODE_LENGTH {
        return Err(placeholder_missing());
    }

    let sequence: String = template
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let placeholder = (PLACEHOLDER as char).to_string().repeat(BARCODE_LENGTH);
    if !sequence.contains(&placeholder) {
        return Err(placeholder_missing());
    }
    Ok(sequence.replace(&placeholder, barcode))
}
