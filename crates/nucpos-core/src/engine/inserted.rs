use super::error::NucposError;
use super::sequence::Sequence;
use crate::core::io::genome::Genome;
use crate::core::io::insertion::InsertionError;
use serde::Deserialize;
use tracing::debug;

/// Default number of genomic bases kept on each side of an insertion.
pub const DEFAULT_FLANK: u64 = 500;

/// Genomic context kept around an inserted payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Flanks {
    pub left: u64,
    pub right: u64,
}

impl Default for Flanks {
    fn default() -> Self {
        Self {
            left: DEFAULT_FLANK,
            right: DEFAULT_FLANK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionSite {
    pub chromosome: String,
    pub cut_site: u64,
    pub flanks: Flanks,
}

/// A [`Sequence`] built by splicing a payload into a genome at a cut site.
///
/// The spliced string is
/// `chromosome[cut_site - left .. cut_site] + payload + chromosome[cut_site .. cut_site + right]`.
#[derive(Debug)]
pub struct InsertedSequence {
    site: InsertionSite,
    sequence: Sequence,
}

impl InsertedSequence {
    pub fn new<G: Genome + ?Sized>(
        payload: &str,
        genome: &G,
        chromosome: &str,
        cut_site: u64,
        flanks: Flanks,
    ) -> Result<Self, NucposError> {
        let length = genome.chromosome_len(chromosome)?;
        let out_of_range = || InsertionError::OutOfRange {
            chromosome: chromosome.to_string(),
            cut_site,
            left: flanks.left,
            right: flanks.right,
            length,
        };

        let start = cut_site.checked_sub(flanks.left).ok_or_else(out_of_range)?;
        let end = cut_site
            .checked_add(flanks.right)
            .filter(|&end| end <= length)
            .ok_or_else(out_of_range)?;

        let mut spliced = genome.fetch(chromosome, start..cut_site)?;
        spliced.extend_from_slice(payload.as_bytes());
        spliced.extend_from_slice(&genome.fetch(chromosome, cut_site..end)?);
        debug!(
            "Spliced {} bp payload into {}:{} ({} bp total)",
            payload.len(),
            chromosome,
            cut_site,
            spliced.len()
        );

        let sequence = Sequence::try_from(spliced)?;
        Ok(Self {
            site: InsertionSite {
                chromosome: chromosome.to_string(),
                cut_site,
                flanks,
            },
            sequence,
        })
    }

    pub fn site(&self) -> &InsertionSite {
        &self.site
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn into_sequence(self) -> Sequence {
        self.sequence
    }
}
