use crate::core::models::key::ModelKey;
use ndarray::ArrayView1;
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write landscape report: {0}")]
    Csv(#[from] csv::Error),

    #[error(
        "Landscape '{sequence}' has {probabilities} probabilities but {energies} energies"
    )]
    LengthMismatch {
        sequence: String,
        probabilities: usize,
        energies: usize,
    },
}

#[derive(Debug, Serialize)]
struct LandscapeRow<'a> {
    sequence: &'a str,
    order: usize,
    model: &'a str,
    temperature: &'a str,
    position: usize,
    probability: f64,
    energy: f64,
}

/// Writes landscapes as a tab-separated table, one row per window position.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(inner: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_writer(inner);
        Self { writer }
    }

    pub fn write_landscape(
        &mut self,
        sequence: &str,
        key: &ModelKey,
        probabilities: ArrayView1<'_, f64>,
        energies: ArrayView1<'_, f64>,
    ) -> Result<(), ReportError> {
        if probabilities.len() != energies.len() {
            return Err(ReportError::LengthMismatch {
                sequence: sequence.to_string(),
                probabilities: probabilities.len(),
                energies: energies.len(),
            });
        }

        for (position, (&probability, &energy)) in
            probabilities.iter().zip(energies.iter()).enumerate()
        {
            self.writer.serialize(LandscapeRow {
                sequence,
                order: key.order.get(),
                model: &key.mechanical_model,
                temperature: &key.temperature,
                position,
                probability,
                energy,
            })?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<W, ReportError> {
        self.writer.flush().map_err(csv::Error::from)?;
        self.writer
            .into_inner()
            .map_err(|e| ReportError::Csv(csv::Error::from(e.into_error())))
    }
}
