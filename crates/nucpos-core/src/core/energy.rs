use ndarray::{Array1, ArrayView1};
use thiserror::Error;

/// Thermal energy used when none is given, i.e. energies in units of kT.
pub const DEFAULT_KT: f64 = 1.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum EnergyError {
    #[error("Probability {probability} at index {index} is outside the domain of ln (must be > 0)")]
    Domain { index: usize, probability: f64 },

    #[error("Thermal energy kT must be finite and positive, got {0}")]
    InvalidThermalEnergy(f64),
}

fn check_kt(kt: f64) -> Result<(), EnergyError> {
    if kt.is_finite() && kt > 0.0 {
        Ok(())
    } else {
        Err(EnergyError::InvalidThermalEnergy(kt))
    }
}

#[inline]
fn in_domain(probability: f64) -> bool {
    !probability.is_nan() && probability > 0.0
}

#[inline]
fn boltzmann_inverse(probability: f64, kt: f64) -> f64 {
    -kt * probability.ln()
}

/// Energy of a single probability, `-kT ln(p)`.
///
/// Non-positive and NaN probabilities are rejected instead of mapping to
/// infinity or NaN.
pub fn energy(probability: f64, kt: f64) -> Result<f64, EnergyError> {
    check_kt(kt)?;
    if !in_domain(probability) {
        return Err(EnergyError::Domain {
            index: 0,
            probability,
        });
    }
    Ok(boltzmann_inverse(probability, kt))
}

/// Elementwise [`energy`] over a probability landscape.
///
/// The first offending element determines the reported index.
pub fn energy_landscape(
    probabilities: ArrayView1<'_, f64>,
    kt: f64,
) -> Result<Array1<f64>, EnergyError> {
    check_kt(kt)?;
    if let Some((index, &probability)) = probabilities
        .iter()
        .enumerate()
        .find(|&(_, &p)| !in_domain(p))
    {
        return Err(EnergyError::Domain { index, probability });
    }
    Ok(probabilities.mapv(|p| boltzmann_inverse(p, kt)))
}
