use super::tensor::TensorLoadError;
use crate::core::models::key::Order;
use ndarray::{Array1, ArrayD, IxDyn};
use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LandscapeError {
    #[error("Sequence of length {length} is shorter than the {window}-bp model window")]
    SequenceTooShort { length: usize, window: usize },

    #[error("Invalid nucleotide {byte:?} at position {position}")]
    InvalidNucleotide { position: usize, byte: char },
}

/// A numerical object bound to one mechanical-model configuration.
///
/// Implementations are immutable after construction and are shared between
/// callers through `Arc`, so queries must be safe to run concurrently.
pub trait Backend: Send + Sync {
    /// Number of base pairs covered by one nucleosome window.
    fn window(&self) -> usize;

    /// Computes one probability per window start of `sequence`.
    ///
    /// # Errors
    ///
    /// Fails with [`LandscapeError::SequenceTooShort`] if `sequence` is shorter
    /// than [`Backend::window`], or with [`LandscapeError::InvalidNucleotide`] if
    /// it contains anything other than `A`, `C`, `G` or `T`.
    fn probability_landscape(&self, sequence: &[u8]) -> Result<Array1<f64>, LandscapeError>;
}

/// Maps a nucleotide to its tensor axis index (`A`, `C`, `G`, `T`), ignoring case.
#[inline]
pub fn nucleotide_index(byte: u8) -> Option<usize> {
    match byte.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

fn encode(sequence: &[u8]) -> Result<Vec<usize>, LandscapeError> {
    sequence
        .iter()
        .enumerate()
        .map(|(position, &byte)| {
            nucleotide_index(byte).ok_or(LandscapeError::InvalidNucleotide {
                position,
                byte: byte as char,
            })
        })
        .collect()
}

/// Markov-chain backend over position-dependent oligonucleotide probabilities.
///
/// The probability of a window is the product of the long-range (order `k`)
/// probabilities of every overlapping k-mer, divided by the short-range
/// (order `k - 1`) probabilities of the overlaps between neighbouring k-mers.
#[derive(Debug, Clone)]
pub struct MarkovBackend {
    order: Order,
    window: usize,
    long_range: ArrayD<f64>,
    short_range: Option<ArrayD<f64>>,
}

impl MarkovBackend {
    /// Binds the tensors to `order` and `window`, validating their shapes.
    pub fn new(
        order: Order,
        window: usize,
        long_range: ArrayD<f64>,
        short_range: Option<ArrayD<f64>>,
    ) -> Result<Self, TensorLoadError> {
        if window < order.get() {
            return Err(TensorLoadError::IncompatibleTensor {
                tensor: "long-range",
                expected: vec![order.get()],
                found: vec![window],
            });
        }
        check_shape("long-range", &long_range, &order.long_range_shape(window))?;
        check_values("long-range", &long_range, false)?;
        match (order.short_range_shape(window), &short_range) {
            (Some(expected), Some(tensor)) => {
                check_shape("short-range", tensor, &expected)?;
                check_values("short-range", tensor, true)?;
            }
            (Some(expected), None) => {
                return Err(TensorLoadError::IncompatibleTensor {
                    tensor: "short-range",
                    expected,
                    found: Vec::new(),
                });
            }
            (None, Some(tensor)) => {
                return Err(TensorLoadError::IncompatibleTensor {
                    tensor: "short-range",
                    expected: Vec::new(),
                    found: tensor.shape().to_vec(),
                });
            }
            (None, None) => {}
        }

        Ok(Self {
            order,
            window,
            long_range,
            short_range,
        })
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn long_range(&self) -> &ArrayD<f64> {
        &self.long_range
    }

    pub fn short_range(&self) -> Option<&ArrayD<f64>> {
        self.short_range.as_ref()
    }

    fn window_probability(&self, codes: &[usize]) -> f64 {
        let k = self.order.get();
        let mut index = vec![0usize; k + 1];
        let mut log_p = 0.0;

        for position in 0..=(self.window - k) {
            index[0] = position;
            index[1..].copy_from_slice(&codes[position..position + k]);
            let p = self.long_range[IxDyn(&index)];
            if p <= 0.0 {
                return 0.0;
            }
            log_p += p.ln();
        }

        if let Some(short) = &self.short_range {
            for position in 1..=(self.window - k) {
                index[0] = position;
                index[1..k].copy_from_slice(&codes[position..position + k - 1]);
                log_p -= short[IxDyn(&index[..k])].ln();
            }
        }

        log_p.exp()
    }
}

fn check_shape(
    tensor: &'static str,
    array: &ArrayD<f64>,
    expected: &[usize],
) -> Result<(), TensorLoadError> {
    if array.shape() != expected {
        return Err(TensorLoadError::IncompatibleTensor {
            tensor,
            expected: expected.to_vec(),
            found: array.shape().to_vec(),
        });
    }
    Ok(())
}

/// Rejects non-finite entries and entries outside `[0, 1]`, or `(0, 1]` when
/// the tensor is used as a divisor.
fn check_values(
    tensor: &'static str,
    array: &ArrayD<f64>,
    divisor: bool,
) -> Result<(), TensorLoadError> {
    let lower_ok = |value: f64| if divisor { value > 0.0 } else { value >= 0.0 };
    match array
        .iter()
        .enumerate()
        .find(|&(_, &value)| !(value.is_finite() && lower_ok(value) && value <= 1.0))
    {
        Some((index, &value)) => Err(TensorLoadError::InvalidProbability {
            tensor,
            index,
            value,
            range: if divisor { "(0, 1]" } else { "[0, 1]" },
        }),
        None => Ok(()),
    }
}

impl Backend for MarkovBackend {
    fn window(&self) -> usize {
        self.window
    }

    fn probability_landscape(&self, sequence: &[u8]) -> Result<Array1<f64>, LandscapeError> {
        if sequence.len() < self.window {
            return Err(LandscapeError::SequenceTooShort {
                length: sequence.len(),
                window: self.window,
            });
        }
        let codes = encode(sequence)?;
        let starts = sequence.len() - self.window + 1;

        let probabilities: Vec<f64> = (0..starts)
            .into_par_iter()
            .map(|start| self.window_probability(&codes[start..start + self.window]))
            .collect();

        Ok(Array1::from_vec(probabilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::key::WINDOW_LENGTH;

    const EPSILON: f64 = 1e-12;

    fn uniform(shape: &[usize], value: f64) -> ArrayD<f64> {
        ArrayD::from_elem(IxDyn(shape), value)
    }

    fn mono_backend() -> MarkovBackend {
        let shape = Order::Mono.long_range_shape(WINDOW_LENGTH);
        MarkovBackend::new(Order::Mono, WINDOW_LENGTH, uniform(&shape, 0.25), None).unwrap()
    }

    #[test]
    fn uniform_mono_tensor_gives_quarter_per_base() {
        let backend = mono_backend();
        let sequence = "ACGT".repeat(40);
        let landscape = backend.probability_landscape(sequence.as_bytes()).unwrap();

        assert_eq!(landscape.len(), 160 - 147 + 1);
        let expected = 0.25f64.powi(147);
        for p in landscape.iter() {
            assert!(((p - expected) / expected).abs() < 1e-9);
        }
    }

    #[test]
    fn landscape_of_exact_window_has_one_value() {
        let backend = mono_backend();
        let sequence = "A".repeat(147);
        let landscape = backend.probability_landscape(sequence.as_bytes()).unwrap();
        assert_eq!(landscape.len(), 1);
    }

    #[test]
    fn short_sequence_is_rejected() {
        let backend = mono_backend();
        let result = backend.probability_landscape("ACGT".as_bytes());
        assert_eq!(
            result,
            Err(LandscapeError::SequenceTooShort {
                length: 4,
                window: 147
            })
        );
    }

    #[test]
    fn non_acgt_bytes_are_rejected_with_position() {
        let backend = mono_backend();
        let mut sequence = "A".repeat(150);
        sequence.replace_range(10..11, "N");
        let result = backend.probability_landscape(sequence.as_bytes());
        assert_eq!(
            result,
            Err(LandscapeError::InvalidNucleotide {
                position: 10,
                byte: 'N'
            })
        );
    }

    #[test]
    fn lowercase_nucleotides_are_accepted() {
        let backend = mono_backend();
        let sequence = "acgt".repeat(40);
        assert!(backend.probability_landscape(sequence.as_bytes()).is_ok());
    }

    #[test]
    fn position_dependent_mono_tensor_scores_matching_window() {
        let shape = Order::Mono.long_range_shape(WINDOW_LENGTH);
        let mut long = uniform(&shape, 0.0);
        for position in 0..WINDOW_LENGTH {
            long[IxDyn(&[position, 0])] = 1.0;
        }
        let backend = MarkovBackend::new(Order::Mono, WINDOW_LENGTH, long, None).unwrap();

        let mut sequence = "A".repeat(147);
        sequence.push('C');
        let landscape = backend.probability_landscape(sequence.as_bytes()).unwrap();
        assert!((landscape[0] - 1.0).abs() < EPSILON);
        assert_eq!(landscape[1], 0.0);
    }

    #[test]
    fn dinucleotide_chain_cancels_to_uniform_probability() {
        let long_shape = Order::Di.long_range_shape(WINDOW_LENGTH);
        let short_shape = Order::Di.short_range_shape(WINDOW_LENGTH).unwrap();
        let backend = MarkovBackend::new(
            Order::Di,
            WINDOW_LENGTH,
            uniform(&long_shape, 1.0 / 16.0),
            Some(uniform(&short_shape, 0.25)),
        )
        .unwrap();

        let sequence = "GATTACA".repeat(25);
        let landscape = backend.probability_landscape(sequence.as_bytes()).unwrap();
        let expected = 0.25f64.powi(147);
        for p in landscape.iter() {
            assert!(((p - expected) / expected).abs() < 1e-9);
        }
    }

    #[test]
    fn construction_rejects_values_that_are_not_probabilities() {
        let shape = Order::Mono.long_range_shape(WINDOW_LENGTH);
        for bad in [f64::NAN, -0.1, 1.5, f64::INFINITY] {
            let mut long = uniform(&shape, 0.25);
            long[IxDyn(&[3, 2])] = bad;
            let result = MarkovBackend::new(Order::Mono, WINDOW_LENGTH, long, None);
            assert!(matches!(
                result,
                Err(TensorLoadError::InvalidProbability {
                    tensor: "long-range",
                    index: 14,
                    ..
                })
            ));
        }
    }

    #[test]
    fn zero_in_short_range_tensor_is_rejected() {
        let long_shape = Order::Di.long_range_shape(WINDOW_LENGTH);
        let short_shape = Order::Di.short_range_shape(WINDOW_LENGTH).unwrap();
        let mut short = uniform(&short_shape, 0.25);
        short[IxDyn(&[5, 1])] = 0.0;

        let result = MarkovBackend::new(
            Order::Di,
            WINDOW_LENGTH,
            uniform(&long_shape, 1.0 / 16.0),
            Some(short),
        );
        assert!(matches!(
            result,
            Err(TensorLoadError::InvalidProbability {
                tensor: "short-range",
                ..
            })
        ));
    }

    #[test]
    fn window_shorter_than_order_is_rejected() {
        let result = MarkovBackend::new(
            Order::Tri,
            1,
            uniform(&[1, 4, 4, 4], 1.0 / 64.0),
            Some(uniform(&[1, 4, 4], 1.0 / 16.0)),
        );
        assert!(matches!(
            result,
            Err(TensorLoadError::IncompatibleTensor { .. })
        ));
    }

    #[test]
    fn construction_rejects_wrong_shapes() {
        let result = MarkovBackend::new(
            Order::Mono,
            WINDOW_LENGTH,
            uniform(&[146, 4], 0.25),
            None,
        );
        assert!(matches!(
            result,
            Err(TensorLoadError::IncompatibleTensor {
                tensor: "long-range",
                ..
            })
        ));

        let long_shape = Order::Tri.long_range_shape(WINDOW_LENGTH);
        let result = MarkovBackend::new(
            Order::Tri,
            WINDOW_LENGTH,
            uniform(&long_shape, 1.0 / 64.0),
            None,
        );
        assert!(matches!(
            result,
            Err(TensorLoadError::IncompatibleTensor {
                tensor: "short-range",
                ..
            })
        ));
    }
}
