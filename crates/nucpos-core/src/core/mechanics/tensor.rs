use ndarray::{ArrayD, IxDyn};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Represents errors that can occur while loading mechanical-model tensors.
#[derive(Debug, Error)]
pub enum TensorLoadError {
    /// A required tensor file is missing or could not be read.
    #[error("Data for mechanical model '{model}' not found at '{path}': {source}", path = path.display())]
    DataNotFound {
        model: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /// A token in the tensor file is not a floating-point number.
    #[error("Malformed value '{token}' at index {index} in '{path}'", path = path.display())]
    MalformedTensor {
        path: PathBuf,
        index: usize,
        token: String,
    },

    /// The flat element count cannot be reshaped to the expected tensor shape.
    #[error("Cannot reshape {found} values from '{path}' into shape {expected:?}", path = path.display())]
    ShapeMismatch {
        path: PathBuf,
        expected: Vec<usize>,
        found: usize,
    },

    /// An already-built tensor does not have the shape a backend requires.
    #[error("The {tensor} tensor has shape {found:?}, expected {expected:?}")]
    IncompatibleTensor {
        tensor: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// A tensor entry is not a usable probability.
    #[error("The {tensor} tensor holds {value} at flat index {index}, expected a probability in {range}")]
    InvalidProbability {
        tensor: &'static str,
        index: usize,
        value: f64,
        range: &'static str,
    },
}

/// Parses whitespace-delimited numeric text into a flat array.
///
/// The `path` is used only for error reporting.
pub fn parse_flat(content: &str, path: &Path) -> Result<Vec<f64>, TensorLoadError> {
    content
        .split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            token
                .parse::<f64>()
                .map_err(|_| TensorLoadError::MalformedTensor {
                    path: path.to_path_buf(),
                    index,
                    token: token.to_string(),
                })
        })
        .collect()
}

/// Reshapes a flat array into `shape`, rejecting any element-count mismatch.
pub fn reshape(
    flat: Vec<f64>,
    shape: &[usize],
    path: &Path,
) -> Result<ArrayD<f64>, TensorLoadError> {
    let expected: usize = shape.iter().product();
    if flat.len() != expected {
        return Err(TensorLoadError::ShapeMismatch {
            path: path.to_path_buf(),
            expected: shape.to_vec(),
            found: flat.len(),
        });
    }
    ArrayD::from_shape_vec(IxDyn(shape), flat).map_err(|_| TensorLoadError::ShapeMismatch {
        path: path.to_path_buf(),
        expected: shape.to_vec(),
        found: expected,
    })
}

/// Reads a tensor file belonging to `model` and reshapes it into `shape`.
pub fn load(path: &Path, model: &str, shape: &[usize]) -> Result<ArrayD<f64>, TensorLoadError> {
    debug!("Loading tensor {:?} with shape {:?}", path, shape);
    let content = std::fs::read_to_string(path).map_err(|e| TensorLoadError::DataNotFound {
        model: model.to_string(),
        path: path.to_path_buf(),
        source: e,
    })?;
    let flat = parse_flat(&content, path)?;
    reshape(flat, shape, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn values(n: usize) -> String {
        (0..n)
            .map(|i| format!("{:.3}", (i % 4) as f64 * 0.1))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn parse_flat_accepts_mixed_whitespace() {
        let flat = parse_flat("0.25 0.5\n0.125\t1e-3\n\n", Path::new("mem")).unwrap();
        assert_eq!(flat, vec![0.25, 0.5, 0.125, 0.001]);
    }

    #[test]
    fn parse_flat_reports_index_of_bad_token() {
        let result = parse_flat("0.1 0.2 abc 0.4", Path::new("bad.nucdist"));
        match result {
            Err(TensorLoadError::MalformedTensor { index, token, .. }) => {
                assert_eq!(index, 2);
                assert_eq!(token, "abc");
            }
            other => panic!("expected MalformedTensor, got {:?}", other),
        }
    }

    #[test]
    fn load_reshapes_588_values_to_147_by_4() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("M_310.nucdist");
        fs::write(&path, values(588)).unwrap();

        let tensor = load(&path, "M", &[147, 4]).unwrap();
        assert_eq!(tensor.shape(), &[147, 4]);
        assert_eq!(tensor[IxDyn(&[0, 1])], 0.1);
    }

    #[test]
    fn load_rejects_off_by_one_element_counts() {
        let dir = tempdir().unwrap();
        for n in [587, 589] {
            let path = dir.path().join(format!("M_{}.nucdist", n));
            fs::write(&path, values(n)).unwrap();
            let result = load(&path, "M", &[147, 4]);
            match result {
                Err(TensorLoadError::ShapeMismatch {
                    expected, found, ..
                }) => {
                    assert_eq!(expected, vec![147, 4]);
                    assert_eq!(found, n);
                }
                other => panic!("expected ShapeMismatch for {}, got {:?}", n, other),
            }
        }
    }

    #[test]
    fn load_fails_with_data_not_found_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = load(&dir.path().join("absent.nucdist"), "absent", &[147, 4]);
        assert!(matches!(result, Err(TensorLoadError::DataNotFound { .. })));
    }
}
