use crate::core::models::key::{ModelKey, Order};
use std::path::{Path, PathBuf};

const MECHANICAL_MODELS_DIR: &str = "mechanical_models";
const INSERTION_EXTENSION: &str = "seq";

/// Resolves the on-disk locations of tensor files and insertion sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    data_root: PathBuf,
    sequences_root: PathBuf,
}

impl DataLayout {
    pub fn new(data_root: impl Into<PathBuf>, sequences_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            sequences_root: sequences_root.into(),
        }
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn sequences_root(&self) -> &Path {
        &self.sequences_root
    }

    /// `{data_root}/mechanical_models/{model}_{temperature}.{ext}`, with the
    /// extension chosen by `order` rather than by the key's own order so the
    /// short-range file of a key can be addressed too.
    pub fn tensor_path(&self, key: &ModelKey, order: Order) -> PathBuf {
        self.data_root
            .join(MECHANICAL_MODELS_DIR)
            .join(format!("{}.{}", key.file_stem(), order.extension()))
    }

    /// `{sequences_root}/{name}.seq`
    pub fn insertion_path(&self, name: &str) -> PathBuf {
        self.sequences_root
            .join(format!("{}.{}", name, INSERTION_EXTENSION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tensor_paths_follow_model_temperature_extension_scheme() {
        let layout = DataLayout::new("/data", "/data/sequences");
        let key = ModelKey::new(Order::Tri, "crick", "310");

        assert_eq!(
            layout.tensor_path(&key, key.order),
            PathBuf::from("/data/mechanical_models/crick_310.trinucdist")
        );
        assert_eq!(
            layout.tensor_path(&key, Order::Di),
            PathBuf::from("/data/mechanical_models/crick_310.dinucdist")
        );
    }

    #[test]
    fn insertion_paths_use_seq_extension() {
        let layout = DataLayout::new("/data", "/library");
        assert_eq!(
            layout.insertion_path("ins1"),
            PathBuf::from("/library/ins1.seq")
        );
    }
}
