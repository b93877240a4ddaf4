use super::backend::{Backend, MarkovBackend};
use super::tensor::{self, TensorLoadError};
use crate::core::io::layout::DataLayout;
use crate::core::models::key::{ModelKey, WINDOW_LENGTH};
use tracing::info;

/// Constructs a [`Backend`] for a mechanical-model configuration.
///
/// Construction is expected to be expensive; callers should go through a
/// [`ModelCache`](crate::engine::cache::ModelCache) rather than calling this directly.
pub trait BackendFactory: Send + Sync {
    type Backend: Backend;

    fn create(&self, key: &ModelKey) -> Result<Self::Backend, TensorLoadError>;
}

/// Builds [`MarkovBackend`]s from the tensor files of a [`DataLayout`].
#[derive(Debug, Clone)]
pub struct TensorBackendFactory {
    layout: DataLayout,
    window: usize,
}

impl TensorBackendFactory {
    pub fn new(layout: DataLayout) -> Self {
        Self {
            layout,
            window: WINDOW_LENGTH,
        }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }
}

impl BackendFactory for TensorBackendFactory {
    type Backend = MarkovBackend;

    fn create(&self, key: &ModelKey) -> Result<MarkovBackend, TensorLoadError> {
        let long_path = self.layout.tensor_path(key, key.order);
        let long_range = tensor::load(
            &long_path,
            &key.mechanical_model,
            &key.order.long_range_shape(self.window),
        )?;

        let short_range = match (key.order.lower(), key.order.short_range_shape(self.window)) {
            (Some(lower), Some(shape)) => {
                let short_path = self.layout.tensor_path(key, lower);
                Some(tensor::load(&short_path, &key.mechanical_model, &shape)?)
            }
            _ => None,
        };

        let backend = MarkovBackend::new(key.order, self.window, long_range, short_range)?;
        info!("Constructed mechanical-model backend for {}", key);
        Ok(backend)
    }
}
