use super::cache::ModelCache;
use super::error::NucposError;
use crate::core::energy::{self, DEFAULT_KT};
use crate::core::mechanics::backend::Backend;
use crate::core::mechanics::factory::BackendFactory;
use crate::core::models::key::ModelKey;
use ndarray::Array1;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SequenceError {
    #[error("Invalid sequence input: {0}")]
    InvalidInput(String),
}

type Landscape = Arc<Array1<f64>>;
type Slot = Arc<Mutex<Option<Landscape>>>;

/// Per-key memo slots; the map lock only guards slot lookup.
#[derive(Default)]
struct Memo {
    slots: Mutex<HashMap<ModelKey, Slot>>,
}

impl Memo {
    fn slot(&self, key: &ModelKey) -> Slot {
        let mut slots = self.slots.lock();
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    fn filled_keys(&self) -> Vec<ModelKey> {
        let slots: Vec<_> = self
            .slots
            .lock()
            .iter()
            .map(|(key, slot)| (key.clone(), Arc::clone(slot)))
            .collect();
        slots
            .into_iter()
            .filter(|(_, slot)| slot.lock().is_some())
            .map(|(key, _)| key)
            .collect()
    }

    /// Returns the landscape for `key`, running `compute` only if it is absent.
    ///
    /// The key's slot stays locked while `compute` runs, so a concurrent request
    /// for the same key waits instead of recomputing. Other keys are unaffected.
    fn get_or_try_insert(
        &self,
        key: &ModelKey,
        compute: impl FnOnce() -> Result<Array1<f64>, NucposError>,
    ) -> Result<Landscape, NucposError> {
        let slot = self.slot(key);
        let mut entry = slot.lock();
        if let Some(landscape) = entry.as_ref() {
            trace!("Memo hit for {}", key);
            return Ok(Arc::clone(landscape));
        }
        let landscape = Arc::new(compute()?);
        *entry = Some(Arc::clone(&landscape));
        Ok(landscape)
    }
}

/// A nucleotide string with lazily computed, memoized landscapes.
///
/// Memoization is per instance and keyed by [`ModelKey`]; the backends
/// themselves come from the shared [`ModelCache`] passed to each query.
pub struct Sequence {
    seq: String,
    probabilities: Memo,
    energies: Memo,
}

impl Sequence {
    /// Wraps `seq`, which must be non-empty ASCII letters.
    pub fn new(seq: impl Into<String>) -> Result<Self, SequenceError> {
        let seq = seq.into();
        if seq.is_empty() {
            return Err(SequenceError::InvalidInput(
                "sequence must not be empty".to_string(),
            ));
        }
        if let Some((position, c)) = seq
            .char_indices()
            .find(|(_, c)| !c.is_ascii_alphabetic())
        {
            return Err(SequenceError::InvalidInput(format!(
                "non-nucleotide character {:?} at position {}",
                c, position
            )));
        }
        Ok(Self {
            seq,
            probabilities: Memo::default(),
            energies: Memo::default(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.seq
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Keys for which a probability landscape has been memoized, sorted.
    pub fn cached_keys(&self) -> Vec<ModelKey> {
        let mut keys = self.probabilities.filled_keys();
        keys.sort();
        keys
    }

    /// Probability landscape for `key`, computed at most once per instance.
    pub fn probability<F: BackendFactory>(
        &self,
        cache: &ModelCache<F>,
        key: &ModelKey,
    ) -> Result<Landscape, NucposError> {
        self.probabilities.get_or_try_insert(key, || {
            let backend = cache.get_or_create(key)?;
            Ok(backend.probability_landscape(self.seq.as_bytes())?)
        })
    }

    /// Energy landscape for `key` at kT = 1, derived from [`Sequence::probability`].
    pub fn energy<F: BackendFactory>(
        &self,
        cache: &ModelCache<F>,
        key: &ModelKey,
    ) -> Result<Landscape, NucposError> {
        self.energies.get_or_try_insert(key, || {
            let probabilities = self.probability(cache, key)?;
            Ok(energy::energy_landscape(probabilities.view(), DEFAULT_KT)?)
        })
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("seq", &self.seq)
            .field("cached", &self.probabilities.filled_keys().len())
            .finish()
    }
}

impl FromStr for Sequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<Vec<u8>> for Sequence {
    type Error = SequenceError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        let seq = String::from_utf8(bytes)
            .map_err(|e| SequenceError::InvalidInput(format!("not valid UTF-8: {}", e)))?;
        Self::new(seq)
    }
}

impl TryFrom<&[u8]> for Sequence {
    type Error = SequenceError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mechanics::tensor::TensorLoadError;
    use crate::core::models::key::Order;
    use crate::engine::cache::tests::CountingFactory;
    use std::sync::atomic::Ordering;
    use std::thread;

    fn key() -> ModelKey {
        ModelKey::new(Order::Di, "crick", "310")
    }

    fn queries(cache: &ModelCache<CountingFactory>) -> usize {
        cache
            .get_or_create(&key())
            .unwrap()
            .queries
            .load(Ordering::SeqCst)
    }

    #[test]
    fn construction_validates_input() {
        assert!(Sequence::new("ACGTacgt").is_ok());
        assert!(matches!(
            Sequence::new(""),
            Err(SequenceError::InvalidInput(_))
        ));
        assert!(matches!(
            Sequence::new("ACGT 1"),
            Err(SequenceError::InvalidInput(_))
        ));
        assert!(matches!(
            Sequence::try_from(vec![0x41, 0xff, 0x43]),
            Err(SequenceError::InvalidInput(_))
        ));
        let parsed: Sequence = "GATTACA".parse().unwrap();
        assert_eq!(parsed.as_str(), "GATTACA");
        assert_eq!(parsed.len(), 7);
    }

    #[test]
    fn probability_is_memoized_per_key() {
        let cache = ModelCache::new(CountingFactory::default());
        let sequence = Sequence::new("ACGTACGT").unwrap();

        let first = sequence.probability(&cache, &key()).unwrap();
        let second = sequence.probability(&cache, &key()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 6);
        assert_eq!(queries(&cache), 1);
        assert_eq!(sequence.cached_keys(), vec![key()]);
    }

    #[test]
    fn energy_is_derived_once_from_probability() {
        let cache = ModelCache::new(CountingFactory::default());
        let sequence = Sequence::new("ACGTACGT").unwrap();

        let energies = sequence.energy(&cache, &key()).unwrap();
        let again = sequence.energy(&cache, &key()).unwrap();
        let _ = sequence.probability(&cache, &key()).unwrap();

        assert!(Arc::ptr_eq(&energies, &again));
        assert!(energies
            .iter()
            .all(|&e| (e - std::f64::consts::LN_2).abs() < 1e-12));
        assert_eq!(queries(&cache), 1);
    }

    #[test]
    fn memo_is_local_but_backends_are_shared() {
        let cache = ModelCache::new(CountingFactory::default());
        let a = Sequence::new("ACGTACGT").unwrap();
        let b = Sequence::new("TTTTGGGG").unwrap();

        a.probability(&cache, &key()).unwrap();
        b.probability(&cache, &key()).unwrap();

        assert_eq!(queries(&cache), 2);
        assert_eq!(cache.factory().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn shared_sequence_computes_each_key_once_across_threads() {
        let cache = ModelCache::new(CountingFactory::default());
        let sequence = Sequence::new("ACGTACGTACGT").unwrap();

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| sequence.energy(&cache, &key()).unwrap());
            }
        });

        assert_eq!(queries(&cache), 1);
    }

    #[test]
    fn backend_failure_is_propagated_and_not_memoized() {
        let cache = ModelCache::new(CountingFactory::default());
        let sequence = Sequence::new("ACGTACGT").unwrap();
        let missing = ModelKey::new(Order::Di, "missing", "310");

        let result = sequence.probability(&cache, &missing);
        assert!(matches!(
            result,
            Err(NucposError::Backend(TensorLoadError::DataNotFound { .. }))
        ));
        assert!(sequence.cached_keys().is_empty());
    }

    #[test]
    fn shared_sequence_serves_many_keys_from_a_rayon_pool() {
        use crate::core::io::layout::DataLayout;
        use crate::core::mechanics::factory::TensorBackendFactory;
        use rayon::prelude::*;
        use std::fs;

        let dir = tempfile::tempdir().unwrap();
        let models = dir.path().join("mechanical_models");
        fs::create_dir_all(&models).unwrap();
        let keys: Vec<_> = (0..32)
            .map(|i| {
                let name = format!("m{}", i);
                fs::write(
                    models.join(format!("{}_310.nucdist", name)),
                    vec!["0.25"; 588].join(" "),
                )
                .unwrap();
                ModelKey::new(Order::Mono, name, "310")
            })
            .collect();
        let cache = ModelCache::new(TensorBackendFactory::new(DataLayout::new(
            dir.path(),
            dir.path(),
        )));
        let sequence = Sequence::new("ACGT".repeat(300)).unwrap();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap();

        let lengths: Vec<usize> = pool.install(|| {
            keys.par_iter()
                .map(|key| sequence.energy(&cache, key).unwrap().len())
                .collect()
        });

        assert!(lengths.iter().all(|&len| len == 1200 - 147 + 1));
        assert_eq!(sequence.cached_keys().len(), keys.len());
        assert_eq!(cache.len(), keys.len());
    }

    #[test]
    fn too_short_sequence_surfaces_landscape_error() {
        let cache = ModelCache::new(CountingFactory::default());
        let sequence = Sequence::new("AC").unwrap();
        assert!(matches!(
            sequence.probability(&cache, &key()),
            Err(NucposError::Landscape(_))
        ));
    }
}
