use std::fmt;
use thiserror::Error;

/// Number of base pairs wrapped around a histone octamer.
///
/// Every mechanical-model tensor is laid out over this window: a tensor for
/// oligonucleotide order `k` carries `WINDOW_LENGTH + 1 - k` positions.
pub const WINDOW_LENGTH: usize = 147;

/// Size of the nucleotide alphabet indexed by each trailing tensor axis.
pub const ALPHABET_SIZE: usize = 4;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Invalid oligonucleotide order {0}; expected 1, 2 or 3")]
pub struct InvalidOrder(pub u8);

/// Oligonucleotide order of a mechanical model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Order {
    Mono = 1,
    Di = 2,
    Tri = 3,
}

impl Order {
    pub fn get(self) -> usize {
        self as usize
    }

    /// File extension of the probability tensor for this order.
    pub fn extension(self) -> &'static str {
        match self {
            Order::Mono => "nucdist",
            Order::Di => "dinucdist",
            Order::Tri => "trinucdist",
        }
    }

    /// The order whose tensor supplies the short-range normalisation, if any.
    pub fn lower(self) -> Option<Order> {
        match self {
            Order::Mono => None,
            Order::Di => Some(Order::Mono),
            Order::Tri => Some(Order::Di),
        }
    }

    /// Shape of the long-range tensor: `(window + 1 - order, 4, .., 4)` with
    /// `order` trailing axes.
    pub fn long_range_shape(self, window: usize) -> Vec<usize> {
        tensor_shape(window + 1 - self.get(), self.get())
    }

    /// Shape of the short-range tensor, present only for orders above one.
    pub fn short_range_shape(self, window: usize) -> Option<Vec<usize>> {
        self.lower()
            .map(|lower| tensor_shape(window + 1 - lower.get(), lower.get()))
    }
}

fn tensor_shape(positions: usize, trailing_axes: usize) -> Vec<usize> {
    std::iter::once(positions)
        .chain(std::iter::repeat_n(ALPHABET_SIZE, trailing_axes))
        .collect()
}

impl TryFrom<u8> for Order {
    type Error = InvalidOrder;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Order::Mono),
            2 => Ok(Order::Di),
            3 => Ok(Order::Tri),
            other => Err(InvalidOrder(other)),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Identifies one mechanical-model configuration.
///
/// Used as the key of both the process-wide [`ModelCache`](crate::engine::cache::ModelCache)
/// and the per-sequence landscape memo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelKey {
    pub order: Order,
    pub mechanical_model: String,
    pub temperature: String,
}

impl ModelKey {
    pub fn new(
        order: Order,
        mechanical_model: impl Into<String>,
        temperature: impl ToString,
    ) -> Self {
        Self {
            order,
            mechanical_model: mechanical_model.into(),
            temperature: temperature.to_string(),
        }
    }

    /// File stem shared by all tensor files of this model, `{model}_{temperature}`.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.mechanical_model, self.temperature)
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (order {})", self.file_stem(), self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn order_converts_from_valid_integers_only() {
        assert_eq!(Order::try_from(1), Ok(Order::Mono));
        assert_eq!(Order::try_from(2), Ok(Order::Di));
        assert_eq!(Order::try_from(3), Ok(Order::Tri));
        assert_eq!(Order::try_from(0), Err(InvalidOrder(0)));
        assert_eq!(Order::try_from(4), Err(InvalidOrder(4)));
    }

    #[test]
    fn extensions_follow_oligonucleotide_naming() {
        assert_eq!(Order::Mono.extension(), "nucdist");
        assert_eq!(Order::Di.extension(), "dinucdist");
        assert_eq!(Order::Tri.extension(), "trinucdist");
    }

    #[test]
    fn tensor_shapes_are_determined_by_order_and_window() {
        assert_eq!(Order::Mono.long_range_shape(WINDOW_LENGTH), vec![147, 4]);
        assert_eq!(Order::Mono.short_range_shape(WINDOW_LENGTH), None);
        assert_eq!(Order::Di.long_range_shape(WINDOW_LENGTH), vec![146, 4, 4]);
        assert_eq!(
            Order::Di.short_range_shape(WINDOW_LENGTH),
            Some(vec![147, 4])
        );
        assert_eq!(
            Order::Tri.long_range_shape(WINDOW_LENGTH),
            vec![145, 4, 4, 4]
        );
        assert_eq!(
            Order::Tri.short_range_shape(WINDOW_LENGTH),
            Some(vec![146, 4, 4])
        );
    }

    #[test]
    fn keys_with_equal_fields_hash_to_the_same_entry() {
        let mut map = HashMap::new();
        map.insert(ModelKey::new(Order::Di, "crick", 310), 1);
        map.insert(ModelKey::new(Order::Di, "crick", "310"), 2);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&ModelKey::new(Order::Di, "crick", "310")], 2);
    }

    #[test]
    fn display_includes_stem_and_order() {
        let key = ModelKey::new(Order::Tri, "olson", "298");
        assert_eq!(key.file_stem(), "olson_298");
        assert_eq!(key.to_string(), "olson_298 (order 3)");
    }
}
