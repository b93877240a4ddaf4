//! # nucpos
//!
//! Nucleosome-occupancy probability and energy landscapes for DNA sequences,
//! computed from precomputed mechanical-model probability tensors keyed by
//! oligonucleotide order, model name and temperature.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless pieces: model keys and tensor
//!   shapes, tensor loading and the probability backends, the energy transform,
//!   and I/O (data layout, insertion library, genome access, reports).
//!
//! - **[`engine`]: The Stateful Layer.** The memoizing [`engine::cache::ModelCache`]
//!   that materializes each backend at most once, the [`engine::sequence::Sequence`]
//!   entity with its per-instance landscape memo, inserted sequences, configuration
//!   and the crate-wide error type.
//!
//! - **[`workflows`]: The Public API.** Batch landscape computation over many
//!   sequences and report output.

pub mod core;
pub mod engine;
pub mod workflows;
