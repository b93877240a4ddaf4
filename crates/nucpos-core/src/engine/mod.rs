//! # Engine Module
//!
//! Stateful layer on top of [`crate::core`].
//!
//! - **Backend cache** ([`cache`]) - get-or-create registry, one backend per model key
//! - **Sequences** ([`sequence`], [`inserted`]) - per-instance memoized landscapes and
//!   payloads spliced into genomic context
//! - **Configuration** ([`config`]) - data locations, flank lengths and kT
//! - **Error Handling** ([`error`]) - the crate-wide error type

pub mod cache;
pub mod config;
pub mod error;
pub mod inserted;
pub mod sequence;
