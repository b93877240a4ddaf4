//! # Core Module
//!
//! Stateless building blocks for landscape computation.
//!
//! - **Model identity** ([`models`]) - oligonucleotide orders, the 147-bp window and
//!   the [`models::key::ModelKey`] that addresses one mechanical model
//! - **Mechanics** ([`mechanics`]) - tensor files, the [`mechanics::backend::Backend`]
//!   abstraction and the factory that builds backends from disk
//! - **Energy** ([`energy`]) - the `-kT ln(p)` transform
//! - **File I/O** ([`io`]) - data layout, insertion library, genomes, FASTA records and
//!   tabular reports

pub mod energy;
pub mod io;
pub mod mechanics;
pub mod models;
