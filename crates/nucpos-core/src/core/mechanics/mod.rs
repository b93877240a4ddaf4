//! # Mechanics Module
//!
//! Mechanical-model probability tensors and the backends built from them.
//!
//! A model is stored as one text file per oligonucleotide order under
//! `{data_root}/mechanical_models/`. The [`factory::TensorBackendFactory`] reads the
//! long-range tensor for the requested order and, for orders above one, the
//! short-range tensor of the order below, then hands both to a
//! [`backend::MarkovBackend`].

pub mod backend;
pub mod factory;
pub mod tensor;
