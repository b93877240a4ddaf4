//! Provides input/output functionality for model data, sequences and reports.

pub mod genome;
pub mod insertion;
pub mod layout;
pub mod records;
pub mod report;
