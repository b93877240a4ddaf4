//! # Workflows Module
//!
//! High-level entry points that tie the [`crate::engine`] and [`crate::core`] layers
//! together.
//!
//! - **Landscape Workflow** ([`landscape`]) - parallel landscape computation for a set of
//!   named sequences under one model, with tab-separated report output.

pub mod landscape;
