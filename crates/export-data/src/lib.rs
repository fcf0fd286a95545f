//! Data layer for the health export converter.
//!
//! Reads the export document, classifies its records, collapses Nutrition
//! records per day and writes the per-category CSV tables.

pub mod aggregator;
pub mod extractor;
pub mod pipeline;
pub mod progress;
pub mod reader;
pub mod writer;

pub use export_core as core;
