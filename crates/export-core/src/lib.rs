//! Core types for the health export converter.
//!
//! Holds the fixed type classification table, the record models that flow
//! through the pipeline, timestamp normalization, settings and the shared
//! error type.

pub mod catalog;
pub mod error;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use catalog::{Category, DailyRule, MeasurementKind};
pub use error::{ExportError, Result};
