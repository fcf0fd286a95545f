use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the health export converter.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The export document could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output table could not be written or moved into place.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export document is not well-formed XML.
    #[error("Failed to parse XML: {0}")]
    XmlParse(String),

    /// The document parsed but has no `HealthData` root element.
    #[error("Missing root element <{0}>")]
    MissingRoot(String),

    /// A timestamp string did not match any recognised format.
    #[error("Invalid timestamp format: {0:?}")]
    TimestampParse(String),

    /// A CSV row could not be serialised.
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the export crates.
pub type Result<T> = std::result::Result<T, ExportError>;
