use clap::Parser;
use std::path::{Path, PathBuf};

use crate::catalog::Category;
use crate::error::{ExportError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Convert an Apple Health export into per-category CSV tables
#[derive(Parser, Debug, Clone)]
#[command(
    name = "health-export",
    about = "Convert an Apple Health export into per-category CSV tables",
    version
)]
pub struct Settings {
    /// Path to the export document
    #[arg(long, default_value = "export.xml")]
    pub input: PathBuf,

    /// Directory the CSV tables are written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Hide the progress bar and completion messages
    #[arg(long)]
    pub quiet: bool,
}

impl Settings {
    /// Parse CLI arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// The pipeline configuration these settings describe.
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            input_path: self.input.clone(),
            output_dir: self.output_dir.clone(),
            show_progress: !self.quiet,
        }
    }
}

// ── ExportConfig ───────────────────────────────────────────────────────────────

/// Where the pipeline reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    /// Draw the per-record progress bar and print a line per written table.
    pub show_progress: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("export.xml"),
            output_dir: PathBuf::from("."),
            show_progress: true,
        }
    }
}

impl ExportConfig {
    /// Fail early when the output directory is missing, before the (slow)
    /// input parse.
    pub fn validate(&self) -> Result<()> {
        if !self.output_dir.is_dir() {
            return Err(ExportError::Config(format!(
                "output directory does not exist: {}",
                self.output_dir.display()
            )));
        }
        Ok(())
    }

    /// Path of the table written for `category`.
    pub fn output_path(&self, category: Category) -> PathBuf {
        self.output_dir.join(category.file_name())
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
