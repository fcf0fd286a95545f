//! Console progress display for the extraction pass.

use indicatif::{ProgressBar, ProgressStyle};

/// Style for the per-record bar.
pub const RECORD_TEMPLATE: &str =
    "{msg} {spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({per_sec})";

/// Message shown next to the bar ("processing records").
pub const RECORD_MESSAGE: &str = "レコード処理中";

/// Create the per-record bar.  Returns a hidden bar when `visible` is false,
/// so callers can tick it unconditionally.
#[must_use]
pub fn record_progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(RECORD_TEMPLATE)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(RECORD_MESSAGE);
    pb
}
