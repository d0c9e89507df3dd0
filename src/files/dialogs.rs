//! Native file dialog integration using the rfd crate
//!
//! This module opens the native save dialog for exported decks.

use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// File extensions offered for exported documents.
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Opens a native save dialog for an exported deck.
///
/// Returns `Some(PathBuf)` if a location was selected, `None` if cancelled.
pub fn save_html_dialog(initial_dir: Option<&Path>, default_name: &str) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Export Deck")
        .add_filter("HTML Files", HTML_EXTENSIONS)
        .set_file_name(default_name);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.save_file().map(with_html_extension)
}

/// Append `.html` when the chosen name has no HTML extension.
pub fn with_html_extension(path: PathBuf) -> PathBuf {
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| HTML_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    if has_extension {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".html");
        PathBuf::from(name)
    }
}
