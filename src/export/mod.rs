//! Deck Export Module for MicroSnap
//!
//! This module produces the standalone HTML document that replays a deck,
//! and copies it to the clipboard.
//!
//! # Architecture
//!
//! - `assets.rs` - style sheet and renderer script sources (local or remote)
//! - `html.rs` - HTML document generation
//! - `clipboard.rs` - Platform clipboard operations

pub mod assets;
pub mod clipboard;
pub mod html;

pub use assets::{AssetFiles, AssetSource, ExportAssets, LocalAssets, RemoteAssets};
pub use clipboard::copy_html_to_clipboard;
pub use html::{export_deck, serialize};
