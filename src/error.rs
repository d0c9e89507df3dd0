//! Centralized error handling for MicroSnap
//!
//! This module provides a unified error type that covers every failure the
//! builder can surface: deck mutations, JSON commits, export assets,
//! configuration and the render server.

use crate::deck::MAX_SLIDES;
use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the application.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the application.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Deck Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Adding a slide would exceed the slide limit
    CapacityExceeded,

    /// Removing a slide would leave the deck empty
    MinimumSlidesViolation,

    /// A slide index does not point into the deck
    SlideIndexOutOfRange { index: usize, len: usize },

    /// A replacement deck has a slide count outside the allowed range
    InvalidDeckShape { slide_count: usize },

    /// The command is not available in the current editor mode
    ModeLocked,

    // ─────────────────────────────────────────────────────────────────────────
    // JSON Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The JSON document is not syntactically valid
    Parse(serde_json::Error),

    /// The JSON document parsed but has no usable `slides` array
    Shape(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Export Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// A style sheet or renderer script could not be obtained
    AssetUnavailable {
        asset: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    /// Failed to write file contents
    FileWrite { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Application Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The render server could not be started
    Server(String),

    /// Generic application error with a message
    Application(String),
}

// Implement From traits for convenient error conversion
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Deck Errors
            Error::CapacityExceeded => {
                write!(f, "A deck can hold at most {} slides.", MAX_SLIDES)
            }
            Error::MinimumSlidesViolation => {
                write!(f, "A deck needs at least one slide.")
            }
            Error::SlideIndexOutOfRange { index, len } => {
                write!(
                    f,
                    "Slide {} does not exist (the deck has {} slides).",
                    index + 1,
                    len
                )
            }
            Error::InvalidDeckShape { slide_count } => {
                write!(
                    f,
                    "A deck needs between 1 and {} slides, found {}.",
                    MAX_SLIDES, slide_count
                )
            }
            Error::ModeLocked => {
                write!(f, "Switch to Quick Edit to change slides.")
            }

            // JSON Errors
            Error::Parse(_) => write!(f, "Your code is not formatted correctly."),
            Error::Shape(_) => write!(f, "Missing or invalid 'slides' array."),

            // Export Errors
            Error::AssetUnavailable { asset, source } => {
                write!(f, "Export asset '{}' is unavailable: {}", asset, source)
            }

            // File I/O Errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileWrite { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }

            // Application Errors
            Error::Server(msg) => write!(f, "Render server error: {}", msg),
            Error::Application(msg) => write!(f, "{}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::AssetUnavailable { source, .. } => Some(source.as_ref()),
            Error::Io(err) => Some(err),
            Error::FileWrite { source, .. } => Some(source),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::CapacityExceeded
            | Error::MinimumSlidesViolation
            | Error::SlideIndexOutOfRange { .. }
            | Error::InvalidDeckShape { .. }
            | Error::ModeLocked
            | Error::Shape(_)
            | Error::ConfigDirNotFound
            | Error::Server(_)
            | Error::Application(_) => None,
        }
    }
}

impl Error {
    /// Whether this error was caused by the deck JSON supplied by the user,
    /// as opposed to the environment (assets, disk, network).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Parse(_) | Error::Shape(_) | Error::InvalidDeckShape { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
