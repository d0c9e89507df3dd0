//! User settings and preferences for MicroSnap
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::export::{AssetFiles, AssetSource, LocalAssets, RemoteAssets};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the builder window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon for the toggle button, showing the theme it switches to.
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Window X position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Window Y position (optional, for restoring position)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// Whether the window was maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Assets
// ─────────────────────────────────────────────────────────────────────────────

/// Where export assets come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetSourceKind {
    #[default]
    Local,
    Remote,
}

/// Asset source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub source: AssetSourceKind,
    /// Directory holding the asset files (relative paths resolve against
    /// the working directory)
    pub local_dir: PathBuf,
    pub remote_base_url: String,
    pub style_file: String,
    pub script_file: String,
    /// Download timeout for remote assets
    pub timeout_secs: u64,
}

impl Default for AssetSettings {
    fn default() -> Self {
        let files = AssetFiles::default();
        Self {
            source: AssetSourceKind::Local,
            local_dir: PathBuf::from("js"),
            remote_base_url: "https://microsnap-builder.netlify.app/js".to_string(),
            style_file: files.style,
            script_file: files.script,
            timeout_secs: 10,
        }
    }
}

impl AssetSettings {
    pub fn files(&self) -> AssetFiles {
        AssetFiles {
            style: self.style_file.clone(),
            script: self.script_file.clone(),
        }
    }

    /// Build the configured asset source.
    pub fn build_source(&self) -> Arc<dyn AssetSource> {
        match self.source {
            AssetSourceKind::Local => {
                Arc::new(LocalAssets::with_files(self.local_dir.clone(), self.files()))
            }
            AssetSourceKind::Remote => Arc::new(RemoteAssets::with_files(
                self.remote_base_url.clone(),
                self.files(),
                Duration::from_secs(self.timeout_secs),
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Render Server
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Largest request body accepted by the render endpoint
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export File
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Suggested name in the save dialog
    pub file_name: String,
    /// Directory of the last successful export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_directory: Option<PathBuf>,
    /// Open the exported file in the default browser
    pub open_after_export: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: "microsnap_deck.html".to_string(),
            last_directory: None,
            open_after_export: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Main application settings struct.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Color theme (light or dark)
    pub theme: Theme,

    /// Window size and position
    pub window_size: WindowSize,

    /// Quiet period before an image URL edit is applied
    pub image_debounce_ms: u64,

    pub assets: AssetSettings,
    pub server: ServerSettings,
    pub export: ExportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            window_size: WindowSize::default(),
            image_debounce_ms: 400,
            assets: AssetSettings::default(),
            server: ServerSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    /// Maximum image debounce delay.
    pub const MAX_IMAGE_DEBOUNCE_MS: u64 = 5000;
    /// Minimum asset download timeout.
    pub const MIN_TIMEOUT_SECS: u64 = 1;
    /// Maximum asset download timeout.
    pub const MAX_TIMEOUT_SECS: u64 = 120;
    /// Minimum request body limit.
    pub const MIN_BODY_BYTES: usize = 1024;
    /// Maximum request body limit.
    pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

    pub fn image_debounce(&self) -> Duration {
        Duration::from_millis(self.image_debounce_ms)
    }

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        // Clamp window size
        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        self.image_debounce_ms = self.image_debounce_ms.min(Self::MAX_IMAGE_DEBOUNCE_MS);

        self.assets.timeout_secs = self
            .assets
            .timeout_secs
            .clamp(Self::MIN_TIMEOUT_SECS, Self::MAX_TIMEOUT_SECS);

        // Empty asset names would point at the directory itself
        let defaults = AssetFiles::default();
        if self.assets.style_file.trim().is_empty() {
            self.assets.style_file = defaults.style;
        }
        if self.assets.script_file.trim().is_empty() {
            self.assets.script_file = defaults.script;
        }

        self.server.max_body_bytes = self
            .server
            .max_body_bytes
            .clamp(Self::MIN_BODY_BYTES, Self::MAX_BODY_BYTES);
        if self.server.host.trim().is_empty() {
            self.server.host = ServerSettings::default().host;
        }

        // Export file name must be a plain .html name
        let name = self.export.file_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            self.export.file_name = ExportSettings::default().file_name;
        } else if !name.to_ascii_lowercase().ends_with(".html") {
            self.export.file_name = format!("{}.html", name);
        } else {
            self.export.file_name = name.to_string();
        }
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.image_debounce_ms, 400);
        assert_eq!(settings.assets.source, AssetSourceKind::Local);
        assert_eq!(settings.assets.local_dir, PathBuf::from("js"));
        assert_eq!(settings.assets.style_file, "preview-css.js");
        assert_eq!(settings.assets.script_file, "preview-script.js");
        assert_eq!(settings.server.address(), "127.0.0.1:3000");
        assert_eq!(settings.server.max_body_bytes, 2 * 1024 * 1024);
        assert_eq!(settings.export.file_name, "microsnap_deck.html");
        assert!(!settings.export.open_after_export);
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let theme: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(theme, Theme::Light);
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let original = Settings::default();
        let json = serde_json::to_string_pretty(&original).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let json = r#"{"theme": "dark", "server": {"port": 8080}}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.image_debounce_ms, 400);
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_window_size_default() {
        let size = WindowSize::default();
        assert_eq!(size.width, 1200.0);
        assert_eq!(size.height, 800.0);
        assert!(size.x.is_none());
        assert!(!size.maximized);
    }

    #[test]
    fn test_sanitize_numeric_ranges() {
        let mut settings = Settings::default();
        settings.window_size.width = 10.0;
        settings.image_debounce_ms = 60_000;
        settings.assets.timeout_secs = 0;
        settings.server.max_body_bytes = 10;
        settings.sanitize();

        assert_eq!(settings.window_size.width, Settings::MIN_WINDOW_SIZE);
        assert_eq!(settings.image_debounce_ms, Settings::MAX_IMAGE_DEBOUNCE_MS);
        assert_eq!(settings.assets.timeout_secs, Settings::MIN_TIMEOUT_SECS);
        assert_eq!(settings.server.max_body_bytes, Settings::MIN_BODY_BYTES);
    }

    #[test]
    fn test_sanitize_export_file_name() {
        let mut settings = Settings::default();
        settings.export.file_name = " talk ".to_string();
        settings.sanitize();
        assert_eq!(settings.export.file_name, "talk.html");

        settings.export.file_name = "../escape.html".to_string();
        settings.sanitize();
        assert_eq!(settings.export.file_name, "microsnap_deck.html");

        settings.export.file_name = "Deck.HTML".to_string();
        settings.sanitize();
        assert_eq!(settings.export.file_name, "Deck.HTML");
    }

    #[test]
    fn test_sanitize_restores_empty_strings() {
        let mut settings = Settings::default();
        settings.assets.style_file = "  ".to_string();
        settings.server.host = String::new();
        settings.sanitize();
        assert_eq!(settings.assets.style_file, "preview-css.js");
        assert_eq!(settings.server.host, "127.0.0.1");
    }

    #[test]
    fn test_from_json_sanitized() {
        let settings =
            Settings::from_json_sanitized(r#"{"image_debounce_ms": 9999, "theme": "dark"}"#)
                .unwrap();
        assert_eq!(settings.image_debounce_ms, 5000);
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.image_debounce(), Duration::from_millis(5000));
    }

    #[test]
    fn test_remote_source_kind() {
        let settings: Settings =
            serde_json::from_str(r#"{"assets": {"source": "remote"}}"#).unwrap();
        assert_eq!(settings.assets.source, AssetSourceKind::Remote);
        assert!(settings
            .assets
            .build_source()
            .describe()
            .starts_with("https://microsnap-builder.netlify.app"));
    }
}
