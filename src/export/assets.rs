//! Export assets
//!
//! An exported deck inlines two text assets: the preview style sheet and
//! the renderer script that defines `renderDeck`. They are read from a local
//! directory or downloaded from a base URL.
//!
//! Asset files are usually JS modules that wrap the text in a template
//! literal (`export const previewCss = \`...\`;`). When a file contains a
//! backtick pair, the text between the first pair is used; otherwise the
//! whole file is used.

use crate::error::{Error, Result};
use log::{debug, warn};
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

/// Default file name of the style sheet asset.
pub const STYLE_ASSET: &str = "preview-css.js";

/// Default file name of the renderer script asset.
pub const SCRIPT_ASSET: &str = "preview-script.js";

/// User agent sent when downloading assets.
const USER_AGENT: &str = concat!("MicroSnap/", env!("CARGO_PKG_VERSION"));

// ─────────────────────────────────────────────────────────────────────────────
// Asset Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Style,
    Script,
}

/// File names of the two assets, relative to the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFiles {
    pub style: String,
    pub script: String,
}

impl Default for AssetFiles {
    fn default() -> Self {
        Self {
            style: STYLE_ASSET.to_string(),
            script: SCRIPT_ASSET.to_string(),
        }
    }
}

impl AssetFiles {
    pub fn name(&self, kind: AssetKind) -> &str {
        match kind {
            AssetKind::Style => &self.style,
            AssetKind::Script => &self.script,
        }
    }
}

/// The extracted text of both assets, ready to inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportAssets {
    pub style: String,
    pub script: String,
}

/// Somewhere export assets can be obtained from.
pub trait AssetSource: Send + Sync {
    /// Fetch the raw contents of one asset.
    fn fetch(&self, kind: AssetKind) -> Result<String>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;

    /// Fetch and extract both assets. Fails if either is unavailable.
    fn load(&self) -> Result<ExportAssets> {
        let style = self.fetch(AssetKind::Style)?;
        let script = self.fetch(AssetKind::Script)?;
        debug!(
            "Loaded export assets from {} ({} + {} bytes)",
            self.describe(),
            style.len(),
            script.len()
        );
        Ok(ExportAssets {
            style: extract_template_literal(&style).to_string(),
            script: extract_template_literal(&script).to_string(),
        })
    }
}

/// Return the text between the first pair of backticks, or all of `raw`.
pub fn extract_template_literal(raw: &str) -> &str {
    static TEMPLATE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = TEMPLATE.get_or_init(|| match Regex::new(r"(?s)`(.*?)`") {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Template literal pattern failed to compile: {}", e);
            None
        }
    });

    re.as_ref()
        .and_then(|re| re.captures(raw))
        .and_then(|caps| caps.get(1))
        .map_or(raw, |m| m.as_str())
}

// ─────────────────────────────────────────────────────────────────────────────
// Local Directory
// ─────────────────────────────────────────────────────────────────────────────

/// Assets read from a directory on disk.
#[derive(Debug, Clone)]
pub struct LocalAssets {
    dir: PathBuf,
    files: AssetFiles,
}

impl LocalAssets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_files(dir, AssetFiles::default())
    }

    pub fn with_files(dir: impl Into<PathBuf>, files: AssetFiles) -> Self {
        Self {
            dir: dir.into(),
            files,
        }
    }
}

impl AssetSource for LocalAssets {
    fn fetch(&self, kind: AssetKind) -> Result<String> {
        let name = self.files.name(kind);
        let path = self.dir.join(name);
        std::fs::read_to_string(&path).map_err(|e| {
            warn!("Could not read export asset {}: {}", path.display(), e);
            Error::AssetUnavailable {
                asset: name.to_string(),
                source: Box::new(e),
            }
        })
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Remote Base URL
// ─────────────────────────────────────────────────────────────────────────────

/// Assets downloaded over HTTP(S) from a base URL.
#[derive(Debug, Clone)]
pub struct RemoteAssets {
    base_url: String,
    files: AssetFiles,
    timeout: Duration,
}

impl RemoteAssets {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_files(base_url, AssetFiles::default(), Duration::from_secs(10))
    }

    pub fn with_files(base_url: impl Into<String>, files: AssetFiles, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            files,
            timeout,
        }
    }

    /// Full URL of one asset.
    pub fn url(&self, kind: AssetKind) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.files.name(kind)
        )
    }

    fn download(&self, url: &str) -> std::result::Result<String, String> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        let response = client
            .get(url)
            .send()
            .map_err(|e| format!("Failed to connect: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Server returned {}", response.status()));
        }

        response
            .text()
            .map_err(|e| format!("Failed to read response body: {}", e))
    }
}

impl AssetSource for RemoteAssets {
    fn fetch(&self, kind: AssetKind) -> Result<String> {
        let url = self.url(kind);
        self.download(&url).map_err(|message| {
            warn!("Could not download export asset {}: {}", url, message);
            Error::AssetUnavailable {
                asset: self.files.name(kind).to_string(),
                source: message.into(),
            }
        })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Fixed in-memory assets for tests.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct StaticAssets {
    pub style: Option<String>,
    pub script: Option<String>,
}

#[cfg(test)]
impl StaticAssets {
    pub fn new(style: &str, script: &str) -> Self {
        Self {
            style: Some(style.to_string()),
            script: Some(script.to_string()),
        }
    }
}

#[cfg(test)]
impl AssetSource for StaticAssets {
    fn fetch(&self, kind: AssetKind) -> Result<String> {
        let value = match kind {
            AssetKind::Style => &self.style,
            AssetKind::Script => &self.script,
        };
        value.clone().ok_or_else(|| Error::AssetUnavailable {
            asset: AssetFiles::default().name(kind).to_string(),
            source: "not provided".into(),
        })
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
