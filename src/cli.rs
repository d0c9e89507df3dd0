//! Command-line interface
//!
//! Without a subcommand MicroSnap opens the builder window. `serve` runs the
//! render endpoint and `export` turns a deck file into HTML once.

use crate::config::{AssetSettings, AssetSourceKind, Settings};
use crate::error::{Error, Result};
use crate::export::{export_deck, AssetSource};
use crate::projection::json::parse_deck;
use crate::server::RenderServer;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(version, about = "Build small slide decks and export them as standalone HTML")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the render endpoint (POST /api/render)
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        #[command(flatten)]
        assets: AssetArgs,
    },

    /// Export a deck JSON file as a standalone HTML document
    Export {
        /// Deck JSON file
        deck: PathBuf,

        /// Output file (defaults to the configured export file name)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        assets: AssetArgs,
    },
}

/// Where to take export assets from, overriding the configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct AssetArgs {
    /// Read preview-css.js and preview-script.js from this directory
    #[arg(long, value_name = "DIR", conflicts_with = "remote")]
    pub assets_dir: Option<PathBuf>,

    /// Download the assets from this base URL
    #[arg(long, value_name = "URL")]
    pub remote: Option<String>,
}

impl AssetArgs {
    /// Apply the overrides to a copy of the configured asset settings.
    pub fn apply(&self, base: &AssetSettings) -> AssetSettings {
        let mut assets = base.clone();
        if let Some(dir) = &self.assets_dir {
            assets.source = AssetSourceKind::Local;
            assets.local_dir = dir.clone();
        } else if let Some(url) = &self.remote {
            assets.source = AssetSourceKind::Remote;
            assets.remote_base_url = url.clone();
        }
        assets
    }
}

/// Run a subcommand to completion.
pub fn run(command: Command, settings: &Settings) -> Result<()> {
    match command {
        Command::Serve { host, port, assets } => {
            let mut server_settings = settings.server.clone();
            if let Some(host) = host {
                server_settings.host = host;
            }
            if let Some(port) = port {
                server_settings.port = port;
            }
            let source = assets.apply(&settings.assets).build_source();
            RenderServer::bind(&server_settings, source)?.run()
        }
        Command::Export {
            deck,
            output,
            assets,
        } => {
            let output =
                output.unwrap_or_else(|| PathBuf::from(&settings.export.file_name));
            let source = assets.apply(&settings.assets).build_source();
            export_file(&deck, &output, source)
        }
    }
}

/// Read a deck file, export it and write the document to `output`.
///
/// The deck goes through the same validation as a JSON commit in the
/// builder window.
pub fn export_file(deck_path: &Path, output: &Path, source: Arc<dyn AssetSource>) -> Result<()> {
    let raw = std::fs::read_to_string(deck_path).map_err(|e| {
        Error::Application(format!("Could not read '{}': {}", deck_path.display(), e))
    })?;
    let deck = parse_deck(&raw)?;
    let html = export_deck(&deck, source.as_ref())?;

    std::fs::write(output, html).map_err(|e| Error::FileWrite {
        path: output.to_path_buf(),
        source: e,
    })?;
    info!("Wrote {}", output.display());
    Ok(())
}
