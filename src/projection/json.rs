//! JSON projection of the deck
//!
//! The Advanced editor shows the whole deck as a pretty-printed JSON
//! document. `render` writes the deck into that text; `commit` parses the
//! text back, validates it, and replaces the deck in one step.

use crate::deck::{Deck, Slide, SlideModel};
use crate::error::{Error, Result};
use log::{info, warn};
use serde_json::{Map, Value};

/// Status text shown after a successful commit.
pub const COMMIT_SUCCESS_MESSAGE: &str = "Slide deck successfully updated!";

// ─────────────────────────────────────────────────────────────────────────────
// Rendering and Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize a deck as pretty JSON with two-space indentation.
///
/// Keys appear in declaration order, so the output is stable.
pub fn render(deck: &Deck) -> String {
    match serde_json::to_string_pretty(deck) {
        Ok(json) => json,
        Err(e) => {
            // Deck contains only strings, enums and bools; this cannot fail
            // in practice, but an empty buffer beats a crash.
            warn!("Could not render deck as JSON: {}", e);
            String::new()
        }
    }
}

/// Parse deck JSON text.
///
/// # Errors
///
/// - `Error::Parse` if the text is not valid JSON
/// - `Error::Shape` if there is no `slides` array of objects
/// - `Error::InvalidDeckShape` if the slide count is out of bounds
pub fn parse_deck(raw: &str) -> Result<Deck> {
    let value: Value = serde_json::from_str(raw.trim())?;
    deck_from_value(&value)
}

/// Build a deck from an already parsed JSON value.
///
/// Slide fields are normalized to defaults where missing or invalid;
/// `autoplay` and `loop` default to `false`.
pub fn deck_from_value(value: &Value) -> Result<Deck> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::Shape("document is not a JSON object".to_string()))?;

    let items = match object.get("slides") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(Error::Shape("'slides' is not an array".to_string())),
        None => return Err(Error::Shape("'slides' is missing".to_string())),
    };

    let slides = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_object()
                .map(Slide::from_json_object)
                .ok_or_else(|| Error::Shape(format!("slide {} is not an object", i + 1)))
        })
        .collect::<Result<Vec<_>>>()?;

    let deck = Deck {
        slides,
        autoplay: flag(object, "autoplay"),
        loop_playback: flag(object, "loop"),
    };
    deck.validate()?;
    Ok(deck)
}

/// Parse `raw` and replace the model's deck with it.
///
/// Nothing in the model changes unless every check passes.
pub fn commit(model: &mut SlideModel, raw: &str) -> Result<()> {
    let deck = parse_deck(raw)?;
    model.replace_deck(deck)?;
    info!("Committed JSON deck with {} slide(s)", model.len());
    Ok(())
}

fn flag(object: &Map<String, Value>, key: &str) -> bool {
    match object.get(key) {
        Some(Value::Bool(value)) => *value,
        None | Some(Value::Null) => false,
        Some(other) => {
            warn!("Ignoring non-boolean '{}' value {}, using false", key, other);
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Editor Buffer
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome message shown under the JSON editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonStatus {
    Success(String),
    Warning(String),
}

impl JsonStatus {
    pub fn message(&self) -> &str {
        match self {
            JsonStatus::Success(msg) | JsonStatus::Warning(msg) => msg,
        }
    }
}

/// The Advanced mode text buffer.
///
/// The buffer is a view: the user may type anything into it, but it only
/// affects the deck through [`commit`].
#[derive(Debug, Clone, Default)]
pub struct JsonEditor {
    text: String,
    status: Option<JsonStatus>,
}

impl JsonEditor {
    /// Create a buffer showing `deck`.
    pub fn new(deck: &Deck) -> Self {
        Self {
            text: render(deck),
            status: None,
        }
    }

    /// Overwrite the buffer with the current deck.
    pub fn render(&mut self, deck: &Deck) {
        self.text = render(deck);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mutable access for the text widget.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn status(&self) -> Option<&JsonStatus> {
        self.status.as_ref()
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.status = Some(JsonStatus::Success(message.into()));
    }

    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.status = Some(JsonStatus::Warning(message.into()));
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Number of lines in the buffer, at least 1.
    pub fn line_count(&self) -> usize {
        if self.text.is_empty() {
            1
        } else {
            self.text.chars().filter(|&c| c == '\n').count() + 1
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
