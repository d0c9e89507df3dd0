//! Slide content types
//!
//! A `Slide` is one unit of deck content. Every field always holds a valid
//! value: raw input is normalized on the way in, either by
//! [`Slide::from_json_object`] when a JSON document is ingested or by the
//! per-field parsers used by Quick Edit updates.

use log::warn;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Default overlay color for new slides.
pub const DEFAULT_BACKGROUND: &str = "#0a9c97";

/// Default slide title.
pub const DEFAULT_TITLE: &str = "Example Title";

/// Default slide description.
pub const DEFAULT_DESCRIPTION: &str = "This is how your slide will appear.";

/// Image paths starting with this prefix refer to bundled local assets.
pub const LOCAL_ASSETS_PREFIX: &str = "example/";

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

// ─────────────────────────────────────────────────────────────────────────────
// Layout
// ─────────────────────────────────────────────────────────────────────────────

/// How the text block and the image share the slide.
///
/// Serialized with the renderer's class spelling (`layout-overlay`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum Layout {
    /// Text drawn over a full-bleed image
    #[default]
    #[serde(rename = "layout-overlay")]
    Overlay,
    /// Image on the left half, text on the right
    #[serde(rename = "layout-image-left")]
    ImageLeft,
    /// Image on the right half, text on the left
    #[serde(rename = "layout-image-right")]
    ImageRight,
    /// No image area, text only
    #[serde(rename = "layout-text-only")]
    TextOnly,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Overlay => "overlay",
            Layout::ImageLeft => "image-left",
            Layout::ImageRight => "image-right",
            Layout::TextOnly => "text-only",
        }
    }

    /// Class name the renderer script styles, as written to decks.
    pub fn class_name(&self) -> &'static str {
        match self {
            Layout::Overlay => "layout-overlay",
            Layout::ImageLeft => "layout-image-left",
            Layout::ImageRight => "layout-image-right",
            Layout::TextOnly => "layout-text-only",
        }
    }

    /// Get the display label for this layout.
    pub fn label(&self) -> &'static str {
        match self {
            Layout::Overlay => "Overlay",
            Layout::ImageLeft => "Image Left",
            Layout::ImageRight => "Image Right",
            Layout::TextOnly => "Text Only",
        }
    }

    /// Get all available layouts.
    pub fn all() -> &'static [Layout] {
        &[
            Layout::Overlay,
            Layout::ImageLeft,
            Layout::ImageRight,
            Layout::TextOnly,
        ]
    }
}

impl FromStr for Layout {
    type Err = UnknownVariant;

    /// Accepts both `overlay` and the renderer's class spelling `layout-overlay`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed.strip_prefix("layout-").unwrap_or(trimmed);
        Self::all()
            .iter()
            .copied()
            .find(|layout| layout.as_str() == name)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Position
// ─────────────────────────────────────────────────────────────────────────────

/// Placement of the text block on a 3×3 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    Top,
    TopRight,
    Left,
    #[default]
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::TopLeft => "top-left",
            Position::Top => "top",
            Position::TopRight => "top-right",
            Position::Left => "left",
            Position::Center => "center",
            Position::Right => "right",
            Position::BottomLeft => "bottom-left",
            Position::Bottom => "bottom",
            Position::BottomRight => "bottom-right",
        }
    }

    /// Get all positions in grid order (row by row, top to bottom).
    pub fn all() -> &'static [Position] {
        &[
            Position::TopLeft,
            Position::Top,
            Position::TopRight,
            Position::Left,
            Position::Center,
            Position::Right,
            Position::BottomLeft,
            Position::Bottom,
            Position::BottomRight,
        ]
    }

    /// Grid cell of this position as (row, column), both in `0..3`.
    pub fn grid_cell(&self) -> (usize, usize) {
        let index = Self::all()
            .iter()
            .position(|p| p == self)
            .unwrap_or(4);
        (index / 3, index % 3)
    }

    /// Arrow glyph used on the placement grid buttons.
    pub fn glyph(&self) -> &'static str {
        match self {
            Position::TopLeft => "↖",
            Position::Top => "↑",
            Position::TopRight => "↗",
            Position::Left => "←",
            Position::Center => "•",
            Position::Right => "→",
            Position::BottomLeft => "↙",
            Position::Bottom => "↓",
            Position::BottomRight => "↘",
        }
    }
}

impl FromStr for Position {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|position| position.as_str() == name)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Font Size
// ─────────────────────────────────────────────────────────────────────────────

/// Relative text size on the slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FontSize::Small => "Small",
            FontSize::Medium => "Medium",
            FontSize::Large => "Large",
        }
    }

    pub fn all() -> &'static [FontSize] {
        &[FontSize::Small, FontSize::Medium, FontSize::Large]
    }
}

impl FromStr for FontSize {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|size| size.as_str() == name)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Animation
// ─────────────────────────────────────────────────────────────────────────────

/// Entry animation played when the slide appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Animation {
    #[default]
    None,
    FadeIn,
    SlideUp,
    ZoomIn,
}

impl Animation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Animation::None => "none",
            Animation::FadeIn => "fade-in",
            Animation::SlideUp => "slide-up",
            Animation::ZoomIn => "zoom-in",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Animation::None => "None",
            Animation::FadeIn => "Fade In",
            Animation::SlideUp => "Slide Up",
            Animation::ZoomIn => "Zoom In",
        }
    }

    pub fn all() -> &'static [Animation] {
        &[
            Animation::None,
            Animation::FadeIn,
            Animation::SlideUp,
            Animation::ZoomIn,
        ]
    }
}

impl FromStr for Animation {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|animation| animation.as_str() == name)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Field Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Normalize a hex color to lowercase `#rrggbb`.
///
/// Accepts `#rgb` and `#rrggbb` in any case, surrounded by whitespace.
/// Three-digit colors are expanded by digit duplication.
pub fn normalize_hex_color(raw: &str) -> Option<String> {
    let hex = raw.trim().to_ascii_lowercase();
    let digits = hex.strip_prefix('#')?;

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match digits.len() {
        6 => Some(hex),
        3 => {
            let mut expanded = String::with_capacity(7);
            expanded.push('#');
            for c in digits.chars() {
                expanded.push(c);
                expanded.push(c);
            }
            Some(expanded)
        }
        _ => None,
    }
}

/// Parse a color into RGB components.
pub fn hex_to_rgb(raw: &str) -> Option<[u8; 3]> {
    let hex = normalize_hex_color(raw)?;
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(1)?, channel(3)?, channel(5)?])
}

/// Format RGB components as lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Validate an image reference.
///
/// Returns the trimmed value when it is empty, an `http(s)://` URL, or a
/// path under [`LOCAL_ASSETS_PREFIX`].
pub fn normalize_image(raw: &str) -> Option<String> {
    let url = raw.trim();
    let accepted = url.is_empty()
        || url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with(LOCAL_ASSETS_PREFIX);
    accepted.then(|| url.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Slide Field
// ─────────────────────────────────────────────────────────────────────────────

/// Identifies one editable slide property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideField {
    Title,
    Description,
    Layout,
    Position,
    FontSize,
    Background,
    Image,
    Animation,
}

impl SlideField {
    /// JSON key of this field.
    pub fn key(&self) -> &'static str {
        match self {
            SlideField::Title => "title",
            SlideField::Description => "description",
            SlideField::Layout => "layout",
            SlideField::Position => "position",
            SlideField::FontSize => "fontSize",
            SlideField::Background => "background",
            SlideField::Image => "image",
            SlideField::Animation => "animation",
        }
    }

    pub fn all() -> &'static [SlideField] {
        &[
            SlideField::Title,
            SlideField::Description,
            SlideField::Layout,
            SlideField::Position,
            SlideField::FontSize,
            SlideField::Background,
            SlideField::Image,
            SlideField::Animation,
        ]
    }

    /// Whether edits to this field are applied after a quiet period rather
    /// than on every keystroke.
    pub fn is_debounced(&self) -> bool {
        matches!(self, SlideField::Image)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Slide
// ─────────────────────────────────────────────────────────────────────────────

/// One slide of a deck.
///
/// Field order here is the key order of the JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub title: String,
    pub description: String,
    pub layout: Layout,
    pub position: Position,
    pub font_size: FontSize,
    pub background: String,
    pub image: String,
    pub animation: Animation,
}

impl Default for Slide {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            layout: Layout::default(),
            position: Position::default(),
            font_size: FontSize::default(),
            background: DEFAULT_BACKGROUND.to_string(),
            image: String::new(),
            animation: Animation::default(),
        }
    }
}

impl Slide {
    /// Apply a raw value to one field.
    ///
    /// Returns `true` if the value was valid and stored. Invalid values leave
    /// the slide untouched.
    pub fn apply(&mut self, field: SlideField, raw: &str) -> bool {
        match field {
            SlideField::Title => {
                self.title = raw.to_string();
                true
            }
            SlideField::Description => {
                self.description = raw.to_string();
                true
            }
            SlideField::Layout => store_parsed(&mut self.layout, raw),
            SlideField::Position => store_parsed(&mut self.position, raw),
            SlideField::FontSize => store_parsed(&mut self.font_size, raw),
            SlideField::Animation => store_parsed(&mut self.animation, raw),
            SlideField::Background => match normalize_hex_color(raw) {
                Some(color) => {
                    self.background = color;
                    true
                }
                None => false,
            },
            SlideField::Image => match normalize_image(raw) {
                Some(url) => {
                    self.image = url;
                    true
                }
                None => false,
            },
        }
    }

    /// Build a slide from a JSON object, normalizing every field.
    ///
    /// Missing or `null` keys take the default value silently. Values of the
    /// wrong type or outside the allowed set also fall back to the default
    /// and are logged.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let mut slide = Slide::default();

        for &field in SlideField::all() {
            match object.get(field.key()) {
                None | Some(Value::Null) => {}
                Some(Value::String(raw)) => {
                    if !slide.apply(field, raw) {
                        warn!(
                            "Ignoring invalid value {:?} for '{}', using default",
                            raw,
                            field.key()
                        );
                    }
                }
                Some(other) => {
                    warn!(
                        "Ignoring non-string value {} for '{}', using default",
                        other,
                        field.key()
                    );
                }
            }
        }

        slide
    }
}

fn store_parsed<T: FromStr>(slot: &mut T, raw: &str) -> bool {
    match raw.parse() {
        Ok(value) => {
            *slot = value;
            true
        }
        Err(_) => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
