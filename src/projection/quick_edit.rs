//! Quick Edit projection
//!
//! `QuickEditView` holds the values shown by the form controls for the
//! active slide. It is loaded from the model and never written back
//! directly: control changes go through the session, which commits them to
//! the model first.

use crate::deck::{
    hex_to_rgb, normalize_hex_color, Animation, FontSize, Layout, Position, Slide, SlideField,
    DEFAULT_BACKGROUND,
};
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Form Values
// ─────────────────────────────────────────────────────────────────────────────

/// Current values of the Quick Edit controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickEditView {
    pub title: String,
    pub description: String,
    pub layout: Layout,
    pub position: Position,
    pub font_size: FontSize,
    /// Hex text shown next to the color picker
    pub background: String,
    /// Raw text of the image field, which may hold an unfinished URL
    pub image: String,
    pub animation: Animation,
    pub autoplay: bool,
    pub loop_playback: bool,
}

impl Default for QuickEditView {
    fn default() -> Self {
        let mut view = Self {
            title: String::new(),
            description: String::new(),
            layout: Layout::default(),
            position: Position::default(),
            font_size: FontSize::default(),
            background: DEFAULT_BACKGROUND.to_string(),
            image: String::new(),
            animation: Animation::default(),
            autoplay: false,
            loop_playback: false,
        };
        view.load_into_view(&Slide::default(), false, false);
        view
    }
}

impl QuickEditView {
    /// Populate every control from a slide and the deck flags.
    ///
    /// A background that is not a recognizable hex color shows the default
    /// color instead.
    pub fn load_into_view(&mut self, slide: &Slide, autoplay: bool, loop_playback: bool) {
        self.title = slide.title.clone();
        self.description = slide.description.clone();
        self.layout = slide.layout;
        self.position = slide.position;
        self.font_size = slide.font_size;
        self.background = normalize_hex_color(&slide.background)
            .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string());
        self.image = slide.image.clone();
        self.animation = slide.animation;
        self.autoplay = autoplay;
        self.loop_playback = loop_playback;
    }

    /// Reflect a raw control edit in the view.
    ///
    /// Text fields keep exactly what was typed, even when the model later
    /// rejects it. Enum fields only change on a recognized value.
    pub fn capture(&mut self, field: SlideField, raw: &str) {
        match field {
            SlideField::Title => self.title = raw.to_string(),
            SlideField::Description => self.description = raw.to_string(),
            SlideField::Background => self.background = raw.to_string(),
            SlideField::Image => self.image = raw.to_string(),
            SlideField::Layout => {
                if let Ok(layout) = raw.parse() {
                    self.layout = layout;
                }
            }
            SlideField::Position => {
                if let Ok(position) = raw.parse() {
                    self.position = position;
                }
            }
            SlideField::FontSize => {
                if let Ok(font_size) = raw.parse() {
                    self.font_size = font_size;
                }
            }
            SlideField::Animation => {
                if let Ok(animation) = raw.parse() {
                    self.animation = animation;
                }
            }
        }
    }

    /// Background as RGB for the color picker.
    pub fn background_rgb(&self) -> [u8; 3] {
        hex_to_rgb(&self.background)
            .or_else(|| hex_to_rgb(DEFAULT_BACKGROUND))
            .unwrap_or([0x0a, 0x9c, 0x97])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Debouncing
// ─────────────────────────────────────────────────────────────────────────────

/// Default quiet period before an image URL edit is applied.
pub const IMAGE_DEBOUNCE: Duration = Duration::from_millis(400);

/// An image URL typed for a specific slide, waiting for the quiet period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub slide: usize,
    pub url: String,
}

/// Single-slot debouncer.
///
/// Scheduling a new value replaces the pending one and restarts the timer,
/// so at most one value fires per quiet period and it is always the last
/// one written.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Replace any pending value and restart the quiet period at `now`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its quiet period has elapsed by `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if *due <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Take the pending value immediately, regardless of timing.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Time left until the pending value is due, if any.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, due)| due.saturating_duration_since(now))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
