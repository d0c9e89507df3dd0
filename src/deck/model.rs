//! The canonical deck and its mutation rules
//!
//! `SlideModel` is the single source of truth for an editing session: the
//! deck plus the index of the slide being edited. Every mutation either
//! succeeds completely or leaves the model untouched.

use super::slide::{Slide, SlideField};
use crate::error::{Error, Result};
use log::debug;
use serde::Serialize;

/// Maximum number of slides in a deck.
pub const MAX_SLIDES: usize = 5;

/// Minimum number of slides in a deck.
pub const MIN_SLIDES: usize = 1;

// ─────────────────────────────────────────────────────────────────────────────
// Deck
// ─────────────────────────────────────────────────────────────────────────────

/// An ordered list of slides plus playback flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deck {
    pub slides: Vec<Slide>,
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
}

impl Default for Deck {
    /// The built-in starting deck: one default slide, no autoplay, no loop.
    fn default() -> Self {
        Self {
            slides: vec![Slide::default()],
            autoplay: false,
            loop_playback: false,
        }
    }
}

impl Deck {
    /// Whether the slide count is inside `[MIN_SLIDES, MAX_SLIDES]`.
    pub fn has_valid_length(&self) -> bool {
        (MIN_SLIDES..=MAX_SLIDES).contains(&self.slides.len())
    }

    /// Check the slide count bound.
    pub fn validate(&self) -> Result<()> {
        if self.has_valid_length() {
            Ok(())
        } else {
            Err(Error::InvalidDeckShape {
                slide_count: self.slides.len(),
            })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Slide Model
// ─────────────────────────────────────────────────────────────────────────────

/// The deck being edited plus the active slide index.
///
/// Invariant: `active_index < deck.slides.len()` and the deck always holds
/// between `MIN_SLIDES` and `MAX_SLIDES` slides.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlideModel {
    deck: Deck,
    active_index: usize,
}

impl SlideModel {
    /// Create a model holding the default deck.
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn len(&self) -> usize {
        self.deck.slides.len()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// The slide currently being edited.
    pub fn active_slide(&self) -> &Slide {
        // The invariant guarantees the index is in range; fall back to the
        // first slide rather than panicking if it ever is not.
        self.deck
            .slides
            .get(self.active_index)
            .unwrap_or(&self.deck.slides[0])
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.deck.slides.get(index)
    }

    pub fn can_add_slide(&self) -> bool {
        self.len() < MAX_SLIDES
    }

    pub fn can_remove_slide(&self) -> bool {
        self.len() > MIN_SLIDES
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a default slide and make it active.
    ///
    /// Returns the index of the new slide.
    pub fn add_slide(&mut self) -> Result<usize> {
        if !self.can_add_slide() {
            return Err(Error::CapacityExceeded);
        }

        self.deck.slides.push(Slide::default());
        self.active_index = self.len() - 1;
        debug!("Added slide {}", self.active_index + 1);
        Ok(self.active_index)
    }

    /// Remove the slide at `index`; the slide before it becomes active.
    pub fn remove_slide(&mut self, index: usize) -> Result<()> {
        if !self.can_remove_slide() {
            return Err(Error::MinimumSlidesViolation);
        }
        self.check_index(index)?;

        self.deck.slides.remove(index);
        self.active_index = index.saturating_sub(1);
        debug!(
            "Removed slide {}, active slide is now {}",
            index + 1,
            self.active_index + 1
        );
        Ok(())
    }

    pub fn set_active_index(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.active_index = index;
        Ok(())
    }

    /// Update one field of the slide at `index`.
    ///
    /// Values that fail validation are dropped and the prior value is kept;
    /// this is not an error. Returns the slide as it is after the update.
    pub fn update_slide_field(
        &mut self,
        index: usize,
        field: SlideField,
        value: &str,
    ) -> Result<&Slide> {
        self.check_index(index)?;
        let slide = &mut self.deck.slides[index];

        if !slide.apply(field, value) {
            debug!(
                "Dropped invalid {} value {:?} for slide {}",
                field.key(),
                value,
                index + 1
            );
        }

        Ok(&self.deck.slides[index])
    }

    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.deck.autoplay = autoplay;
    }

    pub fn set_loop(&mut self, loop_playback: bool) {
        self.deck.loop_playback = loop_playback;
    }

    /// Replace the whole deck.
    ///
    /// The new deck must satisfy the same slide bounds as the Quick Edit
    /// path. The active index is kept when still valid, otherwise clamped to
    /// the last slide.
    pub fn replace_deck(&mut self, deck: Deck) -> Result<()> {
        deck.validate()?;

        self.deck = deck;
        self.active_index = self.active_index.min(self.len() - 1);
        debug!(
            "Deck replaced: {} slide(s), active slide {}",
            self.len(),
            self.active_index + 1
        );
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(Error::SlideIndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
