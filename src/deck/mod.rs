//! Deck data model for MicroSnap
//!
//! This module defines the slide types and the `SlideModel` that owns the
//! deck for an editing session.
//!
//! - `slide.rs` - `Slide`, its enumerated properties, and field validation
//! - `model.rs` - `Deck`, `SlideModel`, and the slide count bounds

mod model;
mod slide;

pub use model::{Deck, SlideModel, MAX_SLIDES, MIN_SLIDES};
pub use slide::{
    hex_to_rgb, normalize_hex_color, rgb_to_hex, Animation, FontSize, Layout, Position, Slide,
    SlideField, DEFAULT_BACKGROUND,
};
