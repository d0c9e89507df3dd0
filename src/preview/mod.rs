//! Live preview for MicroSnap
//!
//! The session pushes the active slide (card surface) or the whole deck
//! (deck surface) through a `PreviewSink`. The builder window drains the
//! in-process channel each frame.
//!
//! - `message.rs` - the `updateDeck` message contract
//! - `dispatcher.rs` - `PreviewDispatcher` and the `PreviewSink` trait
//! - `surface.rs` - channel transport and the receiving `PreviewSurface`

mod dispatcher;
mod message;
mod surface;

#[cfg(test)]
pub use dispatcher::RecordingSink;
pub use dispatcher::{PreviewDispatcher, PreviewEvent, PreviewSink};
pub use message::{PreviewData, PreviewMessage, PreviewMode, UPDATE_DECK};
pub use surface::{preview_channel, ChannelSink, PreviewSurface, SurfaceState};
