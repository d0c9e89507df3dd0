//! Preview dispatch
//!
//! The dispatcher turns slides and decks into messages and hands them to a
//! `PreviewSink`. Delivery is fire-and-forget: no acknowledgment, no retry.

use super::message::{PreviewMessage, PreviewMode};
use crate::deck::{Deck, Slide};
use log::debug;

/// One step of a dispatch, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewEvent {
    /// Reset the target surface before the next message arrives
    Reload { mode: PreviewMode, seq: u64 },
    /// Content for the target surface
    Message { seq: u64, message: PreviewMessage },
}

impl PreviewEvent {
    pub fn seq(&self) -> u64 {
        match self {
            PreviewEvent::Reload { seq, .. } | PreviewEvent::Message { seq, .. } => *seq,
        }
    }

    pub fn mode(&self) -> PreviewMode {
        match self {
            PreviewEvent::Reload { mode, .. } => *mode,
            PreviewEvent::Message { message, .. } => message.preview_mode,
        }
    }
}

/// Transport to a preview surface.
pub trait PreviewSink {
    /// Deliver one event. Failures are swallowed by the sink.
    fn send(&mut self, event: PreviewEvent);
}

/// Pushes the current slide or deck to the preview surfaces.
///
/// Every dispatch gets a fresh sequence number. The reload and the message
/// of one dispatch share that number, which lets the surface discard
/// anything older than what it has already shown.
pub struct PreviewDispatcher {
    sink: Box<dyn PreviewSink>,
    next_seq: u64,
}

impl PreviewDispatcher {
    pub fn new(sink: Box<dyn PreviewSink>) -> Self {
        Self { sink, next_seq: 1 }
    }

    /// Show one slide on the card surface.
    pub fn push_slide(&mut self, slide: &Slide, autoplay: bool, loop_playback: bool) -> u64 {
        self.dispatch(PreviewMessage::card(slide, autoplay, loop_playback))
    }

    /// Show the whole deck on the deck surface.
    pub fn push_deck(&mut self, deck: &Deck) -> u64 {
        self.dispatch(PreviewMessage::deck(deck))
    }

    fn dispatch(&mut self, message: PreviewMessage) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;

        let mode = message.preview_mode;
        debug!(
            "Preview dispatch #{} to {} surface ({} slide(s))",
            seq,
            mode.as_str(),
            message.data.slides.len()
        );

        self.sink.send(PreviewEvent::Reload { mode, seq });
        self.sink.send(PreviewEvent::Message { seq, message });
        seq
    }
}

impl std::fmt::Debug for PreviewDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewDispatcher")
            .field("next_seq", &self.next_seq)
            .finish()
    }
}

/// A sink that keeps every event, for tests.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: std::rc::Rc<std::cell::RefCell<Vec<PreviewEvent>>>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PreviewEvent> {
        self.events.borrow().clone()
    }

    /// Only the message events, in order.
    pub fn messages(&self) -> Vec<PreviewMessage> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                PreviewEvent::Message { message, .. } => Some(message.clone()),
                PreviewEvent::Reload { .. } => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

#[cfg(test)]
impl PreviewSink for RecordingSink {
    fn send(&mut self, event: PreviewEvent) {
        self.events.borrow_mut().push(event);
    }
}
