//! In-process preview transport
//!
//! `ChannelSink` sends preview events over an mpsc channel; `PreviewSurface`
//! owns the receiving end and is polled by the UI once per frame.

use super::dispatcher::{PreviewEvent, PreviewSink};
use super::message::{PreviewMessage, PreviewMode};
use crate::deck::Slide;
use log::{debug, trace};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Create a connected sink and surface pair.
pub fn preview_channel() -> (ChannelSink, PreviewSurface) {
    let (tx, rx) = channel();
    (ChannelSink { sender: tx }, PreviewSurface::new(rx))
}

// ─────────────────────────────────────────────────────────────────────────────
// Sender
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<PreviewEvent>,
}

impl PreviewSink for ChannelSink {
    fn send(&mut self, event: PreviewEvent) {
        // The surface may be gone while the window closes
        if self.sender.send(event).is_err() {
            trace!("Preview surface disconnected, dropping event");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Receiver
// ─────────────────────────────────────────────────────────────────────────────

/// What one preview surface currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceState {
    seq: u64,
    loading: bool,
    message: Option<PreviewMessage>,
    /// Slide shown by the deck surface
    current: usize,
}

impl SurfaceState {
    /// Sequence number of the newest dispatch this surface accepted.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// True between a reload and the message that follows it.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn message(&self) -> Option<&PreviewMessage> {
        self.message.as_ref()
    }

    pub fn slide_count(&self) -> usize {
        self.message.as_ref().map_or(0, |m| m.data.slides.len())
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.message
            .as_ref()
            .and_then(|m| m.data.slides.get(self.current))
    }

    fn loops(&self) -> bool {
        self.message.as_ref().is_some_and(|m| m.data.loop_playback)
    }

    /// Advance to the next slide, wrapping only when the deck loops.
    pub fn next(&mut self) {
        let count = self.slide_count();
        if count == 0 {
            return;
        }
        if self.current + 1 < count {
            self.current += 1;
        } else if self.loops() {
            self.current = 0;
        }
    }

    /// Go back one slide, wrapping only when the deck loops.
    pub fn previous(&mut self) {
        let count = self.slide_count();
        if count == 0 {
            return;
        }
        if self.current > 0 {
            self.current -= 1;
        } else if self.loops() {
            self.current = count - 1;
        }
    }

    /// Apply one event; returns whether anything changed.
    fn apply(&mut self, event: PreviewEvent) -> bool {
        match event {
            PreviewEvent::Reload { seq, .. } => {
                if seq <= self.seq {
                    return false;
                }
                self.seq = seq;
                self.loading = true;
                true
            }
            PreviewEvent::Message { seq, message } => {
                if seq < self.seq {
                    debug!(
                        "Discarding stale {} preview #{} (showing #{})",
                        message.preview_mode.as_str(),
                        seq,
                        self.seq
                    );
                    return false;
                }
                self.seq = seq;
                self.loading = false;
                self.message = Some(message);
                self.current = 0;
                true
            }
        }
    }
}

/// Receiving side of the preview channel, holding both surfaces.
#[derive(Debug)]
pub struct PreviewSurface {
    receiver: Receiver<PreviewEvent>,
    card: SurfaceState,
    deck: SurfaceState,
}

impl PreviewSurface {
    fn new(receiver: Receiver<PreviewEvent>) -> Self {
        Self {
            receiver,
            card: SurfaceState::default(),
            deck: SurfaceState::default(),
        }
    }

    /// Drain pending events. Non-blocking; returns whether any surface changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.receiver.try_recv() {
            changed |= self.apply(event);
        }
        changed
    }

    /// Apply a single event to the surface it targets.
    pub fn apply(&mut self, event: PreviewEvent) -> bool {
        match event.mode() {
            PreviewMode::Card => self.card.apply(event),
            PreviewMode::Deck => self.deck.apply(event),
        }
    }

    pub fn card(&self) -> &SurfaceState {
        &self.card
    }

    pub fn deck(&self) -> &SurfaceState {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut SurfaceState {
        &mut self.deck
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::preview::PreviewDispatcher;

    fn titled(title: &str) -> Slide {
        Slide {
            title: title.to_string(),
            ..Slide::default()
        }
    }

    #[test]
    fn test_surface_receives_dispatches() {
        let (sink, mut surface) = preview_channel();
        let mut dispatcher = PreviewDispatcher::new(Box::new(sink));

        dispatcher.push_slide(&titled("One"), false, false);
        assert!(surface.poll());
        assert!(!surface.card().is_loading());
        assert_eq!(surface.card().current_slide().unwrap().title, "One");
        assert!(surface.deck().message().is_none());

        assert!(!surface.poll());
    }

    #[test]
    fn test_last_write_wins_between_rapid_dispatches() {
        let (sink, mut surface) = preview_channel();
        let mut dispatcher = PreviewDispatcher::new(Box::new(sink));

        dispatcher.push_slide(&titled("A"), false, false);
        dispatcher.push_slide(&titled("AB"), false, false);
        dispatcher.push_slide(&titled("ABC"), false, false);
        surface.poll();

        assert_eq!(surface.card().current_slide().unwrap().title, "ABC");
        assert_eq!(surface.card().seq(), 3);
    }

    #[test]
    fn test_stale_message_does_not_overwrite_newer() {
        let (_sink, mut surface) = preview_channel();
        let newer = PreviewMessage::card(&titled("new"), false, false);
        let older = PreviewMessage::card(&titled("old"), false, false);

        surface.apply(PreviewEvent::Reload {
            mode: PreviewMode::Card,
            seq: 2,
        });
        surface.apply(PreviewEvent::Message {
            seq: 2,
            message: newer,
        });
        // A message from dispatch #1 arriving late
        assert!(!surface.apply(PreviewEvent::Message {
            seq: 1,
            message: older,
        }));
        assert!(!surface.apply(PreviewEvent::Reload {
            mode: PreviewMode::Card,
            seq: 1,
        }));

        assert_eq!(surface.card().current_slide().unwrap().title, "new");
        assert!(!surface.card().is_loading());
    }

    #[test]
    fn test_reload_marks_surface_loading_until_message() {
        let (_sink, mut surface) = preview_channel();
        surface.apply(PreviewEvent::Reload {
            mode: PreviewMode::Deck,
            seq: 1,
        });
        assert!(surface.deck().is_loading());
        assert!(!surface.card().is_loading());

        surface.apply(PreviewEvent::Message {
            seq: 1,
            message: PreviewMessage::deck(&Deck::default()),
        });
        assert!(!surface.deck().is_loading());
    }

    #[test]
    fn test_deck_navigation_respects_loop() {
        let (sink, mut surface) = preview_channel();
        let mut dispatcher = PreviewDispatcher::new(Box::new(sink));
        let mut deck = Deck {
            slides: vec![titled("1"), titled("2"), titled("3")],
            autoplay: false,
            loop_playback: false,
        };

        dispatcher.push_deck(&deck);
        surface.poll();
        let state = surface.deck_mut();
        state.previous();
        assert_eq!(state.current_index(), 0);
        state.next();
        state.next();
        state.next();
        assert_eq!(state.current_index(), 2);

        deck.loop_playback = true;
        dispatcher.push_deck(&deck);
        surface.poll();
        let state = surface.deck_mut();
        assert_eq!(state.current_index(), 0);
        state.previous();
        assert_eq!(state.current_index(), 2);
        state.next();
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn test_sink_survives_dropped_surface() {
        let (sink, surface) = preview_channel();
        drop(surface);
        let mut dispatcher = PreviewDispatcher::new(Box::new(sink));
        dispatcher.push_deck(&Deck::default());
    }
}
