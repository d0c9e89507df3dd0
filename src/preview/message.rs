//! Preview message contract
//!
//! Both preview surfaces receive the same message shape:
//!
//! ```json
//! { "type": "updateDeck",
//!   "data": { "slides": [...], "autoplay": false, "loop": false },
//!   "previewMode": "card" }
//! ```

use crate::deck::{Deck, Slide};
use serde::Serialize;

/// Message type tag understood by the renderer.
pub const UPDATE_DECK: &str = "updateDeck";

/// Which surface a message targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// Single active slide
    Card,
    /// Full deck with navigation
    Deck,
}

impl PreviewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewMode::Card => "card",
            PreviewMode::Deck => "deck",
        }
    }
}

/// Payload of an `updateDeck` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewData {
    pub slides: Vec<Slide>,
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
}

/// A complete preview message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: PreviewData,
    pub preview_mode: PreviewMode,
}

impl PreviewMessage {
    /// Message carrying one slide for the card surface.
    pub fn card(slide: &Slide, autoplay: bool, loop_playback: bool) -> Self {
        Self {
            kind: UPDATE_DECK,
            data: PreviewData {
                slides: vec![slide.clone()],
                autoplay,
                loop_playback,
            },
            preview_mode: PreviewMode::Card,
        }
    }

    /// Message carrying every slide for the deck surface.
    pub fn deck(deck: &Deck) -> Self {
        Self {
            kind: UPDATE_DECK,
            data: PreviewData {
                slides: deck.slides.clone(),
                autoplay: deck.autoplay,
                loop_playback: deck.loop_playback,
            },
            preview_mode: PreviewMode::Deck,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_card_message_shape() {
        let message = PreviewMessage::card(&Slide::default(), true, false);
        let value: Value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["type"], json!("updateDeck"));
        assert_eq!(value["previewMode"], json!("card"));
        assert_eq!(value["data"]["slides"].as_array().unwrap().len(), 1);
        assert_eq!(value["data"]["slides"][0]["title"], json!("Example Title"));
        assert_eq!(value["data"]["autoplay"], json!(true));
        assert_eq!(value["data"]["loop"], json!(false));
    }

    #[test]
    fn test_deck_message_carries_all_slides() {
        let deck = Deck {
            slides: vec![Slide::default(); 3],
            autoplay: false,
            loop_playback: true,
        };
        let message = PreviewMessage::deck(&deck);
        let value: Value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["previewMode"], json!("deck"));
        assert_eq!(value["data"]["slides"].as_array().unwrap().len(), 3);
        assert_eq!(value["data"]["loop"], json!(true));
        assert_eq!(
            value["data"]["slides"],
            serde_json::to_value(&deck.slides).unwrap()
        );
    }
}
