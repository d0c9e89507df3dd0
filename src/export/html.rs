//! Standalone HTML export
//!
//! This module turns a deck into a single HTML file that replays it with
//! the renderer script. The style sheet and script are inlined, so the only
//! external reference is the icon font stylesheet.

use super::assets::{AssetSource, ExportAssets};
use crate::deck::Deck;
use crate::error::Result;
use log::info;

/// Title of every exported document.
pub const DOCUMENT_TITLE: &str = "MicroSnap Deck";

/// Icon font used by the navigation buttons.
pub const ICON_FONT_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/7.0.1/css/all.min.css";

/// The single call that starts playback in an exported document.
pub const RENDER_CALL: &str = r#"renderDeck(deckData, "export");"#;

const BUILDER_URL: &str = "https://microsnap-builder.netlify.app/";

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Build the exported document for `deck`.
///
/// Pure: the same deck and assets always give the same output. The deck is
/// embedded as a pretty JSON literal assigned to `deckData`, with `</`
/// escaped as `<\/` so slide text cannot end the script element early.
pub fn serialize(deck: &Deck, assets: &ExportAssets) -> String {
    let deck_json = script_safe(&crate::projection::json::render(deck));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<link rel="stylesheet" href="{icon_css}">
<style>
{style}
</style>
</head>
<body>
<div class="deck-container">
  <div class="progress-bar" id="progressBar"></div>
  <div class="slides" id="slides"></div>
  <div class="nav-arrows">
    <button id="prevSlide"><i class="fa-solid fa-chevron-left"></i></button>
    <button id="nextSlide"><i class="fa-solid fa-chevron-right"></i></button>
  </div>
  <div class="slide-counter">
    <a href="{builder_url}" target="_blank" title="Made with MicroSnap Builder"><i class="fa-solid fa-bolt"></i></a><span id="slideCounter"></span>
  </div>
</div>
<script>
const deckData = {deck_json};
{script}
{render_call}
</script>
</body>
</html>
"#,
        title = DOCUMENT_TITLE,
        icon_css = ICON_FONT_CSS,
        style = assets.style,
        builder_url = BUILDER_URL,
        deck_json = deck_json,
        script = assets.script,
        render_call = RENDER_CALL,
    )
}

/// Fetch the assets from `source` and build the exported document.
///
/// Returns `Error::AssetUnavailable` if either asset cannot be obtained;
/// no partial document is ever produced.
pub fn export_deck(deck: &Deck, source: &dyn AssetSource) -> Result<String> {
    let assets = source.load()?;
    let html = serialize(deck, &assets);
    info!(
        "Exported deck with {} slide(s) ({} bytes)",
        deck.slides.len(),
        html.len()
    );
    Ok(html)
}

/// Escape `</` so JSON text can sit inside a `<script>` element.
///
/// `\/` is a valid JSON escape for `/`, so the literal still parses to the
/// same value.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Slide, SlideModel};
    use crate::error::Error;
    use crate::export::assets::StaticAssets;
    use crate::projection::json::parse_deck;

    fn assets() -> ExportAssets {
        ExportAssets {
            style: ".slide { display: flex; }".to_string(),
            script: "function renderDeck(data, mode) { /* draw */ }".to_string(),
        }
    }

    /// Pull the JSON literal assigned to `deckData` back out of a document.
    fn embedded_json(html: &str) -> String {
        let start = html.find("const deckData = ").unwrap() + "const deckData = ".len();
        let end = html[start..].find("};\n").unwrap() + start + 1;
        html[start..end].to_string()
    }

    #[test]
    fn test_document_structure() {
        let html = serialize(&Deck::default(), &assets());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>MicroSnap Deck</title>"));
        assert!(html.contains(ICON_FONT_CSS));
        assert!(html.contains("<style>\n.slide { display: flex; }\n</style>"));
        assert!(html.contains("id=\"prevSlide\""));
        assert!(html.contains("id=\"nextSlide\""));
        assert!(html.contains("id=\"slideCounter\""));
        assert!(html.contains("function renderDeck(data, mode)"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_single_render_call_and_embedded_deck() {
        let mut model = SlideModel::new();
        for _ in 0..3 {
            model.add_slide().unwrap();
        }
        model.set_autoplay(true);
        let deck = model.deck().clone();

        let html = serialize(&deck, &assets());
        assert_eq!(html.matches(RENDER_CALL).count(), 1);
        assert_eq!(html.matches("const deckData = ").count(), 1);
        assert_eq!(parse_deck(&embedded_json(&html)).unwrap(), deck);
    }

    #[test]
    fn test_layout_written_with_renderer_class_names() {
        let deck = Deck {
            slides: vec![
                Slide::default(),
                Slide {
                    layout: crate::deck::Layout::ImageRight,
                    ..Slide::default()
                },
            ],
            ..Deck::default()
        };

        let html = serialize(&deck, &assets());
        let literal = embedded_json(&html);
        assert!(literal.contains("\"layout\": \"layout-overlay\""));
        assert!(literal.contains("\"layout\": \"layout-image-right\""));
        assert!(!literal.contains("\"layout\": \"overlay\""));
        assert_eq!(parse_deck(&literal).unwrap(), deck);
    }

    #[test]
    fn test_script_end_tag_in_deck_text_is_escaped() {
        let deck = Deck {
            slides: vec![Slide {
                title: "</script><script>alert(1)</script>".to_string(),
                ..Slide::default()
            }],
            ..Deck::default()
        };

        let html = serialize(&deck, &assets());
        assert_eq!(html.matches("</script>").count(), 1);

        let parsed = parse_deck(&embedded_json(&html)).unwrap();
        assert_eq!(parsed.slides[0].title, deck.slides[0].title);
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let deck = Deck::default();
        assert_eq!(serialize(&deck, &assets()), serialize(&deck, &assets()));
    }

    #[test]
    fn test_export_deck_with_source() {
        let source = StaticAssets::new("`.a{}`", "`function renderDeck(){}`");
        let html = export_deck(&Deck::default(), &source).unwrap();
        assert!(html.contains("<style>\n.a{}\n</style>"));
        assert!(html.contains("function renderDeck(){}"));
    }

    #[test]
    fn test_export_deck_fails_without_assets() {
        let source = StaticAssets {
            style: Some("css".to_string()),
            script: None,
        };
        assert!(matches!(
            export_deck(&Deck::default(), &source),
            Err(Error::AssetUnavailable { .. })
        ));
    }
}
