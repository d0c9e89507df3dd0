//! Editing session and command dispatch
//!
//! `Session` owns the deck and every view derived from it. UI code never
//! mutates the deck directly; it sends a `Command`, and the session applies
//! it to the model, regenerates the other views from the model, and pushes
//! the result to the preview surfaces.

use crate::deck::{Deck, SlideField, SlideModel};
use crate::error::{Error, Result};
use crate::export::{export_deck, AssetSource};
use crate::preview::{PreviewDispatcher, PreviewSink};
use crate::projection::{
    json, Debouncer, JsonEditor, PendingImage, QuickEditView, COMMIT_SUCCESS_MESSAGE,
};
use log::{debug, info};
use std::sync::Arc;
use std::time::{Duration, Instant};

// ─────────────────────────────────────────────────────────────────────────────
// Editor Mode
// ─────────────────────────────────────────────────────────────────────────────

/// Which projection the user is editing through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Form controls for the active slide
    #[default]
    QuickEdit,
    /// The whole deck as JSON text
    Advanced,
}

impl EditorMode {
    pub fn toggle(&self) -> Self {
        match self {
            EditorMode::QuickEdit => EditorMode::Advanced,
            EditorMode::Advanced => EditorMode::QuickEdit,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditorMode::QuickEdit => "Quick Edit",
            EditorMode::Advanced => "Advanced",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Every change a user can make to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddSlide,
    RemoveSlide(usize),
    SetActiveSlide(usize),
    /// A Quick Edit control changed; applies to the active slide
    UpdateField {
        field: SlideField,
        value: String,
    },
    SetAutoplay(bool),
    SetLoop(bool),
    /// Replace the deck with the given JSON text
    CommitJson(String),
    /// Show the whole deck on the deck preview surface
    PreviewDeck,
    /// Build the standalone HTML document
    Export,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::AddSlide => "AddSlide",
            Command::RemoveSlide(_) => "RemoveSlide",
            Command::SetActiveSlide(_) => "SetActiveSlide",
            Command::UpdateField { .. } => "UpdateField",
            Command::SetAutoplay(_) => "SetAutoplay",
            Command::SetLoop(_) => "SetLoop",
            Command::CommitJson(_) => "CommitJson",
            Command::PreviewDeck => "PreviewDeck",
            Command::Export => "Export",
        }
    }

    /// Commands whose controls are disabled while the JSON editor is open.
    fn is_quick_edit_only(&self) -> bool {
        matches!(
            self,
            Command::AddSlide
                | Command::RemoveSlide(_)
                | Command::SetActiveSlide(_)
                | Command::UpdateField { .. }
        )
    }
}

/// Result of a successfully applied command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    Exported(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// One editing session: the deck, its two views, and the preview link.
pub struct Session {
    model: SlideModel,
    view: QuickEditView,
    json: JsonEditor,
    preview: PreviewDispatcher,
    image_debounce: Debouncer<PendingImage>,
    mode: EditorMode,
    assets: Arc<dyn AssetSource>,
}

impl Session {
    /// Start a session with the default deck and show its first slide.
    pub fn new(
        sink: Box<dyn PreviewSink>,
        assets: Arc<dyn AssetSource>,
        image_debounce: Duration,
    ) -> Self {
        let model = SlideModel::new();
        let json = JsonEditor::new(model.deck());

        let mut session = Self {
            model,
            view: QuickEditView::default(),
            json,
            preview: PreviewDispatcher::new(sink),
            image_debounce: Debouncer::new(image_debounce),
            mode: EditorMode::default(),
            assets,
        };
        session.reload_view();
        session.push_active_slide();
        info!("Editing session started with assets from {}", session.assets.describe());
        session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn model(&self) -> &SlideModel {
        &self.model
    }

    pub fn deck(&self) -> &Deck {
        self.model.deck()
    }

    pub fn view(&self) -> &QuickEditView {
        &self.view
    }

    pub fn json(&self) -> &JsonEditor {
        &self.json
    }

    /// The JSON buffer, for the text widget. Edits reach the deck only
    /// through `Command::CommitJson`.
    pub fn json_mut(&mut self) -> &mut JsonEditor {
        &mut self.json
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn assets(&self) -> Arc<dyn AssetSource> {
        Arc::clone(&self.assets)
    }

    pub fn set_assets(&mut self, assets: Arc<dyn AssetSource>) {
        debug!("Export assets now come from {}", assets.describe());
        self.assets = assets;
    }

    pub fn set_image_debounce(&mut self, delay: Duration) {
        self.image_debounce.set_delay(delay);
    }

    /// Time until a pending image edit is applied, if one is waiting.
    pub fn image_due_in(&self, now: Instant) -> Option<Duration> {
        self.image_debounce.time_until_due(now)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Command Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply one command, timing debounced edits from now.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        self.dispatch_at(command, Instant::now())
    }

    /// Apply one command.
    ///
    /// A failed command leaves the deck exactly as it was.
    pub fn dispatch_at(&mut self, command: Command, now: Instant) -> Result<Outcome> {
        if self.mode == EditorMode::Advanced && command.is_quick_edit_only() {
            debug!("{} rejected in Advanced mode", command.name());
            return Err(Error::ModeLocked);
        }
        debug!("Dispatching {}", command.name());

        match command {
            Command::AddSlide => {
                self.flush_pending_image();
                self.model.add_slide()?;
                self.after_structure_change();
            }
            Command::RemoveSlide(index) => {
                self.flush_pending_image();
                self.model.remove_slide(index)?;
                self.after_structure_change();
            }
            Command::SetActiveSlide(index) => {
                self.flush_pending_image();
                self.model.set_active_index(index)?;
                self.reload_view();
                self.push_active_slide();
            }
            Command::UpdateField { field, value } => {
                self.view.capture(field, &value);
                if field.is_debounced() {
                    let pending = PendingImage {
                        slide: self.model.active_index(),
                        url: value,
                    };
                    self.image_debounce.schedule(pending, now);
                    self.poll_image(now);
                } else {
                    self.apply_field(self.model.active_index(), field, &value)?;
                }
            }
            Command::SetAutoplay(autoplay) => {
                self.model.set_autoplay(autoplay);
                self.view.autoplay = autoplay;
                self.json.render(self.model.deck());
            }
            Command::SetLoop(loop_playback) => {
                self.model.set_loop(loop_playback);
                self.view.loop_playback = loop_playback;
                self.json.render(self.model.deck());
            }
            Command::CommitJson(raw) => self.commit_json(&raw)?,
            Command::PreviewDeck => {
                self.flush_pending_image();
                self.preview.push_deck(self.model.deck());
            }
            Command::Export => {
                self.flush_pending_image();
                let html = export_deck(self.model.deck(), self.assets.as_ref())?;
                return Ok(Outcome::Exported(html));
            }
        }

        Ok(Outcome::Updated)
    }

    /// Switch editor mode.
    ///
    /// Both views are regenerated from the deck, discarding any uncommitted
    /// JSON text.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if mode == self.mode {
            return;
        }
        self.flush_pending_image();
        self.mode = mode;
        self.json.render(self.model.deck());
        self.json.clear_status();
        self.reload_view();
        info!("Editor mode: {}", mode.label());
    }

    /// Apply a pending image edit whose quiet period has passed.
    ///
    /// Returns whether an edit was applied.
    pub fn poll_image(&mut self, now: Instant) -> bool {
        match self.image_debounce.take_due(now) {
            Some(pending) => {
                self.apply_pending_image(pending);
                true
            }
            None => false,
        }
    }

    /// Deck and asset source for an export run off the UI thread.
    pub fn export_snapshot(&mut self) -> (Deck, Arc<dyn AssetSource>) {
        self.flush_pending_image();
        (self.model.deck().clone(), Arc::clone(&self.assets))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn commit_json(&mut self, raw: &str) -> Result<()> {
        self.flush_pending_image();
        // The buffer shows what was committed, whatever the outcome
        if self.json.text() != raw {
            *self.json.text_mut() = raw.to_string();
        }

        match json::commit(&mut self.model, raw) {
            Ok(()) => {
                self.reload_view();
                self.push_active_slide();
                self.json.set_success(COMMIT_SUCCESS_MESSAGE);
                Ok(())
            }
            Err(e) => {
                debug!("JSON commit rejected: {:?}", e);
                self.json.set_warning(e.to_string());
                Err(e)
            }
        }
    }

    fn apply_field(&mut self, index: usize, field: SlideField, value: &str) -> Result<()> {
        self.model.update_slide_field(index, field, value)?;
        self.json.render(self.model.deck());
        if index == self.model.active_index() {
            self.push_active_slide();
        }
        Ok(())
    }

    fn flush_pending_image(&mut self) {
        if let Some(pending) = self.image_debounce.flush() {
            self.apply_pending_image(pending);
        }
    }

    fn apply_pending_image(&mut self, pending: PendingImage) {
        if let Err(e) = self.apply_field(pending.slide, SlideField::Image, &pending.url) {
            debug!("Dropped image edit for slide {}: {}", pending.slide + 1, e);
        }
    }

    fn after_structure_change(&mut self) {
        self.json.render(self.model.deck());
        self.reload_view();
        self.push_active_slide();
    }

    fn reload_view(&mut self) {
        let deck = self.model.deck();
        self.view
            .load_into_view(self.model.active_slide(), deck.autoplay, deck.loop_playback);
    }

    fn push_active_slide(&mut self) {
        let deck = self.model.deck();
        self.preview
            .push_slide(self.model.active_slide(), deck.autoplay, deck.loop_playback);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("model", &self.model)
            .field("mode", &self.mode)
            .field("preview", &self.preview)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Layout, Slide, MAX_SLIDES};
    use crate::export::assets::StaticAssets;
    use crate::export::html::RENDER_CALL;
    use crate::preview::{PreviewMode, RecordingSink};
    use crate::projection::JsonStatus;

    const DEBOUNCE: Duration = Duration::from_millis(400);

    fn session() -> (Session, RecordingSink) {
        let sink = RecordingSink::new();
        let assets = StaticAssets::new(
            "export const css = `.slide{}`;",
            "export const js = `function renderDeck(d, m) {}`;",
        );
        let session = Session::new(Box::new(sink.clone()), Arc::new(assets), DEBOUNCE);
        (session, sink)
    }

    fn field(field: SlideField, value: &str) -> Command {
        Command::UpdateField {
            field,
            value: value.to_string(),
        }
    }

    fn embedded_json(html: &str) -> &str {
        let start = html.find("const deckData = ").unwrap() + "const deckData = ".len();
        let end = html[start..].find("};\n").unwrap() + start + 1;
        &html[start..end]
    }

    #[test]
    fn test_new_session_shows_default_slide() {
        let (session, sink) = session();
        assert_eq!(session.deck(), &Deck::default());
        assert_eq!(session.mode(), EditorMode::QuickEdit);
        assert_eq!(session.json().text(), json::render(&Deck::default()));
        assert_eq!(session.view().title, "Example Title");

        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].preview_mode, PreviewMode::Card);
    }

    #[test]
    fn test_capacity_end_to_end() {
        let (mut session, _) = session();
        for _ in 0..4 {
            session.dispatch(Command::AddSlide).unwrap();
        }
        let json_before = session.json().text().to_string();

        let result = session.dispatch(Command::AddSlide);
        assert!(matches!(result, Err(Error::CapacityExceeded)));
        assert_eq!(session.model().len(), MAX_SLIDES);
        assert_eq!(session.json().text(), json_before);
    }

    #[test]
    fn test_add_slide_reprojects_and_previews() {
        let (mut session, sink) = session();
        session.dispatch(field(SlideField::Title, "First")).unwrap();
        sink.clear();

        session.dispatch(Command::AddSlide).unwrap();
        assert_eq!(session.model().active_index(), 1);
        assert_eq!(session.view().title, "Example Title");
        assert_eq!(
            json::parse_deck(session.json().text()).unwrap(),
            *session.deck()
        );
        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].data.slides[0], Slide::default());
    }

    #[test]
    fn test_remove_last_slide_is_rejected() {
        let (mut session, _) = session();
        assert!(matches!(
            session.dispatch(Command::RemoveSlide(0)),
            Err(Error::MinimumSlidesViolation)
        ));
        assert_eq!(session.model().len(), 1);
    }

    #[test]
    fn test_remove_slide_loads_previous() {
        let (mut session, _) = session();
        session.dispatch(field(SlideField::Title, "A")).unwrap();
        session.dispatch(Command::AddSlide).unwrap();
        session.dispatch(field(SlideField::Title, "B")).unwrap();

        session.dispatch(Command::RemoveSlide(1)).unwrap();
        assert_eq!(session.model().active_index(), 0);
        assert_eq!(session.view().title, "A");
    }

    #[test]
    fn test_set_active_slide_loads_view() {
        let (mut session, sink) = session();
        session.dispatch(Command::AddSlide).unwrap();
        session.dispatch(field(SlideField::Layout, "text-only")).unwrap();
        session.dispatch(Command::SetActiveSlide(0)).unwrap();
        assert_eq!(session.view().layout, Layout::Overlay);

        session.dispatch(Command::SetActiveSlide(1)).unwrap();
        assert_eq!(session.view().layout, Layout::TextOnly);
        assert_eq!(
            sink.messages().last().unwrap().data.slides[0].layout,
            Layout::TextOnly
        );

        assert!(matches!(
            session.dispatch(Command::SetActiveSlide(5)),
            Err(Error::SlideIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_field_update_reaches_json_and_preview() {
        let (mut session, sink) = session();
        session.dispatch(field(SlideField::Title, "Hello")).unwrap();

        assert_eq!(session.deck().slides[0].title, "Hello");
        assert!(session.json().text().contains("\"title\": \"Hello\""));
        assert_eq!(sink.messages().last().unwrap().data.slides[0].title, "Hello");
    }

    #[test]
    fn test_background_normalized_and_invalid_dropped() {
        let (mut session, _) = session();
        session.dispatch(field(SlideField::Background, "#abc")).unwrap();
        assert_eq!(session.deck().slides[0].background, "#aabbcc");

        session
            .dispatch(field(SlideField::Background, "not-a-color"))
            .unwrap();
        assert_eq!(session.deck().slides[0].background, "#aabbcc");
        assert_eq!(session.view().background, "not-a-color");
    }

    #[test]
    fn test_image_edits_are_debounced() {
        let (mut session, sink) = session();
        let t0 = Instant::now();
        sink.clear();

        session
            .dispatch_at(field(SlideField::Image, "h"), t0)
            .unwrap();
        session
            .dispatch_at(
                field(SlideField::Image, "https://example.com/a.png"),
                t0 + Duration::from_millis(100),
            )
            .unwrap();
        assert_eq!(session.deck().slides[0].image, "");
        assert_eq!(session.view().image, "https://example.com/a.png");
        assert!(sink.messages().is_empty());

        assert!(!session.poll_image(t0 + Duration::from_millis(450)));
        assert!(session.poll_image(t0 + Duration::from_millis(500)));
        assert_eq!(session.deck().slides[0].image, "https://example.com/a.png");
        assert_eq!(sink.messages().len(), 1);
        assert!(session.image_due_in(t0).is_none());
    }

    #[test]
    fn test_pending_image_flushes_to_original_slide() {
        let (mut session, _) = session();
        session
            .dispatch(field(SlideField::Image, "example/beach.jpg"))
            .unwrap();
        session.dispatch(Command::AddSlide).unwrap();

        assert_eq!(session.deck().slides[0].image, "example/beach.jpg");
        assert_eq!(session.deck().slides[1].image, "");
        assert_eq!(session.view().image, "");
    }

    #[test]
    fn test_zero_debounce_applies_immediately() {
        let (mut session, _) = session();
        session.set_image_debounce(Duration::ZERO);
        session
            .dispatch(field(SlideField::Image, "https://example.com/b.png"))
            .unwrap();
        assert_eq!(session.deck().slides[0].image, "https://example.com/b.png");
    }

    #[test]
    fn test_advanced_mode_locks_structure() {
        let (mut session, _) = session();
        session.set_mode(EditorMode::Advanced);

        for command in [
            Command::AddSlide,
            Command::RemoveSlide(0),
            Command::SetActiveSlide(0),
            field(SlideField::Title, "x"),
        ] {
            assert!(matches!(session.dispatch(command), Err(Error::ModeLocked)));
        }
        assert!(session.dispatch(Command::SetAutoplay(true)).is_ok());
        assert!(session.dispatch(Command::PreviewDeck).is_ok());
    }

    #[test]
    fn test_mode_switch_discards_uncommitted_json() {
        let (mut session, _) = session();
        session.set_mode(EditorMode::Advanced);
        session.json_mut().text_mut().push_str("garbage");

        session.set_mode(EditorMode::QuickEdit);
        assert_eq!(session.json().text(), json::render(session.deck()));
        assert!(session.json().status().is_none());
    }

    #[test]
    fn test_commit_parse_error_keeps_deck() {
        let (mut session, _) = session();
        session.set_mode(EditorMode::Advanced);
        let before = session.deck().clone();

        let result = session.dispatch(Command::CommitJson("{not json".to_string()));
        assert!(matches!(result, Err(Error::Parse(_))));
        assert_eq!(session.deck(), &before);
        assert_eq!(
            session.json().status(),
            Some(&JsonStatus::Warning(
                "Your code is not formatted correctly.".to_string()
            ))
        );
        assert_eq!(session.json().text(), "{not json");
    }

    #[test]
    fn test_commit_shape_error_keeps_deck() {
        let (mut session, _) = session();
        let before = session.deck().clone();
        let result = session.dispatch(Command::CommitJson(r#"{"autoplay": false}"#.to_string()));
        assert!(matches!(result, Err(Error::Shape(_))));
        assert_eq!(session.deck(), &before);
        assert_eq!(
            session.json().status().map(|s| s.message()),
            Some("Missing or invalid 'slides' array.")
        );
    }

    #[test]
    fn test_commit_rejects_oversized_deck() {
        let (mut session, _) = session();
        let raw = r#"{"slides": [{}, {}, {}, {}, {}, {}]}"#.to_string();
        assert!(matches!(
            session.dispatch(Command::CommitJson(raw)),
            Err(Error::InvalidDeckShape { slide_count: 6 })
        ));
        assert_eq!(session.model().len(), 1);
    }

    #[test]
    fn test_commit_success_updates_views() {
        let (mut session, sink) = session();
        session.set_mode(EditorMode::Advanced);
        sink.clear();

        let raw = r#"{
  "slides": [
    { "title": "One", "layout": "layout-image-left" },
    { "title": "Two" }
  ],
  "autoplay": true
}"#;
        session
            .dispatch(Command::CommitJson(raw.to_string()))
            .unwrap();

        assert_eq!(session.model().len(), 2);
        assert_eq!(session.deck().slides[0].layout, Layout::ImageLeft);
        assert!(session.deck().autoplay);
        assert_eq!(session.view().title, "One");
        assert!(session.view().autoplay);
        assert_eq!(session.json().text(), raw);
        assert_eq!(
            session.json().status(),
            Some(&JsonStatus::Success(COMMIT_SUCCESS_MESSAGE.to_string()))
        );
        assert_eq!(sink.messages().len(), 1);
    }

    #[test]
    fn test_round_trip_through_session() {
        let (mut session, _) = session();
        session.dispatch(Command::AddSlide).unwrap();
        session.dispatch(field(SlideField::Animation, "zoom-in")).unwrap();
        session.dispatch(Command::SetLoop(true)).unwrap();
        let deck = session.deck().clone();

        let text = session.json().text().to_string();
        session.dispatch(Command::CommitJson(text)).unwrap();
        assert_eq!(session.deck(), &deck);
    }

    #[test]
    fn test_flags_rerender_json_without_preview() {
        let (mut session, sink) = session();
        sink.clear();

        session.dispatch(Command::SetAutoplay(true)).unwrap();
        session.dispatch(Command::SetLoop(true)).unwrap();
        assert!(session.json().text().contains("\"autoplay\": true"));
        assert!(session.json().text().contains("\"loop\": true"));
        assert!(session.view().autoplay && session.view().loop_playback);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_preview_deck_sends_all_slides() {
        let (mut session, sink) = session();
        session.dispatch(Command::AddSlide).unwrap();
        session.dispatch(Command::AddSlide).unwrap();
        sink.clear();

        session.dispatch(Command::PreviewDeck).unwrap();
        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].preview_mode, PreviewMode::Deck);
        assert_eq!(messages[0].data.slides.len(), 3);
    }

    #[test]
    fn test_export_end_to_end() {
        let (mut session, _) = session();
        for _ in 0..4 {
            session.dispatch(Command::AddSlide).unwrap();
        }
        assert!(session.dispatch(Command::AddSlide).is_err());
        session
            .dispatch(field(SlideField::Title, "Closing </script>"))
            .unwrap();

        let html = match session.dispatch(Command::Export).unwrap() {
            Outcome::Exported(html) => html,
            Outcome::Updated => panic!("expected exported document"),
        };
        assert_eq!(html.matches(RENDER_CALL).count(), 1);
        assert!(html.contains("function renderDeck(d, m) {}"));
        assert_eq!(
            json::parse_deck(embedded_json(&html)).unwrap(),
            *session.deck()
        );
    }

    #[test]
    fn test_export_without_assets_fails_cleanly() {
        let sink = RecordingSink::new();
        let assets = StaticAssets {
            style: None,
            script: Some("js".to_string()),
        };
        let mut session = Session::new(Box::new(sink), Arc::new(assets), DEBOUNCE);
        assert!(matches!(
            session.dispatch(Command::Export),
            Err(Error::AssetUnavailable { .. })
        ));
    }

    #[test]
    fn test_export_snapshot_flushes_pending_image() {
        let (mut session, _) = session();
        session
            .dispatch(field(SlideField::Image, "example/cat.png"))
            .unwrap();
        let (deck, _) = session.export_snapshot();
        assert_eq!(deck.slides[0].image, "example/cat.png");
    }
}
