//! Application state management for MicroSnap
//!
//! This module defines the central `AppState` struct that sits between the
//! egui frame code and the editing `Session`: it owns the session, the
//! receiving end of the preview channel, user settings, UI flags and the
//! background export job.

use crate::config::{load_config, save_config_silent, Settings};
use crate::error::{Error, Result};
use crate::export::{copy_html_to_clipboard, export_deck};
use crate::preview::{preview_channel, PreviewSurface};
use crate::session::{Command, EditorMode, Outcome, Session};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Instant;

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// UI-related state.
#[derive(Debug, Default)]
pub struct UiState {
    /// Whether the settings panel is open
    pub show_settings: bool,
    /// Whether the deck preview window is open
    pub show_deck_preview: bool,
    /// Whether a confirmation dialog is open
    pub show_confirm_dialog: bool,
    /// Message for the confirmation dialog
    pub confirm_dialog_message: String,
    /// Pending action after confirmation
    pub pending_action: Option<PendingAction>,
    /// Slide limit warning, shown until dismissed
    pub warning_message: Option<String>,
    /// Whether to show error modal
    pub show_error_modal: bool,
    /// Error message for modal
    pub error_message: String,
    /// Temporary toast message
    pub toast_message: Option<String>,
    /// When the toast message should expire (as seconds since app start)
    pub toast_expires_at: Option<f64>,
}

/// Actions that need confirmation before execution.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    /// Delete the slide at this index
    DeleteSlide(usize),
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Jobs
// ─────────────────────────────────────────────────────────────────────────────

/// What to do with an exported document once it is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPurpose {
    /// Ask for a file name and write the document
    SaveFile,
    /// Put the document on the clipboard
    Clipboard,
}

/// An export running on a worker thread.
#[derive(Debug)]
struct ExportJob {
    purpose: ExportPurpose,
    receiver: Receiver<Result<String>>,
}

/// A finished export waiting for the UI to act on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReady {
    pub purpose: ExportPurpose,
    pub html: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Central application state struct.
#[derive(Debug)]
pub struct AppState {
    /// The deck being edited and its views
    pub session: Session,
    /// Card and deck preview surfaces fed by the session
    pub preview: PreviewSurface,
    /// User settings (loaded from config)
    pub settings: Settings,
    /// UI-related state
    pub ui: UiState,
    /// Whether settings have been modified and need saving
    settings_dirty: bool,
    /// Export in flight, if any
    export_job: Option<ExportJob>,
}

impl AppState {
    /// Create a new AppState with settings loaded from config.
    pub fn new() -> Self {
        let settings = load_config();
        info!("AppState initialized with settings");
        debug!(
            "Theme: {:?}, assets: {:?}",
            settings.theme, settings.assets.source
        );
        Self::with_settings(settings)
    }

    /// Create AppState with custom settings.
    pub fn with_settings(settings: Settings) -> Self {
        let (sink, preview) = preview_channel();
        let session = Session::new(
            Box::new(sink),
            settings.assets.build_source(),
            settings.image_debounce(),
        );

        let mut state = Self {
            session,
            preview,
            settings,
            ui: UiState::default(),
            settings_dirty: false,
            export_job: None,
        };
        // Show the first slide right away
        state.preview.poll();
        state
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Send a command to the session and surface any failure.
    ///
    /// Returns the outcome on success.
    pub fn run_command(&mut self, command: Command, time: f64) -> Option<Outcome> {
        let result = self.session.dispatch(command);
        self.preview.poll();
        match result {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                self.report_error(e, time);
                None
            }
        }
    }

    fn report_error(&mut self, error: Error, time: f64) {
        match error {
            Error::CapacityExceeded | Error::MinimumSlidesViolation => {
                self.ui.warning_message = Some(error.to_string());
            }
            // The JSON status line already shows these
            e if e.is_input_error() => debug!("JSON commit rejected: {}", e),
            Error::ModeLocked | Error::SlideIndexOutOfRange { .. } => {
                self.show_toast(error.to_string(), time, 2.0);
            }
            e => {
                warn!("Command failed: {}", e);
                self.show_error(e.to_string());
            }
        }
    }

    /// Switch between Quick Edit and Advanced.
    pub fn toggle_editor_mode(&mut self) {
        let mode = self.session.mode().toggle();
        self.session.set_mode(mode);
        self.preview.poll();
    }

    /// Apply a due image edit and drain preview events.
    ///
    /// Call this each frame.
    pub fn tick(&mut self, now: Instant) -> bool {
        let applied = self.session.poll_image(now);
        let updated = self.preview.poll();
        applied || updated
    }

    /// Push the whole deck to the deck surface and open its window.
    pub fn open_deck_preview(&mut self, time: f64) {
        if self.run_command(Command::PreviewDeck, time).is_some() {
            self.ui.show_deck_preview = true;
        }
    }

    /// Ask before deleting the active slide.
    pub fn request_delete_slide(&mut self) {
        if self.session.mode() == EditorMode::Advanced {
            return;
        }
        let index = self.session.model().active_index();
        self.ui.show_confirm_dialog = true;
        self.ui.confirm_dialog_message =
            format!("Delete slide {}? This cannot be undone.", index + 1);
        self.ui.pending_action = Some(PendingAction::DeleteSlide(index));
    }

    /// Handle a confirmed pending action.
    pub fn handle_confirmed_action(&mut self, time: f64) {
        if let Some(action) = self.ui.pending_action.take() {
            match action {
                PendingAction::DeleteSlide(index) => {
                    if self.run_command(Command::RemoveSlide(index), time).is_some() {
                        self.show_toast(format!("Deleted slide {}", index + 1), time, 2.0);
                    }
                }
            }
        }
        self.ui.show_confirm_dialog = false;
        self.ui.confirm_dialog_message.clear();
    }

    /// Cancel the pending action.
    pub fn cancel_pending_action(&mut self) {
        self.ui.pending_action = None;
        self.ui.show_confirm_dialog = false;
        self.ui.confirm_dialog_message.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether an export is running.
    pub fn is_exporting(&self) -> bool {
        self.export_job.is_some()
    }

    /// Build the HTML document on a worker thread.
    ///
    /// Asset downloads can take a while, so the window keeps drawing.
    pub fn start_export(&mut self, purpose: ExportPurpose, time: f64) {
        if self.export_job.is_some() {
            self.show_toast("An export is already running", time, 2.0);
            return;
        }

        let (deck, assets) = self.session.export_snapshot();
        self.preview.poll();
        let (sender, receiver) = mpsc::channel();

        let spawned = std::thread::Builder::new()
            .name("deck-export".to_string())
            .spawn(move || {
                let result = export_deck(&deck, assets.as_ref());
                if sender.send(result).is_err() {
                    debug!("Export finished after the window closed");
                }
            });

        match spawned {
            Ok(_) => {
                info!("Export started ({:?})", purpose);
                self.export_job = Some(ExportJob { purpose, receiver });
            }
            Err(e) => {
                warn!("Failed to start export thread: {}", e);
                self.show_error(format!("Export failed:\n{}", e));
            }
        }
    }

    /// Collect a finished export.
    ///
    /// Failures are reported here; a successful document is handed back to
    /// the caller to save or copy.
    pub fn poll_export(&mut self) -> Option<ExportReady> {
        let job = self.export_job.as_ref()?;
        let result = match job.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                Err(Error::Application("Export stopped unexpectedly".to_string()))
            }
        };

        let purpose = job.purpose;
        self.export_job = None;
        match result {
            Ok(html) => Some(ExportReady { purpose, html }),
            Err(e) => {
                warn!("Export failed: {}", e);
                self.show_error(format!("Export failed:\n{}", e));
                None
            }
        }
    }

    /// Write an exported document chosen through the save dialog.
    pub fn save_export(&mut self, path: &Path, html: &str, time: f64) -> bool {
        if let Err(e) = std::fs::write(path, html) {
            let error = Error::FileWrite {
                path: path.to_path_buf(),
                source: e,
            };
            warn!("{}", error);
            self.show_toast(format!("Export failed: {}", error), time, 3.0);
            return false;
        }

        info!("Exported deck to: {}", path.display());
        if let Some(parent) = path.parent() {
            let parent = parent.to_path_buf();
            if self.settings.export.last_directory.as_ref() != Some(&parent) {
                self.update_settings(|s| s.export.last_directory = Some(parent));
            }
        }
        self.show_toast(format!("Exported to {}", path.display()), time, 2.5);

        if self.settings.export.open_after_export {
            if let Err(e) = open::that(path) {
                warn!("Failed to open exported file: {}", e);
            }
        }
        true
    }

    /// Put an exported document on the clipboard.
    pub fn copy_export(&mut self, html: &str, time: f64) {
        match copy_html_to_clipboard(html) {
            Ok(()) => {
                info!("Copied deck HTML to clipboard");
                self.show_toast("HTML copied to clipboard", time, 2.0);
            }
            Err(e) => {
                warn!("Failed to copy HTML to clipboard: {}", e);
                self.show_toast(format!("Copy failed: {}", e), time, 3.0);
            }
        }
    }

    /// Directory the save dialog should start in.
    pub fn export_directory(&self) -> Option<PathBuf> {
        self.settings.export.last_directory.clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Update settings, mark them dirty, and hand the session its new
    /// asset source and debounce delay.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let before = self.settings.clone();
        f(&mut self.settings);
        self.settings.sanitize();

        if self.settings.assets != before.assets {
            self.session.set_assets(self.settings.assets.build_source());
        }
        if self.settings.image_debounce_ms != before.image_debounce_ms {
            self.session.set_image_debounce(self.settings.image_debounce());
        }
        self.settings_dirty = true;
    }

    /// Mark settings as dirty (needing to be saved).
    pub fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    /// Save settings to config file if modified.
    ///
    /// Returns `true` if settings were saved.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if self.settings_dirty {
            if save_config_silent(&self.settings) {
                self.settings_dirty = false;
                info!("Settings saved");
                return true;
            }
            warn!("Failed to save settings");
        }
        false
    }

    /// Prepare state for application shutdown.
    pub fn shutdown(&mut self) {
        if self.export_job.take().is_some() {
            debug!("Dropping unfinished export");
        }
        self.settings_dirty = true;
        self.save_settings_if_dirty();
        info!("AppState shutdown complete");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI State Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Toggle the settings panel.
    pub fn toggle_settings(&mut self) {
        self.ui.show_settings = !self.ui.show_settings;
    }

    /// Dismiss the slide limit warning.
    pub fn dismiss_warning(&mut self) {
        self.ui.warning_message = None;
    }

    /// Show an error in a modal dialog.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.ui.error_message = message.into();
        self.ui.show_error_modal = true;
    }

    /// Dismiss the error modal.
    pub fn dismiss_error(&mut self) {
        self.ui.show_error_modal = false;
        self.ui.error_message.clear();
    }

    /// Show a temporary toast message (disappears after duration).
    ///
    /// `current_time` should be the current app time in seconds.
    /// `duration` is how long to show the message in seconds.
    pub fn show_toast(&mut self, message: impl Into<String>, current_time: f64, duration: f64) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = Some(current_time + duration);
    }

    /// Update toast state - clears expired toasts.
    ///
    /// Call this each frame with the current time.
    pub fn update_toast(&mut self, current_time: f64) {
        if let Some(expires_at) = self.ui.toast_expires_at {
            if current_time >= expires_at {
                self.ui.toast_message = None;
                self.ui.toast_expires_at = None;
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::deck::{SlideField, MAX_SLIDES};
    use crate::preview::PreviewMode;
    use std::time::Duration;
    use tempfile::TempDir;

    fn state_with_assets(dir: &Path) -> AppState {
        let mut settings = Settings::default();
        settings.assets.local_dir = dir.to_path_buf();
        AppState::with_settings(settings)
    }

    fn write_assets(dir: &Path) {
        std::fs::write(dir.join("preview-css.js"), "export default `.s{}`;").unwrap();
        std::fs::write(
            dir.join("preview-script.js"),
            "export default `function renderDeck(d, m) {}`;",
        )
        .unwrap();
    }

    fn wait_for_export(state: &mut AppState) -> Option<ExportReady> {
        for _ in 0..500 {
            if !state.is_exporting() {
                return None;
            }
            if let Some(ready) = state.poll_export() {
                return Some(ready);
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("export did not finish");
    }

    #[test]
    fn test_new_state_shows_first_slide() {
        let state = AppState::with_settings(Settings::default());
        assert_eq!(state.session.model().len(), 1);
        let card = state.preview.card();
        assert_eq!(card.slide_count(), 1);
        assert_eq!(
            card.message().map(|m| m.preview_mode),
            Some(PreviewMode::Card)
        );
        assert!(!state.ui.show_deck_preview);
    }

    #[test]
    fn test_run_command_updates_card_preview() {
        let mut state = AppState::with_settings(Settings::default());
        let outcome = state.run_command(
            Command::UpdateField {
                field: SlideField::Title,
                value: "Launch".to_string(),
            },
            0.0,
        );
        assert_eq!(outcome, Some(Outcome::Updated));
        assert_eq!(
            state.preview.card().current_slide().map(|s| s.title.as_str()),
            Some("Launch")
        );
    }

    #[test]
    fn test_capacity_warning() {
        let mut state = AppState::with_settings(Settings::default());
        for _ in 1..MAX_SLIDES {
            assert!(state.run_command(Command::AddSlide, 0.0).is_some());
        }
        assert!(state.ui.warning_message.is_none());

        assert!(state.run_command(Command::AddSlide, 0.0).is_none());
        assert!(state.ui.warning_message.is_some());
        assert_eq!(state.session.model().len(), MAX_SLIDES);

        state.dismiss_warning();
        assert!(state.ui.warning_message.is_none());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut state = AppState::with_settings(Settings::default());
        state.run_command(Command::AddSlide, 0.0);
        assert_eq!(state.session.model().len(), 2);

        state.request_delete_slide();
        assert!(state.ui.show_confirm_dialog);
        assert_eq!(state.ui.pending_action, Some(PendingAction::DeleteSlide(1)));
        assert_eq!(state.session.model().len(), 2);

        state.cancel_pending_action();
        assert!(!state.ui.show_confirm_dialog);
        assert_eq!(state.session.model().len(), 2);

        state.request_delete_slide();
        state.handle_confirmed_action(1.0);
        assert_eq!(state.session.model().len(), 1);
        assert!(state.ui.toast_message.is_some());
    }

    #[test]
    fn test_deleting_last_slide_warns() {
        let mut state = AppState::with_settings(Settings::default());
        state.request_delete_slide();
        state.handle_confirmed_action(0.0);
        assert_eq!(state.session.model().len(), 1);
        assert!(state.ui.warning_message.is_some());
    }

    #[test]
    fn test_advanced_mode_blocks_delete_request() {
        let mut state = AppState::with_settings(Settings::default());
        state.toggle_editor_mode();
        assert_eq!(state.session.mode(), EditorMode::Advanced);

        state.request_delete_slide();
        assert!(!state.ui.show_confirm_dialog);

        assert!(state.run_command(Command::AddSlide, 2.0).is_none());
        assert!(state.ui.toast_message.is_some());
        assert!(state.ui.warning_message.is_none());
    }

    #[test]
    fn test_invalid_json_commit_only_sets_status() {
        let mut state = AppState::with_settings(Settings::default());
        state.toggle_editor_mode();
        assert!(state
            .run_command(Command::CommitJson("{oops".to_string()), 0.0)
            .is_none());
        assert!(!state.ui.show_error_modal);
        assert!(state.session.json().status().is_some());
    }

    #[test]
    fn test_open_deck_preview() {
        let mut state = AppState::with_settings(Settings::default());
        state.run_command(Command::AddSlide, 0.0);
        state.open_deck_preview(0.0);

        assert!(state.ui.show_deck_preview);
        let deck = state.preview.deck();
        assert_eq!(deck.slide_count(), 2);
        assert_eq!(deck.current_index(), 0);
    }

    #[test]
    fn test_tick_applies_debounced_image() {
        let mut settings = Settings::default();
        settings.image_debounce_ms = 0;
        let mut state = AppState::with_settings(settings);
        state.run_command(
            Command::UpdateField {
                field: SlideField::Image,
                value: "https://example.com/a.png".to_string(),
            },
            0.0,
        );
        state.tick(Instant::now() + Duration::from_millis(1));
        assert_eq!(
            state.session.deck().slides[0].image,
            "https://example.com/a.png"
        );
    }

    #[test]
    fn test_export_to_file() {
        let assets = TempDir::new().unwrap();
        write_assets(assets.path());
        let out = TempDir::new().unwrap();
        let mut state = state_with_assets(assets.path());

        state.start_export(ExportPurpose::SaveFile, 0.0);
        assert!(state.is_exporting());
        let ready = wait_for_export(&mut state).unwrap();
        assert_eq!(ready.purpose, ExportPurpose::SaveFile);
        assert!(ready.html.contains(".s{}"));

        let path = out.path().join("deck.html");
        assert!(state.save_export(&path, &ready.html, 1.0));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), ready.html);
        assert_eq!(state.export_directory(), Some(out.path().to_path_buf()));
        assert!(state.settings_dirty);
    }

    #[test]
    fn test_export_failure_shows_error() {
        let empty = TempDir::new().unwrap();
        let mut state = state_with_assets(empty.path());

        state.start_export(ExportPurpose::Clipboard, 0.0);
        assert!(wait_for_export(&mut state).is_none());
        assert!(!state.is_exporting());
        assert!(state.ui.show_error_modal);
        assert!(state.ui.error_message.starts_with("Export failed"));
    }

    #[test]
    fn test_save_export_to_missing_directory() {
        let mut state = AppState::with_settings(Settings::default());
        let out = TempDir::new().unwrap();
        let path = out.path().join("missing").join("deck.html");
        assert!(!state.save_export(&path, "<html></html>", 0.0));
        assert!(state.ui.toast_message.is_some());
        assert!(state.export_directory().is_none());
    }

    #[test]
    fn test_update_settings() {
        let mut state = AppState::with_settings(Settings::default());
        assert!(!state.settings_dirty);

        state.update_settings(|s| {
            s.theme = Theme::Dark;
            s.image_debounce_ms = 99_999;
        });

        assert_eq!(state.settings.theme, Theme::Dark);
        assert_eq!(state.settings.image_debounce_ms, Settings::MAX_IMAGE_DEBOUNCE_MS);
        assert!(state.settings_dirty);
    }

    #[test]
    fn test_toast_expiry() {
        let mut state = AppState::with_settings(Settings::default());
        state.show_toast("hello", 10.0, 2.0);
        state.update_toast(11.0);
        assert_eq!(state.ui.toast_message.as_deref(), Some("hello"));
        state.update_toast(12.0);
        assert!(state.ui.toast_message.is_none());
    }

    #[test]
    fn test_error_modal() {
        let mut state = AppState::with_settings(Settings::default());
        state.show_error("boom");
        assert!(state.ui.show_error_modal);
        state.dismiss_error();
        assert!(!state.ui.show_error_modal);
        assert!(state.ui.error_message.is_empty());
    }
}
