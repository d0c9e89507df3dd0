//! Main application module for MicroSnap
//!
//! This module implements the eframe App trait for the builder window,
//! handling window state, UI updates, and event processing.

use crate::config::{Settings, Theme, WindowSize};
use crate::files::dialogs::save_html_dialog;
use crate::session::{Command, EditorMode};
use crate::state::{AppState, ExportPurpose, ExportReady};
use crate::ui::{
    show_card_preview, show_confirm_dialog, show_deck_preview, show_json_editor,
    show_message_dialog, show_quick_edit, ConfirmResult, Ribbon, RibbonAction, RibbonContext,
    SettingsPanel,
};
use eframe::egui;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Window title suffix.
const APP_NAME: &str = "MicroSnap";

/// How often to check on a running export.
const EXPORT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Keyboard shortcut actions that need to be deferred.
///
/// These actions are detected in the input handling closure and executed
/// afterwards to avoid borrow conflicts.
#[derive(Debug, Clone, Copy)]
enum KeyboardAction {
    /// Switch editor mode (Ctrl+E)
    ToggleEditorMode,
    /// Add a slide (Ctrl+Shift+N)
    AddSlide,
    /// Open the deck preview (F5)
    PreviewDeck,
    /// Export as HTML (Ctrl+Shift+E)
    ExportHtml,
    /// Open settings panel (Ctrl+,)
    OpenSettings,
}

/// Apply light or dark visuals to the egui context.
fn apply_theme(ctx: &egui::Context, theme: Theme) {
    let visuals = match theme {
        Theme::Light => egui::Visuals::light(),
        Theme::Dark => egui::Visuals::dark(),
    };
    ctx.set_visuals(visuals);
}

/// The main application struct that holds all state and implements eframe::App.
pub struct MicroSnapApp {
    /// Central application state
    state: AppState,
    /// Ribbon UI component
    ribbon: Ribbon,
    /// Settings panel component
    settings_panel: SettingsPanel,
    /// Theme currently applied to the egui context
    applied_theme: Theme,
    /// Last known window size (for detecting changes)
    last_window_size: Option<egui::Vec2>,
    /// Last known window position (for detecting changes)
    last_window_pos: Option<egui::Pos2>,
    /// Application start time for timing toast messages
    start_time: Instant,
}

impl MicroSnapApp {
    /// Create the builder window state and apply the saved theme.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        info!("Initializing {}", APP_NAME);

        let state = AppState::with_settings(settings);
        let theme = state.settings.theme;
        apply_theme(&cc.egui_ctx, theme);
        info!("Applied initial theme: {:?}", theme);

        Self {
            state,
            ribbon: Ribbon::new(),
            settings_panel: SettingsPanel::new(),
            applied_theme: theme,
            last_window_size: None,
            last_window_pos: None,
            start_time: Instant::now(),
        }
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.state.settings.theme != self.applied_theme {
            self.applied_theme = self.state.settings.theme;
            apply_theme(ctx, self.applied_theme);
            debug!("Theme changed to {:?}", self.applied_theme);
        }
    }

    /// Update window size in settings if changed.
    ///
    /// Returns `true` if the window state was updated.
    fn update_window_state(&mut self, ctx: &egui::Context) -> bool {
        let mut changed = false;

        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                let current_size = rect.size();
                let current_pos = rect.min;

                let size_changed = self
                    .last_window_size
                    .map(|s| (s - current_size).length() > 1.0)
                    .unwrap_or(true);

                let pos_changed = self
                    .last_window_pos
                    .map(|p| (p - current_pos).length() > 1.0)
                    .unwrap_or(true);

                if size_changed || pos_changed {
                    self.last_window_size = Some(current_size);
                    self.last_window_pos = Some(current_pos);
                    changed = true;
                }
            }
        });

        if changed {
            if let (Some(size), Some(pos)) = (self.last_window_size, self.last_window_pos) {
                let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));

                self.state.settings.window_size = WindowSize {
                    width: size.x,
                    height: size.y,
                    x: Some(pos.x),
                    y: Some(pos.y),
                    maximized,
                };
                self.state.mark_settings_dirty();

                debug!(
                    "Window state updated: {}x{} at ({}, {}), maximized: {}",
                    size.x, size.y, pos.x, pos.y, maximized
                );
            }
        }

        changed
    }

    /// Window title, e.g. "Slide 2 of 3 - MicroSnap".
    fn window_title(&self) -> String {
        let model = self.state.session.model();
        format!(
            "Slide {} of {} - {}",
            model.active_index() + 1,
            model.len(),
            APP_NAME
        )
    }

    /// Schedule the next frame for timers that run without input.
    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if let Some(due) = self.state.session.image_due_in(now) {
            ctx.request_repaint_after(due);
        }
        if self.state.is_exporting() {
            ctx.request_repaint_after(EXPORT_POLL_INTERVAL);
        }
        if let Some(expires_at) = self.state.ui.toast_expires_at {
            let remaining = (expires_at - self.get_app_time()).max(0.0);
            ctx.request_repaint_after(Duration::from_secs_f64(remaining));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Action Handlers
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_ribbon_action(&mut self, action: RibbonAction) {
        let time = self.get_app_time();
        debug!("Ribbon action: {:?}", action);

        match action {
            RibbonAction::ToggleEditorMode => self.state.toggle_editor_mode(),
            RibbonAction::SelectSlide(index) => {
                self.state.run_command(Command::SetActiveSlide(index), time);
            }
            RibbonAction::AddSlide => {
                self.state.run_command(Command::AddSlide, time);
            }
            RibbonAction::DeleteSlide => self.state.request_delete_slide(),
            RibbonAction::PreviewDeck => self.state.open_deck_preview(time),
            RibbonAction::ExportHtml => self.state.start_export(ExportPurpose::SaveFile, time),
            RibbonAction::CopyHtml => self.state.start_export(ExportPurpose::Clipboard, time),
            RibbonAction::ToggleTheme => {
                self.state.update_settings(|s| s.theme = s.theme.toggle());
            }
            RibbonAction::OpenSettings => self.state.toggle_settings(),
            RibbonAction::ToggleCollapse => self.ribbon.toggle_collapsed(),
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let action = ctx.input(|i| {
            if i.modifiers.command && !i.modifiers.shift && i.key_pressed(egui::Key::E) {
                return Some(KeyboardAction::ToggleEditorMode);
            }
            if i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::N) {
                return Some(KeyboardAction::AddSlide);
            }
            if i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::E) {
                return Some(KeyboardAction::ExportHtml);
            }
            if i.key_pressed(egui::Key::F5) {
                return Some(KeyboardAction::PreviewDeck);
            }
            if i.modifiers.command && i.key_pressed(egui::Key::Comma) {
                return Some(KeyboardAction::OpenSettings);
            }
            None
        });

        if let Some(action) = action {
            debug!("Keyboard shortcut: {:?}", action);
            let ribbon_action = match action {
                KeyboardAction::ToggleEditorMode => RibbonAction::ToggleEditorMode,
                KeyboardAction::AddSlide => RibbonAction::AddSlide,
                KeyboardAction::PreviewDeck => RibbonAction::PreviewDeck,
                KeyboardAction::ExportHtml => RibbonAction::ExportHtml,
                KeyboardAction::OpenSettings => RibbonAction::OpenSettings,
            };
            self.handle_ribbon_action(ribbon_action);
        }
    }

    /// Save or copy a finished export.
    fn handle_export_ready(&mut self, ready: ExportReady) {
        let time = self.get_app_time();
        match ready.purpose {
            ExportPurpose::SaveFile => {
                let initial_dir = self.state.export_directory();
                let default_name = self.state.settings.export.file_name.clone();
                match save_html_dialog(initial_dir.as_deref(), &default_name) {
                    Some(path) => {
                        self.state.save_export(&path, &ready.html, time);
                    }
                    None => debug!("Export save dialog cancelled"),
                }
            }
            ExportPurpose::Clipboard => self.state.copy_export(&ready.html, time),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn render_ui(&mut self, ctx: &egui::Context) {
        let time = self.get_app_time();

        // Ribbon
        let context = RibbonContext {
            mode: self.state.session.mode(),
            slide_count: self.state.session.model().len(),
            active_index: self.state.session.model().active_index(),
            is_exporting: self.state.is_exporting(),
            theme: self.state.settings.theme,
        };
        let mut ribbon_action = None;
        egui::TopBottomPanel::top("ribbon")
            .exact_height(self.ribbon.height() + 4.0)
            .show(ctx, |ui| {
                ribbon_action = self.ribbon.show(ui, context);
            });
        if let Some(action) = ribbon_action {
            self.handle_ribbon_action(action);
        }

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.state.session.mode().label());
                ui.separator();
                let deck = self.state.session.deck();
                ui.label(format!(
                    "{} slide{}",
                    deck.slides.len(),
                    if deck.slides.len() == 1 { "" } else { "s" }
                ));

                if let Some(message) = &self.state.ui.toast_message {
                    ui.separator();
                    ui.label(egui::RichText::new(message).strong());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.state.is_exporting() {
                        ui.spinner();
                        ui.label("Exporting…");
                    }
                });
            });
        });

        // Card preview
        egui::SidePanel::right("card_preview")
            .resizable(true)
            .default_width(420.0)
            .min_width(260.0)
            .show(ctx, |ui| {
                show_card_preview(ui, self.state.preview.card());
            });

        // Editor
        let mut commands = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| match self.state.session.mode() {
            EditorMode::QuickEdit => {
                commands = show_quick_edit(ui, self.state.session.view());
            }
            EditorMode::Advanced => {
                if let Some(command) = show_json_editor(ui, self.state.session.json_mut()) {
                    commands.push(command);
                }
            }
        });
        for command in commands {
            self.state.run_command(command, time);
        }

        // Deck preview window
        if self.state.ui.show_deck_preview {
            show_deck_preview(
                ctx,
                &mut self.state.ui.show_deck_preview,
                self.state.preview.deck_mut(),
            );
        }
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        let time = self.get_app_time();

        if self.state.ui.show_confirm_dialog {
            let message = self.state.ui.confirm_dialog_message.clone();
            match show_confirm_dialog(ctx, "Delete Slide", &message, "Delete") {
                ConfirmResult::Confirmed => self.state.handle_confirmed_action(time),
                ConfirmResult::Cancelled => self.state.cancel_pending_action(),
                ConfirmResult::None => {}
            }
        }

        if let Some(message) = self.state.ui.warning_message.clone() {
            if show_message_dialog(ctx, "Slide Limit", "⚠", &message) {
                self.state.dismiss_warning();
            }
        }

        if self.state.ui.show_error_modal {
            let message = self.state.ui.error_message.clone();
            if show_message_dialog(ctx, "Error", "⚠", &message) {
                self.state.dismiss_error();
            }
        }

        if self.state.ui.show_settings {
            let is_dark = ctx.style().visuals.dark_mode;
            let mut draft = self.state.settings.clone();
            let output = self.settings_panel.show(ctx, &mut draft, is_dark);

            if output.reset_requested {
                draft = Settings {
                    window_size: draft.window_size,
                    ..Settings::default()
                };
            }
            if output.changed || output.reset_requested {
                self.state.update_settings(|s| *s = draft);
            }
            if output.close_requested {
                self.state.ui.show_settings = false;
            }
        }
    }
}

impl eframe::App for MicroSnapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.apply_theme_if_needed(ctx);

        // Update toast message (clear if expired)
        let current_time = self.get_app_time();
        self.state.update_toast(current_time);

        // Apply a due image edit and drain preview events
        self.state.tick(now);

        if let Some(ready) = self.state.poll_export() {
            self.handle_export_ready(ready);
        }

        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));
        self.update_window_state(ctx);

        self.render_ui(ctx);
        self.render_dialogs(ctx);
        self.handle_keyboard_shortcuts(ctx);

        self.schedule_repaint(ctx, now);
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.shutdown();
    }

    /// Save persistent state.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.state.save_settings_if_dirty();
    }

    /// Auto-save interval in seconds.
    fn auto_save_interval(&self) -> Duration {
        Duration::from_secs(30)
    }
}
