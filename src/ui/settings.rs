//! Settings Panel Component for MicroSnap
//!
//! This module implements a modal settings panel for appearance, editing
//! and export options. Changes apply as they are made.

use crate::config::{AssetSourceKind, Settings, Theme};
use eframe::egui::{self, Color32, RichText, Ui};
use std::path::PathBuf;

/// Settings panel sections for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSection {
    #[default]
    Appearance,
    Editing,
    Export,
}

impl SettingsSection {
    /// Get the display label for the section.
    pub fn label(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "Appearance",
            SettingsSection::Editing => "Editing",
            SettingsSection::Export => "Export",
        }
    }

    /// Get the icon for the section.
    pub fn icon(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "🎨",
            SettingsSection::Editing => "📝",
            SettingsSection::Export => "🌐",
        }
    }
}

/// Result of showing the settings panel.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanelOutput {
    /// Whether settings were modified.
    pub changed: bool,
    /// Whether the panel should be closed.
    pub close_requested: bool,
    /// Whether a reset to defaults was requested.
    pub reset_requested: bool,
}

/// Settings panel state and rendering.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    /// Currently active settings section.
    active_section: SettingsSection,
    /// Text of the asset directory field while it is being edited.
    local_dir_input: Option<String>,
    /// Text of the export file name field; applied when it loses focus.
    file_name_input: Option<String>,
}

impl SettingsPanel {
    /// Create a new settings panel instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the settings panel as a modal window.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
        is_dark: bool,
    ) -> SettingsPanelOutput {
        let mut output = SettingsPanelOutput::default();

        // Semi-transparent overlay
        let screen_rect = ctx.screen_rect();
        let overlay_color = if is_dark {
            Color32::from_rgba_unmultiplied(0, 0, 0, 180)
        } else {
            Color32::from_rgba_unmultiplied(0, 0, 0, 120)
        };

        egui::Area::new(egui::Id::new("settings_overlay"))
            .order(egui::Order::Middle)
            .fixed_pos(screen_rect.min)
            .show(ctx, |ui| {
                let response = ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, overlay_color);

                if response.clicked() {
                    output.close_requested = true;
                }
            });

        egui::Window::new("⚙ Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(500.0)
            .max_width(600.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    // Left side: Section tabs
                    ui.vertical(|ui| {
                        ui.set_min_width(120.0);

                        for section in [
                            SettingsSection::Appearance,
                            SettingsSection::Editing,
                            SettingsSection::Export,
                        ] {
                            let selected = self.active_section == section;
                            let text = format!("{} {}", section.icon(), section.label());

                            let btn = ui.add_sized(
                                [110.0, 32.0],
                                egui::SelectableLabel::new(
                                    selected,
                                    RichText::new(text).size(14.0),
                                ),
                            );

                            if btn.clicked() {
                                self.active_section = section;
                            }
                        }

                        ui.add_space(ui.available_height() - 40.0);

                        if ui
                            .add_sized([110.0, 28.0], egui::Button::new("↺ Reset All"))
                            .on_hover_text("Reset all settings to defaults")
                            .clicked()
                        {
                            output.reset_requested = true;
                            self.clear_inputs();
                        }
                    });

                    ui.separator();

                    // Right side: Section content
                    ui.vertical(|ui| {
                        ui.set_min_width(350.0);
                        ui.set_min_height(320.0);

                        let changed = match self.active_section {
                            SettingsSection::Appearance => {
                                Self::show_appearance_section(ui, settings)
                            }
                            SettingsSection::Editing => Self::show_editing_section(ui, settings),
                            SettingsSection::Export => self.show_export_section(ui, settings),
                        };
                        output.changed |= changed;
                    });
                });

                ui.separator();

                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            output.close_requested = true;
                        }
                        ui.label(
                            RichText::new("Settings are saved automatically")
                                .small()
                                .weak(),
                        );
                    });
                });
            });

        if output.close_requested {
            self.clear_inputs();
        }
        output
    }

    fn clear_inputs(&mut self) {
        self.local_dir_input = None;
        self.file_name_input = None;
    }

    /// Show the Appearance settings section.
    ///
    /// Returns true if any setting was changed.
    fn show_appearance_section(ui: &mut Ui, settings: &mut Settings) -> bool {
        let mut changed = false;

        ui.heading("Appearance");
        ui.add_space(8.0);

        ui.label(RichText::new("Theme").strong());
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            for (theme, label) in [(Theme::Light, "☀ Light"), (Theme::Dark, "🌙 Dark")] {
                if ui
                    .selectable_value(&mut settings.theme, theme, label)
                    .changed()
                {
                    changed = true;
                }
            }
        });

        changed
    }

    /// Show the Editing settings section.
    ///
    /// Returns true if any setting was changed.
    fn show_editing_section(ui: &mut Ui, settings: &mut Settings) -> bool {
        let mut changed = false;

        ui.heading("Editing");
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label(RichText::new("Image URL delay").strong());
            ui.add_space(8.0);
            ui.label(format!("{} ms", settings.image_debounce_ms));
        });
        ui.add_space(4.0);

        let slider = ui
            .add(
                egui::Slider::new(
                    &mut settings.image_debounce_ms,
                    0..=Settings::MAX_IMAGE_DEBOUNCE_MS,
                )
                .show_value(false)
                .step_by(50.0),
            )
            .on_hover_text("Wait this long after the last keystroke before showing a new image");
        if slider.changed() {
            changed = true;
        }

        ui.horizontal(|ui| {
            for (label, ms) in [("Instant", 0), ("Default", 400), ("Slow", 1000)] {
                if ui.small_button(label).clicked() {
                    settings.image_debounce_ms = ms;
                    changed = true;
                }
            }
        });

        changed
    }

    /// Show the Export settings section.
    ///
    /// Returns true if any setting was changed.
    fn show_export_section(&mut self, ui: &mut Ui, settings: &mut Settings) -> bool {
        let mut changed = false;

        ui.heading("Export");
        ui.add_space(8.0);

        ui.label(RichText::new("Style and renderer assets").strong());
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            for (kind, label) in [
                (AssetSourceKind::Local, "📁 Local folder"),
                (AssetSourceKind::Remote, "🌐 Download"),
            ] {
                if ui
                    .selectable_value(&mut settings.assets.source, kind, label)
                    .changed()
                {
                    changed = true;
                }
            }
        });
        ui.add_space(4.0);

        match settings.assets.source {
            AssetSourceKind::Local => {
                let input = self
                    .local_dir_input
                    .get_or_insert_with(|| settings.assets.local_dir.display().to_string());
                ui.horizontal(|ui| {
                    ui.label("Folder:");
                    if ui.text_edit_singleline(input).changed() {
                        settings.assets.local_dir = PathBuf::from(input.as_str());
                        changed = true;
                    }
                    if ui.button("Browse…").clicked() {
                        if let Some(dir) = rfd::FileDialog::new()
                            .set_title("Choose Asset Folder")
                            .pick_folder()
                        {
                            *input = dir.display().to_string();
                            settings.assets.local_dir = dir;
                            changed = true;
                        }
                    }
                });
            }
            AssetSourceKind::Remote => {
                ui.horizontal(|ui| {
                    ui.label("Base URL:");
                    if ui
                        .text_edit_singleline(&mut settings.assets.remote_base_url)
                        .changed()
                    {
                        changed = true;
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("Timeout:");
                    if ui
                        .add(
                            egui::DragValue::new(&mut settings.assets.timeout_secs)
                                .clamp_range(Settings::MIN_TIMEOUT_SECS..=Settings::MAX_TIMEOUT_SECS)
                                .suffix(" s"),
                        )
                        .changed()
                    {
                        changed = true;
                    }
                });
            }
        }

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(8.0);

        ui.label(RichText::new("Exported file").strong());
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Default name:");
            let input = self
                .file_name_input
                .get_or_insert_with(|| settings.export.file_name.clone());
            if ui.text_edit_singleline(input).lost_focus() {
                if *input != settings.export.file_name {
                    settings.export.file_name = input.clone();
                    changed = true;
                }
                // Reload the sanitized name next frame
                self.file_name_input = None;
            }
        });

        if ui
            .checkbox(
                &mut settings.export.open_after_export,
                "Open in browser after export",
            )
            .changed()
        {
            changed = true;
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_panel_new() {
        let panel = SettingsPanel::new();
        assert_eq!(panel.active_section, SettingsSection::Appearance);
        assert!(panel.local_dir_input.is_none());
        assert!(panel.file_name_input.is_none());
    }

    #[test]
    fn test_settings_section_labels() {
        assert_eq!(SettingsSection::Appearance.label(), "Appearance");
        assert_eq!(SettingsSection::Editing.label(), "Editing");
        assert_eq!(SettingsSection::Export.label(), "Export");
        assert_eq!(SettingsSection::Export.icon(), "🌐");
    }

    #[test]
    fn test_settings_panel_output_default() {
        let output = SettingsPanelOutput::default();
        assert!(!output.changed);
        assert!(!output.close_requested);
        assert!(!output.reset_requested);
    }
}
