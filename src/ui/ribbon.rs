//! Ribbon UI Component for MicroSnap
//!
//! The strip of controls above the builder: editor mode, slide selection,
//! slide management, preview, export and appearance.

use crate::config::Theme;
use crate::deck::MAX_SLIDES;
use crate::session::EditorMode;
use eframe::egui::{self, Color32, Response, RichText, Ui, Vec2};

/// Height of the ribbon in expanded state.
const RIBBON_HEIGHT_EXPANDED: f32 = 40.0;

/// Height of the ribbon in collapsed state.
const RIBBON_HEIGHT_COLLAPSED: f32 = 28.0;

/// Size of icon buttons.
const ICON_BUTTON_SIZE: Vec2 = Vec2::new(32.0, 28.0);

/// Actions that can be triggered from the ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RibbonAction {
    /// Switch between Quick Edit and Advanced
    ToggleEditorMode,
    /// Make another slide active
    SelectSlide(usize),
    /// Append a default slide
    AddSlide,
    /// Ask to delete the active slide
    DeleteSlide,
    /// Open the deck preview window
    PreviewDeck,
    /// Export the deck as an HTML file
    ExportHtml,
    /// Copy the exported HTML to the clipboard
    CopyHtml,
    /// Switch between light and dark
    ToggleTheme,
    /// Open the settings panel
    OpenSettings,
    /// Toggle ribbon collapsed state
    ToggleCollapse,
}

/// What the ribbon needs to know about the session to draw itself.
#[derive(Debug, Clone, Copy)]
pub struct RibbonContext {
    pub mode: EditorMode,
    pub slide_count: usize,
    pub active_index: usize,
    pub is_exporting: bool,
    pub theme: Theme,
}

impl RibbonContext {
    /// Slide management is only available in Quick Edit.
    fn slides_unlocked(&self) -> bool {
        self.mode == EditorMode::QuickEdit
    }
}

/// Ribbon UI state and rendering.
#[derive(Debug, Clone)]
pub struct Ribbon {
    /// Whether the ribbon is in collapsed mode (icon-only).
    collapsed: bool,
}

impl Default for Ribbon {
    fn default() -> Self {
        Self::new()
    }
}

impl Ribbon {
    /// Create a new ribbon instance.
    pub fn new() -> Self {
        Self { collapsed: false }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Toggle the collapsed state.
    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// Get the current ribbon height.
    pub fn height(&self) -> f32 {
        if self.collapsed {
            RIBBON_HEIGHT_COLLAPSED
        } else {
            RIBBON_HEIGHT_EXPANDED
        }
    }

    /// Render the ribbon and return any triggered action.
    pub fn show(&mut self, ui: &mut Ui, context: RibbonContext) -> Option<RibbonAction> {
        let mut action: Option<RibbonAction> = None;
        let is_dark = ui.visuals().dark_mode;

        let ribbon_bg = if is_dark {
            Color32::from_rgb(40, 40, 40)
        } else {
            Color32::from_rgb(248, 248, 248)
        };
        let separator_color = if is_dark {
            Color32::from_rgb(70, 70, 70)
        } else {
            Color32::from_rgb(210, 210, 210)
        };
        let muted = ui.visuals().weak_text_color();

        ui.painter()
            .rect_filled(ui.available_rect_before_wrap(), 0.0, ribbon_bg);

        ui.horizontal(|ui| {
            ui.set_height(self.height());
            ui.spacing_mut().item_spacing.x = 2.0;

            let collapse_icon = if self.collapsed { "▶" } else { "◀" };
            let collapse_tooltip = if self.collapsed {
                "Expand ribbon"
            } else {
                "Collapse ribbon"
            };
            if icon_button(ui, collapse_icon, collapse_tooltip, true, is_dark).clicked() {
                action = Some(RibbonAction::ToggleCollapse);
            }

            ui.add_space(4.0);
            vertical_separator(ui, separator_color, self.height() - 8.0);
            ui.add_space(4.0);

            // ═══════════════════════════════════════════════════════════════════
            // Editor Group
            // ═══════════════════════════════════════════════════════════════════
            let mode_label = match context.mode {
                EditorMode::QuickEdit => "{ } Advanced",
                EditorMode::Advanced => "✏ Quick Edit",
            };
            if ui
                .button(mode_label)
                .on_hover_text("Switch editor (Ctrl+E)")
                .clicked()
            {
                action = Some(RibbonAction::ToggleEditorMode);
            }

            ui.add_space(4.0);
            vertical_separator(ui, separator_color, self.height() - 8.0);
            ui.add_space(4.0);

            // ═══════════════════════════════════════════════════════════════════
            // Slides Group
            // ═══════════════════════════════════════════════════════════════════
            if !self.collapsed {
                ui.label(RichText::new("Slides").size(10.0).color(muted));
            }

            let unlocked = context.slides_unlocked();
            ui.add_enabled_ui(unlocked, |ui| {
                let selected_text = slide_label(context.active_index);
                egui::ComboBox::from_id_source("slide_dropdown")
                    .selected_text(selected_text)
                    .width(90.0)
                    .show_ui(ui, |ui| {
                        for index in 0..context.slide_count {
                            if ui
                                .selectable_label(index == context.active_index, slide_label(index))
                                .clicked()
                                && index != context.active_index
                            {
                                action = Some(RibbonAction::SelectSlide(index));
                            }
                        }
                    });
            });

            let can_add = unlocked && context.slide_count < MAX_SLIDES;
            if icon_button(ui, "➕", "Add slide (Ctrl+Shift+N)", unlocked, is_dark).clicked() {
                // At the limit this raises the slide limit warning
                action = Some(RibbonAction::AddSlide);
            }
            if !can_add && unlocked && !self.collapsed {
                ui.label(RichText::new("max").size(10.0).color(muted));
            }

            if icon_button(ui, "🗑", "Delete slide", unlocked, is_dark).clicked() {
                action = Some(RibbonAction::DeleteSlide);
            }

            ui.label(
                RichText::new(slide_counter(context.active_index, context.slide_count))
                    .size(12.0)
                    .color(muted),
            );

            ui.add_space(4.0);
            vertical_separator(ui, separator_color, self.height() - 8.0);
            ui.add_space(4.0);

            // ═══════════════════════════════════════════════════════════════════
            // Output Group
            // ═══════════════════════════════════════════════════════════════════
            if !self.collapsed {
                ui.label(RichText::new("Output").size(10.0).color(muted));
            }

            if icon_button(ui, "▶", "Preview deck (F5)", true, is_dark).clicked() {
                action = Some(RibbonAction::PreviewDeck);
            }

            let can_export = !context.is_exporting;
            if icon_button(
                ui,
                "🌐",
                "Export HTML (Ctrl+Shift+E)",
                can_export,
                is_dark,
            )
            .clicked()
            {
                action = Some(RibbonAction::ExportHtml);
            }
            if icon_button(ui, "📋", "Copy HTML to clipboard", can_export, is_dark).clicked() {
                action = Some(RibbonAction::CopyHtml);
            }
            if context.is_exporting {
                ui.spinner();
            }

            // ═══════════════════════════════════════════════════════════════════
            // Appearance (right aligned)
            // ═══════════════════════════════════════════════════════════════════
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if icon_button(ui, "⚙", "Settings (Ctrl+,)", true, is_dark).clicked() {
                    action = Some(RibbonAction::OpenSettings);
                }
                if icon_button(
                    ui,
                    context.theme.toggle_icon(),
                    "Toggle theme",
                    true,
                    is_dark,
                )
                .clicked()
                {
                    action = Some(RibbonAction::ToggleTheme);
                }
            });
        });

        action
    }
}

/// Dropdown label for a slide index.
pub fn slide_label(index: usize) -> String {
    format!("Slide {}", index + 1)
}

/// Position of the active slide, e.g. `2 / 3`.
pub fn slide_counter(active_index: usize, slide_count: usize) -> String {
    format!("{} / {}", active_index + 1, slide_count)
}

/// Draw a frameless icon button with a hover background.
fn icon_button(ui: &mut Ui, icon: &str, tooltip: &str, enabled: bool, is_dark: bool) -> Response {
    let text_color = if enabled {
        if is_dark {
            Color32::from_rgb(220, 220, 220)
        } else {
            Color32::from_rgb(50, 50, 50)
        }
    } else if is_dark {
        Color32::from_rgb(100, 100, 100)
    } else {
        Color32::from_rgb(160, 160, 160)
    };

    let hover_bg = if is_dark {
        Color32::from_rgb(60, 60, 60)
    } else {
        Color32::from_rgb(220, 220, 220)
    };

    let btn = ui.add_enabled(
        enabled,
        egui::Button::new(RichText::new(" ").size(16.0))
            .frame(false)
            .min_size(ICON_BUTTON_SIZE),
    );

    if btn.hovered() && enabled {
        ui.painter()
            .rect_filled(btn.rect, egui::Rounding::same(3.0), hover_bg);
    }

    // The gear glyph sits higher than the emoji icons
    let y_offset = match icon {
        "⚙" => 2.0,
        _ => 0.0,
    };
    let icon_pos = egui::pos2(btn.rect.center().x, btn.rect.center().y + y_offset);

    ui.painter().text(
        icon_pos,
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(16.0),
        text_color,
    );

    btn.on_hover_text(tooltip)
}

fn vertical_separator(ui: &mut Ui, color: Color32, height: f32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(1.0, height), egui::Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        egui::Stroke::new(1.0, color),
    );
}
