//! Quick Edit form
//!
//! Draws one control per slide property from the current `QuickEditView`
//! and reports changes as session commands. The form never edits the view
//! itself; next frame it is redrawn from whatever the session kept.

use crate::deck::{rgb_to_hex, Animation, FontSize, Layout, Position, SlideField};
use crate::projection::QuickEditView;
use crate::session::Command;
use eframe::egui::{self, RichText, Ui, Vec2};

/// Size of one cell of the placement grid.
const GRID_CELL_SIZE: Vec2 = Vec2::new(36.0, 28.0);

fn update(field: SlideField, value: impl Into<String>) -> Command {
    Command::UpdateField {
        field,
        value: value.into(),
    }
}

fn section_label(ui: &mut Ui, text: &str) {
    ui.add_space(6.0);
    ui.label(RichText::new(text).strong());
    ui.add_space(2.0);
}

/// Render the form and collect the commands it produced this frame.
pub fn show_quick_edit(ui: &mut Ui, view: &QuickEditView) -> Vec<Command> {
    let mut commands = Vec::new();

    egui::ScrollArea::vertical()
        .id_source("quick_edit_scroll")
        .show(ui, |ui| {
            // Text
            section_label(ui, "Title");
            let mut title = view.title.clone();
            if ui
                .add(egui::TextEdit::singleline(&mut title).desired_width(f32::INFINITY))
                .changed()
            {
                commands.push(update(SlideField::Title, title));
            }

            section_label(ui, "Description");
            let mut description = view.description.clone();
            if ui
                .add(
                    egui::TextEdit::multiline(&mut description)
                        .desired_rows(3)
                        .desired_width(f32::INFINITY),
                )
                .changed()
            {
                commands.push(update(SlideField::Description, description));
            }

            ui.separator();

            // Layout and placement
            section_label(ui, "Layout");
            ui.horizontal_wrapped(|ui| {
                for layout in Layout::all() {
                    if ui
                        .selectable_label(view.layout == *layout, layout.label())
                        .clicked()
                        && view.layout != *layout
                    {
                        commands.push(update(SlideField::Layout, layout.as_str()));
                    }
                }
            });

            section_label(ui, "Text Position");
            if let Some(position) = placement_grid(ui, view.position) {
                commands.push(update(SlideField::Position, position.as_str()));
            }

            section_label(ui, "Font Size");
            ui.horizontal(|ui| {
                for size in FontSize::all() {
                    if ui
                        .selectable_label(view.font_size == *size, size.label())
                        .clicked()
                        && view.font_size != *size
                    {
                        commands.push(update(SlideField::FontSize, size.as_str()));
                    }
                }
            });

            ui.separator();

            // Background
            section_label(ui, "Background");
            ui.horizontal(|ui| {
                let mut rgb = view.background_rgb();
                if ui.color_edit_button_srgb(&mut rgb).changed() {
                    commands.push(update(SlideField::Background, rgb_to_hex(rgb)));
                }
                let mut hex = view.background.clone();
                if ui
                    .add(egui::TextEdit::singleline(&mut hex).desired_width(90.0))
                    .changed()
                {
                    commands.push(update(SlideField::Background, hex));
                }
            });

            section_label(ui, "Image URL");
            let mut image = view.image.clone();
            if ui
                .add(
                    egui::TextEdit::singleline(&mut image)
                        .hint_text("https://…")
                        .desired_width(f32::INFINITY),
                )
                .changed()
            {
                commands.push(update(SlideField::Image, image));
            }

            section_label(ui, "Animation");
            ui.horizontal_wrapped(|ui| {
                for animation in Animation::all() {
                    if ui
                        .selectable_label(view.animation == *animation, animation.label())
                        .clicked()
                        && view.animation != *animation
                    {
                        commands.push(update(SlideField::Animation, animation.as_str()));
                    }
                }
            });

            ui.separator();

            // Deck playback
            section_label(ui, "Playback");
            let mut autoplay = view.autoplay;
            if ui.checkbox(&mut autoplay, "Autoplay").changed() {
                commands.push(Command::SetAutoplay(autoplay));
            }
            let mut loop_playback = view.loop_playback;
            if ui.checkbox(&mut loop_playback, "Loop").changed() {
                commands.push(Command::SetLoop(loop_playback));
            }
        });

    commands
}

/// 3×3 grid of placement buttons. Returns a newly picked position.
fn placement_grid(ui: &mut Ui, current: Position) -> Option<Position> {
    let mut picked = None;
    egui::Grid::new("placement_grid")
        .spacing([2.0, 2.0])
        .show(ui, |ui| {
            for row in Position::all().chunks(3) {
                for position in row {
                    let button = egui::SelectableLabel::new(current == *position, position.glyph());
                    let response = ui
                        .add_sized(GRID_CELL_SIZE, button)
                        .on_hover_text(position.as_str());
                    if response.clicked() && current != *position {
                        picked = Some(*position);
                    }
                }
                ui.end_row();
            }
        });
    picked
}
