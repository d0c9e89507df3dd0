//! Advanced mode JSON editor
//!
//! A monospace text area with a line number gutter, a "Run Code" button and
//! the status line of the last commit.

use crate::projection::{JsonEditor, JsonStatus};
use crate::session::Command;
use eframe::egui::{self, Color32, InputState, Key, Modifiers, RichText, Ui};

/// Id of the JSON text area, so focus can be checked before it is drawn.
const JSON_EDITOR_ID: &str = "json_editor_text";

/// Line numbers for the gutter, one per line.
pub fn gutter_text(line_count: usize) -> String {
    (1..=line_count.max(1))
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Take the Ctrl+Enter press out of this frame's input.
fn take_run_shortcut(input: &mut InputState) -> bool {
    input.consume_key(Modifiers::COMMAND, Key::Enter)
}

/// Render the editor. Returns a commit command when the user runs the code.
pub fn show_json_editor(ui: &mut Ui, json: &mut JsonEditor) -> Option<Command> {
    let mut run = false;

    ui.horizontal(|ui| {
        ui.label(RichText::new("Deck JSON").strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .button("▶ Run Code")
                .on_hover_text("Apply the JSON to the deck (Ctrl+Enter)")
                .clicked()
            {
                run = true;
            }
        });
    });

    if let Some(status) = json.status() {
        let color = match status {
            JsonStatus::Success(_) => Color32::from_rgb(46, 160, 67),
            JsonStatus::Warning(_) => Color32::from_rgb(210, 120, 20),
        };
        ui.label(RichText::new(status.message()).color(color));
    }

    ui.separator();

    // The text area would insert a newline for the Enter press
    let editor_id = egui::Id::new(JSON_EDITOR_ID);
    if ui.memory(|m| m.has_focus(editor_id)) && ui.input_mut(take_run_shortcut) {
        run = true;
    }

    let gutter = gutter_text(json.line_count());
    let gutter_color = ui.visuals().weak_text_color();

    egui::ScrollArea::both()
        .id_source("json_editor_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_top(|ui| {
                ui.add(
                    egui::Label::new(
                        RichText::new(gutter)
                            .monospace()
                            .color(gutter_color),
                    )
                    .selectable(false),
                );

                ui.add(
                    egui::TextEdit::multiline(json.text_mut())
                        .id(editor_id)
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .desired_rows(24)
                        .lock_focus(true),
                );
            });
        });

    run.then(|| Command::CommitJson(json.text().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gutter_counts_lines() {
        assert_eq!(gutter_text(3), "1\n2\n3");
    }

    #[test]
    fn test_gutter_never_empty() {
        assert_eq!(gutter_text(0), "1");
    }

    fn enter_event(modifiers: Modifiers) -> egui::Event {
        egui::Event::Key {
            key: Key::Enter,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        }
    }

    #[test]
    fn test_run_shortcut_is_consumed_before_text_area() {
        let ctrl = Modifiers {
            ctrl: true,
            command: true,
            ..Modifiers::default()
        };
        let mut input = InputState::default();
        input.modifiers = ctrl;
        input.events.push(enter_event(ctrl));

        assert!(take_run_shortcut(&mut input));
        assert!(input.events.is_empty());
    }

    #[test]
    fn test_plain_enter_left_for_text_area() {
        let mut input = InputState::default();
        input.events.push(enter_event(Modifiers::NONE));

        assert!(!take_run_shortcut(&mut input));
        assert_eq!(input.events.len(), 1);
    }
}
