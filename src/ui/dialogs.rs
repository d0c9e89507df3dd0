//! Modal dialogs for slide deletion, slide limit warnings and errors.

use eframe::egui::{self, Color32, Key, RichText};

/// Answer from a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResult {
    /// Dialog still open
    None,
    Confirmed,
    Cancelled,
}

/// Ask the user to confirm a destructive action.
pub fn show_confirm_dialog(
    ctx: &egui::Context,
    title: &str,
    message: &str,
    confirm_label: &str,
) -> ConfirmResult {
    let mut result = ConfirmResult::None;

    if ctx.input(|i| i.key_pressed(Key::Escape)) {
        return ConfirmResult::Cancelled;
    }

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(message);
            ui.separator();
            ui.horizontal(|ui| {
                let confirm = egui::Button::new(
                    RichText::new(confirm_label).color(Color32::WHITE),
                )
                .fill(Color32::from_rgb(200, 60, 60));
                if ui.add(confirm).clicked() {
                    result = ConfirmResult::Confirmed;
                }
                if ui.button("Cancel").clicked() {
                    result = ConfirmResult::Cancelled;
                }
            });
        });

    result
}

/// Show a message with a single OK button. Returns `true` once dismissed.
pub fn show_message_dialog(ctx: &egui::Context, title: &str, icon: &str, message: &str) -> bool {
    let mut dismissed = ctx.input(|i| i.key_pressed(Key::Escape) || i.key_pressed(Key::Enter));

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(icon).size(24.0));
                ui.label(message);
            });
            ui.separator();
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    dismissed
}
