//! UI components for MicroSnap
//!
//! This module contains the panels and dialogs drawn by the builder window.

mod dialogs;
mod json_panel;
mod preview_panel;
mod quick_edit;
mod ribbon;
mod settings;

pub use dialogs::{show_confirm_dialog, show_message_dialog, ConfirmResult};
pub use json_panel::show_json_editor;
pub use preview_panel::{show_card_preview, show_deck_preview};
pub use quick_edit::show_quick_edit;
pub use ribbon::{Ribbon, RibbonAction, RibbonContext};
pub use settings::SettingsPanel;
