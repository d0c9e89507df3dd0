//! Editable projections of the deck
//!
//! The deck can be edited through two views that are kept consistent with
//! the `SlideModel`:
//!
//! - `quick_edit.rs` - form control values for the active slide
//! - `json.rs` - the whole deck as a JSON text buffer

pub mod json;
mod quick_edit;

pub use json::{JsonEditor, JsonStatus, COMMIT_SUCCESS_MESSAGE};
pub use quick_edit::{Debouncer, PendingImage, QuickEditView, IMAGE_DEBOUNCE};
