//! Reusable views for quill
//!
//! Components implement [`Component<A>`](quill_core::Component) and emit
//! intents through callbacks passed in their props.
//!
//! # Components
//!
//! - [`SelectList`] - scrollable selection list with keyboard navigation
//! - [`ConfirmDialog`] - modal confirm/cancel prompt
//! - [`render_modal`] - overlay with a dimmed background
//!
//! # Example
//!
//! ```ignore
//! use quill_components::{SelectList, SelectListProps};
//!
//! let mut list = SelectList::default();
//! list.render(frame, area, SelectListProps {
//!     rows: &rows,
//!     selected: Some(index),
//!     is_focused: true,
//!     title: Some("History"),
//!     empty_text: "No revisions",
//!     on_select: |i| Intent::RevisionsListFocus(i),
//!     on_activate: None,
//! });
//! ```

mod confirm_dialog;
mod modal;
mod select_list;

pub use confirm_dialog::{ConfirmDialog, ConfirmDialogProps};
pub use modal::{centered_rect, dim_buffer, render_modal, ModalStyle};
pub use select_list::{SelectList, SelectListProps};

pub mod prelude {
    pub use crate::{
        centered_rect, render_modal, ConfirmDialog, ConfirmDialogProps, ModalStyle, SelectList,
        SelectListProps,
    };
}
