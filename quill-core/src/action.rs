//! Intent trait for type-safe state mutations

use std::fmt::Debug;

/// Marker trait for intents that can be dispatched to the store
///
/// Intents describe a requested state change. They should be:
/// - Clone: intents may be logged, replayed, or handed to several reducers
/// - Debug: for logging
/// - Send + 'static: so background work can send results back over a channel
///
/// Use `#[derive(Action)]` from `quill-macros` to auto-implement this trait.
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the intent name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Grouping of intents by the state slice they address
///
/// Generated by `#[derive(Action)]` with `#[action(infer_categories)]`:
/// `PostRevisionsSelect` and `PostRevisionsDialogToggle` both land in
/// `"post_revisions"`.
pub trait ActionCategory: Action {
    /// The generated category enum
    type Category: Copy + Eq + std::hash::Hash + Debug;

    /// Category name, `None` for uncategorized intents
    fn category(&self) -> Option<&'static str>;

    /// Category as an enum value
    fn category_enum(&self) -> Self::Category;
}

/// Short, human-readable rendering of an intent for logs
///
/// The default uses `Debug`. Override it for intents carrying large payloads.
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}
