//! quill: centralized state, memoized selectors and route middleware for
//! content-management clients
//!
//! All state lives in one store and changes only through dispatched intents.
//! Views read it through selectors; navigation runs an ordered chain of
//! route handlers before a section is shown.
//!
//! # Example
//! ```ignore
//! use quill::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(infer_categories)]
//! enum Intent {
//!     RouteSet { path: String },
//!     PostRevisionsSelect { revision_id: u64 },
//! }
//!
//! #[derive(FeatureFlags)]
//! struct Features {
//!     #[flag(name = "jetpack/happychat")]
//!     jetpack_happychat: bool,
//! }
//! ```

pub use quill_core::*;

pub use quill_macros::{Action, BindingContext, FeatureFlags};

/// Prelude for convenient imports
pub mod prelude {
    pub use quill_core::prelude::*;

    pub use quill_macros::{Action, BindingContext, FeatureFlags};
}
