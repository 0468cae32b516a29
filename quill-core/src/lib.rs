//! Core traits and types for quill
//!
//! quill structures a content-management client as a single state tree
//! mutated only by intents, with views derived from state through pure (and
//! optionally memoized) selectors.
//!
//! # Core Concepts
//!
//! - **Action**: an intent describing a requested state change
//! - **Store**: the state container; reducers apply intents in order
//! - **Selector**: derived values, memoized on their dependants
//! - **Router**: ordered route middleware with a `next` continuation
//! - **Component**: views rendered from props that emit intents
//!
//! # Basic Example
//!
//! ```ignore
//! use quill_core::prelude::*;
//!
//! #[derive(Action, Clone, Debug)]
//! enum Intent {
//!     PostRevisionsDialogToggle,
//! }
//!
//! #[derive(Default)]
//! struct AppState {
//!     dialog_visible: bool,
//! }
//!
//! fn reducer(state: &mut AppState, intent: Intent) -> bool {
//!     match intent {
//!         Intent::PostRevisionsDialogToggle => {
//!             state.dialog_visible = !state.dialog_visible;
//!             true
//!         }
//!     }
//! }
//!
//! let mut store = Store::new(AppState::default(), reducer);
//! store.dispatch(Intent::PostRevisionsDialogToggle);
//! ```
//!
//! # Request and Result Intents
//!
//! Work that leaves the process is split in two: a request intent makes the
//! reducer return an effect (`PostTrashConfirm` yields `Effect::TrashPost`),
//! and the effect handler reports back with a result intent
//! (`PostTrashDidSucceed`, `PostTrashDidFail`). With
//! `#[action(infer_categories)]` both land in the `post_trash` category.

pub mod action;
pub mod component;
pub mod effect;
pub mod event;
pub mod features;
pub mod keymap;
pub mod logger;
pub mod router;
pub mod runtime;
pub mod sections;
pub mod selector;
pub mod store;
pub mod testing;

pub use action::{Action, ActionCategory, ActionSummary};
pub use component::Component;
pub use features::FeatureFlags;

pub use event::{process_raw_event, spawn_event_poller, EventKind, EventType, RawEvent};
pub use keymap::{display_key, parse_key, BindingContext, Keymap};
pub use logger::{glob_match, IntentFilter, IntentLoggerMiddleware, LoggedIntent};

pub use store::{
    DispatchStore, Listener, Middleware, Reducer, Store, StoreWithMiddleware, SubscriptionId,
};

pub use effect::{DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware};
pub use runtime::{
    dispatch_and_settle, EffectContext, EffectRuntime, EffectStoreLike, EventOutcome,
    PollerConfig,
};

pub use router::{
    parse_query, parse_query_lossy, Context, Navigation, Next, Outcome, Params, QueryError,
    QueryMap, RoutePattern, Router, RouterError,
};
pub use sections::{Section, SectionDefinition, SectionError, SectionRegistry};
pub use selector::{Dependant, Selector};

pub use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    Frame,
};

pub use testing::{
    buffer_to_string_plain, char_key, key, key_event, typed, RenderHarness, TestHarness,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{Action, ActionCategory, ActionSummary};
    pub use crate::component::Component;
    pub use crate::effect::{
        DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware,
    };
    pub use crate::event::{EventKind, EventType};
    pub use crate::features::FeatureFlags;
    pub use crate::keymap::{BindingContext, Keymap};
    pub use crate::router::{Context, Navigation, Next, Outcome, Router};
    pub use crate::runtime::{EffectContext, EffectRuntime, EventOutcome};
    pub use crate::selector::{Dependant, Selector};
    pub use crate::store::{DispatchStore, Middleware, Store, StoreWithMiddleware};

    pub use ratatui::{
        layout::Rect,
        style::{Color, Modifier, Style},
        text::{Line, Span, Text},
        Frame,
    };
}
