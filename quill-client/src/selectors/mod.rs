//! Derived reads over [`crate::state::AppState`]
//!
//! Selectors are plain functions of the state. The few that build new values
//! memoize through [`quill::Selector`].

pub mod happychat;
pub mod posts;
pub mod sites;
pub mod ui;
pub mod users;
