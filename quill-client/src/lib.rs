//! Terminal client for a content-management platform
//!
//! State lives in one [`state::AppState`] tree changed only by
//! [`reducer::reducer`]. Routes are resolved by a [`quill::Router`] that
//! [`boot::boot`] assembles from the section registry; backend work is
//! declared as [`effect::Effect`]s and carried out by [`app::Services`].
//!
//! Derived data is read through [`selectors`], several of which are
//! memoized on the state slices they depend on.

pub mod action;
pub mod app;
pub mod backend;
pub mod boot;
pub mod components;
pub mod config;
pub mod effect;
pub mod i18n;
pub mod reducer;
pub mod sections;
pub mod selectors;
pub mod state;
