//! Runtime feature flags
//!
//! Flags are read-only from the point of view of selectors and views; they
//! are loaded once from configuration and may be overridden on the command
//! line. Flag names are free-form strings and commonly carry a scope prefix
//! (`jetpack/happychat`, `devdocs/redirect-loggedout-homepage`).
//!
//! # Typed flags
//!
//! ```ignore
//! use quill::FeatureFlags;
//!
//! #[derive(FeatureFlags)]
//! struct Features {
//!     #[flag(name = "jetpack/happychat", default = false)]
//!     jetpack_happychat: bool,
//!
//!     #[flag(default = true)]
//!     oauth: bool,
//! }
//!
//! let mut features = Features::default();
//! assert_eq!(features.is_enabled("jetpack/happychat"), Some(false));
//! features.enable("jetpack/happychat");
//! assert!(features.jetpack_happychat);
//! ```
//!
//! # Usage in selectors
//!
//! ```ignore
//! if features.jetpack_happychat && get_section_name(state) == Some("jetpackConnect") {
//!     return vec![HappychatGroup::Jpop];
//! }
//! ```

use std::collections::HashMap;

/// Trait for feature flag containers
///
/// Use `#[derive(FeatureFlags)]` for automatic implementation.
///
/// # Example
///
/// ```
/// use quill_core::FeatureFlags;
///
/// struct MyFeatures {
///     oauth: bool,
///     desktop: bool,
/// }
///
/// impl FeatureFlags for MyFeatures {
///     fn is_enabled(&self, name: &str) -> Option<bool> {
///         match name {
///             "oauth" => Some(self.oauth),
///             "desktop" => Some(self.desktop),
///             _ => None,
///         }
///     }
///
///     fn set(&mut self, name: &str, enabled: bool) -> bool {
///         match name {
///             "oauth" => { self.oauth = enabled; true }
///             "desktop" => { self.desktop = enabled; true }
///             _ => false,
///         }
///     }
///
///     fn all_flags() -> &'static [&'static str] {
///         &["oauth", "desktop"]
///     }
/// }
/// ```
pub trait FeatureFlags {
    /// Check if a feature is enabled by name
    ///
    /// Returns `None` if the feature doesn't exist.
    fn is_enabled(&self, name: &str) -> Option<bool>;

    /// Set a feature's enabled state
    ///
    /// Returns `false` if the feature doesn't exist.
    fn set(&mut self, name: &str, enabled: bool) -> bool;

    /// Get all available flag names
    fn all_flags() -> &'static [&'static str]
    where
        Self: Sized;

    /// Enable a feature by name
    fn enable(&mut self, name: &str) -> bool {
        self.set(name, true)
    }

    /// Disable a feature by name
    fn disable(&mut self, name: &str) -> bool {
        self.set(name, false)
    }

    /// Whether the flag exists and is on
    fn is_on(&self, name: &str) -> bool {
        self.is_enabled(name).unwrap_or(false)
    }

    /// Get all flags as a map of name -> enabled
    fn to_map(&self) -> HashMap<String, bool>
    where
        Self: Sized,
    {
        Self::all_flags()
            .iter()
            .filter_map(|name| self.is_enabled(name).map(|v| ((*name).to_string(), v)))
            .collect()
    }

    /// Load flags from a map (e.g., from the config file)
    ///
    /// Unknown flags are ignored. Returns the number of flags that were set.
    fn load_from_map(&mut self, map: &HashMap<String, bool>) -> usize {
        let mut count = 0;
        for (name, enabled) in map {
            if self.set(name, *enabled) {
                count += 1;
            }
        }
        count
    }
}
