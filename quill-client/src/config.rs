//! Command line, config file and feature flags

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use quill::{FeatureFlags, Keymap};
use serde::Deserialize;

use crate::app::Screen;

/// Terminal client for a content-management platform
#[derive(Parser, Debug, Default)]
#[command(name = "quill")]
#[command(about = "Post editor, support chat and account pages in the terminal")]
pub struct Args {
    /// JSON config file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// JSON fixture backing the backend (defaults to the bundled one)
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Route to open first
    #[arg(long, short, default_value = "/")]
    pub path: String,

    /// Turn a feature flag on (repeatable)
    #[arg(long = "enable", value_name = "FLAG")]
    pub enable: Vec<String>,

    /// Turn a feature flag off (repeatable)
    #[arg(long = "disable", value_name = "FLAG")]
    pub disable: Vec<String>,

    /// Locale strings to boot with (JSON catalog)
    #[arg(long)]
    pub locale_strings: Option<PathBuf>,

    /// Where to write logs; nothing is logged without it
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    pub debug: bool,

    /// Only log intents matching these globs (comma separated)
    #[arg(long, value_name = "GLOBS")]
    pub log_intents: Option<String>,

    /// Never log intents matching these globs (comma separated)
    #[arg(long, value_name = "GLOBS")]
    pub skip_intents: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `development`, `production`, `desktop`...
    pub env: String,
    pub features: HashMap<String, bool>,
    pub default_locale: String,
    /// Overrides merged over [`default_keymap`]
    pub keybindings: Option<Keymap<Screen>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: "development".into(),
            features: HashMap::new(),
            default_locale: "en".into(),
            keybindings: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Config file flags, then `--enable`, then `--disable`
    pub fn resolve_features(&self, args: &Args) -> Features {
        let mut features = Features::default();
        features.load_from_map(&self.features);
        for name in &args.enable {
            if !features.enable(name) {
                tracing::warn!(flag = %name, "Unknown feature flag");
            }
        }
        for name in &args.disable {
            if !features.disable(name) {
                tracing::warn!(flag = %name, "Unknown feature flag");
            }
        }
        features
    }

    pub fn keymap(&self) -> Keymap<Screen> {
        match &self.keybindings {
            Some(overrides) => default_keymap().merge(overrides.clone()),
            None => default_keymap(),
        }
    }
}

#[derive(FeatureFlags, Debug, Clone, PartialEq, Eq)]
pub struct Features {
    #[flag(name = "jetpack/happychat", default = true)]
    pub jetpack_happychat: bool,

    #[flag(name = "oauth")]
    pub oauth: bool,

    #[flag(name = "desktop")]
    pub desktop: bool,

    #[flag(name = "devdocs/redirect-loggedout-homepage")]
    pub devdocs_redirect_loggedout_homepage: bool,

    /// User data arrives with the page, so its locale is already applied
    #[flag(name = "wpcom-user-bootstrap")]
    pub wpcom_user_bootstrap: bool,

    #[flag(name = "network-connection")]
    pub network_connection: bool,
}

pub fn default_keymap() -> Keymap<Screen> {
    let mut keymap = Keymap::new();
    keymap
        .bind_global("quit", &["ctrl+c", "ctrl+q"])
        .bind_global("goto:/me/next", &["ctrl+n"])
        .bind_global("goto:/me/chat", &["ctrl+t"])
        .bind_global("notice:dismiss", &["ctrl+x"])
        .bind(Screen::Editor, "history", &["h"])
        .bind(Screen::Editor, "trash", &["d"])
        .bind(Screen::Editor, "quit", &["q"])
        .bind(Screen::Page, "quit", &["q"]);
    keymap
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill::key;

    #[test]
    fn test_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.env, "development");

        let features = config.resolve_features(&Args::default());
        assert!(features.jetpack_happychat);
        assert!(!features.oauth);
    }

    #[test]
    fn test_feature_precedence() {
        let config = Config::from_json(
            r#"{ "features": { "oauth": true, "desktop": true, "jetpack/happychat": false } }"#,
        )
        .unwrap();
        let args = Args {
            enable: vec!["jetpack/happychat".into(), "no-such-flag".into()],
            disable: vec!["desktop".into()],
            ..Args::default()
        };

        let features = config.resolve_features(&args);
        assert!(features.oauth);
        assert!(features.jetpack_happychat);
        assert!(!features.desktop);
        assert_eq!(features.is_enabled("no-such-flag"), None);
    }

    #[test]
    fn test_invalid_config_is_a_parse_error() {
        let dir = std::env::temp_dir().join("quill-config-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            Config::load(&dir.join("missing.json")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_keybinding_overrides() {
        let config =
            Config::from_json(r#"{ "keybindings": { "editor": { "history": ["r"] } } }"#).unwrap();
        let keymap = config.keymap();

        assert_eq!(keymap.command(&key("r"), Screen::Editor), Some("history"));
        assert_eq!(keymap.command(&key("h"), Screen::Editor), None);
        assert_eq!(keymap.command(&key("ctrl+t"), Screen::Page), Some("goto:/me/chat"));
    }
}
