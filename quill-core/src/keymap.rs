//! Context-aware key to command mapping
//!
//! Bindings are written as strings (`"h"`, `"ctrl+t"`, `"shift+tab"`) so they
//! can live in configuration. They are parsed once, when added.

use std::collections::HashMap;
use std::hash::Hash;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use serde::{Deserialize, Deserializer};

/// A set of screens or overlays with their own bindings
///
/// Use `#[derive(BindingContext)]` for unit enums.
pub trait BindingContext: Clone + Copy + Eq + Hash {
    /// Name used in configuration
    fn name(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self>;

    fn all() -> &'static [Self];
}

#[derive(Debug, Clone)]
struct Binding {
    key: KeyEvent,
    spelling: String,
    command: String,
}

/// Key bindings per context, with a global fallback
#[derive(Debug, Clone)]
pub struct Keymap<C: BindingContext> {
    global: Vec<Binding>,
    contexts: HashMap<C, Vec<Binding>>,
}

impl<C: BindingContext> Default for Keymap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: BindingContext> Keymap<C> {
    pub fn new() -> Self {
        Self {
            global: Vec::new(),
            contexts: HashMap::new(),
        }
    }

    /// Bind `keys` to `command` in every context. Unparseable keys are skipped.
    pub fn bind_global(&mut self, command: &str, keys: &[&str]) -> &mut Self {
        replace_bindings(&mut self.global, command, keys);
        self
    }

    /// Bind `keys` to `command` in one context
    pub fn bind(&mut self, context: C, command: &str, keys: &[&str]) -> &mut Self {
        replace_bindings(self.contexts.entry(context).or_default(), command, keys);
        self
    }

    /// Command bound to `key`, context bindings first
    pub fn command(&self, key: &KeyEvent, context: C) -> Option<&str> {
        self.contexts
            .get(&context)
            .and_then(|bindings| find_command(bindings, key))
            .or_else(|| find_command(&self.global, key))
    }

    /// Display form of the first key bound to `command`, e.g. `^T`
    pub fn hint(&self, command: &str, context: C) -> Option<String> {
        let in_context = self
            .contexts
            .get(&context)
            .and_then(|bindings| bindings.iter().find(|b| b.command == command));
        in_context
            .or_else(|| self.global.iter().find(|b| b.command == command))
            .map(|binding| display_key(&binding.spelling))
    }

    /// Overlay `other` on top of `self`, command by command
    pub fn merge(mut self, other: Self) -> Self {
        for (command, keys) in group_by_command(&other.global) {
            let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
            self.bind_global(&command, &keys);
        }
        for (context, bindings) in &other.contexts {
            for (command, keys) in group_by_command(bindings) {
                let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
                self.bind(*context, &command, &keys);
            }
        }
        self
    }
}

fn replace_bindings(bindings: &mut Vec<Binding>, command: &str, keys: &[&str]) {
    bindings.retain(|b| b.command != command);
    for spelling in keys {
        match parse_key(spelling) {
            Some(key) => bindings.push(Binding {
                key,
                spelling: (*spelling).to_string(),
                command: command.to_string(),
            }),
            None => tracing::warn!(key = %spelling, command, "Ignoring unparseable key binding"),
        }
    }
}

fn find_command<'a>(bindings: &'a [Binding], key: &KeyEvent) -> Option<&'a str> {
    bindings
        .iter()
        .find(|b| same_key(&b.key, key))
        .map(|b| b.command.as_str())
}

fn group_by_command(bindings: &[Binding]) -> Vec<(String, Vec<String>)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for binding in bindings {
        match grouped.iter_mut().find(|(command, _)| *command == binding.command) {
            Some((_, keys)) => keys.push(binding.spelling.clone()),
            None => grouped.push((binding.command.clone(), vec![binding.spelling.clone()])),
        }
    }
    grouped
}

fn same_key(bound: &KeyEvent, pressed: &KeyEvent) -> bool {
    let codes_match = match (bound.code, pressed.code) {
        (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
        (a, b) => a == b,
    };
    codes_match && bound.modifiers == pressed.modifiers
}

impl<'de, C: BindingContext> Deserialize<'de> for Keymap<C> {
    /// `{ "global": { "quit": ["q"] }, "dialog": { "close": ["esc"] } }`
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: HashMap<String, HashMap<String, Vec<String>>> =
            HashMap::deserialize(deserializer)?;
        let mut keymap = Keymap::new();
        for (context_name, commands) in raw {
            let context = C::from_name(&context_name);
            if context_name != "global" && context.is_none() {
                tracing::warn!(context = %context_name, "Ignoring bindings for unknown context");
                continue;
            }
            for (command, keys) in commands {
                let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
                match context {
                    Some(context) => keymap.bind(context, &command, &keys),
                    None => keymap.bind_global(&command, &keys),
                };
            }
        }
        Ok(keymap)
    }
}

fn key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// Parse `"q"`, `"esc"`, `"ctrl+t"`, `"shift+tab"`, `"f5"`
pub fn parse_key(spelling: &str) -> Option<KeyEvent> {
    let lowered = spelling.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    if lowered == "shift+tab" || lowered == "backtab" {
        return Some(key_event(KeyCode::BackTab, KeyModifiers::SHIFT));
    }

    let mut parts: Vec<&str> = lowered.split('+').map(str::trim).collect();
    // "ctrl++" binds the plus key
    if lowered.ends_with("++") {
        parts.pop();
        if let Some(last) = parts.last_mut() {
            *last = "+";
        }
    }
    let name = parts.pop()?;

    let mut modifiers = KeyModifiers::empty();
    for part in parts {
        modifiers |= match part {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "shift" => KeyModifiers::SHIFT,
            "alt" => KeyModifiers::ALT,
            _ => return None,
        };
    }

    let code = match name {
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        function if function.len() > 1 && function.starts_with('f') => {
            let n: u8 = function[1..].parse().ok()?;
            if !(1..=12).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
        single => {
            let mut chars = single.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(ch)
        }
    };

    Some(key_event(code, modifiers))
}

/// Compact display form for footers: `ctrl+t` becomes `^T`, `esc` becomes `Esc`
pub fn display_key(spelling: &str) -> String {
    let lowered = spelling.trim().to_lowercase();
    if lowered == "shift+tab" || lowered == "backtab" {
        return "Shift+Tab".to_string();
    }

    let mut parts: Vec<&str> = lowered.split('+').collect();
    let name = parts.pop().unwrap_or_default();
    let prefix: String = parts
        .iter()
        .map(|m| match m.trim() {
            "ctrl" | "control" => "^",
            "shift" => "Shift+",
            "alt" => "Alt+",
            _ => "",
        })
        .collect();

    let name = match name {
        "esc" | "escape" => "Esc".to_string(),
        "enter" | "return" => "Enter".to_string(),
        "pageup" => "PgUp".to_string(),
        "pagedown" => "PgDn".to_string(),
        "delete" | "del" => "Del".to_string(),
        other if other.chars().count() == 1 => other.to_uppercase(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    };
    format!("{prefix}{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Screen {
        Editor,
        Dialog,
    }

    impl BindingContext for Screen {
        fn name(&self) -> &'static str {
            match self {
                Screen::Editor => "editor",
                Screen::Dialog => "dialog",
            }
        }

        fn from_name(name: &str) -> Option<Self> {
            match name {
                "editor" => Some(Screen::Editor),
                "dialog" => Some(Screen::Dialog),
                _ => None,
            }
        }

        fn all() -> &'static [Self] {
            &[Screen::Editor, Screen::Dialog]
        }
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("q").map(|k| k.code), Some(KeyCode::Char('q')));
        assert_eq!(parse_key("Esc").map(|k| k.code), Some(KeyCode::Esc));
        assert_eq!(parse_key("f5").map(|k| k.code), Some(KeyCode::F(5)));
        assert_eq!(parse_key("shift+tab").map(|k| k.code), Some(KeyCode::BackTab));

        let ctrl = parse_key("ctrl+t").unwrap();
        assert_eq!(ctrl.code, KeyCode::Char('t'));
        assert_eq!(ctrl.modifiers, KeyModifiers::CONTROL);

        assert!(parse_key("").is_none());
        assert!(parse_key("hyper+q").is_none());
        assert!(parse_key("f13").is_none());
        assert!(parse_key("word").is_none());
    }

    #[test]
    fn test_context_bindings_fall_back_to_global() {
        let mut keymap = Keymap::new();
        keymap
            .bind_global("quit", &["q", "ctrl+c"])
            .bind(Screen::Dialog, "close", &["esc", "q"]);

        let q = parse_key("q").unwrap();
        assert_eq!(keymap.command(&q, Screen::Dialog), Some("close"));
        assert_eq!(keymap.command(&q, Screen::Editor), Some("quit"));

        let upper_q = key_event(KeyCode::Char('Q'), KeyModifiers::empty());
        assert_eq!(keymap.command(&upper_q, Screen::Editor), Some("quit"));

        let x = parse_key("x").unwrap();
        assert_eq!(keymap.command(&x, Screen::Editor), None);
    }

    #[test]
    fn test_rebinding_replaces_keys() {
        let mut keymap: Keymap<Screen> = Keymap::new();
        keymap.bind_global("history", &["h"]);
        keymap.bind_global("history", &["ctrl+h"]);

        assert_eq!(keymap.command(&parse_key("h").unwrap(), Screen::Editor), None);
        assert_eq!(keymap.hint("history", Screen::Editor), Some("^H".to_string()));
    }

    #[test]
    fn test_merge_overrides_per_command() {
        let mut defaults = Keymap::new();
        defaults
            .bind_global("quit", &["q"])
            .bind(Screen::Editor, "trash", &["d"]);
        let overrides: Keymap<Screen> =
            serde_json::from_str(r#"{"editor": {"trash": ["ctrl+d"]}, "nowhere": {"x": ["x"]}}"#)
                .unwrap();

        let keymap = defaults.merge(overrides);
        let ctrl_d = parse_key("ctrl+d").unwrap();
        assert_eq!(keymap.command(&ctrl_d, Screen::Editor), Some("trash"));
        assert_eq!(keymap.command(&parse_key("d").unwrap(), Screen::Editor), None);
        assert_eq!(keymap.command(&parse_key("q").unwrap(), Screen::Editor), Some("quit"));
    }

    #[test]
    fn test_display_key() {
        assert_eq!(display_key("ctrl+t"), "^T");
        assert_eq!(display_key("esc"), "Esc");
        assert_eq!(display_key("h"), "H");
        assert_eq!(display_key("shift+tab"), "Shift+Tab");
        assert_eq!(display_key("pagedown"), "PgDn");
        assert_eq!(display_key("enter"), "Enter");
    }
}
