//! Lazily loaded sections
//!
//! A section groups the routes under one or more path prefixes together with
//! the module that renders them. Modules are built on first use and then
//! shared for the life of the process.

use std::cell::OnceCell;

/// Errors raised by [`SectionRegistry`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SectionError {
    #[error("unknown section `{0}`")]
    Unknown(String),

    #[error("section `{0}` is already registered")]
    Duplicate(&'static str),
}

/// Static description of a section
#[derive(Debug, Clone)]
pub struct SectionDefinition<M> {
    pub name: &'static str,
    /// Path prefixes served by the section, e.g. `/me/next`
    pub paths: Vec<&'static str>,
    /// Whether logged-out visitors may open it
    pub enable_logged_out: bool,
    /// Navigation group, e.g. `me` or `sites`
    pub group: Option<&'static str>,
    pub loader: fn() -> M,
}

/// A registered section and its lazily built module
pub struct Section<M> {
    definition: SectionDefinition<M>,
    module: OnceCell<M>,
}

impl<M> Section<M> {
    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    pub fn paths(&self) -> &[&'static str] {
        &self.definition.paths
    }

    pub fn enable_logged_out(&self) -> bool {
        self.definition.enable_logged_out
    }

    pub fn group(&self) -> Option<&'static str> {
        self.definition.group
    }

    pub fn is_loaded(&self) -> bool {
        self.module.get().is_some()
    }

    /// Whether `pathname` falls under one of this section's prefixes
    ///
    /// Prefixes match on segment boundaries, `/me` does not serve `/media`.
    pub fn serves(&self, pathname: &str) -> bool {
        self.definition
            .paths
            .iter()
            .any(|prefix| prefix_matches(prefix, pathname))
    }

    fn longest_match(&self, pathname: &str) -> usize {
        self.definition
            .paths
            .iter()
            .filter(|prefix| prefix_matches(prefix, pathname))
            .map(|prefix| prefix.len())
            .max()
            .unwrap_or(0)
    }
}

fn prefix_matches(prefix: &str, pathname: &str) -> bool {
    pathname == prefix
        || (prefix != "/"
            && pathname.starts_with(prefix)
            && pathname[prefix.len()..].starts_with('/'))
}

/// Registry of all sections known to the client
pub struct SectionRegistry<M> {
    sections: Vec<Section<M>>,
}

impl<M> Default for SectionRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> SectionRegistry<M> {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    pub fn register(&mut self, definition: SectionDefinition<M>) -> Result<(), SectionError> {
        if self.get(definition.name).is_some() {
            return Err(SectionError::Duplicate(definition.name));
        }
        self.sections.push(Section {
            definition,
            module: OnceCell::new(),
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Section<M>> {
        self.sections.iter().find(|s| s.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section<M>> {
        self.sections.iter()
    }

    /// Section owning `pathname`, preferring the longest matching prefix
    pub fn section_for_path(&self, pathname: &str) -> Option<&Section<M>> {
        self.sections
            .iter()
            .filter(|s| s.serves(pathname))
            .max_by_key(|s| s.longest_match(pathname))
    }

    /// Module for `name`, built on first request
    pub fn load(&self, name: &str) -> Result<&M, SectionError> {
        let section = self
            .get(name)
            .ok_or_else(|| SectionError::Unknown(name.to_string()))?;
        Ok(section.module.get_or_init(|| {
            tracing::debug!(section = %name, "Loading section");
            (section.definition.loader)()
        }))
    }

    /// Path prefixes open to logged-out visitors
    pub fn logged_out_paths(&self) -> Vec<&'static str> {
        self.sections
            .iter()
            .filter(|s| s.enable_logged_out())
            .flat_map(|s| s.paths().iter().copied())
            .collect()
    }
}
