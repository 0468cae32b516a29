//! Locale data and string translation
//!
//! Locale data is the JSON message catalog the platform serves: a header
//! under the empty key, then one entry per source string holding its
//! translated forms.
//!
//! ```json
//! {
//!   "": { "localeSlug": "fr", "Plural-Forms": "nplurals=2; plural=n > 1;" },
//!   "Move to trash": ["Mettre à la corbeille"],
//!   "%(count)d revision": ["%(count)d révision", "%(count)d révisions"]
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LocaleHeader {
    #[serde(rename = "localeSlug", default)]
    pub locale_slug: Option<String>,
    #[serde(rename = "Plural-Forms", default)]
    pub plural_forms: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LocaleData {
    #[serde(rename = "", default)]
    pub header: LocaleHeader,
    #[serde(flatten)]
    pub messages: HashMap<String, Vec<String>>,
}

impl LocaleData {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn locale_slug(&self) -> Option<&str> {
        self.header.locale_slug.as_deref()
    }

    /// Number of translated source strings
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn plural_rule(&self) -> PluralRule {
        self.header
            .plural_forms
            .as_deref()
            .map(PluralRule::parse)
            .unwrap_or_default()
    }
}

pub fn is_default_locale(slug: &str, default_locale: &str) -> bool {
    slug.is_empty() || slug == default_locale
}

/// Which plural form a count selects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum PluralRule {
    /// `plural=n != 1`
    #[default]
    NotOne,
    /// `plural=n > 1`
    GreaterThanOne,
    /// `nplurals=1`
    Single,
}

impl PluralRule {
    fn parse(forms: &str) -> Self {
        let compact: String = forms.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.contains("nplurals=1") {
            Self::Single
        } else if compact.contains("plural=n>1") || compact.contains("plural=(n>1)") {
            Self::GreaterThanOne
        } else {
            Self::NotOne
        }
    }

    fn index(self, n: u64) -> usize {
        match self {
            Self::NotOne => usize::from(n != 1),
            Self::GreaterThanOne => usize::from(n > 1),
            Self::Single => 0,
        }
    }
}

/// Translates source strings through the active locale, falling back to the
/// source text
#[derive(Debug, Clone, Default)]
pub struct Translator {
    data: Option<Arc<LocaleData>>,
}

impl Translator {
    pub fn new(data: Option<Arc<LocaleData>>) -> Self {
        Self { data }
    }

    pub fn translate<'a>(&'a self, text: &'a str) -> &'a str {
        self.lookup(text, 0).unwrap_or(text)
    }

    pub fn translate_plural<'a>(&'a self, single: &'a str, plural: &'a str, n: u64) -> &'a str {
        let index = self
            .data
            .as_deref()
            .map(LocaleData::plural_rule)
            .unwrap_or_default()
            .index(n);
        if let Some(translated) = self.lookup(single, index) {
            return translated;
        }
        if PluralRule::NotOne.index(n) == 0 {
            single
        } else {
            plural
        }
    }

    /// Translate, then fill `%(name)s` and `%(name)d` placeholders
    pub fn translate_with(&self, text: &str, args: &[(&str, &str)]) -> String {
        substitute(self.translate(text), args)
    }

    fn lookup(&self, text: &str, index: usize) -> Option<&str> {
        self.data
            .as_ref()?
            .messages
            .get(text)?
            .get(index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Replace `%(name)s` / `%(name)d` placeholders; unknown names stay as written
pub fn substitute(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("%(") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match placeholder(tail) {
            Some((name, len)) => {
                match args.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => out.push_str(value),
                    None => out.push_str(&tail[..len]),
                }
                rest = &tail[len..];
            }
            None => {
                out.push_str("%(");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Name and byte length of the placeholder opening `tail`
fn placeholder(tail: &str) -> Option<(&str, usize)> {
    let body = tail.strip_prefix("%(")?;
    let close = body.find(')')?;
    let kind = body[close + 1..].chars().next()?;
    matches!(kind, 's' | 'd').then_some((&body[..close], close + 4))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRENCH: &str = r#"{
        "": { "localeSlug": "fr", "Plural-Forms": "nplurals=2; plural=n > 1;" },
        "Move to trash": ["Mettre à la corbeille"],
        "%(count)d revision": ["%(count)d révision", "%(count)d révisions"],
        "Untranslated": [""]
    }"#;

    fn french() -> Translator {
        Translator::new(Some(Arc::new(LocaleData::from_json(FRENCH).unwrap())))
    }

    #[test]
    fn test_parse_locale_data() {
        let data = LocaleData::from_json(FRENCH).unwrap();
        assert_eq!(data.locale_slug(), Some("fr"));
        assert_eq!(data.len(), 3);
        assert_eq!(data.plural_rule(), PluralRule::GreaterThanOne);
    }

    #[test]
    fn test_missing_header_is_default() {
        let data = LocaleData::from_json(r#"{ "Hi": ["Salut"] }"#).unwrap();
        assert_eq!(data.locale_slug(), None);
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_translate_falls_back_to_source() {
        let t = french();
        assert_eq!(t.translate("Move to trash"), "Mettre à la corbeille");
        assert_eq!(t.translate("Back"), "Back");
        assert_eq!(t.translate("Untranslated"), "Untranslated");
        assert_eq!(Translator::default().translate("Back"), "Back");
    }

    #[test]
    fn test_plural_rules() {
        let t = french();
        assert_eq!(
            t.translate_plural("%(count)d revision", "%(count)d revisions", 0),
            "%(count)d révision"
        );
        assert_eq!(
            t.translate_plural("%(count)d revision", "%(count)d revisions", 2),
            "%(count)d révisions"
        );

        let english = Translator::default();
        assert_eq!(english.translate_plural("word", "words", 1), "word");
        assert_eq!(english.translate_plural("word", "words", 0), "words");
    }

    #[test]
    fn test_single_form_locale() {
        assert_eq!(PluralRule::parse("nplurals=1; plural=0;").index(5), 0);
        assert_eq!(PluralRule::parse("nplurals=2; plural=(n != 1);").index(5), 1);
    }

    #[test]
    fn test_substitute() {
        assert_eq!(
            substitute("%(count)d words by %(name)s", &[("count", "3"), ("name", "Ada")]),
            "3 words by Ada"
        );
        assert_eq!(substitute("%(missing)s!", &[]), "%(missing)s!");
        assert_eq!(substitute("100%(", &[]), "100%(");
        assert_eq!(substitute("plain", &[("x", "y")]), "plain");
    }

    #[test]
    fn test_translate_with() {
        let t = french();
        assert_eq!(
            t.translate_with("%(count)d revision", &[("count", "1")]),
            "1 révision"
        );
    }
}
