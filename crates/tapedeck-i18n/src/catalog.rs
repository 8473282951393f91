//! Keyed strings with locale fallback and `{name}` interpolation.
//!
//! # Invariants
//!
//! 1. A lookup tries the requested locale, then each fallback locale once,
//!    in order, and stops at the first hit.
//! 2. Interpolation is a single pass; substituted values are never scanned
//!    for further tokens.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing key | No locale in the chain has it | `None` |
//! | Unknown locale | Not loaded | Falls through to the chain |
//! | Missing argument | `{name}` with no `name` arg | Token left as-is |
//! | Duplicate key | `try_insert` on an existing key | [`I18nError::DuplicateKey`] |

use std::collections::HashMap;
use std::fmt;

use crate::plural::{PluralForms, PluralRule};

/// Locale tag such as `"en"` or `"en-US"`.
pub type Locale = String;

/// Errors from catalog construction and locale parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// The locale tag is empty or malformed.
    InvalidLocale(String),
    /// The key already exists in this locale.
    DuplicateKey { locale: String, key: String },
}

impl fmt::Display for I18nError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLocale(tag) => write!(f, "invalid locale: {tag:?}"),
            Self::DuplicateKey { locale, key } => {
                write!(f, "duplicate key '{key}' in locale '{locale}'")
            }
        }
    }
}

impl std::error::Error for I18nError {}

/// A plain string or a set of plural forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringEntry {
    Simple(String),
    Plural(PluralForms),
}

impl StringEntry {
    fn as_simple(&self) -> &str {
        match self {
            Self::Simple(s) => s,
            Self::Plural(forms) => &forms.other,
        }
    }
}

/// Strings for one locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleStrings {
    locale: Locale,
    strings: HashMap<String, StringEntry>,
}

impl LocaleStrings {
    #[must_use]
    pub fn new(locale: impl Into<Locale>) -> Self {
        Self {
            locale: locale.into(),
            strings: HashMap::new(),
        }
    }

    /// Insert or replace a simple string.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings
            .insert(key.into(), StringEntry::Simple(value.into()));
    }

    /// Insert or replace plural forms.
    pub fn insert_plural(&mut self, key: impl Into<String>, forms: PluralForms) {
        self.strings.insert(key.into(), StringEntry::Plural(forms));
    }

    /// Insert a simple string, refusing to overwrite.
    pub fn try_insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), I18nError> {
        let key = key.into();
        if self.strings.contains_key(&key) {
            return Err(I18nError::DuplicateKey {
                locale: self.locale.clone(),
                key,
            });
        }
        self.strings.insert(key, StringEntry::Simple(value.into()));
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StringEntry> {
        self.strings.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Catalog of locales with a fallback chain.
///
/// ```
/// use tapedeck_i18n::catalog::{LocaleStrings, StringCatalog};
/// use tapedeck_i18n::plural::PluralForms;
///
/// let mut en = LocaleStrings::new("en");
/// en.insert("cancel", "Cancel");
/// en.insert_plural(
///     "delete.title",
///     PluralForms::new("Delete recording", "Delete {count} recordings"),
/// );
///
/// let mut catalog = StringCatalog::new();
/// catalog.add_locale(en);
/// catalog.set_fallback_chain(vec!["en".into()]);
///
/// assert_eq!(catalog.get("de", "cancel"), Some("Cancel"));
/// assert_eq!(
///     catalog.format_plural("en", "delete.title", 3, &[]),
///     Some("Delete 3 recordings".to_string())
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringCatalog {
    locales: HashMap<Locale, LocaleStrings>,
    rules: HashMap<Locale, PluralRule>,
    fallback_chain: Vec<Locale>,
}

impl StringCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a locale; its plural rule is derived from the tag.
    pub fn add_locale(&mut self, strings: LocaleStrings) {
        let locale = strings.locale.clone();
        self.rules
            .insert(locale.clone(), PluralRule::for_locale(&locale));
        self.locales.insert(locale, strings);
    }

    /// Locales tried, in order, after the requested one.
    pub fn set_fallback_chain(&mut self, chain: Vec<Locale>) {
        self.fallback_chain = chain;
    }

    /// Override the plural rule for a locale.
    pub fn set_plural_rule(&mut self, locale: impl Into<Locale>, rule: PluralRule) {
        self.rules.insert(locale.into(), rule);
    }

    /// Registered locale tags.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        self.locales.keys().map(String::as_str).collect()
    }

    fn chain<'a>(&'a self, locale: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        std::iter::once(locale).chain(
            self.fallback_chain
                .iter()
                .map(String::as_str)
                .filter(move |fallback| *fallback != locale),
        )
    }

    /// First entry for `key` along the fallback chain, with the plural rule
    /// of the locale that supplied it.
    fn entry<'a>(&'a self, locale: &str, key: &str) -> Option<(PluralRule, &'a StringEntry)> {
        let locales = &self.locales;
        let rules = &self.rules;
        self.chain(locale).find_map(move |tag| {
            let entry = locales.get(tag)?.get(key)?;
            let rule = rules.get(tag).copied().unwrap_or(PluralRule::English);
            Some((rule, entry))
        })
    }

    /// Look up a simple string.
    #[must_use]
    pub fn get(&self, locale: &str, key: &str) -> Option<&str> {
        self.entry(locale, key).map(|(_, entry)| entry.as_simple())
    }

    /// Look up the plural form for `count`, using the rule of whichever
    /// locale supplied the entry.
    #[must_use]
    pub fn get_plural(&self, locale: &str, key: &str, count: i64) -> Option<&str> {
        let (rule, entry) = self.entry(locale, key)?;
        match entry {
            StringEntry::Simple(s) => Some(s),
            StringEntry::Plural(forms) => Some(forms.select(rule.categorize(count))),
        }
    }

    /// Look up a string and substitute `{name}` tokens.
    #[must_use]
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> Option<String> {
        self.get(locale, key).map(|template| interpolate(template, args))
    }

    /// Plural lookup plus interpolation; `{count}` is supplied automatically.
    #[must_use]
    pub fn format_plural(
        &self,
        locale: &str,
        key: &str,
        count: i64,
        args: &[(&str, &str)],
    ) -> Option<String> {
        let template = self.get_plural(locale, key, count)?;
        let count = count.to_string();
        let mut all: Vec<(&str, &str)> = Vec::with_capacity(args.len() + 1);
        all.push(("count", &count));
        all.extend_from_slice(args);
        Some(interpolate(template, &all))
    }
}

/// Single-pass `{name}` substitution. Unknown or unclosed tokens are kept.
fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        match args.iter().find(|(arg, _)| *arg == name) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}
