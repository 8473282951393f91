#![forbid(unsafe_code)]

//! Localised copy for the Tapedeck dashboard.
//!
//! - [`plural`]: CLDR-style plural categories and rules.
//! - [`catalog`]: keyed strings with a locale fallback chain and `{name}`
//!   interpolation.
//! - [`locale`]: locale detection from the environment.

pub mod catalog;
pub mod locale;
pub mod plural;

pub use catalog::{I18nError, Locale, LocaleStrings, StringCatalog};
pub use locale::detect_locale;
pub use plural::{PluralCategory, PluralForms, PluralRule};
