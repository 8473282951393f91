//! Plural categories and the rules that pick them.
//!
//! Confirmation copy changes with the number of recordings involved
//! ("Delete recording" vs "Delete 3 recordings"). A [`PluralRule`] maps a
//! count to a [`PluralCategory`]; [`PluralForms`] holds one string per
//! category.
//!
//! # Invariants
//!
//! 1. Every rule maps any `i64` to exactly one category (negative counts use
//!    their magnitude).
//! 2. `Other` is the catch-all: a missing form always falls back to it.

use core::fmt;

/// CLDR plural categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// One string per plural category. Only `one` and `other` are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluralForms {
    pub zero: Option<String>,
    pub one: String,
    pub two: Option<String>,
    pub few: Option<String>,
    pub many: Option<String>,
    pub other: String,
}

impl PluralForms {
    /// Forms for languages that only distinguish singular and plural.
    #[must_use]
    pub fn new(one: impl Into<String>, other: impl Into<String>) -> Self {
        Self {
            one: one.into(),
            other: other.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_few(mut self, few: impl Into<String>) -> Self {
        self.few = Some(few.into());
        self
    }

    #[must_use]
    pub fn with_many(mut self, many: impl Into<String>) -> Self {
        self.many = Some(many.into());
        self
    }

    /// The form for `category`, or `other` when that form is absent.
    #[must_use]
    pub fn select(&self, category: PluralCategory) -> &str {
        let specific = match category {
            PluralCategory::Zero => self.zero.as_deref(),
            PluralCategory::One => Some(self.one.as_str()),
            PluralCategory::Two => self.two.as_deref(),
            PluralCategory::Few => self.few.as_deref(),
            PluralCategory::Many => self.many.as_deref(),
            PluralCategory::Other => None,
        };
        specific.unwrap_or(&self.other)
    }
}

/// Maps a count to a plural category.
#[derive(Clone, Copy)]
pub enum PluralRule {
    /// `one` for 1, `other` otherwise (English, German, Spanish, ...).
    English,
    /// `one` for 0 and 1, `other` otherwise (French, Hindi, ...).
    French,
    /// East Slavic: `one`/`few`/`many` keyed on the last two digits.
    EastSlavic,
    /// Polish: `one` only for exactly 1, then `few`/`many`.
    Polish,
    /// No plural distinction (Chinese, Japanese, Korean, ...).
    Invariant,
    /// Caller-supplied rule.
    Custom(fn(i64) -> PluralCategory),
}

impl PluralRule {
    #[must_use]
    pub fn categorize(&self, count: i64) -> PluralCategory {
        let n = count.unsigned_abs();
        match self {
            Self::English => {
                if n == 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::French => {
                if n <= 1 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            Self::EastSlavic => east_slavic(n),
            Self::Polish => polish(n),
            Self::Invariant => PluralCategory::Other,
            Self::Custom(rule) => rule(count),
        }
    }

    /// Rule for a locale tag such as `"en-US"` or `"ru"`. Unknown languages
    /// use the English rule.
    #[must_use]
    pub fn for_locale(tag: &str) -> Self {
        let primary = tag.split(['-', '_']).next().unwrap_or(tag);
        match primary.to_ascii_lowercase().as_str() {
            "fr" | "hi" | "bn" | "pt" => Self::French,
            "ru" | "uk" | "be" => Self::EastSlavic,
            "pl" => Self::Polish,
            "zh" | "ja" | "ko" | "th" | "vi" | "id" => Self::Invariant,
            _ => Self::English,
        }
    }
}

impl fmt::Debug for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::English => "English",
            Self::French => "French",
            Self::EastSlavic => "EastSlavic",
            Self::Polish => "Polish",
            Self::Invariant => "Invariant",
            Self::Custom(_) => "Custom(..)",
        };
        write!(f, "PluralRule::{name}")
    }
}

fn east_slavic(n: u64) -> PluralCategory {
    let (mod10, mod100) = (n % 10, n % 100);
    if mod10 == 1 && mod100 != 11 {
        PluralCategory::One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}

fn polish(n: u64) -> PluralCategory {
    let (mod10, mod100) = (n % 10, n % 100);
    if n == 1 {
        PluralCategory::One
    } else if (2..=4).contains(&mod10) && !(12..=14).contains(&mod100) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}
