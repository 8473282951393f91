//! Locale detection from the process environment.
//!
//! `LC_ALL` wins over `LANG`, matching POSIX precedence. Values like
//! `en_US.UTF-8` or `de_DE@euro` are normalized to BCP-47-ish tags
//! (`en-US`, `de-DE`); `C` and `POSIX` mean English.

use crate::catalog::{I18nError, Locale};

/// Locale used when the environment says nothing useful.
pub const DEFAULT_LOCALE: &str = "en";

/// Detect the locale from `LC_ALL` then `LANG`.
#[must_use]
pub fn detect_locale() -> Locale {
    let lc_all = std::env::var("LC_ALL").ok();
    let lang = std::env::var("LANG").ok();
    detect_locale_from(lc_all.as_deref(), lang.as_deref())
}

/// Detection with explicit inputs. Invalid values are skipped.
#[must_use]
pub fn detect_locale_from(lc_all: Option<&str>, lang: Option<&str>) -> Locale {
    [lc_all, lang]
        .into_iter()
        .flatten()
        .find_map(|raw| normalize_locale(raw).ok())
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

/// Normalize a raw locale string.
///
/// Strips any `.codeset` and `@modifier`, turns `_` into `-`, lowercases the
/// language and uppercases a two-letter region.
pub fn normalize_locale(raw: &str) -> Result<Locale, I18nError> {
    let trimmed = raw.trim();
    let base = trimmed
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() {
        return Err(I18nError::InvalidLocale(raw.to_string()));
    }
    if base.eq_ignore_ascii_case("c") || base.eq_ignore_ascii_case("posix") {
        return Ok(DEFAULT_LOCALE.to_string());
    }

    let mut parts = base.split(['_', '-']);
    let language = parts.next().unwrap_or_default();
    if language.is_empty()
        || language.len() > 8
        || !language.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(I18nError::InvalidLocale(raw.to_string()));
    }

    let mut tag = language.to_ascii_lowercase();
    for part in parts {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(I18nError::InvalidLocale(raw.to_string()));
        }
        tag.push('-');
        if part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()) {
            tag.push_str(&part.to_ascii_uppercase());
        } else {
            tag.push_str(part);
        }
    }
    Ok(tag)
}
