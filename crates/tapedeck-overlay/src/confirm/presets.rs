#![forbid(unsafe_code)]

//! Fixed confirmation copy for recording removal.
//!
//! Two presets share the dialog: moving recordings to the trash, and deleting
//! them permanently. Titles and messages are count-aware through the
//! catalog's plural rules.

use tapedeck_i18n::catalog::{Locale, LocaleStrings, StringCatalog};
use tapedeck_i18n::locale::{DEFAULT_LOCALE, detect_locale};
use tapedeck_i18n::plural::PluralForms;

use super::ConfirmConfig;

/// Catalog keys used by the presets.
pub mod keys {
    pub const CANCEL: &str = "confirm.cancel";
    pub const TRASH_TITLE: &str = "confirm.trash.title";
    pub const TRASH_MESSAGE: &str = "confirm.trash.message";
    pub const TRASH_CONFIRM: &str = "confirm.trash.confirm";
    pub const DELETE_TITLE: &str = "confirm.delete.title";
    pub const DELETE_MESSAGE: &str = "confirm.delete.message";
    pub const DELETE_CONFIRM: &str = "confirm.delete.confirm";
}

/// Which fixed confirmation to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmPreset {
    /// Recoverable removal.
    MoveToTrash,
    /// Irreversible removal. Rendered with the destructive tone.
    PermanentDelete,
}

/// English strings for every preset key, with `en` as the fallback locale.
#[must_use]
pub fn builtin_catalog() -> StringCatalog {
    let mut en = LocaleStrings::new(DEFAULT_LOCALE);
    en.insert(keys::CANCEL, "Cancel");
    en.insert_plural(
        keys::TRASH_TITLE,
        PluralForms::new("Move recording to trash", "Move {count} recordings to trash"),
    );
    en.insert_plural(
        keys::TRASH_MESSAGE,
        PluralForms::new(
            "The recording can be restored from the trash.",
            "The {count} recordings can be restored from the trash.",
        ),
    );
    en.insert(keys::TRASH_CONFIRM, "Move to trash");
    en.insert_plural(
        keys::DELETE_TITLE,
        PluralForms::new(
            "Delete recording permanently",
            "Delete {count} recordings permanently",
        ),
    );
    en.insert_plural(
        keys::DELETE_MESSAGE,
        PluralForms::new(
            "This recording will be deleted permanently. This cannot be undone.",
            "These {count} recordings will be deleted permanently. This cannot be undone.",
        ),
    );
    en.insert(keys::DELETE_CONFIRM, "Delete permanently");

    let mut catalog = StringCatalog::new();
    catalog.add_locale(en);
    catalog.set_fallback_chain(vec![DEFAULT_LOCALE.to_string()]);
    catalog
}

/// Builds [`ConfirmConfig`]s for the presets from a catalog.
#[derive(Debug, Clone)]
pub struct ConfirmCopy {
    catalog: StringCatalog,
    locale: Locale,
}

impl Default for ConfirmCopy {
    fn default() -> Self {
        Self::new(builtin_catalog(), DEFAULT_LOCALE)
    }
}

impl ConfirmCopy {
    #[must_use]
    pub fn new(catalog: StringCatalog, locale: impl Into<Locale>) -> Self {
        Self {
            catalog,
            locale: locale.into(),
        }
    }

    /// Built-in strings, locale taken from `LC_ALL` / `LANG`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(builtin_catalog(), detect_locale())
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn config(&self, preset: ConfirmPreset, count: usize) -> ConfirmConfig {
        match preset {
            ConfirmPreset::MoveToTrash => self.move_to_trash(count),
            ConfirmPreset::PermanentDelete => self.permanent_delete(count),
        }
    }

    /// Copy for moving `count` recordings to the trash.
    #[must_use]
    pub fn move_to_trash(&self, count: usize) -> ConfirmConfig {
        ConfirmConfig::new(
            self.counted(keys::TRASH_TITLE, count),
            self.counted(keys::TRASH_MESSAGE, count),
        )
        .confirm_label(self.plain(keys::TRASH_CONFIRM))
        .cancel_label(self.plain(keys::CANCEL))
    }

    /// Copy for deleting `count` recordings permanently.
    #[must_use]
    pub fn permanent_delete(&self, count: usize) -> ConfirmConfig {
        ConfirmConfig::new(
            self.counted(keys::DELETE_TITLE, count),
            self.counted(keys::DELETE_MESSAGE, count),
        )
        .confirm_label(self.plain(keys::DELETE_CONFIRM))
        .cancel_label(self.plain(keys::CANCEL))
        .destructive(true)
    }

    fn counted(&self, key: &str, count: usize) -> String {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        self.catalog
            .format_plural(&self.locale, key, count, &[])
            .unwrap_or_else(|| key.to_string())
    }

    fn plain(&self, key: &str) -> String {
        self.catalog
            .get(&self.locale, key)
            .map_or_else(|| key.to_string(), str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_delete_singular() {
        let config = ConfirmCopy::default().permanent_delete(1);
        assert_eq!(config.title, "Delete recording permanently");
        assert_eq!(config.confirm_label, "Delete permanently");
        assert_eq!(config.cancel_label, "Cancel");
        assert!(config.destructive);
        assert!(config.message.starts_with("This recording"));
    }

    #[test]
    fn permanent_delete_plural() {
        let config = ConfirmCopy::default().permanent_delete(4);
        assert_eq!(config.title, "Delete 4 recordings permanently");
        assert!(config.message.starts_with("These 4 recordings"));
    }

    #[test]
    fn move_to_trash_is_not_destructive() {
        let copy = ConfirmCopy::default();
        let one = copy.move_to_trash(1);
        assert_eq!(one.title, "Move recording to trash");
        assert_eq!(one.confirm_label, "Move to trash");
        assert!(!one.destructive);

        let many = copy.config(ConfirmPreset::MoveToTrash, 2);
        assert_eq!(many.title, "Move 2 recordings to trash");
    }

    #[test]
    fn zero_count_uses_plural_in_english() {
        let config = ConfirmCopy::default().permanent_delete(0);
        assert_eq!(config.title, "Delete 0 recordings permanently");
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        let copy = ConfirmCopy::new(builtin_catalog(), "sv-SE");
        assert_eq!(copy.locale(), "sv-SE");
        assert_eq!(copy.move_to_trash(3).title, "Move 3 recordings to trash");
    }

    #[test]
    fn translated_catalog_with_own_plural_rule() {
        let mut catalog = builtin_catalog();
        let mut pl = LocaleStrings::new("pl");
        pl.insert_plural(
            keys::DELETE_TITLE,
            PluralForms::new("Usuń nagranie na stałe", "Usuń {count} nagrań na stałe")
                .with_few("Usuń {count} nagrania na stałe")
                .with_many("Usuń {count} nagrań na stałe"),
        );
        catalog.add_locale(pl);

        let copy = ConfirmCopy::new(catalog, "pl");
        assert_eq!(copy.permanent_delete(3).title, "Usuń 3 nagrania na stałe");
        assert_eq!(copy.permanent_delete(5).title, "Usuń 5 nagrań na stałe");
        // Keys the translation lacks come from English.
        assert_eq!(copy.permanent_delete(5).confirm_label, "Delete permanently");
    }

    #[test]
    fn missing_key_renders_key() {
        let copy = ConfirmCopy::new(StringCatalog::new(), "en");
        assert_eq!(copy.permanent_delete(1).title, keys::DELETE_TITLE);
    }
}
