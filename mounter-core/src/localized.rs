//! Per-locale attribute storage.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::locale::{current_locale, Locale};

/// One value per locale, read and written through the current locale.
///
/// There is no fallback: a value that was never written for a locale reads
/// back as `None` under that locale, even when the default locale has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Localized<T> {
    values: IndexMap<Locale, T>,
}

impl<T> Default for Localized<T> {
    fn default() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }
}

impl<T> Localized<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A localized value holding `value` for `locale` only.
    pub fn with(locale: impl Into<Locale>, value: T) -> Self {
        let mut localized = Self::new();
        localized.set_in(locale, value);
        localized
    }

    /// Value for the current locale.
    pub fn get(&self) -> Option<&T> {
        self.get_in(&current_locale())
    }

    pub fn get_in(&self, locale: &Locale) -> Option<&T> {
        self.values.get(locale)
    }

    /// Store `value` under the current locale, replacing any previous one.
    pub fn set(&mut self, value: T) {
        self.set_in(current_locale(), value);
    }

    pub fn set_in(&mut self, locale: impl Into<Locale>, value: T) {
        self.values.insert(locale.into(), value);
    }

    /// Locales holding a value, in write order.
    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.values.keys()
    }

    pub fn is_translated_in(&self, locale: &Locale) -> bool {
        self.values.contains_key(locale)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Locale, &T)> {
        self.values.iter()
    }
}

impl Localized<String> {
    /// Current-locale value as `&str`.
    pub fn as_deref(&self) -> Option<&str> {
        self.get().map(String::as_str)
    }
}
