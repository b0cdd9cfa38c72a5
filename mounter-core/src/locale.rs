//! Locales and the ambient current locale.
//!
//! Every localized read or write in the graph goes through the current
//! locale of the calling thread. The only way to change it temporarily is
//! [`with_locale`], which restores the previous value on every exit path.

use std::cell::RefCell;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Locale used when a site declares none.
pub const DEFAULT_LOCALE: &str = "en";

// ---------------------------------------------------------------------------
// Newtype
// ---------------------------------------------------------------------------

/// A locale tag such as `en` or `fr`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(pub String);

impl Locale {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::from(DEFAULT_LOCALE)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Locale {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Locale {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Ambient current locale
// ---------------------------------------------------------------------------

thread_local! {
    static CURRENT_LOCALE: RefCell<Locale> = RefCell::new(Locale::default());
}

/// The locale governing localized reads and writes on this thread.
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.with(|current| current.borrow().clone())
}

/// Replace the current locale, returning the previous one.
pub fn set_current_locale(locale: impl Into<Locale>) -> Locale {
    let locale = locale.into();
    CURRENT_LOCALE.with(|current| std::mem::replace(&mut *current.borrow_mut(), locale))
}

/// Run `f` with `locale` as the current locale.
///
/// The previous locale is restored when `f` returns, when it returns an
/// error through its own `Result`, and when it unwinds.
///
/// ```
/// use mounter_core::{current_locale, with_locale, Locale};
///
/// let inside = with_locale("fr", current_locale);
/// assert_eq!(inside, Locale::from("fr"));
/// assert_eq!(current_locale(), Locale::from("en"));
/// ```
pub fn with_locale<R>(locale: impl Into<Locale>, f: impl FnOnce() -> R) -> R {
    let _guard = LocaleGuard::enter(locale.into());
    f()
}

/// RAII guard: restores the saved locale on drop.
#[derive(Debug)]
struct LocaleGuard {
    previous: Option<Locale>,
}

impl LocaleGuard {
    fn enter(locale: Locale) -> Self {
        Self {
            previous: Some(set_current_locale(locale)),
        }
    }
}

impl Drop for LocaleGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            let _ = CURRENT_LOCALE.try_with(|current| *current.borrow_mut() = previous);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
