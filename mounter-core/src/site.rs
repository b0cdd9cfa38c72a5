//! Site and snippet resources.

use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::localized::Localized;

/// The root resource of a mount. Its locales must be known before any
/// content is parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub locales: Vec<Locale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default)]
    pub seo_title: Localized<String>,
    #[serde(default)]
    pub meta_keywords: Localized<String>,
    #[serde(default)]
    pub meta_description: Localized<String>,
}

impl Site {
    pub fn seo_title(&self) -> Option<&str> {
        self.seo_title.as_deref()
    }

    pub fn meta_keywords(&self) -> Option<&str> {
        self.meta_keywords.as_deref()
    }

    pub fn meta_description(&self) -> Option<&str> {
        self.meta_description.as_deref()
    }
}

/// A reusable template fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub slug: String,
    pub name: String,
    /// Raw template body per locale.
    pub source: Localized<String>,
}

impl Snippet {
    pub fn new(slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            name: slug.clone(),
            slug,
            source: Localized::new(),
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}
