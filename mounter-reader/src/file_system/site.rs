//! `config/site.yml`: the site itself and the page ordering.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::Deserialize;
use serde_json::Value;

use mounter_core::{Locale, Localized, ResourceKind, Site, DEFAULT_LOCALE};

use super::read_yaml;
use crate::error::ReaderError;
use crate::reader::{ReadContext, ResourceReader};

pub(crate) const SITE_FILE: &str = "config/site.yml";

#[derive(Debug, Default, Deserialize)]
struct SiteFile {
    #[serde(default)]
    name: String,
    subdomain: Option<String>,
    #[serde(default)]
    domains: Vec<String>,
    #[serde(default)]
    locales: Vec<Locale>,
    timezone: Option<String>,
    seo_title: Option<Value>,
    meta_keywords: Option<Value>,
    meta_description: Option<Value>,
    #[serde(default)]
    pages: Vec<Value>,
}

/// Load `config/site.yml`, unwrapping an optional top-level `site:` key.
fn load(root: &Path) -> Result<SiteFile, ReaderError> {
    let path = root.join(SITE_FILE);
    let document: Value = read_yaml(&path)?;
    let document = match document {
        Value::Object(mut map) if map.contains_key("site") => map.remove("site").unwrap_or_default(),
        other => other,
    };
    if document.is_null() {
        return Ok(SiteFile::default());
    }
    Ok(serde_json::from_value(document)?)
}

/// Fullpaths listed under `pages:`, depth first.
///
/// ```yaml
/// pages:
///   - index
///   - about-us:
///     - john-doe
///     - jane-doe
///   - music
/// ```
pub(crate) fn page_ordering(root: &Path) -> Result<IndexSet<String>, ReaderError> {
    let mut ordering = IndexSet::new();
    flatten_pages(&load(root)?.pages, "", &mut ordering);
    Ok(ordering)
}

fn flatten_pages(items: &[Value], prefix: &str, ordering: &mut IndexSet<String>) {
    for item in items {
        match item {
            Value::String(name) => {
                ordering.insert(format!("{prefix}{name}"));
            }
            Value::Object(map) => {
                for (name, children) in map {
                    let fullpath = format!("{prefix}{name}");
                    ordering.insert(fullpath.clone());
                    if let Value::Array(children) = children {
                        flatten_pages(children, &format!("{fullpath}/"), ordering);
                    }
                }
            }
            _ => {}
        }
    }
}

/// A string (default locale) or a `{ <locale>: value }` map.
fn localized(raw: Option<Value>, default_locale: &Locale) -> Localized<String> {
    let mut values = Localized::new();
    match raw {
        Some(Value::String(value)) => values.set_in(default_locale.clone(), value),
        Some(Value::Object(map)) => {
            for (locale, value) in map {
                if let Value::String(value) = value {
                    values.set_in(locale, value);
                }
            }
        }
        _ => {}
    }
    values
}

pub(crate) struct SiteReader {
    root: PathBuf,
}

impl SiteReader {
    pub(crate) fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }
}

impl ResourceReader for SiteReader {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Site
    }

    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        let file = load(&self.root)?;
        let default_locale = file
            .locales
            .first()
            .cloned()
            .unwrap_or_else(|| Locale::from(DEFAULT_LOCALE));

        ctx.mounting_point.register_site(Site {
            name: file.name,
            subdomain: file.subdomain,
            domains: file.domains,
            timezone: file.timezone,
            seo_title: localized(file.seo_title, &default_locale),
            meta_keywords: localized(file.meta_keywords, &default_locale),
            meta_description: localized(file.meta_description, &default_locale),
            locales: file.locales,
        });
        Ok(())
    }
}
