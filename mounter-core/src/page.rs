//! Pages and the page tree.
//!
//! Sources deliver pages as flat, path-addressed records. The
//! [`PageTreeBuilder`] registers each one under its locale-invariant
//! fullpath, links it to the page owning its parent path, and computes the
//! per-locale fullpaths.
//!
//! ```text
//! index
//! ├── about-us
//! │   ├── about-us/john-doe
//! │   └── about-us/jane-doe
//! └── music
//! 404
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::asset::{rewrite_asset_urls, ContentAsset};
use crate::locale::{Locale, DEFAULT_LOCALE};
use crate::localized::Localized;

/// Fullpath of the root page.
pub const ROOT_FULLPATH: &str = "index";
/// Fullpath of the not-found page, a root that is never anyone's child.
pub const NOT_FOUND_FULLPATH: &str = "404";

// ---------------------------------------------------------------------------
// Editable elements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditableKind {
    #[default]
    Text,
    File,
    Control,
}

/// A content block of a page, addressed by `(block, slug)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableElement {
    pub block: String,
    pub slug: String,
    pub kind: EditableKind,
    pub content: Localized<String>,
}

impl EditableElement {
    /// Content under the current locale.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Records (builder input)
// ---------------------------------------------------------------------------

/// One locale's view of a page as delivered by a source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTranslation {
    pub title: Option<String>,
    pub slug: Option<String>,
    /// Explicit localized fullpath; computed from the parent when absent.
    pub fullpath: Option<String>,
    pub source: Option<String>,
    pub editable_elements: Vec<EditableRecord>,
}

/// One editable element value in one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableRecord {
    pub block: String,
    pub slug: String,
    pub kind: EditableKind,
    pub content: String,
}

/// A flat page record keyed by its locale-invariant fullpath.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRecord {
    pub fullpath: String,
    pub handle: Option<String>,
    /// Slug of the content type this page templates, if any.
    pub content_type: Option<String>,
    pub position: Option<i64>,
    pub published: Option<bool>,
    pub listed: Option<bool>,
    pub translations: IndexMap<Locale, PageTranslation>,
}

impl PageRecord {
    pub fn new(fullpath: impl Into<String>) -> Self {
        Self {
            fullpath: fullpath.into(),
            ..Self::default()
        }
    }

    /// Add (or replace) the translation for `locale`.
    pub fn translation(mut self, locale: impl Into<Locale>, translation: PageTranslation) -> Self {
        self.translations.insert(locale.into(), translation);
        self
    }

    fn merge(&mut self, other: PageRecord) {
        self.handle = self.handle.take().or(other.handle);
        self.content_type = self.content_type.take().or(other.content_type);
        self.position = self.position.or(other.position);
        self.published = self.published.or(other.published);
        self.listed = self.listed.or(other.listed);
        self.translations.extend(other.translations);
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// A node of the page tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Locale-invariant fullpath; the key the page is registered under.
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    pub published: bool,
    pub listed: bool,
    pub title: Localized<String>,
    pub slug: Localized<String>,
    pub fullpath: Localized<String>,
    pub source: Localized<String>,
    pub editable_elements: Vec<EditableElement>,
    parent: Option<String>,
    children: Vec<String>,
}

impl Page {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Title under the current locale.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Fullpath under the current locale; `None` when the page does not exist
    /// in that locale.
    pub fn fullpath(&self) -> Option<&str> {
        self.fullpath.as_deref()
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_root(&self) -> bool {
        is_root_fullpath(&self.key)
    }

    /// Number of path segments below the root (`index` and `404` are 0).
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.key.split('/').count()
        }
    }

    pub fn parent_key(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn child_keys(&self) -> &[String] {
        &self.children
    }

    pub fn find_editable_element(&self, block: &str, slug: &str) -> Option<&EditableElement> {
        self.editable_elements
            .iter()
            .find(|element| element.block == block && element.slug == slug)
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// Pages keyed by locale-invariant fullpath, linked parent to children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTree {
    pages: IndexMap<String, Page>,
}

impl PageTree {
    pub fn get(&self, key: &str) -> Option<&Page> {
        self.pages.get(key)
    }

    /// The `index` page.
    pub fn root(&self) -> Option<&Page> {
        self.get(ROOT_FULLPATH)
    }

    /// Children of `page` in declaration order.
    pub fn children<'a>(&'a self, page: &'a Page) -> impl Iterator<Item = &'a Page> + 'a {
        page.children.iter().filter_map(|key| self.pages.get(key))
    }

    pub fn parent(&self, page: &Page) -> Option<&Page> {
        page.parent.as_deref().and_then(|key| self.get(key))
    }

    /// Non-root pages whose parent path has no page.
    pub fn orphans(&self) -> impl Iterator<Item = &Page> {
        self.pages
            .values()
            .filter(|page| !page.is_root() && page.parent.is_none())
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Page)> {
        self.pages.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.pages.keys()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builds a [`PageTree`] from flat page records.
#[derive(Debug, Clone)]
pub struct PageTreeBuilder {
    default_locale: Locale,
    records: IndexMap<String, PageRecord>,
}

impl PageTreeBuilder {
    /// `locales` are the site locales; the first one is the default.
    pub fn new(locales: &[Locale]) -> Self {
        Self {
            default_locale: locales.first().cloned().unwrap_or_else(|| Locale::from(DEFAULT_LOCALE)),
            records: IndexMap::new(),
        }
    }

    /// Add a record. A record for an already pushed fullpath is merged into
    /// it and keeps the first position.
    pub fn push(&mut self, record: PageRecord) -> &mut Self {
        let key = normalize_fullpath(&record.fullpath);
        match self.records.get_mut(&key) {
            Some(existing) => existing.merge(record),
            None => {
                self.records.insert(key, record);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Link the pages and compute localized fullpaths.
    ///
    /// Siblings keep push order. A page without a parent page is kept and
    /// reported through [`PageTree::orphans`].
    pub fn build(self, assets: &IndexMap<String, ContentAsset>) -> PageTree {
        let default_locale = self.default_locale;
        let mut pages: IndexMap<String, Page> = IndexMap::with_capacity(self.records.len());
        let mut translations: IndexMap<String, IndexMap<Locale, PageTranslation>> = IndexMap::new();

        for (key, record) in self.records {
            let page = new_page(&key, &record, &default_locale, assets);
            translations.insert(key.clone(), record.translations);
            pages.insert(key, page);
        }

        // Parent/children links, in record order.
        let keys: Vec<String> = pages.keys().cloned().collect();
        for key in &keys {
            if is_root_fullpath(key) {
                continue;
            }
            let parent_key = parent_fullpath(key);
            match pages.get_mut(&parent_key) {
                Some(parent) => parent.children.push(key.clone()),
                None => {
                    tracing::warn!("page '{key}' has no parent page '{parent_key}'");
                    continue;
                }
            }
            if let Some(page) = pages.get_mut(key) {
                page.parent = Some(parent_key);
            }
        }

        // Localized fullpaths, parents before children.
        let mut ordered = keys;
        ordered.sort_by_key(|key| if is_root_fullpath(key) { 0 } else { key.split('/').count() });
        for key in &ordered {
            let Some(page_translations) = translations.get(key) else { continue };
            for (locale, translation) in page_translations {
                let fullpath = localized_fullpath(&pages, key, locale, translation, &default_locale);
                if let (Some(fullpath), Some(page)) = (fullpath, pages.get_mut(key)) {
                    page.fullpath.set_in(locale.clone(), fullpath);
                }
            }
        }
        // Untranslated records still answer their key in the default locale;
        // records translated only in other locales do not.
        for (key, page) in pages.iter_mut() {
            let foreign_only = translations
                .get(key)
                .is_some_and(|t| !t.is_empty() && !t.contains_key(&default_locale));
            if !foreign_only && !page.fullpath.is_translated_in(&default_locale) {
                page.fullpath.set_in(default_locale.clone(), page.key.clone());
            }
        }

        PageTree { pages }
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn new_page(
    key: &str,
    record: &PageRecord,
    default_locale: &Locale,
    assets: &IndexMap<String, ContentAsset>,
) -> Page {
    let mut page = Page {
        key: key.to_string(),
        handle: record.handle.clone(),
        content_type: record.content_type.clone(),
        position: record.position,
        published: record.published.unwrap_or(true),
        listed: record.listed.unwrap_or(true),
        title: Localized::new(),
        slug: Localized::new(),
        fullpath: Localized::new(),
        source: Localized::new(),
        editable_elements: Vec::new(),
        parent: None,
        children: Vec::new(),
    };

    let base_slug = key.rsplit('/').next().unwrap_or(key).to_string();
    for (locale, translation) in &record.translations {
        if let Some(title) = &translation.title {
            page.title.set_in(locale.clone(), title.clone());
        }
        // A translation without its own slug reuses the base one.
        let slug = translation.slug.clone().unwrap_or_else(|| base_slug.clone());
        page.slug.set_in(locale.clone(), slug);
        if let Some(source) = &translation.source {
            page.source.set_in(locale.clone(), source.clone());
        }
        for record in &translation.editable_elements {
            let content = rewrite_asset_urls(&record.content, assets);
            match page
                .editable_elements
                .iter_mut()
                .find(|e| e.block == record.block && e.slug == record.slug)
            {
                Some(element) => element.content.set_in(locale.clone(), content),
                None => page.editable_elements.push(EditableElement {
                    block: record.block.clone(),
                    slug: record.slug.clone(),
                    kind: record.kind,
                    content: Localized::with(locale.clone(), content),
                }),
            }
        }
    }
    if !page.slug.is_translated_in(default_locale) {
        page.slug.set_in(default_locale.clone(), base_slug);
    }
    page
}

fn localized_fullpath(
    pages: &IndexMap<String, Page>,
    key: &str,
    locale: &Locale,
    translation: &PageTranslation,
    default_locale: &Locale,
) -> Option<String> {
    if let Some(fullpath) = &translation.fullpath {
        return Some(normalize_fullpath(fullpath));
    }
    if locale == default_locale || is_root_fullpath(key) {
        return Some(key.to_string());
    }
    let page = pages.get(key)?;
    let slug = page.slug.get_in(locale)?;
    let parent = pages.get(page.parent.as_deref()?)?;
    if parent.key == ROOT_FULLPATH {
        Some(slug.clone())
    } else {
        let parent_fullpath = parent.fullpath.get_in(locale)?;
        Some(format!("{parent_fullpath}/{slug}"))
    }
}

fn is_root_fullpath(fullpath: &str) -> bool {
    fullpath == ROOT_FULLPATH || fullpath == NOT_FOUND_FULLPATH
}

/// Fullpath minus its last segment; top-level pages belong to `index`.
pub fn parent_fullpath(fullpath: &str) -> String {
    match fullpath.rsplit_once('/') {
        Some((parent, _)) if !parent.is_empty() => parent.to_string(),
        _ => ROOT_FULLPATH.to_string(),
    }
}

fn normalize_fullpath(fullpath: &str) -> String {
    let trimmed = fullpath.trim_matches('/');
    if trimmed.is_empty() {
        ROOT_FULLPATH.to_string()
    } else {
        trimmed.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> PageTranslation {
        PageTranslation {
            title: Some(title.to_string()),
            ..PageTranslation::default()
        }
    }

    #[test]
    fn parent_of_top_level_is_index() {
        assert_eq!(parent_fullpath("about-us"), "index");
        assert_eq!(parent_fullpath("about-us/john-doe"), "about-us");
        assert_eq!(parent_fullpath("a/b/c"), "a/b");
    }

    #[test]
    fn not_found_page_is_not_a_child() {
        let mut builder = PageTreeBuilder::new(&[Locale::from("en")]);
        builder
            .push(PageRecord::new("index").translation("en", titled("Home")))
            .push(PageRecord::new("404").translation("en", titled("Not found")));
        let tree = builder.build(&IndexMap::new());
        let root = tree.root().expect("root");
        assert_eq!(tree.children(root).count(), 0);
        assert_eq!(tree.orphans().count(), 0);
    }

    #[test]
    fn missing_parent_yields_orphan() {
        let mut builder = PageTreeBuilder::new(&[Locale::from("en")]);
        builder
            .push(PageRecord::new("index"))
            .push(PageRecord::new("songs/template"));
        let tree = builder.build(&IndexMap::new());
        let orphans: Vec<_> = tree.orphans().map(Page::key).collect();
        assert_eq!(orphans, ["songs/template"]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn duplicate_records_are_merged() {
        let mut builder = PageTreeBuilder::new(&[Locale::from("en"), Locale::from("fr")]);
        builder
            .push(PageRecord::new("index").translation("en", titled("Home")))
            .push(PageRecord::new("/index/").translation("fr", titled("Accueil")));
        let tree = builder.build(&IndexMap::new());
        assert_eq!(tree.len(), 1);
        let root = tree.root().expect("root");
        assert_eq!(root.title.get_in(&Locale::from("fr")).map(String::as_str), Some("Accueil"));
    }

    #[test]
    fn editable_elements_merge_across_locales() {
        let element = |content: &str| EditableRecord {
            block: "banner".to_string(),
            slug: "pitch".to_string(),
            kind: EditableKind::Text,
            content: content.to_string(),
        };
        let mut builder = PageTreeBuilder::new(&[Locale::from("en"), Locale::from("fr")]);
        builder.push(
            PageRecord::new("about-us")
                .translation("en", PageTranslation { editable_elements: vec![element("EN")], ..Default::default() })
                .translation("fr", PageTranslation { editable_elements: vec![element("FR")], ..Default::default() }),
        );
        let tree = builder.build(&IndexMap::new());
        let page = tree.get("about-us").expect("page");
        assert_eq!(page.editable_elements.len(), 1);
        let found = page.find_editable_element("banner", "pitch").expect("element");
        assert_eq!(found.content.get_in(&Locale::from("fr")).map(String::as_str), Some("FR"));
        assert!(page.find_editable_element("banner", "nope").is_none());
    }
}
