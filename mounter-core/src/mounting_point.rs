//! The mounting point: the aggregate root of one ingestion run.
//!
//! A reader creates an empty [`MountingPoint`], registers resources in
//! dependency order, and hands the finished graph to its caller. After that
//! it is only read.
//!
//! Elements do not point back at their mounting point; lookups that cross
//! resources (an entry's content type, a page's content type, the asset map
//! used to rewrite text) go through the mounting point itself.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::asset::{ContentAsset, ThemeAsset};
use crate::entry::{ContentEntry, EntryId};
use crate::error::CoreError;
use crate::fields::ContentType;
use crate::locale::{Locale, DEFAULT_LOCALE};
use crate::page::{Page, PageTree};
use crate::site::{Site, Snippet};

// ---------------------------------------------------------------------------
// Resource kinds
// ---------------------------------------------------------------------------

/// The closed set of resources a mounting point can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Site,
    Pages,
    ContentTypes,
    ContentEntries,
    Snippets,
    ContentAssets,
    ThemeAssets,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Site,
        ResourceKind::Pages,
        ResourceKind::ContentTypes,
        ResourceKind::ContentEntries,
        ResourceKind::Snippets,
        ResourceKind::ContentAssets,
        ResourceKind::ThemeAssets,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Site => "site",
            ResourceKind::Pages => "pages",
            ResourceKind::ContentTypes => "content_types",
            ResourceKind::ContentEntries => "content_entries",
            ResourceKind::Snippets => "snippets",
            ResourceKind::ContentAssets => "content_assets",
            ResourceKind::ThemeAssets => "theme_assets",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownResource(s.to_string()))
    }
}

/// A borrowed resource collection.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Site(&'a Site),
    Pages(&'a PageTree),
    ContentTypes(&'a IndexMap<String, ContentType>),
    ContentEntries(&'a ContentEntries),
    Snippets(&'a IndexMap<String, Snippet>),
    ContentAssets(&'a IndexMap<String, ContentAsset>),
    ThemeAssets(&'a IndexMap<String, ThemeAsset>),
}

impl Resource<'_> {
    /// Number of elements; the site counts as one.
    pub fn len(&self) -> usize {
        match self {
            Resource::Site(_) => 1,
            Resource::Pages(pages) => pages.len(),
            Resource::ContentTypes(types) => types.len(),
            Resource::ContentEntries(entries) => entries.len(),
            Resource::Snippets(snippets) => snippets.len(),
            Resource::ContentAssets(assets) => assets.len(),
            Resource::ThemeAssets(assets) => assets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Content entries
// ---------------------------------------------------------------------------

/// Entries keyed by composite key, with a secondary index by id.
#[derive(Debug, Clone, Default)]
pub struct ContentEntries {
    entries: IndexMap<String, ContentEntry>,
    ids: HashMap<EntryId, String>,
}

impl ContentEntries {
    /// Entry by composite key `<content-type-slug>/<entry-slug>`.
    pub fn get(&self, key: &str) -> Option<&ContentEntry> {
        self.entries.get(key)
    }

    pub fn by_id(&self, id: &EntryId) -> Option<&ContentEntry> {
        self.ids.get(id).and_then(|key| self.entries.get(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(composite key, entry)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ContentEntry)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &ContentEntry> {
        self.entries.values()
    }
}

// ---------------------------------------------------------------------------
// Mounting point
// ---------------------------------------------------------------------------

/// All resource collections of one ingestion run.
///
/// A collection that was never registered reads back as `None`, which is
/// how partial mounts (a reader populating only some resources) show up.
#[derive(Debug, Clone, Default)]
pub struct MountingPoint {
    site: Option<Site>,
    forced_locales: Option<Vec<Locale>>,
    pages: Option<PageTree>,
    content_types: Option<IndexMap<String, ContentType>>,
    content_entries: Option<ContentEntries>,
    snippets: Option<IndexMap<String, Snippet>>,
    content_assets: Option<IndexMap<String, ContentAsset>>,
    theme_assets: Option<IndexMap<String, ThemeAsset>>,
}

impl MountingPoint {
    pub fn new() -> Self {
        Self::default()
    }

    // -- locales ------------------------------------------------------------

    /// Declared locales: the forced list if any, else the site's.
    pub fn locales(&self) -> Vec<Locale> {
        if let Some(locales) = &self.forced_locales {
            return locales.clone();
        }
        self.site.as_ref().map(|site| site.locales.clone()).unwrap_or_default()
    }

    /// First declared locale, else [`DEFAULT_LOCALE`].
    pub fn default_locale(&self) -> Locale {
        self.locales()
            .into_iter()
            .next()
            .unwrap_or_else(|| Locale::from(DEFAULT_LOCALE))
    }

    /// Override the site's locales for the rest of the run.
    pub fn force_locales(&mut self, locales: Vec<Locale>) {
        if !locales.is_empty() {
            self.forced_locales = Some(locales);
        }
    }

    // -- registration -------------------------------------------------------

    pub fn register_site(&mut self, site: Site) {
        self.site = Some(site);
    }

    /// Mark a collection as registered, even if it stays empty.
    pub fn init_resource(&mut self, kind: ResourceKind) {
        match kind {
            ResourceKind::Site => {}
            ResourceKind::Pages => {
                self.pages.get_or_insert_with(PageTree::default);
            }
            ResourceKind::ContentTypes => {
                self.content_types.get_or_insert_with(IndexMap::new);
            }
            ResourceKind::ContentEntries => {
                self.content_entries.get_or_insert_with(ContentEntries::default);
            }
            ResourceKind::Snippets => {
                self.snippets.get_or_insert_with(IndexMap::new);
            }
            ResourceKind::ContentAssets => {
                self.content_assets.get_or_insert_with(IndexMap::new);
            }
            ResourceKind::ThemeAssets => {
                self.theme_assets.get_or_insert_with(IndexMap::new);
            }
        }
    }

    pub fn register_pages(&mut self, pages: PageTree) {
        self.pages = Some(pages);
    }

    pub fn register_content_type(&mut self, content_type: ContentType) {
        self.content_types
            .get_or_insert_with(IndexMap::new)
            .insert(content_type.slug.clone(), content_type);
    }

    /// Register `entry` under its composite key and its id; returns the key.
    ///
    /// The key uses the default-locale slug, falling back to the id. A slug
    /// already taken by another entry of the same type gets a numeric suffix
    /// (`avogadro-s-number-1`), so every registered id keeps its entry.
    /// Registering an id twice replaces the earlier entry in place.
    pub fn register_entry(&mut self, mut entry: ContentEntry) -> String {
        let default_locale = self.default_locale();
        let entries = self.content_entries.get_or_insert_with(ContentEntries::default);

        if let Some(key) = entries.ids.get(&entry.id).cloned() {
            tracing::warn!("entry {} registered twice; keeping the last one", entry.id);
            entries.entries.insert(key.clone(), entry);
            return key;
        }

        let mut key = entry
            .composite_key(&default_locale)
            .unwrap_or_else(|| format!("{}/{}", entry.content_type, entry.id));
        if entries.entries.contains_key(&key) {
            let mut suffix = 1;
            while entries.entries.contains_key(&format!("{key}-{suffix}")) {
                suffix += 1;
            }
            tracing::debug!("entry key '{key}' taken; using '{key}-{suffix}'");
            if let Some(slug) = entry.slug.get_in(&default_locale).cloned() {
                entry.slug.set_in(default_locale.clone(), format!("{slug}-{suffix}"));
            }
            key = format!("{key}-{suffix}");
        }

        entries.ids.insert(entry.id.clone(), key.clone());
        entries.entries.insert(key.clone(), entry);
        key
    }

    pub fn register_snippet(&mut self, snippet: Snippet) {
        self.snippets
            .get_or_insert_with(IndexMap::new)
            .insert(snippet.slug.clone(), snippet);
    }

    pub fn register_content_asset(&mut self, asset: ContentAsset) {
        self.content_assets
            .get_or_insert_with(IndexMap::new)
            .insert(asset.url.clone(), asset);
    }

    pub fn register_theme_asset(&mut self, asset: ThemeAsset) {
        self.theme_assets
            .get_or_insert_with(IndexMap::new)
            .insert(asset.key(), asset);
    }

    // -- keyed access ---------------------------------------------------------

    /// The collection registered for `kind`, if any.
    pub fn resource(&self, kind: ResourceKind) -> Option<Resource<'_>> {
        match kind {
            ResourceKind::Site => self.site.as_ref().map(Resource::Site),
            ResourceKind::Pages => self.pages.as_ref().map(Resource::Pages),
            ResourceKind::ContentTypes => self.content_types.as_ref().map(Resource::ContentTypes),
            ResourceKind::ContentEntries => {
                self.content_entries.as_ref().map(Resource::ContentEntries)
            }
            ResourceKind::Snippets => self.snippets.as_ref().map(Resource::Snippets),
            ResourceKind::ContentAssets => self.content_assets.as_ref().map(Resource::ContentAssets),
            ResourceKind::ThemeAssets => self.theme_assets.as_ref().map(Resource::ThemeAssets),
        }
    }

    /// Like [`resource`](Self::resource) by symbolic name; unknown names are `None`.
    pub fn resource_named(&self, name: &str) -> Option<Resource<'_>> {
        name.parse().ok().and_then(|kind| self.resource(kind))
    }

    /// Kinds holding a registered collection.
    pub fn registered(&self) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(|kind| self.resource(*kind).is_some())
            .collect()
    }

    // -- typed access ---------------------------------------------------------

    pub fn site(&self) -> Option<&Site> {
        self.site.as_ref()
    }

    pub fn pages(&self) -> Option<&PageTree> {
        self.pages.as_ref()
    }

    pub fn page(&self, key: &str) -> Option<&Page> {
        self.pages.as_ref()?.get(key)
    }

    pub fn content_types(&self) -> Option<&IndexMap<String, ContentType>> {
        self.content_types.as_ref()
    }

    pub fn content_type(&self, slug: &str) -> Option<&ContentType> {
        self.content_types.as_ref()?.get(slug)
    }

    pub fn content_entries(&self) -> Option<&ContentEntries> {
        self.content_entries.as_ref()
    }

    pub fn entries_len(&self) -> usize {
        self.content_entries.as_ref().map_or(0, ContentEntries::len)
    }

    /// Entry by composite key.
    pub fn entry(&self, key: &str) -> Option<&ContentEntry> {
        self.content_entries.as_ref()?.get(key)
    }

    pub fn entry_by_id(&self, id: &EntryId) -> Option<&ContentEntry> {
        self.content_entries.as_ref()?.by_id(id)
    }

    pub fn entry_by_id_mut(&mut self, id: &EntryId) -> Option<&mut ContentEntry> {
        let entries = self.content_entries.as_mut()?;
        let key = entries.ids.get(id)?;
        entries.entries.get_mut(key)
    }

    /// Composite key of the entry with `id`.
    pub fn entry_key(&self, id: &EntryId) -> Option<&str> {
        self.content_entries.as_ref()?.ids.get(id).map(String::as_str)
    }

    /// Entries of one content type, in registration order.
    pub fn entries_of<'a>(&'a self, content_type: &'a str) -> impl Iterator<Item = &'a ContentEntry> + 'a {
        self.content_entries
            .iter()
            .flat_map(|entries| entries.values())
            .filter(move |entry| entry.content_type == content_type)
    }

    pub fn entry_content_type(&self, entry: &ContentEntry) -> Option<&ContentType> {
        self.content_type(&entry.content_type)
    }

    pub fn page_content_type(&self, page: &Page) -> Option<&ContentType> {
        self.content_type(page.content_type.as_deref()?)
    }

    pub fn snippets(&self) -> Option<&IndexMap<String, Snippet>> {
        self.snippets.as_ref()
    }

    pub fn snippet(&self, slug: &str) -> Option<&Snippet> {
        self.snippets.as_ref()?.get(slug)
    }

    pub fn content_assets(&self) -> Option<&IndexMap<String, ContentAsset>> {
        self.content_assets.as_ref()
    }

    /// Content assets, or an empty map when none are registered.
    pub fn asset_map(&self) -> IndexMap<String, ContentAsset> {
        self.content_assets.clone().unwrap_or_default()
    }

    pub fn theme_assets(&self) -> Option<&IndexMap<String, ThemeAsset>> {
        self.theme_assets.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
