use indexmap::IndexMap;

use mounter_core::{ResourceKind, Snippet};

use super::{fetch_list, string_at, translated_in, ApiClient};
use crate::error::ReaderError;
use crate::reader::{ReadContext, ResourceReader};

pub(crate) struct SnippetsReader<'c> {
    client: &'c dyn ApiClient,
}

impl<'c> SnippetsReader<'c> {
    pub(crate) fn new(client: &'c dyn ApiClient) -> Self {
        Self { client }
    }
}

impl ResourceReader for SnippetsReader<'_> {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Snippets
    }

    /// Snippets are listed once per locale and merged by slug.
    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        let mut snippets: IndexMap<String, Snippet> = IndexMap::new();

        for locale in ctx.mounting_point.locales() {
            for raw in fetch_list(self.client, "snippets", Some(&locale))? {
                if translated_in(&raw).is_some_and(|locales| !locales.contains(&locale)) {
                    continue;
                }
                let Some(slug) = string_at(&raw, &["slug"]) else {
                    tracing::warn!("snippet without slug skipped");
                    continue;
                };
                let snippet = snippets.entry(slug.clone()).or_insert_with(|| Snippet::new(slug));
                if let Some(name) = string_at(&raw, &["name"]) {
                    snippet.name = name;
                }
                if let Some(source) = string_at(&raw, &["template", "source"]) {
                    snippet.source.set_in(locale.clone(), source);
                }
            }
        }

        for snippet in snippets.into_values() {
            ctx.mounting_point.register_snippet(snippet);
        }
        Ok(())
    }
}
