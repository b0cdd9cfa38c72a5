//! Entries of every registered content type, with their translations.
//!
//! The list endpoint returns each entry in the default locale along with
//! the locales it is `translated_in`; every translation is then fetched on
//! its own and filtered under that locale onto the same entry.

use serde_json::Value;

use mounter_core::{build_entry, filter_attributes, with_locale, ContentType, ResourceKind};

use super::{fetch_list, translated_in, ApiClient};
use crate::error::ReaderError;
use crate::reader::{ReadContext, ResourceReader};

pub(crate) struct ContentEntriesReader<'c> {
    client: &'c dyn ApiClient,
}

impl<'c> ContentEntriesReader<'c> {
    pub(crate) fn new(client: &'c dyn ApiClient) -> Self {
        Self { client }
    }
}

impl ResourceReader for ContentEntriesReader<'_> {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ContentEntries
    }

    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        let default_locale = ctx.mounting_point.default_locale();
        let assets = ctx.mounting_point.asset_map();
        let content_types: Vec<ContentType> = ctx
            .mounting_point
            .content_types()
            .map(|types| types.values().cloned().collect())
            .unwrap_or_default();

        for content_type in &content_types {
            let resource = format!("content_types/{}/entries", content_type.slug);

            for item in fetch_list(self.client, &resource, None)? {
                let locales = translated_in(&item).unwrap_or_default();
                let Value::Object(raw) = item else {
                    tracing::warn!("{resource}: skipping a non-object entry");
                    continue;
                };

                let built = with_locale(default_locale.clone(), || {
                    build_entry(content_type, &raw, &assets, ctx.relationships)
                });
                let Some(mut entry) = built else { continue };

                for locale in locales.into_iter().filter(|locale| *locale != default_locale) {
                    let translation = self
                        .client
                        .get(&format!("{resource}/{}", entry.id), Some(&locale))?;
                    let Value::Object(raw) = translation else {
                        tracing::warn!("{resource}/{}: translation in {locale} is not an object", entry.id);
                        continue;
                    };
                    with_locale(locale, || {
                        let attributes = filter_attributes(content_type, &raw, &assets, ctx.relationships);
                        entry.assign(attributes);
                    });
                }

                ctx.mounting_point.register_entry(entry);
            }
        }
        Ok(())
    }
}
