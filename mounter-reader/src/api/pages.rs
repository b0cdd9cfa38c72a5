//! Pages, listed once per locale and merged by id.
//!
//! The default-locale listing gives every page its locale-invariant
//! fullpath; other listings contribute translations, with the fullpath the
//! API computed for that locale.

use std::collections::HashMap;

use serde_json::Value;

use mounter_core::{EditableKind, EditableRecord, PageRecord, PageTranslation, PageTreeBuilder, ResourceKind};

use super::{fetch_list, string_at, translated_in, ApiClient};
use crate::error::ReaderError;
use crate::reader::{ReadContext, ResourceReader};

pub(crate) struct PagesReader<'c> {
    client: &'c dyn ApiClient,
}

impl<'c> PagesReader<'c> {
    pub(crate) fn new(client: &'c dyn ApiClient) -> Self {
        Self { client }
    }
}

impl ResourceReader for PagesReader<'_> {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Pages
    }

    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        let locales = ctx.mounting_point.locales();
        let default_locale = ctx.mounting_point.default_locale();
        let mut builder = PageTreeBuilder::new(&locales);
        // page id -> locale-invariant fullpath
        let mut keys: HashMap<String, String> = HashMap::new();

        let mut ordered = vec![default_locale.clone()];
        ordered.extend(locales.into_iter().filter(|locale| *locale != default_locale));

        for locale in ordered {
            let is_default = locale == default_locale;

            for raw in fetch_list(self.client, "pages", Some(&locale))? {
                if translated_in(&raw).is_some_and(|locales| !locales.contains(&locale)) {
                    continue;
                }
                let Some(fullpath) = string_at(&raw, &["fullpath"]) else {
                    tracing::warn!("page without fullpath skipped ({locale})");
                    continue;
                };
                let id = string_at(&raw, &["_id", "id"]).unwrap_or_else(|| fullpath.clone());
                let key = match keys.get(&id) {
                    Some(key) => key.clone(),
                    None => {
                        if !is_default {
                            tracing::debug!("page '{fullpath}' only exists in {locale}");
                        }
                        keys.insert(id, fullpath.clone());
                        fullpath.clone()
                    }
                };

                let mut translation = translation_of(&raw);
                if !is_default {
                    translation.fullpath = Some(fullpath);
                }

                let mut record = PageRecord::new(key).translation(locale.clone(), translation);
                record.handle = string_at(&raw, &["handle"]);
                record.content_type = string_at(&raw, &["content_type", "target_klass_slug"]);
                record.position = raw.get("position").and_then(Value::as_i64);
                record.published = raw.get("published").and_then(Value::as_bool);
                record.listed = raw.get("listed").and_then(Value::as_bool);
                builder.push(record);
            }
        }

        let pages = builder.build(&ctx.mounting_point.asset_map());
        ctx.mounting_point.register_pages(pages);
        Ok(())
    }
}

fn translation_of(raw: &Value) -> PageTranslation {
    PageTranslation {
        title: string_at(raw, &["title"]),
        slug: string_at(raw, &["slug"]),
        fullpath: None,
        source: string_at(raw, &["raw_template", "template"]),
        editable_elements: raw
            .get("editable_elements")
            .and_then(Value::as_array)
            .map(|elements| elements.iter().filter_map(editable_record).collect())
            .unwrap_or_default(),
    }
}

fn editable_record(raw: &Value) -> Option<EditableRecord> {
    let block = string_at(raw, &["block"]).unwrap_or_default();
    let slug = string_at(raw, &["slug"])?;
    let kind = match string_at(raw, &["type", "kind"]).as_deref() {
        Some("EditableFile" | "file") => EditableKind::File,
        Some("EditableControl" | "control") => EditableKind::Control,
        _ => EditableKind::Text,
    };
    Some(EditableRecord {
        block,
        slug,
        kind,
        content: string_at(raw, &["content", "source"]).unwrap_or_default(),
    })
}
