//! `data/<content type slug>.yml`.
//!
//! Each file is a list of entries, either keyed by their label
//!
//! ```yaml
//! - "Avogadro's Number":
//!     date: 2012/06/11
//!     city: Fort Collins
//! ```
//!
//! or given as plain attribute maps. A localized field may hold one value
//! per locale (`{ en: .., fr: .. }`). Relationship fields name their targets
//! by slug and apply to every locale the entry is written in.
//!
//! Entries are identified by `<content type>/<slug>`; a slug already used in
//! the same file gets a numeric suffix (`avogadro-s-number-1`).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use mounter_core::{
    build_entry, filter_attributes, with_locale, ContentType, FieldKind, Locale, RawRecord,
    ResourceKind,
};

use super::read_yaml;
use crate::error::ReaderError;
use crate::reader::{ReadContext, ResourceReader};

const DATA_DIR: &str = "data";

pub(crate) struct ContentEntriesReader {
    root: PathBuf,
}

impl ContentEntriesReader {
    pub(crate) fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }
}

impl ResourceReader for ContentEntriesReader {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ContentEntries
    }

    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        let locales = ctx.mounting_point.locales();
        let default_locale = ctx.mounting_point.default_locale();
        let assets = ctx.mounting_point.asset_map();
        let content_types: Vec<ContentType> = ctx
            .mounting_point
            .content_types()
            .map(|types| types.values().cloned().collect())
            .unwrap_or_default();

        for content_type in &content_types {
            let path = self.root.join(DATA_DIR).join(format!("{}.yml", content_type.slug));
            if !path.is_file() {
                tracing::debug!("no data for content type '{}'", content_type.slug);
                continue;
            }
            let items = match read_yaml::<Value>(&path)? {
                Value::Array(items) => items,
                Value::Null => continue,
                _ => {
                    tracing::warn!("{}: expected a list of entries", path.display());
                    continue;
                }
            };

            let mut used_slugs = HashSet::new();
            for (index, item) in items.into_iter().enumerate() {
                let Some(mut records) = split_item(content_type, item, &locales, &default_locale) else {
                    tracing::warn!("{}: entry #{index} is not a map", path.display());
                    continue;
                };
                let mut raw = records.shift_remove(&default_locale).unwrap_or_default();
                raw.entry("_position").or_insert_with(|| Value::from(index as i64));
                if let Some(slug) = raw.get("_slug").and_then(Value::as_str).map(str::to_string) {
                    let unique = unique_slug(&slug, &used_slugs);
                    if unique != slug {
                        tracing::debug!("{}: slug '{slug}' already taken, using '{unique}'", path.display());
                    }
                    used_slugs.insert(unique.clone());
                    raw.insert("_slug".to_string(), Value::String(unique));
                }

                let built = with_locale(default_locale.clone(), || {
                    build_entry(content_type, &raw, &assets, ctx.relationships)
                });
                let Some(mut entry) = built else { continue };

                for (locale, mut raw) in records {
                    raw.insert("_id".to_string(), Value::String(entry.id.0.clone()));
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

/// Turn one data item into a raw record per locale, default locale included.
fn split_item(
    content_type: &ContentType,
    item: Value,
    locales: &[Locale],
    default_locale: &Locale,
) -> Option<IndexMap<Locale, RawRecord>> {
    let Value::Object(map) = item else { return None };

    // `{ "<label>": { attributes } }`, unless the single key is a field
    let label_keyed = map.len() == 1
        && map
            .iter()
            .next()
            .is_some_and(|(key, value)| value.is_object() && content_type.field(key).is_none());
    let (label, attributes) = if label_keyed {
        match map.into_iter().next() {
            Some((label, Value::Object(attributes))) => (Some(label), attributes),
            _ => return None,
        }
    } else {
        (None, map)
    };

    let mut records: IndexMap<Locale, RawRecord> = IndexMap::new();
    records.insert(default_locale.clone(), RawRecord::new());
    let mut relationships: Vec<(String, Value)> = Vec::new();

    if let (Some(label), Some(field)) = (label, content_type.label_field()) {
        records[default_locale].insert(field.name.clone(), Value::String(label));
    }

    for (name, value) in attributes {
        let field = content_type.field(&name);
        match (field, value) {
            (Some(field), value) if field.is_relationship() => {
                let Some(key) = field.target_key_name() else { continue };
                let target = |slug: &Value| -> Option<Value> {
                    let slug = slug.as_str()?;
                    Some(Value::String(match &field.class_name {
                        Some(class_name) => format!("{class_name}/{slug}"),
                        None => slug.to_string(),
                    }))
                };
                let ids = match (field.kind, &value) {
                    (FieldKind::ManyToMany, Value::Array(slugs)) => {
                        Value::Array(slugs.iter().filter_map(target).collect())
                    }
                    (FieldKind::ManyToMany, single) => Value::Array(target(single).into_iter().collect()),
                    (_, single) => target(single).unwrap_or(Value::Null),
                };
                relationships.push((key, ids));
            }
            (Some(field), Value::Object(per_locale))
                if field.localized && is_per_locale(&per_locale, locales) =>
            {
                for (locale, value) in per_locale {
                    records
                        .entry(Locale::from(locale))
                        .or_default()
                        .insert(name.clone(), value);
                }
            }
            (_, value) => {
                records[default_locale].insert(name, value);
            }
        }
    }

    for record in records.values_mut() {
        record.extend(relationships.iter().cloned());
    }

    // Slugs default to the slugified label, per locale.
    if let Some(field) = content_type.label_field() {
        for record in records.values_mut() {
            if record.contains_key("_slug") {
                continue;
            }
            if let Some(label) = record.get(&field.name).and_then(Value::as_str) {
                let slug = slug::slugify(label);
                record.insert("_slug".to_string(), Value::String(slug));
            }
        }
    }

    Some(records)
}

/// `slug`, or `slug-<n>` with the smallest `n` not in `used`.
fn unique_slug(slug: &str, used: &HashSet<String>) -> String {
    if !used.contains(slug) {
        return slug.to_string();
    }
    let mut suffix = 1;
    while used.contains(&format!("{slug}-{suffix}")) {
        suffix += 1;
    }
    format!("{slug}-{suffix}")
}

fn is_per_locale(map: &Map<String, Value>, locales: &[Locale]) -> bool {
    !map.is_empty() && map.keys().all(|key| locales.iter().any(|locale| locale.as_str() == key))
}
