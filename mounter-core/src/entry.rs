//! Content entries: schema-driven records with per-locale attributes.

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::fields::ContentType;
use crate::filter::FilteredAttributes;
use crate::locale::{current_locale, Locale};
use crate::localized::Localized;
use crate::mounting_point::MountingPoint;

// ---------------------------------------------------------------------------
// Newtype
// ---------------------------------------------------------------------------

/// Identifier of a content entry, unique within one mount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A typed value of a dynamic entry attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    String(String),
    /// Rich text with asset references already rewritten to local paths.
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
    /// The resolved option label.
    Select(String),
    Reference(EntryId),
    References(Vec<EntryId>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) | FieldValue::Text(s) | FieldValue::Select(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&EntryId> {
        match self {
            FieldValue::Reference(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_references(&self) -> Option<&[EntryId]> {
        match self {
            FieldValue::References(ids) => Some(ids),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A record of a content type. One object holds every locale's values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub id: EntryId,
    /// Slug of the owning content type.
    pub content_type: String,
    pub slug: Localized<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default)]
    pub seo_title: Localized<String>,
    #[serde(default)]
    pub meta_keywords: Localized<String>,
    #[serde(default)]
    pub meta_description: Localized<String>,
    #[serde(default)]
    attributes: IndexMap<String, Localized<FieldValue>>,
}

impl ContentEntry {
    pub fn new(id: impl Into<EntryId>, content_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content_type: content_type.into(),
            slug: Localized::new(),
            position: None,
            seo_title: Localized::new(),
            meta_keywords: Localized::new(),
            meta_description: Localized::new(),
            attributes: IndexMap::new(),
        }
    }

    /// Slug under the current locale.
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    /// Value of `field` under the current locale.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.get_in(field, &current_locale())
    }

    pub fn get_in(&self, field: &str, locale: &Locale) -> Option<&FieldValue> {
        self.attributes.get(field)?.get_in(locale)
    }

    /// Store `value` for `field` under the current locale.
    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.attributes.entry(field.into()).or_default().set(value);
    }

    pub fn set_in(&mut self, field: impl Into<String>, locale: impl Into<Locale>, value: FieldValue) {
        self.attributes.entry(field.into()).or_default().set_in(locale, value);
    }

    /// Label: the value of the content type's label field under the current locale.
    pub fn label<'a>(&'a self, content_type: &ContentType) -> Option<&'a str> {
        let field = content_type.label_field()?;
        self.get(&field.name)?.as_str()
    }

    /// `<content-type-slug>/<slug>` using the slug stored for `locale`.
    pub fn composite_key(&self, locale: &Locale) -> Option<String> {
        self.slug
            .get_in(locale)
            .map(|slug| format!("{}/{}", self.content_type, slug))
    }

    /// Locales in which the entry carries a slug or any attribute.
    pub fn translated_in(&self) -> Vec<Locale> {
        let mut locales: Vec<Locale> = self.slug.locales().cloned().collect();
        for value in self.attributes.values() {
            for locale in value.locales() {
                if !locales.contains(locale) {
                    locales.push(locale.clone());
                }
            }
        }
        locales
    }

    /// Write filtered attributes under the current locale.
    ///
    /// Absent values were already dropped by the filter, so nothing here
    /// overwrites a value with "undefined".
    pub fn assign(&mut self, attributes: FilteredAttributes) {
        let FilteredAttributes {
            id: _,
            slug,
            position,
            seo_title,
            meta_keywords,
            meta_description,
            values,
        } = attributes;

        if let Some(slug) = slug {
            self.slug.set(slug);
        }
        if let Some(position) = position {
            self.position = Some(position);
        }
        if let Some(seo_title) = seo_title {
            self.seo_title.set(seo_title);
        }
        if let Some(meta_keywords) = meta_keywords {
            self.meta_keywords.set(meta_keywords);
        }
        if let Some(meta_description) = meta_description {
            self.meta_description.set(meta_description);
        }
        for (name, value) in values {
            self.set(name, value);
        }
    }

    /// JSON view of the entry under the current locale, attributes in
    /// schema order. References are rendered as composite keys.
    pub fn to_json(&self, content_type: &ContentType, mounting_point: &MountingPoint) -> Value {
        let mut map = Map::new();
        map.insert("_id".to_string(), json!(self.id));
        map.insert("_slug".to_string(), json!(self.slug()));
        map.insert("_label".to_string(), json!(self.label(content_type)));
        if let Some(position) = self.position {
            map.insert("_position".to_string(), json!(position));
        }
        for field in &content_type.fields {
            let Some(value) = self.get(&field.name) else {
                continue;
            };
            let rendered = match value {
                FieldValue::String(s) | FieldValue::Text(s) | FieldValue::Select(s) => json!(s),
                FieldValue::Boolean(b) => json!(b),
                FieldValue::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
                FieldValue::Reference(id) => json!(mounting_point.entry_key(id)),
                FieldValue::References(ids) => {
                    let keys: Vec<&str> =
                        ids.iter().filter_map(|id| mounting_point.entry_key(id)).collect();
                    json!(keys)
                }
            };
            map.insert(field.name.clone(), rendered);
        }
        Value::Object(map)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
