//! Content type schema: typed fields and their selection rules.
//!
//! Content types decode from two shapes:
//! - API JSON: `fields: [{ name: place, type: string, ... }]`
//! - file-system YAML: `fields: [{ place: { type: string, ... } }]`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::locale::{current_locale, Locale};
use crate::localized::Localized;

// ---------------------------------------------------------------------------
// Field kinds
// ---------------------------------------------------------------------------

/// The type of a content type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Text,
    Boolean,
    Date,
    Select,
    BelongsTo,
    ManyToMany,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Text => "text",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Select => "select",
            FieldKind::BelongsTo => "belongs_to",
            FieldKind::ManyToMany => "many_to_many",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(FieldKind::String),
            "text" => Ok(FieldKind::Text),
            "boolean" => Ok(FieldKind::Boolean),
            "date" => Ok(FieldKind::Date),
            "select" => Ok(FieldKind::Select),
            "belongs_to" => Ok(FieldKind::BelongsTo),
            "many_to_many" => Ok(FieldKind::ManyToMany),
            other => Err(CoreError::UnknownFieldKind {
                field: String::new(),
                kind: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// One option of a `select` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Raw key as sent by a source (API option id, or the default-locale name).
    pub key: String,
    pub name: Localized<String>,
}

/// A typed field declared by a content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_localized")]
    pub localized: bool,
    /// Slug of the target content type for relationship fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub select_options: Vec<SelectOption>,
}

fn default_localized() -> bool {
    true
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
            hint: None,
            required: false,
            localized: true,
            class_name: None,
            select_options: Vec::new(),
        }
    }

    pub fn is_relationship(&self) -> bool {
        matches!(self.kind, FieldKind::BelongsTo | FieldKind::ManyToMany)
    }

    /// Raw attribute carrying the target id(s) of a relationship field.
    pub fn target_key_name(&self) -> Option<String> {
        match self.kind {
            FieldKind::BelongsTo => Some(format!("{}_id", self.name)),
            FieldKind::ManyToMany => Some(format!("{}_ids", self.name)),
            _ => None,
        }
    }

    /// Label of the select option matching `raw`, in the current locale.
    ///
    /// `raw` may be the option key or its name in any locale.
    pub fn name_for_select_option(&self, raw: &str) -> Option<String> {
        let option = self.select_options.iter().find(|option| {
            option.key == raw || option.name.iter().any(|(_, name)| name == raw)
        })?;
        option.name.get_in(&current_locale()).cloned()
    }
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

/// A user-defined schema for content entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentType {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    /// Declaration order is significant: it is the entry attribute order.
    pub fields: Vec<Field>,
}

impl ContentType {
    pub fn new(slug: impl Into<String>, name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            description: None,
            label_field_name: None,
            order_by: None,
            fields,
        }
    }

    /// Field named `name`; `None` means "skip this attribute".
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }

    /// The field used as entry label: the declared one, else the first string field.
    pub fn label_field(&self) -> Option<&Field> {
        self.label_field_name
            .as_deref()
            .and_then(|name| self.field(name))
            .or_else(|| self.fields.iter().find(|f| f.kind == FieldKind::String))
    }

    /// Decode a content type from an API payload.
    pub fn from_api(value: &Value, default_locale: &Locale) -> Result<Self, CoreError> {
        let def: ContentTypeDef = serde_json::from_value(value.clone())?;
        def.into_content_type(None, default_locale)
    }

    /// Decode a content type from a file-system YAML definition.
    ///
    /// `fallback_slug` (usually the file stem) is used when the file omits `slug`.
    pub fn from_yaml(
        source: &str,
        fallback_slug: &str,
        default_locale: &Locale,
    ) -> Result<Self, CoreError> {
        let value: Value = serde_yaml::from_str(source)?;
        let def: ContentTypeDef = serde_json::from_value(value)?;
        def.into_content_type(Some(fallback_slug), default_locale)
    }
}

// ---------------------------------------------------------------------------
// Wire definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ContentTypeDef {
    slug: Option<String>,
    name: Option<String>,
    description: Option<String>,
    label_field_name: Option<String>,
    order_by: Option<String>,
    #[serde(default)]
    fields: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct FieldDef {
    name: Option<String>,
    #[serde(rename = "type", alias = "kind")]
    kind: String,
    label: Option<String>,
    hint: Option<String>,
    #[serde(default)]
    required: bool,
    localized: Option<bool>,
    #[serde(alias = "class_slug", alias = "target")]
    class_name: Option<String>,
    #[serde(default)]
    select_options: Value,
}

impl ContentTypeDef {
    fn into_content_type(
        self,
        fallback_slug: Option<&str>,
        default_locale: &Locale,
    ) -> Result<ContentType, CoreError> {
        let slug = self
            .slug
            .or_else(|| fallback_slug.map(str::to_string))
            .ok_or_else(|| CoreError::InvalidContentType {
                slug: String::new(),
                message: "missing slug".to_string(),
            })?;

        let mut fields = Vec::with_capacity(self.fields.len());
        for raw in self.fields {
            fields.push(decode_field(&slug, raw, default_locale)?);
        }

        Ok(ContentType {
            name: self.name.unwrap_or_else(|| slug.clone()),
            slug,
            description: self.description,
            label_field_name: self.label_field_name,
            order_by: self.order_by,
            fields,
        })
    }
}

fn decode_field(slug: &str, raw: Value, default_locale: &Locale) -> Result<Field, CoreError> {
    // `{ name: .., type: .. }` or `{ <name>: { type: .. } }`
    let named = matches!(&raw, Value::Object(map)
        if map.get("name").is_some_and(Value::is_string) || map.get("type").is_some_and(Value::is_string));
    let (name, def) = match raw {
        Value::Object(_) if named => {
            let def: FieldDef = serde_json::from_value(raw)?;
            let name = def.name.clone().ok_or_else(|| CoreError::InvalidContentType {
                slug: slug.to_string(),
                message: "field without a name".to_string(),
            })?;
            (name, def)
        }
        Value::Object(map) if map.len() == 1 => {
            let (name, inner) = map.into_iter().next().ok_or_else(|| CoreError::InvalidContentType {
                slug: slug.to_string(),
                message: "empty field definition".to_string(),
            })?;
            (name, serde_json::from_value::<FieldDef>(inner)?)
        }
        other => {
            return Err(CoreError::InvalidContentType {
                slug: slug.to_string(),
                message: format!("unsupported field definition: {other}"),
            })
        }
    };

    let kind = def.kind.parse::<FieldKind>().map_err(|_| CoreError::UnknownFieldKind {
        field: name.clone(),
        kind: def.kind.clone(),
    })?;

    Ok(Field {
        name,
        kind,
        label: def.label,
        hint: def.hint,
        required: def.required,
        localized: def.localized.unwrap_or(true),
        class_name: def.class_name,
        select_options: decode_select_options(&def.select_options, default_locale),
    })
}

/// Accepts `[name, ..]`, `[{ id, name }, ..]` (name plain or per-locale) and
/// `{ <locale>: [name, ..] }` (options zipped by index).
fn decode_select_options(raw: &Value, default_locale: &Locale) -> Vec<SelectOption> {
    match raw {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(SelectOption {
                    key: name.clone(),
                    name: Localized::with(default_locale.clone(), name.clone()),
                }),
                Value::Object(map) => {
                    let name = match map.get("name") {
                        Some(Value::String(name)) => {
                            Localized::with(default_locale.clone(), name.clone())
                        }
                        Some(Value::Object(per_locale)) => {
                            let mut name = Localized::new();
                            for (locale, value) in per_locale {
                                if let Some(value) = value.as_str() {
                                    name.set_in(locale.as_str(), value.to_string());
                                }
                            }
                            name
                        }
                        _ => return None,
                    };
                    let key = match map.get("id").or_else(|| map.get("_id")) {
                        Some(Value::String(id)) => id.clone(),
                        Some(other) if !other.is_null() => other.to_string(),
                        _ => name.get_in(default_locale).cloned()?,
                    };
                    Some(SelectOption { key, name })
                }
                _ => None,
            })
            .collect(),
        Value::Object(per_locale) => {
            let mut options: Vec<SelectOption> = Vec::new();
            let default_first = per_locale
                .get(default_locale.as_str())
                .into_iter()
                .map(|names| (default_locale.as_str(), names))
                .chain(
                    per_locale
                        .iter()
                        .filter(|(locale, _)| locale.as_str() != default_locale.as_str())
                        .map(|(locale, names)| (locale.as_str(), names)),
                );
            for (locale, names) in default_first {
                let Some(names) = names.as_array() else { continue };
                for (index, name) in names.iter().filter_map(Value::as_str).enumerate() {
                    match options.get_mut(index) {
                        Some(option) => option.name.set_in(locale, name.to_string()),
                        None => options.push(SelectOption {
                            key: name.to_string(),
                            name: Localized::with(locale, name.to_string()),
                        }),
                    }
                }
            }
            options
        }
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
