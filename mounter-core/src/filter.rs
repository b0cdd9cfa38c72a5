//! Schema-driven filtering of raw entry attributes.
//!
//! A reader hands over raw attribute maps exactly as its source produced
//! them. [`filter_attributes`] keeps a fixed allow-list of system attributes,
//! casts every declared field by type, and queues relationship fields for
//! later resolution. Attributes with no declared field are dropped.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::asset::{rewrite_asset_urls, ContentAsset};
use crate::entry::{ContentEntry, EntryId, FieldValue};
use crate::fields::{ContentType, Field, FieldKind};
use crate::locale::current_locale;
use crate::relationships::{PendingRelationship, RelationshipQueue, TargetIds};

/// A raw record as produced by a source.
pub type RawRecord = Map<String, Value>;

/// Date layouts accepted for date fields, tried in order.
const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d", "%d/%m/%Y"];

/// Attributes understood by a [`ContentEntry`], for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredAttributes {
    pub id: Option<EntryId>,
    pub slug: Option<String>,
    pub position: Option<i64>,
    pub seo_title: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_description: Option<String>,
    /// Cast field values, in schema order. Undefined values are absent.
    pub values: IndexMap<String, FieldValue>,
}

/// Filter `raw` through `content_type`.
///
/// The only side effect is appending to `queue`: one pending relationship per
/// `belongs_to` / `many_to_many` field present in `raw`, tagged with the
/// current locale.
pub fn filter_attributes(
    content_type: &ContentType,
    raw: &RawRecord,
    assets: &IndexMap<String, ContentAsset>,
    queue: &mut RelationshipQueue,
) -> FilteredAttributes {
    let source_id = raw_entry_id(content_type, raw);
    let mut filtered = FilteredAttributes {
        id: source_id.clone(),
        slug: raw.get("_slug").and_then(scalar_string),
        position: raw.get("_position").and_then(integer),
        seo_title: raw.get("seo_title").and_then(scalar_string),
        meta_keywords: raw.get("meta_keywords").and_then(scalar_string),
        meta_description: raw.get("meta_description").and_then(scalar_string),
        values: IndexMap::new(),
    };

    for field in &content_type.fields {
        let value = match field.kind {
            FieldKind::String => raw.get(&field.name).and_then(scalar_string).map(FieldValue::String),
            FieldKind::Boolean => raw.get(&field.name).and_then(boolean).map(FieldValue::Boolean),
            FieldKind::Text => raw
                .get(&field.name)
                .and_then(scalar_string)
                .map(|text| FieldValue::Text(rewrite_asset_urls(&text, assets))),
            FieldKind::Select => raw
                .get(&field.name)
                .and_then(scalar_string)
                .and_then(|key| field.name_for_select_option(&key))
                .map(FieldValue::Select),
            FieldKind::Date => date_value(field, raw).map(FieldValue::Date),
            FieldKind::BelongsTo | FieldKind::ManyToMany => {
                queue_relationship(field, raw, source_id.as_ref(), queue);
                None
            }
        };

        if let Some(value) = value {
            filtered.values.insert(field.name.clone(), value);
        }
    }

    filtered
}

/// Build an entry from its default-locale raw attributes.
///
/// Must run under the default locale. Returns `None` when the record carries
/// neither `_id` nor `_slug`, since such an entry cannot be addressed.
pub fn build_entry(
    content_type: &ContentType,
    raw: &RawRecord,
    assets: &IndexMap<String, ContentAsset>,
    queue: &mut RelationshipQueue,
) -> Option<ContentEntry> {
    let filtered = filter_attributes(content_type, raw, assets, queue);
    let Some(id) = filtered.id.clone() else {
        tracing::warn!("{}: skipping entry without _id or _slug", content_type.slug);
        return None;
    };
    let mut entry = ContentEntry::new(id, content_type.slug.clone());
    entry.assign(filtered);
    Some(entry)
}

/// `_id`, else the composite key built from `_slug`.
pub fn raw_entry_id(content_type: &ContentType, raw: &RawRecord) -> Option<EntryId> {
    raw.get("_id")
        .and_then(scalar_string)
        .or_else(|| {
            raw.get("_slug")
                .and_then(scalar_string)
                .map(|slug| format!("{}/{}", content_type.slug, slug))
        })
        .map(EntryId::from)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn queue_relationship(
    field: &Field,
    raw: &RawRecord,
    source: Option<&EntryId>,
    queue: &mut RelationshipQueue,
) {
    let Some(source) = source else {
        tracing::warn!("relationship '{}' ignored: entry has no id", field.name);
        return;
    };
    let Some(key) = field.target_key_name() else { return };

    // An absent key leaves the field alone; a present one, even null, is queued.
    let Some(value) = raw.get(&key) else { return };

    // The shape of the raw value decides between one and many targets.
    let targets = match value {
        Value::Array(ids) => TargetIds::Many(ids.iter().filter_map(scalar_string).map(EntryId::from).collect()),
        value => TargetIds::One(scalar_string(value).map(EntryId::from)),
    };

    queue.push(PendingRelationship {
        source: source.clone(),
        field: field.name.clone(),
        targets,
        locale: current_locale(),
    });
}

/// `formatted_<name>` first, then `<name>`.
fn date_value(field: &Field, raw: &RawRecord) -> Option<NaiveDate> {
    let formatted = format!("formatted_{}", field.name);
    let text = raw
        .get(&formatted)
        .and_then(scalar_string)
        .or_else(|| raw.get(&field.name).and_then(scalar_string))?;
    let date = parse_date(&text);
    if date.is_none() {
        tracing::warn!("field '{}': unparseable date {text:?}", field.name);
    }
    date
}

pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{with_locale, Locale};
    use rstest::rstest;
    use serde_json::json;

    fn events() -> ContentType {
        let mut kind = Field::new("kind", FieldKind::Select);
        kind.select_options = vec![crate::fields::SelectOption {
            key: "7".to_string(),
            name: crate::localized::Localized::with("en", "Concert".to_string()),
        }];
        let mut band = Field::new("band", FieldKind::BelongsTo);
        band.class_name = Some("bands".to_string());
        ContentType::new(
            "events",
            "Events",
            vec![
                Field::new("place", FieldKind::String),
                Field::new("date", FieldKind::Date),
                Field::new("notes", FieldKind::Text),
                Field::new("featured", FieldKind::Boolean),
                kind,
                band,
                Field::new("tags", FieldKind::ManyToMany),
            ],
        )
    }

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("fixture must be an object"),
        }
    }

    fn assets() -> IndexMap<String, ContentAsset> {
        let asset = ContentAsset {
            url: "/sites/1/assets/2/photo.jpg".to_string(),
            local_filepath: "/samples/assets/photo.jpg".to_string(),
            filename: "photo.jpg".to_string(),
            content_type: None,
        };
        IndexMap::from([(asset.url.clone(), asset)])
    }

    fn sample() -> RawRecord {
        raw(json!({
            "_id": "e1",
            "_slug": "avogadro-s-number",
            "_position": 3,
            "seo_title": "Avogadro",
            "_visible": true,
            "place": "Avogadro's Number",
            "date": "2012-06-11T00:00:00Z",
            "formatted_date": "2012/06/11",
            "notes": "<p>Lorem ipsum<img src=\"/sites/1/assets/2/photo.jpg\" alt=\"\" /></p>",
            "featured": "true",
            "kind": "7",
            "band_id": "b1",
            "tags_ids": ["t2", "t1"],
            "unknown_field": "ignored"
        }))
    }

    #[test]
    fn casts_every_declared_field() {
        let mut queue = RelationshipQueue::new();
        let filtered = filter_attributes(&events(), &sample(), &assets(), &mut queue);

        assert_eq!(filtered.id, Some(EntryId::from("e1")));
        assert_eq!(filtered.slug.as_deref(), Some("avogadro-s-number"));
        assert_eq!(filtered.position, Some(3));
        assert_eq!(filtered.seo_title.as_deref(), Some("Avogadro"));
        assert_eq!(
            filtered.values.get("date"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2012, 6, 11).expect("date")))
        );
        assert_eq!(
            filtered.values.get("notes").and_then(FieldValue::as_str),
            Some("<p>Lorem ipsum<img src=\"/samples/assets/photo.jpg\" alt=\"\" /></p>")
        );
        assert_eq!(filtered.values.get("featured"), Some(&FieldValue::Boolean(true)));
        assert_eq!(filtered.values.get("kind"), Some(&FieldValue::Select("Concert".into())));
        assert!(!filtered.values.contains_key("band"));
        assert!(!filtered.values.contains_key("unknown_field"));
        assert_eq!(
            filtered.values.keys().collect::<Vec<_>>(),
            ["place", "date", "notes", "featured", "kind"]
        );
    }

    #[test]
    fn relationships_are_queued_not_stored() {
        let mut queue = RelationshipQueue::new();
        filter_attributes(&events(), &sample(), &assets(), &mut queue);

        let pending: Vec<_> = queue.iter().collect();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].field, "band");
        assert_eq!(pending[0].targets, TargetIds::One(Some(EntryId::from("b1"))));
        assert_eq!(pending[1].targets, TargetIds::Many(vec![EntryId::from("t2"), EntryId::from("t1")]));
        assert_eq!(pending[0].source, EntryId::from("e1"));
    }

    #[test]
    fn filtering_is_idempotent() {
        let mut queue = RelationshipQueue::new();
        let first = filter_attributes(&events(), &sample(), &assets(), &mut queue);
        let second = filter_attributes(&events(), &sample(), &assets(), &mut queue);
        assert_eq!(first, second);
        assert_eq!(queue.len(), 4);
    }

    #[test]
    fn absent_values_are_skipped() {
        let mut queue = RelationshipQueue::new();
        let filtered = filter_attributes(&events(), &raw(json!({ "_id": "e2", "place": null })), &assets(), &mut queue);
        assert!(filtered.values.is_empty());
        assert_eq!(filtered.slug, None);
    }

    #[test]
    fn relationships_remember_the_locale() {
        let mut queue = RelationshipQueue::new();
        with_locale("fr", || filter_attributes(&events(), &sample(), &assets(), &mut queue));
        assert!(queue.iter().all(|p| p.locale == Locale::from("fr")));
    }

    #[test]
    fn absent_relationship_keys_are_not_queued() {
        let mut queue = RelationshipQueue::new();
        filter_attributes(&events(), &raw(json!({ "_id": "e3", "band_id": null })), &assets(), &mut queue);
        let pending: Vec<_> = queue.iter().collect();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].targets, TargetIds::One(None));
    }

    #[test]
    fn missing_id_falls_back_to_composite_key() {
        let record = raw(json!({ "_slug": "dinner" }));
        assert_eq!(raw_entry_id(&events(), &record), Some(EntryId::from("events/dinner")));
    }

    #[test]
    fn entry_without_any_identity_is_skipped() {
        let mut queue = RelationshipQueue::new();
        let entry = build_entry(&events(), &raw(json!({ "place": "x" })), &assets(), &mut queue);
        assert!(entry.is_none());
    }

    #[rstest]
    #[case("2012/06/11")]
    #[case("2012-06-11")]
    #[case("11/06/2012")]
    fn parses_supported_date_layouts(#[case] text: &str) {
        assert_eq!(parse_date(text), NaiveDate::from_ymd_opt(2012, 6, 11));
    }

    #[test]
    fn unparseable_date_is_absent() {
        assert_eq!(parse_date("next tuesday"), None);
    }
}
