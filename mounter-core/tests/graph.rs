//! Ingestion through the core alone: filter, build, register, resolve.

use indexmap::IndexMap;
use mounter_core::{
    build_entry, filter_attributes, with_locale, ContentType, EntryId, Field, FieldKind,
    FieldValue, Locale, MountingPoint, RawRecord, RelationshipQueue, Site,
};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn raw(value: Value) -> RawRecord {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

fn songs() -> ContentType {
    let mut band = Field::new("band", FieldKind::BelongsTo);
    band.class_name = Some("bands".to_string());
    let mut covers = Field::new("covers", FieldKind::ManyToMany);
    covers.class_name = Some("songs".to_string());
    ContentType::new("songs", "Songs", vec![Field::new("title", FieldKind::String), band, covers])
}

fn bands() -> ContentType {
    ContentType::new("bands", "Bands", vec![Field::new("name", FieldKind::String)])
}

fn mount() -> MountingPoint {
    let mut mounting_point = MountingPoint::new();
    mounting_point.register_site(Site {
        name: "Sample website".to_string(),
        locales: vec![Locale::from("en"), Locale::from("fr")],
        ..Site::default()
    });
    mounting_point.register_content_type(songs());
    mounting_point.register_content_type(bands());
    mounting_point
}

/// Songs are ingested before the bands they point to.
fn ingest(mounting_point: &mut MountingPoint) -> RelationshipQueue {
    let assets = IndexMap::new();
    let mut queue = RelationshipQueue::new();
    let records = [
        (songs(), json!({ "_id": "s1", "_slug": "alive", "title": "Alive", "band_id": "b1", "covers_ids": ["s2", "s9", "s2"] })),
        (songs(), json!({ "_id": "s2", "_slug": "even-flow", "title": "Even Flow", "band_id": "b9" })),
        (bands(), json!({ "_id": "b1", "_slug": "pearl-jam", "name": "Pearl Jam" })),
    ];
    for (content_type, record) in records {
        let entry = build_entry(&content_type, &raw(record), &assets, &mut queue).expect("entry");
        mounting_point.register_entry(entry);
    }

    // French translation of the first song.
    let translation = raw(json!({ "_id": "s1", "_slug": "vivant", "title": "Vivant", "band_id": "b1" }));
    with_locale("fr", || {
        let filtered = filter_attributes(&songs(), &translation, &assets, &mut queue);
        let entry = mounting_point.entry_by_id_mut(&EntryId::from("s1")).expect("s1");
        entry.assign(filtered);
    });
    queue
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn every_entry_roundtrips_through_its_id() {
    let mut mounting_point = mount();
    ingest(&mut mounting_point);
    let entries = mounting_point.content_entries().expect("entries");
    assert_eq!(entries.len(), 3);
    for entry in entries.values() {
        let found = mounting_point.entry_by_id(&entry.id).expect("by id");
        assert_eq!(found, entry);
    }
}

#[test]
fn forward_references_resolve_after_ingestion() {
    let mut mounting_point = mount();
    let queue = ingest(&mut mounting_point);
    // one per relationship key present, French translation included
    assert_eq!(queue.len(), 4);

    let report = queue.resolve(&mut mounting_point);
    assert_eq!(report.dangling, vec![EntryId::from("s9"), EntryId::from("b9")]);

    let alive = mounting_point.entry("songs/alive").expect("alive");
    assert_eq!(alive.get("band"), Some(&FieldValue::Reference(EntryId::from("b1"))));
    assert_eq!(
        alive.get("covers").and_then(FieldValue::as_references),
        Some(&[EntryId::from("s2")][..])
    );

    let even_flow = mounting_point.entry("songs/even-flow").expect("even flow");
    assert!(even_flow.get("band").is_none());
}

#[test]
fn translations_share_one_entry_object() {
    let mut mounting_point = mount();
    let queue = ingest(&mut mounting_point);
    queue.resolve(&mut mounting_point);

    let alive = mounting_point.entry_by_id(&EntryId::from("s1")).expect("s1");
    assert_eq!(alive.get("title").and_then(FieldValue::as_str), Some("Alive"));
    with_locale("fr", || {
        assert_eq!(alive.get("title").and_then(FieldValue::as_str), Some("Vivant"));
        assert_eq!(alive.slug(), Some("vivant"));
        assert_eq!(alive.get("band"), Some(&FieldValue::Reference(EntryId::from("b1"))));
    });
    // composite key stays on the default-locale slug
    assert!(mounting_point.entry("songs/alive").is_some());
    assert!(mounting_point.entry("songs/vivant").is_none());
}

#[test]
fn undeclared_locale_has_no_values() {
    let mut mounting_point = mount();
    ingest(&mut mounting_point);
    let alive = mounting_point.entry("songs/alive").expect("alive");
    with_locale("de", || {
        assert!(alive.get("title").is_none());
        assert!(alive.slug().is_none());
    });
}

#[test]
fn json_view_renders_references_as_keys() {
    let mut mounting_point = mount();
    let queue = ingest(&mut mounting_point);
    queue.resolve(&mut mounting_point);

    let alive = mounting_point.entry("songs/alive").expect("alive");
    let content_type = mounting_point.entry_content_type(alive).expect("type");
    let view = alive.to_json(content_type, &mounting_point);
    assert_eq!(view["_label"], json!("Alive"));
    assert_eq!(view["band"], json!("bands/pearl-jam"));
    assert_eq!(view["covers"], json!(["songs/even-flow"]));
}
