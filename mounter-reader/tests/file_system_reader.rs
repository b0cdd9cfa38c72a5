//! The file-system reader against a generated site tree.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use mounter_core::{with_locale, EditableKind, EntryId, FieldKind, FieldValue, Locale, MountingPoint, ResourceKind};
use mounter_reader::{FileSystemReader, ReaderConfig, ReaderError};

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

fn page(root: &Path, name: &str, front_matter: &str) {
    write(
        root,
        &format!("app/views/pages/{name}.liquid"),
        &format!("---\n{front_matter}---\n{{% extends parent %}}\n"),
    );
}

const SITE: &str = r#"name: Sample website
locales: [en, fr, no]
seo_title: A simple LocomotiveCMS website
meta_keywords: some meta keywords
meta_description: some meta description
pages:
  - index
  - about-us:
      - john-doe
      - jane-doe
  - music
  - store
  - contact
  - events
  - songs
  - archives
"#;

const EVENTS: &str = r#"name: Events
slug: events
fields:
  - place:
      type: string
  - date:
      type: date
  - city:
      type: string
  - state:
      type: string
  - notes:
      type: text
"#;

const SONGS: &str = r#"name: Songs
fields:
  - title:
      type: string
  - event:
      type: belongs_to
      class_name: events
  - covers:
      type: many_to_many
      class_name: songs
"#;

fn site() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();

    write(root, "config/site.yml", SITE);

    // content types
    write(root, "app/content_types/events.yml", EVENTS);
    write(
        root,
        "app/content_types/messages.yml",
        "name: Messages\nfields:\n  - name:\n      type: string\n  - message:\n      type: text\n",
    );
    write(root, "app/content_types/songs.yml", SONGS);
    write(
        root,
        "app/content_types/updates.yml",
        "name: Updates\nfields:\n  - title:\n      type: string\n  - text:\n      type: text\n",
    );

    // entries: 5 events, 4 messages, 8 songs, 9 updates
    let mut events = String::from(
        "- \"Avogadro's Number\":\n    date: 2012/06/11\n    city: Fort Collins\n    state: CO\n    notes: <p>Lorem ipsum</p>\n",
    );
    for i in 2..=5 {
        events.push_str(&format!("- \"Venue #{i}\":\n    date: 2012/07/0{i}\n    city: Denver\n"));
    }
    write(root, "data/events.yml", &events);

    let messages: String = (1..=4).map(|i| format!("- name: Visitor {i}\n  message: Hello\n")).collect();
    write(root, "data/messages.yml", &messages);

    let mut songs = String::from(
        "- \"Alive\":\n    event: avogadro-s-number\n    covers: [even-flow, unknown-song]\n- title:\n    en: Even Flow\n    fr: Flux Régulier\n",
    );
    for i in 3..=8 {
        songs.push_str(&format!("- \"Song {i}\":\n    event: venue-{i}\n"));
    }
    write(root, "data/songs.yml", &songs);

    let updates: String = (1..=9).map(|i| format!("- \"Update {i}\":\n    text: <p>News</p>\n")).collect();
    write(root, "data/updates.yml", &updates);

    // pages
    page(root, "index", "title: Home page\n");
    page(root, "index.fr", "title: Page d'accueil\n");
    page(root, "404", "title: Page not found\n");
    page(
        root,
        "about-us",
        "title: About Us\neditable_elements:\n  banner/pitch: \"<h2>About us</h2><p>Lorem ipsum...</p>\"\n  banner/page_image: /samples/photo_2.jpg\n",
    );
    page(
        root,
        "about-us.fr",
        "title: A notre sujet\nslug: a-notre-sujet\neditable_elements:\n  banner/pitch: \"<h2>A notre sujet</h2><p>Lorem ipsum...(FR)</p>\"\n  banner/page_image: /samples/photo.jpg\n",
    );
    page(root, "about-us/john-doe", "title: John Doe\n");
    page(root, "about-us/john-doe.fr", "title: Jean Personne\nslug: jean-personne\n");
    page(root, "about-us/jane-doe", "title: Jane Doe\n");
    page(root, "music", "title: Music\n");
    page(root, "store", "title: Store\n");
    page(root, "store.fr", "title: Magasin\nslug: magasin\n");
    page(root, "contact", "title: Contact Us\n");
    page(root, "events", "title: Events\n");
    page(root, "songs", "title: Songs\n");
    page(root, "songs/template", "title: Song\ncontent_type: songs\n");
    page(root, "archives", "title: Archives\n");
    page(root, "archives/news", "title: News\nlisted: false\n");

    // snippets
    write(root, "app/views/snippets/song.liquid", "<a href=\"{{ song.url }}\">&rarr; Listen</a>");
    write(root, "app/views/snippets/song.fr.liquid", "<a href=\"{{ song.url }}\">&rarr; écouter</a>");
    write(root, "app/views/snippets/header.liquid", "<h1>{{ site.name }}</h1>");

    // assets
    write(root, "public/samples/photo.jpg", "jpg");
    write(root, "public/samples/photo_2.jpg", "jpg");
    write(root, "public/stylesheets/application.css", "body {}");
    write(root, "public/javascripts/application.js", "");
    write(root, "public/images/.gitkeep", "");

    dir
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn mount(root: &Path, kinds: &[ResourceKind]) -> MountingPoint {
    init_logging();
    let config = ReaderConfig::for_path(root);
    FileSystemReader::new(&config)
        .expect("valid path")
        .runner(&config)
        .only(kinds)
        .run()
        .expect("run")
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn requires_an_existing_directory() {
    let err = FileSystemReader::run(&ReaderConfig::for_path("/no/such/site")).unwrap_err();
    assert!(matches!(err, ReaderError::InvalidPath { .. }));
    assert!(err.is_configuration());

    let err = FileSystemReader::run(&ReaderConfig::default()).unwrap_err();
    assert!(matches!(err, ReaderError::MissingPath));
}

#[test]
fn missing_site_file_is_an_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let err = FileSystemReader::run(&ReaderConfig::for_path(dir.path())).unwrap_err();
    assert!(matches!(err, ReaderError::Io { ref path, .. } if path.ends_with("config/site.yml")));
}

#[test]
fn malformed_front_matter_names_the_file() {
    let dir = site();
    page(dir.path(), "broken", "title: [unclosed\n");
    let config = ReaderConfig::for_path(dir.path());
    let err = FileSystemReader::new(&config)
        .expect("valid path")
        .runner(&config)
        .only(&[ResourceKind::Pages])
        .run()
        .unwrap_err();
    assert!(matches!(err, ReaderError::Yaml { ref path, .. } if path.ends_with("broken.liquid")));
}

#[test]
fn runs_every_reader() {
    let dir = site();
    let mounting_point = FileSystemReader::run(&ReaderConfig::for_path(dir.path())).expect("run");
    assert_eq!(mounting_point.registered(), ResourceKind::ALL.to_vec());
}

// ---------------------------------------------------------------------------
// Site
// ---------------------------------------------------------------------------

#[test]
fn reads_the_site() {
    let dir = site();
    let mounting_point = mount(dir.path(), &[]);
    let site = mounting_point.site().expect("site");
    assert_eq!(site.name, "Sample website");
    assert_eq!(site.locales, ["en", "fr", "no"].map(Locale::from).to_vec());
    assert_eq!(site.seo_title(), Some("A simple LocomotiveCMS website"));
    assert_eq!(site.meta_keywords(), Some("some meta keywords"));
    assert_eq!(site.meta_description(), Some("some meta description"));
}

#[test]
fn forced_locales_replace_the_site_ones() {
    let dir = site();
    let config = ReaderConfig {
        locales: vec![Locale::from("fr")],
        ..ReaderConfig::for_path(dir.path())
    };
    let mounting_point = FileSystemReader::new(&config)
        .expect("valid path")
        .runner(&config)
        .only(&[])
        .run()
        .expect("run");
    assert_eq!(mounting_point.locales(), vec![Locale::from("fr")]);
}

// ---------------------------------------------------------------------------
// Pages and content types
// ---------------------------------------------------------------------------

#[test]
fn builds_the_page_tree_in_config_order() {
    let dir = site();
    let mounting_point = mount(dir.path(), &[ResourceKind::ContentTypes, ResourceKind::Pages]);
    let pages = mounting_point.pages().expect("pages");
    assert_eq!(pages.len(), 13);

    let index = pages.get("index").expect("index");
    let children: Vec<_> = pages.children(index).collect();
    assert_eq!(
        children.iter().map(|p| p.key()).collect::<Vec<_>>(),
        ["about-us", "music", "store", "contact", "events", "songs", "archives"]
    );
    assert_eq!(
        children.iter().map(|p| p.title()).collect::<Vec<_>>(),
        [
            Some("About Us"),
            Some("Music"),
            Some("Store"),
            Some("Contact Us"),
            Some("Events"),
            Some("Songs"),
            Some("Archives")
        ]
    );
    assert_eq!(
        pages.children(children[0]).map(|p| p.fullpath()).collect::<Vec<_>>(),
        [Some("about-us/john-doe"), Some("about-us/jane-doe")]
    );
    assert!(pages.get("archives/news").is_some_and(|p| !p.listed));
}

#[test]
fn localizes_fullpaths_and_titles() {
    let dir = site();
    let mounting_point = mount(dir.path(), &[ResourceKind::Pages]);
    let pages = mounting_point.pages().expect("pages");
    let index = pages.get("index").expect("index");
    let about_us = pages.get("about-us").expect("about-us");

    with_locale("fr", || {
        assert_eq!(
            pages.children(about_us).map(|p| p.fullpath()).collect::<Vec<_>>(),
            [Some("a-notre-sujet/jean-personne"), None]
        );
        assert_eq!(
            pages.children(index).map(|p| p.title()).collect::<Vec<_>>(),
            [Some("A notre sujet"), None, Some("Magasin"), None, None, None, None]
        );
    });
    with_locale("no", || assert!(about_us.title().is_none()));
}

#[test]
fn localizes_editable_elements() {
    let dir = site();
    let mounting_point = mount(dir.path(), &[ResourceKind::ContentAssets, ResourceKind::Pages]);
    let about_us = mounting_point.page("about-us").expect("about-us");
    assert_eq!(about_us.editable_elements.len(), 2);

    let pitch = about_us.find_editable_element("banner", "pitch").expect("pitch");
    assert_eq!(pitch.content(), Some("<h2>About us</h2><p>Lorem ipsum...</p>"));
    let image = about_us.find_editable_element("banner", "page_image").expect("image");
    assert_eq!(image.kind, EditableKind::File);
    assert_eq!(image.content(), Some("/samples/photo_2.jpg"));

    with_locale("fr", || {
        assert_eq!(pitch.content(), Some("<h2>A notre sujet</h2><p>Lorem ipsum...(FR)</p>"));
        assert_eq!(image.content(), Some("/samples/photo.jpg"));
    });
}

#[test]
fn template_page_points_to_its_content_type() {
    let dir = site();
    let mounting_point = mount(dir.path(), &[ResourceKind::ContentTypes, ResourceKind::Pages]);
    let template = mounting_point.page("songs/template").expect("template");
    assert_eq!(mounting_point.page_content_type(template).map(|ct| ct.slug.as_str()), Some("songs"));
}

#[test]
fn reads_content_types_in_file_order() {
    let dir = site();
    let mounting_point = mount(dir.path(), &[ResourceKind::ContentTypes]);
    let content_types = mounting_point.content_types().expect("content types");
    assert_eq!(content_types.keys().collect::<Vec<_>>(), ["events", "messages", "songs", "updates"]);

    let events = content_types.values().next().expect("events");
    assert_eq!((events.name.as_str(), events.slug.as_str()), ("Events", "events"));
    assert_eq!(events.field_names(), ["place", "date", "city", "state", "notes"]);
    assert_eq!(
        events.fields.iter().map(|f| f.kind).collect::<Vec<_>>(),
        [FieldKind::String, FieldKind::Date, FieldKind::String, FieldKind::String, FieldKind::Text]
    );
}

// ---------------------------------------------------------------------------
// Snippets and assets
// ---------------------------------------------------------------------------

#[test]
fn localizes_snippets() {
    let dir = site();
    let mounting_point = mount(dir.path(), &[ResourceKind::Snippets]);
    let snippets = mounting_point.snippets().expect("snippets");
    assert_eq!(snippets.keys().collect::<Vec<_>>(), ["header", "song"]);

    let song = mounting_point.snippet("song").expect("song");
    assert!(song.source().is_some_and(|s| s.contains("&rarr; Listen")));
    with_locale("fr", || assert!(song.source().is_some_and(|s| s.contains("&rarr; écouter"))));
}

#[test]
fn reads_assets() {
    let dir = site();
    let mounting_point = mount(dir.path(), &[ResourceKind::ContentAssets, ResourceKind::ThemeAssets]);

    let content_assets = mounting_point.content_assets().expect("content assets");
    assert_eq!(content_assets.keys().collect::<Vec<_>>(), ["/samples/photo.jpg", "/samples/photo_2.jpg"]);

    let theme_assets = mounting_point.theme_assets().expect("theme assets");
    assert_eq!(
        theme_assets.keys().collect::<Vec<_>>(),
        ["stylesheets/application.css", "javascripts/application.js"]
    );
}

// ---------------------------------------------------------------------------
// Content entries
// ---------------------------------------------------------------------------

fn entries(root: &Path) -> MountingPoint {
    mount(root, &[ResourceKind::ContentTypes, ResourceKind::ContentEntries])
}

#[test]
fn reads_every_entry() {
    let dir = site();
    assert_eq!(entries(dir.path()).entries_len(), 26);
}

#[test]
fn first_entry_has_label_slug_and_cast_values() {
    let dir = site();
    let mounting_point = entries(dir.path());
    let entry = mounting_point.content_entries().and_then(|e| e.values().next()).expect("entry");
    let content_type = mounting_point.entry_content_type(entry).expect("type");

    assert_eq!(entry.label(content_type), Some("Avogadro's Number"));
    assert_eq!(entry.slug(), Some("avogadro-s-number"));
    assert_eq!(entry.position, Some(0));
    assert_eq!(entry.get("city").and_then(FieldValue::as_str), Some("Fort Collins"));
    assert_eq!(
        entry.get("date").and_then(FieldValue::as_date).map(|d| d.to_string()),
        Some("2012-06-11".to_string())
    );
}

#[test]
fn per_locale_values_share_one_entry() {
    let dir = site();
    let mounting_point = entries(dir.path());
    let song = mounting_point.entry("songs/even-flow").expect("even flow");
    assert_eq!(song.get("title").and_then(FieldValue::as_str), Some("Even Flow"));
    with_locale("fr", || {
        assert_eq!(song.get("title").and_then(FieldValue::as_str), Some("Flux Régulier"));
        assert_eq!(song.slug(), Some("flux-regulier"));
    });
}

#[test]
fn relationships_resolve_by_slug() {
    let dir = site();
    let mounting_point = entries(dir.path());
    let alive = mounting_point.entry("songs/alive").expect("alive");
    assert_eq!(
        alive.get("event").and_then(FieldValue::as_reference),
        Some(&EntryId::from("events/avogadro-s-number"))
    );
    assert_eq!(
        alive.get("covers").and_then(FieldValue::as_references),
        Some(&[EntryId::from("songs/even-flow")][..])
    );
    // venue-6.. do not exist
    let song = mounting_point.entry("songs/song-8").expect("song 8");
    assert!(song.get("event").is_none());
}

#[test]
fn same_label_entries_stay_distinct() {
    let dir = site();
    write(
        dir.path(),
        "data/events.yml",
        "- \"Avogadro's Number\":\n    city: Fort Collins\n- \"Avogadro's Number\":\n    city: Denver\n",
    );
    let mounting_point = entries(dir.path());

    let first = mounting_point
        .entry_by_id(&EntryId::from("events/avogadro-s-number"))
        .expect("first");
    let second = mounting_point
        .entry_by_id(&EntryId::from("events/avogadro-s-number-1"))
        .expect("second");
    assert_eq!(first.get("city").and_then(FieldValue::as_str), Some("Fort Collins"));
    assert_eq!(second.get("city").and_then(FieldValue::as_str), Some("Denver"));
    assert_eq!(second.slug(), Some("avogadro-s-number-1"));
    assert_eq!(mounting_point.entries_of("events").count(), 2);
}

#[test]
fn relationships_apply_to_every_written_locale() {
    let dir = site();
    write(
        dir.path(),
        "data/songs.yml",
        "- title:\n    en: Black\n    fr: Noir\n  event: avogadro-s-number\n",
    );
    let mounting_point = entries(dir.path());
    let song = mounting_point.entry("songs/black").expect("black");
    let event = Some(&EntryId::from("events/avogadro-s-number"));

    assert_eq!(song.get("event").and_then(FieldValue::as_reference), event);
    with_locale("fr", || {
        assert_eq!(song.get("event").and_then(FieldValue::as_reference), event);
    });
}
