//! Page templates under `app/views/pages`.
//!
//! A page's fullpath is its path without extensions; `<name>.<locale>.liquid`
//! holds the translation of `<name>.liquid`. Siblings follow the `pages:`
//! ordering of `config/site.yml`, unlisted pages come after in path order.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use walkdir::WalkDir;

use mounter_core::{
    EditableKind, EditableRecord, PageRecord, PageTranslation, PageTreeBuilder, ResourceKind,
};

use super::site::page_ordering;
use super::{read_file, relative_path, split_front_matter, template_name};
use crate::error::{io_err, yaml_err, ReaderError};
use crate::reader::{ReadContext, ResourceReader};

const PAGES_DIR: &str = "app/views/pages";

/// Editable file contents point into the samples folder.
const SAMPLES_PREFIX: &str = "/samples/";

#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    title: Option<String>,
    slug: Option<String>,
    content_type: Option<String>,
    handle: Option<String>,
    listed: Option<bool>,
    published: Option<bool>,
    position: Option<i64>,
    /// `"<block>/<slug>": content`
    #[serde(default)]
    editable_elements: IndexMap<String, EditableDef>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EditableDef {
    Content(String),
    Typed {
        #[serde(rename = "type", alias = "kind", default)]
        kind: Option<String>,
        content: String,
    },
}

pub(crate) struct PagesReader {
    root: PathBuf,
}

impl PagesReader {
    pub(crate) fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }
}

impl ResourceReader for PagesReader {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Pages
    }

    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        let dir = self.root.join(PAGES_DIR);
        if !dir.is_dir() {
            return Ok(());
        }
        let locales = ctx.mounting_point.locales();
        let default_locale = ctx.mounting_point.default_locale();
        let ordering = page_ordering(&self.root)?;

        let mut records: IndexMap<String, PageRecord> = IndexMap::new();
        for entry in WalkDir::new(&dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| io_err(&dir, e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = relative_path(&dir, entry.path()).and_then(|rel| template_name(&rel, &locales))
            else {
                continue;
            };

            let source = read_file(entry.path())?;
            let (header, body) = split_front_matter(&source);
            let front_matter = match header {
                Some(header) if !header.trim().is_empty() => {
                    serde_yaml::from_str::<FrontMatter>(header).map_err(|e| yaml_err(entry.path(), e))?
                }
                _ => FrontMatter::default(),
            };

            let locale = name.locale.unwrap_or_else(|| default_locale.clone());
            let is_default = locale == default_locale;
            let record = records
                .entry(name.base.clone())
                .or_insert_with(|| PageRecord::new(name.base.clone()));

            merge(&mut record.handle, front_matter.handle, is_default);
            merge(&mut record.content_type, front_matter.content_type, is_default);
            merge(&mut record.position, front_matter.position, is_default);
            merge(&mut record.published, front_matter.published, is_default);
            merge(&mut record.listed, front_matter.listed, is_default);

            let title = match front_matter.title {
                Some(title) => Some(title),
                None if is_default => Some(humanize(&name.base)),
                None => None,
            };
            record.translations.insert(
                locale,
                PageTranslation {
                    title,
                    slug: front_matter.slug,
                    fullpath: None,
                    source: Some(body.to_string()),
                    editable_elements: front_matter
                        .editable_elements
                        .into_iter()
                        .filter_map(|(key, def)| editable_record(&key, def))
                        .collect(),
                },
            );
        }

        let mut records: Vec<PageRecord> = records.into_values().collect();
        records.sort_by_key(|record| ordering.get_index_of(&record.fullpath).unwrap_or(usize::MAX));

        let mut builder = PageTreeBuilder::new(&locales);
        for record in records {
            builder.push(record);
        }
        let pages = builder.build(&ctx.mounting_point.asset_map());
        ctx.mounting_point.register_pages(pages);
        Ok(())
    }
}

/// Default-locale files set page attributes; translations only fill gaps.
fn merge<T>(slot: &mut Option<T>, value: Option<T>, is_default: bool) {
    if value.is_some() && (is_default || slot.is_none()) {
        *slot = value;
    }
}

fn editable_record(key: &str, def: EditableDef) -> Option<EditableRecord> {
    let Some((block, slug)) = key.rsplit_once('/') else {
        tracing::warn!("editable element '{key}' is not of the form block/slug");
        return None;
    };
    let (kind, content) = match def {
        EditableDef::Content(content) if content.starts_with(SAMPLES_PREFIX) => (EditableKind::File, content),
        EditableDef::Content(content) => (EditableKind::Text, content),
        EditableDef::Typed { kind, content } => {
            let kind = match kind.as_deref() {
                Some("file") => EditableKind::File,
                Some("control") => EditableKind::Control,
                _ => EditableKind::Text,
            };
            (kind, content)
        }
    };
    Some(EditableRecord {
        block: block.to_string(),
        slug: slug.to_string(),
        kind,
        content,
    })
}

/// `about-us/john-doe` -> `John doe`
fn humanize(fullpath: &str) -> String {
    let name = fullpath.rsplit('/').next().unwrap_or(fullpath).replace(['-', '_'], " ");
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanizes_the_last_segment() {
        assert_eq!(humanize("about-us/john-doe"), "John doe");
        assert_eq!(humanize("index"), "Index");
    }

    #[test]
    fn editable_kind_follows_content() {
        let file = editable_record("banner/page_image", EditableDef::Content("/samples/photo.jpg".into()))
            .expect("record");
        assert_eq!((file.block.as_str(), file.slug.as_str(), file.kind), ("banner", "page_image", EditableKind::File));

        let text = editable_record("banner/pitch", EditableDef::Content("<h2>About us</h2>".into())).expect("record");
        assert_eq!(text.kind, EditableKind::Text);

        assert!(editable_record("pitch", EditableDef::Content("x".into())).is_none());
    }

    #[test]
    fn translations_only_fill_gaps() {
        let mut handle = Some("about".to_string());
        merge(&mut handle, Some("a-propos".to_string()), false);
        assert_eq!(handle.as_deref(), Some("about"));
        merge(&mut handle, Some("about-us".to_string()), true);
        assert_eq!(handle.as_deref(), Some("about-us"));
    }
}
