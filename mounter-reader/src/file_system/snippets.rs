use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use walkdir::WalkDir;

use mounter_core::{ResourceKind, Snippet};

use super::{read_file, relative_path, template_name};
use crate::error::{io_err, ReaderError};
use crate::reader::{ReadContext, ResourceReader};

const SNIPPETS_DIR: &str = "app/views/snippets";

pub(crate) struct SnippetsReader {
    root: PathBuf,
}

impl SnippetsReader {
    pub(crate) fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }
}

impl ResourceReader for SnippetsReader {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Snippets
    }

    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        let dir = self.root.join(SNIPPETS_DIR);
        if !dir.is_dir() {
            return Ok(());
        }
        let locales = ctx.mounting_point.locales();
        let default_locale = ctx.mounting_point.default_locale();
        let mut snippets: IndexMap<String, Snippet> = IndexMap::new();

        for entry in WalkDir::new(&dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| io_err(&dir, e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = relative_path(&dir, entry.path()).and_then(|rel| template_name(&rel, &locales))
            else {
                continue;
            };
            let locale = name.locale.unwrap_or_else(|| default_locale.clone());
            let source = read_file(entry.path())?;
            snippets
                .entry(name.base.clone())
                .or_insert_with(|| Snippet::new(name.base))
                .source
                .set_in(locale, source);
        }

        for snippet in snippets.into_values() {
            ctx.mounting_point.register_snippet(snippet);
        }
        Ok(())
    }
}
