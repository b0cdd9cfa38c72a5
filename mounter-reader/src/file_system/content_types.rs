use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use mounter_core::{ContentType, ResourceKind};

use super::read_file;
use crate::error::{io_err, ReaderError};
use crate::reader::{ReadContext, ResourceReader};

const CONTENT_TYPES_DIR: &str = "app/content_types";

pub(crate) struct ContentTypesReader {
    root: PathBuf,
}

impl ContentTypesReader {
    pub(crate) fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }
}

impl ResourceReader for ContentTypesReader {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ContentTypes
    }

    /// One YAML file per content type, read in file name order.
    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        let dir = self.root.join(CONTENT_TYPES_DIR);
        if !dir.is_dir() {
            tracing::debug!("no {CONTENT_TYPES_DIR} directory");
            return Ok(());
        }
        let default_locale = ctx.mounting_point.default_locale();

        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| io_err(&dir, e.into()))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("yml") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let content_type = ContentType::from_yaml(&read_file(path)?, stem, &default_locale)?;
            ctx.mounting_point.register_content_type(content_type);
        }
        Ok(())
    }
}
