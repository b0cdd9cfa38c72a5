//! Files under `public/`.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use mounter_core::{AssetSource, ContentAsset, ResourceKind, ThemeAsset};

use super::relative_path;
use crate::error::{io_err, ReaderError};
use crate::reader::{ReadContext, ResourceReader};

const SAMPLES_DIR: &str = "public/samples";
const THEME_FOLDERS: &[&str] = &["stylesheets", "javascripts", "images", "fonts", "media"];

/// Regular files under `dir`, in path order.
fn files(dir: &Path) -> Result<Vec<PathBuf>, ReaderError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| io_err(dir, e.into()))?;
        let hidden = entry.file_name().to_str().is_some_and(|name| name.starts_with('.'));
        if entry.file_type().is_file() && !hidden {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

pub(crate) struct ContentAssetsReader {
    root: PathBuf,
}

impl ContentAssetsReader {
    pub(crate) fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }
}

impl ResourceReader for ContentAssetsReader {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ContentAssets
    }

    /// Samples are already local: their url is their local filepath.
    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        let dir = self.root.join(SAMPLES_DIR);
        for path in files(&dir)? {
            let Some(relative) = relative_path(&dir, &path) else { continue };
            let local_filepath = format!("/samples/{relative}");
            ctx.mounting_point.register_content_asset(ContentAsset {
                url: local_filepath.clone(),
                local_filepath,
                filename: relative.rsplit('/').next().unwrap_or_default().to_string(),
                content_type: None,
            });
        }
        Ok(())
    }
}

pub(crate) struct ThemeAssetsReader {
    root: PathBuf,
}

impl ThemeAssetsReader {
    pub(crate) fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }
}

impl ResourceReader for ThemeAssetsReader {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ThemeAssets
    }

    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        for folder in THEME_FOLDERS {
            let dir = self.root.join("public").join(folder);
            for path in files(&dir)? {
                let Some(relative) = relative_path(&dir, &path) else { continue };
                ctx.mounting_point.register_theme_asset(ThemeAsset {
                    folder: folder.to_string(),
                    path: relative,
                    source: AssetSource::Local(path),
                });
            }
        }
        Ok(())
    }
}
