//! Content assets (uploads referenced from rich text) and theme assets.

use mounter_core::{AssetSource, ContentAsset, ResourceKind, ThemeAsset};

use super::{fetch_list, string_at, ApiClient};
use crate::error::ReaderError;
use crate::reader::{ReadContext, ResourceReader};

/// Local folder content assets are mirrored into.
const CONTENT_ASSETS_FOLDER: &str = "/samples/assets";

pub(crate) struct ContentAssetsReader<'c> {
    client: &'c dyn ApiClient,
}

impl<'c> ContentAssetsReader<'c> {
    pub(crate) fn new(client: &'c dyn ApiClient) -> Self {
        Self { client }
    }
}

impl ResourceReader for ContentAssetsReader<'_> {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ContentAssets
    }

    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        for raw in fetch_list(self.client, "content_assets", None)? {
            let Some(url) = string_at(&raw, &["url"]) else {
                tracing::warn!("content asset without url skipped");
                continue;
            };
            let filename = string_at(&raw, &["filename", "full_filename"])
                .or_else(|| url.rsplit('/').next().map(str::to_string))
                .unwrap_or_default();

            ctx.mounting_point.register_content_asset(ContentAsset {
                local_filepath: format!("{CONTENT_ASSETS_FOLDER}/{filename}"),
                filename,
                content_type: string_at(&raw, &["content_type"]),
                url,
            });
        }
        Ok(())
    }
}

pub(crate) struct ThemeAssetsReader<'c> {
    client: &'c dyn ApiClient,
}

impl<'c> ThemeAssetsReader<'c> {
    pub(crate) fn new(client: &'c dyn ApiClient) -> Self {
        Self { client }
    }
}

impl ResourceReader for ThemeAssetsReader<'_> {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ThemeAssets
    }

    fn read(&mut self, ctx: &mut ReadContext<'_>) -> Result<(), ReaderError> {
        for raw in fetch_list(self.client, "theme_assets", None)? {
            let (Some(folder), Some(url)) = (string_at(&raw, &["folder"]), string_at(&raw, &["url"])) else {
                tracing::warn!("theme asset without folder or url skipped");
                continue;
            };
            let path = string_at(&raw, &["local_path", "path"])
                .or_else(|| url.rsplit('/').next().map(str::to_string))
                .unwrap_or_default();

            ctx.mounting_point.register_theme_asset(ThemeAsset {
                folder,
                path,
                source: AssetSource::Remote(url),
            });
        }
        Ok(())
    }
}
