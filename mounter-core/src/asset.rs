//! Content and theme assets.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Where an asset's bytes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSource {
    /// A file inside the local site tree.
    Local(PathBuf),
    /// A URL served by the remote API.
    Remote(String),
}

/// An uploaded file referenced from rich-text fields and editable elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAsset {
    /// The reference as it appears inside text (remote URL or local path).
    pub url: String,
    /// Locale-invariant path the reference is rewritten to, e.g. `/samples/photo.jpg`.
    pub local_filepath: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A stylesheet, script, image or font of the site theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeAsset {
    /// Top-level folder, e.g. `stylesheets`.
    pub folder: String,
    /// Path relative to the folder, e.g. `application.css`.
    pub path: String,
    pub source: AssetSource,
}

impl ThemeAsset {
    /// `<folder>/<path>`, the key the asset is registered under.
    pub fn key(&self) -> String {
        format!("{}/{}", self.folder, self.path)
    }
}

/// Replace every content asset reference in `text` by its local filepath.
pub fn rewrite_asset_urls(text: &str, assets: &IndexMap<String, ContentAsset>) -> String {
    assets
        .values()
        .filter(|asset| !asset.url.is_empty() && asset.url != asset.local_filepath)
        .fold(text.to_string(), |acc, asset| {
            acc.replace(&asset.url, &asset.local_filepath)
        })
}
