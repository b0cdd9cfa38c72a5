//! Reader over the CMS JSON API.
//!
//! Every resource is fetched through an [`ApiClient`]; this module never
//! touches the network itself. Localized resources are fetched once per
//! site locale and merged.

mod assets;
mod client;
mod content_entries;
mod content_types;
mod pages;
mod site;
mod snippets;

use serde_json::Value;

use mounter_core::{Locale, MountingPoint};

use crate::config::ReaderConfig;
use crate::error::{api_err, ReaderError};
use crate::reader::ResourceReader;
use crate::runner::Runner;

pub use client::{ApiClient, MemoryClient};

/// Builds a mounting point from an API.
pub struct ApiReader<'c> {
    client: &'c dyn ApiClient,
}

impl<'c> ApiReader<'c> {
    pub fn new(client: &'c dyn ApiClient) -> Self {
        Self { client }
    }

    /// One reader per resource kind.
    pub fn readers(&self) -> Vec<Box<dyn ResourceReader + 'c>> {
        vec![
            Box::new(site::SiteReader::new(self.client)),
            Box::new(assets::ContentAssetsReader::new(self.client)),
            Box::new(content_types::ContentTypesReader::new(self.client)),
            Box::new(assets::ThemeAssetsReader::new(self.client)),
            Box::new(snippets::SnippetsReader::new(self.client)),
            Box::new(content_entries::ContentEntriesReader::new(self.client)),
            Box::new(pages::PagesReader::new(self.client)),
        ]
    }

    /// Validate the credentials, then prepare a run over every reader.
    pub fn runner(&self, config: &ReaderConfig) -> Result<Runner<'c>, ReaderError> {
        let credentials = config.api_credentials()?;
        tracing::debug!("reading from {}", credentials.base_url());
        Ok(Runner::new(self.readers()).force_locales(config.locales.clone()))
    }

    pub fn run(&self, config: &ReaderConfig) -> Result<MountingPoint, ReaderError> {
        self.runner(config)?.run()
    }
}

// ---------------------------------------------------------------------------
// Payload helpers
// ---------------------------------------------------------------------------

/// Fetch `resource` and require a JSON array.
pub(crate) fn fetch_list(
    client: &dyn ApiClient,
    resource: &str,
    locale: Option<&Locale>,
) -> Result<Vec<Value>, ReaderError> {
    match client.get(resource, locale)? {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(api_err(resource, format!("expected a list, got {}", kind_of(&other)))),
    }
}

/// The first of `keys` holding a string (or number) in `value`.
pub(crate) fn string_at(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

pub(crate) fn strings_at(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

/// `translated_in` of a payload; `None` when the payload does not say.
pub(crate) fn translated_in(value: &Value) -> Option<Vec<Locale>> {
    value.get("translated_in")?.as_array().map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(Locale::from)
            .collect()
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
