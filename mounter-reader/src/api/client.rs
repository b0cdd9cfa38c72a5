//! The transport seam of the API reader.

use std::collections::HashMap;

use serde_json::Value;

use mounter_core::Locale;

use crate::error::{api_err, ReaderError};

/// Fetches one API resource, optionally for a locale.
///
/// `resource` is a path relative to the API root without extension, e.g.
/// `content_types/events/entries`.
pub trait ApiClient {
    fn get(&self, resource: &str, locale: Option<&Locale>) -> Result<Value, ReaderError>;
}

/// An [`ApiClient`] replaying recorded responses.
///
/// Lookups are exact: a response recorded without a locale does not answer
/// a localized request.
#[derive(Debug, Clone, Default)]
pub struct MemoryClient {
    responses: HashMap<(String, Option<Locale>), Value>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, resource: &str, locale: Option<&str>, response: Value) -> Self {
        self.insert(resource, locale.map(Locale::from), response);
        self
    }

    pub fn insert(&mut self, resource: impl Into<String>, locale: Option<Locale>, response: Value) {
        self.responses.insert((resource.into(), locale), response);
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl ApiClient for MemoryClient {
    fn get(&self, resource: &str, locale: Option<&Locale>) -> Result<Value, ReaderError> {
        self.responses
            .get(&(resource.to_string(), locale.cloned()))
            .cloned()
            .ok_or_else(|| {
                let locale = locale.map(Locale::as_str).unwrap_or("-");
                api_err(resource, format!("no recorded response (locale {locale})"))
            })
    }
}
