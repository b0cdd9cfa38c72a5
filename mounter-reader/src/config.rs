//! Reader configuration and its validation.
//!
//! Validation runs before any client call or file read, so a bad
//! configuration never produces a partial mounting point.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use mounter_core::Locale;

use crate::error::ReaderError;

/// Options recognized by the readers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// API endpoint, e.g. `sample.example.com:8080/locomotive/api`.
    #[serde(alias = "host", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Root of a site directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Forced locale list overriding the site's declared locales.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locales: Vec<Locale>,
}

/// Validated API credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    pub uri: String,
    pub email: String,
    pub password: String,
}

impl ApiCredentials {
    /// The URI with an explicit scheme (`http://` when none was given).
    pub fn base_url(&self) -> String {
        let uri = self.uri.trim_end_matches('/');
        if uri.starts_with("http://") || uri.starts_with("https://") {
            uri.to_string()
        } else {
            format!("http://{uri}")
        }
    }
}

impl ReaderConfig {
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn for_api(
        uri: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uri: Some(uri.into()),
            email: Some(email.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Validate `uri`, `email` and `password`, naming every missing one.
    pub fn api_credentials(&self) -> Result<ApiCredentials, ReaderError> {
        let present = |value: &Option<String>| {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
        };
        let (uri, email, password) = (present(&self.uri), present(&self.email), present(&self.password));

        let mut missing = Vec::new();
        if uri.is_none() {
            missing.push("uri");
        }
        if email.is_none() {
            missing.push("email");
        }
        if password.is_none() {
            missing.push("password");
        }

        match (uri, email, password) {
            (Some(uri), Some(email), Some(password)) => Ok(ApiCredentials { uri, email, password }),
            _ => Err(ReaderError::MissingCredentials { missing }),
        }
    }

    /// Validate that `path` names an existing directory.
    pub fn site_path(&self) -> Result<PathBuf, ReaderError> {
        let path = self.path.clone().ok_or(ReaderError::MissingPath)?;
        if !path.exists() {
            return Err(ReaderError::InvalidPath {
                path,
                reason: "does not exist".to_string(),
            });
        }
        if !path.is_dir() {
            return Err(ReaderError::InvalidPath {
                path,
                reason: "not a directory".to_string(),
            });
        }
        Ok(path)
    }
}
