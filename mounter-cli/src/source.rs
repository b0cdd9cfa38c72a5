//! Where a command reads its site from: a directory or the CMS API.
//!
//! Giving `--path` selects the file-system reader. Any API option
//! (`--uri`, `--email`, `--password` or `--profile`) selects the API reader;
//! explicit flags override the values of the deploy profile.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use mounter_core::{Locale, MountingPoint, ResourceKind};
use mounter_reader::{ApiReader, FileSystemReader, ReaderConfig};

use crate::http::HttpClient;

#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Site directory to read from.
    #[arg(long, conflicts_with_all = ["uri", "profile"])]
    pub path: Option<PathBuf>,

    /// API endpoint, e.g. `sample.example.com/locomotive/api`.
    #[arg(long)]
    pub uri: Option<String>,

    /// Account email used to request an API token.
    #[arg(long)]
    pub email: Option<String>,

    /// Account password used to request an API token.
    #[arg(long)]
    pub password: Option<String>,

    /// Environment of the deploy file holding the API credentials.
    #[arg(long)]
    pub profile: Option<String>,

    /// Deploy file read by `--profile`.
    #[arg(long, default_value = "config/deploy.yml")]
    pub config: PathBuf,

    /// Replace the site locales (comma separated, default first).
    #[arg(long, value_delimiter = ',')]
    pub locales: Vec<String>,
}

impl SourceArgs {
    /// Merge the deploy profile (if any) with the flags.
    pub fn reader_config(&self) -> Result<ReaderConfig> {
        let mut config = match &self.profile {
            Some(env) => load_profile(&self.config, env)?,
            None => ReaderConfig::default(),
        };

        if let Some(uri) = &self.uri {
            config.uri = Some(uri.clone());
        }
        if let Some(email) = &self.email {
            config.email = Some(email.clone());
        }
        if let Some(password) = &self.password {
            config.password = Some(password.clone());
        }
        if let Some(path) = &self.path {
            config.path = Some(path.clone());
        }
        if !self.locales.is_empty() {
            config.locales = self.locales.iter().map(|l| Locale::from(l.as_str())).collect();
        }
        Ok(config)
    }

    fn is_api(&self, config: &ReaderConfig) -> bool {
        config.path.is_none()
            && (self.profile.is_some()
                || config.uri.is_some()
                || config.email.is_some()
                || config.password.is_some())
    }

    /// Run the readers for `kinds` (the site is always read).
    pub fn mount(&self, kinds: &[ResourceKind]) -> Result<MountingPoint> {
        let config = self.reader_config()?;

        if self.is_api(&config) {
            let credentials = config.api_credentials()?;
            let client = HttpClient::connect(&credentials)
                .with_context(|| format!("failed to authenticate against {}", credentials.base_url()))?;
            let mounting_point = ApiReader::new(&client)
                .runner(&config)?
                .only(kinds)
                .run()
                .context("failed to read the site from the API")?;
            return Ok(mounting_point);
        }

        let reader = FileSystemReader::new(&config)?;
        reader
            .runner(&config)
            .only(kinds)
            .run()
            .with_context(|| format!("failed to read the site at {}", reader.root().display()))
    }
}

/// Read the `env` section of a deploy file:
///
/// ```yaml
/// production:
///   host: www.example.com
///   email: john@doe.net
///   password: secret
/// ```
fn load_profile(path: &Path, env: &str) -> Result<ReaderConfig> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mut profiles: HashMap<String, ReaderConfig> = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    match profiles.remove(env) {
        Some(config) => Ok(config),
        None => bail!("no '{env}' environment in {}", path.display()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
