//! Reader over a site directory.
//!
//! ```text
//! config/site.yml
//! app/content_types/<slug>.yml
//! app/views/pages/**/<name>[.<locale>].liquid
//! app/views/snippets/<slug>[.<locale>].liquid
//! data/<content type slug>.yml
//! public/samples/**                       content assets
//! public/{stylesheets,javascripts,..}/**  theme assets
//! ```

mod assets;
mod content_entries;
mod content_types;
mod pages;
mod site;
mod snippets;

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use mounter_core::{Locale, MountingPoint};

use crate::config::ReaderConfig;
use crate::error::{io_err, yaml_err, ReaderError};
use crate::reader::ResourceReader;
use crate::runner::Runner;

/// Extensions of template files, outermost last.
const TEMPLATE_EXTENSIONS: &[&str] = &["liquid", "haml"];

/// Builds a mounting point from a site directory.
#[derive(Debug, Clone)]
pub struct FileSystemReader {
    root: PathBuf,
}

impl FileSystemReader {
    /// Validate `config.path` and prepare a reader rooted there.
    pub fn new(config: &ReaderConfig) -> Result<Self, ReaderError> {
        Ok(Self {
            root: config.site_path()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// One reader per resource kind.
    pub fn readers(&self) -> Vec<Box<dyn ResourceReader>> {
        vec![
            Box::new(site::SiteReader::new(&self.root)),
            Box::new(assets::ContentAssetsReader::new(&self.root)),
            Box::new(content_types::ContentTypesReader::new(&self.root)),
            Box::new(assets::ThemeAssetsReader::new(&self.root)),
            Box::new(snippets::SnippetsReader::new(&self.root)),
            Box::new(content_entries::ContentEntriesReader::new(&self.root)),
            Box::new(pages::PagesReader::new(&self.root)),
        ]
    }

    pub fn runner(&self, config: &ReaderConfig) -> Runner<'static> {
        Runner::new(self.readers()).force_locales(config.locales.clone())
    }

    /// Validate the configuration and read the whole site.
    pub fn run(config: &ReaderConfig) -> Result<MountingPoint, ReaderError> {
        Self::new(config)?.runner(config).run()
    }
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

pub(crate) fn read_file(path: &Path) -> Result<String, ReaderError> {
    fs::read_to_string(path).map_err(|e| io_err(path, e))
}

pub(crate) fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ReaderError> {
    let source = read_file(path)?;
    serde_yaml::from_str(&source).map_err(|e| yaml_err(path, e))
}

/// `/`-joined path of `path` relative to `base`.
pub(crate) fn relative_path(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<&str> = relative.iter().filter_map(|part| part.to_str()).collect();
    Some(parts.join("/"))
}

/// A template file name split into its base path and optional locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TemplateName {
    pub base: String,
    pub locale: Option<Locale>,
}

/// Parse `about-us/john-doe.fr.liquid` into `about-us/john-doe` and `fr`.
///
/// Returns `None` for files that are not templates. A middle extension is
/// only a locale when it is one of `locales`.
pub(crate) fn template_name(relative: &str, locales: &[Locale]) -> Option<TemplateName> {
    let mut stem = relative;
    let mut stripped = false;
    while let Some((head, extension)) = stem.rsplit_once('.') {
        if !TEMPLATE_EXTENSIONS.contains(&extension) || head.ends_with('/') || head.is_empty() {
            break;
        }
        stem = head;
        stripped = true;
    }
    if !stripped {
        return None;
    }

    let (dir, file) = match stem.rsplit_once('/') {
        Some((dir, file)) => (Some(dir), file),
        None => (None, stem),
    };
    let (file, locale) = match file.rsplit_once('.') {
        Some((name, suffix)) if locales.iter().any(|l| l.as_str() == suffix) => {
            (name, Some(Locale::from(suffix)))
        }
        _ => (file, None),
    };
    let base = match dir {
        Some(dir) => format!("{dir}/{file}"),
        None => file.to_string(),
    };
    Some(TemplateName { base, locale })
}

/// Split `---`-delimited YAML front matter from a template body.
pub(crate) fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let Some(rest) = source.strip_prefix("---") else {
        return (None, source);
    };
    let Some(rest) = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) else {
        return (None, source);
    };
    let end = if rest.starts_with("---") {
        Some(0)
    } else {
        rest.find("\n---").map(|index| index + 1)
    };
    let Some(end) = end else {
        return (None, source);
    };
    let header = &rest[..end];
    let body = rest[end + 3..].split_once('\n').map(|(_, body)| body).unwrap_or("");
    (Some(header), body)
}
