//! `mounter entries` — entries of one content type.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tabled::{settings::Style, Table, Tabled};

use mounter_core::{with_locale, Locale, ResourceKind};

use crate::source::SourceArgs;

#[derive(Args, Debug)]
pub struct EntriesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Slug of the content type.
    pub content_type: String,

    /// Locale to render the entries in (default locale of the site if omitted).
    #[arg(long)]
    pub locale: Option<String>,

    /// Output as JSON instead of a human-readable table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Label")]
    label: String,
}

impl EntriesArgs {
    pub fn run(self) -> Result<()> {
        let mounting_point = self.source.mount(&[
            ResourceKind::ContentAssets,
            ResourceKind::ContentTypes,
            ResourceKind::ContentEntries,
        ])?;

        let content_type = mounting_point.content_type(&self.content_type).with_context(|| {
            let known: Vec<&str> = mounting_point
                .content_types()
                .map(|types| types.keys().map(String::as_str).collect())
                .unwrap_or_default();
            format!("unknown content type '{}' (known: {})", self.content_type, known.join(", "))
        })?;
        let locale = self
            .locale
            .as_deref()
            .map(Locale::from)
            .unwrap_or_else(|| mounting_point.default_locale());

        with_locale(locale, || -> Result<()> {
            let entries = mounting_point.entries_of(&content_type.slug);

            if self.json {
                let values: Vec<Value> = entries.map(|e| e.to_json(content_type, &mounting_point)).collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&values).context("failed to serialize entries")?
                );
                return Ok(());
            }

            let rows: Vec<EntryRow> = entries
                .map(|entry| EntryRow {
                    position: entry.position.map(|p| p.to_string()).unwrap_or_default(),
                    slug: entry.slug().unwrap_or("-").to_string(),
                    label: entry.label(content_type).unwrap_or("-").to_string(),
                })
                .collect();
            println!("{} ({} entries)", content_type.name, rows.len());
            println!("{}", Table::new(rows).with(Style::rounded()));
            Ok(())
        })
    }
}
