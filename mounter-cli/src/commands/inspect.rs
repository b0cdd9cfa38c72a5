//! `mounter inspect` — summary of every resource of a site.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::{json, Map, Value};
use tabled::{settings::Style, Table, Tabled};

use mounter_core::{MountingPoint, ResourceKind};

use crate::source::SourceArgs;

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON instead of a human-readable table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Resource")]
    resource: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
}

impl InspectArgs {
    pub fn run(self) -> Result<()> {
        let mounting_point = self.source.mount(&ResourceKind::ALL)?;

        if self.json {
            return print_json(&mounting_point);
        }

        if let Some(site) = mounting_point.site() {
            let locales: Vec<String> = mounting_point.locales().iter().map(|l| l.to_string()).collect();
            println!("{} ({})", site.name.bold(), locales.join(", "));
        }

        let rows: Vec<ResourceRow> = counts(&mounting_point)
            .into_iter()
            .map(|(kind, count)| ResourceRow {
                resource: kind.as_str(),
                count,
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
        Ok(())
    }
}

fn counts(mounting_point: &MountingPoint) -> Vec<(ResourceKind, usize)> {
    mounting_point
        .registered()
        .into_iter()
        .filter_map(|kind| mounting_point.resource(kind).map(|r| (kind, r.len())))
        .collect()
}

fn print_json(mounting_point: &MountingPoint) -> Result<()> {
    let resources: Map<String, Value> = counts(mounting_point)
        .into_iter()
        .map(|(kind, count)| (kind.as_str().to_string(), json!(count)))
        .collect();
    let payload = json!({
        "site": mounting_point.site().map(|site| json!({
            "name": site.name,
            "locales": mounting_point.locales(),
        })),
        "resources": resources,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize summary")?
    );
    Ok(())
}
