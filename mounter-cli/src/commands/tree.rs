//! `mounter tree` — page tree as seen from each locale.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use mounter_core::{with_locale, Locale, Page, PageTree, ResourceKind};

use crate::source::SourceArgs;

#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Locale(s) to print; every site locale when omitted.
    #[arg(long = "locale")]
    pub shown_locales: Vec<String>,
}

impl TreeArgs {
    pub fn run(self) -> Result<()> {
        let mounting_point = self
            .source
            .mount(&[ResourceKind::ContentAssets, ResourceKind::ContentTypes, ResourceKind::Pages])?;
        let pages = mounting_point.pages().context("no page was read")?;

        let locales: Vec<Locale> = if self.shown_locales.is_empty() {
            mounting_point.locales()
        } else {
            self.shown_locales.iter().map(|l| Locale::from(l.as_str())).collect()
        };

        for locale in locales {
            println!("{}", format!("[{locale}]").bold());
            with_locale(locale, || {
                for page in pages.iter().map(|(_, p)| p).filter(|p| pages.parent(p).is_none()) {
                    print_page(pages, page, 0);
                }
            });
        }
        Ok(())
    }
}

fn print_page(pages: &PageTree, page: &Page, depth: usize) {
    let indent = "  ".repeat(depth);
    match (page.title(), page.fullpath()) {
        (Some(title), Some(fullpath)) => {
            let orphan = if depth == 0 && !page.is_root() {
                " (orphan)".red().to_string()
            } else {
                String::new()
            };
            println!("{indent}{title} {}{orphan}", format!("/{fullpath}").bright_black());
        }
        (title, _) => println!(
            "{indent}{} {}",
            title.unwrap_or(page.key()).dimmed(),
            "(not translated)".yellow()
        ),
    }
    for child in pages.children(page) {
        print_page(pages, child, depth + 1);
    }
}
