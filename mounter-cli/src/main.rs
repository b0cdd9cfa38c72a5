//! Mounter — inspect a site's content graph from the CMS API or a site directory.
//!
//! # Usage
//!
//! ```text
//! mounter inspect (--path <dir> | --uri <uri> --email <email> --password <pw> | --profile <env>) [--json]
//! mounter tree <source> [--locale <locale>]...
//! mounter entries <source> <content_type> [--locale <locale>] [--json]
//! ```

mod commands;
mod http;
mod source;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{entries::EntriesArgs, inspect::InspectArgs, tree::TreeArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "mounter",
    version,
    about = "Build and inspect the content graph of a site",
    long_about = None,
)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize every resource of a site.
    Inspect(InspectArgs),

    /// Print the page tree, once per locale.
    Tree(TreeArgs),

    /// List the entries of a content type.
    Entries(EntriesArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Inspect(args) => args.run(),
        Commands::Tree(args) => args.run(),
        Commands::Entries(args) => args.run(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
