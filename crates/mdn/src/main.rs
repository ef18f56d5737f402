//! mdn CLI - markdown to HTML for web pages and emails.
//!
//! Provides commands for:
//! - `render`: Convert a document to page or email HTML
//! - `frontmatter`: Print a document's frontmatter as JSON
//! - `describe`: Print a short plain-text description of a document
//! - `themes`: List the bundled highlighting themes

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{DescribeArgs, FrontmatterArgs, RenderArgs};
use output::Output;

/// mdn - markdown to HTML for web pages and emails.
#[derive(Parser)]
#[command(name = "mdn", version, about)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a markdown document to HTML.
    Render(RenderArgs),
    /// Print the document's frontmatter as JSON.
    Frontmatter(FrontmatterArgs),
    /// Print a plain-text description of the document.
    Describe(DescribeArgs),
    /// List bundled syntax highlighting themes.
    Themes,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Frontmatter(args) => args.execute(),
        Commands::Describe(args) => args.execute(),
        Commands::Themes => commands::themes::execute(),
    };

    if let Err(err) = result {
        output.failed(&err);
        std::process::exit(1);
    }
}
