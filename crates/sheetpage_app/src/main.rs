//! sheetpage: render product pages from a published spreadsheet.

mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use page_logging::page_info;
use sheetpage_engine::{PageOutcome, SiteBuilder};

#[derive(Parser)]
#[command(name = "sheetpage", version, about = "Render product pages from a published spreadsheet")]
struct Cli {
    /// Path to the RON site config.
    #[arg(short, long, default_value = "sheetpage.ron")]
    config: PathBuf,

    /// Also write logs to ./sheetpage.log.
    #[arg(long)]
    log_file: bool,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the sheet and build every product page plus shared assets.
    Build,
    /// Render and write the page for one location path.
    Page {
        /// Location path or slug, e.g. `/sermorelin/`.
        path: String,
    },
    /// Fetch the sheet and report what a build would produce.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let destination = if cli.log_file {
        logging::LogDestination::Both
    } else {
        logging::LogDestination::Terminal
    };
    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    logging::initialize(destination, level);

    let site = config::load(&cli.config)
        .with_context(|| format!("loading site config {}", cli.config.display()))?;
    page_info!("site config loaded from {}", cli.config.display());
    let builder = SiteBuilder::new(site)?;

    match cli.command {
        Command::Build => {
            let summary = builder.build_site().await?;
            println!("Built {} pages into {}", summary.pages.len(), summary.output_dir.display());
            for page in &summary.pages {
                println!("  {:<30} {:>7} B  {}", page.filename, page.bytes, page.title);
            }
            println!("  assets: {}", summary.assets.join(", "));
        }
        Command::Page { path } => {
            let built = builder.build_location(&path).await?;
            match &built.outcome {
                PageOutcome::Rendered(page) => {
                    println!("Rendered {} -> {}", page.slug, built.path.display());
                }
                PageOutcome::NotFound { slug, .. } => {
                    println!("No product data found for: {slug}");
                    println!("Wrote not-found page -> {}", built.path.display());
                }
            }
        }
        Command::Check => {
            let report = builder.inspect().await?;
            println!("Sheet: {}", report.source_url);
            println!(
                "{} data rows, {} columns, {} products",
                report.data_rows,
                report.columns,
                report.products.len()
            );
            for product in &report.products {
                println!(
                    "  {:<24} rows {:>2}  benefits {:>2}  steps {:>2}  for {:>2}  not-for {:>2}  faq {:>2}",
                    product.slug,
                    product.rows,
                    product.benefits,
                    product.steps,
                    product.for_whom,
                    product.not_for,
                    product.faq
                );
            }
        }
    }

    Ok(())
}
