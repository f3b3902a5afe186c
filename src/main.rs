mod directory;
mod fetch;
mod merge;
mod model;
mod output;
mod parser;
mod pipeline;
mod sources;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::fetch::{Source, DEFAULT_TIMEOUT_SECS};
use crate::output::DEFAULT_OUTPUT;

#[derive(Parser)]
#[command(
    name = "tu_buildings",
    about = "Builds the TU Darmstadt building directory from the university's campus pages"
)]
struct Cli {
    /// Defaults to `build` with default options
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all pages, parse, merge and write the directory JSON
    Build {
        /// Output file (overwritten)
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Read pages from a snapshot directory instead of the network
        #[arg(long)]
        from_dir: Option<PathBuf>,
        #[command(flatten)]
        net: NetArgs,
    },
    /// Download all source pages into a snapshot directory
    Fetch {
        #[arg(short, long)]
        dir: PathBuf,
        #[command(flatten)]
        net: NetArgs,
    },
    /// Buildings table in display order
    List {
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        input: PathBuf,
        /// Filter by name, address or building code
        #[arg(short, long)]
        search: Option<String>,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// One building with its departments
    Show {
        /// Building code, e.g. "S1|03"
        code: String,
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        input: PathBuf,
    },
}

#[derive(clap::Args, Clone)]
struct NetArgs {
    /// Per-request timeout in seconds (0 waits forever)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
    /// Pages fetched at once; output is identical for any value
    #[arg(short = 'j', long, default_value_t = 1)]
    concurrency: usize,
}

impl Default for NetArgs {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            concurrency: 1,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Build {
        output: PathBuf::from(DEFAULT_OUTPUT),
        from_dir: None,
        net: NetArgs::default(),
    });

    match command {
        Commands::Build { output, from_dir, net } => {
            let source = match from_dir {
                Some(dir) => Source::dir(dir),
                None => Source::http(net.timeout)?,
            };
            let pages = fetch::fetch_all(&source, &sources::all_urls(), net.concurrency).await?;
            let buildings = pipeline::build_directory(&pages)?;
            output::write_directory(&output, &buildings)?;
            println!(
                "Downloaded, parsed, and saved {} buildings to {}",
                buildings.len(),
                output.display()
            );
        }
        Commands::Fetch { dir, net } => {
            let source = Source::http(net.timeout)?;
            let pages = fetch::fetch_all(&source, &sources::all_urls(), net.concurrency).await?;
            fetch::save_snapshot(&dir, &pages)?;
            println!("Saved {} pages to {}", pages.len(), dir.display());
        }
        Commands::List { input, search, limit } => {
            let buildings = output::read_directory(&input)?;
            let mut rows = match search.as_deref() {
                Some(q) => directory::search(&buildings, q),
                None => buildings.iter().collect(),
            };
            directory::sort_for_display(&mut rows);
            if rows.is_empty() {
                println!("No buildings found.");
                return Ok(());
            }

            println!(
                "{:>3} | {:<8} | {:<32} | {:<28} | {:>5}",
                "#", "Code", "Name", "Address", "Deps"
            );
            println!("{}", "-".repeat(88));
            for (i, b) in rows.iter().take(limit).enumerate() {
                let deps = b.departments.as_ref().map_or(0, Vec::len);
                println!(
                    "{:>3} | {:<8} | {:<32} | {:<28} | {:>5}",
                    i + 1,
                    b.code,
                    truncate(&b.name, 32),
                    truncate(&b.address, 28),
                    deps
                );
            }
            println!("\n{} of {} buildings", rows.len().min(limit), rows.len());
        }
        Commands::Show { code, input } => {
            let buildings = output::read_directory(&input)?;
            let b = directory::find(&buildings, &code)
                .with_context(|| format!("Building {} not found in {}", code, input.display()))?;
            println!("{}  {}", b.code, b.name);
            println!("{}, {}", b.address, b.city_line);
            if let Some(deps) = b.departments.as_ref().filter(|d| !d.is_empty()) {
                println!();
                for d in deps {
                    match &d.link {
                        Some(link) => println!("  - {} <{}>", d.name, link),
                        None => println!("  - {}", d.name),
                    }
                }
            }
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
