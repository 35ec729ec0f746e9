// ABOUTME: CLI binary for the minigrid daily sudoku scraper.
// ABOUTME: Runs one fetch-extract-save cycle and prints human-readable status lines.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use minigrid_scraper::{grid, Scraper};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "minigrid")]
#[command(about = "Scrape the daily Mini Sudoku puzzle and save it as JSON")]
struct Args {
    /// Page URL to scrape (defaults to the LinkedIn Mini Sudoku page)
    #[arg(long = "url")]
    url: Option<String>,

    /// Directory the puzzle files are written to
    #[arg(short = 'o', long = "out-dir", default_value = "puzzles")]
    out_dir: PathBuf,

    /// Request timeout in seconds
    #[arg(long = "timeout-secs", default_value_t = 30)]
    timeout_secs: u64,

    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,

    /// Suppress the banner and puzzle preview
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut builder = Scraper::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .allow_private_networks(args.allow_private_networks)
        .output_dir(&args.out_dir);
    if let Some(url) = &args.url {
        builder = builder.base_url(url);
    }
    let scraper = builder.build();

    if !args.quiet {
        println!("Mini Sudoku Scraper");
        println!("{}", "=".repeat(50));
    }
    println!("Fetching puzzle page...");

    match scraper.run().await {
        Ok(outcome) => {
            println!("\nPuzzle scraped successfully!");
            println!("Date: {}", outcome.record.date);
            println!("Difficulty: {}", outcome.record.difficulty);
            if let Some(note) = &outcome.record.note {
                println!("Note: {}", note);
            }
            if !args.quiet {
                println!("\n{}", grid::render(&outcome.record.puzzle));
            }
            println!("\nPuzzle saved to {}", outcome.paths.dated.display());
            println!("Current puzzle updated");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}
