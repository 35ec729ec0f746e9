// ABOUTME: Main library entry point for the minigrid daily sudoku scraper.
// ABOUTME: Re-exports the public API: Scraper, ScraperBuilder, PuzzleRecord, ScrapeError, ErrorCode, Options.

//! minigrid - scrapes a daily Mini Sudoku page and saves the puzzle as JSON.
//!
//! This crate fetches the puzzle page, locates embedded puzzle data with a
//! sequence of best-effort extraction strategies (inline scripts first, then
//! data attributes), falls back to a fixed sample puzzle, and writes the
//! normalized record to `puzzles/sudoku_<date>.json` plus a `current.json`
//! mirror.
//!
//! # Example
//!
//! ```no_run
//! use minigrid_scraper::{ScrapeError, Scraper};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ScrapeError> {
//!     let scraper = Scraper::builder().build();
//!     let outcome = scraper.run().await?;
//!     println!("saved {}", outcome.paths.dated.display());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod extract;
pub mod grid;
pub mod options;
pub mod record;
pub mod resource;
pub mod store;

pub use crate::client::{ScrapeOutcome, Scraper};
pub use crate::error::{ErrorCode, ScrapeError};
pub use crate::extract::{extract, Strategy};
pub use crate::grid::Grid;
pub use crate::options::{Options, ScraperBuilder};
pub use crate::record::PuzzleRecord;
pub use crate::store::{save_record, SavedPaths};
