// ABOUTME: Multi-strategy puzzle extraction with a guaranteed fallback record.
// ABOUTME: Strategies run in priority order; the first raw value that normalizes wins.

//! Best-effort extraction of puzzle data from a fetched page.
//!
//! Strategies implement [`Strategy`] and are tried in priority order: the
//! inline-script scan first, then the data-attribute scan. Each strategy
//! swallows per-candidate parse failures; when none yields a value that
//! normalizes into a record, the fixed sample puzzle is returned. Adding a
//! new strategy is a pure extension of the list in [`extract`].

use scraper::Html;
use serde_json::Value;
use tracing::debug;

use crate::record::PuzzleRecord;

mod attr_scan;
mod script_scan;

pub use attr_scan::DataAttributeScan;
pub use script_scan::InlineScriptScan;

/// One ordered attempt at locating puzzle data within a page.
pub trait Strategy {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Best-effort scan of the parsed page.
    ///
    /// `None` means "no match". Implementations must treat unparseable
    /// candidates as non-matches rather than aborting the scan.
    fn attempt(&self, doc: &Html) -> Option<Value>;
}

/// Extract a puzzle record from raw page HTML.
///
/// Total: when no strategy yields a usable value, the fixed sample record
/// is returned, so a fetched page always produces a record.
pub fn extract(html: &str) -> PuzzleRecord {
    let doc = Html::parse_document(html);
    let strategies: [&dyn Strategy; 2] = [&InlineScriptScan, &DataAttributeScan];

    for strategy in strategies {
        let Some(raw) = strategy.attempt(&doc) else {
            continue;
        };
        match PuzzleRecord::from_raw(&raw) {
            Some(record) => {
                debug!(strategy = strategy.name(), "puzzle data extracted");
                return record;
            }
            None => {
                debug!(
                    strategy = strategy.name(),
                    "raw value did not normalize, trying next strategy"
                );
            }
        }
    }

    debug!("no extraction strategy matched, using sample puzzle");
    PuzzleRecord::sample()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_from_matching_script_block() {
        let html = r#"<html><body>
            <script>
                window.gameState = { "puzzle": [[1, 0, 2], [2, 1, 0], [0, 2, 1]], "difficulty": "easy" };
            </script>
        </body></html>"#;

        let record = extract(html);
        assert_eq!(
            record.puzzle,
            vec![vec![1, 0, 2], vec![2, 1, 0], vec![0, 2, 1]]
        );
        // The script fragment carries only the grid key, so difficulty
        // falls back to the default.
        assert_eq!(record.difficulty, "medium");
        assert!(!record.is_fallback());
    }

    #[test]
    fn test_extract_nested_rows_survive() {
        // The array capture must span all rows, not stop at the first ']'.
        let html = r#"<script>var sudoku = {"board": [[0, 6, 0, 0, 3, 0], [5, 0, 0, 0, 0, 4]]};</script>"#;

        let record = extract(html);
        assert_eq!(
            record.puzzle,
            vec![vec![0, 6, 0, 0, 3, 0], vec![5, 0, 0, 0, 0, 4]]
        );
    }

    #[test]
    fn test_extract_ignores_scripts_without_keywords() {
        // The grid key alone does not qualify a block; it must mention
        // "sudoku" or "puzzle".
        let html = r#"<script>var state = {"grid": [[1, 2], [2, 1]]};</script>"#;

        let record = extract(html);
        assert!(record.is_fallback());
    }

    #[test]
    fn test_extract_from_data_attribute() {
        let html = r#"<html><body>
            <div class="game" data-puzzle='{"grid": [[1, 0], [0, 1]], "difficulty": "hard"}'></div>
        </body></html>"#;

        let record = extract(html);
        assert_eq!(record.puzzle, vec![vec![1, 0], vec![0, 1]]);
        assert_eq!(record.difficulty, "hard");
    }

    #[test]
    fn test_extract_section_data_attribute() {
        let html = r#"<section data-puzzle='{"puzzle": [[2, 0], [0, 2]]}'></section>"#;

        let record = extract(html);
        assert_eq!(record.puzzle, vec![vec![2, 0], vec![0, 2]]);
        assert_eq!(record.difficulty, "medium");
    }

    #[test]
    fn test_extract_script_strategy_wins_over_attribute() {
        let html = r#"
            <script>var puzzle = {"puzzle": [[1, 1], [1, 1]]};</script>
            <div data-puzzle='{"puzzle": [[2, 2], [2, 2]]}'></div>
        "#;

        let record = extract(html);
        assert_eq!(record.puzzle, vec![vec![1, 1], vec![1, 1]]);
    }

    #[test]
    fn test_extract_empty_page_falls_back() {
        let record = extract("");
        assert_eq!(record.puzzle, grid::sample_grid());
        assert_eq!(record.size, Some(6));
        assert_eq!(record.difficulty, "medium");
        assert!(record.note.is_some());
    }

    #[test]
    fn test_extract_plain_page_falls_back() {
        let record = extract("<html><body><h1>Nothing here</h1></body></html>");
        assert!(record.is_fallback());
        for row in &record.puzzle {
            assert!(row.iter().all(|&v| v <= 6));
        }
    }

    #[test]
    fn test_extract_malformed_fragment_does_not_abort() {
        // The first block matches the keyword filter but its fragment is not
        // valid JSON; the scan must continue to the attribute strategy.
        let html = r#"
            <script>var puzzle = {"puzzle": [[1, oops], [2]]};</script>
            <div data-puzzle='{"board": [[3, 0], [0, 3]]}'></div>
        "#;

        let record = extract(html);
        assert_eq!(record.puzzle, vec![vec![3, 0], vec![0, 3]]);
    }

    #[test]
    fn test_extract_malformed_everything_still_returns_record() {
        let html = r#"
            <script>var puzzle = {"board": [[1, </script>
            <div data-puzzle="{not json}"></div>
        "#;

        let record = extract(html);
        assert!(record.is_fallback());
    }

    #[test]
    fn test_extract_ragged_grid_falls_through() {
        // Parses fine but fails normalization; the attribute strategy is
        // still consulted.
        let html = r#"
            <script>var sudoku = {"puzzle": [[1, 2], [3]]};</script>
            <div data-puzzle='{"grid": [[4, 0], [0, 4]]}'></div>
        "#;

        let record = extract(html);
        assert_eq!(record.puzzle, vec![vec![4, 0], vec![0, 4]]);
    }
}
