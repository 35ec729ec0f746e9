// ABOUTME: PuzzleRecord struct holding a normalized daily puzzle plus its metadata.
// ABOUTME: Provides raw-value normalization and the fixed fallback sample constructor.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::grid::{self, Grid};

/// Difficulty label applied when the source does not specify one.
pub const DEFAULT_DIFFICULTY: &str = "medium";

/// Raw object keys that may carry the grid, in precedence order.
pub const GRID_KEYS: [&str; 3] = ["puzzle", "board", "grid"];

const SAMPLE_NOTE: &str =
    "This is a sample Mini Sudoku (6x6) puzzle for testing. Real LinkedIn data requires authentication.";

/// A normalized daily puzzle, constructed once per run and then serialized.
///
/// `puzzle` is always non-empty and rectangular; `size` and `note` are only
/// present on fallback records and are omitted from the JSON output when
/// absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PuzzleRecord {
    pub date: String,
    pub puzzle: Grid,
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    pub scraped_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PuzzleRecord {
    /// Normalize a raw parsed object into a record.
    ///
    /// Selects the first present key among `puzzle`, `board`, `grid` as the
    /// grid; defaults `difficulty` to "medium"; stamps `date` and
    /// `scraped_at` from the clock. Returns `None` when no grid key is
    /// present or the grid fails coercion (non-integer cells, values outside
    /// `u8`, empty or ragged rows).
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let grid_value = GRID_KEYS.iter().find_map(|key| raw.get(*key))?;
        let puzzle = coerce_grid(grid_value)?;
        let difficulty = raw
            .get("difficulty")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_DIFFICULTY)
            .to_string();

        let now = Utc::now();
        Some(Self {
            date: now.format("%Y-%m-%d").to_string(),
            puzzle,
            difficulty,
            size: None,
            scraped_at: now.to_rfc3339(),
            note: None,
        })
    }

    /// The fixed fallback record: the sample 6x6 grid with an explanatory note.
    pub fn sample() -> Self {
        let now = Utc::now();
        Self {
            date: now.format("%Y-%m-%d").to_string(),
            puzzle: grid::sample_grid(),
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            size: Some(grid::SAMPLE_SIZE as u32),
            scraped_at: now.to_rfc3339(),
            note: Some(SAMPLE_NOTE.to_string()),
        }
    }

    /// Returns true if this record is the built-in fallback sample.
    pub fn is_fallback(&self) -> bool {
        self.note.is_some()
    }
}

/// Coerce a raw JSON value into a well-formed grid.
fn coerce_grid(value: &Value) -> Option<Grid> {
    let rows = value.as_array()?;
    let mut grid = Grid::with_capacity(rows.len());
    for row in rows {
        let cells = row.as_array()?;
        let mut out = Vec::with_capacity(cells.len());
        for cell in cells {
            let n = cell.as_u64()?;
            out.push(u8::try_from(n).ok()?);
        }
        grid.push(out);
    }
    grid::is_well_formed(&grid).then_some(grid)
}
