// ABOUTME: Inline-script extraction strategy scanning embedded script blocks for puzzle data.
// ABOUTME: Filters blocks by keyword, locates a grid key by regex, and captures the array literal.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use super::Strategy;

/// Locates a grid-carrying key followed by an array literal. The regex only
/// anchors the opening bracket; the array itself is captured by a balanced
/// scan so nested rows survive intact.
static GRID_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""(puzzle|board|grid)"\s*:\s*\["#).unwrap());

static SCRIPT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("script").unwrap());

/// Scans `<script>` blocks mentioning "sudoku" or "puzzle" for an embedded
/// grid. Highest-priority strategy.
pub struct InlineScriptScan;

impl Strategy for InlineScriptScan {
    fn name(&self) -> &'static str {
        "inline-script"
    }

    fn attempt(&self, doc: &Html) -> Option<Value> {
        for script in doc.select(&SCRIPT_SELECTOR) {
            let text = script.text().collect::<String>();
            let lower = text.to_lowercase();
            if !lower.contains("sudoku") && !lower.contains("puzzle") {
                continue;
            }
            if let Some(value) = scan_block(&text) {
                return Some(value);
            }
        }
        None
    }
}

/// Try every grid-key occurrence in one script block; unparseable fragments
/// are skipped rather than aborting the block.
fn scan_block(text: &str) -> Option<Value> {
    for caps in GRID_KEY_RE.captures_iter(text) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        // The match ends one byte past the opening '['.
        let open = whole.end() - 1;
        let Some(fragment) = balanced_array(text, open) else {
            continue;
        };
        match serde_json::from_str::<Value>(fragment) {
            Ok(array) => {
                let mut keyed = serde_json::Map::new();
                keyed.insert(key.as_str().to_string(), array);
                return Some(Value::Object(keyed));
            }
            Err(err) => {
                debug!(%err, "skipping unparseable array fragment");
            }
        }
    }
    None
}

/// Slice of `text` spanning the array literal opening at byte `open`.
///
/// String-aware so brackets inside quoted values do not unbalance the scan.
/// Returns `None` when the array never closes.
fn balanced_array(text: &str, open: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[open..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
