// ABOUTME: Data-attribute extraction strategy scanning container elements for puzzle data.
// ABOUTME: Parses data-puzzle attribute values as JSON, skipping unparseable or empty candidates.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use super::Strategy;

static ATTR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div[data-puzzle], section[data-puzzle]").unwrap());

const PUZZLE_ATTR: &str = "data-puzzle";

/// Scans generic container elements carrying a `data-puzzle` attribute.
/// Consulted after the inline-script scan.
pub struct DataAttributeScan;

impl Strategy for DataAttributeScan {
    fn name(&self) -> &'static str {
        "data-attribute"
    }

    fn attempt(&self, doc: &Html) -> Option<Value> {
        for container in doc.select(&ATTR_SELECTOR) {
            let Some(raw) = container.value().attr(PUZZLE_ATTR) else {
                continue;
            };
            match serde_json::from_str::<Value>(raw) {
                Ok(value) if !is_vacant(&value) => return Some(value),
                Ok(_) => {}
                Err(err) => {
                    debug!(%err, "skipping unparseable data-puzzle attribute");
                }
            }
        }
        None
    }
}

/// Null and empty containers carry no puzzle data.
fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
