use chrono::{DateTime, Utc};
use outlink_engine::FetchResult;
use regex::Regex;
use serde_json::json;

/// Compiles a user scope so it has to match a whole link.
pub fn compile_scope(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

/// One JSON object per page. Outlinks are sorted so output is reproducible.
pub fn json_line(result: &FetchResult, extracted_at: DateTime<Utc>) -> String {
    let mut outlinks: Vec<&str> = result.outlinks().iter().map(String::as_str).collect();
    outlinks.sort_unstable();
    json!({
        "source_url": result.source_url(),
        "outlinks": outlinks,
        "extracted_utc": extracted_at.to_rfc3339(),
    })
    .to_string()
}
