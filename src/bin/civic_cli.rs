use anyhow::{bail, Result};
use serde_json::json;
use std::env;

use civicbot::{classify_complaint, detect_language};

fn main() -> Result<()> {
    let text = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if text.trim().is_empty() {
        bail!("usage: civic_cli <complaint text>");
    }

    let language = detect_language(&text);
    let classification = classify_complaint(&text);

    let report = json!({
        "language": language,
        "category": classification.category,
        "confidence": classification.confidence(),
        "scoreMap": classification.score_map,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
