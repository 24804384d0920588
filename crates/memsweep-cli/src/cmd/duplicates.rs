use crate::output::print_json;
use anyhow::Context;
use memsweep_core::config::{Config, SweepOptions};
use memsweep_core::duplicates::{extract_records, find_duplicates_with};
use std::path::Path;

pub fn run(root: &Path, file: &Path, threshold: Option<f64>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let mut opts = SweepOptions::from_config(&config);
    if let Some(threshold) = threshold {
        opts.similarity_threshold = threshold;
    }
    opts.validate()?;

    let document = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let record_count = extract_records(&document, &config.records).len();
    let candidates = find_duplicates_with(&document, &config.records, opts.similarity_threshold);

    if json {
        print_json(&serde_json::json!({
            "document": file,
            "records": record_count,
            "threshold": opts.similarity_threshold,
            "candidates": candidates,
        }))?;
        return Ok(());
    }

    if candidates.is_empty() {
        println!(
            "No duplicates among {record_count} record(s) at similarity >= {:.2}",
            opts.similarity_threshold
        );
        return Ok(());
    }

    for c in &candidates {
        println!(
            "[{}] {} <-> {} (similarity {:.2})",
            c.record_a.category, c.record_a.id, c.record_b.id, c.similarity
        );
        println!("  {}: {}", c.record_a.id, c.record_a.description);
        println!("  {}: {}", c.record_b.id, c.record_b.description);
    }
    println!();
    println!(
        "{} candidate pair(s) among {record_count} record(s); review and merge by hand",
        candidates.len()
    );
    Ok(())
}
