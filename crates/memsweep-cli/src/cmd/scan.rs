use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::Utc;
use memsweep_core::config::{Config, SweepOptions};
use memsweep_core::paths::display_relative;
use memsweep_core::report::format_bytes;
use memsweep_core::sweep;
use std::path::Path;

pub fn run(root: &Path, days: Option<u32>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let mut opts = SweepOptions::from_config(&config);
    if let Some(days) = days {
        opts.age_threshold_days = days;
    }
    opts.validate()?;

    let scanned = sweep::scan(root, &config, opts.age_threshold_days, Utc::now())?;

    if json {
        print_json(&scanned)?;
        return Ok(());
    }

    if scanned.classifications.is_empty() {
        println!("No artifacts under {}", root.display());
    } else {
        let rows: Vec<Vec<String>> = scanned
            .classifications
            .iter()
            .map(|c| {
                vec![
                    if c.is_stale { "stale" } else { "active" }.to_string(),
                    c.reason.to_string(),
                    c.effective_at.format("%Y-%m-%d %H:%M").to_string(),
                    format_bytes(c.artifact.size_bytes),
                    display_relative(root, &c.artifact.path),
                ]
            })
            .collect();
        print_table(&["STATE", "SOURCE", "AS OF", "SIZE", "PATH"], &rows);
    }

    let stale = scanned
        .classifications
        .iter()
        .filter(|c| c.is_stale)
        .count();
    println!();
    println!(
        "{stale} stale of {} (older than {} days); {} knowledge document(s)",
        scanned.classifications.len(),
        opts.age_threshold_days,
        scanned.knowledge_documents.len()
    );

    for err in &scanned.errors {
        eprintln!("warning: {}: {}", display_relative(root, &err.file), err.message);
    }

    Ok(())
}
