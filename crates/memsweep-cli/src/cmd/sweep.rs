use crate::output::print_json;
use anyhow::Context;
use chrono::Utc;
use memsweep_core::config::{Config, SweepOptions};
use memsweep_core::types::RunOutcome;
use memsweep_core::{report, sweep};
use std::path::Path;

pub struct SweepArgs {
    pub days: Option<u32>,
    pub consolidate: bool,
    pub dry_run: bool,
    pub threshold: Option<f64>,
    pub no_report: bool,
}

pub fn run(root: &Path, args: SweepArgs, json: bool) -> anyhow::Result<RunOutcome> {
    let mut config = Config::load(root).context("failed to load config")?;
    if args.no_report {
        config.write_report = false;
    }

    let mut opts = SweepOptions::from_config(&config);
    opts.consolidate = args.consolidate;
    opts.dry_run = args.dry_run;
    if let Some(days) = args.days {
        opts.age_threshold_days = days;
    }
    if let Some(threshold) = args.threshold {
        opts.similarity_threshold = threshold;
    }

    let mut result = sweep::run(root, &config, &opts, Utc::now())?;
    let report_path = sweep::write_report(&config, &mut result);

    if json {
        print_json(&serde_json::json!({
            "outcome": result.outcome(),
            "report_path": report_path,
            "result": result,
        }))?;
    } else {
        print!("{}", report::render(&result));
        if let Some(path) = &report_path {
            println!();
            println!("Report written to {}", path.display());
        }
    }

    Ok(result.outcome())
}
