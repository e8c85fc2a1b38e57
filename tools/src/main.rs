//! rfm-runner: headless RFM segmentation over a retail ledger.
//!
//! Usage:
//!   rfm-runner --input data.csv [--config policy.json] [--out payload.json]
//!   rfm-runner --synthetic 2000 --seed 12345 --profiles

mod ingest;

use anyhow::{Context, Result};
use rfm_core::{
    synthetic::SyntheticLedger, RfmConfig, RfmPipeline, RfmRun, TransactionTable,
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let synthetic = parse_arg(&args, "--synthetic", 0usize);
    let show_profiles = args.iter().any(|a| a == "--profiles");
    let input = flag_value(&args, "--input");
    let out = flag_value(&args, "--out");

    let config = match flag_value(&args, "--config") {
        Some(path) => RfmConfig::load(path)?,
        None => RfmConfig::standard(),
    };
    let pipeline = RfmPipeline::new(config)?;

    let (table, source): (TransactionTable, String) = match input {
        Some(path) => (ingest::load_ledger(Path::new(path))?, path.to_string()),
        None if synthetic > 0 => (
            SyntheticLedger::new(synthetic, seed).table(),
            format!("synthetic ({synthetic} customers, seed {seed})"),
        ),
        None => anyhow::bail!("either --input <csv> or --synthetic <customers> is required"),
    };

    println!("rfm-runner");
    println!("  source:    {source}");
    println!("  rows:      {}", table.len());
    println!();

    let run_id = flag_value(&args, "--run-id")
        .map(str::to_string)
        .unwrap_or_else(|| format!("run-{seed}"));

    // A failed run renders nothing.
    let run = pipeline.run(run_id, &table)?;

    print_summary(&run);
    if show_profiles {
        print_profiles(&run)?;
    }

    let json = run.payload().to_json()?;
    match out {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("Failed to write {path}"))?;
            println!("Payload written to {path}");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn print_summary(run: &RfmRun) {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:     {}", run.run_id);
    println!("  reference:  {}", run.metrics.reference);
    println!("  customers:  {}", run.customer_count());
    println!("  bin edges:  {:?}", run.segmentation.edges);
    println!();
    println!("=== SEGMENTS ===");
    for count in &run.report.counts {
        println!("  {:<22} {:>7}", count.segment.label(), count.customers);
    }
    println!();
    println!("=== MONETARY RANKING ===");
    for bar in &run.report.ranking {
        println!("  {:<22} {:>14.2}", bar.segment.label(), bar.monetary);
    }
    println!();
}

fn print_profiles(run: &RfmRun) -> Result<()> {
    println!("=== CUSTOMERS ===");
    println!(
        "  {:<12} {:>7} {:>5} {:>12}  R F M  {:>3}  segment",
        "customer", "recency", "freq", "monetary", "rfm"
    );
    for p in run.profiles()? {
        println!(
            "  {:<12} {:>7} {:>5} {:>12.2}  {} {} {}  {:>3}  {}",
            p.customer_id.to_string(),
            p.recency,
            p.frequency,
            p.monetary,
            p.scores.recency,
            p.scores.frequency,
            p.scores.monetary,
            p.composite,
            p.segment
        );
    }
    println!();
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
