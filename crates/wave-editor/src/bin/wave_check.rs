//! Wave rule checker.
//!
//! Reads an exported annotation document (snapshot or collection form) and
//! prints the Elliott Wave rule report for every wave.
//!
//! Usage: wave-check <document.json> [--config PATH] [--json] [--strict]

use std::env;
use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde_json::json;
use wave_config::Config;
use wave_editor::document::parse_any;
use wave_editor::editor::validator_config;
use wave_rules::{Severity, Validator};

fn main() -> Result<ExitCode> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <document.json> [options]", args[0]);
        eprintln!("Options:");
        eprintln!("  --config PATH  Load thresholds from a TOML config (default: search standard locations)");
        eprintln!("  --json         Print the report as JSON");
        eprintln!("  --strict       Exit with status 2 if any rule fails with severity error");
        return Ok(ExitCode::FAILURE);
    }

    let document_path = &args[1];
    let mut config_path: Option<String> = None;
    let mut as_json = false;
    let mut strict = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                config_path = Some(args[i + 1].clone());
                i += 1;
            }
            "--json" => as_json = true,
            "--strict" => strict = true,
            other => anyhow::bail!("Unknown argument: {other}"),
        }
        i += 1;
    }

    let config = match &config_path {
        Some(path) => Config::load(path).with_context(|| format!("Failed to load config {path}"))?,
        None => Config::load_default(),
    };
    log::debug!("Rule thresholds: {:?}", config.rules);

    let text = fs::read_to_string(document_path)
        .with_context(|| format!("Failed to read {document_path}"))?;
    let snapshot = parse_any(&text).with_context(|| format!("Failed to parse {document_path}"))?;
    log::info!("Loaded {} waves from {}", snapshot.waves.len(), document_path);

    let validator = Validator::new(validator_config(&config.rules));
    let mut errors = 0usize;
    let mut report = Vec::with_capacity(snapshot.waves.len());

    for wave in &snapshot.waves {
        let results = validator.validate(wave);
        errors += results
            .iter()
            .filter(|r| !r.ok && r.severity == Severity::Error)
            .count();

        if as_json {
            report.push(json!({
                "id": wave.id,
                "kind": wave.kind,
                "points": wave.points.len(),
                "results": results,
            }));
        } else {
            let labels: Vec<&str> = wave.labels.iter().map(|l| l.as_str()).collect();
            println!("{} {} [{}]", wave.kind, wave.id, labels.join(" "));
            if results.is_empty() {
                println!("  (not enough points to check)");
            }
            for result in &results {
                println!("  {result}");
            }
        }
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        println!("{} waves checked, {} rule errors", snapshot.waves.len(), errors);
    }

    if strict && errors > 0 {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
