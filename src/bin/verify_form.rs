//! Verify the button states of a filled PDF form
//!
//! Usage:
//!   cargo run --release --bin verify_form -- <filled.pdf> <answers.json>
//!   cargo run --release --bin verify_form -- <filled.pdf> <answers.json> --overrides button_overrides.json
//!
//! Exit status: 0 when every group matches, 1 on mismatches or a failed read,
//! 2 on missing input or bad usage.

use pdf_acrofill::config::FillConfig;
use pdf_acrofill::filler::FormFiller;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let mut positional = Vec::new();
    let mut overrides = None;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--overrides" => {
                i += 1;
                if i < args.len() {
                    overrides = Some(PathBuf::from(&args[i]));
                }
            },
            "--verbose" | "-v" => verbose = true,
            other => positional.push(PathBuf::from(other)),
        }
        i += 1;
    }

    if positional.len() != 2 {
        eprintln!("Usage: verify_form <filled.pdf> <answers.json> [--overrides PATH] [--verbose]");
        std::process::exit(2);
    }
    let filled = positional.remove(0);
    let answers = positional.remove(0);

    // The filled document is the one read back, so it doubles as input and output
    let mut config = FillConfig::new(filled.clone(), answers).with_output(filled);
    if let Some(overrides) = overrides {
        config = config.with_overrides(overrides);
    }

    let report = match FormFiller::new(config).verify() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        },
    };

    for result in &report.results {
        if !result.passed {
            println!("Mismatch: {}", result);
        } else if verbose {
            println!("OK: {}", result);
        }
    }

    println!("Checked groups: {}", report.checked());
    println!("Groups with mismatches: {}", report.mismatch_count());

    std::process::exit(if report.is_success() { 0 } else { 1 });
}
