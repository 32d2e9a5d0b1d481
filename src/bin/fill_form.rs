//! Fill a PDF form from a JSON answer set
//!
//! Usage:
//!   cargo run --release --bin fill_form -- <form.pdf> <answers.json>
//!   cargo run --release --bin fill_form -- <form.pdf> <answers.json> --output out.pdf
//!   cargo run --release --bin fill_form -- <form.pdf> <answers.json> --overrides button_overrides.json --verify
//!
//! Set RUST_LOG=debug to see every field as it is written.

use pdf_acrofill::config::FillConfig;
use pdf_acrofill::filler::FormFiller;
use pdf_acrofill::forms::Outcome;
use std::path::PathBuf;

struct FillArgs {
    input: PathBuf,
    answers: PathBuf,
    output: Option<PathBuf>,
    overrides: Option<PathBuf>,
    verify: bool,
    verbose: bool,
}

impl FillArgs {
    fn from_args() -> Option<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut positional = Vec::new();
        let mut output = None;
        let mut overrides = None;
        let mut verify = false;
        let mut verbose = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--output" | "-o" => {
                    i += 1;
                    if i < args.len() {
                        output = Some(PathBuf::from(&args[i]));
                    }
                },
                "--overrides" => {
                    i += 1;
                    if i < args.len() {
                        overrides = Some(PathBuf::from(&args[i]));
                    }
                },
                "--verify" => verify = true,
                "--verbose" | "-v" => verbose = true,
                other => positional.push(PathBuf::from(other)),
            }
            i += 1;
        }

        let mut positional = positional.into_iter();
        Some(Self {
            input: positional.next()?,
            answers: positional.next()?,
            output,
            overrides,
            verify,
            verbose,
        })
    }

    fn into_config(self) -> FillConfig {
        let mut config = FillConfig::new(self.input, self.answers);
        if let Some(output) = self.output {
            config = config.with_output(output);
        }
        if let Some(overrides) = self.overrides {
            config = config.with_overrides(overrides);
        }
        config
    }
}

fn main() {
    env_logger::init();

    let Some(args) = FillArgs::from_args() else {
        eprintln!("Usage: fill_form <form.pdf> <answers.json> [--output PATH] [--overrides PATH] [--verify] [--verbose]");
        std::process::exit(2);
    };
    let verify = args.verify;
    let verbose = args.verbose;
    let filler = FormFiller::new(args.into_config());

    let report = match filler.fill() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        },
    };

    for field in &report.fields {
        match &field.outcome {
            Outcome::Applied if verbose => println!("✓ {} '{}'", field.kind, field.name),
            Outcome::Applied => {},
            Outcome::Skipped(reason) => println!("- {} '{}': {}", field.kind, field.name, reason),
            Outcome::Failed(reason) => println!("✗ {} '{}': {}", field.kind, field.name, reason),
        }
    }
    if verbose {
        for name in &report.unmatched_answers {
            println!("? answer '{}' matches no field", name);
        }
    }

    println!("\n{}", report);
    println!("Filled PDF saved as {}", filler.config().output_path.display());

    if verify {
        match filler.verify() {
            Ok(check) => {
                for mismatch in check.mismatches() {
                    println!("Mismatch: {}", mismatch);
                }
                println!("Checked groups: {}", check.checked());
                println!("Groups with mismatches: {}", check.mismatch_count());
                if !check.is_success() {
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Verification failed: {}", e);
                std::process::exit(1);
            },
        }
    }
}
