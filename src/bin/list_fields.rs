//! List the fields of a PDF form
//!
//! Usage:
//!   cargo run --release --bin list_fields -- <form.pdf>
//!   cargo run --release --bin list_fields -- <form.pdf> --qualified
//!   cargo run --release --bin list_fields -- <form.pdf> --json
//!   cargo run --release --bin list_fields -- <form.pdf> --template answers.json
//!
//! `--template` writes a blank answers file (every field mapped to "") unless
//! one already exists at that path.

use pdf_acrofill::document::FormDocument;
use pdf_acrofill::forms::{answer_template, qualified_names, summarize, FieldDirectory};
use std::path::{Path, PathBuf};

struct ListConfig {
    input: PathBuf,
    qualified: bool,
    json: bool,
    template: Option<PathBuf>,
}

impl ListConfig {
    fn from_args() -> Option<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut input = None;
        let mut qualified = false;
        let mut json = false;
        let mut template = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--qualified" => qualified = true,
                "--json" => json = true,
                "--template" => {
                    i += 1;
                    if i < args.len() {
                        template = Some(PathBuf::from(&args[i]));
                    }
                },
                other => input = Some(PathBuf::from(other)),
            }
            i += 1;
        }

        Some(Self {
            input: input?,
            qualified,
            json,
            template,
        })
    }
}

fn write_template(path: &Path, directory: &FieldDirectory) -> Result<bool, Box<dyn std::error::Error>> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let text = serde_json::to_string_pretty(&answer_template(directory))?;
    std::fs::write(path, text)?;
    Ok(true)
}

fn run(config: &ListConfig) -> Result<(), Box<dyn std::error::Error>> {
    let doc = FormDocument::open(&config.input)?;
    let directory = FieldDirectory::build(&doc);

    if config.qualified {
        for name in qualified_names(&doc)? {
            println!("{}", name);
        }
    } else {
        let summaries = summarize(&doc, &directory);
        if config.json {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        } else {
            for summary in &summaries {
                if summary.export_states.is_empty() {
                    println!("{:<10} {}", summary.kind, summary.name);
                } else {
                    println!(
                        "{:<10} {} [{}]",
                        summary.kind,
                        summary.name,
                        summary.export_states.join(", ")
                    );
                }
            }
            println!("\n{} fields", summaries.len());
            if directory.skipped_unnamed() > 0 {
                println!("{} unnamed widgets skipped", directory.skipped_unnamed());
            }
        }
    }

    if let Some(path) = &config.template {
        if write_template(path, &directory)? {
            println!("Answers template written to {}", path.display());
        } else {
            println!("Answers file {} already exists; left unchanged", path.display());
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let Some(config) = ListConfig::from_args() else {
        eprintln!("Usage: list_fields <form.pdf> [--qualified] [--json] [--template PATH]");
        std::process::exit(2);
    };

    if !config.input.exists() {
        eprintln!("Error: Document not found: {}", config.input.display());
        std::process::exit(2);
    }

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
