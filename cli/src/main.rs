//! docrank CLI - outline extraction and persona ranking

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docrank::{
    load_layout, BatchProcessor, DocumentError, DocumentLayout, HashingEmbedder, JsonFormat,
    OutlineExtractor, RunConfig,
};

#[derive(Parser)]
#[command(name = "docrank")]
#[command(version)]
#[command(about = "Extract document outlines and rank sections for a persona", long_about = None)]
struct Cli {
    /// Input layout JSON files (shortcut for the outline subcommand)
    #[arg(value_name = "FILE")]
    inputs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract outlines from layout documents
    Outline {
        /// Input layout JSON files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (stdout for a single input if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Rank sections and subsections against a persona
    Rank {
        /// Run configuration JSON file
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Directory holding the layout documents named in the config
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        input_dir: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Embedding dimension for the built-in hashing embedder
        #[arg(long, default_value_t = 256)]
        dimension: usize,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Outline {
            inputs,
            output,
            compact,
        }) => cmd_outline(&inputs, output.as_deref(), compact),
        Some(Commands::Rank {
            config,
            input_dir,
            output,
            compact,
            dimension,
        }) => cmd_rank(&config, &input_dir, output.as_deref(), compact, dimension),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if !cli.inputs.is_empty() {
                cmd_outline(&cli.inputs, None, false)
            } else {
                println!("{}", "Usage: docrank <FILE>...".yellow());
                println!("       docrank --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_outline(
    inputs: &[PathBuf],
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    // Single file to stdout stays quiet; anything else gets a progress bar.
    if inputs.len() == 1 && output.is_none() {
        let layout = load_layout(&inputs[0])?;
        let extracted = OutlineExtractor::new().extract(&layout);
        println!("{}", docrank::render::to_json(&extracted.outline, format)?);
        return Ok(());
    }

    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let processor = BatchProcessor::new();
    let outcome = processor.extract_from_paths(inputs);

    let mut errors: Vec<DocumentError> = outcome.errors.clone();
    for (document, extracted) in &outcome.outlines {
        pb.set_message(document.clone());
        let stem = Path::new(document)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| document.clone());
        let path = output_dir.join(format!("{}.json", stem));
        let json = docrank::render::to_json(&extracted.outline, format)?;
        if let Err(e) = fs::write(&path, &json) {
            errors.push(DocumentError {
                document: document.clone(),
                error: e.to_string(),
            });
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} outline(s) written to {}",
        "Done!".green().bold(),
        outcome.outlines.len(),
        output_dir.display()
    );

    finish_with_errors(errors)
}

fn cmd_rank(
    config_path: &Path,
    input_dir: &Path,
    output: Option<&Path>,
    compact: bool,
    dimension: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = RunConfig::from_json(&fs::read_to_string(config_path)?)?;

    // Partial-failure load: a missing or malformed document is reported and
    // skipped, the rest of the batch proceeds.
    let mut layouts: Vec<DocumentLayout> = Vec::new();
    let mut errors: Vec<DocumentError> = Vec::new();
    for name in &config.documents {
        let path = resolve_layout_path(input_dir, name);
        match load_layout(&path) {
            Ok(layout) => layouts.push(layout),
            Err(e) => {
                log::warn!("skipping {}: {}", name, e);
                errors.push(DocumentError {
                    document: name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    if layouts.is_empty() {
        eprintln!("{}", serde_json::to_string_pretty(&errors)?);
        return Err("no documents could be loaded".into());
    }

    let embedder = HashingEmbedder::with_dimension(dimension);
    let report = BatchProcessor::new().rank(&layouts, &config, &embedder)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = docrank::render::to_json(&report, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    println!(
        "{} {} section(s), {} subsection(s)",
        "Ranked".green().bold(),
        report.sections.len(),
        report.subsections.len()
    );

    finish_with_errors(errors)
}

/// Layout documents are the collaborator's JSON files; config entries may
/// name them directly or by the source PDF they came from.
fn resolve_layout_path(input_dir: &Path, name: &str) -> PathBuf {
    let direct = input_dir.join(name);
    if direct.exists() {
        return direct;
    }
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string());
    let layout_json = input_dir.join(format!("{}.layout.json", stem));
    if layout_json.exists() {
        return layout_json;
    }
    direct
}

/// Partial outputs are already written; surface remaining failures as a
/// machine-readable list and a non-zero exit.
fn finish_with_errors(errors: Vec<DocumentError>) -> Result<(), Box<dyn std::error::Error>> {
    if errors.is_empty() {
        return Ok(());
    }
    eprintln!("{}", serde_json::to_string_pretty(&errors)?);
    Err(format!("{} document(s) failed", errors.len()).into())
}

fn cmd_version() {
    println!("{} {}", "docrank".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document outline extraction and persona ranking");
    println!();
    println!("License: MIT");
}
