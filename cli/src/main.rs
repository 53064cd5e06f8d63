//! pdftoc CLI - batch outline extraction for PDF documents.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use pdftoc::{
    extract_outline_with_options, render, EngineOptions, JsonFormat, LanguageRegistry,
};

#[derive(Parser)]
#[command(name = "pdftoc")]
#[command(version)]
#[command(about = "Extract structured outlines from PDF files", long_about = None)]
struct Cli {
    /// Directory with input PDF files
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Directory to write one JSON file per PDF
    #[arg(value_name = "OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Document language for numbered-heading detection
    #[arg(long, default_value = "en")]
    lang: String,

    /// JSON file with additional language patterns
    #[arg(long, value_name = "FILE")]
    languages: Option<PathBuf>,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Process documents one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(summary) => {
            println!(
                "\n{} {} succeeded, {} failed",
                "Done:".green().bold(),
                summary.succeeded,
                summary.failed
            );
            if summary.failed > 0 && summary.succeeded == 0 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

struct Summary {
    succeeded: usize,
    failed: usize,
}

fn run(cli: &Cli) -> Result<Summary, Box<dyn std::error::Error>> {
    let registry = match &cli.languages {
        Some(path) => LanguageRegistry::load_file(path)?,
        None => LanguageRegistry::builtin(),
    };
    let pattern = registry.get(&cli.lang);

    let mut pdf_files: Vec<PathBuf> = fs::read_dir(&cli.input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    pdf_files.sort();

    if pdf_files.is_empty() {
        println!(
            "{} no PDF files found in '{}'",
            "Warning:".yellow(),
            cli.input_dir.display()
        );
        return Ok(Summary {
            succeeded: 0,
            failed: 0,
        });
    }

    fs::create_dir_all(&cli.output_dir)?;

    let pb = ProgressBar::new(pdf_files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let format = if cli.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let process = |path: &PathBuf| -> bool {
        let ok = match process_file(path, &cli.output_dir, pattern, format) {
            Ok(outline_len) => {
                log::info!("{}: {} headings", path.display(), outline_len);
                true
            }
            Err(e) => {
                pb.suspend(|| {
                    eprintln!(
                        "{} {}: {}",
                        "skipped".red(),
                        path.file_name().unwrap_or_default().to_string_lossy(),
                        e
                    );
                });
                false
            }
        };
        pb.inc(1);
        ok
    };

    // A failing document is skipped and reported; the batch continues.
    let results: Vec<bool> = if cli.sequential {
        pdf_files.iter().map(process).collect()
    } else {
        pdf_files.par_iter().map(process).collect()
    };

    pb.finish_with_message("done");

    let succeeded = results.iter().filter(|&&ok| ok).count();
    Ok(Summary {
        succeeded,
        failed: results.len() - succeeded,
    })
}

fn process_file(
    input: &Path,
    output_dir: &Path,
    pattern: &pdftoc::LanguagePattern,
    format: JsonFormat,
) -> Result<usize, Box<dyn std::error::Error>> {
    let result = extract_outline_with_options(input, pattern, EngineOptions::default())?;
    let json = render::to_json(&result, format)?;

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    fs::write(output_dir.join(format!("{}.json", stem)), json)?;

    Ok(result.outline.len())
}
