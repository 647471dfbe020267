//! CLI logic for the Kellogg sentence diagrammer.
//!
//! This module contains the core CLI logic: reading a treebank file, turning
//! every sentence block into a diagram and writing one file per sentence.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{error, info};

use kellogg::{DiagramBuilder, KelloggError, OutputFormat, SentenceFailure};

/// Run the Kellogg CLI application
///
/// This function processes the input file through the Kellogg pipeline
/// and writes one document per sentence. A single sentence is written to
/// the output path itself; several are numbered `out-1.svg`, `out-2.svg`
/// and so on. The extension follows the diagram style.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `KelloggError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - An unsupported style or an input without sentences
/// - Sentences that fail to parse or lay out; the remaining sentences are
///   still written
pub fn run(args: &Args) -> Result<(), KelloggError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        style = args.style;
        "Processing sentences"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    // Process every sentence using DiagramBuilder API
    let builder = DiagramBuilder::new(app_config);
    let outcomes = builder.generate_batch(&source, &args.style)?;

    let total = outcomes.len();
    let output = Path::new(&args.output);
    let mut failures = Vec::new();
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome.result {
            Ok(diagram) => {
                let path = output_path(output, index + 1, total, diagram.format());
                fs::write(&path, diagram.content())?;
                info!(output_file = path.display().to_string(); "Diagram exported successfully");
            }
            Err(err) => {
                error!(sentence = index + 1, err:%; "Sentence failed");
                failures.push(SentenceFailure {
                    index: index + 1,
                    error: err,
                });
            }
        }
    }

    if failures.is_empty() {
        return Ok(());
    }
    if total == 1 {
        if let Some(failure) = failures.pop() {
            return Err(failure.error);
        }
    }
    Err(KelloggError::Batch { failures, total })
}

/// Path for sentence `number` of `total`.
fn output_path(output: &Path, number: usize, total: usize, format: OutputFormat) -> PathBuf {
    let extension = format.extension();
    if total == 1 {
        return output.with_extension(extension);
    }

    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    output.with_file_name(format!("{stem}-{number}.{extension}"))
}
