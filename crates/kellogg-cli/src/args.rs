//! Command-line argument definitions for the Kellogg CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the diagram style,
//! configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Kellogg sentence diagrammer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input treebank file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file; numbered per sentence when the input holds several
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Diagram style (reed-kellogg, dependency)
    #[arg(short, long, default_value = "reed-kellogg")]
    pub style: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
