//! CLI interface for the resume ranker

use crate::config::OutputFormat;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-ranker")]
#[command(about = "Rank resumes against a job description by semantic similarity")]
#[command(long_about = "Embed a job description and a batch of resumes, rank the resumes by similarity, and list the job keywords each resume is missing")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank resumes against a job description
    #[command(group(ArgGroup::new("reference").required(true).args(["job", "job_text"])))]
    Rank {
        /// Path to the job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Resume files or directories of resumes (PDF, TXT, MD)
        #[arg(short, long, num_args = 1.., required = true)]
        resumes: Vec<PathBuf>,

        /// Embedding model name, repo id, or local directory
        #[arg(short, long)]
        embedding: Option<String>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Number of resumes processed concurrently
        #[arg(short, long)]
        workers: Option<usize>,

        /// Per-resume deadline in seconds (0 disables)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Show untruncated cells and run metadata
        #[arg(short, long)]
        detailed: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Embedding model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known embedding models
    List,

    /// Download a model into the models directory
    Download {
        /// Model name or HuggingFace repo ID
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },

    /// Remove a downloaded model
    Remove {
        /// Model name to remove
        model: String,
    },

    /// Show model information
    Info {
        /// Model name
        model: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_rank_requires_reference() {
        let parsed = Cli::try_parse_from(["resume-ranker", "rank", "--resumes", "a.pdf"]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "resume-ranker",
            "rank",
            "--job-text",
            "Rust developer",
            "--resumes",
            "a.pdf",
            "b.pdf",
        ])
        .unwrap();

        match parsed.command {
            Commands::Rank { resumes, job_text, .. } => {
                assert_eq!(resumes.len(), 2);
                assert_eq!(job_text.as_deref(), Some("Rust developer"));
            }
            _ => panic!("expected rank command"),
        }
    }

    #[test]
    fn test_job_and_job_text_conflict() {
        let parsed = Cli::try_parse_from([
            "resume-ranker",
            "rank",
            "--job",
            "jd.txt",
            "--job-text",
            "Rust",
            "--resumes",
            "a.pdf",
        ]);
        assert!(parsed.is_err());
    }
}
