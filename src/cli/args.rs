//! Command line argument parsing for the rankext CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::expansion::{Language, PhoneticMode};

/// rankext - relevance scoring and query expansion toolkit
#[derive(Parser, Debug, Clone)]
#[command(name = "rankext")]
#[command(about = "Score result trees and expand query tokens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct RankextArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "RANKEXT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl RankextArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Score the documents of a fixture file
    Score(ScoreArgs),

    /// Expand the tokens of a query
    Expand(ExpandArgs),

    /// List registered scorers and expanders
    List,
}

/// Arguments for scoring
#[derive(Parser, Debug, Clone)]
pub struct ScoreArgs {
    /// Fixture file with index stats, query payload and documents (JSON)
    #[arg(value_name = "FIXTURE_FILE")]
    pub fixture: PathBuf,

    /// Scorer name (overrides the configuration)
    #[arg(short, long)]
    pub scorer: Option<String>,

    /// Minimum score threshold
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Include score explanations
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for query expansion
#[derive(Parser, Debug, Clone)]
pub struct ExpandArgs {
    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Expander name (overrides the configuration)
    #[arg(short, long)]
    pub expander: Option<String>,

    /// Query language
    #[arg(short, long, value_parser = parse_language)]
    pub language: Option<Language>,

    /// Phonetic matching: default, enabled or disabled
    #[arg(long, value_parser = parse_phonetic)]
    pub phonetic: Option<PhoneticMode>,

    /// Field restriction applied to every query token (field names)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Schema file listing the index fields (JSON)
    #[arg(long, value_name = "SCHEMA_FILE")]
    pub schema: Option<PathBuf>,

    /// Synonym groups file (JSON array of string arrays)
    #[arg(long, value_name = "SYNONYMS_FILE")]
    pub synonyms: Option<PathBuf>,
}

fn parse_language(s: &str) -> Result<Language, String> {
    s.parse().map_err(|e: crate::error::RankError| e.to_string())
}

fn parse_phonetic(s: &str) -> Result<PhoneticMode, String> {
    s.parse().map_err(|e: crate::error::RankError| e.to_string())
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity() {
        let args = RankextArgs::parse_from(["rankext", "list"]);
        assert_eq!(args.verbosity(), 1);

        let args = RankextArgs::parse_from(["rankext", "-vv", "list"]);
        assert_eq!(args.verbosity(), 2);

        let args = RankextArgs::parse_from(["rankext", "-vvv", "-q", "list"]);
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_score_args() {
        let args = RankextArgs::parse_from([
            "rankext",
            "--format",
            "json",
            "score",
            "fixture.json",
            "--scorer",
            "BM25",
            "--min-score",
            "0.5",
            "--explain",
        ]);
        assert_eq!(args.output_format, OutputFormat::Json);
        match args.command {
            Command::Score(score) => {
                assert_eq!(score.fixture, PathBuf::from("fixture.json"));
                assert_eq!(score.scorer.as_deref(), Some("BM25"));
                assert_eq!(score.min_score, Some(0.5));
                assert!(score.explain);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_expand_args() {
        let args = RankextArgs::parse_from([
            "rankext",
            "expand",
            "running shoes",
            "--language",
            "German",
            "--phonetic",
            "on",
            "--fields",
            "title,body",
        ]);
        match args.command {
            Command::Expand(expand) => {
                assert_eq!(expand.query, "running shoes");
                assert_eq!(expand.language, Some(Language::German));
                assert_eq!(expand.phonetic, Some(PhoneticMode::Enabled));
                assert_eq!(expand.fields, vec!["title", "body"]);
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(RankextArgs::try_parse_from(["rankext", "expand", "x", "--language", "klingon"]).is_err());
    }
}
