//! Output formatting for CLI commands.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, RankextArgs};
use crate::error::Result;
use crate::scoring::ScoreExplain;

/// One ranked document of a scoring run.
#[derive(Debug, Serialize, Deserialize)]
pub struct RankedDocument {
    pub id: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<ScoreExplain>,
}

/// Result of the `score` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreReport {
    pub scorer: String,
    pub min_score: f64,
    /// Documents in descending score order.
    pub ranked: Vec<RankedDocument>,
    /// Ids of documents the scorer filtered out.
    pub filtered_out: Vec<String>,
}

/// Expansions derived from one query token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenExpansions {
    pub token: String,
    pub expansions: Vec<String>,
}

/// Result of the `expand` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExpansionReport {
    pub expander: String,
    pub language: String,
    pub tokens: Vec<TokenExpansions>,
}

/// Result of the `list` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtensionList {
    pub scorers: Vec<String>,
    pub expanders: Vec<String>,
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scorer: {} (min score {:.2})", self.scorer, self.min_score)?;
        writeln!(f, "═══════════════")?;
        for (i, doc) in self.ranked.iter().enumerate() {
            writeln!(f, "{}. {} (Score: {:.3})", i + 1, doc.id, doc.score)?;
            if let Some(explanation) = &doc.explanation {
                for line in explanation.to_string().lines() {
                    writeln!(f, "    {line}")?;
                }
            }
        }
        if !self.filtered_out.is_empty() {
            writeln!(f, "Filtered out: {}", self.filtered_out.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for ExpansionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Expander: {} ({})", self.expander, self.language)?;
        for token in &self.tokens {
            if token.expansions.is_empty() {
                writeln!(f, "{}: -", token.token)?;
            } else {
                writeln!(f, "{}: {}", token.token, token.expansions.join(" | "))?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ExtensionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scorers:")?;
        for name in &self.scorers {
            writeln!(f, "  {name}")?;
        }
        writeln!(f, "Expanders:")?;
        for name in &self.expanders {
            writeln!(f, "  {name}")?;
        }
        Ok(())
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &RankextArgs) -> Result<()>
where
    T: Serialize + fmt::Display,
{
    print!("{}", render(message, result, args)?);
    Ok(())
}

/// Render a result the way [`output_result`] prints it.
pub fn render<T>(message: &str, result: &T, args: &RankextArgs) -> Result<String>
where
    T: Serialize + fmt::Display,
{
    match args.output_format {
        OutputFormat::Human => {
            let mut out = String::new();
            if args.verbosity() > 1 {
                out.push_str(message);
                out.push_str("\n\n");
            }
            out.push_str(&result.to_string());
            Ok(out)
        }
        OutputFormat::Json => {
            let mut json = if args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            json.push('\n');
            Ok(json)
        }
    }
}
