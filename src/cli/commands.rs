//! Command implementations for the rankext CLI.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::RankConfig;
use crate::error::{RankError, Result};
use crate::expansion::{ExpanderContext, ExpansionToken, Language, QueryOptions};
use crate::extension::ExtensionRegistry;
use crate::index::synonym::SynonymMap;
use crate::index::{DocumentMetadata, FIELD_MASK_ALL, FieldMask, FieldSpec, IndexSpec, IndexStats};
use crate::result::IndexResult;
use crate::scoring::DocumentScore;

/// A scoring fixture: the statistics of an index and the result trees of
/// the documents a query matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreFixture {
    #[serde(default)]
    pub index_stats: IndexStats,
    /// Query payload compared by payload-aware scorers.
    #[serde(default)]
    pub payload: Option<String>,
    pub documents: Vec<FixtureDocument>,
}

/// One matched document of a fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureDocument {
    pub id: String,
    pub metadata: DocumentMetadata,
    pub result: IndexResult,
}

impl ScoreFixture {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        let fixture: ScoreFixture = serde_json::from_str(&content)?;
        for doc in &fixture.documents {
            doc.result.validate().map_err(|e| {
                RankError::invalid_result(format!("Document '{}': {e}", doc.id))
            })?;
        }
        Ok(fixture)
    }
}

/// Execute a CLI command.
pub fn execute_command(args: RankextArgs) -> Result<()> {
    let config = load_config(&args)?;
    let registry = ExtensionRegistry::with_defaults();

    match &args.command {
        Command::Score(score_args) => {
            let report = score_fixture(score_args, &config, &registry)?;
            output_result("Score results", &report, &args)
        }
        Command::Expand(expand_args) => {
            let report = expand_query(expand_args, &config, &registry)?;
            output_result("Query expansions", &report, &args)
        }
        Command::List => {
            let list = list_extensions(&registry);
            output_result("Registered extensions", &list, &args)
        }
    }
}

fn load_config(args: &RankextArgs) -> Result<RankConfig> {
    match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            RankConfig::load_from_file(path)
        }
        None => Ok(RankConfig::default()),
    }
}

/// Score every document of a fixture and rank them.
pub fn score_fixture(
    args: &ScoreArgs,
    config: &RankConfig,
    registry: &ExtensionRegistry,
) -> Result<ScoreReport> {
    let mut config = config.clone();
    if let Some(scorer) = &args.scorer {
        config.scoring.scorer = scorer.clone();
    }
    if let Some(min_score) = args.min_score {
        config.scoring.min_score = min_score;
    }
    config.scoring.explain |= args.explain;
    config.validate(registry)?;

    let fixture = ScoreFixture::load_from_file(&args.fixture)?;
    debug!(
        "Loaded {} documents from {}",
        fixture.documents.len(),
        args.fixture.display()
    );

    let payload = fixture.payload.as_deref().unwrap_or_default().as_bytes();
    let docs: Vec<(&IndexResult, &DocumentMetadata)> = fixture
        .documents
        .iter()
        .map(|doc| (&doc.result, &doc.metadata))
        .collect();
    let scored = registry.score_documents(
        &config.scoring.scorer,
        fixture.index_stats,
        payload,
        &docs,
        config.scoring.min_score,
        config.scoring.explain,
    )?;

    let mut ranked = Vec::new();
    let mut filtered_out = Vec::new();
    for (doc, scored) in fixture.documents.iter().zip(scored) {
        match scored.score {
            DocumentScore::Ranked(score) => ranked.push(RankedDocument {
                id: doc.id.clone(),
                score,
                explanation: scored.explanation,
            }),
            DocumentScore::FilteredOut => filtered_out.push(doc.id.clone()),
        }
    }
    // Stable sort keeps fixture order among equal scores.
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    Ok(ScoreReport {
        scorer: config.scoring.scorer,
        min_score: config.scoring.min_score,
        ranked,
        filtered_out,
    })
}

/// Expand every word of a query with one query context.
pub fn expand_query(
    args: &ExpandArgs,
    config: &RankConfig,
    registry: &ExtensionRegistry,
) -> Result<ExpansionReport> {
    let mut config = config.clone();
    if let Some(expander) = &args.expander {
        config.expansion.expander = expander.clone();
    }
    if let Some(language) = args.language {
        config.expansion.language = language;
    }
    if let Some(phonetic) = args.phonetic {
        config.expansion.phonetic = phonetic;
    }
    config.validate(registry)?;

    let index = load_index_spec(args.schema.as_deref(), args.synonyms.as_deref())?;
    let field_mask = resolve_field_mask(&index, &args.fields)?;
    let language = config.expansion.language;

    let options = QueryOptions {
        language,
        phonetic: config.expansion.phonetic,
    };
    let mut ctx = ExpanderContext::new(&index, options);
    let mut tokens = Vec::new();
    for word in query_words(&args.query, language) {
        let token = ExpansionToken::new(word).with_field_mask(field_mask);
        let before = ctx.expansions().len();
        registry.expand_query(&config.expansion.expander, &mut ctx, std::slice::from_ref(&token))?;
        let expansions = ctx.expansions()[before..]
            .iter()
            .map(ToString::to_string)
            .collect();
        tokens.push(TokenExpansions {
            token: token.text,
            expansions,
        });
    }

    Ok(ExpansionReport {
        expander: config.expansion.expander,
        language: language.to_string(),
        tokens,
    })
}

/// Split a query into lowercase words.
///
/// Chinese text has no word separators; it is only split on whitespace and
/// left to the segmenter.
pub fn query_words(query: &str, language: Language) -> Vec<String> {
    match language {
        Language::Chinese => query.split_whitespace().map(str::to_lowercase).collect(),
        _ => query.unicode_words().map(str::to_lowercase).collect(),
    }
}

fn load_index_spec(schema: Option<&Path>, synonyms: Option<&Path>) -> Result<IndexSpec> {
    let mut index = match schema {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read schema {}", path.display()))?;
            let fields: Vec<FieldSpec> = serde_json::from_str(&content)?;
            IndexSpec::from_fields(fields)?
        }
        None => IndexSpec::new(),
    };
    if let Some(path) = synonyms {
        let map = SynonymMap::load_from_file(&path.to_string_lossy())?;
        debug!("Loaded {} synonym terms", map.len());
        index = index.with_synonyms(Arc::new(map));
    }
    Ok(index)
}

fn resolve_field_mask(index: &IndexSpec, fields: &[String]) -> Result<FieldMask> {
    if fields.is_empty() {
        return Ok(FIELD_MASK_ALL);
    }
    fields.iter().try_fold(0, |mask, name| {
        index
            .field_mask(name)
            .map(|bit| mask | bit)
            .ok_or_else(|| RankError::schema(format!("Unknown field '{name}'")))
    })
}

/// Names of every registered extension.
pub fn list_extensions(registry: &ExtensionRegistry) -> ExtensionList {
    ExtensionList {
        scorers: registry.scorer_names().into_iter().map(String::from).collect(),
        expanders: registry.expander_names().into_iter().map(String::from).collect(),
    }
}
