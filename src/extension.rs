//! Named registry of scoring functions and query expanders.
//!
//! Query execution selects its scorer and expander by name, so every
//! implementation is registered under a case-sensitive name first.
//! [`ExtensionRegistry::with_defaults`] carries the built-in set.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{RankError, Result};
use crate::expansion::{
    DEFAULT_EXPANDER_NAME, ExpanderContext, Expansion, ExpansionToken, PHONETIC_EXPANDER_NAME,
    QueryExpander, STEMMER_EXPANDER_NAME, SYNONYMS_EXPANDER_NAME, default_expand, phonetic_expand,
    stemmer_expand, synonym_expand,
};
use crate::index::{DocumentMetadata, IndexStats};
use crate::result::IndexResult;
use crate::scoring::{
    BM25_SCORER_NAME, DISMAX_SCORER_NAME, DOCSCORE_SCORER_NAME, DocumentScore,
    HAMMING_SCORER_NAME, ScoreExplain, ScorerArgs, ScoringFunction, TFIDF_DOCNORM_SCORER_NAME,
    TFIDF_SCORER_NAME, bm25_scorer, dismax_scorer, doc_score_scorer, hamming_scorer,
    tfidf_doc_norm_scorer, tfidf_scorer,
};

/// Score of one document of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub score: DocumentScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<ScoreExplain>,
}

/// Registry of scorers and expanders.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    scorers: AHashMap<String, Arc<dyn ScoringFunction>>,
    expanders: AHashMap<String, Arc<dyn QueryExpander>>,
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("scorers", &self.scorer_names())
            .field("expanders", &self.expander_names())
            .finish()
    }
}

impl ExtensionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in scorer and expander.
    pub fn with_defaults() -> Self {
        let mut registry = ExtensionRegistry::new();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        // The names are distinct and the maps start empty.
        let scorers: [(&str, Arc<dyn ScoringFunction>); 6] = [
            (TFIDF_SCORER_NAME, Arc::new(tfidf_scorer)),
            (DISMAX_SCORER_NAME, Arc::new(dismax_scorer)),
            (BM25_SCORER_NAME, Arc::new(bm25_scorer)),
            (HAMMING_SCORER_NAME, Arc::new(hamming_scorer)),
            (TFIDF_DOCNORM_SCORER_NAME, Arc::new(tfidf_doc_norm_scorer)),
            (DOCSCORE_SCORER_NAME, Arc::new(doc_score_scorer)),
        ];
        for (name, scorer) in scorers {
            self.scorers.insert(name.to_string(), scorer);
        }

        let expanders: [(&str, Arc<dyn QueryExpander>); 4] = [
            (STEMMER_EXPANDER_NAME, Arc::new(stemmer_expand)),
            (SYNONYMS_EXPANDER_NAME, Arc::new(synonym_expand)),
            (PHONETIC_EXPANDER_NAME, Arc::new(phonetic_expand)),
            (DEFAULT_EXPANDER_NAME, Arc::new(default_expand)),
        ];
        for (name, expander) in expanders {
            self.expanders.insert(name.to_string(), expander);
        }
    }

    /// Register a scoring function under `name`.
    ///
    /// The `Fn` bound lets closures infer their parameter types.
    pub fn register_scorer<F>(&mut self, name: &str, scorer: F) -> Result<()>
    where
        F: Fn(&mut ScorerArgs<'_>, &IndexResult, &DocumentMetadata, f64) -> f64
            + Send
            + Sync
            + 'static,
    {
        if self.scorers.contains_key(name) {
            return Err(RankError::already_registered(format!(
                "Scorer '{name}' is already registered"
            )));
        }
        debug!("registered scorer '{name}'");
        self.scorers.insert(name.to_string(), Arc::new(scorer));
        Ok(())
    }

    /// Register a query expander under `name`.
    pub fn register_expander<F>(&mut self, name: &str, expander: F) -> Result<()>
    where
        F: Fn(&mut ExpanderContext<'_>, &ExpansionToken) -> Result<()> + Send + Sync + 'static,
    {
        if self.expanders.contains_key(name) {
            return Err(RankError::already_registered(format!(
                "Expander '{name}' is already registered"
            )));
        }
        debug!("registered expander '{name}'");
        self.expanders.insert(name.to_string(), Arc::new(expander));
        Ok(())
    }

    pub fn scorer(&self, name: &str) -> Option<Arc<dyn ScoringFunction>> {
        self.scorers.get(name).cloned()
    }

    pub fn expander(&self, name: &str) -> Option<Arc<dyn QueryExpander>> {
        self.expanders.get(name).cloned()
    }

    /// Registered scorer names, sorted.
    pub fn scorer_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scorers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered expander names, sorted.
    pub fn expander_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.expanders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn require_scorer(&self, name: &str) -> Result<&Arc<dyn ScoringFunction>> {
        self.scorers
            .get(name)
            .ok_or_else(|| RankError::not_found(format!("Unknown scorer '{name}'")))
    }

    /// Score one document with the named scorer.
    pub fn score_document(
        &self,
        name: &str,
        args: &mut ScorerArgs<'_>,
        result: &IndexResult,
        dmd: &DocumentMetadata,
        min_score: f64,
    ) -> Result<DocumentScore> {
        let scorer = self.require_scorer(name)?;
        Ok(DocumentScore::from_raw(scorer.score(args, result, dmd, min_score)))
    }

    /// Score a batch of documents in parallel.
    ///
    /// Each document gets its own [`ScorerArgs`]; the output keeps the order
    /// of `docs`.
    pub fn score_documents(
        &self,
        name: &str,
        stats: IndexStats,
        payload: &[u8],
        docs: &[(&IndexResult, &DocumentMetadata)],
        min_score: f64,
        explain: bool,
    ) -> Result<Vec<ScoredDocument>> {
        let scorer = self.require_scorer(name)?;
        debug!("scoring {} documents with '{name}'", docs.len());

        let scored = docs
            .par_iter()
            .map(|(result, dmd)| {
                let mut args = ScorerArgs::new(stats)
                    .with_payload(payload)
                    .with_explain(explain);
                let score = scorer.score(&mut args, result, dmd, min_score);
                ScoredDocument {
                    score: DocumentScore::from_raw(score),
                    explanation: args.take_explanation(),
                }
            })
            .collect();
        Ok(scored)
    }

    /// Run the named expander over every token of a query.
    ///
    /// All tokens share `ctx`, so the stemmer handle is created at most once.
    /// The first error aborts the expansion.
    pub fn expand_query(
        &self,
        name: &str,
        ctx: &mut ExpanderContext<'_>,
        tokens: &[ExpansionToken],
    ) -> Result<()> {
        let expander = self
            .expanders
            .get(name)
            .ok_or_else(|| RankError::not_found(format!("Unknown expander '{name}'")))?;
        ctx.expand_all(expander.as_ref(), tokens)
    }
}

/// Expand `tokens` with a fresh context and return what was derived.
pub fn expand_tokens(
    registry: &ExtensionRegistry,
    name: &str,
    mut ctx: ExpanderContext<'_>,
    tokens: &[ExpansionToken],
) -> Result<Vec<Expansion>> {
    registry.expand_query(name, &mut ctx, tokens)?;
    Ok(ctx.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion::QueryOptions;
    use crate::index::IndexSpec;
    use crate::result::TermStats;
    use crate::scoring::SCORE_FILTER_OUT;

    fn term(text: &str, idf: f64, freq: u32) -> IndexResult {
        IndexResult::term(Arc::new(TermStats::new(text, idf)), freq, vec![1])
    }

    #[test]
    fn test_defaults_registered() {
        let registry = ExtensionRegistry::with_defaults();
        assert_eq!(
            registry.scorer_names(),
            vec!["BM25", "DISMAX", "DOCSCORE", "HAMMING", "TFIDF", "TFIDF.DOCNORM"]
        );
        assert_eq!(
            registry.expander_names(),
            vec!["DEFAULT", "PHONETIC", "SBSTEM", "SYNONYM"]
        );
        assert!(registry.scorer("tfidf").is_none());
    }

    fn pi_scorer(_: &mut ScorerArgs<'_>, _: &IndexResult, _: &DocumentMetadata, _: f64) -> f64 {
        3.141
    }

    fn filter_out_scorer(
        _: &mut ScorerArgs<'_>,
        _: &IndexResult,
        _: &DocumentMetadata,
        _: f64,
    ) -> f64 {
        SCORE_FILTER_OUT
    }

    fn foo_expander(ctx: &mut ExpanderContext<'_>, token: &ExpansionToken) -> Result<()> {
        ctx.expand_token("foo", 0x00ff, token.field_mask);
        Ok(())
    }

    #[test]
    fn test_custom_scorers() {
        let mut registry = ExtensionRegistry::new();
        registry.register_scorer("pi", pi_scorer).unwrap();
        registry.register_scorer("filterout", filter_out_scorer).unwrap();

        let result = term("hello", 1.0, 1);
        let dmd = DocumentMetadata::new(1.0, 1, 1);
        let mut args = ScorerArgs::new(IndexStats::default());

        let score = registry.score_document("pi", &mut args, &result, &dmd, 0.0).unwrap();
        assert_eq!(score, DocumentScore::Ranked(3.141));

        let score = registry.score_document("filterout", &mut args, &result, &dmd, 0.0).unwrap();
        assert!(score.is_filtered_out());
    }

    #[test]
    fn test_duplicate_and_unknown_names() {
        let mut registry = ExtensionRegistry::with_defaults();
        let err = registry.register_scorer(TFIDF_SCORER_NAME, tfidf_scorer).unwrap_err();
        assert!(matches!(err, RankError::AlreadyRegistered(_)));
        let err = registry.register_expander(DEFAULT_EXPANDER_NAME, default_expand).unwrap_err();
        assert!(matches!(err, RankError::AlreadyRegistered(_)));

        let result = term("hello", 1.0, 1);
        let dmd = DocumentMetadata::new(1.0, 1, 1);
        let mut args = ScorerArgs::new(IndexStats::default());
        let err = registry.score_document("NOPE", &mut args, &result, &dmd, 0.0).unwrap_err();
        assert!(matches!(err, RankError::NotFound(_)));

        let index = IndexSpec::new();
        let mut ctx = ExpanderContext::new(&index, QueryOptions::default());
        let err = registry.expand_query("NOPE", &mut ctx, &[]).unwrap_err();
        assert!(matches!(err, RankError::NotFound(_)));
    }

    #[test]
    fn test_custom_expander() {
        let mut registry = ExtensionRegistry::new();
        registry.register_expander("foo", foo_expander).unwrap();

        let index = IndexSpec::new();
        let ctx = ExpanderContext::new(&index, QueryOptions::default());
        let tokens = [ExpansionToken::new("hello"), ExpansionToken::new("world")];
        let expansions = expand_tokens(&registry, "foo", ctx, &tokens).unwrap();

        assert_eq!(expansions.len(), 2);
        assert!(expansions.iter().all(|e| {
            let token = e.as_token().unwrap();
            token.text == "foo" && token.flags == 0x00ff
        }));
    }

    #[test]
    fn test_register_closures() {
        let boost = 2.5;
        let mut registry = ExtensionRegistry::new();
        registry
            .register_scorer("boosted", move |_, result, _, _| boost * f64::from(result.freq))
            .unwrap();
        registry
            .register_expander("bar", |ctx, token| {
                ctx.expand_token(format!("bar:{}", token.text), 0, token.field_mask);
                Ok(())
            })
            .unwrap();

        let result = term("hello", 1.0, 4);
        let dmd = DocumentMetadata::new(1.0, 1, 1);
        let mut args = ScorerArgs::new(IndexStats::default());
        let score = registry.score_document("boosted", &mut args, &result, &dmd, 0.0).unwrap();
        assert_eq!(score, DocumentScore::Ranked(10.0));

        let index = IndexSpec::new();
        let ctx = ExpanderContext::new(&index, QueryOptions::default());
        let expansions =
            expand_tokens(&registry, "bar", ctx, &[ExpansionToken::new("hello")]).unwrap();
        assert_eq!(expansions[0].as_token().unwrap().text, "bar:hello");
    }

    #[test]
    fn test_score_documents_keeps_order() {
        let registry = ExtensionRegistry::with_defaults();
        let results: Vec<IndexResult> = (1..=16).map(|freq| term("w", 1.0, freq)).collect();
        let dmds: Vec<DocumentMetadata> = (0..16).map(|_| DocumentMetadata::new(1.0, 16, 16)).collect();
        let docs: Vec<(&IndexResult, &DocumentMetadata)> = results.iter().zip(&dmds).collect();

        let scored = registry
            .score_documents(TFIDF_SCORER_NAME, IndexStats::new(10.0), &[], &docs, 0.0, true)
            .unwrap();

        assert_eq!(scored.len(), 16);
        for (i, doc) in scored.iter().enumerate() {
            let mut args = ScorerArgs::new(IndexStats::new(10.0));
            let expected = tfidf_scorer(&mut args, &results[i], &dmds[i], 0.0);
            assert_eq!(doc.score, DocumentScore::Ranked(expected));
            assert!(doc.explanation.is_some());
        }
    }
}
