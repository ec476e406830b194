//! Raw document-score scorer.

use crate::index::DocumentMetadata;
use crate::result::IndexResult;
use crate::scoring::args::ScorerArgs;

/// The document's static score, unmodified.
pub fn doc_score_scorer(
    args: &mut ScorerArgs<'_>,
    _result: &IndexResult,
    dmd: &DocumentMetadata,
    _min_score: f64,
) -> f64 {
    args.explain_root(None, || format!("Document's score is {:.2}", dmd.score));
    dmd.score
}
