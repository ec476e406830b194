//! Document scoring over result trees.
//!
//! A scoring function receives the [`ScorerArgs`] of the query, the result
//! tree of one candidate document, the document's metadata and the minimum
//! score the caller still cares about, and returns the document's score.
//!
//! Tree-walking algorithms ([`Algorithm`]) compute a raw contribution per
//! node through an explicit dispatch table keyed by (node kind, algorithm).
//! Combinations without an entry fall back to the generic aggregate
//! behavior: the node's weight times the sum of its children. The only
//! composite override is [`ResultKind::Union`] under DisMax, which takes the
//! maximum of its children instead.
//!
//! # Registered scorers
//!
//! | Name            | Function                  |
//! |-----------------|---------------------------|
//! | `TFIDF`         | [`tfidf_scorer`]          |
//! | `TFIDF.DOCNORM` | [`tfidf_doc_norm_scorer`] |
//! | `BM25`          | [`bm25_scorer`]           |
//! | `DISMAX`        | [`dismax_scorer`]         |
//! | `DOCSCORE`      | [`doc_score_scorer`]      |
//! | `HAMMING`       | [`hamming_scorer`]        |
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use rankext::index::{DocumentMetadata, IndexStats};
//! use rankext::result::{IndexResult, TermStats};
//! use rankext::scoring::{ScorerArgs, tfidf_scorer};
//!
//! let term = Arc::new(TermStats::new("hello", 2.0));
//! let result = IndexResult::term(term, 3, vec![4]);
//! let dmd = DocumentMetadata::new(1.0, 3, 10);
//!
//! let mut args = ScorerArgs::new(IndexStats::new(10.0));
//! // 1.0 * (1.0 * 3 * 2.0) / max_freq 3 / slop 1
//! assert_eq!(tfidf_scorer(&mut args, &result, &dmd, 0.0), 2.0);
//! ```

pub mod args;
pub mod explain;

mod aggregate;
mod bm25;
mod dismax;
mod docscore;
mod hamming;
mod tfidf;

use serde::{Deserialize, Serialize};

use crate::index::{DocumentMetadata, IndexStats};
use crate::result::{IndexResult, ResultKind};

pub use args::ScorerArgs;
pub use bm25::{BM25_B, BM25_K1, bm25_scorer};
pub use dismax::dismax_scorer;
pub use docscore::doc_score_scorer;
pub use explain::ScoreExplain;
pub use hamming::hamming_scorer;
pub use tfidf::{tfidf_doc_norm_scorer, tfidf_scorer};

pub const TFIDF_SCORER_NAME: &str = "TFIDF";
pub const TFIDF_DOCNORM_SCORER_NAME: &str = "TFIDF.DOCNORM";
pub const BM25_SCORER_NAME: &str = "BM25";
pub const DISMAX_SCORER_NAME: &str = "DISMAX";
pub const DOCSCORE_SCORER_NAME: &str = "DOCSCORE";
pub const HAMMING_SCORER_NAME: &str = "HAMMING";

/// Score a scorer returns to drop the document from the results altogether.
///
/// Distinct from 0, which is a legitimate (if poor) rank.
pub const SCORE_FILTER_OUT: f64 = f64::MIN_POSITIVE;

/// Outcome of scoring one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentScore {
    Ranked(f64),
    FilteredOut,
}

impl DocumentScore {
    pub fn from_raw(score: f64) -> Self {
        if score == SCORE_FILTER_OUT {
            DocumentScore::FilteredOut
        } else {
            DocumentScore::Ranked(score)
        }
    }

    /// The rankable score, `None` for filtered-out documents.
    pub fn value(self) -> Option<f64> {
        match self {
            DocumentScore::Ranked(score) => Some(score),
            DocumentScore::FilteredOut => None,
        }
    }

    pub fn is_filtered_out(self) -> bool {
        matches!(self, DocumentScore::FilteredOut)
    }
}

/// A named scoring function.
///
/// Implemented for every `Fn` with the scorer signature, so plain functions
/// and closures can both be registered.
pub trait ScoringFunction: Send + Sync {
    fn score(
        &self,
        args: &mut ScorerArgs<'_>,
        result: &IndexResult,
        dmd: &DocumentMetadata,
        min_score: f64,
    ) -> f64;
}

impl<F> ScoringFunction for F
where
    F: Fn(&mut ScorerArgs<'_>, &IndexResult, &DocumentMetadata, f64) -> f64 + Send + Sync,
{
    fn score(
        &self,
        args: &mut ScorerArgs<'_>,
        result: &IndexResult,
        dmd: &DocumentMetadata,
        min_score: f64,
    ) -> f64 {
        self(args, result, dmd, min_score)
    }
}

/// Tree-walking ranking algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    TfIdf,
    Bm25,
    DisMax,
}

impl Algorithm {
    pub const COUNT: usize = 3;

    /// Column of this algorithm in the dispatch table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Explain line of a composite node that combined its children.
    fn composite_description(self, weight: f64, combined: f64) -> String {
        match self {
            Algorithm::TfIdf => {
                format!("(Weight {weight:.2} * total children TFIDF {combined:.2})")
            }
            Algorithm::Bm25 => format!("(Weight {weight:.2} * children BM25 {combined:.2})"),
            Algorithm::DisMax => format!(
                "{:.2} = Weight {weight:.2} * children DISMAX {combined:.2}",
                weight * combined
            ),
        }
    }
}

/// What a node scorer can see besides the node itself.
pub(crate) struct NodeContext<'a> {
    pub algorithm: Algorithm,
    pub stats: &'a IndexStats,
}

pub(crate) type NodeScorer = fn(&NodeContext<'_>, &IndexResult, Option<&mut ScoreExplain>) -> f64;

/// Node scorers by [`ResultKind`] row and [`Algorithm`] column. `None`
/// falls back to [`aggregate::sum`].
const NODE_SCORERS: [[Option<NodeScorer>; Algorithm::COUNT]; ResultKind::COUNT] = [
    // TfIdf, Bm25, DisMax
    [Some(tfidf::term), Some(bm25::term), Some(dismax::leaf)],
    [Some(tfidf::virtual_leaf), Some(bm25::virtual_leaf), Some(dismax::leaf)],
    [None, None, None],
    [None, None, None],
    [None, None, Some(dismax::union)],
];

/// Dispatch one node through the table.
pub(crate) fn score_node(
    ctx: &NodeContext<'_>,
    node: &IndexResult,
    explain: Option<&mut ScoreExplain>,
) -> f64 {
    let scorer = NODE_SCORERS[node.kind.index()][ctx.algorithm.index()].unwrap_or(aggregate::sum);
    scorer(ctx, node, explain)
}

/// Raw contribution of `node` under `algorithm`, before any document-level
/// adjustment (document score, normalization, threshold, proximity).
pub fn raw_score(algorithm: Algorithm, stats: &IndexStats, node: &IndexResult) -> f64 {
    let ctx = NodeContext { algorithm, stats };
    score_node(&ctx, node, None)
}

/// Like [`raw_score`], also returning the explanation of the subtree.
pub fn raw_score_explained(
    algorithm: Algorithm,
    stats: &IndexStats,
    node: &IndexResult,
) -> (f64, ScoreExplain) {
    let ctx = NodeContext { algorithm, stats };
    let mut explain = ScoreExplain::default();
    let score = score_node(&ctx, node, Some(&mut explain));
    (score, explain)
}
