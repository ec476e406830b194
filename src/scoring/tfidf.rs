//! TF-IDF scorers.
//!
//! Two variants share the tree walk and differ only in how the summed
//! TF-IDF is normalized: by the document's highest term frequency
//! ([`tfidf_scorer`]) or by its weighted token count
//! ([`tfidf_doc_norm_scorer`]).

use log::trace;

use crate::index::DocumentMetadata;
use crate::result::IndexResult;
use crate::scoring::args::ScorerArgs;
use crate::scoring::explain::ScoreExplain;
use crate::scoring::{Algorithm, NodeContext, score_node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Normalization {
    MaxFreq,
    DocLen,
}

pub(crate) fn term(_ctx: &NodeContext<'_>, node: &IndexResult, explain: Option<&mut ScoreExplain>) -> f64 {
    let idf = node.idf();
    let score = node.weight * f64::from(node.freq) * idf;
    if let Some(explain) = explain {
        explain.set_description(format!(
            "(TFIDF {score:.2} = Weight {:.2} * TF {} * IDF {idf:.2})",
            node.weight, node.freq
        ));
    }
    score
}

pub(crate) fn virtual_leaf(
    _ctx: &NodeContext<'_>,
    node: &IndexResult,
    explain: Option<&mut ScoreExplain>,
) -> f64 {
    let score = node.weight * f64::from(node.freq);
    if let Some(explain) = explain {
        explain.set_description(format!(
            "(TFIDF {score:.2} = Weight {:.2} * Frequency {})",
            node.weight, node.freq
        ));
    }
    score
}

fn score(
    args: &mut ScorerArgs<'_>,
    result: &IndexResult,
    dmd: &DocumentMetadata,
    min_score: f64,
    normalization: Normalization,
) -> f64 {
    if dmd.score == 0.0 {
        args.explain_root(None, || "Document score is 0".to_string());
        return 0.0;
    }

    let norm = match normalization {
        Normalization::MaxFreq => dmd.max_freq,
        Normalization::DocLen => dmd.len,
    }
    .max(1);

    let ctx = NodeContext {
        algorithm: Algorithm::TfIdf,
        stats: args.index_stats(),
    };
    let mut tree = args.new_explain();
    let raw = score_node(&ctx, result, tree.as_mut());
    let tfidf = dmd.score * raw / f64::from(norm);

    // proximity only matters for documents that can still make the cut
    if tfidf < min_score {
        trace!("TFIDF {tfidf} below minimum score {min_score}, skipping proximity");
        args.explain_root(tree, || {
            format!("TFIDF score of {tfidf:.2} is smaller than minimum score {min_score:.2}")
        });
        return 0.0;
    }

    let slop = result.min_offset_delta();
    args.explain_root(tree, || {
        format!(
            "Final TFIDF : words TFIDF {raw:.2} * document score {:.2} / norm {norm} / slop {slop}",
            dmd.score
        )
    });
    tfidf / f64::from(slop)
}

/// Sum of TF-IDF times document score, TF normalized by the document's
/// maximum term frequency, divided by the match slop.
pub fn tfidf_scorer(
    args: &mut ScorerArgs<'_>,
    result: &IndexResult,
    dmd: &DocumentMetadata,
    min_score: f64,
) -> f64 {
    score(args, result, dmd, min_score, Normalization::MaxFreq)
}

/// Same as [`tfidf_scorer`] but TF is normalized by the weighted document length.
pub fn tfidf_doc_norm_scorer(
    args: &mut ScorerArgs<'_>,
    result: &IndexResult,
    dmd: &DocumentMetadata,
    min_score: f64,
) -> f64 {
    score(args, result, dmd, min_score, Normalization::DocLen)
}
