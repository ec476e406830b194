//! Okapi BM25 scorer.
//!
//! Term frequency saturation uses the index-wide average document length;
//! there is no per-document length in the denominator.
//! See <https://en.wikipedia.org/wiki/Okapi_BM25>.

use log::trace;

use crate::index::{DocumentMetadata, IndexStats};
use crate::result::IndexResult;
use crate::scoring::args::ScorerArgs;
use crate::scoring::explain::ScoreExplain;
use crate::scoring::{Algorithm, NodeContext, score_node};

/// Length normalization strength.
pub const BM25_B: f64 = 0.5;

/// Term frequency saturation.
pub const BM25_K1: f64 = 1.2;

fn saturation(f: f64, stats: &IndexStats) -> f64 {
    f + BM25_K1 * (1.0 - BM25_B + BM25_B * stats.avg_doc_len)
}

pub(crate) fn term(ctx: &NodeContext<'_>, node: &IndexResult, explain: Option<&mut ScoreExplain>) -> f64 {
    let f = f64::from(node.freq);
    let idf = node.idf();
    let score = idf * f / saturation(f, ctx.stats);
    if let Some(explain) = explain {
        explain.set_description(format!(
            "({score:.2} = IDF {idf:.2} * F {freq} / (F {freq} + k1 {BM25_K1} * (1 - b {BM25_B} + b {BM25_B} * Average Len {avg:.2})))",
            freq = node.freq,
            avg = ctx.stats.avg_doc_len,
        ));
    }
    score
}

pub(crate) fn virtual_leaf(
    ctx: &NodeContext<'_>,
    node: &IndexResult,
    explain: Option<&mut ScoreExplain>,
) -> f64 {
    if node.freq == 0 {
        if let Some(explain) = explain {
            explain.set_description("Frequency 0 -> value 0");
        }
        return 0.0;
    }

    let f = f64::from(node.freq);
    let score = node.weight * f / saturation(f, ctx.stats);
    if let Some(explain) = explain {
        explain.set_description(format!(
            "({score:.2} = Weight {:.2} * F {freq} / (F {freq} + k1 {BM25_K1} * (1 - b {BM25_B} + b {BM25_B} * Average Len {avg:.2})))",
            node.weight,
            freq = node.freq,
            avg = ctx.stats.avg_doc_len,
        ));
    }
    score
}

/// BM25 of the result tree times the document score, divided by the match slop.
pub fn bm25_scorer(
    args: &mut ScorerArgs<'_>,
    result: &IndexResult,
    dmd: &DocumentMetadata,
    min_score: f64,
) -> f64 {
    let ctx = NodeContext {
        algorithm: Algorithm::Bm25,
        stats: args.index_stats(),
    };
    let mut tree = args.new_explain();
    let raw = score_node(&ctx, result, tree.as_mut());
    let score = dmd.score * raw;

    if score < min_score {
        trace!("BM25 {score} below minimum score {min_score}, skipping proximity");
        args.explain_root(tree, || {
            format!("BM25 score of {score:.2} is smaller than minimum score {min_score:.2}")
        });
        return 0.0;
    }

    let slop = result.min_offset_delta();
    args.explain_root(tree, || {
        format!(
            "Final BM25 : words BM25 {raw:.2} * document score {:.2} / slop {slop}",
            dmd.score
        )
    });
    score / f64::from(slop)
}
