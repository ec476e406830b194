//! DisMax-style scorer: ranks on term frequencies alone, letting the
//! strongest branch of a union win instead of summing every branch.

use crate::index::DocumentMetadata;
use crate::result::IndexResult;
use crate::scoring::aggregate::combine_children;
use crate::scoring::args::ScorerArgs;
use crate::scoring::explain::ScoreExplain;
use crate::scoring::{Algorithm, NodeContext, score_node};

pub(crate) fn leaf(_ctx: &NodeContext<'_>, node: &IndexResult, explain: Option<&mut ScoreExplain>) -> f64 {
    let score = node.weight * f64::from(node.freq);
    if let Some(explain) = explain {
        explain.set_description(format!(
            "DISMAX {score:.2} = Weight {:.2} * Frequency {}",
            node.weight, node.freq
        ));
    }
    score
}

pub(crate) fn union(ctx: &NodeContext<'_>, node: &IndexResult, mut explain: Option<&mut ScoreExplain>) -> f64 {
    let best = combine_children(ctx, node, explain.as_deref_mut(), f64::max);
    if let Some(explain) = explain {
        explain.set_description(ctx.algorithm.composite_description(node.weight, best));
    }
    node.weight * best
}

/// Raw DisMax score of the result tree. Ignores the document entirely.
pub fn dismax_scorer(
    args: &mut ScorerArgs<'_>,
    result: &IndexResult,
    _dmd: &DocumentMetadata,
    _min_score: f64,
) -> f64 {
    let ctx = NodeContext {
        algorithm: Algorithm::DisMax,
        stats: args.index_stats(),
    };
    let mut tree = args.new_explain();
    let score = score_node(&ctx, result, tree.as_mut());
    args.set_explanation(tree);
    score
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::index::IndexStats;
    use crate::result::TermStats;

    fn term_result(freq: u32) -> IndexResult {
        IndexResult::term(Arc::new(TermStats::new("t", 100.0)), freq, vec![0])
    }

    #[test]
    fn test_dismax_ignores_document_and_threshold() {
        let result = IndexResult::intersect(vec![
            term_result(2),
            IndexResult::union(vec![term_result(1), term_result(4)]).with_weight(0.5),
        ]);
        let mut args = ScorerArgs::new(IndexStats::default());

        // 2 + 0.5 * max(1, 4)
        let dmd = DocumentMetadata::new(0.0, 1, 1);
        assert_eq!(dismax_scorer(&mut args, &result, &dmd, 1000.0), 4.0);
    }

    #[test]
    fn test_explanation() {
        let result = IndexResult::union(vec![term_result(1), term_result(3)]).with_weight(2.0);
        let mut args = ScorerArgs::new(IndexStats::default()).with_explain(true);

        let score = dismax_scorer(&mut args, &result, &DocumentMetadata::default(), 0.0);
        let explain = args.take_explanation().unwrap();

        assert_eq!(score, 6.0);
        assert_eq!(explain.description, "6.00 = Weight 2.00 * children DISMAX 3.00");
        assert_eq!(explain.children.len(), 2);
        assert_eq!(explain.children[1].description, "DISMAX 3.00 = Weight 1.00 * Frequency 3");
    }
}
