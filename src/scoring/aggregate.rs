//! Generic composite behavior shared by every algorithm.

use crate::result::IndexResult;
use crate::scoring::explain::ScoreExplain;
use crate::scoring::{NodeContext, score_node};

/// Fold the children's contributions with `combine`, starting from 0.
///
/// With explanation on, every child is scored into its own fresh explain
/// node which is then appended to `explain` in traversal order.
pub(crate) fn combine_children(
    ctx: &NodeContext<'_>,
    node: &IndexResult,
    explain: Option<&mut ScoreExplain>,
    combine: fn(f64, f64) -> f64,
) -> f64 {
    match explain {
        None => node
            .children
            .iter()
            .fold(0.0, |acc, child| combine(acc, score_node(ctx, child, None))),
        Some(explain) => {
            let mut acc = 0.0;
            for child in &node.children {
                let mut child_explain = ScoreExplain::default();
                acc = combine(acc, score_node(ctx, child, Some(&mut child_explain)));
                explain.push_child(child_explain);
            }
            acc
        }
    }
}

/// Weight times the sum of the children.
pub(crate) fn sum(
    ctx: &NodeContext<'_>,
    node: &IndexResult,
    mut explain: Option<&mut ScoreExplain>,
) -> f64 {
    let total = combine_children(ctx, node, explain.as_deref_mut(), |acc, s| acc + s);
    if let Some(explain) = explain {
        explain.set_description(ctx.algorithm.composite_description(node.weight, total));
    }
    node.weight * total
}
