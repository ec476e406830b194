//! Per-document scorer arguments.

use crate::index::IndexStats;
use crate::scoring::explain::ScoreExplain;

/// Everything a scorer receives besides the result tree and the document.
///
/// Built for a single document. When explanation is requested the scorer
/// leaves the explain tree here; it is owned by these arguments and dropped
/// with them unless taken with [`ScorerArgs::take_explanation`].
#[derive(Debug, Clone)]
pub struct ScorerArgs<'a> {
    index_stats: IndexStats,
    payload: &'a [u8],
    explain_requested: bool,
    explanation: Option<ScoreExplain>,
}

impl<'a> ScorerArgs<'a> {
    pub fn new(index_stats: IndexStats) -> Self {
        ScorerArgs {
            index_stats,
            payload: &[],
            explain_requested: false,
            explanation: None,
        }
    }

    /// Attach the query payload compared by payload-aware scorers.
    pub fn with_payload(mut self, payload: &'a [u8]) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain_requested = explain;
        self
    }

    pub fn index_stats(&self) -> &IndexStats {
        &self.index_stats
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    pub fn explain_requested(&self) -> bool {
        self.explain_requested
    }

    /// The explanation left by the last scoring call.
    pub fn explanation(&self) -> Option<&ScoreExplain> {
        self.explanation.as_ref()
    }

    pub fn take_explanation(&mut self) -> Option<ScoreExplain> {
        self.explanation.take()
    }

    /// A fresh explain node, or `None` when explanation is off.
    pub fn new_explain(&self) -> Option<ScoreExplain> {
        self.explain_requested.then(ScoreExplain::default)
    }

    /// Store `explanation` as the result of this scoring call.
    pub fn set_explanation(&mut self, explanation: Option<ScoreExplain>) {
        if self.explain_requested {
            self.explanation = explanation;
        }
    }

    /// Wrap the explanation of the result tree (if any) under a root node
    /// describing the document-level adjustment.
    pub fn explain_root<F>(&mut self, tree: Option<ScoreExplain>, describe: F)
    where
        F: FnOnce() -> String,
    {
        if !self.explain_requested {
            return;
        }
        let mut root = ScoreExplain::new(describe());
        if let Some(tree) = tree {
            root.push_child(tree);
        }
        self.explanation = Some(root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_disabled_by_default() {
        let mut args = ScorerArgs::new(IndexStats::default());
        assert!(!args.explain_requested());
        assert!(args.new_explain().is_none());

        args.explain_root(None, || "never rendered".to_string());
        assert!(args.explanation().is_none());
    }

    #[test]
    fn test_explain_root_wraps_tree() {
        let mut args = ScorerArgs::new(IndexStats::default()).with_explain(true);
        let tree = ScoreExplain::new("(TFIDF 2.00 = Weight 1.00 * TF 2 * IDF 1.00)");

        args.explain_root(Some(tree), || "Final TFIDF".to_string());

        let explanation = args.take_explanation().unwrap();
        assert_eq!(explanation.description, "Final TFIDF");
        assert_eq!(explanation.children.len(), 1);
        assert!(args.explanation().is_none());
    }

    #[test]
    fn test_payload() {
        let payload = b"\x01\x02".to_vec();
        let args = ScorerArgs::new(IndexStats::default()).with_payload(&payload);
        assert_eq!(args.payload(), &[1, 2]);
    }
}
