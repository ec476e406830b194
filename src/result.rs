//! Match results produced by query execution for a single document.
//!
//! A result is a tree: leaves are term matches ([`ResultKind::Term`]) or
//! matches that carry no term statistics such as numeric and tag filters
//! ([`ResultKind::Virtual`]); inner nodes combine their children the way the
//! query combined the clauses that produced them.
//!
//! ```text
//! Intersect (weight 1)
//! ├── Term "hello" (freq 2, idf 1.5, offsets [1, 7])
//! └── Union (weight 0.5)
//!     ├── Term "world" (freq 1, offsets [2])
//!     └── Term "+world" (freq 1, offsets [2])
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{RankError, Result};

/// Kind tag of a result node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Term,
    Virtual,
    Aggregate,
    Intersect,
    Union,
}

impl ResultKind {
    pub const COUNT: usize = 5;

    pub fn is_leaf(self) -> bool {
        matches!(self, ResultKind::Term | ResultKind::Virtual)
    }

    /// Row of this kind in the scoring dispatch table.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Statistics of a query term, shared by every result that matched it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermStats {
    pub text: String,
    /// Precomputed inverse document frequency.
    pub idf: f64,
}

impl TermStats {
    pub fn new<S: Into<String>>(text: S, idf: f64) -> Self {
        TermStats {
            text: text.into(),
            idf,
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

/// A node of the result tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexResult {
    pub kind: ResultKind,
    /// Query-time boost applied at this node, always positive.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Occurrences contributed by this node.
    #[serde(default)]
    pub freq: u32,
    #[serde(default)]
    pub term: Option<Arc<TermStats>>,
    /// Token positions matched by this node, ascending.
    #[serde(default)]
    pub offsets: Vec<u32>,
    #[serde(default)]
    pub children: Vec<IndexResult>,
}

impl IndexResult {
    /// A term match.
    pub fn term(term: Arc<TermStats>, freq: u32, offsets: Vec<u32>) -> Self {
        IndexResult {
            kind: ResultKind::Term,
            weight: 1.0,
            freq,
            term: Some(term),
            offsets,
            children: Vec::new(),
        }
    }

    /// A leaf without term statistics.
    pub fn virtual_leaf(freq: u32) -> Self {
        IndexResult {
            kind: ResultKind::Virtual,
            weight: 1.0,
            freq,
            term: None,
            offsets: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn aggregate(children: Vec<IndexResult>) -> Self {
        Self::composite(ResultKind::Aggregate, children)
    }

    pub fn intersect(children: Vec<IndexResult>) -> Self {
        Self::composite(ResultKind::Intersect, children)
    }

    pub fn union(children: Vec<IndexResult>) -> Self {
        Self::composite(ResultKind::Union, children)
    }

    fn composite(kind: ResultKind, children: Vec<IndexResult>) -> Self {
        IndexResult {
            kind,
            weight: 1.0,
            freq: children.iter().fold(0u32, |acc, c| acc.saturating_add(c.freq)),
            term: None,
            offsets: Vec::new(),
            children,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_offsets(mut self, offsets: Vec<u32>) -> Self {
        self.offsets = offsets;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }

    /// IDF of the matched term, 0 when the node has no term statistics.
    pub fn idf(&self) -> f64 {
        self.term.as_ref().map_or(0.0, |t| t.idf)
    }

    /// Check the node invariants over the whole subtree.
    pub fn validate(&self) -> Result<()> {
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(RankError::invalid_result(format!(
                "{:?} node has non-positive weight {}",
                self.kind, self.weight
            )));
        }
        if self.is_leaf() && !self.children.is_empty() {
            return Err(RankError::invalid_result(format!(
                "{:?} node cannot have children",
                self.kind
            )));
        }
        if !self.is_leaf() && self.children.is_empty() {
            return Err(RankError::invalid_result(format!(
                "{:?} node needs at least one child",
                self.kind
            )));
        }
        self.children.iter().try_for_each(IndexResult::validate)
    }

    /// Smallest positional gap between matches of different clauses anywhere
    /// in the subtree. Never less than 1; 1 when no gap can be measured.
    pub fn min_offset_delta(&self) -> u32 {
        self.min_gap().map_or(1, |gap| gap.max(1))
    }

    fn min_gap(&self) -> Option<u32> {
        if self.is_leaf() {
            return None;
        }

        let mut best = self.children.iter().filter_map(IndexResult::min_gap).min();
        // alternatives of one clause, measured by the parent as a single child
        if self.kind == ResultKind::Union {
            return best;
        }

        // positions tagged with the child they came from
        let mut positions = Vec::new();
        for (i, child) in self.children.iter().enumerate() {
            let mut offsets = Vec::new();
            child.collect_offsets(&mut offsets);
            positions.extend(offsets.into_iter().map(|pos| (pos, i)));
        }
        positions.sort_unstable();

        for pair in positions.windows(2) {
            let ((a, ca), (b, cb)) = (pair[0], pair[1]);
            if ca != cb {
                let gap = b - a;
                best = Some(best.map_or(gap, |cur| cur.min(gap)));
            }
        }
        best
    }

    fn collect_offsets(&self, out: &mut Vec<u32>) {
        out.extend_from_slice(&self.offsets);
        for child in &self.children {
            child.collect_offsets(out);
        }
    }
}
