//! Score explanation trees.
//!
//! An explanation mirrors the shape of the result tree it was computed from:
//! one node per scored result node, children in traversal order, each node
//! owned by exactly one parent.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of a score derivation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreExplain {
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ScoreExplain>,
}

impl ScoreExplain {
    pub fn new<S: Into<String>>(description: S) -> Self {
        ScoreExplain {
            description: description.into(),
            children: Vec::new(),
        }
    }

    pub fn set_description<S: Into<String>>(&mut self, description: S) {
        self.description = description.into();
    }

    pub fn push_child(&mut self, child: ScoreExplain) {
        self.children.push(child);
    }

    pub fn with_child(mut self, child: ScoreExplain) -> Self {
        self.children.push(child);
        self
    }

    /// Total number of nodes in this tree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ScoreExplain::node_count).sum::<usize>()
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.description, indent = depth * 4)?;
        for child in &self.children {
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ScoreExplain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScoreExplain {
        ScoreExplain::new("Final TFIDF").with_child(
            ScoreExplain::new("(Weight 1.00 * total children TFIDF 3.00)")
                .with_child(ScoreExplain::new("(TFIDF 1.00 = Weight 1.00 * TF 1 * IDF 1.00)"))
                .with_child(ScoreExplain::new("(TFIDF 2.00 = Weight 1.00 * TF 2 * IDF 1.00)")),
        )
    }

    #[test]
    fn test_node_count() {
        assert_eq!(sample().node_count(), 4);
        assert_eq!(ScoreExplain::default().node_count(), 1);
    }

    #[test]
    fn test_display_indents_children() {
        let rendered = sample().to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Final TFIDF");
        assert_eq!(lines[1], "    (Weight 1.00 * total children TFIDF 3.00)");
        assert!(lines[2].starts_with("        (TFIDF 1.00"));
    }

    #[test]
    fn test_serialize_skips_empty_children() {
        let json = serde_json::to_value(ScoreExplain::new("leaf")).unwrap();
        assert_eq!(json, serde_json::json!({"description": "leaf"}));
    }
}
