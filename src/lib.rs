//! # rankext
//!
//! Relevance scoring and query token expansion for a full-text search engine.
//!
//! ## Features
//!
//! - Result-tree scoring: TF-IDF, TF-IDF normalized by document length,
//!   BM25, DisMax, raw document score and Hamming distance over payloads
//! - Proximity adjustment from the offsets of matched terms
//! - Optional explain trees mirroring each score computation
//! - Query expansion with synonyms, Double Metaphone codes, Snowball stems
//!   and Chinese word segmentation
//! - A named registry for custom scorers and expanders

pub mod cli;
pub mod config;
pub mod error;
pub mod expansion;
pub mod extension;
pub mod index;
pub mod result;
pub mod scoring;

pub mod prelude {
    pub use crate::error::{RankError, Result};
    pub use crate::expansion::{ExpanderContext, Expansion, ExpansionToken, QueryOptions};
    pub use crate::extension::ExtensionRegistry;
    pub use crate::index::{DocumentMetadata, IndexSpec, IndexStats};
    pub use crate::result::{IndexResult, TermStats};
    pub use crate::scoring::{DocumentScore, ScoreExplain, ScorerArgs};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
