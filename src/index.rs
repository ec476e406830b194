//! Read-only view of the index consumed by scorers and expanders.
//!
//! The index itself (postings, document table, field specs on disk) is owned
//! elsewhere. This module only describes the aggregates a scorer reads for
//! one document and the field capabilities an expander checks before it
//! emits phonetic terms.

pub mod synonym;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{RankError, Result};
use crate::index::synonym::SynonymLookup;

/// Bitmask selecting fields by their position in the index spec.
pub type FieldMask = u64;

/// Mask that selects every field of the index.
pub const FIELD_MASK_ALL: FieldMask = FieldMask::MAX;

/// Maximum number of fields addressable by a [`FieldMask`].
pub const MAX_FIELDS: usize = FieldMask::BITS as usize;

/// Per-index aggregates, snapshotted once per query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStats {
    /// Mean weighted token count across the index.
    pub avg_doc_len: f64,
    /// Number of documents in the index.
    pub num_docs: u64,
    /// Number of distinct terms in the index.
    pub num_terms: u64,
}

impl IndexStats {
    pub fn new(avg_doc_len: f64) -> Self {
        IndexStats {
            avg_doc_len,
            ..Default::default()
        }
    }
}

/// Per-document metadata handed to a scorer along with the result tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Static prior score. The TF-IDF scorers treat 0 as "excluded from ranking".
    pub score: f64,
    /// Highest term frequency observed in the document.
    pub max_freq: u32,
    /// Weighted total token count.
    pub len: u32,
    /// Opaque payload, only read by the Hamming scorer.
    #[serde(default)]
    pub payload: Option<Vec<u8>>,
}

impl DocumentMetadata {
    pub fn new(score: f64, max_freq: u32, len: u32) -> Self {
        DocumentMetadata {
            score,
            max_freq,
            len,
            payload: None,
        }
    }

    pub fn with_payload<B: Into<Vec<u8>>>(mut self, payload: B) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// The payload bytes, empty when the document has none.
    pub fn payload(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or_default()
    }
}

/// A text field of the index and its capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// Whether phonetic terms are indexed for this field.
    #[serde(default)]
    pub phonetic: bool,
}

impl FieldSpec {
    pub fn new<S: Into<String>>(name: S) -> Self {
        FieldSpec {
            name: name.into(),
            phonetic: false,
        }
    }

    pub fn phonetic(mut self, phonetic: bool) -> Self {
        self.phonetic = phonetic;
        self
    }
}

/// Field layout and query-time capabilities of an index.
#[derive(Clone, Default)]
pub struct IndexSpec {
    fields: Vec<FieldSpec>,
    synonyms: Option<Arc<dyn SynonymLookup>>,
}

impl fmt::Debug for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexSpec")
            .field("fields", &self.fields)
            .field("synonyms", &self.synonyms.is_some())
            .finish()
    }
}

impl IndexSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a spec from a field list, in mask order.
    pub fn from_fields<I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = FieldSpec>,
    {
        let mut spec = IndexSpec::new();
        for field in fields {
            spec.add_field(field)?;
        }
        Ok(spec)
    }

    /// Add a field and return the mask bit assigned to it.
    pub fn add_field(&mut self, field: FieldSpec) -> Result<FieldMask> {
        if field.name.is_empty() {
            return Err(RankError::schema("Field name cannot be empty"));
        }
        if self.fields.iter().any(|f| f.name == field.name) {
            return Err(RankError::schema(format!(
                "Field '{}' already exists",
                field.name
            )));
        }
        if self.fields.len() >= MAX_FIELDS {
            return Err(RankError::schema(format!(
                "Cannot add field '{}': at most {MAX_FIELDS} fields are supported",
                field.name
            )));
        }

        let bit = 1 << self.fields.len();
        self.fields.push(field);
        Ok(bit)
    }

    pub fn with_synonyms(mut self, synonyms: Arc<dyn SynonymLookup>) -> Self {
        self.synonyms = Some(synonyms);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Mask bit of the named field.
    pub fn field_mask(&self, name: &str) -> Option<FieldMask> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .map(|i| 1 << i)
    }

    pub fn synonyms(&self) -> Option<&dyn SynonymLookup> {
        self.synonyms.as_deref()
    }

    /// Whether any field of the index is phonetic.
    pub fn has_phonetic(&self) -> bool {
        self.fields.iter().any(|f| f.phonetic)
    }

    /// Whether any field selected by `mask` is phonetic.
    pub fn check_phonetic_enabled(&self, mask: FieldMask) -> bool {
        if !self.has_phonetic() {
            return false;
        }
        if mask == FIELD_MASK_ALL {
            return true;
        }
        self.fields
            .iter()
            .enumerate()
            .any(|(i, f)| f.phonetic && mask & (1 << i) != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> IndexSpec {
        IndexSpec::from_fields([
            FieldSpec::new("title"),
            FieldSpec::new("name").phonetic(true),
            FieldSpec::new("body"),
        ])
        .unwrap()
    }

    #[test]
    fn test_field_masks_follow_insertion_order() {
        let spec = spec();
        assert_eq!(spec.field_mask("title"), Some(0b001));
        assert_eq!(spec.field_mask("name"), Some(0b010));
        assert_eq!(spec.field_mask("body"), Some(0b100));
        assert_eq!(spec.field_mask("missing"), None);
    }

    #[test]
    fn test_duplicate_and_empty_fields_rejected() {
        let mut spec = spec();
        assert!(spec.add_field(FieldSpec::new("title")).is_err());
        assert!(spec.add_field(FieldSpec::new("")).is_err());
    }

    #[test]
    fn test_field_limit() {
        let mut spec = IndexSpec::new();
        for i in 0..MAX_FIELDS {
            spec.add_field(FieldSpec::new(format!("f{i}"))).unwrap();
        }
        assert!(spec.add_field(FieldSpec::new("overflow")).is_err());
    }

    #[test]
    fn test_check_phonetic_enabled() {
        let spec = spec();
        assert!(spec.has_phonetic());
        assert!(spec.check_phonetic_enabled(FIELD_MASK_ALL));
        assert!(spec.check_phonetic_enabled(0b010));
        assert!(spec.check_phonetic_enabled(0b011));
        assert!(!spec.check_phonetic_enabled(0b101));

        let plain = IndexSpec::from_fields([FieldSpec::new("title")]).unwrap();
        assert!(!plain.has_phonetic());
        assert!(!plain.check_phonetic_enabled(FIELD_MASK_ALL));
    }

    #[test]
    fn test_document_payload_defaults_to_empty() {
        let dmd = DocumentMetadata::new(1.0, 2, 10);
        assert!(dmd.payload().is_empty());

        let dmd = dmd.with_payload(b"abc".to_vec());
        assert_eq!(dmd.payload(), b"abc");
    }
}
