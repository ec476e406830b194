//! Stemming and word segmentation expander.
//!
//! Chinese queries are segmented into words with jieba; every other
//! language goes through the Snowball stemmer for that language, when one
//! exists.

use std::fmt;

use jieba_rs::Jieba;
use lazy_static::lazy_static;
use log::debug;
use rust_stemmers::Stemmer;

use crate::error::Result;
use crate::expansion::context::ExpanderContext;
use crate::expansion::{ExpansionToken, Language};

/// Marks a term as a stem so it can be told apart from a literal match.
pub const STEM_PREFIX: char = '+';

lazy_static! {
    static ref JIEBA: Jieba = Jieba::new();
}

/// Which stemming path a query uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StemmerKind {
    /// Affix-stripping Snowball stemmer.
    Snowball,
    /// No stemmer exists for the query language.
    Unavailable,
    /// Chinese word segmentation.
    Chinese,
}

/// Word segmenter over the shared jieba dictionary.
pub(crate) struct ChineseSegmenter {
    jieba: &'static Jieba,
}

impl ChineseSegmenter {
    fn new() -> Self {
        ChineseSegmenter { jieba: &JIEBA }
    }

    fn segment(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text, false)
            .into_iter()
            .filter(|word| !word.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Stemming state cached for the duration of one query's expansion.
pub(crate) enum StemmerHandle {
    Snowball {
        language: Language,
        stemmer: Option<Stemmer>,
    },
    Chinese(ChineseSegmenter),
}

impl StemmerHandle {
    pub(crate) fn new(language: Language) -> Self {
        let handle = match language {
            Language::Chinese => StemmerHandle::Chinese(ChineseSegmenter::new()),
            _ => StemmerHandle::Snowball {
                language,
                stemmer: language.stemmer_algorithm().map(Stemmer::create),
            },
        };
        debug!("created {:?} stemmer handle for {language}", handle.kind());
        handle
    }

    pub(crate) fn kind(&self) -> StemmerKind {
        match self {
            StemmerHandle::Snowball { stemmer: Some(_), .. } => StemmerKind::Snowball,
            StemmerHandle::Snowball { stemmer: None, .. } => StemmerKind::Unavailable,
            StemmerHandle::Chinese(_) => StemmerKind::Chinese,
        }
    }
}

impl fmt::Debug for StemmerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StemmerHandle::Snowball { language, stemmer } => f
                .debug_struct("Snowball")
                .field("language", language)
                .field("stemmer", &stemmer.as_ref().map(|_| "<stemmer>"))
                .finish(),
            StemmerHandle::Chinese(_) => f.write_str("Chinese"),
        }
    }
}

impl Drop for StemmerHandle {
    fn drop(&mut self) {
        debug!("released {:?} stemmer handle", self.kind());
    }
}

/// Emit the stem of the token, or its word segments for Chinese queries.
///
/// The stem is emitted with [`STEM_PREFIX`]. When it differs from the
/// token text, the unstemmed text follows as a second alternative.
/// Languages without a stemmer pass the token through untouched.
pub fn stemmer_expand(ctx: &mut ExpanderContext<'_>, token: &ExpansionToken) -> Result<()> {
    let field_mask = token.field_mask;

    match ctx.stemmer() {
        StemmerHandle::Chinese(segmenter) => {
            let segments = segmenter.segment(&token.text);
            if segments.is_empty() || (segments.len() == 1 && segments[0] == token.text) {
                return Ok(());
            }
            let tokens = segments
                .into_iter()
                .map(|text| {
                    ExpansionToken::new(text)
                        .with_flags(token.flags)
                        .with_field_mask(field_mask)
                })
                .collect();
            ctx.expand_phrase(tokens, true, false);
        }
        StemmerHandle::Snowball { stemmer: None, .. } => {}
        StemmerHandle::Snowball {
            stemmer: Some(stemmer),
            ..
        } => {
            let stem = stemmer.stem(&token.text).into_owned();
            let differs = stem != token.text;
            ctx.expand_token(format!("{STEM_PREFIX}{stem}"), 0, field_mask);
            if differs {
                ctx.expand_token(token.text.clone(), 0, field_mask);
            }
        }
    }
    Ok(())
}
