//! Per-query expansion state.

use log::trace;

use crate::error::Result;
use crate::expansion::stemmer::{StemmerHandle, StemmerKind};
use crate::expansion::{
    Expansion, ExpansionToken, Language, PhoneticMode, QueryExpander, QueryOptions, TokenFlags,
};
use crate::index::{FieldMask, IndexSpec};

/// Expansion state of one query.
///
/// Collects what the expanders derive from the query's tokens and owns the
/// stemmer handle, which is created on first use and reused for every token
/// of the query. The handle is released when the context is finished or
/// dropped, whichever path the query builder takes.
#[derive(Debug)]
pub struct ExpanderContext<'a> {
    index: &'a IndexSpec,
    options: QueryOptions,
    stemmer: Option<StemmerHandle>,
    expansions: Vec<Expansion>,
}

impl<'a> ExpanderContext<'a> {
    pub fn new(index: &'a IndexSpec, options: QueryOptions) -> Self {
        ExpanderContext {
            index,
            options,
            stemmer: None,
            expansions: Vec::new(),
        }
    }

    pub fn index(&self) -> &'a IndexSpec {
        self.index
    }

    pub fn language(&self) -> Language {
        self.options.language
    }

    pub fn phonetic(&self) -> PhoneticMode {
        self.options.phonetic
    }

    /// Append a single-token alternative.
    pub fn expand_token<S: Into<String>>(&mut self, text: S, flags: TokenFlags, field_mask: FieldMask) {
        let token = ExpansionToken::new(text)
            .with_flags(flags)
            .with_field_mask(field_mask);
        trace!("expanded token '{}'", token.text);
        self.expansions.push(Expansion::Token(token));
    }

    /// Append a phrase of tokens.
    pub fn expand_phrase(&mut self, tokens: Vec<ExpansionToken>, replace: bool, exact: bool) {
        trace!("expanded phrase of {} tokens", tokens.len());
        self.expansions.push(Expansion::Phrase {
            tokens,
            replace,
            exact,
        });
    }

    /// Run `expander` over every token of a query, stopping at the first error.
    pub fn expand_all(&mut self, expander: &dyn QueryExpander, tokens: &[ExpansionToken]) -> Result<()> {
        for token in tokens {
            expander.expand(self, token)?;
        }
        Ok(())
    }

    pub fn expansions(&self) -> &[Expansion] {
        &self.expansions
    }

    /// Rendered expansions, in emission order.
    pub fn expanded_texts(&self) -> Vec<String> {
        self.expansions.iter().map(ToString::to_string).collect()
    }

    /// Kind of the stemmer handle, `None` until a token was stemmed.
    pub fn stemmer_kind(&self) -> Option<StemmerKind> {
        self.stemmer.as_ref().map(StemmerHandle::kind)
    }

    /// End the expansion phase, releasing the stemmer handle.
    pub fn finish(self) -> Vec<Expansion> {
        self.expansions
    }

    /// The query's stemmer handle, created on first call.
    pub(crate) fn stemmer(&mut self) -> &mut StemmerHandle {
        let language = self.options.language;
        self.stemmer.get_or_insert_with(|| StemmerHandle::new(language))
    }
}
