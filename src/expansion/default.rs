use log::debug;

use crate::error::{RankError, Result};
use crate::expansion::context::ExpanderContext;
use crate::expansion::phonetic::phonetic_expand;
use crate::expansion::stemmer::stemmer_expand;
use crate::expansion::synonym::synonym_expand;
use crate::expansion::{ExpansionToken, PhoneticMode};

/// The default expander chain: synonyms, then phonetics, then stemming.
///
/// Under [`PhoneticMode::Default`] phonetic expansion only runs when one of
/// the token's fields is phonetic. An explicit mode requires the token's
/// fields to support phonetics and fails with a validation error otherwise,
/// before phonetics or stemming run. Synonym expansions already emitted for
/// the token are kept.
pub fn default_expand(ctx: &mut ExpanderContext<'_>, token: &ExpansionToken) -> Result<()> {
    synonym_expand(ctx, token)?;

    let phonetic_fields = ctx.index().check_phonetic_enabled(token.field_mask);
    let run_phonetic = match ctx.phonetic() {
        PhoneticMode::Default => phonetic_fields,
        mode => {
            if !phonetic_fields {
                debug!(
                    "phonetic mode {mode:?} rejected for '{}': field mask {:#x} has no phonetic field",
                    token.text, token.field_mask
                );
                return Err(RankError::validation("field does not support phonetics"));
            }
            mode == PhoneticMode::Enabled
        }
    };
    if run_phonetic {
        phonetic_expand(ctx, token)?;
    }

    stemmer_expand(ctx, token)
}
