use log::trace;

use crate::error::Result;
use crate::expansion::ExpansionToken;
use crate::expansion::context::ExpanderContext;
use crate::index::synonym::group_id_term;

/// Emit the group-id term of every synonym group containing the token.
///
/// No-op when the index has no synonym map.
pub fn synonym_expand(ctx: &mut ExpanderContext<'_>, token: &ExpansionToken) -> Result<()> {
    let Some(synonyms) = ctx.index().synonyms() else {
        return Ok(());
    };
    let Some(ids) = synonyms.group_ids(&token.text) else {
        return Ok(());
    };

    trace!("'{}' belongs to {} synonym groups", token.text, ids.len());
    for &id in ids {
        ctx.expand_token(group_id_term(id), 0, token.field_mask);
    }
    Ok(())
}
