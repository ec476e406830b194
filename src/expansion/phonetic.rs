use rphonetic::{DoubleMetaphone, Encoder};

use crate::error::Result;
use crate::expansion::ExpansionToken;
use crate::expansion::context::ExpanderContext;

/// Marks a term as a phonetic code.
pub const PHONETIC_PREFIX: char = '<';

/// Emit the primary Double Metaphone code of the token.
///
/// Field capability is not checked here; [`default_expand`](super::default_expand)
/// gates this expander on the index's phonetic fields. Tokens with non-ASCII
/// text get no code.
pub fn phonetic_expand(ctx: &mut ExpanderContext<'_>, token: &ExpansionToken) -> Result<()> {
    // the encoder indexes by byte
    if !token.text.is_ascii() {
        return Ok(());
    }
    let code = DoubleMetaphone::default().encode(&token.text);
    if code.is_empty() {
        return Ok(());
    }
    ctx.expand_token(format!("{PHONETIC_PREFIX}{code}"), 0, token.field_mask);
    Ok(())
}
