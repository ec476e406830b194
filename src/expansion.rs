//! Query token expansion.
//!
//! Expanders derive additional query terms from a single query token:
//! synonym group ids, phonetic codes, stems and word segments. They run
//! once per token while the query is being built and append what they derive
//! to the query's [`ExpanderContext`]; the query builder then merges those
//! expansions into the term set of the query.
//!
//! Expanders only ever append. The input token stays owned by the caller
//! and is never consumed or replaced, even by the stemmer, which still runs
//! last in the default chain.
//!
//! # Registered expanders
//!
//! | Name       | Function             |
//! |------------|----------------------|
//! | `DEFAULT`  | [`default_expand`]   |
//! | `SBSTEM`   | [`stemmer_expand`]   |
//! | `SYNONYM`  | [`synonym_expand`]   |
//! | `PHONETIC` | [`phonetic_expand`]  |
//!
//! # Examples
//!
//! ```
//! use rankext::expansion::{ExpanderContext, ExpansionToken, QueryOptions, stemmer_expand};
//! use rankext::index::IndexSpec;
//!
//! let index = IndexSpec::new();
//! let mut ctx = ExpanderContext::new(&index, QueryOptions::default());
//! stemmer_expand(&mut ctx, &ExpansionToken::new("running")).unwrap();
//!
//! assert_eq!(ctx.expanded_texts(), vec!["+run", "running"]);
//! ```

pub mod context;
pub mod language;

mod default;
mod phonetic;
mod stemmer;
mod synonym;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RankError, Result};
use crate::index::{FIELD_MASK_ALL, FieldMask};

pub use context::ExpanderContext;
pub use default::default_expand;
pub use language::Language;
pub use phonetic::{PHONETIC_PREFIX, phonetic_expand};
pub use stemmer::{STEM_PREFIX, StemmerKind, stemmer_expand};
pub use synonym::synonym_expand;

pub const DEFAULT_EXPANDER_NAME: &str = "DEFAULT";
pub const STEMMER_EXPANDER_NAME: &str = "SBSTEM";
pub const SYNONYMS_EXPANDER_NAME: &str = "SYNONYM";
pub const PHONETIC_EXPANDER_NAME: &str = "PHONETIC";

/// Processing flags carried by a token.
pub type TokenFlags = u32;

/// A query token handed to, or produced by, an expander.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionToken {
    pub text: String,
    #[serde(default)]
    pub flags: TokenFlags,
    /// Fields this token applies to.
    #[serde(default = "default_field_mask")]
    pub field_mask: FieldMask,
}

fn default_field_mask() -> FieldMask {
    FIELD_MASK_ALL
}

impl ExpansionToken {
    /// A token with no flags that applies to every field.
    pub fn new<S: Into<String>>(text: S) -> Self {
        ExpansionToken {
            text: text.into(),
            flags: 0,
            field_mask: FIELD_MASK_ALL,
        }
    }

    pub fn with_flags(mut self, flags: TokenFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_field_mask(mut self, field_mask: FieldMask) -> Self {
        self.field_mask = field_mask;
        self
    }

    /// Byte length of the text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One unit of expander output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expansion {
    /// An alternative to the original token.
    Token(ExpansionToken),
    /// A sequence of tokens matched together.
    Phrase {
        tokens: Vec<ExpansionToken>,
        /// The phrase takes the place of the original token instead of
        /// being an alternative to it.
        replace: bool,
        /// The phrase terms must be adjacent.
        exact: bool,
    },
}

impl Expansion {
    pub fn as_token(&self) -> Option<&ExpansionToken> {
        match self {
            Expansion::Token(token) => Some(token),
            Expansion::Phrase { .. } => None,
        }
    }
}

impl fmt::Display for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expansion::Token(token) => write!(f, "{}", token.text),
            Expansion::Phrase {
                tokens,
                replace,
                exact,
            } => {
                let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
                write!(f, "({})", texts.join(" "))?;
                if *replace {
                    write!(f, " [replace]")?;
                }
                if *exact {
                    write!(f, " [exact]")?;
                }
                Ok(())
            }
        }
    }
}

/// Per-query phonetic matching option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhoneticMode {
    /// Expand phonetically only when a matching field is phonetic.
    #[default]
    Default,
    /// Always expand; the token's fields must be phonetic.
    Enabled,
    /// Never expand; the token's fields must still be phonetic.
    Disabled,
}

impl FromStr for PhoneticMode {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(PhoneticMode::Default),
            "enabled" | "on" | "true" => Ok(PhoneticMode::Enabled),
            "disabled" | "off" | "false" => Ok(PhoneticMode::Disabled),
            other => Err(RankError::invalid_argument(format!(
                "Unknown phonetic mode '{other}'"
            ))),
        }
    }
}

/// Query-level settings read by the expanders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    pub language: Language,
    pub phonetic: PhoneticMode,
}

/// A named query expander.
///
/// Implemented for every `Fn` with the expander signature, so plain
/// functions and closures can both be registered.
pub trait QueryExpander: Send + Sync {
    fn expand(&self, ctx: &mut ExpanderContext<'_>, token: &ExpansionToken) -> Result<()>;
}

impl<F> QueryExpander for F
where
    F: Fn(&mut ExpanderContext<'_>, &ExpansionToken) -> Result<()> + Send + Sync,
{
    fn expand(&self, ctx: &mut ExpanderContext<'_>, token: &ExpansionToken) -> Result<()> {
        self(ctx, token)
    }
}
