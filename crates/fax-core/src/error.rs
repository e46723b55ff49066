//! Error kinds raised by the core.
//!
//! Message text is part of the stable contract (spec §4.1/§4.5 quote these
//! verbatim), so the templates live here as `#[error(...)]` strings rather
//! than being assembled ad hoc at call sites.

use thiserror::Error;

/// The four error kinds the core ever raises (spec §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unhashable type: '{type_name}'")]
    Unhashable { type_name: String },

    #[error("{method}() argument {index} expects {expected}, not '{actual}'")]
    WrongArgumentType {
        method: String,
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("{method}() missing required positional argument: '{name}'")]
    MissingRequiredArgument { method: String, name: String },

    #[error("{method}() got multiple values for argument '{name}'")]
    MultipleValuesForArgument { method: String, name: String },

    #[error("{method}() got an unexpected keyword argument '{name}'")]
    UnexpectedKeywordArgument { method: String, name: String },

    #[error("{method}() takes exactly {count} argument(s) ({given} given)")]
    TakesExactly {
        method: String,
        count: usize,
        given: usize,
    },

    #[error("{method}() takes at most {count} argument(s) ({given} given)")]
    TakesAtMost {
        method: String,
        count: usize,
        given: usize,
    },

    #[error("unknown format directive '{directive}' in {method}()")]
    BadFormatDirective { method: String, directive: char },

    #[error("{0}")]
    ValueError(String),

    #[error("{0}")]
    NotImplemented(String),
}

impl CoreError {
    /// `ArgumentError` is a distinct kind at the spec level (§7) but shares
    /// the `TakesExactly`/`TakesAtMost` representation; this is how callers
    /// tell the two "kinds" of TypeError-shaped errors apart without a
    /// separate enum layer.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, CoreError::TakesExactly { .. } | CoreError::TakesAtMost { .. })
    }

    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            CoreError::Unhashable { .. }
                | CoreError::WrongArgumentType { .. }
                | CoreError::MissingRequiredArgument { .. }
                | CoreError::MultipleValuesForArgument { .. }
                | CoreError::UnexpectedKeywordArgument { .. }
                | CoreError::BadFormatDirective { .. }
        )
    }
}
