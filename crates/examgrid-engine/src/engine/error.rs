//! Evaluation error codes.
//!
//! Every failure the evaluator can produce is one of three variants. The UI
//! shows [`EvalError::code`] in place of the cell value.

use thiserror::Error;

/// Errors returned by formula evaluation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Formula chasing went deeper than [`super::MAX_DEPTH`].
    #[error("circular reference")]
    Circular,

    /// The formula contains a character or word outside the formula language.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Runtime fault: empty-range aggregate, division by zero, malformed expression.
    #[error("evaluation error: {0}")]
    Evaluation(String),
}

impl EvalError {
    pub(crate) fn syntax(message: impl Into<String>) -> EvalError {
        EvalError::Syntax(message.into())
    }

    pub(crate) fn evaluation(message: impl Into<String>) -> EvalError {
        EvalError::Evaluation(message.into())
    }

    /// Short code displayed inside the offending cell.
    pub fn code(&self) -> &'static str {
        match self {
            EvalError::Circular => "#CIRCULAR!",
            EvalError::Syntax(_) => "#SYNTAX!",
            EvalError::Evaluation(_) => "#ERROR!",
        }
    }
}
