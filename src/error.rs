/// Everything that can abort an evaluation.
///
/// Evaluation stops at the first error; no partial stack is ever returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("unknown token: {0}")]
    UnknownToken(String),

    #[error("invalid literal: {0}")]
    InvalidLiteral(String),

    #[error("{op}: needs {required} operands, {available} available")]
    InsufficientOperands {
        op: &'static str,
        required: usize,
        available: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("{op}: argument {value} out of domain")]
    Domain { op: &'static str, value: f64 },

    #[error("{op}: result is not a finite number")]
    NonFinite { op: &'static str },

    #[error("stack depth must be at least 2, got {0}")]
    InvalidDepth(usize),
}

pub type Result<T> = std::result::Result<T, EvalError>;
