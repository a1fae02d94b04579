mod error;
mod rpneval;
mod rpnprint;
mod scanner;
mod tokenizer;

pub use crate::error::{EvalError, Result};
pub use crate::rpneval::{evaluate, evaluate_str, Engine, EngineConfig, Entry};
pub use crate::rpnprint::{format_value, StackDisplay};
pub use crate::tokenizer::{classify, tokenize, BinaryOp, RpnTokenizer, StackOp, Token, UnaryOp};
