use crate::error::{EvalError, Result};
use crate::scanner::Scanner;
use log::trace;
use std::fmt;

/// Functions of one argument, applied to X in place.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum UnaryOp {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Exp,
    Ln,
    Log10,
    Sqrt,
    Chs,
    Inv,
}

/// Functions of two arguments, always evaluated as `Y op X`.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Keys that rearrange the stack without computing anything.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum StackOp {
    Enter,
    Swap,
    RollDown,
    Drop,
    LastX,
    Pi,
    ClearX,
    ClearStack,
    Store(usize),
    Recall(usize),
}

/// Number of storage registers addressable by `sto`/`rcl`.
pub const STORAGE_REGISTERS: usize = 10;

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Token {
    Literal(f64),
    Unary(UnaryOp),
    Binary(BinaryOp),
    Stack(StackOp),
}

impl UnaryOp {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::Asin => "asin",
            UnaryOp::Acos => "acos",
            UnaryOp::Atan => "atan",
            UnaryOp::Exp => "exp",
            UnaryOp::Ln => "ln",
            UnaryOp::Log10 => "log",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Chs => "chs",
            UnaryOp::Inv => "inv",
        }
    }
}

impl BinaryOp {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }
}

impl StackOp {
    pub fn name(self) -> &'static str {
        match self {
            StackOp::Enter => "enter",
            StackOp::Swap => "swap",
            StackOp::RollDown => "rdn",
            StackOp::Drop => "drop",
            StackOp::LastX => "lastx",
            StackOp::Pi => "pi",
            StackOp::ClearX => "clx",
            StackOp::ClearStack => "cls",
            StackOp::Store(_) => "sto",
            StackOp::Recall(_) => "rcl",
        }
    }
}

impl Token {
    /// Look up an operator or stack command, ignoring case.
    pub fn from_word(word: &str) -> Option<Token> {
        let lower = word.to_ascii_lowercase();
        let token = match &lower[..] {
            "+" => Token::Binary(BinaryOp::Add),
            "-" => Token::Binary(BinaryOp::Sub),
            "*" => Token::Binary(BinaryOp::Mul),
            "/" => Token::Binary(BinaryOp::Div),
            "^" | "pow" => Token::Binary(BinaryOp::Pow),
            "sin" => Token::Unary(UnaryOp::Sin),
            "cos" => Token::Unary(UnaryOp::Cos),
            "tan" => Token::Unary(UnaryOp::Tan),
            "asin" => Token::Unary(UnaryOp::Asin),
            "acos" => Token::Unary(UnaryOp::Acos),
            "atan" => Token::Unary(UnaryOp::Atan),
            "exp" => Token::Unary(UnaryOp::Exp),
            "ln" => Token::Unary(UnaryOp::Ln),
            "log" => Token::Unary(UnaryOp::Log10),
            "sqrt" => Token::Unary(UnaryOp::Sqrt),
            "chs" => Token::Unary(UnaryOp::Chs),
            "inv" | "1/x" => Token::Unary(UnaryOp::Inv),
            "enter" => Token::Stack(StackOp::Enter),
            "swap" | "x<>y" => Token::Stack(StackOp::Swap),
            "rdn" => Token::Stack(StackOp::RollDown),
            "drop" => Token::Stack(StackOp::Drop),
            "lastx" => Token::Stack(StackOp::LastX),
            "pi" => Token::Stack(StackOp::Pi),
            "clx" => Token::Stack(StackOp::ClearX),
            "cls" => Token::Stack(StackOp::ClearStack),
            other => return Self::storage_op(other),
        };
        Some(token)
    }

    // sto0..sto9 and rcl0..rcl9
    fn storage_op(word: &str) -> Option<Token> {
        if word.len() != 4 || !word.is_char_boundary(3) {
            return None;
        }
        let (key, idx) = word.split_at(3);
        let idx = idx.parse::<usize>().ok()?;
        match key {
            "sto" => Some(Token::Stack(StackOp::Store(idx))),
            "rcl" => Some(Token::Stack(StackOp::Recall(idx))),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Token::Literal(v) => write!(f, "{}", v),
            Token::Unary(op) => write!(f, "{}", op.name()),
            Token::Binary(op) => write!(f, "{}", op.name()),
            Token::Stack(StackOp::Store(n)) => write!(f, "sto{}", n),
            Token::Stack(StackOp::Recall(n)) => write!(f, "rcl{}", n),
            Token::Stack(op) => write!(f, "{}", op.name()),
        }
    }
}

// A word is numeric-shaped when it starts with a digit, possibly behind a
// sign and/or a decimal point.
fn looks_numeric(word: &str) -> bool {
    let rest = word.trim_start_matches(|c: char| c == '+' || c == '-');
    if rest.len() + 1 < word.len() {
        return false; // more than one sign
    }
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    rest.starts_with(|c: char| c.is_ascii_digit())
}

fn parse_literal(word: &str) -> Result<f64> {
    let mut scanner = Scanner::new(word.chars());
    let complete = scanner.scan_number().is_some() && scanner.peek().is_none();
    if !complete {
        return Err(EvalError::InvalidLiteral(word.to_string()));
    }
    match word.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(EvalError::InvalidLiteral(word.to_string())),
    }
}

/// Classify a single whitespace-free word.
pub fn classify(word: &str) -> Result<Token> {
    if let Some(token) = Token::from_word(word) {
        return Ok(token);
    }
    if looks_numeric(word) {
        return parse_literal(word).map(Token::Literal);
    }
    Err(EvalError::UnknownToken(word.to_string()))
}

/// Splits its input on whitespace and classifies every word.
pub struct RpnTokenizer<I: Iterator<Item = char>> {
    src: Scanner<I>,
}

impl<I: Iterator<Item = char>> RpnTokenizer<I> {
    pub fn new(source: I) -> Self {
        RpnTokenizer {
            src: Scanner::new(source),
        }
    }
}

impl<I: Iterator<Item = char>> Iterator for RpnTokenizer<I> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.src.skip_whitespace();
        let word = self.src.scan_word()?;
        let token = classify(&word);
        trace!("{:?} -> {:?}", word, token);
        Some(token)
    }
}

/// Tokenize a whole expression, stopping at the first bad word.
pub fn tokenize(expr: &str) -> Result<Vec<Token>> {
    RpnTokenizer::new(expr.chars()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize1() {
        let tokens = tokenize("5 4 2 / SIN - 1 +").unwrap();
        let expect = vec![
            Token::Literal(5.0),
            Token::Literal(4.0),
            Token::Literal(2.0),
            Token::Binary(BinaryOp::Div),
            Token::Unary(UnaryOp::Sin),
            Token::Binary(BinaryOp::Sub),
            Token::Literal(1.0),
            Token::Binary(BinaryOp::Add),
        ];
        assert_eq!(tokens, expect);
    }

    #[test]
    fn test_tokenize2() {
        let tokens = tokenize("  -3.5e2\t+.25 -\n x<>y Sto7 RCL0 1/x pow ").unwrap();
        let expect = vec![
            Token::Literal(-350.0),
            Token::Literal(0.25),
            Token::Binary(BinaryOp::Sub),
            Token::Stack(StackOp::Swap),
            Token::Stack(StackOp::Store(7)),
            Token::Stack(StackOp::Recall(0)),
            Token::Unary(UnaryOp::Inv),
            Token::Binary(BinaryOp::Pow),
        ];
        assert_eq!(tokens, expect);
    }

    #[test]
    fn test_empty() {
        assert_eq!(tokenize(""), Ok(vec![]));
        assert_eq!(tokenize(" \t\n "), Ok(vec![]));
    }

    #[test]
    fn bad_tokens() {
        assert_eq!(tokenize("1 2 %"), Err(EvalError::UnknownToken("%".to_string())));
        assert_eq!(tokenize("3 x"), Err(EvalError::UnknownToken("x".to_string())));
        assert_eq!(tokenize("sto10"), Err(EvalError::UnknownToken("sto10".to_string())));
        assert_eq!(tokenize("--5"), Err(EvalError::UnknownToken("--5".to_string())));
        assert_eq!(tokenize("nan"), Err(EvalError::UnknownToken("nan".to_string())));
    }

    #[test]
    fn bad_literals() {
        for word in &["1.2.3", "12abc", "3e+", "-.5x", "1e999"] {
            assert_eq!(
                classify(word),
                Err(EvalError::InvalidLiteral(word.to_string())),
                "{}",
                word
            );
        }
    }

    #[test]
    fn test_display() {
        let tokens = tokenize("1.5 sto3 rcl3 ^ rdn log").unwrap();
        let shown: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(shown, vec!["1.5", "sto3", "rcl3", "^", "rdn", "log"]);
    }
}
