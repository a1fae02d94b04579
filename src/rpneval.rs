use crate::error::{EvalError, Result};
use crate::tokenizer::{tokenize, BinaryOp, StackOp, Token, UnaryOp, STORAGE_REGISTERS};
use log::{debug, trace};
use std::collections::VecDeque;

/// What the engine saw last, as far as the next entered value cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Nothing entered yet; X is a placeholder zero.
    Start,
    AfterLiteral,
    AfterOperator,
    /// `enter` or `clx`: X may be overwritten by the next value.
    AfterEnter,
}

impl Entry {
    fn lifts(self) -> bool {
        matches!(self, Entry::AfterLiteral | Entry::AfterOperator)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Limit on the number of registers. A lift on a full stack loses the
    /// deepest register. `None` means unbounded.
    pub max_depth: Option<usize>,
}

/// A calculator register stack. Index 0 is X, index 1 is Y and so on.
///
/// Values are entered with HP-style stack lift: a value entered right
/// after another value or after an operator pushes a new X, while the
/// first value of a session (or the one after `enter`/`clx`) replaces X.
#[derive(Debug, Clone)]
pub struct Engine {
    registers: VecDeque<f64>,
    entry: Entry,
    last_x: f64,
    storage: [f64; STORAGE_REGISTERS],
    max_depth: Option<usize>,
}

impl Engine {
    pub fn new() -> Engine {
        Engine {
            registers: VecDeque::from(vec![0.0]),
            entry: Entry::Start,
            last_x: 0.0,
            storage: [0.0; STORAGE_REGISTERS],
            max_depth: None,
        }
    }

    pub fn with_config(config: EngineConfig) -> Result<Engine> {
        if let Some(depth) = config.max_depth {
            if depth < 2 {
                return Err(EvalError::InvalidDepth(depth));
            }
        }
        Ok(Engine {
            max_depth: config.max_depth,
            ..Engine::new()
        })
    }

    /// Back to a single zero register, keeping the configuration.
    pub fn reset(&mut self) {
        *self = Engine {
            max_depth: self.max_depth,
            ..Engine::new()
        };
    }

    pub fn x(&self) -> f64 {
        self.registers[0]
    }

    pub fn registers(&self) -> Vec<f64> {
        self.registers.iter().copied().collect()
    }

    pub fn depth(&self) -> usize {
        self.registers.len()
    }

    /// Registers holding real operands. The zero X of a fresh stack
    /// doesn't count.
    pub fn available(&self) -> usize {
        match self.entry {
            Entry::Start => 0,
            _ => self.registers.len(),
        }
    }

    pub fn entry(&self) -> Entry {
        self.entry
    }

    pub fn press_enter(&self) -> bool {
        self.entry == Entry::AfterLiteral
    }

    pub fn pending_lift(&self) -> bool {
        self.entry == Entry::AfterOperator
    }

    pub fn last_x(&self) -> f64 {
        self.last_x
    }

    /// Process one token. On error the engine is unchanged.
    pub fn step(&mut self, token: &Token) -> Result<()> {
        match *token {
            Token::Literal(v) => self.enter_value(v),
            Token::Unary(op) => self.apply_unary(op)?,
            Token::Binary(op) => self.apply_binary(op)?,
            Token::Stack(op) => self.apply_stack(op)?,
        }
        trace!("{}: {:?} {:?}", token, self.registers, self.entry);
        Ok(())
    }

    /// Process a whole token sequence and return X.
    ///
    /// The sequence is applied all or nothing: when any token fails the
    /// engine keeps the state it had before the call.
    pub fn run<'a>(&mut self, tokens: impl IntoIterator<Item = &'a Token>) -> Result<f64> {
        let mut scratch = self.clone();
        for token in tokens {
            if let Err(err) = scratch.step(token) {
                debug!("evaluation aborted at {}: {}", token, err);
                return Err(err);
            }
        }
        *self = scratch;
        Ok(self.x())
    }

    fn lift(&mut self, value: f64) {
        self.registers.push_front(value);
        if let Some(max) = self.max_depth {
            self.registers.truncate(max);
        }
    }

    fn enter_value(&mut self, value: f64) {
        if self.entry.lifts() {
            self.lift(value);
        } else {
            self.registers[0] = value;
        }
        self.entry = Entry::AfterLiteral;
    }

    fn require(&self, op: &'static str, required: usize) -> Result<()> {
        let available = self.available();
        if available < required {
            return Err(EvalError::InsufficientOperands {
                op,
                required,
                available,
            });
        }
        Ok(())
    }

    fn apply_unary(&mut self, op: UnaryOp) -> Result<()> {
        // unreachable while the stack is never empty
        if self.registers.is_empty() {
            return Err(EvalError::InsufficientOperands {
                op: op.name(),
                required: 1,
                available: 0,
            });
        }
        let x = self.registers[0];
        let result = eval_unary(op, x)?;
        self.last_x = x;
        self.registers[0] = result;
        self.entry = Entry::AfterOperator;
        Ok(())
    }

    fn apply_binary(&mut self, op: BinaryOp) -> Result<()> {
        self.require(op.name(), 2)?;
        let (x, y) = (self.registers[0], self.registers[1]);
        let result = eval_binary(op, y, x)?;
        self.last_x = x;
        self.registers[1] = result;
        self.registers.pop_front();
        self.entry = Entry::AfterOperator;
        Ok(())
    }

    fn apply_stack(&mut self, op: StackOp) -> Result<()> {
        match op {
            StackOp::Enter => {
                let x = self.x();
                self.lift(x);
                self.entry = Entry::AfterEnter;
            }
            StackOp::Swap => {
                self.require(op.name(), 2)?;
                self.registers.swap(0, 1);
                self.entry = Entry::AfterOperator;
            }
            StackOp::RollDown => {
                self.registers.rotate_left(1);
                self.entry = Entry::AfterOperator;
            }
            StackOp::Drop => {
                self.require(op.name(), 2)?;
                self.registers.pop_front();
                self.entry = Entry::AfterOperator;
            }
            StackOp::LastX => self.enter_value(self.last_x),
            StackOp::Pi => self.enter_value(std::f64::consts::PI),
            StackOp::ClearX => {
                self.registers[0] = 0.0;
                self.entry = Entry::AfterEnter;
            }
            StackOp::ClearStack => {
                self.registers.clear();
                self.registers.push_back(0.0);
                self.entry = Entry::Start;
            }
            StackOp::Store(n) => {
                let x = self.x();
                let slot = self
                    .storage
                    .get_mut(n)
                    .ok_or_else(|| EvalError::UnknownToken(format!("sto{}", n)))?;
                *slot = x;
                self.entry = Entry::AfterOperator;
            }
            StackOp::Recall(n) => {
                let value = *self
                    .storage
                    .get(n)
                    .ok_or_else(|| EvalError::UnknownToken(format!("rcl{}", n)))?;
                self.enter_value(value);
            }
        }
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn finite(op: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite { op })
    }
}

fn eval_unary(op: UnaryOp, x: f64) -> Result<f64> {
    let domain = |ok: bool| {
        if ok {
            Ok(())
        } else {
            Err(EvalError::Domain {
                op: op.name(),
                value: x,
            })
        }
    };
    let value = match op {
        UnaryOp::Sin => x.sin(),
        UnaryOp::Cos => x.cos(),
        UnaryOp::Tan => x.tan(),
        UnaryOp::Asin => {
            domain((-1.0..=1.0).contains(&x))?;
            x.asin()
        }
        UnaryOp::Acos => {
            domain((-1.0..=1.0).contains(&x))?;
            x.acos()
        }
        UnaryOp::Atan => x.atan(),
        UnaryOp::Exp => x.exp(),
        UnaryOp::Ln => {
            domain(x > 0.0)?;
            x.ln()
        }
        UnaryOp::Log10 => {
            domain(x > 0.0)?;
            x.log10()
        }
        UnaryOp::Sqrt => {
            domain(x >= 0.0)?;
            x.sqrt()
        }
        UnaryOp::Chs => -x,
        UnaryOp::Inv => {
            if x == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            1.0 / x
        }
    };
    finite(op.name(), value)
}

// Order is important: y is the register below x
fn eval_binary(op: BinaryOp, y: f64, x: f64) -> Result<f64> {
    let value = match op {
        BinaryOp::Add => y + x,
        BinaryOp::Sub => y - x,
        BinaryOp::Mul => y * x,
        BinaryOp::Div => {
            if x == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            y / x
        }
        BinaryOp::Pow => y.powf(x),
    };
    finite(op.name(), value)
}

/// Evaluate a token sequence on a fresh stack and return X.
pub fn evaluate<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> Result<f64> {
    Engine::new().run(tokens)
}

/// Tokenize and evaluate a whitespace separated expression.
pub fn evaluate_str(expr: &str) -> Result<f64> {
    evaluate(&tokenize(expr)?)
}
