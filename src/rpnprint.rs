use crate::rpneval::Engine;
use std::fmt;

const LABELS: &[&str] = &["X", "Y", "Z", "T"];

fn label(idx: usize) -> String {
    match LABELS.get(idx) {
        Some(l) => l.to_string(),
        None => idx.to_string(),
    }
}

/// Formats a value with a fixed number of decimals, or with the shortest
/// representation that round-trips when `precision` is `None`.
pub fn format_value(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(p) => format!("{:.*}", p, value),
        None => format!("{}", value),
    }
}

/// Renders the register stack like a calculator display: deepest register
/// first, X on the last line.
pub struct StackDisplay<'a> {
    engine: &'a Engine,
    precision: Option<usize>,
}

impl<'a> StackDisplay<'a> {
    pub fn new(engine: &'a Engine, precision: Option<usize>) -> Self {
        StackDisplay { engine, precision }
    }
}

impl<'a> fmt::Display for StackDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let registers = self.engine.registers();
        let width = label(registers.len() - 1).len();
        for (idx, value) in registers.iter().enumerate().rev() {
            write!(
                f,
                "{:>width$}: {}",
                label(idx),
                format_value(*value, self.precision),
                width = width
            )?;
            if idx > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{format_value, StackDisplay};
    use crate::rpneval::Engine;
    use crate::tokenizer::tokenize;

    fn engine_with(expr: &str) -> Engine {
        let mut engine = Engine::new();
        engine.run(&tokenize(expr).unwrap()).unwrap();
        engine
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(2.0, None), "2");
        assert_eq!(format_value(0.1, None), "0.1");
        assert_eq!(format_value(3.14159, Some(2)), "3.14");
        assert_eq!(format_value(-1.0, Some(3)), "-1.000");
    }

    #[test]
    fn test_print_fresh() {
        let engine = Engine::new();
        assert_eq!(StackDisplay::new(&engine, None).to_string(), "X: 0");
    }

    #[test]
    fn test_print_registers() {
        let engine = engine_with("1 2 3.5");
        let shown = StackDisplay::new(&engine, Some(1)).to_string();
        assert_eq!(shown, "Z: 1.0\nY: 2.0\nX: 3.5");
    }

    #[test]
    fn test_print_deep() {
        let engine = engine_with("1 2 3 4 5 6 7 8 9 10 11");
        let shown = StackDisplay::new(&engine, None).to_string();
        let lines: Vec<&str> = shown.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "10: 1");
        assert_eq!(lines[6], " 4: 7");
        assert_eq!(lines[7], " T: 8");
        assert_eq!(lines[10], " X: 11");
    }
}
