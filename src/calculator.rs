use std::fmt;

/// Lines kept on the calculator tape.
pub const TAPE_LINES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }

    fn apply(self, left: f64, right: f64) -> Option<f64> {
        let value = match self {
            Operator::Plus => left + right,
            Operator::Minus => left - right,
            Operator::Multiply => left * right,
            Operator::Divide if right == 0.0 => return None,
            Operator::Divide => left / right,
        };
        value.is_finite().then_some(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Point,
    PlusMinus,
    Percent,
    Op(Operator),
    Equals,
    Clear,
}

impl Key {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '0'..='9' => Key::Digit(c as u8 - b'0'),
            '.' | ',' => Key::Point,
            '_' => Key::PlusMinus,
            '%' => Key::Percent,
            '+' => Key::Op(Operator::Plus),
            '-' => Key::Op(Operator::Minus),
            '*' | 'x' => Key::Op(Operator::Multiply),
            '/' => Key::Op(Operator::Divide),
            '=' => Key::Equals,
            'c' | 'C' => Key::Clear,
            _ => return None,
        })
    }
}

/// One evaluated `left op right = result`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculation {
    pub left: f64,
    pub operator: Operator,
    pub right: f64,
    pub result: f64,
}

impl Calculation {
    pub fn expression(&self) -> String {
        format!("{} {} {}", format_number(self.left), self.operator.symbol(), format_number(self.right))
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.expression(), format_number(self.result))
    }
}

/// Desktop-style calculator: an entry being typed, a left accumulator and a
/// pending operator.
#[derive(Debug, Clone)]
pub struct Calculator {
    display: String,
    entry: String,
    /// Full-precision entry produced by `%` or `+/-`; wins over `entry`.
    computed: Option<f64>,
    left: f64,
    right: f64,
    operator: Operator,
    tape: Vec<String>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
            entry: String::new(),
            computed: None,
            left: 0.0,
            right: 0.0,
            operator: Operator::Plus,
            tape: vec!["Calculator Ready".to_string()],
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn tape(&self) -> &[String] {
        &self.tape
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The clear key resets everything when nothing has been typed.
    pub fn shows_all_clear(&self) -> bool {
        matches!(self.entry.as_str(), "" | "0") && self.display == "0"
    }

    /// Apply a key. Returns the calculation when one was evaluated.
    pub fn press(&mut self, key: Key) -> Option<Calculation> {
        match key {
            Key::Digit(d) => {
                let mut entry = if self.entry == "0" || self.computed.is_some() {
                    String::new()
                } else {
                    self.entry.clone()
                };
                entry.push(char::from(b'0' + d));
                self.set_entry(entry);
            }
            Key::Point => {
                if self.computed.is_some() {
                    self.set_entry("0.".to_string());
                } else if !self.entry.contains('.') {
                    let base = if self.entry.is_empty() { "0" } else { self.entry.as_str() };
                    self.set_entry(format!("{}.", base));
                }
            }
            Key::PlusMinus => {
                let value = -self.entry_value();
                self.set_computed(value);
            }
            Key::Percent => {
                let value = self.entry_value() / 100.0;
                self.set_computed(value);
            }
            Key::Clear => self.clear(),
            Key::Op(op) => {
                if !self.has_entry() {
                    self.operator = op;
                    return None;
                }
                self.right = self.entry_value();
                let calculation = self.evaluate();
                self.operator = op;
                return calculation;
            }
            Key::Equals => {
                if self.has_entry() {
                    self.right = self.entry_value();
                }
                return self.evaluate();
            }
        }
        None
    }

    /// Remove the last typed character of the entry.
    pub fn backspace(&mut self) {
        if let Some(value) = self.computed.take() {
            self.entry = format_number(value);
        }
        if self.entry.pop().is_some() {
            self.display = if self.entry.is_empty() { "0".to_string() } else { self.entry.clone() };
        }
    }

    fn set_entry(&mut self, entry: String) {
        self.display = entry.clone();
        self.entry = entry;
        self.computed = None;
    }

    fn set_computed(&mut self, value: f64) {
        self.display = format_number(value);
        self.entry.clear();
        self.computed = Some(value);
    }

    fn has_entry(&self) -> bool {
        self.computed.is_some() || !self.entry.is_empty()
    }

    fn entry_value(&self) -> f64 {
        self.computed.unwrap_or_else(|| parse_entry(&self.entry))
    }

    fn clear(&mut self) {
        if self.shows_all_clear() {
            *self = Self::new();
            self.tape = vec!["Calculator Reset".to_string()];
        } else {
            self.entry.clear();
            self.computed = None;
            self.display = "0".to_string();
        }
    }

    fn evaluate(&mut self) -> Option<Calculation> {
        let (left, right, operator) = (self.left, self.right, self.operator);
        match operator.apply(left, right) {
            Some(result) => {
                self.left = result;
                self.display = format_number(result);
                self.entry.clear();
                self.computed = None;
                let calculation = Calculation { left, operator, right, result };
                self.push_tape(calculation.to_string());
                Some(calculation)
            }
            None => {
                log::debug!("calculator error: {} {} {}", left, operator.symbol(), right);
                self.display = "Error".to_string();
                None
            }
        }
    }

    fn push_tape(&mut self, line: String) {
        self.tape.push(line);
        if self.tape.len() > TAPE_LINES {
            let excess = self.tape.len() - TAPE_LINES;
            self.tape.drain(..excess);
        }
    }
}

fn parse_entry(entry: &str) -> f64 {
    match entry {
        "" | "." | "-" => 0.0,
        other => other.parse().unwrap_or(0.0),
    }
}

/// Render without float noise: up to 10 decimals, trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "Error".to_string();
    }
    let rounded = format!("{:.10}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_keys(calc: &mut Calculator, keys: &str) -> Vec<Calculation> {
        keys.chars().filter_map(Key::from_char).filter_map(|k| calc.press(k)).collect()
    }

    #[test]
    fn test_simple_addition() {
        let mut calc = Calculator::new();
        let done = type_keys(&mut calc, "12+30=");
        assert_eq!(calc.display(), "42");
        assert_eq!(done.len(), 2);
        assert_eq!(done[1].expression(), "12 + 30");
        assert_eq!(done[1].result, 42.0);
    }

    #[test]
    fn test_chained_operators_evaluate_left_to_right() {
        let mut calc = Calculator::new();
        type_keys(&mut calc, "2+3*4=");
        assert_eq!(calc.display(), "20");
    }

    #[test]
    fn test_operator_without_entry_only_changes_operator() {
        let mut calc = Calculator::new();
        type_keys(&mut calc, "9+");
        assert!(calc.press(Key::Op(Operator::Minus)).is_none());
        assert_eq!(calc.operator(), Operator::Minus);
        type_keys(&mut calc, "4=");
        assert_eq!(calc.display(), "5");
    }

    #[test]
    fn test_leading_zeros_and_point() {
        let mut calc = Calculator::new();
        type_keys(&mut calc, "007");
        assert_eq!(calc.display(), "7");
        calc.press(Key::Clear);
        type_keys(&mut calc, "..5");
        assert_eq!(calc.display(), "0.5");
    }

    #[test]
    fn test_plus_minus_and_percent() {
        let mut calc = Calculator::new();
        type_keys(&mut calc, "50_");
        assert_eq!(calc.display(), "-50");
        type_keys(&mut calc, "%");
        assert_eq!(calc.display(), "-0.5");
    }

    #[test]
    fn test_repeated_percent_keeps_precision() {
        let mut calc = Calculator::new();
        type_keys(&mut calc, "5%%%%%%");
        assert_eq!(calc.display(), "0");
        type_keys(&mut calc, "*1000000000000=");
        assert_eq!(calc.display(), "5");
    }

    #[test]
    fn test_digit_after_percent_starts_new_entry() {
        let mut calc = Calculator::new();
        type_keys(&mut calc, "50%");
        assert_eq!(calc.display(), "0.5");
        type_keys(&mut calc, "7");
        assert_eq!(calc.display(), "7");
    }

    #[test]
    fn test_division_by_zero_shows_error() {
        let mut calc = Calculator::new();
        let done = type_keys(&mut calc, "8/0=");
        assert_eq!(calc.display(), "Error");
        assert_eq!(done.len(), 1);
    }

    #[test]
    fn test_clear_then_all_clear() {
        let mut calc = Calculator::new();
        type_keys(&mut calc, "5+6");
        assert!(!calc.shows_all_clear());
        calc.press(Key::Clear);
        assert_eq!(calc.display(), "0");
        assert!(calc.shows_all_clear());
        type_keys(&mut calc, "1=");
        assert_eq!(calc.display(), "6");

        calc.press(Key::Clear);
        calc.press(Key::Clear);
        assert_eq!(calc.tape(), ["Calculator Reset".to_string()]);
        type_keys(&mut calc, "3=");
        assert_eq!(calc.display(), "3");
    }

    #[test]
    fn test_tape_is_bounded() {
        let mut calc = Calculator::new();
        for _ in 0..25 {
            type_keys(&mut calc, "1+");
        }
        assert_eq!(calc.tape().len(), TAPE_LINES);
    }

    #[test]
    fn test_format_number_hides_float_noise() {
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.0 / 3.0), "0.3333333333");
        assert_eq!(format_number(1e6), "1000000");
        assert_eq!(format_number(f64::INFINITY), "Error");
    }
}
