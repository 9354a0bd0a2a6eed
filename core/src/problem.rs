use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::SettingsError;

/// Largest digit count the generator will honour. Anything above is clamped so
/// that every product and dividend fits in a `u32`.
pub const MAX_GENERATOR_DIGITS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Which glyphs to use when rendering a problem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolSet {
    /// `+ - * /`
    #[default]
    Ascii,
    /// `+ - × ÷`
    School,
}

impl Operator {
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    pub fn symbol(self, symbols: SymbolSet) -> &'static str {
        match (self, symbols) {
            (Operator::Add, _) => "+",
            (Operator::Subtract, _) => "-",
            (Operator::Multiply, SymbolSet::Ascii) => "*",
            (Operator::Multiply, SymbolSet::School) => "×",
            (Operator::Divide, SymbolSet::Ascii) => "/",
            (Operator::Divide, SymbolSet::School) => "÷",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Operator::Add => "Addition",
            Operator::Subtract => "Subtraction",
            Operator::Multiply => "Multiplication",
            Operator::Divide => "Division",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol(SymbolSet::Ascii))
    }
}

impl FromStr for Operator {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "+" | "add" | "addition" => Ok(Operator::Add),
            "-" | "sub" | "subtract" | "subtraction" => Ok(Operator::Subtract),
            "*" | "×" | "x" | "mul" | "multiply" | "multiplication" => Ok(Operator::Multiply),
            "/" | "÷" | "div" | "divide" | "division" => Ok(Operator::Divide),
            other => Err(SettingsError::Operator(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: Uuid,
    pub operand1: u32,
    pub operand2: u32,
    pub operator: Operator,
    pub display_text: String,
    pub correct_answer: u32,
}

impl Problem {
    /// Assembles a problem from operands that already satisfy the operator's
    /// shape: `operand1 >= operand2` for subtraction, an exact non-zero divisor
    /// for division.
    pub(crate) fn new(operand1: u32, operator: Operator, operand2: u32, symbols: SymbolSet) -> Self {
        let correct_answer = match operator {
            Operator::Add => operand1 + operand2,
            Operator::Subtract => operand1 - operand2,
            Operator::Multiply => operand1 * operand2,
            Operator::Divide => operand1 / operand2,
        };

        Self {
            id: Uuid::new_v4(),
            operand1,
            operand2,
            operator,
            display_text: format!("{} {} {}", operand1, operator.symbol(symbols), operand2),
            correct_answer,
        }
    }

    pub fn prompt(&self) -> String {
        format!("{} = ?", self.display_text)
    }

    /// Reads the leading integer of a raw answer, ignoring whatever follows it,
    /// so `"5.0"` and `"5 apples"` both read as 5. Input with no leading digits
    /// yields `None`.
    pub fn parse_answer(raw: &str) -> Option<i64> {
        let raw = raw.trim_start();
        let sign = usize::from(raw.starts_with(['+', '-']));
        let digits = raw[sign..].bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        raw[..sign + digits].parse().ok()
    }

    pub fn is_correct(&self, answer: Option<i64>) -> bool {
        answer == Some(i64::from(self.correct_answer))
    }
}

/// Number of decimal digits in `n` (zero has one digit).
pub fn digit_count(n: u32) -> u32 {
    n.checked_ilog10().map_or(1, |log| log + 1)
}

/// Uniform integer with exactly `digits` digits, so one digit means 1..=9.
pub fn random_operand<R: Rng + ?Sized>(digits: u32, rng: &mut R) -> u32 {
    let digits = digits.clamp(1, MAX_GENERATOR_DIGITS);
    let min = 10u32.pow(digits - 1);
    let max = 10u32.pow(digits) - 1;
    rng.gen_range(min..=max)
}

pub fn generate<R: Rng + ?Sized>(
    digits: u32,
    operator: Operator,
    symbols: SymbolSet,
    rng: &mut R,
) -> Problem {
    let digits = digits.clamp(1, MAX_GENERATOR_DIGITS);

    let (operand1, operand2) = match operator {
        Operator::Add => (random_operand(digits, rng), random_operand(digits, rng)),
        Operator::Subtract => {
            let a = random_operand(digits, rng);
            let b = random_operand(digits, rng);
            if a < b {
                (b, a)
            } else {
                (a, b)
            }
        }
        Operator::Multiply => {
            let mut a = random_operand(digits, rng);
            let mut b = random_operand(digits, rng);
            // Keep products readable: one factor stays single-digit.
            if digits > 1 {
                if rng.gen_bool(0.5) {
                    b = random_operand(1, rng);
                } else {
                    a = random_operand(1, rng);
                }
            }
            (a, b)
        }
        Operator::Divide => division_operands(digits, rng),
    };

    Problem::new(operand1, operator, operand2, symbols)
}

/// Builds `(dividend, divisor)` from a divisor and quotient so the division is
/// always exact.
fn division_operands<R: Rng + ?Sized>(digits: u32, rng: &mut R) -> (u32, u32) {
    let part_digits = if digits == 1 { 1 } else { digits / 2 + 1 };
    let ceiling = if digits == 1 { digits } else { digits + 1 };

    let mut divisor = random_operand(part_digits, rng);
    let mut quotient = random_operand(part_digits, rng);

    if digit_count(divisor * quotient) > ceiling {
        divisor = random_operand(digits.saturating_sub(1).max(1), rng);
        quotient = random_operand(part_digits.saturating_sub(1).max(1), rng);
    }

    (divisor * quotient, divisor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn operands_have_exact_digit_count() {
        let mut rng = rng();
        for digits in 1..=MAX_GENERATOR_DIGITS {
            for _ in 0..500 {
                let n = random_operand(digits, &mut rng);
                assert_eq!(digit_count(n), digits);
            }
        }
    }

    #[test]
    fn single_digit_operands_never_zero() {
        let mut rng = rng();
        for _ in 0..1000 {
            let n = random_operand(1, &mut rng);
            assert!((1..=9).contains(&n));
        }
    }

    #[test]
    fn digit_count_below_one_is_clamped() {
        let mut rng = rng();
        for _ in 0..100 {
            assert!((1..=9).contains(&random_operand(0, &mut rng)));
        }
        let p = generate(0, Operator::Add, SymbolSet::Ascii, &mut rng);
        assert!(p.operand1 <= 9 && p.operand2 <= 9);
    }

    #[test]
    fn every_operator_keeps_its_invariants() {
        let mut rng = rng();
        for digits in 1..=3 {
            for op in Operator::ALL {
                for _ in 0..300 {
                    let p = generate(digits, op, SymbolSet::Ascii, &mut rng);
                    match op {
                        Operator::Add => {
                            assert_eq!(p.correct_answer, p.operand1 + p.operand2)
                        }
                        Operator::Subtract => {
                            assert!(p.operand1 >= p.operand2);
                            assert_eq!(p.correct_answer, p.operand1 - p.operand2);
                        }
                        Operator::Multiply => {
                            assert_eq!(p.correct_answer, p.operand1 * p.operand2)
                        }
                        Operator::Divide => {
                            assert_ne!(p.operand2, 0);
                            assert_eq!(p.operand1, p.correct_answer * p.operand2);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn multi_digit_multiplication_has_a_single_digit_factor() {
        let mut rng = rng();
        for _ in 0..300 {
            let p = generate(3, Operator::Multiply, SymbolSet::Ascii, &mut rng);
            assert!(p.operand1 <= 9 || p.operand2 <= 9, "{}", p.display_text);
        }
    }

    #[test]
    fn three_digit_division_stays_under_ceiling() {
        let mut rng = rng();
        for _ in 0..300 {
            let p = generate(3, Operator::Divide, SymbolSet::Ascii, &mut rng);
            assert!(digit_count(p.operand1) <= 4, "{}", p.display_text);
        }
    }

    #[test]
    fn text_uses_chosen_symbols() {
        let mut rng = rng();
        let p = generate(2, Operator::Multiply, SymbolSet::School, &mut rng);
        assert_eq!(p.display_text, format!("{} × {}", p.operand1, p.operand2));
        assert_eq!(p.prompt(), format!("{} × {} = ?", p.operand1, p.operand2));

        let p = generate(1, Operator::Divide, SymbolSet::Ascii, &mut rng);
        assert_eq!(p.display_text, format!("{} / {}", p.operand1, p.operand2));
    }

    #[test]
    fn fresh_id_per_problem() {
        let mut rng = rng();
        let a = generate(1, Operator::Add, SymbolSet::Ascii, &mut rng);
        let b = generate(1, Operator::Add, SymbolSet::Ascii, &mut rng);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn operator_parsing() {
        assert_eq!("+".parse::<Operator>().unwrap(), Operator::Add);
        assert_eq!(" - ".parse::<Operator>().unwrap(), Operator::Subtract);
        assert_eq!("×".parse::<Operator>().unwrap(), Operator::Multiply);
        assert_eq!("div".parse::<Operator>().unwrap(), Operator::Divide);
        assert!(matches!("%".parse::<Operator>(), Err(SettingsError::Operator(_))));
    }

    #[test]
    fn answer_parsing_and_checking() {
        let p = Problem::new(12, Operator::Add, 7, SymbolSet::Ascii);
        assert_eq!(p.display_text, "12 + 7");
        assert!(p.is_correct(Problem::parse_answer(" 19 ")));
        assert!(!p.is_correct(Problem::parse_answer("")));
        assert!(!p.is_correct(Problem::parse_answer("nineteen")));
        assert!(!p.is_correct(Problem::parse_answer("-19")));
    }

    #[test]
    fn serialized_problem_names_text_and_answer() {
        let p = Problem::new(9, Operator::Divide, 3, SymbolSet::School);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["display_text"], "9 ÷ 3");
        assert_eq!(json["correct_answer"], 3);
        assert_eq!(json["operator"], "divide");
    }

    #[test]
    fn answer_parsing_reads_leading_integer() {
        assert_eq!(Problem::parse_answer("5abc"), Some(5));
        assert_eq!(Problem::parse_answer("5.0"), Some(5));
        assert_eq!(Problem::parse_answer("  5 apples"), Some(5));
        assert_eq!(Problem::parse_answer("+12"), Some(12));
        assert_eq!(Problem::parse_answer("-3x"), Some(-3));
        assert_eq!(Problem::parse_answer("-"), None);
        assert_eq!(Problem::parse_answer("abc5"), None);
        assert_eq!(Problem::parse_answer("  "), None);
    }
}
