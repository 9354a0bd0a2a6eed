use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::SettingsError;
use crate::problem::{Operator, SymbolSet};

pub const DIGIT_RANGE: RangeInclusive<u32> = 1..=3;
pub const PROBLEM_RANGE: RangeInclusive<u32> = 3..=100;
pub const TIMER_RANGE: RangeInclusive<u32> = 0..=600;

/// Validated quiz configuration. The only way to build one is through
/// [`QuizSettings::new`] (or deserializing, which runs the same checks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSettings")]
pub struct QuizSettings {
    digit_count: u32,
    operator: Operator,
    problem_count: u32,
    timer_secs: u32,
    #[serde(skip)]
    symbols: SymbolSet,
}

#[derive(Deserialize)]
struct RawSettings {
    digit_count: u32,
    operator: Operator,
    problem_count: u32,
    timer_secs: u32,
}

impl TryFrom<RawSettings> for QuizSettings {
    type Error = SettingsError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        QuizSettings::new(raw.digit_count, raw.operator, raw.problem_count, raw.timer_secs)
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            digit_count: 1,
            operator: Operator::Add,
            problem_count: 10,
            timer_secs: 60,
            symbols: SymbolSet::Ascii,
        }
    }
}

impl QuizSettings {
    pub fn new(
        digit_count: u32,
        operator: Operator,
        problem_count: u32,
        timer_secs: u32,
    ) -> Result<Self, SettingsError> {
        if !DIGIT_RANGE.contains(&digit_count) {
            return Err(SettingsError::DigitCount(digit_count));
        }
        if !PROBLEM_RANGE.contains(&problem_count) {
            return Err(SettingsError::ProblemCount(problem_count));
        }
        if !TIMER_RANGE.contains(&timer_secs) {
            return Err(SettingsError::TimerDuration(timer_secs));
        }

        Ok(Self {
            digit_count,
            operator,
            problem_count,
            timer_secs,
            symbols: SymbolSet::Ascii,
        })
    }

    pub fn with_symbols(mut self, symbols: SymbolSet) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn digit_count(&self) -> u32 {
        self.digit_count
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn problem_count(&self) -> u32 {
        self.problem_count
    }

    pub fn timer_secs(&self) -> u32 {
        self.timer_secs
    }

    pub fn symbols(&self) -> SymbolSet {
        self.symbols
    }

    /// A zero timer means the quiz never times out.
    pub fn is_timed(&self) -> bool {
        self.timer_secs > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert!(QuizSettings::new(1, Operator::Add, 3, 0).is_ok());
        assert!(QuizSettings::new(3, Operator::Divide, 100, 600).is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            QuizSettings::new(0, Operator::Add, 10, 60),
            Err(SettingsError::DigitCount(0))
        );
        assert_eq!(
            QuizSettings::new(4, Operator::Add, 10, 60),
            Err(SettingsError::DigitCount(4))
        );
        assert_eq!(
            QuizSettings::new(1, Operator::Add, 2, 60),
            Err(SettingsError::ProblemCount(2))
        );
        assert_eq!(
            QuizSettings::new(1, Operator::Add, 101, 60),
            Err(SettingsError::ProblemCount(101))
        );
        assert_eq!(
            QuizSettings::new(1, Operator::Add, 10, 601),
            Err(SettingsError::TimerDuration(601))
        );
    }

    #[test]
    fn default_matches_setup_screen() {
        let s = QuizSettings::default();
        assert_eq!(s.digit_count(), 1);
        assert_eq!(s.operator(), Operator::Add);
        assert_eq!(s.problem_count(), 10);
        assert_eq!(s.timer_secs(), 60);
        assert!(s.is_timed());
    }

    #[test]
    fn deserializing_validates() {
        let ok: QuizSettings = serde_json::from_str(
            r#"{"digit_count":2,"operator":"multiply","problem_count":20,"timer_secs":0}"#,
        )
        .unwrap();
        assert_eq!(ok.operator(), Operator::Multiply);
        assert!(!ok.is_timed());

        let bad = serde_json::from_str::<QuizSettings>(
            r#"{"digit_count":9,"operator":"add","problem_count":20,"timer_secs":0}"#,
        );
        assert!(bad.is_err());
    }
}
