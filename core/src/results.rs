use serde::{Deserialize, Serialize};

use crate::problem::Problem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitReason {
    Manual,
    TimedOut,
}

/// How one problem was answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub problem: Problem,
    pub user_answer: Option<i64>,
    pub is_correct: bool,
}

impl QuizResult {
    pub fn score(problem: &Problem, raw: &str) -> Self {
        let user_answer = Problem::parse_answer(raw);
        Self {
            problem: problem.clone(),
            user_answer,
            is_correct: problem.is_correct(user_answer),
        }
    }
}

/// Everything a finished quiz hands to its completion handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub results: Vec<QuizResult>,
    pub problems: Vec<Problem>,
    pub reason: SubmitReason,
}

impl QuizOutcome {
    pub fn score(&self) -> u32 {
        self.results.iter().filter(|r| r.is_correct).count() as u32
    }

    pub fn total(&self) -> u32 {
        self.problems.len() as u32
    }

    pub fn percentage(&self) -> u32 {
        percentage(self.score(), self.total())
    }

    pub fn rating(&self) -> Rating {
        Rating::from_percentage(self.percentage(), self.total())
    }
}

/// Rounded share of correct answers, 0 for an empty quiz.
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(score) / f64::from(total) * 100.0).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating {
    pub stars: u8,
    pub message: &'static str,
}

impl Rating {
    pub const MAX_STARS: u8 = 5;

    pub fn from_percentage(percentage: u32, total: u32) -> Self {
        let (stars, message) = match percentage {
            100 => (5, "Wow! Perfect score! You're a math superstar!"),
            80..=99 => (4, "Excellent job! You're doing great!"),
            60..=79 => (3, "Good work! Keep it up!"),
            40..=59 => (2, "Nice try! Practice makes perfect."),
            _ if total > 0 => (1, "Keep practicing! Every mistake is a chance to learn."),
            _ => (0, "Keep practicing! Every mistake is a chance to learn."),
        };
        Self { stars, message }
    }

    pub fn star_bar(&self) -> String {
        (0..Self::MAX_STARS)
            .map(|i| if i < self.stars { '★' } else { '☆' })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(10, 10), 100);
    }

    #[test]
    fn rating_tiers() {
        assert_eq!(Rating::from_percentage(100, 10).stars, 5);
        assert_eq!(Rating::from_percentage(80, 10).stars, 4);
        assert_eq!(Rating::from_percentage(79, 10).stars, 3);
        assert_eq!(Rating::from_percentage(40, 10).stars, 2);
        assert_eq!(Rating::from_percentage(0, 10).stars, 1);
        assert_eq!(Rating::from_percentage(0, 0).stars, 0);
    }

    #[test]
    fn star_bar_is_five_wide() {
        assert_eq!(Rating::from_percentage(60, 5).star_bar(), "★★★☆☆");
    }
}
