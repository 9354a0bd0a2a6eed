use rand::Rng;
use std::collections::HashMap;
use uuid::Uuid;

use crate::problem::{self, Problem};
use crate::results::{QuizOutcome, QuizResult, SubmitReason};
use crate::settings::QuizSettings;
use crate::ticker::Ticker;

/// Called once per session with the scored quiz.
pub type CompletionHandler = Box<dyn FnMut(&QuizOutcome)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collecting,
    Submitted,
}

/// A batch of problems being answered against an optional countdown.
pub struct QuizSession {
    settings: QuizSettings,
    problems: Vec<Problem>,
    answers: HashMap<Uuid, String>,
    time_remaining: u32,
    outcome: Option<QuizOutcome>,
    on_complete: CompletionHandler,
    ticker: Ticker,
}

impl QuizSession {
    pub fn start<R, F>(settings: QuizSettings, on_complete: F, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
        F: FnMut(&QuizOutcome) + 'static,
    {
        let problems = generate_problems(&settings, rng);
        Self::with_problems(settings, problems, Box::new(on_complete))
    }

    fn with_problems(
        settings: QuizSettings,
        problems: Vec<Problem>,
        on_complete: CompletionHandler,
    ) -> Self {
        let mut session = Self {
            settings,
            problems: Vec::new(),
            answers: HashMap::new(),
            time_remaining: 0,
            outcome: None,
            on_complete,
            ticker: Ticker::default(),
        };
        session.reset(problems);
        session
    }

    /// Discards every answer and starts over with a fresh problem set.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let problems = generate_problems(&self.settings, rng);
        self.reset(problems);
    }

    fn reset(&mut self, problems: Vec<Problem>) {
        self.ticker.cancel();
        self.answers = problems.iter().map(|p| (p.id, String::new())).collect();
        self.problems = problems;
        self.time_remaining = self.settings.timer_secs();
        self.outcome = None;

        tracing::debug!(
            problems = self.problems.len(),
            operator = %self.settings.operator(),
            digits = self.settings.digit_count(),
            timer_secs = self.time_remaining,
            "quiz started"
        );
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn answers(&self) -> &HashMap<Uuid, String> {
        &self.answers
    }

    pub fn answer(&self, problem_id: Uuid) -> Option<&str> {
        self.answers.get(&problem_id).map(String::as_str)
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn phase(&self) -> Phase {
        if self.outcome.is_some() {
            Phase::Submitted
        } else {
            Phase::Collecting
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.phase() == Phase::Submitted
    }

    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    /// Stores raw input for a problem. Returns `false` when the quiz is already
    /// submitted or the id does not belong to this session.
    pub fn record_answer(&mut self, problem_id: Uuid, raw: impl Into<String>) -> bool {
        if self.is_submitted() {
            return false;
        }
        match self.answers.get_mut(&problem_id) {
            Some(slot) => {
                *slot = raw.into();
                true
            }
            None => false,
        }
    }

    /// Explicit submission. Returns `true` only for the call that finished the quiz.
    pub fn submit(&mut self) -> bool {
        self.finish(SubmitReason::Manual)
    }

    /// Applies one second of countdown. Returns `true` when this tick ran the
    /// clock out and submitted the quiz.
    pub fn tick(&mut self) -> bool {
        if !self.countdown_running() {
            return false;
        }
        self.time_remaining -= 1;
        if self.time_remaining == 0 {
            return self.finish(SubmitReason::TimedOut);
        }
        false
    }

    /// Waits for the next second and applies it. Never resolves for untimed or
    /// submitted quizzes, which makes it safe to race against user input.
    pub async fn next_tick(&mut self) -> bool {
        if !self.countdown_running() {
            self.ticker.cancel();
            std::future::pending::<()>().await;
        }
        self.ticker.tick().await;
        self.tick()
    }

    fn countdown_running(&self) -> bool {
        self.settings.is_timed() && !self.is_submitted() && self.time_remaining > 0
    }

    fn finish(&mut self, reason: SubmitReason) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        self.ticker.cancel();

        let results = self
            .problems
            .iter()
            .map(|p| QuizResult::score(p, self.answers.get(&p.id).map_or("", String::as_str)))
            .collect();
        let outcome = QuizOutcome {
            results,
            problems: self.problems.clone(),
            reason,
        };

        tracing::info!(
            score = outcome.score(),
            total = outcome.total(),
            ?reason,
            "quiz submitted"
        );

        (self.on_complete)(&outcome);
        self.outcome = Some(outcome);
        true
    }
}

fn generate_problems<R: Rng + ?Sized>(settings: &QuizSettings, rng: &mut R) -> Vec<Problem> {
    (0..settings.problem_count())
        .map(|_| {
            problem::generate(
                settings.digit_count(),
                settings.operator(),
                settings.symbols(),
                rng,
            )
        })
        .collect()
}
