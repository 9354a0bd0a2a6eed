use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::problem::{Operator, Problem, SymbolSet};
use crate::ticker::Ticker;

/// Seconds allowed per question.
pub const ROUND_SECS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardTier {
    Star,
    Diamond,
    Emerald,
    Crown,
}

impl RewardTier {
    pub const ALL: [RewardTier; 4] = [
        RewardTier::Star,
        RewardTier::Diamond,
        RewardTier::Emerald,
        RewardTier::Crown,
    ];

    /// A tier is earned every time the streak lands on a multiple of this.
    pub fn threshold(self) -> u32 {
        match self {
            RewardTier::Star => 10,
            RewardTier::Diamond => 30,
            RewardTier::Emerald => 50,
            RewardTier::Crown => 100,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RewardTier::Star => "Stars",
            RewardTier::Diamond => "Diamonds",
            RewardTier::Emerald => "Emeralds",
            RewardTier::Crown => "Crowns",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Correct,
    Incorrect,
    TimedOut,
}

/// One times-table question with two options, exactly one of them right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakQuestion {
    pub problem: Problem,
    pub options: [u32; 2],
}

impl StreakQuestion {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let problem = Problem::new(
            rng.gen_range(2..=10),
            Operator::Multiply,
            rng.gen_range(1..=10),
            SymbolSet::School,
        );
        let mut options = [problem.correct_answer, wrong_option(&problem, rng)];
        options.shuffle(rng);
        Self { problem, options }
    }

    pub fn is_correct(&self, choice: u32) -> bool {
        choice == self.problem.correct_answer
    }
}

/// A plausible wrong answer: the right one nudged by 1..=5, or the product
/// with a neighbouring factor. Never negative, never equal to the answer.
fn wrong_option<R: Rng + ?Sized>(problem: &Problem, rng: &mut R) -> u32 {
    let correct = i64::from(problem.correct_answer);
    loop {
        let candidate = if rng.gen_bool(0.5) {
            let delta = rng.gen_range(1..=5);
            if rng.gen_bool(0.5) {
                correct + delta
            } else {
                correct - delta
            }
        } else {
            let factor = i64::from(problem.operand2);
            let neighbour = if factor <= 1 || rng.gen_bool(0.5) {
                factor + 1
            } else {
                factor - 1
            };
            i64::from(problem.operand1) * neighbour
        };

        if candidate >= 0 && candidate != correct {
            return candidate as u32;
        }
    }
}

/// Emitted after every answered or expired round, for sound and animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakEvent {
    pub outcome: RoundOutcome,
    pub streak: u32,
    pub awarded: Vec<RewardTier>,
    pub correct_answer: u32,
}

/// Pending notification after a miss. The countdown is frozen until it is
/// acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub outcome: RoundOutcome,
    pub correct_answer: u32,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self.outcome {
            RoundOutcome::TimedOut => "Time's up!",
            _ => "Incorrect!",
        }
    }

    pub fn message(&self) -> String {
        match self.outcome {
            RoundOutcome::TimedOut => format!(
                "Time's up! The answer was {}. Score reset.",
                self.correct_answer
            ),
            _ => "Oops! Wrong answer. Your score has been reset.".to_string(),
        }
    }
}

pub struct StreakGame {
    question: StreakQuestion,
    streak: u32,
    tiers: [u32; 4],
    time_remaining: u32,
    notice: Option<Notice>,
    ticker: Ticker,
}

impl StreakGame {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            question: StreakQuestion::generate(rng),
            streak: 0,
            tiers: [0; 4],
            time_remaining: ROUND_SECS,
            notice: None,
            ticker: Ticker::default(),
        }
    }

    pub fn question(&self) -> &StreakQuestion {
        &self.question
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn tier_count(&self, tier: RewardTier) -> u32 {
        self.tiers[tier.index()]
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.notice.is_some()
    }

    /// Answers the current question with one of its option values. Ignored
    /// while a notice is pending.
    pub fn answer<R: Rng + ?Sized>(&mut self, choice: u32, rng: &mut R) -> Option<StreakEvent> {
        if self.is_paused() {
            return None;
        }

        let correct_answer = self.question.problem.correct_answer;
        if !self.question.is_correct(choice) {
            return Some(self.miss(RoundOutcome::Incorrect));
        }

        self.streak += 1;
        let mut awarded = Vec::new();
        for tier in RewardTier::ALL {
            if self.streak % tier.threshold() == 0 {
                self.tiers[tier.index()] += 1;
                awarded.push(tier);
            }
        }
        if !awarded.is_empty() {
            tracing::info!(streak = self.streak, ?awarded, "reward earned");
        }

        self.next_round(rng);
        Some(StreakEvent {
            outcome: RoundOutcome::Correct,
            streak: self.streak,
            awarded,
            correct_answer,
        })
    }

    /// Answers by option position (0 or 1).
    pub fn choose<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> Option<StreakEvent> {
        let choice = *self.question.options.get(index)?;
        self.answer(choice, rng)
    }

    /// Applies one second of countdown. Paused rounds do not count down.
    pub fn tick(&mut self) -> Option<StreakEvent> {
        if self.is_paused() || self.time_remaining == 0 {
            return None;
        }
        self.time_remaining -= 1;
        if self.time_remaining == 0 {
            return Some(self.miss(RoundOutcome::TimedOut));
        }
        None
    }

    /// Waits for the next second and applies it. Never resolves while a notice
    /// is pending.
    pub async fn next_tick(&mut self) -> Option<StreakEvent> {
        if self.is_paused() {
            self.ticker.cancel();
            std::future::pending::<()>().await;
        }
        self.ticker.tick().await;
        self.tick()
    }

    /// Dismisses the pending notice and starts a fresh round.
    pub fn acknowledge<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.notice.take().is_none() {
            return false;
        }
        self.next_round(rng);
        true
    }

    fn miss(&mut self, outcome: RoundOutcome) -> StreakEvent {
        let correct_answer = self.question.problem.correct_answer;
        tracing::debug!(lost = self.streak, ?outcome, "streak reset");

        self.streak = 0;
        self.ticker.cancel();
        self.notice = Some(Notice {
            outcome,
            correct_answer,
        });
        StreakEvent {
            outcome,
            streak: 0,
            awarded: Vec::new(),
            correct_answer,
        }
    }

    fn next_round<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.question = StreakQuestion::generate(rng);
        self.time_remaining = ROUND_SECS;
        self.ticker.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn right(game: &StreakGame) -> u32 {
        game.question().problem.correct_answer
    }

    fn wrong(game: &StreakGame) -> u32 {
        let q = game.question();
        *q.options.iter().find(|&&o| o != q.problem.correct_answer).unwrap()
    }

    #[test]
    fn questions_have_one_right_and_one_wrong_option() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let q = StreakQuestion::generate(&mut rng);
            assert!((2..=10).contains(&q.problem.operand1));
            assert!((1..=10).contains(&q.problem.operand2));
            assert_eq!(q.options.iter().filter(|&&o| q.is_correct(o)).count(), 1);
            assert_ne!(q.options[0], q.options[1]);
        }
    }

    #[test]
    fn ten_in_a_row_earns_one_star() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut game = StreakGame::new(&mut rng);
        let mut last = None;
        for _ in 0..10 {
            last = game.answer(right(&game), &mut rng);
        }
        let last = last.unwrap();
        assert_eq!(last.awarded, vec![RewardTier::Star]);
        assert_eq!(game.streak(), 10);
        assert_eq!(game.tier_count(RewardTier::Star), 1);
        assert_eq!(game.tier_count(RewardTier::Diamond), 0);

        let miss = game.answer(wrong(&game), &mut rng).unwrap();
        assert_eq!(miss.outcome, RoundOutcome::Incorrect);
        assert_eq!(game.streak(), 0);
        assert_eq!(game.tier_count(RewardTier::Star), 1);
    }

    #[test]
    fn hundred_in_a_row_hits_every_tier() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut game = StreakGame::new(&mut rng);
        for _ in 0..100 {
            game.answer(right(&game), &mut rng);
        }
        assert_eq!(game.tier_count(RewardTier::Star), 10);
        assert_eq!(game.tier_count(RewardTier::Diamond), 3);
        assert_eq!(game.tier_count(RewardTier::Emerald), 2);
        assert_eq!(game.tier_count(RewardTier::Crown), 1);
    }

    #[test]
    fn correct_answer_resets_countdown_with_new_question() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut game = StreakGame::new(&mut rng);
        game.tick();
        game.tick();
        assert_eq!(game.time_remaining(), 3);
        let before = game.question().problem.id;
        game.answer(right(&game), &mut rng);
        assert_eq!(game.time_remaining(), ROUND_SECS);
        assert_ne!(game.question().problem.id, before);
    }

    #[test]
    fn timeout_resets_streak_and_pauses_until_acknowledged() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut game = StreakGame::new(&mut rng);
        game.answer(right(&game), &mut rng);
        let answer = right(&game);

        let mut event = None;
        for _ in 0..ROUND_SECS {
            event = game.tick();
        }
        let event = event.unwrap();
        assert_eq!(event.outcome, RoundOutcome::TimedOut);
        assert_eq!(event.correct_answer, answer);
        assert_eq!(game.streak(), 0);
        assert!(game.is_paused());
        assert!(game.notice().unwrap().message().contains(&answer.to_string()));

        assert!(game.tick().is_none());
        assert!(game.answer(answer, &mut rng).is_none());
        assert_eq!(game.time_remaining(), 0);

        assert!(game.acknowledge(&mut rng));
        assert!(!game.is_paused());
        assert_eq!(game.time_remaining(), ROUND_SECS);
        assert!(!game.acknowledge(&mut rng));
    }

    #[test]
    fn wrong_answer_freezes_countdown() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut game = StreakGame::new(&mut rng);
        game.tick();
        game.answer(wrong(&game), &mut rng);
        let frozen = game.time_remaining();
        for _ in 0..10 {
            assert!(game.tick().is_none());
        }
        assert_eq!(game.time_remaining(), frozen);
        assert_eq!(game.notice().unwrap().title(), "Incorrect!");
    }

    #[test]
    fn choose_by_index() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut game = StreakGame::new(&mut rng);
        let index = game
            .question()
            .options
            .iter()
            .position(|&o| o == right(&game))
            .unwrap();
        let event = game.choose(index, &mut rng).unwrap();
        assert_eq!(event.outcome, RoundOutcome::Correct);
        assert!(game.choose(7, &mut rng).is_none());
    }
}
