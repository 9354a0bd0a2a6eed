//! Arithmetic practice: problem generation, timed quiz sessions, the streak
//! mini-game, flashcard decks and quiz history.

pub mod error;
pub mod flashcards;
pub mod history;
pub mod problem;
pub mod results;
pub mod session;
pub mod settings;
pub mod streak;
pub mod ticker;

pub use error::{SettingsError, StoreError};
pub use history::{History, HistoryStore, Identity, QuizRecord, StoredRecord};
pub use problem::{Operator, Problem, SymbolSet};
pub use results::{QuizOutcome, QuizResult, Rating, SubmitReason};
pub use session::{Phase, QuizSession};
pub use settings::QuizSettings;
pub use streak::{RewardTier, RoundOutcome, StreakEvent, StreakGame};
