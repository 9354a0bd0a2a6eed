use clap::{Args, Parser, Subcommand, ValueEnum};
use mq_core::flashcards::DeckSettings;
use mq_core::{Operator, QuizSettings, SettingsError, SymbolSet};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "math_quiz")]
#[command(about = "Arithmetic practice for kids: timed quizzes, flashcards and a streak game")]
#[command(version)]
pub struct Cli {
    /// Whose history to read and write
    #[arg(long, global = true, env = "MATH_QUIZ_USER", default_value = "guest")]
    pub user: String,

    /// Where history is stored (defaults to the platform data directory)
    #[arg(long, global = true, env = "MATH_QUIZ_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Glyphs used for × and ÷
    #[arg(long, global = true, value_enum, default_value = "school")]
    pub symbols: Symbols,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a batch of problems against the clock
    Quiz(QuizArgs),

    /// Times-table streak game: pick the right answer within 5 seconds
    Streak,

    /// Flip through a generated flashcard deck
    Flashcards(DeckArgs),

    /// Show or prune saved quiz results
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    List,
    Delete { id: String },
    Clear,
}

#[derive(Args, Debug)]
pub struct QuizArgs {
    /// Digits per operand (1-3)
    #[arg(short, long, default_value_t = 1)]
    pub digits: u32,

    /// Operation: + - * /
    #[arg(short, long, default_value = "+", allow_hyphen_values = true)]
    pub op: Operator,

    /// Number of problems (3-100)
    #[arg(short = 'n', long, default_value_t = 10)]
    pub problems: u32,

    /// Seconds on the clock, 0 for no timer (max 600)
    #[arg(short, long, default_value_t = 60)]
    pub timer: u32,
}

impl QuizArgs {
    pub fn settings(&self, symbols: Symbols) -> Result<QuizSettings, SettingsError> {
        QuizSettings::new(self.digits, self.op, self.problems, self.timer)
            .map(|s| s.with_symbols(symbols.into()))
    }
}

#[derive(Args, Debug)]
pub struct DeckArgs {
    /// Digits per operand (1-3)
    #[arg(short, long, default_value_t = 1)]
    pub digits: u32,

    /// Operation: + - * /
    #[arg(short, long, default_value = "+", allow_hyphen_values = true)]
    pub op: Operator,

    /// Cards in the deck (1-50)
    #[arg(short, long, default_value_t = 10)]
    pub cards: u32,

    /// Shuffle the deck
    #[arg(short, long)]
    pub shuffle: bool,
}

impl DeckArgs {
    pub fn settings(&self) -> Result<DeckSettings, SettingsError> {
        DeckSettings::new(self.digits, self.op, self.cards, self.shuffle)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbols {
    Ascii,
    School,
}

impl From<Symbols> for SymbolSet {
    fn from(symbols: Symbols) -> Self {
        match symbols {
            Symbols::Ascii => SymbolSet::Ascii,
            Symbols::School => SymbolSet::School,
        }
    }
}
