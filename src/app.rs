use anyhow::{Context, Result};
use chrono::Local;
use mq_core::flashcards::{DeckSettings, FlashcardDeck};
use mq_core::history::{save_outcome, ScoreBand};
use mq_core::{
    History, HistoryStore, Identity, QuizOutcome, QuizSession, QuizSettings, RewardTier,
    RoundOutcome, StreakEvent, StreakGame,
};
use rand::Rng;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::config::HistoryAction;

/// Line-oriented stdin shared by every mode.
pub struct Terminal {
    lines: Lines<BufReader<Stdin>>,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next line without its newline, `None` on end of input.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        self.lines.next_line().await.context("reading input")
    }
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

pub async fn run_quiz<R: Rng>(
    term: &mut Terminal,
    settings: QuizSettings,
    identity: &Identity,
    store: &mut dyn HistoryStore,
    rng: &mut R,
) -> Result<()> {
    let mut session = QuizSession::start(settings, print_results, rng);
    let mut cursor = 0;

    println!(
        "{} problems. Type an answer and press Enter. :s submits now, :r restarts.",
        session.problems().len()
    );
    if settings.is_timed() {
        println!("You have {} seconds.", settings.timer_secs());
    }
    show_problem(&session, cursor);

    while !session.is_submitted() {
        tokio::select! {
            expired = session.next_tick() => {
                if expired {
                    println!("\nTime's up!");
                } else {
                    announce_time(session.time_remaining());
                }
            }
            line = term.read_line() => {
                let Some(line) = line? else {
                    session.submit();
                    break;
                };
                match line.trim() {
                    ":s" | ":submit" => {
                        session.submit();
                    }
                    ":r" | ":restart" => {
                        session.restart(rng);
                        cursor = 0;
                        println!("New problems!");
                    }
                    input => {
                        let id = session.problems()[cursor].id;
                        session.record_answer(id, input);
                        cursor += 1;
                        if cursor == session.problems().len() {
                            session.submit();
                        }
                    }
                }
                if !session.is_submitted() {
                    show_problem(&session, cursor);
                }
            }
        }
    }

    if let Some(outcome) = session.outcome() {
        save_outcome(store, identity, session.settings(), outcome);
    }
    Ok(())
}

fn show_problem(session: &QuizSession, cursor: usize) {
    let problem = &session.problems()[cursor];
    prompt(&format!("{:>3}. {} = ", cursor + 1, problem.display_text));
}

fn announce_time(remaining: u32) {
    if remaining % 30 == 0 || remaining == 10 || remaining <= 5 {
        println!("\n[{}:{:02} left]", remaining / 60, remaining % 60);
    }
}

fn print_results(outcome: &QuizOutcome) {
    let rating = outcome.rating();
    println!();
    println!(
        "{}  {}",
        if outcome.percentage() == 100 { "Amazing!" } else { "Quiz complete!" },
        rating.star_bar()
    );
    println!(
        "You got {} out of {} right ({}%). {}",
        outcome.score(),
        outcome.total(),
        outcome.percentage(),
        rating.message
    );
    for result in &outcome.results {
        let given = result
            .user_answer
            .map_or_else(|| "-".to_string(), |a| a.to_string());
        if result.is_correct {
            println!("  ✔ {} = {}", result.problem.display_text, given);
        } else {
            println!(
                "  ✘ {} = {} (answer: {})",
                result.problem.display_text, given, result.problem.correct_answer
            );
        }
    }
}

pub async fn run_streak<R: Rng>(term: &mut Terminal, rng: &mut R) -> Result<()> {
    let mut game = StreakGame::new(rng);
    println!("Pick 1 or 2 before the clock hits zero. :q quits.");
    show_question(&game);

    loop {
        tokio::select! {
            event = game.next_tick() => {
                match event {
                    Some(event) => report(&game, &event),
                    None if game.time_remaining() <= 2 => {
                        println!("  ...{}", game.time_remaining());
                    }
                    None => {}
                }
            }
            line = term.read_line() => {
                let Some(line) = line? else { break };
                let input = line.trim();
                if input == ":q" {
                    break;
                }
                if game.is_paused() {
                    game.acknowledge(rng);
                    show_question(&game);
                    continue;
                }
                let event = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|index| game.choose(index, rng));
                match event {
                    Some(event) => {
                        report(&game, &event);
                        if event.outcome == RoundOutcome::Correct {
                            show_question(&game);
                        }
                    }
                    None => prompt("Type 1 or 2: "),
                }
            }
        }
    }

    print_rewards(&game);
    Ok(())
}

fn show_question(game: &StreakGame) {
    let q = game.question();
    prompt(&format!(
        "{} = ?   [1] {}   [2] {}   ({}s) > ",
        q.problem.display_text,
        q.options[0],
        q.options[1],
        game.time_remaining()
    ));
}

fn report(game: &StreakGame, event: &StreakEvent) {
    match event.outcome {
        RoundOutcome::Correct => {
            println!("Correct! Streak: {}", event.streak);
            for tier in &event.awarded {
                println!("  +1 {} (every {} in a row)", tier.label(), tier.threshold());
            }
        }
        RoundOutcome::Incorrect | RoundOutcome::TimedOut => {
            if let Some(notice) = game.notice() {
                println!("\n{} {}", notice.title(), notice.message());
            }
            prompt("Press Enter to continue. ");
        }
    }
}

fn print_rewards(game: &StreakGame) {
    let summary: Vec<String> = RewardTier::ALL
        .iter()
        .map(|&tier| format!("{}: {}", tier.label(), game.tier_count(tier)))
        .collect();
    println!("\n{}", summary.join("  "));
}

pub async fn run_flashcards<R: Rng>(
    term: &mut Terminal,
    settings: &DeckSettings,
    rng: &mut R,
) -> Result<()> {
    let mut deck = FlashcardDeck::generate(settings, rng);
    println!("Enter flips, n next, p previous, q quits.");

    loop {
        let Some(card) = deck.current() else { break };
        let face = if deck.is_flipped() {
            format!("{} = {}", card.question, card.answer)
        } else {
            format!("{} = ?", card.question)
        };
        prompt(&format!(
            "[{}] Card {}/{}: {}  > ",
            card.topic,
            deck.position(),
            deck.len(),
            face
        ));

        let Some(line) = term.read_line().await? else { break };
        match line.trim() {
            "q" => break,
            "n" => deck.next_card(),
            "p" => deck.previous_card(),
            _ => deck.flip(),
        }
    }
    Ok(())
}

pub fn run_history(
    store: &mut dyn HistoryStore,
    identity: &Identity,
    action: Option<HistoryAction>,
) -> Result<()> {
    let mut history = History::load(store, identity).context("could not load your history")?;

    match action.unwrap_or(HistoryAction::List) {
        HistoryAction::List => print_history(&history),
        HistoryAction::Delete { id } => {
            history
                .delete(store, &id)
                .with_context(|| format!("could not delete record {id}"))?;
            println!("Deleted {id}.");
            print_history(&history);
        }
        HistoryAction::Clear => {
            let removed = history
                .clear(store)
                .context("could not clear your history")?;
            println!("Deleted {removed} record(s).");
        }
    }
    Ok(())
}

fn print_history(history: &History) {
    if history.is_empty() {
        println!("No saved quizzes yet. Run `math_quiz quiz` to start one.");
        return;
    }
    for stored in history.records() {
        let r = &stored.record;
        let band = match r.band() {
            ScoreBand::Good => "great",
            ScoreBand::Fair => "ok",
            ScoreBand::Poor => "keep going",
        };
        let timer = if r.settings.is_timed() {
            format!(", timer {}s", r.settings.timer_secs())
        } else {
            String::new()
        };
        println!(
            "{}  {}  {}/{} ({}%, {})  {} x{} digit(s), {} problems{}",
            stored.id,
            r.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            r.score,
            r.total_problems,
            r.percentage,
            band,
            r.settings.operator().label(),
            r.settings.digit_count(),
            r.settings.problem_count(),
            timer
        );
    }
}
