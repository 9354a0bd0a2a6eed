use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use uuid::Uuid;

use crate::error::SettingsError;
use crate::problem::{self, Operator, SymbolSet};
use crate::settings::DIGIT_RANGE;

pub const CARD_RANGE: RangeInclusive<u32> = 1..=50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSettings {
    pub digit_count: u32,
    pub operator: Operator,
    pub card_count: u32,
    pub shuffle: bool,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            digit_count: 1,
            operator: Operator::Add,
            card_count: 10,
            shuffle: false,
        }
    }
}

impl DeckSettings {
    /// Card counts are clamped into range; the digit count must be valid.
    pub fn new(
        digit_count: u32,
        operator: Operator,
        card_count: u32,
        shuffle: bool,
    ) -> Result<Self, SettingsError> {
        if !DIGIT_RANGE.contains(&digit_count) {
            return Err(SettingsError::DigitCount(digit_count));
        }
        Ok(Self {
            digit_count,
            operator,
            card_count: card_count.clamp(*CARD_RANGE.start(), *CARD_RANGE.end()),
            shuffle,
        })
    }

    pub fn topic(&self) -> String {
        format!("{} - {} Digit(s)", self.operator.label(), self.digit_count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub topic: String,
}

#[derive(Debug, Clone)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    cursor: usize,
    flipped: bool,
}

impl FlashcardDeck {
    pub fn generate<R: Rng + ?Sized>(settings: &DeckSettings, rng: &mut R) -> Self {
        let topic = settings.topic();
        let mut cards: Vec<Flashcard> = (0..settings.card_count)
            .map(|_| {
                let p = problem::generate(
                    settings.digit_count,
                    settings.operator,
                    SymbolSet::School,
                    rng,
                );
                Flashcard {
                    id: Uuid::new_v4(),
                    question: p.display_text,
                    answer: p.correct_answer.to_string(),
                    topic: topic.clone(),
                }
            })
            .collect();

        if settings.shuffle {
            cards.shuffle(rng);
        }

        tracing::debug!(cards = cards.len(), %topic, "deck generated");
        Self::from_cards(cards)
    }

    pub fn from_cards(cards: Vec<Flashcard>) -> Self {
        Self {
            cards,
            cursor: 0,
            flipped: false,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.cards.get(self.cursor)
    }

    /// 1-based position of the current card.
    pub fn position(&self) -> usize {
        if self.cards.is_empty() {
            0
        } else {
            self.cursor + 1
        }
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        if !self.cards.is_empty() {
            self.flipped = !self.flipped;
        }
    }

    pub fn next_card(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.cards.len();
        self.flipped = false;
    }

    pub fn previous_card(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.cursor = (self.cursor + self.cards.len() - 1) % self.cards.len();
        self.flipped = false;
    }
}
