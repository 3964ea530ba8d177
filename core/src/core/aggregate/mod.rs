//! Word-frequency ranking over active records.
//!
//! Ranking order: count descending, then most recent `created_at` descending,
//! then word ascending. Only the first [`RANK_WINDOW`] ranked words are used
//! for the top lists and for the in-window rank lookup.

use crate::core::vocabulary::palette;
use crate::types::{AggregateResult, Record, Word, WordCount, YourWord};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::SystemTime;

pub const RANK_WINDOW: usize = 100;
pub const TOP5_LEN: usize = 5;
pub const TOP10_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tally {
    word: Word,
    count: u64,
    last_created_at: SystemTime,
}

impl Tally {
    fn as_word_count(&self) -> WordCount {
        WordCount {
            word: self.word.clone(),
            count: self.count,
        }
    }
}

fn ranking(a: &Tally, b: &Tally) -> Ordering {
    b.count
        .cmp(&a.count)
        .then_with(|| b.last_created_at.cmp(&a.last_created_at))
        .then_with(|| a.word.cmp(&b.word))
}

fn tally(records: &[Record]) -> Vec<Tally> {
    let mut by_word: HashMap<&Word, Tally> = HashMap::new();

    for record in records {
        by_word
            .entry(&record.word)
            .and_modify(|t| {
                t.count += 1;
                t.last_created_at = t.last_created_at.max(record.created_at);
            })
            .or_insert_with(|| Tally {
                word: record.word.clone(),
                count: 1,
                last_created_at: record.created_at,
            });
    }

    let mut ranked: Vec<Tally> = by_word.into_values().collect();
    ranked.sort_by(ranking);
    ranked
}

/// Share of distinct words ranked at or below `rank`, as a whole percentage.
fn percentile(rank: u64, distinct: u64) -> u32 {
    if distinct == 0 {
        return 0;
    }
    let share = (distinct + 1).saturating_sub(rank) as f64 / distinct as f64;
    (share * 100.0).round() as u32
}

fn your_word(ranked: &[Tally], focus: &Word) -> Option<YourWord> {
    let distinct = ranked.len() as u64;
    let window = &ranked[..ranked.len().min(RANK_WINDOW)];

    if let Some(index) = window.iter().position(|t| &t.word == focus) {
        let rank = index as u64 + 1;
        return Some(YourWord {
            word: focus.clone(),
            count: window[index].count,
            rank,
            percentile: percentile(rank, distinct),
        });
    }

    let count = ranked.iter().find(|t| &t.word == focus)?.count;
    let rank = 1 + ranked.iter().filter(|t| t.count > count).count() as u64;
    Some(YourWord {
        word: focus.clone(),
        count,
        rank,
        percentile: percentile(rank, distinct).max(1),
    })
}

/// Computes the aggregate view over `records`, which must already be
/// filtered to active ones.
pub fn aggregate(records: &[Record], focus: Option<&Word>) -> AggregateResult {
    let ranked = tally(records);
    let window = &ranked[..ranked.len().min(RANK_WINDOW)];

    let top = window
        .first()
        .map(Tally::as_word_count)
        .unwrap_or_else(WordCount::silence);
    let color = palette::color_for(&top.word)
        .unwrap_or(palette::DEFAULT_COLOR)
        .to_string();

    AggregateResult {
        total: records.len() as u64,
        top,
        top5: window.iter().take(TOP5_LEN).map(Tally::as_word_count).collect(),
        top10: window.iter().take(TOP10_LEN).map(Tally::as_word_count).collect(),
        your_word: focus.and_then(|word| your_word(&ranked, word)),
        color,
    }
}
