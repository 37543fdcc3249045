use std::sync::LazyLock;

use regex::Regex;

use crate::ingest::{commodity::Commodity, tokenizer::Row};

/// Rows beyond this point are never considered as a header.
pub const MAX_SCANNED_ROWS: usize = 80;

/// Rows with fewer non-empty cells are preambles or footers.
pub const MIN_NON_EMPTY_CELLS: usize = 3;

pub const UNIT_WEIGHT: u32 = 3;
pub const USAGE_NOUN_WEIGHT: u32 = 2;
pub const BOUNDARY_WEIGHT: u32 = 2;
pub const TEMPORAL_WEIGHT: u32 = 1;

pub static USAGE_NOUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)usage|consumption|quantity|value").unwrap());

static BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)start|end|interval").unwrap());

static TEMPORAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)date|time").unwrap());

#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HeaderMatch {
    /// Row index within the tokenized file.
    pub index: usize,

    pub score: u32,
}

/// Score the joined text of a candidate header row. Each keyword category counts once.
#[must_use]
pub fn score_header(row: &[String], commodity: Commodity) -> u32 {
    let text = row.join(" ");
    [
        (commodity.unit_pattern(), UNIT_WEIGHT),
        (&*USAGE_NOUN, USAGE_NOUN_WEIGHT),
        (&*BOUNDARY, BOUNDARY_WEIGHT),
        (&*TEMPORAL, TEMPORAL_WEIGHT),
    ]
    .into_iter()
    .filter(|(pattern, _)| pattern.is_match(&text))
    .map(|(_, weight)| weight)
    .sum()
}

/// Find the best-scoring header row, preferring the earliest one on a tie.
#[must_use]
pub fn detect_header(rows: &[Row], commodity: Commodity) -> Option<HeaderMatch> {
    let mut best: Option<HeaderMatch> = None;
    for (index, row) in rows.iter().enumerate().take(MAX_SCANNED_ROWS) {
        let n_non_empty = row.iter().filter(|cell| !cell.trim().is_empty()).count();
        if n_non_empty < MIN_NON_EMPTY_CELLS {
            continue;
        }
        let score = score_header(row, commodity);
        if best.is_none_or(|best| score > best.score) {
            best = Some(HeaderMatch { index, score });
        }
    }
    best.filter(|best| best.score >= commodity.min_header_score())
}
