use csv::{ReaderBuilder, Trim};
use itertools::Itertools;

use crate::prelude::*;

pub type Row = Vec<String>;

/// Split raw CSV text into rows of cells.
///
/// CR, LF, and CRLF terminate rows alike. Quoted cells may contain commas, line breaks, and
/// doubled quotes. Rows consisting only of blank cells are dropped. Never fails: records the
/// reader cannot decode are skipped.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Row> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes())
        .into_records()
        .filter_map(|record| {
            record.inspect_err(|error| debug!(%error, "skipping an undecodable record")).ok()
        })
        .map(|record| record.iter().map(str::to_owned).collect_vec())
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect()
}
