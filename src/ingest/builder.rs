use crate::{
    core::Reading,
    ingest::{
        columns::{ColumnLayout, UsageColumns},
        fields::parse_number,
        tokenizer::Row,
    },
    quantity::usage::Usage,
};

/// Readings collected from the data rows, in file order.
#[must_use]
#[derive(Debug, Default)]
pub struct Built {
    pub readings: Vec<Reading>,

    /// Rows without a usable value or timestamp.
    pub n_skipped: usize,
}

/// Build a reading from every data row that yields both a usage value and a timestamp.
pub fn build_readings(rows: &[Row], layout: &ColumnLayout) -> Built {
    let mut built = Built::default();
    for row in rows {
        match (usage(row, layout.usage), layout.timestamp(row)) {
            (Some(value), Some(timestamp)) => built.readings.push(Reading::new(timestamp, value)),
            _ => built.n_skipped += 1,
        }
    }
    built
}

fn usage(row: &[String], columns: UsageColumns) -> Option<Usage> {
    let cell = |index: usize| row.get(index).and_then(|cell| parse_number(cell)).map(Usage::from);
    match columns {
        UsageColumns::Single(index) => cell(index),
        UsageColumns::Net { import, export } => Some(cell(import)? - cell(export)?),
    }
}
