//! Tolerant Green Button CSV ingestion.
//!
//! Utility exports differ in preambles, column names, and date layouts. The pipeline locates the
//! header by scoring, maps columns to roles, and skips any row it cannot make sense of.

pub mod builder;
pub mod columns;
pub mod commodity;
pub mod fields;
pub mod header;
pub mod normalize;
pub mod tokenizer;

use chrono::TimeDelta;

pub use self::commodity::Commodity;
use crate::{
    core::Reading,
    ingest::{
        builder::build_readings,
        columns::resolve_columns,
        header::detect_header,
        normalize::{infer_interval, normalize},
        tokenizer::tokenize,
    },
    prelude::*,
};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("the {commodity} export is empty or unreadable")]
    Empty { commodity: Commodity },

    #[error("could not find a header row in the {commodity} export")]
    NoHeader { commodity: Commodity },

    #[error("could not find a {commodity} usage column in {unit}")]
    NoUsageColumn { commodity: Commodity, unit: &'static str },

    #[error("no {commodity} interval readings in {unit} could be parsed")]
    NoReadings { commodity: Commodity, unit: &'static str },
}

/// Normalized readings together with the data-quality advisories raised while parsing.
#[must_use]
#[derive(Clone, Debug)]
pub struct ParsedReadings {
    /// Strictly increasing timestamps, never empty.
    pub readings: Vec<Reading>,

    pub warnings: Vec<String>,

    /// Median reading spacing, unknown for a single reading.
    pub interval: Option<TimeDelta>,
}

pub fn parse_electricity(text: &str) -> Result<ParsedReadings, IngestError> {
    parse(text, Commodity::Electricity)
}

pub fn parse_gas(text: &str) -> Result<ParsedReadings, IngestError> {
    parse(text, Commodity::Gas)
}

#[instrument(skip_all, fields(commodity = %commodity))]
pub fn parse(text: &str, commodity: Commodity) -> Result<ParsedReadings, IngestError> {
    let rows = tokenize(text);
    if rows.len() < 2 {
        return Err(IngestError::Empty { commodity });
    }

    let header = detect_header(&rows, commodity).ok_or(IngestError::NoHeader { commodity })?;
    debug!(index = header.index, score = header.score, "detected header");
    let layout = resolve_columns(&rows[header.index], commodity)
        .ok_or(IngestError::NoUsageColumn { commodity, unit: commodity.unit() })?;
    debug!(usage = ?layout.usage, n_timestamp_resolvers = layout.timestamps.len(), "resolved columns");

    let mut warnings = Vec::new();
    if layout.usage.is_net() {
        warnings.push(
            "Calculating net usage as import minus export; negative values mean net export"
                .to_string(),
        );
    }

    let built = build_readings(&rows[header.index + 1..], &layout);
    if built.readings.is_empty() {
        return Err(IngestError::NoReadings { commodity, unit: commodity.unit() });
    }
    let readings = normalize(built.readings);

    let interval = infer_interval(&readings);
    if let Some(warning) = interval.and_then(|interval| commodity.interval_warning(interval)) {
        warnings.push(warning);
    }
    if built.n_skipped != 0 {
        warnings.push(format!("Skipped {} rows that could not be parsed", built.n_skipped));
    }
    for warning in &warnings {
        warn!("{warning}");
    }

    info!(
        n_readings = readings.len(),
        n_skipped = built.n_skipped,
        interval_minutes = interval.map(|interval| interval.num_minutes()),
        "parsed"
    );
    Ok(ParsedReadings { readings, warnings, interval })
}
