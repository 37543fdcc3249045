//! Green Button interval exports in, ranked tariffs out.
//!
//! [`ingest`] turns a loosely formatted utility CSV into ordered [`core::Reading`]s,
//! [`billing`] reconstructs the monthly bills of one [`tariff::Tariff`], and [`comparison`]
//! projects every tariff in a [`config::Roster`] onto a 30-day month and ranks them.

pub mod billing;
pub mod comparison;
pub mod config;
pub mod core;
pub mod ingest;
pub mod overlay;
pub mod prelude;
pub mod quantity;
pub mod statistics;
pub mod tariff;
