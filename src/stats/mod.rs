//! Stats module - aggregation and ranking

pub(crate) mod calculator;

pub use calculator::{Rankings, StatsCalculator};
