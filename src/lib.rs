#![doc(test(attr(deny(warnings))))]

//! Kakeibo Core projects recurring household ledger entries onto the calendar
//! and aggregates ledger records into daily, monthly, per-category and trend
//! views.

pub mod config;
pub mod core;
pub mod errors;
pub mod format;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::services::{
    CalendarCell, CalendarGrid, CalendarService, CategoryTrend, DailySummary, LedgerViewService,
    MonthlyAggregation, MonthlyReportSet, MonthlyService, ProjectionService, RecurringDefinition,
    TrendPoint, TrendService,
};
pub use errors::{EngineError, Result};
pub use ledger::{
    Direction, EntryTemplate, Frequency, LedgerEntry, RecurrenceRule, Step, YearMonth,
};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Kakeibo Core tracing initialized.");
    });
}
