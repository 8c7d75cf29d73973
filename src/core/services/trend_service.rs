//! Month-over-month trend series for a single category.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::EngineError;
use crate::format::MonthLabeler;
use crate::ledger::{LedgerEntry, YearMonth};

use super::ServiceResult;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrendPoint {
    pub year_month: YearMonth,
    pub label: String,
    pub total: u64,
}

/// Entries of one selected month and their exact total.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrendSelection<'a> {
    pub year_month: YearMonth,
    pub entries: Vec<&'a LedgerEntry>,
    pub total: u64,
}

/// Trend series over a retained category history.
///
/// Selecting another month filters the retained history again; nothing is
/// fetched twice.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryTrend {
    pub points: Vec<TrendPoint>,
    history: Vec<LedgerEntry>,
}

impl CategoryTrend {
    pub fn history(&self) -> &[LedgerEntry] {
        &self.history
    }

    /// The newest month in the series.
    pub fn latest_month(&self) -> Option<YearMonth> {
        self.points.last().map(|point| point.year_month)
    }

    /// Entries of `selected`, or of the latest month when nothing is selected.
    ///
    /// Returns `None` only when no month is selected and the history is empty.
    /// A selected month without entries yields an empty selection.
    pub fn select(&self, selected: Option<YearMonth>) -> Option<TrendSelection<'_>> {
        let year_month = selected.or_else(|| self.latest_month())?;
        let entries: Vec<&LedgerEntry> = self
            .history
            .iter()
            .filter(|entry| entry.year_month() == year_month)
            .collect();
        let total = self.total_for(year_month);
        Some(TrendSelection {
            year_month,
            entries,
            total,
        })
    }

    /// Total recorded in `year_month`, zero when the month has no entries.
    pub fn total_for(&self, year_month: YearMonth) -> u64 {
        self.points
            .binary_search_by_key(&year_month, |point| point.year_month)
            .map(|index| self.points[index].total)
            .unwrap_or(0)
    }

    /// Total of the month containing `today`.
    pub fn current_month_total(&self, today: NaiveDate) -> u64 {
        self.total_for(YearMonth::of(today))
    }

    /// The last `count` points of the series.
    pub fn recent(&self, count: usize) -> &[TrendPoint] {
        let start = self.points.len().saturating_sub(count);
        &self.points[start..]
    }
}

pub struct TrendService;

impl TrendService {
    /// Buckets a category's history by month, oldest first, one point per
    /// month that has at least one entry.
    pub fn trend(
        entries: Vec<LedgerEntry>,
        labeler: &dyn MonthLabeler,
    ) -> ServiceResult<CategoryTrend> {
        let mut totals: BTreeMap<YearMonth, u64> = BTreeMap::new();
        for entry in &entries {
            let month = entry.year_month();
            let total = totals.entry(month).or_default();
            *total = total.checked_add(entry.amount).ok_or_else(|| {
                EngineError::InvalidArgument(format!("category total for {month} overflows"))
            })?;
        }

        let points: Vec<TrendPoint> = totals
            .into_iter()
            .map(|(year_month, total)| TrendPoint {
                year_month,
                label: labeler.label(year_month),
                total,
            })
            .collect();
        tracing::debug!(points = points.len(), entries = entries.len(), "built trend");

        Ok(CategoryTrend {
            points,
            history: entries,
        })
    }
}
