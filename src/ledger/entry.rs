use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::year_month::YearMonth;

pub type EntryId = i64;
pub type LedgerId = i64;
pub type CategoryId = i64;

/// Whether an entry adds to or draws from the household budget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    /// Maps the wire-level direction flag (`true` = income).
    pub fn from_flag(is_income: bool) -> Self {
        if is_income {
            Direction::Income
        } else {
            Direction::Expense
        }
    }

    pub fn is_income(self) -> bool {
        matches!(self, Direction::Income)
    }
}

/// One recorded income or expense transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntry {
    /// `None` for projected occurrences that have not been persisted yet.
    pub id: Option<EntryId>,
    pub ledger_id: LedgerId,
    pub name: String,
    pub amount: u64,
    pub direction: Direction,
    pub occurred_at: NaiveDateTime,
    pub category_id: CategoryId,
    pub icon: String,
}

impl LedgerEntry {
    pub fn date(&self) -> NaiveDate {
        self.occurred_at.date()
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth::of(self.date())
    }

    pub fn is_income(&self) -> bool {
        self.direction.is_income()
    }
}

/// The date-independent part of an entry definition, expanded by the projector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryTemplate {
    pub ledger_id: LedgerId,
    pub name: String,
    pub amount: u64,
    pub direction: Direction,
    pub category_id: CategoryId,
    pub icon: String,
}

impl EntryTemplate {
    pub fn new(
        ledger_id: LedgerId,
        name: impl Into<String>,
        amount: u64,
        direction: Direction,
        category_id: CategoryId,
    ) -> Self {
        Self {
            ledger_id,
            name: name.into(),
            amount,
            direction,
            category_id,
            icon: String::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Stamps the template at a concrete date-time as an unpersisted entry.
    pub fn occurrence_at(&self, occurred_at: NaiveDateTime) -> LedgerEntry {
        LedgerEntry {
            id: None,
            ledger_id: self.ledger_id,
            name: self.name.clone(),
            amount: self.amount,
            direction: self.direction,
            occurred_at,
            category_id: self.category_id,
            icon: self.icon.clone(),
        }
    }
}

/// Sums magnitudes without silently wrapping.
pub fn checked_total<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Option<u64> {
    entries
        .into_iter()
        .try_fold(0u64, |acc, entry| acc.checked_add(entry.amount))
}
