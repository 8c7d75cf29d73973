//! Collaborator contract for retrieving raw ledger records.

pub mod json_backend;

use std::io;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::{CategoryId, Direction, EntryId, LedgerEntry, LedgerId, YearMonth};

pub use json_backend::JsonLedgerStore;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Ledger not found: {0}")]
    LedgerNotFound(LedgerId),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Malformed record {id}: {reason}")]
    MalformedRecord { id: EntryId, reason: String },
}

/// A ledger record as the store hands it over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    pub id: EntryId,
    #[serde(rename = "itemName")]
    pub name: String,
    #[serde(rename = "itemAmount")]
    pub amount: i64,
    #[serde(rename = "inoutFlg")]
    pub is_income: bool,
    pub used_date: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub icon_name: String,
}

impl LedgerRecord {
    /// Converts the record, rejecting negative magnitudes and unreadable dates.
    pub fn into_entry(self, ledger_id: LedgerId) -> Result<LedgerEntry, RetrievalError> {
        let amount = u64::try_from(self.amount).map_err(|_| RetrievalError::MalformedRecord {
            id: self.id,
            reason: format!("negative amount {}", self.amount),
        })?;
        let occurred_at =
            parse_timestamp(&self.used_date).ok_or_else(|| RetrievalError::MalformedRecord {
                id: self.id,
                reason: format!("unreadable date `{}`", self.used_date),
            })?;
        Ok(LedgerEntry {
            id: Some(self.id),
            ledger_id,
            name: self.name,
            amount,
            direction: Direction::from_flag(self.is_income),
            occurred_at,
            category_id: self.category_id,
            icon: self.icon_name,
        })
    }
}

/// Source of raw ledger records. Implementations own persistence and transport.
pub trait LedgerStore: Send + Sync {
    /// Records of `owner` dated within `month`, in store order.
    fn fetch_month(
        &self,
        owner: LedgerId,
        month: YearMonth,
    ) -> Result<Vec<LedgerRecord>, RetrievalError>;

    /// Every record of `owner` filed under `category`, in store order.
    fn fetch_category_history(
        &self,
        owner: LedgerId,
        category: CategoryId,
    ) -> Result<Vec<LedgerRecord>, RetrievalError>;
}

/// Converts a batch of records, failing on the first malformed one.
pub fn into_entries(
    records: Vec<LedgerRecord>,
    owner: LedgerId,
) -> Result<Vec<LedgerEntry>, RetrievalError> {
    records
        .into_iter()
        .map(|record| record.into_entry(owner))
        .collect()
}

/// Accepts RFC 3339, naive ISO-8601 date-times, and plain `YYYY-MM-DD` dates.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.naive_local());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(stamp);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
