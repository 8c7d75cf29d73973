//! Ledger domain models and calendar helpers.

pub mod calendar;
pub mod category;
pub mod entry;
pub mod recurrence;
pub mod year_month;

pub use category::{Category, CategoryCatalog};
pub use entry::{CategoryId, Direction, EntryId, EntryTemplate, LedgerEntry, LedgerId};
pub use recurrence::{Frequency, OccurrenceDates, RecurrenceRule, Step};
pub use year_month::YearMonth;
