//! Day- and month-level aggregation of ledger entries.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::errors::EngineError;
use crate::ledger::entry::checked_total;
use crate::ledger::{CategoryCatalog, CategoryId, Direction, LedgerEntry, YearMonth};

use super::ServiceResult;

/// Entries that fall on one day of the aggregated month.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DailySummary {
    pub day: u32,
    pub entries: Vec<LedgerEntry>,
}

impl DailySummary {
    /// `None` when the day's income does not fit in a `u64`.
    pub fn income_total(&self) -> Option<u64> {
        sum_direction(&self.entries, Direction::Income)
    }

    pub fn expense_total(&self) -> Option<u64> {
        sum_direction(&self.entries, Direction::Expense)
    }
}

/// Sparse day buckets plus exact month totals.
///
/// Days without entries have no [`DailySummary`]; buckets are ordered by day
/// and keep entries in the order they were supplied.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthlyAggregation {
    pub year_month: YearMonth,
    pub days: Vec<DailySummary>,
    pub income_total: u64,
    pub expense_total: u64,
}

impl MonthlyAggregation {
    /// Entries recorded on `day`; empty when nothing was recorded.
    pub fn day(&self, day: u32) -> &[LedgerEntry] {
        self.summary(day)
            .map(|summary| summary.entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn summary(&self, day: u32) -> Option<&DailySummary> {
        self.days
            .binary_search_by_key(&day, |summary| summary.day)
            .ok()
            .map(|index| &self.days[index])
    }

    /// Entries recorded on `date`; empty when the date lies in another month.
    pub fn on_date(&self, date: NaiveDate) -> &[LedgerEntry] {
        if self.year_month.contains(date) {
            self.day(date.day())
        } else {
            &[]
        }
    }

    pub fn entry_count(&self) -> usize {
        self.days.iter().map(|summary| summary.entries.len()).sum()
    }

    /// Income minus expense; negative when the month overspent.
    pub fn balance(&self) -> i128 {
        i128::from(self.income_total) - i128::from(self.expense_total)
    }
}

/// Sum of one category within a month.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub category_name: Option<String>,
    pub total: u64,
}

/// Per-category totals for one month and one direction.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MonthlyReport {
    pub year_month: YearMonth,
    pub items: Vec<CategoryTotal>,
}

impl MonthlyReport {
    /// Sum over all categories, `None` on overflow.
    pub fn total(&self) -> Option<u64> {
        self.items
            .iter()
            .try_fold(0u64, |acc, item| acc.checked_add(item.total))
    }
}

/// Monthly category reports split by direction, oldest month first.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct MonthlyReportSet {
    pub incomes: Vec<MonthlyReport>,
    pub expenses: Vec<MonthlyReport>,
}

impl MonthlyReportSet {
    pub fn reports(&self, direction: Direction) -> &[MonthlyReport] {
        match direction {
            Direction::Income => &self.incomes,
            Direction::Expense => &self.expenses,
        }
    }

    /// Months that have a report for `direction`, newest first.
    pub fn available_months(&self, direction: Direction) -> Vec<YearMonth> {
        self.reports(direction)
            .iter()
            .rev()
            .map(|report| report.year_month)
            .collect()
    }

    /// The month containing `today` when it has data, otherwise the latest one.
    pub fn default_month(&self, direction: Direction, today: NaiveDate) -> Option<YearMonth> {
        let current = YearMonth::of(today);
        let reports = self.reports(direction);
        if reports.iter().any(|report| report.year_month == current) {
            return Some(current);
        }
        reports.last().map(|report| report.year_month)
    }

    pub fn report_for(&self, direction: Direction, month: YearMonth) -> Option<&MonthlyReport> {
        self.reports(direction)
            .iter()
            .find(|report| report.year_month == month)
    }
}

/// Builds calendar-month summaries from flat entry lists.
pub struct MonthlyService;

impl MonthlyService {
    /// Buckets the entries of `year`/`month` by day and totals them by direction.
    ///
    /// Entries dated in other months are ignored.
    pub fn aggregate(
        entries: &[LedgerEntry],
        year: i32,
        month: u32,
    ) -> ServiceResult<MonthlyAggregation> {
        let year_month = YearMonth::new(year, month)?;
        let mut buckets: BTreeMap<u32, Vec<LedgerEntry>> = BTreeMap::new();
        let mut income_total = 0u64;
        let mut expense_total = 0u64;

        for entry in entries.iter().filter(|e| year_month.contains(e.date())) {
            let total = match entry.direction {
                Direction::Income => &mut income_total,
                Direction::Expense => &mut expense_total,
            };
            *total = total
                .checked_add(entry.amount)
                .ok_or_else(|| overflow(year_month))?;
            buckets
                .entry(entry.date().day())
                .or_default()
                .push(entry.clone());
        }

        let days: Vec<DailySummary> = buckets
            .into_iter()
            .map(|(day, entries)| DailySummary { day, entries })
            .collect();
        tracing::debug!(
            month = %year_month,
            days = days.len(),
            income_total,
            expense_total,
            "aggregated month"
        );

        Ok(MonthlyAggregation {
            year_month,
            days,
            income_total,
            expense_total,
        })
    }

    /// Per-month, per-direction category totals over the whole entry list.
    pub fn category_report(
        entries: &[LedgerEntry],
        catalog: &CategoryCatalog,
    ) -> ServiceResult<MonthlyReportSet> {
        let mut incomes: Buckets = BTreeMap::new();
        let mut expenses: Buckets = BTreeMap::new();

        for entry in entries {
            let buckets = match entry.direction {
                Direction::Income => &mut incomes,
                Direction::Expense => &mut expenses,
            };
            let month = entry.year_month();
            let total = buckets
                .entry(month)
                .or_default()
                .entry(entry.category_id)
                .or_default();
            *total = total.checked_add(entry.amount).ok_or_else(|| overflow(month))?;
        }

        check_month_totals(&incomes)?;
        check_month_totals(&expenses)?;

        let build = |buckets: Buckets| -> Vec<MonthlyReport> {
            buckets
                .into_iter()
                .map(|(year_month, per_category)| {
                    let mut items: Vec<CategoryTotal> = per_category
                        .into_iter()
                        .map(|(category_id, total)| CategoryTotal {
                            category_id,
                            category_name: catalog.name_of(category_id).map(str::to_owned),
                            total,
                        })
                        .collect();
                    items.sort_by(|a, b| {
                        b.total
                            .cmp(&a.total)
                            .then(a.category_id.cmp(&b.category_id))
                    });
                    MonthlyReport { year_month, items }
                })
                .collect()
        };

        Ok(MonthlyReportSet {
            incomes: build(incomes),
            expenses: build(expenses),
        })
    }
}

type Buckets = BTreeMap<YearMonth, BTreeMap<CategoryId, u64>>;

fn sum_direction(entries: &[LedgerEntry], direction: Direction) -> Option<u64> {
    checked_total(entries.iter().filter(|entry| entry.direction == direction))
}

/// Each month's grand total must fit as well as each category's.
fn check_month_totals(buckets: &Buckets) -> ServiceResult<()> {
    for (month, per_category) in buckets {
        per_category
            .values()
            .try_fold(0u64, |acc, total| acc.checked_add(*total))
            .ok_or_else(|| overflow(*month))?;
    }
    Ok(())
}

fn overflow(month: YearMonth) -> EngineError {
    EngineError::InvalidArgument(format!("amount total for {month} overflows"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Category, EntryTemplate};

    fn entry(
        y: i32,
        m: u32,
        d: u32,
        amount: u64,
        direction: Direction,
        category: CategoryId,
    ) -> LedgerEntry {
        let at = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        EntryTemplate::new(1, format!("{y}-{m}-{d}"), amount, direction, category).occurrence_at(at)
    }

    #[test]
    fn empty_input_yields_zero_totals() {
        let aggregation = MonthlyService::aggregate(&[], 2024, 3).unwrap();
        assert!(aggregation.days.is_empty());
        assert_eq!(aggregation.income_total, 0);
        assert_eq!(aggregation.expense_total, 0);
        assert!(aggregation.day(5).is_empty());
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(matches!(
            MonthlyService::aggregate(&[], 2024, 13),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn same_day_entries_share_a_bucket_in_received_order() {
        let entries = vec![
            entry(2024, 3, 5, 1200, Direction::Expense, 1),
            entry(2024, 3, 5, 3000, Direction::Income, 2),
        ];
        let aggregation = MonthlyService::aggregate(&entries, 2024, 3).unwrap();
        assert_eq!(aggregation.days.len(), 1);
        assert_eq!(aggregation.day(5), entries.as_slice());
        assert_eq!(aggregation.income_total, 3000);
        assert_eq!(aggregation.expense_total, 1200);
        assert_eq!(aggregation.balance(), 1800);
    }

    #[test]
    fn entries_outside_the_month_are_ignored() {
        let entries = vec![
            entry(2024, 2, 29, 100, Direction::Expense, 1),
            entry(2024, 3, 1, 200, Direction::Expense, 1),
            entry(2023, 3, 1, 400, Direction::Expense, 1),
        ];
        let aggregation = MonthlyService::aggregate(&entries, 2024, 3).unwrap();
        assert_eq!(aggregation.entry_count(), 1);
        assert_eq!(aggregation.expense_total, 200);
    }

    #[test]
    fn buckets_are_sorted_and_sparse() {
        let entries = vec![
            entry(2024, 3, 20, 1, Direction::Expense, 1),
            entry(2024, 3, 2, 2, Direction::Expense, 1),
            entry(2024, 3, 20, 3, Direction::Income, 1),
        ];
        let aggregation = MonthlyService::aggregate(&entries, 2024, 3).unwrap();
        let days: Vec<u32> = aggregation.days.iter().map(|s| s.day).collect();
        assert_eq!(days, [2, 20]);
        let twentieth = aggregation.summary(20).unwrap();
        assert_eq!(twentieth.income_total(), Some(3));
        assert_eq!(twentieth.expense_total(), Some(1));
        let on_date = aggregation.on_date(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(on_date.len(), 1);
        assert!(aggregation
            .on_date(NaiveDate::from_ymd_opt(2024, 4, 2).unwrap())
            .is_empty());
    }

    #[test]
    fn totals_equal_sum_of_buckets() {
        let entries: Vec<LedgerEntry> = (1..=28)
            .flat_map(|day| {
                let direction = if day % 3 == 0 {
                    Direction::Income
                } else {
                    Direction::Expense
                };
                [
                    entry(2025, 2, day, u64::from(day) * 17, direction, 1),
                    entry(2025, 2, day, 5, Direction::Expense, 2),
                ]
            })
            .collect();
        let aggregation = MonthlyService::aggregate(&entries, 2025, 2).unwrap();
        let bucket_sum: u64 = aggregation
            .days
            .iter()
            .map(|s| s.income_total().unwrap() + s.expense_total().unwrap())
            .sum();
        assert_eq!(aggregation.income_total + aggregation.expense_total, bucket_sum);
        assert_eq!(aggregation.entry_count(), entries.len());
    }

    #[test]
    fn overflowing_totals_fail_loudly() {
        let entries = vec![
            entry(2024, 3, 1, u64::MAX, Direction::Income, 1),
            entry(2024, 3, 2, 1, Direction::Income, 1),
        ];
        assert!(matches!(
            MonthlyService::aggregate(&entries, 2024, 3),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn category_report_groups_by_month_and_direction() {
        let catalog = CategoryCatalog::new([
            Category::new(1, "Food", Direction::Expense),
            Category::new(2, "Transport", Direction::Expense),
            Category::new(9, "Salary", Direction::Income),
        ]);
        let entries = vec![
            entry(2024, 3, 1, 500, Direction::Expense, 1),
            entry(2024, 3, 9, 1500, Direction::Expense, 2),
            entry(2024, 3, 10, 700, Direction::Expense, 1),
            entry(2024, 3, 25, 300_000, Direction::Income, 9),
            entry(2024, 1, 3, 50, Direction::Expense, 77),
        ];
        let report = MonthlyService::category_report(&entries, &catalog).unwrap();

        let months: Vec<String> = report
            .expenses
            .iter()
            .map(|r| r.year_month.to_string())
            .collect();
        assert_eq!(months, ["2024-01", "2024-03"]);

        let march = &report.expenses[1];
        assert_eq!(march.total(), Some(2700));
        assert_eq!(march.items[0].category_name.as_deref(), Some("Transport"));
        assert_eq!(march.items[1].total, 1200);

        let january = &report.expenses[0];
        assert_eq!(january.items[0].category_name, None);

        assert_eq!(report.incomes.len(), 1);
        assert_eq!(report.incomes[0].items[0].total, 300_000);
    }

    #[test]
    fn default_month_prefers_current_then_latest() {
        let entries = vec![
            entry(2024, 1, 3, 50, Direction::Expense, 1),
            entry(2024, 3, 3, 50, Direction::Expense, 1),
        ];
        let report = MonthlyService::category_report(&entries, &CategoryCatalog::default()).unwrap();
        let january = YearMonth::new(2024, 1).unwrap();
        let march = YearMonth::new(2024, 3).unwrap();
        let in_january = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let in_june = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        assert_eq!(report.default_month(Direction::Expense, in_january), Some(january));
        assert_eq!(report.default_month(Direction::Expense, in_june), Some(march));
        assert_eq!(report.default_month(Direction::Income, in_june), None);
        assert_eq!(report.available_months(Direction::Expense), [march, january]);
        assert!(report.report_for(Direction::Expense, march).is_some());
    }

    #[test]
    fn category_report_rejects_overflowing_month_total() {
        let entries = vec![
            entry(2024, 3, 1, u64::MAX - 1, Direction::Expense, 1),
            entry(2024, 3, 2, u64::MAX - 1, Direction::Expense, 2),
        ];
        assert!(matches!(
            MonthlyService::category_report(&entries, &CategoryCatalog::default()),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn hand_built_totals_report_overflow() {
        let report = MonthlyReport {
            year_month: YearMonth::new(2024, 3).unwrap(),
            items: vec![
                CategoryTotal {
                    category_id: 1,
                    category_name: None,
                    total: u64::MAX,
                },
                CategoryTotal {
                    category_id: 2,
                    category_name: None,
                    total: 1,
                },
            ],
        };
        assert_eq!(report.total(), None);

        let day = DailySummary {
            day: 1,
            entries: vec![
                entry(2024, 3, 1, u64::MAX, Direction::Income, 1),
                entry(2024, 3, 1, 1, Direction::Income, 1),
                entry(2024, 3, 1, 7, Direction::Expense, 1),
            ],
        };
        assert_eq!(day.income_total(), None);
        assert_eq!(day.expense_total(), Some(7));
    }
}
