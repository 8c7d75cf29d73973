//! Store-backed entry points that feed the pure services.

use chrono::NaiveDateTime;

use crate::config::EngineConfig;
use crate::format::MonthLabelStyle;
use crate::ledger::{
    CategoryCatalog, CategoryId, EntryTemplate, LedgerEntry, LedgerId, RecurrenceRule, YearMonth,
};
use crate::storage::{into_entries, LedgerStore};

use super::{
    CategoryTrend, MonthlyAggregation, MonthlyReportSet, MonthlyService, ProjectionService,
    ServiceResult, TrendService,
};

/// A registered recurring entry: what to repeat, how, and from when.
#[derive(Debug, Clone)]
pub struct RecurringDefinition {
    pub template: EntryTemplate,
    pub rule: RecurrenceRule,
    pub first: NaiveDateTime,
}

/// Retrieves records from a [`LedgerStore`] and derives views from them.
///
/// Retrieval failures are returned unchanged; nothing is retried or cached.
pub struct LedgerViewService<S> {
    store: S,
    projection: ProjectionService,
    month_label: MonthLabelStyle,
}

impl<S: LedgerStore> LedgerViewService<S> {
    pub fn new(store: S, config: &EngineConfig) -> Self {
        Self {
            store,
            projection: ProjectionService::from_config(config),
            month_label: config.month_label,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetches `month` for `owner` and aggregates it by day.
    pub fn month(&self, owner: LedgerId, month: YearMonth) -> ServiceResult<MonthlyAggregation> {
        let entries = self.fetch_month_entries(owner, month)?;
        tracing::debug!(owner, month = %month, entries = entries.len(), "fetched month");
        MonthlyService::aggregate(&entries, month.year(), month.month())
    }

    /// Like [`Self::month`], with recurring definitions projected into the month.
    pub fn month_with_recurring(
        &self,
        owner: LedgerId,
        month: YearMonth,
        definitions: &[RecurringDefinition],
    ) -> ServiceResult<MonthlyAggregation> {
        let mut entries = self.fetch_month_entries(owner, month)?;
        for def in definitions {
            entries.extend(
                self.projection
                    .project_month(&def.template, &def.rule, def.first, month)?,
            );
        }
        MonthlyService::aggregate(&entries, month.year(), month.month())
    }

    /// Fetches the full history of `category` and builds its trend series.
    pub fn category_trend(
        &self,
        owner: LedgerId,
        category: CategoryId,
    ) -> ServiceResult<CategoryTrend> {
        let records = self.store.fetch_category_history(owner, category)?;
        tracing::debug!(owner, category, records = records.len(), "fetched category history");
        let entries = into_entries(records, owner)?;
        TrendService::trend(entries, &self.month_label)
    }

    /// Category totals for each of `months`.
    pub fn monthly_report(
        &self,
        owner: LedgerId,
        months: impl IntoIterator<Item = YearMonth>,
        catalog: &CategoryCatalog,
    ) -> ServiceResult<MonthlyReportSet> {
        let mut entries = Vec::new();
        for month in months {
            entries.extend(self.fetch_month_entries(owner, month)?);
        }
        MonthlyService::category_report(&entries, catalog)
    }

    fn fetch_month_entries(
        &self,
        owner: LedgerId,
        month: YearMonth,
    ) -> ServiceResult<Vec<LedgerEntry>> {
        let records = self.store.fetch_month(owner, month)?;
        Ok(into_entries(records, owner)?)
    }
}
