//! Expansion of recurring entry definitions into dated occurrences.

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::{EngineConfig, DEFAULT_MAX_OCCURRENCES, DEFAULT_PROJECTION_HORIZON_MONTHS};
use crate::errors::EngineError;
use crate::ledger::calendar::shift_months;
use crate::ledger::{EntryTemplate, LedgerEntry, RecurrenceRule, YearMonth};

use super::ServiceResult;

/// Projects recurrence rules over a bounded horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionService {
    horizon_months: u32,
    max_occurrences: usize,
}

impl Default for ProjectionService {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_PROJECTION_HORIZON_MONTHS,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
        }
    }
}

impl ProjectionService {
    pub fn new(horizon_months: u32, max_occurrences: usize) -> Self {
        Self {
            horizon_months,
            max_occurrences: max_occurrences.max(1),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.projection_horizon_months, config.max_occurrences)
    }

    /// Expands `template` into the occurrences of `rule` starting at `first`.
    ///
    /// Generation stops after the rule's end date or, when the rule has none,
    /// after `window_end` (both inclusive). Without either bound the configured
    /// horizon past `first` applies, and a series that would exceed
    /// `max_occurrences` within it fails with a configuration error. The first
    /// occurrence is always emitted, even when the end date precedes it.
    pub fn project(
        &self,
        template: &EntryTemplate,
        rule: &RecurrenceRule,
        first: NaiveDateTime,
        window_end: Option<NaiveDate>,
    ) -> ServiceResult<Vec<LedgerEntry>> {
        rule.step.validate()?;
        let (limit, capped) = match rule.end_date.or(window_end) {
            Some(limit) => (limit, false),
            None => (self.default_limit(first.date())?, true),
        };
        let time = first.time();

        let mut occurrences = Vec::new();
        for (index, date) in rule.occurrence_dates(first.date()).enumerate() {
            if index > 0 && date > limit {
                break;
            }
            if capped && occurrences.len() >= self.max_occurrences {
                tracing::warn!(
                    name = %template.name,
                    cap = self.max_occurrences,
                    limit = %limit,
                    "projection horizon exceeds occurrence cap"
                );
                return Err(EngineError::Configuration(format!(
                    "`{}` repeats more than {} times within {} months",
                    template.name, self.max_occurrences, self.horizon_months
                )));
            }
            occurrences.push(template.occurrence_at(date.and_time(time)));
        }

        tracing::debug!(
            name = %template.name,
            count = occurrences.len(),
            limit = %limit,
            "projected occurrences"
        );
        Ok(occurrences)
    }

    /// Occurrences of `rule` that fall inside `month`.
    ///
    /// The series is walked lazily from `first`, so definitions that started
    /// long before `month` still land in it.
    pub fn project_month(
        &self,
        template: &EntryTemplate,
        rule: &RecurrenceRule,
        first: NaiveDateTime,
        month: YearMonth,
    ) -> ServiceResult<Vec<LedgerEntry>> {
        rule.step.validate()?;
        let (start, end) = (month.first_day(), month.last_day());
        let time = first.time();
        let occurrences: Vec<LedgerEntry> = rule
            .occurrence_dates(first.date())
            .skip_while(|date| *date < start)
            .take_while(|date| *date <= end)
            .map(|date| template.occurrence_at(date.and_time(time)))
            .collect();
        tracing::debug!(
            name = %template.name,
            month = %month,
            count = occurrences.len(),
            "projected occurrences into month"
        );
        Ok(occurrences)
    }

    /// Projects several definitions and merges them in date order.
    pub fn project_all<'a, I>(
        &self,
        definitions: I,
        window_end: NaiveDate,
    ) -> ServiceResult<Vec<LedgerEntry>>
    where
        I: IntoIterator<Item = (&'a EntryTemplate, &'a RecurrenceRule, NaiveDateTime)>,
    {
        let mut merged = Vec::new();
        for (template, rule, first) in definitions {
            merged.extend(self.project(template, rule, first, Some(window_end))?);
        }
        merged.sort_by_key(|entry| entry.occurred_at);
        Ok(merged)
    }

    fn default_limit(&self, first: NaiveDate) -> ServiceResult<NaiveDate> {
        shift_months(first, i64::from(self.horizon_months)).ok_or_else(|| {
            EngineError::InvalidArgument(format!(
                "projection horizon of {} months from {first} leaves the calendar range",
                self.horizon_months
            ))
        })
    }
}
