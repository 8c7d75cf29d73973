//! Recurrence rules and the fixed frequency code table used by entry forms.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calendar::{shift_days, shift_months, shift_years};
use crate::errors::EngineError;

/// The interval between two occurrences. Exactly one unit is ever set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    None,
    Days(u32),
    Months(u32),
    Years(u32),
}

impl Step {
    /// Date of the `index`-th occurrence counted from `anchor`.
    ///
    /// Months and years are added to the anchor rather than chained from the
    /// previous occurrence, so a Jan 31 series lands on Feb 29 then Mar 31.
    pub fn nth_from(self, anchor: NaiveDate, index: u32) -> Option<NaiveDate> {
        let index = i64::from(index);
        match self {
            Step::None => (index == 0).then_some(anchor),
            Step::Days(n) => shift_days(anchor, i64::from(n) * index),
            Step::Months(n) => shift_months(anchor, i64::from(n) * index),
            Step::Years(n) => shift_years(anchor, i64::from(n) * index),
        }
    }

    pub fn is_repeating(self) -> bool {
        !matches!(self, Step::None)
    }

    pub fn validate(self) -> Result<(), EngineError> {
        match self {
            Step::Days(0) | Step::Months(0) | Step::Years(0) => Err(EngineError::Configuration(
                "recurrence step must be greater than zero".into(),
            )),
            _ => Ok(()),
        }
    }

    pub fn label(self) -> String {
        match self {
            Step::None => "Once".into(),
            Step::Days(1) => "Daily".into(),
            Step::Days(7) => "Weekly".into(),
            Step::Days(n) if n % 7 == 0 => format!("Every {} weeks", n / 7),
            Step::Days(n) => format!("Every {n} days"),
            Step::Months(1) => "Monthly".into(),
            Step::Months(n) => format!("Every {n} months"),
            Step::Years(1) => "Yearly".into(),
            Step::Years(n) => format!("Every {n} years"),
        }
    }
}

/// A step plus an optional inclusive end date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RecurrenceRule {
    pub step: Step,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn once() -> Self {
        Self::default()
    }

    pub fn new(step: Step, end_date: Option<NaiveDate>) -> Result<Self, EngineError> {
        step.validate()?;
        Ok(Self { step, end_date })
    }

    /// Builds a rule from loose per-unit counts, as entry forms describe them.
    /// All unset means a one-off entry; more than one set is rejected.
    pub fn from_units(
        days: Option<u32>,
        months: Option<u32>,
        years: Option<u32>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, EngineError> {
        let step = match (days, months, years) {
            (None, None, None) => Step::None,
            (Some(n), None, None) => Step::Days(n),
            (None, Some(n), None) => Step::Months(n),
            (None, None, Some(n)) => Step::Years(n),
            _ => {
                return Err(EngineError::Configuration(
                    "recurrence rule sets more than one step unit".into(),
                ))
            }
        };
        Self::new(step, end_date)
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Unbounded (save for the rule's end date) sequence of occurrence dates.
    /// The first date is always yielded, even when it lies after the end date.
    pub fn occurrence_dates(&self, first: NaiveDate) -> OccurrenceDates {
        OccurrenceDates {
            step: self.step,
            end_date: self.end_date,
            anchor: first,
            index: 0,
            done: false,
        }
    }
}

/// Iterator returned by [`RecurrenceRule::occurrence_dates`].
#[derive(Debug, Clone)]
pub struct OccurrenceDates {
    step: Step,
    end_date: Option<NaiveDate>,
    anchor: NaiveDate,
    index: u32,
    done: bool,
}

impl Iterator for OccurrenceDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.done {
            return None;
        }
        if self.index == 0 {
            self.index = 1;
            self.done = !self.step.is_repeating();
            return Some(self.anchor);
        }
        let candidate = self.step.nth_from(self.anchor, self.index);
        match candidate {
            Some(date) if self.end_date.map_or(true, |end| date <= end) => {
                self.index = self.index.saturating_add(1);
                self.done = self.index == u32::MAX;
                Some(date)
            }
            _ => {
                self.done = true;
                None
            }
        }
    }
}

/// Frequency codes offered by the entry registration form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Frequency {
    None,
    Daily,
    EveryWeek,
    EveryTwoWeeks,
    EveryThreeWeeks,
    EveryMonth,
    EveryTwoMonths,
    EveryThreeMonths,
    EveryFourMonths,
    EveryFiveMonths,
    EverySixMonths,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 12] = [
        Frequency::None,
        Frequency::Daily,
        Frequency::EveryWeek,
        Frequency::EveryTwoWeeks,
        Frequency::EveryThreeWeeks,
        Frequency::EveryMonth,
        Frequency::EveryTwoMonths,
        Frequency::EveryThreeMonths,
        Frequency::EveryFourMonths,
        Frequency::EveryFiveMonths,
        Frequency::EverySixMonths,
        Frequency::Yearly,
    ];

    pub fn from_code(code: u8) -> Result<Self, EngineError> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| EngineError::Configuration(format!("unknown frequency code {code}")))
    }

    pub fn code(self) -> u8 {
        match self {
            Frequency::None => 0,
            Frequency::Daily => 1,
            Frequency::EveryWeek => 2,
            Frequency::EveryTwoWeeks => 3,
            Frequency::EveryThreeWeeks => 4,
            Frequency::EveryMonth => 5,
            Frequency::EveryTwoMonths => 6,
            Frequency::EveryThreeMonths => 7,
            Frequency::EveryFourMonths => 8,
            Frequency::EveryFiveMonths => 9,
            Frequency::EverySixMonths => 10,
            Frequency::Yearly => 11,
        }
    }

    pub fn step(self) -> Step {
        match self {
            Frequency::None => Step::None,
            Frequency::Daily => Step::Days(1),
            Frequency::EveryWeek => Step::Days(7),
            Frequency::EveryTwoWeeks => Step::Days(14),
            Frequency::EveryThreeWeeks => Step::Days(21),
            Frequency::EveryMonth => Step::Months(1),
            Frequency::EveryTwoMonths => Step::Months(2),
            Frequency::EveryThreeMonths => Step::Months(3),
            Frequency::EveryFourMonths => Step::Months(4),
            Frequency::EveryFiveMonths => Step::Months(5),
            Frequency::EverySixMonths => Step::Months(6),
            Frequency::Yearly => Step::Years(1),
        }
    }

    pub fn rule(self, end_date: Option<NaiveDate>) -> RecurrenceRule {
        RecurrenceRule {
            step: self.step(),
            end_date,
        }
    }

    /// Default end date offered for a new recurring entry: one step after `today`.
    pub fn suggested_end_date(self, today: NaiveDate) -> Option<NaiveDate> {
        self.step().nth_from(today, 1)
    }
}
