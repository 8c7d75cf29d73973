use serde::{Deserialize, Serialize};

use crate::ledger::YearMonth;

/// Formats year-month keys into human labels for trend series.
pub trait MonthLabeler: Send + Sync {
    fn label(&self, year_month: YearMonth) -> String;
}

/// `2024-03`
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoMonthLabel;

impl MonthLabeler for IsoMonthLabel {
    fn label(&self, year_month: YearMonth) -> String {
        year_month.to_string()
    }
}

/// `2024年3月`
#[derive(Debug, Clone, Copy, Default)]
pub struct KanjiMonthLabel;

impl MonthLabeler for KanjiMonthLabel {
    fn label(&self, year_month: YearMonth) -> String {
        format!("{}年{}月", year_month.year(), year_month.month())
    }
}

/// Configurable choice between the bundled labelers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MonthLabelStyle {
    Iso,
    #[default]
    Kanji,
}

impl MonthLabeler for MonthLabelStyle {
    fn label(&self, year_month: YearMonth) -> String {
        match self {
            MonthLabelStyle::Iso => IsoMonthLabel.label(year_month),
            MonthLabelStyle::Kanji => KanjiMonthLabel.label(year_month),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_labels() {
        let key = YearMonth::new(2025, 10).unwrap();
        assert_eq!(IsoMonthLabel.label(key), "2025-10");
        assert_eq!(KanjiMonthLabel.label(key), "2025年10月");
        assert_eq!(MonthLabelStyle::Iso.label(key), "2025-10");
        assert_eq!(MonthLabelStyle::default().label(key), "2025年10月");
    }
}
