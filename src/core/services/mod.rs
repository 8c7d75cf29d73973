pub mod calendar_service;
pub mod monthly_service;
pub mod projection_service;
pub mod trend_service;
pub mod view_service;

pub use calendar_service::{CalendarCell, CalendarGrid, CalendarService, Week, DAYS_PER_WEEK};
pub use monthly_service::{
    CategoryTotal, DailySummary, MonthlyAggregation, MonthlyReport, MonthlyReportSet,
    MonthlyService,
};
pub use projection_service::ProjectionService;
pub use trend_service::{CategoryTrend, TrendPoint, TrendSelection, TrendService};
pub use view_service::{LedgerViewService, RecurringDefinition};

use crate::errors::EngineError;

pub type ServiceResult<T> = Result<T, EngineError>;
