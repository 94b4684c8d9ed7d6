//! Observation period planning
//!
//! Change detection compares two back-to-back, equal-length windows ending on
//! the analysis date. The analysis date always comes from the caller so that
//! repeated runs over the same inputs produce the same periods.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::types::Period;

/// Length of one NDVI trend window
pub const TREND_WINDOW_DAYS: u32 = 30;

/// Longest NDVI trend that can be planned (ten years of windows)
pub const MAX_TREND_WINDOWS: u32 = 120;

/// The two windows compared by the deforestation detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePeriods {
    pub previous: Period,
    pub recent: Period,
}

/// One window of a monthly NDVI trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendWindow {
    /// "YYYY-MM" of the window start
    pub month: String,
    pub period: Period,
}

fn days_before(date: NaiveDate, days: u32) -> EngineResult<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(days)))
        .ok_or(EngineError::InvalidPeriod {
            start: date,
            end: date,
            reason: "window extends before the earliest representable date",
        })
}

/// The `days` days ending on (and including) `end`
pub fn trailing_window(end: NaiveDate, days: u32) -> EngineResult<Period> {
    if days == 0 {
        return Err(EngineError::InvalidPeriod {
            start: end,
            end,
            reason: "window length must be at least one day",
        });
    }
    let start = days_before(end, days - 1)?;
    Period::new(start, end)
}

/// Recent window ends on `analysis_date`; previous window is the
/// `days_back` days immediately before it
pub fn plan_change_periods(analysis_date: NaiveDate, days_back: u32) -> EngineResult<ChangePeriods> {
    let recent = trailing_window(analysis_date, days_back)?;
    let previous_end = days_before(recent.start, 1)?;
    let previous = trailing_window(previous_end, days_back)?;
    Ok(ChangePeriods { previous, recent })
}

/// Previous must end the day before recent starts, and both must span the
/// same number of days
pub fn validate_change_periods(previous: &Period, recent: &Period) -> EngineResult<()> {
    previous.validate()?;
    recent.validate()?;

    if previous.end >= recent.start {
        return Err(EngineError::PeriodOrder {
            previous_end: previous.end,
            recent_start: recent.start,
        });
    }

    let gap = (recent.start - previous.end).num_days() - 1;
    if gap != 0 {
        return Err(EngineError::PeriodMismatch(format!(
            "{} day gap between {} and {}",
            gap,
            previous.label(),
            recent.label()
        )));
    }

    if previous.days() != recent.days() {
        return Err(EngineError::PeriodMismatch(format!(
            "previous spans {} days, recent spans {} days",
            previous.days(),
            recent.days()
        )));
    }

    Ok(())
}

/// Consecutive 30-day windows stepping back from the analysis date,
/// newest first
pub fn plan_trend_windows(analysis_date: NaiveDate, months_back: u32) -> EngineResult<Vec<TrendWindow>> {
    if months_back > MAX_TREND_WINDOWS {
        return Err(EngineError::InvalidPeriod {
            start: analysis_date,
            end: analysis_date,
            reason: "trend spans more than 120 windows",
        });
    }

    let mut windows = Vec::with_capacity(months_back as usize);
    for i in 0..months_back {
        let offset = TREND_WINDOW_DAYS.checked_mul(i).ok_or(EngineError::InvalidPeriod {
            start: analysis_date,
            end: analysis_date,
            reason: "trend offset overflows",
        })?;
        let end = days_before(analysis_date, offset)?;
        let period = trailing_window(end, TREND_WINDOW_DAYS)?;
        windows.push(TrendWindow {
            month: period.start.format("%Y-%m").to_string(),
            period,
        });
    }
    Ok(windows)
}
