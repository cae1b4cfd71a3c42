//! Cycle prediction engine.
//!
//! Predicts the next period from the latest recorded one and the configured
//! lengths, and answers per-day questions for calendar rendering.

use crate::{
    CalendarDay, CyclePrediction, CycleSettings, CycleStatus, LogStreak, Period, Severity,
    Symptom, SymptomKind, ValidationError,
};
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc};

/// Predict the next period window
///
/// Returns `None` when nothing has been recorded. The prediction is the
/// latest period's start plus `cycle_length` days, lasting `period_length`
/// days. Historical cycle lengths are not averaged. Also `None` when the
/// window would fall outside the representable date range.
pub fn predict_next_period(periods: &[Period], settings: &CycleSettings) -> Option<CyclePrediction> {
    let latest = periods.iter().max_by_key(|p| p.start_date)?;
    let start_date = latest
        .start_date
        .checked_add_days(Days::new(u64::from(settings.cycle_length)))?;
    let end_date = start_date
        .checked_add_days(Days::new(u64::from(settings.period_length.saturating_sub(1))))?;

    Some(CyclePrediction {
        start_date,
        end_date,
    })
}

/// Whether `date` falls inside any recorded period
pub fn is_date_in_period(date: NaiveDate, periods: &[Period]) -> bool {
    periods.iter().any(|p| p.contains(date))
}

/// Whether `date` falls inside the predicted window, if there is one
pub fn is_date_in_predicted_period(date: NaiveDate, prediction: Option<&CyclePrediction>) -> bool {
    prediction.is_some_and(|p| p.contains(date))
}

/// Whether any symptom was logged on `date`
pub fn has_symptom_on_date(date: NaiveDate, symptoms: &[Symptom]) -> bool {
    symptoms.iter().any(|s| s.date == date)
}

/// Append a period starting at `start_date`
///
/// Rejects a missing start date, or one so late that the end date cannot
/// be represented.
pub fn record_period(
    periods: &[Period],
    start_date: Option<NaiveDate>,
    period_length: u32,
) -> Result<Vec<Period>, ValidationError> {
    let start_date = start_date.ok_or(ValidationError::MissingDate)?;

    let mut updated = periods.to_vec();
    updated.push(Period::new(start_date, period_length)?);
    Ok(updated)
}

/// Append a symptom; duplicates for the same day and kind are kept
pub fn record_symptom(
    symptoms: &[Symptom],
    date: Option<NaiveDate>,
    kind: SymptomKind,
    severity: Severity,
) -> Result<Vec<Symptom>, ValidationError> {
    let date = date.ok_or(ValidationError::MissingDate)?;

    let mut updated = symptoms.to_vec();
    updated.push(Symptom {
        date,
        kind,
        severity,
    });
    Ok(updated)
}

/// Elapsed and remaining days around the current cycle
pub fn cycle_status(
    periods: &[Period],
    settings: &CycleSettings,
    today: NaiveDate,
) -> Option<CycleStatus> {
    let latest = periods.iter().max_by_key(|p| p.start_date)?;
    let prediction = predict_next_period(periods, settings)?;

    Some(CycleStatus {
        cycle_day: (today - latest.start_date).num_days() + 1,
        days_until_next: (prediction.start_date - today).num_days(),
        prediction,
    })
}

/// Per-day flags for every day of the given month
pub fn month_calendar(
    year: i32,
    month: u32,
    periods: &[Period],
    prediction: Option<&CyclePrediction>,
    symptoms: &[Symptom],
) -> Result<Vec<CalendarDay>, ValidationError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ValidationError::InvalidMonth(format!("{year}-{month:02}")))?;

    let days = first
        .iter_days()
        .take_while(|d| d.month0() == first.month0())
        .map(|date| CalendarDay {
            date,
            in_period: is_date_in_period(date, periods),
            predicted: is_date_in_predicted_period(date, prediction),
            has_symptom: has_symptom_on_date(date, symptoms),
        })
        .collect();

    Ok(days)
}

impl LogStreak {
    /// Register a period log at `now`
    ///
    /// Continues the streak when the previous log is at most one day old,
    /// otherwise starts over at 1.
    pub fn record(&self, now: DateTime<Utc>) -> LogStreak {
        let continues = self
            .last_logged_at
            .is_some_and(|last| now - last <= Duration::days(1));

        let count = if continues {
            self.count.saturating_add(1)
        } else {
            1
        };

        LogStreak {
            count,
            last_logged_at: Some(now),
        }
    }
}
