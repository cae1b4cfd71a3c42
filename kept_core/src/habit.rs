//! Habit completion engine.
//!
//! All functions are copy-on-write: they take a habit by reference and
//! return the updated record, leaving the input untouched.

use crate::{Frequency, Habit, HabitCategory, HabitSummary, ValidationError};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Window used for daily completion rates
pub const DAILY_WINDOW_DAYS: i64 = 7;

/// Create a new habit
///
/// Rejects names that are empty after trimming. The id is the creation
/// instant in milliseconds.
pub fn new_habit(
    name: &str,
    category: HabitCategory,
    frequency: Frequency,
    now: DateTime<Utc>,
) -> Result<Habit, ValidationError> {
    let name = validate_name(name)?;

    Ok(Habit {
        id: now.timestamp_millis(),
        name,
        category,
        frequency,
        completed: BTreeMap::new(),
        streak: 0,
        created_at: now,
        last_completed_at: None,
    })
}

/// Replace the editable fields of a habit
///
/// The ledger, streak and timestamps are left as they are.
pub fn edit_habit(
    habit: &Habit,
    name: &str,
    category: HabitCategory,
    frequency: Frequency,
) -> Result<Habit, ValidationError> {
    let name = validate_name(name)?;

    Ok(Habit {
        name,
        category,
        frequency,
        ..habit.clone()
    })
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Flip the completion flag for `date` and adjust the streak counter
///
/// Marking a day done adds one to the streak and stamps
/// `last_completed_at`; clearing it subtracts one, never going below zero.
/// Neighbouring days are not inspected.
pub fn toggle_completion(habit: &Habit, date: NaiveDate, now: DateTime<Utc>) -> Habit {
    let mut updated = habit.clone();
    let done = !is_completed_on(habit, date);
    updated.completed.insert(date, done);

    if done {
        updated.streak = updated.streak.saturating_add(1);
        updated.last_completed_at = Some(now);
    } else {
        updated.streak = updated.streak.saturating_sub(1);
    }

    tracing::debug!(
        "Habit {} on {}: completed={}, streak={}",
        habit.id,
        date,
        done,
        updated.streak
    );
    updated
}

/// Zero the streak counter
pub fn reset_streak(habit: &Habit) -> Habit {
    Habit {
        streak: 0,
        ..habit.clone()
    }
}

/// Whether the habit is marked done on `date` (absent counts as not done)
pub fn is_completed_on(habit: &Habit, date: NaiveDate) -> bool {
    habit.completed.get(&date).copied().unwrap_or(false)
}

/// Completion percentage (0-100) for the period containing `reference`
///
/// - Daily: share of the 7 days ending at `reference` that are done
/// - Weekly: 100 if any day on or after the Monday of that week is done
/// - Monthly: 100 if any day in the same month and year is done
pub fn completion_rate(habit: &Habit, reference: NaiveDate) -> u8 {
    match habit.frequency {
        Frequency::Daily => {
            let done = (0..DAILY_WINDOW_DAYS)
                .map(|offset| reference - Duration::days(offset))
                .filter(|day| is_completed_on(habit, *day))
                .count();
            let rate = (100.0 * done as f64 / DAILY_WINDOW_DAYS as f64).round();
            rate as u8
        }
        Frequency::Weekly => {
            let monday = reference
                - Duration::days(i64::from(reference.weekday().num_days_from_monday()));
            let any = habit
                .completed
                .range(monday..)
                .any(|(_, done)| *done);
            if any {
                100
            } else {
                0
            }
        }
        Frequency::Monthly => {
            let any = habit.completed.iter().any(|(day, done)| {
                *done && day.year() == reference.year() && day.month() == reference.month()
            });
            if any {
                100
            } else {
                0
            }
        }
    }
}

/// Aggregate dashboard figures for `today`
pub fn summarize(habits: &[Habit], today: NaiveDate) -> HabitSummary {
    if habits.is_empty() {
        return HabitSummary::default();
    }

    let completed_today = habits
        .iter()
        .filter(|h| is_completed_on(h, today))
        .count();
    let best_streak = habits.iter().map(|h| h.streak).max().unwrap_or(0);
    let rate_total: u32 = habits
        .iter()
        .map(|h| u32::from(completion_rate(h, today)))
        .sum();
    let average_rate = (f64::from(rate_total) / habits.len() as f64).round() as u8;

    HabitSummary {
        total: habits.len(),
        completed_today,
        best_streak,
        average_rate,
    }
}
