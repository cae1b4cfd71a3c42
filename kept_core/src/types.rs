//! Core domain types for the Kept tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Habits and their completion ledger
//! - Menstrual periods and symptoms
//! - Cycle settings and derived predictions
//! - The period logging streak

use crate::ValidationError;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Habit Types
// ============================================================================

/// Category tag for a habit
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HabitCategory {
    Health,
    Productivity,
    Learning,
    Fitness,
    Mindfulness,
    Social,
    Finance,
    Other,
}

impl HabitCategory {
    pub const ALL: [HabitCategory; 8] = [
        Self::Health,
        Self::Productivity,
        Self::Learning,
        Self::Fitness,
        Self::Mindfulness,
        Self::Social,
        Self::Finance,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Productivity => "productivity",
            Self::Learning => "learning",
            Self::Fitness => "fitness",
            Self::Mindfulness => "mindfulness",
            Self::Social => "social",
            Self::Finance => "finance",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for HabitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownTag {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// How often a habit is expected to be completed
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ValidationError::UnknownTag {
                kind: "frequency",
                value: s.to_string(),
            }),
        }
    }
}

/// A tracked habit with its completion ledger
///
/// `streak` is a running counter adjusted on every toggle. It is not
/// recomputed from `completed`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub category: HabitCategory,
    pub frequency: Frequency,
    #[serde(default)]
    pub completed: BTreeMap<NaiveDate, bool>,
    #[serde(default)]
    pub streak: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_completed_at: Option<DateTime<Utc>>,
}

/// Dashboard figures across all habits
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HabitSummary {
    pub total: usize,
    pub completed_today: usize,
    pub best_streak: u32,
    pub average_rate: u8,
}

// ============================================================================
// Cycle Types
// ============================================================================

/// A recorded menstrual period (both ends inclusive)
///
/// Deserialization rejects records whose end precedes their start.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Deserialize)]
struct RawPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl TryFrom<RawPeriod> for Period {
    type Error = ValidationError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        if raw.end_date < raw.start_date {
            return Err(ValidationError::InvertedPeriod {
                start: raw.start_date,
                end: raw.end_date,
            });
        }
        Ok(Self {
            start_date: raw.start_date,
            end_date: raw.end_date,
        })
    }
}

impl Period {
    /// Build a period spanning `length` days from `start_date`.
    ///
    /// A zero length is treated as a single day so `end_date >= start_date`.
    pub fn new(start_date: NaiveDate, length: u32) -> Result<Self, ValidationError> {
        let span = Days::new(u64::from(length.saturating_sub(1)));
        let end_date = start_date
            .checked_add_days(span)
            .ok_or(ValidationError::DateOutOfRange)?;
        Ok(Self {
            start_date,
            end_date,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Kind of symptom logged alongside the cycle
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SymptomKind {
    Cramps,
    Headache,
    Bloating,
    Fatigue,
    MoodSwings,
    Acne,
    TenderBreasts,
    BackPain,
    Nausea,
    Other,
}

impl SymptomKind {
    pub const ALL: [SymptomKind; 10] = [
        Self::Cramps,
        Self::Headache,
        Self::Bloating,
        Self::Fatigue,
        Self::MoodSwings,
        Self::Acne,
        Self::TenderBreasts,
        Self::BackPain,
        Self::Nausea,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cramps => "cramps",
            Self::Headache => "headache",
            Self::Bloating => "bloating",
            Self::Fatigue => "fatigue",
            Self::MoodSwings => "mood_swings",
            Self::Acne => "acne",
            Self::TenderBreasts => "tender_breasts",
            Self::BackPain => "back_pain",
            Self::Nausea => "nausea",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SymptomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymptomKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownTag {
                kind: "symptom",
                value: s.to_string(),
            })
    }
}

/// Symptom severity on a 1-5 scale
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

impl Severity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Severity {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::SeverityOutOfRange(value))
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity.0
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s.trim().parse().map_err(|_| ValidationError::UnknownTag {
            kind: "severity",
            value: s.to_string(),
        })?;
        Self::try_from(value)
    }
}

/// A logged symptom. Identity is positional only.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Symptom {
    pub date: NaiveDate,
    pub kind: SymptomKind,
    pub severity: Severity,
}

/// Configured average lengths used for prediction
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleSettings {
    #[serde(default = "default_cycle_length")]
    pub cycle_length: u32,
    #[serde(default = "default_period_length")]
    pub period_length: u32,
}

fn default_cycle_length() -> u32 {
    28
}

fn default_period_length() -> u32 {
    5
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            cycle_length: default_cycle_length(),
            period_length: default_period_length(),
        }
    }
}

impl CycleSettings {
    pub const MAX_CYCLE_LENGTH: u32 = 365;

    /// Cycle length must be 1-365 days and the period must fit inside it
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cycle_length == 0 || self.cycle_length > Self::MAX_CYCLE_LENGTH {
            return Err(ValidationError::InvalidCycleLength);
        }
        if self.period_length == 0 || self.period_length > self.cycle_length {
            return Err(ValidationError::InvalidPeriodLength);
        }
        Ok(())
    }
}

/// Predicted window of the next period. Derived, never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CyclePrediction {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CyclePrediction {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Where today sits relative to the latest period and the prediction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleStatus {
    /// 1-based day of the current cycle
    pub cycle_day: i64,
    /// Days until the predicted start; negative when overdue
    pub days_until_next: i64,
    pub prediction: CyclePrediction,
}

/// One cell of a month calendar view
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_period: bool,
    pub predicted: bool,
    pub has_symptom: bool,
}

/// Counter of consecutive period logs, separate from habit streaks
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LogStreak {
    pub count: u32,
    pub last_logged_at: Option<DateTime<Utc>>,
}
