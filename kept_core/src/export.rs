//! CSV export of tracker data.
//!
//! Writes `habits.csv`, `periods.csv` and `symptoms.csv` into a directory,
//! replacing any previous export.

use crate::{Habit, Period, Result, Symptom};
use serde::Serialize;
use std::fs::File;
use std::path::Path;

/// One ledger entry of one habit
#[derive(Debug, Serialize)]
struct HabitRow<'a> {
    habit_id: i64,
    name: &'a str,
    category: &'static str,
    frequency: &'static str,
    date: String,
    completed: bool,
    streak: u32,
}

#[derive(Debug, Serialize)]
struct PeriodRow {
    start_date: String,
    end_date: String,
}

#[derive(Debug, Serialize)]
struct SymptomRow {
    date: String,
    kind: &'static str,
    severity: u8,
}

/// Rows written per file
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub habit_rows: usize,
    pub period_rows: usize,
    pub symptom_rows: usize,
}

fn habit_rows(habits: &[Habit]) -> impl Iterator<Item = HabitRow<'_>> {
    habits.iter().flat_map(|habit| {
        habit.completed.iter().map(move |(date, done)| HabitRow {
            habit_id: habit.id,
            name: &habit.name,
            category: habit.category.as_str(),
            frequency: habit.frequency.as_str(),
            date: date.format("%Y-%m-%d").to_string(),
            completed: *done,
            streak: habit.streak,
        })
    })
}

/// Serialize `rows` to `path` and sync it to disk
///
/// Headers are written explicitly so an empty export still has them.
fn write_csv<T: Serialize>(
    path: &Path,
    headers: &[&str],
    rows: impl Iterator<Item = T>,
) -> Result<usize> {
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(headers)?;

    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::debug!("Wrote {} rows to {:?}", count, path);
    Ok(count)
}

/// Export all collections as CSV files into `dir`
pub fn export_csv(
    dir: &Path,
    habits: &[Habit],
    periods: &[Period],
    symptoms: &[Symptom],
) -> Result<ExportSummary> {
    std::fs::create_dir_all(dir)?;

    let habit_rows = write_csv(
        &dir.join("habits.csv"),
        &[
            "habit_id",
            "name",
            "category",
            "frequency",
            "date",
            "completed",
            "streak",
        ],
        habit_rows(habits),
    )?;

    let period_rows = write_csv(
        &dir.join("periods.csv"),
        &["start_date", "end_date"],
        periods.iter().map(|p| PeriodRow {
            start_date: p.start_date.to_string(),
            end_date: p.end_date.to_string(),
        }),
    )?;

    let symptom_rows = write_csv(
        &dir.join("symptoms.csv"),
        &["date", "kind", "severity"],
        symptoms.iter().map(|s| SymptomRow {
            date: s.date.to_string(),
            kind: s.kind.as_str(),
            severity: s.severity.value(),
        }),
    )?;

    tracing::info!(
        "Exported {} habit rows, {} periods, {} symptoms to {:?}",
        habit_rows,
        period_rows,
        symptom_rows,
        dir
    );

    Ok(ExportSummary {
        habit_rows,
        period_rows,
        symptom_rows,
    })
}
