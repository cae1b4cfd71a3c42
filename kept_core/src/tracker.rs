//! The calling context around the engines.
//!
//! A [`Tracker`] owns the habit, period and symptom collections, mirrors each
//! one to its store key whenever it changes and notifies observers. Updates
//! are copy-on-write: the engines build a new collection, which replaces the
//! old one only after it has been saved.

use crate::clock::Clock;
use crate::events::{Observer, TrackerEvent};
use crate::store::{
    self, KeyValueStore, CYCLE_SETTINGS_KEY, HABITS_KEY, LOG_STREAK_KEY, PERIODS_KEY,
    SYMPTOMS_KEY,
};
use crate::{
    cycle, habit, CalendarDay, CyclePrediction, CycleSettings, CycleStatus, Error, Frequency,
    Habit, HabitCategory, HabitSummary, LogStreak, Period, Result, Severity, Symptom,
    SymptomKind,
};
use chrono::NaiveDate;

pub struct Tracker<S: KeyValueStore, C: Clock> {
    store: S,
    clock: C,
    habits: Vec<Habit>,
    periods: Vec<Period>,
    symptoms: Vec<Symptom>,
    settings: CycleSettings,
    log_streak: LogStreak,
    observers: Vec<Box<dyn Observer>>,
}

impl<S: KeyValueStore, C: Clock> Tracker<S, C> {
    /// Load every collection from `store`
    ///
    /// Stored cycle settings take precedence over `default_settings`.
    pub fn open(store: S, clock: C, default_settings: CycleSettings) -> Self {
        let habits: Vec<Habit> = store::load_or_default(&store, HABITS_KEY);
        let periods: Vec<Period> = store::load_or_default(&store, PERIODS_KEY);
        let symptoms: Vec<Symptom> = store::load_or_default(&store, SYMPTOMS_KEY);
        let log_streak: LogStreak = store::load_or_default(&store, LOG_STREAK_KEY);

        let settings = match store::load_optional::<CycleSettings, _>(&store, CYCLE_SETTINGS_KEY) {
            Some(stored) if stored.validate().is_ok() => stored,
            Some(stored) => {
                tracing::warn!("Ignoring invalid stored cycle settings {:?}", stored);
                default_settings
            }
            None => default_settings,
        };

        tracing::info!(
            "Opened tracker: {} habits, {} periods, {} symptoms",
            habits.len(),
            periods.len(),
            symptoms.len()
        );

        Self {
            store,
            clock,
            habits,
            periods,
            symptoms,
            settings,
            log_streak,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn publish(&mut self, event: TrackerEvent) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn settings(&self) -> CycleSettings {
        self.settings
    }

    pub fn log_streak(&self) -> &LogStreak {
        &self.log_streak
    }

    pub fn habit(&self, id: i64) -> Result<&Habit> {
        self.habits
            .iter()
            .find(|h| h.id == id)
            .ok_or(Error::HabitNotFound(id))
    }

    // ------------------------------------------------------------------
    // Habits
    // ------------------------------------------------------------------

    fn commit_habits(&mut self, habits: Vec<Habit>) -> Result<()> {
        store::save(&mut self.store, HABITS_KEY, &habits)?;
        self.habits = habits;
        self.publish(TrackerEvent::HabitsChanged);
        Ok(())
    }

    /// Replace one habit with the result of `f`
    fn update_habit<F>(&mut self, id: i64, f: F) -> Result<Habit>
    where
        F: FnOnce(&Habit) -> Result<Habit>,
    {
        let index = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or(Error::HabitNotFound(id))?;

        let updated = f(&self.habits[index])?;
        let mut habits = self.habits.clone();
        habits[index] = updated.clone();
        self.commit_habits(habits)?;
        Ok(updated)
    }

    pub fn add_habit(
        &mut self,
        name: &str,
        category: HabitCategory,
        frequency: Frequency,
    ) -> Result<Habit> {
        let mut created = habit::new_habit(name, category, frequency, self.clock.now())?;

        // Two habits created within the same millisecond would share an id
        if self.habits.iter().any(|h| h.id == created.id) {
            let max_id = self.habits.iter().map(|h| h.id).max().unwrap_or(created.id);
            created.id = max_id + 1;
        }

        let mut habits = self.habits.clone();
        habits.push(created.clone());
        self.commit_habits(habits)?;

        tracing::info!("Added habit {} ({})", created.id, created.name);
        Ok(created)
    }

    pub fn edit_habit(
        &mut self,
        id: i64,
        name: &str,
        category: HabitCategory,
        frequency: Frequency,
    ) -> Result<Habit> {
        self.update_habit(id, |h| {
            Ok(habit::edit_habit(h, name, category, frequency)?)
        })
    }

    /// Toggle completion for `date`, defaulting to today
    pub fn toggle_habit(&mut self, id: i64, date: Option<NaiveDate>) -> Result<Habit> {
        let date = date.unwrap_or_else(|| self.clock.today());
        let now = self.clock.now();
        self.update_habit(id, |h| Ok(habit::toggle_completion(h, date, now)))
    }

    pub fn reset_streak(&mut self, id: i64) -> Result<Habit> {
        self.update_habit(id, |h| Ok(habit::reset_streak(h)))
    }

    pub fn delete_habit(&mut self, id: i64) -> Result<Habit> {
        let removed = self.habit(id)?.clone();
        let habits = self.habits.iter().filter(|h| h.id != id).cloned().collect();
        self.commit_habits(habits)?;

        tracing::info!("Deleted habit {} ({})", removed.id, removed.name);
        Ok(removed)
    }

    pub fn completion_rate(&self, id: i64) -> Result<u8> {
        Ok(habit::completion_rate(self.habit(id)?, self.clock.today()))
    }

    pub fn habit_summary(&self) -> HabitSummary {
        habit::summarize(&self.habits, self.clock.today())
    }

    // ------------------------------------------------------------------
    // Cycle
    // ------------------------------------------------------------------

    /// Record a period and bump the logging streak
    pub fn log_period(&mut self, start_date: Option<NaiveDate>) -> Result<Period> {
        let periods = cycle::record_period(&self.periods, start_date, self.settings.period_length)?;
        store::save(&mut self.store, PERIODS_KEY, &periods)?;
        self.periods = periods;
        self.publish(TrackerEvent::PeriodsChanged);

        let streak = self.log_streak.record(self.clock.now());
        store::save(&mut self.store, LOG_STREAK_KEY, &streak)?;
        self.log_streak = streak;

        let recorded = self
            .periods
            .last()
            .cloned()
            .ok_or_else(|| Error::Other("period list empty after recording".into()))?;
        tracing::info!(
            "Recorded period {} to {} (log streak {})",
            recorded.start_date,
            recorded.end_date,
            self.log_streak.count
        );
        Ok(recorded)
    }

    pub fn log_symptom(
        &mut self,
        date: Option<NaiveDate>,
        kind: SymptomKind,
        severity: Severity,
    ) -> Result<Symptom> {
        let symptoms = cycle::record_symptom(&self.symptoms, date, kind, severity)?;
        store::save(&mut self.store, SYMPTOMS_KEY, &symptoms)?;
        self.symptoms = symptoms;
        self.publish(TrackerEvent::SymptomsChanged);

        self.symptoms
            .last()
            .cloned()
            .ok_or_else(|| Error::Other("symptom list empty after recording".into()))
    }

    pub fn prediction(&self) -> Option<CyclePrediction> {
        cycle::predict_next_period(&self.periods, &self.settings)
    }

    pub fn cycle_status(&self) -> Option<CycleStatus> {
        cycle::cycle_status(&self.periods, &self.settings, self.clock.today())
    }

    /// Flags for a single day
    pub fn check_date(&self, date: NaiveDate) -> CalendarDay {
        let prediction = self.prediction();
        CalendarDay {
            date,
            in_period: cycle::is_date_in_period(date, &self.periods),
            predicted: cycle::is_date_in_predicted_period(date, prediction.as_ref()),
            has_symptom: cycle::has_symptom_on_date(date, &self.symptoms),
        }
    }

    pub fn calendar(&self, year: i32, month: u32) -> Result<Vec<CalendarDay>> {
        let prediction = self.prediction();
        Ok(cycle::month_calendar(
            year,
            month,
            &self.periods,
            prediction.as_ref(),
            &self.symptoms,
        )?)
    }

    pub fn update_settings(&mut self, settings: CycleSettings) -> Result<()> {
        settings.validate()?;
        store::save(&mut self.store, CYCLE_SETTINGS_KEY, &settings)?;
        self.settings = settings;
        self.publish(TrackerEvent::SettingsChanged);

        tracing::info!(
            "Cycle settings: cycle {} days, period {} days",
            settings.cycle_length,
            settings.period_length
        );
        Ok(())
    }
}
