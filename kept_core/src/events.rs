//! Change notifications for front ends.
//!
//! Observers are registered explicitly on the tracker and are told which
//! collection changed after it has been persisted.

/// Which collection changed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerEvent {
    HabitsChanged,
    PeriodsChanged,
    SymptomsChanged,
    SettingsChanged,
}

/// Observer trait for tracker changes
pub trait Observer {
    fn notify(&mut self, event: &TrackerEvent);
}

/// Observer that writes each event to the debug log
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingObserver;

impl Observer for LoggingObserver {
    fn notify(&mut self, event: &TrackerEvent) {
        tracing::debug!("Tracker event: {:?}", event);
    }
}

impl<F> Observer for F
where
    F: FnMut(&TrackerEvent),
{
    fn notify(&mut self, event: &TrackerEvent) {
        self(event)
    }
}
