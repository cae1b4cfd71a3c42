use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use kept_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kept")]
#[command(about = "Habit and cycle tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's dashboard (default)
    Summary,

    /// Manage habits
    #[command(subcommand)]
    Habit(HabitCommand),

    /// Log periods and symptoms, show predictions
    #[command(subcommand)]
    Cycle(CycleCommand),

    /// Export all data as CSV files
    Export {
        /// Output directory (defaults to <data-dir>/export)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum HabitCommand {
    /// Add a new habit
    Add {
        name: String,

        /// health, productivity, learning, fitness, mindfulness, social, finance, other
        #[arg(long, default_value = "other")]
        category: HabitCategory,

        /// daily, weekly, monthly
        #[arg(long, default_value = "daily")]
        frequency: Frequency,
    },

    /// List habits with their streaks and completion rates
    List,

    /// Toggle completion for a day (defaults to today)
    Toggle {
        id: i64,

        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Change a habit's name, category or frequency
    Edit {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<HabitCategory>,

        #[arg(long)]
        frequency: Option<Frequency>,
    },

    /// Reset a habit's streak to zero
    Reset { id: i64 },

    /// Delete a habit
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum CycleCommand {
    /// Record a period starting on the given date
    LogPeriod {
        #[arg(long)]
        start: Option<NaiveDate>,
    },

    /// Record a symptom
    LogSymptom {
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        kind: SymptomKind,

        /// 1 (mild) to 5 (severe)
        #[arg(long)]
        severity: Severity,
    },

    /// Show the predicted next period
    Predict,

    /// Show what is recorded or predicted for a day
    Check { date: NaiveDate },

    /// Show a month calendar (YYYY-MM, defaults to the current month)
    Calendar {
        #[arg(long)]
        month: Option<String>,
    },

    /// Show or change cycle and period lengths
    Settings {
        #[arg(long)]
        cycle_length: Option<u32>,

        #[arg(long)]
        period_length: Option<u32>,
    },
}

fn main() {
    // Initialize logging
    kept_core::logging::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let store = FileStore::new(&data_dir);
    let command = cli.command.unwrap_or(Commands::Summary);

    match cli.today {
        Some(today) => {
            let tracker = Tracker::open(store, FixedClock::on(today), config.cycle);
            dispatch(command, tracker, &data_dir)
        }
        None => {
            let tracker = Tracker::open(store, SystemClock, config.cycle);
            dispatch(command, tracker, &data_dir)
        }
    }
}

fn dispatch<C: Clock>(
    command: Commands,
    mut tracker: Tracker<FileStore, C>,
    data_dir: &std::path::Path,
) -> Result<()> {
    tracker.subscribe(LoggingObserver);

    match command {
        Commands::Summary => cmd_summary(&tracker),
        Commands::Habit(cmd) => cmd_habit(cmd, &mut tracker),
        Commands::Cycle(cmd) => cmd_cycle(cmd, &mut tracker),
        Commands::Export { out } => {
            let out = out.unwrap_or_else(|| data_dir.join("export"));
            let summary = export_csv(
                &out,
                tracker.habits(),
                tracker.periods(),
                tracker.symptoms(),
            )?;
            println!("✓ Exported to {}", out.display());
            println!("  habits.csv:   {} rows", summary.habit_rows);
            println!("  periods.csv:  {} rows", summary.period_rows);
            println!("  symptoms.csv: {} rows", summary.symptom_rows);
            Ok(())
        }
    }
}

fn cmd_summary<C: Clock>(tracker: &Tracker<FileStore, C>) -> Result<()> {
    let summary = tracker.habit_summary();
    println!("Today: {}", tracker.today());
    println!();
    println!(
        "  Habits done today: {}/{}",
        summary.completed_today, summary.total
    );
    println!("  Best streak:       {}", summary.best_streak);
    println!("  Average rate:      {}%", summary.average_rate);

    match tracker.cycle_status() {
        Some(status) => print_status(&status),
        None => println!("  Next period:       no prediction available"),
    }
    Ok(())
}

fn cmd_habit<C: Clock>(cmd: HabitCommand, tracker: &mut Tracker<FileStore, C>) -> Result<()> {
    match cmd {
        HabitCommand::Add {
            name,
            category,
            frequency,
        } => {
            let habit = tracker.add_habit(&name, category, frequency)?;
            println!("✓ Added habit {} ({})", habit.name, habit.id);
        }
        HabitCommand::List => {
            if tracker.habits().is_empty() {
                println!("No habits yet. Add one with `kept habit add <name>`.");
                return Ok(());
            }
            let today = tracker.today();
            for habit in tracker.habits() {
                let mark = if habit::is_completed_on(habit, today) {
                    "x"
                } else {
                    " "
                };
                println!(
                    "[{}] {}  {}  ({}, {})  streak {}  {}%",
                    mark,
                    habit.id,
                    habit.name,
                    habit.category,
                    habit.frequency,
                    habit.streak,
                    habit::completion_rate(habit, today)
                );
            }
        }
        HabitCommand::Toggle { id, date } => {
            let date = date.unwrap_or_else(|| tracker.today());
            let habit = tracker.toggle_habit(id, Some(date))?;
            let state = if habit::is_completed_on(&habit, date) {
                "done"
            } else {
                "not done"
            };
            println!("✓ {} marked {} for {}", habit.name, state, date);
            println!("  Streak: {}", habit.streak);
        }
        HabitCommand::Edit {
            id,
            name,
            category,
            frequency,
        } => {
            let current = tracker.habit(id)?.clone();
            let habit = tracker.edit_habit(
                id,
                name.as_deref().unwrap_or(&current.name),
                category.unwrap_or(current.category),
                frequency.unwrap_or(current.frequency),
            )?;
            println!(
                "✓ Updated habit {}: {} ({}, {})",
                habit.id, habit.name, habit.category, habit.frequency
            );
        }
        HabitCommand::Reset { id } => {
            let habit = tracker.reset_streak(id)?;
            println!("✓ Streak reset for {}", habit.name);
        }
        HabitCommand::Delete { id } => {
            let habit = tracker.delete_habit(id)?;
            println!("✓ Deleted habit {}", habit.name);
        }
    }
    Ok(())
}

fn cmd_cycle<C: Clock>(cmd: CycleCommand, tracker: &mut Tracker<FileStore, C>) -> Result<()> {
    match cmd {
        CycleCommand::LogPeriod { start } => {
            let period = tracker.log_period(start)?;
            println!(
                "✓ Period logged: {} to {}",
                period.start_date, period.end_date
            );
            println!("  Logging streak: {}", tracker.log_streak().count);
        }
        CycleCommand::LogSymptom {
            date,
            kind,
            severity,
        } => {
            let symptom = tracker.log_symptom(date, kind, severity)?;
            println!(
                "✓ Symptom logged: {} ({}/5) on {}",
                symptom.kind,
                symptom.severity.value(),
                symptom.date
            );
        }
        CycleCommand::Predict => match tracker.cycle_status() {
            Some(status) => print_status(&status),
            None => println!("No prediction available. Log a period first."),
        },
        CycleCommand::Check { date } => {
            let day = tracker.check_date(date);
            println!("{}", date);
            println!("  In recorded period:  {}", yes_no(day.in_period));
            println!("  In predicted period: {}", yes_no(day.predicted));
            println!("  Symptom logged:      {}", yes_no(day.has_symptom));
        }
        CycleCommand::Calendar { month } => {
            let (year, month) = match month {
                Some(text) => parse_month(&text)?,
                None => {
                    let today = tracker.today();
                    (chrono::Datelike::year(&today), chrono::Datelike::month(&today))
                }
            };
            let days = tracker.calendar(year, month)?;
            println!("{}-{:02}  (P = period, p = predicted, * = symptom)", year, month);
            for day in days {
                let mut marks = String::new();
                if day.in_period {
                    marks.push('P');
                }
                if day.predicted {
                    marks.push('p');
                }
                if day.has_symptom {
                    marks.push('*');
                }
                println!("  {}  {}", day.date, marks);
            }
        }
        CycleCommand::Settings {
            cycle_length,
            period_length,
        } => {
            let current = tracker.settings();
            if cycle_length.is_some() || period_length.is_some() {
                tracker.update_settings(CycleSettings {
                    cycle_length: cycle_length.unwrap_or(current.cycle_length),
                    period_length: period_length.unwrap_or(current.period_length),
                })?;
                println!("✓ Settings saved");
            }
            let settings = tracker.settings();
            println!("  Average cycle length:  {} days", settings.cycle_length);
            println!("  Average period length: {} days", settings.period_length);
        }
    }
    Ok(())
}

fn print_status(status: &CycleStatus) {
    println!(
        "  Next period:       {} to {}",
        status.prediction.start_date, status.prediction.end_date
    );
    println!("  Cycle day:         {}", status.cycle_day);
    if status.days_until_next >= 0 {
        println!("  Days until next:   {}", status.days_until_next);
    } else {
        println!("  Overdue by:        {} days", -status.days_until_next);
    }
}

fn parse_month(text: &str) -> Result<(i32, u32)> {
    let invalid = || Error::from(ValidationError::InvalidMonth(text.to_string()));
    let (year, month) = text.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    Ok((year, month))
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
