//! Conversion of stored habit records into validated engine values.
//!
//! Records arrive in the shape the storage backend persists them:
//!
//! ```json
//! { "id": "h1", "name": "Run", "type": "weekly",
//!   "frequency": [{ "day": 1, "start_time": "07:00", "end_time": "07:30" }],
//!   "start_date": "2024-01-01", "end_date": null }
//! ```
//!
//! Daily records carry a single `{start_time, end_time}` object as their
//! frequency. The camelCase spellings (`startDate`, `endDate`, `startTime`,
//! `endTime`, `weekday`, `dayOfMonth`) are accepted as well. Every malformed value is rejected here with the offending
//! field named; nothing is coerced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result, ValidationError};
use crate::recurrence::{
    validate_time_window, weekday_number, Habit, MonthlyEntry, RecurrenceKind, RecurrenceRule,
    TimeOfDay, TimeWindow, WeeklyEntry,
};

/// A habit as persisted by the storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RecurrenceKind,
    pub frequency: FrequencyRecord,
    #[serde(alias = "startDate")]
    pub start_date: NaiveDate,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<NaiveDate>,
}

/// Frequency payload; its shape depends on the record's `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrequencyRecord {
    /// Daily habits: one window applying every day
    Window(WindowRecord),
    /// Weekly (day = weekday 1..=7) and monthly (day = 1..=31) habits
    Entries(Vec<EntryRecord>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    #[serde(alias = "startTime")]
    pub start_time: String,
    #[serde(alias = "endTime")]
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    #[serde(alias = "weekday", alias = "dayOfMonth")]
    pub day: i64,
    #[serde(alias = "startTime")]
    pub start_time: String,
    #[serde(alias = "endTime")]
    pub end_time: String,
}

/// Outcome of validating one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub id: String,
    pub result: Result<Habit, ValidationError>,
}

impl HabitRecord {
    /// Validate and convert into a [`Habit`].
    pub fn into_habit(self) -> Result<Habit, ValidationError> {
        let rule = match (self.kind, self.frequency) {
            (RecurrenceKind::Daily, FrequencyRecord::Window(window)) => {
                RecurrenceRule::daily(parse_window(&window.start_time, &window.end_time, "frequency")?)
            }
            (RecurrenceKind::Weekly, FrequencyRecord::Entries(entries)) => {
                let entries = entries
                    .iter()
                    .enumerate()
                    .map(|(idx, entry)| {
                        let field = format!("frequency[{idx}]");
                        let window = parse_window(&entry.start_time, &entry.end_time, &field)?;
                        let day = day_number(entry.day, &field)?;
                        WeeklyEntry::from_number(day, window)
                            .map_err(|err| relabel(err, format!("{field}.day")))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                RecurrenceRule::weekly(entries)?
            }
            (RecurrenceKind::Monthly, FrequencyRecord::Entries(entries)) => {
                let entries = entries
                    .iter()
                    .enumerate()
                    .map(|(idx, entry)| {
                        let field = format!("frequency[{idx}]");
                        let window = parse_window(&entry.start_time, &entry.end_time, &field)?;
                        let day = day_number(entry.day, &field)?;
                        MonthlyEntry::new(day, window)
                            .map_err(|err| relabel(err, format!("{field}.day")))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                RecurrenceRule::monthly(entries)?
            }
            (kind, _) => {
                let expected = match kind {
                    RecurrenceKind::Daily => "an object with start_time and end_time",
                    RecurrenceKind::Weekly | RecurrenceKind::Monthly => {
                        "a list of {day, start_time, end_time} entries"
                    }
                };
                return Err(ValidationError::recurrence_value(
                    "frequency",
                    format!("{kind:?} habits need {expected}"),
                ));
            }
        };

        Habit::new(self.id, self.name, rule, self.start_date, self.end_date)
    }
}

impl TryFrom<HabitRecord> for Habit {
    type Error = ValidationError;

    fn try_from(record: HabitRecord) -> Result<Self, Self::Error> {
        record.into_habit()
    }
}

impl From<&Habit> for HabitRecord {
    fn from(habit: &Habit) -> Self {
        let window_record = |window: TimeWindow| WindowRecord {
            start_time: window.start().to_string(),
            end_time: window.end().to_string(),
        };
        let entry_record = |day: u32, window: TimeWindow| EntryRecord {
            day: i64::from(day),
            start_time: window.start().to_string(),
            end_time: window.end().to_string(),
        };
        let frequency = match habit.rule() {
            RecurrenceRule::Daily { window } => FrequencyRecord::Window(window_record(*window)),
            RecurrenceRule::Weekly { entries } => FrequencyRecord::Entries(
                entries
                    .iter()
                    .map(|e| entry_record(weekday_number(e.weekday()), e.window()))
                    .collect(),
            ),
            RecurrenceRule::Monthly { entries } => FrequencyRecord::Entries(
                entries.iter().map(|e| entry_record(e.day(), e.window())).collect(),
            ),
        };
        HabitRecord {
            id: habit.id.clone(),
            name: habit.name.clone(),
            kind: habit.rule().kind(),
            frequency,
            start_date: habit.active_from(),
            end_date: habit.active_until(),
        }
    }
}

/// Parse a JSON array of habit records, failing on the first invalid record.
pub fn load_habits(json: &str) -> Result<Vec<Habit>> {
    let records: Vec<HabitRecord> = serde_json::from_str(json)?;
    let habits = records
        .into_iter()
        .map(|record| {
            let id = record.id.clone();
            record
                .into_habit()
                .map_err(|source| CoreError::InvalidRecord { id, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = habits.len(), "loaded habit records");
    Ok(habits)
}

/// Validate every record, reporting each outcome instead of stopping early.
pub fn validate_records(records: Vec<HabitRecord>) -> Vec<RecordOutcome> {
    records
        .into_iter()
        .map(|record| RecordOutcome {
            id: record.id.clone(),
            result: record.into_habit(),
        })
        .collect()
}

/// Look up a habit by id.
pub fn find_habit<'a>(habits: &'a [Habit], id: &str) -> Result<&'a Habit> {
    habits
        .iter()
        .find(|habit| habit.id == id)
        .ok_or_else(|| CoreError::NotFound {
            kind: "habit",
            id: id.to_string(),
        })
}

fn parse_window(start: &str, end: &str, field: &str) -> Result<TimeWindow, ValidationError> {
    let start = TimeOfDay::parse(start).map_err(|err| relabel(err, format!("{field}.start_time")))?;
    let end = TimeOfDay::parse(end).map_err(|err| relabel(err, format!("{field}.end_time")))?;
    validate_time_window(start, end)
}

fn day_number(day: i64, field: &str) -> Result<u32, ValidationError> {
    u32::try_from(day).map_err(|_| {
        ValidationError::recurrence_value(format!("{field}.day"), format!("{day} is not a valid day"))
    })
}

fn relabel(err: ValidationError, field: String) -> ValidationError {
    match err {
        ValidationError::InvalidRecurrenceValue { message, .. } => {
            ValidationError::InvalidRecurrenceValue { field, message }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(json: &str) -> HabitRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn converts_weekly_record() {
        let record = parse(
            r#"{"id":"h1","name":"Run","type":"weekly",
                "frequency":[{"day":1,"start_time":"07:00","end_time":"07:30"},
                             {"day":7,"start_time":"08:00:00","end_time":"09:00:00"}],
                "start_date":"2024-01-01","end_date":null}"#,
        );
        let habit = record.into_habit().unwrap();
        let RecurrenceRule::Weekly { entries } = habit.rule() else {
            panic!("expected weekly rule");
        };
        assert_eq!(entries[0].weekday(), Weekday::Mon);
        assert_eq!(entries[1].weekday(), Weekday::Sun);
        assert_eq!(entries[1].window().start().to_string(), "08:00");
        assert_eq!(habit.active_until(), None);
    }

    #[test]
    fn accepts_camel_case_keys() {
        let habits = load_habits(
            r#"[
                {"id":"h","type":"daily","frequency":{"startTime":"06:00","endTime":"06:30"},
                 "startDate":"2024-01-01","endDate":null},
                {"id":"w","type":"weekly",
                 "frequency":[{"weekday":3,"startTime":"18:00","endTime":"19:00"}],
                 "startDate":"2024-01-01","endDate":"2024-01-31"},
                {"id":"m","type":"monthly",
                 "frequency":[{"dayOfMonth":15,"startTime":"12:00","endTime":"12:30"}],
                 "startDate":"2024-01-01"}
            ]"#,
        )
        .unwrap();
        assert_eq!(habits.len(), 3);
        assert!(habits[0].is_scheduled_on(date(2024, 1, 1)));
        assert!(habits[1].is_scheduled_on(date(2024, 1, 3)));
        assert_eq!(habits[1].active_until(), Some(date(2024, 1, 31)));
        assert_eq!(habits[2].time_window_on(date(2024, 2, 15)).unwrap().to_string(), "12:00-12:30");
    }

    #[test]
    fn daily_record_without_end_date_field() {
        let record = parse(
            r#"{"id":"d","type":"daily","frequency":{"start_time":"06:00","end_time":"06:20"},
                "start_date":"2024-03-01"}"#,
        );
        let habit = Habit::try_from(record).unwrap();
        assert!(habit.is_scheduled_on(date(2024, 3, 1)));
        assert_eq!(habit.name, "");
    }

    #[test]
    fn reports_field_of_bad_values() {
        let record = parse(
            r#"{"id":"m","type":"monthly",
                "frequency":[{"day":15,"start_time":"07:00","end_time":"08:00"},
                             {"day":32,"start_time":"07:00","end_time":"08:00"}],
                "start_date":"2024-01-01"}"#,
        );
        assert_eq!(
            record.into_habit().unwrap_err(),
            ValidationError::InvalidRecurrenceValue {
                field: "frequency[1].day".into(),
                message: "32 is outside 1..=31".into(),
            }
        );

        let record = parse(
            r#"{"id":"w","type":"weekly",
                "frequency":[{"day":2,"start_time":"7am","end_time":"08:00"}],
                "start_date":"2024-01-01"}"#,
        );
        let err = record.into_habit().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidRecurrenceValue { ref field, .. } if field == "frequency[0].start_time"
        ));

        let record = parse(
            r#"{"id":"w","type":"weekly",
                "frequency":[{"day":0,"start_time":"07:00","end_time":"08:00"}],
                "start_date":"2024-01-01"}"#,
        );
        assert!(matches!(
            record.into_habit().unwrap_err(),
            ValidationError::InvalidRecurrenceValue { ref field, .. } if field == "frequency[0].day"
        ));
    }

    #[test]
    fn rejects_shape_mismatch_and_inverted_windows() {
        let record = parse(
            r#"{"id":"x","type":"daily","frequency":[],"start_date":"2024-01-01"}"#,
        );
        assert!(matches!(
            record.into_habit().unwrap_err(),
            ValidationError::InvalidRecurrenceValue { ref field, .. } if field == "frequency"
        ));

        let record = parse(
            r#"{"id":"x","type":"daily","frequency":{"start_time":"09:00","end_time":"08:00"},
                "start_date":"2024-01-01"}"#,
        );
        assert!(matches!(record.into_habit().unwrap_err(), ValidationError::InvalidWindow { .. }));

        let record = parse(r#"{"id":"x","type":"weekly","frequency":[],"start_date":"2024-01-01"}"#);
        assert!(matches!(record.into_habit().unwrap_err(), ValidationError::EmptyCollection(_)));
    }

    #[test]
    fn load_habits_names_the_failing_record() {
        let json = r#"[
            {"id":"ok","type":"daily","frequency":{"start_time":"06:00","end_time":"07:00"},"start_date":"2024-01-01"},
            {"id":"bad","type":"daily","frequency":{"start_time":"06:00","end_time":"07:00"},
             "start_date":"2024-02-01","end_date":"2024-01-01"}
        ]"#;
        match load_habits(json) {
            Err(CoreError::InvalidRecord { id, source }) => {
                assert_eq!(id, "bad");
                assert!(matches!(source, ValidationError::InvalidActiveRange { .. }));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn validate_records_keeps_going() {
        let records: Vec<HabitRecord> = serde_json::from_str(
            r#"[
            {"id":"a","type":"monthly","frequency":[{"day":40,"start_time":"06:00","end_time":"07:00"}],"start_date":"2024-01-01"},
            {"id":"b","type":"monthly","frequency":[{"day":4,"start_time":"06:00","end_time":"07:00"}],"start_date":"2024-01-01"}
        ]"#,
        )
        .unwrap();
        let outcomes = validate_records(records);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].result.is_err());
        assert!(outcomes[1].result.is_ok());
    }

    #[test]
    fn habit_converts_back_to_record() {
        let record = parse(
            r#"{"id":"m","name":"Bills","type":"monthly",
                "frequency":[{"day":15,"start_time":"19:00","end_time":"19:30"}],
                "start_date":"2024-01-01","end_date":"2024-12-31"}"#,
        );
        let habit = record.clone().into_habit().unwrap();
        assert_eq!(HabitRecord::from(&habit), record);
    }
}
