//! Integration tests for the recurrence engine, driven from stored records.

use chrono::{Datelike, NaiveDate, Weekday};
use habitual_core::{
    completion_summary, find_conflicts, load_habits, CheckIn, ConflictDetector, ConflictGrouping,
    DateRange, Goal, GoalTarget, Habit,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn range(from: NaiveDate, to: NaiveDate) -> DateRange {
    DateRange::new(from, to).unwrap()
}

fn fixture() -> Vec<Habit> {
    load_habits(
        r#"[
        {"id":"run","name":"Morning run","type":"daily",
         "frequency":{"start_time":"06:30","end_time":"07:15"},
         "start_date":"2024-01-01","end_date":"2024-01-31"},
        {"id":"gym","name":"Gym","type":"weekly",
         "frequency":[{"day":1,"start_time":"07:00","end_time":"08:00"},
                      {"day":3,"start_time":"18:00","end_time":"19:00"}],
         "start_date":"2024-01-01","end_date":"2024-01-31"},
        {"id":"stretch","name":"Stretch","type":"weekly",
         "frequency":[{"day":1,"start_time":"07:45","end_time":"08:15"}],
         "start_date":"2024-01-01","end_date":null},
        {"id":"rent","name":"Pay rent","type":"monthly",
         "frequency":[{"day":31,"start_time":"20:00","end_time":"20:15"}],
         "start_date":"2024-01-01","end_date":null},
        {"id":"journal","name":"Journal","type":"daily",
         "frequency":{"start_time":"07:15","end_time":"07:30"},
         "start_date":"2024-01-01","end_date":null}
    ]"#,
    )
    .unwrap()
}

fn habit<'a>(habits: &'a [Habit], id: &str) -> &'a Habit {
    habits.iter().find(|h| h.id == id).unwrap()
}

#[test]
fn nothing_is_scheduled_outside_active_range() {
    let habits = fixture();
    for h in habits.iter().filter(|h| h.active_until().is_some()) {
        let until = h.active_until().unwrap();
        for day in range(until.succ_opt().unwrap(), date(2024, 3, 31)).days() {
            assert!(!h.is_scheduled_on(day), "{} scheduled on {day}", h.id);
            assert!(h.time_window_on(day).is_none());
        }
    }
    for h in &habits {
        assert!(!h.is_scheduled_on(date(2023, 12, 31)));
    }
}

#[test]
fn weekly_count_matches_calendar_scan() {
    let habits = fixture();
    let gym = habit(&habits, "gym");
    let january = range(date(2024, 1, 1), date(2024, 1, 31));

    let expected = january
        .days()
        .filter(|d| matches!(d.weekday(), Weekday::Mon | Weekday::Wed))
        .count() as u32;
    assert_eq!(expected, 10);
    assert_eq!(gym.count_occurrences(january), expected);
}

#[test]
fn monthly_31st_without_rollover() {
    let habits = fixture();
    let rent = habit(&habits, "rent");
    let year: Vec<NaiveDate> = rent.occurrences(range(date(2024, 1, 1), date(2024, 12, 31))).collect();
    assert_eq!(year.len(), 7);
    assert!(year.iter().all(|d| d.day() == 31));
    for day in range(date(2024, 2, 1), date(2024, 2, 29)).days() {
        assert!(!rent.is_scheduled_on(day));
    }
}

#[test]
fn window_exists_exactly_when_scheduled() {
    let habits = fixture();
    for h in &habits {
        for day in range(date(2023, 12, 1), date(2024, 3, 1)).days() {
            match h.time_window_on(day) {
                Some(window) => {
                    assert!(h.is_scheduled_on(day));
                    assert!(window.start() < window.end());
                }
                None => assert!(!h.is_scheduled_on(day)),
            }
        }
    }
}

#[test]
fn conflicts_on_a_busy_monday() {
    let habits = fixture();
    // 2024-01-08 is a Monday: run 06:30-07:15, gym 07:00-08:00,
    // stretch 07:45-08:15, journal 07:15-07:30.
    let groups = find_conflicts(&habits, date(2024, 1, 8));
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].habit_ids(), vec!["run", "gym", "stretch", "journal"]);

    // Symmetry: every member of a group sees every other member.
    for member in &groups[0].members {
        assert!(groups[0].contains(&member.habit_id));
    }
}

#[test]
fn touching_windows_are_not_conflicts() {
    let habits = fixture();
    // Tuesday 2024-01-09: run ends 07:15 exactly when journal starts.
    assert!(find_conflicts(&habits, date(2024, 1, 9)).is_empty());
    // February: run and gym have ended, stretch and journal do not overlap.
    assert!(find_conflicts(&habits, date(2024, 2, 5)).is_empty());
}

#[test]
fn legacy_start_time_grouping_under_detects() {
    let habits = fixture();
    let detector = ConflictDetector::new().with_grouping(ConflictGrouping::StartTime);
    assert!(detector.find_conflicts(&habits, date(2024, 1, 8)).is_empty());
}

#[test]
fn goal_target_and_completion_from_same_schedule() {
    let habits = fixture();
    let goal = Goal {
        id: "fit".into(),
        title: "Fit January".into(),
        target: GoalTarget::Auto {
            habit_ids: vec!["gym".into(), "stretch".into()],
        },
        current: 0,
        start_date: date(2024, 1, 15),
        end_date: date(2024, 2, 15),
    };
    // gym: Mon 15,22,29 + Wed 17,24,31 = 6; stretch: Mondays 15,22,29, Feb 5,12 = 5
    assert_eq!(goal.resolve_target(&habits), 11);

    let checkins: Vec<CheckIn> = ["2024-01-15", "2024-01-17", "2024-01-18"]
        .iter()
        .map(|d| CheckIn {
            habit_id: "gym".into(),
            date: d.parse().unwrap(),
            completed: true,
        })
        .collect();
    let progress = goal.progress(&habits, &checkins);
    assert_eq!(progress.achieved, 2);
    assert_eq!(progress.percent, 18);

    let summary = completion_summary(habit(&habits, "gym"), &checkins, goal.span());
    assert_eq!(summary.scheduled, 6);
    assert_eq!(summary.completed, 2);
}
