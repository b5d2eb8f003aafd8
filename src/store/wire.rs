//! Two-cell sheet encoding of schedule entries.
//!
//! Each agent is one row keyed by "Name", with a "<Day> Start" / "<Day> End"
//! string pair per weekday. A status tag occupies the start cell with the end
//! cell cleared; time ranges are written as 12-hour labels. Both backends
//! speak this shape, so a document written by one can be read by the other.

use serde_json::{Map, Value};

use crate::schedule::{DayOfWeek, ScheduleEntry};

use super::Schedule;

pub const NAME_FIELD: &str = "Name";

pub fn start_field(day: DayOfWeek) -> String {
    format!("{} Start", day.full())
}

pub fn end_field(day: DayOfWeek) -> String {
    format!("{} End", day.full())
}

/// Serialize one entry into its start/end cell pair.
pub fn entry_to_cells(entry: ScheduleEntry) -> (String, String) {
    match entry {
        ScheduleEntry::Empty => (String::new(), String::new()),
        ScheduleEntry::Status(tag) => (tag.as_str().to_string(), String::new()),
        ScheduleEntry::TimeRange { start, end } => (start.label(), end.label()),
    }
}

/// Build one agent's full-week row from a week of entries.
pub fn record_for_agent(agent: &str, week: &[ScheduleEntry; 7]) -> Map<String, Value> {
    let mut record = Map::new();
    record.insert(NAME_FIELD.to_string(), Value::String(agent.to_string()));
    for day in DayOfWeek::ALL {
        let (start, end) = entry_to_cells(week[day.index()]);
        record.insert(start_field(day), Value::String(start));
        record.insert(end_field(day), Value::String(end));
    }
    record
}

/// Build the row for a save: the agent's last-loaded week with one day
/// replaced by the edited entry. The wire contract resends the full record
/// even when a single day changed.
pub fn record_with_day(
    agent: &str,
    week: &[ScheduleEntry; 7],
    day: DayOfWeek,
    entry: ScheduleEntry,
) -> Map<String, Value> {
    let mut updated = *week;
    updated[day.index()] = entry;
    record_for_agent(agent, &updated)
}

/// Interpret fetched rows into a schedule for the known roster. Rows for
/// unknown names are ignored; agents without a row get an all-empty week.
pub fn schedule_from_rows(agents: &[String], rows: &[Map<String, Value>]) -> Schedule {
    let mut schedule = Schedule::empty(agents);
    for row in rows {
        let Some(name) = row.get(NAME_FIELD).and_then(|v| v.as_str()) else {
            continue;
        };
        if !schedule.has_agent(name) {
            continue;
        }
        let name = name.to_string();
        for day in DayOfWeek::ALL {
            let start = cell_str(row, &start_field(day));
            let end = cell_str(row, &end_field(day));
            schedule.set_entry(&name, day, ScheduleEntry::classify(&start, &end));
        }
    }
    schedule
}

/// Sheet cells arrive as strings, but a macro backend is free to hand back
/// numbers or nulls for cells it considers empty.
fn cell_str(row: &Map<String, Value>, field: &str) -> String {
    match row.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{StatusTag, TimeOfDay};

    fn range(start: &str, end: &str) -> ScheduleEntry {
        ScheduleEntry::TimeRange {
            start: TimeOfDay::parse(start).unwrap(),
            end: TimeOfDay::parse(end).unwrap(),
        }
    }

    #[test]
    fn status_occupies_start_cell_only() {
        let (start, end) = entry_to_cells(ScheduleEntry::Status(StatusTag::DayOff));
        assert_eq!(start, "DAY OFF");
        assert_eq!(end, "");
    }

    #[test]
    fn time_range_serializes_as_labels() {
        let (start, end) = entry_to_cells(range("22:00", "07:00"));
        assert_eq!(start, "10 PM");
        assert_eq!(end, "7 AM");
    }

    #[test]
    fn cells_round_trip_every_entry_shape() {
        let entries = [
            ScheduleEntry::Empty,
            ScheduleEntry::Status(StatusTag::Leave),
            range("9 AM", "5:30 PM"),
        ];
        for entry in entries {
            let (start, end) = entry_to_cells(entry);
            assert_eq!(ScheduleEntry::classify(&start, &end), entry);
        }
    }

    #[test]
    fn record_carries_the_full_week() {
        let week = [ScheduleEntry::Empty; 7];
        let record = record_with_day(
            "Ria",
            &week,
            DayOfWeek::Wednesday,
            ScheduleEntry::Status(StatusTag::Root),
        );

        assert_eq!(record.get("Name"), Some(&Value::String("Ria".into())));
        assert_eq!(
            record.get("Wednesday Start"),
            Some(&Value::String("ROOT".into()))
        );
        assert_eq!(record.get("Wednesday End"), Some(&Value::String("".into())));
        // every other day is present and empty
        assert_eq!(record.len(), 15);
        assert_eq!(record.get("Monday Start"), Some(&Value::String("".into())));
    }

    #[test]
    fn rows_for_unknown_agents_are_ignored() {
        let agents = vec!["Ria".to_string()];
        let stranger = record_for_agent("Nobody", &[ScheduleEntry::Status(StatusTag::Root); 7]);
        let schedule = schedule_from_rows(&agents, &[stranger]);
        assert_eq!(schedule.entry("Ria", DayOfWeek::Monday), ScheduleEntry::Empty);
    }

    #[test]
    fn missing_rows_leave_agents_empty() {
        let agents = vec!["Ria".to_string(), "Paul".to_string()];
        let week = {
            let mut w = [ScheduleEntry::Empty; 7];
            w[DayOfWeek::Friday.index()] = range("10 PM", "7 AM");
            w
        };
        let rows = vec![record_for_agent("Ria", &week)];
        let schedule = schedule_from_rows(&agents, &rows);

        assert_eq!(
            schedule.entry("Ria", DayOfWeek::Friday),
            range("10 PM", "7 AM")
        );
        for day in DayOfWeek::ALL {
            assert_eq!(schedule.entry("Paul", day), ScheduleEntry::Empty);
        }
    }
}
