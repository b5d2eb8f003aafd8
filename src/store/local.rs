//! Local backend: the schedule kept as a JSON document in the platform
//! data directory. Same row shape as the remote endpoint, so a document
//! can be moved between the two backends.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde_json::{Map, Value};

use crate::schedule::{DayOfWeek, ScheduleEntry};

use super::{wire, LoadError, SaveError, Schedule};

pub struct LocalStore {
    path: PathBuf,
    agents: Vec<String>,
}

impl LocalStore {
    pub fn new(path: PathBuf, agents: Vec<String>) -> Self {
        Self { path, agents }
    }

    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "shiftgrid", "shiftgrid")
            .context("Could not determine data directory")?;
        Ok(proj_dirs.data_dir().join("schedule.json"))
    }

    pub fn load(&self) -> Result<Schedule, LoadError> {
        if !self.path.exists() {
            return Ok(Schedule::empty(&self.agents));
        }

        let contents = fs::read_to_string(&self.path)?;
        let rows: Vec<Map<String, Value>> =
            serde_json::from_str(&contents).map_err(|e| LoadError::Malformed(e.to_string()))?;

        Ok(wire::schedule_from_rows(&self.agents, &rows))
    }

    pub fn save_day(
        &self,
        agent: &str,
        day: DayOfWeek,
        entry: ScheduleEntry,
    ) -> Result<(), SaveError> {
        // The document is the source of truth here; re-read it so other
        // agents' rows survive the rewrite.
        let mut schedule = self.load().map_err(|e| match e {
            LoadError::Io(io_err) => SaveError::Io(io_err),
            other => SaveError::Io(io::Error::new(io::ErrorKind::InvalidData, other.to_string())),
        })?;

        schedule.set_entry(agent, day, entry);
        self.write_document(&schedule)?;
        Ok(())
    }

    /// Whole-document replace through a temp-file rename, so a reader never
    /// sees one cell of a pair updated and the other stale.
    fn write_document(&self, schedule: &Schedule) -> io::Result<()> {
        let rows: Vec<Map<String, Value>> = schedule
            .agents()
            .iter()
            .map(|agent| wire::record_for_agent(agent, &schedule.week(agent)))
            .collect();
        let json = serde_json::to_string_pretty(&rows)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{StatusTag, TimeOfDay};

    fn test_store(name: &str) -> LocalStore {
        let path = std::env::temp_dir()
            .join("shiftgrid-tests")
            .join(format!("{}-{}.json", name, std::process::id()));
        let _ = fs::remove_file(&path);
        LocalStore::new(path, roster())
    }

    fn roster() -> Vec<String> {
        vec!["Ria".to_string(), "Paul".to_string(), "Jang".to_string()]
    }

    fn range(start: &str, end: &str) -> ScheduleEntry {
        ScheduleEntry::TimeRange {
            start: TimeOfDay::parse(start).unwrap(),
            end: TimeOfDay::parse(end).unwrap(),
        }
    }

    #[test]
    fn missing_document_loads_as_empty_schedule() {
        let store = test_store("missing");
        let schedule = store.load().unwrap();
        assert_eq!(schedule.agents(), roster().as_slice());
        for day in DayOfWeek::ALL {
            assert!(schedule.entry("Ria", day).is_empty());
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = test_store("round-trip");
        let entry = range("10 PM", "7 AM");

        store.save_day("Ria", DayOfWeek::Monday, entry).unwrap();
        store
            .save_day("Paul", DayOfWeek::Friday, ScheduleEntry::Status(StatusTag::Leave))
            .unwrap();

        let schedule = store.load().unwrap();
        assert_eq!(schedule.entry("Ria", DayOfWeek::Monday), entry);
        assert_eq!(
            schedule.entry("Paul", DayOfWeek::Friday),
            ScheduleEntry::Status(StatusTag::Leave)
        );
    }

    #[test]
    fn clear_resets_one_coordinate_and_leaves_the_rest() {
        let store = test_store("clear");
        let shift = range("9 AM", "5 PM");

        store.save_day("Ria", DayOfWeek::Monday, shift).unwrap();
        store.save_day("Ria", DayOfWeek::Tuesday, shift).unwrap();
        store
            .save_day("Jang", DayOfWeek::Monday, ScheduleEntry::Status(StatusTag::Root))
            .unwrap();

        store
            .save_day("Ria", DayOfWeek::Monday, ScheduleEntry::Empty)
            .unwrap();

        let schedule = store.load().unwrap();
        assert!(schedule.entry("Ria", DayOfWeek::Monday).is_empty());
        assert_eq!(schedule.entry("Ria", DayOfWeek::Tuesday), shift);
        assert_eq!(
            schedule.entry("Jang", DayOfWeek::Monday),
            ScheduleEntry::Status(StatusTag::Root)
        );
    }

    #[test]
    fn overwrite_replaces_prior_entry() {
        let store = test_store("overwrite");

        store
            .save_day("Ria", DayOfWeek::Wednesday, range("10 PM", "7 AM"))
            .unwrap();
        store
            .save_day("Ria", DayOfWeek::Wednesday, ScheduleEntry::Status(StatusTag::DayOff))
            .unwrap();

        let schedule = store.load().unwrap();
        assert_eq!(
            schedule.entry("Ria", DayOfWeek::Wednesday),
            ScheduleEntry::Status(StatusTag::DayOff)
        );
    }
}
