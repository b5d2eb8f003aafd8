//! Durable mapping from (agent, day) to schedule entries, with one
//! interface over two backends selected by configuration.

mod local;
mod remote;
mod wire;

pub use local::LocalStore;
pub use remote::RemoteStore;

use std::collections::HashMap;

use thiserror::Error;

use crate::config::{Config, StorageBackend};
use crate::schedule::{DayOfWeek, ScheduleEntry};

/// The full week for every known agent. Entries start out empty and only
/// change through explicit saves; a failed save leaves the last-loaded
/// snapshot untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    agents: Vec<String>,
    weeks: HashMap<String, [ScheduleEntry; 7]>,
}

impl Schedule {
    pub fn empty(agents: &[String]) -> Self {
        let weeks = agents
            .iter()
            .map(|agent| (agent.clone(), [ScheduleEntry::Empty; 7]))
            .collect();
        Self {
            agents: agents.to_vec(),
            weeks,
        }
    }

    /// Roster order, as the grid renders its rows.
    pub fn agents(&self) -> &[String] {
        &self.agents
    }

    pub fn has_agent(&self, agent: &str) -> bool {
        self.weeks.contains_key(agent)
    }

    pub fn entry(&self, agent: &str, day: DayOfWeek) -> ScheduleEntry {
        self.weeks
            .get(agent)
            .map(|week| week[day.index()])
            .unwrap_or_default()
    }

    pub fn week(&self, agent: &str) -> [ScheduleEntry; 7] {
        self.weeks.get(agent).copied().unwrap_or_default()
    }

    pub(crate) fn set_entry(&mut self, agent: &str, day: DayOfWeek, entry: ScheduleEntry) {
        if let Some(week) = self.weeks.get_mut(agent) {
            week[day.index()] = entry;
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("schedule request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("schedule endpoint returned {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed schedule data: {0}")]
    Malformed(String),
    #[error("failed to read schedule file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("save rejected by the schedule endpoint")]
    Rejected,
    #[error("failed to write schedule file: {0}")]
    Io(#[from] std::io::Error),
}

/// Backing store for the shared schedule.
pub enum ScheduleStore {
    Remote(RemoteStore),
    Local(LocalStore),
}

impl ScheduleStore {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let agents = config.agents.clone();
        match config.storage {
            StorageBackend::Remote => Ok(ScheduleStore::Remote(RemoteStore::new(
                config.endpoint_url(),
                agents,
            ))),
            StorageBackend::Local => Ok(ScheduleStore::Local(LocalStore::new(
                LocalStore::default_path()?,
                agents,
            ))),
        }
    }

    /// Fetch the full schedule for the known roster. Callers degrade to
    /// `Schedule::empty` on failure so the grid stays usable.
    pub async fn load(&self) -> Result<Schedule, LoadError> {
        match self {
            ScheduleStore::Remote(store) => store.load().await,
            ScheduleStore::Local(store) => store.load(),
        }
    }

    /// Persist one entry, replacing whatever the coordinate held. `week` is
    /// the agent's last-loaded week: the remote contract resends the full
    /// per-agent record with `day` updated, while the file store rewrites
    /// its own document and ignores it.
    pub async fn save_day(
        &self,
        agent: &str,
        day: DayOfWeek,
        entry: ScheduleEntry,
        week: &[ScheduleEntry; 7],
    ) -> Result<(), SaveError> {
        match self {
            ScheduleStore::Remote(store) => store.save_day(agent, day, entry, week).await,
            ScheduleStore::Local(store) => store.save_day(agent, day, entry),
        }
    }

    /// Reset one coordinate back to empty.
    pub async fn clear_day(
        &self,
        agent: &str,
        day: DayOfWeek,
        week: &[ScheduleEntry; 7],
    ) -> Result<(), SaveError> {
        self.save_day(agent, day, ScheduleEntry::Empty, week).await
    }
}
