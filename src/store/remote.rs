//! Remote backend: the spreadsheet macro endpoint.
//!
//! One URL, two verbs. GET returns every agent's week as an array of rows;
//! POST upserts a single agent's row. The endpoint acknowledges writes with
//! a JSON `{"success": bool}` body; anything else counts as a failure.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::schedule::{DayOfWeek, ScheduleEntry};

use super::{wire, LoadError, SaveError, Schedule};

pub struct RemoteStore {
    client: Client,
    url: String,
    agents: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SaveAck {
    success: bool,
}

impl RemoteStore {
    pub fn new(url: String, agents: Vec<String>) -> Self {
        Self {
            client: Client::new(),
            url,
            agents,
        }
    }

    pub async fn load(&self) -> Result<Schedule, LoadError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(LoadError::Status(response.status()));
        }

        let rows: Vec<Map<String, Value>> = response
            .json()
            .await
            .map_err(|e| LoadError::Malformed(e.to_string()))?;

        Ok(wire::schedule_from_rows(&self.agents, &rows))
    }

    pub async fn save_day(
        &self,
        agent: &str,
        day: DayOfWeek,
        entry: ScheduleEntry,
        week: &[ScheduleEntry; 7],
    ) -> Result<(), SaveError> {
        let record = wire::record_with_day(agent, week, day, entry);

        let response = self.client.post(&self.url).json(&record).send().await?;

        if !response.status().is_success() {
            return Err(SaveError::Rejected);
        }

        let ack: SaveAck = response.json().await.map_err(|_| SaveError::Rejected)?;
        if !ack.success {
            return Err(SaveError::Rejected);
        }

        Ok(())
    }
}
