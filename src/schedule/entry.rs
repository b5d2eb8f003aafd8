//! Classification of raw sheet cells into schedule entries.

use thiserror::Error;

use super::time::TimeOfDay;

/// The four reserved markers a day can hold instead of a time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTag {
    DayOff,
    Leave,
    Trainee,
    Root,
}

impl StatusTag {
    pub const ALL: [StatusTag; 4] = [
        StatusTag::DayOff,
        StatusTag::Leave,
        StatusTag::Trainee,
        StatusTag::Root,
    ];

    /// The exact token stored in a sheet cell.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTag::DayOff => "DAY OFF",
            StatusTag::Leave => "LEAVE",
            StatusTag::Trainee => "TRAINEE",
            StatusTag::Root => "ROOT",
        }
    }

    pub fn from_token(raw: &str) -> Option<StatusTag> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == raw)
    }
}

/// What one agent's day holds. Exactly one shape at a time; the two-cell
/// sheet encoding (status in the start cell, end cleared) lives in the
/// store's wire layer, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleEntry {
    #[default]
    Empty,
    Status(StatusTag),
    TimeRange { start: TimeOfDay, end: TimeOfDay },
}

/// Rejected before any store call is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("start and end cannot be the same")]
    EqualStartEnd,
}

impl ScheduleEntry {
    /// Classify a raw start/end cell pair. A reserved status token wins,
    /// start cell checked before end; otherwise two non-empty parseable
    /// cells make a time range; anything else is empty.
    pub fn classify(raw_start: &str, raw_end: &str) -> ScheduleEntry {
        let raw_start = raw_start.trim();
        let raw_end = raw_end.trim();

        if let Some(tag) = StatusTag::from_token(raw_start) {
            return ScheduleEntry::Status(tag);
        }
        if let Some(tag) = StatusTag::from_token(raw_end) {
            return ScheduleEntry::Status(tag);
        }

        if !raw_start.is_empty() && !raw_end.is_empty() {
            if let (Some(start), Some(end)) =
                (TimeOfDay::parse(raw_start), TimeOfDay::parse(raw_end))
            {
                return ScheduleEntry::TimeRange { start, end };
            }
        }

        ScheduleEntry::Empty
    }

    /// Build a time-range entry, refusing zero-length ranges.
    pub fn time_range(start: TimeOfDay, end: TimeOfDay) -> Result<ScheduleEntry, ValidationError> {
        if start == end {
            return Err(ValidationError::EqualStartEnd);
        }
        Ok(ScheduleEntry::TimeRange { start, end })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ScheduleEntry::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_status_in_start_cell() {
        assert_eq!(
            ScheduleEntry::classify("DAY OFF", ""),
            ScheduleEntry::Status(StatusTag::DayOff)
        );
        assert_eq!(
            ScheduleEntry::classify("ROOT", ""),
            ScheduleEntry::Status(StatusTag::Root)
        );
    }

    #[test]
    fn classify_status_in_end_cell() {
        // not produced by this app's serializer, but rows written by hand
        // can carry the token in the end cell
        assert_eq!(
            ScheduleEntry::classify("", "LEAVE"),
            ScheduleEntry::Status(StatusTag::Leave)
        );
    }

    #[test]
    fn start_cell_token_wins_over_end_cell() {
        assert_eq!(
            ScheduleEntry::classify("TRAINEE", "LEAVE"),
            ScheduleEntry::Status(StatusTag::Trainee)
        );
    }

    #[test]
    fn classify_time_range() {
        let entry = ScheduleEntry::classify("10 PM", "7 AM");
        match entry {
            ScheduleEntry::TimeRange { start, end } => {
                assert_eq!(start.minutes(), 22 * 60);
                assert_eq!(end.minutes(), 7 * 60);
            }
            other => panic!("expected time range, got {:?}", other),
        }
    }

    #[test]
    fn classify_empty() {
        assert_eq!(ScheduleEntry::classify("", ""), ScheduleEntry::Empty);
        assert_eq!(ScheduleEntry::classify("10 PM", ""), ScheduleEntry::Empty);
        assert_eq!(ScheduleEntry::classify("", "7 AM"), ScheduleEntry::Empty);
        assert_eq!(ScheduleEntry::classify("junk", "more junk"), ScheduleEntry::Empty);
    }

    #[test]
    fn equal_start_end_rejected_for_every_grid_value() {
        for v in TimeOfDay::grid() {
            assert_eq!(
                ScheduleEntry::time_range(v, v),
                Err(ValidationError::EqualStartEnd),
                "grid value {}",
                v.label()
            );
        }
    }

    #[test]
    fn distinct_start_end_accepted() {
        let ten_pm = TimeOfDay::parse("10 PM").unwrap();
        let seven_am = TimeOfDay::parse("7 AM").unwrap();
        assert!(ScheduleEntry::time_range(ten_pm, seven_am).is_ok());
    }
}
