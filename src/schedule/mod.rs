mod day;
mod entry;
mod time;

pub use day::DayOfWeek;
pub use entry::{ScheduleEntry, StatusTag, ValidationError};
pub use time::{is_overnight, TimeOfDay};
