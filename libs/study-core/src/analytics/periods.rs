//! Calendar and clock buckets.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Weekday labels indexed Sunday = 0 through Saturday = 6.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_sunday() as usize
}

/// Part of the day an attempt falls in, by local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    #[serde(rename = "Morning (5-11)")]
    Morning,
    #[serde(rename = "Afternoon (12-16)")]
    Afternoon,
    #[serde(rename = "Evening (17-21)")]
    Evening,
    #[serde(rename = "Night (22-4)")]
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [Self::Morning, Self::Afternoon, Self::Evening, Self::Night];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=21 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Morning => 0,
            Self::Afternoon => 1,
            Self::Evening => 2,
            Self::Night => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_boundaries() {
        let expected = [
            (0, TimeOfDay::Night),
            (4, TimeOfDay::Night),
            (5, TimeOfDay::Morning),
            (11, TimeOfDay::Morning),
            (12, TimeOfDay::Afternoon),
            (16, TimeOfDay::Afternoon),
            (17, TimeOfDay::Evening),
            (21, TimeOfDay::Evening),
            (22, TimeOfDay::Night),
            (23, TimeOfDay::Night),
        ];
        for (hour, period) in expected {
            assert_eq!(TimeOfDay::from_hour(hour), period, "hour {hour}");
        }
    }

    #[test]
    fn every_hour_has_one_bucket() {
        let mut counts = [0; 4];
        for hour in 0..24 {
            counts[TimeOfDay::from_hour(hour).index()] += 1;
        }
        assert_eq!(counts, [7, 5, 5, 7]);
    }

    #[test]
    fn weekdays_start_on_sunday() {
        assert_eq!(weekday_index(Weekday::Sun), 0);
        assert_eq!(weekday_index(Weekday::Sat), 6);
        assert_eq!(WEEKDAY_LABELS[weekday_index(Weekday::Wed)], "Wed");
    }
}
