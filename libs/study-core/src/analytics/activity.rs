//! Recent activity timeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entries kept in the timeline.
pub const RECENT_ACTIVITY_LIMIT: usize = 10;

/// One event on the timeline, tagged by its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ActivityItem {
    Quiz {
        id: String,
        topic: String,
        score: Option<f64>,
        at: DateTime<Utc>,
    },
    Session {
        id: Option<String>,
        minutes: u32,
        at: DateTime<Utc>,
    },
    Note {
        id: Option<String>,
        at: DateTime<Utc>,
    },
}

impl ActivityItem {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Self::Quiz { at, .. } | Self::Session { at, .. } | Self::Note { at, .. } => *at,
        }
    }
}

/// Newest first, keeping the given order for equal timestamps, cut to the limit.
pub fn recent(mut items: Vec<ActivityItem>) -> Vec<ActivityItem> {
    items.sort_by(|a, b| b.at().cmp(&a.at()));
    items.truncate(RECENT_ACTIVITY_LIMIT);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap()
    }

    fn note(id: &str, minutes: i64) -> ActivityItem {
        ActivityItem::Note {
            id: Some(id.to_string()),
            at: base() + Duration::minutes(minutes),
        }
    }

    #[test]
    fn newest_first_and_truncated() {
        let items: Vec<ActivityItem> = (0..15).map(|i| note(&format!("n{i}"), i)).collect();
        let recent = recent(items);
        assert_eq!(recent.len(), RECENT_ACTIVITY_LIMIT);
        assert_eq!(recent[0], note("n14", 14));
        assert_eq!(recent[9], note("n5", 5));
    }

    #[test]
    fn ties_keep_merge_order() {
        let quiz = ActivityItem::Quiz {
            id: "a1".to_string(),
            topic: "Math".to_string(),
            score: Some(90.0),
            at: base(),
        };
        let recent = recent(vec![quiz.clone(), note("n1", 0)]);
        assert_eq!(recent[0], quiz);
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(note("n1", 0)).unwrap();
        assert_eq!(json["type"], "note");
        assert_eq!(json["id"], "n1");
    }
}
