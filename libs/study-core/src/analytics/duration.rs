//! Study session durations.

use crate::types::StudySessionEvent;

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Parse an `HH:MM` clock time into minutes after midnight.
pub fn parse_clock(value: &str) -> Option<u32> {
    let (hours, minutes) = value.trim().split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    if hours < 24 && minutes < 60 {
        Some(hours * 60 + minutes)
    } else {
        None
    }
}

/// Minutes spent in a session.
///
/// An explicit `time_spent` wins. Otherwise the clock times are subtracted,
/// wrapping past midnight when the end is earlier than the start. Missing or
/// unparseable times give 0.
pub fn session_minutes(session: &StudySessionEvent) -> u32 {
    if let Some(minutes) = session.time_spent {
        return minutes;
    }
    let start = session.start_time.as_deref().and_then(parse_clock);
    let end = session.end_time.as_deref().and_then(parse_clock);
    match (start, end) {
        (Some(start), Some(end)) => {
            let mut minutes = end as i32 - start as i32;
            if minutes < 0 {
                minutes += MINUTES_PER_DAY;
            }
            minutes as u32
        }
        _ => 0,
    }
}
