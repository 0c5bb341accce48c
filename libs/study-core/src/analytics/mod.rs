//! Study statistics.
//!
//! [`AnalyticsAggregator::aggregate`] turns one snapshot of quiz attempts,
//! study sessions and notes into every series the dashboard shows. It is pure
//! and deterministic: the same snapshot always gives the same result, list
//! order included.
//!
//! Records are taken as they are stored, so fields may be missing. Nothing
//! here fails on a bad record:
//! - attempts without a usable score still count towards totals, topics and
//!   weekdays but are left out of every mean and have no daily score point
//! - records without a usable date still count towards totals but are left
//!   out of the date-keyed series (daily scores, weekdays, time of day,
//!   monthly progress, recent activity)

pub mod activity;
pub mod duration;
pub mod periods;

pub use activity::{ActivityItem, RECENT_ACTIVITY_LIMIT};
pub use duration::{parse_clock, session_minutes};
pub use periods::{TimeOfDay, WEEKDAY_LABELS};

use std::collections::{BTreeMap, HashMap};

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Serialize};

use crate::types::{NoteEvent, QuizAttempt, StudySessionEvent};
use periods::weekday_index;

/// Raw collections read at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySnapshot {
    #[serde(default)]
    pub attempts: Vec<QuizAttempt>,
    #[serde(default)]
    pub sessions: Vec<StudySessionEvent>,
    #[serde(default)]
    pub notes: Vec<NoteEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyScore {
    pub date: NaiveDate,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayCount {
    pub day: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectScore {
    pub topic: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDayScore {
    pub period: TimeOfDay,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProgress {
    /// `YYYY-MM`
    pub month: String,
    /// `None` when no attempt of the month has a usable score.
    pub score: Option<u32>,
    pub study_hours: u64,
}

/// Everything the statistics view shows, derived fresh on each call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSnapshot {
    pub daily_scores: Vec<DailyScore>,
    pub topic_breakdown: Vec<TopicCount>,
    /// Always seven buckets, Sunday first.
    pub weekday_distribution: Vec<WeekdayCount>,
    pub subject_performance: Vec<SubjectScore>,
    pub time_of_day_performance: Vec<TimeOfDayScore>,
    pub progress_over_time: Vec<MonthlyProgress>,
    pub recent_activity: Vec<ActivityItem>,
    pub total_quizzes: usize,
    pub average_score: f64,
    /// Minutes.
    pub total_study_time: u64,
    pub strongest_topic: Option<String>,
}

#[derive(Debug, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    fn rounded(&self) -> Option<u32> {
        self.value().map(|v| v.round() as u32)
    }
}

struct TopicGroup {
    topic: String,
    count: usize,
    score: Mean,
}

#[derive(Default)]
struct MonthGroup {
    score: Mean,
    seconds: u64,
}

/// A score that can take part in a mean.
fn usable_score(attempt: &QuizAttempt) -> Option<f64> {
    attempt.score.filter(|s| (0.0..=100.0).contains(s))
}

/// Computes statistics in a fixed local time zone.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsAggregator {
    offset: FixedOffset,
}

impl Default for AnalyticsAggregator {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl AnalyticsAggregator {
    /// `offset` is the user's local time zone, used for hours, weekdays and
    /// months.
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn aggregate_snapshot(&self, snapshot: &StudySnapshot) -> StatisticsSnapshot {
        self.aggregate(&snapshot.attempts, &snapshot.sessions, &snapshot.notes)
    }

    pub fn aggregate(
        &self,
        attempts: &[QuizAttempt],
        sessions: &[StudySessionEvent],
        notes: &[NoteEvent],
    ) -> StatisticsSnapshot {
        let mut daily_scores = Vec::new();
        let mut topics: Vec<TopicGroup> = Vec::new();
        let mut topic_index: HashMap<String, usize> = HashMap::new();
        let mut weekdays = [0usize; 7];
        let mut day_parts: [Mean; 4] = Default::default();
        let mut months: BTreeMap<String, MonthGroup> = BTreeMap::new();
        let mut activity = Vec::new();
        let mut overall = Mean::default();
        let mut study_minutes = 0.0;

        let mut undated = 0usize;
        let mut unscored = 0usize;

        for attempt in attempts {
            let topic = attempt.topic_key();
            let i = match topic_index.get(topic) {
                Some(&i) => i,
                None => {
                    topic_index.insert(topic.to_string(), topics.len());
                    topics.push(TopicGroup {
                        topic: topic.to_string(),
                        count: 0,
                        score: Mean::default(),
                    });
                    topics.len() - 1
                }
            };
            let group = &mut topics[i];
            group.count += 1;

            let score = usable_score(attempt);
            match score {
                Some(score) => {
                    group.score.add(score);
                    overall.add(score);
                }
                None => unscored += 1,
            }

            let seconds = attempt.time_spent.unwrap_or(0);
            study_minutes += seconds as f64 / 60.0;

            let Some(at) = attempt.timestamp() else {
                undated += 1;
                continue;
            };
            let local = at.with_timezone(&self.offset);

            if let Some(score) = score {
                daily_scores.push(DailyScore {
                    date: local.date_naive(),
                    score,
                });
                day_parts[TimeOfDay::from_hour(local.hour()).index()].add(score);
            }
            weekdays[weekday_index(local.weekday())] += 1;

            let month = months
                .entry(local.format("%Y-%m").to_string())
                .or_default();
            if let Some(score) = score {
                month.score.add(score);
            }
            month.seconds += seconds;

            activity.push(ActivityItem::Quiz {
                id: attempt.id.clone(),
                topic: topic.to_string(),
                score,
                at,
            });
        }

        for session in sessions {
            let minutes = session_minutes(session);
            study_minutes += f64::from(minutes);

            let Some(date) = session.date else {
                undated += 1;
                continue;
            };
            weekdays[weekday_index(date.weekday())] += 1;
            activity.push(ActivityItem::Session {
                id: session.id.clone(),
                minutes,
                at: self.session_start(session, date),
            });
        }

        for note in notes {
            match note.created_at {
                Some(at) => activity.push(ActivityItem::Note {
                    id: note.id.clone(),
                    at,
                }),
                None => undated += 1,
            }
        }

        if undated > 0 || unscored > 0 {
            tracing::debug!(undated, unscored, "defaulted incomplete study records");
        }

        let strongest_topic = topics
            .iter()
            .fold(None::<&TopicGroup>, |best, group| match best {
                Some(best) if best.count >= group.count => Some(best),
                _ => Some(group),
            })
            .map(|group| group.topic.clone());

        StatisticsSnapshot {
            daily_scores,
            topic_breakdown: topics
                .iter()
                .map(|g| TopicCount {
                    topic: g.topic.clone(),
                    count: g.count,
                })
                .collect(),
            weekday_distribution: WEEKDAY_LABELS
                .iter()
                .zip(weekdays)
                .map(|(day, count)| WeekdayCount {
                    day: day.to_string(),
                    count,
                })
                .collect(),
            subject_performance: topics
                .iter()
                .filter_map(|g| {
                    g.score.rounded().map(|score| SubjectScore {
                        topic: g.topic.clone(),
                        score,
                    })
                })
                .collect(),
            time_of_day_performance: TimeOfDay::ALL
                .iter()
                .filter_map(|&period| {
                    day_parts[period.index()]
                        .rounded()
                        .map(|score| TimeOfDayScore { period, score })
                })
                .collect(),
            progress_over_time: months
                .into_iter()
                .map(|(month, group)| MonthlyProgress {
                    month,
                    score: group.score.rounded(),
                    study_hours: (group.seconds as f64 / 3600.0).round() as u64,
                })
                .collect(),
            recent_activity: activity::recent(activity),
            total_quizzes: attempts.len(),
            average_score: overall.value().unwrap_or(0.0),
            total_study_time: study_minutes.round() as u64,
            strongest_topic,
        }
    }

    /// When a session started, in UTC. Midnight local when the start time is
    /// missing.
    fn session_start(&self, session: &StudySessionEvent, date: NaiveDate) -> DateTime<Utc> {
        let minutes = session
            .start_time
            .as_deref()
            .and_then(parse_clock)
            .unwrap_or(0);
        let time = NaiveTime::from_num_seconds_from_midnight_opt(minutes * 60, 0)
            .unwrap_or(NaiveTime::MIN);
        let local = date.and_time(time);
        self.offset
            .from_local_datetime(&local)
            .single()
            .map(|at| at.with_timezone(&Utc))
            .unwrap_or_else(|| local.and_utc())
    }
}

/// Aggregate with UTC as local time.
pub fn aggregate(
    attempts: &[QuizAttempt],
    sessions: &[StudySessionEvent],
    notes: &[NoteEvent],
) -> StatisticsSnapshot {
    AnalyticsAggregator::default().aggregate(attempts, sessions, notes)
}
