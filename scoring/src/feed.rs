use chrono::{DateTime, Duration, Utc};
use sends_client::{ApiClient, models::ScoreRecord};
use tracing::warn;

use crate::session::SessionError;

pub const FEED_FAILED: &str = "Failed to load recent activity";
pub const DEFAULT_MAX_ITEMS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub climber: String,
    pub route: String,
    pub grade: String,
    pub time_ago: String,
    pub attempts: u32,
    pub notes: Option<String>,
}

impl Activity {
    fn from_record(score: &ScoreRecord, recorded_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let climber = match (&score.climber_name, score.climber_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("Climber {id}"),
            (None, None) => "Unknown Climber".to_string(),
        };
        let route = format!(
            "{} - {} - {}",
            score.gym_name.as_deref().unwrap_or("Unknown Gym"),
            score.gym_area_name.as_deref().unwrap_or("Unknown Area"),
            score.wall_name.as_deref().unwrap_or("Unknown Wall"),
        );

        Self {
            climber,
            route,
            grade: score.grade.clone(),
            time_ago: time_ago(recorded_at, now),
            attempts: score.attempts,
            notes: score.notes.clone().filter(|notes| !notes.trim().is_empty()),
        }
    }
}

/// Completed climbs from the last week, newest first.
pub fn recent_activity(scores: &[ScoreRecord], now: DateTime<Utc>, max_items: usize) -> Vec<Activity> {
    let cutoff = now - Duration::days(7);

    let mut recent: Vec<(DateTime<Utc>, &ScoreRecord)> = scores
        .iter()
        .filter(|score| score.completed)
        .filter_map(|score| score.recorded_at().map(|at| (at, score)))
        .filter(|(at, _)| *at >= cutoff)
        .collect();

    recent.sort_by(|a, b| b.0.cmp(&a.0));

    recent
        .into_iter()
        .take(max_items)
        .map(|(at, score)| Activity::from_record(score, at, now))
        .collect()
}

pub async fn load_recent_activity(
    api: &ApiClient,
    max_items: usize,
    now: DateTime<Utc>,
) -> Result<Vec<Activity>, SessionError> {
    match api.list_scores(Some(max_items.saturating_mul(2))).await {
        Ok(scores) => Ok(recent_activity(&scores, now, max_items)),
        Err(e) => {
            warn!("{FEED_FAILED}: {e}");
            Err(SessionError::Fetch(FEED_FAILED.to_string()))
        }
    }
}

pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - then).num_hours();

    if hours < 1 {
        return "just now".to_string();
    }
    if hours < 24 {
        return format!("{hours}h ago");
    }

    match hours / 24 {
        1 => "yesterday".to_string(),
        days if days < 7 => format!("{days} days ago"),
        _ => then.format("%Y-%m-%d").to_string(),
    }
}
