//! # Wire Types
//!
//! JSON rows exchanged with the sends backend.
//!
//! Listing endpoints return bare arrays of rows. Writes answer with a
//! `{"message": ...}` body, failures with `{"error": ...}`.
//!
//! Numeric aggregates computed by the database (scores, averages) can arrive
//! either as JSON numbers or as decimal strings such as `"12.50"`, so they are
//! read leniently.
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimbType {
    Bouldering,
    Ropes,
}

impl fmt::Display for ClimbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClimbType::Bouldering => f.write_str("Bouldering"),
            ClimbType::Ropes => f.write_str("Ropes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Climber {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
}

impl Climber {
    pub fn display_name(&self) -> &str {
        match self.nickname.as_deref() {
            Some(nickname) if !nickname.trim().is_empty() => nickname,
            _ => &self.name,
        }
    }
}

/// Body of `POST /api/climbers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewClimber {
    pub name: String,
    pub email: String,
    pub nickname: Option<String>,
}

impl NewClimber {
    /// Trims every field. Name and email are required, a blank nickname is sent as null.
    pub fn new(name: &str, email: &str, nickname: Option<&str>) -> Option<Self> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            return None;
        }

        Some(Self {
            name: name.to_string(),
            email: email.to_string(),
            nickname: nickname
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gym {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GymArea {
    pub id: u32,
    pub name: String,
    pub climb_type: ClimbType,
    #[serde(default)]
    pub gym_name: Option<String>,
}

/// One routable wall row. Rope areas carry one row per numbered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    pub id: u32,
    pub wall_name: String,
    #[serde(default)]
    pub wall_number: Option<u32>,
    #[serde(default)]
    pub gym_name: Option<String>,
    #[serde(default)]
    pub gym_area_name: Option<String>,
    #[serde(default)]
    pub climb_type: Option<ClimbType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub climb_type: Option<ClimbType>,
    pub grade: String,
}

/// Grade rows come from an outer join, so an area without grades yields a
/// single row with a null grade.
#[derive(Deserialize)]
pub(crate) struct GradeRow {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    climb_type: Option<ClimbType>,
    #[serde(default)]
    grade: Option<String>,
}

impl GradeRow {
    pub(crate) fn into_grade(self) -> Option<Grade> {
        let grade = self.grade?;
        if grade.trim().is_empty() {
            return None;
        }

        Some(Grade {
            id: self.id,
            climb_type: self.climb_type,
            grade,
        })
    }
}

/// Body of `POST /api/scores`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub climber_id: u32,
    pub gym_id: u32,
    pub gym_area_id: u32,
    pub wall_id: u32,
    pub grade: String,
    pub completed: bool,
    pub attempts: u32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub climber_id: Option<u32>,
    #[serde(default)]
    pub climber_name: Option<String>,
    #[serde(default)]
    pub gym_name: Option<String>,
    #[serde(default)]
    pub gym_area_name: Option<String>,
    #[serde(default)]
    pub wall_name: Option<String>,
    #[serde(default)]
    pub wall_number: Option<u32>,
    #[serde(default)]
    pub climb_type: Option<ClimbType>,
    pub grade: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: Option<f64>,
    #[serde(default)]
    pub date_recorded: Option<String>,
}

impl ScoreRecord {
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.date_recorded.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClimberScores {
    pub climber: Climber,
    #[serde(default)]
    pub scores: Vec<ScoreRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_climbers: u64,
    #[serde(alias = "totalRoutes")]
    pub total_walls: u64,
    pub total_ascents: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimberMetrics {
    #[serde(default)]
    pub total_climbs: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_points: Option<f64>,
    #[serde(default)]
    pub total_days_climbed: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub daily_avg_climbs_completed: Option<f64>,
    #[serde(default)]
    pub latest_and_greatest_climb: Option<ScoreRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailySummary {
    pub date: String,
    #[serde(default)]
    pub total_climbs: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_score: Option<f64>,
}

impl DailySummary {
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .ok()
            .or_else(|| parse_timestamp(&self.date).map(|t| t.date_naive()))
    }
}

/// Scope of an average-grade row: one per climb type plus the combined `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum GradeScope {
    All,
    Bouldering,
    Ropes,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AverageGrade {
    #[serde(default)]
    pub climber_id: Option<u32>,
    pub climb_type: GradeScope,
    pub avg_grade: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub perc_to_next_grade: Option<f64>,
}

/// Accepts RFC 3339 as well as the RFC 2822 form (`Tue, 14 Oct 2025 10:00:00 GMT`)
/// the backend emits for timestamps.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|t| t.with_timezone(&Utc))
        .ok()
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a number, got {s:?}"))),
    }
}
