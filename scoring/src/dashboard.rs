//! # Climber Dashboard
//!
//! Thirty-day KPIs, daily sparkline rows, per-grade bar counts and the
//! sixty-day average-grade gauges for one climber.
//!
//! The average grade takes the climber's ten best climbs over the last sixty
//! days, averages their score and maps it back to a grade. The remainder is
//! the progress towards the next grade.
use std::collections::HashMap;

use sends_client::{
    ApiClient,
    models::{AverageGrade, ClimbType, ClimberMetrics, DailySummary, GradeScope, ScoreRecord},
};
use tracing::warn;

use crate::{
    grades::{Gauge, colour_for_grade, compare_grades},
    session::SessionError,
};

pub const DASHBOARD_FAILED: &str = "Failed to load climbing data";

#[derive(Debug, Clone, PartialEq)]
pub struct GradeBar {
    pub grade: String,
    pub count: usize,
    pub score: f64,
    pub colour: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gauges {
    pub all: Option<Gauge>,
    pub bouldering: Option<Gauge>,
    pub ropes: Option<Gauge>,
}

impl Gauges {
    pub fn from_rows(rows: &[AverageGrade]) -> Self {
        let gauge = |scope: GradeScope| {
            rows.iter()
                .find(|row| row.climb_type == scope)
                .map(|row| Gauge::new(&row.avg_grade, row.perc_to_next_grade))
        };

        Self {
            all: gauge(GradeScope::All),
            bouldering: gauge(GradeScope::Bouldering),
            ropes: gauge(GradeScope::Ropes),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub metrics: ClimberMetrics,
    pub daily: Vec<DailySummary>,
    pub gauges: Gauges,
    pub bouldering: Vec<GradeBar>,
    pub ropes: Vec<GradeBar>,
}

impl Dashboard {
    pub async fn load(api: &ApiClient, climber_id: u32) -> Result<Self, SessionError> {
        let result = tokio::try_join!(
            api.climber_metrics(climber_id),
            api.climber_average_grades(climber_id),
            api.climber_daily_summary(climber_id),
            api.climber_recent_data(climber_id),
        );

        match result {
            Ok((metrics, averages, daily, climbs)) => {
                Ok(Self::from_parts(metrics, &averages, daily, &climbs))
            }
            Err(e) => {
                warn!("{DASHBOARD_FAILED} for climber {climber_id}: {e}");
                Err(SessionError::Fetch(DASHBOARD_FAILED.to_string()))
            }
        }
    }

    pub fn from_parts(
        metrics: ClimberMetrics,
        averages: &[AverageGrade],
        daily: Vec<DailySummary>,
        climbs: &[ScoreRecord],
    ) -> Self {
        let of_type = |climb_type: ClimbType| {
            climbs
                .iter()
                .filter(move |climb| climb.climb_type == Some(climb_type))
        };

        Self {
            metrics,
            daily,
            gauges: Gauges::from_rows(averages),
            bouldering: grade_bars(of_type(ClimbType::Bouldering)),
            ropes: grade_bars(of_type(ClimbType::Ropes)),
        }
    }
}

/// Counts and total score per grade, easiest grade first.
pub fn grade_bars<'a>(climbs: impl IntoIterator<Item = &'a ScoreRecord>) -> Vec<GradeBar> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut bars: Vec<GradeBar> = Vec::new();

    for climb in climbs {
        let slot = *index.entry(climb.grade.as_str()).or_insert_with(|| {
            bars.push(GradeBar {
                grade: climb.grade.clone(),
                count: 0,
                score: 0.0,
                colour: colour_for_grade(&climb.grade),
            });
            bars.len() - 1
        });

        bars[slot].count += 1;
        bars[slot].score += climb.score.unwrap_or(0.0);
    }

    bars.sort_by(|a, b| compare_grades(&a.grade, &b.grade));
    bars
}
