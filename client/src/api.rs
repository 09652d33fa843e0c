use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::ApiError,
    models::{
        AverageGrade, Climber, ClimberMetrics, ClimberScores, DailySummary, Grade, GradeRow, Gym,
        GymArea, Message, NewClimber, ScoreRecord, ScoreSubmission, Stats, Wall,
    },
};

/// Thin wrapper over the backend's REST endpoints. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_climbers(&self) -> Result<Vec<Climber>, ApiError> {
        self.get("/api/climbers").await
    }

    pub async fn add_climber(&self, climber: &NewClimber) -> Result<Message, ApiError> {
        self.post("/api/climbers", climber).await
    }

    pub async fn delete_climber(&self, climber_id: u32) -> Result<Message, ApiError> {
        self.delete(&format!("/api/climbers/{climber_id}")).await
    }

    pub async fn list_gyms(&self) -> Result<Vec<Gym>, ApiError> {
        self.get("/api/gyms").await
    }

    pub async fn list_gym_areas(&self, gym_id: u32) -> Result<Vec<GymArea>, ApiError> {
        self.get(&format!("/api/gym/{gym_id}/areas")).await
    }

    pub async fn list_gym_walls(&self, gym_id: u32) -> Result<Vec<Wall>, ApiError> {
        self.get(&format!("/api/gym/{gym_id}/walls")).await
    }

    pub async fn list_all_gym_areas(&self) -> Result<Vec<GymArea>, ApiError> {
        self.get("/api/gym_areas").await
    }

    /// Every wall row in the area. Rope walls repeat their name once per route.
    pub async fn list_walls(&self, gym_area_id: u32) -> Result<Vec<Wall>, ApiError> {
        self.get(&format!("/api/gym_area/{gym_area_id}/walls")).await
    }

    pub async fn list_grades(&self, gym_area_id: u32) -> Result<Vec<Grade>, ApiError> {
        self.get_grades(&format!("/api/gym_area/{gym_area_id}/grades"))
            .await
    }

    pub async fn list_all_walls(&self) -> Result<Vec<Wall>, ApiError> {
        self.get("/api/walls").await
    }

    pub async fn list_wall_grades(&self, wall_id: u32) -> Result<Vec<Grade>, ApiError> {
        self.get_grades(&format!("/api/wall/{wall_id}/grades")).await
    }

    pub async fn list_all_grades(&self) -> Result<Vec<Grade>, ApiError> {
        self.get_grades("/api/grades").await
    }

    pub async fn list_scores(&self, limit: Option<usize>) -> Result<Vec<ScoreRecord>, ApiError> {
        match limit {
            Some(limit) => self.get(&format!("/api/scores?limit={limit}")).await,
            None => self.get("/api/scores").await,
        }
    }

    pub async fn list_climber_scores(&self, climber_id: u32) -> Result<ClimberScores, ApiError> {
        self.get(&format!("/api/scores/climber/{climber_id}")).await
    }

    pub async fn submit_score(&self, score: &ScoreSubmission) -> Result<Message, ApiError> {
        self.post("/api/scores", score).await
    }

    pub async fn delete_score(&self, score_id: u32) -> Result<Message, ApiError> {
        self.delete(&format!("/api/scores/{score_id}")).await
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.get("/api/stats").await
    }

    pub async fn climber_metrics(&self, climber_id: u32) -> Result<ClimberMetrics, ApiError> {
        self.get(&format!(
            "/api/stats/climber/{climber_id}/last_30_days_metrics"
        ))
        .await
    }

    pub async fn climber_daily_summary(
        &self,
        climber_id: u32,
    ) -> Result<Vec<DailySummary>, ApiError> {
        self.get(&format!(
            "/api/stats/climber/{climber_id}/last_30_days_daily_summary"
        ))
        .await
    }

    pub async fn climber_recent_data(&self, climber_id: u32) -> Result<Vec<ScoreRecord>, ApiError> {
        self.get(&format!("/api/stats/climber/{climber_id}/last_30_days_data"))
            .await
    }

    pub async fn climber_average_grades(
        &self,
        climber_id: u32,
    ) -> Result<Vec<AverageGrade>, ApiError> {
        self.get(&format!(
            "/api/stats/climber/{climber_id}/avg_grade_last_60_days"
        ))
        .await
    }

    async fn get_grades(&self, path: &str) -> Result<Vec<Grade>, ApiError> {
        let rows: Vec<GradeRow> = self.get(path).await?;

        Ok(rows.into_iter().filter_map(GradeRow::into_grade).collect())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET {path}");

        let response = self.http.get(self.url(path)).send().await?;
        decode(path, response).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {path}");

        let response = self.http.post(self.url(path)).json(body).send().await?;
        decode(path, response).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("DELETE {path}");

        let response = self.http.delete(self.url(path)).send().await?;
        decode(path, response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("{path} answered {status}");
        return Err(ApiError::from_status(status, &body));
    }

    serde_json::from_str(&body).map_err(|e| {
        warn!("{path} returned an unreadable body: {e}");
        ApiError::Decode(e)
    })
}
