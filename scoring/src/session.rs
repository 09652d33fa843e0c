use sends_client::{
    ApiClient, ApiError,
    models::{Climber, Grade, GymArea, ScoreRecord, ScoreSubmission, Wall},
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::selector::{Action, Delivery, Fetch, SelectError, Selector, Stage, Ticket};

pub const LOAD_FAILED: &str = "Failed to load data";
pub const CLIMBER_NOT_FOUND: &str = "Climber not found";
pub const AREAS_FAILED: &str = "Failed to load gym areas";
pub const AREA_DATA_FAILED: &str = "Failed to load walls and grades";
pub const SCORES_FAILED: &str = "Failed to load climber scores";
pub const SUBMIT_FAILED: &str = "Failed to submit score";
pub const DELETE_FAILED: &str = "Failed to delete score";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{0}")]
    Fetch(String),

    #[error("{0}")]
    Submit(String),

    #[error(transparent)]
    Select(#[from] SelectError),
}

/// A finished fetch, ready to be handed back with [`Session::deliver`].
#[derive(Debug)]
pub enum Loaded {
    Areas {
        ticket: Ticket,
        result: Result<Vec<GymArea>, ApiError>,
    },
    AreaData {
        ticket: Ticket,
        walls: Result<Vec<Wall>, ApiError>,
        grades: Result<Vec<Grade>, ApiError>,
    },
}

impl Fetch {
    /// Runs the request. Walls and grades for an area are fetched together.
    pub async fn run(self, api: &ApiClient) -> Loaded {
        match self {
            Fetch::Areas { gym_id, ticket } => Loaded::Areas {
                ticket,
                result: api.list_gym_areas(gym_id).await,
            },
            Fetch::AreaData {
                gym_area_id,
                ticket,
            } => {
                let (walls, grades) =
                    tokio::join!(api.list_walls(gym_area_id), api.list_grades(gym_area_id));

                Loaded::AreaData {
                    ticket,
                    walls,
                    grades,
                }
            }
        }
    }
}

/// One user's score-entry page: the selector plus the data around it.
///
/// Every failure is caught here and kept as a single message in
/// [`Session::error`]; earlier choices survive it.
pub struct Session {
    api: ApiClient,
    selector: Selector,
    climbers: Vec<Climber>,
    climber: Option<Climber>,
    scores: Vec<ScoreRecord>,
    error: Option<String>,
}

impl Session {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            selector: Selector::new(),
            climbers: Vec::new(),
            climber: None,
            scores: Vec::new(),
            error: None,
        }
    }

    /// Loads climbers and gyms, then optionally picks the given climber.
    pub async fn load(&mut self, climber_id: Option<u32>) -> Result<(), SessionError> {
        let result = tokio::try_join!(self.api.list_climbers(), self.api.list_gyms());

        let (climbers, gyms) = match result {
            Ok(loaded) => loaded,
            Err(e) => return Err(self.fetch_failed(LOAD_FAILED, e)),
        };

        info!("Loaded {} climbers and {} gyms", climbers.len(), gyms.len());
        self.climbers = climbers;
        self.selector.receive_gyms(gyms);

        match climber_id {
            Some(climber_id) => self.choose_climber(climber_id).await,
            None => Ok(()),
        }
    }

    pub async fn choose_climber(&mut self, climber_id: u32) -> Result<(), SessionError> {
        let Some(climber) = self.climbers.iter().find(|c| c.id == climber_id).cloned() else {
            warn!("Climber {climber_id} not found");
            self.error = Some(CLIMBER_NOT_FOUND.to_string());
            return Err(SessionError::Fetch(CLIMBER_NOT_FOUND.to_string()));
        };

        self.dispatch(Action::SelectClimber(climber_id))?;

        if self.climber.as_ref().map(|c| c.id) != Some(climber_id) {
            self.scores.clear();
        }
        self.climber = Some(climber);

        self.refresh_scores().await
    }

    pub fn change_climber(&mut self) -> Result<(), SessionError> {
        self.dispatch(Action::ChangeClimber)?;
        self.climber = None;
        self.scores.clear();

        Ok(())
    }

    /// Applies one user choice. A returned [`Fetch`] must be run and its
    /// result delivered before the next level has options.
    pub fn dispatch(&mut self, action: Action) -> Result<Option<Fetch>, SessionError> {
        match self.selector.apply(action) {
            Ok(fetch) => {
                self.error = None;
                Ok(fetch)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn deliver(&mut self, loaded: Loaded) -> Result<(), SessionError> {
        match loaded {
            Loaded::Areas { ticket, result } => match self.selector.receive_areas(ticket, result) {
                Delivery::Failed(e) => Err(self.fetch_failed(AREAS_FAILED, e)),
                Delivery::Stale => {
                    debug!("Ignored late gym areas");
                    Ok(())
                }
                Delivery::Applied => Ok(()),
            },
            Loaded::AreaData {
                ticket,
                walls,
                grades,
            } => {
                let walls = self.selector.receive_walls(ticket, walls);
                let grades = self.selector.receive_grades(ticket, grades);

                match (walls, grades) {
                    (Delivery::Failed(e), _) | (_, Delivery::Failed(e)) => {
                        Err(self.fetch_failed(AREA_DATA_FAILED, e))
                    }
                    (Delivery::Stale, _) | (_, Delivery::Stale) => {
                        debug!("Ignored late walls and grades");
                        Ok(())
                    }
                    _ => Ok(()),
                }
            }
        }
    }

    /// Dispatches a choice and waits for the options it unlocks.
    pub async fn select(&mut self, action: Action) -> Result<(), SessionError> {
        if let Some(fetch) = self.dispatch(action)? {
            let loaded = fetch.run(&self.api).await;
            self.deliver(loaded)?;
        }

        Ok(())
    }

    pub async fn submit(&mut self) -> Result<(), SessionError> {
        let submission = match self.selector.begin_submit() {
            Ok(submission) => submission,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        info!(
            "Submitting {} on wall {} for climber {}",
            submission.grade, submission.wall_id, submission.climber_id
        );

        match self.api.submit_score(&submission).await {
            Ok(_) => {
                self.selector.finish_submit(true);
                self.error = None;

                // The score is stored; a failed refetch only leaves its message behind.
                let _ = self.refresh_scores().await;

                Ok(())
            }
            Err(e) => {
                self.selector.finish_submit(false);
                warn!("{SUBMIT_FAILED}: {e}");
                self.error = Some(SUBMIT_FAILED.to_string());

                Err(SessionError::Submit(SUBMIT_FAILED.to_string()))
            }
        }
    }

    pub async fn delete_score(&mut self, score_id: u32) -> Result<(), SessionError> {
        let blocked = if self.climber.is_none() {
            Some(SelectError::Missing("climber"))
        } else if self.selector.stage() == Stage::Submitting {
            Some(SelectError::Busy)
        } else {
            None
        };
        if let Some(e) = blocked {
            self.error = Some(e.to_string());
            return Err(e.into());
        }

        match self.api.delete_score(score_id).await {
            Ok(_) => {
                info!("Deleted score {score_id}");
                self.error = None;

                let _ = self.refresh_scores().await;

                Ok(())
            }
            Err(e) => {
                warn!("{DELETE_FAILED}: {e}");
                self.error = Some(DELETE_FAILED.to_string());

                Err(SessionError::Submit(DELETE_FAILED.to_string()))
            }
        }
    }

    /// Refetches the chosen climber's log. A failure keeps the previous log.
    pub async fn refresh_scores(&mut self) -> Result<(), SessionError> {
        let Some(climber_id) = self.climber.as_ref().map(|c| c.id) else {
            return Ok(());
        };

        match self.api.list_climber_scores(climber_id).await {
            Ok(loaded) => {
                self.scores = loaded.scores;
                Ok(())
            }
            Err(e) => Err(self.fetch_failed(SCORES_FAILED, e)),
        }
    }

    /// The payload the next submit would send.
    pub fn pending_submission(&self) -> Option<ScoreSubmission> {
        self.selector.submission().ok()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn climbers(&self) -> &[Climber] {
        &self.climbers
    }

    pub fn climber(&self) -> Option<&Climber> {
        self.climber.as_ref()
    }

    pub fn scores(&self) -> &[ScoreRecord] {
        &self.scores
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn fetch_failed(&mut self, message: &str, e: ApiError) -> SessionError {
        warn!("{message}: {e}");
        self.error = Some(message.to_string());

        SessionError::Fetch(message.to_string())
    }
}
