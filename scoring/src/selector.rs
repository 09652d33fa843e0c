//! # Guided Score-Entry Selector
//!
//! Climber → gym → area → wall group → (rope number) → grade, then submit.
//!
//! Every choice lives inside the choice above it, so a deeper selection can
//! never outlive a shallower one: replacing a gym drops its areas, walls,
//! grades and picks in one assignment.
//!
//! Fetches are not performed here. A transition that needs data returns a
//! [`Fetch`] carrying a [`Ticket`]; the answer is handed back through the
//! `receive_*` methods, which discard anything whose ticket no longer matches
//! the current selection.
use std::fmt;

use sends_client::models::{ClimbType, Grade, Gym, GymArea, ScoreSubmission, Wall};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("Choose a {0} first")]
    Missing(&'static str),

    #[error("Unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },

    #[error("The {0} list is not loaded")]
    NotReady(&'static str),

    #[error("Rope numbers only apply to rope areas")]
    NotRopes,

    #[error("Attempts must be at least 1")]
    ZeroAttempts,

    #[error("A score is already being submitted")]
    Busy,
}

fn unknown(kind: &'static str, value: impl fmt::Display) -> SelectError {
    SelectError::Unknown {
        kind,
        value: value.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectClimber(u32),
    ChangeClimber,
    SelectGym(u32),
    SelectArea(u32),
    SelectWallGroup(String),
    SelectRope(u32),
    SelectGrade(String),
    SetAttempts(u32),
    SetCompleted(bool),
    SetNotes(String),
    ResetForm,
}

/// Identifies one outstanding fetch. Never reused within a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    Areas { gym_id: u32, ticket: Ticket },
    AreaData { gym_area_id: u32, ticket: Ticket },
}

/// Outcome of handing a fetch result back to the selector.
#[derive(Debug)]
pub enum Delivery<E> {
    Applied,
    Failed(E),
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Options<T> {
    Loading,
    Ready(Vec<T>),
    Failed,
}

impl<T> Options<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Options::Ready(items) => items,
            _ => &[],
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Options::Ready(_))
    }

    fn ready(&self, what: &'static str) -> Result<&[T], SelectError> {
        match self {
            Options::Ready(items) => Ok(items),
            _ => Err(SelectError::NotReady(what)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreDetails {
    pub completed: bool,
    pub attempts: u32,
    pub notes: String,
}

impl Default for ScoreDetails {
    fn default() -> Self {
        Self {
            completed: true,
            attempts: 1,
            notes: String::new(),
        }
    }
}

/// A bound wall row and the grade chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub wall_id: u32,
    pub grade: Option<String>,
}

impl Pick {
    fn new(wall_id: u32) -> Self {
        Self {
            wall_id,
            grade: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WallChoice {
    /// One wall row per name, bound as soon as the name is chosen.
    Bouldering { wall_name: String, pick: Pick },
    /// Every row sharing the name is a numbered route; one must be picked.
    Ropes {
        wall_name: String,
        candidates: Vec<Wall>,
        pick: Option<Pick>,
    },
}

impl WallChoice {
    pub fn wall_name(&self) -> &str {
        match self {
            WallChoice::Bouldering { wall_name, .. } | WallChoice::Ropes { wall_name, .. } => {
                wall_name
            }
        }
    }

    pub fn pick(&self) -> Option<&Pick> {
        match self {
            WallChoice::Bouldering { pick, .. } => Some(pick),
            WallChoice::Ropes { pick, .. } => pick.as_ref(),
        }
    }

    fn pick_mut(&mut self) -> Option<&mut Pick> {
        match self {
            WallChoice::Bouldering { pick, .. } => Some(pick),
            WallChoice::Ropes { pick, .. } => pick.as_mut(),
        }
    }

    pub fn candidates(&self) -> &[Wall] {
        match self {
            WallChoice::Bouldering { .. } => &[],
            WallChoice::Ropes { candidates, .. } => candidates,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaSelection {
    pub gym_area_id: u32,
    pub name: String,
    pub climb_type: ClimbType,
    pub walls: Options<Wall>,
    pub grades: Options<Grade>,
    pub wall: Option<WallChoice>,
    ticket: Ticket,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GymSelection {
    pub gym_id: u32,
    pub areas: Options<GymArea>,
    pub area: Option<AreaSelection>,
    ticket: Ticket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NoClimber,
    ClimberChosen,
    GymChosen,
    AreaChosen,
    WallGroupChosen,
    RopeNumberChosen,
    GradeChosen,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    Submitting,
    Submitted,
}

/// Names of the current choices, for a breadcrumb above the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub gym: Option<String>,
    pub area: Option<String>,
    pub wall: Option<String>,
    pub rope: Option<String>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.gym, &self.area, &self.wall, &self.rope]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect();

        f.write_str(&parts.join(" / "))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    climber_id: Option<u32>,
    gyms: Vec<Gym>,
    gym: Option<GymSelection>,
    details: ScoreDetails,
    phase: Phase,
    issued: u64,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gyms do not depend on the climber, so they are loaded once up front.
    pub fn receive_gyms(&mut self, gyms: Vec<Gym>) {
        self.gyms = gyms;
    }

    pub fn apply(&mut self, action: Action) -> Result<Option<Fetch>, SelectError> {
        if self.phase == Phase::Submitting {
            return Err(SelectError::Busy);
        }

        let fetch = self.transition(action)?;
        self.phase = Phase::Idle;

        Ok(fetch)
    }

    fn transition(&mut self, action: Action) -> Result<Option<Fetch>, SelectError> {
        match action {
            Action::SelectClimber(climber_id) => {
                if self.climber_id != Some(climber_id) {
                    self.clear_form();
                    self.climber_id = Some(climber_id);
                }
            }
            Action::ChangeClimber => {
                self.clear_form();
                self.climber_id = None;
            }
            Action::ResetForm => self.clear_form(),
            Action::SelectGym(gym_id) => {
                if self.climber_id.is_none() {
                    return Err(SelectError::Missing("climber"));
                }
                if !self.gyms.iter().any(|gym| gym.id == gym_id) {
                    return Err(unknown("gym", gym_id));
                }

                let ticket = self.issue();
                self.gym = Some(GymSelection {
                    gym_id,
                    areas: Options::Loading,
                    area: None,
                    ticket,
                });

                return Ok(Some(Fetch::Areas { gym_id, ticket }));
            }
            Action::SelectArea(gym_area_id) => {
                let area = self
                    .gym()?
                    .areas
                    .ready("gym area")?
                    .iter()
                    .find(|area| area.id == gym_area_id)
                    .cloned()
                    .ok_or_else(|| unknown("gym area", gym_area_id))?;

                let ticket = self.issue();
                if let Some(gym) = self.gym.as_mut() {
                    gym.area = Some(AreaSelection {
                        gym_area_id,
                        name: area.name,
                        climb_type: area.climb_type,
                        walls: Options::Loading,
                        grades: Options::Loading,
                        wall: None,
                        ticket,
                    });
                }

                return Ok(Some(Fetch::AreaData {
                    gym_area_id,
                    ticket,
                }));
            }
            Action::SelectWallGroup(wall_name) => {
                let area = self.area()?;
                let rows: Vec<Wall> = area
                    .walls
                    .ready("wall")?
                    .iter()
                    .filter(|wall| wall.wall_name == wall_name)
                    .cloned()
                    .collect();

                let Some(first) = rows.first() else {
                    return Err(unknown("wall", wall_name));
                };

                let choice = match area.climb_type {
                    ClimbType::Bouldering => WallChoice::Bouldering {
                        pick: Pick::new(first.id),
                        wall_name,
                    },
                    ClimbType::Ropes => WallChoice::Ropes {
                        wall_name,
                        candidates: rows,
                        pick: None,
                    },
                };

                if let Some(area) = self.area_mut() {
                    area.wall = Some(choice);
                }
            }
            Action::SelectRope(wall_id) => {
                match self.area()?.wall.as_ref() {
                    None => return Err(SelectError::Missing("wall")),
                    Some(WallChoice::Bouldering { .. }) => return Err(SelectError::NotRopes),
                    Some(WallChoice::Ropes { candidates, .. }) => {
                        if !candidates.iter().any(|wall| wall.id == wall_id) {
                            return Err(unknown("rope", wall_id));
                        }
                    }
                }

                if let Some(WallChoice::Ropes { pick, .. }) =
                    self.area_mut().and_then(|area| area.wall.as_mut())
                {
                    *pick = Some(Pick::new(wall_id));
                }
            }
            Action::SelectGrade(grade) => {
                let area = self.area()?;
                match area.wall.as_ref() {
                    None => return Err(SelectError::Missing("wall")),
                    Some(choice) if choice.pick().is_none() => {
                        return Err(SelectError::Missing("rope number"));
                    }
                    Some(_) => {}
                }

                if !area
                    .grades
                    .ready("grade")?
                    .iter()
                    .any(|known| known.grade == grade)
                {
                    return Err(unknown("grade", grade));
                }

                if let Some(pick) = self.pick_mut() {
                    pick.grade = Some(grade);
                }
            }
            Action::SetAttempts(0) => return Err(SelectError::ZeroAttempts),
            Action::SetAttempts(attempts) => self.details.attempts = attempts,
            Action::SetCompleted(completed) => self.details.completed = completed,
            Action::SetNotes(notes) => self.details.notes = notes,
        }

        Ok(None)
    }

    pub fn receive_areas<E>(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<GymArea>, E>,
    ) -> Delivery<E> {
        let Some(gym) = self.gym.as_mut().filter(|gym| gym.ticket == ticket) else {
            debug!("Discarding stale gym areas for {ticket:?}");
            return Delivery::Stale;
        };

        match result {
            Ok(areas) => {
                gym.areas = Options::Ready(areas);
                Delivery::Applied
            }
            Err(e) => {
                gym.areas = Options::Failed;
                Delivery::Failed(e)
            }
        }
    }

    pub fn receive_walls<E>(&mut self, ticket: Ticket, result: Result<Vec<Wall>, E>) -> Delivery<E> {
        let Some(area) = self.current_area(ticket) else {
            debug!("Discarding stale walls for {ticket:?}");
            return Delivery::Stale;
        };

        match result {
            Ok(walls) => {
                area.walls = Options::Ready(walls);
                Delivery::Applied
            }
            Err(e) => {
                area.walls = Options::Failed;
                Delivery::Failed(e)
            }
        }
    }

    pub fn receive_grades<E>(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Grade>, E>,
    ) -> Delivery<E> {
        let Some(area) = self.current_area(ticket) else {
            debug!("Discarding stale grades for {ticket:?}");
            return Delivery::Stale;
        };

        match result {
            Ok(grades) => {
                area.grades = Options::Ready(grades);
                Delivery::Applied
            }
            Err(e) => {
                area.grades = Options::Failed;
                Delivery::Failed(e)
            }
        }
    }

    /// Payload for the current choices, without changing any state.
    pub fn submission(&self) -> Result<ScoreSubmission, SelectError> {
        let climber_id = self.climber_id.ok_or(SelectError::Missing("climber"))?;
        let gym = self.gym()?;
        let area = self.area()?;
        let pick = match area.wall.as_ref() {
            None => return Err(SelectError::Missing("wall")),
            Some(choice) => choice.pick().ok_or(SelectError::Missing("rope number"))?,
        };
        let grade = pick.grade.clone().ok_or(SelectError::Missing("grade"))?;

        Ok(ScoreSubmission {
            climber_id,
            gym_id: gym.gym_id,
            gym_area_id: area.gym_area_id,
            wall_id: pick.wall_id,
            grade,
            completed: self.details.completed,
            attempts: self.details.attempts,
            notes: self.details.notes.clone(),
        })
    }

    pub fn begin_submit(&mut self) -> Result<ScoreSubmission, SelectError> {
        if self.phase == Phase::Submitting {
            return Err(SelectError::Busy);
        }

        let submission = self.submission()?;
        self.phase = Phase::Submitting;

        Ok(submission)
    }

    /// Success keeps climber, gym, area and wall so the next climb on the same
    /// wall only needs a grade. Failure leaves everything as it was.
    pub fn finish_submit(&mut self, accepted: bool) {
        if self.phase != Phase::Submitting {
            return;
        }

        if accepted {
            if let Some(pick) = self.pick_mut() {
                pick.grade = None;
            }
            self.details = ScoreDetails::default();
            self.phase = Phase::Submitted;
        } else {
            self.phase = Phase::Idle;
        }
    }

    pub fn stage(&self) -> Stage {
        match self.phase {
            Phase::Submitting => return Stage::Submitting,
            Phase::Submitted => return Stage::Submitted,
            Phase::Idle => {}
        }

        let Some(_) = self.climber_id else {
            return Stage::NoClimber;
        };
        let Some(gym) = &self.gym else {
            return Stage::ClimberChosen;
        };
        let Some(area) = &gym.area else {
            return Stage::GymChosen;
        };

        match &area.wall {
            None => Stage::AreaChosen,
            Some(choice) => match (choice, choice.pick()) {
                (_, Some(Pick { grade: Some(_), .. })) => Stage::GradeChosen,
                (WallChoice::Ropes { .. }, Some(_)) => Stage::RopeNumberChosen,
                _ => Stage::WallGroupChosen,
            },
        }
    }

    pub fn climber_id(&self) -> Option<u32> {
        self.climber_id
    }

    pub fn gyms(&self) -> &[Gym] {
        &self.gyms
    }

    pub fn gym_selection(&self) -> Option<&GymSelection> {
        self.gym.as_ref()
    }

    pub fn area_selection(&self) -> Option<&AreaSelection> {
        self.gym.as_ref().and_then(|gym| gym.area.as_ref())
    }

    pub fn gym_id(&self) -> Option<u32> {
        self.gym.as_ref().map(|gym| gym.gym_id)
    }

    pub fn gym_area_id(&self) -> Option<u32> {
        self.area_selection().map(|area| area.gym_area_id)
    }

    pub fn climb_type(&self) -> Option<ClimbType> {
        self.area_selection().map(|area| area.climb_type)
    }

    pub fn wall_area_name(&self) -> Option<&str> {
        self.wall_choice().map(WallChoice::wall_name)
    }

    pub fn wall_id(&self) -> Option<u32> {
        self.wall_choice()
            .and_then(WallChoice::pick)
            .map(|pick| pick.wall_id)
    }

    pub fn grade(&self) -> Option<&str> {
        self.wall_choice()
            .and_then(WallChoice::pick)
            .and_then(|pick| pick.grade.as_deref())
    }

    pub fn details(&self) -> &ScoreDetails {
        &self.details
    }

    pub fn areas(&self) -> &[GymArea] {
        self.gym
            .as_ref()
            .map(|gym| gym.areas.items())
            .unwrap_or(&[])
    }

    pub fn walls(&self) -> &[Wall] {
        self.area_selection()
            .map(|area| area.walls.items())
            .unwrap_or(&[])
    }

    pub fn grades(&self) -> &[Grade] {
        self.area_selection()
            .map(|area| area.grades.items())
            .unwrap_or(&[])
    }

    /// Wall names in first-seen order, one entry per name.
    pub fn wall_groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();

        for wall in self.walls() {
            if !groups.contains(&wall.wall_name.as_str()) {
                groups.push(&wall.wall_name);
            }
        }

        groups
    }

    pub fn rope_candidates(&self) -> &[Wall] {
        self.wall_choice()
            .map(WallChoice::candidates)
            .unwrap_or(&[])
    }

    /// Wall id of the candidate carrying the given rope number.
    pub fn rope_by_number(&self, number: u32) -> Option<u32> {
        self.rope_candidates()
            .iter()
            .find(|wall| wall.wall_number == Some(number))
            .map(|wall| wall.id)
    }

    pub fn summary(&self) -> Summary {
        let gym = self.gym_id().and_then(|id| {
            self.gyms
                .iter()
                .find(|gym| gym.id == id)
                .map(|gym| gym.name.clone())
        });
        let rope = match self.wall_choice() {
            Some(WallChoice::Ropes {
                candidates,
                pick: Some(pick),
                ..
            }) => candidates
                .iter()
                .find(|wall| wall.id == pick.wall_id)
                .and_then(|wall| wall.wall_number)
                .map(|number| format!("#{number}")),
            _ => None,
        };

        Summary {
            gym,
            area: self.area_selection().map(|area| area.name.clone()),
            wall: self.wall_area_name().map(str::to_string),
            rope,
        }
    }

    fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    fn clear_form(&mut self) {
        self.gym = None;
        self.details = ScoreDetails::default();
    }

    fn gym(&self) -> Result<&GymSelection, SelectError> {
        self.gym.as_ref().ok_or(SelectError::Missing("gym"))
    }

    fn area(&self) -> Result<&AreaSelection, SelectError> {
        self.gym()?
            .area
            .as_ref()
            .ok_or(SelectError::Missing("gym area"))
    }

    fn area_mut(&mut self) -> Option<&mut AreaSelection> {
        self.gym.as_mut().and_then(|gym| gym.area.as_mut())
    }

    fn current_area(&mut self, ticket: Ticket) -> Option<&mut AreaSelection> {
        self.area_mut().filter(|area| area.ticket == ticket)
    }

    fn wall_choice(&self) -> Option<&WallChoice> {
        self.area_selection().and_then(|area| area.wall.as_ref())
    }

    fn pick_mut(&mut self) -> Option<&mut Pick> {
        self.area_mut()
            .and_then(|area| area.wall.as_mut())
            .and_then(WallChoice::pick_mut)
    }
}
