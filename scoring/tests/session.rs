use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{TimeZone, Utc};
use sends_client::{ApiClient, Config};
use sends_scoring::{
    Action, Fetch, SelectError, Session, SessionError, Stage,
    dashboard::Dashboard,
    feed::load_recent_activity,
    session::{AREAS_FAILED, CLIMBER_NOT_FOUND, DELETE_FAILED, SCORES_FAILED, SUBMIT_FAILED},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Backend {
    submitted: Arc<Mutex<Vec<Value>>>,
    reject_submits: Arc<AtomicBool>,
    fail_scores: Arc<AtomicBool>,
    score_fetches: Arc<AtomicUsize>,
    feed_limit: Arc<Mutex<Option<String>>>,
}

async fn climbers() -> Json<Value> {
    Json(json!([
        {"id": 7, "name": "Sam", "nickname": "Sammy", "date_created": "Tue, 14 Oct 2025 10:00:00 GMT"},
        {"id": 8, "name": "Robin", "nickname": null},
    ]))
}

async fn gyms() -> Json<Value> {
    Json(json!([
        {"id": 3, "name": "Boulder Barn"},
        {"id": 4, "name": "Vertical World"},
        {"id": 5, "name": "Closed For Renovation"},
    ]))
}

async fn areas(Path(gym_id): Path<u32>) -> Result<Json<Value>, StatusCode> {
    match gym_id {
        3 => Ok(Json(json!([
            {"id": 12, "climb_type": "Ropes", "name": "Main Hall"},
            {"id": 13, "climb_type": "Bouldering", "name": "The Cave"},
        ]))),
        4 => Ok(Json(json!([
            {"id": 20, "climb_type": "Bouldering", "name": "Annex"},
        ]))),
        _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

async fn walls(Path(area_id): Path<u32>) -> Json<Value> {
    match area_id {
        12 => Json(json!([
            {"id": 45, "wall_name": "North Face", "wall_number": 1},
            {"id": 46, "wall_name": "North Face", "wall_number": 2},
            {"id": 47, "wall_name": "Arete", "wall_number": 1},
        ])),
        _ => Json(json!([
            {"id": 50, "wall_name": "Slab", "wall_number": null},
            {"id": 51, "wall_name": "Roof", "wall_number": null},
        ])),
    }
}

async fn grades(Path(area_id): Path<u32>) -> Json<Value> {
    match area_id {
        12 => Json(json!([
            {"id": 1, "climb_type": "Ropes", "grade": "18"},
            {"id": 2, "climb_type": "Ropes", "grade": "19"},
        ])),
        _ => Json(json!([
            {"id": 3, "climb_type": "Bouldering", "grade": "Blue"},
            {"id": 4, "climb_type": "Bouldering", "grade": "V4"},
        ])),
    }
}

async fn climber_scores(
    State(backend): State<Backend>,
    Path(climber_id): Path<u32>,
) -> Result<Json<Value>, StatusCode> {
    backend.score_fetches.fetch_add(1, Ordering::SeqCst);
    if backend.fail_scores.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let count = backend.submitted.lock().unwrap().len();

    let scores: Vec<Value> = (0..count)
        .map(|i| json!({"id": i + 1, "climber_id": climber_id, "grade": "V4", "completed": true, "attempts": 1}))
        .collect();

    Ok(Json(json!({
        "climber": {"id": climber_id, "name": "Sam"},
        "scores": scores,
    })))
}

async fn delete_score(
    State(backend): State<Backend>,
    Path(score_id): Path<usize>,
) -> (StatusCode, Json<Value>) {
    let mut submitted = backend.submitted.lock().unwrap();

    if score_id == 0 || score_id > submitted.len() {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Score not found"})));
    }

    submitted.remove(score_id - 1);
    (StatusCode::OK, Json(json!({"message": "Score deleted successfully"})))
}

async fn all_scores(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    *backend.feed_limit.lock().unwrap() = params.get("limit").cloned();

    Json(json!([
        {"id": 1, "climber_id": 7, "climber_name": "Sam", "gym_name": "Boulder Barn",
         "gym_area_name": "The Cave", "wall_name": "Roof", "grade": "Red",
         "completed": true, "attempts": 2, "date_recorded": "2025-10-14T16:00:00Z"},
        {"id": 2, "climber_id": 8, "grade": "Blue", "completed": false, "attempts": 5,
         "date_recorded": "2025-10-14T17:00:00Z"},
    ]))
}

async fn submit(
    State(backend): State<Backend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if backend.reject_submits.load(Ordering::SeqCst) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Climber ID, route ID, completed status, and attempts are required"})),
        );
    }

    backend.submitted.lock().unwrap().push(body);
    (
        StatusCode::CREATED,
        Json(json!({"message": "Score recorded successfully"})),
    )
}

async fn spawn(backend: Backend) -> ApiClient {
    let app = Router::new()
        .route("/api/climbers", get(climbers))
        .route("/api/gyms", get(gyms))
        .route("/api/gym/{gym_id}/areas", get(areas))
        .route("/api/gym_area/{area_id}/walls", get(walls))
        .route("/api/gym_area/{area_id}/grades", get(grades))
        .route("/api/scores/climber/{climber_id}", get(climber_scores))
        .route("/api/scores", get(all_scores).post(submit))
        .route("/api/scores/{score_id}", axum::routing::delete(delete_score))
        .route(
            "/api/stats/climber/{climber_id}/last_30_days_metrics",
            get(|| async {
                Json(json!({
                    "totalClimbs": 2,
                    "totalPoints": "70.00",
                    "totalDaysClimbed": 1,
                    "dailyAvgClimbsCompleted": "2.00",
                    "latestAndGreatestClimb": {
                        "gym_name": "Boulder Barn", "gym_area_name": "The Cave", "wall_name": "Roof",
                        "grade": "Red", "attempts": 4, "date_recorded": "Tue, 14 Oct 2025 10:00:00 GMT"
                    }
                }))
            }),
        )
        .route(
            "/api/stats/climber/{climber_id}/last_30_days_daily_summary",
            get(|| async { Json(json!([{"date": "Tue, 14 Oct 2025 00:00:00 GMT", "total_climbs": 2, "total_score": 70}])) }),
        )
        .route(
            "/api/stats/climber/{climber_id}/last_30_days_data",
            get(|| async {
                Json(json!([
                    {"grade": "Red", "climb_type": "Bouldering", "score": 50, "completed": true, "attempts": 4},
                    {"grade": "18", "climb_type": "Ropes", "score": "20.00", "completed": true, "attempts": 1},
                ]))
            }),
        )
        .route(
            "/api/stats/climber/{climber_id}/avg_grade_last_60_days",
            get(|| async {
                Json(json!([
                    {"climber_id": 7, "climb_type": "All", "avg_grade": "Green", "perc_to_next_grade": 0.3},
                    {"climber_id": 7, "climb_type": "Bouldering", "avg_grade": "Red", "perc_to_next_grade": "0.75"},
                ]))
            }),
        )
        .with_state(backend);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ApiClient::new(&Config {
        api_url: format!("http://{address}"),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

async fn session_at_rope(backend: Backend) -> Session {
    let mut session = Session::new(spawn(backend).await);

    session.load(Some(7)).await.unwrap();
    session.select(Action::SelectGym(3)).await.unwrap();
    session.select(Action::SelectArea(12)).await.unwrap();
    session
        .select(Action::SelectWallGroup("North Face".to_string()))
        .await
        .unwrap();

    let rope = session.selector().rope_by_number(2).unwrap();
    session.select(Action::SelectRope(rope)).await.unwrap();

    session
}

#[tokio::test]
async fn test_full_flow_and_retention() {
    let backend = Backend::default();
    let mut session = session_at_rope(backend.clone()).await;

    assert_eq!(session.climber().unwrap().display_name(), "Sammy");
    assert_eq!(session.selector().wall_groups(), ["North Face", "Arete"]);
    assert_eq!(session.selector().grades().len(), 2);

    session
        .select(Action::SelectGrade("19".to_string()))
        .await
        .unwrap();
    session.select(Action::SetAttempts(3)).await.unwrap();
    session
        .select(Action::SetNotes("pumped".to_string()))
        .await
        .unwrap();

    let fetches_before = backend.score_fetches.load(Ordering::SeqCst);
    session.submit().await.unwrap();

    assert_eq!(
        backend.submitted.lock().unwrap()[0],
        json!({
            "climber_id": 7,
            "gym_id": 3,
            "gym_area_id": 12,
            "wall_id": 46,
            "grade": "19",
            "completed": true,
            "attempts": 3,
            "notes": "pumped",
        })
    );

    assert_eq!(backend.score_fetches.load(Ordering::SeqCst), fetches_before + 1);
    assert_eq!(session.scores().len(), 1);

    let selector = session.selector();
    assert_eq!(selector.stage(), Stage::Submitted);
    assert_eq!(selector.climber_id(), Some(7));
    assert_eq!(selector.gym_id(), Some(3));
    assert_eq!(selector.gym_area_id(), Some(12));
    assert_eq!(selector.wall_id(), Some(46));
    assert_eq!(selector.grade(), None);
    assert_eq!(selector.details().attempts, 1);
    assert_eq!(selector.details().notes, "");
    assert!(session.error().is_none());
}

#[tokio::test]
async fn test_failed_submit_is_not_destructive() {
    let backend = Backend::default();
    let mut session = session_at_rope(backend.clone()).await;

    session
        .select(Action::SelectGrade("18".to_string()))
        .await
        .unwrap();
    session.select(Action::SetCompleted(false)).await.unwrap();

    backend.reject_submits.store(true, Ordering::SeqCst);
    let before = session.selector().clone();
    let payload = session.pending_submission().unwrap();

    let err = session.submit().await.unwrap_err();

    assert!(matches!(err, SessionError::Submit(ref message) if message == SUBMIT_FAILED));
    assert_eq!(session.error(), Some(SUBMIT_FAILED));
    assert_eq!(session.selector(), &before);
    assert_eq!(session.pending_submission(), Some(payload));
    assert_eq!(session.selector().stage(), Stage::GradeChosen);

    backend.reject_submits.store(false, Ordering::SeqCst);
    session.submit().await.unwrap();
    assert_eq!(backend.submitted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_late_areas_do_not_leak_into_new_gym() {
    let mut session = Session::new(spawn(Backend::default()).await);
    session.load(Some(7)).await.unwrap();

    let first = session.dispatch(Action::SelectGym(3)).unwrap().unwrap();
    let second = session.dispatch(Action::SelectGym(4)).unwrap().unwrap();
    assert!(matches!(first, Fetch::Areas { gym_id: 3, .. }));

    let api = session.api().clone();
    let (late, fresh) = tokio::join!(first.run(&api), second.run(&api));

    session.deliver(fresh).unwrap();
    session.deliver(late).unwrap();

    let areas: Vec<u32> = session.selector().areas().iter().map(|a| a.id).collect();
    assert_eq!(areas, [20]);
    assert_eq!(session.selector().gym_id(), Some(4));
}

#[tokio::test]
async fn test_area_failure_keeps_gym_choice() {
    let mut session = Session::new(spawn(Backend::default()).await);
    session.load(Some(8)).await.unwrap();

    let err = session.select(Action::SelectGym(5)).await.unwrap_err();

    assert!(matches!(err, SessionError::Fetch(ref message) if message == AREAS_FAILED));
    assert_eq!(session.error(), Some(AREAS_FAILED));
    assert_eq!(session.selector().climber_id(), Some(8));
    assert_eq!(session.selector().gym_id(), Some(5));
    assert!(session.selector().areas().is_empty());

    session.select(Action::SelectGym(3)).await.unwrap();
    assert!(session.error().is_none());
    assert_eq!(session.selector().areas().len(), 2);
}

#[tokio::test]
async fn test_unknown_climber() {
    let mut session = Session::new(spawn(Backend::default()).await);

    let err = session.load(Some(99)).await.unwrap_err();

    assert!(matches!(err, SessionError::Fetch(ref message) if message == CLIMBER_NOT_FOUND));
    assert_eq!(session.selector().stage(), Stage::NoClimber);
    assert_eq!(session.climbers().len(), 2);
    assert_eq!(session.selector().gyms().len(), 3);
}

#[tokio::test]
async fn test_change_climber_discards_form() {
    let mut session = session_at_rope(Backend::default()).await;

    session.choose_climber(8).await.unwrap();
    assert_eq!(session.selector().stage(), Stage::ClimberChosen);
    assert_eq!(session.climber().unwrap().display_name(), "Robin");

    session.change_climber().unwrap();
    assert!(session.climber().is_none());
    assert!(session.scores().is_empty());
    assert_eq!(session.selector().stage(), Stage::NoClimber);
}

#[tokio::test]
async fn test_dashboard() {
    let api = spawn(Backend::default()).await;

    let dashboard = Dashboard::load(&api, 7).await.unwrap();

    assert_eq!(dashboard.metrics.total_points, Some(70.0));
    assert_eq!(
        dashboard
            .metrics
            .latest_and_greatest_climb
            .as_ref()
            .map(|climb| climb.grade.as_str()),
        Some("Red")
    );
    assert_eq!(dashboard.daily.len(), 1);
    assert_eq!(dashboard.bouldering[0].grade, "Red");
    assert_eq!(dashboard.ropes[0].score, 20.0);
    assert_eq!(dashboard.gauges.bouldering.as_ref().unwrap().value, 75.0);
    assert!(dashboard.gauges.ropes.is_none());
}

#[tokio::test]
async fn test_failed_score_log_is_reported() {
    let backend = Backend::default();
    backend.fail_scores.store(true, Ordering::SeqCst);
    let mut session = Session::new(spawn(backend).await);

    let err = session.load(Some(7)).await.unwrap_err();

    assert!(matches!(err, SessionError::Fetch(ref message) if message == SCORES_FAILED));
    assert_eq!(session.error(), Some(SCORES_FAILED));
    assert_eq!(session.selector().climber_id(), Some(7));
    assert!(session.scores().is_empty());
}

#[tokio::test]
async fn test_submit_survives_failed_refetch() {
    let backend = Backend::default();
    let mut session = session_at_rope(backend.clone()).await;
    session
        .select(Action::SelectGrade("18".to_string()))
        .await
        .unwrap();

    backend.fail_scores.store(true, Ordering::SeqCst);
    session.submit().await.unwrap();

    assert_eq!(backend.submitted.lock().unwrap().len(), 1);
    assert_eq!(session.selector().stage(), Stage::Submitted);
    assert_eq!(session.error(), Some(SCORES_FAILED));
}

#[tokio::test]
async fn test_delete_score_refetches_log() {
    let backend = Backend::default();
    let mut session = session_at_rope(backend.clone()).await;

    for grade in ["18", "19"] {
        session
            .select(Action::SelectGrade(grade.to_string()))
            .await
            .unwrap();
        session.submit().await.unwrap();
    }
    assert_eq!(session.scores().len(), 2);

    let fetches_before = backend.score_fetches.load(Ordering::SeqCst);
    session.delete_score(1).await.unwrap();

    assert_eq!(backend.score_fetches.load(Ordering::SeqCst), fetches_before + 1);
    assert_eq!(session.scores().len(), 1);
    assert!(session.error().is_none());

    let err = session.delete_score(404).await.unwrap_err();
    assert!(matches!(err, SessionError::Submit(ref message) if message == DELETE_FAILED));
    assert_eq!(session.error(), Some(DELETE_FAILED));
    assert_eq!(session.scores().len(), 1);

    session.delete_score(1).await.unwrap();
    assert!(session.error().is_none());
    assert!(session.scores().is_empty());
}

#[tokio::test]
async fn test_delete_score_needs_climber() {
    let backend = Backend::default();
    let mut session = Session::new(spawn(backend.clone()).await);
    session.load(None).await.unwrap();

    let err = session.delete_score(1).await.unwrap_err();

    assert!(matches!(err, SessionError::Select(SelectError::Missing("climber"))));
    assert_eq!(session.error(), Some("Choose a climber first"));
    assert_eq!(backend.score_fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_recent_feed_with_unbounded_limit() {
    let backend = Backend::default();
    let api = spawn(backend.clone()).await;
    let now = Utc.with_ymd_and_hms(2025, 10, 14, 18, 0, 0).unwrap();

    let feed = load_recent_activity(&api, usize::MAX, now).await.unwrap();

    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].climber, "Sam");
    assert_eq!(feed[0].route, "Boulder Barn - The Cave - Roof");
    assert_eq!(feed[0].time_ago, "2h ago");
    assert_eq!(
        backend.feed_limit.lock().unwrap().as_deref(),
        Some(usize::MAX.to_string().as_str())
    );
}
