//! # Score Entry Flow
//!
//! How a climb gets from the form to the backend.
//!
//! ## Payloads
//!
//! Requests/responses between the client and the REST backend.
//!
//! ### Listings
//! - `GET /api/climbers`, `GET /api/gyms`: bare JSON arrays
//! - `GET /api/gym/{gym_id}/areas`: areas with `climb_type` of `Bouldering` or `Ropes`
//! - `GET /api/gym_area/{gym_area_id}/walls`: wall rows, not deduplicated
//! - `GET /api/gym_area/{gym_area_id}/grades`: grade rows, null grades dropped client side
//! - `GET /api/scores/climber/{climber_id}`: `{"climber": .., "scores": [..]}`
//! - `GET /api/scores?limit=N`: newest scores across all climbers
//!
//! ### Submitting
//! To backend
//! - `POST /api/scores` with `climber_id`, `gym_id`, `gym_area_id`, `wall_id`,
//!   `grade`, `completed`, `attempts`, `notes`
//!
//! From backend
//! - 2xx `{"message": ..}`
//! - 4xx/5xx `{"error": ..}`
//!
//! ### Statistics
//! - `GET /api/stats/climber/{id}/last_30_days_metrics`: camelCase totals, numbers may be strings
//! - `GET /api/stats/climber/{id}/last_30_days_daily_summary`
//! - `GET /api/stats/climber/{id}/last_30_days_data`
//! - `GET /api/stats/climber/{id}/avg_grade_last_60_days`: one row per `All`/`Bouldering`/`Ropes`
//!
//! ## Flow
//!
//! - Load climbers and gyms together, preselect a climber if one was given
//! - Unknown preselected climber is reported as "Climber not found"
//! - Picking a gym fetches its areas
//! - Picking an area fetches walls and grades concurrently
//! - Bouldering: picking a wall name binds the wall id
//! - Ropes: picking a wall name lists its numbered routes, picking a number binds the wall id
//! - Picking a grade makes the form submittable
//! - Submit success clears grade, attempts and notes and keeps everything above
//! - Submit failure keeps the whole form
//!
//! ## Stale Responses
//!
//! - Every fetch carries a ticket
//! - Changing the gym or area issues a new ticket and clears everything below it
//! - A response with an old ticket is dropped without touching state or the error
//!
//! ## Config
//!
//! | Variable | Default |
//! |---|---|
//! | `SENDS_API_URL` | `http://localhost:5000` |
//! | `SENDS_API_TIMEOUT_SECS` | `10` |
//! | `RUST_LOG` | unset |
//!
//! ## Usage
//!
//! ```text
//! sends climbers
//! sends add-climber "Robin" --email robin@example.com --nickname Bird
//! sends log 7 --gym "Boulder Barn" --area Cave --wall Prow --grade V4 --attempts 3
//! sends log 7 --gym 2 --area Lead --wall "North Face" --rope 12 --grade 5.11a --failed
//! sends dashboard 7
//! sends recent --max-items 10
//! ```
