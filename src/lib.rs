//! # Sends Documentation
//!
//! Indoor climbing send tracker. Climbers log attempts on gym walls and
//! review points, grade progression and recent activity.
//!
//! ## Crates
//!
//! - `sends-client`: REST client, wire types, environment config
//! - `sends-scoring`: score-entry selector, session driver, dashboard and feed view models
//! - `sends-cli`: `sends` binary
//!
//! ## Notes
//!
//! ### Rope walls
//! - One wall row per numbered route, all sharing a `wall_name`
//! - Wall options are grouped by name, the route is then chosen by number
//!
//! ### Grades
//! - Grade rows are per gym area, not per wall
//! - An area without grades answers with a single null-grade row

pub mod flow;
