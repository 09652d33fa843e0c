//! # Sends Scoring
//!
//! Client-side logic of the score-entry page and the climber dashboard.
//!
//! - [`selector`]: pure state machine for climber → gym → area → wall → grade.
//! - [`session`]: drives the selector against the REST client and keeps the
//!   user-visible error.
//! - [`grades`]: grade colour bands and ordering.
//! - [`dashboard`], [`feed`]: view models for statistics and recent sends.
pub mod dashboard;
pub mod feed;
pub mod grades;
pub mod selector;
pub mod session;

pub use selector::{Action, Fetch, SelectError, Selector, Stage};
pub use session::{Loaded, Session, SessionError};
