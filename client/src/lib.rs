//! # Sends Client
//!
//! Typed access to the sends REST backend.
//!
//! The backend owns climbers, gyms, areas, walls, grades and scores. This
//! crate only mirrors its rows and turns every failure into an [`ApiError`]:
//! 4xx answers are validation errors, while network failures, timeouts and
//! 5xx answers are transport errors.
//!
//! ## Configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `SENDS_API_URL` | `http://localhost:5000` |
//! | `SENDS_API_TIMEOUT_SECS` | `10` |
pub mod api;
pub mod config;
pub mod error;
pub mod models;

pub use api::ApiClient;
pub use config::{Config, ConfigError};
pub use error::ApiError;
