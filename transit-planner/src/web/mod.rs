//! Web layer for the transit planner.
//!
//! Exposes the network, route finding and the preference questionnaire as a
//! JSON API.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
