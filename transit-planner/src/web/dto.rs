//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::planner::{HistoryEntry, HistoryStats, RouteResult};
use crate::preferences::{Answers, PreferenceProfile};

/// Request to add a location.
#[derive(Debug, Deserialize)]
pub struct AddLocationRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Free-form classification (e.g. "station", "stop")
    pub category: Option<String>,
}

/// Request to update a location named in the path.
#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub category: Option<String>,
    /// Set the active flag as well, if present
    pub active: Option<bool>,
}

/// Query for listing connections.
#[derive(Debug, Deserialize)]
pub struct ConnectionFilter {
    /// Only list connections leaving this location
    pub source: Option<String>,
}

/// Identifies one connection by its ordered endpoints.
#[derive(Debug, Deserialize)]
pub struct ConnectionKey {
    pub source: String,
    pub destination: String,
}

/// Query for a single route.
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,
    /// "distance", "time", "fare"/"cost" or "transfers"; unknown names mean time
    pub criterion: Option<String>,
}

/// Request for a route under a preference profile.
///
/// The profile is taken from the first of `profile`, `answers` and `template`
/// that is present, falling back to the balanced profile.
#[derive(Debug, Deserialize)]
pub struct PreferenceRouteRequest {
    pub origin: String,
    pub destination: String,
    pub profile: Option<PreferenceProfile>,
    /// Questionnaire answers evaluated against the decision tree
    pub answers: Option<Answers>,
    /// Name of a canned profile
    pub template: Option<String>,
}

/// Query for alternative routes.
#[derive(Debug, Deserialize)]
pub struct AlternativesQuery {
    pub origin: String,
    pub destination: String,
    /// Maximum number of routes to return (default 3)
    pub max: Option<usize>,
}

/// Questionnaire answers to evaluate.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub answers: Answers,
}

/// Result of evaluating questionnaire answers.
#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    /// Leaf reached, or `None` if an answer the tree needed was missing
    pub label: Option<String>,
    pub profile: PreferenceProfile,
    /// Whether the profile's weights validate
    pub valid: bool,
}

/// One question of the questionnaire.
#[derive(Debug, Serialize)]
pub struct QuestionResult {
    pub attribute: String,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<QuestionResult>,
}

/// A profile returned with the name it was requested by.
#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub name: String,
    pub profile: PreferenceProfile,
}

/// Route response, also carrying the profile that was applied.
#[derive(Debug, Serialize)]
pub struct PreferenceRouteResponse {
    pub route: RouteResult,
    pub profile: PreferenceProfile,
}

#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    pub routes: Vec<RouteResult>,
}

/// Counts and connectivity of the network.
#[derive(Debug, Serialize)]
pub struct NetworkSummary {
    pub locations: usize,
    pub connections: usize,
    /// Whether every location is reachable from the first by name
    pub connected: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntry>,
    pub stats: HistoryStats,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
