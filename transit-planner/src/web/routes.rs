//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::domain::{Costs, NetworkError};
use crate::planner::{Criterion, RouteFinder, RouteResult};
use crate::preferences::{PreferenceProfile, template, template_names, validate_weights};
use crate::store::{ConnectionRecord, LocationRecord};

use super::dto::*;
use super::state::AppState;

/// Alternatives returned when a request does not say how many.
const DEFAULT_ALTERNATIVES: usize = 3;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/network", get(network_summary))
        .route("/locations", get(list_locations).post(add_location))
        .route("/locations/:name", put(update_location).delete(remove_location))
        .route(
            "/connections",
            get(list_connections)
                .post(add_connection)
                .put(update_connection)
                .delete(remove_connection),
        )
        .route("/route", get(get_route))
        .route("/route/preferences", post(route_with_preferences))
        .route("/route/alternatives", get(route_alternatives))
        .route("/preferences/evaluate", post(evaluate_preferences))
        .route("/preferences/templates/:name", get(preference_template))
        .route("/preferences/questions", get(preference_questions))
        .route("/history", get(route_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn network_summary(State(state): State<AppState>) -> Json<NetworkSummary> {
    let network = state.network.read().await;
    Json(NetworkSummary {
        locations: network.location_count(),
        connections: network.connection_count(),
        connected: network.is_connected(),
    })
}

// Locations

async fn list_locations(State(state): State<AppState>) -> Json<Vec<LocationRecord>> {
    let network = state.network.read().await;
    Json(network.locations().map(LocationRecord::from).collect())
}

async fn add_location(
    State(state): State<AppState>,
    Json(req): Json<AddLocationRequest>,
) -> Result<(StatusCode, Json<LocationRecord>), AppError> {
    let mut network = state.network.write().await;
    network.add_location(&req.name, req.latitude, req.longitude, req.category.as_deref())?;

    let record = location_record(&network, &req.name)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_location(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<UpdateLocationRequest>,
) -> Result<Json<LocationRecord>, AppError> {
    let mut network = state.network.write().await;
    network.update_location(&name, req.latitude, req.longitude, req.category.as_deref())?;
    if let Some(active) = req.active {
        network.set_location_active(&name, active)?;
    }

    Ok(Json(location_record(&network, &name)?))
}

async fn remove_location(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    state.network.write().await.remove_location(&name)?;
    Ok(StatusCode::NO_CONTENT)
}

fn location_record(network: &crate::network::Network, name: &str) -> Result<LocationRecord, AppError> {
    network
        .location(name)
        .map(LocationRecord::from)
        .ok_or_else(|| NetworkError::UnknownLocation(name.to_string()).into())
}

// Connections

async fn list_connections(
    State(state): State<AppState>,
    Query(filter): Query<ConnectionFilter>,
) -> Result<Json<Vec<ConnectionRecord>>, AppError> {
    let network = state.network.read().await;

    let records = match filter.source {
        Some(source) => {
            if !network.has_location(&source) {
                return Err(NetworkError::UnknownLocation(source).into());
            }
            network
                .outgoing_connections(&source)
                .iter()
                .map(ConnectionRecord::from)
                .collect()
        }
        None => network.all_connections().map(ConnectionRecord::from).collect(),
    };

    Ok(Json(records))
}

async fn add_connection(
    State(state): State<AppState>,
    Json(req): Json<ConnectionRecord>,
) -> Result<(StatusCode, Json<ConnectionRecord>), AppError> {
    let costs = Costs::new(req.distance, req.time, req.cost, req.transfers)?;
    state
        .network
        .write()
        .await
        .add_connection(&req.source, &req.destination, costs, &req.transport_mode)?;
    Ok((StatusCode::CREATED, Json(req)))
}

async fn update_connection(
    State(state): State<AppState>,
    Json(req): Json<ConnectionRecord>,
) -> Result<Json<ConnectionRecord>, AppError> {
    let costs = Costs::new(req.distance, req.time, req.cost, req.transfers)?;
    state
        .network
        .write()
        .await
        .update_connection(&req.source, &req.destination, costs, &req.transport_mode)?;
    Ok(Json(req))
}

async fn remove_connection(
    State(state): State<AppState>,
    Query(key): Query<ConnectionKey>,
) -> Result<StatusCode, AppError> {
    state
        .network
        .write()
        .await
        .remove_connection(&key.source, &key.destination)?;
    Ok(StatusCode::NO_CONTENT)
}

// Routes

async fn get_route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Json<RouteResult> {
    let criterion = Criterion::resolve(
        query
            .criterion
            .as_deref()
            .unwrap_or(&state.config.default_criterion),
    );

    let result = {
        let network = state.network.read().await;
        RouteFinder::new(&network).find_route(&query.origin, &query.destination, &criterion)
    };

    state.history.lock().await.record(result.clone());
    Json(result)
}

async fn route_with_preferences(
    State(state): State<AppState>,
    Json(req): Json<PreferenceRouteRequest>,
) -> Json<PreferenceRouteResponse> {
    let profile = match (req.profile, req.answers, req.template) {
        (Some(profile), _, _) => profile,
        (None, Some(answers), _) => state.tree.evaluate(&answers),
        (None, None, Some(name)) => template(&name),
        (None, None, None) => PreferenceProfile::balanced(),
    };

    if !validate_weights(&profile) {
        debug!(weight_sum = profile.weight_sum(), "routing with unvalidated weights");
    }

    let route = {
        let network = state.network.read().await;
        RouteFinder::new(&network).find_route_with_profile(&req.origin, &req.destination, &profile)
    };

    state.history.lock().await.record(route.clone());
    Json(PreferenceRouteResponse { route, profile })
}

async fn route_alternatives(
    State(state): State<AppState>,
    Query(query): Query<AlternativesQuery>,
) -> Json<AlternativesResponse> {
    let max = query.max.unwrap_or(DEFAULT_ALTERNATIVES);
    let network = state.network.read().await;
    let routes = RouteFinder::new(&network).alternatives(&query.origin, &query.destination, max);
    Json(AlternativesResponse { routes })
}

// Preferences

async fn evaluate_preferences(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Json<EvaluateResponse> {
    let (label, profile) = match state.tree.decide(&req.answers) {
        Some(decision) => (Some(decision.label.to_string()), decision.profile.clone()),
        None => (None, PreferenceProfile::balanced()),
    };
    let valid = validate_weights(&profile);

    Json(EvaluateResponse {
        label,
        profile,
        valid,
    })
}

async fn preference_template(Path(name): Path<String>) -> Result<Json<TemplateResponse>, AppError> {
    if !template_names().contains(&name.as_str()) {
        return Err(AppError::NotFound {
            message: format!("no preference template named {name}"),
        });
    }
    let profile = template(&name);
    Ok(Json(TemplateResponse { name, profile }))
}

async fn preference_questions(State(state): State<AppState>) -> Json<QuestionsResponse> {
    let questions = state
        .tree
        .questions()
        .into_iter()
        .map(|(attribute, question)| QuestionResult {
            attribute: attribute.to_string(),
            question: question.to_string(),
        })
        .collect();
    Json(QuestionsResponse { questions })
}

async fn route_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let history = state.history.lock().await;
    Json(HistoryResponse {
        entries: history.entries().cloned().collect(),
        stats: history.statistics(),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
}

impl From<NetworkError> for AppError {
    fn from(e: NetworkError) -> Self {
        match e {
            NetworkError::UnknownLocation(_) | NetworkError::UnknownConnection { .. } => {
                AppError::NotFound {
                    message: e.to_string(),
                }
            }
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
