//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::config::AppConfig;
use crate::network::Network;
use crate::planner::RouteHistory;
use crate::preferences::DecisionTree;

/// Shared application state.
///
/// The network allows many concurrent route searches or one mutation at a
/// time.
#[derive(Clone)]
pub struct AppState {
    /// The transport network
    pub network: Arc<RwLock<Network>>,

    /// Questionnaire used to derive preference profiles
    pub tree: Arc<DecisionTree>,

    /// Server configuration
    pub config: Arc<AppConfig>,

    /// Recent route searches
    pub history: Arc<Mutex<RouteHistory>>,
}

impl AppState {
    /// Create a new app state using the standard decision tree.
    pub fn new(network: Network, config: AppConfig) -> Self {
        let history = RouteHistory::new(config.history_capacity);
        Self {
            network: Arc::new(RwLock::new(network)),
            tree: Arc::new(DecisionTree::standard()),
            config: Arc::new(config),
            history: Arc::new(Mutex::new(history)),
        }
    }

    /// Replace the decision tree.
    pub fn with_tree(mut self, tree: DecisionTree) -> Self {
        self.tree = Arc::new(tree);
        self
    }
}
