//! Route preferences.
//!
//! Converts either answers to a small questionnaire or a named template into
//! a `PreferenceProfile`: four weights that blend distance, time, fare and
//! transfers into a single edge cost for the route finder.

mod profile;
mod tree;

pub use profile::{
    PreferenceProfile, WEIGHT_TOLERANCE, template, template_names, validate_weights,
};
pub use tree::{
    Answers, BUDGET_CONCERN, COMFORT_PREFERENCE, Decision, DecisionTree, DecisionTreeBuilder,
    NodeId, SPEED_PRIORITY, TIME_IMPORTANCE, TreeError,
};
