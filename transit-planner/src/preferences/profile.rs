//! Preference profiles and templates.

use serde::{Deserialize, Serialize};

/// How far the weight sum may stray from 1.0 and still validate.
pub const WEIGHT_TOLERANCE: f64 = 0.05;

const TEMPLATES: [&str; 5] = ["fastest", "cheapest", "comfortable", "shortest", "balanced"];

/// Four weights describing how a traveller trades off the cost components.
///
/// Weights are expected to lie in [0, 1] and sum to 1.0 within
/// [`WEIGHT_TOLERANCE`], but the type does not enforce it. Call
/// [`validate_weights`] or [`PreferenceProfile::normalized`] when it matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    pub time_weight: f64,
    pub distance_weight: f64,
    #[serde(alias = "cost_weight")]
    pub fare_weight: f64,
    pub transfer_weight: f64,
    /// Label of the dimension this profile mainly optimises (e.g. "time", "cost").
    pub primary_criterion: String,
}

impl PreferenceProfile {
    pub fn new(
        time_weight: f64,
        distance_weight: f64,
        fare_weight: f64,
        transfer_weight: f64,
        primary_criterion: impl Into<String>,
    ) -> Self {
        Self {
            time_weight,
            distance_weight,
            fare_weight,
            transfer_weight,
            primary_criterion: primary_criterion.into(),
        }
    }

    /// Equal weights of 0.25 with "time" as the primary criterion.
    ///
    /// This is also the profile returned when a questionnaire cannot be
    /// evaluated.
    pub fn balanced() -> Self {
        Self::new(0.25, 0.25, 0.25, 0.25, "time")
    }

    pub fn weight_sum(&self) -> f64 {
        self.time_weight + self.distance_weight + self.fare_weight + self.transfer_weight
    }

    /// Rescale the weights so they sum to exactly 1.0.
    ///
    /// A profile whose weights sum to zero (or less) becomes balanced, keeping
    /// its primary criterion.
    pub fn normalized(&self) -> Self {
        let sum = self.weight_sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Self {
                primary_criterion: self.primary_criterion.clone(),
                ..Self::balanced()
            };
        }
        Self::new(
            self.time_weight / sum,
            self.distance_weight / sum,
            self.fare_weight / sum,
            self.transfer_weight / sum,
            self.primary_criterion.clone(),
        )
    }

    /// Return a copy with one weight replaced.
    ///
    /// `component` is one of "time", "distance", "fare" (or "cost") and
    /// "transfers". Unknown names leave the profile unchanged.
    pub fn with_weight(mut self, component: &str, weight: f64) -> Self {
        match component {
            "time" => self.time_weight = weight,
            "distance" => self.distance_weight = weight,
            "fare" | "cost" => self.fare_weight = weight,
            "transfers" => self.transfer_weight = weight,
            _ => {}
        }
        self
    }
}

impl Default for PreferenceProfile {
    fn default() -> Self {
        Self::balanced()
    }
}

/// Look up a canned profile by name.
///
/// Known names are listed by [`template_names`]. Anything else, including
/// "balanced", yields [`PreferenceProfile::balanced`].
///
/// # Examples
///
/// ```
/// use transit_planner::preferences::template;
///
/// let fastest = template("fastest");
/// assert_eq!(fastest.time_weight, 0.6);
/// assert_eq!(fastest.primary_criterion, "time");
/// ```
pub fn template(name: &str) -> PreferenceProfile {
    match name {
        "fastest" => PreferenceProfile::new(0.6, 0.1, 0.1, 0.2, "time"),
        "cheapest" => PreferenceProfile::new(0.1, 0.1, 0.6, 0.2, "cost"),
        "comfortable" => PreferenceProfile::new(0.2, 0.3, 0.1, 0.4, "transfers"),
        "shortest" => PreferenceProfile::new(0.2, 0.5, 0.1, 0.2, "distance"),
        _ => PreferenceProfile::balanced(),
    }
}

/// Names accepted by [`template`].
pub fn template_names() -> &'static [&'static str] {
    &TEMPLATES
}

/// Check that every weight is non-negative and the sum is 1.0 within
/// [`WEIGHT_TOLERANCE`].
///
/// Advisory only: nothing in the route finder calls this.
pub fn validate_weights(profile: &PreferenceProfile) -> bool {
    let weights = [
        profile.time_weight,
        profile.distance_weight,
        profile.fare_weight,
        profile.transfer_weight,
    ];
    if weights.iter().any(|w| *w < 0.0 || w.is_nan()) {
        return false;
    }
    (profile.weight_sum() - 1.0).abs() <= WEIGHT_TOLERANCE
}
