use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::geo::{city_coordinates, DEFAULT_CITY};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Engine tuning. Every section is optional; the defaults are the
/// production scoring rules.
///
/// ```toml
/// [planner]
/// max_stops = 10
///
/// [scoring]
/// cooldown_days = 5
///
/// [geo]
/// default_city = "Longview"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub planner: PlannerConfig,
    pub scoring: ScoringRules,
    pub geo: GeoConfig,
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    pub max_stops: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self { max_stops: 12 }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Weights and windows used by [`crate::score::score_with`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringRules {
    /// Added when the next step is due by tomorrow.
    pub due_boost: i32,
    /// Added for qualified leads.
    pub qualified_boost: i32,
    /// Added for high-priority open leads that have gone stale.
    pub stale_boost: i32,
    /// Subtracted for anything contacted inside the cooldown window.
    pub cooldown_penalty: i32,
    /// Subtracted for routine customer maintenance visits.
    pub customer_penalty: i32,
    /// Scores at or above this are never cooled down or de-prioritized.
    pub protected_score: i32,
    pub high_priority_threshold: i32,
    pub stale_after_days: i64,
    pub cooldown_days: i64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            due_boost: 200,
            qualified_boost: 30,
            stale_boost: 50,
            cooldown_penalty: 500,
            customer_penalty: 50,
            protected_score: 200,
            high_priority_threshold: 80,
            stale_after_days: 30,
            cooldown_days: 7,
        }
    }
}

// ---------------------------------------------------------------------------
// Geo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeoConfig {
    /// City used when none can be inferred, and for unknown cities.
    pub default_city: String,
    /// Total jitter span in degrees; each axis moves by ±half of it.
    pub jitter_degrees: f64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            default_city: DEFAULT_CITY.to_string(),
            jitter_degrees: 0.05,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading + validation
// ---------------------------------------------------------------------------

impl EngineConfig {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let config: EngineConfig =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.planner.max_stops == 0 {
            return Err(EngineError::ConfigValidation(
                "planner.max_stops must be at least 1".into(),
            ));
        }

        let s = &self.scoring;
        if s.cooldown_days < 0 || s.stale_after_days < 0 {
            return Err(EngineError::ConfigValidation(
                "scoring day windows must not be negative".into(),
            ));
        }
        if s.due_boost < 0
            || s.qualified_boost < 0
            || s.stale_boost < 0
            || s.cooldown_penalty < 0
            || s.customer_penalty < 0
        {
            return Err(EngineError::ConfigValidation(
                "scoring boosts and penalties are magnitudes and must not be negative".into(),
            ));
        }

        if !self.geo.jitter_degrees.is_finite() || self.geo.jitter_degrees < 0.0 {
            return Err(EngineError::ConfigValidation(format!(
                "geo.jitter_degrees must be a non-negative number, got {}",
                self.geo.jitter_degrees
            )));
        }
        if city_coordinates(&self.geo.default_city).is_none() {
            return Err(EngineError::ConfigValidation(format!(
                "geo.default_city '{}' is not in the city table",
                self.geo.default_city
            )));
        }

        Ok(())
    }
}
