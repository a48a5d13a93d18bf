//! One-parameter dose-toxicity models
//!
//! A CRM model maps a normalized dose coordinate and the single parameter `a` to a
//! toxicity probability. Two working models are available:
//!
//! - [HyperbolicTangent]: `p(dose) = ((tanh(dose) + 1) / 2)^a`
//! - [Logistic]: `p(dose) = exp(b + a·dose) / (1 + exp(b + a·dose))`, with a fixed intercept `b`
//!
//! Dose coordinates are not observed doses. They are obtained by inverting the model at the
//! initial guess `a0` for every prior toxicity probability, see [DoseResponse::dose_from_probability].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CrmError;

pub mod logistic;
pub mod tanh;

pub use logistic::Logistic;
pub use tanh::HyperbolicTangent;

/// Default intercept for the one-parameter logistic model
pub const DEFAULT_INTERCEPT: f64 = 3.0;

/// Shared capability of the working models
pub trait DoseResponse {
    /// Toxicity probability at `dose` for parameter `a`
    fn probability(&self, a: f64, dose: f64) -> f64;

    /// Dose coordinate whose toxicity probability is `p` when the parameter equals `a0`
    fn dose_from_probability(&self, p: f64, a0: f64) -> f64;
}

/// Selector for the working model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Hyperbolic tangent model, selector `1`
    Tanh,
    /// One-parameter logistic model, selector `2`
    Logistic,
}

impl ModelKind {
    /// Numeric selector used by the raw entrypoint
    pub fn selector(&self) -> i32 {
        match self {
            ModelKind::Tanh => 1,
            ModelKind::Logistic => 2,
        }
    }

    /// Instantiate the model. The intercept is only used by [ModelKind::Logistic].
    pub fn with_intercept(&self, b0: f64) -> Model {
        match self {
            ModelKind::Tanh => Model::Tanh(HyperbolicTangent),
            ModelKind::Logistic => Model::Logistic(Logistic::new(b0)),
        }
    }
}

impl TryFrom<i32> for ModelKind {
    type Error = CrmError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ModelKind::Tanh),
            2 => Ok(ModelKind::Logistic),
            other => Err(CrmError::Configuration(format!(
                "Model must be 1 or 2, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Tanh => write!(f, "hyperbolic tangent"),
            ModelKind::Logistic => write!(f, "logistic"),
        }
    }
}

/// A configured working model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Model {
    Tanh(HyperbolicTangent),
    Logistic(Logistic),
}

impl Model {
    pub fn kind(&self) -> ModelKind {
        match self {
            Model::Tanh(_) => ModelKind::Tanh,
            Model::Logistic(_) => ModelKind::Logistic,
        }
    }
}

impl DoseResponse for Model {
    fn probability(&self, a: f64, dose: f64) -> f64 {
        match self {
            Model::Tanh(m) => m.probability(a, dose),
            Model::Logistic(m) => m.probability(a, dose),
        }
    }

    fn dose_from_probability(&self, p: f64, a0: f64) -> f64 {
        match self {
            Model::Tanh(m) => m.dose_from_probability(p, a0),
            Model::Logistic(m) => m.dose_from_probability(p, a0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_selector() {
        assert_eq!(ModelKind::try_from(1).unwrap(), ModelKind::Tanh);
        assert_eq!(ModelKind::try_from(2).unwrap(), ModelKind::Logistic);
        assert_eq!(ModelKind::Tanh.selector(), 1);
        assert_eq!(ModelKind::Logistic.selector(), 2);
    }

    #[test]
    fn test_invalid_selector() {
        for value in [0, 3, -1] {
            match ModelKind::try_from(value) {
                Err(CrmError::Configuration(msg)) => assert!(msg.contains("Model must be 1 or 2")),
                other => panic!("Expected a configuration error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_intercept_ignored_for_tanh() {
        let a = ModelKind::Tanh.with_intercept(3.0);
        let b = ModelKind::Tanh.with_intercept(-7.5);
        assert_eq!(a, b);
        assert_eq!(a.probability(1.3, 0.4), b.probability(1.3, 0.4));
    }

    #[test]
    fn test_model_dispatch() {
        let model = ModelKind::Logistic.with_intercept(3.0);
        assert_eq!(model.kind(), ModelKind::Logistic);
        assert_eq!(
            model.probability(1.0, -2.0),
            Logistic::new(3.0).probability(1.0, -2.0)
        );
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&ModelKind::Logistic).unwrap();
        assert_eq!(json, "\"logistic\"");
        let kind: ModelKind = serde_json::from_str("\"tanh\"").unwrap();
        assert_eq!(kind, ModelKind::Tanh);
    }
}
