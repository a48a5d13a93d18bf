use ndarray::Array1;

use crate::error::{CrmError, Result};
use crate::model::DoseResponse;

/// The candidate dose levels of a trial
///
/// Holds the prior toxicity probability of each level, and the normalized dose coordinate
/// obtained by inverting the working model at the initial guess `a0`. Coordinates are computed
/// once and reused for every likelihood evaluation and for the final re-evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct DoseGrid {
    priors: Array1<f64>,
    doses: Array1<f64>,
}

impl DoseGrid {
    pub fn new<M: DoseResponse>(model: &M, priors: &[f64], a0: f64) -> Result<Self> {
        if priors.is_empty() {
            return Err(CrmError::input(
                "Prior probabilities were not initialized: no dose levels supplied",
            ));
        }
        if !a0.is_finite() {
            return Err(CrmError::input(format!(
                "The initial parameter guess must be finite, got {}",
                a0
            )));
        }
        if let Some((i, p)) = priors
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || **p <= 0.0 || **p >= 1.0)
        {
            return Err(CrmError::input(format!(
                "Prior probability of dose level {} must lie strictly between 0 and 1, got {}",
                i + 1,
                p
            )));
        }

        let mut prior_buf: Vec<f64> = Vec::new();
        prior_buf.try_reserve_exact(priors.len())?;
        prior_buf.extend_from_slice(priors);

        let mut dose_buf: Vec<f64> = Vec::new();
        dose_buf.try_reserve_exact(priors.len())?;
        for (i, &p) in priors.iter().enumerate() {
            let dose = model.dose_from_probability(p, a0);
            if !dose.is_finite() {
                return Err(CrmError::input(format!(
                    "Dose level {} maps to a non-finite dose coordinate ({})",
                    i + 1,
                    dose
                )));
            }
            dose_buf.push(dose);
        }

        Ok(DoseGrid {
            priors: Array1::from_vec(prior_buf),
            doses: Array1::from_vec(dose_buf),
        })
    }

    /// Number of dose levels
    pub fn len(&self) -> usize {
        self.priors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priors.is_empty()
    }

    pub fn priors(&self) -> &Array1<f64> {
        &self.priors
    }

    pub fn doses(&self) -> &Array1<f64> {
        &self.doses
    }

    /// Dose coordinate of a 1-based dose level
    pub fn dose(&self, level: usize) -> Option<f64> {
        level.checked_sub(1).and_then(|i| self.doses.get(i)).copied()
    }

    /// Model probability of every level for parameter `a`
    pub fn probabilities<M: DoseResponse>(&self, model: &M, a: f64) -> Array1<f64> {
        self.doses.mapv(|dose| model.probability(a, dose))
    }
}
