//! Posterior integrands for the single CRM parameter
//!
//! The prior on `a` is the standard exponential distribution, with density `exp(-a)` on `a >= 0`.
//! It is folded directly into the integrands:
//!
//! ```text
//! L(a)        = Π_i p_i(a)^{y_i} (1 - p_i(a))^{1 - y_i}
//! density(a)  = exp(-a) L(a)
//! moment(a)   = a exp(-a) L(a)
//! ```
//!
//! so that `∫ moment / ∫ density` over `[0, ∞)` is the posterior mean of `a`.

use crate::error::{CrmError, Result};
use crate::model::DoseResponse;
use crate::structs::grid::DoseGrid;
use crate::structs::patients::Patients;

/// Observed outcomes of a trial, resolved to the dose coordinates of the working model
#[derive(Debug, Clone)]
pub struct Posterior<'a, M: DoseResponse> {
    model: &'a M,
    /// (dose coordinate, toxicity) per patient
    observations: Vec<(f64, bool)>,
}

impl<'a, M: DoseResponse> Posterior<'a, M> {
    pub fn new(model: &'a M, grid: &DoseGrid, patients: &Patients) -> Result<Self> {
        let mut observations = Vec::new();
        observations.try_reserve_exact(patients.len())?;
        for (i, patient) in patients.iter().enumerate() {
            let dose = grid.dose(patient.level()).ok_or_else(|| {
                CrmError::input(format!(
                    "Patient {} has dose level {}, but only {} dose levels are defined",
                    i + 1,
                    patient.level(),
                    grid.len()
                ))
            })?;
            observations.push((dose, patient.toxicity()));
        }
        Ok(Posterior {
            model,
            observations,
        })
    }

    /// Bernoulli likelihood of the observed outcomes for parameter `a`
    pub fn likelihood(&self, a: f64) -> f64 {
        self.observations
            .iter()
            .fold(1.0, |like, &(dose, toxicity)| {
                let p = self.model.probability(a, dose);
                if toxicity {
                    like * p
                } else {
                    like * (1.0 - p)
                }
            })
    }

    /// Unnormalized posterior density of `a`
    pub fn density(&self, a: f64) -> f64 {
        (-a).exp() * self.likelihood(a)
    }

    /// First moment of the unnormalized posterior, `a · density(a)`
    pub fn first_moment(&self, a: f64) -> f64 {
        a * (-a).exp() * self.likelihood(a)
    }
}
