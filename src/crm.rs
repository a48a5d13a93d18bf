//! # Continual Reassessment Method
//!
//! One Bayesian update of the one-parameter CRM (O'Quigley, Pepe and Fisher, 1990) followed by the
//! choice of the next dose level.
//!
//! ```text
//! priors ──(a0, b0)──▶ dose coordinates
//!                          │
//! patients ────────────────┤
//!                          ▼
//!       ∫ exp(-a) L(a) da   and   ∫ a exp(-a) L(a) da   over [0, ∞)
//!                          │
//!                          ▼
//!              posterior mean â = ratio
//!                          │
//!                          ▼
//!      next level = argmin_j |target - p(â, dose_j)|   (lowest level on ties)
//! ```
//!
//! The dose coordinates are computed once from the initial guess `a0` (and the intercept `b0` for
//! the logistic model). They are not recomputed from the posterior mean: the fitted probabilities
//! of the final step are evaluated at â on the same coordinates.
//!
//! # Example
//!
//! ```rust
//! # fn main() -> Result<(), crmcore::error::CrmError> {
//! // Logistic model (2), target 30%, one patient treated at level 1 without toxicity
//! let recommendation = crmcore::crm(2, 0.3, &[0.1, 0.2, 0.3, 0.4, 0.5], 1.0, 3.0, &[1], &[0])?;
//! assert!((1..=5).contains(&recommendation.next_level()));
//! assert!(recommendation.posterior_mean() > 0.0);
//! # Ok(())
//! # }
//! ```

use eyre::WrapErr;
use serde::{Deserialize, Serialize};

use crate::error::{CrmError, Result};
use crate::model::{Model, ModelKind, DEFAULT_INTERCEPT};
use crate::routines::likelihood::Posterior;
use crate::routines::quadrature::{Quadrature, QuadratureResult};
use crate::routines::selection::{closest_level, distances};
use crate::routines::settings::IntegrationSettings;
use crate::structs::grid::DoseGrid;
use crate::structs::patients::Patients;

/// A validated CRM problem: working model, dose levels and observed patients
#[derive(Debug, Clone)]
pub struct Trial {
    model: Model,
    target: f64,
    a0: f64,
    grid: DoseGrid,
    patients: Patients,
}

/// Patient entry of a trial file
#[derive(Debug, Deserialize)]
struct PatientEntry {
    level: i32,
    toxicity: i32,
}

/// On-disk layout of a trial
#[derive(Debug, Deserialize)]
struct TrialFile {
    model: ModelKind,
    target: f64,
    priors: Vec<f64>,
    a0: f64,
    #[serde(default = "default_intercept")]
    b0: f64,
    #[serde(default)]
    patients: Vec<PatientEntry>,
}

fn default_intercept() -> f64 {
    DEFAULT_INTERCEPT
}

impl Trial {
    /// Validate the inputs and compute the dose coordinates
    ///
    /// `b0` is only used, and only checked, by the logistic model.
    pub fn new(
        kind: ModelKind,
        target: f64,
        priors: &[f64],
        a0: f64,
        b0: f64,
        patients: Patients,
    ) -> Result<Self> {
        if priors.is_empty() {
            return Err(CrmError::input(
                "Prior probabilities were not initialized: no dose levels supplied",
            ));
        }
        if patients.is_empty() {
            return Err(CrmError::input(
                "Historical data were not initialized: no patients supplied",
            ));
        }
        if !target.is_finite() || target <= 0.0 || target >= 1.0 {
            return Err(CrmError::input(format!(
                "Target toxicity rate must lie strictly between 0 and 1, got {}",
                target
            )));
        }
        if kind == ModelKind::Logistic && !b0.is_finite() {
            return Err(CrmError::input(format!(
                "Intercept must be finite, got {}",
                b0
            )));
        }

        let model = kind.with_intercept(b0);
        let grid = DoseGrid::new(&model, priors, a0)?;
        patients.check_levels(grid.len())?;

        tracing::debug!(
            "Dose coordinates for the {} model at a0 = {}: {:?}",
            kind,
            a0,
            grid.doses().to_vec()
        );

        Ok(Trial {
            model,
            target,
            a0,
            grid,
            patients,
        })
    }

    /// Read a trial from a TOML file
    ///
    /// ```toml
    /// model = "logistic"
    /// target = 0.3
    /// priors = [0.1, 0.2, 0.3, 0.4, 0.5]
    /// a0 = 1.0
    /// b0 = 3.0
    ///
    /// [[patients]]
    /// level = 1
    /// toxicity = 0
    /// ```
    pub fn read(path: &str) -> eyre::Result<Trial> {
        let parsed = config::Config::builder()
            .add_source(config::File::with_name(path).format(config::FileFormat::Toml))
            .build()
            .wrap_err_with(|| format!("Failed to read trial from {}", path))?;
        let file: TrialFile = parsed
            .try_deserialize()
            .wrap_err_with(|| format!("Invalid trial description in {}", path))?;

        let (levels, outcomes): (Vec<i32>, Vec<i32>) = file
            .patients
            .iter()
            .map(|entry| (entry.level, entry.toxicity))
            .unzip();
        let patients = Patients::from_columns(&levels, &outcomes)?;
        let trial = Trial::new(
            file.model,
            file.target,
            &file.priors,
            file.a0,
            file.b0,
            patients,
        )?;
        Ok(trial)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Initial parameter guess used to place the dose coordinates
    pub fn a0(&self) -> f64 {
        self.a0
    }

    pub fn grid(&self) -> &DoseGrid {
        &self.grid
    }

    pub fn patients(&self) -> &Patients {
        &self.patients
    }

    /// Compute the posterior mean and the next dose level
    pub fn recommend(&self, settings: &IntegrationSettings) -> Result<Recommendation> {
        recommend(self, settings)
    }
}

/// Summary of one dose level after the update
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DoseLevel {
    /// 1-based dose level
    pub level: usize,
    pub prior: f64,
    pub dose: f64,
    /// Toxicity probability at the posterior mean
    pub probability: f64,
    /// Absolute distance between `probability` and the target rate
    pub distance: f64,
}

/// Result of a CRM update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    model: ModelKind,
    target: f64,
    next_level: usize,
    posterior_mean: f64,
    levels: Vec<DoseLevel>,
    normalizer: QuadratureResult,
    first_moment: QuadratureResult,
}

impl Recommendation {
    /// 1-based dose level recommended for the next patient
    pub fn next_level(&self) -> usize {
        self.next_level
    }

    pub fn posterior_mean(&self) -> f64 {
        self.posterior_mean
    }

    pub fn model(&self) -> ModelKind {
        self.model
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn levels(&self) -> &[DoseLevel] {
        &self.levels
    }

    /// `∫ exp(-a) L(a) da`
    pub fn normalizer(&self) -> &QuadratureResult {
        &self.normalizer
    }

    /// `∫ a exp(-a) L(a) da`
    pub fn first_moment(&self) -> &QuadratureResult {
        &self.first_moment
    }
}

/// Compute the posterior mean of `a` and the dose level closest to the target
pub fn recommend(trial: &Trial, settings: &IntegrationSettings) -> Result<Recommendation> {
    let quadrature = Quadrature::from(settings);
    let posterior = Posterior::new(&trial.model, &trial.grid, &trial.patients)?;

    let normalizer = quadrature
        .integrate(0.0, |a| posterior.density(a))
        .map_err(|err| {
            CrmError::Numerical(format!("Posterior normalizing integral failed: {}", err))
        })?;
    let first_moment = quadrature
        .integrate(0.0, |a| posterior.first_moment(a))
        .map_err(|err| CrmError::Numerical(format!("Posterior first moment failed: {}", err)))?;

    tracing::debug!(
        "Normalizing integral {:.6e} (error {:.2e}, {} evaluations), first moment {:.6e} (error {:.2e}, {} evaluations)",
        normalizer.value,
        normalizer.abserr,
        normalizer.evaluations,
        first_moment.value,
        first_moment.abserr,
        first_moment.evaluations
    );

    if !normalizer.value.is_finite() || normalizer.value <= 0.0 {
        return Err(CrmError::Numerical(format!(
            "Posterior normalizing integral must be positive, got {}",
            normalizer.value
        )));
    }
    let posterior_mean = first_moment.value / normalizer.value;
    if !posterior_mean.is_finite() {
        return Err(CrmError::Numerical(format!(
            "Posterior mean is not finite ({})",
            posterior_mean
        )));
    }

    let probabilities = trial.grid.probabilities(&trial.model, posterior_mean);
    let deltas = distances(&probabilities, trial.target);
    let index = closest_level(&deltas)
        .ok_or_else(|| CrmError::input("No dose levels to choose from"))?;

    let mut levels = Vec::new();
    levels.try_reserve_exact(trial.grid.len())?;
    for (j, ((&prior, &dose), (&probability, &distance))) in trial
        .grid
        .priors()
        .iter()
        .zip(trial.grid.doses().iter())
        .zip(probabilities.iter().zip(deltas.iter()))
        .enumerate()
    {
        levels.push(DoseLevel {
            level: j + 1,
            prior,
            dose,
            probability,
            distance,
        });
    }

    tracing::debug!(
        "Posterior mean {:.6} gives toxicity probabilities {:?}",
        posterior_mean,
        probabilities.to_vec()
    );

    Ok(Recommendation {
        model: trial.model.kind(),
        target: trial.target,
        next_level: index + 1,
        posterior_mean,
        levels,
        normalizer,
        first_moment,
    })
}

/// Run a CRM update from raw caller arrays
///
/// - `model`: `1` for the hyperbolic tangent model, `2` for the logistic model
/// - `target`: target toxicity rate in (0, 1)
/// - `priors`: prior toxicity probability of each dose level, in (0, 1)
/// - `a0`: initial parameter guess, used only to place the dose coordinates
/// - `b0`: intercept of the logistic model, accepted but unused for the hyperbolic tangent model
/// - `levels`: 1-based dose level of each patient
/// - `outcomes`: toxicity outcome (0 or 1) of each patient, in the same order as `levels`
///
/// Integration uses the default tolerances (relative 1e-7, at most 1000 subintervals).
pub fn crm(
    model: i32,
    target: f64,
    priors: &[f64],
    a0: f64,
    b0: f64,
    levels: &[i32],
    outcomes: &[i32],
) -> Result<Recommendation> {
    let kind = ModelKind::try_from(model)?;
    if priors.is_empty() {
        return Err(CrmError::input(
            "Prior probabilities were not initialized: no dose levels supplied",
        ));
    }
    let patients = Patients::from_columns(levels, outcomes)?;
    let trial = Trial::new(kind, target, priors, a0, b0, patients)?;
    recommend(&trial, &IntegrationSettings::default())
}
