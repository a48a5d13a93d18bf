//! Bayesian dose finding with the Continual Reassessment Method
//!
//! `crmcore` performs one update of the one-parameter CRM: given the prior toxicity probability of
//! each candidate dose level, a target toxicity rate and the outcomes observed so far, it computes
//! the posterior mean of the model parameter and recommends the dose level whose fitted toxicity
//! probability is closest to the target.
//!
//! The quickest way in is [crm()], which takes the same arrays a statistical host environment
//! would pass. [Trial] offers the typed equivalent, and [entrypoints::run] drives a full run from
//! a trial file and a settings file.
//!
//! ```rust
//! use crmcore::prelude::*;
//!
//! # fn main() -> Result<(), CrmError> {
//! let patients = Patients::from_columns(&[1, 1, 2], &[0, 0, 1])?;
//! let trial = Trial::new(ModelKind::Tanh, 0.25, &[0.05, 0.1, 0.2, 0.3, 0.5], 1.0, 3.0, patients)?;
//! let recommendation = trial.recommend(&IntegrationSettings::default())?;
//! println!("Next dose level: {}", recommendation.next_level());
//! # Ok(())
//! # }
//! ```

/// Validation, integration and dose selection
pub mod crm;
/// File-driven entrypoints
pub mod entrypoints;
pub mod error;
/// Logging setup
pub mod logger;
/// Dose-toxicity working models
pub mod model;
/// Building blocks of the update
pub mod routines;
/// Dose levels and patients
pub mod structs;

pub use crm::{crm, recommend, Recommendation, Trial};
pub use error::CrmError;

pub mod prelude {
    pub use crate::crm::{crm, recommend, DoseLevel, Recommendation, Trial};
    pub use crate::entrypoints;
    pub use crate::error::CrmError;
    pub use crate::model::{DoseResponse, HyperbolicTangent, Logistic, Model, ModelKind};
    pub use crate::routines::quadrature::{Quadrature, QuadratureError, QuadratureResult};
    pub use crate::routines::settings::{IntegrationSettings, Settings};
    pub use crate::structs::grid::DoseGrid;
    pub use crate::structs::patients::{PatientRecord, Patients};
}
