use crate::crm::{Recommendation, Trial};
use crate::logger;
use crate::routines::settings::Settings;

use eyre::{Result, WrapErr};
use std::time::Instant;

/// Primary entrypoint for crmcore
///
/// Reads the trial description from `trial_path` and the settings from `settings_path` (defaults
/// are used when `None`), computes the next dose level and writes the output files if
/// `output.write` is enabled. See [Trial::read] for the layout of the trial file, and
/// [Settings] for the configuration options.
pub fn run(trial_path: &str, settings_path: Option<&str>) -> Result<Recommendation> {
    let settings = match settings_path {
        Some(path) => Settings::read(path)?,
        None => Settings::default(),
    };
    logger::setup_log(&settings)?;
    let trial = Trial::read(trial_path)?;
    fit(&trial, &settings)
}

/// Compute the recommendation for an already constructed [Trial]
///
/// Does not configure logging. Output files are written if `output.write` is enabled in `settings`.
pub fn fit(trial: &Trial, settings: &Settings) -> Result<Recommendation> {
    let now = Instant::now();
    tracing::info!("Starting crmcore");

    tracing::info!(
        "{} model with {} dose levels, {} patients ({} with toxicity), target toxicity rate {}",
        trial.model().kind(),
        trial.grid().len(),
        trial.patients().len(),
        trial.patients().toxicities(),
        trial.target()
    );

    let recommendation = match trial.recommend(&settings.integration) {
        Ok(recommendation) => recommendation,
        Err(err) => {
            tracing::error!("An error has occurred during the CRM update: {}", err);
            return Err(err.into());
        }
    };

    tracing::info!(
        "Posterior mean of a is {:.6}, next dose level is {}",
        recommendation.posterior_mean(),
        recommendation.next_level()
    );

    match settings.output.write {
        true => {
            settings.write()?;
            recommendation
                .write_outputs(&settings.output.path)
                .wrap_err("Failed to write output files")?;
            tracing::info!("Output files written to {}", settings.output.path);
        }
        false => {
            tracing::debug!("Output files will not be written - set `output.write = true` in the configuration file to enable output files")
        }
    }

    tracing::info!("Program complete after {:.2?}", now.elapsed());
    Ok(recommendation)
}
