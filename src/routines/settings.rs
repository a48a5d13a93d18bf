use config::Config as eConfig;
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

use crate::routines::output::OutputFile;

/// Run configuration
///
/// Every section is optional in the configuration file and falls back to its defaults.
/// Values may be overridden through environment variables with the `CRM` prefix, e.g.
/// `CRM_INTEGRATION_LIMIT=2000`.
#[derive(Debug, Deserialize, Clone, Serialize, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub integration: IntegrationSettings,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub output: Output,
}

/// Tolerances for the posterior integrals
#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct IntegrationSettings {
    /// Absolute error tolerance
    #[serde(default)]
    pub epsabs: f64,
    /// Relative error tolerance
    #[serde(default = "default_epsrel")]
    pub epsrel: f64,
    /// Maximum number of subintervals
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        IntegrationSettings {
            epsabs: 0.0,
            epsrel: default_epsrel(),
            limit: default_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct Log {
    /// Filter directive, e.g. `info` or `crmcore=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write the log to `<output.path>/<log.file>`
    #[serde(default)]
    pub write: bool,
    #[serde(default = "default_log_file")]
    pub file: String,
}

impl Default for Log {
    fn default() -> Self {
        Log {
            level: default_log_level(),
            write: false,
            file: default_log_file(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Serialize, PartialEq)]
pub struct Output {
    #[serde(default)]
    pub write: bool,
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for Output {
    fn default() -> Self {
        Output {
            write: false,
            path: default_output_path(),
        }
    }
}

impl Settings {
    /// Read settings from a TOML file, layering `CRM_*` environment variables on top
    pub fn read(path: &str) -> Result<Settings> {
        let parsed = eConfig::builder()
            .add_source(config::File::with_name(path).format(config::FileFormat::Toml))
            .add_source(config::Environment::with_prefix("CRM").separator("_"))
            .build()
            .wrap_err_with(|| format!("Failed to read settings from {}", path))?;

        let settings: Settings = parsed
            .try_deserialize()
            .wrap_err_with(|| format!("Invalid settings in {}", path))?;
        Ok(settings)
    }

    pub fn set_integration(&mut self, epsabs: f64, epsrel: f64, limit: usize) {
        self.integration = IntegrationSettings {
            epsabs,
            epsrel,
            limit,
        };
    }

    pub fn set_output_path(&mut self, path: impl Into<String>) {
        self.output.path = path.into();
    }

    pub fn enable_output(&mut self) {
        self.output.write = true;
    }

    pub fn disable_output(&mut self) {
        self.output.write = false;
    }

    pub fn set_log_level(&mut self, level: impl Into<String>) {
        self.log.level = level.into();
    }

    /// Write the effective settings to `settings.json` in the output folder
    pub fn write(&self) -> Result<()> {
        let outputfile = OutputFile::new(&self.output.path, "settings.json")?;
        serde_json::to_writer_pretty(outputfile.file(), self)
            .wrap_err("Failed to serialize settings")?;
        tracing::debug!("Settings written to {:?}", outputfile.relative_path());
        Ok(())
    }
}

// *********************************
// Default values for deserializing
// *********************************
fn default_epsrel() -> f64 {
    1e-7
}

fn default_limit() -> usize {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "log.txt".to_string()
}

fn default_output_path() -> String {
    "outputs/".to_string()
}
