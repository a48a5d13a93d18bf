use csv::WriterBuilder;
use eyre::{Result, WrapErr};
use std::fs::{create_dir_all, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::crm::Recommendation;

impl Recommendation {
    /// Write `recommendation.json` and `levels.csv` to `folder`
    pub fn write_outputs(&self, folder: &str) -> Result<()> {
        tracing::debug!("Writing outputs to {:?}", folder);
        self.write_recommendation(folder)?;
        self.write_levels(folder)?;
        Ok(())
    }

    /// Writes the full recommendation, including integration diagnostics, as JSON
    pub fn write_recommendation(&self, folder: &str) -> Result<()> {
        let outputfile = OutputFile::new(folder, "recommendation.json")
            .wrap_err("Failed to create output file for the recommendation")?;
        serde_json::to_writer_pretty(outputfile.file(), self)
            .wrap_err("Failed to serialize the recommendation")?;
        tracing::debug!("Recommendation written to {:?}", outputfile.relative_path());
        Ok(())
    }

    /// Writes one row per dose level with its prior, dose coordinate, fitted probability and distance to the target
    pub fn write_levels(&self, folder: &str) -> Result<()> {
        let outputfile = OutputFile::new(folder, "levels.csv")
            .wrap_err("Failed to create output file for the dose levels")?;
        let mut writer = WriterBuilder::new()
            .has_headers(true)
            .from_writer(outputfile.file());

        writer.write_record(["level", "prior", "dose", "probability", "distance"])?;
        for level in self.levels() {
            writer.write_record(&[
                level.level.to_string(),
                level.prior.to_string(),
                level.dose.to_string(),
                level.probability.to_string(),
                level.distance.to_string(),
            ])?;
        }
        writer.flush()?;
        tracing::debug!("Dose levels written to {:?}", outputfile.relative_path());
        Ok(())
    }
}

/// An output file, created together with its parent folders
#[derive(Debug)]
pub struct OutputFile {
    file: File,
    relative_path: PathBuf,
}

impl OutputFile {
    pub fn new(folder: &str, file_name: &str) -> Result<Self> {
        let relative_path = Path::new(&folder).join(file_name);

        if let Some(parent) = relative_path.parent() {
            create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create directories for {:?}", parent))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&relative_path)
            .wrap_err_with(|| format!("Failed to open file: {:?}", relative_path))?;

        Ok(OutputFile {
            file,
            relative_path,
        })
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn file_owned(self) -> File {
        self.file
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }
}
