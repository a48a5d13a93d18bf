use serde::{Deserialize, Serialize};

use crate::error::{CrmError, Result};

/// A single observed patient: the dose level given and whether a dose-limiting toxicity occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// 1-based dose level
    level: usize,
    toxicity: bool,
}

impl PatientRecord {
    pub fn new(level: usize, toxicity: bool) -> Self {
        PatientRecord { level, toxicity }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn toxicity(&self) -> bool {
        self.toxicity
    }
}

/// The patients observed so far, in order of accrual
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Patients {
    records: Vec<PatientRecord>,
}

impl Patients {
    /// Build the patient table from parallel columns of 1-based dose levels and 0/1 outcomes
    pub fn from_columns(levels: &[i32], outcomes: &[i32]) -> Result<Self> {
        if levels.is_empty() || outcomes.is_empty() {
            return Err(CrmError::input(
                "Historical data were not initialized: no patients supplied",
            ));
        }
        if levels.len() != outcomes.len() {
            return Err(CrmError::input(format!(
                "Found {} dose levels but {} toxicity outcomes",
                levels.len(),
                outcomes.len()
            )));
        }

        let mut records = Vec::new();
        records.try_reserve_exact(levels.len())?;
        for (i, (&level, &outcome)) in levels.iter().zip(outcomes.iter()).enumerate() {
            if level < 1 {
                return Err(CrmError::input(format!(
                    "Patient {} has dose level {}, levels are numbered from 1",
                    i + 1,
                    level
                )));
            }
            let toxicity = match outcome {
                0 => false,
                1 => true,
                other => {
                    return Err(CrmError::input(format!(
                        "Patient {} has toxicity outcome {}, expected 0 or 1",
                        i + 1,
                        other
                    )))
                }
            };
            records.push(PatientRecord::new(level as usize, toxicity));
        }

        Ok(Patients { records })
    }

    /// Build the patient table from typed records
    pub fn from_records(records: Vec<PatientRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(CrmError::input(
                "Historical data were not initialized: no patients supplied",
            ));
        }
        if let Some((i, record)) = records.iter().enumerate().find(|(_, r)| r.level == 0) {
            return Err(CrmError::input(format!(
                "Patient {} has dose level {}, levels are numbered from 1",
                i + 1,
                record.level
            )));
        }
        Ok(Patients { records })
    }

    /// Ensure every record refers to one of `n_levels` dose levels
    pub(crate) fn check_levels(&self, n_levels: usize) -> Result<()> {
        match self
            .records
            .iter()
            .enumerate()
            .find(|(_, r)| r.level > n_levels)
        {
            Some((i, record)) => Err(CrmError::input(format!(
                "Patient {} has dose level {}, but only {} dose levels are defined",
                i + 1,
                record.level,
                n_levels
            ))),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatientRecord> + '_ {
        self.records.iter()
    }

    /// Number of patients with a dose-limiting toxicity
    pub fn toxicities(&self) -> usize {
        self.records.iter().filter(|r| r.toxicity).count()
    }
}
