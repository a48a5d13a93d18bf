use super::{DoseResponse, DEFAULT_INTERCEPT};

/// One-parameter logistic working model
///
/// `p(dose) = exp(b + a·dose) / (1 + exp(b + a·dose))`, where the intercept `b` is held fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Logistic {
    intercept: f64,
}

impl Logistic {
    pub fn new(intercept: f64) -> Self {
        Logistic { intercept }
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Default for Logistic {
    fn default() -> Self {
        Logistic::new(DEFAULT_INTERCEPT)
    }
}

/// Inverse logit, evaluated so that `exp` never overflows
#[inline]
fn expit(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl DoseResponse for Logistic {
    fn probability(&self, a: f64, dose: f64) -> f64 {
        expit(self.intercept + a * dose)
    }

    fn dose_from_probability(&self, p: f64, a0: f64) -> f64 {
        ((p / (1.0 - p)).ln() - self.intercept) / a0
    }
}
