use super::DoseResponse;

/// Hyperbolic tangent working model
///
/// `p(dose) = ((tanh(dose) + 1) / 2)^a`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HyperbolicTangent;

impl DoseResponse for HyperbolicTangent {
    fn probability(&self, a: f64, dose: f64) -> f64 {
        ((dose.tanh() + 1.0) / 2.0).powf(a)
    }

    fn dose_from_probability(&self, p: f64, a0: f64) -> f64 {
        (2.0 * p.powf(1.0 / a0) - 1.0).atanh()
    }
}
