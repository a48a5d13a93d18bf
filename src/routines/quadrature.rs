//! Adaptive Gauss–Kronrod quadrature over a half-infinite interval
//!
//! The interval `[lower, ∞)` is mapped onto `(0, 1]` with `x = lower + (1 - t) / t`, and the
//! transformed integrand `f(x) / t²` is integrated with a 15-point Kronrod rule (embedded 7-point
//! Gauss rule for the error estimate). The subinterval with the largest error estimate is bisected
//! until the global error falls below `max(epsabs, epsrel·|I|)`, following QUADPACK's `qagi`.
//!
//! Every way of not reaching the requested accuracy is reported as a [QuadratureError], so an
//! inaccurate estimate is never returned as if it had converged.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::routines::settings::IntegrationSettings;

/// Abscissae of the 15-point Kronrod rule on [-1, 1]; `XGK[1]`, `XGK[3]`, `XGK[5]` and `XGK[7]` are the 7-point Gauss abscissae
const XGK: [f64; 8] = [
    0.991455371120812639206854697526329,
    0.949107912342758524526189684047851,
    0.864864423359769072789712788640926,
    0.741531185599394439863864773280788,
    0.586087235467691130294144845693013,
    0.405845151377397166906606412076961,
    0.207784955007898467600689403773245,
    0.000000000000000000000000000000000,
];

/// Weights of the 15-point Kronrod rule
const WGK: [f64; 8] = [
    0.022935322010529224963732008058970,
    0.063092092629978553290700663189204,
    0.104790010322250183839876322541518,
    0.140653259715525918745189590510238,
    0.169004726639267902826583426598550,
    0.190350578064785409913256402421014,
    0.204432940075298892414161999234649,
    0.209482141084727828012999174891714,
];

/// Weights of the 7-point Gauss rule, aligned with [XGK]
const WG: [f64; 8] = [
    0.0,
    0.129484966168869693270611432679082,
    0.0,
    0.279705391489276667901467771423780,
    0.0,
    0.381830050505118944950369775488975,
    0.0,
    0.417959183673469387755102040816327,
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuadratureError {
    #[error("requested accuracy cannot be reached (epsabs = {epsabs}, epsrel = {epsrel})")]
    InvalidTolerance { epsabs: f64, epsrel: f64 },

    #[error("maximum number of subintervals ({limit}) reached without convergence (estimate {value}, error {abserr})")]
    SubdivisionLimit {
        limit: usize,
        value: f64,
        abserr: f64,
    },

    #[error("roundoff error prevents the requested accuracy (estimate {value}, error {abserr})")]
    Roundoff { value: f64, abserr: f64 },

    #[error("integrand is too irregular to subdivide near t = [{lower}, {upper}]")]
    BadIntegrand { lower: f64, upper: f64 },

    #[error("integrand is not finite at x = {x}")]
    NonFinite { x: f64 },
}

/// Integral estimate and its diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadratureResult {
    /// Estimate of the integral
    pub value: f64,
    /// Estimate of the absolute error
    pub abserr: f64,
    /// Number of integrand evaluations
    pub evaluations: usize,
    /// Number of subintervals in the final partition
    pub subintervals: usize,
}

/// Adaptive integrator for `[lower, ∞)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature {
    epsabs: f64,
    epsrel: f64,
    limit: usize,
}

impl Default for Quadrature {
    fn default() -> Self {
        Quadrature::from(&IntegrationSettings::default())
    }
}

impl From<&IntegrationSettings> for Quadrature {
    fn from(settings: &IntegrationSettings) -> Self {
        Quadrature {
            epsabs: settings.epsabs,
            epsrel: settings.epsrel,
            limit: settings.limit,
        }
    }
}

/// Kronrod estimate over one subinterval of the transformed domain
#[derive(Debug, Clone, Copy)]
struct Rule {
    value: f64,
    abserr: f64,
    resabs: f64,
    resasc: f64,
}

/// Subinterval of `(0, 1]`, ordered by its error estimate
#[derive(Debug, Clone, Copy)]
struct Segment {
    lower: f64,
    upper: f64,
    value: f64,
    error: f64,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Segment {}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.error.total_cmp(&other.error)
    }
}

impl Quadrature {
    pub fn new(epsabs: f64, epsrel: f64, limit: usize) -> Self {
        Quadrature {
            epsabs,
            epsrel,
            limit,
        }
    }

    pub fn epsabs(&self) -> f64 {
        self.epsabs
    }

    pub fn epsrel(&self) -> f64 {
        self.epsrel
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Integrate `f` over `[lower, ∞)`
    pub fn integrate<F>(&self, lower: f64, mut f: F) -> Result<QuadratureResult, QuadratureError>
    where
        F: FnMut(f64) -> f64,
    {
        if self.limit == 0
            || (self.epsabs <= 0.0 && self.epsrel < (50.0 * f64::EPSILON).max(0.5e-28))
        {
            return Err(QuadratureError::InvalidTolerance {
                epsabs: self.epsabs,
                epsrel: self.epsrel,
            });
        }

        let mut evaluations = 0;
        let first = kronrod15(&mut f, lower, 0.0, 1.0, &mut evaluations)?;

        let mut errbnd = self.epsabs.max(self.epsrel * first.value.abs());
        if first.abserr <= 100.0 * f64::EPSILON * first.resabs && first.abserr > errbnd {
            return Err(QuadratureError::Roundoff {
                value: first.value,
                abserr: first.abserr,
            });
        }
        if (first.abserr <= errbnd && first.abserr != first.resasc) || first.abserr == 0.0 {
            return Ok(QuadratureResult {
                value: first.value,
                abserr: first.abserr,
                evaluations,
                subintervals: 1,
            });
        }
        if self.limit == 1 {
            return Err(QuadratureError::SubdivisionLimit {
                limit: self.limit,
                value: first.value,
                abserr: first.abserr,
            });
        }

        let mut segments = BinaryHeap::with_capacity(self.limit);
        segments.push(Segment {
            lower: 0.0,
            upper: 1.0,
            value: first.value,
            error: first.abserr,
        });

        let mut area = first.value;
        let mut errsum = first.abserr;
        let mut iroff1 = 0;
        let mut iroff2 = 0;

        for last in 2..=self.limit {
            let Some(worst) = segments.pop() else {
                break;
            };

            let mid = 0.5 * (worst.lower + worst.upper);
            let left = kronrod15(&mut f, lower, worst.lower, mid, &mut evaluations)?;
            let right = kronrod15(&mut f, lower, mid, worst.upper, &mut evaluations)?;

            let area12 = left.value + right.value;
            let erro12 = left.abserr + right.abserr;
            errsum += erro12 - worst.error;
            area += area12 - worst.value;

            if left.resasc != left.abserr && right.resasc != right.abserr {
                if (worst.value - area12).abs() <= 1e-5 * area12.abs()
                    && erro12 >= 0.99 * worst.error
                {
                    iroff1 += 1;
                }
                if last > 10 && erro12 > worst.error {
                    iroff2 += 1;
                }
            }

            segments.push(Segment {
                lower: worst.lower,
                upper: mid,
                value: left.value,
                error: left.abserr,
            });
            segments.push(Segment {
                lower: mid,
                upper: worst.upper,
                value: right.value,
                error: right.abserr,
            });

            errbnd = self.epsabs.max(self.epsrel * area.abs());
            if errsum <= errbnd {
                let value = segments.iter().map(|s| s.value).sum();
                tracing::trace!(
                    "Quadrature converged after {} evaluations on {} subintervals",
                    evaluations,
                    segments.len()
                );
                return Ok(QuadratureResult {
                    value,
                    abserr: errsum,
                    evaluations,
                    subintervals: segments.len(),
                });
            }

            if iroff1 >= 6 || iroff2 >= 20 {
                return Err(QuadratureError::Roundoff {
                    value: area,
                    abserr: errsum,
                });
            }
            if last == self.limit {
                return Err(QuadratureError::SubdivisionLimit {
                    limit: self.limit,
                    value: area,
                    abserr: errsum,
                });
            }
            if worst.lower.abs().max(worst.upper.abs())
                <= (1.0 + 100.0 * f64::EPSILON) * (mid.abs() + 1000.0 * f64::MIN_POSITIVE)
            {
                return Err(QuadratureError::BadIntegrand {
                    lower: worst.lower,
                    upper: worst.upper,
                });
            }
        }

        Err(QuadratureError::SubdivisionLimit {
            limit: self.limit,
            value: area,
            abserr: errsum,
        })
    }
}

/// 15-point Kronrod rule for `f(boundary + (1 - t) / t) / t²` over `[lower, upper] ⊂ (0, 1]`
fn kronrod15<F>(
    f: &mut F,
    boundary: f64,
    lower: f64,
    upper: f64,
    evaluations: &mut usize,
) -> Result<Rule, QuadratureError>
where
    F: FnMut(f64) -> f64,
{
    let centre = 0.5 * (lower + upper);
    let half = 0.5 * (upper - lower);

    let mut eval = |t: f64| -> Result<f64, QuadratureError> {
        let x = boundary + (1.0 - t) / t;
        *evaluations += 1;
        let fx = f(x) / t / t;
        if fx.is_finite() {
            Ok(fx)
        } else {
            Err(QuadratureError::NonFinite { x })
        }
    };

    let fc = eval(centre)?;
    let mut resg = WG[7] * fc;
    let mut resk = WGK[7] * fc;
    let mut resabs = resk.abs();

    let mut fv1 = [0.0; 7];
    let mut fv2 = [0.0; 7];
    for j in 0..7 {
        let absc = half * XGK[j];
        let f1 = eval(centre - absc)?;
        let f2 = eval(centre + absc)?;
        fv1[j] = f1;
        fv2[j] = f2;
        let fsum = f1 + f2;
        resg += WG[j] * fsum;
        resk += WGK[j] * fsum;
        resabs += WGK[j] * (f1.abs() + f2.abs());
    }

    let reskh = resk * 0.5;
    let mut resasc = WGK[7] * (fc - reskh).abs();
    for j in 0..7 {
        resasc += WGK[j] * ((fv1[j] - reskh).abs() + (fv2[j] - reskh).abs());
    }

    let value = resk * half;
    resabs *= half;
    resasc *= half;
    let mut abserr = ((resk - resg) * half).abs();
    if resasc != 0.0 && abserr != 0.0 {
        abserr = resasc * (200.0 * abserr / resasc).powf(1.5).min(1.0);
    }
    if resabs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
        abserr = abserr.max(50.0 * f64::EPSILON * resabs);
    }

    Ok(Rule {
        value,
        abserr,
        resabs,
        resasc,
    })
}
