use crate::error::MotifError;
use crate::phase_plane::AxisSpec;
use crate::switch::gk_unchecked;
use crate::traits::ReactionSystem;
use serde::{Deserialize, Serialize};

/// Rate constants for the activator-inhibitor oscillator.
///
/// The response `R` activates its own production through the
/// Goldbeter–Koshland enzyme `Ep(R)` and, more slowly, the inhibitor `X`,
/// which removes `R`. Fast positive feedback under delayed negative feedback
/// gives sustained oscillations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivatorInhibitorParams {
    pub k0: f64,
    pub k1: f64,
    pub k2: f64,
    pub k2_prime: f64,
    pub k3: f64,
    pub k4: f64,
    pub k5: f64,
    pub k6: f64,
    pub j3: f64,
    pub j4: f64,
    /// Signal strength feeding basal response production.
    pub s: f64,
}

impl Default for ActivatorInhibitorParams {
    fn default() -> Self {
        Self {
            k0: 4.0,
            k1: 1.0,
            k2: 1.0,
            k2_prime: 1.0,
            k3: 1.0,
            k4: 1.0,
            k5: 0.1,
            k6: 0.075,
            j3: 0.3,
            j4: 0.3,
            s: 0.2,
        }
    }
}

impl ActivatorInhibitorParams {
    /// A copy of this parameter set with the signal replaced.
    pub fn with_signal(self, s: f64) -> Self {
        Self { s, ..self }
    }

    pub fn validate(&self) -> Result<(), MotifError> {
        for (name, value) in [
            ("k0", self.k0),
            ("k1", self.k1),
            ("k2", self.k2),
            ("k3", self.k3),
            ("k4", self.k4),
            ("k6", self.k6),
            ("s", self.s),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MotifError::Domain(format!(
                    "activator-inhibitor: {name} = {value} must be finite and non-negative"
                )));
            }
        }
        // k5 and k2' divide the nullcline expressions.
        for (name, value) in [
            ("k2_prime", self.k2_prime),
            ("k5", self.k5),
            ("j3", self.j3),
            ("j4", self.j4),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MotifError::Domain(format!(
                    "activator-inhibitor: {name} = {value} must be finite and strictly positive"
                )));
            }
        }
        Ok(())
    }
}

/// Activator-inhibitor oscillator over state `(X, R)`.
#[derive(Debug, Clone)]
pub struct ActivatorInhibitor {
    params: ActivatorInhibitorParams,
}

impl ActivatorInhibitor {
    pub fn new(params: ActivatorInhibitorParams) -> Result<Self, MotifError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ActivatorInhibitorParams {
        &self.params
    }

    fn activator(&self, r: f64) -> f64 {
        gk_unchecked(self.params.k3 * r, self.params.k4, self.params.j3, self.params.j4)
    }

    /// Samples the `dX/dt = 0` line, `R = k6*X/k5`, as `[x, r]` points over
    /// the given inhibitor range.
    pub fn x_nullcline(&self, x_axis: &AxisSpec) -> Result<Vec<[f64; 2]>, MotifError> {
        x_axis.validate()?;
        Ok(x_axis
            .sample()
            .into_iter()
            .map(|x| [x, self.params.k6 * x / self.params.k5])
            .collect())
    }

    /// Samples the `dR/dt = 0` curve,
    /// `X = (k1*S + k0*Ep(R)) / (k2'*R) - k2/k2'`, as `[x, r]` points over
    /// the given response range. The expression divides by `R`, so the range
    /// must stay strictly positive.
    pub fn r_nullcline(&self, r_axis: &AxisSpec) -> Result<Vec<[f64; 2]>, MotifError> {
        r_axis.validate()?;
        let p = &self.params;
        r_axis
            .sample()
            .into_iter()
            .map(|r| {
                if r <= 0.0 {
                    return Err(MotifError::Domain(format!(
                        "activator-inhibitor: R-nullcline is undefined at R = {r}; \
                         the sampled range must be strictly positive"
                    )));
                }
                let x = (p.k1 * p.s + p.k0 * self.activator(r)) / (p.k2_prime * r)
                    - p.k2 / p.k2_prime;
                Ok([x, r])
            })
            .collect()
    }
}

impl ReactionSystem<f64> for ActivatorInhibitor {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: f64, y: &[f64], out: &mut [f64]) {
        let p = &self.params;
        let (x, r) = (y[0], y[1]);
        out[0] = p.k5 * r - p.k6 * x;
        out[1] = p.k1 * p.s + p.k0 * self.activator(r) - r * (p.k2 + p.k2_prime * x);
    }
}
