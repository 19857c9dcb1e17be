use crate::error::MotifError;
use crate::phase_plane::AxisSpec;
use crate::switch::gk_unchecked;
use crate::traits::ReactionSystem;
use serde::{Deserialize, Serialize};

/// Rate constants shared by the full and reduced irreversible switch.
///
/// The response `R` activates the enzyme `E` through a zero-order
/// modification cycle (Michaelis constants `km3`, `km4`, total enzyme `e_t`),
/// and active enzyme feeds back into `R` production at rate `k0`. Above a
/// threshold signal the high branch is the only steady state, and it persists
/// when the signal is removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwitchParams {
    pub k0: f64,
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub k4: f64,
    pub km3: f64,
    pub km4: f64,
    /// Total enzyme concentration.
    pub e_t: f64,
    /// Signal strength.
    pub s: f64,
}

impl Default for SwitchParams {
    fn default() -> Self {
        Self {
            k0: 0.4,
            k1: 0.01,
            k2: 1.0,
            k3: 1.0,
            k4: 0.2,
            km3: 0.4,
            km4: 0.4,
            e_t: 1.0,
            s: 0.0,
        }
    }
}

impl SwitchParams {
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
            ("s", self.s),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MotifError::Domain(format!(
                    "irreversible switch: {name} = {value} must be finite and non-negative"
                )));
            }
        }
        for (name, value) in [("km3", self.km3), ("km4", self.km4), ("e_t", self.e_t)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MotifError::Domain(format!(
                    "irreversible switch: {name} = {value} must be finite and strictly positive"
                )));
            }
        }
        Ok(())
    }

    /// Quasi-steady-state active-enzyme concentration at response level `r`.
    fn enzyme_qss(&self, r: f64) -> f64 {
        gk_unchecked(self.k3 * r, self.k4, self.km3 / self.e_t, self.km4 / self.e_t) * self.e_t
    }
}

/// Irreversible switch with explicit enzyme kinetics, over state `(R, E)`.
#[derive(Debug, Clone)]
pub struct IrreversibleSwitch {
    params: SwitchParams,
}

impl IrreversibleSwitch {
    pub fn new(params: SwitchParams) -> Result<Self, MotifError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SwitchParams {
        &self.params
    }

    /// Samples the `dR/dt = 0` line, `E = (k2*R - k1*S)/k0`, as `[r, e]`
    /// points over the given response range. Undefined when the feedback
    /// rate `k0` vanishes.
    pub fn r_nullcline(&self, r_axis: &AxisSpec) -> Result<Vec<[f64; 2]>, MotifError> {
        r_axis.validate()?;
        let p = &self.params;
        if p.k0 <= 0.0 {
            return Err(MotifError::Domain(format!(
                "irreversible switch: R-nullcline is undefined for k0 = {}",
                p.k0
            )));
        }
        Ok(r_axis
            .sample()
            .into_iter()
            .map(|r| [r, (p.k2 * r - p.k1 * p.s) / p.k0])
            .collect())
    }

    /// Samples the `dE/dt = 0` curve as `[r, e]` points over the given
    /// response range. The balance of the modification cycle at fixed `R` is
    /// exactly the Goldbeter–Koshland form, so each sample is the closed-form
    /// root rather than a numerical one.
    pub fn e_nullcline(&self, r_axis: &AxisSpec) -> Result<Vec<[f64; 2]>, MotifError> {
        r_axis.validate()?;
        r_axis
            .sample()
            .into_iter()
            .map(|r| {
                let e = self.params.enzyme_qss(r);
                if e.is_finite() {
                    Ok([r, e])
                } else {
                    Err(MotifError::Domain(format!(
                        "irreversible switch: E-nullcline is undefined at R = {r}"
                    )))
                }
            })
            .collect()
    }
}

impl ReactionSystem<f64> for IrreversibleSwitch {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: f64, y: &[f64], out: &mut [f64]) {
        let p = &self.params;
        let (r, e) = (y[0], y[1]);
        out[0] = p.k0 * e + p.k1 * p.s - p.k2 * r;
        out[1] = p.k3 * r * (p.e_t - e) / (p.km3 + p.e_t - e) - p.k4 * e / (p.km4 + e);
    }
}

/// One-variable reduction of [`IrreversibleSwitch`]: the enzyme is assumed
/// equilibrated at every instant and replaced by its Goldbeter–Koshland
/// steady state. Shares `SwitchParams` with the full model so the two can be
/// swept in lockstep.
#[derive(Debug, Clone)]
pub struct IrreversibleSwitchReduced {
    params: SwitchParams,
}

impl IrreversibleSwitchReduced {
    pub fn new(params: SwitchParams) -> Result<Self, MotifError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SwitchParams {
        &self.params
    }
}

impl ReactionSystem<f64> for IrreversibleSwitchReduced {
    fn dimension(&self) -> usize {
        1
    }

    fn apply(&self, _t: f64, y: &[f64], out: &mut [f64]) {
        let p = &self.params;
        let r = y[0];
        out[0] = p.k0 * p.enzyme_qss(r) + p.k1 * p.s - p.k2 * r;
    }
}
