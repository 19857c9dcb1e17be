use crate::error::MotifError;
use crate::fixed_point::{classify, FixedPoint};
use crate::phase_plane::AxisSpec;
use crate::switch::gk_unchecked;
use crate::traits::ReactionSystem;
use serde::{Deserialize, Serialize};

/// Rate constants for the substrate-depletion oscillator.
///
/// `X` is the inactive substrate pool, `R` the response species. Conversion
/// of `X` into `R` is catalyzed at rate `k0_prime + k0 * Ep(R)`, where
/// `Ep(R)` is the Goldbeter–Koshland active-enzyme fraction driven by `R`
/// itself. The positive feedback through `Ep` against the depleting substrate
/// pool is what produces relaxation oscillations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubstrateDepletionParams {
    pub k0_prime: f64,
    pub k0: f64,
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub k4: f64,
    pub j3: f64,
    pub j4: f64,
    /// Signal strength driving substrate synthesis.
    pub s: f64,
}

impl Default for SubstrateDepletionParams {
    fn default() -> Self {
        Self {
            k0_prime: 0.0,
            k0: 0.4,
            k1: 1.0,
            k2: 1.0,
            k3: 1.0,
            k4: 0.4,
            j3: 0.5,
            j4: 0.5,
            s: 0.2,
        }
    }
}

impl SubstrateDepletionParams {
    /// A copy of this parameter set with the signal replaced.
    pub fn with_signal(self, s: f64) -> Self {
        Self { s, ..self }
    }

    pub fn validate(&self) -> Result<(), MotifError> {
        for (name, value) in [
            ("k0_prime", self.k0_prime),
            ("k0", self.k0),
            ("k1", self.k1),
            ("k2", self.k2),
            ("k3", self.k3),
            ("k4", self.k4),
            ("s", self.s),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MotifError::Domain(format!(
                    "substrate depletion: {name} = {value} must be finite and non-negative"
                )));
            }
        }
        for (name, value) in [("j3", self.j3), ("j4", self.j4)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MotifError::Domain(format!(
                    "substrate depletion: {name} = {value} must be finite and strictly positive"
                )));
            }
        }
        if self.k2 <= 0.0 {
            return Err(MotifError::Domain(format!(
                "substrate depletion: k2 = {} must be strictly positive",
                self.k2
            )));
        }
        Ok(())
    }
}

/// Substrate-depletion oscillator over state `(X, R)`.
#[derive(Debug, Clone)]
pub struct SubstrateDepletion {
    params: SubstrateDepletionParams,
}

impl SubstrateDepletion {
    pub fn new(params: SubstrateDepletionParams) -> Result<Self, MotifError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SubstrateDepletionParams {
        &self.params
    }

    /// Active-enzyme fraction at response level `r`.
    fn activator(&self, r: f64) -> f64 {
        gk_unchecked(self.params.k3 * r, self.params.k4, self.params.j3, self.params.j4)
    }

    /// Conversion rate of `X` into `R` at response level `r`.
    fn conversion_rate(&self, r: f64) -> f64 {
        self.params.k0_prime + self.params.k0 * self.activator(r)
    }

    fn conversion_rate_checked(&self, r: f64) -> Result<f64, MotifError> {
        let rate = self.conversion_rate(r);
        if rate.is_finite() && rate > 0.0 {
            Ok(rate)
        } else {
            Err(MotifError::Domain(format!(
                "substrate depletion: conversion rate k0' + k0*Ep(R) = {rate} at R = {r} \
                 must be strictly positive"
            )))
        }
    }

    /// Samples the `dR/dt = 0` curve, `X = k2*R / (k0' + k0*Ep(R))`, as
    /// `[x, r]` points over the given response range.
    pub fn r_nullcline(&self, r_axis: &AxisSpec) -> Result<Vec<[f64; 2]>, MotifError> {
        r_axis.validate()?;
        r_axis
            .sample()
            .into_iter()
            .map(|r| {
                let rate = self.conversion_rate_checked(r)?;
                Ok([self.params.k2 * r / rate, r])
            })
            .collect()
    }

    /// Samples the `dX/dt = 0` curve, `X = k1*S / (k0' + k0*Ep(R))`, as
    /// `[x, r]` points over the given response range.
    pub fn x_nullcline(&self, r_axis: &AxisSpec) -> Result<Vec<[f64; 2]>, MotifError> {
        r_axis.validate()?;
        r_axis
            .sample()
            .into_iter()
            .map(|r| {
                let rate = self.conversion_rate_checked(r)?;
                Ok([self.params.k1 * self.params.s / rate, r])
            })
            .collect()
    }

    /// The unique steady state, `R* = k1*S/k2` with `X*` on the R-nullcline,
    /// classified by its Jacobian eigenvalues. In the oscillatory regime this
    /// point is unstable and the attractor is the surrounding limit cycle.
    pub fn fixed_point(&self) -> Result<FixedPoint, MotifError> {
        let r_star = self.params.k1 * self.params.s / self.params.k2;
        let rate = self.conversion_rate_checked(r_star)?;
        let x_star = self.params.k2 * r_star / rate;
        classify(self, &[x_star, r_star])
    }
}

impl ReactionSystem<f64> for SubstrateDepletion {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: f64, y: &[f64], out: &mut [f64]) {
        let (x, r) = (y[0], y[1]);
        let rate = self.conversion_rate(r);
        out[0] = self.params.k1 * self.params.s - x * rate;
        out[1] = x * rate - self.params.k2 * r;
    }
}

#[cfg(test)]
mod tests {
    use super::{SubstrateDepletion, SubstrateDepletionParams};
    use crate::error::MotifError;
    use crate::phase_plane::AxisSpec;
    use crate::traits::ReactionSystem;

    #[test]
    fn reference_fixed_point_is_unstable() {
        let model = SubstrateDepletion::new(SubstrateDepletionParams::default())
            .expect("reference constants are valid");
        let fp = model.fixed_point().expect("closed form is a fixed point");
        assert!((fp.state[1] - 0.2).abs() < 1e-12, "R* = k1*S/k2 = 0.2");
        assert!(
            !fp.is_stable(),
            "reference constants sit in the oscillatory regime: {:?}",
            fp.eigenvalues
        );
    }

    #[test]
    fn nullcline_samples_zero_their_defining_derivative() {
        let model =
            SubstrateDepletion::new(SubstrateDepletionParams::default()).expect("valid params");
        let axis = AxisSpec::new(0.05, 1.2, 25);
        let mut rate = [0.0; 2];
        for point in model.r_nullcline(&axis).expect("domain is valid") {
            model.apply(0.0, &point, &mut rate);
            assert!(rate[1].abs() < 1e-12, "dR/dt = {} at {point:?}", rate[1]);
        }
        for point in model.x_nullcline(&axis).expect("domain is valid") {
            model.apply(0.0, &point, &mut rate);
            assert!(rate[0].abs() < 1e-12, "dX/dt = {} at {point:?}", rate[0]);
        }
    }

    #[test]
    fn vanishing_conversion_rate_is_a_domain_error() {
        // With k0' = 0 the conversion rate vanishes at R = 0, where no enzyme
        // is active; the nullcline must refuse rather than divide.
        let model =
            SubstrateDepletion::new(SubstrateDepletionParams::default()).expect("valid params");
        assert!(matches!(
            model.r_nullcline(&AxisSpec::new(0.0, 1.2, 10)),
            Err(MotifError::Domain(_))
        ));
    }

    #[test]
    fn basal_conversion_keeps_the_nullcline_defined_at_zero() {
        let params = SubstrateDepletionParams {
            k0_prime: 0.05,
            ..Default::default()
        };
        let model = SubstrateDepletion::new(params).expect("valid params");
        let points = model
            .r_nullcline(&AxisSpec::new(0.0, 1.2, 10))
            .expect("basal rate keeps the denominator positive");
        assert_eq!(points.len(), 10);
        assert_eq!(points[0], [0.0, 0.0]);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let negative = SubstrateDepletionParams {
            k1: -1.0,
            ..Default::default()
        };
        assert!(matches!(negative.validate(), Err(MotifError::Domain(_))));
        let zero_j = SubstrateDepletionParams {
            j3: 0.0,
            ..Default::default()
        };
        assert!(matches!(zero_j.validate(), Err(MotifError::Domain(_))));
    }

    #[test]
    fn with_signal_leaves_other_constants_untouched() {
        let base = SubstrateDepletionParams::default();
        let derived = base.with_signal(1.5);
        assert_eq!(derived.s, 1.5);
        assert_eq!(derived.k0, base.k0);
        assert_eq!(base.s, 0.2);
    }
}
