use crate::error::MotifError;
use crate::fixed_point::{classify, FixedPoint};
use crate::phase_plane::AxisSpec;
use crate::traits::ReactionSystem;
use serde::{Deserialize, Serialize};

/// The single constant of the mutual-activation circuit: the half-saturation
/// point of the Hill-type feedback. Below `k = 1/2` the circuit is bistable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutualActivationParams {
    pub k: f64,
}

impl Default for MutualActivationParams {
    fn default() -> Self {
        Self { k: 0.45 }
    }
}

impl MutualActivationParams {
    pub fn validate(&self) -> Result<(), MotifError> {
        if !self.k.is_finite() || self.k <= 0.0 {
            return Err(MotifError::Domain(format!(
                "mutual activation: k = {} must be finite and strictly positive",
                self.k
            )));
        }
        Ok(())
    }
}

/// Mutual-activation positive-feedback circuit over state `(u, v)`:
/// `du/dt = v - u`, `dv/dt = u^2/(k^2 + u^2) - v`.
///
/// All fixed points lie on the diagonal `v = u`, at the roots of
/// `u = u^2/(k^2 + u^2)`: the origin always, plus `(1 ± sqrt(1 - 4k^2))/2`
/// when the discriminant `1 - 4k^2` admits them. This is the one model in
/// the crate with a fully closed-form fixed-point set.
#[derive(Debug, Clone)]
pub struct MutualActivation {
    params: MutualActivationParams,
}

impl MutualActivation {
    pub fn new(params: MutualActivationParams) -> Result<Self, MotifError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &MutualActivationParams {
        &self.params
    }

    fn feedback(&self, u: f64) -> f64 {
        let k = self.params.k;
        u * u / (k * k + u * u)
    }

    /// Samples the `du/dt = 0` line, `v = u`, as `[u, v]` points.
    pub fn u_nullcline(&self, u_axis: &AxisSpec) -> Result<Vec<[f64; 2]>, MotifError> {
        u_axis.validate()?;
        Ok(u_axis.sample().into_iter().map(|u| [u, u]).collect())
    }

    /// Samples the `dv/dt = 0` curve, `v = u^2/(k^2 + u^2)`, as `[u, v]`
    /// points.
    pub fn v_nullcline(&self, u_axis: &AxisSpec) -> Result<Vec<[f64; 2]>, MotifError> {
        u_axis.validate()?;
        Ok(u_axis
            .sample()
            .into_iter()
            .map(|u| [u, self.feedback(u)])
            .collect())
    }

    /// All fixed points in ascending `u`, each classified by its Jacobian
    /// eigenvalues. A negative discriminant means the feedback never crosses
    /// the diagonal away from the origin; that is the monostable regime, not
    /// an error.
    pub fn fixed_points(&self) -> Result<Vec<FixedPoint>, MotifError> {
        let k = self.params.k;
        let discriminant = 1.0 - 4.0 * k * k;
        let mut roots = vec![0.0];
        if discriminant == 0.0 {
            roots.push(0.5);
        } else if discriminant > 0.0 {
            let half = discriminant.sqrt() / 2.0;
            roots.push(0.5 - half);
            roots.push(0.5 + half);
        }
        roots
            .into_iter()
            .map(|u| classify(self, &[u, u]))
            .collect()
    }
}

impl ReactionSystem<f64> for MutualActivation {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, _t: f64, y: &[f64], out: &mut [f64]) {
        let (u, v) = (y[0], y[1]);
        out[0] = v - u;
        out[1] = self.feedback(u) - v;
    }
}

#[cfg(test)]
mod tests {
    use super::{MutualActivation, MutualActivationParams};
    use crate::error::MotifError;
    use crate::fixed_point::residual_norm;
    use crate::integrator::{integrate_n, IntegratorOptions};
    use crate::phase_plane::AxisSpec;

    #[test]
    fn bistable_regime_has_three_fixed_points() {
        let model =
            MutualActivation::new(MutualActivationParams::default()).expect("valid params");
        let points = model.fixed_points().expect("closed forms are fixed points");
        assert_eq!(points.len(), 3);
        let expected_outer = (1.0 + (1.0 - 4.0 * 0.45 * 0.45f64).sqrt()) / 2.0;
        assert!((points[2].state[0] - expected_outer).abs() < 1e-12);
        // Stable off state, unstable threshold, stable on state.
        assert!(points[0].is_stable());
        assert!(!points[1].is_stable());
        assert!(points[2].is_stable());
    }

    #[test]
    fn weak_feedback_leaves_only_the_origin() {
        let model =
            MutualActivation::new(MutualActivationParams { k: 0.6 }).expect("valid params");
        let points = model.fixed_points().expect("origin is a fixed point");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].state, vec![0.0, 0.0]);
        assert!(points[0].is_stable());
    }

    #[test]
    fn fixed_points_have_vanishing_residual() {
        let model =
            MutualActivation::new(MutualActivationParams::default()).expect("valid params");
        for fp in model.fixed_points().expect("valid params") {
            assert!(residual_norm(&model, &fp.state) < 1e-12);
        }
    }

    #[test]
    fn nullclines_intersect_at_the_fixed_points() {
        let model =
            MutualActivation::new(MutualActivationParams::default()).expect("valid params");
        let diagonal = model
            .u_nullcline(&AxisSpec::new(0.0, 1.2, 13))
            .expect("valid axis");
        assert!(diagonal.iter().all(|p| p[0] == p[1]));
        // On the feedback nullcline at a fixed point, v equals u.
        for fp in model.fixed_points().expect("valid params") {
            let u = fp.state[0];
            let k = model.params().k;
            let v = u * u / (k * k + u * u);
            assert!((v - u).abs() < 1e-12);
        }
    }

    #[test]
    fn trajectory_started_at_the_on_state_stays_there() {
        let model =
            MutualActivation::new(MutualActivationParams::default()).expect("valid params");
        let points = model.fixed_points().expect("valid params");
        let on = points[2].state.clone();
        let trajectory = integrate_n(&model, &on, 0.0, 20.0, 41, &IntegratorOptions::default())
            .expect("integration should succeed");
        for state in &trajectory.y {
            assert!((state[0] - on[0]).abs() < 1e-6);
            assert!((state[1] - on[1]).abs() < 1e-6);
        }
    }

    #[test]
    fn non_positive_half_saturation_is_rejected() {
        assert!(matches!(
            MutualActivation::new(MutualActivationParams { k: 0.0 }),
            Err(MotifError::Domain(_))
        ));
    }
}
