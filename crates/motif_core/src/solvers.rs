use crate::traits::{EmbeddedStep, ReactionSystem, Scalar};

/// Dormand–Prince 5(4) embedded pair.
///
/// The fifth-order solution advances the state (local extrapolation); the
/// embedded fourth-order solution provides the error estimate that drives the
/// integrator's step-size control. Stage buffers are allocated once per
/// stepper so repeated calls stay allocation-free.
pub struct DormandPrince45<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    k5: Vec<T>,
    k6: Vec<T>,
    k7: Vec<T>,
    tmp: Vec<T>,
}

impl<T: Scalar> DormandPrince45<T> {
    pub fn new(dim: usize) -> Self {
        let z = T::from_f64(0.0).unwrap();
        Self {
            k1: vec![z; dim],
            k2: vec![z; dim],
            k3: vec![z; dim],
            k4: vec![z; dim],
            k5: vec![z; dim],
            k6: vec![z; dim],
            k7: vec![z; dim],
            tmp: vec![z; dim],
        }
    }
}

impl<T: Scalar> EmbeddedStep<T> for DormandPrince45<T> {
    fn try_step(
        &mut self,
        system: &impl ReactionSystem<T>,
        t: T,
        state: &[T],
        dt: T,
        proposal: &mut [T],
        atol: T,
        rtol: T,
    ) -> T {
        // Dormand–Prince coefficients
        let c2 = T::from_f64(1.0 / 5.0).unwrap();
        let c3 = T::from_f64(3.0 / 10.0).unwrap();
        let c4 = T::from_f64(4.0 / 5.0).unwrap();
        let c5 = T::from_f64(8.0 / 9.0).unwrap();

        let a21 = T::from_f64(1.0 / 5.0).unwrap();

        let a31 = T::from_f64(3.0 / 40.0).unwrap();
        let a32 = T::from_f64(9.0 / 40.0).unwrap();

        let a41 = T::from_f64(44.0 / 45.0).unwrap();
        let a42 = T::from_f64(-56.0 / 15.0).unwrap();
        let a43 = T::from_f64(32.0 / 9.0).unwrap();

        let a51 = T::from_f64(19372.0 / 6561.0).unwrap();
        let a52 = T::from_f64(-25360.0 / 2187.0).unwrap();
        let a53 = T::from_f64(64448.0 / 6561.0).unwrap();
        let a54 = T::from_f64(-212.0 / 729.0).unwrap();

        let a61 = T::from_f64(9017.0 / 3168.0).unwrap();
        let a62 = T::from_f64(-355.0 / 33.0).unwrap();
        let a63 = T::from_f64(46732.0 / 5247.0).unwrap();
        let a64 = T::from_f64(49.0 / 176.0).unwrap();
        let a65 = T::from_f64(-5103.0 / 18656.0).unwrap();

        // 5th-order weights (advancing solution)
        let b1 = T::from_f64(35.0 / 384.0).unwrap();
        let b3 = T::from_f64(500.0 / 1113.0).unwrap();
        let b4 = T::from_f64(125.0 / 192.0).unwrap();
        let b5 = T::from_f64(-2187.0 / 6784.0).unwrap();
        let b6 = T::from_f64(11.0 / 84.0).unwrap();

        // Difference against the embedded 4th-order weights
        let e1 = T::from_f64(35.0 / 384.0 - 5179.0 / 57600.0).unwrap();
        let e3 = T::from_f64(500.0 / 1113.0 - 7571.0 / 16695.0).unwrap();
        let e4 = T::from_f64(125.0 / 192.0 - 393.0 / 640.0).unwrap();
        let e5 = T::from_f64(-2187.0 / 6784.0 + 92097.0 / 339200.0).unwrap();
        let e6 = T::from_f64(11.0 / 84.0 - 187.0 / 2100.0).unwrap();
        let e7 = T::from_f64(-1.0 / 40.0).unwrap();

        // k1
        system.apply(t, state, &mut self.k1);

        // k2
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * (a21 * self.k1[i]);
        }
        system.apply(t + c2 * dt, &self.tmp, &mut self.k2);

        // k3
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * (a31 * self.k1[i] + a32 * self.k2[i]);
        }
        system.apply(t + c3 * dt, &self.tmp, &mut self.k3);

        // k4
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * (a41 * self.k1[i] + a42 * self.k2[i] + a43 * self.k3[i]);
        }
        system.apply(t + c4 * dt, &self.tmp, &mut self.k4);

        // k5
        for i in 0..state.len() {
            self.tmp[i] = state[i]
                + dt * (a51 * self.k1[i] + a52 * self.k2[i] + a53 * self.k3[i] + a54 * self.k4[i]);
        }
        system.apply(t + c5 * dt, &self.tmp, &mut self.k5);

        // k6
        for i in 0..state.len() {
            self.tmp[i] = state[i]
                + dt * (a61 * self.k1[i]
                    + a62 * self.k2[i]
                    + a63 * self.k3[i]
                    + a64 * self.k4[i]
                    + a65 * self.k5[i]);
        }
        system.apply(t + dt, &self.tmp, &mut self.k6);

        // 5th-order proposal
        for i in 0..state.len() {
            proposal[i] = state[i]
                + dt * (b1 * self.k1[i]
                    + b3 * self.k3[i]
                    + b4 * self.k4[i]
                    + b5 * self.k5[i]
                    + b6 * self.k6[i]);
        }

        // k7 at the proposal, completing the error estimate
        system.apply(t + dt, proposal, &mut self.k7);

        let mut err = T::from_f64(0.0).unwrap();
        for i in 0..state.len() {
            let ei = dt
                * (e1 * self.k1[i]
                    + e3 * self.k3[i]
                    + e4 * self.k4[i]
                    + e5 * self.k5[i]
                    + e6 * self.k6[i]
                    + e7 * self.k7[i]);
            let scale = atol + rtol * state[i].abs().max(proposal[i].abs());
            let ratio = ei / scale;
            err = err + ratio * ratio;
        }
        (err / T::from_f64(state.len() as f64).unwrap()).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::DormandPrince45;
    use crate::traits::{EmbeddedStep, ReactionSystem, Scalar};

    struct Decay;

    impl<T: Scalar> ReactionSystem<T> for Decay {
        fn dimension(&self) -> usize {
            1
        }
        fn apply(&self, _t: T, y: &[T], out: &mut [T]) {
            out[0] = -y[0];
        }
    }

    #[test]
    fn single_step_matches_analytic_decay() {
        let mut stepper = DormandPrince45::<f64>::new(1);
        let mut proposal = [0.0];
        let err = stepper.try_step(&Decay, 0.0, &[1.0], 0.1, &mut proposal, 1e-9, 1e-6);
        assert!(err <= 1.0, "small step should satisfy tolerances: {err}");
        let expected = (-0.1_f64).exp();
        assert!(
            (proposal[0] - expected).abs() < 1e-9,
            "got {}, expected {expected}",
            proposal[0]
        );
    }

    #[test]
    fn oversized_step_is_flagged_by_error_norm() {
        let mut stepper = DormandPrince45::<f64>::new(1);
        let mut proposal = [0.0];
        let err = stepper.try_step(&Decay, 0.0, &[1.0], 20.0, &mut proposal, 1e-12, 1e-12);
        assert!(err > 1.0, "huge step should exceed tolerance: {err}");
    }
}
