use crate::error::MotifError;
use crate::traits::ReactionSystem;
use nalgebra::DMatrix;
use num_complex::Complex;
use serde::{Deserialize, Serialize};

/// A steady state together with the eigenvalues of the Jacobian evaluated
/// there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedPoint {
    pub state: Vec<f64>,
    pub eigenvalues: Vec<Complex<f64>>,
}

impl FixedPoint {
    /// Linearly stable when every eigenvalue has strictly negative real part.
    pub fn is_stable(&self) -> bool {
        self.eigenvalues.iter().all(|lambda| lambda.re < 0.0)
    }
}

/// Euclidean norm of the rate vector at `state`; zero (to tolerance) at a
/// fixed point.
pub fn residual_norm(system: &impl ReactionSystem<f64>, state: &[f64]) -> f64 {
    let mut rate = vec![0.0; system.dimension()];
    system.apply(0.0, state, &mut rate);
    rate.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Jacobian of the rate function at `state` by central differences.
pub fn jacobian(system: &impl ReactionSystem<f64>, state: &[f64]) -> DMatrix<f64> {
    let n = state.len();
    let mut matrix = DMatrix::zeros(n, n);
    let mut forward = vec![0.0; n];
    let mut backward = vec![0.0; n];
    let mut probe = state.to_vec();
    for j in 0..n {
        let h = 1e-6 * (1.0 + state[j].abs());
        probe[j] = state[j] + h;
        system.apply(0.0, &probe, &mut forward);
        probe[j] = state[j] - h;
        system.apply(0.0, &probe, &mut backward);
        probe[j] = state[j];
        for i in 0..n {
            matrix[(i, j)] = (forward[i] - backward[i]) / (2.0 * h);
        }
    }
    matrix
}

/// Classifies a candidate steady state by the eigenvalues of the Jacobian.
///
/// The caller supplies the state (models expose closed forms for theirs);
/// this routine checks it actually is a fixed point before linearizing, so a
/// mistyped candidate fails loudly instead of yielding meaningless
/// eigenvalues.
pub fn classify(system: &impl ReactionSystem<f64>, state: &[f64]) -> Result<FixedPoint, MotifError> {
    if state.len() != system.dimension() {
        return Err(MotifError::Configuration(format!(
            "state has {} components, system expects {}",
            state.len(),
            system.dimension()
        )));
    }
    if state.iter().any(|v| !v.is_finite()) {
        return Err(MotifError::Domain(format!(
            "cannot classify non-finite state {state:?}"
        )));
    }
    let residual = residual_norm(system, state);
    if residual > 1e-6 {
        return Err(MotifError::Domain(format!(
            "state {state:?} is not a fixed point (|f| = {residual:.3e})"
        )));
    }
    let eigenvalues = jacobian(system, state).complex_eigenvalues();
    Ok(FixedPoint {
        state: state.to_vec(),
        eigenvalues: eigenvalues.iter().copied().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::{classify, jacobian, residual_norm};
    use crate::error::MotifError;
    use crate::traits::{ReactionSystem, Scalar};

    struct Node;

    impl<T: Scalar> ReactionSystem<T> for Node {
        fn dimension(&self) -> usize {
            2
        }
        fn apply(&self, _t: T, y: &[T], out: &mut [T]) {
            out[0] = -T::from_f64(2.0).unwrap() * y[0];
            out[1] = -T::from_f64(3.0).unwrap() * y[1];
        }
    }

    struct Saddle;

    impl<T: Scalar> ReactionSystem<T> for Saddle {
        fn dimension(&self) -> usize {
            2
        }
        fn apply(&self, _t: T, y: &[T], out: &mut [T]) {
            out[0] = y[0];
            out[1] = -y[1];
        }
    }

    struct Center;

    impl<T: Scalar> ReactionSystem<T> for Center {
        fn dimension(&self) -> usize {
            2
        }
        fn apply(&self, _t: T, y: &[T], out: &mut [T]) {
            out[0] = y[1];
            out[1] = -y[0];
        }
    }

    #[test]
    fn stable_node_has_negative_real_eigenvalues() {
        let fp = classify(&Node, &[0.0, 0.0]).expect("origin is a fixed point");
        assert!(fp.is_stable());
        let mut reals: Vec<f64> = fp.eigenvalues.iter().map(|l| l.re).collect();
        reals.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((reals[0] + 3.0).abs() < 1e-6);
        assert!((reals[1] + 2.0).abs() < 1e-6);
    }

    #[test]
    fn saddle_is_unstable() {
        let fp = classify(&Saddle, &[0.0, 0.0]).expect("origin is a fixed point");
        assert!(!fp.is_stable());
    }

    #[test]
    fn purely_imaginary_spectrum_is_not_reported_stable() {
        let fp = classify(&Center, &[0.0, 0.0]).expect("origin is a fixed point");
        assert!(!fp.is_stable());
        for lambda in &fp.eigenvalues {
            assert!(lambda.re.abs() < 1e-6);
            assert!((lambda.im.abs() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn non_equilibrium_candidate_is_rejected() {
        assert!(residual_norm(&Node, &[1.0, 0.0]) > 1.0);
        assert!(matches!(
            classify(&Node, &[1.0, 0.0]),
            Err(MotifError::Domain(_))
        ));
    }

    #[test]
    fn jacobian_recovers_linear_coefficients() {
        let j = jacobian(&Saddle, &[0.3, -0.7]);
        assert!((j[(0, 0)] - 1.0).abs() < 1e-8);
        assert!((j[(1, 1)] + 1.0).abs() < 1e-8);
        assert!(j[(0, 1)].abs() < 1e-8);
        assert!(j[(1, 0)].abs() < 1e-8);
    }
}
