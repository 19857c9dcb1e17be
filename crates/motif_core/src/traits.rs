use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in our kinetic systems.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A reaction network's rate equations, `dy/dt = f(t, y)`.
///
/// All circuits in this crate are autonomous; `t` is accepted for interface
/// uniformity with the integrator and ignored by the models.
pub trait ReactionSystem<T: Scalar> {
    /// Returns the number of state variables (concentrations).
    fn dimension(&self) -> usize;

    /// Evaluates the rate vector at `(t, y)`.
    /// y: current concentrations
    /// out: buffer to write dy/dt into
    fn apply(&self, t: T, y: &[T], out: &mut [T]);
}

/// A stepper with an embedded error estimate. Proposes a single step of size
/// `dt` without committing it, so the caller owns the accept/reject decision.
pub trait EmbeddedStep<T: Scalar> {
    /// Writes the proposed state at `t + dt` into `proposal` and returns the
    /// scaled RMS error norm; a value <= 1 means the step satisfies the
    /// requested tolerances.
    #[allow(clippy::too_many_arguments)]
    fn try_step(
        &mut self,
        system: &impl ReactionSystem<T>,
        t: T,
        state: &[T],
        dt: T,
        proposal: &mut [T],
        atol: T,
        rtol: T,
    ) -> T;
}
