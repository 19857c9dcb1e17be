/// The `motif_core` crate simulates small biochemical signaling circuits and
/// derives their qualitative structure.
///
/// Key components:
/// - **Switch**: the Goldbeter–Koshland zero-order ultrasensitivity function.
/// - **Models**: substrate-depletion and activator-inhibitor oscillators, the
///   irreversible bistable switch (full and quasi-steady-state reduced), and
///   the mutual-activation circuit, all as `ReactionSystem` implementations
///   with closed-form nullclines and fixed points where admitted.
/// - **Solvers/Integrator**: an embedded Dormand–Prince 5(4) stepper driven
///   by an adaptive accept/reject loop with output on a caller-chosen grid.
/// - **Sweep**: the continuation engine that chains relaxations across a
///   signal schedule to trace hysteresis loops.
/// - **Phase plane / fixed points**: vector-field grids, nullcline sampling,
///   and Jacobian-eigenvalue stability classification.
pub mod error;
pub mod fixed_point;
pub mod integrator;
pub mod models;
pub mod phase_plane;
pub mod solvers;
pub mod sweep;
pub mod switch;
pub mod traits;

pub use error::MotifError;
pub use integrator::{integrate, integrate_n, IntegratorOptions, Trajectory};
pub use sweep::{run_paired_sweep, run_sweep, SweepConfig, SweepRecord};
pub use switch::goldbeter_koshland;
