use crate::integrator::Trajectory;
use thiserror::Error;

/// Errors surfaced by the simulation core.
///
/// Nothing in the crate recovers silently: a negative discriminant, a
/// vanishing denominator, or a non-finite state always propagates to the
/// caller, because clamping would mask a modeling or parameter error.
#[derive(Debug, Error)]
pub enum MotifError {
    /// A parameter or input combination outside the model's valid domain.
    /// The message names the offending values.
    #[error("domain error: {0}")]
    Domain(String),

    /// The adaptive stepper could not complete the requested time span.
    /// Carries the furthest time reached and the partial trajectory emitted
    /// up to that point, for diagnostics.
    #[error("integration failed at t = {t_reached}: {reason}")]
    Integration {
        t_reached: f64,
        reason: String,
        partial: Trajectory,
    },

    /// Invalid configuration, rejected before any integration is attempted.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A continuation sweep aborted because one of its segments failed.
    /// Continuing with a corrupted carried state would silently invalidate
    /// every subsequent segment, so the whole sweep fails.
    #[error("sweep aborted at step {step} (signal = {signal}): {source}")]
    SweepAborted {
        step: usize,
        signal: f64,
        #[source]
        source: Box<MotifError>,
    },
}
