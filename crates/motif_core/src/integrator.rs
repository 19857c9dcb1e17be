use crate::error::MotifError;
use crate::phase_plane::linspace;
use crate::solvers::DormandPrince45;
use crate::traits::{EmbeddedStep, ReactionSystem};
use serde::{Deserialize, Serialize};

/// Tolerances and step bounds for the adaptive integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratorOptions {
    /// Relative tolerance.
    pub rtol: f64,
    /// Absolute tolerance.
    pub atol: f64,
    /// Initial step size; 0.0 selects one automatically from the span.
    pub h0: f64,
    /// Minimum step size.
    pub h_min: f64,
    /// Maximum step size.
    pub h_max: f64,
    /// Bound on internal (accepted or rejected) steps per call.
    pub max_steps: usize,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-9,
            h0: 0.0,
            h_min: 1e-14,
            h_max: f64::INFINITY,
            max_steps: 100_000,
        }
    }
}

impl IntegratorOptions {
    pub fn validate(&self) -> Result<(), MotifError> {
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(MotifError::Configuration(format!(
                "rtol must be finite and positive (got {})",
                self.rtol
            )));
        }
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(MotifError::Configuration(format!(
                "atol must be finite and positive (got {})",
                self.atol
            )));
        }
        if self.h0 < 0.0 || self.h_min <= 0.0 || self.h_max <= 0.0 || self.h_max < self.h_min {
            return Err(MotifError::Configuration(format!(
                "step bounds must satisfy 0 < h_min <= h_max and h0 >= 0 \
                 (got h0 = {}, h_min = {}, h_max = {})",
                self.h0, self.h_min, self.h_max
            )));
        }
        if self.max_steps == 0 {
            return Err(MotifError::Configuration(
                "max_steps must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    fn initial_step(&self, span: f64) -> f64 {
        if self.h0 > 0.0 {
            self.h0.min(span)
        } else {
            (span * 1e-3).max(self.h_min).min(self.h_max).min(span)
        }
    }
}

/// A time-sampled solution of one integrator call.
///
/// `t` is strictly increasing and matches the requested sample grid exactly;
/// `y[i]` is the state at `t[i]`. The first sample is a verbatim copy of the
/// initial state, which is what lets the sweep engine chain segments with
/// bit-for-bit continuity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub t: Vec<f64>,
    pub y: Vec<Vec<f64>>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Number of state variables per sample.
    pub fn dim(&self) -> usize {
        self.y.first().map_or(0, Vec::len)
    }

    pub fn terminal_state(&self) -> Option<&[f64]> {
        self.y.last().map(Vec::as_slice)
    }

    /// One state component across all samples, for plotting.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`Self::dim`].
    pub fn component(&self, index: usize) -> Vec<f64> {
        self.y.iter().map(|state| state[index]).collect()
    }

    /// Shifts the whole time axis, used when splicing segments onto a
    /// global sweep clock.
    pub fn shift_time(&mut self, offset: f64) {
        for t in &mut self.t {
            *t += offset;
        }
    }
}

/// Integrates `system` from `y0` across the given sample times, returning the
/// state at each of them.
///
/// Internally the integrator marches with adaptive Dormand–Prince 5(4)
/// steps, each clamped to land on the next requested sample, so every
/// emitted state (the terminal one included) is an accepted step end under
/// error control rather than an interpolation across a long step.
pub fn integrate(
    system: &impl ReactionSystem<f64>,
    y0: &[f64],
    sample_times: &[f64],
    options: &IntegratorOptions,
) -> Result<Trajectory, MotifError> {
    options.validate()?;
    let dim = system.dimension();
    if y0.len() != dim {
        return Err(MotifError::Configuration(format!(
            "initial state has {} components, system expects {dim}",
            y0.len()
        )));
    }
    if y0.iter().any(|v| !v.is_finite()) {
        return Err(MotifError::Configuration(format!(
            "initial state must be finite (got {y0:?})"
        )));
    }
    if sample_times.len() < 2 {
        return Err(MotifError::Configuration(format!(
            "at least 2 sample times are required (got {})",
            sample_times.len()
        )));
    }
    for pair in sample_times.windows(2) {
        if !pair[0].is_finite() || !pair[1].is_finite() || pair[1] <= pair[0] {
            return Err(MotifError::Configuration(format!(
                "sample times must be finite and strictly increasing (got {} then {})",
                pair[0], pair[1]
            )));
        }
    }

    let t0 = sample_times[0];
    let t_end = sample_times[sample_times.len() - 1];
    let span = t_end - t0;

    let mut trajectory = Trajectory {
        t: Vec::with_capacity(sample_times.len()),
        y: Vec::with_capacity(sample_times.len()),
    };
    trajectory.t.push(t0);
    trajectory.y.push(y0.to_vec());

    let mut stepper = DormandPrince45::new(dim);
    let mut proposal = vec![0.0; dim];
    let mut t = t0;
    let mut y = y0.to_vec();
    let mut h = options.initial_step(span);
    let mut next = 1;
    // Tolerance for a clamped step landing one rounding error short of its
    // target sample.
    let eps = span * 1e-12;

    for _ in 0..options.max_steps {
        if next >= sample_times.len() {
            break;
        }
        h = h
            .min(sample_times[next] - t)
            .max(options.h_min)
            .min(options.h_max);

        let err = stepper.try_step(system, t, &y, h, &mut proposal, options.atol, options.rtol);
        if !err.is_finite() {
            return Err(MotifError::Integration {
                t_reached: t,
                reason: "non-finite state or derivative encountered".into(),
                partial: trajectory,
            });
        }

        if err <= 1.0 {
            let t_new = t + h;
            while next < sample_times.len() {
                let ts = sample_times[next];
                if ts > t_new + eps {
                    break;
                }
                let frac = if t_new > t {
                    ((ts - t) / (t_new - t)).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                let state = if frac >= 1.0 {
                    proposal.clone()
                } else {
                    y.iter()
                        .zip(&proposal)
                        .map(|(&a, &b)| a + frac * (b - a))
                        .collect()
                };
                trajectory.t.push(ts);
                trajectory.y.push(state);
                next += 1;
            }
            t = t_new;
            y.copy_from_slice(&proposal);
        } else if h <= options.h_min {
            return Err(MotifError::Integration {
                t_reached: t,
                reason: format!("step size underflow below h_min = {}", options.h_min),
                partial: trajectory,
            });
        }

        let factor = if err == 0.0 {
            5.0
        } else {
            (0.9 * err.powf(-0.2)).clamp(0.2, 5.0)
        };
        h = (h * factor).max(options.h_min).min(options.h_max);
    }

    if next < sample_times.len() {
        return Err(MotifError::Integration {
            t_reached: t,
            reason: format!(
                "step budget exhausted (max_steps = {})",
                options.max_steps
            ),
            partial: trajectory,
        });
    }
    Ok(trajectory)
}

/// Convenience wrapper: integrates over `[t0, t1]` with `samples` evenly
/// spaced output times.
pub fn integrate_n(
    system: &impl ReactionSystem<f64>,
    y0: &[f64],
    t0: f64,
    t1: f64,
    samples: usize,
    options: &IntegratorOptions,
) -> Result<Trajectory, MotifError> {
    if !t0.is_finite() || !t1.is_finite() || t1 <= t0 {
        return Err(MotifError::Configuration(format!(
            "time span must be finite and positive (got [{t0}, {t1}])"
        )));
    }
    if samples < 2 {
        return Err(MotifError::Configuration(format!(
            "at least 2 samples are required (got {samples})"
        )));
    }
    integrate(system, y0, &linspace(t0, t1, samples), options)
}
