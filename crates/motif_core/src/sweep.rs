//! Continuation sweep engine: steps a signal parameter across a range,
//! relaxes the model at each value, and chains each segment's terminal state
//! into the next segment's initial condition. Because the carried state
//! remembers which branch it settled on, sweeping the signal up and then back
//! down traces both branches of a bistable response and exposes hysteresis.

use crate::error::MotifError;
use crate::integrator::{integrate_n, IntegratorOptions, Trajectory};
use crate::phase_plane::linspace;
use crate::traits::ReactionSystem;
use serde::{Deserialize, Serialize};

/// Resolution of a continuation sweep.
///
/// `segment_span` must be long enough for the model to settle at each signal
/// value; the engine reports the terminal sample as the steady-state response
/// and does not try to detect equilibration itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub signal_min: f64,
    pub signal_max: f64,
    /// Signal increment for the ascending pass.
    pub ascending_step: f64,
    /// Signal decrement for the descending pass.
    pub descending_step: f64,
    /// Relaxation time spent at each signal value.
    pub segment_span: f64,
    /// Output samples per segment.
    pub segment_samples: usize,
    pub integrator: IntegratorOptions,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            signal_min: 0.0,
            signal_max: 4.0,
            ascending_step: 0.01,
            descending_step: 0.01,
            segment_span: 400.0,
            segment_samples: 2000,
            integrator: IntegratorOptions::default(),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), MotifError> {
        if !self.signal_min.is_finite()
            || !self.signal_max.is_finite()
            || self.signal_max <= self.signal_min
        {
            return Err(MotifError::Configuration(format!(
                "signal range must be finite with max > min (got [{}, {}])",
                self.signal_min, self.signal_max
            )));
        }
        for (name, value) in [
            ("ascending_step", self.ascending_step),
            ("descending_step", self.descending_step),
            ("segment_span", self.segment_span),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MotifError::Configuration(format!(
                    "{name} must be finite and strictly positive (got {value})"
                )));
            }
        }
        let range = self.signal_max - self.signal_min;
        for (name, value) in [
            ("ascending_step", self.ascending_step),
            ("descending_step", self.descending_step),
        ] {
            if value > range {
                return Err(MotifError::Configuration(format!(
                    "{name} = {value} exceeds the signal range {range}; \
                     each pass needs at least two signal values"
                )));
            }
        }
        if self.segment_samples < 2 {
            return Err(MotifError::Configuration(format!(
                "segment_samples must be at least 2 (got {})",
                self.segment_samples
            )));
        }
        self.integrator.validate()
    }

    fn signal_count(&self, step: f64) -> usize {
        ((self.signal_max - self.signal_min) / step).round() as usize + 1
    }

    /// Signal values of the ascending pass, endpoints included.
    pub fn ascending_signals(&self) -> Vec<f64> {
        linspace(
            self.signal_min,
            self.signal_max,
            self.signal_count(self.ascending_step),
        )
    }

    /// Signal values of the descending pass, endpoints included.
    pub fn descending_signals(&self) -> Vec<f64> {
        linspace(
            self.signal_max,
            self.signal_min,
            self.signal_count(self.descending_step),
        )
    }
}

/// One relaxation at a fixed signal value. Trajectory times are already
/// offset onto the sweep's global clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSegment {
    pub signal: f64,
    pub trajectory: Trajectory,
}

/// The complete record of one up-then-down sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    pub segments: Vec<SweepSegment>,
    /// Number of leading segments that belong to the ascending pass.
    pub ascending_len: usize,
}

/// Flat column view of a sweep, one row per retained sample: the minimal
/// schema a hysteresis plot needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSeries {
    pub t: Vec<f64>,
    pub signal: Vec<f64>,
    pub response: Vec<f64>,
}

impl SweepRecord {
    pub fn ascending(&self) -> &[SweepSegment] {
        &self.segments[..self.ascending_len]
    }

    pub fn descending(&self) -> &[SweepSegment] {
        &self.segments[self.ascending_len..]
    }

    /// `(signal, terminal response)` pairs for the ascending pass.
    ///
    /// # Panics
    ///
    /// Panics if `component` is not below the swept model's dimension.
    pub fn ascending_responses(&self, component: usize) -> Vec<(f64, f64)> {
        Self::responses(self.ascending(), component)
    }

    /// `(signal, terminal response)` pairs for the descending pass.
    ///
    /// # Panics
    ///
    /// Panics if `component` is not below the swept model's dimension.
    pub fn descending_responses(&self, component: usize) -> Vec<(f64, f64)> {
        Self::responses(self.descending(), component)
    }

    fn responses(segments: &[SweepSegment], component: usize) -> Vec<(f64, f64)> {
        segments
            .iter()
            .filter_map(|segment| {
                segment
                    .trajectory
                    .terminal_state()
                    .map(|state| (segment.signal, state[component]))
            })
            .collect()
    }

    /// Flattens the record onto a single strictly increasing time axis.
    ///
    /// Adjacent segments share their boundary sample (the next segment starts
    /// from an exact copy of the previous terminal state), so each
    /// non-initial segment contributes its samples from the second onward.
    ///
    /// # Panics
    ///
    /// Panics if `component` is not below the swept model's dimension.
    pub fn flatten(&self, component: usize) -> SweepSeries {
        let mut series = SweepSeries {
            t: Vec::new(),
            signal: Vec::new(),
            response: Vec::new(),
        };
        for (i, segment) in self.segments.iter().enumerate() {
            let skip = usize::from(i > 0);
            for (j, &t) in segment.trajectory.t.iter().enumerate().skip(skip) {
                series.t.push(t);
                series.signal.push(segment.signal);
                series.response.push(segment.trajectory.y[j][component]);
            }
        }
        series
    }
}

/// A full-model sweep and its quasi-steady-state reduction, run in lockstep
/// over the same signal schedule and global clock with independently carried
/// states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedSweepRecord {
    pub full: SweepRecord,
    pub reduced: SweepRecord,
}

fn advance<M, F>(
    config: &SweepConfig,
    step: usize,
    signal: f64,
    state: &mut [f64],
    offset: f64,
    model_at: &mut F,
) -> Result<SweepSegment, MotifError>
where
    M: ReactionSystem<f64>,
    F: FnMut(f64) -> Result<M, MotifError>,
{
    let model = model_at(signal).map_err(|source| MotifError::SweepAborted {
        step,
        signal,
        source: Box::new(source),
    })?;
    let mut trajectory = integrate_n(
        &model,
        state,
        0.0,
        config.segment_span,
        config.segment_samples,
        &config.integrator,
    )
    .map_err(|source| MotifError::SweepAborted {
        step,
        signal,
        source: Box::new(source),
    })?;
    if let Some(terminal) = trajectory.terminal_state() {
        state.copy_from_slice(terminal);
    }
    trajectory.shift_time(offset);
    Ok(SweepSegment { signal, trajectory })
}

/// Runs an up-then-down continuation sweep of a single model.
///
/// `model_at` derives a model instance for each signal value; the sweep owns
/// the carried state and the clock. A segment is atomic: the first failure
/// aborts the whole sweep with [`MotifError::SweepAborted`], because a
/// corrupted carried state would silently invalidate every later segment.
pub fn run_sweep<M, F>(
    config: &SweepConfig,
    initial_state: &[f64],
    mut model_at: F,
) -> Result<SweepRecord, MotifError>
where
    M: ReactionSystem<f64>,
    F: FnMut(f64) -> Result<M, MotifError>,
{
    config.validate()?;
    let ascending = config.ascending_signals();
    let descending = config.descending_signals();
    let mut state = initial_state.to_vec();
    let mut offset = 0.0;
    let mut segments = Vec::with_capacity(ascending.len() + descending.len());
    for (step, &signal) in ascending.iter().chain(descending.iter()).enumerate() {
        segments.push(advance(
            config,
            step,
            signal,
            &mut state,
            offset,
            &mut model_at,
        )?);
        offset += config.segment_span;
    }
    Ok(SweepRecord {
        segments,
        ascending_len: ascending.len(),
    })
}

/// Runs [`run_sweep`] for a full model and its reduction over the same signal
/// schedule, so the reduction's fidelity can be judged signal by signal.
pub fn run_paired_sweep<MF, MR, F, G>(
    config: &SweepConfig,
    full_initial: &[f64],
    reduced_initial: &[f64],
    mut full_at: F,
    mut reduced_at: G,
) -> Result<PairedSweepRecord, MotifError>
where
    MF: ReactionSystem<f64>,
    MR: ReactionSystem<f64>,
    F: FnMut(f64) -> Result<MF, MotifError>,
    G: FnMut(f64) -> Result<MR, MotifError>,
{
    config.validate()?;
    let ascending = config.ascending_signals();
    let descending = config.descending_signals();
    let mut full_state = full_initial.to_vec();
    let mut reduced_state = reduced_initial.to_vec();
    let mut offset = 0.0;
    let count = ascending.len() + descending.len();
    let mut full_segments = Vec::with_capacity(count);
    let mut reduced_segments = Vec::with_capacity(count);
    for (step, &signal) in ascending.iter().chain(descending.iter()).enumerate() {
        full_segments.push(advance(
            config,
            step,
            signal,
            &mut full_state,
            offset,
            &mut full_at,
        )?);
        reduced_segments.push(advance(
            config,
            step,
            signal,
            &mut reduced_state,
            offset,
            &mut reduced_at,
        )?);
        offset += config.segment_span;
    }
    let ascending_len = ascending.len();
    Ok(PairedSweepRecord {
        full: SweepRecord {
            segments: full_segments,
            ascending_len,
        },
        reduced: SweepRecord {
            segments: reduced_segments,
            ascending_len,
        },
    })
}
