use crate::error::MotifError;
use crate::traits::ReactionSystem;
use serde::{Deserialize, Serialize};

/// A sampled interval along one state-space axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub min: f64,
    pub max: f64,
    pub samples: usize,
}

impl AxisSpec {
    pub fn new(min: f64, max: f64, samples: usize) -> Self {
        Self { min, max, samples }
    }

    pub fn validate(&self) -> Result<(), MotifError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.max <= self.min {
            return Err(MotifError::Configuration(format!(
                "axis range must be finite with max > min (got [{}, {}])",
                self.min, self.max
            )));
        }
        if self.samples < 2 {
            return Err(MotifError::Configuration(format!(
                "axis needs at least 2 samples (got {})",
                self.samples
            )));
        }
        Ok(())
    }

    /// Evenly spaced sample positions, endpoints included.
    pub fn sample(&self) -> Vec<f64> {
        linspace(self.min, self.max, self.samples)
    }
}

/// `n` evenly spaced values from `min` to `max`, endpoints exact.
pub fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![min];
    }
    let span = max - min;
    let denom = (n - 1) as f64;
    (0..n).map(|i| min + span * i as f64 / denom).collect()
}

/// The rate vectors of a two-variable system evaluated over a rectangular
/// grid, flattened row-major (`index = iy * nx + ix`). Ephemeral by design:
/// recomputed on demand for rendering, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorFieldGrid {
    pub nx: usize,
    pub ny: usize,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub dx: Vec<f64>,
    pub dy: Vec<f64>,
    pub magnitude: Vec<f64>,
}

/// Evaluates `(dx/dt, dy/dt, |f|)` for a two-variable system over the grid
/// spanned by the two axes.
pub fn vector_field(
    system: &impl ReactionSystem<f64>,
    x_axis: &AxisSpec,
    y_axis: &AxisSpec,
) -> Result<VectorFieldGrid, MotifError> {
    x_axis.validate()?;
    y_axis.validate()?;
    if system.dimension() != 2 {
        return Err(MotifError::Configuration(format!(
            "vector field requires a two-variable system (dimension = {})",
            system.dimension()
        )));
    }

    let xs = x_axis.sample();
    let ys = y_axis.sample();
    let count = xs.len() * ys.len();
    let mut grid = VectorFieldGrid {
        nx: xs.len(),
        ny: ys.len(),
        x: Vec::with_capacity(count),
        y: Vec::with_capacity(count),
        dx: Vec::with_capacity(count),
        dy: Vec::with_capacity(count),
        magnitude: Vec::with_capacity(count),
    };

    let mut rate = [0.0; 2];
    for &y in &ys {
        for &x in &xs {
            system.apply(0.0, &[x, y], &mut rate);
            grid.x.push(x);
            grid.y.push(y);
            grid.dx.push(rate[0]);
            grid.dy.push(rate[1]);
            grid.magnitude.push(rate[0].hypot(rate[1]));
        }
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::{linspace, vector_field, AxisSpec};
    use crate::error::MotifError;
    use crate::traits::{ReactionSystem, Scalar};

    struct Linear;

    impl<T: Scalar> ReactionSystem<T> for Linear {
        fn dimension(&self) -> usize {
            2
        }
        fn apply(&self, _t: T, y: &[T], out: &mut [T]) {
            out[0] = y[1];
            out[1] = -y[0];
        }
    }

    #[test]
    fn linspace_hits_endpoints_exactly() {
        let values = linspace(0.0, 4.0, 41);
        assert_eq!(values.len(), 41);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[40], 4.0);
        assert_eq!(values[20], 2.0);
    }

    #[test]
    fn grid_has_expected_shape_and_magnitudes() {
        let grid = vector_field(
            &Linear,
            &AxisSpec::new(-1.0, 1.0, 5),
            &AxisSpec::new(0.0, 2.0, 3),
        )
        .expect("valid axes");
        assert_eq!(grid.nx, 5);
        assert_eq!(grid.ny, 3);
        assert_eq!(grid.dx.len(), 15);
        for i in 0..15 {
            let expected = grid.y[i].hypot(grid.x[i]);
            assert!((grid.magnitude[i] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn degenerate_axis_is_rejected() {
        let bad = AxisSpec::new(1.0, 1.0, 10);
        assert!(matches!(
            vector_field(&Linear, &bad, &AxisSpec::new(0.0, 1.0, 3)),
            Err(MotifError::Configuration(_))
        ));
        let too_few = AxisSpec::new(0.0, 1.0, 1);
        assert!(matches!(
            vector_field(&Linear, &AxisSpec::new(0.0, 1.0, 3), &too_few),
            Err(MotifError::Configuration(_))
        ));
    }
}
