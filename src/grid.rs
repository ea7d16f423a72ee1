use ndarray::{Array1, Array2};

/// Regular square mesh over [min, max] x [min, max].
///
/// The coordinate arrays follow mesh-grid semantics: `x[[i, j]]` varies
/// along columns, `y[[i, j]]` varies along rows.
pub struct Grid {
    pub n: usize, // Number of points per axis
    pub min: f64, // Lower bound of the interval
    pub max: f64, // Upper bound of the interval
    pub x: Array2<f64>,
    pub y: Array2<f64>,
}

impl Grid {
    pub fn new(min: f64, max: f64, n: usize) -> Self {
        let samples = Array1::linspace(min, max, n);
        // x[[i, j]] = samples[j], y[[i, j]] = samples[i]
        let x = Array2::from_shape_fn((n, n), |(_, j)| samples[j]);
        let y = Array2::from_shape_fn((n, n), |(i, _)| samples[i]);
        Grid { n, min, max, x, y }
    }

    pub fn spacing(&self) -> f64 {
        // Distance between adjacent samples along either axis
        (self.max - self.min) / (self.n - 1) as f64
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}
