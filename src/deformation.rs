use crate::grid::Grid;
use ndarray::Array2;

/// Diagonal components of the uniform strain tensor imposed by the load.
#[derive(Clone, Copy, Debug)]
pub struct BiaxialLoading {
    pub e11: f64, // Strain along x1 (positive = elongation)
    pub e22: f64, // Strain along x2 (negative = contraction)
}

impl BiaxialLoading {
    pub fn new(e11: f64, e22: f64) -> Self {
        Self { e11, e22 }
    }
}

impl Default for BiaxialLoading {
    fn default() -> Self {
        // Uniform extension along x1, matching contraction along x2
        Self {
            e11: 0.1,
            e22: -0.1,
        }
    }
}

pub struct DeformationField {
    // Displacement components
    pub u: Array2<f64>,
    pub v: Array2<f64>,
    // Constant strain components broadcast over the mesh
    pub e11: Array2<f64>,
    pub e22: Array2<f64>,
}

impl DeformationField {
    /// Evaluate the closed-form displacement field u(x) = e11*x1 e1 + e22*x2 e2
    /// on the mesh. Its gradient is the constant strain tensor diag(e11, e22).
    pub fn evaluate(grid: &Grid, loading: BiaxialLoading) -> Self {
        let u = &grid.x * loading.e11;
        let v = &grid.y * loading.e22;
        let e11 = Array2::from_elem(grid.x.raw_dim(), loading.e11);
        let e22 = Array2::from_elem(grid.y.raw_dim(), loading.e22);

        Self { u, v, e11, e22 }
    }

    pub fn displacement_magnitude(&self) -> Array2<f64> {
        // |u| = sqrt(u² + v²) at each grid point
        let (rows, cols) = self.u.dim();
        let mut mag = Array2::<f64>::zeros((rows, cols));
        for i in 0..rows {
            for j in 0..cols {
                mag[[i, j]] = (self.u[[i, j]].powi(2) + self.v[[i, j]].powi(2)).sqrt();
            }
        }
        mag
    }

    pub fn max_displacement_magnitude(&self) -> f64 {
        self.displacement_magnitude()
            .iter()
            .fold(0.0_f64, |acc, &v| acc.max(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn displacement_follows_the_linear_field() {
        let grid = Grid::new(-1.0, 1.0, 21);
        let field = DeformationField::evaluate(&grid, BiaxialLoading::default());

        for i in 0..grid.n {
            for j in 0..grid.n {
                assert_relative_eq!(field.u[[i, j]], 0.1 * grid.x[[i, j]], epsilon = 1e-12);
                assert_relative_eq!(field.v[[i, j]], -0.1 * grid.y[[i, j]], epsilon = 1e-12);
            }
        }

        // Corner (x=1, y=1) and centre (x=0, y=0)
        assert_relative_eq!(field.u[[20, 20]], 0.1, epsilon = 1e-12);
        assert_relative_eq!(field.v[[20, 20]], -0.1, epsilon = 1e-12);
        assert_relative_eq!(field.u[[10, 10]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(field.v[[10, 10]], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn magnitude_matches_the_components() {
        let grid = Grid::new(-1.0, 1.0, 21);
        let field = DeformationField::evaluate(&grid, BiaxialLoading::default());
        let mag = field.displacement_magnitude();

        for i in 0..grid.n {
            for j in 0..grid.n {
                let expected =
                    (field.u[[i, j]].powi(2) + field.v[[i, j]].powi(2)).sqrt();
                assert_relative_eq!(mag[[i, j]], expected, epsilon = 1e-12);
                assert!(mag[[i, j]] >= 0.0);
            }
        }

        assert_relative_eq!(mag[[20, 20]], 0.02_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(mag[[10, 10]], 0.0, epsilon = 1e-12);
        assert_relative_eq!(
            field.max_displacement_magnitude(),
            0.02_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn strains_are_uniform_over_the_mesh() {
        let grid = Grid::new(-1.0, 1.0, 21);
        let field = DeformationField::evaluate(&grid, BiaxialLoading::default());

        assert_eq!(field.e11.dim(), (21, 21));
        assert_eq!(field.e22.dim(), (21, 21));
        // Zero variance: every entry equals the imposed constant
        assert!(field.e11.iter().all(|&e| e == 0.1));
        assert!(field.e22.iter().all(|&e| e == -0.1));
    }
}
