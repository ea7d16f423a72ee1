mod config;
mod deformation;
mod grid;
mod visualisation;

use anyhow::Result;
use config::Config;
use deformation::{BiaxialLoading, DeformationField};
use grid::Grid;
use visualisation::FieldVisualiser;

fn main() -> Result<()> {
    let config = Config::load_or_default("config.toml")?;
    config.print_summary();

    let grid = Grid::new(config.grid.min, config.grid.max, config.grid.n);
    let loading = BiaxialLoading::new(config.loading.e11, config.loading.e22);
    let field = DeformationField::evaluate(&grid, loading);

    println!(
        "Max displacement magnitude: {:.4}",
        field.max_displacement_magnitude()
    );

    let visualiser = FieldVisualiser::new(
        &config.visualization.output,
        config.visualization.image_width,
        config.visualization.image_height,
    );
    visualiser.plot(&grid, &field)?;

    println!("Saved figure to {}", config.visualization.output);
    Ok(())
}
