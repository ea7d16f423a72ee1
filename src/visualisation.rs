use crate::deformation::DeformationField;
use crate::grid::Grid;
use anyhow::Result;
use ndarray::Array2;
use plotters::chart::ChartContext;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::element::Polygon;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::path::Path;

// Axis limits extend the mesh domain by this much on every side
const AXIS_PAD: f64 = 0.1;
const COLORBAR_HEIGHT: i32 = 85;
const MARGIN: i32 = 10;
const X_LABEL_AREA: i32 = 40;
const Y_LABEL_AREA: i32 = 55;
// Approximate vertical space consumed by the caption text
const CAPTION_HEIGHT: i32 = 36;

type Chart2d<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

pub struct FieldVisualiser {
    output_path: String,
    width: u32,
    height: u32,
    // Store as a boxed trait object
    gradient: Box<dyn colorgrad::Gradient>,
}

impl FieldVisualiser {
    pub fn new(output_path: &str, width: u32, height: u32) -> Self {
        let gradient = Box::new(colorgrad::preset::plasma());

        Self {
            output_path: output_path.to_string(),
            width,
            height,
            gradient,
        }
    }

    /// Render the three-panel figure and write it to the output path,
    /// overwriting any existing file.
    pub fn plot(&self, grid: &Grid, field: &DeformationField) -> Result<()> {
        if let Some(parent) = Path::new(&self.output_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let root =
            BitMapBackend::new(&self.output_path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let panels = root.split_evenly((1, 3));

        let magnitude = field.displacement_magnitude();
        let mag_max = magnitude.iter().fold(0.0_f64, |acc, &v| acc.max(v));
        let e11 = field.e11[[0, 0]];
        let e22 = field.e22[[0, 0]];

        self.draw_panel(
            &panels[0],
            grid,
            &magnitude,
            (0.0, mag_max),
            "Biaxial Loading (Displacements u)",
            Some(field),
        )?;
        self.draw_panel(
            &panels[1],
            grid,
            &field.e11,
            strain_color_range(e11),
            &format!("Biaxial Loading (Strain e11 = {})", e11),
            None,
        )?;
        self.draw_panel(
            &panels[2],
            grid,
            &field.e22,
            strain_color_range(e22),
            &format!("Biaxial Loading (Strain e22 = {})", e22),
            None,
        )?;

        root.present()?;
        Ok(())
    }

    fn draw_panel(
        &self,
        panel: &DrawingArea<BitMapBackend<'_>, Shift>,
        grid: &Grid,
        data: &Array2<f64>,
        range: (f64, f64),
        title: &str,
        arrows: Option<&DeformationField>,
    ) -> Result<()> {
        let (vmin, vmax) = pad_degenerate(range);

        let (panel_w, panel_h) = panel.dim_in_pixel();
        let (panel_w, panel_h) = (panel_w as i32, panel_h as i32);
        let (chart_area, bar_area) = panel.split_vertically(panel_h - COLORBAR_HEIGHT);

        // Widen the side margins until the plot box is square (equal axis scales)
        let plot_w = panel_w - Y_LABEL_AREA - 2 * MARGIN;
        let plot_h = panel_h - COLORBAR_HEIGHT - X_LABEL_AREA - CAPTION_HEIGHT - 2 * MARGIN;
        let extra = ((plot_w - plot_h) / 2).max(0);

        let lo = grid.min - AXIS_PAD;
        let hi = grid.max + AXIS_PAD;

        let mut chart = ChartBuilder::on(&chart_area)
            .caption(title, ("sans-serif", 22))
            .margin(MARGIN)
            .margin_left(MARGIN + extra)
            .margin_right(MARGIN + extra)
            .x_label_area_size(X_LABEL_AREA)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(lo..hi, lo..hi)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("x1")
            .y_desc("x2")
            .draw()?;

        self.draw_heatmap(&mut chart, grid, data, vmin, vmax)?;
        draw_grid_overlay(&mut chart, grid, lo, hi)?;
        if let Some(field) = arrows {
            draw_arrows(&mut chart, grid, field)?;
        }

        self.draw_colorbar(&bar_area, vmin, vmax, extra)?;
        Ok(())
    }

    fn draw_heatmap(
        &self,
        chart: &mut Chart2d<'_, '_>,
        grid: &Grid,
        data: &Array2<f64>,
        vmin: f64,
        vmax: f64,
    ) -> Result<()> {
        let (rows, cols) = data.dim();
        // Cells are centred on the grid points
        let half = grid.spacing() / 2.0;

        chart.draw_series((0..rows).flat_map(|i| (0..cols).map(move |j| (i, j))).map(
            |(i, j)| {
                let x = grid.x[[i, j]];
                let y = grid.y[[i, j]];
                let color = self.value_to_color(data[[i, j]], vmin, vmax);
                Rectangle::new([(x - half, y - half), (x + half, y + half)], color.filled())
            },
        ))?;
        Ok(())
    }

    /// Horizontal color-scale legend beneath a panel, aligned with its plot box.
    fn draw_colorbar(
        &self,
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        vmin: f64,
        vmax: f64,
        extra: i32,
    ) -> Result<()> {
        const STEPS: usize = 256;

        let mut chart = ChartBuilder::on(area)
            .margin(MARGIN)
            .margin_left(MARGIN + extra)
            .margin_right(MARGIN + extra)
            .x_label_area_size(22)
            .y_label_area_size(Y_LABEL_AREA)
            .build_cartesian_2d(vmin..vmax, 0.0..1.0)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(5)
            .y_labels(0)
            .x_label_formatter(&|v: &f64| format!("{:.2}", v))
            .draw()?;

        let span = vmax - vmin;
        chart.draw_series((0..STEPS).map(|k| {
            let x0 = vmin + span * k as f64 / STEPS as f64;
            let x1 = vmin + span * (k + 1) as f64 / STEPS as f64;
            let color = self.value_to_color((x0 + x1) / 2.0, vmin, vmax);
            Rectangle::new([(x0, 0.0), (x1, 1.0)], color.filled())
        }))?;
        Ok(())
    }

    fn value_to_color(&self, value: f64, min_val: f64, max_val: f64) -> RGBColor {
        let normalized = if max_val > min_val {
            (value - min_val) / (max_val - min_val)
        } else {
            0.5
        };
        let normalized = normalized.clamp(0.0, 1.0);
        let color_rgba = self.gradient.at(normalized as f32).to_rgba8();
        RGBColor(color_rgba[0], color_rgba[1], color_rgba[2])
    }
}

/// Color-scale range for a constant strain panel: zero to twice the strain
/// value, oriented so the range always contains zero.
pub fn strain_color_range(e: f64) -> (f64, f64) {
    if e >= 0.0 {
        (0.0, 2.0 * e)
    } else {
        (2.0 * e, 0.0)
    }
}

fn pad_degenerate((vmin, vmax): (f64, f64)) -> (f64, f64) {
    if vmax - vmin > f64::EPSILON {
        (vmin, vmax)
    } else {
        (vmin - 0.1, vmax + 0.1)
    }
}

/// Dashed low-opacity grid lines at the major ticks, drawn over the heatmap.
fn draw_grid_overlay(chart: &mut Chart2d<'_, '_>, grid: &Grid, lo: f64, hi: f64) -> Result<()> {
    let style = BLACK.mix(0.3).stroke_width(1);
    let ticks = 5;

    for k in 0..ticks {
        let t = grid.min + grid.width() * k as f64 / (ticks - 1) as f64;
        chart.draw_series(DashedLineSeries::new(vec![(t, lo), (t, hi)], 4, 4, style))?;
        chart.draw_series(DashedLineSeries::new(vec![(lo, t), (hi, t)], 4, 4, style))?;
    }
    Ok(())
}

/// Directional arrows encoding (u, v) at every grid point.
fn draw_arrows(chart: &mut Chart2d<'_, '_>, grid: &Grid, field: &DeformationField) -> Result<()> {
    let (rows, cols) = field.u.dim();

    let mut max_mag = 0.0_f64;
    for i in 0..rows {
        for j in 0..cols {
            let mag = (field.u[[i, j]].powi(2) + field.v[[i, j]].powi(2)).sqrt();
            max_mag = max_mag.max(mag);
        }
    }
    if max_mag <= 0.0 {
        return Ok(());
    }

    // The longest arrow spans about one and a half grid cells
    let scale = 1.5 * grid.spacing() / max_mag;
    let style = BLACK.mix(0.6).filled();

    let mut shafts = Vec::new();
    let mut heads = Vec::new();
    for i in 0..rows {
        for j in 0..cols {
            let x = grid.x[[i, j]];
            let y = grid.y[[i, j]];
            let du = field.u[[i, j]] * scale;
            let dv = field.v[[i, j]] * scale;
            let len = (du * du + dv * dv).sqrt();
            if len < 1e-12 {
                continue;
            }

            let (ex, ey) = (x + du, y + dv);
            shafts.push(PathElement::new(vec![(x, y), (ex, ey)], style));

            let (ux, uy) = (du / len, dv / len);
            let head_len = 0.3 * len;
            let head_w = 0.4 * head_len;
            let (px, py) = (-uy, ux);
            heads.push(Polygon::new(
                vec![
                    (ex, ey),
                    (ex - ux * head_len + px * head_w, ey - uy * head_len + py * head_w),
                    (ex - ux * head_len - px * head_w, ey - uy * head_len - py * head_w),
                ],
                style,
            ));
        }
    }

    chart.draw_series(shafts)?;
    chart.draw_series(heads)?;
    Ok(())
}
