//! Line plots of one-dimensional functions, written as PNG.

use anyhow::{anyhow, ensure, Context, Result};
use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const CURVE: RGBColor = RGBColor(31, 119, 180);
/// Smallest canvas side that leaves room for the caption and axis labels.
pub const MIN_SIDE: u32 = 120;

/// Text drawn around the chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlotLabels {
    pub title: String,
    pub x: String,
    pub y: String,
    /// Legend entry of the curve.
    pub legend: String,
}

impl Default for PlotLabels {
    fn default() -> Self {
        Self {
            title: "f(x) = x^2".to_string(),
            x: "x".to_string(),
            y: "f(x)".to_string(),
            legend: "f(x) = x^2".to_string(),
        }
    }
}

/// `n` evenly spaced values from `start` to `end`, both included.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn linspace(start: f32, end: f32, n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f32;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f32 })
                .collect()
        }
    }
}

/// Sampled points of a function.
#[derive(Clone, Debug)]
pub struct FunctionPlot {
    pub xs: Vec<f32>,
    pub ys: Vec<f32>,
    pub labels: PlotLabels,
}

impl FunctionPlot {
    /// Samples `f` at `n` points over `[x_min, x_max]`.
    pub fn sample(f: impl Fn(f32) -> f32, x_min: f32, x_max: f32, n: usize) -> Self {
        let xs = linspace(x_min, x_max, n);
        let ys = xs.iter().map(|&x| f(x)).collect();
        Self { xs, ys, labels: PlotLabels::default() }
    }

    #[must_use]
    pub fn with_labels(mut self, labels: PlotLabels) -> Self {
        self.labels = labels;
        self
    }

    fn points(&self) -> Vec<(f32, f32)> {
        self.xs
            .iter()
            .zip(&self.ys)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(&x, &y)| (x, y))
            .collect()
    }

    /// Draws the titled chart: grid mesh with axis labels, axes through the
    /// origin when it is in view, the curve and its legend.
    ///
    /// # Errors
    ///
    /// Fails on a canvas smaller than [`MIN_SIDE`], when no sample is finite,
    /// or when plotting itself fails (for example, no font is available).
    pub fn render(&self, width: u32, height: u32) -> Result<RgbImage> {
        ensure!(
            width >= MIN_SIDE && height >= MIN_SIDE,
            "canvas {width}x{height} is smaller than {MIN_SIDE}x{MIN_SIDE}"
        );
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            self.draw(&root)?;
            root.present().map_err(plot_err)?;
        }
        RgbImage::from_raw(width, height, buffer).context("plot buffer does not match canvas size")
    }

    fn draw(&self, root: &DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()> {
        let points = self.points();
        ensure!(!points.is_empty(), "no finite samples to plot");
        let (x0, x1) = padded_range(points.iter().map(|p| p.0));
        let (y0, y1) = padded_range(points.iter().map(|p| p.1));

        root.fill(&WHITE).map_err(plot_err)?;
        let mut chart = ChartBuilder::on(root)
            .caption(&self.labels.title, ("sans-serif", 22).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc(&self.labels.x)
            .y_desc(&self.labels.y)
            .axis_desc_style(("sans-serif", 14).into_font())
            .light_line_style(RGBColor(235, 235, 235))
            .bold_line_style(RGBColor(210, 210, 210))
            .draw()
            .map_err(plot_err)?;

        if x0 <= 0.0 && 0.0 <= x1 {
            chart
                .draw_series(LineSeries::new([(0.0, y0), (0.0, y1)], BLACK.stroke_width(1)))
                .map_err(plot_err)?;
        }
        if y0 <= 0.0 && 0.0 <= y1 {
            chart
                .draw_series(LineSeries::new([(x0, 0.0), (x1, 0.0)], BLACK.stroke_width(1)))
                .map_err(plot_err)?;
        }

        chart
            .draw_series(LineSeries::new(points, CURVE.stroke_width(2)))
            .map_err(plot_err)?
            .label(&self.labels.legend)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], CURVE.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperMiddle)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(plot_err)?;
        Ok(())
    }

    /// Renders and writes a PNG to `path`.
    ///
    /// # Errors
    ///
    /// Fails if rendering fails or the image cannot be written.
    pub fn save(&self, path: &Path, width: u32, height: u32) -> Result<()> {
        self.render(width, height)?
            .save(path)
            .with_context(|| format!("writing plot to {}", path.display()))?;
        tracing::info!(path = %path.display(), points = self.xs.len(), "plot written");
        Ok(())
    }
}

/// Min and max of `values`, widened by one unit when they coincide.
fn padded_range(values: impl Iterator<Item = f32>) -> (f32, f32) {
    let (lo, hi) = values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

fn plot_err(e: impl std::fmt::Debug) -> anyhow::Error {
    anyhow!("plotting failed: {e:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKGROUND: image::Rgb<u8> = image::Rgb([255, 255, 255]);

    fn inked(img: &RgbImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> usize {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| *img.get_pixel(x, y) != BACKGROUND)
            .count()
    }

    #[test]
    fn linspace_hits_both_ends() {
        let xs = linspace(-10.0, 10.0, 400);
        assert_eq!(xs.len(), 400);
        assert_eq!(xs[0], -10.0);
        assert_eq!(xs[399], 10.0);
        assert!(xs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 5.0, 1), vec![3.0]);
    }

    #[test]
    fn parabola_chart_has_curve_and_dimensions() {
        let plot = FunctionPlot::sample(|x| x * x, -10.0, 10.0, 400);
        let img = plot.render(400, 300).unwrap();
        assert_eq!(img.dimensions(), (400, 300));
        let bluish = |p: &image::Rgb<u8>| u16::from(p.0[2]) > u16::from(p.0[0]) + 60;
        assert!(img.pixels().filter(|p| bluish(p)).count() > 100);
    }

    #[test]
    fn caption_and_axis_labels_are_drawn() {
        let plot = FunctionPlot::sample(|x| x * x, -10.0, 10.0, 400);
        let img = plot.render(800, 600).unwrap();
        // caption band above the plotting area
        assert!(inked(&img, 0..800, 0..30) > 0, "no caption");
        // y label area left of the plotting area
        assert!(inked(&img, 0..50, 40..560) > 0, "no y labels");
        // x label area below the plotting area
        assert!(inked(&img, 60..790, 560..600) > 0, "no x labels");
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let plot = FunctionPlot::sample(|x| x, 0.0, 1.0, 10);
        assert!(plot.render(50, 50).is_err());
    }

    #[test]
    fn all_nan_samples_are_rejected() {
        let plot = FunctionPlot::sample(|_| f32::NAN, 0.0, 1.0, 10);
        assert!(plot.render(200, 200).is_err());
    }
}
