//! Draws a [`Chart`] with `plotters`, either to a PNG file or into an RGB
//! pixel buffer for an on-screen window.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{day_label, Chart, Layer, LegendCorner, LineStyle, MarkerShape, PlotError};

/// Default chart size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (1024, 768);

const MARKER_SIZE: i32 = 5;

/// Bitmap renderer writing PNG files.
#[derive(Debug, Clone, Copy)]
pub struct PngWriter {
    size: (u32, u32),
}

impl PngWriter {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
        }
    }

    pub fn write(&self, chart: &Chart, path: &Path) -> Result<(), PlotError> {
        ensure_data(chart)?;
        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        draw_chart(&root, chart).map_err(|message| PlotError::Drawing {
            target: path.display().to_string(),
            message,
        })?;
        tracing::info!(path = %path.display(), title = %chart.title, "wrote chart");
        Ok(())
    }
}

impl Default for PngWriter {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE.0, DEFAULT_SIZE.1)
    }
}

/// Renders `chart` into a row-major RGB buffer of `width * height * 3` bytes.
pub fn render_rgb(chart: &Chart, (width, height): (u32, u32)) -> Result<Vec<u8>, PlotError> {
    ensure_data(chart)?;
    let mut buffer = vec![0_u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_chart(&root, chart).map_err(|message| PlotError::Drawing {
            target: chart.title.clone(),
            message,
        })?;
    }
    Ok(buffer)
}

/// Packs RGB triples into the `0RGB` words a framebuffer window expects.
pub fn rgb_to_0rgb(rgb: &[u8]) -> Vec<u32> {
    rgb.chunks_exact(3)
        .map(|pixel| u32::from(pixel[0]) << 16 | u32::from(pixel[1]) << 8 | u32::from(pixel[2]))
        .collect()
}

fn ensure_data(chart: &Chart) -> Result<(), PlotError> {
    if chart.is_empty() {
        return Err(PlotError::Empty(chart.title.clone()));
    }
    Ok(())
}

fn label_position(corner: LegendCorner) -> SeriesLabelPosition {
    match corner {
        LegendCorner::LowerRight => SeriesLabelPosition::LowerRight,
        LegendCorner::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendCorner::UpperRight => SeriesLabelPosition::UpperRight,
        LegendCorner::LowerLeft => SeriesLabelPosition::LowerLeft,
    }
}

fn draw_chart<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, chart: &Chart) -> Result<(), String> {
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let mut context = ChartBuilder::on(root)
        .caption(&chart.title, (FontFamily::SansSerif, 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(chart.x_range(), chart.y_range())
        .map_err(|e| e.to_string())?;

    context
        .configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .label_style((FontFamily::SansSerif, 12))
        .x_labels(chart.x_label_count())
        .x_label_formatter(&day_label)
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()
        .map_err(|e| e.to_string())?;

    for layer in &chart.layers {
        match layer {
            Layer::Line {
                label,
                points,
                color,
                width,
                style,
            } => {
                let line = color.rgb().stroke_width(*width);
                let annotation = match style {
                    LineStyle::Solid => context
                        .draw_series(LineSeries::new(points.iter().copied(), line))
                        .map_err(|e| e.to_string())?,
                    LineStyle::Dashed => context
                        .draw_series(DashedLineSeries::new(points.iter().copied(), 10, 6, line))
                        .map_err(|e| e.to_string())?,
                };
                annotation
                    .label(label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));
            }
            Layer::Markers {
                label,
                points,
                color,
                shape,
                error_bars,
            } => {
                let fill = color.rgb().filled();
                if !error_bars.is_empty() {
                    let bar = color.rgb().stroke_width(1);
                    context
                        .draw_series(error_bars.iter().map(|span| {
                            ErrorBar::new_vertical(span.x, span.low, span.value, span.high, bar, 8)
                        }))
                        .map_err(|e| e.to_string())?;
                }
                let annotation = match shape {
                    MarkerShape::Diamond => context
                        .draw_series(
                            points
                                .iter()
                                .map(|&point| EmptyElement::at(point) + diamond((0, 0), fill)),
                        )
                        .map_err(|e| e.to_string())?,
                    MarkerShape::Circle => context
                        .draw_series(points.iter().map(|&point| {
                            EmptyElement::at(point) + Circle::new((0, 0), MARKER_SIZE - 1, fill)
                        }))
                        .map_err(|e| e.to_string())?,
                };
                annotation.label(label.as_str());
                match shape {
                    MarkerShape::Diamond => {
                        annotation.legend(move |(x, y)| diamond((x + 10, y), fill))
                    }
                    MarkerShape::Circle => annotation
                        .legend(move |(x, y)| Circle::new((x + 10, y), MARKER_SIZE - 1, fill)),
                };
            }
        }
    }

    context
        .configure_series_labels()
        .label_font((FontFamily::SansSerif, 14))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(label_position(chart.legend_corner()))
        .draw()
        .map_err(|e| e.to_string())?;

    root.present().map_err(|e| e.to_string())
}

fn diamond((x, y): (i32, i32), style: ShapeStyle) -> Polygon<(i32, i32)> {
    Polygon::new(
        vec![
            (x, y - MARKER_SIZE),
            (x + MARKER_SIZE, y),
            (x, y + MARKER_SIZE),
            (x - MARKER_SIZE, y),
        ],
        style,
    )
}
