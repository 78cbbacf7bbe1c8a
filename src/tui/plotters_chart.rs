//! Plotters-powered quarterly metrics chart widget for Ratatui.
//!
//! Plotters output is rendered into the Ratatui buffer through
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::Metric;

/// Line colors, indexed like the selected metrics.
pub const PALETTE: [(u8, u8, u8); 6] = [
    (0, 255, 255),
    (255, 200, 0),
    (0, 255, 0),
    (255, 0, 255),
    (255, 80, 80),
    (160, 160, 255),
];

pub fn palette(i: usize) -> (u8, u8, u8) {
    PALETTE[i % PALETTE.len()]
}

/// A render-only chart description.
///
/// All series and bounds are computed outside the render call so `render()`
/// only draws.
pub struct QuarterlyChart<'a> {
    /// One line per selected metric; x is the quarter index.
    pub series: &'a [(Metric, Vec<(f64, f64)>)],
    /// Quarter label for each x index.
    pub labels: &'a [String],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for QuarterlyChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters cannot lay out a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let labels = self.labels;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| quarter_label(labels, *v))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for (i, (_, points)) in self.series.iter().enumerate() {
                let (r, g, b) = palette(i);
                chart.draw_series(LineSeries::new(points.iter().copied(), &RGBColor(r, g, b)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Label for a (possibly fractional) x tick; empty between quarters.
fn quarter_label(labels: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 0.25 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}
