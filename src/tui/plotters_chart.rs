//! Plotters-powered monthly line chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels (month names on the x axis)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::month_label;

/// One line of the chart: `(month, rentals)` points in a fixed colour.
pub struct MonthlyLine<'a> {
    pub points: &'a [(f64, f64)],
    pub color: RGBColor,
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call, so `render()`
/// only draws.
pub struct MonthlyPlottersChart<'a> {
    pub series: &'a [MonthlyLine<'a>],
    /// Upper y bound (rentals). The lower bound is always zero.
    pub y_max: f64,
    pub y_label: &'a str,
}

impl<'a> Widget for MonthlyPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead of panicking.
        if area.width < 20 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let y_max = self.y_max;
        if !y_max.is_finite() || y_max <= 0.0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(0.5f64..12.5f64, 0f64..y_max)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(self.y_label)
                .x_labels(12)
                .y_labels(5)
                .x_label_formatter(&|v| month_label(v.round().max(0.0) as u32).to_string())
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for line in self.series {
                chart.draw_series(LineSeries::new(line.points.iter().copied(), &line.color))?;

                // Pixels rather than `Circle` markers: the backend maps circle radii
                // to canvas units and draws oversized circles.
                chart.draw_series(line.points.iter().map(|&(x, y)| Pixel::new((x, y), line.color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
