//! Plotters-powered sales chart widget for Ratatui.
//!
//! Rendered into the Ratatui buffer via `plotters-ratatui-backend`. All series
//! and bounds are computed by the caller; `render()` only draws.

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// History, forecast, and optional interval bounds.
pub struct SalesChart<'a> {
    pub history: &'a [(f64, f64)],
    pub forecast: &'a [(f64, f64)],
    pub lower: &'a [(f64, f64)],
    pub upper: &'a [(f64, f64)],
    /// X bounds in days since `origin`.
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub origin: NaiveDate,
    pub y_label: &'a str,
}

impl SalesChart<'_> {
    fn fmt_day(&self, days: f64) -> String {
        (self.origin + Duration::days(days.round() as i64)).format("%d %b").to_string()
    }
}

impl Widget for SalesChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out axes in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

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
                .x_desc("week")
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| self.fmt_day(*v))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let history_color = WHITE;
            let forecast_color = RGBColor(0, 255, 255); // cyan
            let bound_color = RGBColor(255, 200, 0); // amber

            chart.draw_series(LineSeries::new(self.history.iter().copied(), &history_color))?;
            if !self.forecast.is_empty() {
                chart.draw_series(LineSeries::new(self.forecast.iter().copied(), &forecast_color))?;
            }

            // Pixels rather than circles: the backend scales circle radii badly.
            chart.draw_series(
                self.lower
                    .iter()
                    .chain(self.upper)
                    .map(|&(x, y)| Pixel::new((x, y), bound_color)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
