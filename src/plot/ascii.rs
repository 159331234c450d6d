//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - historical weeks: `o`, joined by a `-` line
//! - forecast weeks: `*`, joined to the last historical week by a `.` line

use chrono::NaiveDate;

use crate::domain::{ChartPoint, PointOrigin};

/// Render the combined history + forecast series.
///
/// The x axis is calendar time (days since the first point), so gaps in the
/// weekly history show up as gaps on the chart.
pub fn render_forecast_plot(points: &[ChartPoint], width: usize, height: usize, y_label: &str) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some(first) = points.first() else {
        return format!("Plot: (no data) | {y_label}\n");
    };
    let origin = first.date;
    let last_date = points.iter().map(|p| p.date).max().unwrap_or(origin);
    let x_max = ((last_date - origin).num_days() as f64).max(1.0);

    let (y_min, y_max) = y_range(points).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let to_cell = |p: &ChartPoint| {
        (
            map_x(days_from(origin, p.date), x_max, width),
            map_y(p.value, y_min, y_max, height),
        )
    };

    let history: Vec<(usize, usize)> = points
        .iter()
        .filter(|p| p.origin == PointOrigin::Historical)
        .map(to_cell)
        .collect();
    let mut future: Vec<(usize, usize)> = history.last().copied().into_iter().collect();
    future.extend(points.iter().filter(|p| p.origin == PointOrigin::Forecast).map(to_cell));

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so markers overlay them.
    draw_path(&mut grid, &history, '-');
    draw_path(&mut grid, &future, '.');

    for p in points {
        let (x, y) = to_cell(p);
        grid[y][x] = match p.origin {
            PointOrigin::Historical => 'o',
            PointOrigin::Forecast => '*',
        };
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {origin} .. {last_date} | {y_label}=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str("o history  * forecast\n");
    out
}

fn days_from(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

fn y_range(points: &[ChartPoint]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_y = min_y.min(p.value);
        max_y = max_y.max(p.value);
    }

    if !(min_y.is_finite() && max_y.is_finite()) {
        None
    } else if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat series: center it.
        Some((min_y - 1.0, max_y + 1.0))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_max: f64, width: usize) -> usize {
    let u = (t / t_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_path(grid: &mut [Vec<char>], cells: &[(usize, usize)], ch: char) {
    for w in cells.windows(2) {
        let ((x0, y0), (x1, y1)) = (w[0], w[1]);
        draw_line(grid, x0, y0, x1, y1, ch);
    }
}

/// Integer line drawing (Bresenham). Only fills empty cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, value: f64, origin: PointOrigin) -> ChartPoint {
        ChartPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            value,
            origin,
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let points = vec![
            point(1, 100.0, PointOrigin::Historical),
            point(8, 110.0, PointOrigin::Historical),
            point(15, 120.0, PointOrigin::Forecast),
        ];

        let txt = render_forecast_plot(&points, 10, 5, "Sales ($)");
        let expected = concat!(
            "Plot: 2024-01-01 .. 2024-01-15 | Sales ($)=[99.00, 121.00]\n",
            "        .*\n",
            "      ..  \n",
            "    -o    \n",
            "  --      \n",
            "o-        \n",
            "o history  * forecast\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn flat_series_is_drawn_mid_height() {
        let points = vec![
            point(1, 50.0, PointOrigin::Historical),
            point(8, 50.0, PointOrigin::Historical),
        ];
        let txt = render_forecast_plot(&points, 10, 5, "Units");
        let rows: Vec<&str> = txt.lines().collect();
        assert_eq!(rows[3], "o--------o");
    }

    #[test]
    fn empty_input_has_header_only() {
        assert_eq!(render_forecast_plot(&[], 10, 5, "Units"), "Plot: (no data) | Units\n");
    }
}
