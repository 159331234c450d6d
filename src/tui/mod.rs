//! Ratatui-based terminal UI.
//!
//! The file is loaded (and previewed) before the terminal is taken over, so
//! load errors print like any other CLI error. Inside the TUI:
//!
//! - `f` runs the forecast for the current method
//! - `m` cycles the method (the old forecast is dropped)
//! - `r` reloads the file from disk
//! - `q` quits

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::pipeline::{self, ForecastRun, Preview};
use crate::domain::ForecastConfig;
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::SalesChart;

/// Load the configured file, then start the TUI.
pub fn run(config: ForecastConfig) -> Result<(), AppError> {
    let preview = pipeline::load_preview(&config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, preview);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Quit,
    Forecast,
}

struct App {
    config: ForecastConfig,
    preview: Preview,
    forecast: Option<ForecastRun>,
    status: String,
}

impl App {
    fn new(config: ForecastConfig, preview: Preview) -> Self {
        let status = format!("Loaded {} week(s). Press f to forecast.", preview.series.len());
        Self {
            config,
            preview,
            forecast: None,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                self.redraw(terminal)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match self.handle_key(key.code) {
                        Action::Quit => break,
                        Action::Forecast => {
                            // Show the busy status before the blocking fit.
                            self.status = format!("Fitting {}…", self.config.method.display_name());
                            self.redraw(terminal)?;
                            self.run_forecast();
                        }
                        Action::None => {}
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn redraw<B: ratatui::backend::Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        terminal
            .draw(|f| self.draw(f))
            .map(|_| ())
            .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))
    }

    fn handle_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Char('f') | KeyCode::Enter => return Action::Forecast,
            KeyCode::Char('m') => {
                self.config.method = self.config.method.next();
                self.forecast = None;
                self.status = format!("method: {}", self.config.method.display_name());
            }
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
        Action::None
    }

    fn run_forecast(&mut self) {
        match pipeline::run_forecast(&self.preview.series, &self.config) {
            Ok(run) => {
                self.status = format!(
                    "{}: {} week(s) from {}",
                    run.method.display_name(),
                    run.points.len(),
                    run.points.first().map(|p| p.period_start.to_string()).unwrap_or_default(),
                );
                self.forecast = Some(run);
            }
            Err(err) => {
                self.forecast = None;
                self.status = format!("{err} {}", err.hint());
            }
        }
    }

    /// Re-read the file; everything derived from the old contents is dropped.
    fn reload(&mut self) {
        self.forecast = None;
        match pipeline::load_preview(&self.config) {
            Ok(preview) => {
                self.status = format!("Reloaded {} week(s).", preview.series.len());
                self.preview = preview;
            }
            Err(err) => {
                self.status = err.to_string().replace('\n', " ");
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let binding = &self.preview.binding;
        let stats = &self.preview.stats;
        let lines = vec![
            Line::from(vec![
                Span::styled("salescast", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" {}", self.config.csv_path.display())),
            ]),
            Line::from(Span::styled(
                format!(
                    "date: {} | value: {} | rows: {} used, {} dropped | weeks: {}",
                    binding.date_column,
                    binding.value_column,
                    stats.rows_used,
                    stats.rows_dropped,
                    self.preview.series.len(),
                ),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!("method: {} | seed: {}", self.config.method.display_name(), self.config.seed),
                Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(0)])
            .split(area);

        self.draw_tables(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
    }

    fn draw_tables(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines = vec![Line::from(Span::styled(
            format!("Last {} weeks", self.preview.tail.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        for p in &self.preview.tail {
            lines.push(Line::raw(format!("{}  {:>14.2}", p.week_start, p.value)));
        }

        if let Some(run) = &self.forecast {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                "Forecast",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            for p in &run.points {
                let range = match (p.lower, p.upper) {
                    (Some(lo), Some(hi)) => format!(" [{lo:.0}, {hi:.0}]"),
                    _ => String::new(),
                };
                lines.push(Line::raw(format!("{}  {:>10.2}{range}", p.period_start, p.estimate)));
            }
        }

        let p = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .title(self.preview.binding.value_label())
                .borders(Borders::ALL),
        );
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Weekly history + forecast").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(series) = chart_series(&self.preview, self.forecast.as_ref()) else {
            let msg = Paragraph::new("No weekly data.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let widget = SalesChart {
            history: &series.history,
            forecast: &series.forecast,
            lower: &series.lower,
            upper: &series.upper,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            origin: series.origin,
            y_label: self.preview.binding.value_label(),
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "f forecast  m method  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Chart data in plot coordinates (x = days since `origin`).
#[derive(Debug, Clone)]
struct ChartSeries {
    origin: NaiveDate,
    history: Vec<(f64, f64)>,
    /// Starts at the last historical point so the two lines join.
    forecast: Vec<(f64, f64)>,
    lower: Vec<(f64, f64)>,
    upper: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

fn chart_series(preview: &Preview, forecast: Option<&ForecastRun>) -> Option<ChartSeries> {
    let origin = preview.series.first()?.week_start;
    let x = |d: NaiveDate| (d - origin).num_days() as f64;

    let history: Vec<(f64, f64)> = preview.series.iter().map(|p| (x(p.week_start), p.value)).collect();

    let mut future = Vec::new();
    let mut lower = Vec::new();
    let mut upper = Vec::new();
    if let Some(run) = forecast {
        future.extend(history.last().copied());
        for p in &run.points {
            let px = x(p.period_start);
            future.push((px, p.estimate));
            if let (Some(lo), Some(hi)) = (p.lower, p.upper) {
                lower.push((px, lo));
                upper.push((px, hi));
            }
        }
    }

    let (mut x_max, mut y_min, mut y_max) = (1.0_f64, f64::INFINITY, f64::NEG_INFINITY);
    for &(px, py) in history.iter().chain(&future).chain(&lower).chain(&upper) {
        x_max = x_max.max(px);
        y_min = y_min.min(py);
        y_max = y_max.max(py);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    Some(ChartSeries {
        origin,
        history,
        forecast: future,
        lower,
        upper,
        x_bounds: [0.0, x_max],
        y_bounds: [y_min - pad, y_max + pad],
    })
}
