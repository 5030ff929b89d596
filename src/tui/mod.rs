//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for the date range, time bucket and year
//! selection, then renders the dashboard charts for the current selection.
//! Every edit recomputes the summary through the shared pipeline.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use plotters::style::RGBColor;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};
use tracing::info;

use crate::app::pipeline::{run_dashboard, DashboardSummary, YearSeries};
use crate::data::Dataset;
use crate::domain::{weekday_label, DashboardConfig, DayTypeMetric, Selection, YearIndex};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{MonthlyLine, MonthlyPlottersChart};

const PEAK_COLOR: Color = Color::Rgb(0x72, 0xBC, 0xD4);
const NORMAL_COLOR: Color = Color::Rgb(0xD3, 0xD3, 0xD3);
const FIRST_YEAR_COLOR: RGBColor = RGBColor(0xFF, 0xDB, 0x58);
const SECOND_YEAR_COLOR: RGBColor = RGBColor(0x9A, 0xCD, 0x32);

const DEFAULT_EXPORT_PATH: &str = "bike-dash-summary.json";

const FIELD_START: usize = 0;
const FIELD_END: usize = 1;
const FIELD_BUCKET: usize = 2;
const FIELD_YEARS: usize = 3;
const FIELD_METRIC: usize = 4;
const FIELD_COUNT: usize = 5;

/// Start the TUI.
///
/// Datasets are fetched before the terminal switches to the alternate screen,
/// so load failures print like any other CLI error.
pub fn run(config: DashboardConfig) -> Result<(), AppError> {
    eprintln!("Loading bike sharing data...");
    let dataset = Dataset::load(&config.data)?;
    let selection = crate::app::resolve_selection(&config, &dataset)?;
    let mut app = App::new(config, dataset, selection)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
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

struct App {
    dataset: Dataset,
    /// Full date span of the daily data; `r` resets the range to it.
    bounds: (NaiveDate, NaiveDate),
    selection: Selection,
    summary: DashboardSummary,
    export_path: PathBuf,
    date_input: String,
    selected_field: usize,
    editing_date: bool,
    status: String,
}

impl App {
    fn new(config: DashboardConfig, dataset: Dataset, selection: Selection) -> Result<Self, AppError> {
        let bounds = dataset
            .date_bounds()
            .ok_or_else(|| AppError::no_data("Daily dataset is empty."))?;
        let summary = run_dashboard(&dataset, &selection);
        let rows = dataset.report().daily.rows_used;
        Ok(Self {
            dataset,
            bounds,
            selection,
            summary,
            export_path: config.export.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH)),
            date_input: String::new(),
            selected_field: FIELD_START,
            editing_date: false,
            status: format!("Loaded {rows} days ({} .. {}).", bounds.0, bounds.1),
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
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

    /// Apply one key press. Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_date {
            self.handle_date_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field + 1 < FIELD_COUNT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if let Some(current) = self.selected_date() {
                    self.editing_date = true;
                    self.date_input = current.to_string();
                    self.status = "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string();
                }
            }
            KeyCode::Char('r') => {
                self.selection.start = self.bounds.0;
                self.selection.end = self.bounds.1;
                self.recompute();
                self.status = format!("Range reset to {} .. {}", self.bounds.0, self.bounds.1);
            }
            KeyCode::Char('e') => self.export(),
            _ => {}
        }

        false
    }

    fn handle_date_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_date = false;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_date = false;
                self.apply_date_input();
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn selected_date(&self) -> Option<NaiveDate> {
        match self.selected_field {
            FIELD_START => Some(self.selection.start),
            FIELD_END => Some(self.selection.end),
            _ => None,
        }
    }

    fn set_selected_date(&mut self, date: NaiveDate) {
        match self.selected_field {
            FIELD_START => self.selection.start = date,
            FIELD_END => self.selection.end = date,
            _ => return,
        }
        self.recompute();
        self.status = format!("Range: {} .. {}", self.selection.start, self.selection.end);
    }

    fn adjust_field(&mut self, delta: i64) {
        match self.selected_field {
            FIELD_START | FIELD_END => {
                let Some(current) = self.selected_date() else {
                    return;
                };
                if let Some(next) = current.checked_add_signed(chrono::Duration::days(delta)) {
                    self.set_selected_date(next);
                }
            }
            FIELD_BUCKET => {
                self.selection.bucket = if delta >= 0 {
                    self.selection.bucket.next()
                } else {
                    self.selection.bucket.prev()
                };
                self.recompute();
                self.status = format!("Time of day: {}", self.selection.bucket.display_name());
            }
            FIELD_YEARS => {
                self.selection.years = if delta >= 0 {
                    self.selection.years.next()
                } else {
                    self.selection.years.prev()
                };
                self.recompute();
                self.status = format!("Year: {}", self.selection.years.display_name());
            }
            FIELD_METRIC => {
                self.selection.day_type_metric = match self.selection.day_type_metric {
                    DayTypeMetric::Flags => DayTypeMetric::Rentals,
                    DayTypeMetric::Rentals => DayTypeMetric::Flags,
                };
                self.recompute();
                self.status = format!("Day-type metric: {}", metric_name(self.selection.day_type_metric));
            }
            _ => {}
        }
    }

    fn apply_date_input(&mut self) {
        let trimmed = self.date_input.trim().to_string();
        match NaiveDate::parse_from_str(&trimmed, "%Y-%m-%d") {
            Ok(date) => self.set_selected_date(date),
            Err(e) => {
                self.status = format!("Invalid date '{trimmed}': {e}");
            }
        }
    }

    fn recompute(&mut self) {
        self.summary = run_dashboard(&self.dataset, &self.selection);
    }

    fn export(&mut self) {
        match crate::io::export::write_summary_json(&self.export_path, &self.summary) {
            Ok(()) => {
                info!(path = %self.export_path.display(), "summary exported");
                self.status = format!("Wrote {}", self.export_path.display());
            }
            Err(err) => {
                self.status = format!("Export failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("Dashboard Bike Sharing", Style::default().fg(PEAK_COLOR)),
            Span::raw(format!(
                " | {} .. {} | {} days, {} hourly records",
                self.summary.start, self.summary.end, self.summary.daily_rows, self.summary.hourly_rows
            )),
        ]));

        if self.summary.short_range {
            lines.push(Line::from(Span::styled(
                "Choose a range of at least one week to see meaningful totals.",
                Style::default().fg(Color::Yellow),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!(
                    "time of day: {} | year: {} | day-type metric: {}",
                    self.summary.bucket.display_name(),
                    self.summary.years.display_name(),
                    metric_name(self.summary.day_type_metric),
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(area);

        self.draw_settings(frame, columns[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(columns[1]);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(rows[0]);

        self.draw_day_type(frame, top[0]);
        self.draw_weekday(frame, top[1]);
        self.draw_hourly(frame, rows[1]);
        self.draw_monthly(frame, rows[2]);
    }

    fn draw_day_type(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let bars = vec![
            styled_bar("Working", self.summary.day_type.working_days_total, PEAK_COLOR),
            styled_bar("Holiday", self.summary.day_type.holidays_total, NORMAL_COLOR),
        ];
        let title = format!("Working Days vs Holidays ({})", metric_name(self.summary.day_type_metric));
        render_bars(frame, area, &title, &bars);
    }

    fn draw_weekday(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let bars: Vec<Bar> = self
            .summary
            .weekday
            .iter()
            .map(|w| {
                let color = if w.is_peak() { PEAK_COLOR } else { NORMAL_COLOR };
                styled_bar(weekday_label(w.key), w.value, color)
            })
            .collect();
        render_bars(frame, area, "Total Bike Sharing per Weekday", &bars);
    }

    fn draw_hourly(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let bucket_count = self
            .summary
            .bucket_counts
            .get(&self.summary.bucket)
            .copied()
            .unwrap_or(0);
        let peak = self
            .summary
            .peak_hours()
            .iter()
            .map(|h| format!("{h:02}:00"))
            .collect::<Vec<_>>()
            .join(", ");
        let title = if peak.is_empty() {
            format!("Rentals per Hour ({})", self.summary.bucket.display_name())
        } else {
            format!(
                "Rentals per Hour ({}, {bucket_count} records) peak: {peak}",
                self.summary.bucket.display_name()
            )
        };

        // Every hourly bar uses the emphasis colour; the peak is named in the title.
        let labels: Vec<String> = self.summary.hourly.iter().map(|h| format!("{:02}", h.key)).collect();
        let bars: Vec<Bar> = self
            .summary
            .hourly
            .iter()
            .zip(&labels)
            .map(|(h, label)| styled_bar(label, h.value, PEAK_COLOR))
            .collect();
        render_bars(frame, area, &title, &bars);
    }

    fn draw_monthly(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let legend = self
            .summary
            .monthly
            .iter()
            .map(|s| match s.year {
                YearIndex::First => format!("{} (yellow)", s.label),
                YearIndex::Second => format!("{} (green)", s.label),
            })
            .collect::<Vec<_>>()
            .join(" / ");
        let block = Block::default()
            .title(format!("Monthly Bike Sharing: {legend}"))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let (points, y_max) = monthly_points(&self.summary.monthly);
        if y_max <= 0.0 {
            let msg = Paragraph::new("No data in range.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let series: Vec<MonthlyLine> = self
            .summary
            .monthly
            .iter()
            .zip(&points)
            .map(|(s, pts)| MonthlyLine {
                points: pts,
                color: year_color(s.year),
            })
            .collect();

        // Plotters draws the month names in its own bottom label area.
        let widget = MonthlyPlottersChart {
            series: &series,
            y_max,
            y_label: "rentals",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let start_label = if self.editing_date && self.selected_field == FIELD_START {
            format!("{}_", self.date_input)
        } else {
            self.selection.start.to_string()
        };
        let end_label = if self.editing_date && self.selected_field == FIELD_END {
            format!("{}_", self.date_input)
        } else {
            self.selection.end.to_string()
        };

        let mut items = Vec::new();
        items.push(ListItem::new(format!("Start: {start_label}")));
        items.push(ListItem::new(format!("End: {end_label}")));
        items.push(ListItem::new(format!("Time of day: {}", self.selection.bucket.display_name())));
        items.push(ListItem::new(format!("Year: {}", self.selection.years.display_name())));
        items.push(ListItem::new(format!(
            "Day type: {}",
            metric_name(self.selection.day_type_metric)
        )));

        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing_date {
            let hint = Paragraph::new("Editing date…")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit date  r reset range  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn metric_name(metric: DayTypeMetric) -> &'static str {
    match metric {
        DayTypeMetric::Flags => "day counts",
        DayTypeMetric::Rentals => "rentals",
    }
}

fn year_color(year: YearIndex) -> RGBColor {
    match year {
        YearIndex::First => FIRST_YEAR_COLOR,
        YearIndex::Second => SECOND_YEAR_COLOR,
    }
}

fn styled_bar<'a>(label: &'a str, value: u64, color: Color) -> Bar<'a> {
    Bar::default()
        .label(Line::from(label))
        .value(value)
        .text_value(compact_count(value))
        .style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::Black).bg(color))
}

fn render_bars(frame: &mut ratatui::Frame<'_>, area: Rect, title: &str, bars: &[Bar<'_>]) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    if bars.is_empty() {
        let msg = Paragraph::new("No data in range.")
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(msg, area);
        return;
    }

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(bars))
        .bar_width(bar_width(area.width.saturating_sub(2), bars.len()))
        .bar_gap(1);
    frame.render_widget(chart, area);
}

/// Widest bar (max 9 cells) that fits `count` bars and their 1-cell gaps.
fn bar_width(inner_width: u16, count: usize) -> u16 {
    if count == 0 {
        return 1;
    }
    let per_bar = inner_width / count.min(u16::MAX as usize) as u16;
    per_bar.saturating_sub(1).clamp(1, 9)
}

/// Short bar label: `985`, `12.3k`, `1.2M`.
fn compact_count(value: u64) -> String {
    match value {
        0..=9_999 => value.to_string(),
        10_000..=999_999 => format!("{:.1}k", value as f64 / 1_000.0),
        _ => format!("{:.1}M", value as f64 / 1_000_000.0),
    }
}

/// Zero-filled `(month, rentals)` points per series and the padded y bound.
fn monthly_points(series: &[YearSeries]) -> (Vec<Vec<(f64, f64)>>, f64) {
    let points: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| {
            (1..=12u32)
                .map(|m| (m as f64, s.months.get(&m).copied().unwrap_or(0) as f64))
                .collect()
        })
        .collect();

    let max = points
        .iter()
        .flatten()
        .map(|&(_, y)| y)
        .fold(0.0_f64, f64::max);

    (points, max * 1.05)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DailyRecord, DataConfig, DataSource, HourlyRecord, TimeBucket, YearSelection};
    use ratatui::backend::TestBackend;
    use std::collections::BTreeMap;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_app() -> App {
        let daily: Vec<DailyRecord> = (0..30)
            .map(|i| {
                let date = ymd(2011, 1, 1) + chrono::Duration::days(i);
                DailyRecord {
                    date,
                    working_day: i % 7 >= 2,
                    holiday: i == 16,
                    weekday: ((i + 6) % 7) as u8,
                    year: YearIndex::First,
                    rentals: 100 + i as u64,
                }
            })
            .collect();
        let hourly = vec![
            HourlyRecord::new(ymd(2011, 1, 1), 8, 30),
            HourlyRecord::new(ymd(2011, 1, 2), 14, 50),
            HourlyRecord::new(ymd(2011, 1, 3), 22, 5),
        ];
        let dataset = Dataset::from_records(daily, hourly);
        let config = DashboardConfig {
            data: DataConfig {
                daily: DataSource::Path(PathBuf::from("day.csv")),
                hourly: DataSource::Path(PathBuf::from("hour.csv")),
                timeout_secs: 30,
            },
            start: None,
            end: None,
            bucket: TimeBucket::Morning,
            years: YearSelection::Both,
            day_type_metric: DayTypeMetric::Flags,
            plot: true,
            plot_width: 60,
            plot_height: 12,
            export: Some(std::env::temp_dir().join(format!("bike-dash-tui-{}.json", std::process::id()))),
        };
        let selection = crate::app::resolve_selection(&config, &dataset).unwrap();
        App::new(config, dataset, selection).unwrap()
    }

    #[test]
    fn arrows_move_dates_by_one_day_and_recompute() {
        let mut app = test_app();
        assert_eq!(app.summary.daily_rows, 30);

        app.handle_key(KeyCode::Right);
        assert_eq!(app.selection.start, ymd(2011, 1, 2));
        assert_eq!(app.summary.daily_rows, 29);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.selection.end, ymd(2011, 1, 29));
        assert_eq!(app.summary.daily_rows, 28);
    }

    #[test]
    fn enter_edits_and_applies_a_date() {
        let mut app = test_app();
        app.handle_key(KeyCode::Enter);
        assert!(app.editing_date);
        assert_eq!(app.date_input, "2011-01-01");

        for _ in 0..2 {
            app.handle_key(KeyCode::Backspace);
        }
        for c in "25".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);

        assert!(!app.editing_date);
        assert_eq!(app.selection.start, ymd(2011, 1, 25));
        assert!(app.summary.short_range);
    }

    #[test]
    fn invalid_date_keeps_previous_selection() {
        let mut app = test_app();
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('-'));
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.selection.start, ymd(2011, 1, 1));
        assert!(app.status.starts_with("Invalid date"));
    }

    #[test]
    fn reset_restores_full_range() {
        let mut app = test_app();
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.selection.start, ymd(2011, 1, 1));
        assert_eq!(app.selection.end, ymd(2011, 1, 30));
    }

    #[test]
    fn enum_fields_cycle_and_quit_keys_stop() {
        let mut app = test_app();
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.summary.bucket, TimeBucket::Afternoon);
        assert_eq!(app.summary.peak_hours(), vec![14]);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.selection.years, YearSelection::Second);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Right);
        assert_eq!(app.summary.day_type_metric, DayTypeMetric::Rentals);

        // Enter on a non-date field does not start editing.
        app.handle_key(KeyCode::Enter);
        assert!(!app.editing_date);

        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn export_key_writes_summary() {
        let mut app = test_app();
        app.handle_key(KeyCode::Char('e'));
        assert!(app.status.starts_with("Wrote "));
        let text = std::fs::read_to_string(&app.export_path).unwrap();
        assert!(text.contains("\"daily_rows\": 30"));
        let _ = std::fs::remove_file(&app.export_path);
    }

    #[test]
    fn compact_counts_and_bar_widths() {
        assert_eq!(compact_count(985), "985");
        assert_eq!(compact_count(12_345), "12.3k");
        assert_eq!(compact_count(3_292_679), "3.3M");

        assert_eq!(bar_width(70, 7), 9);
        assert_eq!(bar_width(40, 7), 4);
        assert_eq!(bar_width(3, 7), 1);
        assert_eq!(bar_width(10, 0), 1);
    }

    #[test]
    fn monthly_points_zero_fill_and_pad() {
        let series = vec![YearSeries {
            year: YearIndex::First,
            label: "2011".to_string(),
            months: BTreeMap::from([(2u32, 200u64)]),
        }];
        let (points, y_max) = monthly_points(&series);
        assert_eq!(points[0].len(), 12);
        assert_eq!(points[0][0], (1.0, 0.0));
        assert_eq!(points[0][1], (2.0, 200.0));
        assert!((y_max - 210.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_panel_labels_each_month_once() {
        let app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 16)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                app.draw_monthly(f, area);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let rows: Vec<String> = (area.y..area.y + area.height)
            .map(|y| (area.x..area.x + area.width).map(|x| buffer[(x, y)].symbol()).collect())
            .collect();
        let text = rows.join("\n");

        for label in crate::domain::MONTH_LABELS {
            assert!(text.matches(label).count() <= 1, "{label} drawn twice:\n{text}");
        }
    }
}
