//! ASCII/Unicode charts for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Chart elements:
//! - bars: `#` for peak values, `=` otherwise
//! - monthly lines: `o` markers / `-` line for the first year, `s` markers / `.` line for the second

use crate::app::pipeline::{DashboardSummary, YearSeries};
use crate::domain::{MONTH_LABELS, TimeBucket, YearIndex, weekday_label};

const PEAK_BAR: char = '#';
const NORMAL_BAR: char = '=';

/// One labelled bar of a horizontal bar chart.
#[derive(Debug, Clone)]
pub struct BarRow {
    pub label: String,
    pub value: u64,
    pub peak: bool,
}

/// Render every chart of the summary, separated by blank lines.
pub fn render_summary_charts(summary: &DashboardSummary, width: usize, height: usize) -> String {
    let day_type = vec![
        BarRow {
            label: "Working Days".to_string(),
            value: summary.day_type.working_days_total,
            peak: true,
        },
        BarRow {
            label: "Holidays".to_string(),
            value: summary.day_type.holidays_total,
            peak: false,
        },
    ];

    let weekday: Vec<BarRow> = summary
        .weekday
        .iter()
        .map(|w| BarRow {
            label: weekday_label(w.key).to_string(),
            value: w.value,
            peak: w.is_peak(),
        })
        .collect();

    let buckets: Vec<BarRow> = TimeBucket::ALL
        .iter()
        .map(|b| BarRow {
            label: b.display_name().to_string(),
            value: summary.bucket_counts.get(b).copied().unwrap_or(0),
            peak: false,
        })
        .collect();

    // Every hourly bar is drawn in the emphasis style; the peak is named in the title.
    let hourly: Vec<BarRow> = summary
        .hourly
        .iter()
        .map(|h| BarRow {
            label: format!("{:02}h", h.key),
            value: h.value,
            peak: true,
        })
        .collect();

    let mut out = String::new();
    out.push_str(&render_bar_chart("Total Bike Sharing per Working Days and Holidays", &day_type, width));
    out.push('\n');
    out.push_str(&render_bar_chart("Total Bike Sharing per Weekday", &weekday, width));
    out.push('\n');
    out.push_str(&render_bar_chart("Records per Time of Day", &buckets, width));
    out.push('\n');
    out.push_str(&render_bar_chart(
        &format!("Total Bike Rentals per Hour ({})", summary.bucket.display_name()),
        &hourly,
        width,
    ));
    out.push('\n');
    out.push_str(&render_monthly_chart(&summary.monthly, width, height));
    out
}

/// Render a horizontal bar chart scaled so the largest value spans `width` cells.
pub fn render_bar_chart(title: &str, rows: &[BarRow], width: usize) -> String {
    let width = width.max(10);
    let mut out = format!("{title}\n");

    if rows.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let label_width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|r| r.value).max().unwrap_or(0);

    for row in rows {
        let len = bar_len(row.value, max, width);
        let ch = if row.peak { PEAK_BAR } else { NORMAL_BAR };
        let bar: String = std::iter::repeat_n(ch, len).collect();
        let line = format!("{:<label_width$} |{bar} {}", row.label, row.value);
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn bar_len(value: u64, max: u64, width: usize) -> usize {
    if max == 0 {
        return 0;
    }
    ((value as f64 / max as f64) * width as f64).round() as usize
}

/// Render the monthly comparison as a line chart on a fixed grid.
///
/// Months missing from a series are plotted as zero.
pub fn render_monthly_chart(series: &[YearSeries], width: usize, height: usize) -> String {
    let width = width.max(12);
    let height = height.max(5);

    let y_max = series
        .iter()
        .flat_map(|s| s.months.values().copied())
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so markers can overlay.
    let points: Vec<(char, char, Vec<(usize, usize)>)> = series
        .iter()
        .map(|s| {
            let (line_ch, marker) = series_style(s.year);
            let pts = (1..=12u32)
                .map(|m| {
                    let v = s.months.get(&m).copied().unwrap_or(0) as f64;
                    (map_x(m, width), map_y(v, y_max, height))
                })
                .collect();
            (line_ch, marker, pts)
        })
        .collect();

    for (line_ch, _, pts) in &points {
        for pair in pts.windows(2) {
            draw_line(&mut grid, pair[0], pair[1], *line_ch);
        }
    }
    for (_, marker, pts) in &points {
        for &(x, y) in pts {
            grid[y][x] = *marker;
        }
    }

    let legend: Vec<String> = series
        .iter()
        .map(|s| format!("{}={}", series_style(s.year).1, s.label))
        .collect();

    let mut out = String::new();
    out.push_str(&format!(
        "Monthly Bike Sharing: y=[0, {}] | {}\n",
        y_max as u64,
        legend.join(" ")
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out.push_str(month_axis(width).trim_end());
    out.push('\n');
    out
}

fn series_style(year: YearIndex) -> (char, char) {
    match year {
        YearIndex::First => ('-', 'o'),
        YearIndex::Second => ('.', 's'),
    }
}

/// Month labels placed under their columns, skipping any that would overlap.
fn month_axis(width: usize) -> String {
    let mut axis = vec![' '; width + 3];
    let mut next_free = 0usize;
    for (idx, label) in MONTH_LABELS.iter().enumerate() {
        let x = map_x(idx as u32 + 1, width);
        if x < next_free {
            continue;
        }
        for (i, ch) in label.chars().enumerate() {
            axis[x + i] = ch;
        }
        next_free = x + label.len() + 1;
    }
    axis.into_iter().collect()
}

fn map_x(month: u32, width: usize) -> usize {
    let u = (month.saturating_sub(1) as f64 / 11.0).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(v: f64, y_max: f64, height: usize) -> usize {
    let u = (v / y_max).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

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
