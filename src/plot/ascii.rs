//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each selected metric gets its own glyph (see `glyph`); the x axis is the
//! quarter index and every series shares one y axis.

use crate::domain::{ChartKind, Metric, QuarterlyRecord};
use crate::report::{pie_shares, select_metric_series};

const GLYPHS: [char; 6] = ['*', '+', 'x', 'o', '#', '@'];

/// Glyph used for the `i`-th selected metric.
pub fn glyph(i: usize) -> char {
    GLYPHS[i % GLYPHS.len()]
}

/// Render quarterly metrics as a chart of the requested kind.
///
/// Pie charts show shares of the most recent quarter as horizontal bars;
/// `height` is ignored for them.
pub fn render_metric_chart(
    records: &[QuarterlyRecord],
    metrics: &[Metric],
    kind: ChartKind,
    width: usize,
    height: usize,
) -> String {
    if records.is_empty() || metrics.is_empty() {
        return "No quarterly data to plot.\n".to_string();
    }
    if kind == ChartKind::Pie {
        return render_pie(records, metrics, width);
    }

    let width = width.max(10);
    let height = height.max(5);

    let series: Vec<Vec<f64>> = select_metric_series(records, metrics)
        .into_iter()
        .map(|s| s.values)
        .collect();
    let with_baseline = matches!(kind, ChartKind::Area | ChartKind::Bar);
    let (y_min, y_max) = value_range(&series, with_baseline);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let x_max = (records.len() - 1).max(1) as f64;

    let mut grid = vec![vec![' '; width]; height];
    let baseline = map_y(0.0, y_min, y_max, height);

    // Later series first, so filled kinds leave the earlier ones on top.
    for (i, values) in series.iter().enumerate().rev() {
        let ch = glyph(i);
        match kind {
            ChartKind::Line => {
                let points: Vec<(usize, usize)> = values
                    .iter()
                    .enumerate()
                    .map(|(k, &v)| (map_x(k as f64, 0.0, x_max, width), map_y(v, y_min, y_max, height)))
                    .collect();
                draw_polyline(&mut grid, &points, ch);
            }
            ChartKind::Area => {
                for col in 0..width {
                    let v = interpolate(values, col as f64 / (width - 1) as f64 * x_max);
                    fill_column(&mut grid, col, map_y(v, y_min, y_max, height), baseline, ch);
                }
            }
            ChartKind::Bar => {
                for (k, &v) in values.iter().enumerate() {
                    let col = (map_x(k as f64, 0.0, x_max, width) + i).min(width - 1);
                    fill_column(&mut grid, col, map_y(v, y_min, y_max, height), baseline, ch);
                }
            }
            ChartKind::Pie => {}
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Chart: {} | {} .. {} | y=[{y_min:.2}, {y_max:.2}]\n",
        kind_name(kind),
        records[0].quarter,
        records[records.len() - 1].quarter,
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&legend(metrics));
    out.push('\n');
    out
}

/// Horizontal bars for `(label, value)` pairs, scaled so the largest value
/// spans `width` cells. Negative values draw an empty bar.
pub fn render_bars(rows: &[(String, f64)], width: usize) -> String {
    render_bars_with(rows, width, |v| format!("{v:.1}"))
}

fn render_bars_with(rows: &[(String, f64)], width: usize, fmt_value: impl Fn(f64) -> String) -> String {
    let width = width.max(1);
    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);
    let max = rows.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (label, value) in rows {
        let len = if max > 0.0 && value.is_finite() {
            ((value.max(0.0) / max) * width as f64).round() as usize
        } else {
            0
        };
        let line = format!(
            "{:<label_width$} | {:<width$} {}",
            crate::report::truncate(label, label_width),
            "#".repeat(len.min(width)),
            fmt_value(*value),
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn render_pie(records: &[QuarterlyRecord], metrics: &[Metric], width: usize) -> String {
    let shares = pie_shares(records, metrics);
    let rows: Vec<(String, f64)> = shares
        .iter()
        .map(|s| (s.metric.display_name().to_string(), s.share * 100.0))
        .collect();

    let mut out = String::new();
    out.push_str(&format!("Chart: pie | shares of {}\n", records[records.len() - 1].quarter));
    out.push_str(&render_bars_with(&rows, width.max(10), |v| format!("{v:.1}%")));
    out
}

fn kind_name(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Line => "line",
        ChartKind::Area => "area",
        ChartKind::Bar => "bar",
        ChartKind::Pie => "pie",
    }
}

fn legend(metrics: &[Metric]) -> String {
    metrics
        .iter()
        .enumerate()
        .map(|(i, m)| format!("{} {}", glyph(i), m.display_name()))
        .collect::<Vec<_>>()
        .join("  ")
}

fn value_range(series: &[Vec<f64>], with_baseline: bool) -> (f64, f64) {
    let mut min_y = if with_baseline { 0.0 } else { f64::INFINITY };
    let mut max_y = if with_baseline { 0.0 } else { f64::NEG_INFINITY };
    for &v in series.iter().flatten().filter(|v| v.is_finite()) {
        min_y = min_y.min(v);
        max_y = max_y.max(v);
    }
    if !(min_y.is_finite() && max_y.is_finite()) {
        return (0.0, 1.0);
    }
    if max_y <= min_y {
        return (min_y - 1.0, max_y + 1.0);
    }
    (min_y, max_y)
}

/// Linear interpolation at fractional index `at`.
fn interpolate(values: &[f64], at: f64) -> f64 {
    let Some(&last) = values.last() else {
        return 0.0;
    };
    let i = at.floor() as usize;
    if i + 1 >= values.len() {
        return last;
    }
    let frac = at - i as f64;
    values[i] + (values[i + 1] - values[i]) * frac
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Fill one column between two rows (inclusive), leaving occupied cells alone.
fn fill_column(grid: &mut [Vec<char>], col: usize, row_a: usize, row_b: usize, ch: char) {
    let (top, bottom) = if row_a <= row_b { (row_a, row_b) } else { (row_b, row_a) };
    for row in grid.iter_mut().take(bottom + 1).skip(top) {
        if let Some(cell) = row.get_mut(col).filter(|c| **c == ' ') {
            *cell = ch;
        }
    }
}

fn draw_polyline(grid: &mut [Vec<char>], points: &[(usize, usize)], ch: char) {
    match points {
        [] => {}
        [(x, y)] => draw_line(grid, *x, *y, *x, *y, ch),
        _ => {
            for w in points.windows(2) {
                draw_line(grid, w[0].0, w[0].1, w[1].0, w[1].1, ch);
            }
        }
    }
}

/// Integer line drawing (Bresenham-ish).
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

    fn record(label: &str, funding: f64, exits: f64) -> QuarterlyRecord {
        QuarterlyRecord {
            quarter: label.to_string(),
            funding,
            exits,
            growth: 0.0,
            seed: 0.0,
            companies: 0.0,
            investors: 0.0,
        }
    }

    #[test]
    fn line_golden_snapshot_small() {
        let records = vec![record("Q1 2020", 0.0, 0.0), record("Q2 2020", 10.0, 0.0)];
        let txt = render_metric_chart(&records, &[Metric::Funding], ChartKind::Line, 10, 5);
        let expected = concat!(
            "Chart: line | Q1 2020 .. Q2 2020 | y=[-0.50, 10.50]\n",
            "        **\n",
            "      **  \n",
            "    **    \n",
            "  **      \n",
            "**        \n",
            "* Funding\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn bar_golden_snapshot_small() {
        let records = vec![record("Q1 2020", 0.0, 0.0), record("Q2 2020", 10.0, 0.0)];
        let txt = render_metric_chart(&records, &[Metric::Funding], ChartKind::Bar, 10, 5);
        let expected = concat!(
            "Chart: bar | Q1 2020 .. Q2 2020 | y=[-0.50, 10.50]\n",
            "         *\n",
            "         *\n",
            "         *\n",
            "         *\n",
            "*        *\n",
            "* Funding\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn area_fills_down_to_the_baseline() {
        let records = vec![record("Q1 2020", 10.0, 0.0), record("Q2 2020", 10.0, 0.0)];
        let txt = render_metric_chart(&records, &[Metric::Funding], ChartKind::Area, 12, 6);
        let grid: Vec<&str> = txt.lines().skip(1).take(6).collect();
        // Constant series at the top of the range: every cell is filled.
        assert!(grid.iter().all(|row| row.chars().all(|c| c == '*')), "{txt}");
    }

    #[test]
    fn every_series_appears_with_its_glyph() {
        let records = vec![record("Q1 2020", 100.0, 1.0), record("Q2 2020", 120.0, 4.0), record("Q3 2020", 90.0, 2.0)];
        let metrics = [Metric::Funding, Metric::Exits];
        for kind in [ChartKind::Line, ChartKind::Area, ChartKind::Bar] {
            let txt = render_metric_chart(&records, &metrics, kind, 30, 8);
            let body: String = txt.lines().skip(1).take(8).collect();
            assert!(body.contains('*'), "{kind:?}\n{txt}");
            assert!(body.contains('+'), "{kind:?}\n{txt}");
            assert!(txt.ends_with("* Funding  + Exits\n"));
        }
    }

    #[test]
    fn pie_shows_shares_of_latest_quarter() {
        let records = vec![record("Q1 2020", 1.0, 1.0), record("Q2 2020", 30.0, 10.0)];
        let txt = render_metric_chart(&records, &[Metric::Funding, Metric::Exits], ChartKind::Pie, 20, 0);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Chart: pie | shares of Q2 2020");
        assert!(lines[1].starts_with("Funding"));
        assert!(lines[1].ends_with("75.0%"));
        assert!(lines[2].ends_with("25.0%"));
    }

    #[test]
    fn empty_input_renders_a_notice() {
        assert_eq!(
            render_metric_chart(&[], &[Metric::Funding], ChartKind::Line, 40, 10),
            "No quarterly data to plot.\n"
        );
        let records = vec![record("Q1 2020", 1.0, 1.0)];
        assert_eq!(
            render_metric_chart(&records, &[], ChartKind::Bar, 40, 10),
            "No quarterly data to plot.\n"
        );
    }

    #[test]
    fn single_record_does_not_panic() {
        let records = vec![record("Q1 2020", 5.0, 5.0)];
        for kind in [ChartKind::Line, ChartKind::Area, ChartKind::Bar, ChartKind::Pie] {
            let txt = render_metric_chart(&records, &[Metric::Funding, Metric::Exits], kind, 10, 5);
            assert!(txt.starts_with("Chart:"));
        }
    }

    #[test]
    fn bars_scale_to_the_largest_value() {
        let rows = vec![("Clio".to_string(), 250.0), ("LegalZoom".to_string(), 500.0), ("Zero".to_string(), -3.0)];
        let txt = render_bars(&rows, 10);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[1], "LegalZoom | ########## 500.0");
        assert_eq!(lines[0].matches('#').count(), 5);
        assert_eq!(lines[2].matches('#').count(), 0);
        assert!(lines[2].ends_with("-3.0"));
    }
}
