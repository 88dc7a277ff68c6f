//! # Moon Panel ASCII Rendering
//!
//! Development-mode output: the panel the dashboard would draw, as text. The
//! arc is a half sine from the rising horizon (left) to the setting horizon
//! (right); the moon marker sits at the arc progress `t` while visible.

use crate::arc::ArcProgress;
use crate::display::MoonReport;
use std::fmt::Write;

const MIN_WIDTH: usize = 12;

/// Row (0 = top) of the arc at column `col` for a grid `rows` tall.
fn arc_row(col: usize, width: usize, rows: usize) -> usize {
    let u = col as f64 / (width - 1) as f64;
    let height = (std::f64::consts::PI * u).sin() * (rows - 1) as f64;
    (rows - 1) - height.round() as usize
}

/// Draw the arc with the moon marker, plus the horizon line.
pub fn render_arc(progress: &ArcProgress, width: usize) -> Vec<String> {
    let width = width.max(MIN_WIDTH);
    let rows = width / 4;
    let mut grid = vec![vec![' '; width]; rows];

    for col in 0..width {
        grid[arc_row(col, width, rows)][col] = '·';
    }

    if progress.visible {
        let col = (progress.t.clamp(0.0, 1.0) * (width - 1) as f64).round() as usize;
        grid[arc_row(col, width, rows)][col] = 'O';
    }

    let mut lines: Vec<String> = grid.into_iter().map(|r| r.into_iter().collect()).collect();
    lines.push("─".repeat(width));
    lines
}

/// Full text panel.
pub fn render_panel(title: &str, report: &MoonReport, progress: &ArcProgress, width: usize) -> String {
    let width = width.max(MIN_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "☾ {title}");
    let _ = writeln!(
        out,
        "{}  {}% lit  age {:.1} d",
        report.phase_name, report.illumination_percent, report.age_days
    );
    let _ = writeln!(out);

    for line in render_arc(progress, width) {
        let _ = writeln!(out, "{line}");
    }

    let left = format!("↑ {} {}", report.rise, report.rise_direction);
    let right = format!("{} {} ↓", report.set_direction, report.set);
    let gap = width.saturating_sub(left.chars().count() + right.chars().count()).max(1);
    let _ = writeln!(out, "{}{}{}", left, " ".repeat(gap), right);

    if !progress.visible {
        let _ = writeln!(out, "(below the horizon)");
    }
    out
}

/// Print the panel to stdout.
pub fn draw_ascii(title: &str, report: &MoonReport, progress: &ArcProgress, width: usize) {
    print!("{}", render_panel(title, report, progress, width));
}
