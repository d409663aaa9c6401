//! Read-only exports of the nested plan data.
//!
//! - JSON: the fetch payload, pretty-printed.
//! - CSV: one row per scheduled initiative with month names.
//! - SVG: the timeline grid split into fixed-height pages.

use std::fmt;
use std::str::FromStr;

use scorecard_models::{
    month_name, InitiativeView, Perspective, PerspectiveView, MONTHS_SHORT, QUARTER_LABELS,
};

use crate::error::Result;
use crate::timeline::TimeAxis;

pub const CSV_HEADER: [&str; 5] = ["Code", "Name", "Start Month", "End Month", "Year"];

/// Rows (perspective headings included) on one SVG page.
pub const ROWS_PER_PAGE: usize = 24;

const ROW_HEIGHT: f64 = 28.0;
const QUARTER_BAND_HEIGHT: f64 = 20.0;
const MONTH_HEADER_HEIGHT: f64 = 24.0;
const FOOTER_HEIGHT: f64 = 24.0;
const BAR_INSET: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Svg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Svg => "svg",
        }
    }

    /// Suggested file name for an export taken on `date` (`YYYY-MM-DD`).
    pub fn default_file_name(self, date: &str) -> String {
        let stem = match self {
            ExportFormat::Json => "gantt-data",
            ExportFormat::Csv | ExportFormat::Svg => "gantt-schedule",
        };
        format!("{}-{}.{}", stem, date, self.extension())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "svg" | "pdf" => Ok(ExportFormat::Svg),
            other => Err(format!("unknown export format: {} (json, csv, svg)", other)),
        }
    }
}

pub fn to_json(data: &[PerspectiveView]) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

fn csv_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_row<'a>(cells: impl IntoIterator<Item = &'a str>) -> String {
    cells.into_iter().map(csv_cell).collect::<Vec<_>>().join(",")
}

/// CSV of scheduled initiatives in display order. Every cell is quoted.
pub fn to_csv(data: &[PerspectiveView]) -> String {
    let mut rows = vec![csv_row(CSV_HEADER)];
    for view in data.iter().flat_map(|p| &p.initiatives) {
        let Some(schedule) = &view.schedule else {
            continue;
        };
        let year = schedule.year.to_string();
        rows.push(csv_row([
            view.initiative.code.as_str(),
            view.initiative.name.as_str(),
            month_name(schedule.start_month).unwrap_or_default(),
            month_name(schedule.end_month).unwrap_or_default(),
            year.as_str(),
        ]));
    }
    rows.join("\n")
}

enum GridRow<'a> {
    Heading(&'a Perspective),
    Initiative(&'a Perspective, &'a InitiativeView),
}

fn grid_rows(data: &[PerspectiveView]) -> Vec<GridRow<'_>> {
    let mut rows = Vec::new();
    for p in data {
        rows.push(GridRow::Heading(&p.perspective));
        for view in &p.initiatives {
            rows.push(GridRow::Initiative(&p.perspective, view));
        }
    }
    rows
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Renders the grid as SVG documents of at most `rows_per_page` rows each.
/// An empty plan still yields one page with the headers.
pub fn to_svg_pages(data: &[PerspectiveView], axis: &TimeAxis, rows_per_page: usize) -> Vec<String> {
    let rows = grid_rows(data);
    let per_page = rows_per_page.max(1);
    let chunks: Vec<&[GridRow<'_>]> = if rows.is_empty() {
        vec![&rows[..]]
    } else {
        rows.chunks(per_page).collect()
    };
    let total = chunks.len();
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| render_page(chunk, axis, i + 1, total))
        .collect()
}

fn render_page(rows: &[GridRow<'_>], axis: &TimeAxis, page: usize, total: usize) -> String {
    let width = axis.grid_width();
    let header = QUARTER_BAND_HEIGHT + MONTH_HEADER_HEIGHT;
    let height = header + rows.len() as f64 * ROW_HEIGHT + FOOTER_HEIGHT;
    let left = axis.label_width;
    let cell = axis.cell_width;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"12\">\n",
        w = width,
        h = height
    );
    svg.push_str(&format!(
        "<rect width=\"{}\" height=\"{}\" fill=\"#ffffff\"/>\n",
        width, height
    ));

    for (q, label) in QUARTER_LABELS.iter().enumerate() {
        let x = left + q as f64 * 3.0 * cell;
        let fill = if q % 2 == 0 { "#f3f4f6" } else { "#e5e7eb" };
        svg.push_str(&format!(
            "<rect x=\"{}\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
            x,
            3.0 * cell,
            QUARTER_BAND_HEIGHT,
            fill
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"14\" text-anchor=\"middle\" font-weight=\"bold\">{}</text>\n",
            x + 1.5 * cell,
            label
        ));
    }
    svg.push_str(&format!(
        "<text x=\"8\" y=\"{}\" font-weight=\"bold\">Initiative</text>\n",
        QUARTER_BAND_HEIGHT + 16.0
    ));
    for (m, label) in MONTHS_SHORT.iter().enumerate() {
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\">{}</text>\n",
            left + m as f64 * cell + cell / 2.0,
            QUARTER_BAND_HEIGHT + 16.0,
            label
        ));
    }

    for (i, row) in rows.iter().enumerate() {
        let y = header + i as f64 * ROW_HEIGHT;
        match row {
            GridRow::Heading(p) => {
                svg.push_str(&format!(
                    "<rect x=\"0\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
                    y,
                    width,
                    ROW_HEIGHT,
                    xml_escape(&p.color_header)
                ));
                svg.push_str(&format!(
                    "<text x=\"8\" y=\"{}\" fill=\"#ffffff\" font-weight=\"bold\">{}</text>\n",
                    y + 18.0,
                    xml_escape(&p.name)
                ));
            }
            GridRow::Initiative(p, view) => {
                svg.push_str(&format!(
                    "<rect x=\"0\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
                    y,
                    width,
                    ROW_HEIGHT,
                    xml_escape(&p.color_bg)
                ));
                svg.push_str(&format!(
                    "<text x=\"8\" y=\"{}\">{} {}</text>\n",
                    y + 18.0,
                    xml_escape(&view.initiative.code),
                    xml_escape(&view.initiative.name)
                ));
                if let Some(schedule) = &view.schedule {
                    let (bar_left, bar_right) =
                        axis.bar_extent(schedule.start_month, schedule.end_month);
                    svg.push_str(&format!(
                        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"4\" fill=\"{}\"/>\n",
                        left + bar_left + BAR_INSET,
                        y + BAR_INSET,
                        bar_right - bar_left - 2.0 * BAR_INSET,
                        ROW_HEIGHT - 2.0 * BAR_INSET,
                        xml_escape(&p.color_bar)
                    ));
                }
            }
        }
    }

    let grid_bottom = header + rows.len() as f64 * ROW_HEIGHT;
    for m in 0..=12 {
        let x = left + m as f64 * cell;
        let stroke = if m % 3 == 0 { "#9ca3af" } else { "#d1d5db" };
        svg.push_str(&format!(
            "<line x1=\"{x}\" y1=\"0\" x2=\"{x}\" y2=\"{}\" stroke=\"{}\"/>\n",
            grid_bottom, stroke
        ));
    }
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" text-anchor=\"end\" fill=\"#6b7280\">Page {} of {}</text>\n",
        width - 8.0,
        height - 8.0,
        page,
        total
    ));
    svg.push_str("</svg>\n");
    svg
}
