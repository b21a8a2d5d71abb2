//! Reordering of `ollama list` output.
//!
//! The listing is a header line followed by data rows. Each row is
//! whitespace-delimited: `NAME ID SIZE UNIT MODIFIED...`, e.g.
//!
//! ```text
//! NAME             ID              SIZE      MODIFIED
//! llama3:latest    365c0bd3c000    4.7 GB    2 weeks ago
//! ```
//!
//! The header is never reordered.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::domain::SortKey;

/// Size units and their factor relative to MB.
///
/// `ollama list` reports sizes in MB or GB; KB and TB are included so small
/// adapters and very large models still compare correctly. Units not in this
/// table are treated as unparseable.
pub const SIZE_UNITS: &[(&str, f64)] = &[
    ("KB", 0.001),
    ("MB", 1.0),
    ("GB", 1000.0),
    ("TB", 1_000_000.0),
];

/// Parsed `ollama list` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    header: String,
    rows: Vec<String>,
}

impl Listing {
    /// Split raw output into header and rows. Blank lines are dropped.
    pub fn parse(output: &str) -> Self {
        let mut lines = output.lines().filter(|l| !l.trim().is_empty());
        let header = lines.next().unwrap_or_default().to_string();
        let rows = lines.map(str::to_string).collect();
        Self { header, rows }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Reorder rows in place. Stable: equal keys keep their original order.
    pub fn sort_by(&mut self, key: SortKey) {
        match key {
            SortKey::Name => self.rows.sort_by(|a, b| row_name(a).cmp(row_name(b))),
            SortKey::Size => self
                .rows
                .sort_by(|a, b| compare_size_desc(row_size_mb(a), row_size_mb(b))),
        }
    }

    /// Header first, then rows, newline-terminated.
    pub fn render(&self) -> String {
        if self.header.is_empty() && self.rows.is_empty() {
            return String::new();
        }
        let mut out = std::iter::once(self.header.as_str())
            .chain(self.rows.iter().map(String::as_str))
            .join("\n");
        out.push('\n');
        out
    }
}

/// First whitespace-delimited field of a row.
pub fn row_name(row: &str) -> &str {
    row.split_whitespace().next().unwrap_or_default()
}

/// Size of a row normalized to MB, if the size columns are parseable.
pub fn row_size_mb(row: &str) -> Option<f64> {
    let mut fields = row.split_whitespace().skip(2);
    let value = fields.next()?;
    let unit = fields.next()?;
    normalize_size(value, unit)
}

/// Convert `value unit` to MB using [`SIZE_UNITS`].
pub fn normalize_size(value: &str, unit: &str) -> Option<f64> {
    let value: f64 = value.parse().ok().filter(|v: &f64| v.is_finite())?;
    SIZE_UNITS
        .iter()
        .find(|(u, _)| u.eq_ignore_ascii_case(unit))
        .map(|(_, factor)| value * factor)
}

// Larger first; unparseable sizes last.
fn compare_size_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
