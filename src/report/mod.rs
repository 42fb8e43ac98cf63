use std::borrow::Cow;
use std::io::Write;

use serde::Serialize;

use crate::error::ExportError;

/// Header row of the CSV report.
pub const CSV_HEADER: [&str; 3] = ["Location Number", "Description", "Marked"];

/// File name the report is offered under.
pub const DEFAULT_FILE_NAME: &str = "foot_pain_map.csv";

/// One region's line in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// 1-based region number.
    pub number: usize,
    /// Region label.
    pub description: String,
    /// Whether any vertex of the region is marked.
    pub marked: bool,
}

impl ReportRow {
    /// The marked flag as written to the report, `0` or `1`.
    #[must_use]
    pub fn marked_flag(&self) -> u8 {
        u8::from(self.marked)
    }
}

/// Per-region report, one row per region in ascending region order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    pub(crate) fn new(rows: Vec<ReportRow>) -> Self {
        Self { rows }
    }

    /// The data rows, excluding the header.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Rows whose region is marked.
    pub fn marked_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| row.marked)
    }

    /// Renders the report as comma-separated text with a header line.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(&CSV_HEADER.join(","));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!(
                "{},{},{}\n",
                row.number,
                csv_field(&row.description),
                row.marked_flag()
            ));
        }
        out
    }

    /// Writes the CSV rendering to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] if the writer fails.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        writer.write_all(self.to_csv().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Serializes the rows as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(&self.rows)?)
    }
}

/// Quotes a field that would otherwise break the row.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
