use crate::error::Result;
use crate::regions::RegionLabels;
use crate::report::{Report, ReportRow};

/// Builds a per-region report from region labels and region marks.
pub struct ExportReport<'a> {
    labels: &'a RegionLabels,
    region_marks: &'a [bool],
}

impl<'a> ExportReport<'a> {
    /// Creates a new `ExportReport` operation.
    #[must_use]
    pub fn new(labels: &'a RegionLabels, region_marks: &'a [bool]) -> Self {
        Self {
            labels,
            region_marks,
        }
    }

    /// Executes the export, returning exactly one row per region numbered
    /// `1..=K` in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::LabelCountMismatch`] if the label list
    /// and the marks disagree on `K`.
    ///
    /// [`ConfigurationError::LabelCountMismatch`]: crate::error::ConfigurationError::LabelCountMismatch
    pub fn execute(&self) -> Result<Report> {
        self.labels.ensure_count(self.region_marks.len())?;

        let rows = self
            .labels
            .iter()
            .zip(self.region_marks)
            .enumerate()
            .map(|(index, (label, &marked))| ReportRow {
                number: index + 1,
                description: label.to_owned(),
                marked,
            })
            .collect();

        Ok(Report::new(rows))
    }
}
