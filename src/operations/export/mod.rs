mod export_report;

pub use export_report::ExportReport;
