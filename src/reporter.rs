pub mod json;
pub mod terminal;

use crate::analysis::report::AnalysisReport;
use crate::model::OutputFormat;
use crate::reporter::json::JsonReporter;
use crate::reporter::terminal::TerminalReporter;

/// Sink for finished analysis reports.
pub trait Reporter: Send + Sync {
    fn report(&self, report: &AnalysisReport);
}

pub fn for_format(format: OutputFormat) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Text => Box::new(TerminalReporter),
        OutputFormat::Json => Box::new(JsonReporter),
    }
}
