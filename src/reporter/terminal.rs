use std::io::Write;

use crate::analysis::report::AnalysisReport;
use crate::reporter::Reporter;

/// Writes a short plain-text block per report to stdout.
pub struct TerminalReporter;

impl TerminalReporter {
    fn render(report: &AnalysisReport) -> String {
        let lines = [
            report.summary(),
            format!("  range       {}..{}", report.date_from, report.date_to),
            format!("  price       {:.2}", report.current_price),
            format!("  sma / ema   {:.2} / {:.2}", report.sma, report.ema),
            format!("  rsi         {:.2}", report.rsi),
            format!(
                "  volatility  {:.2} ({:.2}%)",
                report.volatility, report.volatility_percent
            ),
            format!("  support     {:.2}", report.support),
            format!("  resistance  {:.2}", report.resistance),
        ];
        lines.join("\n")
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, report: &AnalysisReport) {
        tracing::info!(
            symbol = %report.symbol,
            from = %report.date_from,
            to = %report.date_to,
            price = report.current_price,
            rsi = report.rsi,
            trend = %report.trend,
            momentum = %report.momentum,
            risk = %report.risk,
            signal = %report.signal,
            "report ready"
        );

        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", Self::render(report)) {
            tracing::error!(error = %e, symbol = %report.symbol, "failed to write report");
        }
    }
}
