use crate::findings::{RiskLevel, ScanReport};
use crate::reporter::Reporter;
use colored::Colorize;

pub struct TerminalReporter {
    verbose: bool,
}

impl TerminalReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn risk_label(&self, risk: &RiskLevel) -> colored::ColoredString {
        let label = format!("[{}]", risk);
        match risk {
            RiskLevel::Critical => label.red().bold(),
            RiskLevel::High => label.yellow().bold(),
            RiskLevel::Medium => label.cyan(),
            RiskLevel::Low => label.white(),
        }
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, report: &ScanReport) -> String {
        let mut out = String::new();

        for finding in &report.findings {
            let location = match finding.line {
                Some(line) => format!("{}:{}", finding.file_path, line),
                None => finding.file_path.clone(),
            };
            out.push_str(&format!(
                "{} {} {}: {}\n",
                self.risk_label(&finding.risk),
                location.bold(),
                finding.rule_id,
                finding.name
            ));
            if let Some(evidence) = &finding.evidence {
                out.push_str(&format!("    {}\n", evidence.trim().dimmed()));
            }
            if self.verbose {
                out.push_str(&format!("    {}\n", finding.description));
            }
        }

        for warning in &report.warnings {
            out.push_str(&format!("{} {}\n", "warning:".yellow().bold(), warning));
        }

        let s = &report.summary;
        if s.total() == 0 {
            out.push_str(&format!(
                "\n{} in {}\n",
                "No issues found".green().bold(),
                report.repository
            ));
        } else {
            out.push_str(&format!(
                "\n{} finding(s) in {}: {} critical, {} high, {} medium, {} low\n",
                s.total(),
                report.repository,
                s.critical,
                s.high,
                s.medium,
                s.low
            ));
        }

        out
    }
}
