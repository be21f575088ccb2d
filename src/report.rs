//! Plain-text rendering of an [`Analysis`].

use std::fmt;

use crate::model::{Analysis, Estimate};

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(4);
        write!(
            f,
            "{:.*} [{:.*}, {:.*}]",
            precision, self.value, precision, self.interval.lower, precision, self.interval.upper
        )
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Break-even analysis ({} draws, 95% intervals)", self.sample_size)?;
        for (name, estimate) in self.estimates() {
            writeln!(f, "  {name:<22} {estimate}")?;
        }
        writeln!(
            f,
            "  {:<22} {:.4}",
            "profit dispersion, %", self.profit_dispersion
        )?;
        let failures = self.inconsistent_metrics();
        if failures.is_empty() {
            write!(f, "Self-check passed")
        } else {
            write!(f, "Self-check failed: {}", failures.join(", "))
        }
    }
}

/// Renders the full report.
pub fn render(analysis: &Analysis) -> String {
    analysis.to_string()
}
