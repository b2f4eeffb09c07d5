//! Report output: ` * `-prefixed lines on stdout, optionally captured as a
//! table row

pub mod sections;
pub mod timer;

use std::fmt::Display;
use std::io::{Stderr, Write};

use anyhow::Result;

/// Which report sections a run produces
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFlags {
    pub as_table: bool,
    pub group: bool,
    pub details: bool,
    pub degree: bool,
    pub density: bool,
    pub reciprocity: bool,
    pub transitivity: bool,
    pub distance: bool,
    pub efficiency: bool,
    pub summary: bool,
    pub centrality: bool,
    pub plot: bool,
    pub histogram: bool,
    pub gnuplot: bool,
    pub power_law: bool,
    pub adjacency: bool,
    pub users_role: bool,
}

/// Sink for report lines.
///
/// Labels are written verbatim before `": "`; a label ending in a space
/// gives the spaced ` label : value` form. Captured keys drop that space.
pub struct Report<W: Write, E: Write = Stderr> {
    out: W,
    errors: E,
    captured: Option<Vec<(String, String)>>,
}

impl<W: Write, E: Write> Report<W, E> {
    /// When `capture` is set every line is also kept as a `(label, value)` pair
    pub fn new(out: W, errors: E, capture: bool) -> Self {
        Self {
            out,
            errors,
            captured: capture.then(Vec::new),
        }
    }

    fn emit(&mut self, text: String, label: String, value: String) -> Result<()> {
        writeln!(self.out, " * {}", text)?;
        if let Some(captured) = &mut self.captured {
            captured.push((label, value));
        }
        Ok(())
    }

    /// ` * <label>: <value>`
    pub fn line(&mut self, label: &str, value: impl Display) -> Result<()> {
        let value = value.to_string();
        self.emit(format!("{}: {}", label, value), label.trim_end().to_string(), value)
    }

    /// ` * <group> : <label>: <value>`
    pub fn group_line(&mut self, group: &str, label: &str, value: impl Display) -> Result<()> {
        let value = value.to_string();
        self.emit(
            format!("{} : {}: {}", group, label, value),
            format!("{} : {}", group, label.trim_end()),
            value,
        )
    }

    /// A per-group failure marker on the error sink; never captured
    pub fn group_error(&mut self, group: &str, label: &str) -> Result<()> {
        writeln!(self.errors, " * {} : {}: ERROR", group, label)?;
        Ok(())
    }

    pub fn captured(&self) -> &[(String, String)] {
        self.captured.as_deref().unwrap_or_default()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn into_parts(self) -> (W, E) {
        (self.out, self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_prefixed_and_captured() {
        let mut report = Report::new(Vec::new(), Vec::new(), true);
        report.line("lang", "en").unwrap();
        report.group_line("sysop", "density ", format!("{:.10}", 0.5)).unwrap();
        report.group_line("sysop", "max pagerank", "0.5").unwrap();

        assert_eq!(
            report.captured(),
            &[
                ("lang".to_string(), "en".to_string()),
                ("sysop : density".to_string(), "0.5000000000".to_string()),
                ("sysop : max pagerank".to_string(), "0.5".to_string()),
            ]
        );
        let text = String::from_utf8(report.into_inner()).unwrap();
        assert_eq!(
            text,
            " * lang: en\n * sysop : density : 0.5000000000\n * sysop : max pagerank: 0.5\n"
        );
    }

    #[test]
    fn capture_is_optional() {
        let mut report = Report::new(Vec::new(), Vec::new(), false);
        report.line("date", "20100101").unwrap();
        assert!(report.captured().is_empty());
    }

    #[test]
    fn group_errors_go_to_the_error_sink() {
        let mut report = Report::new(Vec::new(), Vec::new(), true);
        report.group_error("bot", "alpha exp IN degree distribution ").unwrap();

        assert!(report.captured().is_empty());
        let (out, errors) = report.into_parts();
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(errors).unwrap(),
            " * bot : alpha exp IN degree distribution : ERROR\n"
        );
    }
}
