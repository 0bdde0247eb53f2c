use std::path::Path;

/// Outcome of a single decision made during a conversion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Error,
}

/// One immutable audit line: an outcome plus its free-text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub outcome: Outcome,
    pub message: String,
}

impl ReportLine {
    /// Renders the line the way it appears on screen and in the log file
    pub fn render(&self) -> String {
        let prefix = match self.outcome {
            Outcome::Ok => "OK   : ",
            Outcome::Error => "ERROR: ",
        };
        format!("{}{}", prefix, self.message)
    }
}

/// Ordered audit trail of every decision made during one run.
/// Append-only while the run is in progress, read-only afterwards;
/// nothing is deduplicated or filtered out.
#[derive(Debug, Default)]
pub struct Report {
    lines: Vec<ReportLine>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(&mut self, message: impl Into<String>) {
        self.lines.push(ReportLine {
            outcome: Outcome::Ok,
            message: message.into(),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.lines.push(ReportLine {
            outcome: Outcome::Error,
            message: message.into(),
        });
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    /// Full log artifact body: a header naming the converted roots,
    /// followed by one rendered line per decision in call order.
    pub fn render_log(&self, source: &Path, target: &Path) -> String {
        let mut out = format!("Converted {} to {}:", source.display(), target.display());
        for line in &self.lines {
            out.push('\n');
            out.push_str(&line.render());
        }
        out
    }
}
