//! Dual-mode output rendering for samples and the run summary.
//!
//! The mode is chosen once at startup from the destination: an interactive
//! terminal gets styled, column-aligned rows; a redirected destination gets
//! CSV rows while the styled row is mirrored to stderr so a human watching
//! the console still sees live progress. The summary always goes to stderr.

use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use console::{Style, Term};
use humansize::{format_size, DECIMAL};
use tracing::debug;

use crate::error::{Result, WatchError};
use crate::sampler::Sample;
use crate::tracker::RunSummary;

/// Rendering mode, fixed at startup and never re-checked per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkMode {
    /// Styled fixed-width rows straight to the destination.
    Interactive,
    /// CSV rows to the destination, styled mirror rows to stderr.
    Redirected,
}

enum Destination {
    Interactive(Box<dyn Write + Send>),
    Redirected(csv::Writer<Box<dyn Write + Send>>),
}

/// Notice printed when an interrupt stops the run. The leading newline
/// separates it from whatever row was on screen when the signal arrived.
pub const INTERRUPT_NOTICE: &str = "\nBreaking";

/// Renders samples and the final summary.
pub struct OutputSink {
    dest: Destination,
    stderr: Term,
    include_children: bool,
}

impl OutputSink {
    /// Sink over stdout; interactivity of the attached stream picks the mode.
    pub fn stdout(include_children: bool) -> Self {
        let stdout = io::stdout();
        let mode = if stdout.is_terminal() {
            SinkMode::Interactive
        } else {
            SinkMode::Redirected
        };
        debug!(?mode, "output sink on stdout");
        Self::from_writer(Box::new(stdout), mode, include_children)
    }

    /// Sink over a log file; always redirected mode.
    pub fn file(path: &Path, include_children: bool) -> Result<Self> {
        let file = File::create(path).map_err(|source| WatchError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "output sink on log file");
        Ok(Self::from_writer(
            Box::new(file),
            SinkMode::Redirected,
            include_children,
        ))
    }

    /// Sink over an arbitrary writer with an explicit mode (used by tests).
    pub fn from_writer(
        writer: Box<dyn Write + Send>,
        mode: SinkMode,
        include_children: bool,
    ) -> Self {
        let dest = match mode {
            SinkMode::Interactive => Destination::Interactive(writer),
            SinkMode::Redirected => Destination::Redirected(csv::Writer::from_writer(writer)),
        };
        Self {
            dest,
            stderr: Term::stderr(),
            include_children,
        }
    }

    pub fn mode(&self) -> SinkMode {
        match self.dest {
            Destination::Interactive(_) => SinkMode::Interactive,
            Destination::Redirected(_) => SinkMode::Redirected,
        }
    }

    /// Writes the one-time header row(s) before the first sample.
    pub fn write_header(&mut self) -> Result<()> {
        let header = format_header(self.include_children);
        match &mut self.dest {
            Destination::Interactive(w) => {
                writeln!(w, "{}", header)?;
                w.flush()?;
            }
            Destination::Redirected(csv) => {
                self.stderr.write_line(&header)?;
                csv.write_record(["PID", "Status", "Timestamp", "Memory"])?;
                csv.flush()?;
            }
        }
        Ok(())
    }

    /// Renders one sample according to the sink mode.
    pub fn emit(&mut self, sample: &Sample) -> Result<()> {
        match &mut self.dest {
            Destination::Interactive(w) => {
                writeln!(w, "{}", format_styled_row(sample, self.include_children))?;
                w.flush()?;
            }
            Destination::Redirected(csv) => {
                self.stderr
                    .write_line(&format_styled_row(sample, self.include_children))?;
                csv.write_record([
                    sample.pid.to_string(),
                    sample.status.clone(),
                    sample.timestamp.to_string(),
                    sample.memory_kb.to_string(),
                ])?;
                csv.flush()?;
            }
        }
        Ok(())
    }

    /// Renders the final summary to stderr, independent of sink mode.
    pub fn emit_summary(&self, summary: &RunSummary) -> Result<()> {
        for line in format_summary(summary) {
            self.stderr.write_line(&line)?;
        }
        Ok(())
    }

    /// Short styled notice to stderr (e.g. on interrupt).
    pub fn notice(&self, msg: &str) -> Result<()> {
        self.stderr
            .write_line(&Style::new().red().apply_to(msg).to_string())?;
        Ok(())
    }
}

/// Header row matching the interactive column layout.
pub fn format_header(include_children: bool) -> String {
    let mut header = format!(
        "{:>6} {:>10} {:>11} {:>10} {:>10} {:>10}",
        "PID", "Status", "Elapsed", "Memory", "Delta", "\u{03A3} Delta"
    );
    if include_children {
        header.push_str(&format!(" {:>8}", "Children"));
    }
    header
}

/// One column-aligned row without styling. Column order and widths match the
/// header: PID, Status, Elapsed, Memory, Delta, Σ Delta, Children.
pub fn format_row_cells(sample: &Sample, include_children: bool) -> Vec<String> {
    let mut cells = vec![
        format!("{:>6}", sample.pid),
        format!("{:>10}", sample.status),
        format!("{:>10.1}s", sample.elapsed_secs),
        format!("{:>10.2}", sample.memory_kb),
        format!("{:>10.2}", sample.delta_kb),
        format!("{:>10.2}", sample.total_kb),
    ];
    if include_children {
        cells.push(format!("{:>8}", sample.children.unwrap_or(0)));
    }
    cells
}

/// Styled interactive row. Growth renders red, shrink/flat renders green,
/// on both the delta and cumulative-total columns.
fn format_styled_row(sample: &Sample, include_children: bool) -> String {
    let delta_style = growth_style(sample.delta_kb);
    let total_style = growth_style(sample.total_kb);
    let styles = [
        Style::new().cyan(),
        Style::new().white(),
        Style::new().white(),
        Style::new().blue(),
        delta_style,
        total_style,
        Style::new().white(),
    ];

    format_row_cells(sample, include_children)
        .into_iter()
        .zip(styles.iter())
        .map(|(cell, style)| style.apply_to(cell).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn growth_style(value: f64) -> Style {
    if value > 0.0 {
        Style::new().red()
    } else {
        Style::new().green()
    }
}

/// Fixed label/value summary lines, one group per tracked process.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    let elapsed = format_elapsed(summary.elapsed_secs);
    let mut lines = Vec::with_capacity(summary.entries.len() * 5);
    for entry in &summary.entries {
        let final_usage = format_size((entry.final_kb * 1024.0) as u64, DECIMAL);
        lines.push(format!("{:<21}{}", "PID:", entry.pid));
        lines.push(format!("{:<21}{}", "Elapsed:", elapsed));
        lines.push(format!("{:<21}{}", "Final Usage:", final_usage));
        lines.push(format!(
            "{:<21}{:.4}",
            "Total Memory Growth:", entry.total_growth_kb
        ));
        lines.push(format!(
            "{:<21}{:.4}",
            "Average Rate:", entry.rate_kb_per_sec
        ));
    }
    lines
}

/// Humanized duration for the summary ("42 seconds", "5 minutes", "2 hours").
pub fn format_elapsed(secs: f64) -> String {
    let total = secs.round().max(0.0) as u64;
    let (value, unit) = if total < 60 {
        (total, "second")
    } else if total < 3600 {
        (total / 60, "minute")
    } else if total < 86_400 {
        (total / 3600, "hour")
    } else {
        (total / 86_400, "day")
    };
    if value == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", value, unit)
    }
}
