//! Pause-at-height stream pipeline
//!
//! Drives a [`PauseTriggerStateMachine`] over a whole G-code stream and
//! writes every input line back out, in order, with the pause block inserted
//! in front of the injection point. Apart from that block the output is
//! byte-identical to the input, line terminators included.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use pausekit_core::{PauseConfig, Result};
use serde::Serialize;
use tracing::{info, warn};

use super::emitter::PauseSequence;
use super::lookahead::LOOKAHEAD_LINES;
use super::trigger::{Injection, PauseTriggerStateMachine};

/// Summary of one rewrite pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Lines read
    pub lines_in: usize,
    /// Lines written, injected lines included
    pub lines_out: usize,
    /// Pauses injected, in stream order
    pub injections: Vec<Injection>,
}

impl PipelineReport {
    /// Number of pause blocks injected
    pub fn injection_count(&self) -> usize {
        self.injections.len()
    }

    /// Number of lines added by injection
    pub fn lines_added(&self) -> usize {
        self.lines_out - self.lines_in
    }
}

/// Pause-at-height rewriter
///
/// # Example
/// ```
/// use pausekit_core::PauseConfig;
/// use pausekit_postprocess::PausePipeline;
///
/// let pipeline = PausePipeline::new(PauseConfig::new().with_pause_height(0.3));
/// let (text, report) = pipeline.process_str(";LAYER:0\nG0 Z0.4\nG1 X1 Y1 E1\n");
/// assert_eq!(report.injection_count(), 1);
/// assert!(text.starts_with(";LAYER:0\n;TYPE:CUSTOM\n"));
/// ```
#[derive(Debug, Clone)]
pub struct PausePipeline {
    config: PauseConfig,
}

impl PausePipeline {
    /// Create a pipeline for the given configuration
    pub fn new(config: PauseConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &PauseConfig {
        &self.config
    }

    /// Rewrite a whole G-code text.
    ///
    /// Injected lines take the terminator of the line they precede.
    pub fn process_str(&self, input: &str) -> (String, PipelineReport) {
        let records: Vec<&str> = input.split_inclusive('\n').collect();
        let mut out = String::with_capacity(input.len() + 512);

        let report = self.drive(&records, |sequence, line| {
            if let Some(sequence) = sequence {
                sequence.write_to(&mut out, line_ending(line));
            }
            out.push_str(line);
        });

        (out, report)
    }

    /// Rewrite a sequence of lines given without terminators
    pub fn process_lines<S: AsRef<str>>(&self, lines: &[S]) -> (Vec<String>, PipelineReport) {
        let mut out = Vec::with_capacity(lines.len() + 16);

        let report = self.drive(lines, |sequence, line| {
            if let Some(sequence) = sequence {
                out.extend(sequence.lines.iter().cloned());
            }
            out.push(line.to_string());
        });

        (out, report)
    }

    /// Rewrite a stream, holding only the lookahead window in memory.
    ///
    /// Lines are read as raw bytes and written back unchanged, so text that
    /// is not valid UTF-8 (Latin-1 comments, for instance) passes through
    /// untouched; the scanner sees a lossy view of it.
    ///
    /// # Errors
    /// Returns an I/O error if reading or writing fails; the output is then
    /// incomplete and must be discarded.
    pub fn process_reader<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
    ) -> Result<PipelineReport> {
        let mut machine = PauseTriggerStateMachine::new(self.config.clone());
        let mut window: VecDeque<Record> = VecDeque::with_capacity(LOOKAHEAD_LINES);
        let mut block = String::new();
        let mut eof = false;
        let mut lines_in = 0;
        let mut lines_out = 0;

        loop {
            while !eof && window.len() < LOOKAHEAD_LINES {
                let mut raw = Vec::new();
                if reader.read_until(b'\n', &mut raw)? == 0 {
                    eof = true;
                } else {
                    window.push_back(Record::new(raw));
                }
            }

            let Some(record) = window.front() else {
                break;
            };

            let upcoming = window.iter().map(|r| r.text.as_str());
            if let Some(sequence) = machine.process_line(&record.text, upcoming) {
                block.clear();
                sequence.write_to(&mut block, record.line_ending());
                writer.write_all(block.as_bytes())?;
                lines_out += sequence.len();
            }
            writer.write_all(&record.raw)?;
            lines_in += 1;
            lines_out += 1;

            window.pop_front();
        }

        writer.flush()?;

        let report = PipelineReport {
            lines_in,
            lines_out,
            injections: machine.injections().to_vec(),
        };
        self.log_report(&report);
        Ok(report)
    }

    fn drive<S, F>(&self, lines: &[S], mut write: F) -> PipelineReport
    where
        S: AsRef<str>,
        F: FnMut(Option<&PauseSequence>, &str),
    {
        let mut machine = PauseTriggerStateMachine::new(self.config.clone());
        let mut lines_out = 0;

        for (i, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let end = (i + LOOKAHEAD_LINES).min(lines.len());
            let sequence = machine.process_line(line, &lines[i..end]);

            lines_out += sequence.as_ref().map_or(0, PauseSequence::len) + 1;
            write(sequence.as_ref(), line);
        }

        let report = PipelineReport {
            lines_in: lines.len(),
            lines_out,
            injections: machine.injections().to_vec(),
        };
        self.log_report(&report);
        report
    }

    fn log_report(&self, report: &PipelineReport) {
        if report.injections.is_empty() {
            warn!(
                pause_height = self.config.pause_height,
                "pause height never reached, stream left unchanged"
            );
        } else {
            info!(
                lines_in = report.lines_in,
                lines_out = report.lines_out,
                injections = report.injection_count(),
                "pause pass complete"
            );
        }
    }
}

/// One input line as read, with the text view the scanner works on
struct Record {
    raw: Vec<u8>,
    text: String,
}

impl Record {
    fn new(raw: Vec<u8>) -> Self {
        let text = String::from_utf8_lossy(&raw).into_owned();
        Self { raw, text }
    }

    fn line_ending(&self) -> &'static str {
        line_ending(&self.text)
    }
}

fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}
