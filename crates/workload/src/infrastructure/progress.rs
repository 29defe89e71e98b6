use std::io::Write;

use crate::application::ports::Progress;
use crate::application::service::RunSummary;

/// Prints the status marks to stdout: one dot per cycle attempt.
pub struct StdoutProgress<W = std::io::Stdout> {
    out: W,
}

impl StdoutProgress {
    pub fn new() -> Self {
        StdoutProgress {
            out: std::io::stdout(),
        }
    }
}

impl Default for StdoutProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdoutProgress<W> {
    pub fn with_writer(out: W) -> Self {
        StdoutProgress { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Status output is best effort; a closed stdout must not fail the run.
    fn line(&mut self, line: &str) {
        let _ = writeln!(self.out, "{line}");
    }
}

impl<W: Write> Progress for StdoutProgress<W> {
    fn connecting(&mut self) {
        self.line("Connecting...");
    }

    fn connected(&mut self) {
        self.line("Connected");
    }

    fn running(&mut self) {
        self.line("Running");
    }

    fn tick(&mut self) {
        let _ = write!(self.out, ".");
        let _ = self.out.flush();
    }

    fn finished(&mut self, _summary: &RunSummary) {
        self.line("\nSuccessfully completed");
    }
}

/// Discards all status output.
#[derive(Debug, Default)]
pub struct SilentProgress;

impl Progress for SilentProgress {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_one_mark_per_attempt() {
        let mut progress = StdoutProgress::with_writer(Vec::new());
        progress.connecting();
        progress.connected();
        progress.running();
        progress.tick();
        progress.tick();
        progress.finished(&RunSummary::default());

        let printed = String::from_utf8(progress.into_inner()).unwrap();
        assert_eq!(
            printed,
            "Connecting...\nConnected\nRunning\n..\nSuccessfully completed\n"
        );
    }
}
