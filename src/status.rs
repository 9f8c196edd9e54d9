//! Status line protocol for the external amplitude overlay.
//!
//! During capture the recorder emits one `AMP:<rms>` line per poll tick
//! once a full window exists, then a single `DONE` line when capture stops.
//! Lines are flushed immediately so a separate overlay process can render
//! the live level. Nothing else is written to stdout while a session runs.

use std::io::Write;

/// Where capture progress lines go. The recorder talks to this seam so the
/// gate can be exercised with an in-memory sink in tests.
pub trait StatusSink {
    fn amp(&mut self, rms: f32);
    fn done(&mut self);
}

/// Writes the protocol to stdout, unbuffered.
#[derive(Debug, Default)]
pub struct StdoutStatus;

impl StatusSink for StdoutStatus {
    fn amp(&mut self, rms: f32) {
        let mut out = std::io::stdout();
        let _ = writeln!(out, "AMP:{rms}");
        let _ = out.flush();
    }

    fn done(&mut self) {
        let mut out = std::io::stdout();
        let _ = writeln!(out, "DONE");
        let _ = out.flush();
    }
}

/// Collects protocol lines in memory for assertions.
#[derive(Debug, Default)]
pub struct MemoryStatus {
    pub lines: Vec<String>,
}

impl StatusSink for MemoryStatus {
    fn amp(&mut self, rms: f32) {
        self.lines.push(format!("AMP:{rms}"));
    }

    fn done(&mut self) {
        self.lines.push("DONE".to_string());
    }
}
