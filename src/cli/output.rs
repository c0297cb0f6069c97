//! User-facing terminal output.
//!
//! Diagnostics go through `log`; this is only for the short progress and
//! result lines a user running the CLI expects to see.

use std::io::{self, Write};

/// Writes progress to stdout and warnings to stderr, honouring verbose/quiet.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    fn stdout(&self, line: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")
    }

    /// Printed only with `--verbose`.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if self.verbose {
            self.stdout(message)
        } else {
            Ok(())
        }
    }

    /// Progress line.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        self.stdout(&format!("→ {message}"))
    }

    /// Success line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.stdout(&format!("✓ {message}"))
    }

    /// Indented detail line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        self.stdout(&format!("  {message}"))
    }

    /// Warning; printed even in quiet mode.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        let mut err = io::stderr().lock();
        writeln!(err, "⚠ {message}")
    }
}
