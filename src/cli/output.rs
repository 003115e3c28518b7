//! Colored terminal output for packaging runs
//!
//! Status lines go to stdout and errors to stderr. The pkg-flags result is
//! printed separately so it stays a single undecorated line.

use std::io::Write;
use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
    verbose: bool,
    quiet: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.verbose, self.quiet)
    }
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            bufwtr: BufferWriter::stdout(ColorChoice::Auto),
            verbose,
            quiet,
        }
    }

    /// Writes `marker` in `marker_spec`, then `message` in `text_spec`.
    fn styled(
        buffer: &mut Buffer,
        marker: &str,
        marker_spec: &ColorSpec,
        message: &str,
        text_spec: Option<&ColorSpec>,
    ) -> std::io::Result<()> {
        buffer.set_color(marker_spec)?;
        write!(buffer, "{marker}")?;
        buffer.reset()?;
        if let Some(spec) = text_spec {
            buffer.set_color(spec)?;
        }
        writeln!(buffer, " {message}")?;
        buffer.reset()
    }

    fn emit(
        &self,
        marker: &str,
        marker_spec: &ColorSpec,
        message: &str,
        text_spec: Option<&ColorSpec>,
    ) -> std::io::Result<()> {
        let mut buffer = self.bufwtr.buffer();
        Self::styled(&mut buffer, marker, marker_spec, message, text_spec)?;
        self.bufwtr.print(&buffer)
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.emit(
            "✓",
            ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true),
            message,
            None,
        )
    }

    /// Print an error message to stderr (always shown)
    pub fn error(&self, message: &str) {
        let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();
        let written = Self::styled(
            &mut buffer,
            "✗",
            ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true),
            message,
            Some(ColorSpec::new().set_fg(Some(Color::Red))),
        )
        .and_then(|()| bufwtr.print(&buffer));

        if written.is_err() {
            // stderr is gone, last resort
            println!("✗ {message}");
        }
    }

    /// Print a verbose/debug message (only in verbose mode)
    pub fn verbose(&self, message: &str) -> std::io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        self.emit(
            "→",
            ColorSpec::new().set_fg(Some(Color::Blue)),
            message,
            None,
        )
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.println(&format!("    {message}"))
    }

    /// Print a plain message (respects quiet mode)
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut buffer = self.bufwtr.buffer();
        writeln!(&mut buffer, "{message}")?;
        self.bufwtr.print(&buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_suppresses_status_lines() {
        let output = OutputManager::new(false, true);
        assert!(output.success("hidden").is_ok());
        assert!(output.verbose("hidden").is_ok());
    }

    #[test]
    fn test_styled_writes_marker_and_message() {
        let mut buffer = Buffer::no_color();
        OutputManager::styled(&mut buffer, "✓", &ColorSpec::new(), "done", None).unwrap();
        assert_eq!(String::from_utf8(buffer.into_inner()).unwrap(), "✓ done\n");
    }
}
