//! Human-readable diagnostic output with optional ANSI colors.
//!
//! Each diagnostic renders as a header, a `path:line:col` locator and the
//! offending source line with a caret underline for the primary label.

use std::io::Write;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Severity};

use super::DiagnosticEmitter;

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color when the output is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Renders diagnostics against one source file.
pub struct TerminalEmitter<'src, W: Write> {
    writer: W,
    colors: bool,
    path: &'src str,
    source: &'src str,
    lines: LineOffsetTable,
}

impl<'src, W: Write> TerminalEmitter<'src, W> {
    pub fn new(writer: W, mode: ColorMode, is_tty: bool, path: &'src str, source: &'src str) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            path,
            source,
            lines: LineOffsetTable::build(source),
        }
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_severity(&mut self, severity: Severity) {
        let text = severity.to_string();
        match severity {
            Severity::Error => self.write_colored(&text, colors::ERROR),
        }
    }

    fn write_snippet(&mut self, line: u32, col: u32, width: usize, message: &str, primary: bool) {
        let text = self.lines.line_text(self.source, line).to_string();
        let gutter = line.to_string();
        let pad = " ".repeat(gutter.len());
        let _ = writeln!(self.writer, "{pad} |");
        let _ = writeln!(self.writer, "{gutter} | {text}");
        let indent = " ".repeat(col.saturating_sub(1) as usize);
        let marker = if primary { "^" } else { "-" }.repeat(width.max(1));
        let _ = write!(self.writer, "{pad} | {indent}");
        let color = if primary { colors::ERROR } else { colors::SECONDARY };
        self.write_colored(&format!("{marker} {message}"), color);
        let _ = writeln!(self.writer);
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<'_, W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.write_severity(diagnostic.severity);
        if self.colors {
            let _ = write!(self.writer, "{}[{}]{}", colors::BOLD, diagnostic.code, colors::RESET);
        } else {
            let _ = write!(self.writer, "[{}]", diagnostic.code);
        }
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        for label in &diagnostic.labels {
            let (line, col) = self.lines.offset_to_line_col(self.source, label.span.start);
            if label.is_primary {
                let _ = writeln!(self.writer, "  --> {}:{line}:{col}", self.path);
            }
            let line_end = self.lines.line_text(self.source, line).chars().count();
            let width = self
                .source
                .get(label.span.to_range())
                .map_or(1, |s| s.chars().take_while(|&c| c != '\n').count())
                .min(line_end.saturating_sub(col as usize - 1).max(1));
            self.write_snippet(line, col, width, &label.message, label.is_primary);
        }

        for note in &diagnostic.notes {
            let _ = writeln!(self.writer, "  = note: {note}");
        }
        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize) {
        if error_count == 0 {
            return;
        }
        self.write_colored("error", colors::ERROR);
        let plural = if error_count == 1 { "" } else { "s" };
        let _ = writeln!(self.writer, ": {error_count} syntax error{plural}");
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use kt_ir::Span;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ErrorCode;

    const SOURCE: &str = "fun main() {\n    foo(1\n}\n";

    fn sample() -> Diagnostic {
        Diagnostic::error(ErrorCode::E1001)
            .with_message("Expecting ')'")
            .with_label(Span::new(23, 24), "Expecting ')'")
    }

    #[test]
    fn plain_output_points_at_line() {
        let mut out = Vec::new();
        let mut emitter = TerminalEmitter::new(&mut out, ColorMode::Never, false, "a.kt", SOURCE);
        emitter.emit(&sample());
        emitter.emit_summary(1);
        emitter.flush();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "error[E1001]: Expecting ')'\n  --> a.kt:3:1\n  |\n3 | }\n  | ^ Expecting ')'\n\nerror: 1 syntax error\n"
        );
    }

    #[test]
    fn colored_output_has_escapes() {
        let mut out = Vec::new();
        let mut emitter = TerminalEmitter::new(&mut out, ColorMode::Always, false, "a.kt", SOURCE);
        emitter.emit(&sample());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b["));
        assert!(text.contains("E1001"));
    }

    #[test]
    fn auto_mode_follows_tty() {
        assert!(ColorMode::Auto.should_use_colors(true));
        assert!(!ColorMode::Auto.should_use_colors(false));
        assert!(ColorMode::Always.should_use_colors(false));
    }

    #[test]
    fn summary_is_silent_without_errors() {
        let mut out = Vec::new();
        let mut emitter = TerminalEmitter::new(&mut out, ColorMode::Never, false, "a.kt", SOURCE);
        emitter.emit_summary(0);
        assert!(out.is_empty());
    }
}
