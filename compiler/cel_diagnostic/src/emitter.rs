//! Plain-text rendering of diagnostics.
//!
//! Output mirrors the usual CEL tool format:
//!
//! ```text
//! ERROR: <input>:1:1: undeclared reference to 'y' (in container '')
//!  | y + 1
//!  | ^
//! ```

use std::fmt::Write;

use cel_ir::SourceInfo;

use crate::Diagnostic;

/// Sink for diagnostics.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Emit multiple diagnostics.
    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }
}

/// Renders diagnostics against one source into a string buffer.
pub struct TextEmitter<'a> {
    source: &'a SourceInfo,
    out: String,
}

impl<'a> TextEmitter<'a> {
    pub fn new(source: &'a SourceInfo) -> Self {
        TextEmitter {
            source,
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn snippet(&mut self, line: u32, column: u32) {
        let Some(text) = self.source.line_text(line) else {
            return;
        };
        let _ = write!(self.out, "\n | {text}");
        let pad: String = text
            .chars()
            .take(column.saturating_sub(1) as usize)
            .map(|c| if c == '\t' { '\t' } else { '.' })
            .collect();
        let _ = write!(self.out, "\n | {pad}^");
    }
}

impl DiagnosticEmitter for TextEmitter<'_> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        let description = self.source.description();
        match diagnostic.position {
            Some(pos) => {
                let _ = write!(
                    self.out,
                    "{}: {}:{}:{}: {}",
                    diagnostic.severity, description, pos.line, pos.column, diagnostic.message
                );
                self.snippet(pos.line, pos.column);
            }
            None => {
                let _ = write!(
                    self.out,
                    "{}: {}: {}",
                    diagnostic.severity, description, diagnostic.message
                );
            }
        }
        for note in &diagnostic.notes {
            let _ = write!(self.out, "\n  = note: {note}");
        }
    }
}

/// Render `diagnostics` in order, one block per diagnostic.
pub fn render(diagnostics: &[Diagnostic], source: &SourceInfo) -> String {
    let mut emitter = TextEmitter::new(source);
    emitter.emit_all(diagnostics);
    emitter.finish()
}
