//! Plain-text diagnostic rendering.
//!
//! Renders a diagnostic against its source file: a header with severity,
//! code and location, the offending line (whitespace normalized to single
//! spaces so the caret column is stable), and a caret under the span start.

use std::fmt::Write;

use fen_ir::Span;

use crate::Diagnostic;

/// Line/column position of a byte offset, 1-based.
fn locate(source: &str, offset: u32) -> (usize, usize, &str) {
    let offset = (offset as usize).min(source.len());
    let mut line_start = 0;
    let mut line_num = 1;
    for (i, b) in source.bytes().enumerate() {
        if i >= offset {
            break;
        }
        if b == b'\n' {
            line_start = i + 1;
            line_num += 1;
        }
    }
    let line_end = source[line_start..]
        .find('\n')
        .map_or(source.len(), |i| line_start + i);
    let col = offset - line_start + 1;
    (line_num, col, &source[line_start..line_end])
}

fn render_span(out: &mut String, span: Span, source: &str, filename: &str, header: &str) {
    let (line_num, col, line) = locate(source, span.start);
    let _ = writeln!(out, "{header}: line {line_num} in '{filename}':");
    // Whitespace normalized to single spaces so the caret column is stable.
    for c in line.chars() {
        out.push(if c.is_whitespace() { ' ' } else { c });
    }
    out.push('\n');
    // Caret column in characters, not bytes.
    let caret = line
        .char_indices()
        .take_while(|(i, _)| *i < col - 1)
        .count();
    for _ in 0..caret {
        out.push(' ');
    }
    out.push('^');
    out.push('\n');
}

/// Render a diagnostic to a displayable string.
///
/// With a primary span the output points into the source:
///
/// ```text
/// error[E2001]: line 2 in 'demo.fen':
/// fn main = y
///           ^
///   could not find variable 'y'
/// ```
///
/// Without one it is a single header line.
pub fn render(diag: &Diagnostic, source: &str, filename: &str) -> String {
    let mut out = String::new();
    let header = format!("{}[{}]", diag.severity, diag.code);

    match diag.primary_span() {
        Some(span) => {
            render_span(&mut out, span, source, filename, &header);
            let _ = writeln!(out, "  {}", diag.message);
        }
        None => {
            let _ = writeln!(out, "{header}: {}", diag.message);
        }
    }

    for note in &diag.notes {
        let _ = writeln!(out, "  note: {note}");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_with_span() {
        let source = "fn one = 1\nfn main = y\n";
        let diag = Diagnostic::error(ErrorCode::E2001, "could not find variable 'y'")
            .with_label(Span::new(21, 22), "");
        let rendered = render(&diag, source, "demo.fen");
        assert_eq!(
            rendered,
            "error[E2001]: line 2 in 'demo.fen':\n\
             fn main = y\n\
             \u{20}         ^\n\
             \u{20} could not find variable 'y'\n"
        );
    }

    #[test]
    fn test_render_without_span() {
        let diag = Diagnostic::error(ErrorCode::E2006, "no main function");
        assert_eq!(
            render(&diag, "", "demo.fen"),
            "error[E2006]: no main function\n"
        );
    }

    #[test]
    fn test_locate_first_line() {
        let (line, col, text) = locate("let x = 1", 4);
        assert_eq!((line, col), (1, 5));
        assert_eq!(text, "let x = 1");
    }
}
