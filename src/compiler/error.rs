use std::fmt::{Display, Formatter};
use crate::compiler::environment::Context;
use crate::compiler::lexer::{Position, Span};
use crate::util;

pub type LangResult<T> = Result<T, Error>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    // Lexing and parsing
    #[error("Illegal Character")]
    IllegalCharacter,
    #[error("Expected Character")]
    ExpectedCharacter,
    #[error("Invalid Syntax")]
    InvalidSyntax,

    // Evaluation
    #[error("Runtime Error")]
    Runtime,
    #[error("Undefined Identifier")]
    UndefinedIdentifier,
    #[error("Reserved Name")]
    ReservedName,
    #[error("Type Error")]
    Type,
    #[error("Arity Error")]
    Arity,
    #[error("Unsupported")]
    Unsupported,
}

impl ErrorKind {
    pub fn is_runtime(&self) -> bool {
        !matches!(self, ErrorKind::IllegalCharacter | ErrorKind::ExpectedCharacter | ErrorKind::InvalidSyntax)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub file_name: String,
    pub line: usize,
    pub name: String,
}

/// The chain of contexts a runtime error was raised in, outermost frame first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Traceback {
    frames: Vec<Frame>,
}

impl Traceback {
    /// Walks from `context` up to the root. Each frame reports the position it was
    /// left at: `position` for the innermost one, then the entry position of its child.
    pub fn capture(context: &Context, position: &Position) -> Traceback {
        let mut frames = Vec::new();
        let mut position = position;
        let mut current = Some(context);

        while let Some(context) = current {
            frames.push(Frame {
                file_name: position.file_name().to_owned(),
                line: position.line,
                name: context.display_name.clone(),
            });

            if let Some(entry) = &context.parent_entry_pos {
                position = entry;
            }

            current = context.parent.as_deref();
        }

        frames.reverse();
        Traceback { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl Display for Traceback {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Traceback (most recent call last):")?;

        for frame in &self.frames {
            writeln!(f, "  File {}, line {}, in {}", frame.file_name, frame.line + 1, frame.name)?;
        }

        Ok(())
    }
}

/// A diagnostic with the source span it points at.
///
/// Runtime errors additionally carry the [`Traceback`] of the context they were
/// raised in; lexing and parsing errors never do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    details: String,
    traceback: Option<Traceback>,
}

impl Error {
    pub fn illegal_character(span: Span, details: impl Into<String>) -> Error {
        Error { kind: ErrorKind::IllegalCharacter, span, details: details.into(), traceback: None }
    }

    pub fn expected_character(span: Span, details: impl Into<String>) -> Error {
        Error { kind: ErrorKind::ExpectedCharacter, span, details: details.into(), traceback: None }
    }

    pub fn invalid_syntax(span: Span, details: impl Into<String>) -> Error {
        Error { kind: ErrorKind::InvalidSyntax, span, details: details.into(), traceback: None }
    }

    pub fn runtime(kind: ErrorKind, span: Span, details: impl Into<String>, context: &Context) -> Error {
        debug_assert!(kind.is_runtime(), "{:?} is not a runtime error kind", kind);

        let traceback = Traceback::capture(context, &span.start);
        Error { kind, span, details: details.into(), traceback: Some(traceback) }
    }

    pub fn kind(&self) -> ErrorKind { self.kind }
    pub fn span(&self) -> &Span { &self.span }
    pub fn details(&self) -> &str { &self.details }
    pub fn traceback(&self) -> Option<&Traceback> { self.traceback.as_ref() }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.traceback {
            Some(traceback) => write!(f, "{}", traceback)?,
            None => writeln!(f, "File {}, line {}", self.span.start.file_name(), self.span.start.line + 1)?,
        }

        writeln!(f)?;
        writeln!(f, "{}", util::string_with_arrows(&self.span.start.source.text, &self.span.start, &self.span.end))?;
        writeln!(f)?;
        write!(f, "{} : {}", self.kind, self.details)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use pretty_assertions::assert_eq;
    use crate::compiler::lexer::SourceFile;
    use super::*;

    fn span(source: &Rc<SourceFile>, start: usize, end: usize) -> Span {
        let mut start_pos = Position::begin(source);
        let chars: Vec<char> = source.text.chars().collect();

        while start_pos.index < start {
            start_pos = start_pos.advance(chars[start_pos.index]);
        }

        let mut end_pos = start_pos.clone();

        while end_pos.index < end {
            end_pos = end_pos.advance(chars.get(end_pos.index).copied().unwrap_or('\0'));
        }

        Span::new(start_pos, end_pos)
    }

    #[test]
    fn test_render_syntax_error() {
        let source = SourceFile::new("<test>", "1 + )");
        let error = Error::invalid_syntax(span(&source, 4, 5), "Expected int");

        assert_eq!("File <test>, line 1\n\n1 + )\n    ^\n\nInvalid Syntax : Expected int", error.to_string());
    }

    #[test]
    fn test_render_runtime_error_with_traceback() {
        let source = SourceFile::new("<test>", "var a = 1\na / 0");
        let program = Context::new_program();
        let error = Error::runtime(ErrorKind::Runtime, span(&source, 14, 15), "Division by zero", &program);

        assert_eq!(
            "Traceback (most recent call last):\n  File <test>, line 2, in <program>\n\na / 0\n    ^\n\nRuntime Error : Division by zero",
            error.to_string());
    }

    #[test]
    fn test_traceback_uses_entry_positions() {
        let source = SourceFile::new("<test>", "1 +\nround(2)");
        let program = Context::new_program();
        let call = Context::new_with_parent("round", &program, span(&source, 4, 5).start);

        let traceback = Traceback::capture(&call, &span(&source, 10, 11).start);
        let names: Vec<(&str, usize)> = traceback.frames().iter().map(|frame| (frame.name.as_str(), frame.line)).collect();

        assert_eq!(vec![("<program>", 1), ("round", 1)], names);
    }

    #[test]
    fn test_runtime_kinds() {
        assert!(!ErrorKind::IllegalCharacter.is_runtime());
        assert!(!ErrorKind::InvalidSyntax.is_runtime());
        assert!(ErrorKind::UndefinedIdentifier.is_runtime());
        assert!(ErrorKind::ReservedName.is_runtime());
    }
}
