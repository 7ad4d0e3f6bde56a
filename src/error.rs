use std::{
    error::Error as StdError,
    fmt::{self, Display},
    io,
    string::FromUtf8Error,
    sync::Arc,
};

use codemap::{Span, SpanLoc};

pub type StyleResult<T> = Result<T, Box<Error>>;

/// What went wrong, without location detail.
///
/// Raw errors are raised deep in the compiler as `(kind, message, span)` and
/// resolved against the `CodeMap` at the API boundary, so the `Display`
/// implementation can show the offending source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
    Name,
    Type,
    MissingArgument,
    Import,
    StackOverflow,
    HostFunction,
    Io,
    Utf8,
}

impl ErrorKind {
    fn label(self) -> &'static str {
        match self {
            Self::Lex => "LexError",
            Self::Parse => "ParseError",
            Self::Name => "NameError",
            Self::Type => "TypeError",
            Self::MissingArgument => "MissingArgumentError",
            Self::Import => "ImportError",
            Self::StackOverflow => "StackOverflowError",
            Self::HostFunction => "HostFunctionError",
            Self::Io => "IoError",
            Self::Utf8 => "Utf8Error",
        }
    }
}

/// A fatal compile error.
///
/// The `Display` implementation renders the message, the offending source
/// line with a `^^^` marker, and the evaluator call trace when one exists:
///
/// ```text
/// TypeError: cannot coerce string to unit
///   |
/// 3 |   width: "a" + 2px
///   |          ^^^
///   |
/// stdin:3:10
///     at pad() (stdin:1)
/// ```
#[derive(Debug, Clone)]
pub struct Error {
    kind: Repr,
    trace: Vec<String>,
}

#[derive(Debug, Clone)]
enum Repr {
    Raw(ErrorKind, String, Span),
    Located {
        kind: ErrorKind,
        message: String,
        loc: SpanLoc,
    },
    Io(Arc<io::Error>),
    Utf8(String),
}

impl Error {
    pub(crate) fn raw(kind: ErrorKind, message: impl Into<String>, span: Span) -> Box<Self> {
        Box::new(Error {
            kind: Repr::Raw(kind, message.into(), span),
            trace: Vec::new(),
        })
    }

    pub(crate) fn take_raw(self) -> Option<(ErrorKind, String, Span, Vec<String>)> {
        match self.kind {
            Repr::Raw(kind, message, span) => Some((kind, message, span, self.trace)),
            _ => None,
        }
    }

    pub(crate) fn from_loc(
        kind: ErrorKind,
        message: String,
        loc: SpanLoc,
        trace: Vec<String>,
    ) -> Self {
        Error {
            kind: Repr::Located { kind, message, loc },
            trace,
        }
    }

    /// Record an evaluator frame on an error bubbling up through a call.
    pub(crate) fn push_trace(&mut self, frame: String) {
        self.trace.push(frame);
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.kind {
            Repr::Raw(kind, ..) | Repr::Located { kind, .. } => *kind,
            Repr::Io(..) => ErrorKind::Io,
            Repr::Utf8(..) => ErrorKind::Utf8,
        }
    }

    /// The bare message, without the `Error: ` prefix or source excerpt.
    pub fn message(&self) -> String {
        match &self.kind {
            Repr::Raw(_, message, _) | Repr::Located { message, .. } => message.clone(),
            Repr::Io(e) => e.to_string(),
            Repr::Utf8(s) => s.clone(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, message, loc) = match &self.kind {
            Repr::Located { kind, message, loc } => (kind, message, loc),
            Repr::Raw(kind, message, ..) => {
                return writeln!(f, "{}: {}", kind.label(), message);
            }
            Repr::Io(s) => return writeln!(f, "Error: {}", s),
            Repr::Utf8(s) => return writeln!(f, "Error: {}", s),
        };

        let line = loc.begin.line + 1;
        let col = loc.begin.column + 1;
        let padding = " ".repeat(format!("{}", line).len() + 1);

        writeln!(f, "{}: {}", kind.label(), message)?;
        writeln!(f, "{}|", padding)?;
        writeln!(f, "{} | {}", line, loc.file.source_line(loc.begin.line))?;
        writeln!(
            f,
            "{}| {}{}",
            padding,
            " ".repeat(loc.begin.column),
            "^".repeat(
                (loc.end.column.max(loc.begin.column) - loc.begin.column.min(loc.end.column))
                    .max(1)
            )
        )?;
        writeln!(f, "{}|", padding)?;
        writeln!(f, "{}:{}:{}", loc.file.name(), line, col)?;
        for frame in &self.trace {
            writeln!(f, "    at {}", frame)?;
        }
        Ok(())
    }
}

impl From<io::Error> for Box<Error> {
    fn from(error: io::Error) -> Box<Error> {
        Box::new(Error {
            kind: Repr::Io(Arc::new(error)),
            trace: Vec::new(),
        })
    }
}

impl From<FromUtf8Error> for Box<Error> {
    fn from(error: FromUtf8Error) -> Box<Error> {
        Box::new(Error {
            kind: Repr::Utf8(format!(
                "invalid UTF-8 byte \\x{:X?}",
                error.as_bytes().first().copied().unwrap_or_default()
            )),
            trace: Vec::new(),
        })
    }
}

impl StdError for Error {
    fn description(&self) -> &'static str {
        "stylesheet compile error"
    }
}
