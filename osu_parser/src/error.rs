use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    Syntax,
    Structure,
    IO,
    Timing,
    HitObject,
    Colour,
    Validation,
}

impl ParseErrorKind {
    pub(crate) fn from_code(code: &'static str) -> Self {
        match code {
            // Syntax
            "E1001" | "E1002" | "E1003" => Self::Syntax,

            // Structure
            "E1101" | "E1102" => Self::Structure,

            // IO
            "E2001" => Self::IO,

            // Timing
            "E3001" | "E3002" | "E3003" | "E3004" => Self::Timing,

            // HitObject
            "E4001" | "E4002" | "E4003" | "E4004" => Self::HitObject,

            // Colour
            "E5001" => Self::Colour,

            // Validation
            "E6001" | "E6002" | "E6003" => Self::Validation,

            _ => Self::Syntax,
        }
    }
}

/// Fatal parse failure, located by 1-based line and 0-based column.
#[derive(Debug, Error, Clone)]
#[error("{code}: {message} (line {line}{})", column_suffix(.column))]
pub struct ParseError {
    pub code: &'static str,
    pub kind: ParseErrorKind,
    pub message: String,
    pub line: usize,

    pub file: Option<String>,
    pub column: Option<usize>,
    pub context: Option<String>,
}

fn column_suffix(column: &Option<usize>) -> String {
    match column {
        Some(column) => format!(", column {column}"),
        None => String::new(),
    }
}

impl ParseError {
    pub(crate) fn new(code: &'static str, message: impl Into<String>, line: usize) -> Self {
        Self {
            code,
            kind: ParseErrorKind::from_code(code),
            message: message.into(),
            line,

            file: None,
            column: None,
            context: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
