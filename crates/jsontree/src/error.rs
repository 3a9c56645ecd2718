use thiserror::Error;

/// A read failure: what went wrong and the byte offset where it was noticed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at position {position}")]
pub struct ReadError {
    /// Byte offset into the input.
    pub position: usize,
    /// What went wrong.
    pub kind: ReadErrorKind,
}

impl ReadError {
    pub(crate) fn new(kind: ReadErrorKind, position: usize) -> Self {
        Self { position, kind }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReadErrorKind {
    #[error("input is empty")]
    EmptyInput,
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character '{}'", .0.escape_ascii())]
    UnexpectedCharacter(u8),
    #[error("invalid literal")]
    InvalidLiteral,
    #[error("invalid number")]
    InvalidNumber,
    #[error("number is out of range")]
    NumberOutOfRange,
    #[error("unclosed string")]
    UnclosedString,
    #[error("unexpected control character in string")]
    ControlCharacter,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u16),
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("expected string as object key")]
    ExpectedKey,
    #[error("expected ':' after object key")]
    ExpectedColon,
    #[error("expected ',' or ']' after array element")]
    ExpectedArrayNext,
    #[error("expected ',' or '}}' after object member")]
    ExpectedObjectNext,
    #[error("unclosed comment")]
    UnclosedComment,
    #[error("nesting of {0} is too deep")]
    TooDeep(usize),
    #[error("unexpected content after document")]
    TrailingContent,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WriteError {
    #[error("NaN and Infinity not allowed in JSON")]
    NanOrInfinity,
    #[error("formatter error")]
    Fmt(#[from] core::fmt::Error),
}
