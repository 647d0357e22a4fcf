use std::fmt;

use unholy_common::{LexicalError, SemanticElement};

/// A fatal parse error: an unexpected or missing token, a construct used in
/// the wrong context, an unexpected end of file, or a non-expression where an
/// expression was required.
///
/// Like [`LexicalError`], this is never locally recovered: the first
/// `ParseError` raised while parsing a top-level production aborts the whole
/// `parse_file` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub element: SemanticElement,
    pub related: Option<(String, SemanticElement)>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, element: SemanticElement) -> Self {
        Self { message: message.into(), element, related: None }
    }

    pub fn with_related(
        message: impl Into<String>,
        element: SemanticElement,
        related_message: impl Into<String>,
        related_element: SemanticElement,
    ) -> Self {
        Self { message: message.into(), element, related: Some((related_message.into(), related_element)) }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Everything that can cause `parse_file` to come back empty-handed.
#[derive(Debug)]
pub enum FrontendError {
    Io(std::io::Error),
    Lexical(LexicalError),
    Parse(ParseError),
}

impl fmt::Display for FrontendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontendError::Io(e) => write!(f, "{e}"),
            FrontendError::Lexical(e) => write!(f, "{e}"),
            FrontendError::Parse(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FrontendError {}

impl From<std::io::Error> for FrontendError {
    fn from(e: std::io::Error) -> Self {
        FrontendError::Io(e)
    }
}

impl From<LexicalError> for FrontendError {
    fn from(e: LexicalError) -> Self {
        FrontendError::Lexical(e)
    }
}

impl From<ParseError> for FrontendError {
    fn from(e: ParseError) -> Self {
        FrontendError::Parse(e)
    }
}
