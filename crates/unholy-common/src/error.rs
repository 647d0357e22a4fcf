use std::fmt;

use crate::token::SemanticElement;

/// A fatal error raised by the scanner.
///
/// Both kinds abort the enclosing `parseFile` call entirely rather than being
/// locally recovered: there is no token the scanner could substitute and keep
/// going that wouldn't misrepresent the source.
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalError {
    pub kind: LexicalErrorKind,
    /// The offending semantic element (a one-byte `Unknown` token at the
    /// carriage return, or the rejected identifier).
    pub element: SemanticElement,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LexicalErrorKind {
    UnexpectedCarriageReturn,
    FutureReservedWord(String),
}

impl fmt::Display for LexicalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexicalErrorKind::UnexpectedCarriageReturn => write!(f, "FATAL: Windows encountered"),
            LexicalErrorKind::FutureReservedWord(word) => {
                write!(f, "\"{word}\" is a reserved keyword")
            }
        }
    }
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for LexicalError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax_kind::SyntaxKind;

    #[test]
    fn carriage_return_display() {
        let err = LexicalError {
            kind: LexicalErrorKind::UnexpectedCarriageReturn,
            element: SemanticElement::new(SyntaxKind::Unknown, 1, 1, 0, "\r".into()),
        };
        assert_eq!(err.to_string(), "FATAL: Windows encountered");
    }

    #[test]
    fn future_reserved_word_display() {
        let err = LexicalError {
            kind: LexicalErrorKind::FutureReservedWord("while".into()),
            element: SemanticElement::new(SyntaxKind::Identifier, 1, 5, 4, "while".into()),
        };
        assert_eq!(err.to_string(), "\"while\" is a reserved keyword");
    }
}
