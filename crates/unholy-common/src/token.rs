use serde::Serialize;

use crate::syntax_kind::SyntaxKind;

/// The scanner's output record.
///
/// Carries enough information for the parser to build AST nodes without
/// re-touching the source text, and enough for diagnostics to point back at
/// exactly where the element came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticElement {
    pub kind: SyntaxKind,
    /// 1-based line on which the element starts.
    pub line: u32,
    /// 1-based column on which the element starts.
    pub column: u32,
    /// Byte offset of the first byte of the element.
    pub pos: u32,
    /// Length of the element in bytes.
    pub length: u32,
    /// The exact source slice the element was scanned from.
    pub raw_text: String,
    /// Normalized text for literals (for this grammar, identical to `raw_text`).
    /// `None` for punctuation and keyword tokens.
    pub value: Option<String>,
}

impl SemanticElement {
    pub fn new(kind: SyntaxKind, line: u32, column: u32, pos: u32, raw_text: String) -> Self {
        let length = raw_text.len() as u32;
        let value = match kind {
            SyntaxKind::Identifier | SyntaxKind::IntegerLiteral => Some(raw_text.clone()),
            _ => None,
        };
        Self { kind, line, column, pos, length, raw_text, value }
    }

    /// End byte offset, one past the element's last byte.
    pub fn end(&self) -> u32 {
        self.pos + self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_length_from_text() {
        let tok = SemanticElement::new(SyntaxKind::PlusToken, 1, 1, 0, "+".into());
        assert_eq!(tok.length, 1);
        assert_eq!(tok.end(), 1);
        assert_eq!(tok.value, None);
    }

    #[test]
    fn identifier_and_integer_carry_a_value() {
        let ident = SemanticElement::new(SyntaxKind::Identifier, 1, 1, 0, "x".into());
        assert_eq!(ident.value, Some("x".to_string()));

        let int = SemanticElement::new(SyntaxKind::IntegerLiteral, 1, 1, 0, "42".into());
        assert_eq!(int.value, Some("42".to_string()));
    }

    #[test]
    fn keyword_carries_no_value() {
        let kw = SemanticElement::new(SyntaxKind::LetKeyword, 1, 1, 0, "let".into());
        assert_eq!(kw.value, None);
    }
}
