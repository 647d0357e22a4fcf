//! Shared types for the Unholy front end: the closed `SyntaxKind` enumeration,
//! scanner output (`SemanticElement`), spans/line-indexing, and the fatal
//! lexical error type.

pub mod diagnostics;
pub mod error;
pub mod span;
pub mod syntax_kind;
pub mod token;

pub use error::{LexicalError, LexicalErrorKind};
pub use span::{LineIndex, Span};
pub use syntax_kind::{SyntaxKind, FUTURE_RESERVED_WORDS};
pub use token::SemanticElement;
