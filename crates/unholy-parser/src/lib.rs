//! Unholy parser: a hand-written recursive-descent parser with precedence
//! climbing, producing an owned, arena-based AST.
//!
//! The pipeline is linear: source text -> [`unholy_lexer::Scanner`] (a lazy
//! token producer with its own save/restore stack) -> this crate's
//! [`Parser`], which consumes tokens and builds the tree -> an [`Ast`]
//! handed back to the caller. There is no feedback edge from parser to
//! scanner except through the scanner's own `look_ahead`/`try_scan`.

mod ast;
mod context;
mod error;
mod grammar;
mod parser;

pub use ast::{Ast, Node, NodeArray, NodeData, NodeFlags, NodeId, NodeMeta};
pub use context::ContextFlags;
pub use error::{FrontendError, ParseError};
pub use grammar::parse_file;
pub use parser::Parser;

use std::fs;
use std::path::Path;

/// Read `path`, then scan and parse its contents in full.
///
/// File I/O is the one external collaborator this crate reaches out to; the
/// scanner and parser themselves perform no I/O.
pub fn parse_file_at(path: impl AsRef<Path>) -> Result<Ast, FrontendError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    let file_name = path.to_string_lossy().into_owned();
    parse_file(&source, file_name)
}
