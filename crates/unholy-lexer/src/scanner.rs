//! The Unholy scanner: a hand-written, single-pass, speculative tokenizer.
//!
//! The scanner owns its cursor exclusively and never auto-advances between
//! calls to [`Scanner::next_token`] -- every arm of the dispatch in
//! `produce_token` is solely responsible for advancing past the characters
//! it consumes. This is what makes [`Scanner::look_ahead`] and
//! [`Scanner::try_scan`] safe: they snapshot `{pos, line, line_start,
//! token_start}` before calling the closure and restore it afterwards
//! (unconditionally for `look_ahead`, only on a "falsy" result for
//! `try_scan`), and nothing outside that snapshot can have changed.

use unholy_common::{LexicalError, LexicalErrorKind, SemanticElement, SyntaxKind, FUTURE_RESERVED_WORDS};

use crate::cursor::Cursor;

#[derive(Debug, Clone, Copy)]
struct ScannerState {
    pos: u32,
    line: u32,
    line_start: u32,
}

/// Something a speculative scan can report success or failure through.
///
/// `try_scan` restores the scanner's pre-call state whenever the closure's
/// result is "falsy" -- `false`, `None`, or `Err`.
pub trait Speculative {
    fn is_truthy(&self) -> bool;
}

impl Speculative for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl<T> Speculative for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

impl<T, E> Speculative for Result<T, E> {
    fn is_truthy(&self) -> bool {
        self.is_ok()
    }
}

pub struct Scanner<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    line: u32,
    line_start: u32,
    token_start: u32,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
            line: 1,
            line_start: 0,
            token_start: 0,
        }
    }

    /// Current byte offset into the source.
    pub fn get_pos(&self) -> u32 {
        self.cursor.pos()
    }

    /// The text of the line currently being scanned, without its newline.
    pub fn get_line_content(&self) -> &'src str {
        let rest = &self.source[self.line_start as usize..];
        match rest.find('\n') {
            Some(idx) => rest[..idx].trim_end_matches('\r'),
            None => rest,
        }
    }

    fn snapshot(&self) -> ScannerState {
        ScannerState { pos: self.cursor.pos(), line: self.line, line_start: self.line_start }
    }

    fn restore(&mut self, state: ScannerState) {
        self.cursor.seek(state.pos);
        self.line = state.line;
        self.line_start = state.line_start;
    }

    /// Run `f` and always restore the scanner to its pre-call state
    /// afterwards, regardless of what `f` returned.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.snapshot();
        let result = f(self);
        self.restore(state);
        result
    }

    /// Run `f` and restore the scanner to its pre-call state only if `f`'s
    /// result is falsy; otherwise keep whatever `f` consumed.
    pub fn try_scan<T: Speculative>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.snapshot();
        let result = f(self);
        if !result.is_truthy() {
            self.restore(state);
        }
        result
    }

    /// Scan and return the next semantic element. Once the end of input has
    /// been reached, keeps returning `EndOfFileToken` indefinitely.
    pub fn next_token(&mut self) -> Result<SemanticElement, LexicalError> {
        self.skip_trivia()?;

        self.token_start = self.cursor.pos();
        let start_line = self.line;
        let start_column = self.token_start - self.line_start + 1;

        let Some(c) = self.cursor.peek() else {
            return Ok(self.finish(SyntaxKind::EndOfFileToken, start_line, start_column));
        };

        match c {
            '{' => Ok(self.single(SyntaxKind::OpenBraceToken, start_line, start_column)),
            '}' => Ok(self.single(SyntaxKind::CloseBraceToken, start_line, start_column)),
            '(' => Ok(self.single(SyntaxKind::OpenParenToken, start_line, start_column)),
            ')' => Ok(self.single(SyntaxKind::CloseParenToken, start_line, start_column)),
            ';' => Ok(self.single(SyntaxKind::SemicolonToken, start_line, start_column)),
            ',' => Ok(self.single(SyntaxKind::CommaToken, start_line, start_column)),
            ':' => Ok(self.single(SyntaxKind::ColonToken, start_line, start_column)),
            '+' => Ok(self.single(SyntaxKind::PlusToken, start_line, start_column)),
            '-' => Ok(self.single(SyntaxKind::MinusToken, start_line, start_column)),
            '*' => Ok(self.single(SyntaxKind::AsteriskToken, start_line, start_column)),
            '/' => Ok(self.single(SyntaxKind::SlashToken, start_line, start_column)),
            '%' => Ok(self.single(SyntaxKind::PercentToken, start_line, start_column)),
            '<' => Ok(self.single(SyntaxKind::LessThanToken, start_line, start_column)),
            '>' => Ok(self.single(SyntaxKind::GreaterThanToken, start_line, start_column)),
            '=' => Ok(self.scan_equals(start_line, start_column)),
            '0'..='9' => Ok(self.scan_integer(start_line, start_column)),
            c if is_ident_start(c) => self.scan_identifier(start_line, start_column),
            _ => {
                self.cursor.advance();
                Ok(self.finish(SyntaxKind::Unknown, start_line, start_column))
            }
        }
    }

    /// Skip spaces, tabs, and newlines. A bare carriage return is fatal.
    fn skip_trivia(&mut self) -> Result<(), LexicalError> {
        loop {
            match self.cursor.peek() {
                Some(' ') | Some('\t') | Some('\u{0B}') | Some('\u{0C}') => {
                    self.cursor.advance();
                }
                Some('\n') => {
                    self.cursor.advance();
                    self.line += 1;
                    self.line_start = self.cursor.pos();
                }
                Some('\r') => {
                    let pos = self.cursor.pos();
                    let line = self.line;
                    let column = pos - self.line_start + 1;
                    self.cursor.advance();
                    let element = SemanticElement::new(SyntaxKind::Unknown, line, column, pos, "\r".to_string());
                    return Err(LexicalError { kind: LexicalErrorKind::UnexpectedCarriageReturn, element });
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn single(&mut self, kind: SyntaxKind, line: u32, column: u32) -> SemanticElement {
        self.cursor.advance();
        self.finish(kind, line, column)
    }

    fn scan_equals(&mut self, line: u32, column: u32) -> SemanticElement {
        self.cursor.advance();
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            self.finish(SyntaxKind::EqualsEqualsToken, line, column)
        } else {
            self.finish(SyntaxKind::EqualsToken, line, column)
        }
    }

    fn scan_integer(&mut self, line: u32, column: u32) -> SemanticElement {
        scan_digits(&mut self.cursor, 10);
        self.finish(SyntaxKind::IntegerLiteral, line, column)
    }

    fn scan_identifier(&mut self, line: u32, column: u32) -> Result<SemanticElement, LexicalError> {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_part);
        let text = self.cursor.slice(self.token_start, self.cursor.pos()).to_string();

        if let Some(word) = FUTURE_RESERVED_WORDS.iter().find(|&&w| w == text) {
            let element = SemanticElement::new(SyntaxKind::Identifier, line, column, self.token_start, text);
            return Err(LexicalError {
                kind: LexicalErrorKind::FutureReservedWord(word.to_string()),
                element,
            });
        }

        let kind = if text.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
            SyntaxKind::keyword_from_str(&text).unwrap_or(SyntaxKind::Identifier)
        } else {
            SyntaxKind::Identifier
        };

        Ok(SemanticElement::new(kind, line, column, self.token_start, text))
    }

    fn finish(&self, kind: SyntaxKind, line: u32, column: u32) -> SemanticElement {
        let text = self.cursor.slice(self.token_start, self.cursor.pos()).to_string();
        SemanticElement::new(kind, line, column, self.token_start, text)
    }
}

/// `$`, `_`, any ASCII letter, or any code point above `U+007F` may begin an
/// identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$' || (c as u32) > 0x7F
}

fn is_ident_part(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

/// Consume a run of digits valid for `radix` (2, 8, 10, or 16). Only decimal
/// (`radix = 10`) is reachable from `next_token` today: no Unholy literal
/// syntax currently enters this function with a different radix, but the
/// accept sets already nest correctly (binary ⊂ octal ⊂ decimal ⊂ hex) for
/// whichever literal prefix ends up using them.
fn scan_digits(cursor: &mut Cursor<'_>, radix: u32) {
    cursor.eat_while(|c| is_digit_for_radix(c, radix));
}

fn is_digit_for_radix(c: char, radix: u32) -> bool {
    match radix {
        2 => matches!(c, '0'..='1'),
        8 => matches!(c, '0'..='7'),
        16 => c.is_ascii_hexdigit(),
        _ => c.is_ascii_digit(),
    }
}
