//! Structured errors reported while lexing a unified source file.
//!
//! Lexer errors abort the current file and carry enough context for a useful report: the kind of
//! failure, the 1-based line where it was detected, and a short excerpt of the source starting at
//! the error position.

use thiserror::Error;

/// The enumerated type of all errors the lexer detects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("C style comment (/*) does not end (*/)")]
    UnterminatedComment,

    #[error("String does not end")]
    UnterminatedString,

    #[error("Character literal delimiter is missing")]
    UnterminatedCharLiteral,

    #[error("Invalid escape sequence")]
    InvalidEscapeSequence,

    #[error("Invalid raw string")]
    InvalidRawString,

    #[error("Empty character literal found")]
    EmptyCharLiteral,

    #[error("An extra '}}' was found. Perhaps you forgot a '{{'")]
    UnbalancedBrace,

    #[error("An extra ')' was found. Perhaps you forgot a '('")]
    UnbalancedParen,
}

/// A lexer error, located on the line where it was detected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}: {excerpt}")]
pub struct LexError {
    pub kind: LexErrorKind,

    /// 1-based line number of the error position.
    pub line: u32,

    /// Source context starting at the error position, truncated at the next line break.
    pub excerpt: String,
}

impl LexError {
    /// Number of bytes of source context captured after the error position.
    pub const EXCERPT_LEN: usize = 28;

    /// Builds an error whose excerpt is taken from `source_tail`, the remainder of the buffer
    /// starting at the error position.
    pub fn at(kind: LexErrorKind, line: u32, source_tail: &[u8]) -> LexError {
        let len = source_tail
            .iter()
            .take(Self::EXCERPT_LEN)
            .position(|&b| b == b'\n')
            .unwrap_or_else(|| source_tail.len().min(Self::EXCERPT_LEN));
        let excerpt = String::from_utf8_lossy(&source_tail[..len]).into_owned();
        LexError { kind, line, excerpt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_truncates_at_newline() {
        let error = LexError::at(LexErrorKind::UnterminatedString, 3, b"\"abc\ndef");
        assert_eq!(error.excerpt, "\"abc");
        assert_eq!(error.line, 3);
    }

    #[test]
    fn excerpt_truncates_at_limit() {
        let tail: Vec<u8> = std::iter::repeat(b'x').take(100).collect();
        let error = LexError::at(LexErrorKind::UnterminatedComment, 1, &tail);
        assert_eq!(error.excerpt.len(), LexError::EXCERPT_LEN);
    }

    #[test]
    fn messages() {
        let error = LexError::at(LexErrorKind::UnbalancedBrace, 2, b"} x");
        assert_eq!(
            format!("{}", error),
            "An extra '}' was found. Perhaps you forgot a '{': } x"
        );
    }
}
