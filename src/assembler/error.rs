//! Errors raised while building a program.
use std::io;
use thiserror::Error;

use super::lexer::TokenKind;

/// Failures of the decoding pass. Any of these aborts the whole decode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An operand was of the wrong kind, or the input ended early.
    #[error("expected `{grammar}`, found {}", describe(.found))]
    Decode {
        grammar: &'static str,
        found: Option<TokenKind>,
    },

    /// The token under the cursor cannot start an instruction.
    #[error("unexpected {kind} `{lexeme}` at token {index}")]
    Structural {
        lexeme: String,
        kind: TokenKind,
        index: usize,
    },

    /// A numeric operand does not fit the record it belongs to.
    #[error("`{lexeme}` is out of range in `{grammar}`")]
    LiteralOutOfRange {
        grammar: &'static str,
        lexeme: String,
    },
}

fn describe(found: &Option<TokenKind>) -> String {
    match found {
        Some(kind) => kind.to_string(),
        None => "end of input".to_owned(),
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to read source `{name}`: {source}")]
    SourceUnavailable {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
