//! The Assembler module is in charge of taking register-machine
//! source text and producing a `ProgramRepr` from the
//! AST submodule.
//!
//! It does this by implementing a whitespace tokenizer
//! and a fixed-window, non-lookahead instruction decoder.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod repr;
pub mod source;

pub use self::ast::Instruction;
pub use self::error::{Error, ParseError};
pub use self::repr::ProgramRepr;
pub use self::source::{FileSource, SourceProvider, StrSource};
