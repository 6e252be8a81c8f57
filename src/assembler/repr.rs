//! The decoded form of a whole program.
use std::fmt;
use std::slice;

use super::ast::Instruction;
use super::error::{ParseError, Result};
use super::lexer::{tokenize, Token};
use super::parser::Parser;
use super::source::SourceProvider;

/// An ordered, read-only sequence of instructions and labels.
///
/// This is not a tree: records appear exactly in source order and labels
/// are left unresolved.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ProgramRepr {
    instructions: Vec<Instruction>,
}

impl ProgramRepr {
    /// Decodes a token sequence.
    pub fn from_tokens(tokens: &[Token]) -> std::result::Result<Self, ParseError> {
        let instructions = Parser::new(tokens).run()?;
        Ok(ProgramRepr { instructions })
    }

    /// Tokenizes and decodes source text.
    pub fn from_text(text: &str) -> std::result::Result<Self, ParseError> {
        Self::from_tokens(&tokenize(text))
    }

    /// Loads `name` from the provider, then tokenizes and decodes it.
    pub fn from_source<P: SourceProvider + ?Sized>(provider: &P, name: &str) -> Result<Self> {
        let text = provider.load(name)?;
        Ok(Self::from_text(&text)?)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn iter(&self) -> slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Names of the label records, in order of appearance.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.instructions.iter().filter_map(|ins| match ins {
            Instruction::Label { name } => Some(name.as_str()),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a ProgramRepr {
    type Item = &'a Instruction;
    type IntoIter = slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One record per line, in source syntax. The listing decodes back to an
/// equal program.
impl fmt::Display for ProgramRepr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for ins in self.iter() {
            writeln!(f, "{}", ins)?;
        }
        Ok(())
    }
}
