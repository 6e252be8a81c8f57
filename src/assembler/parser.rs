//! The Parser module takes the token stream from the lexer and decodes it
//! into a list of instructions.
//!
//! Decoding is a single forward pass. The token under the cursor selects the
//! instruction; its operands are the fixed number of tokens that follow it.
//! There is no lookahead past that window and no recovery: the first error
//! ends the pass.
use super::ast::*;
use super::error::ParseError;
use super::lexer::{Token, TokenKind};

/// Read position within a token sequence.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    tokens: &'a [Token],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Token `offset` places past the cursor, if there is one.
    pub fn peek(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.position + offset)
    }

    /// Moves the cursor forward, never past the end.
    pub fn advance(&mut self, count: usize) {
        self.position = usize::min(self.position + count, self.tokens.len());
    }
}

pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { cursor: Cursor::new(tokens) }
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Run the parser, consuming itself and returning the decoded program.
    pub fn run(mut self) -> Result<Vec<Instruction>, ParseError> {
        let mut ast: Vec<Instruction> = Vec::new();

        while let Some(ins) = self.instruction()? {
            trace!("decoded `{}`", ins);
            ast.push(ins);
        }

        debug!("parser decoded {} record(s)", ast.len());
        Ok(ast)
    }

    /// Decodes the record under the cursor and moves past it.
    /// Returns `Ok(None)` once every token has been consumed.
    fn instruction(&mut self) -> Result<Option<Instruction>, ParseError> {
        let tok = match self.cursor.peek(0) {
            Some(tok) => tok,
            None => return Ok(None),
        };

        let (ins, width) = match tok.kind {
            TokenKind::Br  => self.branch()?,
            TokenKind::Ld  => self.load()?,
            TokenKind::Str => self.store()?,
            TokenKind::Out => self.output()?,

            TokenKind::Add => self.arithmetic(ArithOp::Add)?,
            TokenKind::Sub => self.arithmetic(ArithOp::Sub)?,
            TokenKind::Mul => self.arithmetic(ArithOp::Mul)?,
            TokenKind::Div => self.arithmetic(ArithOp::Div)?,

            TokenKind::Inc => self.unary(UnaryOp::Inc)?,
            TokenKind::Dec => self.unary(UnaryOp::Dec)?,

            TokenKind::Be  => self.conditional(Comparison::Eq)?,
            TokenKind::Bn  => self.conditional(Comparison::Ne)?,
            TokenKind::Bg  => self.conditional(Comparison::Gt)?,
            TokenKind::Bs  => self.conditional(Comparison::Lt)?,
            TokenKind::Bge => self.conditional(Comparison::Ge)?,
            TokenKind::Bse => self.conditional(Comparison::Le)?,

            TokenKind::Label => (Instruction::Label { name: tok.lexeme.clone() }, 1),

            TokenKind::IntLit   |
            TokenKind::StrLit   |
            TokenKind::Register |
            TokenKind::Unknown  => {
                return Err(ParseError::Structural {
                    lexeme: tok.lexeme.clone(),
                    kind: tok.kind,
                    index: self.cursor.position(),
                });
            },
        };

        self.cursor.advance(width);
        Ok(Some(ins))
    }

    // Each builder below checks its operands in place and returns the record
    // with the number of tokens it spans. The cursor only moves once the
    // whole record is known to be valid.

    fn branch(&self) -> Result<(Instruction, usize), ParseError> {
        let g = "br <label>";
        let label = self.label(1, g)?;
        Ok((Instruction::Branch { label }, 2))
    }

    fn load(&self) -> Result<(Instruction, usize), ParseError> {
        let g = "ld <register> <value>";
        let reg = self.register(1, g)?;
        let value = self.value(2, g)?;
        Ok((Instruction::Load { reg, value }, 3))
    }

    fn store(&self) -> Result<(Instruction, usize), ParseError> {
        let g = "str <register> <memory>";
        let reg = self.register(1, g)?;
        let cell = self.value(2, g)?;
        Ok((Instruction::Store { reg, cell }, 3))
    }

    fn output(&self) -> Result<(Instruction, usize), ParseError> {
        let reg = self.register(1, "out <register>")?;
        Ok((Instruction::Output { reg }, 2))
    }

    fn arithmetic(&self, op: ArithOp) -> Result<(Instruction, usize), ParseError> {
        let g = match op {
            ArithOp::Add => "add <destination> <lhs> <rhs>",
            ArithOp::Sub => "sub <destination> <lhs> <rhs>",
            ArithOp::Mul => "mul <destination> <lhs> <rhs>",
            ArithOp::Div => "div <destination> <lhs> <rhs>",
        };
        let dst = self.register(1, g)?;
        let lhs = self.register(2, g)?;
        let rhs = self.register(3, g)?;
        Ok((Instruction::Arithmetic { op, dst, lhs, rhs }, 4))
    }

    fn unary(&self, op: UnaryOp) -> Result<(Instruction, usize), ParseError> {
        let g = match op {
            UnaryOp::Inc => "inc <register>",
            UnaryOp::Dec => "dec <register>",
        };
        let reg = self.register(1, g)?;
        Ok((Instruction::Unary { op, reg }, 2))
    }

    fn conditional(&self, cmp: Comparison) -> Result<(Instruction, usize), ParseError> {
        let g = match cmp {
            Comparison::Eq => "be <label> <lhs> <rhs>",
            Comparison::Ne => "bn <label> <lhs> <rhs>",
            Comparison::Gt => "bg <label> <lhs> <rhs>",
            Comparison::Lt => "bs <label> <lhs> <rhs>",
            Comparison::Ge => "bge <label> <lhs> <rhs>",
            Comparison::Le => "bse <label> <lhs> <rhs>",
        };
        let label = self.label(1, g)?;
        let lhs = self.register(2, g)?;
        let rhs = self.register(3, g)?;
        Ok((Instruction::ConditionalBranch { cmp, label, lhs, rhs }, 4))
    }

    /// Returns the operand at `offset` if it is of the expected kind.
    fn operand(&self, offset: usize, kind: TokenKind, grammar: &'static str) -> Result<&'a Token, ParseError> {
        match self.cursor.peek(offset) {
            Some(tok) if tok.kind == kind => Ok(tok),
            Some(tok) => Err(ParseError::Decode { grammar, found: Some(tok.kind) }),
            None => Err(ParseError::Decode { grammar, found: None }),
        }
    }

    fn label(&self, offset: usize, grammar: &'static str) -> Result<String, ParseError> {
        Ok(self.operand(offset, TokenKind::Label, grammar)?.lexeme.clone())
    }

    fn register(&self, offset: usize, grammar: &'static str) -> Result<RegisterId, ParseError> {
        let tok = self.operand(offset, TokenKind::Register, grammar)?;
        register_id(&tok.lexeme).ok_or_else(|| ParseError::LiteralOutOfRange {
            grammar,
            lexeme: tok.lexeme.clone(),
        })
    }

    fn value(&self, offset: usize, grammar: &'static str) -> Result<Value, ParseError> {
        let tok = self.operand(offset, TokenKind::IntLit, grammar)?;
        tok.lexeme.parse::<Value>().map_err(|_| ParseError::LiteralOutOfRange {
            grammar,
            lexeme: tok.lexeme.clone(),
        })
    }
}

/// Extracts the index from a register lexeme such as `r7`.
/// Every digit after the `r` is read.
pub fn register_id(lexeme: &str) -> Option<RegisterId> {
    let digits = lexeme.strip_prefix('r')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<RegisterId>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::lexer::tokenize;

    fn reg(lexeme: &str) -> Token {
        Token::new(lexeme, TokenKind::Register)
    }

    fn int(lexeme: &str) -> Token {
        Token::new(lexeme, TokenKind::IntLit)
    }

    fn label(lexeme: &str) -> Token {
        Token::new(lexeme, TokenKind::Label)
    }

    #[test]
    fn test_register_id() {
        for i in 0..=9u8 {
            assert_eq!(register_id(&format!("r{}", i)), Some(i));
        }
        assert_eq!(register_id("r12"), Some(12));
        assert_eq!(register_id("r"), None);
        assert_eq!(register_id("r1a"), None);
        assert_eq!(register_id("x1"), None);
        assert_eq!(register_id("r+1"), None);
        assert_eq!(register_id("r256"), None);
    }

    #[test]
    fn test_cursor() {
        let tokens = vec![reg("r0"), reg("r1")];
        let mut cursor = Cursor::new(&tokens);

        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.peek(1), Some(&tokens[1]));
        assert_eq!(cursor.peek(2), None);

        cursor.advance(1);
        assert_eq!(cursor.peek(0), Some(&tokens[1]));
        assert!(!cursor.is_at_end());

        cursor.advance(5);
        assert_eq!(cursor.position(), 2);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_load() {
        let tokens = tokenize("ld r1 5");
        let mut parser = Parser::new(&tokens);

        assert_eq!(parser.instruction(), Ok(Some(Instruction::Load { reg: 1, value: 5 })));
        assert_eq!(parser.position(), 3);
        assert_eq!(parser.instruction(), Ok(None));
    }

    #[test]
    fn test_load_missing_value() {
        let tokens = tokenize("ld r1");
        let mut parser = Parser::new(&tokens);

        assert_eq!(
            parser.instruction(),
            Err(ParseError::Decode { grammar: "ld <register> <value>", found: None })
        );
        // Nothing was consumed.
        assert_eq!(parser.position(), 0);
        assert!(Parser::new(&tokens).run().is_err());
    }

    #[test]
    fn test_store() {
        let tokens = vec![Token::new("str", TokenKind::Str), reg("r4"), int("100")];
        assert_eq!(Parser::new(&tokens).run(), Ok(vec![Instruction::Store { reg: 4, cell: 100 }]));

        let tokens = vec![Token::new("str", TokenKind::Str), int("100"), reg("r4")];
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::Decode { grammar: "str <register> <memory>", found: Some(TokenKind::IntLit) })
        );
    }

    #[test]
    fn test_output() {
        let tokens = tokenize("out r9");
        assert_eq!(Parser::new(&tokens).run(), Ok(vec![Instruction::Output { reg: 9 }]));

        let tokens = tokenize("out loop");
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::Decode { grammar: "out <register>", found: Some(TokenKind::Label) })
        );
    }

    #[test]
    fn test_branch() {
        let tokens = tokenize("br end");
        assert_eq!(Parser::new(&tokens).run(), Ok(vec![Instruction::Branch { label: "end".to_owned() }]));

        let tokens = tokenize("br r1");
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::Decode { grammar: "br <label>", found: Some(TokenKind::Register) })
        );

        let tokens = tokenize("br");
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::Decode { grammar: "br <label>", found: None })
        );
    }

    #[test]
    fn test_arithmetic() {
        let cases = [
            ("add", ArithOp::Add),
            ("sub", ArithOp::Sub),
            ("mul", ArithOp::Mul),
            ("div", ArithOp::Div),
        ];
        for (mnemonic, op) in cases.iter() {
            let tokens = tokenize(&format!("{} r0 r1 r2", mnemonic));
            let mut parser = Parser::new(&tokens);
            assert_eq!(
                parser.instruction(),
                Ok(Some(Instruction::Arithmetic { op: *op, dst: 0, lhs: 1, rhs: 2 }))
            );
            assert_eq!(parser.position(), 4);
        }
    }

    #[test]
    fn test_arithmetic_checks_every_operand() {
        // The right-hand side is validated like the others.
        let tokens = tokenize("add r0 r1 7");
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::Decode { grammar: "add <destination> <lhs> <rhs>", found: Some(TokenKind::IntLit) })
        );

        let tokens = tokenize("mul r0 r1");
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::Decode { grammar: "mul <destination> <lhs> <rhs>", found: None })
        );

        let tokens = tokenize("div r0 x r2");
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::Decode { grammar: "div <destination> <lhs> <rhs>", found: Some(TokenKind::Label) })
        );
    }

    #[test]
    fn test_unary() {
        let tokens = tokenize("inc r3 dec r4");
        assert_eq!(
            Parser::new(&tokens).run(),
            Ok(vec![
                Instruction::Unary { op: UnaryOp::Inc, reg: 3 },
                Instruction::Unary { op: UnaryOp::Dec, reg: 4 },
            ])
        );

        let tokens = tokenize("dec 4");
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::Decode { grammar: "dec <register>", found: Some(TokenKind::IntLit) })
        );
    }

    #[test]
    fn test_conditional() {
        let cases = [
            ("be", Comparison::Eq),
            ("bn", Comparison::Ne),
            ("bg", Comparison::Gt),
            ("bs", Comparison::Lt),
            ("bge", Comparison::Ge),
            ("bse", Comparison::Le),
        ];
        for (mnemonic, cmp) in cases.iter() {
            let tokens = tokenize(&format!("{} loop r0 r1", mnemonic));
            assert_eq!(
                Parser::new(&tokens).run(),
                Ok(vec![Instruction::ConditionalBranch { cmp: *cmp, label: "loop".to_owned(), lhs: 0, rhs: 1 }])
            );
        }

        let tokens = tokenize("bge r0 r1 loop");
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::Decode { grammar: "bge <label> <lhs> <rhs>", found: Some(TokenKind::Register) })
        );
    }

    #[test]
    fn test_label_record() {
        let tokens = tokenize("loop bn loop r0 r1");
        assert_eq!(
            Parser::new(&tokens).run(),
            Ok(vec![
                Instruction::Label { name: "loop".to_owned() },
                Instruction::ConditionalBranch { cmp: Comparison::Ne, label: "loop".to_owned(), lhs: 0, rhs: 1 },
            ])
        );

        // Undefined targets are not rejected.
        let tokens = tokenize("bn nowhere r0 r1");
        assert!(Parser::new(&tokens).run().is_ok());
    }

    #[test]
    fn test_structural() {
        let tokens = tokenize("ld r0 1 ?? out r0");
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::Structural { lexeme: "??".to_owned(), kind: TokenKind::Unknown, index: 3 })
        );

        let tokens = tokenize("r1");
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::Structural { lexeme: "r1".to_owned(), kind: TokenKind::Register, index: 0 })
        );

        // A surplus operand is left where an instruction should start.
        let tokens = tokenize("out r0 5");
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::Structural { lexeme: "5".to_owned(), kind: TokenKind::IntLit, index: 2 })
        );

        let tokens = vec![Token::new("\"hi\"", TokenKind::StrLit)];
        assert!(matches!(
            Parser::new(&tokens).run(),
            Err(ParseError::Structural { kind: TokenKind::StrLit, .. })
        ));
    }

    #[test]
    fn test_out_of_range() {
        let tokens = tokenize("ld r0 99999999999999999999");
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::LiteralOutOfRange {
                grammar: "ld <register> <value>",
                lexeme: "99999999999999999999".to_owned(),
            })
        );

        let tokens = vec![Token::new("out", TokenKind::Out), reg("r300")];
        assert_eq!(
            Parser::new(&tokens).run(),
            Err(ParseError::LiteralOutOfRange { grammar: "out <register>", lexeme: "r300".to_owned() })
        );
    }

    #[test]
    fn test_wide_register_is_not_truncated() {
        let tokens = vec![Token::new("inc", TokenKind::Inc), reg("r12")];
        assert_eq!(
            Parser::new(&tokens).run(),
            Ok(vec![Instruction::Unary { op: UnaryOp::Inc, reg: 12 }])
        );
    }

    #[test]
    fn test_run() {
        let tokens = vec![
            Token::new("ld", TokenKind::Ld), reg("r0"), int("0"),
            label("top"),
            Token::new("inc", TokenKind::Inc), reg("r0"),
            Token::new("out", TokenKind::Out), reg("r0"),
            Token::new("br", TokenKind::Br), label("top"),
        ];
        assert_eq!(
            Parser::new(&tokens).run(),
            Ok(vec![
                Instruction::Load { reg: 0, value: 0 },
                Instruction::Label { name: "top".to_owned() },
                Instruction::Unary { op: UnaryOp::Inc, reg: 0 },
                Instruction::Output { reg: 0 },
                Instruction::Branch { label: "top".to_owned() },
            ])
        );

        assert_eq!(Parser::new(&[]).run(), Ok(vec![]));
    }
}
