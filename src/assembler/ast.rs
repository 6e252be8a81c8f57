//! Decoded program records.
//!
//! A program is a flat, ordered list of instructions and labels. Labels are
//! kept as records of their own so that a later stage can resolve them to
//! positions; nothing here checks that a branch target is ever defined.
//!
//! Supported instructions:
//!
//! ```nasm
//! br  LABEL           ; unconditional branch
//! ld  RA VALUE        ; RA <= VALUE
//! str RA CELL         ; memory[CELL] <= RA
//! out RA              ; print RA
//! add RD RA RB        ; RD <= RA + RB  (also sub, mul, div)
//! inc RA              ; RA <= RA + 1   (also dec)
//! be  LABEL RA RB     ; branch to LABEL if RA == RB
//! bn  LABEL RA RB     ; ... if RA != RB
//! bg  LABEL RA RB     ; ... if RA >  RB
//! bs  LABEL RA RB     ; ... if RA <  RB
//! bge LABEL RA RB     ; ... if RA >= RB
//! bse LABEL RA RB     ; ... if RA <= RB
//! ```
//!
//! Any identifier standing where an instruction is expected is a label.

use std::fmt;

/// Index of a register, `r0` through `r9`.
pub type RegisterId = u8;

/// Integer operand of `ld` and `str`.
pub type Value = i64;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Instruction {
    Branch { label: String },
    Load { reg: RegisterId, value: Value },
    Store { reg: RegisterId, cell: Value },
    Output { reg: RegisterId },
    Arithmetic { op: ArithOp, dst: RegisterId, lhs: RegisterId, rhs: RegisterId },
    Unary { op: UnaryOp, reg: RegisterId },
    ConditionalBranch { cmp: Comparison, label: String, lhs: RegisterId, rhs: RegisterId },
    Label { name: String },
}

impl Instruction {
    /// Returns true for label records.
    pub fn is_label(&self) -> bool {
        matches!(self, Instruction::Label { .. })
    }

    /// The label this record refers to or defines, if any.
    pub fn label(&self) -> Option<&str> {
        use Instruction::*;
        match self {
            Branch { label }                 |
            ConditionalBranch { label, .. }  => Some(label.as_str()),
            Label { name }                   => Some(name.as_str()),
            _                                => None,
        }
    }
}

/// Prints the instruction back in source syntax.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;
        match self {
            Branch { label }                  => write!(f, "br {}", label),
            Load { reg, value }               => write!(f, "ld r{} {}", reg, value),
            Store { reg, cell }               => write!(f, "str r{} {}", reg, cell),
            Output { reg }                    => write!(f, "out r{}", reg),
            Arithmetic { op, dst, lhs, rhs }  => write!(f, "{} r{} r{} r{}", op, dst, lhs, rhs),
            Unary { op, reg }                 => write!(f, "{} r{}", op, reg),
            ConditionalBranch { cmp, label, lhs, rhs } =>
                write!(f, "{} {} r{} r{}", cmp, label, lhs, rhs),
            Label { name }                    => write!(f, "{}", name),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
            ArithOp::Div => "div",
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UnaryOp {
    Inc,
    Dec,
}

impl UnaryOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            UnaryOp::Inc => "inc",
            UnaryOp::Dec => "dec",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Register comparison performed by a conditional branch.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Comparison {
    pub fn mnemonic(&self) -> &'static str {
        use Comparison::*;
        match self {
            Eq => "be",
            Ne => "bn",
            Gt => "bg",
            Lt => "bs",
            Ge => "bge",
            Le => "bse",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
