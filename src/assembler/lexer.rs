//! This lexer splits source text into classified words.
use std::fmt;

/// A word of the source together with what it was classified as.
/// Tokens carry no position; their order in the output is their order in
/// the source.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub lexeme: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new<S: Into<String>>(lexeme: S, kind: TokenKind) -> Self {
        Token { lexeme: lexeme.into(), kind }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    IntLit,
    /// Reserved. No word is ever classified as a string literal.
    StrLit,
    Br,
    Ld,
    Str,
    Out,
    Add,
    Sub,
    Mul,
    Div,
    Inc,
    Dec,
    Be,
    Bn,
    Bg,
    Bs,
    Bge,
    Bse,
    Label,
    Register,
    Unknown,
}

impl TokenKind {
    /// Returns true if this kind names an instruction.
    pub fn is_mnemonic(&self) -> bool {
        mnemonic_str(*self).is_some()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::IntLit   => f.write_str("integer literal"),
            TokenKind::StrLit   => f.write_str("string literal"),
            TokenKind::Label    => f.write_str("label"),
            TokenKind::Register => f.write_str("register"),
            TokenKind::Unknown  => f.write_str("unknown word"),
            kind => write!(f, "instruction `{}`", mnemonic_str(*kind).unwrap_or("?")),
        }
    }
}

/// Every character up to and including the space separates words.
#[inline]
pub fn is_separator(c: char) -> bool {
    (c as u32) <= 32
}

/// Splits the text into words and classifies each of them.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut sb = String::new();

    for c in text.chars() {
        if is_separator(c) {
            if !sb.is_empty() {
                tokens.push(process_word(&sb));
                sb.clear();
            }
        } else {
            sb.push(c);
        }
    }
    // The last word has no separator after it.
    if !sb.is_empty() {
        tokens.push(process_word(&sb));
    }

    debug!("lexer produced {} token(s)", tokens.len());
    tokens
}

fn process_word(word: &str) -> Token {
    let word = word.trim_start_matches(is_separator);
    let kind = classify(word);
    trace!("`{}` => {:?}", word, kind);
    Token::new(word, kind)
}

/// Classifies a single word. The first matching rule wins:
/// mnemonic, integer literal, register, label, then unknown.
pub fn classify(word: &str) -> TokenKind {
    if let Some(kind) = mnemonic(word) {
        return kind;
    }
    if is_int_lit(word) {
        return TokenKind::IntLit;
    }
    if is_register(word) {
        return TokenKind::Register;
    }
    if is_label(word) {
        return TokenKind::Label;
    }
    TokenKind::Unknown
}

fn mnemonic(word: &str) -> Option<TokenKind> {
    match word {
        "br"  => Some(TokenKind::Br),
        "ld"  => Some(TokenKind::Ld),
        "str" => Some(TokenKind::Str),
        "out" => Some(TokenKind::Out),
        "add" => Some(TokenKind::Add),
        "sub" => Some(TokenKind::Sub),
        "mul" => Some(TokenKind::Mul),
        "div" => Some(TokenKind::Div),
        "inc" => Some(TokenKind::Inc),
        "dec" => Some(TokenKind::Dec),
        "be"  => Some(TokenKind::Be),
        "bn"  => Some(TokenKind::Bn),
        "bg"  => Some(TokenKind::Bg),
        "bs"  => Some(TokenKind::Bs),
        "bge" => Some(TokenKind::Bge),
        "bse" => Some(TokenKind::Bse),
        _ => None,
    }
}

fn mnemonic_str(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Br  => Some("br"),
        TokenKind::Ld  => Some("ld"),
        TokenKind::Str => Some("str"),
        TokenKind::Out => Some("out"),
        TokenKind::Add => Some("add"),
        TokenKind::Sub => Some("sub"),
        TokenKind::Mul => Some("mul"),
        TokenKind::Div => Some("div"),
        TokenKind::Inc => Some("inc"),
        TokenKind::Dec => Some("dec"),
        TokenKind::Be  => Some("be"),
        TokenKind::Bn  => Some("bn"),
        TokenKind::Bg  => Some("bg"),
        TokenKind::Bs  => Some("bs"),
        TokenKind::Bge => Some("bge"),
        TokenKind::Bse => Some("bse"),
        _ => None,
    }
}

// `0`, or a nonzero digit followed by any digits. No leading zeros.
fn is_int_lit(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some('0') => chars.next().is_none(),
        Some('1'..='9') => chars.all(|c| c.is_ascii_digit()),
        _ => false,
    }
}

// `r` and exactly one digit.
fn is_register(word: &str) -> bool {
    let bytes = word.as_bytes();
    bytes.len() == 2 && bytes[0] == b'r' && bytes[1].is_ascii_digit()
}

fn is_label(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        },
        _ => false,
    }
}
