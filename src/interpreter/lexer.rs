use logos::Logos;

use crate::error::ParseError;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language; the reserved
/// word, operator and symbol sets are closed.
#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// String literal tokens such as `"hello"`, with the quotes stripped.
    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    Str(String),
    /// Boolean literal tokens, such as `true`.
    #[token("true", parse_bool)]
    #[token("false", parse_bool)]
    Bool(bool),
    /// `init`
    #[token("init")]
    Init,
    /// `let`
    #[token("let")]
    Let,
    /// `print`
    #[token("print")]
    Print,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `for`
    #[token("for")]
    For,
    /// `in`
    #[token("in")]
    In,
    /// `while`
    #[token("while")]
    While,
    /// `fn`
    #[token("fn")]
    Fn,
    /// `return`
    #[token("return")]
    Return,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `struct`
    #[token("struct")]
    Struct,
    /// `enum`
    #[token("enum")]
    Enum,
    /// `trait`
    #[token("trait")]
    Trait,
    /// `extends`
    #[token("extends")]
    Extends,
    /// `impl`
    #[token("impl")]
    Impl,
    /// `switch`
    #[token("switch")]
    Switch,
    /// `case`
    #[token("case")]
    Case,
    /// `default`
    #[token("default")]
    Default,
    /// `proof`
    #[token("proof")]
    Proof,
    /// `do`
    #[token("do")]
    Do,
    /// `yield`
    #[token("yield")]
    Yield,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `not`
    #[token("not")]
    Not,
    /// Identifier tokens; variable, function or type names such as `x` or
    /// `Point`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n\r]*", logos::skip)]
    Comment,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `=`
    #[token("=")]
    Equals,
    /// `<-`
    #[token("<-")]
    LeftArrow,
    /// `..`
    #[token("..")]
    DotDot,
    /// `.`
    #[token(".")]
    Dot,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `::`
    #[token("::")]
    ColonColon,
    /// `:`
    #[token(":")]
    Colon,
    /// `;`
    #[token(";")]
    Semicolon,
    /// Newlines only advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        lex.extras.line_start = lex.span().end;
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number and the byte offset at which it starts, so
/// every token can be given a line and column.
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// A 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Line number, starting at 1.
    pub line:   usize,
    /// Column number in bytes, starting at 1.
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Converts source text into a sequence of positioned tokens.
///
/// Whitespace, newlines and comments are discarded. The first character that
/// does not start any token aborts tokenization; the lexer does not try to
/// recover.
///
/// # Errors
/// - `UnrecognizedCharacter` for a character outside the token set.
/// - `IntegerTooLarge` for an integer literal that does not fit into `i64`.
///
/// # Example
/// ```
/// use rinse::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("let x = 12").unwrap();
/// let kinds: Vec<Token> = tokens.into_iter().map(|(token, _)| token).collect();
///
/// assert_eq!(kinds,
///            vec![Token::Let,
///                 Token::Identifier("x".into()),
///                 Token::Equals,
///                 Token::Integer(12)]);
///
/// assert!(tokenize("let y = 3 @ 4").is_err());
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, Position)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras::default());

    while let Some(token) = lexer.next() {
        let position = Position { line:   lexer.extras.line,
                                  column: lexer.span().start - lexer.extras.line_start + 1, };
        if let Ok(tok) = token {
            tokens.push((tok, position));
        } else {
            let slice = lexer.slice();
            if !slice.is_empty() && slice.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseError::IntegerTooLarge { literal: slice.to_string(),
                                                         position });
            }
            let character = slice.chars().next().unwrap_or('\0');
            return Err(ParseError::UnrecognizedCharacter { character, position });
        }
    }

    Ok(tokens)
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Integer(n) => return write!(f, "integer {n}"),
            Self::Str(s) => return write!(f, "string \"{s}\""),
            Self::Bool(b) => return write!(f, "'{b}'"),
            Self::Identifier(name) => return write!(f, "identifier '{name}'"),
            Self::Init => "init",
            Self::Let => "let",
            Self::Print => "print",
            Self::If => "if",
            Self::Else => "else",
            Self::For => "for",
            Self::In => "in",
            Self::While => "while",
            Self::Fn => "fn",
            Self::Return => "return",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Trait => "trait",
            Self::Extends => "extends",
            Self::Impl => "impl",
            Self::Switch => "switch",
            Self::Case => "case",
            Self::Default => "default",
            Self::Proof => "proof",
            Self::Do => "do",
            Self::Yield => "yield",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Comment => "comment",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Equals => "=",
            Self::LeftArrow => "<-",
            Self::DotDot => "..",
            Self::Dot => ".",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Comma => ",",
            Self::ColonColon => "::",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::NewLine => "newline",
            Self::Ignored => "whitespace",
        };
        write!(f, "'{text}'")
    }
}

/// Parses an integer literal from the current token slice.
///
/// # Returns
/// - `Some(i64)`: The parsed value.
/// - `None`: If the literal does not fit into `i64`.
fn parse_integer(lex: &mut logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Strips the quotes from a string literal and decodes its escapes.
///
/// Supported escapes are `\n`, `\t`, `\"` and `\\`; any other escaped
/// character is kept as written.
fn parse_string(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            },
            None => out.push('\\'),
        }
    }
    out
}

/// Parses a boolean literal from the current token slice (`true` or `false`).
fn parse_bool(lex: &mut logos::Lexer<Token>) -> Option<bool> {
    match lex.slice() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
