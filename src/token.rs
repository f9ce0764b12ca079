// file: src/token.rs

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};

use logos::Logos;

use crate::diagnostics::Span;

/// 保留字。拼写与之完全相同的标识符一律被识别为关键字，而不是 `Identifier`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Int,
    Float,
    Double,
    Char,
    Boolean,
    String,
    Void,
    If,
    Else,
    While,
    New,
}

impl Keyword {
    /// 全部保留字，顺序与拼写表一致。
    pub const ALL: [Keyword; 11] = [
        Keyword::Int,
        Keyword::Float,
        Keyword::Double,
        Keyword::Char,
        Keyword::Boolean,
        Keyword::String,
        Keyword::Void,
        Keyword::If,
        Keyword::Else,
        Keyword::While,
        Keyword::New,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Int => "int",
            Keyword::Float => "float",
            Keyword::Double => "double",
            Keyword::Char => "char",
            Keyword::Boolean => "boolean",
            Keyword::String => "String",
            Keyword::Void => "void",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::While => "while",
            Keyword::New => "new",
        }
    }
}

// 字面量
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(value) => write!(f, "{}", value),
            // Debug 形式保留小数点：2.0 打印为 "2.0" 而不是 "2"
            Literal::Float(value) => write!(f, "{:?}", value),
        }
    }
}

/// 词法分析阶段 logos 回调产生的错误原因。
///
/// 未匹配任何规则的字符会得到 `Default` 值，也就是 `UnknownCharacter`。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexErrorKind {
    #[default]
    UnknownCharacter,
    MalformedNumber(String),
}

impl From<ParseIntError> for LexErrorKind {
    fn from(error: ParseIntError) -> Self {
        LexErrorKind::MalformedNumber(error.to_string())
    }
}

impl From<ParseFloatError> for LexErrorKind {
    fn from(error: ParseFloatError) -> Self {
        LexErrorKind::MalformedNumber(error.to_string())
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // 关键字的 token 规则优先于下面的标识符正则，所以 `int` 不会成为 Identifier，
    // 而 `integer` 依然按最长匹配成为 Identifier。
    #[token("int", |_| Keyword::Int)]
    #[token("float", |_| Keyword::Float)]
    #[token("double", |_| Keyword::Double)]
    #[token("char", |_| Keyword::Char)]
    #[token("boolean", |_| Keyword::Boolean)]
    #[token("String", |_| Keyword::String)]
    #[token("void", |_| Keyword::Void)]
    #[token("if", |_| Keyword::If)]
    #[token("else", |_| Keyword::Else)]
    #[token("while", |_| Keyword::While)]
    #[token("new", |_| Keyword::New)]
    Keyword(Keyword),

    #[regex(r"[a-zA-Z_][a-zA-Z_0-9]*", |lex| lex.slice().to_string())]
    Identifier(String),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().map(Literal::Integer))]
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().map(Literal::Float))]
    Literal(Literal),

    #[token("++")]
    Increment,
    #[token("--")]
    Decrement,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,

    #[token("=")]
    Equal,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
}

impl Token {
    /// 运算符和分隔符的源码拼写；带负载的 token 返回 `None`。
    pub fn symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            Token::Keyword(keyword) => keyword.as_str(),
            Token::Identifier(_) | Token::Literal(_) => return None,
            Token::Increment => "++",
            Token::Decrement => "--",
            Token::EqualEqual => "==",
            Token::NotEqual => "!=",
            Token::LessEqual => "<=",
            Token::GreaterEqual => ">=",
            Token::AndAnd => "&&",
            Token::OrOr => "||",
            Token::Equal => "=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Less => "<",
            Token::Greater => ">",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::Semicolon => ";",
            Token::Comma => ",",
        };
        Some(symbol)
    }
}

/// 打印 token 的词素，诊断信息 "unexpected token -> X" 中的 X 就来自这里。
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Literal(literal) => write!(f, "{}", literal),
            other => f.write_str(other.symbol().unwrap_or_default()),
        }
    }
}

/// 带位置信息的 token，由 `Lexer` 产生，交给 `Parser` 消费。
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

impl SpannedToken {
    pub fn line(&self) -> u32 {
        self.span.line
    }
}
