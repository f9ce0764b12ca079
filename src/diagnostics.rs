// file: src/diagnostics.rs

use std::path::PathBuf;

use thiserror::Error;

use crate::token::{LexErrorKind, Token};

// --- 统一的诊断类型 ---
// 词法错误和语法错误放在同一个有序列表里，但依然可以按变体区分。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    /// 词法分析器错误
    #[error(transparent)]
    Lexer(#[from] LexerError),
    /// 语法分析器错误
    #[error(transparent)]
    Parser(#[from] ParserError),
}

impl Diagnostic {
    pub fn is_lexical(&self) -> bool {
        matches!(self, Diagnostic::Lexer(_))
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, Diagnostic::Parser(_))
    }
}

// --- 词法分析阶段的错误 ---
// 这两种错误都只跳过出错的那段输入，词法分析会继续进行。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexerError {
    /// 遇到了一个不属于任何合法 Token 起始部分的字符，例如 `@` 或 `$`。
    #[error("Illegal character '{char}' at line {}", .span.line)]
    UnknownCharacter { char: char, span: Span },

    /// 数字字面量无法解析，例如超出 i64 范围的整数。
    #[error("Malformed number literal '{text}' at line {}: {reason}", .span.line)]
    MalformedNumberLiteral {
        text: String,
        reason: String,
        span: Span,
    },
}

impl LexerError {
    /// 把 logos 给出的错误原因和出错的源码片段转成诊断。
    ///
    /// 未知字符的片段可能包含不止一个字符，每个字符各自产生一条诊断。
    pub(crate) fn from_kind(kind: LexErrorKind, text: &str, span: Span) -> Vec<LexerError> {
        match kind {
            LexErrorKind::UnknownCharacter => text
                .char_indices()
                .map(|(offset, char)| LexerError::UnknownCharacter {
                    char,
                    span: Span {
                        column: span.column + offset as u32,
                        start_byte: span.start_byte + offset,
                        end_byte: span.start_byte + offset + char.len_utf8(),
                        ..span
                    },
                })
                .collect(),
            LexErrorKind::MalformedNumber(reason) => vec![LexerError::MalformedNumberLiteral {
                text: text.to_string(),
                reason,
                span,
            }],
        }
    }

    pub fn span(&self) -> Span {
        match self {
            LexerError::UnknownCharacter { span, .. } => *span,
            LexerError::MalformedNumberLiteral { span, .. } => *span,
        }
    }
}

// --- 解析阶段的错误 ---
// 解析在第一个错误处停止，所以每次解析最多产生一个 ParserError。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParserError {
    /// "在这里期望的是别的东西，但却找到了这个 token"
    #[error("unexpected token -> {found}")]
    UnexpectedToken { found: Token, span: Span },

    /// 规则还没有完成，输入就结束了。
    #[error("unexpected end of input")]
    UnexpectedEof,
}

impl ParserError {
    /// 出错 token 所在的行；输入提前结束时没有行号。
    pub fn line(&self) -> Option<u32> {
        match self {
            ParserError::UnexpectedToken { span, .. } => Some(span.line),
            ParserError::UnexpectedEof => None,
        }
    }
}

// --- 文件读取阶段的错误 ---
// 这是唯一会让一次校验整体失败的错误，由命令行映射成非零退出码。
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("Error: File '{}' could not be read", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// --- 位置信息 ---
// Span 代表了源代码中的一个范围，(Copy trait 让它在函数间传递更方便)
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default)]
pub struct Span {
    pub line: u32,
    pub column: u32,
    pub start_byte: usize, // 在源文件中的起始字节位置
    pub end_byte: usize,   // 在源文件中的结束字节位置
}
