// file: src/lexer.rs

use std::collections::VecDeque;

use logos::Logos;

use crate::diagnostics::{LexerError, Span};
use crate::token::{SpannedToken, Token};

/// 惰性的词法分析器。
///
/// 真正的模式匹配交给 logos 生成的状态机，这里只负责两件事：
/// 为每个 token 补上行号和列号，以及把 logos 的错误转成 `LexerError`。
/// 出错的字符会被跳过，迭代继续，所以一个坏字符不会中断整个扫描。
pub struct Lexer<'a> {
    input: &'a str,
    inner: logos::Lexer<'a, Token>,
    line: u32,           // 当前行号，从 1 开始
    line_start: usize,   // 当前行首的字节位置
    scanned: usize,      // 已经统计过换行的字节位置
    pending: VecDeque<LexerError>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            inner: Token::lexer(input),
            line: 1,
            line_start: 0,
            scanned: 0,
            pending: VecDeque::new(),
        }
    }

    /// 当前已经扫描到的行号。
    pub fn line(&self) -> u32 {
        self.line
    }

    // 把 `scanned..position` 之间被跳过的换行（空白和注释里的）计入行号
    fn advance_to(&mut self, position: usize) {
        if position <= self.scanned {
            return;
        }
        for (offset, byte) in self.input.as_bytes()[self.scanned..position].iter().enumerate() {
            if *byte == b'\n' {
                self.line += 1;
                self.line_start = self.scanned + offset + 1;
            }
        }
        self.scanned = position;
    }

    fn span_of(&self, range: std::ops::Range<usize>) -> Span {
        Span {
            line: self.line,
            column: (range.start - self.line_start) as u32 + 1,
            start_byte: range.start,
            end_byte: range.end,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<SpannedToken, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.pending.pop_front() {
            return Some(Err(error));
        }

        let result = self.inner.next()?;
        let range = self.inner.span();
        self.advance_to(range.start);
        let span = self.span_of(range);

        match result {
            Ok(token) => Some(Ok(SpannedToken { token, span })),
            Err(kind) => {
                self.pending
                    .extend(LexerError::from_kind(kind, self.inner.slice(), span));
                for error in &self.pending {
                    tracing::debug!(line = error.span().line, "{}", error);
                }
                self.pending.pop_front().map(Err)
            }
        }
    }
}

/// 一次性扫描全部输入，把 token 和词法错误分开收集。
pub fn tokenize(input: &str) -> (Vec<SpannedToken>, Vec<LexerError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    for item in Lexer::new(input) {
        match item {
            Ok(token) => tokens.push(token),
            Err(error) => errors.push(error),
        }
    }
    (tokens, errors)
}
