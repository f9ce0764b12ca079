// file: src/lib.rs

//! 一个受限 Java 子集的语法校验器。
//!
//! 流水线只有两段：`lexer` 把源码切成 token，`parser` 按固定文法把 token
//! 规约成语法树。`validator` 把两段串起来，并把词法错误和语法错误收集成一份
//! 有序的诊断列表。

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod trace;
pub mod validator;

pub use diagnostics::{Diagnostic, LexerError, ParserError, Span, ValidateError};
pub use validator::{validate, validate_file, Outcome, Validation};
