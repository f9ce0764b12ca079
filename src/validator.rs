// file: src/validator.rs

use std::fs;
use std::path::Path;

use crate::ast::Program;
use crate::diagnostics::{Diagnostic, ValidateError};
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::trace::{self, Reduction};

/// 一次校验的完整结果。
///
/// 每次调用 `validate` 都从空的诊断列表开始，不同调用之间没有共享状态。
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// 语法树；语法错误时为 `None`。只有词法错误时树依然会被构建出来。
    pub tree: Option<Program>,
    /// 先是全部词法错误（按源码顺序），然后是最多一个语法错误。
    pub diagnostics: Vec<Diagnostic>,
    /// 自底向上的规约事件，没有语法树时为空。
    pub reductions: Vec<Reduction>,
}

/// 校验的最终结论。
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Valid(Program),
    Invalid(Vec<Diagnostic>),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn syntax_errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_syntax())
    }

    pub fn lexical_errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_lexical())
    }

    pub fn into_outcome(self) -> Outcome {
        match self.tree {
            Some(tree) if self.diagnostics.is_empty() => Outcome::Valid(tree),
            _ => Outcome::Invalid(self.diagnostics),
        }
    }
}

/// 校验一段源码：词法分析，语法分析，再整理出规约事件。
pub fn validate(source: &str) -> Validation {
    let (tokens, lex_errors) = tokenize(source);
    let mut diagnostics: Vec<Diagnostic> = lex_errors.into_iter().map(Diagnostic::from).collect();

    let tree = match parse(&tokens) {
        Ok(program) => Some(program),
        Err(error) => {
            diagnostics.push(error.into());
            None
        }
    };

    let reductions = tree
        .as_ref()
        .map(|program| trace::reductions(program, &tokens))
        .unwrap_or_default();

    tracing::info!(
        tokens = tokens.len(),
        diagnostics = diagnostics.len(),
        valid = diagnostics.is_empty(),
        "validation finished"
    );

    Validation {
        tree,
        diagnostics,
        reductions,
    }
}

/// 读取文件并校验。读取失败是唯一的致命错误。
pub fn validate_file(path: impl AsRef<Path>) -> Result<Validation, ValidateError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| ValidateError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(validate(&source))
}
