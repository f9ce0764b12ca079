// file: src/trace.rs

use std::fmt;

use crate::ast::{
    Block, Condition, ConditionKind, Expression, ExpressionKind, Parameter, Program,
    Statement, StatementKind, TokenRange,
};
use crate::token::SpannedToken;

/// 文法规则的名字，每个规约事件都标明是哪条规则。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Program,
    Declaration,
    DeclarationAssign,
    ArrayDeclaration,
    ArrayInit,
    If,
    IfElse,
    While,
    Function,
    Param,
    Assign,
    Increment,
    Decrement,
    Expression,
    Condition,
    Block,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Program => "program",
            Rule::Declaration => "declaration",
            Rule::DeclarationAssign => "declaration_assign",
            Rule::ArrayDeclaration => "array_declaration",
            Rule::ArrayInit => "array_init",
            Rule::If => "if",
            Rule::IfElse => "if_else",
            Rule::While => "while",
            Rule::Function => "function",
            Rule::Param => "param",
            Rule::Assign => "assign",
            Rule::Increment => "increment",
            Rule::Decrement => "decrement",
            Rule::Expression => "expression",
            Rule::Condition => "condition",
            Rule::Block => "block",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 一次规约事件：哪条规则，消费了哪些 token，跨越哪些行。
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub rule: Rule,
    pub tokens: TokenRange,
    pub first_line: u32,
    pub last_line: u32,
    summary: Option<String>,
}

impl Reduction {
    /// 面向用户的确认信息。只有顶层结构才会"报告"自己，其余规则返回 `None`。
    pub fn confirmation(&self) -> Option<String> {
        let summary = self.summary.as_deref();
        let text = match self.rule {
            Rule::Program => "Program syntax is valid".to_string(),
            Rule::Declaration => format!("Valid simple data-type declaration: {}", summary?),
            Rule::DeclarationAssign => format!("Valid declaration with assignment: {}", summary?),
            Rule::ArrayDeclaration => format!("Valid array declaration: {}", summary?),
            Rule::ArrayInit => {
                format!("Valid array declaration with initialization: {}", summary?)
            }
            Rule::If => "Valid if statement".to_string(),
            Rule::IfElse => "Valid if-else statement".to_string(),
            Rule::While => "Valid while loop".to_string(),
            Rule::Function => format!("Valid function declaration: {}", summary?),
            _ => return None,
        };
        Some(text)
    }
}

/// 按自底向上的规约顺序列出语法树中的全部规约事件。
///
/// 子节点总是先于父节点出现，兄弟节点按源码顺序排列，最后一个事件是 `program`。
pub fn reductions(program: &Program, tokens: &[SpannedToken]) -> Vec<Reduction> {
    let mut recorder = Recorder {
        tokens,
        events: Vec::new(),
    };
    for statement in &program.statements {
        recorder.statement(statement);
    }
    recorder.push(Rule::Program, &program.span, None);
    recorder.events
}

struct Recorder<'a> {
    tokens: &'a [SpannedToken],
    events: Vec<Reduction>,
}

impl<'a> Recorder<'a> {
    fn push(&mut self, rule: Rule, span: &TokenRange, summary: Option<String>) {
        let line_at = |index: usize| self.tokens.get(index).map(|t| t.line()).unwrap_or(0);
        let first_line = line_at(span.start);
        let last_line = if span.end > span.start {
            line_at(span.end - 1)
        } else {
            first_line
        };
        tracing::debug!(
            rule = rule.name(),
            tokens = ?span,
            first_line,
            last_line,
            "rule reduced"
        );
        self.events.push(Reduction {
            rule,
            tokens: span.clone(),
            first_line,
            last_line,
            summary,
        });
    }

    fn statement(&mut self, statement: &Statement) {
        let (rule, summary) = match &statement.kind {
            StatementKind::Declaration { var_type, name } => {
                (Rule::Declaration, Some(format!("{} {};", var_type, name)))
            }
            StatementKind::DeclarationAssign {
                var_type,
                name,
                value,
            } => {
                self.expression(value);
                (
                    Rule::DeclarationAssign,
                    Some(format!("{} {} = ...;", var_type, name)),
                )
            }
            // 两种写法的确认信息都按 `type[] name;` 打印
            StatementKind::ArrayDeclaration {
                element_type, name, ..
            } => (
                Rule::ArrayDeclaration,
                Some(format!("{}[] {};", element_type, name)),
            ),
            StatementKind::ArrayInit {
                element_type,
                name,
                init_type,
                size,
            } => (
                Rule::ArrayInit,
                Some(format!(
                    "{}[] {} = new {}[{}];",
                    element_type, name, init_type, size
                )),
            ),
            StatementKind::If {
                condition,
                then_block,
            } => {
                self.condition(condition);
                self.block(then_block);
                (Rule::If, None)
            }
            StatementKind::IfElse {
                condition,
                then_block,
                else_block,
            } => {
                self.condition(condition);
                self.block(then_block);
                self.block(else_block);
                (Rule::IfElse, None)
            }
            StatementKind::While { condition, body } => {
                self.condition(condition);
                self.block(body);
                (Rule::While, None)
            }
            StatementKind::Function(function) => {
                for param in &function.params {
                    self.parameter(param);
                }
                self.block(&function.body);
                (
                    Rule::Function,
                    Some(format!("{} {}(...)", function.return_type, function.name)),
                )
            }
            StatementKind::Assignment { value, .. } => {
                self.expression(value);
                (Rule::Assign, None)
            }
            StatementKind::Increment { .. } => (Rule::Increment, None),
            StatementKind::Decrement { .. } => (Rule::Decrement, None),
        };
        self.push(rule, &statement.span, summary);
    }

    fn parameter(&mut self, param: &Parameter) {
        self.push(Rule::Param, &param.span, None);
    }

    fn block(&mut self, block: &Block) {
        for statement in &block.statements {
            self.statement(statement);
        }
        self.push(Rule::Block, &block.span, None);
    }

    fn condition(&mut self, condition: &Condition) {
        match &condition.kind {
            ConditionKind::Truthy(expression) => self.expression(expression),
            ConditionKind::Compare { lhs, rhs, .. } => {
                self.expression(lhs);
                self.expression(rhs);
            }
        }
        self.push(Rule::Condition, &condition.span, None);
    }

    fn expression(&mut self, expression: &Expression) {
        match &expression.kind {
            ExpressionKind::Binary { lhs, rhs, .. } => {
                self.expression(lhs);
                self.expression(rhs);
            }
            ExpressionKind::Grouped(inner) => self.expression(inner),
            ExpressionKind::Identifier(_)
            | ExpressionKind::Number(_)
            | ExpressionKind::PostIncrement(_)
            | ExpressionKind::PostDecrement(_) => {}
        }
        self.push(Rule::Expression, &expression.span, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn trace(input: &str) -> Vec<Reduction> {
        let (tokens, errors) = tokenize(input);
        assert!(errors.is_empty());
        let program = parse(&tokens).expect("program should parse");
        reductions(&program, &tokens)
    }

    fn rules(input: &str) -> Vec<Rule> {
        trace(input).into_iter().map(|r| r.rule).collect()
    }

    #[test]
    fn test_children_reduce_before_parents() {
        assert_eq!(
            rules("if (x < 5) { y = 1; } else { y = 2; }"),
            vec![
                Rule::Expression, // x
                Rule::Expression, // 5
                Rule::Condition,
                Rule::Expression, // 1
                Rule::Assign,
                Rule::Block,
                Rule::Expression, // 2
                Rule::Assign,
                Rule::Block,
                Rule::IfElse,
                Rule::Program,
            ]
        );
    }

    #[test]
    fn test_function_reduces_params_then_body() {
        assert_eq!(
            rules("void display(int a) { count++; }"),
            vec![
                Rule::Param,
                Rule::Increment,
                Rule::Block,
                Rule::Function,
                Rule::Program,
            ]
        );
    }

    #[test]
    fn test_reduction_lines_cover_the_construct() {
        let events = trace("int a;\nwhile (a > 0) {\n  a--;\n}");
        let while_loop = events
            .iter()
            .find(|r| r.rule == Rule::While)
            .expect("while reduction");
        assert_eq!((while_loop.first_line, while_loop.last_line), (2, 4));
        assert_eq!(while_loop.tokens, 3..14);

        let program = events.last().unwrap();
        assert_eq!(program.rule, Rule::Program);
        assert_eq!((program.first_line, program.last_line), (1, 4));
    }

    #[test]
    fn test_confirmations() {
        let confirmations: Vec<String> = trace(
            "int age;\nfloat rate = 3.14;\nString names[];\nint[] arr = new int[10];\ndouble avg(double x) { }",
        )
        .iter()
        .filter_map(|r| r.confirmation())
        .collect();
        assert_eq!(
            confirmations,
            vec![
                "Valid simple data-type declaration: int age;",
                "Valid declaration with assignment: float rate = ...;",
                "Valid array declaration: String[] names;",
                "Valid array declaration with initialization: int[] arr = new int[10];",
                "Valid function declaration: double avg(...)",
                "Program syntax is valid",
            ]
        );
    }
}
