// src/ast.rs

use std::fmt;
use std::ops::Range;

use crate::token::Literal;

/// 节点覆盖的 token 范围（token 序列中的下标，左闭右开）。
pub type TokenRange = Range<usize>;

/// `type` 规则允许的类型名。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Int,
    Float,
    Double,
    Char,
    Boolean,
    String,
    Void,
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TypeName::Int => "int",
            TypeName::Float => "float",
            TypeName::Double => "double",
            TypeName::Char => "char",
            TypeName::Boolean => "boolean",
            TypeName::String => "String",
            TypeName::Void => "void",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalOp {
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,
}

impl fmt::Display for RelationalOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self {
            RelationalOp::Less => "<",
            RelationalOp::Greater => ">",
            RelationalOp::LessEqual => "<=",
            RelationalOp::GreaterEqual => ">=",
            RelationalOp::Equal => "==",
            RelationalOp::NotEqual => "!=",
            RelationalOp::And => "&&",
            RelationalOp::Or => "||",
        };
        f.write_str(symbol)
    }
}

// --- 表达式 ---

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Identifier(String),
    Number(Literal),
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    /// `x++`
    PostIncrement(String),
    /// `x--`
    PostDecrement(String),
    /// `( expression )`
    Grouped(Box<Expression>),
}

impl Expression {
    /// 合并两个操作数，新节点的范围从左操作数开始到右操作数结束。
    pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Self {
        let span = lhs.span.start..rhs.span.end;
        Expression {
            kind: ExpressionKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            span,
        }
    }
}

/// 以完全加括号的形式打印，方便在测试中检查优先级和结合性。
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Identifier(name) => write!(f, "{}", name),
            ExpressionKind::Number(literal) => write!(f, "{}", literal),
            ExpressionKind::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
            ExpressionKind::PostIncrement(name) => write!(f, "{}++", name),
            ExpressionKind::PostDecrement(name) => write!(f, "{}--", name),
            ExpressionKind::Grouped(inner) => write!(f, "{}", inner),
        }
    }
}

// --- 条件 ---

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub kind: ConditionKind,
    pub span: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionKind {
    /// 单个表达式作为条件，例如 `while (flag)`
    Truthy(Expression),
    /// 恰好一次关系运算
    Compare {
        op: RelationalOp,
        lhs: Expression,
        rhs: Expression,
    },
}

// --- 语句 ---

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub param_type: TypeName,
    pub name: String,
    pub span: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub return_type: TypeName,
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Block,
}

/// 数组声明里 `[]` 的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayStyle {
    /// `int[] arr;`
    AfterType,
    /// `int arr[];`
    AfterName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: TokenRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `type ID ;`
    Declaration { var_type: TypeName, name: String },
    /// `type ID = expression ;`
    DeclarationAssign {
        var_type: TypeName,
        name: String,
        value: Expression,
    },
    ArrayDeclaration {
        element_type: TypeName,
        name: String,
        style: ArrayStyle,
    },
    /// `type [ ] ID = new type [ NUMBER ] ;`
    ArrayInit {
        element_type: TypeName,
        name: String,
        init_type: TypeName,
        size: Literal,
    },
    If {
        condition: Condition,
        then_block: Block,
    },
    IfElse {
        condition: Condition,
        then_block: Block,
        else_block: Block,
    },
    While {
        condition: Condition,
        body: Block,
    },
    Function(FunctionDeclaration),
    Assignment { target: String, value: Expression },
    Increment { target: String },
    Decrement { target: String },
}

/// 语法树的根节点。
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub span: TokenRange,
}
