// file: src/parser.rs

use chumsky::prelude::*;
use chumsky::select;

use crate::ast::{
    ArrayStyle, BinaryOp, Block, Condition, ConditionKind, Expression, ExpressionKind,
    FunctionDeclaration, Parameter, Program, RelationalOp, Statement, StatementKind, TokenRange,
    TypeName,
};
use crate::diagnostics::{ParserError, Span};
use crate::token::{Keyword, Literal, SpannedToken, Token};

/// 所有子解析器共享的错误配置：chumsky 的 `Rich` 错误，最后再转换成 `ParserError`。
type ParserExtra<'src> = extra::Err<Rich<'src, Token>>;

fn token_range(span: SimpleSpan) -> TokenRange {
    span.start..span.end
}

// === 终结符 ===

fn identifier<'src>() -> impl Parser<'src, &'src [Token], String, ParserExtra<'src>> + Clone {
    // 关键字是独立的 token，永远不会满足 ID
    select! { Token::Identifier(name) => name }
}

fn number<'src>() -> impl Parser<'src, &'src [Token], Literal, ParserExtra<'src>> + Clone {
    select! { Token::Literal(literal) => literal }
}

/// `type → int | float | double | char | boolean | String | void`
fn type_name<'src>() -> impl Parser<'src, &'src [Token], TypeName, ParserExtra<'src>> + Clone {
    select! {
        Token::Keyword(Keyword::Int) => TypeName::Int,
        Token::Keyword(Keyword::Float) => TypeName::Float,
        Token::Keyword(Keyword::Double) => TypeName::Double,
        Token::Keyword(Keyword::Char) => TypeName::Char,
        Token::Keyword(Keyword::Boolean) => TypeName::Boolean,
        Token::Keyword(Keyword::String) => TypeName::String,
        Token::Keyword(Keyword::Void) => TypeName::Void,
    }
}

fn relational_op<'src>() -> impl Parser<'src, &'src [Token], RelationalOp, ParserExtra<'src>> + Clone
{
    select! {
        Token::Less => RelationalOp::Less,
        Token::Greater => RelationalOp::Greater,
        Token::LessEqual => RelationalOp::LessEqual,
        Token::GreaterEqual => RelationalOp::GreaterEqual,
        Token::EqualEqual => RelationalOp::Equal,
        Token::NotEqual => RelationalOp::NotEqual,
        Token::AndAnd => RelationalOp::And,
        Token::OrOr => RelationalOp::Or,
    }
}

// === 表达式 ===

/// 表达式解析器。
///
/// 文法本身没有规定优先级，这里固定为：`*` `/` 高于 `+` `-`，四者都是左结合。
/// `ID ++`、`ID --`、`ID`、`NUMBER` 和括号表达式是原子。
pub fn expression<'src>() -> impl Parser<'src, &'src [Token], Expression, ParserExtra<'src>> + Clone
{
    recursive(|expression| {
        let atom = choice((
            identifier()
                .then_ignore(just(Token::Increment))
                .map(ExpressionKind::PostIncrement),
            identifier()
                .then_ignore(just(Token::Decrement))
                .map(ExpressionKind::PostDecrement),
            identifier().map(ExpressionKind::Identifier),
            number().map(ExpressionKind::Number),
            expression
                .delimited_by(just(Token::LParen), just(Token::RParen))
                .map(|inner| ExpressionKind::Grouped(Box::new(inner))),
        ))
        .map_with(|kind, e| Expression {
            kind,
            span: token_range(e.span()),
        });

        let product_op = select! {
            Token::Star => BinaryOp::Mul,
            Token::Slash => BinaryOp::Div,
        };
        let sum_op = select! {
            Token::Plus => BinaryOp::Add,
            Token::Minus => BinaryOp::Sub,
        };

        let product = atom
            .clone()
            .foldl(product_op.then(atom).repeated(), |lhs, (op, rhs)| {
                Expression::binary(op, lhs, rhs)
            });

        product
            .clone()
            .foldl(sum_op.then(product).repeated(), |lhs, (op, rhs)| {
                Expression::binary(op, lhs, rhs)
            })
    })
}

/// `condition → expression relational_op expression | expression`
///
/// 只允许一次关系运算，`a < b < c` 会在第二个 `<` 处报错。
pub fn condition<'src>() -> impl Parser<'src, &'src [Token], Condition, ParserExtra<'src>> + Clone {
    let expression = expression();
    expression
        .clone()
        .then(relational_op().then(expression).or_not())
        .map_with(|(lhs, comparison), e| {
            let kind = match comparison {
                Some((op, rhs)) => ConditionKind::Compare { op, lhs, rhs },
                None => ConditionKind::Truthy(lhs),
            };
            Condition {
                kind,
                span: token_range(e.span()),
            }
        })
}

// === 语句 ===

/// 单条语句的解析器。`block` 里又包含语句，所以这里是递归的。
pub fn statement<'src>() -> impl Parser<'src, &'src [Token], Statement, ParserExtra<'src>> + Clone {
    recursive(|statement| {
        let expression = expression();
        let semicolon = just(Token::Semicolon);

        // block → { statement_list } | { }
        let block = statement
            .repeated()
            .collect::<Vec<_>>()
            .delimited_by(just(Token::LBrace), just(Token::RBrace))
            .map_with(|statements, e| Block {
                statements,
                span: token_range(e.span()),
            });

        // declaration → type ID ; | type ID = expression ;
        let declaration = type_name()
            .then(identifier())
            .then(just(Token::Equal).ignore_then(expression.clone()).or_not())
            .then_ignore(semicolon.clone())
            .map(|((var_type, name), value)| match value {
                Some(value) => StatementKind::DeclarationAssign {
                    var_type,
                    name,
                    value,
                },
                None => StatementKind::Declaration { var_type, name },
            });

        // array_declaration → type [ ] ID ; | type [ ] ID = new type [ NUMBER ] ;
        let empty_brackets = just(Token::LBracket).then(just(Token::RBracket));
        let array_initializer = just(Token::Equal)
            .ignore_then(just(Token::Keyword(Keyword::New)))
            .ignore_then(type_name())
            .then(number().delimited_by(just(Token::LBracket), just(Token::RBracket)));
        let array_after_type = type_name()
            .then_ignore(empty_brackets.clone())
            .then(identifier())
            .then(array_initializer.or_not())
            .then_ignore(semicolon.clone())
            .map(|((element_type, name), initializer)| match initializer {
                Some((init_type, size)) => StatementKind::ArrayInit {
                    element_type,
                    name,
                    init_type,
                    size,
                },
                None => StatementKind::ArrayDeclaration {
                    element_type,
                    name,
                    style: ArrayStyle::AfterType,
                },
            });

        // array_declaration → type ID [ ] ;
        let array_after_name = type_name()
            .then(identifier())
            .then_ignore(empty_brackets)
            .then_ignore(semicolon.clone())
            .map(|(element_type, name)| StatementKind::ArrayDeclaration {
                element_type,
                name,
                style: ArrayStyle::AfterName,
            });

        // function_declaration → type ID ( parameter_list ) block
        let parameter = type_name()
            .then(identifier())
            .map_with(|(param_type, name), e| Parameter {
                param_type,
                name,
                span: token_range(e.span()),
            });
        let function_declaration = type_name()
            .then(identifier())
            .then(
                parameter
                    .separated_by(just(Token::Comma))
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::LParen), just(Token::RParen)),
            )
            .then(block.clone())
            .map(|(((return_type, name), params), body)| {
                StatementKind::Function(FunctionDeclaration {
                    return_type,
                    name,
                    params,
                    body,
                })
            });

        let parenthesized_condition =
            condition().delimited_by(just(Token::LParen), just(Token::RParen));

        // if_statement → if ( condition ) block [ else block ]
        let if_statement = just(Token::Keyword(Keyword::If))
            .ignore_then(parenthesized_condition.clone())
            .then(block.clone())
            .then(
                just(Token::Keyword(Keyword::Else))
                    .ignore_then(block.clone())
                    .or_not(),
            )
            .map(|((condition, then_block), else_block)| match else_block {
                Some(else_block) => StatementKind::IfElse {
                    condition,
                    then_block,
                    else_block,
                },
                None => StatementKind::If {
                    condition,
                    then_block,
                },
            });

        // while_statement → while ( condition ) block
        let while_statement = just(Token::Keyword(Keyword::While))
            .ignore_then(parenthesized_condition)
            .then(block)
            .map(|(condition, body)| StatementKind::While { condition, body });

        let assignment = identifier()
            .then_ignore(just(Token::Equal))
            .then(expression)
            .then_ignore(semicolon.clone())
            .map(|(target, value)| StatementKind::Assignment { target, value });

        let increment = identifier()
            .then_ignore(just(Token::Increment))
            .then_ignore(semicolon.clone())
            .map(|target| StatementKind::Increment { target });

        let decrement = identifier()
            .then_ignore(just(Token::Decrement))
            .then_ignore(semicolon)
            .map(|target| StatementKind::Decrement { target });

        choice((
            declaration,
            array_after_type,
            array_after_name,
            function_declaration,
            if_statement,
            while_statement,
            assignment,
            increment,
            decrement,
        ))
        .map_with(|kind, e| Statement {
            kind,
            span: token_range(e.span()),
        })
    })
}

/// `program → statement_list`，至少一条语句，并且必须消费完全部 token。
pub fn program<'src>() -> impl Parser<'src, &'src [Token], Program, ParserExtra<'src>> + Clone {
    statement()
        .repeated()
        .at_least(1)
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map_with(|statements, e| Program {
            statements,
            span: token_range(e.span()),
        })
}

/// 解析整个 token 序列。
///
/// 解析在第一个无法匹配的 token 处停止，只报告这一个错误。
pub fn parse(tokens: &[SpannedToken]) -> Result<Program, ParserError> {
    let kinds: Vec<Token> = tokens.iter().map(|t| t.token.clone()).collect();

    program()
        .parse(kinds.as_slice())
        .into_result()
        .map_err(|errors| {
            let error = errors
                .first()
                .map(|error| to_parser_error(error, tokens))
                .unwrap_or(ParserError::UnexpectedEof);
            tracing::debug!(line = ?error.line(), "{}", error);
            error
        })
}

fn to_parser_error(error: &Rich<'_, Token>, tokens: &[SpannedToken]) -> ParserError {
    match error.found() {
        Some(found) => ParserError::UnexpectedToken {
            found: found.clone(),
            span: tokens
                .get(error.span().start)
                .map(|t| t.span)
                .unwrap_or_else(Span::default),
        },
        None => ParserError::UnexpectedEof,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_source(input: &str) -> Result<Program, ParserError> {
        let (tokens, errors) = tokenize(input);
        assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);
        parse(&tokens)
    }

    fn single_statement(input: &str) -> StatementKind {
        let program = parse_source(input).expect("program should parse");
        assert_eq!(program.statements.len(), 1);
        program.statements.into_iter().next().unwrap().kind
    }

    fn unexpected(input: &str) -> String {
        parse_source(input)
            .expect_err("program should be rejected")
            .to_string()
    }

    #[test]
    fn test_every_rule_accepts_a_valid_instance() {
        let inputs = [
            "int x;",
            "float y = 1.5;",
            "double d = (a + b) / 2;",
            "char c;",
            "boolean flag = 1;",
            "String name;",
            "int[] numbers;",
            "String names[];",
            "float[] values = new float[20];",
            "if (age > 18) { count++; }",
            "if (flag) { } else { x--; }",
            "while (x > 0) { x--; }",
            "int add(int a, int b) { sum = a + b; }",
            "void display() { count++; }",
            "x = y++;",
            "count++;",
            "count--;",
        ];
        for input in inputs {
            assert!(parse_source(input).is_ok(), "rejected: {}", input);
        }
    }

    #[test]
    fn test_declaration_shapes() {
        assert_eq!(
            single_statement("int x;"),
            StatementKind::Declaration {
                var_type: TypeName::Int,
                name: "x".to_string()
            }
        );
        match single_statement("float y = 1.5;") {
            StatementKind::DeclarationAssign {
                var_type, value, ..
            } => {
                assert_eq!(var_type, TypeName::Float);
                assert_eq!(value.kind, ExpressionKind::Number(Literal::Float(1.5)));
            }
            other => panic!("expected declaration with assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_array_forms() {
        assert_eq!(
            single_statement("int[] arr = new int[10];"),
            StatementKind::ArrayInit {
                element_type: TypeName::Int,
                name: "arr".to_string(),
                init_type: TypeName::Int,
                size: Literal::Integer(10),
            }
        );
        assert_eq!(
            single_statement("int arr[];"),
            StatementKind::ArrayDeclaration {
                element_type: TypeName::Int,
                name: "arr".to_string(),
                style: ArrayStyle::AfterName,
            }
        );
        // 缺少 `[]` 的初始化，或者 `new` 里缺少长度，都会被拒绝
        assert_eq!(unexpected("int arr = new int[10];"), "unexpected token -> new");
        assert_eq!(
            unexpected("String[] names = new String[];"),
            "unexpected token -> ]"
        );
    }

    #[test]
    fn test_if_else_reduces_to_if_else() {
        match single_statement("if (x < 5) { y = 1; } else { y = 2; }") {
            StatementKind::IfElse {
                condition,
                then_block,
                else_block,
            } => {
                assert!(matches!(
                    condition.kind,
                    ConditionKind::Compare {
                        op: RelationalOp::Less,
                        ..
                    }
                ));
                assert_eq!(then_block.statements.len(), 1);
                assert_eq!(else_block.statements.len(), 1);
            }
            other => panic!("expected if-else, got {:?}", other),
        }
    }

    #[test]
    fn test_function_parameters() {
        match single_statement("double avg(double x, double y) { }") {
            StatementKind::Function(function) => {
                assert_eq!(function.return_type, TypeName::Double);
                assert_eq!(function.name, "avg");
                let names: Vec<&str> = function.params.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["x", "y"]);
                assert!(function.body.statements.is_empty());
            }
            other => panic!("expected function, got {:?}", other),
        }
        assert_eq!(unexpected("int sum(a, b) { }"), "unexpected token -> a");
        assert_eq!(unexpected("int f(int a,) { }"), "unexpected token -> )");
    }

    #[test]
    fn test_arithmetic_precedence_and_associativity() {
        let expression_of = |input: &str| match single_statement(input) {
            StatementKind::Assignment { value, .. } => value.to_string(),
            other => panic!("expected assignment, got {:?}", other),
        };
        assert_eq!(expression_of("x = a + b * c - d;"), "((a + (b * c)) - d)");
        assert_eq!(expression_of("x = a - b - c;"), "((a - b) - c)");
        assert_eq!(expression_of("x = a / b * c;"), "((a / b) * c)");
        assert_eq!(expression_of("x = (a + b) * c;"), "((a + b) * c)");
        assert_eq!(expression_of("x = i++ + 1;"), "(i++ + 1)");
    }

    #[test]
    fn test_missing_expression_reports_semicolon() {
        let error = parse_source("int x = ;").unwrap_err();
        assert_eq!(
            error,
            ParserError::UnexpectedToken {
                found: Token::Semicolon,
                span: Span {
                    line: 1,
                    column: 9,
                    start_byte: 8,
                    end_byte: 9
                },
            }
        );
    }

    #[test]
    fn test_empty_input_is_unexpected_end() {
        assert_eq!(parse_source(""), Err(ParserError::UnexpectedEof));
        assert_eq!(
            parse_source("// only a comment\n"),
            Err(ParserError::UnexpectedEof)
        );
    }

    #[test]
    fn test_keyword_is_not_an_identifier() {
        assert_eq!(unexpected("int if;"), "unexpected token -> if");
        assert_eq!(unexpected("while = 1;"), "unexpected token -> =");
    }

    #[test]
    fn test_single_relational_operator_only() {
        assert_eq!(
            unexpected("while (a < b < c) { }"),
            "unexpected token -> <"
        );
    }

    #[test]
    fn test_first_error_is_reported_with_its_line() {
        let error = parse_source("int a;\nint b = 2\nint c;").unwrap_err();
        assert_eq!(error.to_string(), "unexpected token -> int");
        assert_eq!(error.line(), Some(3));

        assert_eq!(
            unexpected("int multiply(int a, int b) { product = a * b }"),
            "unexpected token -> }"
        );
    }

    #[test]
    fn test_unclosed_block_is_unexpected_end() {
        assert_eq!(
            parse_source("if (x > 5) {\n    y = 10;\n"),
            Err(ParserError::UnexpectedEof)
        );
    }

    #[test]
    fn test_program_span_covers_all_tokens() {
        let program = parse_source("int a; a++;").unwrap();
        assert_eq!(program.span, 0..6);
        assert_eq!(program.statements[1].span, 3..6);
    }
}
