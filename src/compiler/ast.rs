use std::fmt::{Display, Formatter};
use crate::compiler::lexer::{Span, Token};
use crate::compiler::number::NumberValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add, Subtract,
    Multiply, Divide,
    Power,

    Equal, NotEqual,
    Less, Greater,
    LessEqual, GreaterEqual,

    And, Or, Exclor,
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Power => "^",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Exclor => "exclor",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "not",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Number {
        token: Token,
        value: NumberValue,
    },
    VarAccess {
        name: Token,
    },
    VarAssign {
        name: Token,
        value: Box<Node>,
    },
    BinOp {
        left: Box<Node>,
        operator: BinaryOperator,
        operator_token: Token,
        right: Box<Node>,
    },
    UnaryOp {
        operator: UnaryOperator,
        operator_token: Token,
        operand: Box<Node>,
    },
    If {
        cases: Vec<(Node, Node)>, // (condition, expression), in source order
        else_case: Option<Box<Node>>,
    },
    For {
        var_name: Token,
        start: Box<Node>,
        end: Box<Node>,
        step: Option<Box<Node>>,
        body: Box<Node>,
    },
    While {
        condition: Box<Node>,
        body: Box<Node>,
    },
    FuncDef {
        name: Option<Token>,
        params: Vec<Token>,
        body: Box<Node>,
    },
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
}

/// A syntax tree node. The span is fixed at construction and covers the node's
/// leftmost to rightmost component.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    kind: NodeKind,
    span: Span,
}

impl Node {
    pub fn kind(&self) -> &NodeKind { &self.kind }
    pub fn span(&self) -> &Span { &self.span }

    pub fn number(token: Token, value: NumberValue) -> Node {
        Node { span: token.span(), kind: NodeKind::Number { token, value } }
    }

    pub fn var_access(name: Token) -> Node {
        Node { span: name.span(), kind: NodeKind::VarAccess { name } }
    }

    pub fn var_assign(keyword: &Token, name: Token, value: Node) -> Node {
        Node {
            span: keyword.span().to(value.span()),
            kind: NodeKind::VarAssign { name, value: Box::new(value) },
        }
    }

    pub fn bin_op(left: Node, operator: BinaryOperator, operator_token: Token, right: Node) -> Node {
        Node {
            span: left.span().to(right.span()),
            kind: NodeKind::BinOp { left: Box::new(left), operator, operator_token, right: Box::new(right) },
        }
    }

    pub fn unary_op(operator: UnaryOperator, operator_token: Token, operand: Node) -> Node {
        Node {
            span: operator_token.span().to(operand.span()),
            kind: NodeKind::UnaryOp { operator, operator_token, operand: Box::new(operand) },
        }
    }

    /// `cases` holds at least the `if` case; the parser never builds an empty one.
    pub fn if_expr(keyword: &Token, cases: Vec<(Node, Node)>, else_case: Option<Node>) -> Node {
        let last = else_case.as_ref().or_else(|| cases.last().map(|(_, expr)| expr));
        let span = match last {
            Some(last) => keyword.span().to(last.span()),
            None => keyword.span(),
        };

        Node { span, kind: NodeKind::If { cases, else_case: else_case.map(Box::new) } }
    }

    pub fn for_expr(keyword: &Token, var_name: Token, start: Node, end: Node, step: Option<Node>, body: Node) -> Node {
        Node {
            span: keyword.span().to(body.span()),
            kind: NodeKind::For {
                var_name,
                start: Box::new(start), end: Box::new(end),
                step: step.map(Box::new),
                body: Box::new(body),
            },
        }
    }

    pub fn while_expr(keyword: &Token, condition: Node, body: Node) -> Node {
        Node {
            span: keyword.span().to(body.span()),
            kind: NodeKind::While { condition: Box::new(condition), body: Box::new(body) },
        }
    }

    pub fn func_def(keyword: &Token, name: Option<Token>, params: Vec<Token>, body: Node) -> Node {
        Node {
            span: keyword.span().to(body.span()),
            kind: NodeKind::FuncDef { name, params, body: Box::new(body) },
        }
    }

    /// Spans up to and including the closing parenthesis.
    pub fn call(callee: Node, args: Vec<Node>, closing: &Token) -> Node {
        Node {
            span: callee.span().to(&closing.span()),
            kind: NodeKind::Call { callee: Box::new(callee), args },
        }
    }
}

fn join(nodes: impl IntoIterator<Item = impl ToString>) -> String {
    nodes.into_iter().map(|node| node.to_string()).collect::<Vec<String>>().join(", ")
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            NodeKind::Number { token, .. } => f.write_str(token.source()),
            NodeKind::VarAccess { name } => f.write_str(name.source()),
            NodeKind::VarAssign { name, value } => write!(f, "(var {} = {})", name.source(), value),
            NodeKind::BinOp { left, operator, right, .. } => write!(f, "({} {} {})", left, operator, right),
            NodeKind::UnaryOp { operator, operand, .. } => write!(f, "({} {})", operator, operand),
            NodeKind::If { cases, else_case } => {
                let cases = cases.iter().enumerate()
                    .map(|(index, (condition, expr))| format!("{} {} then {}",
                        if index == 0 { "if" } else { "elif" }, condition, expr))
                    .collect::<Vec<String>>().join(" ");

                match else_case {
                    Some(else_case) => write!(f, "({} else {})", cases, else_case),
                    None => write!(f, "({})", cases),
                }
            },
            NodeKind::For { var_name, start, end, step, body } => {
                write!(f, "(for {} = {} to {}", var_name.source(), start, end)?;

                if let Some(step) = step {
                    write!(f, " step {}", step)?;
                }

                write!(f, " then {})", body)
            },
            NodeKind::While { condition, body } => write!(f, "(while {} then {})", condition, body),
            NodeKind::FuncDef { name, params, body } => write!(f, "(def {}({}) -> {})",
                name.as_ref().map(|name| name.source()).unwrap_or(""),
                join(params.iter().map(|param| param.source())), body),
            NodeKind::Call { callee, args } => write!(f, "{}({})", callee, join(args)),
        }
    }
}
