//! The type checked Cmm syntax tree consumed by the backend. Every node kind
//! is a closed enum so lowering can match exhaustively.

use super::intern::InternedSymbol;
use crate::middle::ty::Type;

pub mod pretty_print;

#[derive(Debug, Clone)]
pub struct Program {
    pub structs: Vec<StructDefinition>,
    pub main: MainDefinition,
    /// Top level functions in declaration order
    pub functions: Vec<FunctionDefinition>,
}

#[derive(Debug, Clone)]
pub struct StructDefinition {
    pub name: InternedSymbol,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub name: InternedSymbol,
    pub ty: Type,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone)]
pub struct FunctionDefinition {
    pub name: InternedSymbol,
    pub parameters: Vec<FunctionParameter>,
    pub return_type: Type,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct FunctionParameter {
    pub name: InternedSymbol,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct MainDefinition {
    pub body: Block,
}

#[derive(Debug, Clone, Default)]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: impl IntoIterator<Item = Statement>) -> Self {
        Self {
            statements: statements.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Statement {
    Block(Block),
    /// Variable declaration with an optional initializer
    Local(Box<Local>),
    Assignment {
        target: Expression,
        value: Expression,
    },
    If {
        condition: Expression,
        positive: Box<Statement>,
        negative: Option<Box<Statement>>,
    },
    /// Runs `body` exactly `count` times (zero times if `count <= 0`)
    Loop {
        count: Expression,
        body: Box<Statement>,
    },
    FunctionCall(FunctionCall),
    Return(Option<Expression>),
    Display(Expression),
    ListAppend(ListAppend),
    ListSize(ListSize),
}

#[derive(Debug, Clone)]
pub struct Local {
    pub name: InternedSymbol,
    pub ty: Type,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone)]
pub enum Expression {
    Literal(Literal),
    Identifier(InternedSymbol),
    Grouping(Box<Expression>),
    Binary {
        lhs: Box<Expression>,
        operator: BinaryOperatorKind,
        rhs: Box<Expression>,
    },
    Unary {
        operator: UnaryOperatorKind,
        operand: Box<Expression>,
    },
    ListAccess {
        list: Box<Expression>,
        index: Box<Expression>,
    },
    ListAppend(ListAppend),
    ListSize(ListSize),
    FunctionCall(FunctionCall),
    FieldAccess {
        instance: Box<Expression>,
        field: InternedSymbol,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Integer(i32),
    Boolean(bool),
}

#[derive(Debug, Clone)]
pub struct FunctionCall {
    /// Anything evaluating to a function pointer
    pub target: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone)]
pub struct ListAppend {
    pub list: Box<Expression>,
    pub element: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct ListSize {
    pub list: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperatorKind {
    Add,         // +
    Subtract,    // -
    Multiply,    // *
    Divide,      // /
    Equals,      // ==
    LessThan,    // <
    GreaterThan, // >
    LogicalAnd,  // &
    LogicalOr,   // |
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperatorClass {
    Arithmetic,
    Relational,
    Logical,
    Equality,
}

impl BinaryOperatorKind {
    pub fn class(self) -> BinaryOperatorClass {
        match self {
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide => {
                BinaryOperatorClass::Arithmetic
            }
            Self::LessThan | Self::GreaterThan => BinaryOperatorClass::Relational,
            Self::LogicalAnd | Self::LogicalOr => BinaryOperatorClass::Logical,
            Self::Equals => BinaryOperatorClass::Equality,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperatorKind {
    LogicalNot, // ~
    Negate,     // -
}

/* Shorthand constructors, mostly for building trees by hand in tests */

impl Expression {
    pub fn int(value: i32) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    pub fn bool(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    pub fn identifier(name: &str) -> Self {
        Self::Identifier(InternedSymbol::new(name))
    }

    pub fn grouping(inner: Expression) -> Self {
        Self::Grouping(Box::new(inner))
    }

    pub fn binary(lhs: Expression, operator: BinaryOperatorKind, rhs: Expression) -> Self {
        Self::Binary {
            lhs: Box::new(lhs),
            operator,
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(operator: UnaryOperatorKind, operand: Expression) -> Self {
        Self::Unary {
            operator,
            operand: Box::new(operand),
        }
    }

    pub fn list_access(list: Expression, index: Expression) -> Self {
        Self::ListAccess {
            list: Box::new(list),
            index: Box::new(index),
        }
    }

    pub fn list_size(list: Expression) -> Self {
        Self::ListSize(ListSize {
            list: Box::new(list),
        })
    }

    pub fn call(target: Expression, arguments: impl IntoIterator<Item = Expression>) -> Self {
        Self::FunctionCall(FunctionCall::new(target, arguments))
    }
}

impl FunctionCall {
    pub fn new(target: Expression, arguments: impl IntoIterator<Item = Expression>) -> Self {
        Self {
            target: Box::new(target),
            arguments: arguments.into_iter().collect(),
        }
    }
}

impl ListAppend {
    pub fn new(list: Expression, element: Expression) -> Self {
        Self {
            list: Box::new(list),
            element: Box::new(element),
        }
    }
}

impl Statement {
    pub fn local(name: &str, ty: Type, initializer: Option<Expression>) -> Self {
        Self::Local(Box::new(Local {
            name: InternedSymbol::new(name),
            ty,
            initializer,
        }))
    }

    pub fn assign(name: &str, value: Expression) -> Self {
        Self::Assignment {
            target: Expression::identifier(name),
            value,
        }
    }

    pub fn if_else(condition: Expression, positive: Statement, negative: Option<Statement>) -> Self {
        Self::If {
            condition,
            positive: Box::new(positive),
            negative: negative.map(Box::new),
        }
    }

    pub fn repeat(count: Expression, body: Statement) -> Self {
        Self::Loop {
            count,
            body: Box::new(body),
        }
    }

    pub fn list_append(list: Expression, element: Expression) -> Self {
        Self::ListAppend(ListAppend::new(list, element))
    }
}
