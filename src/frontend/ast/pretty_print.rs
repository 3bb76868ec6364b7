//! Single line, syntax highlighted renderings of statements and expressions.
//! Compound statements only render their header since the output is used for
//! log lines and assembly comments.

use colored::Colorize;
use itertools::Itertools;

use super::{
    BinaryOperatorKind, Expression, FunctionCall, ListAppend, ListSize, Literal, Statement,
    UnaryOperatorKind,
};

impl core::fmt::Display for BinaryOperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Subtract => write!(f, "-"),
            Self::Multiply => write!(f, "*"),
            Self::Divide => write!(f, "/"),
            Self::Equals => write!(f, "=="),
            Self::LessThan => write!(f, "<"),
            Self::GreaterThan => write!(f, ">"),
            Self::LogicalAnd => write!(f, "&"),
            Self::LogicalOr => write!(f, "|"),
        }
    }
}

impl core::fmt::Display for UnaryOperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LogicalNot => write!(f, "~"),
            Self::Negate => write!(f, "-"),
        }
    }
}

impl core::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Integer(value) => write!(f, "{}", format!("{value}").purple()),
            Literal::Boolean(value) => write!(f, "{}", format!("{value}").purple()),
        }
    }
}

impl core::fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({})",
            self.target,
            self.arguments.iter().map(|a| a.to_string()).join(", ")
        )
    }
}

impl core::fmt::Display for ListAppend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}, {})", "append".cyan(), self.list, self.element)
    }
}

impl core::fmt::Display for ListSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", "size".cyan(), self.list)
    }
}

impl core::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Literal(literal) => write!(f, "{literal}"),
            Expression::Identifier(name) => write!(f, "{}", name.value().blue()),
            Expression::Grouping(inner) => write!(f, "({inner})"),
            Expression::Binary { lhs, operator, rhs } => write!(f, "{lhs} {operator} {rhs}"),
            Expression::Unary { operator, operand } => write!(f, "{operator}{operand}"),
            Expression::ListAccess { list, index } => write!(f, "{list}[{index}]"),
            Expression::ListAppend(append) => write!(f, "{append}"),
            Expression::ListSize(size) => write!(f, "{size}"),
            Expression::FunctionCall(call) => write!(f, "{call}"),
            Expression::FieldAccess { instance, field } => {
                write!(f, "{instance}.{}", field.value().blue())
            }
        }
    }
}

impl core::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Statement::Block(block) => {
                write!(f, "{{ {} statements }}", block.statements.len())
            }
            Statement::Local(local) => {
                write!(
                    f,
                    "{} {}",
                    local.ty.colored(),
                    local.name.value().blue()
                )?;
                if let Some(initializer) = &local.initializer {
                    write!(f, " = {initializer}")?;
                }
                Ok(())
            }
            Statement::Assignment { target, value } => write!(f, "{target} = {value}"),
            Statement::If { condition, .. } => write!(f, "{} ({condition})", "if".magenta()),
            Statement::Loop { count, .. } => {
                write!(f, "{} {count} {}", "loop".magenta(), "times".magenta())
            }
            Statement::FunctionCall(call) => write!(f, "{call}"),
            Statement::Return(Some(value)) => write!(f, "{} {value}", "return".magenta()),
            Statement::Return(None) => write!(f, "{}", "return".magenta()),
            Statement::Display(value) => write!(f, "{}({value})", "display".cyan()),
            Statement::ListAppend(append) => write!(f, "{append}"),
            Statement::ListSize(size) => write!(f, "{size}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        frontend::ast::{BinaryOperatorKind, Expression, Statement},
        middle::ty::Type,
    };

    fn plain(value: impl ToString) -> String {
        strip_ansi_escapes::strip_str(value.to_string())
    }

    #[test]
    fn renders_nested_expressions() {
        let expression = Expression::binary(
            Expression::grouping(Expression::binary(
                Expression::identifier("a"),
                BinaryOperatorKind::Add,
                Expression::int(1),
            )),
            BinaryOperatorKind::LessThan,
            Expression::list_size(Expression::identifier("xs")),
        );

        assert_eq!(plain(expression), "(a + 1) < size(xs)");
    }

    #[test]
    fn renders_statement_headers() {
        let local = Statement::local("flag", Type::Bool, Some(Expression::bool(true)));
        let call = Statement::FunctionCall(crate::frontend::ast::FunctionCall::new(
            Expression::identifier("f"),
            [Expression::int(2), Expression::identifier("y")],
        ));

        assert_eq!(plain(local), "bool flag = true");
        assert_eq!(plain(call), "f(2, y)");
    }
}
