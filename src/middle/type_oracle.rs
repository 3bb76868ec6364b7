//! Static typing of already validated expressions. The backend never checks
//! types itself, it only asks which representation an expression produces.

use crate::{
    error::{CodegenError, Result, SymbolKind},
    frontend::ast::{BinaryOperatorClass, Expression, Literal, UnaryOperatorKind},
    middle::{
        symbols::{ScopeId, SymbolTable},
        ty::Type,
    },
};

/// Answers "what is the static type of this expression" for the backend
pub trait TypeOracle {
    fn type_of(&self, scope: ScopeId, expression: &Expression) -> Result<Type>;
}

/// Recomputes expression types from the symbol table. Identifiers naming a
/// function win over variables of the same name, matching how the backend
/// lowers them.
pub struct ExpressionTypeChecker<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> ExpressionTypeChecker<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }
}

impl TypeOracle for ExpressionTypeChecker<'_> {
    fn type_of(&self, scope: ScopeId, expression: &Expression) -> Result<Type> {
        match expression {
            Expression::Literal(Literal::Integer(_)) => Ok(Type::Int),
            Expression::Literal(Literal::Boolean(_)) => Ok(Type::Bool),
            Expression::Identifier(name) => {
                if let Some(signature) = self.symbols.lookup_function(scope, *name) {
                    return Ok(signature.pointer_type());
                }

                self.symbols
                    .lookup_variable(scope, *name)
                    .cloned()
                    .ok_or_else(|| CodegenError::unresolved(SymbolKind::Variable, name))
            }
            Expression::Grouping(inner) => self.type_of(scope, inner),
            Expression::Binary { operator, .. } => match operator.class() {
                BinaryOperatorClass::Arithmetic => Ok(Type::Int),
                BinaryOperatorClass::Relational
                | BinaryOperatorClass::Logical
                | BinaryOperatorClass::Equality => Ok(Type::Bool),
            },
            Expression::Unary { operator, .. } => match operator {
                UnaryOperatorKind::LogicalNot => Ok(Type::Bool),
                UnaryOperatorKind::Negate => Ok(Type::Int),
            },
            Expression::ListAccess { list, .. } => match self.type_of(scope, list)? {
                Type::List(element) => Ok((*element).clone()),
                other => Err(CodegenError::unsupported(format!(
                    "indexing into a value of type `{other}`"
                ))),
            },
            Expression::ListAppend(_) => Ok(Type::Void),
            Expression::ListSize(_) => Ok(Type::Int),
            Expression::FunctionCall(call) => match self.type_of(scope, &call.target)? {
                Type::FunctionPointer { return_type, .. } => Ok((*return_type).clone()),
                other => Err(CodegenError::unsupported(format!(
                    "calling a value of type `{other}`"
                ))),
            },
            Expression::FieldAccess { .. } => {
                Err(CodegenError::unsupported("struct field access"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        frontend::{
            ast::{BinaryOperatorKind, Expression},
            intern::InternedSymbol,
        },
        middle::symbols::Binding,
    };

    fn table() -> (SymbolTable, ScopeId) {
        let mut table = SymbolTable::new();
        table.declare_function(
            InternedSymbol::new("is_even"),
            vec![Binding {
                name: InternedSymbol::new("n"),
                ty: Type::Int,
            }],
            Type::Bool,
        );
        let main = table.declare_main();
        table.declare_variable(
            main,
            InternedSymbol::new("numbers"),
            Type::list_of(Type::Int),
        );

        (table, main)
    }

    #[test]
    fn operators_have_fixed_result_types() {
        let (table, main) = table();
        let oracle = ExpressionTypeChecker::new(&table);

        let sum = Expression::binary(Expression::int(1), BinaryOperatorKind::Add, Expression::int(2));
        let less = Expression::binary(
            Expression::int(1),
            BinaryOperatorKind::LessThan,
            Expression::int(2),
        );

        assert_eq!(oracle.type_of(main, &sum).unwrap(), Type::Int);
        assert_eq!(oracle.type_of(main, &less).unwrap(), Type::Bool);
    }

    #[test]
    fn list_and_call_types_flow_through() {
        let (table, main) = table();
        let oracle = ExpressionTypeChecker::new(&table);

        let element = Expression::list_access(Expression::identifier("numbers"), Expression::int(0));
        let call = Expression::call(Expression::identifier("is_even"), [element.clone()]);

        assert_eq!(oracle.type_of(main, &element).unwrap(), Type::Int);
        assert_eq!(oracle.type_of(main, &call).unwrap(), Type::Bool);
        assert_eq!(
            oracle
                .type_of(main, &Expression::identifier("is_even"))
                .unwrap(),
            Type::function_pointer([Type::Int], Type::Bool)
        );
    }

    #[test]
    fn unknown_identifiers_are_unresolved() {
        let (table, main) = table();
        let oracle = ExpressionTypeChecker::new(&table);

        let error = oracle
            .type_of(main, &Expression::identifier("missing"))
            .unwrap_err();

        assert!(matches!(error, CodegenError::UnresolvedSymbol { .. }));
    }
}
