//! Expression lowering. Every expression leaves exactly one boxed value on
//! the operand stack (nothing for void calls). Int and bool values are only
//! unboxed right before the instruction that consumes them.

use crate::{
    backend::{
        context::{GenerationContext, RECEIVER_SLOT},
        jasmin::{self, Opcode},
    },
    error::{CodegenError, Result, SymbolKind},
    frontend::{
        ast::{
            BinaryOperatorClass, BinaryOperatorKind, Expression, FunctionCall, ListAppend,
            ListSize, Literal, UnaryOperatorKind,
        },
        intern::InternedSymbol,
    },
    middle::{
        symbols::ScopeKind,
        ty::{FPTR_CLASS, LIST_CLASS, Type},
    },
};

impl GenerationContext<'_> {
    pub fn lower_expression(&mut self, expression: &Expression) -> Result<()> {
        match expression {
            Expression::Literal(literal) => self.lower_literal(*literal),
            Expression::Identifier(name) => self.lower_identifier(*name),
            Expression::Grouping(inner) => self.lower_expression(inner),
            Expression::Binary { lhs, operator, rhs } => self.lower_binary(lhs, *operator, rhs),
            Expression::Unary { operator, operand } => self.lower_unary(*operator, operand),
            Expression::ListAccess { list, index } => {
                let element_type = self.type_of(expression)?;
                let element_class = element_type.class_name().ok_or_else(|| {
                    CodegenError::unsupported("indexing into a list of void")
                })?;

                self.lower_expression(list)?;
                self.lower_expression(index)?;
                self.unbox(&Type::Int)?;
                self.instruction_with(Opcode::Invokevirtual, jasmin::LIST_GET_ELEMENT)?;
                self.instruction_with(Opcode::Checkcast, element_class)
            }
            Expression::ListAppend(append) => self.lower_list_append(append),
            Expression::ListSize(size) => self.lower_list_size(size),
            Expression::FunctionCall(call) => self.lower_function_call(call),
            Expression::FieldAccess { field, .. } => Err(CodegenError::unsupported(format!(
                "access to struct field `{field}`"
            ))),
        }
    }

    fn lower_literal(&mut self, literal: Literal) -> Result<()> {
        match literal {
            Literal::Integer(value) => {
                self.instruction_with(Opcode::Ldc, value)?;
                self.rebox(&Type::Int)
            }
            Literal::Boolean(value) => {
                self.instruction(if value { Opcode::Iconst1 } else { Opcode::Iconst0 })?;
                self.rebox(&Type::Bool)
            }
        }
    }

    /// Function names become function pointers bound to the current
    /// receiver, anything else is loaded from its slot
    fn lower_identifier(&mut self, name: InternedSymbol) -> Result<()> {
        if self.lookup_function(name).is_some() {
            // struct constructors have a struct, not `Main`, as their receiver
            if self.symbols.scope(self.active_scope()).kind == ScopeKind::Struct {
                return Err(CodegenError::unsupported(format!(
                    "function pointer to `{name}` inside a struct"
                )));
            }

            self.instruction_with(Opcode::New, FPTR_CLASS)?;
            self.instruction(Opcode::Dup)?;
            self.instruction_with(Opcode::Aload, RECEIVER_SLOT)?;
            self.instruction_with(Opcode::Ldc, format!("\"{name}\""))?;
            return self.instruction_with(Opcode::Invokespecial, jasmin::FPTR_INIT);
        }

        let slot = self.slot_of(name)?;
        self.instruction_with(Opcode::Aload, slot)
    }

    fn lower_binary(
        &mut self,
        lhs: &Expression,
        operator: BinaryOperatorKind,
        rhs: &Expression,
    ) -> Result<()> {
        match operator.class() {
            BinaryOperatorClass::Arithmetic => {
                self.lower_unboxed(lhs, &Type::Int)?;
                self.lower_unboxed(rhs, &Type::Int)?;
                self.instruction(match operator {
                    BinaryOperatorKind::Add => Opcode::Iadd,
                    BinaryOperatorKind::Subtract => Opcode::Isub,
                    BinaryOperatorKind::Multiply => Opcode::Imul,
                    BinaryOperatorKind::Divide => Opcode::Idiv,
                    _ => unreachable!("{operator:?} is not arithmetic"),
                })?;
                self.rebox(&Type::Int)
            }
            BinaryOperatorClass::Relational => {
                self.lower_unboxed(lhs, &Type::Int)?;
                self.lower_unboxed(rhs, &Type::Int)?;

                // branch away when the comparison does not hold
                let negated = match operator {
                    BinaryOperatorKind::LessThan => Opcode::IfIcmpge,
                    BinaryOperatorKind::GreaterThan => Opcode::IfIcmple,
                    _ => unreachable!("{operator:?} is not relational"),
                };
                self.materialize_condition(negated)
            }
            BinaryOperatorClass::Logical => self.lower_short_circuit(lhs, operator, rhs),
            BinaryOperatorClass::Equality => {
                let operand_type = self.type_of(lhs)?;

                let negated = match &operand_type {
                    ty if ty.is_boxed_primitive() => {
                        self.lower_unboxed(lhs, &operand_type)?;
                        self.lower_unboxed(rhs, &operand_type)?;
                        Opcode::IfIcmpne
                    }
                    Type::List(_) | Type::FunctionPointer { .. } => {
                        self.lower_expression(lhs)?;
                        self.lower_expression(rhs)?;
                        Opcode::IfAcmpne
                    }
                    _ => {
                        return Err(CodegenError::unsupported(format!(
                            "equality between values of type `{operand_type}`"
                        )));
                    }
                };
                self.materialize_condition(negated)
            }
        }
    }

    /// `a & b` only evaluates `b` when `a` is true, `a | b` only when `a` is
    /// false. The skipped path yields the short circuit constant.
    fn lower_short_circuit(
        &mut self,
        lhs: &Expression,
        operator: BinaryOperatorKind,
        rhs: &Expression,
    ) -> Result<()> {
        let (skip_branch, short_circuit_value) = match operator {
            BinaryOperatorKind::LogicalAnd => (Opcode::Ifeq, Opcode::Iconst0),
            BinaryOperatorKind::LogicalOr => (Opcode::Ifne, Opcode::Iconst1),
            _ => unreachable!("{operator:?} is not logical"),
        };

        let else_label = self.fresh_label();
        let after_label = self.fresh_label();

        self.lower_unboxed(lhs, &Type::Bool)?;
        self.instruction_with(skip_branch, else_label)?;
        self.lower_unboxed(rhs, &Type::Bool)?;
        self.instruction_with(Opcode::Goto, after_label)?;
        self.label(else_label)?;
        self.instruction(short_circuit_value)?;
        self.label(after_label)?;
        self.rebox(&Type::Bool)
    }

    /// Turns a pending two operand comparison into a boxed bool. `negated`
    /// must jump when the comparison is false.
    fn materialize_condition(&mut self, negated: Opcode) -> Result<()> {
        let else_label = self.fresh_label();
        let after_label = self.fresh_label();

        self.instruction_with(negated, else_label)?;
        self.instruction(Opcode::Iconst1)?;
        self.instruction_with(Opcode::Goto, after_label)?;
        self.label(else_label)?;
        self.instruction(Opcode::Iconst0)?;
        self.label(after_label)?;
        self.rebox(&Type::Bool)
    }

    fn lower_unary(&mut self, operator: UnaryOperatorKind, operand: &Expression) -> Result<()> {
        match operator {
            UnaryOperatorKind::LogicalNot => {
                self.lower_unboxed(operand, &Type::Bool)?;
                self.instruction(Opcode::Iconst1)?;
                self.instruction(Opcode::Ixor)?;
                self.rebox(&Type::Bool)
            }
            UnaryOperatorKind::Negate => {
                self.lower_unboxed(operand, &Type::Int)?;
                self.instruction(Opcode::Ineg)?;
                self.rebox(&Type::Int)
            }
        }
    }

    /// Leaves the list reference on the stack, statement position pops it
    pub(super) fn lower_list_append(&mut self, append: &ListAppend) -> Result<()> {
        self.lower_expression(&append.list)?;
        self.instruction(Opcode::Dup)?;
        self.lower_expression(&append.element)?;
        self.instruction_with(Opcode::Invokevirtual, jasmin::LIST_ADD_ELEMENT)
    }

    pub(super) fn lower_list_size(&mut self, size: &ListSize) -> Result<()> {
        self.lower_expression(&size.list)?;
        self.instruction_with(Opcode::Invokevirtual, jasmin::LIST_GET_SIZE)?;
        self.rebox(&Type::Int)
    }

    /// Calls go through `Fptr/invoke` with the arguments packed into an
    /// `ArrayList`. Lists are copied before being passed so the callee can
    /// not mutate the caller's list. Void calls leave nothing on the stack.
    pub(super) fn lower_function_call(&mut self, call: &FunctionCall) -> Result<()> {
        let return_type = match self.type_of(&call.target)? {
            Type::FunctionPointer { return_type, .. } => return_type,
            other => {
                return Err(CodegenError::unsupported(format!(
                    "calling a value of type `{other}`"
                )));
            }
        };

        self.lower_expression(&call.target)?;

        self.instruction_with(Opcode::New, jasmin::ARRAY_LIST_CLASS)?;
        self.instruction(Opcode::Dup)?;
        self.instruction_with(Opcode::Invokespecial, jasmin::ARRAY_LIST_INIT)?;

        for argument in &call.arguments {
            self.instruction(Opcode::Dup)?;

            if let Type::List(_) = self.type_of(argument)? {
                self.instruction_with(Opcode::New, LIST_CLASS)?;
                self.instruction(Opcode::Dup)?;
                self.lower_expression(argument)?;
                self.instruction_with(Opcode::Invokespecial, jasmin::LIST_COPY_INIT)?;
            } else {
                self.lower_expression(argument)?;
            }

            self.instruction_with(Opcode::Invokevirtual, jasmin::ARRAY_LIST_ADD)?;
            self.instruction(Opcode::Pop)?;
        }

        self.instruction_with(Opcode::Invokevirtual, jasmin::FPTR_INVOKE)?;

        match return_type.class_name() {
            Some(class_name) => self.instruction_with(Opcode::Checkcast, class_name),
            None => self.instruction(Opcode::Pop),
        }
    }

    /// Lowers `expression` and unboxes it to the primitive of `ty`
    pub(super) fn lower_unboxed(&mut self, expression: &Expression, ty: &Type) -> Result<()> {
        self.lower_expression(expression)?;
        self.unbox(ty)
    }

    pub(super) fn unbox(&mut self, ty: &Type) -> Result<()> {
        match ty {
            Type::Int => self.instruction_with(Opcode::Invokevirtual, jasmin::INTEGER_INT_VALUE),
            Type::Bool => {
                self.instruction_with(Opcode::Invokevirtual, jasmin::BOOLEAN_BOOLEAN_VALUE)
            }
            other => Err(CodegenError::unsupported(format!(
                "unboxing a value of type `{other}`"
            ))),
        }
    }

    pub(super) fn rebox(&mut self, ty: &Type) -> Result<()> {
        match ty {
            Type::Int => self.instruction_with(Opcode::Invokestatic, jasmin::INTEGER_VALUE_OF),
            Type::Bool => self.instruction_with(Opcode::Invokestatic, jasmin::BOOLEAN_VALUE_OF),
            other => Err(CodegenError::unsupported(format!(
                "boxing a value of type `{other}`"
            ))),
        }
    }

    /// Pushes the value an uninitialized variable of type `ty` starts with
    pub(super) fn lower_zero_value(&mut self, ty: &Type) -> Result<()> {
        match ty {
            Type::Int | Type::Bool => {
                self.instruction(Opcode::Iconst0)?;
                self.rebox(ty)
            }
            Type::List(_) => {
                self.instruction_with(Opcode::New, LIST_CLASS)?;
                self.instruction(Opcode::Dup)?;
                self.instruction_with(Opcode::Invokespecial, jasmin::LIST_INIT)
            }
            Type::Struct(name) => {
                let name = self
                    .symbols
                    .lookup_struct(self.active_scope(), *name)
                    .map(|layout| layout.name)
                    .ok_or_else(|| CodegenError::unresolved(SymbolKind::Struct, name))?;

                self.instruction_with(Opcode::New, name)?;
                self.instruction(Opcode::Dup)?;
                self.instruction_with(Opcode::Invokespecial, format!("{name}/<init>()V"))
            }
            Type::FunctionPointer { .. } => self.instruction(Opcode::AconstNull),
            Type::Void => Err(CodegenError::unsupported("a variable of type `void`")),
        }
    }
}
