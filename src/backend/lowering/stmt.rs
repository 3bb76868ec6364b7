use crate::{
    backend::{
        context::GenerationContext,
        jasmin::{self, Opcode},
    },
    error::{CodegenError, Result},
    frontend::ast::{Block, Expression, Local, Statement},
    middle::ty::Type,
};

impl GenerationContext<'_> {
    pub fn lower_block(&mut self, block: &Block) -> Result<()> {
        for statement in &block.statements {
            self.lower_statement(statement)?;
        }

        Ok(())
    }

    pub fn lower_statement(&mut self, statement: &Statement) -> Result<()> {
        if self.options.emit_debug_info && !matches!(statement, Statement::Block(_)) {
            self.comment(strip_ansi_escapes::strip_str(statement.to_string()))?;
        }

        match statement {
            Statement::Block(block) => self.lower_block(block),
            Statement::Local(local) => self.lower_local(local),
            Statement::Assignment { target, value } => {
                let Expression::Identifier(name) = target else {
                    return Err(CodegenError::unsupported(format!(
                        "assignment to `{}`",
                        strip_ansi_escapes::strip_str(target.to_string())
                    )));
                };

                self.lower_expression(value)?;
                let slot = self.slot_of(*name)?;
                self.instruction_with(Opcode::Astore, slot)
            }
            Statement::If {
                condition,
                positive,
                negative,
            } => {
                let else_label = self.fresh_label();
                let after_label = self.fresh_label();

                self.lower_unboxed(condition, &Type::Bool)?;
                self.instruction_with(Opcode::Ifeq, else_label)?;
                self.lower_statement(positive)?;
                self.instruction_with(Opcode::Goto, after_label)?;

                // labels always get an instruction so empty branches stay valid
                self.label(else_label)?;
                self.instruction(Opcode::Nop)?;
                if let Some(negative) = negative {
                    self.lower_statement(negative)?;
                }
                self.label(after_label)?;
                self.instruction(Opcode::Nop)
            }
            Statement::Loop { count, body } => {
                let counter = self.fresh_slot();
                let begin_label = self.fresh_label();
                let check_label = self.fresh_label();

                self.lower_unboxed(count, &Type::Int)?;
                self.instruction_with(Opcode::Istore, counter)?;
                self.instruction_with(Opcode::Goto, check_label)?;
                self.label(begin_label)?;
                self.lower_statement(body)?;
                self.instruction_with(Opcode::Iinc, format!("{counter} -1"))?;
                self.label(check_label)?;
                self.instruction_with(Opcode::Iload, counter)?;
                self.instruction_with(Opcode::Ifgt, begin_label)
            }
            Statement::FunctionCall(call) => {
                let produces_value = match self.type_of(&call.target)? {
                    Type::FunctionPointer { return_type, .. } => !return_type.is_void(),
                    _ => false,
                };

                self.lower_function_call(call)?;
                if produces_value {
                    self.instruction(Opcode::Pop)?;
                }

                Ok(())
            }
            Statement::Return(None) => self.instruction(Opcode::Return),
            Statement::Return(Some(value)) => {
                let ty = self.type_of(value)?;
                self.lower_expression(value)?;

                if ty.is_void() {
                    self.instruction(Opcode::Return)
                } else {
                    self.instruction(Opcode::Areturn)
                }
            }
            Statement::Display(value) => self.lower_display(value),
            Statement::ListAppend(append) => {
                self.lower_list_append(append)?;
                self.instruction(Opcode::Pop)
            }
            Statement::ListSize(size) => {
                self.lower_list_size(size)?;
                self.instruction(Opcode::Pop)
            }
        }
    }

    fn lower_local(&mut self, local: &Local) -> Result<()> {
        match &local.initializer {
            Some(initializer) => self.lower_expression(initializer)?,
            None => self.lower_zero_value(&local.ty)?,
        }

        let slot = self.slot_of(local.name)?;
        self.instruction_with(Opcode::Astore, slot)
    }

    fn lower_display(&mut self, value: &Expression) -> Result<()> {
        let ty = self.type_of(value)?;
        let println = match &ty {
            Type::Int => jasmin::PRINTLN_INT,
            Type::Bool => jasmin::PRINTLN_BOOL,
            other => {
                return Err(CodegenError::unsupported(format!(
                    "display of a value of type `{other}`"
                )));
            }
        };

        self.instruction_with(Opcode::Getstatic, jasmin::SYSTEM_OUT)?;
        self.lower_unboxed(value, &ty)?;
        self.instruction_with(Opcode::Invokevirtual, println)
    }
}
