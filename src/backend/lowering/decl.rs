use colored::Colorize;

use crate::{
    backend::{
        context::{GenerationContext, RECEIVER_SLOT, UnitKind},
        jasmin::{self, Opcode},
    },
    error::{CodegenError, Result, SymbolKind},
    frontend::{
        ast::{FunctionDefinition, MainDefinition, Program, StructDefinition},
        intern::InternedSymbol,
    },
    middle::{
        symbols::{MAIN_SCOPE_NAME, ScopeKind},
        ty::{FPTR_CLASS, LIST_CLASS, Type, method_descriptor},
    },
};

impl GenerationContext<'_> {
    /// Emits one unit per struct followed by the entry unit holding `main`
    /// and every top level function
    pub fn lower_program(&mut self, program: &Program) -> Result<()> {
        for definition in &program.structs {
            self.lower_struct(definition)?;
        }

        self.lower_entry_unit(&program.main, &program.functions)
    }

    pub fn lower_struct(&mut self, definition: &StructDefinition) -> Result<()> {
        let name = definition.name;
        self.log_declaration("struct", name);

        // the unit would overwrite (or be overwritten by) a class of the same name
        if [jasmin::ENTRY_CLASS, LIST_CLASS, FPTR_CLASS].contains(&name.value()) {
            return Err(CodegenError::unsupported(format!(
                "struct `{name}` shares its name with a generated class"
            )));
        }

        self.enter_scope(ScopeKind::Struct, name)?;
        self.open_unit(UnitKind::Struct, name.value())?;

        self.emit_class_header(name.value())?;
        for field in &definition.fields {
            self.emit(format!(".field public {} {}", field.name, field.ty.descriptor()))?;
        }

        self.begin_method([]);
        self.emit_method_header("public <init>()V")?;
        self.emit_super_constructor_call()?;

        for field in &definition.fields {
            self.instruction_with(Opcode::Aload, RECEIVER_SLOT)?;
            match (&field.initializer, &field.ty) {
                (Some(initializer), _) => self.lower_expression(initializer)?,
                // eagerly constructing nested structs could recurse forever
                (None, Type::Struct(_)) => self.instruction(Opcode::AconstNull)?,
                (None, ty) => self.lower_zero_value(ty)?,
            }
            self.instruction_with(
                Opcode::Putfield,
                format!("{name}/{} {}", field.name, field.ty.descriptor()),
            )?;
        }

        self.instruction(Opcode::Return)?;
        self.emit(".end method")?;

        self.close_unit()?;
        self.leave_scope()
    }

    /// The entry unit is the `Main` class. Its static `main` only constructs
    /// an instance, the constructor then runs the program body so every
    /// method, including the body, has a receiver in slot 0 for function
    /// pointers to capture.
    pub fn lower_entry_unit(
        &mut self,
        main: &MainDefinition,
        functions: &[FunctionDefinition],
    ) -> Result<()> {
        let entry_class = jasmin::ENTRY_CLASS;
        self.log_declaration("entry point", InternedSymbol::new(entry_class));

        self.open_unit(UnitKind::Entry, entry_class)?;
        self.emit_class_header(entry_class)?;

        self.emit_method_header("public static main([Ljava/lang/String;)V")?;
        self.emit(indoc::formatdoc! {"
            new {entry_class}
            dup
            invokespecial {entry_class}/<init>()V
            return
            .end method
        ", entry_class = entry_class})?;

        self.enter_scope(ScopeKind::Main, InternedSymbol::new(MAIN_SCOPE_NAME))?;
        self.begin_method([]);
        self.emit_method_header("public <init>()V")?;
        self.emit_super_constructor_call()?;
        self.lower_block(&main.body)?;
        self.instruction(Opcode::Return)?;
        self.emit(".end method")?;
        self.leave_scope()?;

        for function in functions {
            self.lower_function(function)?;
        }

        self.close_unit()
    }

    /// Emits `function` as a public instance method of the open unit
    pub fn lower_function(&mut self, function: &FunctionDefinition) -> Result<()> {
        let name = function.name;
        self.log_declaration("function", name);

        self.enter_scope(ScopeKind::Function, name)?;

        let signature = self
            .lookup_function(name)
            .ok_or_else(|| CodegenError::unresolved(SymbolKind::Function, name))?;
        let descriptor = method_descriptor(signature.parameter_types(), &signature.return_type);

        self.begin_method(signature.parameters.iter().map(|p| p.name));
        self.emit_method_header(&format!("public {name}{descriptor}"))?;

        self.lower_block(&function.body)?;
        if signature.return_type.is_void() {
            self.instruction(Opcode::Return)?;
        }
        self.emit(".end method")?;

        self.leave_scope()
    }

    fn emit_class_header(&mut self, class_name: &str) -> Result<()> {
        self.emit(indoc::formatdoc! {"
            .class public {class_name}
            .super {object}
        ", class_name = class_name, object = jasmin::OBJECT_CLASS})
    }

    fn emit_method_header(&mut self, signature: &str) -> Result<()> {
        self.emit(indoc::formatdoc! {"

            .method {signature}
            .limit stack {stack}
            .limit locals {locals}
        ", signature = signature, stack = jasmin::STACK_LIMIT, locals = jasmin::LOCALS_LIMIT})
    }

    fn emit_super_constructor_call(&mut self) -> Result<()> {
        self.instruction_with(Opcode::Aload, RECEIVER_SLOT)?;
        self.instruction_with(Opcode::Invokespecial, jasmin::OBJECT_INIT)
    }

    fn log_declaration(&self, kind: &str, name: InternedSymbol) {
        if self.options.verbose {
            eprintln!("{} {kind} {}", "Lowering".green().bold(), name.value().blue());
        }
    }
}
