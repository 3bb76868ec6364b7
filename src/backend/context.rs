use colored::Colorize;
use hashbrown::HashMap;

use crate::{
    backend::{
        CodegenOptions,
        emitter::Emitter,
        jasmin::{LabelId, Opcode},
        output::OutputSink,
    },
    error::{CodegenError, Result, SymbolKind},
    frontend::{ast::Expression, intern::InternedSymbol},
    index::Index,
    middle::{
        symbols::{FunctionSignature, ScopeId, ScopeKind, SymbolTable},
        ty::Type,
        type_oracle::TypeOracle,
    },
};

/// Local variable slot of one method activation
pub type Slot = u16;

/// Slot 0 always holds the receiver
pub const RECEIVER_SLOT: Slot = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum UnitKind {
    Struct,
    Entry,
}

/// Maps names to local slots for one method. Parameters take slots `1..=N`
/// in order, locals are appended at first use and slots are never reused,
/// even across sibling blocks.
#[derive(Debug, Clone)]
pub struct SlotTable {
    slots: HashMap<InternedSymbol, Slot>,
    next_slot: Slot,
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::for_method([])
    }
}

impl SlotTable {
    pub fn for_method(parameters: impl IntoIterator<Item = InternedSymbol>) -> Self {
        let mut table = Self {
            slots: HashMap::new(),
            next_slot: RECEIVER_SLOT + 1,
        };

        for parameter in parameters {
            table.allocate(parameter);
        }

        table
    }

    pub fn get(&self, name: InternedSymbol) -> Option<Slot> {
        self.slots.get(&name).copied()
    }

    /// Returns the slot bound to `name`, binding the next free one first if
    /// needed
    pub fn allocate(&mut self, name: InternedSymbol) -> Slot {
        if let Some(slot) = self.get(name) {
            return slot;
        }

        let slot = self.allocate_anonymous();
        self.slots.insert(name, slot);
        slot
    }

    /// Reserves a slot that no name can refer to
    pub fn allocate_anonymous(&mut self) -> Slot {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }

    /// The slot the next allocation will return
    pub fn next_slot(&self) -> Slot {
        self.next_slot
    }
}

/// Mutable state threaded through every lowering call of one generation run
pub struct GenerationContext<'a> {
    pub symbols: &'a SymbolTable,
    pub options: &'a CodegenOptions,
    oracle: &'a dyn TypeOracle,
    sink: &'a mut dyn OutputSink,

    emitter: Emitter,
    /// Never empty, the root scope stays at the bottom
    scope_stack: Vec<ScopeId>,
    slots: SlotTable,
    next_label_id: LabelId,
}

impl<'a> GenerationContext<'a> {
    pub fn new(
        symbols: &'a SymbolTable,
        oracle: &'a dyn TypeOracle,
        sink: &'a mut dyn OutputSink,
        options: &'a CodegenOptions,
    ) -> Self {
        Self {
            symbols,
            options,
            oracle,
            sink,
            emitter: Emitter::new(),
            scope_stack: vec![symbols.root()],
            slots: SlotTable::default(),
            next_label_id: LabelId::new(0),
        }
    }

    /* Output units */

    pub fn open_unit(&mut self, kind: UnitKind, name: &str) -> Result<()> {
        if let Some(open) = self.emitter.open_unit_name() {
            return Err(CodegenError::UnitAlreadyOpen {
                open: open.to_owned(),
                requested: name.to_owned(),
            });
        }

        let writer = self.sink.create_unit(name)?;
        self.emitter.open(name, writer)?;

        if self.options.verbose {
            eprintln!(
                "{} {} unit {}",
                "Generating".green().bold(),
                kind,
                format!("{name}.j").blue()
            );
        }

        Ok(())
    }

    pub fn close_unit(&mut self) -> Result<()> {
        self.emitter.close()
    }

    /* Scopes */

    pub fn enter_scope(&mut self, kind: ScopeKind, name: InternedSymbol) -> Result<()> {
        let scope = self
            .symbols
            .child_scope(kind, name)
            .ok_or_else(|| CodegenError::UnknownScope(name.value().to_owned()))?;

        self.scope_stack.push(scope);

        Ok(())
    }

    pub fn leave_scope(&mut self) -> Result<()> {
        if self.scope_stack.len() <= 1 {
            return Err(CodegenError::ScopeUnderflow);
        }

        self.scope_stack.pop();

        Ok(())
    }

    pub fn active_scope(&self) -> ScopeId {
        *self
            .scope_stack
            .last()
            .unwrap_or_else(|| unreachable!("the root scope is never popped"))
    }

    /// Looks a function up from the active scope
    pub fn lookup_function(&self, name: InternedSymbol) -> Option<&'a FunctionSignature> {
        let symbols: &'a SymbolTable = self.symbols;
        symbols.lookup_function(self.active_scope(), name)
    }

    pub fn type_of(&self, expression: &Expression) -> Result<Type> {
        self.oracle.type_of(self.active_scope(), expression)
    }

    /* Slots */

    /// Starts a fresh slot table for a method with the given parameters
    pub fn begin_method(&mut self, parameters: impl IntoIterator<Item = InternedSymbol>) {
        self.slots = SlotTable::for_method(parameters);
    }

    /// Resolves a parameter or local variable to its slot, assigning a new
    /// slot the first time a local declared in the active scope is seen
    pub fn slot_of(&mut self, name: InternedSymbol) -> Result<Slot> {
        if let Some(slot) = self.slots.get(name) {
            return Ok(slot);
        }

        // struct fields live in struct scopes but are never slots
        let scope = self.symbols.scope(self.active_scope());
        if matches!(scope.kind, ScopeKind::Function | ScopeKind::Main)
            && scope.variable(name).is_some()
        {
            return Ok(self.slots.allocate(name));
        }

        if scope.kind == ScopeKind::Struct && scope.variable(name).is_some() {
            return Err(CodegenError::unsupported(format!(
                "reference to struct field `{name}`"
            )));
        }

        Err(CodegenError::unresolved(SymbolKind::Variable, name))
    }

    pub fn fresh_slot(&mut self) -> Slot {
        self.slots.allocate_anonymous()
    }

    /* Labels */

    pub fn fresh_label(&mut self) -> LabelId {
        let label = self.next_label_id;
        self.next_label_id.increment_by(1);
        label
    }

    /* Emission */

    pub fn emit(&mut self, text: impl AsRef<str>) -> Result<()> {
        self.emitter.emit(text)
    }

    pub fn instruction(&mut self, opcode: Opcode) -> Result<()> {
        self.emitter.instruction(opcode)
    }

    pub fn instruction_with(&mut self, opcode: Opcode, operand: impl core::fmt::Display) -> Result<()> {
        self.emitter.instruction_with(opcode, operand)
    }

    pub fn label(&mut self, label: LabelId) -> Result<()> {
        self.emitter.label(label)
    }

    pub fn comment(&mut self, comment: impl AsRef<str>) -> Result<()> {
        self.emitter.comment(comment)
    }
}
