//! Scoped symbol table. There is exactly one root scope holding every top
//! level function and struct, with one child scope per function, per struct
//! and one for the program entry point. Locals declared anywhere inside a
//! function body (nested blocks included) live in that function's scope.

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::{
    frontend::{
        ast::{Block, Program, Statement},
        intern::InternedSymbol,
    },
    index::{IndexVec, simple_index},
    middle::ty::Type,
};

simple_index! {
    /// Identifies a scope within a [`SymbolTable`]
    pub struct ScopeId;
}

/// Name of the scope holding the entry point's locals
pub const MAIN_SCOPE_NAME: &str = "main";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScopeKind {
    Root,
    Function,
    Struct,
    Main,
}

#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub name: InternedSymbol,
    /// Parameters in declaration order
    pub parameters: Vec<Binding>,
    pub return_type: Type,
}

impl FunctionSignature {
    pub fn parameter_types(&self) -> impl Iterator<Item = &Type> {
        self.parameters.iter().map(|p| &p.ty)
    }

    /// The type of a function pointer value referring to this function
    pub fn pointer_type(&self) -> Type {
        Type::function_pointer(
            self.parameter_types().cloned(),
            self.return_type.clone(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct StructLayout {
    pub name: InternedSymbol,
    /// Fields in declaration order
    pub fields: Vec<Binding>,
}

/// A name bound to a type (parameter, struct field)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: InternedSymbol,
    pub ty: Type,
}

#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub name: Option<InternedSymbol>,
    pub parent: Option<ScopeId>,
    children: BTreeMap<(ScopeKind, InternedSymbol), ScopeId>,
    functions: HashMap<InternedSymbol, FunctionSignature>,
    structs: HashMap<InternedSymbol, StructLayout>,
    variables: HashMap<InternedSymbol, Type>,
}

impl Scope {
    fn new(id: ScopeId, kind: ScopeKind, name: Option<InternedSymbol>, parent: Option<ScopeId>) -> Self {
        Self {
            id,
            kind,
            name,
            parent,
            children: BTreeMap::new(),
            functions: HashMap::new(),
            structs: HashMap::new(),
            variables: HashMap::new(),
        }
    }

    pub fn variable(&self, name: InternedSymbol) -> Option<&Type> {
        self.variables.get(&name)
    }
}

#[derive(Debug)]
pub struct SymbolTable {
    scopes: IndexVec<ScopeId, Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        let id = scopes.next_index();
        scopes.push(Scope::new(id, ScopeKind::Root, None, None));

        Self { scopes }
    }

    /// Builds the complete table for a program in two passes: first every
    /// struct, function and the entry point are bound in the root scope, then
    /// each body is walked to register its local variables.
    pub fn build(program: &Program) -> Self {
        let mut table = Self::new();

        for definition in &program.structs {
            let fields = definition
                .fields
                .iter()
                .map(|f| Binding {
                    name: f.name,
                    ty: f.ty.clone(),
                })
                .collect();
            table.declare_struct(definition.name, fields);
        }

        for definition in &program.functions {
            let parameters = definition
                .parameters
                .iter()
                .map(|p| Binding {
                    name: p.name,
                    ty: p.ty.clone(),
                })
                .collect();
            let scope =
                table.declare_function(definition.name, parameters, definition.return_type.clone());
            table.declare_block_locals(scope, &definition.body);
        }

        let main_scope = table.declare_main();
        table.declare_block_locals(main_scope, &program.main.body);

        table
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    pub fn child_scope(&self, kind: ScopeKind, name: InternedSymbol) -> Option<ScopeId> {
        self.scopes[self.root()].children.get(&(kind, name)).copied()
    }

    pub fn main_scope(&self) -> Option<ScopeId> {
        self.child_scope(ScopeKind::Main, InternedSymbol::new(MAIN_SCOPE_NAME))
    }

    pub fn declare_function(
        &mut self,
        name: InternedSymbol,
        parameters: Vec<Binding>,
        return_type: Type,
    ) -> ScopeId {
        let scope = self.create_child_scope(ScopeKind::Function, name);

        for parameter in &parameters {
            self.declare_variable(scope, parameter.name, parameter.ty.clone());
        }

        let root = self.root();
        self.scopes[root].functions.insert(
            name,
            FunctionSignature {
                name,
                parameters,
                return_type,
            },
        );

        scope
    }

    pub fn declare_struct(&mut self, name: InternedSymbol, fields: Vec<Binding>) -> ScopeId {
        let scope = self.create_child_scope(ScopeKind::Struct, name);

        for field in &fields {
            self.declare_variable(scope, field.name, field.ty.clone());
        }

        let root = self.root();
        self.scopes[root]
            .structs
            .insert(name, StructLayout { name, fields });

        scope
    }

    pub fn declare_main(&mut self) -> ScopeId {
        self.create_child_scope(ScopeKind::Main, InternedSymbol::new(MAIN_SCOPE_NAME))
    }

    pub fn declare_variable(&mut self, scope: ScopeId, name: InternedSymbol, ty: Type) {
        self.scopes[scope].variables.insert(name, ty);
    }

    pub fn lookup_function(&self, scope: ScopeId, name: InternedSymbol) -> Option<&FunctionSignature> {
        self.ancestors(scope).find_map(|s| s.functions.get(&name))
    }

    pub fn lookup_struct(&self, scope: ScopeId, name: InternedSymbol) -> Option<&StructLayout> {
        self.ancestors(scope).find_map(|s| s.structs.get(&name))
    }

    pub fn lookup_variable(&self, scope: ScopeId, name: InternedSymbol) -> Option<&Type> {
        self.ancestors(scope).find_map(|s| s.variables.get(&name))
    }

    /// Iterates from `scope` up to (and including) the root scope
    fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(&self.scopes[scope]), |s| {
            s.parent.map(|parent| &self.scopes[parent])
        })
    }

    fn create_child_scope(&mut self, kind: ScopeKind, name: InternedSymbol) -> ScopeId {
        let root = self.root();
        let id = self.scopes.next_index();
        self.scopes
            .push(Scope::new(id, kind, Some(name), Some(root)));
        self.scopes[root].children.insert((kind, name), id);

        id
    }

    fn declare_block_locals(&mut self, scope: ScopeId, block: &Block) {
        for statement in &block.statements {
            self.declare_statement_locals(scope, statement);
        }
    }

    fn declare_statement_locals(&mut self, scope: ScopeId, statement: &Statement) {
        match statement {
            Statement::Block(block) => self.declare_block_locals(scope, block),
            Statement::Local(local) => self.declare_variable(scope, local.name, local.ty.clone()),
            Statement::If {
                positive, negative, ..
            } => {
                self.declare_statement_locals(scope, positive);
                if let Some(negative) = negative {
                    self.declare_statement_locals(scope, negative);
                }
            }
            Statement::Loop { body, .. } => self.declare_statement_locals(scope, body),
            Statement::Assignment { .. }
            | Statement::FunctionCall(_)
            | Statement::Return(_)
            | Statement::Display(_)
            | Statement::ListAppend(_)
            | Statement::ListSize(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::{
        Expression, FunctionDefinition, FunctionParameter, MainDefinition, Program, Statement,
    };

    fn sample_program() -> Program {
        Program {
            structs: vec![],
            main: MainDefinition {
                body: Block::new([Statement::local("total", Type::Int, None)]),
            },
            functions: vec![FunctionDefinition {
                name: InternedSymbol::new("scale"),
                parameters: vec![FunctionParameter {
                    name: InternedSymbol::new("factor"),
                    ty: Type::Int,
                }],
                return_type: Type::Int,
                body: Block::new([Statement::if_else(
                    Expression::bool(true),
                    Statement::local("tmp", Type::Bool, None),
                    None,
                )]),
            }],
        }
    }

    #[test]
    fn build_creates_one_scope_per_declaration() {
        let table = SymbolTable::build(&sample_program());
        let scale = InternedSymbol::new("scale");

        let function_scope = table
            .child_scope(ScopeKind::Function, scale)
            .expect("function scope");
        let main_scope = table.main_scope().expect("main scope");

        assert_eq!(table.scope(function_scope).parent, Some(table.root()));
        assert_eq!(
            table.lookup_variable(function_scope, InternedSymbol::new("factor")),
            Some(&Type::Int)
        );
        // nested block locals are flattened into the function scope
        assert_eq!(
            table.lookup_variable(function_scope, InternedSymbol::new("tmp")),
            Some(&Type::Bool)
        );
        assert_eq!(
            table.lookup_variable(main_scope, InternedSymbol::new("total")),
            Some(&Type::Int)
        );
        assert!(
            table
                .lookup_variable(main_scope, InternedSymbol::new("factor"))
                .is_none()
        );
    }

    #[test]
    fn lookups_walk_up_to_the_root() {
        let table = SymbolTable::build(&sample_program());
        let main_scope = table.main_scope().expect("main scope");

        let signature = table
            .lookup_function(main_scope, InternedSymbol::new("scale"))
            .expect("scale is visible from main");

        assert_eq!(
            signature.pointer_type(),
            Type::function_pointer([Type::Int], Type::Int)
        );
    }
}
