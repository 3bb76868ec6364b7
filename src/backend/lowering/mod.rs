//! Translation of the syntax tree into Jasmin instructions. Each submodule
//! adds methods to [`GenerationContext`](super::context::GenerationContext):
//! declarations open units and switch scopes, statements and expressions
//! append instructions to the open unit.

mod decl;
mod expr;
mod stmt;
