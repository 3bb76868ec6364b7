//! Code generator for Cmm, a small imperative language with structs, lists
//! and first class functions. A type checked [`frontend::ast::Program`] is
//! lowered to Jasmin assembly, one `.j` unit per class.

pub mod backend;
pub mod error;
pub mod frontend;
pub mod index;
pub mod middle;

pub use backend::{CodegenOptions, compile_to_directory, generate_program};
