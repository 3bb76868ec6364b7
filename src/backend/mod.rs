//! The backend lowers a type checked [`Program`] straight to Jasmin assembly.
//! Every value lives boxed on the operand stack and in local slots: ints and
//! bools are `java/lang/Integer` / `java/lang/Boolean`, lists and function
//! pointers are instances of the `List` and `Fptr` runtime classes.
//!
//! Generation happens in one pass:
//! 1. Each struct becomes its own unit with a default constructor.
//! 2. The `Main` unit receives the entry point plus every top level function
//!    as an instance method, so function pointers can capture the `Main`
//!    receiver and invoke by name.
//! 3. The runtime classes are installed next to the generated units.

use std::path::Path;

use colored::Colorize;

use crate::{
    error::Result,
    frontend::ast::Program,
    middle::{
        symbols::SymbolTable,
        type_oracle::{ExpressionTypeChecker, TypeOracle},
    },
};

pub mod context;
pub mod emitter;
pub mod jasmin;
pub mod lowering;
pub mod output;
pub mod runtime;

use context::GenerationContext;
use output::{OutputDirectory, OutputSink};

#[derive(Debug, Clone, Copy, Default)]
pub struct CodegenOptions {
    /// Precede every lowered statement with a comment showing its source
    pub emit_debug_info: bool,
    /// Report progress on stderr
    pub verbose: bool,
}

/// Lowers `program` into units created through `sink`. The runtime classes
/// are not installed; see [`OutputSink::install_runtime`].
pub fn generate_program(
    program: &Program,
    symbols: &SymbolTable,
    oracle: &dyn TypeOracle,
    sink: &mut dyn OutputSink,
    options: &CodegenOptions,
) -> Result<()> {
    let mut context = GenerationContext::new(symbols, oracle, sink, options);
    context.lower_program(program)
}

/// Clears `path`, then writes every generated unit and the runtime classes
/// into it
pub fn compile_to_directory(
    program: &Program,
    path: impl AsRef<Path>,
    options: &CodegenOptions,
) -> Result<()> {
    let symbols = SymbolTable::build(program);
    let oracle = ExpressionTypeChecker::new(&symbols);

    let mut output = OutputDirectory::prepare(path.as_ref())?;

    generate_program(program, &symbols, &oracle, &mut output, options)?;

    output.install_runtime()?;

    if options.verbose {
        eprintln!(
            "{} runtime classes into {}",
            "Installed".green().bold(),
            output.path().display().to_string().blue()
        );
    }

    Ok(())
}
