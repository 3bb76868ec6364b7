//! The frontend owns the source level representation: interned names and the
//! syntax tree handed over by the parser and semantic analysis.

pub mod ast;
pub mod intern;
