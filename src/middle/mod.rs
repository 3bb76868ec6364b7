//! Name and type information the backend consults while lowering. The symbol
//! table and the type oracle are built once and only ever read afterwards.

pub mod symbols;
pub mod ty;
pub mod type_oracle;
