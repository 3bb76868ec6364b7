//! Failures that abort code generation. None of them are recovered from: the
//! input is assumed to be validated, so every variant is either a broken
//! invariant, a construct the backend refuses, or an I/O failure.

use thiserror::Error;

pub type Result<T, E = CodegenError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Struct,
    Variable,
}

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("{kind} `{name}` is not defined in the active scope")]
    UnresolvedSymbol { kind: SymbolKind, name: String },
    #[error("no scope named `{0}` exists in the symbol table")]
    UnknownScope(String),
    #[error("unsupported construct: {0}")]
    Unsupported(String),
    #[error("no output unit is open")]
    NoOpenUnit,
    #[error("cannot open unit `{requested}` while `{open}` is still open")]
    UnitAlreadyOpen { open: String, requested: String },
    #[error("scope stack underflow")]
    ScopeUnderflow,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CodegenError {
    pub fn unresolved(kind: SymbolKind, name: impl ToString) -> Self {
        Self::UnresolvedSymbol {
            kind,
            name: name.to_string(),
        }
    }

    pub fn unsupported(construct: impl Into<String>) -> Self {
        Self::Unsupported(construct.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_symbol() {
        let error = CodegenError::unresolved(SymbolKind::Function, "fib");

        assert_eq!(
            error.to_string(),
            "function `fib` is not defined in the active scope"
        );
    }

    #[test]
    fn io_errors_convert_transparently() {
        let error: CodegenError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read only").into();

        assert!(matches!(error, CodegenError::Io(_)));
        assert_eq!(error.to_string(), "read only");
    }
}
