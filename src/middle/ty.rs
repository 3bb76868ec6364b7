use std::rc::Rc;

use colored::Colorize;
use itertools::Itertools;

use crate::frontend::intern::InternedSymbol;

/// Runtime class of the generated list wrapper (shipped as `List.j`)
pub const LIST_CLASS: &str = "List";
/// Runtime class of the generated function pointer (shipped as `Fptr.j`)
pub const FPTR_CLASS: &str = "Fptr";

/// Static type of a Cmm value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// int
    Int,
    /// bool
    Bool,
    /// void
    ///
    /// Only valid as a function return type or the type of a call / append
    /// expression. Never produces a value on the evaluation stack.
    Void,
    /// struct Point
    Struct(InternedSymbol),
    /// list # int
    List(Rc<Type>),
    /// fptr<int, bool -> int>
    FunctionPointer {
        parameters: Rc<[Type]>,
        return_type: Rc<Type>,
    },
}

impl Type {
    pub fn list_of(element: Type) -> Self {
        Self::List(Rc::new(element))
    }

    pub fn function_pointer(parameters: impl IntoIterator<Item = Type>, return_type: Type) -> Self {
        Self::FunctionPointer {
            parameters: parameters.into_iter().collect(),
            return_type: Rc::new(return_type),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Whether values of this type live on the stack as a boxed wrapper
    /// object that must be unboxed before primitive operations
    pub fn is_boxed_primitive(&self) -> bool {
        matches!(self, Self::Int | Self::Bool)
    }

    /// Internal class name of the runtime representation, `None` for void
    pub fn class_name(&self) -> Option<&'static str> {
        match self {
            Self::Int => Some("java/lang/Integer"),
            Self::Bool => Some("java/lang/Boolean"),
            Self::Void => None,
            Self::Struct(name) => Some(name.value()),
            Self::List(_) => Some(LIST_CLASS),
            Self::FunctionPointer { .. } => Some(FPTR_CLASS),
        }
    }

    /// Field / method descriptor of the (always boxed) runtime representation
    pub fn descriptor(&self) -> String {
        match self.class_name() {
            Some(class_name) => format!("L{class_name};"),
            None => "V".to_owned(),
        }
    }

    pub fn colored(&self) -> colored::ColoredString {
        self.to_string().yellow()
    }
}

/// Builds a method descriptor such as `(Ljava/lang/Integer;LList;)V`
pub fn method_descriptor<'a>(
    parameters: impl IntoIterator<Item = &'a Type>,
    return_type: &Type,
) -> String {
    format!(
        "({}){}",
        parameters.into_iter().map(Type::descriptor).join(""),
        return_type.descriptor()
    )
}

impl core::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Bool => write!(f, "bool"),
            Self::Void => write!(f, "void"),
            Self::Struct(name) => write!(f, "struct {name}"),
            Self::List(element) => write!(f, "list # {element}"),
            Self::FunctionPointer {
                parameters,
                return_type,
            } => {
                let parameters = if parameters.is_empty() {
                    "void".to_owned()
                } else {
                    parameters.iter().join(", ")
                };

                write!(f, "fptr<{parameters} -> {return_type}>")
            }
        }
    }
}
