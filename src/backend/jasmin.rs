//! Vocabulary of the Jasmin dialect we emit: opcodes, branch labels and the
//! descriptors of every runtime method the generated code calls.

use crate::index::{Index, simple_index};

/// Fixed operand stack capacity of every generated method
pub const STACK_LIMIT: u32 = 128;
/// Fixed local slot capacity of every generated method
pub const LOCALS_LIMIT: u32 = 128;

/// Class hosting the entry point and every top level function
pub const ENTRY_CLASS: &str = "Main";
pub const OBJECT_CLASS: &str = "java/lang/Object";
pub const ARRAY_LIST_CLASS: &str = "java/util/ArrayList";

pub const OBJECT_INIT: &str = "java/lang/Object/<init>()V";

pub const INTEGER_VALUE_OF: &str = "java/lang/Integer/valueOf(I)Ljava/lang/Integer;";
pub const INTEGER_INT_VALUE: &str = "java/lang/Integer/intValue()I";
pub const BOOLEAN_VALUE_OF: &str = "java/lang/Boolean/valueOf(Z)Ljava/lang/Boolean;";
pub const BOOLEAN_BOOLEAN_VALUE: &str = "java/lang/Boolean/booleanValue()Z";

pub const LIST_INIT: &str = "List/<init>()V";
pub const LIST_COPY_INIT: &str = "List/<init>(LList;)V";
pub const LIST_GET_ELEMENT: &str = "List/getElement(I)Ljava/lang/Object;";
pub const LIST_ADD_ELEMENT: &str = "List/addElement(Ljava/lang/Object;)V";
pub const LIST_GET_SIZE: &str = "List/getSize()I";

pub const FPTR_INIT: &str = "Fptr/<init>(Ljava/lang/Object;Ljava/lang/String;)V";
pub const FPTR_INVOKE: &str = "Fptr/invoke(Ljava/util/ArrayList;)Ljava/lang/Object;";

pub const ARRAY_LIST_INIT: &str = "java/util/ArrayList/<init>()V";
pub const ARRAY_LIST_ADD: &str = "java/util/ArrayList/add(Ljava/lang/Object;)Z";

pub const SYSTEM_OUT: &str = "java/lang/System/out Ljava/io/PrintStream;";
pub const PRINTLN_INT: &str = "java/io/PrintStream/println(I)V";
pub const PRINTLN_BOOL: &str = "java/io/PrintStream/println(Z)V";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Opcode {
    Nop,
    AconstNull,
    #[strum(serialize = "iconst_0")]
    Iconst0,
    #[strum(serialize = "iconst_1")]
    Iconst1,
    Ldc,
    Aload,
    Astore,
    Iload,
    Istore,
    Iinc,
    Pop,
    Dup,
    Iadd,
    Isub,
    Imul,
    Idiv,
    Ineg,
    Ixor,
    Ifeq,
    Ifne,
    Ifgt,
    IfIcmpne,
    IfIcmpge,
    IfIcmple,
    IfAcmpne,
    Goto,
    Return,
    Areturn,
    Getstatic,
    Putfield,
    Invokevirtual,
    Invokespecial,
    Invokestatic,
    New,
    Checkcast,
}

simple_index! {
    /// A branch target, unique across one whole generation run
    pub struct LabelId;
}

impl core::fmt::Display for LabelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Label_{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_mnemonics_match_jasmin() {
        assert_eq!(Opcode::AconstNull.to_string(), "aconst_null");
        assert_eq!(Opcode::Iconst0.to_string(), "iconst_0");
        assert_eq!(Opcode::IfIcmpge.to_string(), "if_icmpge");
        assert_eq!(Opcode::IfAcmpne.to_string(), "if_acmpne");
        assert_eq!(Opcode::Invokevirtual.to_string(), "invokevirtual");
        assert_eq!(Opcode::Areturn.to_string(), "areturn");
    }

    #[test]
    fn labels_render_with_prefix() {
        assert_eq!(LabelId::new(7).to_string(), "Label_7");
    }
}
