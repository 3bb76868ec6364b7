//! Hand written runtime support classes. They are never generated, only
//! copied verbatim next to the generated units.

use crate::middle::ty::{FPTR_CLASS, LIST_CLASS};

#[derive(Debug, Clone, Copy)]
pub struct RuntimeAsset {
    pub class_name: &'static str,
    pub source: &'static str,
}

impl RuntimeAsset {
    pub fn file_name(&self) -> String {
        format!("{}.j", self.class_name)
    }
}

pub const LIST: RuntimeAsset = RuntimeAsset {
    class_name: LIST_CLASS,
    source: include_str!("../../runtime/List.j"),
};

pub const FPTR: RuntimeAsset = RuntimeAsset {
    class_name: FPTR_CLASS,
    source: include_str!("../../runtime/Fptr.j"),
};

pub const ASSETS: &[RuntimeAsset] = &[LIST, FPTR];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::jasmin;

    /// `List/getSize()I` -> `.method public getSize()I`
    fn method_header(reference: &str, class_name: &str) -> String {
        let signature = reference
            .strip_prefix(class_name)
            .and_then(|s| s.strip_prefix('/'))
            .unwrap();

        format!(".method public {signature}")
    }

    #[test]
    fn assets_declare_their_class() {
        for asset in ASSETS {
            let header = format!(".class public {}", asset.class_name);
            assert!(asset.source.starts_with(&header), "{}", asset.file_name());
        }
    }

    #[test]
    fn function_pointers_only_consider_declared_methods_of_matching_arity() {
        assert!(FPTR.source.contains("java/lang/Class/getDeclaredMethods()"));
        assert!(!FPTR.source.contains("java/lang/Class/getMethods()"));
        assert!(FPTR.source.contains("java/lang/reflect/Method/getParameterCount()I"));
    }

    #[test]
    fn assets_define_every_method_the_backend_calls() {
        for reference in [
            jasmin::LIST_INIT,
            jasmin::LIST_COPY_INIT,
            jasmin::LIST_GET_ELEMENT,
            jasmin::LIST_ADD_ELEMENT,
            jasmin::LIST_GET_SIZE,
        ] {
            assert!(LIST.source.contains(&method_header(reference, LIST_CLASS)), "{reference}");
        }

        for reference in [jasmin::FPTR_INIT, jasmin::FPTR_INVOKE] {
            assert!(FPTR.source.contains(&method_header(reference, FPTR_CLASS)), "{reference}");
        }
    }
}
