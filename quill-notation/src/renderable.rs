//! Seams between declarations, name resolution and the printer.

use quill_core::ClassName;

use crate::Notation;

/// Trait for declarations that lower to a notation.
///
/// Lowering is pure: the same declaration always produces an equal notation,
/// and type references stay symbolic until the notation is resolved.
pub trait Renderable {
    /// Lower this declaration to a notation.
    fn to_notation(&self) -> Notation;
}

/// Blanket implementation for references.
impl<T: Renderable + ?Sized> Renderable for &T {
    fn to_notation(&self) -> Notation {
        (*self).to_notation()
    }
}

/// Blanket implementation for Box.
impl<T: Renderable + ?Sized> Renderable for Box<T> {
    fn to_notation(&self) -> Notation {
        self.as_ref().to_notation()
    }
}

impl Renderable for Notation {
    fn to_notation(&self) -> Notation {
        self.clone()
    }
}

/// A name assignment consulted when references are substituted.
pub trait NameLookup {
    /// The display text for a type reference.
    fn type_name(&self, class: &ClassName) -> String;

    /// The display text for a static member reference.
    fn static_member(&self, class: &ClassName, member: &str) -> String;
}

/// Prints every reference fully qualified.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalNames;

impl NameLookup for CanonicalNames {
    fn type_name(&self, class: &ClassName) -> String {
        class.canonical_name()
    }

    fn static_member(&self, class: &ClassName, member: &str) -> String {
        format!("{}.{}", class.canonical_name(), member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Simple;

    impl NameLookup for Simple {
        fn type_name(&self, class: &ClassName) -> String {
            class.simple_name().to_string()
        }

        fn static_member(&self, _class: &ClassName, member: &str) -> String {
            member.to_string()
        }
    }

    #[test]
    fn test_resolve_with_lookup() {
        let list = ClassName::new("java.util", "List");
        let notation = Notation::type_ref(list.clone())
            .then(Notation::text(" x = "))
            .then(Notation::static_ref(list, "of"))
            .then(Notation::text("();"));
        assert_eq!(notation.resolve(&Simple).to_string(), "List x = of();");
        assert_eq!(
            notation.resolve(&CanonicalNames).to_string(),
            "java.util.List x = java.util.List.of();"
        );
    }

    #[test]
    fn test_boxed_renderable() {
        let boxed: Box<dyn Renderable> = Box::new(Notation::text("x"));
        assert_eq!(boxed.to_notation().to_string(), "x");
    }
}
