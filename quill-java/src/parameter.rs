//! Method and constructor parameters.

use std::collections::BTreeSet;

use quill_core::{Error, Result, validate_identifier};
use quill_notation::{Notation, Renderable};

use crate::{
    AnnotationSpec, Modifier, TypeName, layout::annotations_inline, modifier::modifier_list,
};

/// A parameter declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    /// Parameter name.
    pub name: String,
    /// Parameter type. A varargs parameter has an array type.
    pub ty: TypeName,
    pub annotations: Vec<AnnotationSpec>,
    /// Only `final` is allowed.
    pub modifiers: BTreeSet<Modifier>,
}

impl ParameterSpec {
    pub fn new(ty: impl Into<TypeName>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            annotations: Vec::new(),
            modifiers: BTreeSet::new(),
        }
    }

    /// Add an annotation.
    pub fn annotation(mut self, annotation: impl Into<AnnotationSpec>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Add a modifier.
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(reason) = validate_identifier(&self.name) {
            return Err(Error::invalid_name(&self.name, "parameter name", reason));
        }
        if let Some(modifier) = self.modifiers.iter().find(|m| **m != Modifier::Final) {
            return Err(Error::argument(format!(
                "parameter '{}' cannot be '{modifier}', only 'final' is allowed",
                self.name
            )));
        }
        for annotation in &self.annotations {
            annotation.validate()?;
        }
        Ok(())
    }

    /// `@Nullable final String... names` when `varargs` is set on the last
    /// parameter.
    pub(crate) fn lower(&self, varargs: bool) -> Notation {
        let ty = match self.ty.array_component() {
            Some(component) if varargs => component.to_notation().then(Notation::text("...")),
            _ => self.ty.to_notation(),
        };
        Notation::concat([
            annotations_inline(&self.annotations),
            modifier_list(&self.modifiers, &[]),
            ty,
            Notation::text(format!(" {}", self.name)),
        ])
    }
}

impl Renderable for ParameterSpec {
    fn to_notation(&self) -> Notation {
        self.lower(false)
    }
}

#[cfg(test)]
mod tests {
    use quill_core::ClassName;

    use super::*;
    use crate::Primitive;

    #[test]
    fn test_parameter() {
        let parameter = ParameterSpec::new(ClassName::string(), "name")
            .modifier(Modifier::Final)
            .annotation(ClassName::new("javax.annotation", "Nullable"));
        assert_eq!(
            parameter.to_notation().to_string(),
            "@javax.annotation.Nullable final java.lang.String name"
        );
    }

    #[test]
    fn test_varargs() {
        let parameter = ParameterSpec::new(TypeName::array_of(Primitive::Int), "values");
        assert_eq!(parameter.lower(true).to_string(), "int... values");
        assert_eq!(parameter.lower(false).to_string(), "int[] values");
    }

    #[test]
    fn test_only_final_allowed() {
        let parameter = ParameterSpec::new(Primitive::Int, "x").modifier(Modifier::Static);
        assert!(parameter.validate().is_err());
        assert!(ParameterSpec::new(Primitive::Int, "class").validate().is_err());
    }
}
