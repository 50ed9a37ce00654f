//! Field declarations.

use std::collections::BTreeSet;

use quill_core::{Error, Result, validate_identifier};
use quill_notation::{Notation, Renderable};

use crate::{
    AnnotationSpec, CodeBlock, Modifier, TypeName,
    layout::{annotation_lines, javadoc},
    modifier::modifier_list,
};

/// A field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name.
    pub name: String,
    /// Field type.
    pub ty: TypeName,
    pub javadoc: Option<CodeBlock>,
    pub annotations: Vec<AnnotationSpec>,
    pub modifiers: BTreeSet<Modifier>,
    /// Expression after `=`.
    pub initializer: Option<CodeBlock>,
}

impl FieldSpec {
    pub fn new(ty: impl Into<TypeName>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            javadoc: None,
            annotations: Vec::new(),
            modifiers: BTreeSet::new(),
            initializer: None,
        }
    }

    /// Set the documentation comment.
    pub fn javadoc(mut self, doc: CodeBlock) -> Self {
        self.javadoc = Some(doc);
        self
    }

    /// Set plain-text documentation.
    pub fn doc(self, doc: impl AsRef<str>) -> Self {
        self.javadoc(CodeBlock::text(doc))
    }

    /// Add an annotation.
    pub fn annotation(mut self, annotation: impl Into<AnnotationSpec>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Add modifiers.
    pub fn modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    /// Set the initializer expression.
    pub fn initializer(mut self, initializer: CodeBlock) -> Self {
        self.initializer = Some(initializer);
        self
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(reason) = validate_identifier(&self.name) {
            return Err(Error::invalid_name(&self.name, "field name", reason));
        }
        for annotation in &self.annotations {
            annotation.validate()?;
        }
        Ok(())
    }

    /// The declaration, omitting modifiers implied by the enclosing type.
    pub(crate) fn lower(&self, implicit: &[Modifier]) -> Notation {
        let initializer = match &self.initializer {
            Some(initializer) => Notation::text(" = ").then(initializer.to_notation()),
            None => Notation::empty(),
        };
        Notation::concat([
            javadoc(self.javadoc.as_ref()),
            annotation_lines(&self.annotations),
            Notation::statement(Notation::concat([
                modifier_list(&self.modifiers, implicit),
                self.ty.to_notation(),
                Notation::text(format!(" {}", self.name)),
                initializer,
                Notation::text(";"),
            ])),
        ])
    }
}

impl Renderable for FieldSpec {
    fn to_notation(&self) -> Notation {
        self.lower(&[])
    }
}
