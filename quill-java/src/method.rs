//! Method and constructor declarations.

use std::collections::BTreeSet;

use quill_core::{Error, Result, validate_identifier};
use quill_notation::{Notation, Renderable, Scope};

use crate::{
    AnnotationSpec, CodeBlock, Modifier, ParameterSpec, TypeKind, TypeName, TypeVariable,
    layout::{annotation_lines, braces, javadoc, wrap, wrapped_list},
    modifier::modifier_list,
    type_name::type_parameters,
};

const CONSTRUCTOR: &str = "<init>";

/// A method or constructor declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    /// Method name, `<init>` for constructors.
    pub name: String,
    pub javadoc: Option<CodeBlock>,
    pub annotations: Vec<AnnotationSpec>,
    pub modifiers: BTreeSet<Modifier>,
    /// Type variables, in scope for the whole declaration.
    pub type_variables: Vec<TypeVariable>,
    /// Ignored for constructors.
    pub return_type: TypeName,
    pub parameters: Vec<ParameterSpec>,
    /// Whether the last parameter is variable arity.
    pub varargs: bool,
    pub exceptions: Vec<TypeName>,
    /// The body. Abstract and interface methods have none.
    pub code: CodeBlock,
    /// Default value of an annotation type element.
    pub default_value: Option<CodeBlock>,
}

impl MethodSpec {
    /// Create a `void` method.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            javadoc: None,
            annotations: Vec::new(),
            modifiers: BTreeSet::new(),
            type_variables: Vec::new(),
            return_type: TypeName::void(),
            parameters: Vec::new(),
            varargs: false,
            exceptions: Vec::new(),
            code: CodeBlock::default(),
            default_value: None,
        }
    }

    /// Create a constructor. It takes the name of its enclosing type.
    pub fn constructor() -> Self {
        Self::new(CONSTRUCTOR)
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR
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

    /// Add a type variable.
    pub fn type_variable(mut self, variable: TypeVariable) -> Self {
        self.type_variables.push(variable);
        self
    }

    /// Set the return type.
    pub fn returns(mut self, ty: impl Into<TypeName>) -> Self {
        self.return_type = ty.into();
        self
    }

    /// Add a parameter.
    pub fn parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Make the last parameter variable arity.
    pub fn varargs(mut self, varargs: bool) -> Self {
        self.varargs = varargs;
        self
    }

    /// Add a checked exception to the `throws` clause.
    pub fn exception(mut self, exception: impl Into<TypeName>) -> Self {
        self.exceptions.push(exception.into());
        self
    }

    /// Set the body.
    pub fn code(mut self, code: CodeBlock) -> Self {
        self.code = code;
        self
    }

    /// Set the default value of an annotation type element.
    pub fn default_value(mut self, value: CodeBlock) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Whether the declaration ends in `;` instead of a body.
    fn is_abstract(&self, kind: TypeKind) -> bool {
        if self.modifiers.contains(&Modifier::Abstract) || self.modifiers.contains(&Modifier::Native)
        {
            return true;
        }
        matches!(kind, TypeKind::Interface | TypeKind::Annotation)
            && ![Modifier::Default, Modifier::Static, Modifier::Private]
                .iter()
                .any(|m| self.modifiers.contains(m))
    }

    pub(crate) fn validate(&self, kind: TypeKind) -> Result<()> {
        if self.is_constructor() {
            if matches!(kind, TypeKind::Interface | TypeKind::Annotation) {
                return Err(Error::argument(format!(
                    "{} types cannot declare constructors",
                    kind.keyword()
                )));
            }
        } else if let Some(reason) = validate_identifier(&self.name) {
            return Err(Error::invalid_name(&self.name, "method name", reason));
        }
        if self.is_abstract(kind) && !self.code.is_empty() {
            return Err(Error::argument(format!(
                "abstract method '{}' cannot have a body",
                self.name
            )));
        }
        if self.default_value.is_some() && kind != TypeKind::Annotation {
            return Err(Error::argument(format!(
                "only annotation type elements have default values, not '{}'",
                self.name
            )));
        }
        if self.varargs {
            let last = self.parameters.last().and_then(|p| p.ty.array_component());
            if last.is_none() {
                return Err(Error::argument(format!(
                    "the last parameter of varargs method '{}' must be an array",
                    self.name
                )));
            }
        }
        for variable in &self.type_variables {
            if let Some(reason) = validate_identifier(variable.name()) {
                return Err(Error::invalid_name(variable.name(), "type variable", reason));
            }
        }
        for parameter in &self.parameters {
            parameter.validate()?;
        }
        for annotation in &self.annotations {
            annotation.validate()?;
        }
        Ok(())
    }

    /// Lower the declaration as a member of a `kind` type named `enclosing`.
    pub(crate) fn lower(&self, kind: TypeKind, enclosing: &str) -> Notation {
        let last = self.parameters.len().saturating_sub(1);
        let parameters = self
            .parameters
            .iter()
            .enumerate()
            .map(|(i, parameter)| parameter.lower(self.varargs && i == last))
            .collect();
        let throws = if self.exceptions.is_empty() {
            Notation::empty()
        } else {
            Notation::concat([
                wrap(),
                Notation::text("throws "),
                Notation::join(
                    self.exceptions.iter().map(Renderable::to_notation),
                    Notation::text(", "),
                ),
            ])
        };

        let mut signature = vec![modifier_list(&self.modifiers, kind.implicit_method_modifiers())];
        if !self.type_variables.is_empty() {
            signature.push(type_parameters(&self.type_variables));
            signature.push(Notation::text(" "));
        }
        if self.is_constructor() {
            signature.push(Notation::text(enclosing));
        } else {
            signature.push(self.return_type.to_notation());
            signature.push(Notation::text(format!(" {}", self.name)));
        }
        signature.push(Notation::hoist([wrapped_list(parameters), throws]));
        if let Some(value) = &self.default_value {
            signature.push(Notation::text(" default "));
            signature.push(value.to_notation());
        }
        if self.is_abstract(kind) {
            signature.push(Notation::text(";"));
        } else {
            signature.push(Notation::text(" "));
            signature.push(braces(self.code.to_notation()));
        }

        let mut declaration = Notation::concat(signature);
        if !self.type_variables.is_empty() {
            let type_variables = self
                .type_variables
                .iter()
                .map(|variable| variable.name().to_string())
                .collect();
            declaration = Notation::scoped(declaration, Scope::Member { type_variables });
        }
        Notation::concat([
            javadoc(self.javadoc.as_ref()),
            annotation_lines(&self.annotations),
            declaration,
        ])
    }
}
