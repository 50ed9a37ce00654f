//! Type declarations.

use std::collections::BTreeSet;

use quill_core::{ClassName, Error, Result, validate_identifier};
use quill_notation::{Notation, Renderable, Scope};

use crate::{
    AnnotationSpec, CodeBlock, FieldSpec, MethodSpec, Modifier, TypeName, TypeVariable,
    layout::{annotation_lines, braces, javadoc, members, wrap},
    modifier::modifier_list,
    type_name::type_parameters,
};

/// The kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    /// An anonymous class body, embedded in code with `$L`.
    Anonymous,
}

impl TypeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Class | Self::Anonymous => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Annotation => "@interface",
        }
    }

    fn is_interface_like(&self) -> bool {
        matches!(self, Self::Interface | Self::Annotation)
    }

    fn implicit_field_modifiers(&self) -> &'static [Modifier] {
        if self.is_interface_like() {
            &[Modifier::Public, Modifier::Static, Modifier::Final]
        } else {
            &[]
        }
    }

    pub(crate) fn implicit_method_modifiers(&self) -> &'static [Modifier] {
        if self.is_interface_like() {
            &[Modifier::Public, Modifier::Abstract]
        } else {
            &[]
        }
    }

    /// Modifiers implied for a member type of kind `nested` declared in a
    /// type of this kind.
    fn implicit_type_modifiers(&self, nested: TypeKind) -> Vec<Modifier> {
        let mut implicit = Vec::new();
        if self.is_interface_like() {
            implicit.extend([Modifier::Public, Modifier::Static]);
        }
        if matches!(nested, Self::Enum | Self::Interface | Self::Annotation) {
            implicit.push(Modifier::Static);
        }
        implicit
    }
}

/// A constant of an enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub name: String,
    pub javadoc: Option<CodeBlock>,
    pub annotations: Vec<AnnotationSpec>,
    /// Constructor arguments, printed in parentheses.
    pub arguments: Option<CodeBlock>,
    /// A class body specializing the constant.
    pub body: Option<TypeSpec>,
}

impl EnumConstant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            javadoc: None,
            annotations: Vec::new(),
            arguments: None,
            body: None,
        }
    }

    /// Set plain-text documentation.
    pub fn doc(mut self, doc: impl AsRef<str>) -> Self {
        self.javadoc = Some(CodeBlock::text(doc));
        self
    }

    /// Add an annotation.
    pub fn annotation(mut self, annotation: impl Into<AnnotationSpec>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Set the constructor arguments.
    pub fn arguments(mut self, arguments: CodeBlock) -> Self {
        self.arguments = Some(arguments);
        self
    }

    /// Set the constant's class body. Only its members are used.
    pub fn body(mut self, body: TypeSpec) -> Self {
        self.body = Some(body);
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(reason) = validate_identifier(&self.name) {
            return Err(Error::invalid_name(&self.name, "enum constant", reason));
        }
        if let Some(body) = &self.body {
            body.validate_members(TypeKind::Anonymous)?;
        }
        Ok(())
    }

    fn lower(&self) -> Notation {
        let arguments = match &self.arguments {
            Some(arguments) => Notation::concat([
                Notation::text("("),
                arguments.to_notation(),
                Notation::text(")"),
            ]),
            None => Notation::empty(),
        };
        let body = match &self.body {
            Some(body) => Notation::text(" ").then(Notation::scoped(
                braces(body.body(None, TypeKind::Anonymous)),
                Scope::Anonymous,
            )),
            None => Notation::empty(),
        };
        Notation::concat([
            javadoc(self.javadoc.as_ref()),
            annotation_lines(&self.annotations),
            Notation::text(&self.name),
            arguments,
            body,
        ])
    }
}

/// A class, interface, enum, annotation type or anonymous class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub kind: TypeKind,
    /// Simple name, empty for anonymous classes.
    pub name: String,
    /// Constructor arguments of an anonymous class.
    pub anonymous_arguments: CodeBlock,
    pub javadoc: Option<CodeBlock>,
    pub annotations: Vec<AnnotationSpec>,
    pub modifiers: BTreeSet<Modifier>,
    /// Type variables, in scope for the whole declaration.
    pub type_variables: Vec<TypeVariable>,
    pub superclass: Option<TypeName>,
    pub superinterfaces: Vec<TypeName>,
    pub enum_constants: Vec<EnumConstant>,
    pub fields: Vec<FieldSpec>,
    pub static_block: CodeBlock,
    pub initializer_block: CodeBlock,
    pub methods: Vec<MethodSpec>,
    /// Member types.
    pub types: Vec<TypeSpec>,
}

impl TypeSpec {
    /// Create an empty declaration.
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            anonymous_arguments: CodeBlock::default(),
            javadoc: None,
            annotations: Vec::new(),
            modifiers: BTreeSet::new(),
            type_variables: Vec::new(),
            superclass: None,
            superinterfaces: Vec::new(),
            enum_constants: Vec::new(),
            fields: Vec::new(),
            static_block: CodeBlock::default(),
            initializer_block: CodeBlock::default(),
            methods: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Class, name)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Interface, name)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Enum, name)
    }

    pub fn annotation_type(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Annotation, name)
    }

    /// An anonymous class created with `arguments`, e.g. `new Thread(name) {`.
    pub fn anonymous(arguments: CodeBlock) -> Self {
        let mut spec = Self::new(TypeKind::Anonymous, "");
        spec.anonymous_arguments = arguments;
        spec
    }

    pub fn is_anonymous(&self) -> bool {
        self.kind == TypeKind::Anonymous
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

    /// Set the superclass.
    pub fn superclass(mut self, superclass: impl Into<TypeName>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Add an implemented (or, for interfaces, extended) interface.
    pub fn superinterface(mut self, interface: impl Into<TypeName>) -> Self {
        self.superinterfaces.push(interface.into());
        self
    }

    /// Add an enum constant.
    pub fn enum_constant(mut self, constant: EnumConstant) -> Self {
        self.enum_constants.push(constant);
        self
    }

    /// Add a field.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the `static { … }` initializer.
    pub fn static_block(mut self, block: CodeBlock) -> Self {
        self.static_block = block;
        self
    }

    /// Set the instance initializer block.
    pub fn initializer_block(mut self, block: CodeBlock) -> Self {
        self.initializer_block = block;
        self
    }

    /// Add a method or constructor.
    pub fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    /// Add a member type.
    pub fn nested_type(mut self, spec: TypeSpec) -> Self {
        self.types.push(spec);
        self
    }

    /// Check names and the rules each kind of declaration imposes.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.is_anonymous() {
            return Err(Error::argument(
                "anonymous classes can only be used inside code",
            ));
        }
        if let Some(reason) = validate_identifier(&self.name) {
            return Err(Error::invalid_name(&self.name, "type name", reason));
        }
        for variable in &self.type_variables {
            if let Some(reason) = validate_identifier(variable.name()) {
                return Err(Error::invalid_name(variable.name(), "type variable", reason));
            }
        }
        if self.superclass.is_some() && self.kind != TypeKind::Class {
            return Err(Error::argument(format!(
                "{} '{}' cannot have a superclass",
                self.kind.keyword(),
                self.name
            )));
        }
        if self.kind == TypeKind::Annotation && !self.superinterfaces.is_empty() {
            return Err(Error::argument(format!(
                "annotation type '{}' cannot extend interfaces",
                self.name
            )));
        }
        for annotation in &self.annotations {
            annotation.validate()?;
        }
        self.validate_members(self.kind)?;

        let mut names = BTreeSet::new();
        for nested in &self.types {
            nested.validate()?;
            if nested.name == self.name || !names.insert(nested.name.as_str()) {
                return Err(Error::argument(format!(
                    "member type '{}' of '{}' clashes with another type name",
                    nested.name, self.name
                )));
            }
        }
        Ok(())
    }

    fn validate_members(&self, kind: TypeKind) -> Result<()> {
        if !self.enum_constants.is_empty() && kind != TypeKind::Enum {
            return Err(Error::argument(format!(
                "only enums have constants, '{}' is a {}",
                self.name,
                kind.keyword()
            )));
        }
        if kind.is_interface_like()
            && (!self.static_block.is_empty() || !self.initializer_block.is_empty())
        {
            return Err(Error::argument(format!(
                "{} '{}' cannot have initializer blocks",
                kind.keyword(),
                self.name
            )));
        }
        if kind == TypeKind::Anonymous && !self.types.is_empty() {
            return Err(Error::argument(
                "anonymous class bodies cannot declare member types",
            ));
        }
        for constant in &self.enum_constants {
            constant.validate()?;
        }
        for field in &self.fields {
            field.validate()?;
        }
        for method in &self.methods {
            method.validate(kind)?;
        }
        Ok(())
    }

    /// Lower a named declaration whose identity is `class`.
    pub(crate) fn lower(&self, class: &ClassName, implicit: &[Modifier]) -> Notation {
        let mut clauses = Vec::new();
        let mut clause = |keyword: &str, types: &[TypeName]| {
            if types.is_empty() {
                return;
            }
            clauses.push(wrap());
            clauses.push(Notation::text(format!("{keyword} ")));
            clauses.push(Notation::join(
                types.iter().map(Renderable::to_notation),
                Notation::text(", "),
            ));
        };
        match self.kind {
            TypeKind::Class | TypeKind::Anonymous => {
                let superclass: Vec<TypeName> = self
                    .superclass
                    .iter()
                    .filter(|superclass| **superclass != TypeName::object())
                    .cloned()
                    .collect();
                clause("extends", &superclass);
                clause("implements", &self.superinterfaces);
            }
            TypeKind::Interface => clause("extends", &self.superinterfaces),
            TypeKind::Enum => clause("implements", &self.superinterfaces),
            TypeKind::Annotation => {}
        }

        let header = Notation::concat([
            modifier_list(&self.modifiers, implicit),
            Notation::text(format!("{} {}", self.kind.keyword(), self.name)),
            type_parameters(&self.type_variables),
            Notation::hoist(clauses),
            Notation::text(" "),
            braces(self.body(Some(class), self.kind)),
        ]);
        let scope = Scope::Type {
            class: class.clone(),
            type_variables: self
                .type_variables
                .iter()
                .map(|variable| variable.name().to_string())
                .collect(),
        };
        Notation::concat([
            javadoc(self.javadoc.as_ref()),
            annotation_lines(&self.annotations),
            Notation::scoped(header, scope),
        ])
    }

    /// `new Supertype(arguments) { … }`
    fn lower_anonymous(&self) -> Notation {
        let supertype = self
            .superclass
            .clone()
            .or_else(|| self.superinterfaces.first().cloned())
            .unwrap_or_else(TypeName::object);
        Notation::concat([
            Notation::text("new "),
            supertype.to_notation(),
            Notation::text("("),
            self.anonymous_arguments.to_notation(),
            Notation::text(") "),
            Notation::scoped(braces(self.body(None, TypeKind::Anonymous)), Scope::Anonymous),
        ])
    }

    /// Members in declaration order: constants, static fields, the static
    /// block, instance fields, the initializer block, constructors, methods,
    /// member types.
    fn body(&self, class: Option<&ClassName>, kind: TypeKind) -> Notation {
        let field_implicit = kind.implicit_field_modifiers();
        let is_static = |field: &&FieldSpec| field.is_static() || kind.is_interface_like();

        let mut items = Vec::new();
        for field in self.fields.iter().filter(is_static) {
            items.push(field.lower(field_implicit));
        }
        if !self.static_block.is_empty() {
            items.push(Notation::text("static ").then(braces(self.static_block.to_notation())));
        }
        for field in self.fields.iter().filter(|field| !is_static(field)) {
            items.push(field.lower(field_implicit));
        }
        if !self.initializer_block.is_empty() {
            items.push(braces(self.initializer_block.to_notation()));
        }
        let (constructors, methods): (Vec<&MethodSpec>, Vec<&MethodSpec>) =
            self.methods.iter().partition(|method| method.is_constructor());
        for method in constructors.into_iter().chain(methods) {
            items.push(method.lower(kind, &self.name));
        }
        if let Some(class) = class {
            for nested in &self.types {
                let implicit = kind.implicit_type_modifiers(nested.kind);
                items.push(nested.lower(&class.nested_class(&nested.name), &implicit));
            }
        }

        if !self.enum_constants.is_empty() {
            let mut constants = Notation::join(
                self.enum_constants.iter().map(EnumConstant::lower),
                Notation::text(",").then(Notation::line()),
            );
            if !items.is_empty() {
                constants = constants.then(Notation::text(";"));
            }
            items.insert(0, constants);
        }
        members(items)
    }
}

impl Renderable for TypeSpec {
    fn to_notation(&self) -> Notation {
        if self.is_anonymous() {
            self.lower_anonymous()
        } else {
            self.lower(&ClassName::new("", &self.name), &[])
        }
    }
}

#[cfg(test)]
mod tests {
    use quill_notation::{PrintOptions, Printer};

    use super::*;
    use crate::{Arg, ParameterSpec, Primitive};

    fn print(spec: &TypeSpec, width: usize) -> String {
        Printer::new(PrintOptions::default().with_width(width)).print(&spec.to_notation())
    }

    #[test]
    fn test_empty_class() {
        let spec = TypeSpec::class("Empty").modifiers([Modifier::Public, Modifier::Final]);
        assert_eq!(print(&spec, 100), "public final class Empty {\n}");
    }

    #[test]
    fn test_member_order_and_blank_lines() {
        let spec = TypeSpec::class("Counter")
            .method(MethodSpec::new("reset").code(CodeBlock::text("count = 0;")))
            .field(FieldSpec::new(Primitive::Int, "count").modifiers([Modifier::Private]))
            .method(MethodSpec::constructor())
            .field(
                FieldSpec::new(Primitive::Int, "LIMIT")
                    .modifiers([Modifier::Static, Modifier::Final])
                    .initializer(CodeBlock::text("10")),
            );
        assert_eq!(
            print(&spec, 100),
            "class Counter {\n  static final int LIMIT = 10;\n\n  private int count;\n\n  Counter() {\n  }\n\n  void reset() {\n    count = 0;\n  }\n}"
        );
    }

    #[test]
    fn test_interface_implicit_modifiers() {
        let spec = TypeSpec::interface("Shape")
            .modifiers([Modifier::Public])
            .field(
                FieldSpec::new(Primitive::Int, "SIDES")
                    .modifiers([Modifier::Public, Modifier::Static, Modifier::Final])
                    .initializer(CodeBlock::text("0")),
            )
            .method(
                MethodSpec::new("area")
                    .modifiers([Modifier::Public, Modifier::Abstract])
                    .returns(Primitive::Double),
            )
            .nested_type(TypeSpec::class("Unit").modifiers([Modifier::Public, Modifier::Static]));
        assert_eq!(
            print(&spec, 100),
            "public interface Shape {\n  int SIDES = 0;\n\n  double area();\n\n  class Unit {\n  }\n}"
        );
    }

    #[test]
    fn test_enum_constants() {
        let spec = TypeSpec::enumeration("Color")
            .enum_constant(EnumConstant::new("RED"))
            .enum_constant(EnumConstant::new("GREEN"));
        assert_eq!(print(&spec, 100), "enum Color {\n  RED,\n  GREEN\n}");

        let spec = TypeSpec::enumeration("Planet")
            .enum_constant(EnumConstant::new("EARTH").arguments(CodeBlock::text("1.0")))
            .field(FieldSpec::new(Primitive::Double, "mass").modifiers([Modifier::Final]))
            .method(
                MethodSpec::constructor()
                    .parameter(ParameterSpec::new(Primitive::Double, "mass"))
                    .code(CodeBlock::text("this.mass = mass;")),
            );
        assert_eq!(
            print(&spec, 100),
            "enum Planet {\n  EARTH(1.0);\n\n  final double mass;\n\n  Planet(double mass) {\n    this.mass = mass;\n  }\n}"
        );
    }

    #[test]
    fn test_supertypes_wrap_together() {
        let spec = TypeSpec::class("Service")
            .superclass(ClassName::new("com.example", "AbstractService"))
            .superinterface(ClassName::new("java.lang", "Runnable"))
            .superinterface(ClassName::new("java.io", "Closeable"));
        assert_eq!(
            print(&spec, 100),
            "class Service extends com.example.AbstractService implements java.lang.Runnable, java.io.Closeable {\n}"
        );
        assert_eq!(
            print(&spec, 60),
            "class Service\n    extends com.example.AbstractService\n    implements java.lang.Runnable, java.io.Closeable {\n}"
        );
    }

    #[test]
    fn test_anonymous_class_in_code() {
        let runnable = TypeSpec::anonymous(CodeBlock::default())
            .superinterface(ClassName::new("java.lang", "Runnable"))
            .method(
                MethodSpec::new("run")
                    .modifiers([Modifier::Public])
                    .code(CodeBlock::text("work();")),
            );
        let block = CodeBlock::builder()
            .add_statement("$T task = $L", [
                Arg::from(ClassName::new("java.lang", "Runnable")),
                Arg::from(&runnable),
            ])
            .build()
            .unwrap();
        assert_eq!(
            block.to_string(),
            "java.lang.Runnable task = new java.lang.Runnable() {\n  public void run() {\n    work();\n  }\n};\n"
        );
    }

    #[test]
    fn test_validation() {
        assert!(TypeSpec::class("Ok").validate().is_ok());
        assert!(TypeSpec::class("class").validate().is_err());
        assert!(
            TypeSpec::interface("I")
                .superclass(ClassName::object())
                .validate()
                .is_err()
        );
        assert!(
            TypeSpec::class("C")
                .enum_constant(EnumConstant::new("A"))
                .validate()
                .is_err()
        );
        assert!(
            TypeSpec::class("Outer")
                .nested_type(TypeSpec::class("Outer"))
                .validate()
                .is_err()
        );
        assert!(TypeSpec::anonymous(CodeBlock::default()).validate().is_err());
    }
}
