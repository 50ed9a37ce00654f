//! The manifest schema.
//!
//! Types, modifiers and code are written as Java source text and checked
//! during validation; conversion to declarations happens afterwards.

use std::collections::BTreeMap;

use serde::Deserialize;

/// File-level options, the `[file]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Package of the generated type, empty for the default package
    #[serde(default)]
    pub package: String,

    /// Comment printed at the top of the file
    pub comment: Option<String>,

    /// Spaces per indentation level, or `"tab"`
    pub indent: Option<IndentSetting>,

    /// Column budget
    pub width: Option<usize>,

    /// Rely on the implicit `java.lang` import
    #[serde(default)]
    pub skip_java_lang_imports: bool,

    /// Simple names that are never imported
    #[serde(default)]
    pub always_qualify: Vec<String>,

    /// Static imports such as `java.util.Collections.sort` or `org.junit.Assert.*`
    #[serde(default)]
    pub static_imports: Vec<String>,
}

/// An indentation setting.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IndentSetting {
    Spaces(u8),
    Named(String),
}

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindDecl {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

/// A type declaration, the `[type]` table and its nested `[[type.types]]`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    pub name: String,

    #[serde(default)]
    pub kind: KindDecl,

    #[serde(default)]
    pub modifiers: Vec<String>,

    pub javadoc: Option<CodeDecl>,

    #[serde(default)]
    pub annotations: Vec<AnnotationDecl>,

    #[serde(default)]
    pub type_variables: Vec<TypeVariableDecl>,

    pub superclass: Option<String>,

    /// Implemented interfaces, or extended interfaces of an interface
    #[serde(default)]
    pub interfaces: Vec<String>,

    /// Enum constants
    #[serde(default)]
    pub constants: Vec<ConstantDecl>,

    #[serde(default)]
    pub fields: Vec<FieldDecl>,

    /// Statements of the `static { … }` block
    #[serde(default)]
    pub static_block: Vec<CodeDecl>,

    #[serde(default)]
    pub methods: Vec<MethodDecl>,

    /// Member types
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

/// A type variable: a bare name, or a name with bounds.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TypeVariableDecl {
    Name(String),
    Bounded {
        name: String,
        #[serde(default)]
        bounds: Vec<String>,
    },
}

impl TypeVariableDecl {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Bounded { name, .. } => name,
        }
    }

    pub fn bounds(&self) -> &[String] {
        match self {
            Self::Name(_) => &[],
            Self::Bounded { bounds, .. } => bounds,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotationDecl {
    /// Canonical name of the annotation type
    #[serde(rename = "type")]
    pub ty: String,

    /// Member values; a list prints as an array
    #[serde(default)]
    pub members: BTreeMap<String, OneOrMany<CodeDecl>>,
}

/// A single value or a list of values.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Self::Many(values) => values.iter(),
            Self::One(value) => std::slice::from_ref(value).iter(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantDecl {
    pub name: String,

    pub javadoc: Option<CodeDecl>,

    /// Constructor arguments
    pub arguments: Option<CodeDecl>,

    /// Methods of the constant's class body
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default)]
    pub modifiers: Vec<String>,

    pub javadoc: Option<CodeDecl>,

    #[serde(default)]
    pub annotations: Vec<AnnotationDecl>,

    pub initializer: Option<CodeDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDecl {
    /// Method name; omitted for constructors
    pub name: Option<String>,

    #[serde(default)]
    pub constructor: bool,

    #[serde(default)]
    pub modifiers: Vec<String>,

    pub javadoc: Option<CodeDecl>,

    #[serde(default)]
    pub annotations: Vec<AnnotationDecl>,

    #[serde(default)]
    pub type_variables: Vec<TypeVariableDecl>,

    /// Return type, `void` when omitted
    pub returns: Option<String>,

    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,

    /// Whether the last parameter is variable arity
    #[serde(default)]
    pub varargs: bool,

    #[serde(default)]
    pub exceptions: Vec<String>,

    /// Body statements, each terminated with `;`
    #[serde(default)]
    pub statements: Vec<CodeDecl>,

    /// Body code added as written, after the statements
    pub code: Option<CodeDecl>,

    /// Default value of an annotation type element
    pub default: Option<CodeDecl>,
}

impl MethodDecl {
    /// The name used in messages.
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) if !self.constructor => name,
            _ => "constructor",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDecl {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default)]
    pub modifiers: Vec<String>,

    #[serde(default)]
    pub annotations: Vec<AnnotationDecl>,
}

/// Code: a template with no arguments, or a template with arguments.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CodeDecl {
    Text(String),
    Template {
        format: String,
        #[serde(default)]
        args: Vec<ArgDecl>,
    },
}

impl CodeDecl {
    pub fn format(&self) -> &str {
        match self {
            Self::Text(format) | Self::Template { format, .. } => format,
        }
    }

    pub fn args(&self) -> &[ArgDecl] {
        match self {
            Self::Text(_) => &[],
            Self::Template { args, .. } => args,
        }
    }
}

/// A template argument, `{ literal = "…" }`, `{ name = "…" }`,
/// `{ string = "…" }` or `{ type = "…" }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgDecl {
    Literal(String),
    Name(String),
    String(String),
    Type(String),
}

impl ArgDecl {
    /// The manifest key the argument was written with.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Name(_) => "name",
            Self::String(_) => "string",
            Self::Type(_) => "type",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Literal(value) | Self::Name(value) | Self::String(value) | Self::Type(value) => {
                value
            }
        }
    }

    /// Whether the argument can fill a `$L`, `$N`, `$S` or `$T` placeholder.
    pub fn fits(&self, placeholder: char) -> bool {
        matches!(
            (placeholder, self),
            ('L', _) | ('N', Self::Name(_)) | ('S', Self::String(_)) | ('T', Self::Type(_))
        )
    }
}
