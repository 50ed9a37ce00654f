//! Java type names.
//!
//! [`TypeName`] is a closed sum type with one variant per kind of type the
//! generator can print. Consumers match on it exhaustively; there is no
//! open extension point.

use std::fmt;

use quill_core::{ClassName, Error, Result, validate_identifier};
use quill_notation::{Notation, Renderable};

use crate::AnnotationSpec;

/// A primitive type keyword, including `void`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub const ALL: [Primitive; 9] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Char,
        Self::Float,
        Self::Double,
        Self::Void,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Char => "char",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == keyword)
    }

    fn boxed_name(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Int => "Integer",
            Self::Long => "Long",
            Self::Char => "Character",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Void => "Void",
        }
    }

    /// The `java.lang` wrapper class.
    pub fn boxed(&self) -> ClassName {
        ClassName::java_lang(self.boxed_name())
    }
}

/// A type variable with its bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeVariable {
    name: String,
    bounds: Vec<TypeName>,
}

impl TypeVariable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    /// Add an upper bound.
    pub fn bound(mut self, bound: impl Into<TypeName>) -> Self {
        let bound = bound.into();
        if bound != TypeName::object() {
            self.bounds.push(bound);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &[TypeName] {
        &self.bounds
    }

    /// The declaration form, `T extends Comparable<T> & Serializable`.
    pub fn declaration(&self) -> Notation {
        let name = Notation::text(&self.name);
        if self.bounds.is_empty() {
            return name;
        }
        let bounds = Notation::join(
            self.bounds.iter().map(Renderable::to_notation),
            Notation::text(" & "),
        );
        name.then(Notation::text(" extends ")).then(bounds)
    }
}

/// A bounded wildcard. The unbounded `?` is `Extends(Object)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Wildcard {
    Extends(Box<TypeName>),
    Super(Box<TypeName>),
}

/// Any type that can appear in a declaration or code block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Primitive(Primitive),
    Class(ClassName),
    Array(Box<TypeName>),
    /// `raw<args>`, optionally nested in a parameterized owner such as
    /// `Outer<String>.Inner<Integer>`.
    Parameterized {
        owner: Option<Box<TypeName>>,
        raw: ClassName,
        args: Vec<TypeName>,
    },
    Variable(TypeVariable),
    Wildcard(Wildcard),
    Annotated {
        annotations: Vec<AnnotationSpec>,
        inner: Box<TypeName>,
    },
}

impl TypeName {
    /// `java.lang.Object`
    pub fn object() -> Self {
        Self::Class(ClassName::object())
    }

    /// `java.lang.String`
    pub fn string() -> Self {
        Self::Class(ClassName::string())
    }

    pub fn void() -> Self {
        Self::Primitive(Primitive::Void)
    }

    /// `component[]`
    pub fn array_of(component: impl Into<TypeName>) -> Self {
        Self::Array(Box::new(component.into()))
    }

    /// `raw<args>`
    pub fn parameterized(raw: ClassName, args: impl IntoIterator<Item = TypeName>) -> Self {
        Self::Parameterized {
            owner: None,
            raw,
            args: args.into_iter().collect(),
        }
    }

    /// A use of the type variable `name`.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(TypeVariable::new(name))
    }

    /// `? extends bound`
    pub fn subtype_of(bound: impl Into<TypeName>) -> Self {
        Self::Wildcard(Wildcard::Extends(Box::new(bound.into())))
    }

    /// `? super bound`
    pub fn supertype_of(bound: impl Into<TypeName>) -> Self {
        Self::Wildcard(Wildcard::Super(Box::new(bound.into())))
    }

    /// `?`
    pub fn wildcard() -> Self {
        Self::subtype_of(Self::object())
    }

    /// This type with `annotations` added.
    pub fn annotated(self, annotations: impl IntoIterator<Item = AnnotationSpec>) -> Self {
        let added: Vec<AnnotationSpec> = annotations.into_iter().collect();
        if added.is_empty() {
            return self;
        }
        match self {
            Self::Annotated {
                mut annotations,
                inner,
            } => {
                annotations.extend(added);
                Self::Annotated { annotations, inner }
            }
            other => Self::Annotated {
                annotations: added,
                inner: Box::new(other),
            },
        }
    }

    /// This type with its type annotations stripped.
    pub fn without_annotations(&self) -> &TypeName {
        match self {
            Self::Annotated { inner, .. } => inner.without_annotations(),
            other => other,
        }
    }

    /// Whether this is a primitive other than `void`.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self.without_annotations(),
            Self::Primitive(p) if *p != Primitive::Void
        )
    }

    /// Whether this is one of the `java.lang` primitive wrappers.
    pub fn is_boxed_primitive(&self) -> bool {
        self.unboxed_primitive().is_some()
    }

    fn unboxed_primitive(&self) -> Option<Primitive> {
        match self.without_annotations() {
            Self::Class(class) if class.is_java_lang() && !class.is_nested() => Primitive::ALL
                .into_iter()
                .filter(|p| *p != Primitive::Void)
                .find(|p| p.boxed_name() == class.simple_name()),
            _ => None,
        }
    }

    /// The wrapper class for a primitive; other types are returned unchanged.
    pub fn box_type(&self) -> TypeName {
        match self {
            Self::Primitive(p) => Self::Class(p.boxed()),
            Self::Annotated { annotations, inner } => {
                inner.box_type().annotated(annotations.iter().cloned())
            }
            other => other.clone(),
        }
    }

    /// The primitive for a wrapper class; primitives are returned unchanged.
    pub fn unbox_type(&self) -> Result<TypeName> {
        match self {
            Self::Primitive(_) => Ok(self.clone()),
            Self::Annotated { annotations, inner } => {
                Ok(inner.unbox_type()?.annotated(annotations.iter().cloned()))
            }
            _ => match self.unboxed_primitive() {
                Some(p) => Ok(Self::Primitive(p)),
                None => Err(Error::argument(format!("cannot unbox {self}"))),
            },
        }
    }

    /// The component type of an array.
    pub fn array_component(&self) -> Option<&TypeName> {
        match self.without_annotations() {
            Self::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Parse a type written in source form.
    ///
    /// Accepts primitives, dotted class names with type arguments
    /// (`java.util.Map<java.lang.String, V>`), nested parameterized owners,
    /// wildcards and trailing `[]`. A bare identifier without a package, such
    /// as `T`, is a type variable.
    pub fn parse(text: &str) -> Result<TypeName> {
        let tokens = tokenize(text)?;
        let mut parser = Parser {
            source: text,
            tokens,
            pos: 0,
        };
        let parsed = parser.parse_type()?;
        if parser.pos < parser.tokens.len() {
            return Err(parser.error("unexpected input after the type"));
        }
        Ok(parsed)
    }
}

impl From<ClassName> for TypeName {
    fn from(class: ClassName) -> Self {
        Self::Class(class)
    }
}

impl From<&ClassName> for TypeName {
    fn from(class: &ClassName) -> Self {
        Self::Class(class.clone())
    }
}

impl From<Primitive> for TypeName {
    fn from(primitive: Primitive) -> Self {
        Self::Primitive(primitive)
    }
}

impl From<TypeVariable> for TypeName {
    fn from(variable: TypeVariable) -> Self {
        Self::Variable(variable)
    }
}

impl Renderable for TypeName {
    fn to_notation(&self) -> Notation {
        match self {
            Self::Primitive(p) => Notation::text(p.keyword()),
            Self::Class(class) => Notation::type_ref(class.clone()),
            Self::Array(component) => component.to_notation().then(Notation::text("[]")),
            Self::Parameterized { owner, raw, args } => {
                let head = match owner {
                    Some(owner) => owner
                        .to_notation()
                        .then(Notation::text(format!(".{}", raw.simple_name()))),
                    None => Notation::type_ref(raw.clone()),
                };
                if args.is_empty() {
                    return head;
                }
                Notation::concat([
                    head,
                    Notation::text("<"),
                    Notation::join(args.iter().map(Renderable::to_notation), Notation::text(", ")),
                    Notation::text(">"),
                ])
            }
            Self::Variable(variable) => Notation::text(variable.name()),
            Self::Wildcard(Wildcard::Extends(bound)) => {
                if **bound == Self::object() {
                    Notation::text("?")
                } else {
                    Notation::text("? extends ").then(bound.to_notation())
                }
            }
            Self::Wildcard(Wildcard::Super(bound)) => {
                Notation::text("? super ").then(bound.to_notation())
            }
            Self::Annotated { annotations, inner } => Notation::concat(
                annotations
                    .iter()
                    .map(|annotation| annotation.inline().then(Notation::text(" ")))
                    .chain([inner.to_notation()]),
            ),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notation())
    }
}

/// `<K, V extends Comparable<V>>`, or nothing.
pub(crate) fn type_parameters(variables: &[TypeVariable]) -> Notation {
    if variables.is_empty() {
        return Notation::empty();
    }
    Notation::concat([
        Notation::text("<"),
        Notation::join(
            variables.iter().map(TypeVariable::declaration),
            Notation::text(", "),
        ),
        Notation::text(">"),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Punct(char),
}

fn tokenize(text: &str) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if c.is_alphabetic() || c == '_' || c == '$' {
            let mut end = start + c.len_utf8();
            while let Some(&(i, next)) = chars.peek() {
                if !(next.is_alphanumeric() || next == '_' || next == '$') {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
            tokens.push(Token::Ident(&text[start..end]));
        } else if ".<>,[]?".contains(c) {
            tokens.push(Token::Punct(c));
        } else {
            return Err(Error::invalid_name(
                text,
                "type name",
                format!("unexpected character '{c}'"),
            ));
        }
    }
    if tokens.is_empty() {
        return Err(Error::invalid_name(text, "type name", "type names cannot be empty"));
    }
    Ok(tokens)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, reason: impl Into<String>) -> Box<Error> {
        Error::invalid_name(self.source, "type name", reason)
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn eat(&mut self, punct: char) -> bool {
        if self.peek() == Some(Token::Punct(punct)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: char) -> Result<()> {
        if self.eat(punct) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{punct}'")))
        }
    }

    fn ident(&mut self) -> Result<&'a str> {
        match self.peek() {
            Some(Token::Ident(ident)) => {
                self.pos += 1;
                Ok(ident)
            }
            _ => Err(self.error("expected an identifier")),
        }
    }

    fn parse_type(&mut self) -> Result<TypeName> {
        let mut parsed = if self.eat('?') {
            self.parse_wildcard()?
        } else {
            self.parse_named()?
        };
        while self.eat('[') {
            self.expect(']')?;
            parsed = TypeName::array_of(parsed);
        }
        Ok(parsed)
    }

    fn parse_wildcard(&mut self) -> Result<TypeName> {
        match self.peek() {
            Some(Token::Ident("extends")) => {
                self.pos += 1;
                Ok(TypeName::subtype_of(self.parse_type()?))
            }
            Some(Token::Ident("super")) => {
                self.pos += 1;
                Ok(TypeName::supertype_of(self.parse_type()?))
            }
            _ => Ok(TypeName::wildcard()),
        }
    }

    fn parse_named(&mut self) -> Result<TypeName> {
        let mut segments: Vec<(&str, Option<Vec<TypeName>>)> = Vec::new();
        loop {
            let name = self.ident()?;
            let args = if self.eat('<') {
                Some(self.parse_args()?)
            } else {
                None
            };
            segments.push((name, args));
            if !self.eat('.') {
                break;
            }
        }

        if let [(name, None)] = segments.as_slice() {
            if let Some(primitive) = Primitive::from_keyword(name) {
                return Ok(TypeName::Primitive(primitive));
            }
            if let Some(reason) = validate_identifier(name) {
                return Err(self.error(reason));
            }
            return Ok(TypeName::variable(*name));
        }

        let dotted: Vec<&str> = segments.iter().map(|(name, _)| *name).collect();
        let class = ClassName::parse(&dotted.join("."))?;
        let package_len = segments.len() - class.depth();
        if segments[..package_len].iter().any(|(_, args)| args.is_some()) {
            return Err(self.error("type arguments are only allowed on class names"));
        }

        let mut owner: Option<TypeName> = None;
        for (i, (_, args)) in segments.into_iter().skip(package_len).enumerate() {
            let raw = class.enclosing_at(i + 1);
            owner = match (owner, args) {
                (None, None) => None,
                (owner, args) => Some(TypeName::Parameterized {
                    owner: owner.map(Box::new),
                    raw,
                    args: args.unwrap_or_default(),
                }),
            };
        }
        Ok(owner.unwrap_or(TypeName::Class(class)))
    }

    fn parse_args(&mut self) -> Result<Vec<TypeName>> {
        let mut args = Vec::new();
        loop {
            let arg = self.parse_type()?;
            if arg.is_primitive() || arg == TypeName::void() {
                return Err(self.error("primitive types cannot be type arguments"));
            }
            args.push(arg);
            if !self.eat(',') {
                break;
            }
        }
        self.expect('>')?;
        Ok(args)
    }
}
