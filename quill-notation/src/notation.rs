//! The document tree.

use std::{
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};

use quill_core::ClassName;

use crate::{CanonicalNames, NameLookup, Printer};

/// An immutable, structurally shared layout document.
///
/// Notations are cheap to clone and never change once built. Every combinator
/// returns a new notation and leaves its inputs untouched, so the same
/// sub-document can appear in several places (and in both alternatives of a
/// choice) without copying.
///
/// Two notations are equal when they print the same text with canonical type
/// names, regardless of how they were assembled.
#[derive(Clone)]
pub struct Notation(Rc<Node>);

struct Node {
    kind: Kind,
    measure: Measure,
}

/// The shape of a notation node.
#[derive(Debug)]
pub enum Kind {
    /// Renders nothing; identity for concatenation.
    Empty,
    /// Literal text without line breaks.
    Text(Box<str>),
    /// A mandatory line break.
    Line,
    /// Sequential composition.
    Concat(Vec<Notation>),
    /// Two alternatives of which exactly one is printed.
    Choice { flat: Notation, broken: Notation },
    /// Increases the indentation of line breaks inside `inner`.
    Indent { inner: Notation, margin: Margin },
    /// A single logical statement; continuation lines get a double indent.
    Statement(Notation),
    /// A reference to a declared type, printed by its display name.
    TypeRef(ClassName),
    /// A reference to a static member, printed bare or qualified.
    StaticImportRef { class: ClassName, member: String },
    /// Content that is never compiled, such as documentation.
    Suppressed(Notation),
    /// Content belonging to a nested declaration scope.
    Scoped { inner: Notation, scope: Scope },
}

/// What an [`Kind::Indent`] adds to the line prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Margin {
    /// One indentation unit.
    Unit,
    /// A literal marker such as `" * "` inside a block comment.
    Marker(Box<str>),
}

/// A nesting level in the scope tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// A named type declaration. Its member types and type variables are
    /// visible inside.
    Type {
        class: ClassName,
        type_variables: Vec<String>,
    },
    /// A generic method or constructor.
    Member { type_variables: Vec<String> },
    /// An anonymous class body.
    Anonymous,
    /// A brace block inside code, such as a lambda body.
    Block,
}

impl Scope {
    /// The simple name the scope declares, if any.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Self::Type { class, .. } => Some(class.simple_name()),
            Self::Member { .. } | Self::Anonymous | Self::Block => None,
        }
    }

    /// Type variables introduced by the scope.
    pub fn type_variables(&self) -> &[String] {
        match self {
            Self::Type { type_variables, .. } | Self::Member { type_variables } => type_variables,
            Self::Anonymous | Self::Block => &[],
        }
    }
}

/// Layout facts computed once when a node is built.
///
/// Choice points are measured by their flat alternative, so `width` is the
/// column count the node occupies on the current line if every choice before
/// the first mandatory break goes flat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Measure {
    /// Columns up to the first mandatory break (or the whole node).
    pub width: usize,
    /// Whether the node contains a mandatory break outside broken alternatives.
    pub breaks: bool,
    /// Whether an undecided choice appears before the first mandatory break.
    pub choices: bool,
    /// Whether the node contains unresolved type or static references.
    pub refs: bool,
}

impl Measure {
    fn of(kind: &Kind) -> Self {
        match kind {
            Kind::Empty => Self::default(),
            Kind::Text(text) => Self {
                width: text.chars().count(),
                ..Self::default()
            },
            Kind::Line => Self {
                breaks: true,
                ..Self::default()
            },
            Kind::Concat(items) => {
                let mut measure = Self::default();
                for item in items {
                    let item = item.measure();
                    measure.refs |= item.refs;
                    if !measure.breaks {
                        measure.width += item.width;
                        measure.choices |= item.choices;
                        measure.breaks = item.breaks;
                    }
                }
                measure
            }
            Kind::Choice { flat, broken } => {
                let measure = flat.measure();
                Self {
                    width: measure.width,
                    breaks: measure.breaks,
                    choices: true,
                    refs: measure.refs || broken.measure().refs,
                }
            }
            Kind::Indent { inner, .. }
            | Kind::Statement(inner)
            | Kind::Suppressed(inner)
            | Kind::Scoped { inner, .. } => inner.measure(),
            Kind::TypeRef(class) => Self {
                width: class.canonical_name().chars().count(),
                refs: true,
                ..Self::default()
            },
            Kind::StaticImportRef { class, member } => Self {
                width: class.canonical_name().chars().count() + 1 + member.chars().count(),
                refs: true,
                ..Self::default()
            },
        }
    }
}

impl Notation {
    pub(crate) fn from_kind(kind: Kind) -> Self {
        let measure = Measure::of(&kind);
        Self(Rc::new(Node { kind, measure }))
    }

    /// The node's shape.
    pub fn kind(&self) -> &Kind {
        &self.0.kind
    }

    /// The node's precomputed layout facts.
    pub fn measure(&self) -> Measure {
        self.0.measure
    }

    /// Whether the notation renders nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind(), Kind::Empty)
    }

    /// An empty notation.
    pub fn empty() -> Self {
        Self::from_kind(Kind::Empty)
    }

    /// Literal text. Embedded `\n` characters become mandatory line breaks.
    pub fn text(text: impl AsRef<str>) -> Self {
        let text = text.as_ref();
        if !text.contains('\n') {
            return Self::leaf(text);
        }
        let mut parts = Vec::new();
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                parts.push(Self::line());
            }
            parts.push(Self::leaf(part));
        }
        Self::concat(parts)
    }

    fn leaf(text: &str) -> Self {
        if text.is_empty() {
            Self::empty()
        } else {
            Self::from_kind(Kind::Text(text.into()))
        }
    }

    /// A mandatory line break.
    pub fn line() -> Self {
        Self::from_kind(Kind::Line)
    }

    /// A placeholder for a type, substituted by [`Notation::resolve`].
    pub fn type_ref(class: ClassName) -> Self {
        Self::from_kind(Kind::TypeRef(class))
    }

    /// A placeholder for `class.member`, printed bare when statically imported.
    pub fn static_ref(class: ClassName, member: impl Into<String>) -> Self {
        Self::from_kind(Kind::StaticImportRef {
            class,
            member: member.into(),
        })
    }

    /// `self` followed by `next`.
    pub fn then(self, next: Notation) -> Self {
        if self.is_empty() {
            return next;
        }
        if next.is_empty() {
            return self;
        }
        Self::concat([self, next])
    }

    /// Concatenate notations left to right.
    pub fn concat(items: impl IntoIterator<Item = Notation>) -> Self {
        let mut parts = Vec::new();
        for item in items {
            match item.kind() {
                Kind::Empty => {}
                Kind::Concat(inner) => parts.extend(inner.iter().cloned()),
                _ => parts.push(item),
            }
        }
        match parts.len() {
            0 => Self::empty(),
            1 => parts.pop().unwrap_or_else(Self::empty),
            _ => Self::from_kind(Kind::Concat(parts)),
        }
    }

    /// A choice printing `self` when it fits and `broken` otherwise.
    ///
    /// `self` should be the compact alternative. A flat alternative that
    /// contains a mandatory break is measured up to that break.
    pub fn or(self, broken: Notation) -> Self {
        Self::from_kind(Kind::Choice { flat: self, broken })
    }

    /// Indent line breaks inside `inner` by one unit.
    pub fn indent(inner: Notation) -> Self {
        if inner.is_empty() {
            return inner;
        }
        Self::from_kind(Kind::Indent {
            inner,
            margin: Margin::Unit,
        })
    }

    /// Prefix every line started inside `inner` with `marker`, e.g. `" * "`.
    ///
    /// The marker is written with trailing whitespace trimmed on blank lines.
    pub fn margin(inner: Notation, marker: impl Into<Box<str>>) -> Self {
        if inner.is_empty() {
            return inner;
        }
        Self::from_kind(Kind::Indent {
            inner,
            margin: Margin::Marker(marker.into()),
        })
    }

    /// Mark `inner` as one statement.
    pub fn statement(inner: Notation) -> Self {
        if inner.is_empty() {
            return inner;
        }
        Self::from_kind(Kind::Statement(inner))
    }

    /// Exempt `inner` from import collection.
    pub fn suppressed(inner: Notation) -> Self {
        if inner.is_empty() {
            return inner;
        }
        Self::from_kind(Kind::Suppressed(inner))
    }

    /// Attach `inner` to a new nesting level of the scope tree.
    pub fn scoped(inner: Notation, scope: Scope) -> Self {
        Self::from_kind(Kind::Scoped { inner, scope })
    }

    /// Substitute every type and static reference with its display text.
    ///
    /// Subtrees without references are shared with the input.
    pub fn resolve(&self, names: &dyn NameLookup) -> Notation {
        if !self.measure().refs {
            return self.clone();
        }
        match self.kind() {
            Kind::TypeRef(class) => Self::text(names.type_name(class)),
            Kind::StaticImportRef { class, member } => {
                Self::text(names.static_member(class, member))
            }
            Kind::Concat(items) => {
                Self::from_kind(Kind::Concat(items.iter().map(|i| i.resolve(names)).collect()))
            }
            Kind::Choice { flat, broken } => Self::from_kind(Kind::Choice {
                flat: flat.resolve(names),
                broken: broken.resolve(names),
            }),
            Kind::Indent { inner, margin } => Self::from_kind(Kind::Indent {
                inner: inner.resolve(names),
                margin: margin.clone(),
            }),
            Kind::Statement(inner) => Self::from_kind(Kind::Statement(inner.resolve(names))),
            Kind::Suppressed(inner) => Self::from_kind(Kind::Suppressed(inner.resolve(names))),
            Kind::Scoped { inner, scope } => Self::from_kind(Kind::Scoped {
                inner: inner.resolve(names),
                scope: scope.clone(),
            }),
            Kind::Empty | Kind::Text(_) | Kind::Line => self.clone(),
        }
    }
}

impl Default for Notation {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&str> for Notation {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Notation {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolved = self.resolve(&CanonicalNames);
        f.write_str(&Printer::default().print(&resolved))
    }
}

impl fmt::Debug for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind().fmt(f)
    }
}

impl PartialEq for Notation {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.to_string() == other.to_string()
    }
}

impl Eq for Notation {}

impl Hash for Notation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_splits_lines() {
        let notation = Notation::text("a\nb");
        let Kind::Concat(items) = notation.kind() else {
            panic!("expected concat, got {notation:?}");
        };
        assert_eq!(items.len(), 3);
        assert!(matches!(items[1].kind(), Kind::Line));
        assert!(notation.measure().breaks);
        assert_eq!(notation.measure().width, 1);
    }

    #[test]
    fn test_empty_is_identity() {
        let a = Notation::text("a");
        assert!(matches!(a.clone().then(Notation::empty()).kind(), Kind::Text(_)));
        assert!(matches!(Notation::empty().then(a).kind(), Kind::Text(_)));
        assert!(Notation::text("").is_empty());
    }

    #[test]
    fn test_measure_stops_at_break() {
        let notation = Notation::concat([
            Notation::text("abc"),
            Notation::line(),
            Notation::text("defgh").or(Notation::text("x")),
        ]);
        let measure = notation.measure();
        assert_eq!(measure.width, 3);
        assert!(measure.breaks);
        assert!(!measure.choices);
    }

    #[test]
    fn test_choice_measured_flat() {
        let notation = Notation::text("a, b").or(Notation::text("a,\nb"));
        assert_eq!(notation.measure().width, 4);
        assert!(!notation.measure().breaks);
        assert!(notation.measure().choices);
    }

    #[test]
    fn test_equality_by_rendered_text() {
        let a = Notation::text("ab");
        let b = Notation::text("a").then(Notation::text("b"));
        assert_eq!(a, b);
        assert_ne!(a, Notation::text("ba"));
    }

    #[test]
    fn test_display_uses_canonical_names() {
        let list = ClassName::new("java.util", "List");
        let notation = Notation::text("new ").then(Notation::type_ref(list));
        assert_eq!(notation.to_string(), "new java.util.List");
        assert!(notation.measure().refs);
    }

    #[test]
    fn test_resolve_shares_plain_subtrees() {
        let plain = Notation::text("int x");
        let notation = plain.clone().then(Notation::text(";"));
        let resolved = notation.resolve(&CanonicalNames);
        assert!(Rc::ptr_eq(&resolved.0, &notation.0));
    }

    #[test]
    fn test_scope_declared_name() {
        let scope = Scope::Type {
            class: ClassName::new("a", "Outer"),
            type_variables: vec!["T".to_string()],
        };
        assert_eq!(scope.declared_name(), Some("Outer"));
        assert_eq!(scope.type_variables(), ["T"]);
        assert_eq!(Scope::Anonymous.declared_name(), None);
    }
}
