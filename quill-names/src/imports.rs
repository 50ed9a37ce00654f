//! Import declarations and their ordering.

use std::{cmp::Ordering, collections::BTreeSet, fmt};

use quill_core::{ClassName, Error, Result, validate_identifier};

/// Compare dotted paths segment by segment.
///
/// When one path is a prefix of the other, the longer path sorts first, so
/// `a.b.c` comes before `a.b`.
pub fn compare_paths(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (Some(l), Some(r)) => match l.cmp(r) {
                Ordering::Equal => continue,
                other => return other,
            },
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => return Ordering::Equal,
        }
    }
}

/// A dotted path ordered by [`compare_paths`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportPath(String);

impl ImportPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for ImportPath {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_paths(&self.0, &other.0)
    }
}

impl PartialOrd for ImportPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A requested static import: `class.member`, or `class.*` for every member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StaticImport {
    class: ClassName,
    member: String,
}

impl StaticImport {
    const WILDCARD: &'static str = "*";

    pub fn new(class: ClassName, member: impl Into<String>) -> Self {
        Self {
            class,
            member: member.into(),
        }
    }

    /// Import every static member of `class`.
    pub fn wildcard(class: ClassName) -> Self {
        Self::new(class, Self::WILDCARD)
    }

    /// Parse `java.util.Collections.emptyList` or `java.util.Collections.*`.
    pub fn parse(text: &str) -> Result<Self> {
        let Some((class, member)) = text.rsplit_once('.') else {
            return Err(Error::invalid_name(
                text,
                "static import",
                "expected a class name followed by '.member' or '.*'",
            ));
        };
        if member != Self::WILDCARD {
            if let Some(reason) = validate_identifier(member) {
                return Err(Error::invalid_name(text, "static import", reason));
            }
        }
        Ok(Self::new(ClassName::parse(class)?, member))
    }

    pub fn class(&self) -> &ClassName {
        &self.class
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn is_wildcard(&self) -> bool {
        self.member == Self::WILDCARD
    }

    /// Whether this import makes `class.member` usable bare.
    pub fn covers(&self, class: &ClassName, member: &str) -> bool {
        self.class == *class && (self.is_wildcard() || self.member == member)
    }

    pub fn path(&self) -> ImportPath {
        ImportPath(format!("{}.{}", self.class.canonical_name(), self.member))
    }
}

impl fmt::Display for StaticImport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class.canonical_name(), self.member)
    }
}

/// Tracks the imports of one file and keeps them sorted.
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    plain: BTreeSet<ImportPath>,
    statics: BTreeSet<ImportPath>,
}

impl ImportSet {
    /// Create a new empty import set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Import a class by its canonical name.
    pub fn add(&mut self, class: &ClassName) {
        self.plain.insert(ImportPath(class.canonical_name()));
    }

    /// Add a static import.
    pub fn add_static(&mut self, import: &StaticImport) {
        self.statics.insert(import.path());
    }

    /// Check if a class is imported.
    pub fn contains(&self, class: &ClassName) -> bool {
        self.plain.contains(&ImportPath(class.canonical_name()))
    }

    /// Plain imports in order.
    pub fn plain(&self) -> impl Iterator<Item = &str> {
        self.plain.iter().map(ImportPath::as_str)
    }

    /// Static imports in order.
    pub fn statics(&self) -> impl Iterator<Item = &str> {
        self.statics.iter().map(ImportPath::as_str)
    }

    /// Import declarations, plain imports before static imports.
    pub fn declarations(&self) -> impl Iterator<Item = String> + '_ {
        self.plain()
            .map(|path| format!("import {path};"))
            .chain(self.statics().map(|path| format!("import static {path};")))
    }

    pub fn is_empty(&self) -> bool {
        self.plain.is_empty() && self.statics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.plain.len() + self.statics.len()
    }
}
