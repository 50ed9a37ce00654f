//! Canonical class identities.

use std::fmt;

use crate::{Error, Result, identifiers::validate_identifier};

/// The fully qualified identity of a declared class, interface, enum or
/// annotation type.
///
/// A class name is a package plus a chain of simple names from the top-level
/// class down to the class itself, so `java.util.Map.Entry` is the package
/// `java.util` with the names `["Map", "Entry"]`. Equality, ordering and
/// hashing are by value, which makes class names stable map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName {
    package: String,
    simple_names: Vec<String>,
}

impl ClassName {
    /// The implicitly imported package.
    pub const JAVA_LANG: &'static str = "java.lang";

    /// Create a top-level class name.
    pub fn new(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            simple_names: vec![simple_name.into()],
        }
    }

    /// Create a class name from a package and a chain of simple names.
    ///
    /// Returns `None` when `simple_names` is empty.
    pub fn from_parts(
        package: impl Into<String>,
        simple_names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Option<Self> {
        let simple_names: Vec<String> = simple_names.into_iter().map(Into::into).collect();
        if simple_names.is_empty() {
            return None;
        }
        Some(Self {
            package: package.into(),
            simple_names,
        })
    }

    /// Create a class name in `java.lang`.
    pub fn java_lang(simple_name: impl Into<String>) -> Self {
        Self::new(Self::JAVA_LANG, simple_name)
    }

    /// `java.lang.Object`
    pub fn object() -> Self {
        Self::java_lang("Object")
    }

    /// `java.lang.String`
    pub fn string() -> Self {
        Self::java_lang("String")
    }

    /// Guess a class name from its canonical form.
    ///
    /// Leading segments that start with a lowercase letter form the package;
    /// the remaining segments are the nested simple names, e.g.
    /// `java.util.Map.Entry`.
    pub fn parse(canonical: &str) -> Result<Self> {
        let segments: Vec<&str> = canonical.split('.').collect();
        for segment in &segments {
            if let Some(reason) = validate_identifier(segment) {
                return Err(Error::invalid_name(canonical, "class name", reason));
            }
        }

        let split = segments
            .iter()
            .position(|s| s.chars().next().is_some_and(char::is_uppercase))
            .ok_or_else(|| {
                Error::invalid_name(
                    canonical,
                    "class name",
                    "couldn't find a simple name starting with an uppercase letter",
                )
            })?;

        Ok(Self {
            package: segments[..split].join("."),
            simple_names: segments[split..].iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Returns a class name for a member class of this class.
    pub fn nested_class(&self, name: impl Into<String>) -> Self {
        let mut simple_names = self.simple_names.clone();
        simple_names.push(name.into());
        Self {
            package: self.package.clone(),
            simple_names,
        }
    }

    /// Returns a class name sharing this class's enclosing class (or package).
    pub fn peer_class(&self, name: impl Into<String>) -> Self {
        let mut simple_names = self.simple_names.clone();
        if let Some(last) = simple_names.last_mut() {
            *last = name.into();
        }
        Self {
            package: self.package.clone(),
            simple_names,
        }
    }

    /// The class this class is nested in, or `None` for a top-level class.
    pub fn enclosing_class(&self) -> Option<Self> {
        if self.simple_names.len() < 2 {
            return None;
        }
        Some(Self {
            package: self.package.clone(),
            simple_names: self.simple_names[..self.simple_names.len() - 1].to_vec(),
        })
    }

    /// The outermost class of this class's nesting chain.
    pub fn top_level_class(&self) -> Self {
        self.enclosing_at(1)
    }

    /// The class at `depth` in the nesting chain (1 is the top-level class).
    ///
    /// Depths past the end return the class itself.
    pub fn enclosing_at(&self, depth: usize) -> Self {
        let depth = depth.clamp(1, self.simple_names.len());
        Self {
            package: self.package.clone(),
            simple_names: self.simple_names[..depth].to_vec(),
        }
    }

    /// The package name, empty for the default package.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The innermost simple name.
    pub fn simple_name(&self) -> &str {
        self.simple_names
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// The nesting chain of simple names, top-level first.
    pub fn simple_names(&self) -> &[String] {
        &self.simple_names
    }

    /// Number of classes in the nesting chain.
    pub fn depth(&self) -> usize {
        self.simple_names.len()
    }

    /// Whether this class is nested inside another class.
    pub fn is_nested(&self) -> bool {
        self.simple_names.len() > 1
    }

    /// Whether this class is in `java.lang`.
    pub fn is_java_lang(&self) -> bool {
        self.package == Self::JAVA_LANG
    }

    /// The dotted name of the nested chain starting at `depth`, e.g. depth 2
    /// of `a.Outer.Mid.Inner` is `Mid.Inner`.
    pub fn relative_name(&self, depth: usize) -> String {
        let depth = depth.clamp(1, self.simple_names.len());
        self.simple_names[depth - 1..].join(".")
    }

    /// Fully qualified dotted name, e.g. `java.util.Map.Entry`.
    pub fn canonical_name(&self) -> String {
        if self.package.is_empty() {
            self.simple_names.join(".")
        } else {
            format!("{}.{}", self.package, self.simple_names.join("."))
        }
    }

    /// Binary name as seen by class loaders, e.g. `java.util.Map$Entry`.
    pub fn reflection_name(&self) -> String {
        if self.package.is_empty() {
            self.simple_names.join("$")
        } else {
            format!("{}.{}", self.package, self.simple_names.join("$"))
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}
