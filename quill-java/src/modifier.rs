//! Declaration modifiers.

use std::{collections::BTreeSet, fmt};

use quill_notation::Notation;

/// A Java modifier keyword.
///
/// Variants are declared in the order the language conventionally writes
/// them, so a sorted set prints `public static final` and never
/// `final static public`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Default,
    Static,
    Sealed,
    NonSealed,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
}

impl Modifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Abstract => "abstract",
            Self::Default => "default",
            Self::Static => "static",
            Self::Sealed => "sealed",
            Self::NonSealed => "non-sealed",
            Self::Final => "final",
            Self::Transient => "transient",
            Self::Volatile => "volatile",
            Self::Synchronized => "synchronized",
            Self::Native => "native",
            Self::Strictfp => "strictfp",
        }
    }

    /// Parse a modifier keyword.
    pub fn parse(keyword: &str) -> Option<Self> {
        let modifier = match keyword {
            "public" => Self::Public,
            "protected" => Self::Protected,
            "private" => Self::Private,
            "abstract" => Self::Abstract,
            "default" => Self::Default,
            "static" => Self::Static,
            "sealed" => Self::Sealed,
            "non-sealed" => Self::NonSealed,
            "final" => Self::Final,
            "transient" => Self::Transient,
            "volatile" => Self::Volatile,
            "synchronized" => Self::Synchronized,
            "native" => Self::Native,
            "strictfp" => Self::Strictfp,
            _ => return None,
        };
        Some(modifier)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// `public static ` for the modifiers not implied by the declaration site.
pub(crate) fn modifier_list(modifiers: &BTreeSet<Modifier>, implicit: &[Modifier]) -> Notation {
    Notation::concat(
        modifiers
            .iter()
            .filter(|modifier| !implicit.contains(modifier))
            .map(|modifier| Notation::text(format!("{} ", modifier.keyword()))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_order() {
        let modifiers: BTreeSet<Modifier> = [Modifier::Final, Modifier::Static, Modifier::Public]
            .into_iter()
            .collect();
        assert_eq!(modifier_list(&modifiers, &[]).to_string(), "public static final ");
    }

    #[test]
    fn test_implicit_modifiers_are_omitted() {
        let modifiers: BTreeSet<Modifier> = [Modifier::Public, Modifier::Abstract]
            .into_iter()
            .collect();
        let implicit = [Modifier::Public, Modifier::Abstract];
        assert!(modifier_list(&modifiers, &implicit).is_empty());
    }

    #[test]
    fn test_parse_round_trip() {
        assert_eq!(Modifier::parse("non-sealed"), Some(Modifier::NonSealed));
        assert_eq!(Modifier::parse("const"), None);
    }
}
