//! Indentation configuration for generated code.

use std::borrow::Cow;

/// Indentation unit for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indent {
    /// Spaces with the specified width (e.g., 2 or 4).
    Spaces(u8),
    /// Tab character.
    Tab,
}

impl Indent {
    /// 2-space indentation, the default for generated Java.
    pub const JAVA: Self = Self::Spaces(2);

    /// 4-space indentation.
    pub const WIDE: Self = Self::Spaces(4);

    /// Convert to the string representation for one indent level.
    pub fn as_str(&self) -> Cow<'static, str> {
        match self {
            Self::Spaces(2) => Cow::Borrowed("  "),
            Self::Spaces(4) => Cow::Borrowed("    "),
            Self::Spaces(n) => Cow::Owned(" ".repeat(usize::from(*n))),
            Self::Tab => Cow::Borrowed("\t"),
        }
    }

    /// Parse an indentation setting: a number of spaces or `"tab"`.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("tab") {
            return Some(Self::Tab);
        }
        value.parse::<u8>().ok().map(Self::Spaces)
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::JAVA
    }
}
