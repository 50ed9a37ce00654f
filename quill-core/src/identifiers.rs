//! Java identifier rules.

/// Java reserved keywords and literals that cannot be used as identifiers
/// Source: JLS §3.9
pub const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while",
    // Literals
    "true", "false", "null",
];

/// Check if a name is a Java reserved keyword or literal
pub fn is_java_keyword(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name)
}

/// Validate that a name is a valid Java identifier.
///
/// Returns None if valid, Some(reason) if invalid.
pub fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Some("identifiers cannot be empty");
    };

    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return Some("identifiers must start with a letter, '_' or '$'");
    }

    if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return Some("identifiers may only contain letters, digits, '_' and '$'");
    }

    if is_java_keyword(name) {
        return Some("identifiers cannot be Java keywords");
    }

    None
}

/// Check if a name is a valid Java identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    validate_identifier(name).is_none()
}
