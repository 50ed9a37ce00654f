//! Notation shapes shared by the declaration lowerings.

use quill_notation::{Kind, Notation};

use crate::{AnnotationSpec, CodeBlock};

/// `{`, the body indented one unit, `}` on its own line.
pub(crate) fn braces(body: Notation) -> Notation {
    let body = trim_lines(&body);
    if body.is_empty() {
        return Notation::text("{").then(Notation::line()).then(Notation::text("}"));
    }
    Notation::concat([
        Notation::text("{"),
        Notation::indent(Notation::line().then(body)),
        Notation::line(),
        Notation::text("}"),
    ])
}

/// A space, or a line break indented two units for wrapped clauses.
pub(crate) fn wrap() -> Notation {
    Notation::text(" ").or(Notation::indent(Notation::indent(Notation::line())))
}

/// `(a, b)`, or one item per line indented two units when it does not fit.
pub(crate) fn wrapped_list(items: Vec<Notation>) -> Notation {
    if items.is_empty() {
        return Notation::text("()");
    }
    let flat = Notation::join(items.iter().cloned(), Notation::text(", "));
    let broken = Notation::indent(Notation::indent(
        Notation::line().then(Notation::join(items, Notation::text(",").then(Notation::line()))),
    ));
    Notation::concat([Notation::text("("), flat.or(broken), Notation::text(")")])
}

/// Members separated by blank lines.
pub(crate) fn members(items: Vec<Notation>) -> Notation {
    Notation::join(
        items.into_iter().filter(|item| !item.is_empty()),
        Notation::line().then(Notation::line()),
    )
}

/// A `/** … */` comment. References inside never import anything.
pub(crate) fn javadoc(doc: Option<&CodeBlock>) -> Notation {
    let Some(doc) = doc else {
        return Notation::empty();
    };
    let body = trim_lines(doc.notation());
    if body.is_empty() {
        return Notation::empty();
    }
    Notation::suppressed(Notation::concat([
        Notation::text("/**"),
        Notation::margin(Notation::line().then(body), " * "),
        Notation::line(),
        Notation::text(" */"),
        Notation::line(),
    ]))
}

/// Annotations each on a line of their own.
pub(crate) fn annotation_lines(annotations: &[AnnotationSpec]) -> Notation {
    Notation::concat(
        annotations
            .iter()
            .map(|annotation| annotation.to_block().then(Notation::line())),
    )
}

/// Annotations followed by a space each, for parameters and type uses.
pub(crate) fn annotations_inline(annotations: &[AnnotationSpec]) -> Notation {
    Notation::concat(
        annotations
            .iter()
            .map(|annotation| annotation.inline().then(Notation::text(" "))),
    )
}

/// Strip mandatory line breaks from both ends of a notation.
pub(crate) fn trim_lines(notation: &Notation) -> Notation {
    match notation.kind() {
        Kind::Line => Notation::empty(),
        Kind::Concat(items) => {
            let is_line = |item: &&Notation| matches!(item.kind(), Kind::Line);
            let start = items.iter().take_while(is_line).count();
            let end = items.len() - items.iter().rev().take_while(is_line).count();
            if start >= end {
                return Notation::empty();
            }
            Notation::concat(items[start..end].iter().cloned())
        }
        _ => notation.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_braces() {
        assert_eq!(braces(Notation::empty()).to_string(), "{\n}");
        assert_eq!(braces(Notation::line()).to_string(), "{\n}");
    }

    #[test]
    fn test_braces_indent_body() {
        let body = Notation::text("a();").then(Notation::line()).then(Notation::text("b();"));
        assert_eq!(braces(body).to_string(), "{\n  a();\n  b();\n}");
    }

    #[test]
    fn test_trim_lines() {
        let notation = Notation::concat([
            Notation::line(),
            Notation::text("a"),
            Notation::line(),
            Notation::line(),
        ]);
        assert_eq!(trim_lines(&notation).to_string(), "a");
    }

    #[test]
    fn test_members_blank_lines() {
        let joined = members(vec![
            Notation::text("int a;"),
            Notation::empty(),
            Notation::text("int b;"),
        ]);
        assert_eq!(joined.to_string(), "int a;\n\nint b;");
    }
}
