//! Annotations.

use quill_core::{ClassName, Error, Result, validate_identifier};
use quill_notation::{Notation, Renderable};

use crate::CodeBlock;

/// An annotation use such as `@SuppressWarnings("unchecked")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationSpec {
    /// The annotation type.
    pub class: ClassName,
    /// Members in insertion order. A member with several values prints as an
    /// array.
    pub members: Vec<(String, Vec<CodeBlock>)>,
}

impl AnnotationSpec {
    pub fn new(class: ClassName) -> Self {
        Self {
            class,
            members: Vec::new(),
        }
    }

    /// Add a value to member `name`.
    pub fn member(mut self, name: impl Into<String>, value: CodeBlock) -> Self {
        let name = name.into();
        match self.members.iter_mut().find(|(member, _)| *member == name) {
            Some((_, values)) => values.push(value),
            None => self.members.push((name, vec![value])),
        }
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for (name, _) in &self.members {
            if let Some(reason) = validate_identifier(name) {
                return Err(Error::invalid_name(name, "annotation member", reason));
            }
        }
        Ok(())
    }

    fn head(&self) -> Notation {
        Notation::text("@").then(Notation::type_ref(self.class.clone()))
    }

    fn member_values(&self) -> Vec<Notation> {
        if let [(name, values)] = self.members.as_slice() {
            if name == "value" && values.len() == 1 {
                return vec![values[0].to_notation()];
            }
        }
        self.members
            .iter()
            .map(|(name, values)| {
                let value = match values.as_slice() {
                    [single] => single.to_notation(),
                    values => Notation::concat([
                        Notation::text("{"),
                        Notation::join(
                            values.iter().map(Renderable::to_notation),
                            Notation::text(", "),
                        ),
                        Notation::text("}"),
                    ]),
                };
                Notation::text(format!("{name} = ")).then(value)
            })
            .collect()
    }

    /// The annotation on one line, for parameters and type uses.
    pub fn inline(&self) -> Notation {
        let values = self.member_values();
        if values.is_empty() {
            return self.head();
        }
        Notation::concat([
            self.head(),
            Notation::text("("),
            Notation::join(values, Notation::text(", ")),
            Notation::text(")"),
        ])
    }

    /// The annotation on a declaration: on one line when it fits, otherwise
    /// one member per line.
    pub(crate) fn to_block(&self) -> Notation {
        let values = self.member_values();
        if values.len() < 2 {
            return self.inline();
        }
        let broken = Notation::concat([
            self.head(),
            Notation::text("("),
            Notation::indent(Notation::indent(Notation::line().then(Notation::join(
                values,
                Notation::text(",").then(Notation::line()),
            )))),
            Notation::line(),
            Notation::text(")"),
        ]);
        self.inline().or(broken)
    }
}

impl From<ClassName> for AnnotationSpec {
    fn from(class: ClassName) -> Self {
        Self::new(class)
    }
}

impl Renderable for AnnotationSpec {
    fn to_notation(&self) -> Notation {
        self.to_block()
    }
}

#[cfg(test)]
mod tests {
    use quill_notation::{PrintOptions, Printer};

    use super::*;

    fn suppress() -> AnnotationSpec {
        AnnotationSpec::new(ClassName::java_lang("SuppressWarnings"))
    }

    #[test]
    fn test_marker_annotation() {
        let annotation = AnnotationSpec::new(ClassName::java_lang("Override"));
        assert_eq!(annotation.inline().to_string(), "@java.lang.Override");
    }

    #[test]
    fn test_single_value_member() {
        let annotation = suppress().member("value", CodeBlock::text("\"unchecked\""));
        assert_eq!(
            annotation.to_notation().to_string(),
            "@java.lang.SuppressWarnings(\"unchecked\")"
        );
    }

    #[test]
    fn test_array_member() {
        let annotation = suppress()
            .member("value", CodeBlock::text("\"unchecked\""))
            .member("value", CodeBlock::text("\"rawtypes\""));
        assert_eq!(
            annotation.to_notation().to_string(),
            "@java.lang.SuppressWarnings(value = {\"unchecked\", \"rawtypes\"})"
        );
    }

    #[test]
    fn test_members_wrap_one_per_line() {
        let annotation = AnnotationSpec::new(ClassName::new("a", "Mapping"))
            .member("path", CodeBlock::text("\"/users\""))
            .member("method", CodeBlock::text("GET"));
        let printer = Printer::new(PrintOptions::default().with_width(20));
        assert_eq!(
            printer.print(&annotation.to_notation()),
            "@a.Mapping(\n    path = \"/users\",\n    method = GET\n)"
        );
    }
}
