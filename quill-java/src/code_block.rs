//! Format-string code fragments.
//!
//! A [`CodeBlock`] is built from templates with placeholders:
//!
//! | Placeholder | Meaning |
//! |-------------|---------|
//! | `$L` | literal: code, text, a type or `null`, emitted as is |
//! | `$N` | name of a declaration or identifier text |
//! | `$S` | string literal, escaped and quoted, or `null` |
//! | `$T` | type, printed by its resolved display name |
//! | `$$` | a dollar sign |
//! | `$W` / `$Z` | a space or a line break / nothing or a line break |
//! | `$>` / `$<` | indent / unindent |
//! | `$[` / `$]` | statement enter / exit |
//! | `${` / `$}` | brace block enter / exit |
//!
//! Arguments are consumed in order (`$L`), by one-based index (`$2L`) or by
//! name (`$value:L` with [`CodeBlockBuilder::add_named`]). A newline in a
//! template is a mandatory line break.
//!
//! The builder keeps an explicit stack of open structural markers. Unbalanced
//! markers and argument mismatches are reported by
//! [`CodeBlockBuilder::build`].

use std::fmt;

use indexmap::IndexMap;
use quill_core::{ClassName, Error, Marker, Result, is_java_keyword};
use quill_notation::{Kind, Notation, Renderable, Scope};

use crate::{
    FieldSpec, MethodSpec, ParameterSpec, TypeName, TypeSpec,
    layout::{braces, trim_lines},
};

/// A fragment of Java code lowered to a notation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CodeBlock {
    notation: Notation,
}

impl CodeBlock {
    /// Start building a code block.
    pub fn builder() -> CodeBlockBuilder {
        CodeBlockBuilder::default()
    }

    /// A code block from a single template.
    pub fn of(format: &str, args: impl IntoIterator<Item = Arg>) -> Result<CodeBlock> {
        Self::builder().add(format, args).build()
    }

    /// Literal text with no placeholders, such as documentation.
    pub fn text(text: impl AsRef<str>) -> CodeBlock {
        Self::from_notation(Notation::text(text))
    }

    pub(crate) fn from_notation(notation: Notation) -> CodeBlock {
        Self { notation }
    }

    /// Join code blocks with a separator, e.g. `", "`.
    pub fn join(blocks: impl IntoIterator<Item = CodeBlock>, separator: &str) -> CodeBlock {
        Self::from_notation(Notation::join(
            blocks.into_iter().map(|block| block.notation),
            Notation::text(separator),
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.notation.is_empty()
    }

    pub fn notation(&self) -> &Notation {
        &self.notation
    }
}

impl Renderable for CodeBlock {
    fn to_notation(&self) -> Notation {
        self.notation.clone()
    }
}

impl fmt::Display for CodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation)
    }
}

/// An argument for a template placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Code embedded by `$L`.
    Code(CodeBlock),
    /// Text for `$L`, `$N` or `$S`.
    Text(String),
    /// `null` for `$L` or `$S`.
    Null,
    /// A type for `$T` or `$L`.
    Type(TypeName),
}

impl Arg {
    fn describe(&self) -> &'static str {
        match self {
            Self::Code(_) => "code",
            Self::Text(_) => "text",
            Self::Null => "null",
            Self::Type(_) => "a type",
        }
    }
}

impl From<CodeBlock> for Arg {
    fn from(block: CodeBlock) -> Self {
        Self::Code(block)
    }
}

impl From<&str> for Arg {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Arg {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Option<&str>> for Arg {
    fn from(text: Option<&str>) -> Self {
        text.map_or(Self::Null, Self::from)
    }
}

impl From<TypeName> for Arg {
    fn from(ty: TypeName) -> Self {
        Self::Type(ty)
    }
}

impl From<ClassName> for Arg {
    fn from(class: ClassName) -> Self {
        Self::Type(TypeName::Class(class))
    }
}

impl From<&ClassName> for Arg {
    fn from(class: &ClassName) -> Self {
        Self::Type(TypeName::Class(class.clone()))
    }
}

impl From<&ParameterSpec> for Arg {
    fn from(parameter: &ParameterSpec) -> Self {
        Self::Text(parameter.name.clone())
    }
}

impl From<&FieldSpec> for Arg {
    fn from(field: &FieldSpec) -> Self {
        Self::Text(field.name.clone())
    }
}

impl From<&MethodSpec> for Arg {
    fn from(method: &MethodSpec) -> Self {
        Self::Text(method.name.clone())
    }
}

/// Embeds an anonymous class body, or names a named type.
impl From<&TypeSpec> for Arg {
    fn from(spec: &TypeSpec) -> Self {
        if spec.is_anonymous() {
            Self::Code(CodeBlock::from_notation(spec.to_notation()))
        } else {
            Self::Text(spec.name.clone())
        }
    }
}

macro_rules! literal_args {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::Text(value.to_string())
                }
            }
        )*
    };
}

literal_args!(bool, char, i32, i64, u32, u64, usize, f64);

/// Builds a [`CodeBlock`] from templates.
#[derive(Debug, Default)]
pub struct CodeBlockBuilder {
    root: Vec<Notation>,
    open: Vec<Frame>,
    error: Option<Box<Error>>,
}

#[derive(Debug)]
struct Frame {
    marker: Marker,
    parts: Vec<Notation>,
}

/// How placeholders find their arguments.
enum Args {
    Positional {
        args: Vec<Arg>,
        next: usize,
        used: Vec<bool>,
        relative: bool,
        indexed: bool,
    },
    Named(IndexMap<String, Arg>),
}

impl Args {
    fn positional(args: Vec<Arg>) -> Self {
        let used = vec![false; args.len()];
        Self::Positional {
            args,
            next: 0,
            used,
            relative: false,
            indexed: false,
        }
    }

    fn relative(&mut self, format: &str) -> Result<Arg> {
        match self {
            Self::Positional {
                args,
                next,
                used,
                relative,
                indexed,
            } => {
                if *indexed {
                    return Err(mixed(format));
                }
                *relative = true;
                let arg = args.get(*next).cloned().ok_or_else(|| {
                    Error::argument(format!("index {} is out of range in '{format}'", *next + 1))
                })?;
                used[*next] = true;
                *next += 1;
                Ok(arg)
            }
            Self::Named(_) => Err(Error::argument(format!(
                "'{format}' uses positional placeholders with named arguments"
            ))),
        }
    }

    fn indexed(&mut self, index: usize, format: &str) -> Result<Arg> {
        match self {
            Self::Positional {
                args,
                used,
                relative,
                indexed,
                ..
            } => {
                if *relative {
                    return Err(mixed(format));
                }
                *indexed = true;
                let arg = index
                    .checked_sub(1)
                    .and_then(|i| args.get(i).cloned())
                    .ok_or_else(|| {
                        Error::argument(format!("index {index} is out of range in '{format}'"))
                    })?;
                used[index - 1] = true;
                Ok(arg)
            }
            Self::Named(_) => Err(Error::argument(format!(
                "'{format}' uses indexed placeholders with named arguments"
            ))),
        }
    }

    fn named(&mut self, name: &str, format: &str) -> Result<Arg> {
        match self {
            Self::Named(args) => args.get(name).cloned().ok_or_else(|| {
                Error::argument(format!("missing named argument '{name}' for '{format}'"))
            }),
            Self::Positional { .. } => Err(Error::argument(format!(
                "named placeholder '${name}' in '{format}' needs named arguments"
            ))),
        }
    }

    fn finish(&self, format: &str) -> Result<()> {
        if let Self::Positional {
            args,
            used,
            relative,
            ..
        } = self
        {
            if *relative && used.iter().any(|used| !used) {
                let consumed = used.iter().filter(|used| **used).count();
                return Err(Error::argument(format!(
                    "'{format}' consumes {consumed} arguments but {} were given",
                    args.len()
                )));
            }
            let unused: Vec<String> = used
                .iter()
                .enumerate()
                .filter(|(_, used)| !**used)
                .map(|(i, _)| format!("${}", i + 1))
                .collect();
            if !unused.is_empty() {
                return Err(Error::argument(format!(
                    "unused arguments {} in '{format}'",
                    unused.join(", ")
                )));
            }
        }
        Ok(())
    }
}

fn mixed(format: &str) -> Box<Error> {
    Error::argument(format!(
        "'{format}' mixes relative and indexed placeholders"
    ))
}

impl CodeBlockBuilder {
    /// Append a template with positional arguments.
    pub fn add(mut self, format: &str, args: impl IntoIterator<Item = Arg>) -> Self {
        let args = Args::positional(args.into_iter().collect());
        self.append(format, args);
        self
    }

    /// Append a template whose placeholders are named, e.g. `$count:L`.
    pub fn add_named<K: Into<String>>(
        mut self,
        format: &str,
        args: impl IntoIterator<Item = (K, Arg)>,
    ) -> Self {
        let mut named = IndexMap::new();
        for (key, arg) in args {
            let key = key.into();
            if !key.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
                self.fail(Error::argument(format!(
                    "argument name '{key}' must start with a lowercase letter"
                )));
                return self;
            }
            named.insert(key, arg);
        }
        self.append(format, Args::Named(named));
        self
    }

    /// `format;` as one statement on its own line.
    pub fn add_statement(self, format: &str, args: impl IntoIterator<Item = Arg>) -> Self {
        self.add(&format!("$[{format};\n$]"), args)
    }

    /// `format {` and indent.
    pub fn begin_control_flow(self, format: &str, args: impl IntoIterator<Item = Arg>) -> Self {
        self.add(&format!("{format} {{\n$>"), args)
    }

    /// `} format {`, e.g. `} else if (x) {`.
    pub fn next_control_flow(self, format: &str, args: impl IntoIterator<Item = Arg>) -> Self {
        self.add(&format!("$<}} {format} {{\n$>"), args)
    }

    /// Unindent and `}`.
    pub fn end_control_flow(self) -> Self {
        self.add("$<}\n", [])
    }

    /// Unindent and `} format;`, e.g. `} while (x);`.
    pub fn end_control_flow_with(self, format: &str, args: impl IntoIterator<Item = Arg>) -> Self {
        self.add(&format!("$<}} {format};\n"), args)
    }

    pub fn indent(self) -> Self {
        self.add("$>", [])
    }

    pub fn unindent(self) -> Self {
        self.add("$<", [])
    }

    /// Append a built code block.
    pub fn add_code(mut self, block: &CodeBlock) -> Self {
        self.push(block.notation.clone());
        self
    }

    /// Print `flat` if it fits on the line and `broken` otherwise.
    pub fn add_choice(mut self, flat: &CodeBlock, broken: &CodeBlock) -> Self {
        self.push(flat.notation.clone().or(broken.notation.clone()));
        self
    }

    /// `open a, b, c close`, wrapping one item per line when the list does
    /// not fit. The whole list is one decision for the printer.
    pub fn wrapping_list(
        mut self,
        open: &str,
        items: impl IntoIterator<Item = CodeBlock>,
        close: &str,
    ) -> Self {
        let soft = Notation::text(" ").or(Notation::line());
        let items = Notation::join(
            items.into_iter().map(|item| item.notation),
            Notation::text(",").then(soft),
        );
        let leading = Notation::empty().or(Notation::line());
        self.push(Notation::hoist([
            Notation::text(open),
            Notation::indent(leading.then(items)),
            Notation::text(close),
        ]));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.open.is_empty()
    }

    /// Finish the code block.
    ///
    /// Fails with the first error met while appending, or a structural error
    /// for a marker that was never closed.
    pub fn build(self) -> Result<CodeBlock> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if let Some(frame) = self.open.last() {
            return Err(Error::structural(
                frame.marker,
                format!("'{}' is never closed", frame.marker.open()),
            ));
        }
        Ok(CodeBlock::from_notation(Notation::concat(self.root)))
    }

    fn fail(&mut self, error: Box<Error>) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn parts(&mut self) -> &mut Vec<Notation> {
        match self.open.last_mut() {
            Some(frame) => &mut frame.parts,
            None => &mut self.root,
        }
    }

    fn push(&mut self, notation: Notation) {
        if !notation.is_empty() {
            self.parts().push(notation);
        }
    }

    fn append(&mut self, format: &str, mut args: Args) {
        if self.error.is_some() {
            return;
        }
        let result = self
            .parse(format, &mut args)
            .and_then(|()| args.finish(format));
        if let Err(error) = result {
            self.fail(error);
        }
    }

    fn parse(&mut self, format: &str, args: &mut Args) -> Result<()> {
        let mut text = String::new();
        let mut chars = format.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\n' {
                self.flush(&mut text);
                self.push(Notation::line());
                continue;
            }
            if c != '$' {
                text.push(c);
                continue;
            }
            let Some(next) = chars.next() else {
                return Err(Error::argument(format!("dangling '$' at the end of '{format}'")));
            };
            if next == '$' {
                text.push('$');
                continue;
            }
            self.flush(&mut text);
            match next {
                '>' => self.open(Marker::Indent)?,
                '<' => self.close(Marker::Indent)?,
                '[' => self.open(Marker::Statement)?,
                ']' => self.close(Marker::Statement)?,
                '{' => self.open(Marker::Block)?,
                '}' => self.close(Marker::Block)?,
                'W' => self.push(Notation::text(" ").or(Notation::line())),
                'Z' => self.push(Notation::empty().or(Notation::line())),
                'L' | 'N' | 'S' | 'T' => {
                    let arg = args.relative(format)?;
                    self.placeholder(next, arg, &mut chars, format)?;
                }
                '0'..='9' => {
                    let mut digits = String::from(next);
                    while let Some(digit) = chars.next_if(char::is_ascii_digit) {
                        digits.push(digit);
                    }
                    let kind = chars.next().unwrap_or(' ');
                    let index: usize = digits.parse().map_err(|_| {
                        Error::argument(format!("invalid index ${digits} in '{format}'"))
                    })?;
                    let arg = args.indexed(index, format)?;
                    self.placeholder(kind, arg, &mut chars, format)?;
                }
                c if c.is_ascii_lowercase() => {
                    let mut name = String::from(c);
                    while let Some(c) = chars.next_if(|c| c.is_ascii_alphanumeric() || *c == '_') {
                        name.push(c);
                    }
                    if chars.next() != Some(':') {
                        return Err(Error::argument(format!(
                            "expected ':' after '${name}' in '{format}'"
                        )));
                    }
                    let kind = chars.next().unwrap_or(' ');
                    let arg = args.named(&name, format)?;
                    self.placeholder(kind, arg, &mut chars, format)?;
                }
                other => {
                    return Err(Error::argument(format!(
                        "unknown placeholder '${other}' in '{format}'"
                    )));
                }
            }
        }
        self.flush(&mut text);
        Ok(())
    }

    fn flush(&mut self, text: &mut String) {
        if !text.is_empty() {
            let notation = Notation::text(text.as_str());
            text.clear();
            self.push(notation);
        }
    }

    fn placeholder(
        &mut self,
        kind: char,
        arg: Arg,
        rest: &mut std::iter::Peekable<std::str::Chars<'_>>,
        format: &str,
    ) -> Result<()> {
        let notation = match (kind, arg) {
            ('L', Arg::Code(block)) => block.notation,
            ('L' | 'N', Arg::Text(text)) => Notation::text(text),
            ('L', Arg::Null) => Notation::text("null"),
            ('L', Arg::Type(ty)) => ty.to_notation(),
            ('S', Arg::Text(text)) => string_literal(&text),
            ('S', Arg::Null) => Notation::text("null"),
            ('T', Arg::Type(TypeName::Class(class))) => match static_member(rest) {
                Some(member) => Notation::static_ref(class, member),
                None => Notation::type_ref(class),
            },
            ('T', Arg::Type(ty)) => ty.to_notation(),
            ('L' | 'N' | 'S' | 'T', arg) => {
                let expected = match kind {
                    'N' => "a name",
                    'S' => "a string",
                    'T' => "a type",
                    _ => "a literal",
                };
                return Err(Error::argument(format!(
                    "expected {expected} for ${kind} but was {} in '{format}'",
                    arg.describe()
                )));
            }
            (other, _) => {
                return Err(Error::argument(format!(
                    "unknown placeholder kind '{other}' in '{format}'"
                )));
            }
        };
        self.push(notation);
        Ok(())
    }

    fn open(&mut self, marker: Marker) -> Result<()> {
        let mut parts = Vec::new();
        match marker {
            Marker::Indent => parts = take_trailing_lines(self.parts()),
            Marker::Statement => {
                let nested = self
                    .open
                    .iter()
                    .rev()
                    .map(|frame| frame.marker)
                    .find(|marker| *marker != Marker::Indent)
                    == Some(Marker::Statement);
                if nested {
                    return Err(Error::structural(
                        Marker::Statement,
                        "'$[' inside a statement that is still open",
                    ));
                }
            }
            Marker::Block => {}
        }
        self.open.push(Frame { marker, parts });
        Ok(())
    }

    fn close(&mut self, marker: Marker) -> Result<()> {
        let Some(mut frame) = self.open.pop() else {
            return Err(Error::structural(
                marker,
                format!("'{}' without a matching '{}'", marker.close(), marker.open()),
            ));
        };
        if frame.marker != marker {
            return Err(Error::structural(
                marker,
                format!(
                    "'{}' closes '{}' which is still open",
                    marker.close(),
                    frame.marker.open()
                ),
            ));
        }
        let trailing = take_trailing_lines(&mut frame.parts);
        let inner = Notation::concat(frame.parts);
        let closed = match marker {
            Marker::Indent => Notation::indent(inner),
            Marker::Statement => Notation::statement(inner),
            Marker::Block => Notation::scoped(braces(trim_lines(&inner)), Scope::Block),
        };
        self.push(closed);
        if marker != Marker::Block {
            for line in trailing {
                self.push(line);
            }
        }
        Ok(())
    }
}

/// Line breaks at the end of `parts`, which belong to the line after a
/// marker rather than inside it.
fn take_trailing_lines(parts: &mut Vec<Notation>) -> Vec<Notation> {
    let keep = parts.len()
        - parts
            .iter()
            .rev()
            .take_while(|part| matches!(part.kind(), Kind::Line))
            .count();
    parts.split_off(keep)
}

/// `.member` after a `$T`, consumed when it names a static member.
fn static_member(rest: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut lookahead = rest.clone();
    if lookahead.next() != Some('.') {
        return None;
    }
    let mut member = String::new();
    while let Some(c) = lookahead.next_if(|c| c.is_alphanumeric() || *c == '_') {
        member.push(c);
    }
    let starts_identifier = member
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if !starts_identifier || is_java_keyword(&member) {
        return None;
    }
    *rest = lookahead;
    Some(member)
}

/// A quoted Java string literal. Embedded newlines continue the literal on
/// the next line with `+`.
pub(crate) fn string_literal(value: &str) -> Notation {
    let mut parts = Vec::new();
    let mut current = String::from("\"");
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => current.push_str("\\\""),
            '\\' => current.push_str("\\\\"),
            '\t' => current.push_str("\\t"),
            '\r' => current.push_str("\\r"),
            '\u{8}' => current.push_str("\\b"),
            '\u{c}' => current.push_str("\\f"),
            '\n' => {
                current.push_str("\\n\"");
                if chars.peek().is_none() {
                    parts.push(Notation::text(&current));
                    return Notation::concat(parts);
                }
                parts.push(Notation::text(&current));
                parts.push(Notation::line());
                current = String::from("+ \"");
            }
            c if c.is_control() => current.push_str(&format!("\\u{:04x}", c as u32)),
            c => current.push(c),
        }
    }
    current.push('"');
    parts.push(Notation::text(&current));
    Notation::concat(parts)
}
