//! Width-aware rendering of notations.
//!
//! The printer walks a notation with an explicit stack of frames. Each frame
//! carries the layout its line breaks use: the accumulated line prefix and the
//! statement it belongs to. A line break only records its prefix; the prefix
//! is written by the first text of the next line, so blank lines stay free of
//! trailing whitespace.
//!
//! Choice points on the same output line form a run. The first choice of a run
//! measures the flat width of everything up to the next mandatory break and
//! commits every choice of the run to the same alternative.

use std::{cell::Cell, rc::Rc};

use quill_core::Indent;

use crate::{Emitter, Kind, Margin, Notation, StringEmitter};

/// Default column budget.
pub const DEFAULT_WIDTH: usize = 100;

/// Options controlling how notations are printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Maximum line width the printer tries to stay within.
    pub width: usize,
    /// Indentation unit.
    pub indent: Indent,
}

impl PrintOptions {
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            indent: Indent::default(),
        }
    }
}

/// Renders notations to text.
#[derive(Debug, Clone, Default)]
pub struct Printer {
    options: PrintOptions,
}

impl Printer {
    pub fn new(options: PrintOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PrintOptions {
        &self.options
    }

    /// Print a notation to a string.
    ///
    /// Unresolved type references print their canonical names.
    pub fn print(&self, notation: &Notation) -> String {
        let mut emitter = StringEmitter::new();
        self.print_to(notation, &mut emitter);
        emitter.output()
    }

    /// Print a notation to an emitter.
    #[tracing::instrument(level = "debug", skip_all, fields(width = self.options.width))]
    pub fn print_to(&self, notation: &Notation, emitter: &mut dyn Emitter) {
        let unit = self.options.indent.as_str();
        let continuation = unit.repeat(2);
        let mut cursor = Cursor {
            emitter,
            continuation: &continuation,
            column: 0,
            lines: 0,
            pending: Some(Pending {
                layout: Rc::new(Layout::default()),
                continues: false,
            }),
        };
        let walk = Walk {
            width: self.options.width,
            unit: &unit,
        };
        walk.run(notation, &mut cursor);
    }
}

/// The prefix and statement that line breaks inside a frame use.
#[derive(Default)]
struct Layout {
    prefix: String,
    marked: bool,
    /// Line number the statement started on, once known.
    statement: Option<Rc<Cell<Option<usize>>>>,
}

impl Layout {
    fn indented(self: &Rc<Self>, margin: &Margin, unit: &str) -> Rc<Self> {
        let (added, marked) = match margin {
            Margin::Unit => (unit, self.marked),
            Margin::Marker(marker) => (&**marker, true),
        };
        Rc::new(Self {
            prefix: format!("{}{}", self.prefix, added),
            marked,
            statement: self.statement.clone(),
        })
    }

    fn statement(self: &Rc<Self>) -> Rc<Self> {
        if self.statement.is_some() {
            return Rc::clone(self);
        }
        Rc::new(Self {
            prefix: self.prefix.clone(),
            marked: self.marked,
            statement: Some(Rc::new(Cell::new(None))),
        })
    }

    fn suspended(self: &Rc<Self>) -> Rc<Self> {
        if self.statement.is_none() {
            return Rc::clone(self);
        }
        Rc::new(Self {
            prefix: self.prefix.clone(),
            marked: self.marked,
            statement: None,
        })
    }
}

struct Frame<'n> {
    node: &'n Notation,
    layout: Rc<Layout>,
}

/// A line break whose prefix has not been written yet.
struct Pending {
    layout: Rc<Layout>,
    continues: bool,
}

struct Cursor<'a> {
    emitter: &'a mut dyn Emitter,
    continuation: &'a str,
    column: usize,
    lines: usize,
    pending: Option<Pending>,
}

impl Cursor<'_> {
    /// Column the next text starts at.
    fn next_column(&self) -> usize {
        match &self.pending {
            Some(pending) => {
                let mut width = pending.layout.prefix.chars().count();
                if pending.continues {
                    width += self.continuation.chars().count();
                }
                width
            }
            None => self.column,
        }
    }

    fn start_statement(&self, layout: &Layout) {
        if let Some(start) = &layout.statement {
            if start.get().is_none() {
                start.set(Some(self.lines));
            }
        }
    }

    fn text(&mut self, text: &str, layout: &Layout) {
        self.start_statement(layout);
        if let Some(pending) = self.pending.take() {
            self.column = 0;
            if !pending.layout.prefix.is_empty() {
                self.emitter.emit(&pending.layout.prefix);
                self.column += pending.layout.prefix.chars().count();
            }
            if pending.continues {
                self.emitter.emit(self.continuation);
                self.column += self.continuation.chars().count();
            }
        }
        self.emitter.emit(text);
        self.column += text.chars().count();
    }

    fn line(&mut self, layout: &Rc<Layout>) {
        if let Some(pending) = &self.pending {
            if pending.layout.marked {
                self.emitter.emit(pending.layout.prefix.trim_end());
            }
        }
        self.start_statement(layout);
        self.emitter.emit_newline();
        self.lines += 1;
        self.column = 0;

        let continues = layout
            .statement
            .as_ref()
            .and_then(|start| start.get())
            .is_some_and(|start| self.lines > start);
        self.pending = Some(Pending {
            layout: Rc::clone(layout),
            continues,
        });
    }
}

struct Walk<'a> {
    width: usize,
    unit: &'a str,
}

impl Walk<'_> {
    fn run<'n>(&self, root: &'n Notation, cursor: &mut Cursor<'_>) {
        let mut stack = vec![Frame {
            node: root,
            layout: Rc::new(Layout::default()),
        }];

        while let Some(frame) = stack.pop() {
            match frame.node.kind() {
                Kind::Empty => {}
                Kind::Text(text) => cursor.text(text, &frame.layout),
                Kind::Line => cursor.line(&frame.layout),
                Kind::TypeRef(class) => cursor.text(&class.canonical_name(), &frame.layout),
                Kind::StaticImportRef { class, member } => {
                    cursor.text(&format!("{class}.{member}"), &frame.layout)
                }
                Kind::Concat(items) => {
                    stack.extend(items.iter().rev().map(|node| Frame {
                        node,
                        layout: Rc::clone(&frame.layout),
                    }));
                }
                Kind::Choice { flat, broken } => {
                    let fits = self.fits(flat, &stack, cursor);
                    if !flat.measure().breaks {
                        self.commit_run(&mut stack, fits);
                    }
                    stack.push(Frame {
                        node: if fits { flat } else { broken },
                        layout: frame.layout,
                    });
                }
                Kind::Indent { .. }
                | Kind::Statement(_)
                | Kind::Suppressed(_)
                | Kind::Scoped { .. } => {
                    if let Some(inner) = self.enter(&frame) {
                        stack.push(inner);
                    }
                }
            }
        }
    }

    /// The frame for the content of a wrapper node.
    fn enter<'n>(&self, frame: &Frame<'n>) -> Option<Frame<'n>> {
        let (node, layout) = match frame.node.kind() {
            Kind::Indent { inner, margin } => (inner, frame.layout.indented(margin, self.unit)),
            Kind::Statement(inner) => (inner, frame.layout.statement()),
            Kind::Suppressed(inner) => (inner, Rc::clone(&frame.layout)),
            Kind::Scoped { inner, .. } => (inner, frame.layout.suspended()),
            _ => return None,
        };
        Some(Frame { node, layout })
    }

    /// Whether `flat` and the rest of its line fit within the width.
    fn fits(&self, flat: &Notation, rest: &[Frame<'_>], cursor: &Cursor<'_>) -> bool {
        let measure = flat.measure();
        let mut needed = measure.width;
        if !measure.breaks {
            for frame in rest.iter().rev() {
                let measure = frame.node.measure();
                needed += measure.width;
                if measure.breaks {
                    break;
                }
            }
        }

        let column = cursor.next_column();
        let fits = column + needed <= self.width;
        tracing::trace!(column, needed, fits, "choice run");
        fits
    }

    /// Commit the remaining choices of the current run to one alternative.
    ///
    /// Frames are expanded until the run's first mandatory break; each choice
    /// met on the way is replaced by its chosen alternative.
    fn commit_run<'n>(&self, stack: &mut Vec<Frame<'n>>, fits: bool) {
        let mut committed = Vec::new();
        while let Some(frame) = stack.pop() {
            let measure = frame.node.measure();
            if !measure.choices {
                committed.push(frame);
                if measure.breaks {
                    break;
                }
                continue;
            }
            match frame.node.kind() {
                Kind::Choice { flat, broken } => {
                    committed.push(Frame {
                        node: if fits { flat } else { broken },
                        layout: frame.layout,
                    });
                    if flat.measure().breaks {
                        break;
                    }
                }
                Kind::Concat(items) => {
                    stack.extend(items.iter().rev().map(|node| Frame {
                        node,
                        layout: Rc::clone(&frame.layout),
                    }));
                }
                _ => match self.enter(&frame) {
                    Some(inner) => stack.push(inner),
                    None => committed.push(frame),
                },
            }
        }
        stack.extend(committed.into_iter().rev());
    }
}

#[cfg(test)]
mod tests {
    use quill_core::ClassName;

    use super::*;
    use crate::Scope;

    fn print(notation: &Notation, width: usize) -> String {
        Printer::new(PrintOptions::default().with_width(width)).print(notation)
    }

    fn soft_line() -> Notation {
        Notation::text(" ").or(Notation::line())
    }

    fn call(args: &[&str]) -> Notation {
        let args = Notation::join(
            args.iter().map(|arg| Notation::text(*arg)),
            Notation::text(",").then(soft_line()),
        );
        Notation::text("call(")
            .then(Notation::indent(Notation::text("").or(Notation::line()).then(args)))
            .then(Notation::text(")"))
    }

    #[test]
    fn test_flat_when_fits() {
        assert_eq!(print(&call(&["a", "b"]), 100), "call(a, b)");
    }

    #[test]
    fn test_run_breaks_together() {
        let printed = print(&call(&["alpha", "beta"]), 12);
        assert_eq!(printed, "call(\n  alpha,\n  beta)");
    }

    #[test]
    fn test_run_includes_text_after_choices() {
        let notation = Notation::concat([
            Notation::text("ab"),
            soft_line(),
            Notation::text("cd"),
            Notation::text(";"),
        ]);
        assert_eq!(print(&notation, 6), "ab cd;");
        assert_eq!(print(&notation, 5), "ab\ncd;");
    }

    #[test]
    fn test_statement_continuation_double_indent() {
        let statement = Notation::statement(Notation::concat([
            Notation::text("return first"),
            soft_line(),
            Notation::text("+ second;"),
        ]));
        let body = Notation::indent(Notation::line().then(statement));
        let printed = print(&Notation::text("{").then(body), 16);
        assert_eq!(printed, "{\n  return first\n      + second;");
    }

    #[test]
    fn test_scoped_suspends_statement() {
        let anonymous = Notation::scoped(
            Notation::text("Runnable() {")
                .then(Notation::indent(Notation::line().then(Notation::text("run();"))))
                .then(Notation::line())
                .then(Notation::text("}")),
            Scope::Anonymous,
        );
        let statement = Notation::statement(
            Notation::text("Runnable r = new ")
                .then(anonymous)
                .then(Notation::text(";")),
        );
        assert_eq!(
            print(&statement, 100),
            "Runnable r = new Runnable() {\n  run();\n};"
        );
    }

    #[test]
    fn test_blank_lines_have_no_indent() {
        let body = Notation::indent(Notation::concat([
            Notation::line(),
            Notation::text("a"),
            Notation::line(),
            Notation::line(),
            Notation::text("b"),
        ]));
        assert_eq!(print(&body, 100), "\n  a\n\n  b");
    }

    #[test]
    fn test_margin_marker_on_blank_lines() {
        let doc = Notation::text("/**")
            .then(Notation::margin(
                Notation::line().then(Notation::text("First.\n\nSecond.")),
                " * ",
            ))
            .then(Notation::line())
            .then(Notation::text(" */"));
        assert_eq!(print(&doc, 100), "/**\n * First.\n *\n * Second.\n */");
    }

    #[test]
    fn test_overflow_is_best_effort() {
        let long = "x".repeat(30);
        let notation = Notation::text(&long).or(Notation::text("y"));
        assert_eq!(print(&notation, 10), "y");
        assert_eq!(print(&Notation::text(&long), 10), long);
    }

    #[test]
    fn test_degraded_flat_measured_to_break() {
        let notation = Notation::text("ab\ncdefgh").or(Notation::text("broken"));
        assert_eq!(print(&notation, 4), "ab\ncdefgh");
    }

    #[test]
    fn test_unresolved_refs_print_canonical() {
        let notation = Notation::type_ref(ClassName::new("java.util", "List"))
            .then(Notation::text(" "))
            .then(Notation::static_ref(
                ClassName::new("java.util", "Collections"),
                "emptyList",
            ));
        assert_eq!(
            print(&notation, 100),
            "java.util.List java.util.Collections.emptyList"
        );
    }

    #[test]
    fn test_tab_indent() {
        let printer = Printer::new(PrintOptions::default().with_indent(Indent::Tab));
        let doc = Notation::text("{")
            .then(Notation::indent(Notation::line().then(Notation::text("x"))));
        assert_eq!(printer.print(&doc), "{\n\tx");
    }
}
