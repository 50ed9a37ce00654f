//! Property-based tests for the notation printer.
//!
//! Random documents are generated as plain data and built into notations, then
//! checked for:
//! 1. Hoist equivalence: `hoist(items)` prints exactly like `concat(items)`
//! 2. Flat fitting: a document that fits prints on one line, all choices flat
//! 3. Determinism: printing twice gives the same text

use proptest::prelude::*;
use quill_notation::{Notation, PrintOptions, Printer};

#[derive(Debug, Clone)]
enum Doc {
    Text(String),
    Line,
    Choice(Box<Doc>, Box<Doc>),
    Indent(Box<Doc>),
    Margin(Box<Doc>),
    Statement(Box<Doc>),
    Concat(Vec<Doc>),
}

impl Doc {
    /// Build the notation; without `lines` mandatory breaks become text.
    fn build(&self, lines: bool) -> Notation {
        match self {
            Doc::Text(text) => Notation::text(text),
            Doc::Line if lines => Notation::line(),
            Doc::Line => Notation::text("~"),
            Doc::Choice(flat, broken) => flat.build(lines).or(broken.build(true)),
            Doc::Indent(inner) => Notation::indent(inner.build(lines)),
            Doc::Margin(inner) => Notation::margin(inner.build(lines), " * "),
            Doc::Statement(inner) => Notation::statement(inner.build(lines)),
            Doc::Concat(items) => Notation::concat(items.iter().map(|item| item.build(lines))),
        }
    }
}

fn doc_strategy() -> impl Strategy<Value = Doc> {
    let leaf = prop_oneof![
        4 => "[a-z]{1,6}".prop_map(Doc::Text),
        1 => Just(Doc::Line),
    ];
    leaf.prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            3 => (inner.clone(), inner.clone())
                .prop_map(|(flat, broken)| Doc::Choice(Box::new(flat), Box::new(broken))),
            1 => inner.clone().prop_map(|doc| Doc::Indent(Box::new(doc))),
            1 => inner.clone().prop_map(|doc| Doc::Margin(Box::new(doc))),
            1 => inner.clone().prop_map(|doc| Doc::Statement(Box::new(doc))),
            2 => prop::collection::vec(inner, 0..4).prop_map(Doc::Concat),
        ]
    })
}

fn print(notation: &Notation, width: usize) -> String {
    Printer::new(PrintOptions::default().with_width(width)).print(notation)
}

proptest! {
    #[test]
    fn hoist_prints_like_concat(
        items in prop::collection::vec(doc_strategy(), 0..5),
        width in 1usize..48,
    ) {
        let items: Vec<Notation> = items.iter().map(|doc| doc.build(true)).collect();
        let hoisted = Notation::hoist(items.clone());
        let joined = Notation::concat(items);
        prop_assert_eq!(print(&hoisted, width), print(&joined, width));
    }

    #[test]
    fn fitting_document_prints_flat(doc in doc_strategy(), slack in 0usize..8) {
        let notation = doc.build(false);
        prop_assert!(!notation.measure().breaks);

        let width = notation.measure().width + slack;
        let printed = print(&notation, width.max(1));
        prop_assert!(!printed.contains('\n'), "printed {:?}", printed);
        prop_assert_eq!(printed.chars().count(), notation.measure().width);
    }

    #[test]
    fn printing_is_deterministic(doc in doc_strategy(), width in 1usize..48) {
        let notation = doc.build(true);
        prop_assert_eq!(print(&notation, width), print(&notation, width));
    }
}

#[test]
fn statement_over_budget_continues_two_units_deeper() {
    let words: Vec<Notation> = (0..12).map(|i| Notation::text(format!("operand{i}"))).collect();
    let soft = Notation::text(" ").or(Notation::line());
    let body = Notation::join(words, Notation::text(" +").then(soft));
    let statement = Notation::statement(Notation::text("int total = ").then(body).then(";".into()));
    let method = Notation::text("void sum() {")
        .then(Notation::indent(Notation::line().then(statement)))
        .then(Notation::line())
        .then(Notation::text("}"));

    let printed = Printer::default().print(&method);
    let lines: Vec<&str> = printed.lines().collect();
    assert!(lines.len() > 3, "expected wrapping: {printed}");
    assert!(lines[1].starts_with("  int total = operand0 +"));
    for line in &lines[2..lines.len() - 1] {
        assert!(line.starts_with("      operand"), "bad continuation: {line:?}");
    }
    assert!(lines.iter().all(|line| line.chars().count() <= 100));
    assert_eq!(lines[lines.len() - 1], "}");
}
