//! Name resolution scenarios and properties.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use quill_core::ClassName;
use quill_names::{Context, Names, PriorityMap, ResolveOptions, Target, resolve};
use quill_notation::{NameLookup, Notation, Scope};

fn declare(class: &ClassName, inner: Notation) -> Notation {
    declare_generic(class, &[], inner)
}

fn declare_generic(class: &ClassName, type_variables: &[&str], inner: Notation) -> Notation {
    Notation::scoped(
        inner,
        Scope::Type {
            class: class.clone(),
            type_variables: type_variables.iter().map(|v| v.to_string()).collect(),
        },
    )
}

fn resolve_in(package: &str, notation: &Notation) -> Names {
    resolve(&Context::collect(notation), &ResolveOptions::new(package))
}

fn plain_imports(names: &Names) -> Vec<&str> {
    names.imports().plain().collect()
}

#[test]
fn sibling_nested_types_are_qualified() {
    let outer1 = ClassName::new("a", "Outer1");
    let outer2 = ClassName::new("a", "Outer2");
    let main = ClassName::new("a", "Main");
    let entry1 = outer1.nested_class("Entry");
    let entry2 = outer2.nested_class("Entry");

    let notation = Notation::concat([
        declare(&outer1, declare(&entry1, Notation::text("class Entry {}"))),
        declare(&outer2, declare(&entry2, Notation::text("class Entry {}"))),
        declare(
            &main,
            Notation::concat([Notation::type_ref(entry1.clone()), Notation::type_ref(entry2.clone())]),
        ),
    ]);

    let names = resolve_in("a", &notation);
    assert_eq!(names.display(&entry1), Some("Outer1.Entry"));
    assert_eq!(names.display(&entry2), Some("Outer2.Entry"));
    assert!(names.imports().is_empty());
}

#[test]
fn nested_type_is_bare_inside_its_enclosing_class() {
    let outer = ClassName::new("a", "Outer");
    let entry = outer.nested_class("Entry");
    let notation = declare(
        &outer,
        Notation::concat([
            declare(&entry, Notation::empty()),
            Notation::type_ref(entry.clone()),
        ]),
    );

    assert_eq!(resolve_in("a", &notation).display(&entry), Some("Entry"));
}

#[test]
fn suppressed_reference_does_not_import() {
    let main = ClassName::new("com.example", "Main");
    let map = ClassName::new("java.util", "Map");
    let notation = declare(&main, Notation::suppressed(Notation::type_ref(map.clone())));

    let names = resolve_in("com.example", &notation);
    assert!(names.imports().is_empty());
    assert_eq!(names.display(&map), Some("java.util.Map"));
}

#[test]
fn suppressed_reference_uses_existing_import() {
    let main = ClassName::new("com.example", "Main");
    let map = ClassName::new("java.util", "Map");
    let notation = declare(
        &main,
        Notation::concat([
            Notation::suppressed(Notation::type_ref(map.clone())),
            Notation::type_ref(map.clone()),
        ]),
    );

    let names = resolve_in("com.example", &notation);
    assert_eq!(plain_imports(&names), ["java.util.Map"]);
    assert_eq!(names.display(&map), Some("Map"));
}

#[test]
fn java_lang_imported_by_default() {
    let main = ClassName::new("com.example", "Main");
    let notation = declare(&main, Notation::type_ref(ClassName::string()));

    let names = resolve_in("com.example", &notation);
    assert_eq!(plain_imports(&names), ["java.lang.String"]);

    let options = ResolveOptions::new("com.example").skip_java_lang_imports(true);
    let names = resolve(&Context::collect(&notation), &options);
    assert!(names.imports().is_empty());
    assert_eq!(names.display(&ClassName::string()), Some("String"));
}

#[test]
fn skipped_java_lang_blocks_colliding_import() {
    let main = ClassName::new("com.example", "Main");
    let other_string = ClassName::new("com.other", "String");
    let notation = declare(
        &main,
        Notation::concat([
            Notation::type_ref(ClassName::string()),
            Notation::type_ref(other_string.clone()),
        ]),
    );
    let options = ResolveOptions::new("com.example").skip_java_lang_imports(true);
    let names = resolve(&Context::collect(&notation), &options);

    assert_eq!(names.display(&ClassName::string()), Some("String"));
    assert_eq!(names.display(&other_string), Some("com.other.String"));
    assert!(names.imports().is_empty());
}

#[test]
fn type_variable_shadows_class() {
    let main = ClassName::new("com.example", "Main");
    let t = ClassName::new("com.other", "T");
    let notation = declare_generic(&main, &["T"], Notation::type_ref(t.clone()));

    let names = resolve_in("com.example", &notation);
    assert_eq!(names.display(&t), Some("com.other.T"));
    assert!(names.imports().is_empty());
}

#[test]
fn type_variable_binding_ends_with_its_scope() {
    let main = ClassName::new("com.example", "Main");
    let t = ClassName::new("com.other", "T");
    let method = Notation::scoped(
        Notation::text("<T> void run() {}"),
        Scope::Member {
            type_variables: vec!["T".to_string()],
        },
    );
    let notation = declare(&main, method.then(Notation::type_ref(t.clone())));

    let names = resolve_in("com.example", &notation);
    assert_eq!(names.display(&t), Some("T"));
    assert_eq!(plain_imports(&names), ["com.other.T"]);
}

#[test]
fn member_type_rejects_shadowed_import() {
    let main = ClassName::new("com.example", "Main");
    let own_list = main.nested_class("List");
    let util_list = ClassName::new("java.util", "List");
    let notation = declare(
        &main,
        Notation::concat([
            declare(&own_list, Notation::empty()),
            Notation::type_ref(own_list.clone()),
            Notation::type_ref(util_list.clone()),
        ]),
    );

    let names = resolve_in("com.example", &notation);
    assert_eq!(names.display(&own_list), Some("List"));
    assert_eq!(names.display(&util_list), Some("java.util.List"));
    assert!(names.imports().is_empty());
}

#[test]
fn always_qualify_names_print_canonical() {
    let main = ClassName::new("com.example", "Main");
    let list = ClassName::new("java.util", "List");
    let notation = declare(&main, Notation::type_ref(list.clone()));
    let options = ResolveOptions::new("com.example").always_qualify(["List"]);

    let names = resolve(&Context::collect(&notation), &options);
    assert_eq!(names.display(&list), Some("java.util.List"));
    assert!(names.imports().is_empty());
}

#[test]
fn always_qualify_spares_declared_types() {
    let outer = ClassName::new("com.example", "Outer");
    let state = outer.nested_class("State");
    let other_state = ClassName::new("com.other", "State");
    let notation = declare(
        &outer,
        Notation::concat([
            declare(&state, Notation::text("enum State {}")),
            Notation::type_ref(state.clone()),
            Notation::type_ref(other_state.clone()),
        ]),
    );
    let options = ResolveOptions::new("com.example").always_qualify(["State"]);

    let names = resolve(&Context::collect(&notation), &options);
    assert_eq!(names.display(&state), Some("State"));
    assert_eq!(names.display(&other_state), Some("com.other.State"));
    assert!(names.imports().is_empty());
}

#[test]
fn declared_top_level_blocks_import() {
    let main = ClassName::new("com.example", "List");
    let util_list = ClassName::new("java.util", "List");
    let notation = declare(&main, Notation::type_ref(util_list.clone()));

    let names = resolve_in("com.example", &notation);
    assert_eq!(names.display(&util_list), Some("java.util.List"));
    assert!(names.imports().is_empty());
}

#[test]
fn unresolved_static_member_uses_class_display() {
    let main = ClassName::new("com.example", "Main");
    let junit = ClassName::new("org.junit", "Assert");
    let notation = declare(&main, Notation::static_ref(junit.clone(), "fail"));

    let names = resolve_in("com.example", &notation);
    assert_eq!(names.static_member(&junit, "fail"), "Assert.fail");
    assert_eq!(plain_imports(&names), ["org.junit.Assert"]);
    assert_eq!(notation.resolve(&names).to_string(), "Assert.fail");
}

#[test]
fn resolution_is_deterministic() {
    let main = ClassName::new("com.example", "Main");
    let refs = ["java.util.List", "java.awt.List", "java.util.Map", "com.other.Map"]
        .map(|name| Notation::type_ref(ClassName::parse(name).unwrap()));
    let notation = declare(&main, Notation::join(refs, Notation::text(", ")));

    let first = notation.resolve(&resolve_in("com.example", &notation)).to_string();
    let second = notation.resolve(&resolve_in("com.example", &notation)).to_string();
    assert_eq!(first, "List, java.awt.List, Map, com.other.Map");
    assert_eq!(first, second);
}

// -- Properties --

const NAMES: [&str; 4] = ["A", "B", "Entry", "Main"];

#[derive(Debug, Clone)]
struct Decl {
    name: usize,
    refs: Vec<usize>,
    children: Vec<Decl>,
}

fn decl_strategy() -> impl Strategy<Value = Decl> {
    let refs = || prop::collection::vec(0usize..64, 0..4);
    let leaf = (0..NAMES.len(), refs()).prop_map(|(name, refs)| Decl {
        name,
        refs,
        children: Vec::new(),
    });
    leaf.prop_recursive(3, 16, 3, move |inner| {
        (0..NAMES.len(), refs(), prop::collection::vec(inner, 0..3)).prop_map(
            |(name, refs, children)| Decl {
                name,
                refs,
                children,
            },
        )
    })
}

/// Children with legal names: unique among siblings, never an enclosing name.
fn legal_children<'d>(decl: &'d Decl, class: &ClassName) -> Vec<(&'d Decl, ClassName)> {
    let mut seen = HashSet::new();
    decl.children
        .iter()
        .filter_map(|child| {
            let name = NAMES[child.name];
            let clashes = class.simple_names().iter().any(|n| n == name);
            (!clashes && seen.insert(name)).then(|| (child, class.nested_class(name)))
        })
        .collect()
}

fn collect_declared(decl: &Decl, class: ClassName, out: &mut Vec<ClassName>) {
    for (child, nested) in legal_children(decl, &class) {
        collect_declared(child, nested, out);
    }
    out.push(class);
}

fn build(decl: &Decl, class: ClassName, pool: &[ClassName]) -> Notation {
    let mut parts = Vec::new();
    for r in &decl.refs {
        parts.push(Notation::type_ref(pool[r % pool.len()].clone()));
        parts.push(Notation::text(" "));
    }
    for (child, nested) in legal_children(decl, &class) {
        parts.push(build(child, nested, pool));
    }
    declare(&class, Notation::concat(parts))
}

fn file_strategy() -> impl Strategy<Value = Vec<Decl>> {
    prop::collection::vec(decl_strategy(), 1..3)
}

fn build_file(roots: &[Decl]) -> Notation {
    let mut seen = HashSet::new();
    let tops: Vec<(&Decl, ClassName)> = roots
        .iter()
        .filter(|decl| seen.insert(decl.name))
        .map(|decl| (decl, ClassName::new("p", NAMES[decl.name])))
        .collect();

    let mut pool = vec![
        ClassName::new("q", "A"),
        ClassName::new("q", "B"),
        ClassName::new("r", "A"),
        ClassName::new("r", "Entry"),
        ClassName::new("q", "A").nested_class("Entry"),
        ClassName::new("p", "B"),
        ClassName::java_lang("Entry"),
    ];
    for (decl, class) in &tops {
        collect_declared(decl, class.clone(), &mut pool);
    }

    Notation::concat(tops.iter().map(|(decl, class)| build(decl, class.clone(), &pool)))
}

proptest! {
    #[test]
    fn distinct_types_never_share_a_display_name(roots in file_strategy()) {
        let notation = build_file(&roots);
        let context = Context::collect(&notation);
        let names = resolve(&context, &ResolveOptions::new("p"));

        for id in context.ids() {
            let mut seen: HashMap<String, ClassName> = HashMap::new();
            for reference in context.scope(id).references() {
                let Target::Type(class) = &reference.target else { continue };
                let display = names.type_name(class);
                if let Some(other) = seen.insert(display.clone(), class.clone()) {
                    prop_assert_eq!(&other, class, "{} names two types", display);
                }
            }
        }
    }

    #[test]
    fn imports_are_shorter_and_foreign(roots in file_strategy()) {
        let notation = build_file(&roots);
        let context = Context::collect(&notation);
        let names = resolve(&context, &ResolveOptions::new("p"));

        for path in names.imports().plain() {
            let class = ClassName::parse(path).unwrap();
            prop_assert_ne!(class.package(), "p");
            let referenced = context
                .references()
                .filter(|(_, r)| !r.suppressed && r.target.class().top_level_class() == class)
                .any(|(_, r)| {
                    let display = names.type_name(r.target.class());
                    display.len() < r.target.class().canonical_name().len()
                });
            prop_assert!(referenced, "import {} is not used by a shorter name", path);
        }
    }

    #[test]
    fn shadowing_restores_on_exit(
        scopes in prop::collection::vec(prop::collection::vec((0u8..3, any::<u16>()), 0..4), 0..6),
    ) {
        let mut map: PriorityMap<u8, u16> = PriorityMap::new();
        let mut snapshots = Vec::new();
        for bindings in &scopes {
            snapshots.push(map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>());
            for (key, value) in bindings {
                map.put(*key, *value);
            }
        }
        for bindings in scopes.iter().rev() {
            for (key, value) in bindings.iter().rev() {
                map.remove(key, value);
            }
            let visible: Vec<(u8, u16)> = map.iter().map(|(k, v)| (*k, *v)).collect();
            prop_assert_eq!(Some(visible), snapshots.pop());
        }
        prop_assert!(map.is_empty());
    }
}
