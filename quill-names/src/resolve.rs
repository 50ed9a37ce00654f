//! Name and import resolution.
//!
//! Every referenced class gets one display name for the whole document: the
//! shortest suffix of its canonical name whose first segment resolves to the
//! right class in every scope the class is referenced from. Candidates are
//! checked from the bare simple name outwards (`Entry`, `Map.Entry`), and the
//! canonical name closes the list, so resolution always succeeds.
//!
//! A first segment is looked up in this order:
//!
//! 1. names bound by the scope tree (type variables and declared types, inner
//!    scopes shadowing outer ones)
//! 2. imports
//! 3. top-level classes of the file's own package, then `java.lang` when its
//!    types are not imported explicitly
//!
//! Imports are proposed for the top-level classes of every non-documentation
//! reference. Proposals no display name ends up using are rejected and the
//! assignment recomputed until every remaining import is used.

use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;
use quill_core::ClassName;
use quill_notation::NameLookup;

use crate::{
    Context, ImportSet, PriorityMap, ScopeId, StaticImport,
    context::Target,
};

/// Options threaded through both resolution passes.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    package: String,
    always_qualify: BTreeSet<String>,
    skip_java_lang_imports: bool,
    static_imports: BTreeSet<StaticImport>,
}

impl ResolveOptions {
    /// Options for a file in `package` (empty for the default package).
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }

    /// Simple names printed fully qualified, except on types the file
    /// declares itself.
    pub fn always_qualify(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.always_qualify.extend(names.into_iter().map(Into::into));
        self
    }

    /// Rely on the implicit `java.lang` import instead of importing its
    /// types explicitly.
    pub fn skip_java_lang_imports(mut self, skip: bool) -> Self {
        self.skip_java_lang_imports = skip;
        self
    }

    /// Request a static import.
    pub fn static_import(mut self, import: StaticImport) -> Self {
        self.static_imports.insert(import);
        self
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn skips_java_lang_imports(&self) -> bool {
        self.skip_java_lang_imports
    }

    pub fn static_imports(&self) -> impl Iterator<Item = &StaticImport> {
        self.static_imports.iter()
    }

    /// The requested static import that makes `class.member` usable bare.
    pub fn static_import_for(&self, class: &ClassName, member: &str) -> Option<&StaticImport> {
        self.static_imports
            .iter()
            .find(|import| import.covers(class, member))
    }

    fn is_always_qualified(&self, class: &ClassName) -> bool {
        class
            .simple_names()
            .iter()
            .any(|name| self.always_qualify.contains(name))
    }
}

/// The name assignment for one document.
#[derive(Debug, Clone, Default)]
pub struct Names {
    displays: HashMap<ClassName, String>,
    imports: ImportSet,
    static_imports: Vec<StaticImport>,
}

impl Names {
    /// The display name chosen for `class`, if it was referenced.
    pub fn display(&self, class: &ClassName) -> Option<&str> {
        self.displays.get(class).map(String::as_str)
    }

    /// Imports the file must declare.
    pub fn imports(&self) -> &ImportSet {
        &self.imports
    }
}

impl NameLookup for Names {
    fn type_name(&self, class: &ClassName) -> String {
        match self.displays.get(class) {
            Some(display) => display.clone(),
            None => class.canonical_name(),
        }
    }

    fn static_member(&self, class: &ClassName, member: &str) -> String {
        if self
            .static_imports
            .iter()
            .any(|import| import.covers(class, member))
        {
            member.to_string()
        } else {
            format!("{}.{}", self.type_name(class), member)
        }
    }
}

/// What a name is bound to by the scope tree.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    Type(ClassName),
    TypeVariable,
}

/// The scopes a class is referenced from.
#[derive(Debug, Default)]
struct Usage {
    live: Vec<ScopeId>,
    suppressed: Vec<ScopeId>,
}

impl Usage {
    fn add(&mut self, scope: ScopeId, suppressed: bool) {
        let scopes = if suppressed {
            &mut self.suppressed
        } else {
            &mut self.live
        };
        if !scopes.contains(&scope) {
            scopes.push(scope);
        }
    }

    /// Scopes the display name must be valid in.
    fn scopes(&self) -> &[ScopeId] {
        if self.live.is_empty() {
            &self.suppressed
        } else {
            &self.live
        }
    }
}

/// Assign display names and imports for the references in `context`.
#[tracing::instrument(level = "debug", skip_all, fields(package = options.package()))]
pub fn resolve(context: &Context, options: &ResolveOptions) -> Names {
    let resolver = Resolver::new(context, options);
    let mut rejected = HashSet::new();

    let (displays, imports) = loop {
        let imports = resolver.propose_imports(&rejected);
        let displays = resolver.assign(&imports);

        let used: HashSet<&ClassName> = resolver
            .usages
            .iter()
            .filter(|(_, usage)| !usage.live.is_empty())
            .filter_map(|(class, _)| {
                let display = displays.get(class)?;
                let top = class.top_level_class();
                let imported = imports.get(top.simple_name())?;
                (display.split('.').next() == Some(top.simple_name()) && *imported == top)
                    .then_some(imported)
            })
            .collect();

        let unused: Vec<ClassName> = imports
            .values()
            .filter(|class| !used.contains(class))
            .cloned()
            .collect();
        if unused.is_empty() {
            break (displays, imports);
        }
        for class in unused {
            tracing::debug!(import = %class, "rejecting unused import");
            rejected.insert(class);
        }
    };

    let mut import_set = ImportSet::new();
    for class in imports.values() {
        tracing::debug!(import = %class, "importing");
        import_set.add(class);
    }
    let static_imports: Vec<StaticImport> = options.static_imports().cloned().collect();
    for import in &static_imports {
        import_set.add_static(import);
    }

    Names {
        displays,
        imports: import_set,
        static_imports,
    }
}

struct Resolver<'a> {
    context: &'a Context,
    options: &'a ResolveOptions,
    /// Referenced classes in first-seen order.
    usages: IndexMap<ClassName, Usage>,
    /// Top-level classes visible without an import.
    implicit: HashMap<String, ClassName>,
    /// Simple names of the file's own top-level types.
    declared: HashSet<String>,
    /// Every type the file declares, at any depth.
    own: HashSet<ClassName>,
}

impl<'a> Resolver<'a> {
    fn new(context: &'a Context, options: &'a ResolveOptions) -> Self {
        let mut usages: IndexMap<ClassName, Usage> = IndexMap::new();
        for (scope, reference) in context.references() {
            if let Target::Static { class, member } = &reference.target {
                if options.static_import_for(class, member).is_some() {
                    continue;
                }
            }
            usages
                .entry(reference.target.class().clone())
                .or_default()
                .add(scope, reference.suppressed);
        }

        let declared: HashSet<String> = context
            .top_level_types()
            .map(|class| class.simple_name().to_string())
            .collect();

        let mut implicit = HashMap::new();
        let tops = context
            .top_level_types()
            .cloned()
            .chain(usages.keys().map(ClassName::top_level_class));
        let mut java_lang = Vec::new();
        for top in tops {
            if top.package() == options.package() {
                implicit
                    .entry(top.simple_name().to_string())
                    .or_insert(top);
            } else if top.is_java_lang() && options.skips_java_lang_imports() {
                java_lang.push(top);
            }
        }
        for top in java_lang {
            implicit
                .entry(top.simple_name().to_string())
                .or_insert(top);
        }

        let own = context.declared_types().cloned().collect();

        Self {
            context,
            options,
            usages,
            implicit,
            declared,
            own,
        }
    }

    /// Types the file declares are exempt from the always-qualify set.
    fn always_qualified(&self, class: &ClassName) -> bool {
        !self.own.contains(class) && self.options.is_always_qualified(class)
    }

    /// Import candidates keyed by simple name, in first-reference order.
    fn propose_imports(&self, rejected: &HashSet<ClassName>) -> IndexMap<String, ClassName> {
        let mut imports = IndexMap::new();
        for (class, usage) in &self.usages {
            if usage.live.is_empty() || self.always_qualified(class) {
                continue;
            }
            let top = class.top_level_class();
            if top.package().is_empty()
                || top.package() == self.options.package()
                || (top.is_java_lang() && self.options.skips_java_lang_imports())
                || rejected.contains(&top)
            {
                continue;
            }
            let simple = top.simple_name();
            if self.implicit.contains_key(simple)
                || self.declared.contains(simple)
                || imports.contains_key(simple)
            {
                continue;
            }
            imports.insert(simple.to_string(), top);
        }
        imports
    }

    /// Choose a display name for every referenced class.
    fn assign(&self, imports: &IndexMap<String, ClassName>) -> HashMap<ClassName, String> {
        let mut by_scope: HashMap<ScopeId, Vec<&ClassName>> = HashMap::new();
        for (class, usage) in &self.usages {
            for scope in usage.scopes() {
                by_scope.entry(*scope).or_default().push(class);
            }
        }

        // valid[class][i]: the candidate with i + 1 segments resolves everywhere
        let mut valid: HashMap<&ClassName, Vec<bool>> = self
            .usages
            .keys()
            .map(|class| (class, vec![true; class.depth()]))
            .collect();
        let mut bindings = PriorityMap::new();
        self.visit(Context::ROOT, &mut bindings, &by_scope, imports, &mut valid);

        self.usages
            .keys()
            .map(|class| {
                let name = match valid.get(class) {
                    Some(valid) if !self.always_qualified(class) => valid
                        .iter()
                        .position(|ok| *ok)
                        .map(|i| class.relative_name(class.depth() - i))
                        .unwrap_or_else(|| class.canonical_name()),
                    _ => class.canonical_name(),
                };
                tracing::trace!(class = %class, name = %name, "assigned display name");
                (class.clone(), name)
            })
            .collect()
    }

    /// Walk the scope tree depth first, binding names on entry and unbinding
    /// them on exit, and narrow each class's valid candidates at the scopes
    /// it is referenced from.
    fn visit<'c>(
        &self,
        scope: ScopeId,
        bindings: &mut PriorityMap<String, Binding>,
        by_scope: &HashMap<ScopeId, Vec<&'c ClassName>>,
        imports: &IndexMap<String, ClassName>,
        valid: &mut HashMap<&'c ClassName, Vec<bool>>,
    ) {
        let node = self.context.scope(scope);
        let mut bound = Vec::new();
        for name in node.type_variables() {
            bound.push((name.clone(), Binding::TypeVariable));
        }
        for class in self.context.member_types(scope) {
            bound.push((class.simple_name().to_string(), Binding::Type(class.clone())));
        }
        for (name, binding) in &bound {
            bindings.put(name.clone(), binding.clone());
        }

        for class in by_scope.get(&scope).into_iter().flatten() {
            if let Some(candidates) = valid.get_mut(*class) {
                for (i, ok) in candidates.iter_mut().enumerate() {
                    let depth = class.depth() - i;
                    *ok = *ok && self.resolves(class, depth, bindings, imports);
                }
            }
        }

        for child in node.children() {
            self.visit(*child, bindings, by_scope, imports, valid);
        }

        for (name, binding) in bound.iter().rev() {
            bindings.remove(name, binding);
        }
    }

    /// Whether `class.relative_name(depth)` names `class` with the current
    /// bindings.
    fn resolves(
        &self,
        class: &ClassName,
        depth: usize,
        bindings: &PriorityMap<String, Binding>,
        imports: &IndexMap<String, ClassName>,
    ) -> bool {
        let head = &class.simple_names()[depth - 1];
        let expected = class.enclosing_at(depth);
        match bindings.get(head.as_str()) {
            Some(Binding::Type(bound)) => *bound == expected,
            Some(Binding::TypeVariable) => false,
            None => match imports.get(head.as_str()) {
                Some(imported) => *imported == expected,
                None => self.implicit.get(head.as_str()) == Some(&expected),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use quill_notation::{Notation, Scope};

    use super::*;

    fn declare(class: &ClassName, inner: Notation) -> Notation {
        Notation::scoped(
            inner,
            Scope::Type {
                class: class.clone(),
                type_variables: Vec::new(),
            },
        )
    }

    fn resolve_notation(notation: &Notation, options: &ResolveOptions) -> Names {
        resolve(&Context::collect(notation), options)
    }

    #[test]
    fn test_simple_import() {
        let main = ClassName::new("com.example", "Main");
        let list = ClassName::new("java.util", "List");
        let notation = declare(&main, Notation::type_ref(list.clone()));

        let names = resolve_notation(&notation, &ResolveOptions::new("com.example"));
        assert_eq!(names.display(&list), Some("List"));
        assert!(names.imports().contains(&list));
    }

    #[test]
    fn test_same_package_not_imported() {
        let main = ClassName::new("com.example", "Main");
        let helper = ClassName::new("com.example", "Helper");
        let notation = declare(&main, Notation::type_ref(helper.clone()));

        let names = resolve_notation(&notation, &ResolveOptions::new("com.example"));
        assert_eq!(names.display(&helper), Some("Helper"));
        assert!(names.imports().is_empty());
    }

    #[test]
    fn test_first_of_colliding_imports_wins() {
        let main = ClassName::new("com.example", "Main");
        let util_list = ClassName::new("java.util", "List");
        let awt_list = ClassName::new("java.awt", "List");
        let notation = declare(
            &main,
            Notation::concat([
                Notation::type_ref(util_list.clone()),
                Notation::type_ref(awt_list.clone()),
            ]),
        );

        let names = resolve_notation(&notation, &ResolveOptions::new("com.example"));
        assert_eq!(names.display(&util_list), Some("List"));
        assert_eq!(names.display(&awt_list), Some("java.awt.List"));
        assert_eq!(names.imports().len(), 1);
    }

    #[test]
    fn test_nested_class_uses_top_level_import() {
        let main = ClassName::new("com.example", "Main");
        let entry = ClassName::new("java.util", "Map").nested_class("Entry");
        let notation = declare(&main, Notation::type_ref(entry.clone()));

        let names = resolve_notation(&notation, &ResolveOptions::new("com.example"));
        assert_eq!(names.display(&entry), Some("Map.Entry"));
        assert!(names.imports().contains(&ClassName::new("java.util", "Map")));
    }

    #[test]
    fn test_static_member() {
        let main = ClassName::new("com.example", "Main");
        let collections = ClassName::new("java.util", "Collections");
        let notation = declare(
            &main,
            Notation::concat([
                Notation::static_ref(collections.clone(), "emptyList"),
                Notation::static_ref(collections.clone(), "emptyMap"),
            ]),
        );
        let options = ResolveOptions::new("com.example")
            .static_import(StaticImport::new(collections.clone(), "emptyList"));

        let names = resolve_notation(&notation, &options);
        assert_eq!(names.static_member(&collections, "emptyList"), "emptyList");
        assert_eq!(
            names.static_member(&collections, "emptyMap"),
            "Collections.emptyMap"
        );
        let statics: Vec<&str> = names.imports().statics().collect();
        assert_eq!(statics, ["java.util.Collections.emptyList"]);
    }
}
