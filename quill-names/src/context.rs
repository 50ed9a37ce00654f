//! The scope tree collected from a notation (pass 1).

use quill_core::ClassName;
use quill_notation::{Kind, Notation, Scope};

/// Index of a scope in a [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

/// What opened a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    /// The compilation unit.
    File,
    /// A named type declaration.
    Type(ClassName),
    /// A generic method or constructor.
    Member,
    /// An anonymous class body.
    Anonymous,
    /// A brace block inside code.
    Block,
}

/// What a reference points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Type(ClassName),
    Static { class: ClassName, member: String },
}

impl Target {
    /// The class the reference names.
    pub fn class(&self) -> &ClassName {
        match self {
            Self::Type(class) | Self::Static { class, .. } => class,
        }
    }
}

/// A type or static member reference made from a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub target: Target,
    /// Made from documentation, which never forces an import.
    pub suppressed: bool,
}

/// One nesting level of the scope tree.
#[derive(Debug, Clone)]
pub struct ScopeNode {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    type_variables: Vec<String>,
    references: Vec<Reference>,
}

impl ScopeNode {
    fn new(kind: ScopeKind, parent: Option<ScopeId>, type_variables: Vec<String>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            type_variables,
            references: Vec::new(),
        }
    }

    pub fn kind(&self) -> &ScopeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    pub fn type_variables(&self) -> &[String] {
        &self.type_variables
    }

    /// References made directly in this scope, in document order.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }
}

/// The scope tree of one document and the references made in each scope.
///
/// Built fresh for every render and discarded afterwards.
#[derive(Debug, Clone)]
pub struct Context {
    scopes: Vec<ScopeNode>,
}

impl Context {
    /// The file scope.
    pub const ROOT: ScopeId = ScopeId(0);

    /// Walk `notation` in document order, recording every scope it opens and
    /// every reference it makes.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn collect(notation: &Notation) -> Self {
        let mut context = Self {
            scopes: vec![ScopeNode::new(ScopeKind::File, None, Vec::new())],
        };
        context.walk(notation, Self::ROOT, false);
        tracing::debug!(scopes = context.scopes.len(), "collected scope tree");
        context
    }

    fn walk(&mut self, notation: &Notation, scope: ScopeId, suppressed: bool) {
        match notation.kind() {
            Kind::Empty | Kind::Text(_) | Kind::Line => {}
            Kind::TypeRef(class) => self.reference(scope, Target::Type(class.clone()), suppressed),
            Kind::StaticImportRef { class, member } => {
                let target = Target::Static {
                    class: class.clone(),
                    member: member.clone(),
                };
                self.reference(scope, target, suppressed);
            }
            Kind::Concat(items) => {
                for item in items {
                    self.walk(item, scope, suppressed);
                }
            }
            Kind::Choice { flat, broken } => {
                self.walk(flat, scope, suppressed);
                self.walk(broken, scope, suppressed);
            }
            Kind::Indent { inner, .. } | Kind::Statement(inner) => {
                self.walk(inner, scope, suppressed)
            }
            Kind::Suppressed(inner) => self.walk(inner, scope, true),
            Kind::Scoped { inner, scope: declared } => {
                let child = self.open(scope, declared);
                self.walk(inner, child, suppressed);
            }
        }
    }

    fn reference(&mut self, scope: ScopeId, target: Target, suppressed: bool) {
        self.scopes[scope.0]
            .references
            .push(Reference { target, suppressed });
    }

    fn open(&mut self, parent: ScopeId, declared: &Scope) -> ScopeId {
        let kind = match declared {
            Scope::Type { class, .. } => ScopeKind::Type(class.clone()),
            Scope::Member { .. } => ScopeKind::Member,
            Scope::Anonymous => ScopeKind::Anonymous,
            Scope::Block => ScopeKind::Block,
        };
        let id = ScopeId(self.scopes.len());
        self.scopes.push(ScopeNode::new(
            kind,
            Some(parent),
            declared.type_variables().to_vec(),
        ));
        self.scopes[parent.0].children.push(id);
        id
    }

    pub fn scope(&self, id: ScopeId) -> &ScopeNode {
        &self.scopes[id.0]
    }

    /// All scope ids in document order, the file scope first.
    pub fn ids(&self) -> impl Iterator<Item = ScopeId> + '_ {
        (0..self.scopes.len()).map(ScopeId)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Types declared directly inside `id`.
    pub fn member_types(&self, id: ScopeId) -> impl Iterator<Item = &ClassName> + '_ {
        self.scope(id)
            .children
            .iter()
            .filter_map(|child| match &self.scope(*child).kind {
                ScopeKind::Type(class) => Some(class),
                _ => None,
            })
    }

    /// Top-level types declared in the file.
    pub fn top_level_types(&self) -> impl Iterator<Item = &ClassName> + '_ {
        self.member_types(Self::ROOT)
    }

    /// Every type declared anywhere in the file.
    pub fn declared_types(&self) -> impl Iterator<Item = &ClassName> + '_ {
        self.scopes.iter().filter_map(|scope| match &scope.kind {
            ScopeKind::Type(class) => Some(class),
            _ => None,
        })
    }

    /// Every reference with the scope it was made from, in document order
    /// within each scope.
    pub fn references(&self) -> impl Iterator<Item = (ScopeId, &Reference)> + '_ {
        self.ids().flat_map(move |id| {
            self.scope(id)
                .references
                .iter()
                .map(move |reference| (id, reference))
        })
    }
}
