//! Scoped name and import resolution for generated Java.
//!
//! Resolution runs in two passes over an immutable notation:
//!
//! 1. [`Context::collect`] walks the notation once and builds the scope tree,
//!    recording the references made from each scope.
//! 2. [`resolve`] walks the scope tree with a [`PriorityMap`] of visible
//!    names and produces [`Names`], the display name of every referenced
//!    class plus the imports those names rely on.
//!
//! [`Names`] implements [`quill_notation::NameLookup`], so the notation can
//! then be resolved and printed.

mod context;
mod imports;
mod priority_map;
mod resolve;

pub use context::{Context, Reference, ScopeId, ScopeKind, ScopeNode, Target};
pub use imports::{ImportPath, ImportSet, StaticImport, compare_paths};
pub use priority_map::{FrozenPriorityMap, PriorityMap};
pub use resolve::{Names, ResolveOptions, resolve};
