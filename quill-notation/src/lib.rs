//! Document layout algebra for the quill Java source generator.
//!
//! A [`Notation`] is an immutable tree of text, mandatory line breaks,
//! indentation scopes, statements and two-alternative [choice points]. The
//! [`Printer`] walks a notation once and decides, per run of choice points on
//! the same line, whether the compact alternative fits the column budget.
//!
//! Type references stay symbolic ([`Kind::TypeRef`]) until a [`NameLookup`]
//! substitutes them through [`Notation::resolve`].
//!
//! # Module Organization
//!
//! - [`Notation`] - The document tree and its leaf constructors
//! - [`Notation::hoist`] / [`Notation::join`] - Choice and join combinators
//! - [`Printer`] - Width-aware renderer writing to an [`Emitter`]
//! - [`Renderable`] - Trait for declarations that lower to a notation
//!
//! [choice points]: Kind::Choice

mod combinators;
mod emitter;
mod notation;
mod printer;
mod renderable;

pub use emitter::{Emitter, StringEmitter};
pub use notation::{Kind, Margin, Measure, Notation, Scope};
pub use printer::{DEFAULT_WIDTH, PrintOptions, Printer};
pub use renderable::{CanonicalNames, NameLookup, Renderable};
