//! Declaration manifests for the quill Java source generator.
//!
//! A manifest describes one Java file: a `[file]` table with the package and
//! rendering options, and a `[type]` table tree with the declarations. It is
//! read from TOML or JSON, validated with source spans for diagnostics, and
//! converted into a [`quill_java::JavaFile`].

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod convert;
mod error;
mod manifest;
mod model;
mod validate;

pub use error::{Error, Result};
pub use manifest::{Format, Manifest};
pub use model::*;
pub use validate::ParseContext;
