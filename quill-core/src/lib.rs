//! Core types for the quill Java source generator.
//!
//! This crate provides the value types shared by every other quill crate:
//! canonical class identities, identifier rules, indentation units, the
//! error taxonomy and generated-file writing.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod class_name;
mod error;
mod file;
mod identifiers;
mod indent;

pub use class_name::ClassName;
pub use error::{Error, Marker, Result};
pub use file::{File, FileRules, GeneratedFile, Overwrite, WriteResult};
pub use identifiers::{JAVA_KEYWORDS, is_java_keyword, is_valid_identifier, validate_identifier};
pub use indent::Indent;
