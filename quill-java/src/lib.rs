//! Java declarations lowered to notations.
//!
//! Declarations are plain values built with consuming setters. Each lowers
//! to a [`quill_notation::Notation`] in which class references stay symbolic;
//! [`JavaFile::render`] resolves them against the whole file before printing.
//!
//! # Module Organization
//!
//! - [`TypeName`] - Primitive, class, array, parameterized, variable and wildcard types
//! - [`CodeBlock`] - Code fragments built from `$L`/`$N`/`$S`/`$T` templates
//! - [`AnnotationSpec`], [`FieldSpec`], [`ParameterSpec`], [`MethodSpec`], [`TypeSpec`] - Declarations
//! - [`JavaFile`] - A top-level type with its package, imports and file options

mod annotation;
mod code_block;
mod field;
mod java_file;
mod layout;
mod method;
mod modifier;
mod parameter;
mod type_name;
mod type_spec;

pub use annotation::AnnotationSpec;
pub use code_block::{Arg, CodeBlock, CodeBlockBuilder};
pub use field::FieldSpec;
pub use java_file::{JavaFile, JavaFileBuilder};
pub use method::MethodSpec;
pub use modifier::Modifier;
pub use parameter::ParameterSpec;
pub use type_name::{Primitive, TypeName, TypeVariable, Wildcard};
pub use type_spec::{EnumConstant, TypeKind, TypeSpec};
