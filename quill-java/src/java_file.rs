//! Whole Java source files.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use quill_core::{ClassName, Error, GeneratedFile, Indent, Result, WriteResult, validate_identifier};
use quill_names::{Context, ImportSet, Names, ResolveOptions, StaticImport, resolve};
use quill_notation::{DEFAULT_WIDTH, Emitter, Notation, PrintOptions, Printer, StringEmitter};

use crate::{CodeBlock, TypeSpec, layout::trim_lines};

/// A top-level type in its package, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaFile {
    package: String,
    type_spec: TypeSpec,
    comment: Option<CodeBlock>,
    indent: Indent,
    width: usize,
    skip_java_lang_imports: bool,
    always_qualify: BTreeSet<String>,
    static_imports: BTreeSet<StaticImport>,
}

impl JavaFile {
    /// Start a file declaring `type_spec` in `package` (empty for the default
    /// package).
    pub fn builder(package: impl Into<String>, type_spec: TypeSpec) -> JavaFileBuilder {
        JavaFileBuilder {
            file: JavaFile {
                package: package.into(),
                type_spec,
                comment: None,
                indent: Indent::JAVA,
                width: DEFAULT_WIDTH,
                skip_java_lang_imports: false,
                always_qualify: BTreeSet::new(),
                static_imports: BTreeSet::new(),
            },
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn type_spec(&self) -> &TypeSpec {
        &self.type_spec
    }

    /// The identity of the declared top-level type.
    pub fn class_name(&self) -> ClassName {
        ClassName::new(&self.package, &self.type_spec.name)
    }

    fn resolve_options(&self) -> ResolveOptions {
        let mut options = ResolveOptions::new(&self.package)
            .always_qualify(self.always_qualify.iter().cloned())
            .skip_java_lang_imports(self.skip_java_lang_imports);
        for import in &self.static_imports {
            options = options.static_import(import.clone());
        }
        options
    }

    /// `// ` before every line of the file comment.
    fn comment(&self) -> Notation {
        let Some(comment) = &self.comment else {
            return Notation::empty();
        };
        let body = trim_lines(comment.notation());
        if body.is_empty() {
            return Notation::empty();
        }
        Notation::text("// ").then(Notation::margin(body, "// "))
    }

    /// Render the file: comment, package, imports, static imports and the
    /// type, ending in a newline.
    #[tracing::instrument(level = "debug", skip_all, fields(class = %self.class_name()))]
    pub fn render(&self) -> String {
        let (comment, body, names) = self.resolve_names();

        let printer = Printer::new(
            PrintOptions::default()
                .with_width(self.width)
                .with_indent(self.indent),
        );
        let mut out = StringEmitter::new();
        if !comment.is_empty() {
            printer.print_to(&comment.resolve(&names), &mut out);
            out.emit_newline();
        }
        if !self.package.is_empty() {
            out.emit(&format!("package {};", self.package));
            out.emit_newline();
            out.emit_newline();
        }
        let imports = names.imports();
        for group in [
            imports.plain().map(|path| format!("import {path};")).collect::<Vec<_>>(),
            imports.statics().map(|path| format!("import static {path};")).collect(),
        ] {
            if group.is_empty() {
                continue;
            }
            for declaration in group {
                out.emit(&declaration);
                out.emit_newline();
            }
            out.emit_newline();
        }
        printer.print_to(&body.resolve(&names), &mut out);
        out.ensure_trailing_newline();
        out.output()
    }

    /// The imports the rendered file declares.
    pub fn imports(&self) -> ImportSet {
        let (_, _, names) = self.resolve_names();
        names.imports().clone()
    }

    /// Lower the comment and the type, then assign names over both.
    fn resolve_names(&self) -> (Notation, Notation, Names) {
        let comment = self.comment();
        let body = self.type_spec.lower(&self.class_name(), &[]);
        let document = Notation::suppressed(comment.clone()).then(body.clone());
        let names = resolve(&Context::collect(&document), &self.resolve_options());
        tracing::debug!(imports = names.imports().len(), "resolved names");
        (comment, body, names)
    }

    /// Write the file to `dir`, under directories named after the package.
    pub fn write_to_dir(&self, dir: &Path) -> eyre::Result<WriteResult> {
        self.write(dir)
    }
}

impl GeneratedFile for JavaFile {
    fn path(&self, base: &Path) -> PathBuf {
        let mut path = base.to_path_buf();
        path.extend(self.package.split('.').filter(|segment| !segment.is_empty()));
        path.push(format!("{}.java", self.type_spec.name));
        path
    }

    fn render(&self) -> String {
        JavaFile::render(self)
    }
}

/// Builder for [`JavaFile`].
#[derive(Debug, Clone)]
pub struct JavaFileBuilder {
    file: JavaFile,
}

impl JavaFileBuilder {
    /// Set the comment printed at the top of the file.
    pub fn comment(mut self, comment: CodeBlock) -> Self {
        self.file.comment = Some(comment);
        self
    }

    /// Set the indentation unit.
    pub fn indent(mut self, indent: Indent) -> Self {
        self.file.indent = indent;
        self
    }

    /// Set the column budget.
    pub fn width(mut self, width: usize) -> Self {
        self.file.width = width;
        self
    }

    /// Rely on the implicit `java.lang` import.
    pub fn skip_java_lang_imports(mut self, skip: bool) -> Self {
        self.file.skip_java_lang_imports = skip;
        self
    }

    /// Never import classes with this simple name.
    pub fn always_qualify(mut self, simple_name: impl Into<String>) -> Self {
        self.file.always_qualify.insert(simple_name.into());
        self
    }

    /// Import `Type.member`, or every static member with `Type.*`.
    pub fn static_import(mut self, import: StaticImport) -> Self {
        self.file.static_imports.insert(import);
        self
    }

    /// Validate the package and the declaration.
    pub fn build(self) -> Result<JavaFile> {
        let file = self.file;
        if !file.package.is_empty() {
            for segment in file.package.split('.') {
                if let Some(reason) = validate_identifier(segment) {
                    return Err(Error::invalid_name(&file.package, "package", reason));
                }
            }
        }
        file.type_spec.validate()?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_follows_package() {
        let file = JavaFile::builder("com.example.app", TypeSpec::class("Main"))
            .build()
            .unwrap();
        assert_eq!(
            file.path(Path::new("out")),
            Path::new("out/com/example/app/Main.java")
        );

        let file = JavaFile::builder("", TypeSpec::class("Main")).build().unwrap();
        assert_eq!(file.path(Path::new("out")), Path::new("out/Main.java"));
    }

    #[test]
    fn test_invalid_package() {
        let result = JavaFile::builder("com.class", TypeSpec::class("Main")).build();
        assert!(result.is_err());
        let result = JavaFile::builder("com..example", TypeSpec::class("Main")).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_imports() {
        let spec = TypeSpec::class("Main").field(crate::FieldSpec::new(
            ClassName::new("java.util", "List"),
            "items",
        ));
        let file = JavaFile::builder("com.example", spec).build().unwrap();
        let imports = file.imports();
        assert_eq!(imports.plain().collect::<Vec<_>>(), ["java.util.List"]);
    }

    #[test]
    fn test_default_package() {
        let file = JavaFile::builder("", TypeSpec::class("Main")).build().unwrap();
        assert_eq!(file.render(), "class Main {\n}\n");
    }
}
