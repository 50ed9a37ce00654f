//! Validation of manifest names, types and modifiers

use miette::SourceSpan;
use quill_core::{is_java_keyword, validate_identifier};
use quill_java::{Modifier, TypeName};
use quill_names::StaticImport;

use crate::{
    AnnotationDecl, ArgDecl, CodeDecl, Error, FieldDecl, FileConfig, MethodDecl, Result, TypeDecl,
    TypeVariableDecl,
};

/// Parsing and validation context that carries source information.
///
/// This struct encapsulates the source content, filename, and current path
/// through the declaration tree, so errors can name where they happened and
/// point at the offending text.
///
/// # Example
///
/// ```ignore
/// let ctx = ParseContext::new(src, "quill.toml");
/// ctx.validate_name("Main", "type")?;
///
/// // For nested validation
/// let nested = ctx.push("Main").push("run");
/// nested.validate_name("args", "parameter")?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    /// The raw manifest source
    src: &'a str,
    /// The filename for error reporting
    filename: &'a str,
    /// Path segments for nested validation (e.g., ["Outer", "Inner", "run"])
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    /// Create a new parse context with the given source and filename.
    pub fn new(src: &'a str, filename: &'a str) -> Self {
        Self {
            src,
            filename,
            path: Vec::new(),
        }
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    pub fn filename(&self) -> &'a str {
        self.filename
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut path = self.path.clone();
        path.push(segment);
        Self {
            src: self.src,
            filename: self.filename,
            path,
        }
    }

    /// Get the current path as a dot-separated string.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Get a context description for error messages.
    ///
    /// For example: "parameter in 'Main.run'" or just "type" if no path.
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    /// Find the span of a quoted value in the source.
    pub fn find_span(&self, value: &str) -> Option<SourceSpan> {
        find_value_span(self.src, value)
    }

    /// Validate that a name is a Java identifier.
    pub fn validate_name(&self, name: &str, kind: &str) -> Result<()> {
        if is_java_keyword(name) {
            return Err(Error::reserved_keyword(
                name,
                self.context_for(kind),
                self.src,
                self.filename,
                self.find_span(name),
            ));
        }
        if let Some(reason) = validate_identifier(name) {
            return Err(Error::invalid_identifier(
                name,
                self.context_for(kind),
                reason,
                self.src,
                self.filename,
                self.find_span(name),
            ));
        }
        Ok(())
    }

    /// Validate that a type is well-formed Java type syntax.
    pub fn validate_type(&self, ty: &str, kind: &str) -> Result<()> {
        TypeName::parse(ty).map(|_| ()).map_err(|err| {
            Error::invalid_type(
                ty,
                self.context_for(kind),
                err.to_string(),
                self.src,
                self.filename,
                self.find_span(ty),
            )
        })
    }

    /// Validate that every modifier is a Java modifier keyword.
    pub fn validate_modifiers(&self, modifiers: &[String]) -> Result<()> {
        for modifier in modifiers {
            if Modifier::parse(modifier).is_none() {
                return Err(self.validation_error(format!(
                    "unknown modifier '{modifier}' on {}",
                    self.context_for("declaration")
                ), modifier));
            }
        }
        Ok(())
    }

    /// Create a validation error pointing at `value`.
    pub fn validation_error(&self, message: impl Into<String>, value: &str) -> Box<Error> {
        Error::validation(message, self.src, self.filename, self.find_span(value))
    }
}

/// Find the span of a quoted string value, e.g. `"Main"`, in TOML or JSON
/// source. The span covers the text between the quotes.
pub(crate) fn find_value_span(src: &str, value: &str) -> Option<SourceSpan> {
    if value.is_empty() {
        return None;
    }
    let patterns = [format!("\"{value}\""), format!("'{value}'")];
    for pattern in &patterns {
        if let Some(pos) = src.find(pattern.as_str()) {
            return Some(SourceSpan::from((pos + 1, value.len())));
        }
    }
    src.find(value)
        .map(|pos| SourceSpan::from((pos, value.len())))
}

pub(crate) fn validate_file(ctx: &ParseContext<'_>, file: &FileConfig) -> Result<()> {
    if !file.package.is_empty() {
        for segment in file.package.split('.') {
            ctx.validate_name(segment, "package segment")?;
        }
    }
    for name in &file.always_qualify {
        ctx.validate_name(name, "always-qualified name")?;
    }
    for import in &file.static_imports {
        if let Err(err) = StaticImport::parse(import) {
            return Err(ctx.validation_error(
                format!("invalid static import '{import}': {err}"),
                import,
            ));
        }
    }
    Ok(())
}

pub(crate) fn validate_type<'a>(ctx: &ParseContext<'a>, decl: &'a TypeDecl) -> Result<()> {
    ctx.validate_name(&decl.name, "type")?;
    let ctx = ctx.push(&decl.name);
    ctx.validate_modifiers(&decl.modifiers)?;
    validate_optional_code(&ctx, decl.javadoc.as_ref(), "javadoc")?;
    validate_type_variables(&ctx, &decl.type_variables)?;
    validate_annotations(&ctx, &decl.annotations)?;
    if let Some(superclass) = &decl.superclass {
        ctx.validate_type(superclass, "superclass")?;
    }
    for interface in &decl.interfaces {
        ctx.validate_type(interface, "interface")?;
    }
    for constant in &decl.constants {
        ctx.validate_name(&constant.name, "enum constant")?;
        let constant_ctx = ctx.push(&constant.name);
        validate_optional_code(&constant_ctx, constant.javadoc.as_ref(), "javadoc")?;
        validate_optional_code(&constant_ctx, constant.arguments.as_ref(), "constant arguments")?;
        for method in &constant.methods {
            validate_method(&constant_ctx, method)?;
        }
    }
    for field in &decl.fields {
        validate_field(&ctx, field)?;
    }
    for statement in &decl.static_block {
        validate_code(&ctx, statement, "static block")?;
    }
    for method in &decl.methods {
        validate_method(&ctx, method)?;
    }
    for nested in &decl.types {
        validate_type(&ctx, nested)?;
    }
    Ok(())
}

fn validate_field<'a>(ctx: &ParseContext<'a>, field: &'a FieldDecl) -> Result<()> {
    ctx.validate_name(&field.name, "field")?;
    let ctx = ctx.push(&field.name);
    ctx.validate_type(&field.ty, "field type")?;
    ctx.validate_modifiers(&field.modifiers)?;
    validate_optional_code(&ctx, field.javadoc.as_ref(), "javadoc")?;
    validate_optional_code(&ctx, field.initializer.as_ref(), "initializer")?;
    validate_annotations(&ctx, &field.annotations)
}

fn validate_method<'a>(ctx: &ParseContext<'a>, method: &'a MethodDecl) -> Result<()> {
    match (&method.name, method.constructor) {
        (Some(name), false) => ctx.validate_name(name, "method")?,
        (None, false) => {
            return Err(ctx.validation_error(
                format!("a method in {} has no name", ctx.context_for("type")),
                ctx.path.last().copied().unwrap_or_default(),
            ));
        }
        (Some(name), true) => {
            return Err(ctx.validation_error(
                format!("constructor '{name}' must not have a name"),
                name,
            ));
        }
        (None, true) => {}
    }
    let ctx = ctx.push(method.display_name());
    ctx.validate_modifiers(&method.modifiers)?;
    validate_type_variables(&ctx, &method.type_variables)?;
    validate_annotations(&ctx, &method.annotations)?;
    if let Some(returns) = &method.returns {
        ctx.validate_type(returns, "return type")?;
    }
    for parameter in &method.parameters {
        ctx.validate_name(&parameter.name, "parameter")?;
        ctx.validate_type(&parameter.ty, "parameter type")?;
        ctx.validate_modifiers(&parameter.modifiers)?;
        validate_annotations(&ctx, &parameter.annotations)?;
    }
    for exception in &method.exceptions {
        ctx.validate_type(exception, "exception")?;
    }
    validate_optional_code(&ctx, method.javadoc.as_ref(), "javadoc")?;
    for statement in &method.statements {
        validate_code(&ctx, statement, "statement")?;
    }
    validate_optional_code(&ctx, method.code.as_ref(), "code")?;
    validate_optional_code(&ctx, method.default.as_ref(), "default value")
}

fn validate_type_variables(ctx: &ParseContext<'_>, variables: &[TypeVariableDecl]) -> Result<()> {
    for variable in variables {
        ctx.validate_name(variable.name(), "type variable")?;
        for bound in variable.bounds() {
            ctx.validate_type(bound, "type variable bound")?;
        }
    }
    Ok(())
}

fn validate_annotations(ctx: &ParseContext<'_>, annotations: &[AnnotationDecl]) -> Result<()> {
    for annotation in annotations {
        ctx.validate_type(&annotation.ty, "annotation")?;
        for (name, values) in &annotation.members {
            ctx.validate_name(name, "annotation member")?;
            for value in values.iter() {
                validate_code(ctx, value, "annotation member")?;
            }
        }
    }
    Ok(())
}

fn validate_optional_code(
    ctx: &ParseContext<'_>,
    code: Option<&CodeDecl>,
    kind: &str,
) -> Result<()> {
    match code {
        Some(code) => validate_code(ctx, code, kind),
        None => Ok(()),
    }
}

/// Check template arguments: names are identifiers, types parse, and each
/// argument's key matches the placeholder it fills.
///
/// Missing or unused arguments are left to the code block builder.
fn validate_code(ctx: &ParseContext<'_>, code: &CodeDecl, kind: &str) -> Result<()> {
    let args = code.args();
    for arg in args {
        match arg {
            ArgDecl::Name(name) => ctx.validate_name(name, "name argument")?,
            ArgDecl::Type(ty) => ctx.validate_type(ty, "type argument")?,
            ArgDecl::Literal(_) | ArgDecl::String(_) => {}
        }
    }
    for (index, placeholder) in placeholders(code.format()) {
        let Some(arg) = args.get(index) else {
            continue;
        };
        if !arg.fits(placeholder) {
            return Err(ctx.validation_error(
                format!(
                    "argument {} of {} is a {}, but '${placeholder}' needs a {}",
                    index + 1,
                    ctx.context_for(kind),
                    arg.tag(),
                    placeholder_tag(placeholder),
                ),
                arg.value(),
            ));
        }
    }
    Ok(())
}

fn placeholder_tag(placeholder: char) -> &'static str {
    match placeholder {
        'N' => "name",
        'S' => "string",
        'T' => "type",
        _ => "literal",
    }
}

/// Argument placeholders of a template with the zero-based argument index
/// each one consumes. Relative (`$T`) and positional (`$2T`) forms only.
fn placeholders(format: &str) -> Vec<(usize, char)> {
    let mut found = Vec::new();
    let mut relative = 0;
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            continue;
        }
        match chars.next() {
            Some(kind @ ('L' | 'N' | 'S' | 'T')) => {
                found.push((relative, kind));
                relative += 1;
            }
            Some(digit) if digit.is_ascii_digit() => {
                let mut digits = String::from(digit);
                while let Some(digit) = chars.next_if(char::is_ascii_digit) {
                    digits.push(digit);
                }
                let index = digits.parse::<usize>().ok().and_then(|i| i.checked_sub(1));
                if let (Some(index), Some(kind @ ('L' | 'N' | 'S' | 'T'))) = (index, chars.next()) {
                    found.push((index, kind));
                }
            }
            _ => {}
        }
    }
    found
}
