//! Conversion of a validated manifest into declarations.

use quill_core::{ClassName, Indent, Result};
use quill_java::{
    AnnotationSpec, Arg, CodeBlock, EnumConstant, FieldSpec, JavaFile, MethodSpec, Modifier,
    ParameterSpec, TypeKind, TypeName, TypeSpec, TypeVariable,
};
use quill_names::StaticImport;

use crate::{
    AnnotationDecl, ArgDecl, CodeDecl, FieldDecl, FileConfig, IndentSetting, KindDecl,
    MethodDecl, TypeDecl, TypeVariableDecl,
};

pub(crate) fn java_file(file: &FileConfig, decl: &TypeDecl) -> Result<JavaFile> {
    let mut builder = JavaFile::builder(&file.package, type_spec(decl)?)
        .skip_java_lang_imports(file.skip_java_lang_imports);
    if let Some(comment) = &file.comment {
        builder = builder.comment(CodeBlock::text(comment));
    }
    if let Some(indent) = file.indent.as_ref().and_then(indent) {
        builder = builder.indent(indent);
    }
    if let Some(width) = file.width {
        builder = builder.width(width);
    }
    for name in &file.always_qualify {
        builder = builder.always_qualify(name);
    }
    for import in &file.static_imports {
        builder = builder.static_import(StaticImport::parse(import)?);
    }
    builder.build()
}

fn indent(setting: &IndentSetting) -> Option<Indent> {
    match setting {
        IndentSetting::Spaces(n) => Some(Indent::Spaces(*n)),
        IndentSetting::Named(name) => Indent::parse(name),
    }
}

fn type_spec(decl: &TypeDecl) -> Result<TypeSpec> {
    let kind = match decl.kind {
        KindDecl::Class => TypeKind::Class,
        KindDecl::Interface => TypeKind::Interface,
        KindDecl::Enum => TypeKind::Enum,
        KindDecl::Annotation => TypeKind::Annotation,
    };
    let mut spec = TypeSpec::new(kind, &decl.name).modifiers(modifiers(&decl.modifiers));
    if let Some(doc) = &decl.javadoc {
        spec = spec.javadoc(code(doc)?);
    }
    for annotation in &decl.annotations {
        spec = spec.annotation(annotation_spec(annotation)?);
    }
    for variable in &decl.type_variables {
        spec = spec.type_variable(type_variable(variable)?);
    }
    if let Some(superclass) = &decl.superclass {
        spec = spec.superclass(TypeName::parse(superclass)?);
    }
    for interface in &decl.interfaces {
        spec = spec.superinterface(TypeName::parse(interface)?);
    }
    for constant in &decl.constants {
        let mut enum_constant = EnumConstant::new(&constant.name);
        if let Some(doc) = &constant.javadoc {
            enum_constant.javadoc = Some(code(doc)?);
        }
        if let Some(arguments) = &constant.arguments {
            enum_constant = enum_constant.arguments(code(arguments)?);
        }
        if !constant.methods.is_empty() {
            let mut body = TypeSpec::anonymous(CodeBlock::default());
            for method in &constant.methods {
                body = body.method(method_spec(method)?);
            }
            enum_constant = enum_constant.body(body);
        }
        spec = spec.enum_constant(enum_constant);
    }
    for field in &decl.fields {
        spec = spec.field(field_spec(field)?);
    }
    if !decl.static_block.is_empty() {
        spec = spec.static_block(statements(&decl.static_block)?);
    }
    for method in &decl.methods {
        spec = spec.method(method_spec(method)?);
    }
    for nested in &decl.types {
        spec = spec.nested_type(type_spec(nested)?);
    }
    Ok(spec)
}

fn field_spec(decl: &FieldDecl) -> Result<FieldSpec> {
    let mut field = FieldSpec::new(TypeName::parse(&decl.ty)?, &decl.name)
        .modifiers(modifiers(&decl.modifiers));
    if let Some(doc) = &decl.javadoc {
        field = field.javadoc(code(doc)?);
    }
    for annotation in &decl.annotations {
        field = field.annotation(annotation_spec(annotation)?);
    }
    if let Some(initializer) = &decl.initializer {
        field = field.initializer(code(initializer)?);
    }
    Ok(field)
}

fn method_spec(decl: &MethodDecl) -> Result<MethodSpec> {
    let mut method = match (&decl.name, decl.constructor) {
        (Some(name), false) => MethodSpec::new(name),
        _ => MethodSpec::constructor(),
    };
    method = method
        .modifiers(modifiers(&decl.modifiers))
        .varargs(decl.varargs);
    if let Some(doc) = &decl.javadoc {
        method = method.javadoc(code(doc)?);
    }
    for annotation in &decl.annotations {
        method = method.annotation(annotation_spec(annotation)?);
    }
    for variable in &decl.type_variables {
        method = method.type_variable(type_variable(variable)?);
    }
    if let Some(returns) = &decl.returns {
        method = method.returns(TypeName::parse(returns)?);
    }
    for parameter in &decl.parameters {
        let mut spec = ParameterSpec::new(TypeName::parse(&parameter.ty)?, &parameter.name);
        for modifier in modifiers(&parameter.modifiers) {
            spec = spec.modifier(modifier);
        }
        for annotation in &parameter.annotations {
            spec = spec.annotation(annotation_spec(annotation)?);
        }
        method = method.parameter(spec);
    }
    for exception in &decl.exceptions {
        method = method.exception(TypeName::parse(exception)?);
    }

    let mut body = CodeBlock::builder();
    for statement in &decl.statements {
        body = body.add_statement(statement.format(), args(statement)?);
    }
    if let Some(code) = &decl.code {
        body = body.add(code.format(), args(code)?);
    }
    method = method.code(body.build()?);

    if let Some(default) = &decl.default {
        method = method.default_value(code(default)?);
    }
    Ok(method)
}

fn annotation_spec(decl: &AnnotationDecl) -> Result<AnnotationSpec> {
    let mut annotation = AnnotationSpec::new(ClassName::parse(&decl.ty)?);
    for (name, values) in &decl.members {
        for value in values.iter() {
            annotation = annotation.member(name, code(value)?);
        }
    }
    Ok(annotation)
}

fn type_variable(decl: &TypeVariableDecl) -> Result<TypeVariable> {
    let mut variable = TypeVariable::new(decl.name());
    for bound in decl.bounds() {
        variable = variable.bound(TypeName::parse(bound)?);
    }
    Ok(variable)
}

/// Unknown keywords are rejected during validation.
fn modifiers(keywords: &[String]) -> Vec<Modifier> {
    keywords
        .iter()
        .filter_map(|keyword| Modifier::parse(keyword))
        .collect()
}

fn code(decl: &CodeDecl) -> Result<CodeBlock> {
    CodeBlock::of(decl.format(), args(decl)?)
}

fn statements(decls: &[CodeDecl]) -> Result<CodeBlock> {
    let mut builder = CodeBlock::builder();
    for decl in decls {
        builder = builder.add_statement(decl.format(), args(decl)?);
    }
    builder.build()
}

fn args(decl: &CodeDecl) -> Result<Vec<Arg>> {
    decl.args()
        .iter()
        .map(|arg| match arg {
            ArgDecl::Literal(text) | ArgDecl::Name(text) | ArgDecl::String(text) => {
                Ok(Arg::from(text.as_str()))
            }
            ArgDecl::Type(ty) => TypeName::parse(ty).map(Arg::Type),
        })
        .collect()
}
