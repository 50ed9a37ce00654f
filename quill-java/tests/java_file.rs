use quill_core::{ClassName, Indent, WriteResult};
use quill_java::{
    Arg, CodeBlock, EnumConstant, FieldSpec, JavaFile, MethodSpec, Modifier, ParameterSpec,
    TypeName, TypeSpec, TypeVariable,
};
use quill_names::StaticImport;

fn statement(format: &str, args: impl IntoIterator<Item = Arg>) -> CodeBlock {
    CodeBlock::builder().add_statement(format, args).build().unwrap()
}

#[test]
fn test_hello_world() {
    let main = MethodSpec::new("main")
        .modifiers([Modifier::Public, Modifier::Static])
        .parameter(ParameterSpec::new(TypeName::array_of(ClassName::string()), "args"))
        .code(statement("$T.out.println($S)", [
            Arg::from(ClassName::java_lang("System")),
            Arg::from("Hello, quill!"),
        ]));
    let hello = TypeSpec::class("HelloWorld")
        .modifiers([Modifier::Public, Modifier::Final])
        .method(main);
    let file = JavaFile::builder("com.example.helloworld", hello).build().unwrap();

    insta::assert_snapshot!(file.render(), @r#"
package com.example.helloworld;

import java.lang.String;
import java.lang.System;

public final class HelloWorld {
  public static void main(String[] args) {
    System.out.println("Hello, quill!");
  }
}
"#);
}

#[test]
fn test_first_reference_wins_a_colliding_name() {
    let util_list = ClassName::new("java.util", "List");
    let awt_list = ClassName::new("java.awt", "List");
    let gallery = TypeSpec::class("Gallery")
        .field(FieldSpec::new(
            TypeName::parameterized(util_list, [TypeName::string()]),
            "names",
        ))
        .field(FieldSpec::new(awt_list, "widget"));
    let file = JavaFile::builder("com.example", gallery).build().unwrap();

    insta::assert_snapshot!(file.render(), @r#"
package com.example;

import java.lang.String;
import java.util.List;

class Gallery {
  List<String> names;

  java.awt.List widget;
}
"#);
}

#[test]
fn test_member_type_shadows_imported_name() {
    let entry = ClassName::new("java.util", "Map").nested_class("Entry");
    let outer = TypeSpec::class("Outer")
        .field(FieldSpec::new(entry, "entry"))
        .nested_type(TypeSpec::class("Entry"));
    let file = JavaFile::builder("com.example", outer).build().unwrap();

    assert_eq!(
        file.render(),
        "package com.example;\n\nimport java.util.Map;\n\nclass Outer {\n  Map.Entry entry;\n\n  class Entry {\n  }\n}\n"
    );
}

#[test]
fn test_member_type_referenced_by_simple_name() {
    let outer = ClassName::new("com.example", "Outer");
    let spec = TypeSpec::class("Outer")
        .field(FieldSpec::new(outer.nested_class("Inner"), "inner"))
        .nested_type(TypeSpec::class("Inner").modifiers([Modifier::Static]));
    let file = JavaFile::builder("com.example", spec).build().unwrap();

    assert_eq!(
        file.render(),
        "package com.example;\n\nclass Outer {\n  Inner inner;\n\n  static class Inner {\n  }\n}\n"
    );
}

#[test]
fn test_type_variable_shadows_class() {
    let spec = TypeSpec::class("Box")
        .type_variable(TypeVariable::new("T"))
        .field(FieldSpec::new(TypeName::variable("T"), "value"))
        .field(FieldSpec::new(ClassName::new("com.other", "T"), "other"));
    let file = JavaFile::builder("com.example", spec).build().unwrap();

    assert_eq!(
        file.render(),
        "package com.example;\n\nclass Box<T> {\n  T value;\n\n  com.other.T other;\n}\n"
    );
}

#[test]
fn test_javadoc_references_do_not_import() {
    let random = ClassName::new("java.util", "Random");
    let doc = CodeBlock::of("Rolls with {@link $T}.", [Arg::from(&random)]).unwrap();
    let dice = TypeSpec::class("Dice").javadoc(doc.clone());
    let file = JavaFile::builder("com.example", dice).build().unwrap();

    insta::assert_snapshot!(file.render(), @r#"
package com.example;

/**
 * Rolls with {@link java.util.Random}.
 */
class Dice {
}
"#);

    let dice = TypeSpec::class("Dice")
        .javadoc(doc)
        .field(FieldSpec::new(random, "random"));
    let file = JavaFile::builder("com.example", dice).build().unwrap();
    assert_eq!(
        file.render(),
        "package com.example;\n\nimport java.util.Random;\n\n/**\n * Rolls with {@link Random}.\n */\nclass Dice {\n  Random random;\n}\n"
    );
}

#[test]
fn test_enum_with_constant_body() {
    let to_string = MethodSpec::new("toString")
        .annotation(ClassName::java_lang("Override"))
        .modifiers([Modifier::Public])
        .returns(ClassName::string())
        .code(statement("return $S", [Arg::from("avalanche!")]));
    let roshambo = TypeSpec::enumeration("Roshambo")
        .modifiers([Modifier::Public])
        .enum_constant(
            EnumConstant::new("ROCK")
                .arguments(CodeBlock::text("\"fist\""))
                .body(TypeSpec::anonymous(CodeBlock::default()).method(to_string)),
        )
        .enum_constant(EnumConstant::new("SCISSORS").arguments(CodeBlock::text("\"peace\"")))
        .field(
            FieldSpec::new(ClassName::string(), "handPosition")
                .modifiers([Modifier::Private, Modifier::Final]),
        )
        .method(
            MethodSpec::constructor()
                .parameter(ParameterSpec::new(ClassName::string(), "handPosition"))
                .code(statement("this.handPosition = handPosition", [])),
        );
    let file = JavaFile::builder("com.example", roshambo)
        .skip_java_lang_imports(true)
        .build()
        .unwrap();

    insta::assert_snapshot!(file.render(), @r#"
package com.example;

public enum Roshambo {
  ROCK("fist") {
    @Override
    public String toString() {
      return "avalanche!";
    }
  },
  SCISSORS("peace");

  private final String handPosition;

  Roshambo(String handPosition) {
    this.handPosition = handPosition;
  }
}
"#);
}

#[test]
fn test_static_imports() {
    let collections = ClassName::new("java.util", "Collections");
    let code = CodeBlock::builder()
        .add_statement("$T.sort(list)", [Arg::from(&collections)])
        .add_statement("list.addAll($T.emptyList())", [Arg::from(&collections)])
        .build()
        .unwrap();
    let sorter = TypeSpec::class("Sorter").method(
        MethodSpec::new("run")
            .parameter(ParameterSpec::new(ClassName::new("java.util", "List"), "list"))
            .code(code),
    );
    let file = JavaFile::builder("com.example", sorter)
        .static_import(StaticImport::new(collections, "sort"))
        .build()
        .unwrap();

    insta::assert_snapshot!(file.render(), @r#"
package com.example;

import java.util.Collections;
import java.util.List;

import static java.util.Collections.sort;

class Sorter {
  void run(List list) {
    sort(list);
    list.addAll(Collections.emptyList());
  }
}
"#);
}

#[test]
fn test_always_qualify() {
    let spec = TypeSpec::class("Holder")
        .field(FieldSpec::new(ClassName::new("java.util", "List"), "items"));
    let file = JavaFile::builder("com.example", spec)
        .always_qualify("List")
        .build()
        .unwrap();

    assert_eq!(
        file.render(),
        "package com.example;\n\nclass Holder {\n  java.util.List items;\n}\n"
    );
}

#[test]
fn test_comment_and_indent() {
    let spec = TypeSpec::class("Point").field(FieldSpec::new(quill_java::Primitive::Int, "x"));
    let file = JavaFile::builder("com.example", spec)
        .comment(CodeBlock::text("Generated by quill.\nDo not edit."))
        .indent(Indent::Spaces(4))
        .build()
        .unwrap();

    assert_eq!(
        file.render(),
        "// Generated by quill.\n// Do not edit.\npackage com.example;\n\nclass Point {\n    int x;\n}\n"
    );
}

#[test]
fn test_render_is_deterministic() {
    let spec = TypeSpec::class("Main")
        .field(FieldSpec::new(ClassName::new("java.util", "List"), "a"))
        .field(FieldSpec::new(ClassName::new("java.awt", "List"), "b"))
        .field(FieldSpec::new(ClassName::new("java.util", "Map"), "c"));
    let file = JavaFile::builder("com.example", spec).build().unwrap();
    assert_eq!(file.render(), file.render());
}

#[test]
fn test_build_rejects_invalid_declarations() {
    let abstract_with_body = TypeSpec::class("Main").method(
        MethodSpec::new("run")
            .modifiers([Modifier::Abstract])
            .code(CodeBlock::text("x();")),
    );
    assert!(JavaFile::builder("com.example", abstract_with_body).build().is_err());
    assert!(JavaFile::builder("com.example", TypeSpec::class("enum")).build().is_err());
    assert!(JavaFile::builder("com.1example", TypeSpec::class("Main")).build().is_err());
}

#[test]
fn test_write_to_dir() {
    let dir = tempfile::tempdir().unwrap();
    let file = JavaFile::builder("com.example", TypeSpec::class("Main"))
        .build()
        .unwrap();

    let result = file.write_to_dir(dir.path()).unwrap();
    let expected = dir.path().join("com/example/Main.java");
    assert_eq!(result, WriteResult::Written(expected.clone()));
    assert_eq!(std::fs::read_to_string(expected).unwrap(), file.render());
}
