use super::*;
use objj_ir::build;
use pretty_assertions::assert_eq;

fn names(collected: &CollectedGlobals) -> Vec<(&str, bool)> {
    collected
        .implicit
        .iter()
        .map(|g| (g.name.as_str(), g.in_root))
        .collect()
}

#[test]
fn root_assignment_to_undeclared_name_is_recorded_without_warning() {
    let program = Program::new(vec![
        build::expr_stmt(build::assign(build::ident("x"), build::num("1"))),
        build::expr_stmt(build::assign(build::ident("x"), build::num("2"))),
    ]);
    let collected = collect(&program, &Environment::new());
    assert_eq!(names(&collected), vec![("x", true)]);
    assert!(collected.warnings.is_empty());
}

#[test]
fn declared_names_and_member_writes_are_not_globals() {
    let program = Program::new(vec![
        build::var("a", None),
        build::expr_stmt(build::assign(build::ident("a"), build::num("1"))),
        build::expr_stmt(build::assign(
            build::member(build::ident("obj"), "field"),
            build::num("1"),
        )),
        build::global(&["b"]),
        build::expr_stmt(build::assign(build::ident("b"), build::num("1"))),
    ]);
    let collected = collect(&program, &Environment::new());
    assert!(collected.implicit.is_empty());
    assert_eq!(collected.declared, vec!["b".to_string()]);
}

#[test]
fn nested_assignment_warns() {
    let program = Program::new(vec![build::function_decl(
        "f",
        &["p"],
        vec![
            build::expr_stmt(build::assign(build::ident("p"), build::num("1"))),
            build::expr_stmt(build::assign(build::ident("leak"), build::num("1"))),
        ],
    )]);
    let collected = collect(&program, &Environment::new());
    assert_eq!(names(&collected), vec![("leak", false)]);
    assert_eq!(collected.warnings.len(), 1);
    assert_eq!(collected.warnings[0].code, ErrorCode::W5001);
    assert_eq!(
        collected.warnings[0].message,
        "Creating global variable inside function or method"
    );
}

#[test]
fn hoisted_var_after_use_is_local() {
    let program = Program::new(vec![build::function_decl(
        "f",
        &[],
        vec![
            build::expr_stmt(build::assign(build::ident("later"), build::num("1"))),
            build::var("later", None),
        ],
    )]);
    assert!(collect(&program, &Environment::new()).implicit.is_empty());
}

#[test]
fn ivars_resolve_in_instance_methods_only() {
    let mut class = build::class("Foo", None);
    class.ivars.push(build::ivar("int", "count"));
    let assign_count = || build::expr_stmt(build::assign(build::ident("count"), build::num("0")));
    class.methods.push(build::method(
        MethodKind::Instance,
        Some("void"),
        vec![("reset", None)],
        vec![assign_count()],
    ));
    class.methods.push(build::method(
        MethodKind::Class,
        Some("void"),
        vec![("resetAll", None)],
        vec![assign_count()],
    ));
    let program = Program::new(vec![build::class_stmt(class)]);

    let collected = collect(&program, &Environment::new());
    assert_eq!(names(&collected), vec![("count", false)]);
}

#[test]
fn inherited_ivars_from_earlier_class_and_environment() {
    let mut env = Environment::new();
    env.declare_class(crate::environment::ClassDef {
        ivars: vec![crate::environment::IvarDef {
            name: "external".to_string(),
            type_name: "id".to_string(),
        }],
        ..crate::environment::ClassDef::new("Base")
    });
    let mut mid = build::class("Mid", Some("Base"));
    mid.ivars.push(build::ivar("id", "local"));
    let mut leaf = build::class("Leaf", Some("Mid"));
    leaf.methods.push(build::method(
        MethodKind::Instance,
        None,
        vec![("touch", None)],
        vec![
            build::expr_stmt(build::assign(build::ident("external"), build::null())),
            build::expr_stmt(build::assign(build::ident("local"), build::null())),
        ],
    ));
    let program = Program::new(vec![build::class_stmt(mid), build::class_stmt(leaf)]);

    assert!(collect(&program, &env).implicit.is_empty());
}
