//! Golden tests for Objective-J lowering.
//!
//! Each test builds a syntax tree, lowers it with [`compile`] and compares
//! the generated text, or the error, with the expected result.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use objj_codegen::{compile, CompileError, CompileOptions, CompileOutput, Environment};
use objj_diagnostic::ErrorCode;
use objj_ir::{
    build, AccessorAttribute, AccessorSemantics, AssignOp, BinaryOp, Expr, ExprKind,
    ImportDeclaration, LogicalOp, MethodKind, Param, Program, Span, Stmt, StmtKind, UnaryOp,
    UpdateOp,
};
use pretty_assertions::assert_eq;

// -- Helpers --

fn run(body: Vec<Stmt>, env: &mut Environment, options: &CompileOptions) -> CompileOutput {
    compile(&Program::new(body), env, options).unwrap()
}

fn lower_with(body: Vec<Stmt>, options: &CompileOptions) -> String {
    run(body, &mut Environment::new(), options).code.unwrap()
}

fn lower(body: Vec<Stmt>) -> String {
    lower_with(body, &CompileOptions::default())
}

fn lower_err(body: Vec<Stmt>) -> CompileError {
    compile(&Program::new(body), &mut Environment::new(), &CompileOptions::default()).unwrap_err()
}

/// A single expression statement, without the trailing newline.
fn lower_expr(expr: Expr) -> String {
    lower(vec![build::expr_stmt(expr)]).trim_end().to_string()
}

fn num(raw: &str) -> Expr {
    build::num(raw)
}

fn id(name: &str) -> Expr {
    build::ident(name)
}

fn import(path: &str, local: bool) -> Stmt {
    Stmt::new(
        StmtKind::Import(ImportDeclaration {
            path: path.to_string(),
            local,
            span: Span::DUMMY,
        }),
        Span::DUMMY,
    )
}

/// `function name(<params>) { body }` with the given by-reference flags.
fn function_with_refs(name: &str, params: &[(&str, bool)], body: Vec<Stmt>) -> Stmt {
    let mut function = build::function(Some(name), &[], body);
    function.params = params
        .iter()
        .map(|(param, by_ref)| Param {
            name: build::name(param),
            by_ref: *by_ref,
        })
        .collect();
    Stmt::new(StmtKind::Function(function), Span::DUMMY)
}

fn foo_class() -> objj_ir::ClassDeclaration {
    build::class("Foo", Some("CPObject"))
}

// -- Statements and expressions --

#[test]
fn plain_statements_pass_through() {
    let code = lower(vec![
        build::var("x", Some(num("1"))),
        build::if_stmt(
            build::binary(BinaryOp::Lt, id("x"), num("2")),
            build::block(vec![build::expr_stmt(build::call(id("f"), vec![id("x")]))]),
            Some(build::expr_stmt(build::call(id("g"), Vec::new()))),
        ),
        build::function_decl("h", &["a", "b"], vec![build::ret(Some(id("a")))]),
    ]);
    assert_eq!(
        code,
        r#"var x = 1;
if (x < 2) {
    f(x);
} else
    g();
function h(a, b) {
    return a;
}
"#
    );
}

#[test]
fn loops_and_switch() {
    let for_loop = Stmt::new(
        StmtKind::For {
            init: None,
            test: None,
            update: None,
            body: Box::new(build::block(vec![Stmt::new(StmtKind::Break(None), Span::DUMMY)])),
        },
        Span::DUMMY,
    );
    let for_in = Stmt::new(
        StmtKind::ForIn {
            target: objj_ir::ForInTarget::Var(build::name("k")),
            object: id("o"),
            body: Box::new(build::expr_stmt(build::call(id("f"), vec![id("k")]))),
        },
        Span::DUMMY,
    );
    let switch = Stmt::new(
        StmtKind::Switch {
            discriminant: id("x"),
            cases: vec![
                objj_ir::SwitchCase {
                    test: Some(num("1")),
                    body: vec![Stmt::new(StmtKind::Break(None), Span::DUMMY)],
                },
                objj_ir::SwitchCase {
                    test: None,
                    body: vec![build::expr_stmt(build::call(id("f"), Vec::new()))],
                },
            ],
        },
        Span::DUMMY,
    );
    let code = lower(vec![for_loop, for_in, switch]);
    assert_eq!(
        code,
        r#"for (;;) {
    break;
}
for (var k in o)
    f(k);
switch (x) {
case 1:
    break;
default:
    f();
}
"#
    );
}

#[test]
fn try_catch_finally() {
    let stmt = Stmt::new(
        StmtKind::Try {
            block: vec![build::expr_stmt(build::call(id("f"), Vec::new()))],
            handler: Some(objj_ir::CatchClause {
                param: build::name("e"),
                body: vec![build::expr_stmt(build::call(id("log"), vec![id("e")]))],
            }),
            finalizer: Some(vec![build::expr_stmt(build::call(id("done"), Vec::new()))]),
        },
        Span::DUMMY,
    );
    assert_eq!(
        lower(vec![stmt]),
        r#"try {
    f();
} catch (e) {
    log(e);
} finally {
    done();
}
"#
    );
}

#[test]
fn literals() {
    assert_eq!(lower_expr(build::str("a \"b\"")), r#""a \"b\"";"#);
    assert_eq!(
        lower_expr(build::call(
            id("f"),
            vec![build::object(vec![("a", num("1")), ("b", build::boolean(false))])]
        )),
        "f({ a: 1, b: false });"
    );
    assert_eq!(lower_expr(build::object(Vec::new())), "({});");
    let holes = Expr::new(
        ExprKind::Array(vec![Some(num("1")), None, Some(num("3")), None]),
        Span::DUMMY,
    );
    assert_eq!(lower_expr(holes), "[1,, 3,,];");
}

#[test]
fn parenthesization() {
    let add = |l, r| build::binary(BinaryOp::Add, l, r);
    let mul = |l, r| build::binary(BinaryOp::Mul, l, r);

    assert_eq!(lower_expr(mul(add(num("7"), num("13")), num("27"))), "(7 + 13) * 27;");
    assert_eq!(lower_expr(add(num("7"), add(num("13"), num("27")))), "7 + (13 + 27);");
    assert_eq!(lower_expr(add(add(num("7"), num("13")), num("27"))), "7 + 13 + 27;");
    assert_eq!(lower_expr(add(num("7"), mul(num("13"), num("27")))), "7 + 13 * 27;");
    assert_eq!(
        lower_expr(build::logical(
            LogicalOp::And,
            build::logical(LogicalOp::Or, id("a"), id("b")),
            id("c")
        )),
        "(a || b) && c;"
    );
    assert_eq!(
        lower_expr(build::conditional(
            build::assign(id("a"), id("b")),
            id("c"),
            build::sequence(vec![id("d"), id("e")])
        )),
        "(a = b) ? c : (d, e);"
    );
    assert_eq!(
        lower_expr(build::call(id("f"), vec![build::sequence(vec![id("a"), id("b")])])),
        "f((a, b));"
    );
    assert_eq!(
        lower_expr(build::member(add(id("a"), id("b")), "length")),
        "(a + b).length;"
    );
    assert_eq!(
        lower_expr(build::call(build::member(num("1"), "toString"), Vec::new())),
        "(1).toString();"
    );
    assert_eq!(
        lower_expr(build::new(build::call(id("f"), Vec::new()), Vec::new())),
        "new (f())();"
    );
    assert_eq!(
        lower_expr(build::unary(UnaryOp::Neg, build::unary(UnaryOp::Neg, id("x")))),
        "- -x;"
    );
    assert_eq!(
        lower_expr(build::unary(UnaryOp::TypeOf, add(id("a"), id("b")))),
        "typeof (a + b);"
    );
    assert_eq!(
        lower_expr(build::call(build::function_expr(&[], Vec::new()), Vec::new())),
        "(function() {\n})();"
    );
}

// -- Message sends --

#[test]
fn message_send_receivers() {
    let code = lower(vec![
        build::class_forward(&["CPObject"]),
        build::var("obj", None),
        build::expr_stmt(build::send(id("obj"), "description", Vec::new())),
        build::expr_stmt(build::send(id("CPObject"), "alloc", Vec::new())),
        build::expr_stmt(build::send(build::str("s"), "length", Vec::new())),
        build::expr_stmt(build::send(
            build::send(id("CPObject"), "alloc", Vec::new()),
            "init",
            Vec::new(),
        )),
    ]);
    assert_eq!(
        code,
        r#"var ___r1;
var obj;
(obj == null ? null : objj_msgSend0(obj, "description"));
objj_msgSend0(CPObject, "alloc");
objj_msgSend0("s", "length");
(___r1 = objj_msgSend0(CPObject, "alloc"), ___r1 == null ? null : objj_msgSend0(___r1, "init"));
"#
    );
}

#[test]
fn shadowed_class_name_is_guarded() {
    let body = vec![
        build::class_forward(&["CPObject"]),
        build::function_decl(
            "f",
            &["CPObject"],
            vec![build::expr_stmt(build::send(id("CPObject"), "alloc", Vec::new()))],
        ),
    ];
    assert_eq!(
        lower(body),
        r#"function f(CPObject) {
    (CPObject == null ? null : objj_msgSend0(CPObject, "alloc"));
}
"#
    );
}

#[test]
fn nested_temporaries_are_declared_per_function() {
    let inner = build::send(build::call(id("g"), Vec::new()), "a", Vec::new());
    let outer = build::send(inner, "b", vec![("with", num("1"))]);
    let body = vec![build::function_decl("f", &[], vec![build::ret(Some(outer))])];
    assert_eq!(
        lower(body),
        r#"function f() {
    var ___r1, ___r2;
    return (___r1 = (___r2 = g(), ___r2 == null ? null : objj_msgSend0(___r2, "a")), ___r1 == null ? null : objj_msgSend1(___r1, "with:", 1));
}
"#
    );
}

#[test]
fn arity_above_three_uses_variadic_entry_point() {
    let send = build::send(
        build::self_expr(),
        "",
        vec![("a", num("1")), ("b", num("2")), ("c", num("3")), ("d", num("4"))],
    );
    assert_eq!(lower_expr(send), r#"objj_msgSend(self, "a:b:c:d:", 1, 2, 3, 4);"#);
}

#[test]
fn inline_dispatch() {
    let options = CompileOptions::default().with_inline_msg_send(true);
    let code = lower_with(
        vec![
            build::var("obj", None),
            build::expr_stmt(build::send(id("obj"), "foo", Vec::new())),
            build::expr_stmt(build::send(build::self_expr(), "bar:", vec![("bar", num("1"))])),
            build::expr_stmt(build::send(build::str("s"), "length", Vec::new())),
        ],
        &options,
    );
    assert_eq!(
        code,
        r#"var ___r1;
var obj;
(obj == null ? null : (obj.isa.method_msgSend["foo"] || _objj_forward)(obj, "foo"));
(self.isa.method_msgSend["bar:"] || _objj_forward)(self, "bar:", 1);
(___r1 = "s", (___r1.isa.method_msgSend["length"] || _objj_forward)(___r1, "length"));
"#
    );
}

#[test]
fn selector_and_protocol_literals() {
    assert_eq!(lower_expr(build::selector("a:b:")), r#"sel_getUid("a:b:");"#);
    assert_eq!(lower_expr(build::protocol_literal("P")), r#"objj_getProtocol("P");"#);
}

#[test]
fn super_outside_method_is_rejected() {
    let err = lower_err(vec![build::expr_stmt(build::send(
        build::super_expr(),
        "init",
        Vec::new(),
    ))]);
    assert!(matches!(err, CompileError::InvalidSuper { .. }));
    assert_eq!(err.code(), ErrorCode::E5005);
}

// -- References --

#[test]
fn reference_read_and_write() {
    let body = vec![function_with_refs(
        "f",
        &[("r", false)],
        vec![
            build::var("x", Some(build::deref(id("r")))),
            build::expr_stmt(build::assign(
                build::deref(id("r")),
                build::binary(BinaryOp::Add, id("x"), num("1")),
            )),
            build::expr_stmt(build::assign_op(
                AssignOp::Compound(BinaryOp::Mul),
                build::deref(id("r")),
                build::binary(BinaryOp::Add, id("x"), num("2")),
            )),
        ],
    )];
    assert_eq!(
        lower(body),
        r#"function f(r) {
    var x = r();
    r(x + 1);
    r(r() * (x + 2));
}
"#
    );
}

#[test]
fn prefix_and_postfix_dereference_updates() {
    let r = || build::deref(id("r"));
    let body = vec![function_with_refs(
        "f",
        &[("r", false)],
        vec![
            build::expr_stmt(build::update(UpdateOp::Increment, true, r())),
            build::var("old", Some(build::update(UpdateOp::Increment, false, r()))),
            build::expr_stmt(build::binary(
                BinaryOp::Mul,
                build::update(UpdateOp::Increment, false, r()),
                num("2"),
            )),
            build::expr_stmt(build::binary(
                BinaryOp::Mul,
                build::update(UpdateOp::Decrement, true, r()),
                num("2"),
            )),
        ],
    )];
    assert_eq!(
        lower(body),
        r#"function f(r) {
    r(r() + 1);
    var old = r(r() + 1) - 1;
    (r(r() + 1) - 1) * 2;
    r(r() - 1) * 2;
}
"#
    );
}

#[test]
fn reference_to_a_variable() {
    let body = vec![
        build::var("a", Some(num("1"))),
        build::expr_stmt(build::call(id("g"), vec![build::reference(id("a"))])),
    ];
    assert_eq!(
        lower(body),
        r#"var a = 1;
g(function(__input) { if (arguments.length) return a = __input; return a; });
"#
    );
}

#[test]
fn reference_parameters_lower_through_their_accessor() {
    let body = vec![function_with_refs(
        "f",
        &[("r", true), ("n", false)],
        vec![
            build::expr_stmt(build::assign(id("r"), id("n"))),
            build::expr_stmt(build::update(UpdateOp::Increment, false, id("r"))),
            build::expr_stmt(build::call(id("g"), vec![build::reference(id("r")), id("r")])),
        ],
    )];
    assert_eq!(
        lower(body),
        r#"function f(r, n) {
    r(n);
    r(r() + 1) - 1;
    g(r, r());
}
"#
    );
}

#[test]
fn unsupported_reference_usage() {
    let not_assignable = lower_err(vec![build::expr_stmt(build::reference(num("1")))]);
    assert!(matches!(not_assignable, CompileError::UnsupportedReferenceUsage { .. }));

    let delete = lower_err(vec![build::expr_stmt(build::unary(
        UnaryOp::Delete,
        build::deref(id("r")),
    ))]);
    assert_eq!(delete.code(), ErrorCode::E5004);

    let side_effects = lower_err(vec![build::expr_stmt(build::update(
        UpdateOp::Increment,
        true,
        build::deref(build::call(id("make"), Vec::new())),
    ))]);
    assert!(matches!(side_effects, CompileError::UnsupportedReferenceUsage { .. }));

    let for_in = lower_err(vec![Stmt::new(
        StmtKind::ForIn {
            target: objj_ir::ForInTarget::Expr(build::deref(id("r"))),
            object: id("o"),
            body: Box::new(Stmt::new(StmtKind::Empty, Span::DUMMY)),
        },
        Span::DUMMY,
    )]);
    assert!(matches!(for_in, CompileError::UnsupportedReferenceUsage { .. }));
}

#[test]
fn new_callee_lowering_to_an_accessor_call_is_wrapped() {
    assert_eq!(
        lower_expr(build::new(build::deref(id("r")), Vec::new())),
        "new (r())();"
    );
    assert_eq!(
        lower_expr(build::new(
            build::member(build::deref(id("r")), "Kind"),
            vec![num("1")]
        )),
        "new (r().Kind)(1);"
    );

    let body = vec![function_with_refs(
        "f",
        &[("r", true)],
        vec![build::expr_stmt(build::new(id("r"), Vec::new()))],
    )];
    assert_eq!(lower(body), "function f(r) {\n    new (r())();\n}\n");
}

#[test]
fn reference_at_statement_start_is_wrapped() {
    let accessor = "function(__input) { if (arguments.length) return x = __input; return x; }";
    let body = vec![
        build::var("x", None),
        build::expr_stmt(build::reference(id("x"))),
        build::expr_stmt(build::binary(
            BinaryOp::StrictEq,
            build::reference(id("x")),
            id("y"),
        )),
        build::expr_stmt(build::call(build::reference(id("x")), vec![num("1")])),
    ];
    assert_eq!(
        lower(body),
        format!("var x;\n({accessor});\n({accessor} === y);\n({accessor})(1);\n")
    );

    // A reference parameter is already its own accessor.
    let body = vec![function_with_refs(
        "f",
        &[("r", true)],
        vec![build::expr_stmt(build::reference(id("r")))],
    )];
    assert_eq!(lower(body), "function f(r) {\n    r;\n}\n");
}

// -- Classes --

#[test]
fn class_round_trip() {
    let mut class = foo_class();
    class.ivars.push(build::ivar("int", "x"));
    class.methods.push(build::method(
        MethodKind::Instance,
        Some("id"),
        vec![("init", None)],
        vec![
            build::expr_stmt(build::assign(
                build::self_expr(),
                build::send(build::super_expr(), "init", Vec::new()),
            )),
            build::if_stmt(
                build::self_expr(),
                build::expr_stmt(build::assign(id("x"), num("0"))),
                None,
            ),
            build::ret(Some(build::self_expr())),
        ],
    ));
    class.methods.push(build::method(
        MethodKind::Class,
        Some("id"),
        vec![("foo", None)],
        vec![build::ret(Some(build::send(
            build::send(build::self_expr(), "alloc", Vec::new()),
            "init",
            Vec::new(),
        )))],
    ));

    let mut env = Environment::new();
    let output = run(
        vec![build::class_forward(&["CPObject"]), build::class_stmt(class)],
        &mut env,
        &CompileOptions::default(),
    );
    assert_eq!(
        output.code.unwrap(),
        r#"// @implementation Foo : CPObject
{var the_class = objj_allocateClassPair(objj_getClass("CPObject"), "Foo"),
meta_class = the_class.isa;
objj_registerClassPair(the_class);
class_addIvars(the_class, [new objj_ivar("x", "int")]);
class_addMethods(the_class, [
// - (id)init
new objj_method(sel_getUid("init"), function $Foo__init(self, _cmd) {
    self = objj_msgSendSuper0({ receiver: self, super_class: objj_getClass("Foo").super_class }, "init");
    if (self)
        self.x = 0;
    return self;
}, ["id"])]);
class_addMethods(meta_class, [
// + (id)foo
new objj_method(sel_getUid("foo"), function $Foo__foo(self, _cmd) {
    var ___r1;
    return (___r1 = objj_msgSend0(self, "alloc"), ___r1 == null ? null : objj_msgSend0(___r1, "init"));
}, ["id"])]);
}
"#
    );
    assert!(output.warnings.is_empty());

    let foo = env.class("Foo").unwrap();
    assert_eq!(foo.superclass.as_deref(), Some("CPObject"));
    assert!(env.responds_to("Foo", MethodKind::Instance, "init"));
    assert!(env.responds_to("Foo", MethodKind::Class, "foo"));
    assert_eq!(env.all_ivars("Foo").len(), 1);
}

#[test]
fn super_send_in_class_method_uses_metaclass() {
    let mut class = foo_class();
    class.methods.push(build::method(
        MethodKind::Class,
        Some("void"),
        vec![("initialize", None)],
        vec![build::expr_stmt(build::send(build::super_expr(), "initialize", Vec::new()))],
    ));
    let code = lower(vec![build::class_forward(&["CPObject"]), build::class_stmt(class)]);
    assert!(code.contains(
        r#"objj_msgSendSuper0({ receiver: self, super_class: objj_getMetaClass("Foo").super_class }, "initialize");"#
    ));
}

#[test]
fn copy_accessors() {
    let mut class = foo_class();
    class.ivars.push(build::ivar_with_accessors(
        "CPString",
        "name",
        AccessorAttribute {
            semantics: AccessorSemantics::Copy,
            ..AccessorAttribute::default()
        },
    ));
    let code = lower(vec![build::class_forward(&["CPObject"]), build::class_stmt(class)]);
    assert_eq!(
        code,
        r#"// @implementation Foo : CPObject
{var the_class = objj_allocateClassPair(objj_getClass("CPObject"), "Foo"),
meta_class = the_class.isa;
objj_registerClassPair(the_class);
class_addIvars(the_class, [new objj_ivar("name", "CPString")]);
class_addMethods(the_class, [
// - (CPString)name
new objj_method(sel_getUid("name"), function $Foo__name(self, _cmd) {
    return self.name;
}, ["CPString"]),
// - (void)setName:(CPString)newValue
new objj_method(sel_getUid("setName:"), function $Foo__setName_(self, _cmd, newValue) {
    if (self.name !== newValue)
        self.name = newValue == null ? null : (newValue.isa.method_msgSend["copy"] || _objj_forward)(newValue, "copy");
}, ["void", "CPString"])]);
}
"#
    );
}

#[test]
fn readonly_accessor_with_custom_getter() {
    let mut class = foo_class();
    class.ivars.push(build::ivar_with_accessors(
        "BOOL",
        "_enabled",
        AccessorAttribute {
            property: Some("enabled".to_string()),
            getter: Some("isEnabled".to_string()),
            readonly: true,
            ..AccessorAttribute::default()
        },
    ));
    let mut env = Environment::new();
    run(
        vec![build::class_forward(&["CPObject"]), build::class_stmt(class)],
        &mut env,
        &CompileOptions::default(),
    );
    assert!(env.responds_to("Foo", MethodKind::Instance, "isEnabled"));
    assert!(!env.responds_to("Foo", MethodKind::Instance, "setEnabled:"));
}

#[test]
fn inherited_ivars_resolve_through_self() {
    let mut base = build::class("Base", Some("CPObject"));
    base.ivars.push(build::ivar("int", "count"));
    let mut derived = build::class("Derived", Some("Base"));
    derived.methods.push(build::method(
        MethodKind::Instance,
        Some("int"),
        vec![("count", None)],
        vec![build::ret(Some(id("count")))],
    ));
    let code = lower(vec![
        build::class_forward(&["CPObject"]),
        build::class_stmt(base),
        build::class_stmt(derived),
    ]);
    assert!(code.contains("    return self.count;\n"));
}

#[test]
fn locals_shadow_ivars() {
    let mut class = foo_class();
    class.ivars.push(build::ivar("int", "x"));
    class.methods.push(build::method(
        MethodKind::Instance,
        Some("void"),
        vec![("setX", Some(("int", "x")))],
        vec![build::expr_stmt(build::call(id("f"), vec![id("x")]))],
    ));
    let code = lower(vec![build::class_forward(&["CPObject"]), build::class_stmt(class)]);
    assert!(code.contains("    f(x);\n"));
}

#[test]
fn category_extends_known_class() {
    let mut category = build::category("Foo", "Extras");
    category.methods.push(build::method(
        MethodKind::Instance,
        Some("void"),
        vec![("extra", None)],
        Vec::new(),
    ));
    let mut env = Environment::new();
    let code = run(
        vec![
            build::class_forward(&["CPObject"]),
            build::class_stmt(foo_class()),
            build::class_stmt(category),
        ],
        &mut env,
        &CompileOptions::default(),
    )
    .code
    .unwrap();
    assert!(code.ends_with(
        r#"// @implementation Foo (Extras)
{var the_class = objj_getClass("Foo");
if (!the_class) throw new SyntaxError("*** Could not find definition for class \"Foo\"");
var meta_class = the_class.isa;
class_addMethods(the_class, [
// - (void)extra
new objj_method(sel_getUid("extra"), function $Foo_Extras__extra(self, _cmd) {
}, ["void"])]);
}
"#
    ));
    assert!(env.responds_to("Foo", MethodKind::Instance, "extra"));
}

#[test]
fn undeclared_category_target_is_an_error() {
    let mut env = Environment::new();
    let err = compile(
        &Program::new(vec![build::class_stmt(build::category("Missing", "Cat"))]),
        &mut env,
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        CompileError::UndefinedClass {
            name: "Missing".to_string(),
            span: Span::DUMMY,
        }
    );
    assert!(!env.has_class("Missing"));
}

#[test]
fn undeclared_superclass_is_an_error() {
    let err = lower_err(vec![build::class_stmt(foo_class())]);
    assert_eq!(err.code(), ErrorCode::E5001);
    assert!(err.to_diagnostic().to_string().contains("CPObject"));
}

#[test]
fn failed_class_is_not_registered() {
    let delete_through_reference = || {
        vec![build::expr_stmt(build::unary(
            UnaryOp::Delete,
            build::deref(id("r")),
        ))]
    };
    let mut class = foo_class();
    class.methods.push(build::method(
        MethodKind::Instance,
        Some("void"),
        vec![("drop", None)],
        delete_through_reference(),
    ));
    let mut env = Environment::new();
    env.forward_class("CPObject");
    let err = compile(
        &Program::new(vec![build::class_stmt(class)]),
        &mut env,
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E5004);
    assert!(!env.has_class("Foo"));

    // A failed category leaves the extended class as it was.
    let declared = run(
        vec![build::class_stmt(foo_class())],
        &mut env,
        &CompileOptions::default(),
    );
    assert!(declared.code.is_some());
    let before = env.class("Foo").cloned();
    let mut category = build::category("Foo", "Broken");
    category.methods.push(build::method(
        MethodKind::Instance,
        Some("void"),
        vec![("drop", None)],
        delete_through_reference(),
    ));
    compile(
        &Program::new(vec![build::class_stmt(category)]),
        &mut env,
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert_eq!(env.class("Foo").cloned(), before);
    assert!(!env.responds_to("Foo", MethodKind::Instance, "drop"));
}

#[test]
fn duplicate_ivar_is_an_error() {
    let mut class = foo_class();
    class.ivars.push(build::ivar("int", "x"));
    class.ivars.push(build::ivar("id", "x"));
    let err = lower_err(vec![build::class_forward(&["CPObject"]), build::class_stmt(class)]);
    assert!(matches!(err, CompileError::Redeclaration { ref name, .. } if name == "x"));
}

#[test]
fn root_class_uses_nil() {
    let code = lower(vec![build::class_stmt(build::class("CPObject", None))]);
    assert_eq!(
        code,
        r#"// @implementation CPObject
{var the_class = objj_allocateClassPair(Nil, "CPObject"),
meta_class = the_class.isa;
objj_registerClassPair(the_class);
}
"#
    );
}

#[test]
fn emission_options() {
    let mut class = foo_class();
    class.ivars.push(build::ivar("int", "x"));
    class.methods.push(build::method(
        MethodKind::Instance,
        Some("void"),
        vec![("reset", None)],
        Vec::new(),
    ));
    let options = CompileOptions::default()
        .with_method_function_names(false)
        .with_method_argument_type_signatures(false)
        .with_ivar_type_signatures(false);
    let code = lower_with(
        vec![build::class_forward(&["CPObject"]), build::class_stmt(class)],
        &options,
    );
    assert!(code.contains(r#"class_addIvars(the_class, [new objj_ivar("x")]);"#));
    assert!(code.contains(
        "new objj_method(sel_getUid(\"reset\"), function(self, _cmd) {\n})]);"
    ));
}

// -- Protocols --

#[test]
fn protocol_conformance_with_forward_declaration() {
    let mut class = foo_class();
    class.protocols.push(build::name("P"));
    let code = lower(vec![
        build::class_forward(&["CPObject"]),
        build::protocol_forward(&["P"]),
        build::class_stmt(class),
    ]);
    assert_eq!(
        code,
        r#"// @implementation Foo : CPObject <P>
{var the_class = objj_allocateClassPair(objj_getClass("CPObject"), "Foo"),
meta_class = the_class.isa;
objj_registerClassPair(the_class);
var aProtocol = objj_getProtocol("P");
if (!aProtocol) throw new SyntaxError("*** Could not find definition for protocol \"P\"");
class_addProtocol(the_class, aProtocol);
}
"#
    );
}

#[test]
fn unknown_adopted_protocol_is_an_error() {
    let mut class = foo_class();
    class.protocols.push(build::name("Nope"));
    let err = lower_err(vec![build::class_forward(&["CPObject"]), build::class_stmt(class)]);
    assert_eq!(err.code(), ErrorCode::E5002);
}

#[test]
fn protocol_declaration() {
    let mut protocol = build::protocol("Bar", &["Baz"]);
    protocol.required.push(build::method_description(
        MethodKind::Instance,
        Some("void"),
        vec![("foo", None)],
    ));
    protocol.optional.push(build::method_description(
        MethodKind::Class,
        Some("id"),
        vec![("make", Some(("int", "n")))],
    ));
    let mut env = Environment::new();
    let code = run(
        vec![build::protocol_forward(&["Baz"]), build::protocol_stmt(protocol)],
        &mut env,
        &CompileOptions::default(),
    )
    .code
    .unwrap();
    assert_eq!(
        code,
        r#"// @protocol Bar <Baz>
{var the_protocol = objj_allocateProtocol("Bar");
var aProtocol = objj_getProtocol("Baz");
if (!aProtocol) throw new SyntaxError("*** Could not find definition for protocol \"Baz\"");
protocol_addProtocol(the_protocol, aProtocol);
objj_registerProtocol(the_protocol);
protocol_addMethodDescriptions(the_protocol, [
// - (void)foo
new objj_method(sel_getUid("foo"), null, ["void"])], true, true);
protocol_addMethodDescriptions(the_protocol, [
// + (id)make:(int)n
new objj_method(sel_getUid("make:"), null, ["id", "int"])], false, false);
}
"#
    );
    assert_eq!(
        env.required_methods("Bar"),
        vec![(MethodKind::Instance, "foo".to_string())]
    );
}

#[test]
fn undeclared_inherited_protocol_is_an_error() {
    let err = lower_err(vec![build::protocol_stmt(build::protocol("Bar", &["Missing"]))]);
    assert!(matches!(err, CompileError::UndefinedProtocol { ref name, .. } if name == "Missing"));
}

#[test]
fn unimplemented_protocol_methods_warn() {
    let mut protocol = build::protocol("P", &[]);
    protocol.required.push(build::method_description(
        MethodKind::Instance,
        Some("void"),
        vec![("foo", None)],
    ));
    protocol.required.push(build::method_description(
        MethodKind::Instance,
        Some("void"),
        vec![("bar", None)],
    ));
    let mut class = foo_class();
    class.protocols.push(build::name("P"));
    class.methods.push(build::method(
        MethodKind::Instance,
        Some("void"),
        vec![("foo", None)],
        Vec::new(),
    ));
    let output = run(
        vec![
            build::class_forward(&["CPObject"]),
            build::protocol_stmt(protocol),
            build::class_stmt(class),
        ],
        &mut Environment::new(),
        &CompileOptions::default(),
    );
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].code, ErrorCode::W5002);
    assert!(output.warnings[0].message.contains("-bar"));
}

// -- Other directives --

#[test]
fn typedefs_register_in_order() {
    let mut env = Environment::new();
    let code = run(
        vec![build::typedef_stmt(&["Foo", "Bar"])],
        &mut env,
        &CompileOptions::default(),
    )
    .code
    .unwrap();
    assert_eq!(
        code,
        r#"// @typedef Foo, Bar
{var the_typedef = objj_allocateTypeDef("Foo");
objj_registerTypeDef(the_typedef);
}
{var the_typedef = objj_allocateTypeDef("Bar");
objj_registerTypeDef(the_typedef);
}
"#
    );
    assert!(env.has_typedef("Foo") && env.has_typedef("Bar"));
}

#[test]
fn imports_are_recorded() {
    let output = run(
        vec![import("Foundation/Foundation.j", false), import("Local.j", true)],
        &mut Environment::new(),
        &CompileOptions::default(),
    );
    assert_eq!(
        output.code.unwrap(),
        "objj_executeFile(\"Foundation/Foundation.j\", false);\nobjj_executeFile(\"Local.j\", true);\n"
    );
    let paths: Vec<_> = output.dependencies.iter().map(|d| (d.path.as_str(), d.local)).collect();
    assert_eq!(paths, vec![("Foundation/Foundation.j", false), ("Local.j", true)]);
}

#[test]
fn implicit_globals_and_preamble() {
    let body = vec![
        build::expr_stmt(build::assign(id("top"), num("1"))),
        build::function_decl(
            "f",
            &[],
            vec![build::expr_stmt(build::assign(id("nested"), num("2")))],
        ),
    ];
    let options = CompileOptions::default().with_globals_preamble(true);
    let output = run(body, &mut Environment::new(), &options);
    assert_eq!(
        output.code.unwrap(),
        r#"/* global top, nested */
top = 1;
function f() {
    nested = 2;
}
"#
    );
    let names: Vec<_> = output.globals.iter().map(|g| (g.name.as_str(), g.in_root)).collect();
    assert_eq!(names, vec![("top", true), ("nested", false)]);
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].code, ErrorCode::W5001);
}

#[test]
fn import_mode_harvests_declarations_for_later_units() {
    let mut env = Environment::new();
    let mut base = build::class("CPObject", None);
    base.ivars.push(build::ivar("id", "isa_hint"));
    let harvested = run(
        vec![build::class_stmt(base), build::protocol_stmt(build::protocol("P", &[]))],
        &mut env,
        &CompileOptions::import(),
    );
    assert_eq!(harvested.code, None);

    let mut class = foo_class();
    class.protocols.push(build::name("P"));
    class.methods.push(build::method(
        MethodKind::Instance,
        Some("id"),
        vec![("hint", None)],
        vec![build::ret(Some(id("isa_hint")))],
    ));
    let code = run(vec![build::class_stmt(class)], &mut env, &CompileOptions::default())
        .code
        .unwrap();
    assert!(code.contains("    return self.isa_hint;\n"));
}
