use super::*;
use crate::buffer::NoopBuffer;
use objj_ir::build;
use pretty_assertions::assert_eq;

fn generate(body: Vec<objj_ir::Stmt>) -> CompileOutput {
    let mut env = Environment::new();
    let options = CompileOptions::default();
    Generator::new(StringBuffer::new(), &mut env, &options)
        .generate(&Program::new(body))
        .unwrap()
}

#[test]
fn quote_escapes_specials() {
    assert_eq!(quote("plain"), "\"plain\"");
    assert_eq!(quote("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
    assert_eq!(quote("a\\b\tc"), "\"a\\\\b\\tc\"");
    assert_eq!(quote("\u{1}"), "\"\\u0001\"");
    assert_eq!(quote("\u{2028}"), "\"\\u2028\"");
}

#[test]
fn temp_names_count_from_one() {
    assert_eq!(temp_name(1), "___r1");
    assert_eq!(temp_name(12), "___r12");
}

#[test]
fn temps_are_reused_after_release() {
    let mut env = Environment::new();
    let options = CompileOptions::default();
    let mut gen = Generator::new(StringBuffer::new(), &mut env, &options);
    gen.temps.push(TempFrame::default());
    assert_eq!(gen.acquire_temp(), "___r1");
    assert_eq!(gen.acquire_temp(), "___r2");
    gen.release_temp();
    gen.release_temp();
    assert_eq!(gen.acquire_temp(), "___r1");
    let frame = gen.temps.pop().unwrap();
    assert_eq!(frame.max, 2);
    assert_eq!(frame.live, 1);
}

#[test]
fn parenthesized_wraps_only_when_asked() {
    let mut env = Environment::new();
    let options = CompileOptions::default();
    let mut gen = Generator::new(StringBuffer::new(), &mut env, &options);
    gen.parenthesized(true, |g| {
        g.buffer.concat("a");
        Ok(())
    })
    .unwrap();
    gen.parenthesized(false, |g| {
        g.buffer.concat("b");
        Ok(())
    })
    .unwrap();
    assert_eq!(gen.buffer.as_str(), "(a)b");
}

#[test]
fn parenthesized_runs_inner_emission_without_text() {
    let mut env = Environment::new();
    let options = CompileOptions::import();
    let mut gen = Generator::new(NoopBuffer, &mut env, &options);
    let mut ran = false;
    gen.parenthesized(true, |g| {
        g.buffer.concat("a");
        ran = true;
        Ok(())
    })
    .unwrap();
    assert!(ran);
    assert_eq!(gen.buffer.into_output(), None);
}

#[test]
fn ambiguous_statement_starts_are_wrapped() {
    let function = || build::function_expr(&[], Vec::new());
    let output = generate(vec![
        build::expr_stmt(build::member(build::object(Vec::new()), "x")),
        build::expr_stmt(build::binary(
            objj_ir::BinaryOp::Add,
            function(),
            build::num("1"),
        )),
        build::expr_stmt(build::call(function(), Vec::new())),
        build::expr_stmt(build::ident("x")),
    ]);
    assert_eq!(
        output.code.as_deref(),
        Some("({}.x);\n(function() {\n} + 1);\n(function() {\n})();\nx;\n")
    );
}

#[test]
fn empty_program_is_empty() {
    let output = generate(Vec::new());
    assert_eq!(output.code.as_deref(), Some(""));
    assert!(output.warnings.is_empty());
}

#[test]
fn silent_statements_leave_no_blank_lines() {
    let output = generate(vec![
        build::class_forward(&["CPObject"]),
        build::global(&["g"]),
        build::var("x", Some(build::num("1"))),
    ]);
    assert_eq!(output.code.as_deref(), Some("var x = 1;\n"));
}

#[test]
fn program_temps_are_declared_first() {
    let send = build::send(build::call(build::ident("f"), Vec::new()), "description", Vec::new());
    let output = generate(vec![build::expr_stmt(send)]);
    assert_eq!(
        output.code.as_deref(),
        Some("var ___r1;\n(___r1 = f(), ___r1 == null ? null : objj_msgSend0(___r1, \"description\"));\n")
    );
}

#[test]
fn noop_buffer_produces_no_code_but_registers() {
    let mut env = Environment::new();
    let options = CompileOptions::import();
    let program = Program::new(vec![
        build::class_stmt(build::class("CPObject", None)),
        build::typedef_stmt(&["CGPoint"]),
    ]);
    let output = Generator::new(NoopBuffer, &mut env, &options)
        .generate(&program)
        .unwrap();
    assert_eq!(output.code, None);
    assert!(env.has_class("CPObject"));
    assert!(env.has_typedef("CGPoint"));
}
