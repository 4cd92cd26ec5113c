//! Property-based tests for expression parenthesization.
//!
//! Random operator trees are lowered, then re-parsed by a small
//! precedence-climbing parser that knows the host language's grammar. The
//! parsed tree must match the original: the printer may add parentheses
//! but never change grouping.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::uninlined_format_args,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use objj_codegen::{compile, CompileOptions, Environment};
use objj_ir::{build, BinaryOp, Expr, ExprKind, LogicalOp, Program, UnaryOp};
use proptest::prelude::*;

// -- Structural form --

/// Expression shape without spans, comparable across print and re-parse.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Tree {
    Leaf(String),
    Unary(String, Box<Tree>),
    Binary(String, Box<Tree>, Box<Tree>),
    Conditional(Box<Tree>, Box<Tree>, Box<Tree>),
    Assign(String, Box<Tree>),
    Sequence(Vec<Tree>),
}

fn to_tree(expr: &Expr) -> Tree {
    match &expr.kind {
        ExprKind::Ident(name) | ExprKind::Number(name) => Tree::Leaf(name.clone()),
        ExprKind::Unary { op, operand } => {
            Tree::Unary(op.as_symbol().to_string(), Box::new(to_tree(operand)))
        }
        ExprKind::Binary { op, left, right } => Tree::Binary(
            op.as_symbol().to_string(),
            Box::new(to_tree(left)),
            Box::new(to_tree(right)),
        ),
        ExprKind::Logical { op, left, right } => Tree::Binary(
            op.as_symbol().to_string(),
            Box::new(to_tree(left)),
            Box::new(to_tree(right)),
        ),
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => Tree::Conditional(
            Box::new(to_tree(test)),
            Box::new(to_tree(consequent)),
            Box::new(to_tree(alternate)),
        ),
        ExprKind::Assign { target, value, .. } => Tree::Assign(
            target.as_ident().unwrap().to_string(),
            Box::new(to_tree(value)),
        ),
        ExprKind::Sequence(exprs) => Tree::Sequence(exprs.iter().map(to_tree).collect()),
        other => panic!("not generated: {other:?}"),
    }
}

// -- Re-parser --

/// Host-language binary precedence, tightest first.
const BINARY_LEVELS: &[&[&str]] = &[
    &["*", "/", "%"],
    &["+", "-"],
    &["<<", ">>", ">>>"],
    &["<", "<=", ">", ">=", "in", "instanceof"],
    &["==", "!=", "===", "!=="],
    &["&"],
    &["^"],
    &["|"],
    &["&&"],
    &["||"],
];

/// Punctuators, longest first so that greedy matching is correct.
const PUNCTUATORS: &[&str] = &[
    ">>>", "===", "!==", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "*", "/", "%", "+", "-",
    "<", ">", "&", "^", "|", "!", "~", "=", "?", ":", "(", ")", ",",
];

fn tokenize(source: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = source.trim_start();
    while !rest.is_empty() {
        let word_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let len = if word_len > 0 {
            word_len
        } else {
            PUNCTUATORS
                .iter()
                .find(|p| rest.starts_with(**p))
                .map(|p| p.len())
                .unwrap_or_else(|| panic!("unexpected input at {rest:?}"))
        };
        tokens.push(rest[..len].to_string());
        rest = rest[len..].trim_start();
    }
    tokens
}

/// Strength of a binary operator token; higher binds tighter.
fn binding_power(token: &str) -> Option<usize> {
    BINARY_LEVELS
        .iter()
        .position(|level| level.contains(&token))
        .map(|index| BINARY_LEVELS.len() - index)
}

struct Parser {
    tokens: Vec<String>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> String {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    fn expect(&mut self, token: &str) {
        assert_eq!(self.next(), token);
    }

    fn sequence(&mut self) -> Tree {
        let first = self.assignment();
        if self.peek() != Some(",") {
            return first;
        }
        let mut items = vec![first];
        while self.peek() == Some(",") {
            self.next();
            items.push(self.assignment());
        }
        Tree::Sequence(items)
    }

    fn assignment(&mut self) -> Tree {
        let is_target = self
            .tokens
            .get(self.pos)
            .is_some_and(|t| t.starts_with(|c: char| c.is_ascii_alphabetic()) && t != "typeof");
        if is_target && self.tokens.get(self.pos + 1).map(String::as_str) == Some("=") {
            let target = self.next();
            self.next();
            return Tree::Assign(target, Box::new(self.assignment()));
        }
        self.conditional()
    }

    fn conditional(&mut self) -> Tree {
        let test = self.binary(0);
        if self.peek() != Some("?") {
            return test;
        }
        self.next();
        let consequent = self.assignment();
        self.expect(":");
        let alternate = self.assignment();
        Tree::Conditional(Box::new(test), Box::new(consequent), Box::new(alternate))
    }

    fn binary(&mut self, min_power: usize) -> Tree {
        let mut left = self.unary();
        while let Some(power) = self.peek().and_then(binding_power) {
            if power <= min_power {
                break;
            }
            let op = self.next();
            let right = self.binary(power);
            left = Tree::Binary(op, Box::new(left), Box::new(right));
        }
        left
    }

    fn unary(&mut self) -> Tree {
        match self.peek() {
            Some(op @ ("-" | "+" | "!" | "~" | "typeof")) => {
                let op = op.to_string();
                self.next();
                Tree::Unary(op, Box::new(self.unary()))
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Tree {
        let token = self.next();
        if token == "(" {
            let inner = self.sequence();
            self.expect(")");
            inner
        } else {
            Tree::Leaf(token)
        }
    }
}

fn parse(source: &str) -> Tree {
    let mut parser = Parser {
        tokens: tokenize(source),
        pos: 0,
    };
    let tree = parser.sequence();
    assert_eq!(parser.pos, parser.tokens.len(), "trailing input in {source:?}");
    tree
}

// -- Generation --

fn print(expr: &Expr) -> String {
    let program = Program::new(vec![build::expr_stmt(expr.clone())]);
    let code = compile(&program, &mut Environment::new(), &CompileOptions::default())
        .unwrap()
        .code
        .unwrap();
    code.trim_end().trim_end_matches(';').to_string()
}

fn leaf() -> impl Strategy<Value = Expr> {
    prop_oneof![
        prop::sample::select(vec!["a", "b", "c"]).prop_map(build::ident),
        (1u8..10).prop_map(|n| build::num(&n.to_string())),
    ]
}

fn binary_op() -> impl Strategy<Value = BinaryOp> {
    prop::sample::select(BinaryOp::ALL.to_vec())
}

fn logical_op() -> impl Strategy<Value = LogicalOp> {
    prop::sample::select(vec![LogicalOp::And, LogicalOp::Or])
}

fn unary_op() -> impl Strategy<Value = UnaryOp> {
    prop::sample::select(vec![
        UnaryOp::Neg,
        UnaryOp::Plus,
        UnaryOp::Not,
        UnaryOp::BitNot,
        UnaryOp::TypeOf,
    ])
}

fn expr_tree() -> impl Strategy<Value = Expr> {
    leaf().prop_recursive(6, 64, 3, |inner| {
        prop_oneof![
            (binary_op(), inner.clone(), inner.clone())
                .prop_map(|(op, left, right)| build::binary(op, left, right)),
            (logical_op(), inner.clone(), inner.clone())
                .prop_map(|(op, left, right)| build::logical(op, left, right)),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(|(test, consequent, alternate)| {
                build::conditional(test, consequent, alternate)
            }),
            (unary_op(), inner.clone()).prop_map(|(op, operand)| build::unary(op, operand)),
            (prop::sample::select(vec!["a", "b", "c"]), inner)
                .prop_map(|(target, value)| build::assign(build::ident(target), value)),
        ]
    })
}

/// A tree, or a sequence of trees at the root.
fn statement_expr() -> impl Strategy<Value = Expr> {
    prop_oneof![
        3 => expr_tree(),
        1 => prop::collection::vec(expr_tree(), 2..4).prop_map(build::sequence),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn printing_preserves_grouping(expr in statement_expr()) {
        let printed = print(&expr);
        prop_assert_eq!(parse(&printed), to_tree(&expr), "printed as {}", printed);
    }
}

// -- Parser sanity --

#[test]
fn parser_respects_host_precedence() {
    assert_eq!(
        parse("a + b * c"),
        Tree::Binary(
            "+".to_string(),
            Box::new(Tree::Leaf("a".to_string())),
            Box::new(Tree::Binary(
                "*".to_string(),
                Box::new(Tree::Leaf("b".to_string())),
                Box::new(Tree::Leaf("c".to_string())),
            )),
        )
    );
    assert_eq!(parse("(a - b) - c"), parse("a - b - c"));
    assert_ne!(parse("a - (b - c)"), parse("a - b - c"));
    assert_eq!(
        parse("a = b ? c : d = 1"),
        Tree::Assign(
            "a".to_string(),
            Box::new(Tree::Conditional(
                Box::new(Tree::Leaf("b".to_string())),
                Box::new(Tree::Leaf("c".to_string())),
                Box::new(Tree::Assign("d".to_string(), Box::new(Tree::Leaf("1".to_string())))),
            )),
        )
    );
}

#[test]
fn typeof_of_binary_is_wrapped() {
    let expr = build::unary(
        UnaryOp::TypeOf,
        build::binary(BinaryOp::In, build::ident("a"), build::ident("b")),
    );
    assert_eq!(print(&expr), "typeof (a in b)");
}
