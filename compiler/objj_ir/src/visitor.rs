//! AST Visitor Pattern
//!
//! A single `Visitor` trait is provided for read-only traversal. The visitor
//! can mutate its own state during traversal, but the tree stays immutable.
//!
//! Default implementations call `walk_*` functions that traverse children.
//! Override `visit_*` methods to add custom behavior at specific nodes, and
//! call the matching `walk_*` to keep descending.
//!
//! # Example
//!
//! ```text
//! struct CountSends {
//!     count: usize,
//! }
//!
//! impl<'ast> Visitor<'ast> for CountSends {
//!     fn visit_expr(&mut self, expr: &'ast Expr) {
//!         if let ExprKind::MessageSend(_) = &expr.kind {
//!             self.count += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```

use crate::ast::{
    ClassDeclaration, Expr, ExprKind, ForInTarget, ForInit, Function, MemberProperty,
    MethodDeclaration, Program, Stmt, StmtKind,
};

/// AST Visitor trait.
pub trait Visitor<'ast> {
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    /// Visit a function declaration or expression.
    fn visit_function(&mut self, function: &'ast Function) {
        walk_function(self, function);
    }

    fn visit_class(&mut self, class: &'ast ClassDeclaration) {
        walk_class(self, class);
    }

    /// Visit a method with a body. Protocol descriptions are not visited.
    fn visit_method(&mut self, method: &'ast MethodDeclaration) {
        walk_method(self, method);
    }
}

pub fn walk_program<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, program: &'ast Program) {
    for stmt in &program.body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmts<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmts: &'ast [Stmt]) {
    for stmt in stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast Stmt) {
    match &stmt.kind {
        StmtKind::Expr(expr) | StmtKind::Throw(expr) => visitor.visit_expr(expr),
        StmtKind::Var(declarators) => {
            for declarator in declarators {
                if let Some(init) = &declarator.init {
                    visitor.visit_expr(init);
                }
            }
        }
        StmtKind::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        StmtKind::If {
            test,
            consequent,
            alternate,
        } => {
            visitor.visit_expr(test);
            visitor.visit_stmt(consequent);
            if let Some(alternate) = alternate {
                visitor.visit_stmt(alternate);
            }
        }
        StmtKind::While { test, body } | StmtKind::DoWhile { body, test } => {
            visitor.visit_expr(test);
            visitor.visit_stmt(body);
        }
        StmtKind::For {
            init,
            test,
            update,
            body,
        } => {
            match init {
                Some(ForInit::Var(declarators)) => {
                    for declarator in declarators {
                        if let Some(init) = &declarator.init {
                            visitor.visit_expr(init);
                        }
                    }
                }
                Some(ForInit::Expr(expr)) => visitor.visit_expr(expr),
                None => {}
            }
            if let Some(test) = test {
                visitor.visit_expr(test);
            }
            if let Some(update) = update {
                visitor.visit_expr(update);
            }
            visitor.visit_stmt(body);
        }
        StmtKind::ForIn {
            target,
            object,
            body,
        } => {
            if let ForInTarget::Expr(target) = target {
                visitor.visit_expr(target);
            }
            visitor.visit_expr(object);
            visitor.visit_stmt(body);
        }
        StmtKind::Block(body) => walk_stmts(visitor, body),
        StmtKind::Function(function) => visitor.visit_function(function),
        StmtKind::Try {
            block,
            handler,
            finalizer,
        } => {
            walk_stmts(visitor, block);
            if let Some(handler) = handler {
                walk_stmts(visitor, &handler.body);
            }
            if let Some(finalizer) = finalizer {
                walk_stmts(visitor, finalizer);
            }
        }
        StmtKind::Switch {
            discriminant,
            cases,
        } => {
            visitor.visit_expr(discriminant);
            for case in cases {
                if let Some(test) = &case.test {
                    visitor.visit_expr(test);
                }
                walk_stmts(visitor, &case.body);
            }
        }
        StmtKind::Class(class) => visitor.visit_class(class),
        StmtKind::Break(_)
        | StmtKind::Continue(_)
        | StmtKind::Empty
        | StmtKind::Protocol(_)
        | StmtKind::Typedef(_)
        | StmtKind::ClassForward(_)
        | StmtKind::ProtocolForward(_)
        | StmtKind::Import(_)
        | StmtKind::Global(_) => {}
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) {
    match &expr.kind {
        ExprKind::Ident(_)
        | ExprKind::Number(_)
        | ExprKind::Str(_)
        | ExprKind::Bool(_)
        | ExprKind::Null
        | ExprKind::This
        | ExprKind::SelfExpr
        | ExprKind::Super
        | ExprKind::Selector(_)
        | ExprKind::ProtocolLiteral(_) => {}
        ExprKind::Array(elements) => {
            for element in elements.iter().flatten() {
                visitor.visit_expr(element);
            }
        }
        ExprKind::Object(properties) => {
            for property in properties {
                visitor.visit_expr(&property.value);
            }
        }
        ExprKind::Function(function) => visitor.visit_function(function),
        ExprKind::Unary { operand, .. }
        | ExprKind::Update { operand, .. }
        | ExprKind::Ref(operand)
        | ExprKind::Deref(operand) => visitor.visit_expr(operand),
        ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::Assign { target, value, .. } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            visitor.visit_expr(test);
            visitor.visit_expr(consequent);
            visitor.visit_expr(alternate);
        }
        ExprKind::Call { callee, args } | ExprKind::New { callee, args } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        ExprKind::Member { object, property } => {
            visitor.visit_expr(object);
            if let MemberProperty::Computed(property) = property {
                visitor.visit_expr(property);
            }
        }
        ExprKind::Sequence(exprs) => {
            for expr in exprs {
                visitor.visit_expr(expr);
            }
        }
        ExprKind::MessageSend(send) => {
            visitor.visit_expr(&send.receiver);
            for arg in send.arguments() {
                visitor.visit_expr(arg);
            }
        }
    }
}

pub fn walk_function<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, function: &'ast Function) {
    walk_stmts(visitor, &function.body);
}

pub fn walk_class<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    class: &'ast ClassDeclaration,
) {
    for method in &class.methods {
        visitor.visit_method(method);
    }
}

pub fn walk_method<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    method: &'ast MethodDeclaration,
) {
    if let Some(body) = &method.body {
        walk_stmts(visitor, body);
    }
}
